//! Atelier Gallery — resolves an account's coin and design holdings and
//! renders them.
//!
//! - **Resolver**: wallet connect, account/module/resource fetch, holder
//!   selection and a bounded fan-out of view calls per token.
//! - **Session**: generation-tagged refreshes; results of a superseded
//!   refresh are never committed.
//! - **Render**: text and JSON reports keyed by token reference.

pub mod model;
pub mod render;
pub mod resolver;
pub mod session;

pub use model::{CoinEntry, DesignEntry, Gallery, Lookup};
pub use render::{CoinRow, DesignRow, Report, render_json, render_text, report};
pub use resolver::{Resolver, find_holder, has_module};
pub use session::{RefreshOutcome, Session};
