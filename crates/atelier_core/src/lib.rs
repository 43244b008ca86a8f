pub mod config;
pub mod error;
pub mod logging;

pub use config::{AtelierConfig, validate_address, validate_url};
pub use error::{AtelierError, MetadataError, Result};
