use std::collections::HashMap;

use atelier_chain::{AccountAddress, AccountData, CoinInfo, DesignInfo, TokenRef};
use atelier_core::AtelierError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one per-token lookup.
///
/// A failed view call or malformed metadata string is kept next to the
/// token it belongs to instead of aborting the whole resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Lookup<T> {
    Resolved(T),
    Failed(String),
}

impl<T> Lookup<T> {
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Lookup::Resolved(value) => Some(value),
            Lookup::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Lookup::Resolved(_) => None,
            Lookup::Failed(reason) => Some(reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }
}

impl<T> From<Result<T, AtelierError>> for Lookup<T> {
    fn from(result: Result<T, AtelierError>) -> Self {
        match result {
            Ok(value) => Lookup::Resolved(value),
            Err(e) => Lookup::Failed(e.to_string()),
        }
    }
}

/// Everything resolved for one coin token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinEntry {
    pub info: Lookup<CoinInfo>,
    /// Design linked to the coin, `None` when the coin stores no design.
    pub stored_design: Lookup<Option<TokenRef>>,
    /// Info of the linked design; an empty record when there is no link.
    pub stored_design_info: Lookup<DesignInfo>,
}

impl CoinEntry {
    fn failure_count(&self) -> usize {
        let derived = self.stored_design.is_failed();
        [
            self.info.is_failed(),
            self.stored_design.is_failed(),
            self.stored_design_info.is_failed() && !derived,
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }
}

/// Everything resolved for one design token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignEntry {
    pub info: Lookup<DesignInfo>,
}

/// Result of one full resolution for an address.
///
/// Token lists keep holder order; metadata is keyed by token reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gallery {
    pub address: AccountAddress,
    pub account: AccountData,
    pub has_module: bool,
    pub coin_tokens: Vec<TokenRef>,
    pub design_tokens: Vec<TokenRef>,
    pub coins: HashMap<TokenRef, CoinEntry>,
    pub designs: HashMap<TokenRef, DesignEntry>,
    pub resolved_at: DateTime<Utc>,
}

impl Gallery {
    pub fn coin(&self, token: &TokenRef) -> Option<&CoinEntry> {
        self.coins.get(token)
    }

    pub fn design(&self, token: &TokenRef) -> Option<&DesignEntry> {
        self.designs.get(token)
    }

    /// Number of per-token lookups that failed.
    ///
    /// A linked design's info that failed only because the link itself
    /// could not be read is not counted again.
    pub fn failure_count(&self) -> usize {
        let coin_failures: usize = self.coins.values().map(CoinEntry::failure_count).sum();
        let design_failures = self.designs.values().filter(|d| d.info.is_failed()).count();
        coin_failures + design_failures
    }
}
