use async_trait::async_trait;
use atelier_core::{AtelierError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::AccountAddress;

/// The account a wallet connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: AccountAddress,
}

/// Source of the account whose holdings are resolved.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Connect and return the active account. A refusal is an error.
    async fn connect(&self) -> Result<WalletAccount>;
}

/// Wallet that hands out a fixed, pre-configured address.
#[derive(Debug, Clone)]
pub struct StaticWallet {
    address: Option<String>,
}

impl StaticWallet {
    pub fn new(address: Option<String>) -> Self {
        Self { address }
    }
}

#[async_trait]
impl Wallet for StaticWallet {
    async fn connect(&self) -> Result<WalletAccount> {
        let raw = self.address.as_deref().ok_or_else(|| {
            AtelierError::Wallet("no account address configured; pass --address".into())
        })?;
        let address = AccountAddress::parse(raw)?;
        info!(address = %address, "wallet connected");
        Ok(WalletAccount { address })
    }
}
