//! Ledger access for Atelier: the account/resource data model, the REST
//! ledger client, the wallet seam and metadata decoding.

pub mod client;
pub mod metadata;
pub mod types;
pub mod wallet;

// Re-export primary types for convenient access.
pub use client::{LedgerClient, RestLedgerClient};
pub use metadata::{CoinInfo, DesignInfo, MetadataError};
pub use types::{
    AccountAddress, AccountData, MoveModuleAbi, MoveModuleBytecode, MoveResource, StoredDesign,
    Token, TokenHolder, TokenRef, ViewRequest,
};
pub use wallet::{StaticWallet, Wallet, WalletAccount};
