use std::collections::HashMap;
use std::sync::Arc;

use atelier_chain::{
    AccountAddress, CoinInfo, DesignInfo, LedgerClient, MoveModuleBytecode, MoveResource,
    StoredDesign, TokenHolder, TokenRef, ViewRequest, Wallet, WalletAccount,
};
use atelier_core::{AtelierConfig, AtelierError, Result};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::model::{CoinEntry, DesignEntry, Gallery, Lookup};

const COIN_INFO: &str = "coin_info";
const COIN_DESIGN: &str = "coin_design";
const DESIGN_INFO: &str = "design_info";

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Turns a wallet account into a [`Gallery`].
///
/// The ledger client and wallet are injected so the same pipeline runs
/// against a node or an in-memory fake.
pub struct Resolver {
    client: Arc<dyn LedgerClient>,
    wallet: Arc<dyn Wallet>,
    config: AtelierConfig,
}

impl Resolver {
    pub fn new(client: Arc<dyn LedgerClient>, wallet: Arc<dyn Wallet>, config: AtelierConfig) -> Self {
        Self {
            client,
            wallet,
            config,
        }
    }

    pub fn config(&self) -> &AtelierConfig {
        &self.config
    }

    /// Connect the wallet and resolve its account.
    pub async fn resolve(&self) -> Result<Gallery> {
        let WalletAccount { address } = self.wallet.connect().await?;
        self.resolve_address(address).await
    }

    /// Resolve the holdings of `address`.
    ///
    /// Failures fetching the account, modules or resources abort the
    /// resolution. Failures of individual view calls are recorded on the
    /// token they belong to.
    pub async fn resolve_address(&self, address: AccountAddress) -> Result<Gallery> {
        let module_address = AccountAddress::parse(&self.config.module_address)?;

        let (account, modules, resources) = tokio::try_join!(
            self.client.get_account(&address),
            self.client.get_account_modules(&module_address),
            self.client.get_account_resources(&address),
        )?;
        debug!(
            modules = modules.len(),
            resources = resources.len(),
            "fetched account state"
        );

        let module_present = has_module(&modules, &self.config.module_name);
        if !module_present {
            warn!(
                module = %self.config.module_name,
                at = %module_address,
                "module not published, skipping token lookups"
            );
        }

        let coin_tokens = holder_tokens(&resources, &self.config.coin_holder_type())?;
        let design_tokens = holder_tokens(&resources, &self.config.design_holder_type())?;

        let coins = if module_present && !coin_tokens.is_empty() {
            self.resolve_coins(&coin_tokens).await
        } else {
            HashMap::new()
        };
        let designs = if module_present && !design_tokens.is_empty() {
            self.resolve_designs(&design_tokens).await
        } else {
            HashMap::new()
        };

        let gallery = Gallery {
            address,
            account,
            has_module: module_present,
            coin_tokens,
            design_tokens,
            coins,
            designs,
            resolved_at: Utc::now(),
        };
        info!(
            address = %gallery.address,
            coins = gallery.coin_tokens.len(),
            designs = gallery.design_tokens.len(),
            failures = gallery.failure_count(),
            "resolution complete"
        );
        Ok(gallery)
    }

    // -- Per-token fan-out --------------------------------------------------

    async fn resolve_coins(&self, tokens: &[TokenRef]) -> HashMap<TokenRef, CoinEntry> {
        stream::iter(tokens.iter().cloned())
            .map(|token| async move {
                let entry = self.resolve_coin(&token).await;
                (token, entry)
            })
            .buffer_unordered(self.config.concurrency_limit())
            .collect()
            .await
    }

    async fn resolve_designs(&self, tokens: &[TokenRef]) -> HashMap<TokenRef, DesignEntry> {
        stream::iter(tokens.iter().cloned())
            .map(|token| async move {
                let info = self.design_info(&token).await;
                (token, DesignEntry { info })
            })
            .buffer_unordered(self.config.concurrency_limit())
            .collect()
            .await
    }

    /// Lookups for one coin run one after another, so each fan-out slot holds
    /// at most one view call.
    async fn resolve_coin(&self, token: &TokenRef) -> CoinEntry {
        let info = self.coin_info(token).await;
        let stored_design = self.coin_design(token).await;

        let stored_design_info = match &stored_design {
            Lookup::Resolved(Some(design)) => self.design_info(design).await,
            Lookup::Resolved(None) => {
                debug!(token = %token, "coin stores no design");
                Lookup::Resolved(DesignInfo::default())
            }
            Lookup::Failed(reason) => Lookup::Failed(format!("stored design unavailable: {reason}")),
        };

        CoinEntry {
            info,
            stored_design,
            stored_design_info,
        }
    }

    async fn coin_info(&self, token: &TokenRef) -> Lookup<CoinInfo> {
        logged(COIN_INFO, token, self.fetch_coin_info(token).await)
    }

    async fn coin_design(&self, token: &TokenRef) -> Lookup<Option<TokenRef>> {
        logged(COIN_DESIGN, token, self.fetch_coin_design(token).await)
    }

    async fn design_info(&self, token: &TokenRef) -> Lookup<DesignInfo> {
        logged(DESIGN_INFO, token, self.fetch_design_info(token).await)
    }

    async fn fetch_coin_info(&self, token: &TokenRef) -> Result<CoinInfo> {
        let raw = self.view_string(COIN_INFO, token).await?;
        Ok(CoinInfo::parse(raw.as_deref())?)
    }

    async fn fetch_coin_design(&self, token: &TokenRef) -> Result<Option<TokenRef>> {
        let first = self.view_first(COIN_DESIGN, token).await?;
        decode_stored_design(first)
    }

    async fn fetch_design_info(&self, token: &TokenRef) -> Result<DesignInfo> {
        let raw = self.view_string(DESIGN_INFO, token).await?;
        Ok(DesignInfo::parse(raw.as_deref())?)
    }

    // -- View helpers -------------------------------------------------------

    /// Call a one-argument view function and return its first result.
    async fn view_first(&self, function: &str, token: &TokenRef) -> Result<Option<serde_json::Value>> {
        let request = ViewRequest::new(
            self.config.view_function(function),
            vec![token.as_str().to_string()],
        );
        let values = self.client.view(&request).await?;
        Ok(values.into_iter().next())
    }

    async fn view_string(&self, function: &str, token: &TokenRef) -> Result<Option<String>> {
        let first = self.view_first(function, token).await?;
        decode_view_string(function, first)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whether any module's ABI carries `name`.
pub fn has_module(modules: &[MoveModuleBytecode], name: &str) -> bool {
    modules.iter().any(|m| m.name() == Some(name))
}

/// First resource whose type tag equals `type_tag`, decoded as a holder.
/// Later matches are ignored; no match yields `None`.
pub fn find_holder(resources: &[MoveResource], type_tag: &str) -> Result<Option<TokenHolder>> {
    resources
        .iter()
        .find(|r| r.resource_type == type_tag)
        .map(TokenHolder::from_resource)
        .transpose()
}

fn holder_tokens(resources: &[MoveResource], type_tag: &str) -> Result<Vec<TokenRef>> {
    let tokens = find_holder(resources, type_tag)?
        .map(|holder| holder.token_refs())
        .unwrap_or_default();
    debug!(holder = %type_tag, tokens = tokens.len(), "selected holder");
    Ok(tokens)
}

fn decode_view_string(function: &str, value: Option<serde_json::Value>) -> Result<Option<String>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(AtelierError::Decode(format!(
            "{function} returned {other}, expected a string"
        ))),
    }
}

fn decode_stored_design(value: Option<serde_json::Value>) -> Result<Option<TokenRef>> {
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => {
            let stored: StoredDesign = serde_json::from_value(value).map_err(|e| {
                AtelierError::Decode(format!("{COIN_DESIGN} returned an unexpected shape: {e}"))
            })?;
            Ok(stored.design())
        }
    }
}

fn logged<T>(function: &str, token: &TokenRef, result: Result<T>) -> Lookup<T> {
    if let Err(e) = &result {
        warn!(token = %token, function = %function, "lookup failed: {e}");
    }
    result.into()
}
