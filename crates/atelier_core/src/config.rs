use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AtelierError;

pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_MODULE_ADDRESS: &str =
    "0xacbc58dbe9aa00e7034e5aa4f95dbe01a28a2af96c3df4600d4cd01515227894";
pub const DEFAULT_LIB_MODULE_ADDRESS: &str =
    "0xb056d4a895d9374c2862e406ce5ee4ea2a4cde361e4cd9f9ab4f2869551c4f21";
pub const DEFAULT_MODULE_NAME: &str = "coins";
pub const DEFAULT_HOLDER_MODULE: &str = "token_objects_holder::TokenObjectsHolder";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Longest hex body an account address may carry (32 bytes).
const MAX_ADDRESS_HEX_LEN: usize = 64;

// ---------------------------------------------------------------------------
// AtelierConfig
// ---------------------------------------------------------------------------

/// Runtime configuration stored at `~/.atelier/config.json`.
///
/// The module addresses select which on-chain resource types count as the
/// coin holder and the design holder, and which module the view functions
/// are called on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtelierConfig {
    /// Ledger REST endpoint.
    pub node_url: String,
    /// Address publishing the `coins` module.
    pub module_address: String,
    /// Address publishing the token holder library.
    pub lib_module_address: String,
    /// Module whose presence on `module_address` enables token lookups.
    pub module_name: String,
    /// `module::Struct` path of the holder resource under `lib_module_address`.
    pub holder_module: String,
    pub request_timeout_secs: u64,
    /// Upper bound on in-flight view calls during a resolution.
    pub max_concurrent_requests: usize,
    /// Address handed out by the static wallet when none is given on the
    /// command line.
    pub address: Option<String>,
}

impl Default for AtelierConfig {
    fn default() -> Self {
        Self {
            node_url: DEFAULT_NODE_URL.into(),
            module_address: DEFAULT_MODULE_ADDRESS.into(),
            lib_module_address: DEFAULT_LIB_MODULE_ADDRESS.into(),
            module_name: DEFAULT_MODULE_NAME.into(),
            holder_module: DEFAULT_HOLDER_MODULE.into(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT,
            address: None,
        }
    }
}

impl AtelierConfig {
    /// Base directory for all Atelier data: `~/.atelier`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".atelier"))
    }

    /// Default config file location: `~/.atelier/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Log directory: `~/.atelier/logs`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Load config from a JSON file, or return defaults if the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(data) => match serde_json::from_str::<AtelierConfig>(&data) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Corrupt config file, using defaults: {e}");
                    }
                },
                Err(e) => {
                    tracing::warn!("Cannot read config file, using defaults: {e}");
                }
            }
        }
        Self::default()
    }

    /// Save the config as pretty JSON, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Check endpoint and addresses before any request is made.
    pub fn validate(&self) -> Result<(), AtelierError> {
        if !validate_url(&self.node_url) {
            return Err(AtelierError::Config(format!(
                "invalid node URL: {}",
                self.node_url
            )));
        }
        for (field, value) in [
            ("module_address", &self.module_address),
            ("lib_module_address", &self.lib_module_address),
        ] {
            if !validate_address(value) {
                return Err(AtelierError::Config(format!("invalid {field}: {value}")));
            }
        }
        if let Some(address) = &self.address
            && !validate_address(address)
        {
            return Err(AtelierError::InvalidAddress(address.clone()));
        }
        if self.module_name.is_empty() {
            return Err(AtelierError::Config("module_name must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AtelierError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fan-out limit, never below one.
    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrent_requests.max(1)
    }

    /// Type tag of the resource holding the account's coin tokens.
    pub fn coin_holder_type(&self) -> String {
        self.holder_type("Coin")
    }

    /// Type tag of the resource holding the account's design tokens.
    pub fn design_holder_type(&self) -> String {
        self.holder_type("Design")
    }

    /// Fully qualified name of a view function on the coins module.
    pub fn view_function(&self, name: &str) -> String {
        format!("{}::{}::{name}", self.module_address, self.module_name)
    }

    fn holder_type(&self, item: &str) -> String {
        format!(
            "{}::{}<{}::{}::{item}>",
            self.lib_module_address, self.holder_module, self.module_address, self.module_name
        )
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}

/// Validate a `0x`-prefixed hex account address of at most 32 bytes.
pub fn validate_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => {
            !hex.is_empty()
                && hex.len() <= MAX_ADDRESS_HEX_LEN
                && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localnet() {
        let config = AtelierConfig::default();
        assert_eq!(config.node_url, "http://127.0.0.1:8080");
        assert_eq!(config.module_name, "coins");
        assert!(config.address.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn holder_types_are_built_from_both_addresses() {
        let config = AtelierConfig::default();
        assert_eq!(
            config.coin_holder_type(),
            format!(
                "{DEFAULT_LIB_MODULE_ADDRESS}::token_objects_holder::TokenObjectsHolder<{DEFAULT_MODULE_ADDRESS}::coins::Coin>"
            )
        );
        assert!(config.design_holder_type().ends_with("::coins::Design>"));
    }

    #[test]
    fn view_function_is_scoped_to_module() {
        let config = AtelierConfig::default();
        assert_eq!(
            config.view_function("coin_info"),
            format!("{DEFAULT_MODULE_ADDRESS}::coins::coin_info")
        );
    }

    #[test]
    fn concurrency_limit_never_zero() {
        let config = AtelierConfig {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert_eq!(config.concurrency_limit(), 1);
    }

    #[test]
    fn validate_rejects_bad_node_url() {
        let config = AtelierConfig {
            node_url: "ftp://node.example.com".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AtelierError::Config(_))));
    }

    #[test]
    fn validate_rejects_bad_default_address() {
        let config = AtelierConfig {
            address: Some("alice".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AtelierError::InvalidAddress(_))
        ));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = AtelierConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(AtelierError::Config(_))));

        let config = AtelierConfig {
            request_timeout_secs: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_address_rules() {
        assert!(validate_address("0x1"));
        assert!(validate_address("0xABC"));
        assert!(validate_address(DEFAULT_MODULE_ADDRESS));
        assert!(!validate_address("0x"));
        assert!(!validate_address("abc"));
        assert!(!validate_address("0xzz"));
        assert!(!validate_address(&format!("0x{}", "a".repeat(65))));
    }

    #[test]
    fn validate_url_rules() {
        assert!(validate_url("http://127.0.0.1:8080"));
        assert!(validate_url("https://fullnode.testnet.example.com/v1"));
        assert!(!validate_url(""));
        assert!(!validate_url("not a url"));
        assert!(!validate_url("file:///etc/passwd"));
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let original = AtelierConfig {
            node_url: "https://node.example.com".into(),
            max_concurrent_requests: 2,
            address: Some("0xabc".into()),
            ..Default::default()
        };
        original.save_to_file(&path).unwrap();

        let loaded = AtelierConfig::load_or_default(&path);
        assert_eq!(loaded, original);
    }

    #[test]
    fn load_missing_returns_default() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AtelierConfig::load_or_default(&tmp.path().join("missing.json"));
        assert_eq!(config, AtelierConfig::default());
    }

    #[test]
    fn load_corrupt_returns_default() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(AtelierConfig::load_or_default(&path), AtelierConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "node_url": "https://node.example.com" }"#).unwrap();
        let config = AtelierConfig::load_or_default(&path);
        assert_eq!(config.node_url, "https://node.example.com");
        assert_eq!(config.module_address, DEFAULT_MODULE_ADDRESS);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
