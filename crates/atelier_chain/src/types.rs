use std::fmt;
use std::str::FromStr;

use atelier_core::{AtelierError, validate_address};
use serde::{Deserialize, Serialize};

// ── Addresses & token references ───────────────────────────────────────

/// A validated `0x`-prefixed hex account address.
///
/// The textual form is kept as given; the node accepts both short and
/// zero-padded spellings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn parse(s: &str) -> Result<Self, AtelierError> {
        let trimmed = s.trim();
        if !validate_address(trimmed) {
            return Err(AtelierError::InvalidAddress(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountAddress {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = AtelierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(address: AccountAddress) -> Self {
        address.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque reference to an on-chain token object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRef(String);

impl TokenRef {
    pub fn new(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ── REST payloads ──────────────────────────────────────────────────────

/// Account record returned by `GET /v1/accounts/{address}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountData {
    pub sequence_number: String,
    pub authentication_key: String,
}

/// ABI summary of a published module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleAbi {
    pub address: String,
    pub name: String,
}

/// One entry of `GET /v1/accounts/{address}/modules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleBytecode {
    pub bytecode: String,
    #[serde(default)]
    pub abi: Option<MoveModuleAbi>,
}

impl MoveModuleBytecode {
    pub fn name(&self) -> Option<&str> {
        self.abi.as_ref().map(|abi| abi.name.as_str())
    }
}

/// One typed record of `GET /v1/accounts/{address}/resources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// Wire form of an object reference inside a holder (`{"inner": "0x.."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub inner: String,
}

/// Data of a `TokenObjectsHolder<T>` resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolder {
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl TokenHolder {
    /// Decode the `data` field of a holder resource.
    pub fn from_resource(resource: &MoveResource) -> Result<Self, AtelierError> {
        serde_json::from_value(resource.data.clone()).map_err(|e| {
            AtelierError::Decode(format!(
                "resource {} is not a token holder: {e}",
                resource.resource_type
            ))
        })
    }

    pub fn token_refs(&self) -> Vec<TokenRef> {
        self.tokens.iter().map(|t| TokenRef::new(&t.inner)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }
}

/// Move `Option<address>` as returned by the `coin_design` view function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDesign {
    #[serde(default)]
    pub vec: Vec<String>,
}

impl StoredDesign {
    pub fn design(&self) -> Option<TokenRef> {
        self.vec.first().map(TokenRef::new)
    }
}

/// Body of `POST /v1/view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<String>,
}

impl ViewRequest {
    /// A view call without type arguments.
    pub fn new(function: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            function: function.into(),
            type_arguments: Vec::new(),
            arguments,
        }
    }
}
