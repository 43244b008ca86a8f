//! Decoding of the comma-joined metadata strings returned by the
//! `coin_info` and `design_info` view functions.

use serde::{Deserialize, Serialize};

pub use atelier_core::MetadataError;

const DELIMITER: char = ',';

/// Metadata of a coin token, in on-chain field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub collection: String,
    pub description: String,
    pub name: String,
    pub uri: String,
}

impl CoinInfo {
    pub const ARITY: usize = 4;

    /// Parse a `coin_info` result. `None` or an empty string yields an
    /// all-empty record.
    pub fn parse(raw: Option<&str>) -> Result<Self, MetadataError> {
        let Some(fields) = split_fields(raw, Self::ARITY)? else {
            return Ok(Self::default());
        };
        let [collection, description, name, uri] = take_fields(fields);
        Ok(Self {
            collection,
            description,
            name,
            uri,
        })
    }
}

/// Metadata of a design token, in on-chain field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignInfo {
    pub collection: String,
    pub description: String,
    pub name: String,
    pub attribute: String,
    pub uri: String,
}

impl DesignInfo {
    pub const ARITY: usize = 5;

    /// Parse a `design_info` result with the same rules as [`CoinInfo::parse`].
    pub fn parse(raw: Option<&str>) -> Result<Self, MetadataError> {
        let Some(fields) = split_fields(raw, Self::ARITY)? else {
            return Ok(Self::default());
        };
        let [collection, description, name, attribute, uri] = take_fields(fields);
        Ok(Self {
            collection,
            description,
            name,
            attribute,
            uri,
        })
    }
}

/// Split `raw` into exactly `arity` fields.
///
/// Over-long input gets one compaction pass that drops empty entries
/// (stray delimiters); the result must then hold exactly `arity` fields.
fn split_fields(raw: Option<&str>, arity: usize) -> Result<Option<Vec<String>>, MetadataError> {
    let raw = match raw {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(None),
    };

    let elems: Vec<&str> = raw.split(DELIMITER).collect();
    if elems.len() < arity {
        return Err(MetadataError::NotEnoughElements {
            expected: arity,
            found: elems.len(),
        });
    }
    if elems.len() == arity {
        return Ok(Some(elems.into_iter().map(str::to_owned).collect()));
    }

    let compacted: Vec<String> = elems
        .into_iter()
        .filter(|e| !e.is_empty())
        .map(str::to_owned)
        .collect();
    if compacted.len() > arity {
        return Err(MetadataError::TooManyElements {
            expected: arity,
            found: compacted.len(),
        });
    }
    if compacted.len() < arity {
        return Err(MetadataError::NotEnoughElements {
            expected: arity,
            found: compacted.len(),
        });
    }
    Ok(Some(compacted))
}

/// Move an exact-length field vector into a fixed array.
fn take_fields<const N: usize>(fields: Vec<String>) -> [String; N] {
    let mut iter = fields.into_iter();
    std::array::from_fn(|_| iter.next().unwrap_or_default())
}
