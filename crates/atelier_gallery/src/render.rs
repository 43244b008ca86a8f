//! Text and JSON reports of a [`Gallery`].
//!
//! Rows follow holder order; each row's metadata is looked up by its token
//! reference, never by position.

use atelier_chain::{CoinInfo, DesignInfo};
use serde::Serialize;

use crate::model::{Gallery, Lookup};

const TITLE: &str = "Coins & Designs";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoinRow {
    pub token: String,
    pub info: Option<CoinInfo>,
    pub stored_design: Option<String>,
    pub stored_design_info: Option<DesignInfo>,
    /// Reasons of failed lookups for this token.
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignRow {
    pub token: String,
    pub info: Option<DesignInfo>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub address: String,
    pub has_module: bool,
    pub coins: Vec<CoinRow>,
    pub designs: Vec<DesignRow>,
}

/// Flatten a gallery into display rows.
pub fn report(gallery: &Gallery) -> Report {
    let coins = gallery
        .coin_tokens
        .iter()
        .map(|token| {
            let mut errors = Vec::new();
            let entry = gallery.coin(token);
            let info = entry.and_then(|e| take(&e.info, &mut errors));
            let stored_design = entry
                .and_then(|e| take(&e.stored_design, &mut errors))
                .flatten()
                .map(|t| t.to_string());
            let stored_design_info = entry.and_then(|e| take(&e.stored_design_info, &mut errors));
            CoinRow {
                token: token.to_string(),
                info,
                stored_design,
                stored_design_info,
                errors,
            }
        })
        .collect();

    let designs = gallery
        .design_tokens
        .iter()
        .map(|token| {
            let mut errors = Vec::new();
            let info = gallery
                .design(token)
                .and_then(|e| take(&e.info, &mut errors));
            DesignRow {
                token: token.to_string(),
                info,
                errors,
            }
        })
        .collect();

    Report {
        address: gallery.address.to_string(),
        has_module: gallery.has_module,
        coins,
        designs,
    }
}

fn take<T: Clone>(lookup: &Lookup<T>, errors: &mut Vec<String>) -> Option<T> {
    match lookup {
        Lookup::Resolved(value) => Some(value.clone()),
        Lookup::Failed(reason) => {
            if !errors.contains(reason) {
                errors.push(reason.clone());
            }
            None
        }
    }
}

/// Render the report as indented text lists.
pub fn render_text(gallery: &Gallery) -> String {
    let report = report(gallery);
    let mut out = String::new();

    out.push_str(&format!("{TITLE}\n"));
    out.push_str(&format!("AccountAddress: {}\n", report.address));

    out.push_str("CoinAddress:\n");
    for row in &report.coins {
        let uri = row.info.as_ref().map(|i| i.uri.as_str()).unwrap_or_default();
        let stored = row.stored_design.as_deref().unwrap_or_default();
        let stored_uri = row
            .stored_design_info
            .as_ref()
            .map(|i| i.uri.as_str())
            .unwrap_or_default();
        out.push_str(&format!("  - {}\n", row.token));
        out.push_str(&format!("    url: {uri}\n"));
        out.push_str(&format!("    StoredDesign: {stored}\n"));
        out.push_str(&format!("    StoredUrl: {stored_uri}\n"));
        push_errors(&mut out, &row.errors);
    }

    out.push_str("DesignAddress:\n");
    for row in &report.designs {
        let uri = row.info.as_ref().map(|i| i.uri.as_str()).unwrap_or_default();
        out.push_str(&format!("  - {}\n", row.token));
        out.push_str(&format!("    url: {uri}\n"));
        push_errors(&mut out, &row.errors);
    }

    out
}

fn push_errors(out: &mut String, errors: &[String]) {
    for error in errors {
        out.push_str(&format!("    error: {error}\n"));
    }
}

/// Render the report as pretty JSON.
pub fn render_json(gallery: &Gallery) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&report(gallery))
}
