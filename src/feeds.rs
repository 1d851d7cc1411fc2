use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// The Spamhaus ASN-DROP feed: one JSON object per line, trailing metadata
/// record included.
pub const ASN_DROP_URL: &str = "https://www.spamhaus.org/drop/asndrop.json";

const FETCH_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Deserialize)]
struct DropEntry {
    /// Absent on the metadata trailer line.
    asn: Option<u32>,
}

/// Download the ASN-DROP feed and return its ASNs in feed order.
pub fn fetch_asn_drop() -> Result<Vec<String>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .context("failed to build HTTP client")?;

    let body = client
        .get(ASN_DROP_URL)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .with_context(|| format!("fetching {ASN_DROP_URL}"))?
        .text()
        .context("reading ASN-DROP body")?;

    parse_asn_drop(&body)
}

/// Pick the ASN out of every data line of the feed body.
pub fn parse_asn_drop(body: &str) -> Result<Vec<String>> {
    let mut asn_list = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: DropEntry = serde_json::from_str(line)
            .with_context(|| format!("malformed ASN-DROP line: {line:?}"))?;
        if let Some(asn) = entry.asn {
            asn_list.push(asn.to_string());
        }
    }
    debug!("ASN-DROP feed lists {} ASNs", asn_list.len());
    Ok(asn_list)
}
