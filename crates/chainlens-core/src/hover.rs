//! Hover content for `chainId:` lines.
//!
//! Hover only consults the built-in table. It never reads the local registry, so it stays
//! free of file I/O.

use crate::known_chains::{ChainMetadata, lookup_known};
use std::fmt::Write as _;

/// Extract the chain ID from a line of the form `chainId: <value>`.
///
/// The trimmed line must start with `chainId:`. The value after the colon loses one trailing
/// comma and every quote character.
pub fn chain_id_from_line(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("chainId:")?;
    let value = rest.split(':').next().unwrap_or_default().trim();
    let value = value.strip_suffix(',').unwrap_or(value);
    let chain_id: String = value.chars().filter(|c| *c != '\'' && *c != '"').collect();
    let chain_id = chain_id.trim();
    (!chain_id.is_empty()).then(|| chain_id.to_string())
}

/// Render markdown describing a known chain.
pub fn render_chain_hover(chain_id: &str, metadata: &ChainMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "**Chain ID**: {chain_id}\n");
    let _ = writeln!(out, "**Network**: {}\n", metadata.label());

    if let Some(token) = metadata.native_token {
        let _ = writeln!(out, "**Native Token**: {} ({})\n", token.name, token.symbol);
    }

    if !metadata.block_explorers.is_empty() {
        let links = metadata
            .block_explorers
            .iter()
            .map(|explorer| format!("[{}]({})", explorer.name, explorer.url))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "**Block Explorers**: {links}\n");
    }

    out.push_str("**RPCs**:\n");
    for url in metadata.public_rpc_urls {
        let _ = write!(out, "\n- {url}\n");
    }
    out
}

/// Hover markdown for one line of text, or `None` when there is nothing to show.
pub fn hover_for_line(line: &str) -> Option<String> {
    let chain_id = chain_id_from_line(line)?;
    let metadata = lookup_known(&chain_id)?;
    Some(render_chain_hover(&chain_id, metadata))
}
