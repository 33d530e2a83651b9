//! Chain reference scanner.
//!
//! A narrow lexical pass over raw document text. It recognizes
//!
//! ```text
//! chainId <ws>* : <ws>* ['"]? <digits> ['"]?
//! ```
//!
//! anywhere in the text (no trailing comma required) and reports the digit run together with the
//! byte range of the whole match. Matching is left-to-right and non-overlapping, and every call
//! rescans the full text.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

static CHAIN_ID_PATTERN: OnceLock<Regex> = OnceLock::new();

fn chain_id_pattern() -> &'static Regex {
    CHAIN_ID_PATTERN.get_or_init(|| {
        Regex::new(r#"chainId\s*:\s*['"]?([0-9]+)['"]?"#).expect("valid chain id pattern")
    })
}

/// One `chainId: <digits>` occurrence in a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReference {
    /// The digit run, kept as text so leading zeros and very large IDs survive.
    pub chain_id: String,
    /// Byte offset where the match starts (inclusive).
    pub start: usize,
    /// Byte offset where the match ends (exclusive).
    pub end: usize,
}

impl ChainReference {
    /// Byte range of the whole match.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Lazily yield every chain reference in `text`, in document order.
pub fn scan(text: &str) -> impl Iterator<Item = ChainReference> + '_ {
    chain_id_pattern().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let digits = caps.get(1)?;
        Some(ChainReference {
            chain_id: digits.as_str().to_string(),
            start: whole.start(),
            end: whole.end(),
        })
    })
}
