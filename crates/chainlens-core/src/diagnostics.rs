//! Diagnostics data model.
//!
//! Diagnostics are produced per validation pass and replace the document's previous set as a
//! whole. Ranges are byte offsets into the snapshot that was scanned; protocol layers convert them
//! to line/character positions.

use std::fmt;
use std::ops::Range;

/// Value of [`Diagnostic::source`] for everything this crate emits.
pub const DIAGNOSTIC_SOURCE: &str = "hyperlane";

const CONFIG_NOT_FOUND_TAG: &str = "ConfigNotFound";
const DEPLOY_TO_CHAIN_TAG: &str = "DeployToChain";

/// A half-open byte range (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticRange {
    /// Range start offset (inclusive), in bytes from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in bytes from the start of the document.
    pub end: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl From<Range<usize>> for DiagnosticRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Severity levels produced by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    /// Actionable: something is missing before the chain can be used.
    Warning,
    /// The chain is ready to use.
    Information,
}

/// Machine-readable tag on diagnostics that have a follow-up action.
///
/// Wire form is `ConfigNotFound` or `DeployToChain<chainId>` (e.g. `DeployToChain31337`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// Local config is missing; generate or configure it.
    ConfigNotFound,
    /// Hyperlane can be deployed to the given chain ID.
    DeployToChain(String),
}

impl DiagnosticCode {
    /// Parse the wire form. Unknown codes yield `None`.
    pub fn parse(code: &str) -> Option<Self> {
        if code == CONFIG_NOT_FOUND_TAG {
            return Some(Self::ConfigNotFound);
        }
        let chain_id = code.strip_prefix(DEPLOY_TO_CHAIN_TAG)?;
        if chain_id.is_empty() || !chain_id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self::DeployToChain(chain_id.to_string()))
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigNotFound => f.write_str(CONFIG_NOT_FOUND_TAG),
            Self::DeployToChain(chain_id) => write!(f, "{DEPLOY_TO_CHAIN_TAG}{chain_id}"),
        }
    }
}

/// A single diagnostic for a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte range of the chain reference.
    pub range: DiagnosticRange,
    /// Severity.
    pub severity: DiagnosticSeverity,
    /// Follow-up action tag, set only on actionable diagnostics.
    pub code: Option<DiagnosticCode>,
    /// Producer name, always [`DIAGNOSTIC_SOURCE`].
    pub source: &'static str,
    /// Human-readable message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_wire_format() {
        assert_eq!(DiagnosticCode::ConfigNotFound.to_string(), "ConfigNotFound");
        assert_eq!(
            DiagnosticCode::DeployToChain("999999".to_string()).to_string(),
            "DeployToChain999999"
        );
        assert_eq!(
            DiagnosticCode::parse("DeployToChain7"),
            Some(DiagnosticCode::DeployToChain("7".to_string()))
        );
        assert_eq!(
            DiagnosticCode::parse("ConfigNotFound"),
            Some(DiagnosticCode::ConfigNotFound)
        );
        assert_eq!(DiagnosticCode::parse("DeployToChain"), None);
        assert_eq!(DiagnosticCode::parse("DeployToChainabc"), None);
        assert_eq!(DiagnosticCode::parse("E0308"), None);
    }
}
