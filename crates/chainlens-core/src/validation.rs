//! One validation pass: scan, cap, classify.

use crate::classify::classify;
use crate::diagnostics::Diagnostic;
use crate::registry::LocalConfig;
use crate::scanner::scan;
use crate::settings::Settings;

/// Classify the first `max_number_of_problems` chain references in `text`.
///
/// Diagnostics come back in scan order. References past the cap produce nothing.
pub fn validate_text(
    text: &str,
    max_number_of_problems: usize,
    local: &LocalConfig,
) -> Vec<Diagnostic> {
    scan(text)
        .take(max_number_of_problems)
        .map(|reference| {
            classify(&reference.chain_id, local).into_diagnostic(reference.range().into())
        })
        .collect()
}

/// Run a full pass with `settings`, loading the local registry snapshot once for the pass.
pub fn validate(text: &str, settings: &Settings) -> Vec<Diagnostic> {
    if settings.max_number_of_problems == 0 {
        return Vec::new();
    }
    let local = LocalConfig::load(settings.config_dir.as_deref());
    let diagnostics = validate_text(text, settings.max_number_of_problems, &local);
    log::debug!(
        "validation produced {} diagnostics (cap {}, config dir {:?})",
        diagnostics.len(),
        settings.max_number_of_problems,
        local.config_dir()
    );
    diagnostics
}
