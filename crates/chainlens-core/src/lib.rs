#![warn(missing_docs)]
//! `chainlens-core` - headless analysis engine for chain-ID references in Hyperlane projects.
//!
//! # Overview
//!
//! The engine finds `chainId: <digits>` references in source text, classifies each one against
//! a layered registry, and produces diagnostics, quick fixes and hover text. It has no protocol
//! knowledge; `chainlens-lsp` wires it to an editor.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Code Actions / Hover / Commands            │  ← Editor-facing output
//! ├─────────────────────────────────────────────┤
//! │  Validation (scan → cap → classify)         │  ← Per-document pass
//! ├─────────────────────────────────────────────┤
//! │  Classification (4 states, fixed order)     │
//! ├─────────────────────────────────────────────┤
//! │  Known chains + local registry snapshot     │  ← Data sources
//! ├─────────────────────────────────────────────┤
//! │  Documents (Rope) + Settings cache          │  ← Session state
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use chainlens_core::{Settings, validate, DiagnosticSeverity};
//!
//! let text = "export const config = {\n  chainId: 1,\n};\n";
//! let diagnostics = validate(text, &Settings::default());
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Information);
//! ```

pub mod classify;
pub mod code_actions;
pub mod commands;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod hover;
pub mod known_chains;
pub mod registry;
pub mod scanner;
pub mod settings;
pub mod validation;

pub use classify::{Classification, ClassificationKind, classify};
pub use code_actions::{
    CONFIGURE_COMMAND, COMMANDS, CodeAction, Command, DEPLOY_COMMAND,
    GENERATE_SAMPLE_CONFIG_COMMAND, code_actions,
};
pub use commands::{
    DeploymentPlan, MULTISIG_ISM_FILE, configure_instructions, generate_sample_config,
    plan_deployment,
};
pub use diagnostics::{
    DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticCode, DiagnosticRange, DiagnosticSeverity,
};
pub use document::{ContentChange, DocumentStore, Position, Range, TextDocument};
pub use error::{CommandError, RegistryError};
pub use hover::{chain_id_from_line, hover_for_line, render_chain_hover};
pub use known_chains::{BlockExplorer, ChainMetadata, KNOWN_CHAINS, NativeToken, lookup_known};
pub use registry::{
    ChainIdValue, ChainRegistryEntry, CoreContracts, DeployedAddresses, LocalConfig,
    config_files_present,
};
pub use scanner::{ChainReference, scan};
pub use settings::{
    DEFAULT_MAX_NUMBER_OF_PROBLEMS, FetchTicket, SETTINGS_SECTION, Settings, SettingsCache,
    SettingsLookup,
};
pub use validation::{validate, validate_text};
