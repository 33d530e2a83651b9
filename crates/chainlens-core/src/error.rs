//! Error types for local config access and workspace commands.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the workspace-local chain registry files.
///
/// Validation never surfaces these to the editor: [`crate::registry::LocalConfig`] logs them
/// and treats the affected file as absent. Commands propagate them to the user.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The file does not exist.
    #[error("file doesn't exist at {}", .0.display())]
    Missing(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid JSON.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        /// Path that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but not an object keyed by chain name.
    #[error("{} must contain a JSON object keyed by chain name", .0.display())]
    NotAnObject(PathBuf),
}

impl RegistryError {
    /// Returns `true` when the error only means "the file is not there".
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }
}

/// Errors produced by user-invoked workspace commands (generate / configure / deploy).
///
/// These abort only the command that raised them and are shown to the user verbatim.
#[derive(Debug, Error)]
pub enum CommandError {
    /// `hyperlane.configDir` is not set.
    #[error("Set hyperlane.configDir in your editor settings to use {command}")]
    MissingConfigDir {
        /// Command that needed the setting.
        command: &'static str,
    },

    /// A required config file is missing from the config directory.
    #[error(
        "Missing config in {}. Run \"Generate sample config\" to generate sample Hyperlane config.",
        .0.display()
    )]
    MissingConfig(PathBuf),

    /// The requested chain ID is not declared in `chains.json`.
    #[error("Could not find chain with chain ID {chain_id} in {}", path.display())]
    UnknownChain {
        /// Chain ID the user asked for.
        chain_id: String,
        /// Registry file that was searched.
        path: PathBuf,
    },

    /// A command was invoked without a required argument.
    #[error("{command} requires a {argument} argument")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// Name of the missing argument.
        argument: &'static str,
    },

    /// Writing a generated file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading the local registry failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
