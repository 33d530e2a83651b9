#![warn(missing_docs)]
//! `chainlens-lsp` - language server for chain-ID references in Hyperlane projects.
//!
//! This crate wires `chainlens-core` to an editor over LSP: stdio framing, JSON-RPC message
//! shapes, the session state machine, and the hand-off to an external deployment engine.
//! Messages are plain `serde_json::Value`s rather than `lsp-types`.

pub mod deploy;
pub mod lsp_protocol;
pub mod lsp_transport;
pub mod lsp_uri;
pub mod server;

pub use deploy::{DeployError, Deployer, MissingDeployer, ProcessDeployer};
pub use lsp_protocol::{Inbound, MessageType};
pub use lsp_transport::{
    MAX_CONTENT_LENGTH, TransportError, read_message, spawn_reader, write_message,
};
pub use lsp_uri::{file_uri_to_path, percent_decode_path, workspace_root};
pub use server::Server;
