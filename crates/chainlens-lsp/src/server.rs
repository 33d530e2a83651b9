//! The language server session.
//!
//! [`Server`] owns every piece of session state (open documents, settings cache, last published
//! diagnostics, outstanding server->client requests). It is transport-agnostic: feed it decoded
//! JSON-RPC messages with [`Server::handle`] and write back whatever it returns.

use crate::deploy::{Deployer, MissingDeployer};
use crate::lsp_protocol::{
    self as proto, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, Inbound, METHOD_NOT_FOUND,
    MessageType, REQUEST_FAILED, SERVER_NOT_INITIALIZED,
};
use crate::lsp_uri::workspace_root;
use chainlens_core::{
    COMMANDS, CONFIGURE_COMMAND, CommandError, ContentChange, DEPLOY_COMMAND, DiagnosticCode,
    DocumentStore, FetchTicket, GENERATE_SAMPLE_CONFIG_COMMAND, SETTINGS_SECTION, Settings,
    SettingsCache, SettingsLookup, code_actions, configure_instructions, generate_sample_config,
    hover_for_line, plan_deployment, validate,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;

const SERVER_NAME: &str = "chainlens-lsp";

/// Server -> client requests awaiting an answer.
#[derive(Debug, Clone)]
enum PendingRequest {
    /// `workspace/configuration` for one document.
    Configuration { ticket: FetchTicket },
    /// `workspace/configuration` needed before running a command.
    CommandSettings {
        id: Value,
        command: String,
        arguments: Vec<Value>,
    },
    /// `client/registerCapability`.
    RegisterCapability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Running,
    ShuttingDown,
    Exited { clean: bool },
}

/// One language server session.
pub struct Server {
    documents: DocumentStore,
    settings: SettingsCache,
    published: HashMap<String, Vec<Value>>,
    pending: HashMap<u64, PendingRequest>,
    next_request_id: u64,
    workspace_root: Option<PathBuf>,
    deployer: Box<dyn Deployer>,
    lifecycle: Lifecycle,
    outbox: Vec<Value>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Create a session without a deployment engine.
    pub fn new() -> Self {
        Self::with_deployer(MissingDeployer)
    }

    /// Create a session that hands deployments to `deployer`.
    pub fn with_deployer(deployer: impl Deployer + 'static) -> Self {
        Self {
            documents: DocumentStore::new(),
            settings: SettingsCache::new(false),
            published: HashMap::new(),
            pending: HashMap::new(),
            next_request_id: 1,
            workspace_root: None,
            deployer: Box::new(deployer),
            lifecycle: Lifecycle::Uninitialized,
            outbox: Vec::new(),
        }
    }

    /// Whether `exit` was received.
    pub fn should_exit(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Exited { .. })
    }

    /// Process exit code: 0 if `shutdown` preceded `exit`, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self.lifecycle {
            Lifecycle::Exited { clean: true } => 0,
            _ => 1,
        }
    }

    /// Number of server->client requests still awaiting an answer.
    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Handle one inbound message and return the messages to send, in order.
    pub fn handle(&mut self, msg: Value) -> Vec<Value> {
        match Inbound::from_value(msg) {
            Some(Inbound::Request { id, method, params }) => {
                self.handle_request(id, &method, params)
            }
            Some(Inbound::Notification { method, params }) => {
                self.handle_notification(&method, params)
            }
            Some(Inbound::Response { id, result, error }) => {
                self.handle_response(&id, result, error)
            }
            None => log::warn!("ignoring message that is not JSON-RPC"),
        }
        std::mem::take(&mut self.outbox)
    }

    fn send(&mut self, msg: Value) {
        self.outbox.push(msg);
    }

    fn send_request(&mut self, method: &str, params: Value, pending: PendingRequest) {
        let id = self.next_request_id;
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.pending.insert(id, pending);
        self.send(proto::request(id, method, params));
    }

    fn handle_request(&mut self, id: Value, method: &str, params: Value) {
        match (self.lifecycle, method) {
            (Lifecycle::Uninitialized, "initialize") => {
                let result = self.initialize(&params);
                self.send(proto::response(id, result));
                return;
            }
            (Lifecycle::Uninitialized, _) => {
                self.send(proto::error_response(
                    id,
                    SERVER_NOT_INITIALIZED,
                    "server not initialized",
                ));
                return;
            }
            (Lifecycle::Running, _) => {}
            (_, _) => {
                self.send(proto::error_response(
                    id,
                    INVALID_REQUEST,
                    "server is shutting down",
                ));
                return;
            }
        }

        log::debug!("request {method}");
        match method {
            "initialize" => self.send(proto::error_response(
                id,
                INVALID_REQUEST,
                "server already initialized",
            )),
            "shutdown" => {
                self.lifecycle = Lifecycle::ShuttingDown;
                self.send(proto::response(id, Value::Null));
            }
            "textDocument/hover" => {
                let result = self.hover(&params);
                self.reply(id, result);
            }
            "textDocument/codeAction" => {
                let result = self.code_action(&params);
                self.reply(id, result);
            }
            "workspace/executeCommand" => self.execute_command(id, &params),
            _ => self.send(proto::error_response(
                id,
                METHOD_NOT_FOUND,
                format!("unhandled method {method}"),
            )),
        }
    }

    fn reply(&mut self, id: Value, result: Option<Value>) {
        match result {
            Some(result) => self.send(proto::response(id, result)),
            None => self.send(proto::error_response(id, INVALID_PARAMS, "invalid params")),
        }
    }

    fn handle_notification(&mut self, method: &str, params: Value) {
        if method == "exit" {
            let clean = self.lifecycle == Lifecycle::ShuttingDown;
            self.lifecycle = Lifecycle::Exited { clean };
            return;
        }
        if self.lifecycle != Lifecycle::Running {
            log::debug!("dropping {method} outside a running session");
            return;
        }

        log::debug!("notification {method}");
        match method {
            "initialized" => self.initialized(),
            "textDocument/didOpen" => self.did_open(&params),
            "textDocument/didChange" => self.did_change(&params),
            "textDocument/didClose" => self.did_close(&params),
            "workspace/didChangeConfiguration" => self.did_change_configuration(&params),
            _ => {}
        }
    }

    fn handle_response(&mut self, id: &Value, result: Option<Value>, error: Option<Value>) {
        let Some(pending) = id.as_u64().and_then(|id| self.pending.remove(&id)) else {
            log::warn!("response to unknown request {id}");
            return;
        };
        if let Some(error) = &error {
            log::warn!("client rejected request {id}: {error}");
        }

        // `workspace/configuration` answers with one item per requested section.
        let first_item = || {
            result
                .as_ref()
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .cloned()
                .unwrap_or(Value::Null)
        };

        match pending {
            PendingRequest::Configuration { ticket } => {
                let value = first_item();
                match self.settings.resolve(ticket, &value) {
                    Some((uri, settings)) => self.publish(&uri, &settings),
                    None => log::debug!("discarding stale settings for ticket {ticket}"),
                }
            }
            PendingRequest::CommandSettings {
                id,
                command,
                arguments,
            } => {
                let settings = Settings::from_value(&first_item());
                self.run_command(id, &command, &arguments, &settings);
            }
            PendingRequest::RegisterCapability => {}
        }
    }

    fn initialize(&mut self, params: &Value) -> Value {
        let per_document = params
            .pointer("/capabilities/workspace/configuration")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        self.settings = SettingsCache::new(per_document);
        self.workspace_root = workspace_root(params);
        self.lifecycle = Lifecycle::Running;
        log::info!(
            "initialized (per-document settings: {per_document}, root: {:?})",
            self.workspace_root
        );

        json!({
            "capabilities": {
                "textDocumentSync": 2,
                "hoverProvider": true,
                "codeActionProvider": { "codeActionKinds": ["quickfix"] },
                "executeCommandProvider": { "commands": COMMANDS },
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    fn initialized(&mut self) {
        if !self.settings.is_per_document() {
            return;
        }
        self.send_request(
            "client/registerCapability",
            json!({
                "registrations": [{
                    "id": "chainlens-did-change-configuration",
                    "method": "workspace/didChangeConfiguration",
                }]
            }),
            PendingRequest::RegisterCapability,
        );
    }

    fn did_open(&mut self, params: &Value) {
        let Some(doc) = params.get("textDocument") else {
            log::warn!("didOpen without textDocument");
            return;
        };
        let (Some(uri), Some(text)) = (
            doc.get("uri").and_then(Value::as_str),
            doc.get("text").and_then(Value::as_str),
        ) else {
            log::warn!("didOpen without uri or text");
            return;
        };
        let version = doc
            .get("version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0);

        self.documents.open(uri, version, text);
        self.validate_document(uri);
    }

    fn did_change(&mut self, params: &Value) {
        let Some(doc) = params.get("textDocument") else {
            log::warn!("didChange without textDocument");
            return;
        };
        let Some(uri) = doc.get("uri").and_then(Value::as_str) else {
            log::warn!("didChange without uri");
            return;
        };
        let version = doc
            .get("version")
            .and_then(Value::as_i64)
            .and_then(|v| i32::try_from(v).ok())
            .unwrap_or(0);

        let Some(raw_changes) = params.get("contentChanges").and_then(Value::as_array) else {
            log::warn!("didChange for {uri} without contentChanges");
            return;
        };
        // Applying only some of the edits would leave the text out of sync with the client.
        let Some(changes) = raw_changes
            .iter()
            .map(content_change_from_value)
            .collect::<Option<Vec<ContentChange>>>()
        else {
            log::warn!("ignoring didChange for {uri} (version {version}): malformed content change");
            return;
        };

        if self.documents.change(uri, version, &changes).is_none() {
            log::warn!("didChange for unopened document {uri}");
            return;
        }
        self.validate_document(uri);
    }

    fn did_close(&mut self, params: &Value) {
        let Some(uri) = params.pointer("/textDocument/uri").and_then(Value::as_str) else {
            log::warn!("didClose without uri");
            return;
        };
        self.documents.close(uri);
        self.settings.forget(uri);
        self.published.remove(uri);
        self.send(proto::publish_diagnostics(uri, None, Vec::new()));
    }

    fn did_change_configuration(&mut self, params: &Value) {
        if self.settings.is_per_document() {
            self.settings.invalidate();
        } else {
            let section = params
                .get("settings")
                .and_then(|s| s.get(SETTINGS_SECTION))
                .unwrap_or(&Value::Null);
            self.settings.set_global(Settings::from_value(section));
        }
        self.revalidate_all();
    }

    fn revalidate_all(&mut self) {
        for uri in self.documents.uris() {
            self.validate_document(&uri);
        }
    }

    /// Validate `uri` now, or once its settings arrive.
    fn validate_document(&mut self, uri: &str) {
        match self.settings.get(uri) {
            SettingsLookup::Ready(settings) => self.publish(uri, &settings),
            // The outstanding fetch validates the latest text when it resolves.
            SettingsLookup::InFlight => {}
            SettingsLookup::Fetch(ticket) => self.send_request(
                "workspace/configuration",
                json!({ "items": [{ "scopeUri": uri, "section": SETTINGS_SECTION }] }),
                PendingRequest::Configuration { ticket },
            ),
        }
    }

    fn publish(&mut self, uri: &str, settings: &Settings) {
        let Some(document) = self.documents.get(uri) else {
            return;
        };
        let settings = settings
            .clone()
            .resolve_relative_to(self.workspace_root.as_deref());
        let diagnostics: Vec<Value> = validate(&document.text(), &settings)
            .iter()
            .map(|diagnostic| proto::diagnostic_to_value(document, diagnostic))
            .collect();

        let msg = proto::publish_diagnostics(
            document.uri(),
            Some(document.version()),
            diagnostics.clone(),
        );
        self.published.insert(document.uri().to_string(), diagnostics);
        self.send(msg);
    }

    fn hover(&self, params: &Value) -> Option<Value> {
        let uri = params.pointer("/textDocument/uri")?.as_str()?;
        let position = proto::position_from_value(params.get("position")?)?;

        let markdown = self
            .documents
            .get(uri)
            .and_then(|doc| doc.line(position.line as usize))
            .and_then(|line| hover_for_line(&line));

        Some(match markdown {
            Some(value) => json!({ "contents": { "kind": "markdown", "value": value } }),
            None => Value::Null,
        })
    }

    fn code_action(&self, params: &Value) -> Option<Value> {
        let uri = params.pointer("/textDocument/uri")?.as_str()?;
        if self.documents.get(uri).is_none() {
            return Some(Value::Array(Vec::new()));
        }
        let context = params
            .pointer("/context/diagnostics")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let published = self.published.get(uri).map(Vec::as_slice).unwrap_or(&[]);

        let codes: Vec<Option<DiagnosticCode>> = context
            .iter()
            .map(|diagnostic| diagnostic_code(diagnostic, published))
            .collect();

        let actions: Vec<Value> = code_actions(codes.iter().map(Option::as_ref))
            .into_iter()
            .map(|action| {
                json!({
                    "title": action.title,
                    "kind": "quickfix",
                    "diagnostics": [context[action.diagnostic].clone()],
                    "command": {
                        "title": action.command.title,
                        "command": action.command.command,
                        "arguments": action.command.arguments,
                    },
                })
            })
            .collect();
        Some(Value::Array(actions))
    }

    fn execute_command(&mut self, id: Value, params: &Value) {
        let Some(command) = params.get("command").and_then(Value::as_str) else {
            self.send(proto::error_response(id, INVALID_PARAMS, "missing command"));
            return;
        };
        let command = command.to_string();
        let arguments = params
            .get("arguments")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if !self.settings.is_per_document() {
            let settings = self.settings.global_settings().clone();
            self.run_command(id, &command, &arguments, &settings);
            return;
        }

        // Commands use the workspace-level settings, not any one document's.
        self.send_request(
            "workspace/configuration",
            json!({ "items": [{ "section": SETTINGS_SECTION }] }),
            PendingRequest::CommandSettings {
                id,
                command,
                arguments,
            },
        );
    }

    fn run_command(&mut self, id: Value, command: &str, arguments: &[Value], settings: &Settings) {
        let settings = settings
            .clone()
            .resolve_relative_to(self.workspace_root.as_deref());
        let config_dir = settings.config_dir.as_deref();
        log::info!("executing {command}");

        match command {
            GENERATE_SAMPLE_CONFIG_COMMAND => match generate_sample_config(config_dir) {
                Ok(dir) => {
                    self.send(proto::show_message(
                        MessageType::Info,
                        format!("Generated sample config files in {}", dir.display()),
                    ));
                    self.send(proto::response(id, Value::Null));
                    self.refresh();
                }
                Err(err) => self.command_failed(id, &err),
            },
            CONFIGURE_COMMAND => {
                self.send(proto::show_message(
                    MessageType::Info,
                    configure_instructions(config_dir),
                ));
                self.send(proto::response(id, Value::Null));
            }
            DEPLOY_COMMAND => {
                let Some(chain_id) = arguments.first().and_then(chain_id_argument) else {
                    let err = CommandError::MissingArgument {
                        command: DEPLOY_COMMAND,
                        argument: "chainId",
                    };
                    self.command_failed(id, &err);
                    return;
                };
                let plan = match plan_deployment(&chain_id, config_dir) {
                    Ok(plan) => plan,
                    Err(err) => {
                        self.command_failed(id, &err);
                        return;
                    }
                };

                self.send(proto::show_message(
                    MessageType::Info,
                    format!("Deploying Hyperlane to chain ID {chain_id}..."),
                ));
                match self.deployer.deploy(&plan) {
                    Ok(()) => {
                        self.send(proto::show_message(
                            MessageType::Info,
                            format!(
                                "🚀 Hyperlane deployed to {} with remotes {}!",
                                plan.local,
                                plan.remotes.join(",")
                            ),
                        ));
                        self.send(proto::response(id, Value::Null));
                        self.refresh();
                    }
                    Err(err) => {
                        log::error!("deployment to {chain_id} failed: {err}");
                        let message = err.to_string();
                        self.send(proto::show_message(MessageType::Error, message.clone()));
                        self.send(proto::error_response(id, INTERNAL_ERROR, message));
                    }
                }
            }
            _ => self.send(proto::error_response(
                id,
                INVALID_PARAMS,
                format!("unknown command {command}"),
            )),
        }
    }

    fn command_failed(&mut self, id: Value, err: &CommandError) {
        log::warn!("command failed: {err}");
        let message = err.to_string();
        self.send(proto::show_message(MessageType::Error, message.clone()));
        self.send(proto::error_response(id, REQUEST_FAILED, message));
    }

    /// Re-read settings and revalidate after a command changed files on disk.
    fn refresh(&mut self) {
        if self.settings.is_per_document() {
            self.settings.invalidate();
        }
        self.revalidate_all();
    }
}

fn content_change_from_value(value: &Value) -> Option<ContentChange> {
    let text = value.get("text")?.as_str()?;
    match value.get("range") {
        None | Some(Value::Null) => Some(ContentChange::full(text)),
        Some(range) => Some(ContentChange::incremental(
            proto::range_from_value(range)?,
            text,
        )),
    }
}

fn chain_id_argument(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

/// The code of a context diagnostic, falling back to the published diagnostic at the same range
/// with the same message when the client dropped it.
fn diagnostic_code(diagnostic: &Value, published: &[Value]) -> Option<DiagnosticCode> {
    if let Some(code) = diagnostic.get("code").and_then(Value::as_str) {
        return DiagnosticCode::parse(code);
    }
    published
        .iter()
        .find(|candidate| {
            candidate.get("range") == diagnostic.get("range")
                && candidate.get("message") == diagnostic.get("message")
        })
        .and_then(|candidate| candidate.get("code"))
        .and_then(Value::as_str)
        .and_then(DiagnosticCode::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_id_arguments() {
        assert_eq!(chain_id_argument(&json!("31337")), Some("31337".to_string()));
        assert_eq!(chain_id_argument(&json!(7)), Some("7".to_string()));
        assert_eq!(chain_id_argument(&json!("")), None);
        assert_eq!(chain_id_argument(&json!(null)), None);
    }

    #[test]
    fn code_recovered_from_published_set() {
        let range = json!({
            "start": { "line": 0, "character": 0 },
            "end": { "line": 0, "character": 10 }
        });
        let published = vec![json!({
            "range": range,
            "message": "deploy me",
            "code": "DeployToChain5",
        })];

        let stripped = json!({ "range": range, "message": "deploy me" });
        assert_eq!(
            diagnostic_code(&stripped, &published),
            Some(DiagnosticCode::DeployToChain("5".to_string()))
        );

        let other = json!({ "range": range, "message": "something else" });
        assert_eq!(diagnostic_code(&other, &published), None);

        let explicit = json!({ "range": range, "message": "x", "code": "ConfigNotFound" });
        assert_eq!(
            diagnostic_code(&explicit, &published),
            Some(DiagnosticCode::ConfigNotFound)
        );
    }

    #[test]
    fn incremental_and_full_changes() {
        let full = content_change_from_value(&json!({ "text": "abc" })).unwrap();
        assert_eq!(full.range, None);

        let inc = content_change_from_value(&json!({
            "range": {
                "start": { "line": 0, "character": 1 },
                "end": { "line": 0, "character": 2 }
            },
            "text": "x"
        }))
        .unwrap();
        assert!(inc.range.is_some());

        assert!(content_change_from_value(&json!({ "range": {}, "text": "x" })).is_none());
    }
}
