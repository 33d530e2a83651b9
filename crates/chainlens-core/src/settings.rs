//! Per-document settings resolution.
//!
//! Settings live in the editor under the `hyperlane` section. When the client supports
//! `workspace/configuration`, they are fetched per document and cached until the next
//! configuration change; otherwise a single process-wide value is used.
//!
//! The cache never talks to the client itself. [`SettingsCache::get`] tells the caller whether
//! a fetch must be issued, and the caller reports the answer back through
//! [`SettingsCache::resolve`] using the ticket it was given.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration section holding the server settings.
pub const SETTINGS_SECTION: &str = "hyperlane";

/// Problem cap used when the client does not provide one.
pub const DEFAULT_MAX_NUMBER_OF_PROBLEMS: usize = 1000;

/// Settings that drive one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Maximum number of chain references classified per document.
    pub max_number_of_problems: usize,
    /// Directory holding `chains.json` and `artifacts/addresses.json`.
    pub config_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_number_of_problems: DEFAULT_MAX_NUMBER_OF_PROBLEMS,
            config_dir: None,
        }
    }
}

impl Settings {
    /// Parse the `hyperlane` settings object sent by the client.
    ///
    /// Parsing is lenient: each field that is missing or has the wrong type falls back to its
    /// default independently.
    pub fn from_value(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                log::warn!("ignoring non-object {SETTINGS_SECTION} settings: {value}");
            }
            return settings;
        };

        match obj.get("maxNumberOfProblems") {
            None | Some(Value::Null) => {}
            Some(raw) => match raw.as_u64().or_else(|| {
                raw.as_f64()
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(|n| n as u64)
            }) {
                Some(max) => settings.max_number_of_problems = max as usize,
                None => log::warn!("invalid maxNumberOfProblems {raw}, using default"),
            },
        }

        match obj.get("configDir") {
            None | Some(Value::Null) => {}
            Some(Value::String(dir)) if dir.trim().is_empty() => {}
            Some(Value::String(dir)) => settings.config_dir = Some(PathBuf::from(dir)),
            Some(raw) => log::warn!("invalid configDir {raw}, ignoring"),
        }

        settings
    }

    /// Resolve a relative `config_dir` against the workspace root.
    pub fn resolve_relative_to(mut self, root: Option<&Path>) -> Self {
        if let (Some(dir), Some(root)) = (&self.config_dir, root)
            && dir.is_relative()
        {
            self.config_dir = Some(root.join(dir));
        }
        self
    }
}

/// Identifies one outstanding settings fetch.
pub type FetchTicket = u64;

/// Outcome of [`SettingsCache::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsLookup {
    /// Settings are known.
    Ready(Settings),
    /// A fetch for this document is already outstanding; wait for it.
    InFlight,
    /// No fetch is outstanding; the caller must issue one tagged with this ticket.
    Fetch(FetchTicket),
}

#[derive(Debug, Clone)]
enum Slot {
    Pending(FetchTicket),
    Resolved(Settings),
}

/// Settings cache with de-duplicated in-flight fetches.
#[derive(Debug, Clone)]
pub struct SettingsCache {
    per_document: bool,
    global: Settings,
    slots: HashMap<String, Slot>,
    pending: HashMap<FetchTicket, String>,
    next_ticket: FetchTicket,
}

impl SettingsCache {
    /// Create a cache.
    ///
    /// `per_document` should be `true` when the client supports `workspace/configuration`.
    pub fn new(per_document: bool) -> Self {
        Self {
            per_document,
            global: Settings::default(),
            slots: HashMap::new(),
            pending: HashMap::new(),
            next_ticket: 1,
        }
    }

    /// Whether settings are fetched per document.
    pub fn is_per_document(&self) -> bool {
        self.per_document
    }

    /// The process-wide settings (used when per-document configuration is unsupported).
    pub fn global_settings(&self) -> &Settings {
        &self.global
    }

    /// Get the settings for `uri`, or learn how to obtain them.
    pub fn get(&mut self, uri: &str) -> SettingsLookup {
        if !self.per_document {
            return SettingsLookup::Ready(self.global.clone());
        }

        match self.slots.get(uri) {
            Some(Slot::Resolved(settings)) => SettingsLookup::Ready(settings.clone()),
            Some(Slot::Pending(_)) => SettingsLookup::InFlight,
            None => {
                let ticket = self.next_ticket;
                self.next_ticket = self.next_ticket.saturating_add(1);
                self.slots.insert(uri.to_string(), Slot::Pending(ticket));
                self.pending.insert(ticket, uri.to_string());
                SettingsLookup::Fetch(ticket)
            }
        }
    }

    /// Complete the fetch identified by `ticket` with the client's answer.
    ///
    /// Returns the document URI and its settings, or `None` if the ticket was invalidated in the
    /// meantime (configuration change or document close).
    pub fn resolve(&mut self, ticket: FetchTicket, value: &Value) -> Option<(String, Settings)> {
        let uri = self.pending.remove(&ticket)?;
        match self.slots.get(&uri) {
            Some(Slot::Pending(current)) if *current == ticket => {}
            _ => return None,
        }

        let settings = Settings::from_value(value);
        self.slots.insert(uri.clone(), Slot::Resolved(settings.clone()));
        Some((uri, settings))
    }

    /// Drop every cached and in-flight entry.
    ///
    /// Answers to fetches issued before this call are ignored.
    pub fn invalidate(&mut self) {
        self.slots.clear();
        self.pending.clear();
    }

    /// Replace the process-wide settings.
    pub fn set_global(&mut self, settings: Settings) {
        self.global = settings;
    }

    /// Forget a document's settings (called when it closes).
    pub fn forget(&mut self, uri: &str) {
        if let Some(Slot::Pending(ticket)) = self.slots.remove(uri) {
            self.pending.remove(&ticket);
        }
    }

    /// Number of fetches currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_parsing() {
        let s = Settings::from_value(&json!({ "maxNumberOfProblems": 5, "configDir": "/tmp/x" }));
        assert_eq!(s.max_number_of_problems, 5);
        assert_eq!(s.config_dir, Some(PathBuf::from("/tmp/x")));

        let s = Settings::from_value(&json!({ "maxNumberOfProblems": "lots", "configDir": 3 }));
        assert_eq!(s, Settings::default());

        let s = Settings::from_value(&json!({ "maxNumberOfProblems": 7.0, "configDir": "" }));
        assert_eq!(s.max_number_of_problems, 7);
        assert_eq!(s.config_dir, None);

        assert_eq!(Settings::from_value(&Value::Null), Settings::default());
    }

    #[test]
    fn relative_config_dir_joins_workspace_root() {
        let s = Settings {
            max_number_of_problems: 1,
            config_dir: Some(PathBuf::from("config")),
        };
        let resolved = s.resolve_relative_to(Some(Path::new("/work")));
        assert_eq!(resolved.config_dir, Some(PathBuf::from("/work/config")));
    }

    #[test]
    fn global_mode_never_fetches() {
        let mut cache = SettingsCache::new(false);
        assert_eq!(
            cache.get("file:///a"),
            SettingsLookup::Ready(Settings::default())
        );
        cache.set_global(Settings {
            max_number_of_problems: 3,
            config_dir: None,
        });
        match cache.get("file:///a") {
            SettingsLookup::Ready(s) => assert_eq!(s.max_number_of_problems, 3),
            other => panic!("unexpected lookup: {:?}", other),
        }
        assert_eq!(cache.in_flight(), 0);
    }

    #[test]
    fn concurrent_requests_share_one_fetch() {
        let mut cache = SettingsCache::new(true);
        let SettingsLookup::Fetch(ticket) = cache.get("file:///a") else {
            panic!("expected a fetch");
        };
        assert_eq!(cache.get("file:///a"), SettingsLookup::InFlight);
        assert_eq!(cache.in_flight(), 1);

        let (uri, settings) = cache
            .resolve(ticket, &json!({ "maxNumberOfProblems": 2 }))
            .unwrap();
        assert_eq!(uri, "file:///a");
        assert_eq!(settings.max_number_of_problems, 2);
        assert_eq!(cache.get("file:///a"), SettingsLookup::Ready(settings));
    }

    #[test]
    fn invalidate_discards_stale_answers() {
        let mut cache = SettingsCache::new(true);
        let SettingsLookup::Fetch(old) = cache.get("file:///a") else {
            panic!("expected a fetch");
        };
        cache.invalidate();
        assert!(cache.resolve(old, &json!({})).is_none());

        let SettingsLookup::Fetch(new) = cache.get("file:///a") else {
            panic!("expected a fresh fetch");
        };
        assert_ne!(old, new);
        assert!(cache.resolve(new, &json!({})).is_some());
    }

    #[test]
    fn forget_drops_pending_fetch() {
        let mut cache = SettingsCache::new(true);
        let SettingsLookup::Fetch(ticket) = cache.get("file:///a") else {
            panic!("expected a fetch");
        };
        cache.forget("file:///a");
        assert_eq!(cache.in_flight(), 0);
        assert!(cache.resolve(ticket, &json!({})).is_none());
    }
}
