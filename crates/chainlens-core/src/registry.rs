//! Workspace-local chain registry.
//!
//! Two JSON files under the configured directory describe chains the user cares about:
//!
//! ```text
//! <configDir>/chains.json                 chain name -> { name, chainId, nativeToken?, publicRpcUrls }
//! <configDir>/artifacts/addresses.json    chain name -> { mailbox, multisigIsm, interchainGasPaymaster }
//! ```
//!
//! Either file may be absent; that is a normal state, not an error. Malformed content is logged
//! and treated as absent so that a broken file never aborts a validation pass.

use crate::error::RegistryError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the local chain registry.
pub const CHAINS_FILE: &str = "chains.json";
/// Directory (relative to the config dir) holding deployment artifacts.
pub const ARTIFACTS_DIR: &str = "artifacts";
/// File name of the deployed-addresses registry inside [`ARTIFACTS_DIR`].
pub const ADDRESSES_FILE: &str = "addresses.json";

/// Path of `chains.json` inside `config_dir`.
pub fn chains_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CHAINS_FILE)
}

/// Path of `artifacts/addresses.json` inside `config_dir`.
pub fn addresses_path(config_dir: &Path) -> PathBuf {
    config_dir.join(ARTIFACTS_DIR).join(ADDRESSES_FILE)
}

/// A `chainId` as written in `chains.json`: usually a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChainIdValue {
    /// Numeric form (`"chainId": 31337`).
    Number(u64),
    /// String form (`"chainId": "31337"`).
    Text(String),
}

impl ChainIdValue {
    /// Whether this registry value refers to the chain ID found in source text.
    ///
    /// Numbers compare numerically (so `"031337"` matches `31337`), strings compare verbatim.
    pub fn matches(&self, chain_id: &str) -> bool {
        match self {
            Self::Number(value) => chain_id.parse::<u64>().is_ok_and(|id| id == *value),
            Self::Text(value) => value == chain_id,
        }
    }
}

/// Native token as declared in `chains.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocalNativeToken {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Token decimals, if declared.
    #[serde(default)]
    pub decimals: Option<u8>,
}

/// One `{ "http": ... }` RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcUrl {
    /// HTTP(S) endpoint.
    pub http: String,
}

/// A chain declared in the local `chains.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRegistryEntry {
    /// Chain name.
    pub name: String,
    /// Chain ID.
    pub chain_id: ChainIdValue,
    /// Native token, if declared.
    #[serde(default)]
    pub native_token: Option<LocalNativeToken>,
    /// Public RPC endpoints.
    #[serde(default)]
    pub public_rpc_urls: Vec<RpcUrl>,
}

/// Addresses recorded for one chain in `artifacts/addresses.json`.
///
/// Deployment artifacts are written incrementally, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedAddresses {
    /// Mailbox contract.
    #[serde(default)]
    pub mailbox: Option<String>,
    /// Multisig ISM contract.
    #[serde(default)]
    pub multisig_ism: Option<String>,
    /// Interchain gas paymaster contract.
    #[serde(default)]
    pub interchain_gas_paymaster: Option<String>,
}

impl DeployedAddresses {
    /// Returns the core contract set if all three addresses are recorded.
    pub fn complete(&self) -> Option<CoreContracts> {
        Some(CoreContracts {
            mailbox: self.mailbox.clone()?,
            multisig_ism: self.multisig_ism.clone()?,
            interchain_gas_paymaster: self.interchain_gas_paymaster.clone()?,
        })
    }
}

/// The three core contracts of a completed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreContracts {
    /// Mailbox contract.
    pub mailbox: String,
    /// Multisig ISM contract.
    pub multisig_ism: String,
    /// Interchain gas paymaster contract.
    pub interchain_gas_paymaster: String,
}

/// `true` only if both `chains.json` and `artifacts/addresses.json` exist.
pub fn config_files_present(config_dir: &Path) -> bool {
    chains_path(config_dir).is_file() && addresses_path(config_dir).is_file()
}

fn read_object(path: &Path) -> Result<Map<String, Value>, RegistryError> {
    if !path.exists() {
        return Err(RegistryError::Missing(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| RegistryError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(RegistryError::NotAnObject(path.to_path_buf())),
    }
}

/// Read every well-formed entry of `chains.json`, in file order.
///
/// Entries that fail to parse are skipped with a warning.
pub fn read_chain_registry(
    config_dir: &Path,
) -> Result<Vec<(String, ChainRegistryEntry)>, RegistryError> {
    let path = chains_path(config_dir);
    let map = read_object(&path)?;
    let mut entries = Vec::with_capacity(map.len());
    for (name, value) in map {
        match serde_json::from_value::<ChainRegistryEntry>(value) {
            Ok(entry) => entries.push((name, entry)),
            Err(err) => log::warn!(
                "ignoring malformed chain '{}' in {}: {}",
                name,
                path.display(),
                err
            ),
        }
    }
    Ok(entries)
}

/// Read every well-formed entry of `artifacts/addresses.json`.
///
/// Entries that fail to parse are skipped with a warning.
pub fn read_deployed_addresses(
    config_dir: &Path,
) -> Result<HashMap<String, DeployedAddresses>, RegistryError> {
    let path = addresses_path(config_dir);
    let map = read_object(&path)?;
    let mut out = HashMap::with_capacity(map.len());
    for (name, value) in map {
        match serde_json::from_value::<DeployedAddresses>(value) {
            Ok(addresses) => {
                out.insert(name, addresses);
            }
            Err(err) => log::warn!(
                "ignoring malformed addresses for '{}' in {}: {}",
                name,
                path.display(),
                err
            ),
        }
    }
    Ok(out)
}

fn absent_on_error<T: Default>(result: Result<T, RegistryError>) -> T {
    result.unwrap_or_else(|err| {
        if err.is_missing() {
            log::debug!("{err}");
        } else {
            log::warn!("Error reading chains.json or addresses.json: {err}");
        }
        T::default()
    })
}

/// An immutable snapshot of the local registry files, loaded once per validation pass.
#[derive(Debug, Clone, Default)]
pub struct LocalConfig {
    config_dir: Option<PathBuf>,
    files_present: bool,
    chains: Vec<(String, ChainRegistryEntry)>,
    addresses: HashMap<String, DeployedAddresses>,
}

impl LocalConfig {
    /// A snapshot with no config directory: nothing declared, nothing deployed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load both registry files from `config_dir`.
    ///
    /// Never fails: unreadable or malformed files behave as if they were absent.
    pub fn load(config_dir: Option<&Path>) -> Self {
        let Some(dir) = config_dir else {
            return Self::empty();
        };

        Self {
            config_dir: Some(dir.to_path_buf()),
            files_present: config_files_present(dir),
            chains: absent_on_error(read_chain_registry(dir)),
            addresses: absent_on_error(read_deployed_addresses(dir)),
        }
    }

    /// The directory this snapshot was loaded from.
    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    /// Whether both registry files existed when the snapshot was taken.
    pub fn config_files_present(&self) -> bool {
        self.config_dir.is_some() && self.files_present
    }

    /// Find the first chain (in file order) declaring `chain_id`.
    pub fn lookup_local(&self, chain_id: &str) -> Option<(&str, &ChainRegistryEntry)> {
        self.chains
            .iter()
            .find(|(_, entry)| entry.chain_id.matches(chain_id))
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Deployed addresses recorded for chain `name`.
    pub fn lookup_deployed(&self, name: &str) -> Option<&DeployedAddresses> {
        self.addresses.get(name)
    }

    /// Declared chains in file order.
    pub fn chains(&self) -> &[(String, ChainRegistryEntry)] {
        &self.chains
    }
}
