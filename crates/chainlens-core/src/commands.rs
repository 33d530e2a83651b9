//! Workspace commands behind the quick fixes.
//!
//! These are the checks and file operations that run before anything is handed to the external
//! deployment engine. They never talk to a chain.

use crate::code_actions::{CONFIGURE_COMMAND, DEPLOY_COMMAND, GENERATE_SAMPLE_CONFIG_COMMAND};
use crate::error::CommandError;
use crate::registry::{ARTIFACTS_DIR, CHAINS_FILE, addresses_path, chains_path, read_chain_registry};
use std::fs;
use std::path::{Path, PathBuf};

/// Multisig ISM settings consumed by the deployment engine.
pub const MULTISIG_ISM_FILE: &str = "multisig_ism.json";

/// Sample `chains.json` declaring two local anvil chains.
pub const SAMPLE_CHAINS_JSON: &str = r#"{
  "anvil1": {
    "name": "anvil1",
    "chainId": 31337,
    "nativeToken": {
      "name": "ether",
      "symbol": "ETH",
      "decimals": 18
    },
    "publicRpcUrls": [
      {
        "http": "http://127.0.0.1:8545"
      }
    ]
  },
  "anvil2": {
    "name": "anvil2",
    "chainId": 31338,
    "publicRpcUrls": [
      {
        "http": "http://127.0.0.1:8555"
      }
    ]
  }
}"#;

/// Sample `multisig_ism.json` matching [`SAMPLE_CHAINS_JSON`].
pub const SAMPLE_MULTISIG_ISM_JSON: &str = r#"{
  "anvil1": {
    "threshold": 1,
    "validators": [
      "0xa0ee7a142d267c1f36714e4a8f75612f20a79720"
    ]
  },
  "anvil2": {
    "threshold": 1,
    "validators": [
      "0xa0ee7a142d267c1f36714e4a8f75612f20a79720"
    ]
  }
}"#;

fn write_file(path: &Path, contents: &str) -> Result<(), CommandError> {
    fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), CommandError> {
    fs::create_dir_all(path).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write sample `chains.json` and `multisig_ism.json` into `config_dir`.
///
/// Existing sample files are overwritten. An empty `artifacts/addresses.json` is created if it is
/// missing, so the directory counts as configured afterwards; recorded addresses are never
/// touched.
pub fn generate_sample_config(config_dir: Option<&Path>) -> Result<PathBuf, CommandError> {
    let dir = config_dir.ok_or(CommandError::MissingConfigDir {
        command: GENERATE_SAMPLE_CONFIG_COMMAND,
    })?;

    create_dir(dir)?;
    write_file(&dir.join(CHAINS_FILE), SAMPLE_CHAINS_JSON)?;
    write_file(&dir.join(MULTISIG_ISM_FILE), SAMPLE_MULTISIG_ISM_JSON)?;

    let addresses = addresses_path(dir);
    if !addresses.exists() {
        create_dir(&dir.join(ARTIFACTS_DIR))?;
        write_file(&addresses, "{}")?;
    }

    log::info!("generated sample config in {}", dir.display());
    Ok(dir.to_path_buf())
}

/// Instructions shown by the configure command.
pub fn configure_instructions(config_dir: Option<&Path>) -> String {
    match config_dir {
        None => format!(
            "Set configDir in your editor settings under the Hyperlane extension to the folder \
             where you downloaded the config file ({CONFIGURE_COMMAND})"
        ),
        Some(dir) => format!(
            "NOTE: Copy the downloaded config file to {} and refresh",
            dir.display()
        ),
    }
}

/// Everything the deployment engine needs to deploy to one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    /// Chain ID the user asked to deploy to.
    pub chain_id: String,
    /// Name of that chain in `chains.json`.
    pub local: String,
    /// Every other declared chain, in file order.
    pub remotes: Vec<String>,
    /// Config directory holding the registry and where artifacts are written.
    pub config_dir: PathBuf,
}

/// Check preconditions and resolve the local/remote chain names for a deployment.
pub fn plan_deployment(
    chain_id: &str,
    config_dir: Option<&Path>,
) -> Result<DeploymentPlan, CommandError> {
    let dir = config_dir.ok_or(CommandError::MissingConfigDir {
        command: DEPLOY_COMMAND,
    })?;
    if !chains_path(dir).is_file() || !dir.join(MULTISIG_ISM_FILE).is_file() {
        return Err(CommandError::MissingConfig(dir.to_path_buf()));
    }

    let mut local = None;
    let mut remotes = Vec::new();
    for (name, entry) in read_chain_registry(dir)? {
        if local.is_none() && entry.chain_id.matches(chain_id) {
            log::info!("Found local chain {name}");
            local = Some(name);
        } else {
            log::info!("Found remote chain {name}");
            remotes.push(name);
        }
    }

    let local = local.ok_or_else(|| CommandError::UnknownChain {
        chain_id: chain_id.to_string(),
        path: chains_path(dir),
    })?;

    Ok(DeploymentPlan {
        chain_id: chain_id.to_string(),
        local,
        remotes,
        config_dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ADDRESSES_FILE, ChainRegistryEntry, config_files_present};

    #[test]
    fn samples_parse_as_registry_entries() {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(SAMPLE_CHAINS_JSON).unwrap();
        for value in map.values() {
            serde_json::from_value::<ChainRegistryEntry>(value.clone()).unwrap();
        }
        let names: Vec<_> = map.keys().cloned().collect();
        assert_eq!(names, vec!["anvil1", "anvil2"]);
        serde_json::from_str::<serde_json::Value>(SAMPLE_MULTISIG_ISM_JSON).unwrap();
    }

    #[test]
    fn commands_require_config_dir() {
        assert!(matches!(
            generate_sample_config(None),
            Err(CommandError::MissingConfigDir { .. })
        ));
        assert!(matches!(
            plan_deployment("31337", None),
            Err(CommandError::MissingConfigDir { .. })
        ));
        assert!(configure_instructions(None).contains("Set configDir"));
        assert!(configure_instructions(Some(Path::new("/cfg"))).contains("/cfg"));
    }

    #[test]
    fn generate_then_plan() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("hyperlane");
        assert!(matches!(
            plan_deployment("31337", Some(&config_dir)),
            Err(CommandError::MissingConfig(_))
        ));

        generate_sample_config(Some(&config_dir)).unwrap();
        assert!(config_files_present(&config_dir));
        assert_eq!(
            fs::read_to_string(config_dir.join(ARTIFACTS_DIR).join(ADDRESSES_FILE)).unwrap(),
            "{}"
        );

        let plan = plan_deployment("31338", Some(&config_dir)).unwrap();
        assert_eq!(plan.local, "anvil2");
        assert_eq!(plan.remotes, vec!["anvil1".to_string()]);

        assert!(matches!(
            plan_deployment("1", Some(&config_dir)),
            Err(CommandError::UnknownChain { .. })
        ));
    }

    #[test]
    fn generate_keeps_existing_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts = dir.path().join(ARTIFACTS_DIR);
        fs::create_dir_all(&artifacts).unwrap();
        fs::write(artifacts.join(ADDRESSES_FILE), r#"{"anvil1":{}}"#).unwrap();

        generate_sample_config(Some(dir.path())).unwrap();
        assert_eq!(
            fs::read_to_string(artifacts.join(ADDRESSES_FILE)).unwrap(),
            r#"{"anvil1":{}}"#
        );
    }
}
