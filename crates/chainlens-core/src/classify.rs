//! Four-way classification of a chain reference.
//!
//! Rules are evaluated in a fixed precedence order and the first one that applies wins:
//!
//! 1. [`ClassificationKind::KnownNetwork`]: the built-in table knows the chain.
//! 2. [`ClassificationKind::DeployedWithAddresses`]: declared locally and fully deployed.
//! 3. [`ClassificationKind::ConfigNotFound`]: no config dir, or a registry file is missing.
//! 4. [`ClassificationKind::UndeployedKnownConfig`]: everything else.

use crate::diagnostics::{
    DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticCode, DiagnosticRange, DiagnosticSeverity,
};
use crate::known_chains::lookup_known;
use crate::registry::{CoreContracts, LocalConfig};

/// Classification states without payload, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationKind {
    /// Public network from the built-in table.
    KnownNetwork,
    /// Locally declared chain with all core contracts deployed.
    DeployedWithAddresses,
    /// Local config is missing.
    ConfigNotFound,
    /// Config exists but the chain is undeclared or not fully deployed.
    UndeployedKnownConfig,
}

/// The result of classifying one chain ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Public network from the built-in table.
    KnownNetwork {
        /// Display name (or name) of the network.
        network: String,
    },
    /// Locally declared chain with all core contracts deployed.
    DeployedWithAddresses {
        /// Chain name from `chains.json`.
        name: String,
        /// Deployed core contracts.
        contracts: CoreContracts,
    },
    /// Local config is missing.
    ConfigNotFound {
        /// Chain ID as written in source.
        chain_id: String,
    },
    /// Config exists but the chain is undeclared or not fully deployed.
    UndeployedKnownConfig {
        /// Chain ID as written in source.
        chain_id: String,
    },
}

/// Classify `chain_id` against the built-in table and a local registry snapshot.
pub fn classify(chain_id: &str, local: &LocalConfig) -> Classification {
    if let Some(metadata) = lookup_known(chain_id) {
        return Classification::KnownNetwork {
            network: metadata.label().to_string(),
        };
    }

    let deployed = local.lookup_local(chain_id).and_then(|(name, _)| {
        let contracts = local.lookup_deployed(name)?.complete()?;
        Some((name, contracts))
    });
    if let Some((name, contracts)) = deployed {
        return Classification::DeployedWithAddresses {
            name: name.to_string(),
            contracts,
        };
    }

    if !local.config_files_present() {
        return Classification::ConfigNotFound {
            chain_id: chain_id.to_string(),
        };
    }

    Classification::UndeployedKnownConfig {
        chain_id: chain_id.to_string(),
    }
}

impl Classification {
    /// The payload-free state.
    pub fn kind(&self) -> ClassificationKind {
        match self {
            Self::KnownNetwork { .. } => ClassificationKind::KnownNetwork,
            Self::DeployedWithAddresses { .. } => ClassificationKind::DeployedWithAddresses,
            Self::ConfigNotFound { .. } => ClassificationKind::ConfigNotFound,
            Self::UndeployedKnownConfig { .. } => ClassificationKind::UndeployedKnownConfig,
        }
    }

    /// Severity of the resulting diagnostic.
    pub fn severity(&self) -> DiagnosticSeverity {
        match self {
            Self::KnownNetwork { .. } | Self::DeployedWithAddresses { .. } => {
                DiagnosticSeverity::Information
            }
            Self::ConfigNotFound { .. } | Self::UndeployedKnownConfig { .. } => {
                DiagnosticSeverity::Warning
            }
        }
    }

    /// Follow-up action tag, if the state is actionable.
    pub fn code(&self) -> Option<DiagnosticCode> {
        match self {
            Self::KnownNetwork { .. } | Self::DeployedWithAddresses { .. } => None,
            Self::ConfigNotFound { .. } => Some(DiagnosticCode::ConfigNotFound),
            Self::UndeployedKnownConfig { chain_id } => {
                Some(DiagnosticCode::DeployToChain(chain_id.clone()))
            }
        }
    }

    /// User-facing message.
    pub fn message(&self) -> String {
        match self {
            Self::KnownNetwork { network } => {
                format!("🚀🚀🚀 {network} network is ready to use on Hyperlane! 🚀🚀🚀")
            }
            Self::DeployedWithAddresses { name, contracts } => format!(
                "🚀🚀🚀 {name} network is ready to use on Hyperlane! 🚀🚀🚀\n\
                 📬 Mailbox: {}\n\
                 🔐 Multisig ISM: {}\n\
                 ⛽ IGP: {}",
                contracts.mailbox, contracts.multisig_ism, contracts.interchain_gas_paymaster
            ),
            Self::ConfigNotFound { chain_id } => format!(
                "Chain ID {chain_id} is not yet supported by Hyperlane and config not found. \
                 🪄✨ Generate or configure? ✨🪄"
            ),
            Self::UndeployedKnownConfig { chain_id } => format!(
                "Chain ID {chain_id} is not yet supported by Hyperlane. \
                 🪄✨ Deploy Hyperlane to chain? ✨🪄"
            ),
        }
    }

    /// Build the diagnostic for a reference spanning `range`.
    pub fn into_diagnostic(self, range: DiagnosticRange) -> Diagnostic {
        Diagnostic {
            range,
            severity: self.severity(),
            code: self.code(),
            source: DIAGNOSTIC_SOURCE,
            message: self.message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_network_uses_display_name() {
        let c = classify("1", &LocalConfig::empty());
        assert_eq!(
            c,
            Classification::KnownNetwork {
                network: "Ethereum".to_string()
            }
        );
        assert_eq!(c.severity(), DiagnosticSeverity::Information);
        assert_eq!(c.code(), None);
        assert!(c.message().contains("Ethereum network is ready"));
    }

    #[test]
    fn unknown_without_config_dir_is_config_not_found() {
        let c = classify("999999", &LocalConfig::empty());
        assert_eq!(c.kind(), ClassificationKind::ConfigNotFound);
        assert_eq!(c.severity(), DiagnosticSeverity::Warning);
        assert_eq!(c.code(), Some(DiagnosticCode::ConfigNotFound));
        assert!(c.message().contains("Chain ID 999999"));
    }

    #[test]
    fn earlier_rules_win_when_several_apply() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("chains.json"),
            r#"{
                "mainnet": { "name": "mainnet", "chainId": 1 },
                "foo": { "name": "foo", "chainId": 999999 }
            }"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("artifacts")).unwrap();
        let addresses = r#"{ "mailbox": "0x1", "multisigIsm": "0x2", "interchainGasPaymaster": "0x3" }"#;
        std::fs::write(
            dir.path().join("artifacts/addresses.json"),
            format!(r#"{{ "mainnet": {addresses}, "foo": {addresses} }}"#),
        )
        .unwrap();
        let local = LocalConfig::load(Some(dir.path()));

        // Built-in table beats a full local deployment.
        assert_eq!(classify("1", &local).kind(), ClassificationKind::KnownNetwork);
        // A full local deployment beats "config exists but undeployed".
        assert_eq!(
            classify("999999", &local).kind(),
            ClassificationKind::DeployedWithAddresses
        );
        // Config present, chain undeclared.
        assert_eq!(
            classify("424242", &local).kind(),
            ClassificationKind::UndeployedKnownConfig
        );

        // Same chain IDs once the addresses file is gone.
        std::fs::remove_file(dir.path().join("artifacts/addresses.json")).unwrap();
        let local = LocalConfig::load(Some(dir.path()));
        assert_eq!(classify("1", &local).kind(), ClassificationKind::KnownNetwork);
        assert_eq!(
            classify("999999", &local).kind(),
            ClassificationKind::ConfigNotFound
        );
    }

    #[test]
    fn deployed_message_lists_contracts() {
        let c = Classification::DeployedWithAddresses {
            name: "foo".to_string(),
            contracts: CoreContracts {
                mailbox: "0xmailbox".to_string(),
                multisig_ism: "0xism".to_string(),
                interchain_gas_paymaster: "0xigp".to_string(),
            },
        };
        let message = c.message();
        assert!(message.starts_with("🚀🚀🚀 foo network"));
        assert!(message.contains("Mailbox: 0xmailbox"));
        assert!(message.contains("Multisig ISM: 0xism"));
        assert!(message.contains("IGP: 0xigp"));
        assert_eq!(message.lines().count(), 4);
    }
}
