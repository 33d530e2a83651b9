//! Quick fixes derived from diagnostic codes.

use crate::diagnostics::DiagnosticCode;

/// Command that deploys Hyperlane to a chain. Takes the chain ID as its only argument.
pub const DEPLOY_COMMAND: &str = "deploy.hyperlane";
/// Command that writes sample config files. No arguments.
pub const GENERATE_SAMPLE_CONFIG_COMMAND: &str = "hyperlane.generate.sample.config";
/// Command that explains how to configure a deployment. No arguments.
pub const CONFIGURE_COMMAND: &str = "hyperlane.configure";

/// All commands quick fixes may invoke.
pub const COMMANDS: [&str; 3] = [
    DEPLOY_COMMAND,
    GENERATE_SAMPLE_CONFIG_COMMAND,
    CONFIGURE_COMMAND,
];

/// A named command plus positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Title shown by the editor.
    pub title: String,
    /// Command identifier.
    pub command: String,
    /// Positional arguments.
    pub arguments: Vec<String>,
}

/// A quick fix for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    /// Title shown by the editor.
    pub title: String,
    /// Command run when the action is picked.
    pub command: Command,
    /// Index (into the caller's diagnostic list) of the diagnostic this action resolves.
    pub diagnostic: usize,
}

impl CodeAction {
    fn new(diagnostic: usize, title: &str, command: &str, arguments: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            command: Command {
                title: title.to_string(),
                command: command.to_string(),
                arguments,
            },
            diagnostic,
        }
    }
}

/// Produce quick fixes for a list of diagnostic codes.
///
/// Each item is the parsed code of one diagnostic (`None` for uncoded ones). Returned actions refer
/// back to their diagnostic by position in the input.
pub fn code_actions<'a>(
    codes: impl IntoIterator<Item = Option<&'a DiagnosticCode>>,
) -> Vec<CodeAction> {
    let mut actions = Vec::new();
    for (index, code) in codes.into_iter().enumerate() {
        match code {
            Some(DiagnosticCode::DeployToChain(chain_id)) => actions.push(CodeAction::new(
                index,
                "Deploy Hyperlane to chain",
                DEPLOY_COMMAND,
                vec![chain_id.clone()],
            )),
            Some(DiagnosticCode::ConfigNotFound) => {
                actions.push(CodeAction::new(
                    index,
                    "Generate sample config",
                    GENERATE_SAMPLE_CONFIG_COMMAND,
                    Vec::new(),
                ));
                actions.push(CodeAction::new(
                    index,
                    "Configure Hyperlane deployment",
                    CONFIGURE_COMMAND,
                    Vec::new(),
                ));
            }
            None => {}
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_action_carries_chain_id() {
        let code = DiagnosticCode::DeployToChain("7".to_string());
        let actions = code_actions([Some(&code)]);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].title, "Deploy Hyperlane to chain");
        assert_eq!(actions[0].command.command, DEPLOY_COMMAND);
        assert_eq!(actions[0].command.arguments, vec!["7".to_string()]);
        assert_eq!(actions[0].diagnostic, 0);
    }

    #[test]
    fn config_not_found_offers_generate_and_configure() {
        let code = DiagnosticCode::ConfigNotFound;
        let actions = code_actions([None, Some(&code)]);
        let commands: Vec<_> = actions.iter().map(|a| a.command.command.as_str()).collect();
        assert_eq!(
            commands,
            vec![GENERATE_SAMPLE_CONFIG_COMMAND, CONFIGURE_COMMAND]
        );
        assert!(actions.iter().all(|a| a.command.arguments.is_empty()));
        assert!(actions.iter().all(|a| a.diagnostic == 1));
    }

    #[test]
    fn uncoded_diagnostics_have_no_actions() {
        assert!(code_actions([None, None]).is_empty());
    }
}
