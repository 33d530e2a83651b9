//! Hand-off to the external deployment engine.
//!
//! The server never talks to a chain. A [`DeploymentPlan`] that passed preflight is given to a
//! [`Deployer`], which in production is a separate program configured with `--deployer`.

use chainlens_core::DeploymentPlan;
use std::io;
use std::path::PathBuf;
use std::process::{Command as ProcessCommand, Stdio};
use thiserror::Error;

/// Errors from running a deployment.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The server was started without a deployment engine.
    #[error("no deployer configured; restart the server with --deployer <PROGRAM>")]
    NotConfigured,

    /// The deployment program could not be started.
    #[error("failed to run deployer {}: {source}", program.display())]
    Spawn {
        /// Program that was run.
        program: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The deployment program exited unsuccessfully.
    #[error("deployer exited with {status}: {stderr}")]
    Failed {
        /// Exit status, as displayed by the OS.
        status: String,
        /// Trimmed standard error output.
        stderr: String,
    },
}

/// Something that can carry out a deployment plan.
pub trait Deployer {
    /// Deploy to `plan.local`, connecting it to `plan.remotes`.
    fn deploy(&mut self, plan: &DeploymentPlan) -> Result<(), DeployError>;
}

/// Deployer used when none is configured. Always fails with [`DeployError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingDeployer;

impl Deployer for MissingDeployer {
    fn deploy(&mut self, _plan: &DeploymentPlan) -> Result<(), DeployError> {
        Err(DeployError::NotConfigured)
    }
}

/// Runs an external program for each deployment.
///
/// The program is invoked as
/// `<program> --chain-id <id> --local <name> --remotes <a,b,..> --config-dir <dir>`.
/// Its output is captured and logged, since the server's stdout is the protocol channel.
#[derive(Debug, Clone)]
pub struct ProcessDeployer {
    program: PathBuf,
}

impl ProcessDeployer {
    /// Create a deployer that runs `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, plan: &DeploymentPlan) -> ProcessCommand {
        let mut cmd = ProcessCommand::new(&self.program);
        cmd.arg("--chain-id")
            .arg(&plan.chain_id)
            .arg("--local")
            .arg(&plan.local)
            .arg("--remotes")
            .arg(plan.remotes.join(","))
            .arg("--config-dir")
            .arg(&plan.config_dir)
            .stdin(Stdio::null());
        cmd
    }
}

impl Deployer for ProcessDeployer {
    fn deploy(&mut self, plan: &DeploymentPlan) -> Result<(), DeployError> {
        log::info!(
            "running {} for chain {} ({})",
            self.program.display(),
            plan.chain_id,
            plan.local
        );
        let output = self
            .command(plan)
            .output()
            .map_err(|source| DeployError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::info!("deployer: {line}");
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            log::warn!("deployer: {line}");
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(DeployError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            })
        }
    }
}
