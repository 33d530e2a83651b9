//! `chainlens-lsp` binary.
//!
//! Speaks LSP over stdio. Logs go to stderr (`RUST_LOG`, default `warn`), since stdout carries
//! the protocol.

use anyhow::{Context, Result};
use chainlens_lsp::{ProcessDeployer, Server, spawn_reader, write_message};
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "chainlens-lsp", version, about = "Hyperlane chain-ID language server")]
struct Args {
    /// Communicate over stdio (the only supported transport; accepted for editor compatibility).
    #[arg(long)]
    stdio: bool,

    /// Program that performs deployments requested by the deploy quick fix.
    #[arg(long, value_name = "PROGRAM")]
    deployer: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    if !args.stdio {
        log::debug!("no transport flag given, using stdio");
    }
    let mut server = match args.deployer {
        Some(program) => {
            log::info!("deployments run through {}", program.display());
            Server::with_deployer(ProcessDeployer::new(program))
        }
        None => Server::new(),
    };

    log::info!("starting chainlens-lsp");
    let inbound = spawn_reader(io::stdin());
    let mut out = BufWriter::new(io::stdout().lock());

    for msg in inbound {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) if err.is_recoverable() => {
                log::warn!("skipping frame: {err}");
                continue;
            }
            Err(err) => return Err(err).context("reading from stdin"),
        };

        for reply in server.handle(msg) {
            write_message(&mut out, &reply).context("writing to stdout")?;
        }
        if server.should_exit() {
            break;
        }
    }

    log::info!("chainlens-lsp stopped");
    Ok(ExitCode::from(server.exit_code() as u8))
}
