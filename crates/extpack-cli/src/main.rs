//! extpack CLI
//!
//! Command-line host for the extension packaging engine.

mod cli;
mod commands;
mod error;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} prebuilt native extension packaging", "extpack".green().bold());
            println!();
            println!("Run {} for available commands.", "extpack --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install {
            name,
            version,
            ext_dir,
            build_cmd,
            directive,
            work_dir,
            has_extensions: _,
            no_extensions,
        } => {
            let work_dir = resolve_work_dir(work_dir)?;
            commands::run_install(commands::InstallArgs {
                name: &name,
                version: &version,
                ext_dir: &ext_dir,
                build_cmd: build_cmd.as_deref(),
                directive: directive.as_deref(),
                work_dir: &work_dir,
                has_extensions: !no_extensions,
            })
        }
        Commands::Resolve {
            name,
            version,
            manifest,
            compile,
            work_dir,
            json,
        } => {
            let work_dir = resolve_work_dir(work_dir)?;
            commands::run_resolve(&work_dir, &name, &version, &manifest, compile, json)
        }
        Commands::Pack { dir, output } => {
            let cwd = std::env::current_dir()?;
            commands::run_pack(&cwd, &dir, output.as_deref())
        }
        Commands::Unpack { archive, dir } => commands::run_unpack(&archive, &dir),
    }
}

fn resolve_work_dir(work_dir: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match work_dir {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}
