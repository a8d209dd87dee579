//! Install command implementation

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use extpack_core::{
    BuildOrchestrator, BuildOutcome, CommandBuilder, DIRECTIVE_ENV, ExtensionBuilder,
    ManifestCache, PackageDescriptor, Settings,
};

use super::ConsoleNotifier;
use crate::error::{CliError, Result};

/// Arguments for [`run_install`].
#[derive(Debug, Clone, Copy)]
pub struct InstallArgs<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub ext_dir: &'a Path,
    pub build_cmd: Option<&'a str>,
    pub directive: Option<&'a str>,
    pub work_dir: &'a Path,
    pub has_extensions: bool,
}

/// Host build step backed by `--build-cmd`, if one was given.
struct HostBuilder(Option<CommandBuilder>);

impl ExtensionBuilder for HostBuilder {
    fn build(&mut self, extension_dir: &Path, args: &[String]) -> extpack_core::Result<()> {
        match &mut self.0 {
            Some(builder) => builder.build(extension_dir, args),
            None => Err(extpack_core::Error::build(
                "no build command given (use --build-cmd)",
            )),
        }
    }
}

/// Run the install command
pub fn run_install(args: InstallArgs<'_>) -> Result<()> {
    let directive = args.directive.map(str::to_string);
    let settings = Settings::from_vars(
        |name| {
            if name == DIRECTIVE_ENV {
                directive.clone()
            } else {
                std::env::var(name).ok()
            }
        },
        args.work_dir,
    )?;

    let package = PackageDescriptor::new(args.name, args.version);
    let ext_dir = args.work_dir.join(args.ext_dir);

    let Some(orchestrator) = BuildOrchestrator::for_package(
        args.has_extensions,
        settings,
        Arc::new(ManifestCache::new()),
    ) else {
        println!(
            "{} has no native extensions, nothing to do",
            package.full_name().cyan()
        );
        return Ok(());
    };
    let orchestrator = orchestrator.with_notifier(Arc::new(ConsoleNotifier));

    if orchestrator.directive().packages_build() && args.build_cmd.is_none() {
        return Err(CliError::user(format!(
            "--build-cmd is required in {} mode",
            orchestrator.directive()
        )));
    }

    let mut builder = HostBuilder(
        args.build_cmd
            .map(|cmd| CommandBuilder::new(cmd, args.work_dir)),
    );
    let outcome = orchestrator.build_extensions(&package, &ext_dir, &mut builder)?;

    match outcome {
        BuildOutcome::Skipped if builder.0.is_some() => {
            builder.build(&ext_dir, &[])?;
            println!("{} Built {}", "+".green(), package.full_name().cyan());
        }
        BuildOutcome::Skipped => {
            println!(
                "No {} directive and no --build-cmd, nothing to do",
                DIRECTIVE_ENV.cyan()
            );
        }
        BuildOutcome::NoDependencies => {
            println!("No dependencies listed for {}", package.full_name().cyan());
        }
        BuildOutcome::Applied {
            plan,
            packages_installed,
        } => {
            println!(
                "{} Applied {} archive(s) for {}",
                "+".green(),
                plan.locators.len(),
                package.full_name().cyan()
            );
            if !packages_installed {
                println!(
                    "  {} some OS packages may be missing",
                    "!".yellow().bold()
                );
            }
        }
        BuildOutcome::Packaged { .. } => {
            println!("{} Packaged {}", "+".green(), package.full_name().cyan());
        }
    }

    Ok(())
}
