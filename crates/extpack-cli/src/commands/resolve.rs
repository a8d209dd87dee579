//! Resolve command implementation

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use extpack_core::{
    BuildOrchestrator, DIRECTIVE_ENV, DependencyPlan, Directive, ManifestCache, PackageDescriptor,
    Settings,
};
use extpack_manifest::BuildMode;

use crate::error::Result;

/// Run the resolve command
pub fn run_resolve(
    work_dir: &Path,
    name: &str,
    version: &str,
    manifest: &str,
    compile: bool,
    json: bool,
) -> Result<()> {
    let (directive, mode) = if compile {
        (
            Directive::Compile {
                manifest: manifest.to_string(),
            },
            BuildMode::Compile,
        )
    } else {
        (
            Directive::Dependencies {
                manifest: manifest.to_string(),
            },
            BuildMode::Dependencies,
        )
    };

    // Only the directive comes from the flags; other settings still honour the environment
    let mut settings = Settings::from_vars(
        |var| (var != DIRECTIVE_ENV).then(|| std::env::var(var).ok()).flatten(),
        work_dir,
    )?;
    settings.directive = directive;

    let package = PackageDescriptor::new(name, version);
    let orchestrator = BuildOrchestrator::new(settings, Arc::new(ManifestCache::new()));
    let plan = orchestrator.plan(&package)?;

    if json {
        let output = serde_json::json!({
            "package": package,
            "mode": mode,
            "plan": plan,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_plan(&package, mode, plan.as_ref());
    Ok(())
}

fn print_plan(package: &PackageDescriptor, mode: BuildMode, plan: Option<&DependencyPlan>) {
    let mode = match mode {
        BuildMode::Dependencies => "dependencies",
        BuildMode::Compile => "compile",
    };
    println!("{} ({})", package.full_name().cyan().bold(), mode.dimmed());

    let Some(plan) = plan else {
        println!("  {}", "No manifest entry applies".dimmed());
        return;
    };

    print_list("Packages", &plan.packages);
    print_list("Archives", &plan.locators);
    print_list("Build args", &plan.build_args);
}

fn print_list(label: &str, items: &[String]) {
    println!("  {}:", label.bold());
    if items.is_empty() {
        println!("    {}", "None".dimmed());
    }
    for item in items {
        println!("    {} {}", "+".green(), item);
    }
}
