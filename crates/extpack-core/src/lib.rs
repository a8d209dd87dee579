//! Build orchestration for prebuilt native extensions
//!
//! This crate ties the manifest and archive layers together behind a small
//! state machine, selected by the mode directive:
//!
//! - **NoOp**: no directive, the host builds as usual
//! - **Self-package**: build, then archive the extension directory
//! - **Compile**: install dev packages, build with extra args, then archive
//! - **Dependencies**: install OS packages and unpack prebuilt archives
//!
//! # Architecture
//!
//! ```text
//!                 host installer / CLI
//!                          |
//!                    extpack-core
//!                          |
//!              +-----------+-----------+
//!              |                       |
//!       extpack-manifest  ------>  extpack-fs
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod installer;
pub mod orchestrator;

pub use config::{DIRECTIVE_ENV, Directive, Settings};
pub use error::{Error, Result};
pub use host::{CommandBuilder, ExtensionBuilder, Notify, TracingNotifier};
pub use installer::{InstallCommand, PackageInstaller};
pub use orchestrator::{BuildOrchestrator, BuildOutcome};

pub use extpack_manifest::{DependencyPlan, ManifestCache, PackageDescriptor};
