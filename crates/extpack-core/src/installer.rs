//! OS package installation.
//!
//! The manifest's reserved `"*"` entry carries a command template such as
//! `apt-get install -y ${packages}`. The placeholder is replaced by the
//! space-joined package list and the result runs through the system shell
//! with inherited stdio, so the package manager's prompts and progress stay
//! visible.

use std::process::{Command, Stdio};
use std::sync::Arc;

use extpack_manifest::PACKAGES_PLACEHOLDER;

use crate::error::{Error, Result};
use crate::host::Notify;

/// Build a shell [`Command`] that executes `cmd_str` via the system shell.
///
/// - Unix: `sh -c "{cmd_str}"`
/// - Windows: `cmd /C "{cmd_str}"`
pub(crate) fn shell_command(cmd_str: &str) -> Command {
    #[cfg(windows)]
    {
        let mut c = Command::new("cmd");
        c.args(["/C", cmd_str]);
        c
    }
    #[cfg(not(windows))]
    {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_str);
        c
    }
}

/// An install command template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    template: String,
}

impl InstallCommand {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute the first `${packages}` with the space-joined list.
    ///
    /// Substitution is a single pass: a package name containing the
    /// placeholder text is not expanded again.
    pub fn render<S: AsRef<str>>(&self, packages: &[S]) -> String {
        let joined = packages
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        self.template.replacen(PACKAGES_PLACEHOLDER, &joined, 1)
    }
}

/// Runs the install command for a set of OS packages.
pub struct PackageInstaller {
    command: Option<InstallCommand>,
    notifier: Arc<dyn Notify>,
}

impl PackageInstaller {
    pub fn new(command: Option<InstallCommand>, notifier: Arc<dyn Notify>) -> Self {
        Self { command, notifier }
    }

    /// Install `packages`.
    ///
    /// Returns `Ok(false)` after a warning notice if the command could not
    /// be started or exited non-zero; the caller carries on either way.
    /// A missing command template is an error, since the manifest is then
    /// unusable for this package.
    pub fn install<S: AsRef<str>>(&self, packages: &[S]) -> Result<bool> {
        if packages.is_empty() {
            return Ok(true);
        }
        let command = self.command.as_ref().ok_or(Error::MissingInstallCommand)?;

        for package in packages {
            self.notifier
                .say(&format!("* Installing '{}'", package.as_ref()));
        }

        let rendered = command.render(packages);
        tracing::info!(command = %rendered, "installing OS packages");

        let status = shell_command(&rendered)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status();

        match status {
            Ok(status) if status.success() => Ok(true),
            Ok(status) => {
                tracing::warn!(command = %rendered, code = ?status.code(), "install command failed");
                self.notifier
                    .warn(&format!("Unable to execute: {rendered}"));
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(command = %rendered, error = %e, "install command could not start");
                self.notifier
                    .warn(&format!("Unable to execute: {rendered}"));
                Ok(false)
            }
        }
    }
}
