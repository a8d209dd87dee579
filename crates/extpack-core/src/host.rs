//! Host capabilities the orchestrator calls into.
//!
//! The engine does not compile anything itself and does not own a UI. The
//! host supplies an [`ExtensionBuilder`] for the build step and a [`Notify`]
//! sink for user-facing progress notices.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::{Error, Result};
use crate::installer::shell_command;

/// Environment variable exposing the extension directory to the build command.
pub const EXTENSION_DIR_ENV: &str = "EXTPACK_EXTENSION_DIR";

/// The host's extension build step.
pub trait ExtensionBuilder {
    /// Build native extensions into `extension_dir`.
    ///
    /// `args` are extra build arguments resolved from the manifest; they are
    /// empty outside compile mode.
    fn build(&mut self, extension_dir: &Path, args: &[String]) -> Result<()>;
}

/// Sink for user-facing progress notices.
pub trait Notify: Send + Sync {
    /// Informational notice.
    fn say(&self, message: &str);

    /// Non-fatal problem the user should see.
    fn warn(&self, message: &str);
}

/// [`Notify`] implementation that forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notify for TracingNotifier {
    fn say(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// [`ExtensionBuilder`] that runs a shell command.
///
/// Build arguments are appended to the command line, the command runs in
/// `work_dir`, and [`EXTENSION_DIR_ENV`] points at the extension directory.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    command: String,
    work_dir: PathBuf,
}

impl CommandBuilder {
    pub fn new(command: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Full command line for `args`.
    pub fn command_line(&self, args: &[String]) -> String {
        if args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, args.join(" "))
        }
    }
}

impl ExtensionBuilder for CommandBuilder {
    fn build(&mut self, extension_dir: &Path, args: &[String]) -> Result<()> {
        let line = self.command_line(args);
        tracing::info!(command = %line, dir = %self.work_dir.display(), "running build command");

        let status = shell_command(&line)
            .current_dir(&self.work_dir)
            .env(EXTENSION_DIR_ENV, extension_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::build(format!("could not run `{line}`: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            let code = status.code().unwrap_or(-1);
            Err(Error::build(format!("`{line}` exited with status {code}")))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Collects notices for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingNotifier {
        says: Mutex<Vec<String>>,
        warns: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.says.lock().unwrap().clone()
        }

        pub(crate) fn warnings(&self) -> Vec<String> {
            self.warns.lock().unwrap().clone()
        }
    }

    impl Notify for RecordingNotifier {
        fn say(&self, message: &str) {
            self.says.lock().unwrap().push(message.to_string());
        }

        fn warn(&self, message: &str) {
            self.warns.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_command_line_appends_args() {
        let builder = CommandBuilder::new("make", "/work");
        assert_eq!(builder.command_line(&[]), "make");
        assert_eq!(
            builder.command_line(&["-j4".to_string(), "V=1".to_string()]),
            "make -j4 V=1"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_command_builder_sees_extension_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let ext = temp.path().join("ext");
        std::fs::create_dir(&ext).unwrap();

        let mut builder = CommandBuilder::new(
            "echo built > \"$EXTPACK_EXTENSION_DIR/out.txt\"",
            temp.path(),
        );
        builder.build(&ext, &[]).unwrap();

        let content = std::fs::read_to_string(ext.join("out.txt")).unwrap();
        assert_eq!(content.trim(), "built");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_builder_failure() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut builder = CommandBuilder::new("exit 2", temp.path());

        let err = builder.build(temp.path(), &[]).unwrap_err();
        assert!(matches!(err, Error::Build { ref message } if message.contains("status 2")));
    }
}
