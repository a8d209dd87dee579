//! Command implementations for extpack-cli

pub mod install;
pub mod pack;
pub mod resolve;

pub use install::{InstallArgs, run_install};
pub use pack::{run_pack, run_unpack};
pub use resolve::run_resolve;

use colored::Colorize;
use extpack_core::Notify;

/// Prints engine notices to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn say(&self, message: &str) {
        println!("{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("{}: {}", "warning".yellow().bold(), message);
    }
}
