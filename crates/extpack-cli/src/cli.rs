//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use extpack_core::DIRECTIVE_ENV;

/// extpack - Install, build and package prebuilt native extensions
#[derive(Parser, Debug)]
#[command(name = "extpack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Build or fetch a package's native extensions
    ///
    /// The mode comes from --directive or EXTPACK_DEPENDENCIES:
    ///   (unset)        run the build command as usual
    ///   +              build, then archive the extension directory
    ///   +<manifest>    install dev packages, build with extra args, archive
    ///   <manifest>     install OS packages and unpack prebuilt archives
    Install {
        /// Package name
        #[arg(long)]
        name: String,

        /// Package version
        #[arg(long)]
        version: String,

        /// Directory the extensions are built into or unpacked to
        #[arg(long)]
        ext_dir: PathBuf,

        /// Shell command that builds the extensions
        #[arg(long)]
        build_cmd: Option<String>,

        /// Mode directive
        #[arg(long, env = DIRECTIVE_ENV)]
        directive: Option<String>,

        /// Working directory (defaults to the current directory)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// The package declares native extensions (default)
        #[arg(long, overrides_with = "no_extensions")]
        has_extensions: bool,

        /// The package has no native extensions; do nothing
        #[arg(long, overrides_with = "has_extensions")]
        no_extensions: bool,
    },

    /// Show what the manifest resolves to for a package
    Resolve {
        /// Package name
        #[arg(long)]
        name: String,

        /// Package version
        #[arg(long)]
        version: String,

        /// Manifest location (path or URL)
        #[arg(long)]
        manifest: String,

        /// Resolve for compile mode instead of dependency mode
        #[arg(long)]
        compile: bool,

        /// Working directory relative locators resolve against
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Archive a directory as a gzipped tarball
    Pack {
        /// Directory to archive
        #[arg(long)]
        dir: PathBuf,

        /// Output file (defaults to `<dir name>.tar.gz`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Unpack an archive from a path or URL into a directory
    Unpack {
        /// Archive location (path or URL)
        #[arg(long)]
        archive: String,

        /// Destination directory
        #[arg(long)]
        dir: PathBuf,
    },
}
