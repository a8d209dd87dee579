//! Mode directive and runtime settings.
//!
//! The engine is driven by a single environment variable,
//! [`DIRECTIVE_ENV`]:
//!
//! | Value | Mode |
//! |---|---|
//! | unset or empty | [`Directive::NoOp`] |
//! | `+` | [`Directive::SelfPackage`] |
//! | `+<manifest>` | [`Directive::Compile`] |
//! | `<manifest>` | [`Directive::Dependencies`] |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use extpack_manifest::FetchOptions;

use crate::error::{Error, Result};

/// Environment variable holding the mode directive.
pub const DIRECTIVE_ENV: &str = "EXTPACK_DEPENDENCIES";

/// Environment variable overriding the HTTP timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "EXTPACK_HTTP_TIMEOUT";

/// Prefix marking compile mode.
pub const COMPILE_PREFIX: char = '+';

/// What the engine should do for a package with native extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Directive {
    /// Do nothing; the host builds extensions its usual way.
    #[default]
    NoOp,
    /// Build, then archive the built extensions.
    SelfPackage,
    /// Like `SelfPackage`, but consult the manifest for dev packages and
    /// build arguments first.
    Compile { manifest: String },
    /// Install OS packages and unpack prebuilt archives from the manifest.
    Dependencies { manifest: String },
}

impl Directive {
    /// Parse the raw directive value; `None` means the variable is unset.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return Directive::NoOp;
        };
        match raw.strip_prefix(COMPILE_PREFIX) {
            Some(rest) if rest.trim().is_empty() => Directive::SelfPackage,
            Some(rest) => Directive::Compile {
                manifest: rest.trim().to_string(),
            },
            None => Directive::Dependencies {
                manifest: raw.to_string(),
            },
        }
    }

    /// Manifest location named by the directive, if any.
    pub fn manifest(&self) -> Option<&str> {
        match self {
            Directive::Compile { manifest } | Directive::Dependencies { manifest } => {
                Some(manifest)
            }
            Directive::NoOp | Directive::SelfPackage => None,
        }
    }

    /// Whether this directive builds locally and archives the result.
    pub fn packages_build(&self) -> bool {
        matches!(self, Directive::SelfPackage | Directive::Compile { .. })
    }
}

impl FromStr for Directive {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Directive::parse(Some(s)))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::NoOp => write!(f, "no-op"),
            Directive::SelfPackage => write!(f, "self-package"),
            Directive::Compile { manifest } => write!(f, "compile ({manifest})"),
            Directive::Dependencies { manifest } => write!(f, "dependencies ({manifest})"),
        }
    }
}

/// Runtime settings for one install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Selected mode.
    pub directive: Directive,
    /// Working directory: relative locators resolve here and packaged
    /// archives are written here.
    pub work_dir: PathBuf,
    /// HTTP options for remote fetches.
    pub fetch: FetchOptions,
}

impl Settings {
    pub fn new(directive: Directive, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            directive,
            work_dir: work_dir.into(),
            fetch: FetchOptions::default(),
        }
    }

    /// Read settings from the process environment and current directory.
    pub fn from_env() -> Result<Self> {
        let work_dir = std::env::current_dir()?;
        Self::from_vars(|name| std::env::var(name).ok(), work_dir)
    }

    /// Read settings through `lookup`, which maps variable names to values.
    pub fn from_vars(
        lookup: impl Fn(&str) -> Option<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let mut settings = Self::new(
            Directive::parse(lookup(DIRECTIVE_ENV).as_deref()),
            work_dir,
        );

        if let Some(raw) = lookup(HTTP_TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| Error::InvalidSetting {
                name: HTTP_TIMEOUT_ENV.to_string(),
                value: raw.clone(),
                reason: "expected a whole number of seconds".to_string(),
            })?;
            settings.fetch.timeout = Duration::from_secs(secs);
        }

        tracing::debug!(directive = %settings.directive, work_dir = %settings.work_dir.display(), "loaded settings");
        Ok(settings)
    }
}
