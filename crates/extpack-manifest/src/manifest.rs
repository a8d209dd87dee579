//! Dependency manifest parsing.
//!
//! The manifest is a YAML document with a top-level `gems` mapping from
//! package name to dependency spec, plus a reserved `"*"` entry holding the
//! OS package install command.
//!
//! # Example YAML
//!
//! ```yaml
//! gems:
//!   "*":
//!     command: "apt-get install -y ${packages}"
//!   pg: libpq-dev
//!   sqlite3: [libsqlite3-dev, "*"]
//!   nokogiri:                       # first matching requirement wins
//!     "< 1.11": libxml2-dev libxslt-dev
//!     ">= 1.11": "*"
//!   bcrypt:                         # nil or "*": the default archive
//! ```

use std::collections::HashMap;

use serde_yaml::Value;

use crate::error::{Error, Result};
use crate::version::VersionRequirement;

/// Name of the reserved entry carrying the install command.
pub const INSTALL_ENTRY: &str = "*";

/// What a manifest says about one package.
#[derive(Debug, Clone)]
pub enum DependencySpec {
    /// The default extension archive, same as `Tokens(["*"])`.
    Wildcard,
    /// Ordered raw tokens.
    Tokens(Vec<String>),
    /// Requirement/spec pairs in document order; the first match wins.
    Versioned(Vec<(VersionRequirement, DependencySpec)>),
}

/// A parsed dependency manifest. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: HashMap<String, DependencySpec>,
    install_command: Option<String>,
}

impl Manifest {
    /// Parse a manifest from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let doc: Value =
            serde_yaml::from_str(content).map_err(|e| Error::ManifestParse(e.to_string()))?;
        let gems = doc
            .get("gems")
            .and_then(Value::as_mapping)
            .ok_or_else(|| Error::ManifestParse("missing top-level `gems` mapping".to_string()))?;

        let mut manifest = Self::default();
        for (key, value) in gems {
            let name = key_to_string(key).ok_or_else(|| Error::InvalidEntry {
                name: format!("{key:?}"),
                reason: "package names must be strings".to_string(),
            })?;

            if name == INSTALL_ENTRY {
                manifest.install_command = Some(parse_install_entry(value)?);
                continue;
            }

            let spec = parse_spec(&name, value, true)?;
            manifest.entries.insert(name, spec);
        }

        tracing::debug!(
            entries = manifest.entries.len(),
            has_command = manifest.install_command.is_some(),
            "parsed dependency manifest"
        );
        Ok(manifest)
    }

    /// Parse a manifest from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let content = std::str::from_utf8(bytes)
            .map_err(|e| Error::ManifestParse(format!("manifest is not UTF-8: {e}")))?;
        Self::from_yaml(content)
    }

    /// Look up a package's entry.
    pub fn get(&self, name: &str) -> Option<&DependencySpec> {
        self.entries.get(name)
    }

    /// Whether the manifest has an entry for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The OS package install command template, if declared.
    pub fn install_command(&self) -> Option<&str> {
        self.install_command.as_deref()
    }

    /// Number of package entries (the install entry is not counted).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no package entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_install_entry(value: &Value) -> Result<String> {
    value
        .get("command")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidEntry {
            name: INSTALL_ENTRY.to_string(),
            reason: "expected a mapping with a `command` string".to_string(),
        })
}

fn parse_spec(name: &str, value: &Value, allow_table: bool) -> Result<DependencySpec> {
    match value {
        Value::Null => Ok(DependencySpec::Wildcard),
        Value::String(s) if s.trim() == "*" => Ok(DependencySpec::Wildcard),
        Value::String(s) => Ok(DependencySpec::Tokens(
            s.split_whitespace().map(str::to_string).collect(),
        )),
        Value::Sequence(items) => {
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Null => {}
                    Value::String(s) => tokens.push(s.clone()),
                    other => {
                        return Err(Error::InvalidEntry {
                            name: name.to_string(),
                            reason: format!("list items must be strings, found {other:?}"),
                        });
                    }
                }
            }
            Ok(DependencySpec::Tokens(tokens))
        }
        Value::Mapping(table) if allow_table => {
            let mut pairs = Vec::with_capacity(table.len());
            for (req, spec) in table {
                let req = key_to_string(req).ok_or_else(|| Error::InvalidEntry {
                    name: name.to_string(),
                    reason: "version requirements must be strings".to_string(),
                })?;
                let requirement = VersionRequirement::parse(&req)?;
                pairs.push((requirement, parse_spec(name, spec, false)?));
            }
            Ok(DependencySpec::Versioned(pairs))
        }
        Value::Mapping(_) => Err(Error::InvalidEntry {
            name: name.to_string(),
            reason: "version tables cannot be nested".to_string(),
        }),
        other => Err(Error::InvalidEntry {
            name: name.to_string(),
            reason: format!("unsupported value {other:?}"),
        }),
    }
}
