//! The package whose extensions are being built.

use serde::Serialize;

/// Name and version of the package being installed, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
}

impl PackageDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `"<name>-<version>"`.
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// File name of this package's extension archive, `"<name>-<version>.tar.gz"`.
    pub fn archive_name(&self) -> String {
        format!("{}.tar.gz", self.full_name())
    }
}

impl std::fmt::Display for PackageDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.version)
    }
}
