//! Resolution of a package's manifest entry to an ordered token list.

use std::collections::HashSet;

use crate::manifest::{DependencySpec, Manifest};
use crate::package::PackageDescriptor;

/// Resolve the raw tokens that apply to `package`.
///
/// Returns `None` when the manifest has no entry for the package, or when
/// its version table has no requirement the package's version satisfies.
/// Neither case is an error: the package simply has no dependencies. An
/// absent entry never falls back to the default archive.
///
/// The returned tokens are de-duplicated with empty tokens dropped, keeping
/// first-seen order.
pub fn resolve(manifest: &Manifest, package: &PackageDescriptor) -> Option<Vec<String>> {
    let Some(spec) = manifest.get(&package.name) else {
        tracing::debug!(package = %package.name, "no manifest entry");
        return None;
    };

    let spec = match spec {
        DependencySpec::Versioned(pairs) => {
            let matched = pairs
                .iter()
                .find(|(requirement, _)| requirement.satisfies(&package.version));
            match matched {
                Some((requirement, spec)) => {
                    tracing::debug!(
                        package = %package.name,
                        version = %package.version,
                        requirement = %requirement,
                        "matched version requirement"
                    );
                    spec
                }
                None => {
                    tracing::debug!(
                        package = %package.name,
                        version = %package.version,
                        "no version requirement matched"
                    );
                    return None;
                }
            }
        }
        other => other,
    };

    let tokens: &[String] = match spec {
        DependencySpec::Wildcard => return Some(vec!["*".to_string()]),
        DependencySpec::Tokens(tokens) => tokens,
        // Nested tables are rejected when the manifest is parsed
        DependencySpec::Versioned(_) => return None,
    };

    Some(dedup_tokens(tokens))
}

/// Drop empty and repeated tokens, keeping the first occurrence of each.
pub fn dedup_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty() && seen.insert(*t))
        .map(str::to_string)
        .collect()
}
