//! Expansion of extension locators into concrete archive locations.
//!
//! Locators are templated against three values: the directory holding the
//! manifest (`base`), the current working directory (`cwd`), and the
//! package's archive name. Every expanded locator is either an absolute
//! path or a URL, and contains no `*`.

use std::path::Path;

use crate::token::is_url;

/// Host prefix whose file links serve an HTML page unless `raw=true` is set.
pub const RAW_CONTENT_HOST: &str = "https://github.com/";

/// Query parameter asking [`RAW_CONTENT_HOST`] for file bytes.
const RAW_CONTENT_PARAM: &str = "raw=true";

/// Context for expanding locators for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorTemplate {
    base: String,
    cwd: String,
    archive_name: String,
}

impl LocatorTemplate {
    /// Build a template from the manifest location, the working directory
    /// and the archive name.
    pub fn new(manifest_location: &str, cwd: &Path, archive_name: impl Into<String>) -> Self {
        let cwd = path_string(cwd);
        Self {
            base: manifest_base(manifest_location, &cwd),
            cwd,
            archive_name: archive_name.into(),
        }
    }

    /// Expand one locator.
    ///
    /// - `*` ⇒ `base/archive_name`
    /// - `*rest` ⇒ `base` + `rest`
    /// - relative path ⇒ `cwd/` + path
    /// - remaining `*` ⇒ `archive_name`
    pub fn expand(&self, locator: &str) -> String {
        let expanded = if locator == "*" {
            join(&self.base, &self.archive_name)
        } else if let Some(rest) = locator.strip_prefix('*') {
            format!("{}{}", self.base, rest)
        } else if !locator.starts_with('/') && !is_url(locator) && !Path::new(locator).is_absolute() {
            join(&self.cwd, locator)
        } else {
            locator.to_string()
        };
        with_raw_content(&expanded.replace('*', &self.archive_name))
    }
}

/// Directory part of a manifest location, made absolute against `cwd`.
///
/// Anything from the first `?`, `;` or `#` is ignored so query strings on a
/// remote manifest do not leak into archive locations.
pub fn manifest_base(location: &str, cwd: &str) -> String {
    let location = location
        .split(['?', ';', '#'])
        .next()
        .unwrap_or(location);
    let dir = match location.rfind('/') {
        Some(0) => "/",
        Some(idx) => &location[..idx],
        None => ".",
    };

    if is_url(dir) || dir.starts_with('/') || Path::new(dir).is_absolute() {
        dir.to_string()
    } else if dir == "." {
        cwd.to_string()
    } else {
        join(cwd, dir.trim_start_matches("./"))
    }
}

/// Append `raw=true` to raw-content host URLs, exactly once.
///
/// The parameter goes into the query, ahead of any `#fragment`.
pub fn with_raw_content(location: &str) -> String {
    if !location.starts_with(RAW_CONTENT_HOST) {
        return location.to_string();
    }
    let (url, fragment) = match location.split_once('#') {
        Some((url, fragment)) => (url, Some(fragment)),
        None => (location, None),
    };
    let url = match url.split_once('?') {
        Some((_, query)) if query.split('&').any(|p| p == RAW_CONTENT_PARAM) => url.to_string(),
        Some((_, "")) => format!("{url}{RAW_CONTENT_PARAM}"),
        Some(_) => format!("{url}&{RAW_CONTENT_PARAM}"),
        None => format!("{url}?{RAW_CONTENT_PARAM}"),
    };
    match fragment {
        Some(fragment) => format!("{url}#{fragment}"),
        None => url,
    }
}

fn join(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
