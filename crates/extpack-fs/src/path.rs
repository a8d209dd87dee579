//! Path handling for archive entries
//!
//! Archive entries always use forward slashes and are relative to the
//! archive root. Extraction only ever writes below the destination root.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Join an archive entry path onto `root`, refusing anything that could
/// land outside it.
///
/// `.` components are dropped. Absolute paths, drive prefixes and `..`
/// components are rejected with [`Error::PathTraversal`].
pub fn contained_join(root: &Path, entry: &Path) -> Result<PathBuf> {
    let mut joined = root.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::PathTraversal {
                    entry: entry.to_path_buf(),
                });
            }
        }
    }
    Ok(joined)
}

/// Compute the archive entry name of `path` relative to `root`.
///
/// Returns `None` for `root` itself or for paths outside `root`.
pub fn relative_entry_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
