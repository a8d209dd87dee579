//! Tar pack/unpack of extension output directories.
//!
//! [`pack`] records every directory (path, mode) and regular file (path,
//! mode, size, content) below a root, relative to that root. [`unpack`]
//! recreates such a tree under a destination, restoring permission bits.
//! Symlinks and special files are not part of extension artifacts and are
//! skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tar::{Archive, Builder, EntryType, Header};
use walkdir::WalkDir;

use crate::io::{mode_of, set_mode};
use crate::path::{contained_join, relative_entry_name};
use crate::{Error, Result};

/// What [`unpack`] wrote to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnpackSummary {
    /// Regular files written, in archive order.
    pub files: Vec<PathBuf>,
    /// Directories created or updated, in archive order.
    pub directories: Vec<PathBuf>,
}

impl UnpackSummary {
    /// Total number of entries extracted.
    pub fn len(&self) -> usize {
        self.files.len() + self.directories.len()
    }

    /// Whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }
}

/// Pack the tree below `root` into an uncompressed tar stream.
///
/// Entries are emitted in a stable order (sorted by file name at every
/// level) with paths relative to `root`. The root itself is not an entry.
pub fn pack(root: &Path) -> Result<Vec<u8>> {
    let mut builder = Builder::new(Vec::new());
    let mut count = 0usize;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Walk {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = entry.path();
        let Some(name) = relative_entry_name(root, path) else {
            continue;
        };
        if entry.path_is_symlink() {
            tracing::debug!(entry = %name, "skipping symlink");
            continue;
        }
        let metadata = entry.metadata().map_err(|e| Error::Walk {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut header = Header::new_gnu();
        header.set_mode(mode_of(&metadata));
        header.set_mtime(mtime_of(&metadata));

        if metadata.is_dir() {
            header.set_entry_type(EntryType::Directory);
            header.set_size(0);
            builder
                .append_data(&mut header, &name, std::io::empty())
                .map_err(|e| Error::io(path, e))?;
        } else if metadata.is_file() {
            let content = fs::read(path).map_err(|e| Error::io(path, e))?;
            header.set_entry_type(EntryType::Regular);
            header.set_size(content.len() as u64);
            builder
                .append_data(&mut header, &name, content.as_slice())
                .map_err(|e| Error::io(path, e))?;
        } else {
            tracing::debug!(entry = %name, "skipping special file");
            continue;
        }
        count += 1;
    }

    let bytes = builder.into_inner().map_err(Error::Archive)?;
    tracing::debug!(root = %root.display(), entries = count, bytes = bytes.len(), "packed tree");
    Ok(bytes)
}

/// Unpack a tar stream into `dest`, creating it if necessary.
///
/// Parent directories are created as needed. File modes are applied as each
/// file is written; directory modes are applied once every entry is in
/// place, so a read-only directory can still receive its contents. Any entry
/// whose path would leave `dest` aborts extraction with
/// [`Error::PathTraversal`].
pub fn unpack(bytes: &[u8], dest: &Path) -> Result<UnpackSummary> {
    fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;

    let mut archive = Archive::new(bytes);
    let mut summary = UnpackSummary::default();
    let mut dir_modes: Vec<(PathBuf, u32)> = Vec::new();

    for entry in archive.entries().map_err(Error::Archive)? {
        let mut entry = entry.map_err(Error::Archive)?;
        let entry_path = entry.path().map_err(Error::Archive)?.into_owned();
        let target = contained_join(dest, &entry_path)?;
        let mode = entry.header().mode().map_err(Error::Archive)?;

        match entry.header().entry_type() {
            EntryType::Directory => {
                fs::create_dir_all(&target).map_err(|e| Error::io(&target, e))?;
                dir_modes.push((target.clone(), mode));
                summary.directories.push(target);
            }
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
                }
                let mut file = fs::File::create(&target).map_err(|e| Error::io(&target, e))?;
                std::io::copy(&mut entry, &mut file).map_err(|e| Error::io(&target, e))?;
                drop(file);
                set_mode(&target, mode)?;
                summary.files.push(target);
            }
            other => {
                tracing::debug!(entry = %entry_path.display(), kind = ?other, "skipping entry");
            }
        }
    }

    // Deepest directories first so a parent's mode cannot block its children
    for (dir, mode) in dir_modes.iter().rev() {
        set_mode(dir, *mode)?;
    }

    tracing::debug!(dest = %dest.display(), entries = summary.len(), "unpacked archive");
    Ok(summary)
}

fn mtime_of(metadata: &fs::Metadata) -> u64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
