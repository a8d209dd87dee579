//! Directory tree fixtures and snapshots.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One entry of a [`snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A directory and its permission bits.
    Dir { mode: u32 },
    /// A regular file, its permission bits and content.
    File { mode: u32, content: Vec<u8> },
}

/// Create a directory (and parents) below `root` with the given mode.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn dir(root: &Path, relative: &str, mode: u32) {
    let path = root.join(relative);
    fs::create_dir_all(&path)
        .unwrap_or_else(|e| panic!("tree::dir: failed to create {}: {e}", path.display()));
    set_mode(&path, mode);
}

/// Write a file (creating parents) below `root` with the given mode.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn file(root: &Path, relative: &str, content: &[u8], mode: u32) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("tree::file: failed to write {}: {e}", path.display()));
    set_mode(&path, mode);
}

/// Build the tree used by most archive tests: nested directories, an
/// executable, a private file and a binary blob.
pub fn sample_extension_tree(root: &Path) {
    dir(root, "lib", 0o755);
    dir(root, "lib/native", 0o750);
    file(root, "lib/native/ext.so", &[0x7f, b'E', b'L', b'F', 0, 1, 2, 3], 0o755);
    file(root, "lib/native/ext.conf", b"threads = 4\n", 0o600);
    file(root, "gem.build_complete", b"", 0o644);
    dir(root, "share/empty", 0o700);
}

/// Snapshot every entry below `root`, keyed by forward-slash relative path.
pub fn snapshot(root: &Path) -> BTreeMap<String, Entry> {
    let mut entries = BTreeMap::new();
    walk(root, root, &mut entries);
    entries
}

fn walk(root: &Path, current: &Path, entries: &mut BTreeMap<String, Entry>) {
    let mut children: Vec<_> = fs::read_dir(current)
        .unwrap_or_else(|e| panic!("tree::snapshot: cannot read {}: {e}", current.display()))
        .map(|e| e.unwrap().path())
        .collect();
    children.sort();

    for path in children {
        let relative = path
            .strip_prefix(root)
            .unwrap()
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let metadata = fs::symlink_metadata(&path).unwrap();
        if metadata.is_dir() {
            entries.insert(relative, Entry::Dir { mode: mode(&metadata) });
            walk(root, &path, entries);
        } else if metadata.is_file() {
            entries.insert(
                relative,
                Entry::File {
                    mode: mode(&metadata),
                    content: fs::read(&path).unwrap(),
                },
            );
        }
    }
}

#[cfg(unix)]
fn mode(metadata: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode(_metadata: &fs::Metadata) -> u32 {
    0
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}
