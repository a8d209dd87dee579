//! [`TestWorkspace`] builder for install-run scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory laid out like a host install run:
///
/// ```text
/// {root}/
/// ├── manifests/   # where manifests and prebuilt archives are published
/// ├── ext/         # the package's extension directory
/// └── work/        # the installer's working directory
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use extpack_test_utils::workspace::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let manifest = ws.write_manifest("gems:\n  foo: libfoo-dev\n");
/// ws.assert_file_exists("manifests/deps.yml");
/// # let _ = manifest;
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create the workspace with empty `manifests/`, `ext/` and `work/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        for sub in ["manifests", "ext", "work"] {
            fs::create_dir_all(temp_dir.path().join(sub)).unwrap();
        }
        Self { temp_dir }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory manifests and archives are published in.
    pub fn manifest_dir(&self) -> PathBuf {
        self.root().join("manifests")
    }

    /// The package's extension directory.
    pub fn ext_dir(&self) -> PathBuf {
        self.root().join("ext")
    }

    /// The installer's working directory.
    pub fn work_dir(&self) -> PathBuf {
        self.root().join("work")
    }

    /// Write `manifests/deps.yml` and return its absolute path.
    pub fn write_manifest(&self, yaml: &str) -> PathBuf {
        let path = self.manifest_dir().join("deps.yml");
        fs::write(&path, yaml).unwrap();
        path
    }

    /// Write raw bytes to `relative` (creating parents) and return the path.
    pub fn write_bytes(&self, relative: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, bytes).unwrap();
        path
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}
