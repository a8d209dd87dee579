//! Pack and unpack command implementations

use std::path::{Path, PathBuf};

use colored::Colorize;
use extpack_manifest::{Fetch, FetchOptions, Fetcher};

use crate::error::{CliError, Result};

/// Run the pack command
pub fn run_pack(cwd: &Path, dir: &Path, output: Option<&Path>) -> Result<()> {
    let dir = cwd.join(dir);
    if !dir.is_dir() {
        return Err(CliError::user(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let output = match output {
        Some(path) => cwd.join(path),
        None => cwd.join(default_archive_name(&dir)?),
    };

    let written = extpack_fs::write_tarball(&dir, &output)?;
    println!(
        "{} Packed {} into {} ({} bytes)",
        "+".green(),
        dir.display(),
        output.display().to_string().cyan(),
        written
    );
    Ok(())
}

/// Run the unpack command
pub fn run_unpack(archive: &str, dir: &Path) -> Result<()> {
    let bytes = Fetcher::new(FetchOptions::default()).fetch(archive)?;
    let summary = extpack_fs::extract_tarball(&bytes, dir)?;
    println!(
        "{} Unpacked {} files and {} directories into {}",
        "+".green(),
        summary.files.len(),
        summary.directories.len(),
        dir.display().to_string().cyan()
    );
    Ok(())
}

fn default_archive_name(dir: &Path) -> Result<PathBuf> {
    // `dir` may end in `.` or `..`, so canonicalize before taking its name
    let canonical = dir.canonicalize()?;
    let name = canonical
        .file_name()
        .ok_or_else(|| CliError::user("cannot derive an archive name; use --output"))?;
    let mut name = name.to_os_string();
    name.push(".tar.gz");
    Ok(PathBuf::from(name))
}
