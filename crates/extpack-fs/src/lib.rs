//! Archive codec and filesystem helpers for extpack
//!
//! Provides the tar-equivalent pack/unpack transforms, gzip compression,
//! and safe, atomic file writes used when publishing extension artifacts.

pub mod archive;
pub mod error;
pub mod gzip;
pub mod io;
pub mod path;

pub use archive::{UnpackSummary, pack, unpack};
pub use error::{Error, Result};
pub use gzip::{compress, decompress, is_gzip};
pub use path::{contained_join, relative_entry_name};

/// Pack `dir` and gzip the result, writing it atomically to `dest`.
///
/// Returns the number of compressed bytes written.
pub fn write_tarball(dir: &std::path::Path, dest: &std::path::Path) -> Result<usize> {
    let bytes = compress(&pack(dir)?)?;
    io::write_atomic(dest, &bytes)?;
    Ok(bytes.len())
}

/// Decompress `bytes` (if gzipped) and unpack the tar stream into `dest`.
pub fn extract_tarball(bytes: &[u8], dest: &std::path::Path) -> Result<UnpackSummary> {
    let tar = decompress(bytes)?;
    unpack(&tar, dest)
}
