//! Gzip compression for extension archives.
//!
//! Decompression is lenient: input that does not start with the gzip magic
//! bytes is handed back unchanged, so plain (uncompressed) tar archives can
//! be published under a `.tar.gz` name and still extract.

use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

use crate::{Error, Result};

/// The two-byte gzip signature.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether `bytes` starts with the gzip signature.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Gzip `bytes` at the default compression level.
pub fn compress(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(Error::Compress)?;
    encoder.finish().map_err(Error::Compress)
}

/// Gunzip `bytes`, or return them unchanged when they are not gzip data.
pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    if !is_gzip(bytes) {
        tracing::debug!(len = bytes.len(), "input lacks gzip signature, passing through");
        return Ok(bytes.to_vec());
    }
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(Error::Decompress)?;
    Ok(out)
}
