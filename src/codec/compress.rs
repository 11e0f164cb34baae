//! Whole-payload compression.

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::error::EncodeError;

/// Gzip `data` at the best-ratio level into a fresh buffer.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, EncodeError> {
    compress_to(data, Vec::with_capacity(data.len() / 2))
}

/// Gzip `data` at the best-ratio level into `writer`, returning the writer
/// once the gzip trailer has been written.
pub fn compress_to<W: Write>(data: &[u8], writer: W) -> Result<W, EncodeError> {
    let mut encoder = GzEncoder::new(writer, Compression::best());
    encoder.write_all(data).map_err(EncodeError::Compression)?;
    encoder.flush().map_err(EncodeError::Compression)?;
    encoder.finish().map_err(EncodeError::Compression)
}
