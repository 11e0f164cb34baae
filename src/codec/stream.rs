//! Pipeline assembly: delta payload, compression, header.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::compress::compress_to;
use super::delta::encode;
use super::error::EncodeError;
use super::header::StreamHeader;
use crate::frame::PixelFrame;

/// A complete diveo stream: uncompressed header followed by the gzip payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    header: StreamHeader,
    bytes: Vec<u8>,
    frame_count: usize,
    raw_payload_len: usize,
}

impl EncodedStream {
    pub fn header(&self) -> &StreamHeader {
        &self.header
    }

    /// Whole stream, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Compressed payload following the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[StreamHeader::SIZE..]
    }

    /// Total stream size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of frames that went into the stream.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Size of the delta payload before compression.
    pub fn raw_payload_len(&self) -> usize {
        self.raw_payload_len
    }

    /// Write the stream verbatim.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.bytes)
    }

    /// Write the stream to a file, replacing it if it exists.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

/// Encode `frames` at `fps` into a diveo stream.
///
/// The delta payload is built first, so empty input fails before any header
/// work happens.
pub fn to_stream(fps: u32, frames: &[PixelFrame]) -> Result<EncodedStream, EncodeError> {
    let payload = encode(frames)?;
    let (width, height) = frames[0].dimensions();
    let header = StreamHeader::new(fps, frames.len(), width, height);

    let mut bytes = Vec::with_capacity(StreamHeader::SIZE + payload.len() / 2);
    bytes.extend_from_slice(&header.to_bytes());
    let bytes = compress_to(&payload, bytes)?;

    Ok(EncodedStream {
        header,
        bytes,
        frame_count: frames.len(),
        raw_payload_len: payload.len(),
    })
}
