//! Recording orchestration: capture a region, then encode it.

use std::io;

use crate::capture::{CaptureError, FrameSource, Region, capture_sequence};
use crate::codec::{EncodeError, EncodedStream, to_stream};
use crate::schema::{ConfigError, RecordingConfig};

/// Anything that can go wrong between configuration and the written file.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Failed to write recording")]
    Io(#[from] io::Error),
}

/// Capture `config.frame_count()` frames of `region` from `source` and encode
/// them.
pub fn record<S: FrameSource + ?Sized>(
    source: &mut S,
    region: Region,
    config: &RecordingConfig,
) -> Result<EncodedStream, RecordError> {
    config.validate()?;

    log::info!(
        "Recording {}x{} at X:{} and Y:{} ...",
        region.width,
        region.height,
        region.x,
        region.y
    );
    let frames = capture_sequence(
        source,
        region,
        config.frame_count(),
        config.frame_interval(),
    )?;

    log::info!("Composing video data ...");
    let stream = to_stream(config.fps, frames.as_slice())?;
    Ok(stream)
}

/// Record and write the stream to `config.output`.
pub fn record_to_file<S: FrameSource + ?Sized>(
    source: &mut S,
    region: Region,
    config: &RecordingConfig,
) -> Result<RecordingStats, RecordError> {
    let stream = record(source, region, config)?;
    stream.save(&config.output)?;
    log::info!("Wrote {}", config.output.display());
    Ok(RecordingStats::from_stream(&stream))
}

/// Statistics from a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordingStats {
    /// Frames encoded.
    pub frame_count: usize,
    /// Delta payload size before compression.
    pub raw_bytes: usize,
    /// Final stream size, header included.
    pub stream_bytes: usize,
}

impl RecordingStats {
    pub fn from_stream(stream: &EncodedStream) -> Self {
        Self {
            frame_count: stream.frame_count(),
            raw_bytes: stream.raw_payload_len(),
            stream_bytes: stream.len(),
        }
    }

    /// Stream size in kilobytes (1000 bytes).
    pub fn kilobytes(&self) -> f64 {
        self.stream_bytes as f64 / 1000.0
    }
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes raw, {} bytes written ({:.1} KB)",
            self.frame_count,
            self.raw_bytes,
            self.stream_bytes,
            self.kilobytes()
        )
    }
}
