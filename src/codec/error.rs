use std::io;

/// Errors raised by the encode pipeline.
///
/// Any of these aborts the whole call; no partial stream is produced.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Can't create empty video")]
    EmptyInput,
    #[error(
        "Frame {index} is {}x{}, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Compression failed")]
    Compression(#[source] io::Error),
}
