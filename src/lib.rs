//! diveo - Delta-encoded screen recordings.
//!
//! This crate encodes a sequence of RGBA frames into the diveo container: a
//! 9-byte header followed by a gzip-compressed payload holding the first
//! frame in full and every later frame as a list of changed pixels.
//!
//! # Architecture
//!
//! - `codec`: the encoder (header, delta records, compression, assembly)
//! - `frame`: pixel buffers and their opaque-RGB view
//! - `capture`: region selection and cadence-driven frame sources
//! - `schema`: recording configuration
//! - `recorder`: capture followed by encode, plus file output
//!
//! # Example
//!
//! ```rust
//! use diveo::{PixelFrame, to_stream};
//!
//! let red = PixelFrame::filled(2, 2, [255, 0, 0, 255]).unwrap();
//! let stream = to_stream(1, &[red.clone(), red]).unwrap();
//!
//! assert_eq!(&stream.as_bytes()[..2], &[1u8, 1]);
//! assert_eq!(stream.raw_payload_len(), 24);
//! ```

pub mod capture;
pub mod codec;
pub mod frame;
pub mod recorder;
pub mod schema;

// Re-export commonly used types
pub use codec::{EncodeError, EncodedStream, StreamHeader, to_stream};
pub use frame::{FrameSequence, PixelFrame, Rgb};
pub use recorder::{RecordError, RecordingStats};
pub use schema::RecordingConfig;
