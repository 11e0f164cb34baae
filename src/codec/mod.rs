//! Encoder for the diveo screen-recording format.
//!
//! The first frame is stored in full; every later frame only carries the
//! pixels that changed since the frame before it. The frame data is gzipped
//! as one block behind a small uncompressed header.
//!
//! # File Format
//!
//! ```text
//! Header (9 bytes, never compressed):
//!   Version: u8 (always 1)
//!   Frame rate: u8 (wraps above 255)
//!   Duration: u32 LE, milliseconds, whole seconds only
//!   Width/height: 3 bytes, two packed 12-bit values
//!     byte0 = width >> 4
//!     byte1 = (width << 4) & 0xFF | (height >> 8) & 0x0F
//!     byte2 = height & 0xFF
//!
//! Payload (gzip, best compression), decompressed:
//!   Keyframe: width * height * 3 bytes (R, G, B per pixel, row-major)
//!   For each later frame, delta records (6 bytes each):
//!     Pixel index: 3 bytes big-endian
//!     Color: R, G, B
//! ```
//!
//! Delta sections carry no length or terminator. Each one opens with a
//! record for pixel 0 and closes with a record for the last pixel, even when
//! those pixels did not change; see [`delta`] for how a reader splits them.
//! No decoder ships with this crate, so that convention has only been
//! checked against the encoder itself.

pub mod compress;
pub mod delta;
mod error;
pub mod header;
mod stream;

pub use compress::compress;
pub use delta::{DeltaRecord, RECORD_SIZE, encode};
pub use error::EncodeError;
pub use header::{FORMAT_VERSION, MAX_DIMENSION, StreamHeader, build_header};
pub use stream::{EncodedStream, to_stream};
