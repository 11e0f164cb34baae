//! Fixed 9-byte stream preamble.
//!
//! Every numeric field is narrower than the values callers hand in. The
//! narrowing is lossy and silent: fps wraps at 256, dimensions keep their low
//! 12 bits, and the duration keeps its low 32 bits. Each step has its own
//! function so the loss is visible where it happens.

use std::io::{self, Read, Write};

/// Format version written at offset 0.
pub const FORMAT_VERSION: u8 = 1;

/// Largest width or height the packed dimension field can hold.
pub const MAX_DIMENSION: u16 = 0x0FFF;

/// Narrow a frame rate to its header byte. Values above 255 wrap.
#[inline]
pub fn truncate_fps(fps: u32) -> u8 {
    (fps & 0xFF) as u8
}

/// Narrow a width or height to 12 bits. Values of 4096 and above wrap.
#[inline]
pub fn truncate_dimension(value: usize) -> u16 {
    (value & MAX_DIMENSION as usize) as u16
}

/// Stream duration in milliseconds.
///
/// Whole seconds are computed first (`total_frames / fps`) and only then
/// scaled, so a 90-frame stream at 60 fps reports 1000 ms. A zero frame rate
/// reports 0. The result keeps the low 32 bits of the product.
#[inline]
pub fn duration_ms(fps: u32, total_frames: usize) -> u32 {
    let seconds = (total_frames as u64).checked_div(fps as u64).unwrap_or(0);
    (seconds.wrapping_mul(1000) & 0xFFFF_FFFF) as u32
}

/// Pack two 12-bit values into three bytes, width first.
#[inline]
pub fn pack_dimensions(width: u16, height: u16) -> [u8; 3] {
    let (w, h) = (width & MAX_DIMENSION, height & MAX_DIMENSION);
    [
        (w >> 4) as u8,
        (((w << 4) & 0xFF) as u8) | ((h >> 8) & 0x0F) as u8,
        (h & 0xFF) as u8,
    ]
}

/// Inverse of [`pack_dimensions`].
#[inline]
pub fn unpack_dimensions(bytes: [u8; 3]) -> (u16, u16) {
    let width = ((bytes[0] as u16) << 4) | (bytes[1] as u16 >> 4);
    let height = (((bytes[1] & 0x0F) as u16) << 8) | bytes[2] as u16;
    (width, height)
}

/// Build the header bytes for a stream.
pub fn build_header(fps: u32, total_frames: usize, width: usize, height: usize) -> [u8; 9] {
    StreamHeader::new(fps, total_frames, width, height).to_bytes()
}

/// Decoded form of the stream preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    /// Frame rate, already truncated to one byte.
    pub fps: u8,
    /// Whole-second duration in milliseconds.
    pub duration_ms: u32,
    /// Frame width, 12 bits.
    pub width: u16,
    /// Frame height, 12 bits.
    pub height: u16,
}

impl StreamHeader {
    /// Size of header in bytes.
    /// Version(1) + Fps(1) + DurationMs(4) + Width/Height(3) = 9
    pub const SIZE: usize = 9;

    pub fn new(fps: u32, total_frames: usize, width: usize, height: usize) -> Self {
        Self {
            fps: truncate_fps(fps),
            duration_ms: duration_ms(fps, total_frames),
            width: truncate_dimension(width),
            height: truncate_dimension(height),
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = FORMAT_VERSION;
        bytes[1] = self.fps;
        bytes[2..6].copy_from_slice(&self.duration_ms.to_le_bytes());
        bytes[6..9].copy_from_slice(&pack_dimensions(self.width, self.height));
        bytes
    }

    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> io::Result<Self> {
        if bytes[0] != FORMAT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported diveo version: {}", bytes[0]),
            ));
        }
        let (width, height) = unpack_dimensions([bytes[6], bytes[7], bytes[8]]);
        Ok(Self {
            fps: bytes[1],
            duration_ms: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            width,
            height,
        })
    }

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; Self::SIZE];
        r.read_exact(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Pixels per frame as declared by the header.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
