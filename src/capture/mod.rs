//! Frame capture: choosing a screen rectangle and grabbing it at a fixed
//! cadence.
//!
//! Capture sits outside the encoder. The encoder only needs an ordered,
//! dimension-uniform [`FrameSequence`]; anything implementing
//! [`FrameSource`] can produce one through [`capture_sequence`].

#[cfg(feature = "screen")]
mod screen;
mod synthetic;

use std::fmt;
use std::io;
use std::process::Command;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::frame::{BYTES_PER_PIXEL, FrameError, FrameSequence, PixelFrame};

#[cfg(feature = "screen")]
pub use screen::ScreenSource;
pub use synthetic::SyntheticSource;

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies inside a `width` x `height` surface.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Formats as `WxH+X+Y`, the geometry string selection tools print.
impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Errors from parsing a `WxH+X+Y` geometry string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionParseError {
    #[error("Expected a geometry like 1280x720+0+0, got {0:?}")]
    Malformed(String),
    #[error("Invalid {field} {value:?} in geometry")]
    InvalidNumber { field: &'static str, value: String },
}

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let geometry = s.trim();
        let malformed = || RegionParseError::Malformed(geometry.to_string());

        let (size, position) = geometry.split_once('+').ok_or_else(malformed)?;
        let (width, height) = size.split_once('x').ok_or_else(malformed)?;
        let (x, y) = position.split_once('+').ok_or_else(malformed)?;

        let number = |field: &'static str, value: &str| {
            value
                .parse::<u32>()
                .map_err(|_| RegionParseError::InvalidNumber {
                    field,
                    value: value.to_string(),
                })
        };

        Ok(Self {
            x: number("x", x)?,
            y: number("y", y)?,
            width: number("width", width)?,
            height: number("height", height)?,
        })
    }
}

/// Capture errors.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to run region selector `{command}`")]
    Selector {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("Region selector `{command}` exited with {status}: {stderr}")]
    SelectorFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error(transparent)]
    Region(#[from] RegionParseError),
    #[error("Region {region} is outside the {width}x{height} display")]
    OutOfBounds {
        region: Region,
        width: usize,
        height: usize,
    },
    #[error("Screen capture failed")]
    Backend(#[source] io::Error),
    #[error("Screen capture is not available: {0}")]
    Unavailable(&'static str),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Something that can grab the pixels of a screen rectangle.
pub trait FrameSource {
    /// Capture one frame of `region`, as row-major RGBA.
    fn capture(&mut self, region: Region) -> Result<PixelFrame, CaptureError>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn capture(&mut self, region: Region) -> Result<PixelFrame, CaptureError> {
        (**self).capture(region)
    }
}

/// Run an external selection tool and parse the rectangle it prints.
///
/// `command` is split on whitespace into a program and its arguments.
pub fn select_region(command: &str) -> Result<Region, CaptureError> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| CaptureError::Selector {
        command: command.to_string(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "empty selector command"),
    })?;

    log::debug!("Running region selector `{}`", command);
    let output = Command::new(program)
        .args(parts)
        .output()
        .map_err(|source| CaptureError::Selector {
            command: command.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(CaptureError::SelectorFailed {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let region = String::from_utf8_lossy(&output.stdout).parse::<Region>()?;
    Ok(region)
}

/// Capture `count` frames of `region`, one per `interval`.
///
/// Capture `i` starts no earlier than `i * interval` after the first. When a
/// capture overruns, the missed ticks are dropped rather than replayed, so a
/// slow source yields the same number of frames spread over a longer time.
pub fn capture_sequence<S: FrameSource + ?Sized>(
    source: &mut S,
    region: Region,
    count: usize,
    interval: Duration,
) -> Result<FrameSequence, CaptureError> {
    let mut frames = FrameSequence::with_capacity(count);
    let start = Instant::now();

    for i in 0..count {
        frames.push(source.capture(region)?)?;
        log::trace!("Captured frame {}/{}", i + 1, count);

        if i + 1 < count {
            wait_for_next_tick(start, interval);
        }
    }

    log::debug!(
        "Captured {} frames of {} in {:.2}s",
        frames.len(),
        region,
        start.elapsed().as_secs_f32()
    );
    Ok(frames)
}

fn wait_for_next_tick(start: Instant, interval: Duration) {
    if interval.is_zero() {
        return;
    }
    let elapsed = start.elapsed();
    let ticks = elapsed.as_nanos() / interval.as_nanos() + 1;
    let next = Duration::from_nanos((ticks * interval.as_nanos()).min(u64::MAX as u128) as u64);
    thread::sleep(next.saturating_sub(elapsed));
}

/// Cut `region` out of a BGRA surface and reorder it into RGBA.
///
/// `stride` is the length of one surface row in bytes, which may include
/// padding past `width * 4`.
pub fn crop_bgra(
    surface: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    region: Region,
) -> Result<PixelFrame, CaptureError> {
    if !region.fits_within(width, height)
        || stride < width * BYTES_PER_PIXEL
        || surface.len() < stride * height
    {
        return Err(CaptureError::OutOfBounds {
            region,
            width,
            height,
        });
    }

    let (x, y) = (region.x as usize, region.y as usize);
    let (w, h) = (region.width as usize, region.height as usize);
    let mut data = Vec::with_capacity(w * h * BYTES_PER_PIXEL);

    for row in y..y + h {
        let start = row * stride + x * BYTES_PER_PIXEL;
        let line = &surface[start..start + w * BYTES_PER_PIXEL];
        for bgra in line.chunks_exact(BYTES_PER_PIXEL) {
            data.extend_from_slice(&[bgra[2], bgra[1], bgra[0], bgra[3]]);
        }
    }

    Ok(PixelFrame::new(w, h, data)?)
}
