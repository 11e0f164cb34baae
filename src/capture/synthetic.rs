//! Generated test pattern for recording without a display.

use super::{CaptureError, FrameSource, Region};
use crate::frame::{BYTES_PER_PIXEL, FrameError, PixelFrame};

const SQUARE: [u8; 4] = [255, 255, 255, 255];

/// A white square sliding across a fixed color gradient.
///
/// The gradient never changes, so consecutive frames differ only where the
/// square moved. The square advances one pixel per capture and wraps at the
/// right edge.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    tick: usize,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames captured so far.
    pub fn frames_captured(&self) -> usize {
        self.tick
    }
}

impl FrameSource for SyntheticSource {
    fn capture(&mut self, region: Region) -> Result<PixelFrame, CaptureError> {
        let (width, height) = (region.width as usize, region.height as usize);
        if region.is_empty() {
            return Err(FrameError::ZeroArea { width, height }.into());
        }

        let side = (width.min(height) / 4).max(1);
        let left = self.tick % (width - side + 1);
        let top = (height - side) / 2;

        let mut data = Vec::with_capacity(width * height * BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                let inside = (left..left + side).contains(&x) && (top..top + side).contains(&y);
                if inside {
                    data.extend_from_slice(&SQUARE);
                } else {
                    data.extend_from_slice(&[
                        (x * 255 / width) as u8,
                        (y * 255 / height) as u8,
                        96,
                        255,
                    ]);
                }
            }
        }

        self.tick += 1;
        Ok(PixelFrame::new(width, height, data)?)
    }
}
