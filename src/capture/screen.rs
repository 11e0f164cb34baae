//! Primary display capture through `scrap`.

use std::io::ErrorKind;
use std::thread;
use std::time::Duration;

use scrap::{Capturer, Display};

use super::{CaptureError, FrameSource, Region, crop_bgra};
use crate::frame::PixelFrame;

/// Captures rectangles of the primary display.
///
/// `scrap::Capturer` is not `Send` on X11, so a `ScreenSource` must be used on
/// the thread that created it.
pub struct ScreenSource {
    capturer: Capturer,
    width: usize,
    height: usize,
}

impl ScreenSource {
    /// Open the primary display.
    pub fn primary() -> Result<Self, CaptureError> {
        let display = Display::primary().map_err(CaptureError::Backend)?;
        let capturer = Capturer::new(display).map_err(CaptureError::Backend)?;
        let (width, height) = (capturer.width(), capturer.height());
        log::debug!("Opened primary display ({}x{})", width, height);
        Ok(Self {
            capturer,
            width,
            height,
        })
    }

    /// Display size in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl FrameSource for ScreenSource {
    fn capture(&mut self, region: Region) -> Result<PixelFrame, CaptureError> {
        if !region.fits_within(self.width, self.height) {
            return Err(CaptureError::OutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }

        loop {
            match self.capturer.frame() {
                Ok(surface) => {
                    // scrap hands out BGRA rows, possibly padded.
                    let stride = surface.len() / self.height;
                    return crop_bgra(&surface, self.width, self.height, stride, region);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(1));
                }
                Err(e) => return Err(CaptureError::Backend(e)),
            }
        }
    }
}
