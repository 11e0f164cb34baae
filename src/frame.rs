//! Frame model: raw RGBA pixel buffers and their opaque-RGB view.

/// Bytes per pixel in a source buffer (R, G, B, and an ignored fourth channel).
pub const BYTES_PER_PIXEL: usize = 4;

/// Bytes per pixel once the fourth channel is dropped.
pub const RGB_BYTES: usize = 3;

/// A color triple as stored in a diveo stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        self.0
    }
}

/// Frame construction and sequencing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Frame dimensions {width}x{height} have no pixels")]
    ZeroArea { width: usize, height: usize },
    #[error("Frame dimensions {width}x{height} exceed addressable memory")]
    TooLarge { width: usize, height: usize },
    #[error("Frame buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error(
        "Frame {index} is {}x{}, sequence frames are {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// An owned, row-major buffer of interleaved 4-byte pixel samples.
///
/// Only the first three channels of each sample carry color. The fourth is
/// kept so capture backends can hand over their buffers without repacking,
/// but nothing downstream reads it; use [`PixelFrame::rgb`] to get at the
/// colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFrame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Pixel count of a `width` x `height` frame, checked for zero area and for
/// buffers too large to address.
fn checked_pixel_count(width: usize, height: usize) -> Result<usize, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::ZeroArea { width, height });
    }
    width
        .checked_mul(height)
        .filter(|pixels| pixels.checked_mul(BYTES_PER_PIXEL).is_some())
        .ok_or(FrameError::TooLarge { width, height })
}

/// Byte range of the color channels of pixel `index`, or None on overflow.
#[inline]
fn rgb_range(index: usize) -> Option<std::ops::Range<usize>> {
    let start = index.checked_mul(BYTES_PER_PIXEL)?;
    Some(start..start.checked_add(RGB_BYTES)?)
}

impl PixelFrame {
    /// Wrap a raw RGBA buffer.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = checked_pixel_count(width, height)? * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a frame with every pixel set to `sample`.
    pub fn filled(width: usize, height: usize, sample: [u8; 4]) -> Result<Self, FrameError> {
        let data = sample.repeat(checked_pixel_count(width, height)?);
        Self::new(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Raw RGBA samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite the color of one pixel. The fourth channel is left as is.
    ///
    /// Returns false if `index` is out of range.
    pub fn set_rgb(&mut self, index: usize, color: Rgb) -> bool {
        match rgb_range(index).and_then(|range| self.data.get_mut(range)) {
            Some(slot) => {
                slot.copy_from_slice(&color.0);
                true
            }
            None => false,
        }
    }

    /// Opaque-RGB view of this frame.
    #[inline]
    pub fn rgb(&self) -> RgbView<'_> {
        RgbView { data: &self.data }
    }
}

/// Borrowed view over a [`PixelFrame`] that only exposes color triples.
#[derive(Debug, Clone, Copy)]
pub struct RgbView<'a> {
    data: &'a [u8],
}

impl<'a> RgbView<'a> {
    /// Number of pixels in the view.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / BYTES_PER_PIXEL
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Color of the pixel at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Rgb> {
        rgb_range(index)
            .and_then(|range| self.data.get(range))
            .map(|c| Rgb([c[0], c[1], c[2]]))
    }

    /// Colors in row-major pixel order.
    pub fn iter(self) -> impl ExactSizeIterator<Item = Rgb> + 'a {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|c| Rgb([c[0], c[1], c[2]]))
    }
}

/// Ordered, dimension-uniform list of frames.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<PixelFrame>,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
        }
    }

    /// Append a frame. Its dimensions must match the first frame's.
    pub fn push(&mut self, frame: PixelFrame) -> Result<(), FrameError> {
        if let Some(expected) = self.dimensions()
            && frame.dimensions() != expected
        {
            return Err(FrameError::DimensionMismatch {
                index: self.frames.len(),
                expected,
                found: frame.dimensions(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Shared dimensions, or None while empty.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.frames.first().map(PixelFrame::dimensions)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn as_slice(&self) -> &[PixelFrame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PixelFrame> {
        self.frames.iter()
    }

    pub fn into_vec(self) -> Vec<PixelFrame> {
        self.frames
    }
}

impl TryFrom<Vec<PixelFrame>> for FrameSequence {
    type Error = FrameError;

    fn try_from(frames: Vec<PixelFrame>) -> Result<Self, Self::Error> {
        let mut sequence = Self::with_capacity(frames.len());
        for frame in frames {
            sequence.push(frame)?;
        }
        Ok(sequence)
    }
}
