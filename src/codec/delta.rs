//! Keyframe and inter-frame delta serialization.
//!
//! Frame boundaries are implicit. Every delta frame starts with a record for
//! pixel 0 and ends with a record for its last pixel, whether or not either
//! changed. Interior records never use the last index, so a reader that
//! knows the pixel count (from the header) can split frames: take the first
//! record as the start anchor, then read until a record with index
//! `pixel_count - 1`.
//!
//! This only holds for frames under 2^24 pixels, which covers every size the
//! header can describe. Larger frames are still encoded, but their indices
//! wrap at 24 bits, so an interior record can carry the same index as the
//! end anchor and the sections can no longer be split.

use super::error::EncodeError;
use crate::frame::{PixelFrame, RGB_BYTES, Rgb};

/// Size of one delta record in bytes.
pub const RECORD_SIZE: usize = 6;

/// Largest pixel index a record can address.
pub const MAX_PIXEL_INDEX: u32 = 0x00FF_FFFF;

/// Narrow a pixel index to the 24 bits a record stores. Higher bits are lost.
#[inline]
pub fn truncate_pixel_index(index: usize) -> u32 {
    (index & MAX_PIXEL_INDEX as usize) as u32
}

/// One changed (or anchored) pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaRecord {
    /// Row-major pixel position, 24 bits.
    pub pixel_index: u32,
    pub color: Rgb,
}

impl DeltaRecord {
    pub fn new(pixel_index: usize, color: Rgb) -> Self {
        Self {
            pixel_index: truncate_pixel_index(pixel_index),
            color,
        }
    }

    /// Big-endian 3-byte index followed by R, G, B.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let [_, hi, mid, lo] = self.pixel_index.to_be_bytes();
        let [r, g, b] = self.color.0;
        [hi, mid, lo, r, g, b]
    }

    pub fn from_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        Self {
            pixel_index: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
            color: Rgb([bytes[3], bytes[4], bytes[5]]),
        }
    }
}

/// Append the full color data of `frame`, three bytes per pixel.
pub fn encode_keyframe(frame: &PixelFrame, out: &mut Vec<u8>) {
    out.reserve(frame.pixel_count() * RGB_BYTES);
    for color in frame.rgb().iter() {
        out.extend_from_slice(&color.to_bytes());
    }
}

/// Records describing `current` relative to `previous`, anchors included.
///
/// Both frames must have the same dimensions.
pub fn delta_records(previous: &PixelFrame, current: &PixelFrame) -> Vec<DeltaRecord> {
    debug_assert_eq!(previous.dimensions(), current.dimensions());

    let prev = previous.rgb();
    let curr = current.rgb();
    let last = curr.len() - 1;

    let mut records = Vec::new();
    let mut colors = curr.iter().zip(prev.iter()).enumerate();

    if let Some((_, (first, _))) = colors.next() {
        records.push(DeltaRecord::new(0, first));
    }
    for (index, (now, before)) in colors {
        if index == last || now != before {
            records.push(DeltaRecord::new(index, now));
        }
    }
    // One-pixel frames have no separate last pixel to visit above.
    if last == 0
        && let Some(color) = curr.get(0)
    {
        records.push(DeltaRecord::new(0, color));
    }

    records
}

/// Append the delta section for `current` relative to `previous`.
pub fn encode_delta(previous: &PixelFrame, current: &PixelFrame, out: &mut Vec<u8>) {
    for record in delta_records(previous, current) {
        out.extend_from_slice(&record.to_bytes());
    }
}

/// Serialize a frame sequence: keyframe first, then one delta section per
/// subsequent frame.
pub fn encode(frames: &[PixelFrame]) -> Result<Vec<u8>, EncodeError> {
    let (first, rest) = frames.split_first().ok_or(EncodeError::EmptyInput)?;

    let expected = first.dimensions();
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.dimensions() != expected)
    {
        return Err(EncodeError::DimensionMismatch {
            index,
            expected,
            found: frame.dimensions(),
        });
    }

    let mut out =
        Vec::with_capacity(first.pixel_count() * RGB_BYTES + rest.len() * 2 * RECORD_SIZE);
    encode_keyframe(first, &mut out);

    let mut previous = first;
    for current in rest {
        encode_delta(previous, current, &mut out);
        previous = current;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::header::MAX_DIMENSION;
    use proptest::prelude::*;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn solid(width: usize, height: usize, sample: [u8; 4]) -> PixelFrame {
        PixelFrame::filled(width, height, sample).unwrap()
    }

    /// Split a delta section into per-frame record lists using the anchor
    /// convention described in the module docs.
    fn split_frames(section: &[u8], pixel_count: usize) -> Vec<Vec<DeltaRecord>> {
        let last = truncate_pixel_index(pixel_count - 1);
        let mut records = section
            .chunks_exact(RECORD_SIZE)
            .map(|chunk| DeltaRecord::from_bytes(chunk.try_into().unwrap()));

        let mut frames = Vec::new();
        while let Some(start) = records.next() {
            assert_eq!(start.pixel_index, 0, "frame must open with a start anchor");
            let mut frame = vec![start];
            for record in records.by_ref() {
                frame.push(record);
                if record.pixel_index == last {
                    break;
                }
            }
            frames.push(frame);
        }
        frames
    }

    fn apply(frame: &mut PixelFrame, records: &[DeltaRecord]) {
        for record in records {
            assert!(frame.set_rgb(record.pixel_index as usize, record.color));
        }
    }

    #[test]
    fn test_record_layout() {
        let record = DeltaRecord::new(0x01_02_03, Rgb::new(7, 8, 9));
        assert_eq!(record.to_bytes(), [1, 2, 3, 7, 8, 9]);
        assert_eq!(DeltaRecord::from_bytes(record.to_bytes()), record);
    }

    #[test]
    fn test_pixel_index_truncates_to_24_bits() {
        let record = DeltaRecord::new(0x0100_0005, Rgb::default());
        assert_eq!(record.pixel_index, 5);
    }

    #[test]
    fn test_end_anchor_is_unique_only_below_24_bits() {
        let largest = MAX_DIMENSION as usize * MAX_DIMENSION as usize;
        assert!(largest <= MAX_PIXEL_INDEX as usize);
        assert_ne!(
            truncate_pixel_index(largest - 1),
            truncate_pixel_index(largest - 2)
        );

        // 5000x4000 fits in memory but not in 24 bits: the end anchor wraps
        // onto an interior pixel.
        let pixel_count = 5000 * 4000;
        let end = DeltaRecord::new(pixel_count - 1, Rgb::default());
        let wrapped = pixel_count - 1 - (1 << 24);
        assert!(wrapped > 0);
        assert_eq!(
            DeltaRecord::new(wrapped, Rgb::default()).pixel_index,
            end.pixel_index
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(encode(&[]), Err(EncodeError::EmptyInput)));
    }

    #[test]
    fn test_dimension_mismatch() {
        let frames = [solid(2, 2, RED), solid(2, 2, RED), solid(2, 3, RED)];
        let err = encode(&frames).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::DimensionMismatch {
                index: 2,
                expected: (2, 2),
                found: (2, 3),
            }
        ));
    }

    #[test]
    fn test_keyframe_only() {
        let frame = PixelFrame::new(3, 1, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
        let payload = encode(std::slice::from_ref(&frame)).unwrap();
        assert_eq!(payload, vec![1, 2, 3, 5, 6, 7, 9, 10, 11]);
    }

    #[test]
    fn test_unchanged_frame_emits_two_anchors() {
        let frames = [solid(2, 2, RED), solid(2, 2, RED)];
        let payload = encode(&frames).unwrap();

        assert_eq!(payload.len(), 24);
        assert_eq!(&payload[..12], &[255u8, 0, 0].repeat(4)[..]);
        assert_eq!(&payload[12..], &[0u8, 0, 0, 255, 0, 0, 0, 0, 3, 255, 0, 0]);
    }

    #[test]
    fn test_single_interior_change() {
        let first = solid(3, 3, RED);
        let mut second = first.clone();
        second.set_rgb(4, Rgb::new(0, 0, 255));

        let records = delta_records(&first, &second);
        assert_eq!(
            records,
            vec![
                DeltaRecord::new(0, Rgb::new(255, 0, 0)),
                DeltaRecord::new(4, Rgb::new(0, 0, 255)),
                DeltaRecord::new(8, Rgb::new(255, 0, 0)),
            ]
        );
    }

    #[test]
    fn test_change_on_anchor_merges() {
        let first = solid(2, 2, RED);
        let mut second = first.clone();
        second.set_rgb(0, Rgb::new(1, 1, 1));
        second.set_rgb(3, Rgb::new(2, 2, 2));

        let records = delta_records(&first, &second);
        assert_eq!(
            records,
            vec![
                DeltaRecord::new(0, Rgb::new(1, 1, 1)),
                DeltaRecord::new(3, Rgb::new(2, 2, 2)),
            ]
        );
    }

    #[test]
    fn test_alpha_changes_are_ignored() {
        let first = solid(3, 1, [10, 20, 30, 255]);
        let second = solid(3, 1, [10, 20, 30, 0]);
        assert_eq!(delta_records(&first, &second).len(), 2);
    }

    #[test]
    fn test_single_pixel_frame_emits_both_anchors() {
        let first = solid(1, 1, RED);
        let second = solid(1, 1, [0, 255, 0, 255]);
        let records = delta_records(&first, &second);
        assert_eq!(
            records,
            vec![
                DeltaRecord::new(0, Rgb::new(0, 255, 0)),
                DeltaRecord::new(0, Rgb::new(0, 255, 0)),
            ]
        );
    }

    #[test]
    fn test_anchor_framing_reconstructs_frames() {
        let mut frames = vec![solid(4, 3, [5, 5, 5, 255])];
        for step in 1..6usize {
            let mut next = frames[step - 1].clone();
            next.set_rgb(step, Rgb::new(step as u8, 0, 0));
            next.set_rgb(11 - step, Rgb::new(0, step as u8, 0));
            frames.push(next);
        }

        let payload = encode(&frames).unwrap();
        let keyframe_len = 12 * RGB_BYTES;
        let sections = split_frames(&payload[keyframe_len..], 12);
        assert_eq!(sections.len(), frames.len() - 1);

        let mut decoded = frames[0].clone();
        for (records, expected) in sections.iter().zip(&frames[1..]) {
            apply(&mut decoded, records);
            assert_eq!(&decoded, expected);
        }
    }

    fn frame_pair() -> impl Strategy<Value = (PixelFrame, PixelFrame)> {
        (1usize..8, 1usize..8).prop_flat_map(|(w, h)| {
            let len = w * h * 4;
            (
                proptest::collection::vec(0u8..4, len),
                proptest::collection::vec(0u8..4, len),
            )
                .prop_map(move |(a, b)| {
                    (
                        PixelFrame::new(w, h, a).unwrap(),
                        PixelFrame::new(w, h, b).unwrap(),
                    )
                })
        })
    }

    proptest! {
        #[test]
        fn prop_deltas_rebuild_next_frame((first, second) in frame_pair()) {
            let payload = encode(&[first.clone(), second.clone()]).unwrap();
            let pixels = first.pixel_count();
            let sections = split_frames(&payload[pixels * RGB_BYTES..], pixels);
            prop_assert_eq!(sections.len(), 1);

            let mut rebuilt = first.clone();
            apply(&mut rebuilt, &sections[0]);
            let rebuilt_rgb: Vec<Rgb> = rebuilt.rgb().iter().collect();
            let second_rgb: Vec<Rgb> = second.rgb().iter().collect();
            prop_assert_eq!(rebuilt_rgb, second_rgb);
        }

        #[test]
        fn prop_records_are_ordered_and_anchored((first, second) in frame_pair()) {
            let records = delta_records(&first, &second);
            let last = (second.pixel_count() - 1) as u32;
            prop_assert!(records.len() >= 2);
            prop_assert_eq!(records[0].pixel_index, 0);
            prop_assert_eq!(records[records.len() - 1].pixel_index, last);
            for pair in records[1..records.len() - 1].windows(2) {
                prop_assert!(pair[0].pixel_index < pair[1].pixel_index);
            }
        }
    }
}
