use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;

use gitflix_types::{FrameGeometry, RawFrame};

use crate::error::SourceError;

/// An ordered supplier of raw frames for the encoder.
///
/// Sources yield frames one at a time and signal exhaustion with
/// `Ok(None)`. Every yielded frame must match the session's geometry; the
/// encoder verifies this.
pub trait FrameSource {
    /// The geometry every yielded frame carries.
    fn geometry(&self) -> FrameGeometry;

    /// The next frame in order, or `None` when the sequence ends.
    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError>;
}

/// Synthetic moving-gradient source for demos and tests.
///
/// Pixel values are a deterministic function of position and frame number,
/// so the same parameters always produce the same sequence:
/// `r = (x + f) % 256`, `g = (y + f/2) % 256`, `b = (x + y + f) % 256`.
pub struct PatternSource {
    geometry: FrameGeometry,
    total: u32,
    next: u32,
}

impl PatternSource {
    /// A pattern sequence of `total` frames.
    pub fn new(geometry: FrameGeometry, total: u32) -> Self {
        Self {
            geometry,
            total,
            next: 0,
        }
    }

    /// Generate the pattern frame at a given index.
    pub fn frame_at(geometry: FrameGeometry, frame_number: u32) -> RawFrame {
        let mut pixels = Vec::with_capacity(geometry.pixel_bytes());
        for y in 0..geometry.height {
            for x in 0..geometry.width {
                pixels.push((x.wrapping_add(frame_number) % 256) as u8);
                pixels.push((y.wrapping_add(frame_number / 2) % 256) as u8);
                pixels.push((x.wrapping_add(y).wrapping_add(frame_number) % 256) as u8);
            }
        }
        RawFrame::new(geometry, pixels).expect("pattern fills the geometry exactly")
    }
}

impl FrameSource for PatternSource {
    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        if self.next >= self.total {
            return Ok(None);
        }
        let frame = Self::frame_at(self.geometry, self.next);
        self.next += 1;
        Ok(Some(frame))
    }
}

/// Reads a directory of raw `.rgb` files named `frame_000000.rgb`,
/// `frame_000001.rgb`, … until the first gap.
///
/// Each file must be exactly one uncompressed frame.
pub struct RgbSequenceSource {
    dir: PathBuf,
    geometry: FrameGeometry,
    next: u32,
}

impl RgbSequenceSource {
    /// A sequence rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>, geometry: FrameGeometry) -> Self {
        Self {
            dir: dir.into(),
            geometry,
            next: 0,
        }
    }
}

impl FrameSource for RgbSequenceSource {
    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        let path = self.dir.join(frame_filename(self.next));
        let pixels = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let expected = self.geometry.pixel_bytes();
        if pixels.len() != expected {
            return Err(SourceError::WrongSize {
                path,
                expected,
                actual: pixels.len(),
            });
        }
        self.next += 1;
        Ok(Some(RawFrame::new(self.geometry, pixels)?))
    }
}

/// In-memory source over a prepared frame list, for tests and embedding.
pub struct MemorySource {
    geometry: FrameGeometry,
    frames: VecDeque<RawFrame>,
}

impl MemorySource {
    /// Wrap an ordered frame list.
    pub fn new(geometry: FrameGeometry, frames: Vec<RawFrame>) -> Self {
        Self {
            geometry,
            frames: frames.into(),
        }
    }
}

impl FrameSource for MemorySource {
    fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    fn next_frame(&mut self) -> Result<Option<RawFrame>, SourceError> {
        Ok(self.frames.pop_front())
    }
}

/// The canonical raw-frame filename: `frame_000042.rgb`.
pub fn frame_filename(frame_number: u32) -> String {
    format!("frame_{frame_number:06}.rgb")
}

/// Parse a frame number back out of a canonical filename.
pub fn parse_frame_number(filename: &str) -> Option<u32> {
    filename
        .strip_prefix("frame_")?
        .strip_suffix(".rgb")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> FrameGeometry {
        FrameGeometry::new(8, 8, 3).unwrap()
    }

    #[test]
    fn pattern_is_deterministic() {
        let a = PatternSource::frame_at(tiny(), 17);
        let b = PatternSource::frame_at(tiny(), 17);
        assert_eq!(a, b);
        let c = PatternSource::frame_at(tiny(), 18);
        assert_ne!(a, c);
    }

    #[test]
    fn pattern_source_yields_exactly_total() {
        let mut source = PatternSource::new(tiny(), 3);
        let mut count = 0;
        while let Some(frame) = source.next_frame().unwrap() {
            assert_eq!(frame.geometry(), tiny());
            count += 1;
        }
        assert_eq!(count, 3);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn pattern_matches_formula() {
        let frame = PatternSource::frame_at(tiny(), 5);
        // Pixel (x=2, y=1): r=(2+5)%256, g=(1+2)%256, b=(2+1+5)%256
        let idx = ((8 + 2) * 3) as usize;
        assert_eq!(frame.pixels()[idx], 7);
        assert_eq!(frame.pixels()[idx + 1], 3);
        assert_eq!(frame.pixels()[idx + 2], 8);
    }

    #[test]
    fn filename_roundtrip() {
        assert_eq!(frame_filename(42), "frame_000042.rgb");
        assert_eq!(parse_frame_number("frame_000042.rgb"), Some(42));
        assert_eq!(parse_frame_number("frame_123456.rgb"), Some(123456));
    }

    #[test]
    fn parse_rejects_noncanonical_names() {
        assert_eq!(parse_frame_number("frame_.rgb"), None);
        assert_eq!(parse_frame_number("frame_12.png"), None);
        assert_eq!(parse_frame_number("other_000001.rgb"), None);
    }

    #[test]
    fn rgb_sequence_reads_until_gap() {
        let dir = tempfile::tempdir().unwrap();
        let geom = FrameGeometry::new(2, 2, 3).unwrap();
        for i in 0..3u32 {
            fs::write(
                dir.path().join(frame_filename(i)),
                vec![i as u8; geom.pixel_bytes()],
            )
            .unwrap();
        }
        // A later file after a gap is ignored.
        fs::write(
            dir.path().join(frame_filename(5)),
            vec![5u8; geom.pixel_bytes()],
        )
        .unwrap();

        let mut source = RgbSequenceSource::new(dir.path(), geom);
        let mut values = Vec::new();
        while let Some(frame) = source.next_frame().unwrap() {
            values.push(frame.pixels()[0]);
        }
        assert_eq!(values, vec![0, 1, 2]);
    }

    #[test]
    fn rgb_sequence_rejects_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let geom = FrameGeometry::new(2, 2, 3).unwrap();
        fs::write(dir.path().join(frame_filename(0)), vec![0u8; 5]).unwrap();

        let mut source = RgbSequenceSource::new(dir.path(), geom);
        let err = source.next_frame().unwrap_err();
        assert!(matches!(err, SourceError::WrongSize { .. }));
    }

    #[test]
    fn memory_source_drains_in_order() {
        let geom = tiny();
        let frames = vec![
            RawFrame::filled(geom, 1),
            RawFrame::filled(geom, 2),
        ];
        let mut source = MemorySource::new(geom, frames);
        assert_eq!(source.next_frame().unwrap().unwrap().pixels()[0], 1);
        assert_eq!(source.next_frame().unwrap().unwrap().pixels()[0], 2);
        assert!(source.next_frame().unwrap().is_none());
    }
}
