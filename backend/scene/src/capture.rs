//! Headless screen capture.
//!
//! There is no real screen, so the capture is a 32-bpp top-down BMP of the
//! requested size filled with a single color.

use tracing::debug;

use visprobe_core::{Color, ProbeError, ScreenCapture};

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;

/// Upper bound on one dimension, to keep a bogus layout from allocating gigabytes.
const MAX_DIMENSION: u32 = 16_384;

#[derive(Debug, Clone, Copy)]
pub struct HeadlessCapture {
    fill: Color,
}

impl Default for HeadlessCapture {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT)
    }
}

impl HeadlessCapture {
    pub fn new(fill: Color) -> Self {
        Self { fill }
    }
}

impl ScreenCapture for HeadlessCapture {
    fn capture(&self, left: i32, top: i32, width: u32, height: u32) -> Result<Vec<u8>, ProbeError> {
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(ProbeError::Capture(format!(
                "region {width}x{height} exceeds {MAX_DIMENSION} pixels"
            )));
        }
        debug!(left, top, width, height, "Capturing screen region");
        Ok(encode_bmp(width, height, self.fill))
    }
}

fn encode_bmp(width: u32, height: u32, fill: Color) -> Vec<u8> {
    let pixel_bytes = width * height * 4;
    let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
    let mut out = Vec::with_capacity((offset + pixel_bytes) as usize);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(offset + pixel_bytes).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());

    // BITMAPINFOHEADER; negative height means rows are stored top-down.
    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(-(height as i32)).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&32u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&pixel_bytes.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&2835i32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    let pixel = [fill.b, fill.g, fill.r, fill.a];
    for _ in 0..(width * height) {
        out.extend_from_slice(&pixel);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmp_layout() {
        let bytes = HeadlessCapture::new(Color::RED).capture(0, 0, 2, 3).unwrap();
        assert_eq!(&bytes[..2], b"BM");
        assert_eq!(bytes.len(), 54 + 2 * 3 * 4);
        assert_eq!(u32::from_le_bytes(bytes[2..6].try_into().unwrap()) as usize, bytes.len());
        assert_eq!(&bytes[54..58], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_empty_region() {
        let bytes = HeadlessCapture::default().capture(5, 5, 0, 0).unwrap();
        assert_eq!(bytes.len(), 54);
    }

    #[test]
    fn test_oversized_region() {
        assert!(HeadlessCapture::default().capture(0, 0, 20_000, 1).is_err());
    }
}
