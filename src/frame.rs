//! Decoded image buffers and the single slot a session presents from.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::pixel::{BYTES_PER_PIXEL, swap_red_blue};

/// A decoded image: `width * height` pixels of 4 bytes each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    path: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageBuffer {
    /// # Errors
    /// Returns [`Error::InvalidBuffer`] if `pixels` is not exactly
    /// `width * height * 4` bytes.
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL));
        if expected != Some(pixels.len()) {
            return Err(Error::InvalidBuffer {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            path: path.into(),
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes; rows are tightly packed.
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reorder decoded RGBA into the host's XRGB8888 layout.
    pub fn convert_to_xrgb(&mut self) {
        swap_red_blue(&mut self.pixels);
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

/// Holds at most one [`ImageBuffer`].
///
/// Storing a new buffer drops the old one in the same operation, so the slot
/// never holds two images and never points at a released one.
#[derive(Debug, Default)]
pub struct FrameSlot {
    current: Option<ImageBuffer>,
    uploaded: bool,
}

impl FrameSlot {
    /// Store `next`, releasing whatever was held before.
    pub fn replace(&mut self, next: ImageBuffer) {
        self.current = Some(next);
        self.uploaded = false;
    }

    /// Release the held buffer.
    pub fn clear(&mut self) {
        self.current = None;
        self.uploaded = false;
    }

    pub fn get(&self) -> Option<&ImageBuffer> {
        self.current.as_ref()
    }

    /// Whether the held buffer has been handed to the host since it was stored.
    pub fn uploaded(&self) -> bool {
        self.uploaded
    }

    pub fn mark_uploaded(&mut self) {
        self.uploaded = true;
    }

    /// Forget that the host received the buffer, forcing the next upload.
    pub fn invalidate_upload(&mut self) {
        self.uploaded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(path: &str, w: u32, h: u32, px: [u8; 4]) -> ImageBuffer {
        let pixels = px.repeat((w * h) as usize);
        ImageBuffer::new(path, w, h, pixels).unwrap()
    }

    #[test]
    fn rejects_mismatched_length() {
        let err = ImageBuffer::new("x", 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidBuffer { width: 2, height: 2, len: 15 }));
    }

    #[test]
    fn pitch_is_four_bytes_per_column() {
        assert_eq!(solid("a", 3, 2, [0; 4]).pitch(), 12);
    }

    #[test]
    fn convert_touches_every_pixel() {
        let mut img = solid("a", 5, 3, [1, 2, 3, 4]);
        img.convert_to_xrgb();
        assert!(img.pixels().chunks_exact(4).all(|p| p == [3, 2, 1, 4]));
    }

    #[test]
    fn replace_swaps_contents_and_resets_upload() {
        let mut slot = FrameSlot::default();
        assert!(slot.get().is_none());
        slot.replace(solid("a", 1, 1, [0; 4]));
        slot.mark_uploaded();
        slot.replace(solid("b", 2, 1, [0; 4]));
        assert_eq!(slot.get().unwrap().path(), Path::new("b"));
        assert!(!slot.uploaded());
        slot.clear();
        assert!(slot.get().is_none());
    }
}
