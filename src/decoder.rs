use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ImageError, RgbaImage, imageops};
use tracing::debug;

use crate::error::{Error, Result};
use crate::frame::ImageBuffer;

/// Turns a file into RGBA8 pixels.
pub trait ImageDecoder {
    /// # Errors
    /// Returns [`Error::DecodeFailed`] when the file cannot be read or decoded.
    fn decode(&self, path: &Path) -> Result<ImageBuffer>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbaDecoder {
    apply_exif_orientation: bool,
}

impl RgbaDecoder {
    pub fn new(apply_exif_orientation: bool) -> Self {
        Self {
            apply_exif_orientation,
        }
    }
}

impl ImageDecoder for RgbaDecoder {
    fn decode(&self, path: &Path) -> Result<ImageBuffer> {
        let img = decode_rgba8(path).map_err(|source| Error::DecodeFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let img = if self.apply_exif_orientation {
            apply_orientation(img, read_orientation(path).unwrap_or(1))
        } else {
            img
        };
        let (width, height) = img.dimensions();
        debug!(path = %path.display(), width, height, "decoded");
        ImageBuffer::new(path, width, height, img.into_raw())
    }
}

fn decode_rgba8(path: &Path) -> std::result::Result<RgbaImage, ImageError> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()? // sniff based on content/extension
        .decode()?;
    Ok(img.to_rgba8())
}

fn read_orientation(path: &Path) -> Option<u16> {
    let file = File::open(path).ok()?;
    let mut buf = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut buf).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    let o = u16::try_from(field.value.get_uint(0)?).ok()?;
    debug!(path = %path.display(), orientation = o, "exif orientation");
    Some(o)
}

/// Apply an EXIF orientation tag. Unknown values leave the image as-is.
fn apply_orientation(img: RgbaImage, orientation: u16) -> RgbaImage {
    match orientation {
        2 => imageops::flip_horizontal(&img),
        3 => imageops::rotate180(&img),
        4 => imageops::flip_vertical(&img),
        // transpose
        5 => imageops::flip_horizontal(&imageops::rotate90(&img)),
        6 => imageops::rotate90(&img),
        // transverse
        7 => imageops::flip_horizontal(&imageops::rotate270(&img)),
        8 => imageops::rotate270(&img),
        _ => img,
    }
}
