//! Channel-order conversion from decoded RGBA to the host's XRGB8888.

/// Bytes per pixel in every buffer the viewer handles.
pub const BYTES_PER_PIXEL: usize = 4;

/// Swap the red and blue lanes of every 4-byte pixel in place.
///
/// RGBA bytes become BGRA, which read as a little-endian `u32` is XRGB8888.
/// Green and alpha are untouched; applying it twice restores the input.
/// A trailing partial pixel, if any, is left alone.
pub fn swap_red_blue(pixels: &mut [u8]) {
    let whole = pixels.len() - pixels.len() % BYTES_PER_PIXEL;
    let lanes: &mut [[u8; BYTES_PER_PIXEL]] = bytemuck::cast_slice_mut(&mut pixels[..whole]);
    for px in lanes {
        px.swap(0, 2);
    }
}
