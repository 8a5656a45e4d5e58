//! The boundary between a viewer session and the application embedding it.

use std::fmt;

use crate::input::InputMask;

/// Output pixel layouts a host may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 32-bit, red in bits 16-23, green 8-15, blue 0-7; top byte ignored.
    Xrgb8888,
    Rgb565,
    Zrgb1555,
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xrgb8888 => "XRGB8888",
            Self::Rgb565 => "RGB565",
            Self::Zrgb1555 => "0RGB1555",
        })
    }
}

/// Display size the host should prepare for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub base_width: u32,
    pub base_height: u32,
    pub max_width: u32,
    pub max_height: u32,
    /// `0.0` lets the host derive it from width and height.
    pub aspect_ratio: f32,
}

impl Geometry {
    pub fn for_image(width: u32, height: u32) -> Self {
        Self {
            base_width: width,
            base_height: height,
            max_width: width,
            max_height: height,
            aspect_ratio: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub fps: f64,
    pub sample_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvInfo {
    pub geometry: Geometry,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    pub library_name: &'static str,
    pub library_version: &'static str,
    /// Pipe-separated list, e.g. `jpg|jpeg|png`.
    pub valid_extensions: String,
    /// Sessions read files from disk themselves rather than from host memory.
    pub need_fullpath: bool,
    pub block_extract: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Ntsc,
    Pal,
}

/// One presented frame. `data` is `None` when the host already holds the
/// pixels from an earlier frame and should show them again.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub data: Option<&'a [u8]>,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes.
    pub pitch: usize,
}

/// Services a session needs from the embedding application.
pub trait Host {
    /// Ask the host to accept frames in `format`. Returns `false` if it cannot.
    fn set_pixel_format(&mut self, format: PixelFormat) -> bool;

    /// Refresh input state before [`Host::input_state`] is read.
    fn poll_input(&mut self);

    /// Joypad buttons currently held on port 0.
    fn input_state(&mut self) -> InputMask;

    /// Announce the display size for the image about to be presented.
    fn set_geometry(&mut self, geometry: &Geometry);

    fn video_refresh(&mut self, frame: Frame<'_>);

    /// Request the host end the session.
    fn shutdown(&mut self);
}
