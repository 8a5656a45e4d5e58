//! A host with no display: input comes from a script, frames are recorded.

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result, anyhow, ensure};
use image::RgbaImage;

use crate::host::{Frame, Geometry, Host, PixelFormat};
use crate::input::{Button, InputMask, UnknownButton};
use crate::pixel::swap_red_blue;

/// Parse a per-tick input script.
///
/// Ticks are separated by `,`. A tick lists held buttons joined by `+`;
/// `-` or an empty entry holds nothing. `entry*N` repeats an entry N times.
///
/// `"y,-*119,right+up"` toggles the slideshow, idles 119 ticks, then holds
/// right and up together.
pub fn parse_script(script: &str) -> Result<Vec<InputMask>> {
    let mut out = Vec::new();
    if script.trim().is_empty() {
        return Ok(out);
    }
    for entry in script.split(',') {
        let (buttons, count) = match entry.split_once('*') {
            Some((b, n)) => {
                let n: usize = n
                    .trim()
                    .parse()
                    .with_context(|| format!("bad repeat count in `{entry}`"))?;
                (b, n)
            }
            None => (entry, 1),
        };
        let mask = parse_mask(buttons)?;
        out.extend(std::iter::repeat_n(mask, count));
    }
    Ok(out)
}

fn parse_mask(raw: &str) -> Result<InputMask, UnknownButton> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "-" {
        return Ok(InputMask::EMPTY);
    }
    raw.split('+')
        .map(str::parse::<Button>)
        .collect::<Result<InputMask, _>>()
}

/// Host fed from a list of input snapshots.
#[derive(Debug)]
pub struct ScriptedHost {
    script: VecDeque<InputMask>,
    held: InputMask,
    accepted_formats: Vec<PixelFormat>,
    geometry: Option<Geometry>,
    last_frame: Option<RecordedFrame>,
    uploads: usize,
    repeats: usize,
    shutdown_requested: bool,
}

/// The most recent pixels the host received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFrame {
    pub width: u32,
    pub height: u32,
    pub pitch: usize,
    pub data: Vec<u8>,
}

impl ScriptedHost {
    pub fn new(script: impl IntoIterator<Item = InputMask>) -> Self {
        Self {
            script: script.into_iter().collect(),
            held: InputMask::EMPTY,
            accepted_formats: vec![PixelFormat::Xrgb8888, PixelFormat::Rgb565],
            geometry: None,
            last_frame: None,
            uploads: 0,
            repeats: 0,
            shutdown_requested: false,
        }
    }

    /// Restrict the pixel formats this host accepts.
    #[must_use]
    pub fn accepting(mut self, formats: &[PixelFormat]) -> Self {
        self.accepted_formats = formats.to_vec();
        self
    }

    /// Append snapshots to the end of the script.
    pub fn push(&mut self, inputs: impl IntoIterator<Item = InputMask>) {
        self.script.extend(inputs);
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.last_frame.as_ref()
    }

    /// Frames that carried pixel data.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Frames that asked to show the previous pixels again.
    pub fn repeats(&self) -> usize {
        self.repeats
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// Write the last received frame to `path` as an RGBA image.
    pub fn save_last_frame(&self, path: &Path) -> Result<()> {
        let frame = self
            .last_frame
            .as_ref()
            .ok_or_else(|| anyhow!("no frame has been presented"))?;
        ensure!(frame.pitch > 0, "frame has no rows");
        let row_len = frame.width as usize * 4;
        let mut rgba = Vec::with_capacity(row_len * frame.height as usize);
        for row in frame.data.chunks(frame.pitch).take(frame.height as usize) {
            let row = row
                .get(..row_len)
                .ok_or_else(|| anyhow!("frame row is shorter than its width"))?;
            rgba.extend_from_slice(row);
        }
        swap_red_blue(&mut rgba);
        let img = RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| anyhow!("frame data is shorter than its dimensions"))?;
        img.save(path)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

impl Host for ScriptedHost {
    fn set_pixel_format(&mut self, format: PixelFormat) -> bool {
        self.accepted_formats.contains(&format)
    }

    fn poll_input(&mut self) {
        self.held = self.script.pop_front().unwrap_or(InputMask::EMPTY);
    }

    fn input_state(&mut self) -> InputMask {
        self.held
    }

    fn set_geometry(&mut self, geometry: &Geometry) {
        self.geometry = Some(*geometry);
    }

    fn video_refresh(&mut self, frame: Frame<'_>) {
        match frame.data {
            Some(data) => {
                self.uploads += 1;
                self.last_frame = Some(RecordedFrame {
                    width: frame.width,
                    height: frame.height,
                    pitch: frame.pitch,
                    data: data.to_vec(),
                });
            }
            None => self.repeats += 1,
        }
    }

    fn shutdown(&mut self) {
        self.shutdown_requested = true;
    }
}
