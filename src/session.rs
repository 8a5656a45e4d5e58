//! Per-tick orchestration: input → navigation → decode → present.

use std::path::Path;

use tracing::{error, info, warn};

use crate::catalog::Catalog;
use crate::config::Configuration;
use crate::decoder::{ImageDecoder, RgbaDecoder};
use crate::error::{Error, Result};
use crate::frame::{FrameSlot, ImageBuffer};
use crate::host::{AvInfo, Frame, Geometry, Host, PixelFormat, Region, SystemInfo, Timing};
use crate::navigator::{Navigator, SlideshowClock};

pub const LIBRARY_NAME: &str = "image display";
pub const LIBRARY_VERSION: &str = "v0.1";

/// The only format frames are produced in.
pub const OUTPUT_FORMAT: PixelFormat = PixelFormat::Xrgb8888;

/// Static description of the viewer for hosts that list available cores.
pub fn system_info(cfg: &Configuration) -> SystemInfo {
    SystemInfo {
        library_name: LIBRARY_NAME,
        library_version: LIBRARY_VERSION,
        valid_extensions: cfg.extensions().to_string(),
        need_fullpath: true,
        block_extract: false,
    }
}

/// A viewing session over one directory.
///
/// Owns everything that changes between ticks. After [`Session::tick`]
/// returns [`Error::DecodeFailed`] the host has been asked to shut down and
/// should stop ticking.
pub struct Session<H: Host, D: ImageDecoder = RgbaDecoder> {
    host: H,
    decoder: D,
    catalog: Catalog,
    navigator: Navigator,
    clock: SlideshowClock,
    slot: FrameSlot,
    fps: f64,
    sample_rate: f64,
    dupe_frames: bool,
}

impl<H: Host> Session<H> {
    /// Start a session on the directory containing `start`, decoding with
    /// the `image` crate.
    ///
    /// # Errors
    /// See [`Session::with_decoder`].
    pub fn start(host: H, start: &Path, cfg: &Configuration) -> Result<Self> {
        let decoder = RgbaDecoder::new(cfg.apply_exif_orientation);
        Self::with_decoder(host, decoder, start, cfg)
    }
}

impl<H: Host, D: ImageDecoder> Session<H, D> {
    /// Start a session with a custom decoder.
    ///
    /// The catalog is built from `start`'s directory and the first image shown
    /// is `start` itself when it is in the catalog, the first entry otherwise.
    ///
    /// # Errors
    /// [`Error::PixelFormatUnsupported`] if the host rejects XRGB8888,
    /// [`Error::NoExtensions`] if `cfg` lists no usable extension,
    /// [`Error::BadDir`]/[`Error::CatalogEmpty`] if the directory yields no
    /// catalog and [`Error::DecodeFailed`] if the first image cannot be decoded.
    pub fn with_decoder(mut host: H, decoder: D, start: &Path, cfg: &Configuration) -> Result<Self> {
        if !host.set_pixel_format(OUTPUT_FORMAT) {
            warn!(format = %OUTPUT_FORMAT, "pixel format rejected by host");
            return Err(Error::PixelFormatUnsupported(OUTPUT_FORMAT));
        }

        let catalog = Catalog::build(&Catalog::base_directory(start), &cfg.extensions())?;
        let index = catalog.position(start).unwrap_or(0);
        let navigator = Navigator::with_index(catalog.len(), index).page_step(cfg.page_step);

        let mut session = Self {
            host,
            decoder,
            catalog,
            navigator,
            clock: SlideshowClock::new(cfg.slideshow_interval_frames),
            slot: FrameSlot::default(),
            fps: cfg.fps,
            sample_rate: cfg.sample_rate,
            dupe_frames: cfg.dupe_frames,
        };
        session.load(index)?;
        Ok(session)
    }

    /// Run one frame.
    ///
    /// # Errors
    /// Returns [`Error::DecodeFailed`] when the newly selected image cannot be
    /// decoded; the host is asked to shut down and nothing is presented.
    pub fn tick(&mut self) -> Result<()> {
        self.host.poll_input();
        let held = self.host.input_state();
        let timer_fired = self.clock.tick();

        if let Some(nav) = self.navigator.on_tick(held, timer_fired)
            && nav.reload_required()
            && let Err(err) = self.load(nav.to)
        {
            error!(index = nav.to, "{err}; requesting shutdown");
            self.host.shutdown();
            return Err(err);
        }

        self.present();
        Ok(())
    }

    /// Decode, convert and store the image at `index`, then publish its geometry.
    /// The held buffer is untouched if decoding fails.
    fn load(&mut self, index: usize) -> Result<()> {
        // Navigator indices are always within the catalog.
        let path = &self.catalog.as_slice()[index];
        let mut img = self.decoder.decode(path)?;
        img.convert_to_xrgb();
        let geometry = Geometry::for_image(img.width(), img.height());
        info!(
            index,
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "image loaded"
        );
        self.slot.replace(img);
        self.host.set_geometry(&geometry);
        Ok(())
    }

    fn present(&mut self) {
        let Some(img) = self.slot.get() else {
            return;
        };
        let data = if self.dupe_frames && self.slot.uploaded() {
            None
        } else {
            Some(img.pixels())
        };
        self.host.video_refresh(Frame {
            data,
            width: img.width(),
            height: img.height(),
            pitch: img.pitch(),
        });
        self.slot.mark_uploaded();
    }

    /// Make the next frame re-upload the held image.
    pub fn reset(&mut self) {
        self.slot.invalidate_upload();
    }

    /// Release the held image. Later ticks present nothing until navigation
    /// loads another one.
    pub fn unload(&mut self) {
        self.slot.clear();
    }

    pub fn av_info(&self) -> AvInfo {
        let (w, h) = self
            .slot
            .get()
            .map_or((0, 0), |img| (img.width(), img.height()));
        AvInfo {
            geometry: Geometry::for_image(w, h),
            timing: Timing {
                fps: self.fps,
                sample_rate: self.sample_rate,
            },
        }
    }

    pub fn region(&self) -> Region {
        Region::Ntsc
    }

    /// Sessions carry no savable state.
    pub fn serialize_size(&self) -> usize {
        0
    }

    /// Always `false`; there is nothing to save.
    pub fn serialize(&self, _out: &mut [u8]) -> bool {
        false
    }

    /// Always `false`; there is nothing to restore.
    pub fn unserialize(&mut self, _data: &[u8]) -> bool {
        false
    }

    pub fn index(&self) -> usize {
        self.navigator.index()
    }

    pub fn slideshow_enabled(&self) -> bool {
        self.navigator.slideshow_enabled()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_image(&self) -> Option<&ImageBuffer> {
        self.slot.get()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
