use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::catalog::ExtensionSet;

const DEFAULT_SLIDESHOW_INTERVAL_FRAMES: u64 = 120;
const DEFAULT_PAGE_STEP: usize = 5;
const DEFAULT_FPS: f64 = 60.0;
const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Configuration {
    /// File extensions (without dot, case-insensitive) admitted into the catalog.
    pub extensions: Vec<String>,
    /// Number of ticks between slideshow advances.
    pub slideshow_interval_frames: u64,
    /// Distance covered by a single page-back/page-forward press.
    pub page_step: usize,
    /// Nominal tick rate reported to the host.
    pub fps: f64,
    /// Audio sample rate reported to the host. The viewer never produces audio.
    pub sample_rate: f64,
    /// Push a "buffer unchanged" marker instead of re-uploading an image the
    /// host has already received.
    pub dupe_frames: bool,
    /// Rotate/flip decoded images according to their EXIF orientation tag.
    pub apply_exif_orientation: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            extensions: ExtensionSet::default().iter().map(str::to_owned).collect(),
            slideshow_interval_frames: DEFAULT_SLIDESHOW_INTERVAL_FRAMES,
            page_step: DEFAULT_PAGE_STEP,
            fps: DEFAULT_FPS,
            sample_rate: DEFAULT_SAMPLE_RATE,
            dupe_frames: false,
            apply_exif_orientation: false,
        }
    }
}

impl Configuration {
    /// Parse a YAML file into a [`Configuration`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.slideshow_interval_frames > 0,
            "slideshow-interval-frames must be greater than zero"
        );
        ensure!(self.page_step > 0, "page-step must be greater than zero");
        ensure!(
            self.fps.is_finite() && self.fps > 0.0,
            "fps must be positive"
        );
        ensure!(
            self.sample_rate.is_finite() && self.sample_rate >= 0.0,
            "sample-rate must not be negative"
        );
        self.extension_set()
            .context("invalid extensions configuration")?;
        Ok(self)
    }

    /// The configured extensions as a normalized [`ExtensionSet`], which may be empty.
    #[must_use]
    pub fn extensions(&self) -> ExtensionSet {
        ExtensionSet::new(self.extensions.iter().map(String::as_str))
    }

    /// Like [`Configuration::extensions`], but an empty set is an error.
    pub fn extension_set(&self) -> Result<ExtensionSet> {
        let set = self.extensions();
        ensure!(!set.is_empty(), "at least one extension must be configured");
        Ok(set)
    }
}
