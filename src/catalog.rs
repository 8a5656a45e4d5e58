//! Directory catalog: the sorted list of images a session navigates.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tga"];
const EXTENDED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "bmp", "tga", "gif", "hdr", "ppm", "pgm", "webp",
];

/// Recognized image file extensions (lowercase, without dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    exts: Vec<String>,
}

impl ExtensionSet {
    /// Build a set from raw extensions. Leading dots and case are ignored;
    /// blanks and duplicates are dropped.
    pub fn new<'a>(exts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut out: Vec<String> = Vec::new();
        for raw in exts {
            let ext = raw.trim().trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !out.contains(&ext) {
                out.push(ext);
            }
        }
        Self { exts: out }
    }

    /// Superset of the default list covering every format the decoder handles.
    #[must_use]
    pub fn extended() -> Self {
        Self::new(EXTENDED_EXTENSIONS.iter().copied())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }

    /// Return `true` if `path` carries one of the recognized extensions.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.exts.iter().any(|e| *e == ext)
            })
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS.iter().copied())
    }
}

/// Pipe-separated, the form hosts expect in system info.
impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.exts.join("|"))
    }
}

impl FromStr for ExtensionSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::new(s.split('|')))
    }
}

/// Ordered, immutable list of image paths discovered in one directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    base: PathBuf,
    items: Vec<PathBuf>,
}

impl Catalog {
    /// Scan `base` (non-recursively) for files matching `exts`, sorted
    /// lexicographically by path.
    ///
    /// # Errors
    /// Returns [`Error::NoExtensions`] for an empty `exts`, [`Error::BadDir`]
    /// if `base` is missing or not a directory and [`Error::CatalogEmpty`] if
    /// nothing matches.
    pub fn build(base: &Path, exts: &ExtensionSet) -> Result<Self> {
        if exts.is_empty() {
            return Err(Error::NoExtensions);
        }
        if !base.is_dir() {
            return Err(Error::BadDir(base.to_path_buf()));
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(base)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => Error::Io(io),
                None => Error::BadDir(base.to_path_buf()),
            })?;
            let path = entry.path();
            if path.is_file() && exts.matches(path) {
                items.push(path.to_path_buf());
            } else {
                debug!(path = %path.display(), "catalog: skipped");
            }
        }

        if items.is_empty() {
            return Err(Error::CatalogEmpty(base.to_path_buf()));
        }
        items.sort();
        info!(dir = %base.display(), count = items.len(), "catalog built");

        Ok(Self {
            base: base.to_path_buf(),
            items,
        })
    }

    /// Directory a session started from `start` should catalog.
    #[must_use]
    pub fn base_directory(start: &Path) -> PathBuf {
        match start.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; an empty catalog cannot be built.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.items.get(index).map(PathBuf::as_path)
    }

    /// Index of the entry with the same file name as `path`.
    ///
    /// Every entry lives directly in the base directory, so the file name
    /// identifies it regardless of how the directory part was spelled.
    #[must_use]
    pub fn position(&self, path: &Path) -> Option<usize> {
        let name = path.file_name()?;
        self.items.iter().position(|p| p.file_name() == Some(name))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.items
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    // Never skip the root; tempfile roots can be dot-dirs.
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with('.'))
}
