//! Bounded on-disk image cache with oldest-first eviction.
//!
//! The cache directory holds at most [`CAPACITY`] recognised images. Other files placed there
//! (the history log, hidden files, anything without the image extension) are neither counted
//! nor removed.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, warn};

/// Maximum number of images kept in the cache directory.
pub const CAPACITY: usize = 10;

/// Extension of cached images.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Whether a cache entry participates in eviction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// File with the image extension.
    Image,
    /// Anything else; ignored by eviction.
    Other,
}

impl EntryKind {
    /// What: Classify a path by its extension.
    ///
    /// Inputs:
    /// - `path`: File path
    ///
    /// Output:
    /// - `Image` when the extension equals [`IMAGE_EXTENSION`] (ASCII case-insensitive).
    #[must_use]
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(IMAGE_EXTENSION) => Self::Image,
            _ => Self::Other,
        }
    }
}

/// One regular file in the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Full path of the file.
    pub path: PathBuf,
    /// Creation time, or modification time where the filesystem has no birth time.
    pub created: DateTime<Utc>,
    /// Image or other.
    pub kind: EntryKind,
}

/// What: Choose which entries to delete so one more image fits.
///
/// Inputs:
/// - `entries`: Directory listing
/// - `capacity`: Maximum number of images after admission
///
/// Output:
/// - The oldest images, oldest first: `count - capacity + 1` of them when `count >= capacity`,
///   none otherwise.
///
/// Details:
/// - Only `EntryKind::Image` entries are considered.
/// - Ordering is by `(created, path)` so equal timestamps resolve deterministically.
#[must_use]
pub fn plan_eviction(entries: &[CacheEntry], capacity: usize) -> Vec<&CacheEntry> {
    let mut images: Vec<&CacheEntry> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Image)
        .collect();
    if images.len() < capacity {
        return Vec::new();
    }
    images.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.path.cmp(&b.path)));
    let excess = (images.len() + 1).saturating_sub(capacity).min(images.len());
    images.truncate(excess);
    images
}

/// Result of the eviction pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EvictionReport {
    /// Files deleted.
    pub removed: Vec<PathBuf>,
    /// Deletions or metadata reads that failed.
    pub failures: usize,
}

/// What happened to the new asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// Image decoded and written.
    Written,
    /// A file already existed at the destination; left untouched.
    AlreadyPresent,
    /// Bytes were not a decodable image; nothing written.
    DecodeFailed,
    /// Encoding or writing failed; nothing left behind.
    WriteFailed,
}

/// Outcome of admitting one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    /// Eviction performed before the write.
    pub eviction: EvictionReport,
    /// Write result.
    pub outcome: AdmitOutcome,
}

/// A cache directory with fixed capacity.
#[derive(Debug, Clone)]
pub struct CacheDir {
    /// Directory holding the cached images.
    dir: PathBuf,
}

impl CacheDir {
    /// Wrap `dir` as a cache with capacity [`CAPACITY`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory path.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for the cached image of identifier `id`.
    #[must_use]
    pub fn image_path(&self, id: u32) -> PathBuf {
        self.dir.join(format!("{id}.{IMAGE_EXTENSION}"))
    }

    /// What: List regular files in the cache directory.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - One `CacheEntry` per readable regular file, plus the number of entries skipped because
    ///   their metadata could not be read.
    ///
    /// # Errors
    /// - Returns `Err` when the directory itself cannot be read.
    pub fn entries(&self) -> io::Result<(Vec<CacheEntry>, usize)> {
        let mut entries = Vec::new();
        let mut skipped = 0;
        for item in fs::read_dir(&self.dir)? {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    warn!(
                        dir = %self.dir.display(),
                        error = %e,
                        "[Cache] unreadable directory entry"
                    );
                    skipped += 1;
                    continue;
                }
            };
            let path = item.path();
            let metadata = match item.metadata() {
                Ok(m) => m,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "[Cache] failed to read metadata");
                    skipped += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let created = match metadata.created().or_else(|_| metadata.modified()) {
                Ok(t) => DateTime::<Utc>::from(t),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "[Cache] no timestamp for entry");
                    skipped += 1;
                    continue;
                }
            };
            let kind = EntryKind::of(&path);
            entries.push(CacheEntry {
                path,
                created,
                kind,
            });
        }
        Ok((entries, skipped))
    }

    /// What: Delete the oldest images so one more fits within capacity.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `EvictionReport` listing removed files and the number of failures.
    ///
    /// Details:
    /// - Listing and deletion errors are logged and counted, never propagated.
    #[must_use]
    pub fn evict_for_admission(&self) -> EvictionReport {
        let mut report = EvictionReport::default();
        let entries = match self.entries() {
            Ok((entries, skipped)) => {
                report.failures += skipped;
                entries
            }
            Err(e) => {
                warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "[Cache] failed to list cache directory"
                );
                report.failures += 1;
                return report;
            }
        };

        for entry in plan_eviction(&entries, CAPACITY) {
            match fs::remove_file(&entry.path) {
                Ok(()) => {
                    debug!(
                        path = %entry.path.display(),
                        created = %entry.created,
                        "[Cache] evicted"
                    );
                    report.removed.push(entry.path.clone());
                }
                Err(e) => {
                    warn!(path = %entry.path.display(), error = %e, "[Cache] failed to evict");
                    report.failures += 1;
                }
            }
        }
        report
    }

    /// What: Evict as needed, then decode `bytes` and write them as a JPEG at `destination`.
    ///
    /// Inputs:
    /// - `bytes`: Downloaded asset
    /// - `destination`: Target path, normally [`CacheDir::image_path`]
    ///
    /// Output:
    /// - `Admission` with the eviction report and the write outcome.
    ///
    /// Details:
    /// - The write never replaces an existing file.
    /// - Every failure is logged and reported in the outcome; none is fatal.
    #[must_use]
    pub fn admit(&self, bytes: &[u8], destination: &Path) -> Admission {
        let eviction = self.evict_for_admission();
        if !eviction.removed.is_empty() {
            info!(removed = eviction.removed.len(), "[Cache] made room for new image");
        }

        let outcome = match image::load_from_memory(bytes) {
            Ok(image) => write_new_jpeg(&image, destination),
            Err(e) => {
                warn!(
                    bytes = bytes.len(),
                    error = %e,
                    "[Cache] downloaded asset is not a decodable image"
                );
                AdmitOutcome::DecodeFailed
            }
        };
        Admission { eviction, outcome }
    }
}

/// What: Encode `image` as JPEG into a file that must not already exist.
///
/// Inputs:
/// - `image`: Decoded image
/// - `destination`: Target path
///
/// Output:
/// - `Written`, `AlreadyPresent`, or `WriteFailed`.
///
/// Details:
/// - JPEG carries no alpha, so the image is flattened to RGB8 first.
/// - A partially written file is removed on failure.
fn write_new_jpeg(image: &DynamicImage, destination: &Path) -> AdmitOutcome {
    let file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            info!(
                path = %destination.display(),
                "[Cache] image already cached; keeping existing file"
            );
            return AdmitOutcome::AlreadyPresent;
        }
        Err(e) => {
            warn!(path = %destination.display(), error = %e, "[Cache] failed to create image file");
            return AdmitOutcome::WriteFailed;
        }
    };

    let mut writer = BufWriter::new(file);
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let written = rgb
        .write_to(&mut writer, ImageFormat::Jpeg)
        .map_err(io::Error::other)
        .and_then(|()| writer.flush());

    match written {
        Ok(()) => {
            info!(
                path = %destination.display(),
                width = rgb.width(),
                height = rgb.height(),
                "[Cache] image written"
            );
            AdmitOutcome::Written
        }
        Err(e) => {
            warn!(path = %destination.display(), error = %e, "[Cache] failed to write image");
            drop(writer);
            let _ = fs::remove_file(destination);
            AdmitOutcome::WriteFailed
        }
    }
}
