//! One acquisition run: sequence, fetch, cache, apply, record.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::cache::{AdmitOutcome, CacheDir};
use crate::config::Settings;
use crate::error::{PipelineError, PipelineResult};
use crate::fetch::{AssetSource, acquire};
use crate::history::HistoryLog;
use crate::sequence::unique_sequence;
use crate::wallpaper::{ApplyReport, WallpaperApplier};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Identifier that was fetched.
    pub id: u32,
    /// Locator that was fetched.
    pub url: String,
    /// Cache path the image was written to (or would have been).
    pub path: PathBuf,
    /// Candidates tried.
    pub attempts: usize,
    /// Files removed to make room.
    pub evicted: usize,
    /// Cache write result.
    pub outcome: AdmitOutcome,
    /// Wallpaper result; `None` when no applier was configured.
    pub wallpaper: Option<ApplyReport>,
    /// Whether the history gained a new line.
    pub recorded: bool,
}

/// The acquisition pipeline for one process run.
#[derive(Debug)]
pub struct Pipeline<S> {
    /// Run configuration.
    settings: Settings,
    /// Network side.
    source: S,
    /// Image cache.
    cache: CacheDir,
    /// History file.
    history: HistoryLog,
    /// Desktop integration; `None` skips the wallpaper step.
    applier: Option<WallpaperApplier>,
}

impl<S: AssetSource + Sync> Pipeline<S> {
    /// What: Assemble a pipeline.
    ///
    /// Inputs:
    /// - `settings`: Run configuration
    /// - `source`: Request issuer
    /// - `applier`: Wallpaper applier, or `None` to skip that step
    ///
    /// Output:
    /// - Ready pipeline; nothing touched on disk yet.
    #[must_use]
    pub fn new(settings: Settings, source: S, applier: Option<WallpaperApplier>) -> Self {
        let cache = settings.cache();
        let history = settings.history();
        Self {
            settings,
            source,
            cache,
            history,
            applier,
        }
    }

    /// Run configuration.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// What: Create the cache directory and an empty history file if absent.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `Ok(())` once both exist.
    ///
    /// # Errors
    /// - `PipelineError::Bootstrap` naming the path that could not be created.
    pub fn bootstrap(&self) -> PipelineResult<()> {
        let dir = self.cache.dir();
        std::fs::create_dir_all(dir).map_err(|source| PipelineError::Bootstrap {
            path: dir.to_path_buf(),
            source,
        })?;
        self.history
            .ensure_exists()
            .map_err(|source| PipelineError::Bootstrap {
                path: self.history.path().to_path_buf(),
                source,
            })
    }

    /// What: Bootstrap, draw a fresh candidate sequence covering the whole range, and run it.
    ///
    /// Inputs: None
    ///
    /// Output:
    /// - `RunReport` of the completed run.
    ///
    /// # Errors
    /// - `Bootstrap`, `EmptySequence`, `Exhausted`, or `Transport`.
    pub async fn run(&self) -> PipelineResult<RunReport> {
        self.bootstrap()?;
        let range = self.settings.id_range;
        let sequence = unique_sequence(range.lower, range.upper, range.len());
        info!(
            lower = range.lower,
            upper = range.upper,
            candidates = sequence.len(),
            "generated candidate sequence"
        );
        self.run_with_sequence(&sequence).await
    }

    /// What: Run the pipeline over an explicit candidate sequence.
    ///
    /// Inputs:
    /// - `sequence`: Candidates in try order
    ///
    /// Output:
    /// - `RunReport` once the image is cached, applied, and recorded.
    ///
    /// # Errors
    /// - `EmptySequence` for an empty slice; `Exhausted` or `Transport` from the fetch loop.
    ///
    /// Details:
    /// - Cache, wallpaper, and history failures are logged and do not fail the run.
    /// - The wallpaper step runs even when the cache write did not happen; the destination may
    ///   still hold an earlier copy of the same image.
    pub async fn run_with_sequence(&self, sequence: &[u32]) -> PipelineResult<RunReport> {
        if sequence.is_empty() {
            return Err(PipelineError::EmptySequence);
        }

        let acquired = acquire(&self.source, &self.settings.url_template, sequence).await?;
        let path = self.cache.image_path(acquired.id);

        let admission = self.cache.admit(&acquired.bytes, &path);

        let wallpaper = self.applier.as_ref().map(|applier| {
            if !path.exists() {
                warn!(path = %path.display(), "applying wallpaper from a path with no cached file");
            }
            applier.apply(&path)
        });

        let recorded = match self.history.record_if_absent(&acquired.url) {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(
                    path = %self.history.path().display(),
                    error = %e,
                    "failed to update history"
                );
                false
            }
        };

        info!(
            id = acquired.id,
            attempts = acquired.attempts,
            outcome = ?admission.outcome,
            recorded,
            "run complete"
        );
        Ok(RunReport {
            id: acquired.id,
            url: acquired.url,
            path,
            attempts: acquired.attempts,
            evicted: admission.eviction.removed.len(),
            outcome: admission.outcome,
            wallpaper,
            recorded,
        })
    }
}
