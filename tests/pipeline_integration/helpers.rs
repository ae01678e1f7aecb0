//! Fakes and fixtures shared by the pipeline integration tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use earthview::config::Settings;
use earthview::error::TransportError;
use earthview::fetch::{AssetSource, SourceResponse};
use earthview::sequence::IdentifierRange;
use earthview::wallpaper::{DesktopBackend, Display, WallpaperApplier, WallpaperError};

/// Locator template used by every test.
pub const TEMPLATE: &str = "https://earthview.test/assets/full/{id}.jpg";

/// Scripted answer for one candidate.
#[derive(Clone)]
pub enum Reply {
    /// Response with this status and an empty body.
    Status(u16),
    /// 200 with this body.
    Body(Vec<u8>),
    /// No response at all.
    Unreachable,
}

/// What: Fake source answering from a per-identifier script.
///
/// Details:
/// - Identifiers without a script entry answer 404.
/// - Every requested identifier is recorded in order.
pub struct ScriptedSource {
    replies: HashMap<u32, Reply>,
    requested: Requests,
}

/// Identifiers requested from a [`ScriptedSource`], in order.
pub type Requests = Arc<Mutex<Vec<u32>>>;

impl ScriptedSource {
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = (u32, Reply)>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            requested: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the request log; stays readable after the source moves into a pipeline.
    #[must_use]
    pub fn requests(&self) -> Requests {
        Arc::clone(&self.requested)
    }
}

fn id_from_url(url: &str) -> Option<u32> {
    url.rsplit('/')
        .next()?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}

impl AssetSource for ScriptedSource {
    async fn get(&self, url: &str) -> Result<SourceResponse, TransportError> {
        let id = id_from_url(url).ok_or("unexpected url")?;
        self.requested.lock().expect("lock").push(id);
        match self.replies.get(&id).cloned().unwrap_or(Reply::Status(404)) {
            Reply::Status(status) => Ok(SourceResponse {
                status,
                body: Vec::new(),
            }),
            Reply::Body(body) => Ok(SourceResponse { status: 200, body }),
            Reply::Unreachable => Err("connection reset by peer".into()),
        }
    }
}

/// Wallpaper requests captured by [`RecordingBackend`].
pub type Calls = Arc<Mutex<Vec<(String, PathBuf)>>>;

/// What: Fake desktop with a fixed set of displays that records every request.
pub struct RecordingBackend {
    displays: Vec<Display>,
    calls: Calls,
}

impl DesktopBackend for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn displays(&self) -> Result<Vec<Display>, WallpaperError> {
        Ok(self.displays.clone())
    }

    fn set_wallpaper(&self, display: &Display, image: &Path) -> Result<(), WallpaperError> {
        self.calls
            .lock()
            .expect("lock")
            .push((display.id.clone(), image.to_path_buf()));
        Ok(())
    }
}

/// What: Applier over a recording backend with `count` displays.
///
/// Output:
/// - The applier and a handle to the recorded calls.
#[must_use]
pub fn recording_applier(count: usize) -> (WallpaperApplier, Calls) {
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let displays = (1..=count)
        .map(|i| Display {
            id: i.to_string(),
            label: format!("screen {i}"),
        })
        .collect();
    let backend = RecordingBackend {
        displays,
        calls: Arc::clone(&calls),
    };
    (WallpaperApplier::new(Box::new(backend)), calls)
}

/// Settings rooted in `cache_dir` with the test template and the given range.
#[must_use]
pub fn settings(cache_dir: &Path, lower: u32, upper: u32) -> Settings {
    let mut s = Settings::with_cache_dir(cache_dir);
    s.url_template = TEMPLATE.to_string();
    s.id_range = IdentifierRange::new(lower, upper).expect("valid range");
    s
}

/// Locator for `id` under [`TEMPLATE`].
#[must_use]
pub fn url(id: u32) -> String {
    TEMPLATE.replace("{id}", &id.to_string())
}

/// A small PNG, standing in for a downloaded image.
#[must_use]
pub fn image_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 5, image::Rgb([30, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}
