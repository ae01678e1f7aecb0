//! Successful runs through every stage.

use std::fs;

use earthview::Pipeline;
use earthview::cache::{AdmitOutcome, CAPACITY};
use earthview::wallpaper::ApplyReport;

use super::helpers::{Reply, ScriptedSource, image_bytes, recording_applier, settings, url};

#[tokio::test]
/// What: Range of three where 1000 is rejected and 1001 succeeds.
///
/// Inputs:
/// - `[1000, 1003)`, 1000 → 404, 1001 → 200 with an image body, 1002 → 404.
/// - Randomised candidate order from `Pipeline::run`.
///
/// Output:
/// - `1001.jpg` cached, history holds exactly the 1001 URL, wallpaper applied with that path.
///
/// Details:
/// - Whatever the order, only 1001 can succeed, so the observable result is fixed.
async fn fallback_to_second_candidate() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cache_dir = tmp.path().join("GoogleEarthViewer");
    let source = ScriptedSource::new([
        (1000, Reply::Status(404)),
        (1001, Reply::Body(image_bytes())),
    ]);
    let (applier, calls) = recording_applier(1);
    let pipeline = Pipeline::new(settings(&cache_dir, 1000, 1003), source, Some(applier));

    let report = pipeline.run().await.expect("run");

    let expected_path = cache_dir.join("1001.jpg");
    assert_eq!(report.id, 1001);
    assert_eq!(report.url, url(1001));
    assert_eq!(report.path, expected_path);
    assert_eq!(report.outcome, AdmitOutcome::Written);
    assert!(report.recorded);
    assert!(expected_path.is_file());
    assert!(image::open(&expected_path).is_ok());

    let history = fs::read_to_string(cache_dir.join("EarthViewLog.txt")).expect("history");
    assert_eq!(history, format!("{}\n", url(1001)));

    let calls = calls.lock().expect("lock");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, expected_path);
}

#[tokio::test]
/// What: Candidates are tried strictly in sequence order.
///
/// Inputs:
/// - Explicit sequence `[1002, 1000, 1001]`; only 1001 succeeds.
///
/// Output:
/// - Requests for 1002, 1000, 1001 in that order; three attempts reported.
async fn explicit_sequence_order_is_respected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let source = ScriptedSource::new([(1001, Reply::Body(image_bytes()))]);
    let requests = source.requests();
    let pipeline = Pipeline::new(settings(tmp.path(), 1000, 1003), source, None);
    pipeline.bootstrap().expect("bootstrap");

    let report = pipeline
        .run_with_sequence(&[1002, 1000, 1001])
        .await
        .expect("run");
    assert_eq!(report.attempts, 3);
    assert_eq!(*requests.lock().expect("lock"), [1002, 1000, 1001]);
    assert_eq!(report.wallpaper, None);
}

#[tokio::test]
/// What: Wallpaper is set on every attached display.
///
/// Inputs:
/// - Recording backend with three displays.
///
/// Output:
/// - Three requests, one per display, all with the cached path.
async fn applies_to_all_displays() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let source = ScriptedSource::new([(5, Reply::Body(image_bytes()))]);
    let (applier, calls) = recording_applier(3);
    let pipeline = Pipeline::new(settings(tmp.path(), 5, 6), source, Some(applier));

    let report = pipeline.run().await.expect("run");
    assert_eq!(report.wallpaper, Some(ApplyReport { applied: 3, failed: 0 }));
    let calls = calls.lock().expect("lock");
    let ids: Vec<&str> = calls.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert!(calls.iter().all(|(_, p)| *p == tmp.path().join("5.jpg")));
}

#[tokio::test]
/// What: A full cache loses exactly its oldest image when a new one arrives.
///
/// Inputs:
/// - Cache seeded with ten images created in order, plus a non-image file.
///
/// Output:
/// - First seeded image removed; ten images afterwards; non-image kept.
async fn full_cache_rotates_oldest() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = tmp.path();
    for id in 1..=10 {
        fs::write(dir.join(format!("{id:02}.jpg")), b"seed").expect("seed");
    }
    fs::write(dir.join("notes.txt"), b"keep me").expect("seed");

    let source = ScriptedSource::new([(77, Reply::Body(image_bytes()))]);
    let pipeline = Pipeline::new(settings(dir, 77, 78), source, None);
    let report = pipeline.run().await.expect("run");

    assert_eq!(report.evicted, 1);
    assert!(!dir.join("01.jpg").exists());
    assert!(dir.join("77.jpg").exists());
    assert!(dir.join("notes.txt").exists());
    let images = fs::read_dir(dir)
        .expect("list")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "jpg"))
        .count();
    assert_eq!(images, CAPACITY);
}

#[tokio::test]
/// What: Repeating a run for the same identifier keeps one history line and one file.
///
/// Inputs:
/// - Two runs over a single-identifier range.
///
/// Output:
/// - Second run reports `AlreadyPresent` and `recorded == false`; history has one line.
async fn repeated_run_is_idempotent() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let make = || {
        Pipeline::new(
            settings(tmp.path(), 42, 43),
            ScriptedSource::new([(42, Reply::Body(image_bytes()))]),
            None,
        )
    };

    let first = make().run().await.expect("first run");
    assert_eq!(first.outcome, AdmitOutcome::Written);
    assert!(first.recorded);

    let second = make().run().await.expect("second run");
    assert_eq!(second.outcome, AdmitOutcome::AlreadyPresent);
    assert!(!second.recorded);

    let history = fs::read_to_string(tmp.path().join("EarthViewLog.txt")).expect("history");
    assert_eq!(history.lines().count(), 1);
}
