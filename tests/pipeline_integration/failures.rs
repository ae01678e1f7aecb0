//! Fatal and non-fatal failure paths.

use std::fs;

use earthview::cache::AdmitOutcome;
use earthview::{Pipeline, PipelineError};

use super::helpers::{Reply, ScriptedSource, recording_applier, settings, url};

#[tokio::test]
/// What: Every candidate rejected ends the run with `Exhausted`.
///
/// Inputs:
/// - Range of five identifiers, all 404.
///
/// Output:
/// - `Exhausted { attempts: 5 }`; each identifier requested once; nothing cached or recorded.
async fn all_rejected_exhausts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let source = ScriptedSource::new([]);
    let requests = source.requests();
    let (applier, calls) = recording_applier(1);
    let pipeline = Pipeline::new(settings(tmp.path(), 10, 15), source, Some(applier));

    let err = pipeline.run().await.expect_err("should exhaust");
    assert!(matches!(err, PipelineError::Exhausted { attempts: 5 }));
    let mut requested = requests.lock().expect("lock").clone();
    requested.sort_unstable();
    assert_eq!(requested, [10, 11, 12, 13, 14]);

    let history = fs::read_to_string(tmp.path().join("EarthViewLog.txt")).expect("history");
    assert!(history.is_empty());
    assert!(calls.lock().expect("lock").is_empty());
}

#[tokio::test]
/// What: A transport failure stops the run at that candidate.
///
/// Inputs:
/// - Sequence `[1, 2, 3]`: 1 → 500, 2 unreachable, 3 would succeed.
///
/// Output:
/// - `Transport` for candidate 2; candidate 3 never requested.
async fn transport_failure_aborts() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let source = ScriptedSource::new([
        (1, Reply::Status(500)),
        (2, Reply::Unreachable),
        (3, Reply::Body(super::helpers::image_bytes())),
    ]);
    let requests = source.requests();
    let pipeline = Pipeline::new(settings(tmp.path(), 1, 4), source, None);
    pipeline.bootstrap().expect("bootstrap");

    let err = pipeline
        .run_with_sequence(&[1, 2, 3])
        .await
        .expect_err("should abort");
    match err {
        PipelineError::Transport { url: failed, .. } => assert_eq!(failed, url(2)),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*requests.lock().expect("lock"), [1, 2]);
}

#[tokio::test]
/// What: An empty candidate list is a configuration error.
///
/// Inputs:
/// - `run_with_sequence(&[])`.
///
/// Output:
/// - `EmptySequence`.
async fn empty_sequence_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let pipeline = Pipeline::new(settings(tmp.path(), 1, 2), ScriptedSource::new([]), None);
    let err = pipeline.run_with_sequence(&[]).await.expect_err("empty");
    assert!(matches!(err, PipelineError::EmptySequence));
}

#[tokio::test]
/// What: A body that is not an image still completes the run.
///
/// Inputs:
/// - Single candidate answering 200 with HTML.
///
/// Output:
/// - `DecodeFailed`, no image file, history still records the URL, wallpaper still attempted.
async fn undecodable_body_is_non_fatal() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let source = ScriptedSource::new([(9, Reply::Body(b"<html>gone</html>".to_vec()))]);
    let (applier, calls) = recording_applier(1);
    let pipeline = Pipeline::new(settings(tmp.path(), 9, 10), source, Some(applier));

    let report = pipeline.run().await.expect("run");
    assert_eq!(report.outcome, AdmitOutcome::DecodeFailed);
    assert!(!tmp.path().join("9.jpg").exists());
    assert!(report.recorded);
    assert_eq!(calls.lock().expect("lock").len(), 1);
}

#[test]
/// What: Bootstrap fails when the cache path is occupied by a file.
///
/// Inputs:
/// - Cache directory path that already exists as a regular file.
///
/// Output:
/// - `Bootstrap` error naming that path.
fn bootstrap_reports_unusable_cache_dir() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let blocked = tmp.path().join("blocked");
    fs::write(&blocked, b"file").expect("seed");
    let pipeline = Pipeline::new(settings(&blocked, 1, 2), ScriptedSource::new([]), None);
    match pipeline.bootstrap() {
        Err(PipelineError::Bootstrap { path, .. }) => assert_eq!(path, blocked),
        other => panic!("unexpected result: {other:?}"),
    }
}
