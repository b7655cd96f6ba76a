use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use pollwatch::fs::mock::MockFileSystem;
use pollwatch::{detect, detect_blocking, ChangeDetector, ChangeKind};
use pollwatch_test_utils::files::{append, bump_mtime, write_file};
use pollwatch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

const INTERVAL_MS: u64 = 5;

fn primed(fs: &MockFileSystem, path: &str) -> ChangeDetector {
    let mut det = ChangeDetector::new(Arc::new(fs.clone()), path, INTERVAL_MS);
    det.prime().expect("baseline stat should succeed");
    det
}

#[tokio::test]
async fn unmodified_file_never_produces_an_event() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/quiet.txt", "same");
    let mut det = primed(&fs, "/w/quiet.txt");

    let window = Duration::from_millis(INTERVAL_MS * 20);
    let res = tokio::time::timeout(window, det.detect()).await;
    assert!(res.is_err(), "detect returned {:?}", res.ok());
}

#[tokio::test]
async fn size_change_wins_over_mtime_change() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = primed(&fs, "/w/f.txt");

    // append changes both length and mtime in one step
    fs.append("/w/f.txt", b"def").unwrap();

    let event = with_timeout(det.detect()).await;
    assert_eq!(event.kind(), Some(ChangeKind::SizeChanged));
    assert!(event.error().is_none());
}

#[tokio::test]
async fn mtime_only_change_is_reported() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = primed(&fs, "/w/f.txt");

    fs.touch("/w/f.txt").unwrap();

    let event = with_timeout(det.detect()).await;
    assert_eq!(event.kind(), Some(ChangeKind::ModTimeChanged));
}

#[tokio::test]
async fn deletion_after_baseline_yields_error_without_kind() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = primed(&fs, "/w/f.txt");

    fs.remove("/w/f.txt");

    let event = with_timeout(det.detect()).await;
    assert!(event.is_terminal());
    assert!(event.kind().is_none());
    assert_eq!(
        event.error().map(|e| e.kind()),
        Some(std::io::ErrorKind::NotFound)
    );
}

#[tokio::test]
async fn permission_loss_mid_watch_is_terminal() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = primed(&fs, "/w/f.txt");

    fs.deny("/w/f.txt");

    let event = with_timeout(det.detect()).await;
    assert_eq!(
        event.error().map(|e| e.kind()),
        Some(std::io::ErrorKind::PermissionDenied)
    );
}

#[tokio::test]
async fn baseline_moves_forward_after_each_change() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = primed(&fs, "/w/f.txt");

    fs.append("/w/f.txt", b"d").unwrap();
    let first = with_timeout(det.detect()).await;
    assert_eq!(first.kind(), Some(ChangeKind::SizeChanged));

    // The first delta must not be reported again.
    let window = Duration::from_millis(INTERVAL_MS * 10);
    assert!(tokio::time::timeout(window, det.detect()).await.is_err());

    fs.touch("/w/f.txt").unwrap();
    let second = with_timeout(det.detect()).await;
    assert_eq!(second.kind(), Some(ChangeKind::ModTimeChanged));
}

#[tokio::test]
async fn zero_interval_busy_polls_but_still_detects() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/w/f.txt", "abc");
    let mut det = ChangeDetector::new(Arc::new(fs.clone()), "/w/f.txt", 0);
    det.prime().unwrap();
    assert!(det.poll_interval().is_zero());

    fs.touch("/w/f.txt").unwrap();
    let event = with_timeout(det.detect()).await;
    assert_eq!(event.kind(), Some(ChangeKind::ModTimeChanged));
}

#[tokio::test]
async fn one_shot_detect_on_real_file_reports_append() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "grow.txt", b"1")?;

    let task = tokio::spawn(detect(path.clone(), INTERVAL_MS));
    tokio::time::sleep(Duration::from_millis(50)).await;
    append(&path, b"23")?;

    let event = with_timeout(task).await?;
    assert_eq!(event.path(), path.as_path());
    assert_eq!(event.kind(), Some(ChangeKind::SizeChanged));
    Ok(())
}

#[tokio::test]
async fn one_shot_detect_on_real_file_reports_mtime() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "stamp.txt", b"fixed")?;

    let task = tokio::spawn(detect(path.clone(), INTERVAL_MS));
    tokio::time::sleep(Duration::from_millis(50)).await;
    bump_mtime(&path, 10)?;

    let event = with_timeout(task).await?;
    assert_eq!(event.kind(), Some(ChangeKind::ModTimeChanged));
    Ok(())
}

#[test]
fn blocking_detect_on_missing_file_returns_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("never-created");

    let event = detect_blocking(&missing, 60_000);
    assert!(event.is_terminal());
    assert_eq!(event.path(), missing.as_path());
}

#[test]
fn blocking_detect_sees_change_from_another_thread() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_file(dir.path(), "f.txt", b"x")?;

    let writer_path = path.clone();
    let writer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(50));
        append(&writer_path, b"yz")
    });

    let event = detect_blocking(&path, INTERVAL_MS);
    writer.join().expect("writer thread panicked")?;
    assert_eq!(event.kind(), Some(ChangeKind::SizeChanged));
    Ok(())
}
