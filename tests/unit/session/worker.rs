use super::*;
use crate::foundation::core::Rgba8Premul;

fn source() -> Arc<SourceImage> {
    Arc::new(SourceImage::solid(30, 20, Rgba8Premul::from_straight_rgba(9, 99, 199, 255)).unwrap())
}

fn config() -> ShatterConfig {
    ShatterConfig {
        fragment_count: 5,
        ..ShatterConfig::default()
    }
}

#[test]
fn latest_build_is_delivered() {
    let mut b = BackgroundBuilder::new();
    let generation = b.spawn(source(), config(), ShatterOrigin::Center, 4).unwrap();
    assert_eq!(generation, b.latest());
    let session = b.wait().unwrap().unwrap();
    assert_eq!(session.seed(), 4);
    assert_eq!(session.fragments().len(), 5);
}

#[test]
fn superseded_build_is_discarded() {
    let mut b = BackgroundBuilder::new();
    let first = b.spawn(source(), config(), ShatterOrigin::Center, 1).unwrap();
    let second = b.spawn(source(), config(), ShatterOrigin::Center, 2).unwrap();
    assert!(second > first);
    let session = b.wait().unwrap().unwrap();
    assert_eq!(session.seed(), 2);
}

#[test]
fn stale_outcomes_are_build_cancelled() {
    let outcome = BuildOutcome {
        generation: 3,
        result: Err(ShatterError::invalid_input("x")),
    };
    let err = accept(outcome, 4).unwrap_err();
    assert!(matches!(err, ShatterError::BuildCancelled(3)));
}

#[test]
fn cancel_bumps_generation() {
    let mut b = BackgroundBuilder::new();
    let before = b.latest();
    assert_eq!(b.cancel(), before + 1);
    assert!(b.poll().is_none());
    assert!(b.wait().is_none());
}

#[test]
fn cancelled_build_is_not_kept_around() {
    let src = source();
    let mut b = BackgroundBuilder::new();
    b.spawn(Arc::clone(&src), config(), ShatterOrigin::Center, 6).unwrap();
    b.cancel();
    assert!(!b.is_pending());

    // The worker owns the only other handle to the source until it exits.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while Arc::strong_count(&src) > 1 {
        assert!(std::time::Instant::now() < deadline);
        std::thread::yield_now();
    }
    assert!(b.poll().is_none());
}

#[test]
fn dead_worker_ends_wait_with_error() {
    let mut b = BackgroundBuilder::new();
    let (tx, rx) = mpsc::channel::<BuildOutcome>();
    b.pending = Some(rx);
    drop(tx);
    let err = b.wait().unwrap().unwrap_err();
    assert!(matches!(err, ShatterError::Other(_)));
    assert!(!b.is_pending());

    let (tx, rx) = mpsc::channel::<BuildOutcome>();
    b.pending = Some(rx);
    drop(tx);
    assert!(matches!(b.poll(), Some(Err(ShatterError::Other(_)))));
}
