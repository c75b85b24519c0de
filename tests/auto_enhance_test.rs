//! Background auto-enhance driver tests (tokio paused clock).

#![cfg(feature = "auto")]

use forge::auto_enhance::{spawn_auto_enhance, AutoConfig, AutoStop};
use forge::constants::TICK_INTERVAL_MS;
use forge::session::{Driver, EnhanceSession, SharedSession};
use forge::EnhanceError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::time::Instant;

fn session_with_target(start: u8, target: u8) -> SharedSession {
    let mut session = EnhanceSession::new();
    session.jump_to_level(start).unwrap();
    session.set_target_level(target).unwrap();
    SharedSession::new(session)
}

fn seeded(seed: u64) -> AutoConfig {
    AutoConfig {
        seed: Some(seed),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_runs_to_target_one_attempt_per_tick() {
    let shared = session_with_target(1, 6);
    let started = Instant::now();

    let mut handle = spawn_auto_enhance(shared.clone(), seeded(1)).unwrap();
    let mut seen = 0;
    while handle.next_outcome().await.is_some() {
        seen += 1;
    }
    let summary = handle.join().await.unwrap();

    assert_eq!(summary.stop_reason, AutoStop::ReachedTarget);
    assert_eq!(summary.attempts, 5);
    assert_eq!(seen, 5);
    assert_eq!(summary.final_level, 6);
    assert!(started.elapsed() >= Duration::from_millis(5 * TICK_INTERVAL_MS));
    assert_eq!(shared.holder(), None);
    assert_eq!(shared.snapshot().log().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_tick_resolves_nothing() {
    let shared = session_with_target(1, 15);
    let handle = spawn_auto_enhance(shared.clone(), seeded(2)).unwrap();
    handle.stop();

    let summary = handle.join().await.unwrap();
    assert_eq!(summary.stop_reason, AutoStop::Cancelled);
    assert_eq!(summary.attempts, 0);
    assert!(shared.snapshot().log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_stop_mid_run_keeps_resolved_attempts() {
    let shared = session_with_target(1, 15);
    let mut handle = spawn_auto_enhance(shared.clone(), seeded(3)).unwrap();

    for _ in 0..3 {
        handle.next_outcome().await.unwrap();
    }
    handle.stop();
    while handle.next_outcome().await.is_some() {}
    let summary = handle.join().await.unwrap();

    assert_eq!(summary.stop_reason, AutoStop::Cancelled);
    assert_eq!(summary.attempts, 3);
    assert_eq!(shared.snapshot().log().len(), 3);
    assert_eq!(summary.final_level, shared.snapshot().current_level());
}

#[tokio::test(start_paused = true)]
async fn test_manual_attempts_rejected_while_running() {
    let shared = session_with_target(1, 15);
    let mut handle = spawn_auto_enhance(shared.clone(), seeded(4)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    handle.next_outcome().await.unwrap();
    assert_eq!(
        shared.attempt(&mut rng),
        Err(EnhanceError::SessionBusy(Driver::Auto))
    );
    assert!(matches!(
        spawn_auto_enhance(shared.clone(), seeded(5)),
        Err(EnhanceError::SessionBusy(Driver::Auto))
    ));

    handle.stop();
    handle.join().await.unwrap();
    assert!(shared.attempt(&mut rng).unwrap().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_already_at_target_ends_without_attempting() {
    let shared = session_with_target(9, 9);
    let handle = spawn_auto_enhance(shared.clone(), seeded(6)).unwrap();
    let summary = handle.join().await.unwrap();
    assert_eq!(summary.stop_reason, AutoStop::ReachedTarget);
    assert_eq!(summary.attempts, 0);
    assert_eq!(summary.final_level, 9);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_run_and_releases_session() {
    let shared = session_with_target(1, 15);
    let handle = spawn_auto_enhance(shared.clone(), seeded(7)).unwrap();
    assert_eq!(shared.holder(), Some(Driver::Auto));
    drop(handle);

    tokio::time::sleep(Duration::from_millis(TICK_INTERVAL_MS * 3)).await;
    assert_eq!(shared.holder(), None);
    assert!(shared.snapshot().log().is_empty());

    // A fresh run can take over
    let handle = spawn_auto_enhance(shared.clone(), seeded(8)).unwrap();
    handle.stop();
    let summary = handle.join().await.unwrap();
    assert_eq!(summary.stop_reason, AutoStop::Cancelled);
}
