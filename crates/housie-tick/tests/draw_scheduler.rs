//! Tests for the auto-draw timer using Tokio's paused clock.

use std::time::Duration;

use housie_tick::DrawScheduler;
use tokio::time::timeout;

const INTERVAL: Duration = Duration::from_secs(5);

#[tokio::test(start_paused = true)]
async fn test_disarmed_scheduler_never_fires() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    assert!(!scheduler.is_armed());

    // With the clock paused, the timeout elapses instantly while the
    // disarmed scheduler pends forever.
    let result = timeout(Duration::from_secs(60), scheduler.wait_for_draw()).await;
    assert!(result.is_err(), "disarmed scheduler must pend");
    assert_eq!(scheduler.draws_fired(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_armed_scheduler_fires_once_per_interval() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    scheduler.arm();
    assert!(scheduler.is_armed());

    for expected in 1..=5u64 {
        let fired = scheduler.wait_for_draw().await;
        assert_eq!(fired, expected);
    }
    assert_eq!(scheduler.draws_fired(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_first_draw_waits_at_least_one_interval() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    scheduler.arm();

    // Well inside the first interval nothing may fire (jitter only adds
    // delay, never removes it).
    let early = timeout(INTERVAL / 2, scheduler.wait_for_draw()).await;
    assert!(early.is_err(), "must not fire before the interval elapses");

    // Waiting the rest of the interval (plus jitter headroom) fires it.
    let fired = timeout(INTERVAL * 2, scheduler.wait_for_draw()).await;
    assert_eq!(fired.expect("should fire within two intervals"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_disarm_stops_firing() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    scheduler.arm();
    scheduler.wait_for_draw().await;

    scheduler.disarm();
    assert!(!scheduler.is_armed());
    let result = timeout(Duration::from_secs(600), scheduler.wait_for_draw()).await;
    assert!(result.is_err(), "disarmed scheduler must stop firing");
    assert_eq!(scheduler.draws_fired(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rearm_after_disarm_resumes() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    scheduler.arm();
    scheduler.wait_for_draw().await;
    scheduler.disarm();

    scheduler.arm();
    let fired = timeout(INTERVAL * 2, scheduler.wait_for_draw()).await;
    assert_eq!(fired.expect("re-armed scheduler should fire"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_arm_is_idempotent() {
    let mut scheduler = DrawScheduler::new(INTERVAL);
    scheduler.arm();
    scheduler.arm();
    scheduler.arm();

    scheduler.wait_for_draw().await;
    assert_eq!(scheduler.draws_fired(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_select_integration_commands_flow_while_disarmed() {
    // The actor-loop shape: a disarmed scheduler must not starve the
    // command branch of a select!.
    let (tx, mut rx) = tokio::sync::mpsc::channel::<u32>(4);
    let mut scheduler = DrawScheduler::new(INTERVAL);

    tx.send(7).await.unwrap();
    tokio::select! {
        cmd = rx.recv() => assert_eq!(cmd, Some(7)),
        _ = scheduler.wait_for_draw() => panic!("disarmed scheduler fired"),
    }
}
