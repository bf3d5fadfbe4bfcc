//! Tests for the remote player adapter: fingerprint gating and the
//! suspend/resume continuation.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::StubEngine;
use matchframe::{PlayerError, RemotePlayer};

fn engine_for(p1: &Arc<RemotePlayer>, p2: &Arc<RemotePlayer>) -> StubEngine {
    StubEngine::new(
        Arc::clone(p1),
        Arc::clone(p2),
        10,
        Arc::new(Mutex::new(Vec::new())),
    )
}

#[tokio::test]
async fn accepted_move_resolves_pending_continuation() {
    let p1 = Arc::new(RemotePlayer::new("p1"));
    let p2 = Arc::new(RemotePlayer::new("p2"));
    let mut engine = engine_for(&p1, &p2);

    let waiter = Arc::clone(&p1);
    let handle = tokio::spawn(async move { waiter.next_move().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let accepted = p1
        .move_by_player(&mut engine, "h0", "A+0,0")
        .expect("engine failed");
    assert!(accepted);
    assert_eq!(
        handle.await.expect("join failed").expect("canceled"),
        "A+0,0"
    );
}

#[tokio::test]
async fn rejected_move_leaves_continuation_parked() {
    let p1 = Arc::new(RemotePlayer::new("p1"));
    let p2 = Arc::new(RemotePlayer::new("p2"));
    let mut engine = engine_for(&p1, &p2);

    let waiter = Arc::clone(&p1);
    let handle = tokio::spawn(async move { waiter.next_move().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let accepted = p1
        .move_by_player(&mut engine, "stale", "A+0,0")
        .expect("engine failed");
    assert!(!accepted, "stale fingerprint accepted");

    // The suspension survives the rejection; the next valid move resolves it.
    let accepted = p1
        .move_by_player(&mut engine, "h0", "B+1,1")
        .expect("engine failed");
    assert!(accepted);
    assert_eq!(
        handle.await.expect("join failed").expect("canceled"),
        "B+1,1"
    );
}

#[tokio::test]
async fn second_move_suspension_is_a_usage_error() {
    let p1 = Arc::new(RemotePlayer::new("p1"));

    let waiter = Arc::clone(&p1);
    let handle = tokio::spawn(async move { waiter.next_move().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let err = p1
        .next_move()
        .await
        .expect_err("double suspension allowed");
    assert_eq!(err, PlayerError::MovePending);
    handle.abort();
}

#[tokio::test]
async fn acknowledgement_is_fingerprint_gated() {
    let p1 = Arc::new(RemotePlayer::new("p1"));
    let p2 = Arc::new(RemotePlayer::new("p2"));
    let engine = engine_for(&p1, &p2);

    let waiter = Arc::clone(&p1);
    let handle = tokio::spawn(async move { waiter.next_ack().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!p1.acknowledge_state_by_player(&engine, "stale"));
    assert!(p1.acknowledge_state_by_player(&engine, "h0"));
    handle
        .await
        .expect("join failed")
        .expect("ack continuation canceled");
}
