//! Integration tests for StateManager with state change events
//!
//! These tests verify that the StateManager correctly:
//! - Emits state change events on mutations
//! - Supports multiple subscribers
//! - Handles concurrent access from multiple threads
//! - Reports greeter activity alongside state diffs

mod common;

use std::sync::Arc;
use tokio::time::{Duration, timeout};
use welcomer::models::builtin_durations;
use welcomer::{Mode, StateChange, StateManager};

#[tokio::test]
async fn test_state_change_events_emitted() {
    let state = Arc::new(StateManager::new());
    let mut rx = state.subscribe();

    state.toggle_enabled();

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout waiting for event")
        .expect("Channel closed");

    assert!(
        matches!(event, StateChange::GreetingToggled { enabled: true }),
        "Expected GreetingToggled event, got: {:?}",
        event
    );
}

#[tokio::test]
async fn test_multiple_subscribers_receive_events() {
    let state = Arc::new(StateManager::new());
    let mut rx1 = state.subscribe();
    let mut rx2 = state.subscribe();
    let mut rx3 = state.subscribe();

    state.set_mode(
        Mode::Constantiam,
        builtin_durations(Mode::Constantiam).to_cooldowns(),
    );

    for rx in [&mut rx1, &mut rx2, &mut rx3] {
        let event = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("Timeout")
            .expect("Channel closed");
        assert!(matches!(
            event,
            StateChange::ModeChanged {
                mode: Mode::Constantiam,
                ..
            }
        ));
    }
}

#[tokio::test]
async fn test_same_mode_same_durations_is_silent() {
    let state = Arc::new(StateManager::new());
    let mut rx = state.subscribe();

    let changes = state.set_mode(Mode::Default, builtin_durations(Mode::Default).to_cooldowns());

    assert!(changes.is_empty());
    assert!(timeout(Duration::from_millis(50), rx.recv()).await.is_err());
}

#[tokio::test]
async fn test_connection_lifecycle_events() {
    let state = Arc::new(StateManager::new());
    let mut rx = state.subscribe();

    state.set_local_player(Some("Steve".to_string()));
    state.set_local_player(None);

    let joined = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");
    let left = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    assert_eq!(
        joined,
        StateChange::LocalPlayerChanged {
            player: Some("Steve".to_string())
        }
    );
    assert_eq!(left, StateChange::LocalPlayerChanged { player: None });
}

#[tokio::test]
async fn test_greeting_emits_player_greeted() {
    let h = common::harness(&["Hi %s!"]);
    let mut rx = h.state.subscribe();

    h.engine.handle_join("Alice");

    let event = timeout(Duration::from_millis(100), rx.recv())
        .await
        .expect("Timeout")
        .expect("Channel closed");

    match event {
        StateChange::PlayerGreeted { player, message } => {
            assert_eq!(player, "Alice");
            assert_eq!(message, "Hi Alice!");
        }
        other => panic!("Expected PlayerGreeted, got: {:?}", other),
    }
}

#[test]
fn test_concurrent_toggles_are_serialised() {
    let state = Arc::new(StateManager::new());

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    state.toggle_enabled();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // 1000 flips from OFF lands back on OFF
    assert!(!state.read(|s| s.enabled));
}

#[test]
fn test_concurrent_readers_and_writers() {
    let state = Arc::new(StateManager::new());

    let writer = {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            for mode in Mode::ALL.iter().cycle().take(300) {
                state.set_mode(*mode, builtin_durations(*mode).to_cooldowns());
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for _ in 0..300 {
                    let snapshot = state.snapshot();
                    // Mode and durations are always replaced together
                    assert_eq!(
                        snapshot.durations,
                        builtin_durations(snapshot.mode).to_cooldowns()
                    );
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
