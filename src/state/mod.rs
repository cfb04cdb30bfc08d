// State management module
//
// This module provides the StateManager which wraps AppState with thread-safe access
// and emits change events to anyone watching the greeter (logs, the binary's status output).

use crate::models::{AppState, CooldownDurations, Mode, WelcomerSettings};
use crate::services::message_bank::PoolKind;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Change events emitted when state is modified or the greeter acts
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// Main greeting switched on or off
    GreetingToggled { enabled: bool },

    /// Self-greet switched on or off
    SelfGreetToggled { enabled: bool },

    /// Mode and its durations replaced
    ModeChanged {
        mode: Mode,
        durations: CooldownDurations,
    },

    /// Local player context appeared, changed or went away
    LocalPlayerChanged { player: Option<String> },

    /// A welcome message was handed to the sink
    PlayerGreeted { player: String, message: String },

    /// A self-greet was handed to the sink
    SelfGreeted { message: String },

    /// A player was added to or removed from the ignore list
    IgnoreListChanged { player: String, ignored: bool },

    /// A message pool was reloaded from disk or extended
    MessagesChanged { pool: PoolKind, count: usize },
}

/// Thread-safe state manager with event emission
///
/// Central owner of [`AppState`]:
/// - Serialises all access through one `RwLock`
/// - Detects state changes and emits [`StateChange`] events
/// - Supports subscribing to changes via a tokio broadcast channel
///
/// Always go through `StateManager` instead of touching [`AppState`] directly:
/// - [`read()`](Self::read) for reading a field or two
/// - [`update()`](Self::update) for mutations with automatic event emission
/// - [`subscribe()`](Self::subscribe) for listening to changes
pub struct StateManager {
    state: Arc<RwLock<AppState>>,

    /// Broadcast channel for emitting state change events.
    /// Sending with no subscribers is fine.
    state_tx: broadcast::Sender<StateChange>,
}

impl StateManager {
    /// Create a new StateManager with default state
    ///
    /// # Returns
    /// A new StateManager with a broadcast channel buffer of 100 events
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    /// Create a StateManager around an initial state
    pub fn with_state(initial: AppState) -> Self {
        let (state_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(initial)),
            state_tx,
        }
    }

    /// Create a StateManager from start-up settings
    pub fn from_settings(settings: &WelcomerSettings) -> Self {
        Self::with_state(AppState::from_settings(settings))
    }

    /// Get a copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let enabled = state_manager.read(|state| state.enabled);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&AppState) -> R,
    {
        let state = self.state.read();
        f(&state)
    }

    /// Update the state and emit change events
    ///
    /// 1. Captures the old state
    /// 2. Applies the update function
    /// 3. Detects what changed
    /// 4. Emits appropriate events
    ///
    /// # Returns
    /// The StateChange events that were emitted
    pub fn update<F>(&self, update_fn: F) -> Vec<StateChange>
    where
        F: FnOnce(&mut AppState),
    {
        let mut state = self.state.write();
        let old_state = state.clone();

        update_fn(&mut state);

        let changes = Self::detect_changes(&old_state, &state);
        drop(state);

        for change in &changes {
            self.emit(change.clone());
        }

        changes
    }

    /// Broadcast an event that isn't derived from a state diff
    pub fn emit(&self, change: StateChange) {
        // No subscribers is not an error
        let _ = self.state_tx.send(change);
    }

    /// Subscribe to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.state_tx.subscribe()
    }

    fn detect_changes(old: &AppState, new: &AppState) -> Vec<StateChange> {
        let mut changes = Vec::new();

        if old.enabled != new.enabled {
            changes.push(StateChange::GreetingToggled {
                enabled: new.enabled,
            });
        }

        if old.self_greet_enabled != new.self_greet_enabled {
            changes.push(StateChange::SelfGreetToggled {
                enabled: new.self_greet_enabled,
            });
        }

        if old.mode != new.mode || old.durations != new.durations {
            changes.push(StateChange::ModeChanged {
                mode: new.mode,
                durations: new.durations,
            });
        }

        if old.local_player != new.local_player {
            changes.push(StateChange::LocalPlayerChanged {
                player: new.local_player.clone(),
            });
        }

        changes
    }

    // Convenience methods for common state updates

    /// Flip the main greeting toggle, returning the new value
    pub fn toggle_enabled(&self) -> bool {
        let mut enabled = false;
        self.update(|state| {
            state.enabled = !state.enabled;
            enabled = state.enabled;
        });
        tracing::info!("Welcomer toggled = {}", enabled);
        enabled
    }

    /// Flip the self-greet toggle, returning the new value
    pub fn toggle_self_greet(&self) -> bool {
        let mut enabled = false;
        self.update(|state| {
            state.self_greet_enabled = !state.self_greet_enabled;
            enabled = state.self_greet_enabled;
        });
        tracing::info!("Self-greet toggled = {}", enabled);
        enabled
    }

    pub fn set_enabled(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| state.enabled = enabled)
    }

    pub fn set_self_greet_enabled(&self, enabled: bool) -> Vec<StateChange> {
        self.update(|state| state.self_greet_enabled = enabled)
    }

    /// Replace the mode and both durations in one step.
    ///
    /// Cooldown clocks are untouched, so a longer duration can push back a
    /// player who was already due and a shorter one can release a blocked one.
    pub fn set_mode(&self, mode: Mode, durations: CooldownDurations) -> Vec<StateChange> {
        let changes = self.update(|state| {
            state.mode = mode;
            state.durations = durations;
        });
        tracing::info!(
            "Server mode switched to {} (per-player {:?}, global {:?})",
            mode,
            durations.per_player,
            durations.global
        );
        changes
    }

    /// Set or clear the local player's name
    pub fn set_local_player(&self, player: Option<String>) -> Vec<StateChange> {
        self.update(|state| state.local_player = player)
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share the same state and channel
impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            state_tx: self.state_tx.clone(),
        }
    }
}
