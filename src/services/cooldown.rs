use crate::models::{CooldownDurations, Mode};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    Allowed,
    /// The global clock blocks every greet for `remaining`
    GlobalActive { remaining: Duration },
    /// This player was greeted too recently
    PlayerActive { remaining: Duration },
}

impl CooldownDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CooldownDecision::Allowed)
    }
}

/// Last-greet timestamps.
///
/// An absent entry means "never greeted" and never denies.
#[derive(Debug, Default, Clone)]
pub struct CooldownClocks {
    per_player: HashMap<String, Instant>,
    last_global: Option<Instant>,
}

impl CooldownClocks {
    /// Evaluate the mode's rules without committing anything.
    ///
    /// | Mode | Global | Per-player |
    /// |---|---|---|
    /// | DEFAULT | skipped | checked |
    /// | CONSTANTIAM / HYPERSAFE | checked first when > 0 | checked |
    pub fn evaluate(
        &self,
        mode: Mode,
        durations: CooldownDurations,
        player: &str,
        now: Instant,
    ) -> CooldownDecision {
        if mode.enforces_global() && !durations.global.is_zero() {
            if let Some(remaining) = remaining(self.last_global, durations.global, now) {
                return CooldownDecision::GlobalActive { remaining };
            }
        }

        let last = self.per_player.get(player).copied();
        if let Some(remaining) = remaining(last, durations.per_player, now) {
            return CooldownDecision::PlayerActive { remaining };
        }

        CooldownDecision::Allowed
    }

    /// Record a successful greet. The global clock only moves in modes that use it.
    pub fn commit(&mut self, mode: Mode, player: &str, now: Instant) {
        self.per_player.insert(player.to_string(), now);
        if mode.enforces_global() {
            self.last_global = Some(now);
        }
    }

    pub fn last_greeted(&self, player: &str) -> Option<Instant> {
        self.per_player.get(player).copied()
    }

    pub fn last_global(&self) -> Option<Instant> {
        self.last_global
    }

    pub fn tracked_players(&self) -> usize {
        self.per_player.len()
    }

    /// Drop per-player entries last touched at least `horizon` ago
    pub fn prune_older_than(&mut self, now: Instant, horizon: Duration) -> usize {
        let before = self.per_player.len();
        self.per_player
            .retain(|_, last| now.saturating_duration_since(*last) < horizon);
        before - self.per_player.len()
    }
}

/// Time left on a clock, or `None` if it has run out (or never started)
fn remaining(last: Option<Instant>, cooldown: Duration, now: Instant) -> Option<Duration> {
    let elapsed = now.saturating_duration_since(last?);
    (elapsed < cooldown).then(|| cooldown - elapsed)
}

/// Mode-parameterised cooldown policy shared by the event path and commands.
///
/// Check and commit happen under one lock, so two simultaneous joins for the
/// same player can't both pass.
#[derive(Debug, Default)]
pub struct CooldownPolicy {
    clocks: Mutex<CooldownClocks>,
}

impl CooldownPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate and, if allowed, record the greet at `now`
    pub fn check_and_commit(
        &self,
        mode: Mode,
        durations: CooldownDurations,
        player: &str,
        now: Instant,
    ) -> CooldownDecision {
        let mut clocks = self.clocks.lock();
        let decision = clocks.evaluate(mode, durations, player, now);
        if decision.is_allowed() {
            clocks.commit(mode, player, now);
        }
        decision
    }

    /// Evaluate without committing
    pub fn peek(
        &self,
        mode: Mode,
        durations: CooldownDurations,
        player: &str,
        now: Instant,
    ) -> CooldownDecision {
        self.clocks.lock().evaluate(mode, durations, player, now)
    }

    pub fn last_greeted(&self, player: &str) -> Option<Instant> {
        self.clocks.lock().last_greeted(player)
    }

    pub fn last_global(&self) -> Option<Instant> {
        self.clocks.lock().last_global()
    }

    pub fn tracked_players(&self) -> usize {
        self.clocks.lock().tracked_players()
    }

    /// Forget players whose last greet is at least `horizon` old.
    ///
    /// With `horizon` no shorter than the longest per-player cooldown this
    /// never changes a decision.
    pub fn prune_stale(&self, now: Instant, horizon: Duration) -> usize {
        let pruned = self.clocks.lock().prune_older_than(now, horizon);
        if pruned > 0 {
            tracing::debug!("Pruned {} stale cooldown entries", pruned);
        }
        pruned
    }
}
