use crate::metrics::Metrics;
use crate::services::cooldown::{CooldownDecision, CooldownPolicy};
use crate::services::ignore::IgnoreRegistry;
use crate::services::message_bank::{MessageBank, PLACEHOLDER};
use crate::services::sink::MessageSink;
use crate::state::{StateChange, StateManager};
use std::sync::Arc;
use std::time::Instant;

/// What the engine did with a join event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetOutcome {
    /// Main greeting is switched off
    Disabled,
    /// The event carried no name
    EmptyName,
    Ignored,
    /// The joining player is the local user
    LocalPlayer,
    CooldownActive(CooldownDecision),
    /// The welcome pool has no templates
    NoTemplates,
    /// The rendered message was handed to the sink
    Delivered(String),
    /// The sink rejected the rendered message; the cooldown still counts
    DeliveryFailed(String),
}

impl GreetOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, GreetOutcome::Delivered(_))
    }
}

/// Fill a template with the player name.
///
/// Only the first `%s` is replaced. Templates without one get the name
/// appended after a space.
pub fn render(template: &str, player: &str) -> String {
    if template.contains(PLACEHOLDER) {
        template.replacen(PLACEHOLDER, player, 1)
    } else {
        format!("{} {}", template, player)
    }
}

/// Decides whether a joining player is greeted and with what.
///
/// Checks run cheapest first and a template is only drawn once every check
/// has passed, so a denied join never advances the draw queue.
pub struct GreetingEngine {
    state: StateManager,
    bank: MessageBank,
    ignore: IgnoreRegistry,
    policy: CooldownPolicy,
    sink: Arc<dyn MessageSink>,
    metrics: Arc<Metrics>,
}

impl GreetingEngine {
    pub fn new(
        state: StateManager,
        bank: MessageBank,
        ignore: IgnoreRegistry,
        policy: CooldownPolicy,
        sink: Arc<dyn MessageSink>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state,
            bank,
            ignore,
            policy,
            sink,
            metrics,
        }
    }

    pub fn handle_join(&self, player: &str) -> GreetOutcome {
        self.handle_join_at(player, Instant::now())
    }

    /// Run the greeting pipeline for `player` as of `now`
    pub fn handle_join_at(&self, player: &str, now: Instant) -> GreetOutcome {
        let (enabled, mode, durations, is_local) = self.state.read(|state| {
            (
                state.enabled,
                state.mode,
                state.durations,
                state.is_local_player(player),
            )
        });

        if !enabled {
            self.metrics.record_inactive();
            return GreetOutcome::Disabled;
        }
        if player.is_empty() {
            self.metrics.record_inactive();
            return GreetOutcome::EmptyName;
        }
        if self.ignore.contains(player) {
            tracing::debug!("Skipping ignored player {}", player);
            self.metrics.record_ignored();
            return GreetOutcome::Ignored;
        }
        if is_local {
            self.metrics.record_inactive();
            return GreetOutcome::LocalPlayer;
        }

        let decision = self.policy.check_and_commit(mode, durations, player, now);
        match decision {
            CooldownDecision::Allowed => {}
            CooldownDecision::GlobalActive { remaining } => {
                tracing::debug!(
                    "Global cooldown active, skipping {} ({:?} left)",
                    player,
                    remaining
                );
                self.metrics.record_cooldown_denial();
                return GreetOutcome::CooldownActive(decision);
            }
            CooldownDecision::PlayerActive { remaining } => {
                tracing::debug!(
                    "Player cooldown active for {} ({:?} left)",
                    player,
                    remaining
                );
                self.metrics.record_cooldown_denial();
                return GreetOutcome::CooldownActive(decision);
            }
        }

        let Some(template) = self.bank.draw() else {
            self.metrics.record_empty_pool();
            return GreetOutcome::NoTemplates;
        };

        let message = render(&template, player);
        if let Err(e) = self.sink.send_chat(&message) {
            tracing::warn!("Failed to greet {}: {}", player, e);
            self.metrics.record_delivery_failure();
            return GreetOutcome::DeliveryFailed(message);
        }

        tracing::info!("Greeted {} in {} mode", player, mode);
        self.metrics.record_greet_sent();
        self.state.emit(StateChange::PlayerGreeted {
            player: player.to_string(),
            message: message.clone(),
        });
        GreetOutcome::Delivered(message)
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn bank(&self) -> &MessageBank {
        &self.bank
    }

    pub fn ignore(&self) -> &IgnoreRegistry {
        &self.ignore
    }

    pub fn policy(&self) -> &CooldownPolicy {
        &self.policy
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
