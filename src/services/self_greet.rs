use crate::metrics::Metrics;
use crate::models::WelcomerSettings;
use crate::services::message_bank::MessageBank;
use crate::services::sink::MessageSink;
use crate::state::{StateChange, StateManager};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

/// Delays and cooldown for the self-greet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfGreetTiming {
    /// Minimum gap between two self-greets, independent of the mode
    pub cooldown: Duration,
    /// Wait after the local join before deciding
    pub settle_delay: Duration,
    /// Wait between picking the message and sending it
    pub send_delay: Duration,
}

impl Default for SelfGreetTiming {
    fn default() -> Self {
        Self::from_settings(&WelcomerSettings::default())
    }
}

impl SelfGreetTiming {
    pub fn from_settings(settings: &WelcomerSettings) -> Self {
        Self {
            cooldown: settings.self_greet_cooldown(),
            settle_delay: settings.join_settle_delay(),
            send_delay: settings.self_send_delay(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelfGreetOutcome {
    Disabled,
    /// Not connected yet, so there is nobody to greet as
    NoLocalPlayer,
    CooldownActive { remaining: Duration },
    NoTemplates,
    /// Called outside a tokio runtime, so the delayed send can't be scheduled
    NoRuntime,
    /// The message was picked and its delivery task spawned
    Scheduled(String),
}

/// Posts one of the self-greet messages shortly after the local user joins.
///
/// Both delays run on the tokio timer so the triggering event never waits.
/// The clock uses [`tokio::time::Instant`] and follows a paused test clock.
pub struct SelfGreetScheduler {
    state: StateManager,
    bank: MessageBank,
    last_self_greet: Mutex<Option<Instant>>,
    timing: SelfGreetTiming,
    sink: Arc<dyn MessageSink>,
    metrics: Arc<Metrics>,
}

impl SelfGreetScheduler {
    pub fn new(
        state: StateManager,
        bank: MessageBank,
        timing: SelfGreetTiming,
        sink: Arc<dyn MessageSink>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            state,
            bank,
            last_self_greet: Mutex::new(None),
            timing,
            sink,
            metrics,
        }
    }

    /// Arm the self-greet for a fresh connection.
    ///
    /// Must be called from within a tokio runtime. The spawned task can't be
    /// cancelled; it re-reads the toggles when it fires.
    pub fn on_local_join(self: &Arc<Self>) -> JoinHandle<SelfGreetOutcome> {
        let scheduler = Arc::clone(self);
        let settle = self.timing.settle_delay;
        tracing::debug!("Local join seen, self-greet check in {:?}", settle);

        tokio::spawn(async move {
            sleep(settle).await;
            scheduler.fire()
        })
    }

    pub fn fire(&self) -> SelfGreetOutcome {
        self.fire_at(Instant::now())
    }

    /// Decide on a self-greet as of `now` and schedule its delivery.
    ///
    /// The clock is set before the draw, so a failed send still counts
    /// against the cooldown. Outside a runtime nothing is touched.
    pub fn fire_at(&self, now: Instant) -> SelfGreetOutcome {
        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!("Self-greet fired outside a tokio runtime, skipping");
            self.metrics.record_self_greet_skip();
            return SelfGreetOutcome::NoRuntime;
        };

        let (enabled, has_player) = self
            .state
            .read(|state| (state.self_greet_enabled, state.local_player.is_some()));

        if !enabled {
            self.metrics.record_self_greet_skip();
            return SelfGreetOutcome::Disabled;
        }
        if !has_player {
            self.metrics.record_self_greet_skip();
            return SelfGreetOutcome::NoLocalPlayer;
        }

        {
            let mut last = self.last_self_greet.lock();
            if let Some(previous) = *last {
                let elapsed = now.saturating_duration_since(previous);
                if elapsed < self.timing.cooldown {
                    let remaining = self.timing.cooldown - elapsed;
                    tracing::debug!("Self-greet on cooldown ({:?} left)", remaining);
                    self.metrics.record_self_greet_skip();
                    return SelfGreetOutcome::CooldownActive { remaining };
                }
            }
            *last = Some(now);
        }

        let Some(message) = self.bank.draw() else {
            self.metrics.record_empty_pool();
            return SelfGreetOutcome::NoTemplates;
        };

        self.spawn_delivery(&runtime, message.clone());
        SelfGreetOutcome::Scheduled(message)
    }

    fn spawn_delivery(&self, runtime: &Handle, message: String) {
        let sink = Arc::clone(&self.sink);
        let metrics = Arc::clone(&self.metrics);
        let state = self.state.clone();
        let delay = self.timing.send_delay;

        runtime.spawn(async move {
            sleep(delay).await;
            match sink.send_chat(&message) {
                Ok(()) => {
                    tracing::info!("Self-greet sent");
                    metrics.record_self_greet_sent();
                    state.emit(StateChange::SelfGreeted { message });
                }
                Err(e) => {
                    tracing::warn!("Failed to send self-greet: {}", e);
                    metrics.record_delivery_failure();
                }
            }
        });
    }

    pub fn last_self_greet(&self) -> Option<Instant> {
        *self.last_self_greet.lock()
    }

    pub fn bank(&self) -> &MessageBank {
        &self.bank
    }

    pub fn timing(&self) -> SelfGreetTiming {
        self.timing
    }
}
