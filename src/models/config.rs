use super::mode::{MODE_TABLE, Mode, ModeDurations, builtin_durations};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings file structure for welcomer.yaml
///
/// Contains start-up toggles, the initial mode, scheduler delays and the
/// per-mode cooldown table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WelcomerConfig {
    #[serde(rename = "welcomer", default)]
    pub settings: WelcomerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomerSettings {
    /// Main greeting enabled at start-up
    #[serde(default)]
    pub enabled: bool,

    /// Self-greet enabled at start-up
    #[serde(default)]
    pub self_greet_enabled: bool,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_self_greet_cooldown")]
    pub self_greet_cooldown_secs: u64,

    /// Delay between the local join and the self-greet check
    #[serde(default = "default_short_delay")]
    pub join_settle_delay_secs: u64,

    /// Delay between selecting a self-greet and sending it
    #[serde(default = "default_short_delay")]
    pub self_send_delay_secs: u64,

    /// How often stale per-player clock entries are dropped (0 = never)
    #[serde(default = "default_prune_interval")]
    pub clock_prune_interval_secs: u64,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default = "default_mode_durations")]
    pub mode_durations: IndexMap<Mode, ModeDurations>,
}

impl Default for WelcomerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            self_greet_enabled: false,
            mode: Mode::Default,
            self_greet_cooldown_secs: default_self_greet_cooldown(),
            join_settle_delay_secs: default_short_delay(),
            self_send_delay_secs: default_short_delay(),
            clock_prune_interval_secs: default_prune_interval(),
            debug_mode: false,
            mode_durations: default_mode_durations(),
        }
    }
}

fn default_self_greet_cooldown() -> u64 {
    5 * 60
}

fn default_short_delay() -> u64 {
    2
}

fn default_prune_interval() -> u64 {
    10 * 60
}

fn default_mode_durations() -> IndexMap<Mode, ModeDurations> {
    MODE_TABLE.iter().copied().collect()
}

impl WelcomerSettings {
    /// Durations for a mode, falling back to the built-in table for modes the
    /// settings file leaves out
    pub fn durations_for(&self, mode: Mode) -> ModeDurations {
        self.mode_durations
            .get(&mode)
            .copied()
            .unwrap_or_else(|| builtin_durations(mode))
    }

    /// Longest per-player cooldown across all modes
    pub fn longest_per_player(&self) -> Duration {
        Mode::ALL
            .iter()
            .map(|m| self.durations_for(*m).per_player())
            .max()
            .unwrap_or_default()
    }

    pub fn self_greet_cooldown(&self) -> Duration {
        Duration::from_secs(self.self_greet_cooldown_secs)
    }

    pub fn join_settle_delay(&self) -> Duration {
        Duration::from_secs(self.join_settle_delay_secs)
    }

    pub fn self_send_delay(&self) -> Duration {
        Duration::from_secs(self.self_send_delay_secs)
    }

    pub fn clock_prune_interval(&self) -> Option<Duration> {
        (self.clock_prune_interval_secs > 0)
            .then(|| Duration::from_secs(self.clock_prune_interval_secs))
    }
}
