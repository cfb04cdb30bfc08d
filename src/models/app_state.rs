use super::config::WelcomerSettings;
use super::mode::{CooldownDurations, Mode};

/// Single source of truth for the toggles and mode shared between the event
/// path, the command surface and the self-greet scheduler.
///
/// # Thread Safety
///
/// `AppState` is wrapped by [`crate::state::StateManager`]. Never hold it
/// directly across threads; use [`read()`](crate::state::StateManager::read)
/// and [`update()`](crate::state::StateManager::update).
///
/// Cooldown clocks and draw queues are deliberately not part of this struct.
/// They belong to their services and are never cloned into snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    /// Main greeting on/off
    pub enabled: bool,

    /// Self-greet on/off
    pub self_greet_enabled: bool,

    /// Active server mode
    pub mode: Mode,

    /// Durations for the active mode, replaced together with `mode`
    pub durations: CooldownDurations,

    /// Name of the local user, set once connected
    pub local_player: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            enabled: false,
            self_greet_enabled: false,
            mode: Mode::Default,
            durations: CooldownDurations::default(),
            local_player: None,
        }
    }
}

impl AppState {
    /// Build the start-up state from the settings file
    pub fn from_settings(settings: &WelcomerSettings) -> Self {
        Self {
            enabled: settings.enabled,
            self_greet_enabled: settings.self_greet_enabled,
            mode: settings.mode,
            durations: settings.durations_for(settings.mode).to_cooldowns(),
            local_player: None,
        }
    }

    /// Whether `name` is the local user
    pub fn is_local_player(&self, name: &str) -> bool {
        self.local_player.as_deref() == Some(name)
    }

    /// One-line status as reported by the `status` command
    pub fn status_line(&self) -> String {
        format!(
            "Welcomer: {} | Self-greet: {} | Mode: {}",
            on_off(self.enabled),
            on_off(self.self_greet_enabled),
            self.mode
        )
    }
}

pub(crate) fn on_off(flag: bool) -> &'static str {
    if flag { "ON" } else { "OFF" }
}
