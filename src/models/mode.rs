use crate::error::WelcomerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Server mode controlling which cooldown clocks apply.
///
/// - `Default`: per-player cooldown only, the global clock is never consulted.
/// - `Constantiam`: global cooldown first, then per-player.
/// - `Hypersafe`: same algorithm as `Constantiam` with longer durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Default,
    Constantiam,
    Hypersafe,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Default, Mode::Constantiam, Mode::Hypersafe];

    /// Whether the global clock is checked and bumped in this mode
    pub fn enforces_global(self) -> bool {
        !matches!(self, Mode::Default)
    }

    /// Upper-case name shown in status output
    pub fn name(self) -> &'static str {
        match self {
            Mode::Default => "DEFAULT",
            Mode::Constantiam => "CONSTANTIAM",
            Mode::Hypersafe => "HYPERSAFE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = WelcomerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Mode::Default),
            "constantiam" => Ok(Mode::Constantiam),
            "hypersafe" => Ok(Mode::Hypersafe),
            _ => Err(WelcomerError::UnknownMode(s.trim().to_string())),
        }
    }
}

/// Cooldown durations for one mode, as stored in the settings file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub per_player_secs: u64,
    pub global_secs: u64,
}

impl ModeDurations {
    pub fn per_player(&self) -> Duration {
        Duration::from_secs(self.per_player_secs)
    }

    /// Zero disables the global clock
    pub fn global(&self) -> Duration {
        Duration::from_secs(self.global_secs)
    }

    pub fn to_cooldowns(self) -> CooldownDurations {
        CooldownDurations {
            per_player: self.per_player(),
            global: self.global(),
        }
    }
}

/// Built-in mode table.
///
/// DEFAULT: 5 min per player, global disabled.
/// CONSTANTIAM: 5 min per player, 5 min global.
/// HYPERSAFE: 10 min per player, 10 min global.
pub const MODE_TABLE: [(Mode, ModeDurations); 3] = [
    (
        Mode::Default,
        ModeDurations {
            per_player_secs: 5 * 60,
            global_secs: 0,
        },
    ),
    (
        Mode::Constantiam,
        ModeDurations {
            per_player_secs: 5 * 60,
            global_secs: 5 * 60,
        },
    ),
    (
        Mode::Hypersafe,
        ModeDurations {
            per_player_secs: 10 * 60,
            global_secs: 10 * 60,
        },
    ),
];

/// Look up the built-in durations for a mode
pub fn builtin_durations(mode: Mode) -> ModeDurations {
    MODE_TABLE
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, d)| *d)
        .unwrap_or(MODE_TABLE[0].1)
}

/// Active cooldown durations held in runtime state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownDurations {
    pub per_player: Duration,
    pub global: Duration,
}

impl Default for CooldownDurations {
    fn default() -> Self {
        builtin_durations(Mode::Default).to_cooldowns()
    }
}
