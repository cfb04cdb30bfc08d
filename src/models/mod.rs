//! Data models for the welcomer.
//!
//! - [`AppState`]: toggles, active mode and durations, local player name
//! - [`WelcomerConfig`]: start-up settings loaded from `welcomer.yaml`
//! - [`Mode`] and [`MODE_TABLE`]: server modes and their built-in cooldown durations
//!
//! Runtime clocks and message queues live in their services, not here.

pub mod app_state;
pub mod config;
pub mod mode;

pub use app_state::AppState;
pub use config::{WelcomerConfig, WelcomerSettings};
pub use mode::{CooldownDurations, MODE_TABLE, Mode, ModeDurations, builtin_durations};
