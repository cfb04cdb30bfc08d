// Welcomer - join greeter for multiplayer chat
//
// This is the library crate containing the greeting engine, its state and
// configuration. The binary crate (main.rs) drives it from stdin.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use commands::{Command, CommandController};
pub use config::ConfigManager;
pub use error::{WelcomerError, WelcomerResult};
pub use metrics::Metrics;
pub use models::{AppState, Mode, WelcomerConfig, WelcomerSettings};
pub use services::{
    GreetOutcome, GreetingEngine, JoinEventParser, MessageSink, SelfGreetOutcome,
    SelfGreetScheduler,
};
pub use state::{StateChange, StateManager};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
