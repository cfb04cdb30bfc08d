//! Services module - the greeting pipeline.
//!
//! Everything here is free of I/O surfaces beyond the list files, so the
//! binary, the command surface and the tests drive the same code.
//!
//! # Components
//!
//! - [`MessageBank`]: template pool with a shuffled, no-repeat draw queue
//! - [`IgnoreRegistry`]: players that are never greeted
//! - [`CooldownPolicy`]: per-player and global clocks, evaluated per [`Mode`](crate::models::Mode)
//! - [`GreetingEngine`]: joins a player event to a delivered welcome message
//! - [`SelfGreetScheduler`]: delayed first-person greeting after the local join
//! - [`JoinEventParser`]: extracts names from `<name> joined the game`
//! - [`MessageSink`]: outbound chat seam, with [`ChannelSink`] as the default
//!
//! # Pipeline
//!
//! ```text
//! line ─▶ JoinEventParser ─▶ GreetingEngine
//!                              ├─ state (enabled, local player)
//!                              ├─ IgnoreRegistry
//!                              ├─ CooldownPolicy (check + commit)
//!                              ├─ MessageBank::draw
//!                              └─ MessageSink::send_chat
//! ```

pub mod cooldown;
pub mod events;
pub mod greeting;
pub mod ignore;
pub mod message_bank;
pub mod self_greet;
pub mod sink;

pub use cooldown::{CooldownClocks, CooldownDecision, CooldownPolicy};
pub use events::JoinEventParser;
pub use greeting::{GreetOutcome, GreetingEngine, render};
pub use ignore::IgnoreRegistry;
pub use message_bank::{
    DEFAULT_SELF_MESSAGES, DEFAULT_WELCOME_MESSAGES, MessageBank, PLACEHOLDER, PoolKind,
};
pub use self_greet::{SelfGreetOutcome, SelfGreetScheduler, SelfGreetTiming};
pub use sink::{ChannelSink, MessageSink};
