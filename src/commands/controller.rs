// Command controller - executes parsed commands against the running greeter
//
// Coordinates between:
// - StateManager (toggles, mode)
// - GreetingEngine (welcome bank, ignore list)
// - SelfGreetScheduler (self-greet bank)
//
// Every command produces feedback lines for the local user only. Nothing here
// is sent to public chat.

use super::parser::{Command, USAGE};
use crate::error::WelcomerError;
use crate::models::WelcomerSettings;
use crate::models::app_state::on_off;
use crate::services::greeting::GreetingEngine;
use crate::services::message_bank::{MessageBank, PoolKind};
use crate::services::self_greet::SelfGreetScheduler;
use crate::state::{StateChange, StateManager};
use std::sync::Arc;

pub const PROJECT_URL: &str = "https://github.com/sq3rrr/WelcomerMod";
pub const AUTHOR: &str = "nL66ercatgirl67";

/// Executes `/welcomer` commands and renders their feedback
pub struct CommandController {
    state: StateManager,
    engine: Arc<GreetingEngine>,
    self_greeter: Arc<SelfGreetScheduler>,
    /// Source of the per-mode durations applied by `mode`
    settings: WelcomerSettings,
}

impl CommandController {
    pub fn new(
        state: StateManager,
        engine: Arc<GreetingEngine>,
        self_greeter: Arc<SelfGreetScheduler>,
        settings: WelcomerSettings,
    ) -> Self {
        Self {
            state,
            engine,
            self_greeter,
            settings,
        }
    }

    /// Parse and execute one line, turning parse errors into feedback
    pub fn handle_line(&self, line: &str) -> Vec<String> {
        match Command::parse(line) {
            Ok(command) => self.execute(command),
            Err(e @ WelcomerError::UnknownMode(_)) => vec![e.to_string()],
            Err(e) => vec![e.to_string(), USAGE.to_string()],
        }
    }

    pub fn execute(&self, command: Command) -> Vec<String> {
        tracing::debug!("Executing command {:?}", command);

        match command {
            Command::Toggle => {
                let enabled = self.state.toggle_enabled();
                vec![format!("Welcomer is now: {}", on_off(enabled))]
            }
            Command::SelfGreetToggle => {
                let enabled = self.state.toggle_self_greet();
                vec![format!("Self-greet is now: {}", on_off(enabled))]
            }
            Command::Status => {
                let line = self.state.read(|state| state.status_line());
                tracing::debug!("Status requested: {}", line);
                vec![line]
            }
            Command::Ignore(player) => self.ignore(&player),
            Command::Unignore(player) => self.unignore(&player),
            Command::SetMode(mode) => {
                let durations = self.settings.durations_for(mode).to_cooldowns();
                self.state.set_mode(mode, durations);
                vec![format!("Server mode set to {}", mode)]
            }
            Command::ReloadMessages => {
                reload(&self.state, self.engine.bank());
                vec!["Welcome messages reloaded!".to_string()]
            }
            Command::ReloadSelfMessages => {
                reload(&self.state, self.self_greeter.bank());
                vec!["Self-greet messages reloaded!".to_string()]
            }
            Command::AddMessage(message) => add(&self.state, self.engine.bank(), &message),
            Command::AddSelfMessage(message) => {
                add(&self.state, self.self_greeter.bank(), &message)
            }
            Command::Info => info_lines(),
        }
    }

    fn ignore(&self, player: &str) -> Vec<String> {
        let mut feedback = vec![format!("Now ignoring {}", player)];
        if let Err(e) = self.engine.ignore().add(player) {
            tracing::error!("Failed to persist ignore list: {}", e);
            feedback.push("Failed to save ignore list.".to_string());
        }
        self.state.emit(StateChange::IgnoreListChanged {
            player: player.to_string(),
            ignored: true,
        });
        feedback
    }

    fn unignore(&self, player: &str) -> Vec<String> {
        let mut feedback = vec![format!("Removed from ignore: {}", player)];
        if let Err(e) = self.engine.ignore().remove(player) {
            tracing::error!("Failed to persist ignore list: {}", e);
            feedback.push("Failed to save ignore list.".to_string());
        }
        self.state.emit(StateChange::IgnoreListChanged {
            player: player.to_string(),
            ignored: false,
        });
        feedback
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn engine(&self) -> &Arc<GreetingEngine> {
        &self.engine
    }

    pub fn self_greeter(&self) -> &Arc<SelfGreetScheduler> {
        &self.self_greeter
    }
}

fn reload(state: &StateManager, bank: &MessageBank) {
    let count = bank.reload();
    state.emit(StateChange::MessagesChanged {
        pool: bank.kind(),
        count,
    });
}

fn add(state: &StateManager, bank: &MessageBank, message: &str) -> Vec<String> {
    let kind = bank.kind();

    let feedback = match bank.add(message) {
        Ok(_) => vec![format!("Added new {} message: {}", kind, message)],
        Err(e) => {
            tracing::error!("Failed to write new {} message: {}", kind, e);
            let failure = match kind {
                PoolKind::Welcome => "Failed to save new message.",
                PoolKind::SelfGreet => "Failed to save new self-greet message.",
            };
            vec![failure.to_string()]
        }
    };

    state.emit(StateChange::MessagesChanged {
        pool: kind,
        count: bank.pool_len(),
    });
    feedback
}

/// Static lines shown by `info`
pub fn info_lines() -> Vec<String> {
    vec![
        format!("Welcomer v{}", crate::VERSION),
        "A lightweight join-greeter for anarchy servers".to_string(),
        String::new(),
        format!("GitHub: {}", PROJECT_URL),
        format!("by: {}", AUTHOR),
        "Shoutouts: anarchy.ac • OpenAI • Constantiam".to_string(),
        String::new(),
        "Adjust configs! Defaults are for Constantiam.".to_string(),
    ]
}
