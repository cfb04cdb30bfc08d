//! Integration tests for the `/welcomer` command surface
//!
//! Commands are executed against a fully wired greeter and their effects are
//! checked on the engine, the state and the files on disk.

mod common;

use common::harness;
use std::fs;
use std::time::{Duration, Instant};
use welcomer::{Command, Mode, StateChange};

#[test]
fn test_toggle_controls_greeting() {
    let mut h = harness(&["Hi %s!"]);

    assert_eq!(h.controller.handle_line("/welcomer toggle"), vec!["Welcomer is now: OFF"]);
    h.engine.handle_join("Alice");
    assert!(h.sent().is_empty());

    assert_eq!(h.controller.handle_line("/welcomer toggle"), vec!["Welcomer is now: ON"]);
    h.engine.handle_join("Alice");
    assert_eq!(h.sent(), vec!["Hi Alice!"]);
}

#[test]
fn test_status_reflects_every_toggle() {
    let h = harness(&["Hi %s!"]);

    h.controller.handle_line("selfgreet toggle");
    h.controller.handle_line("mode constantiam");

    assert_eq!(
        h.controller.handle_line("/welcomer status"),
        vec!["Welcomer: ON | Self-greet: ON | Mode: CONSTANTIAM"]
    );
}

#[test]
fn test_ignore_persists_sorted() {
    let h = harness(&["Hi %s!"]);

    h.controller.handle_line("/welcomer ignore zed");
    h.controller.handle_line("/welcomer ignore Alex");
    h.controller.handle_line("/welcomer ignore \"bob the builder\"");

    let content = fs::read_to_string(h.config.ignore_path()).unwrap();
    assert_eq!(content, "Alex\nbob the builder\nzed\n");

    assert_eq!(
        h.controller.handle_line("/welcomer unignore zed"),
        vec!["Removed from ignore: zed"]
    );
    let content = fs::read_to_string(h.config.ignore_path()).unwrap();
    assert_eq!(content, "Alex\nbob the builder\n");
}

#[test]
fn test_ignore_command_blocks_greeting() {
    let mut h = harness(&["Hi %s!"]);

    assert_eq!(h.controller.handle_line("ignore Notch"), vec!["Now ignoring Notch"]);
    h.engine.handle_join("Notch");
    h.engine.handle_join("notch");

    // Case-sensitive: only the exact name is ignored
    assert_eq!(h.sent(), vec!["Hi notch!"]);
}

#[test]
fn test_mode_switch_uses_configured_durations() {
    let mut settings = welcomer::WelcomerSettings::default();
    settings.mode_durations.insert(
        Mode::Constantiam,
        welcomer::models::ModeDurations {
            per_player_secs: 30,
            global_secs: 10,
        },
    );
    let mut h = common::harness_with(&["Hi %s!"], &["I made it!"], settings);

    assert_eq!(
        h.controller.handle_line("mode constantiam"),
        vec!["Server mode set to CONSTANTIAM"]
    );

    let t0 = Instant::now();
    assert!(h.engine.handle_join_at("P1", t0).is_delivered());
    assert!(!h.engine.handle_join_at("P2", t0 + Duration::from_secs(9)).is_delivered());
    assert!(h.engine.handle_join_at("P2", t0 + Duration::from_secs(11)).is_delivered());
    assert_eq!(h.sent().len(), 2);
}

#[test]
fn test_config_add_is_drawn_next_and_survives_reload() {
    let mut h = harness(&["Hi %s!"]);
    let t0 = Instant::now();

    // Empty the queue so the added template is the only one left in it
    h.engine.handle_join_at("P1", t0);
    h.sent();

    assert_eq!(
        h.controller.handle_line("/welcomer config add Yo %s, welcome back"),
        vec!["Added new welcome message: Yo %s, welcome back"]
    );
    h.engine.handle_join_at("P2", t0);
    assert_eq!(h.sent(), vec!["Yo P2, welcome back"]);

    assert_eq!(
        h.controller.handle_line("config reload"),
        vec!["Welcome messages reloaded!"]
    );
    assert_eq!(h.engine.bank().pool_len(), 2);
}

#[test]
fn test_config_reload_picks_up_edits() {
    let mut h = harness(&["Hi %s!"]);
    fs::write(h.config.messages_path(), "# edited\nHowdy %s\n").unwrap();

    h.controller.handle_line("config reload");
    h.engine.handle_join("Alice");

    assert_eq!(h.sent(), vec!["Howdy Alice"]);
}

#[test]
fn test_config_addself_appends_to_self_file() {
    let h = harness(&["Hi %s!"]);

    assert_eq!(
        h.controller.handle_line("config addself back again"),
        vec!["Added new self-greet message: back again"]
    );

    let content = fs::read_to_string(h.config.self_messages_path()).unwrap();
    assert!(content.ends_with("back again\n"));
    assert!(h.self_greeter.bank().templates().contains(&"back again".to_string()));
}

#[test]
fn test_commands_emit_events() {
    let h = harness(&["Hi %s!"]);
    let mut rx = h.state.subscribe();

    h.controller.execute(Command::SetMode(Mode::Hypersafe));
    h.controller.execute(Command::Ignore("Notch".to_string()));

    assert!(matches!(
        rx.try_recv().unwrap(),
        StateChange::ModeChanged {
            mode: Mode::Hypersafe,
            ..
        }
    ));
    assert_eq!(
        rx.try_recv().unwrap(),
        StateChange::IgnoreListChanged {
            player: "Notch".to_string(),
            ignored: true
        }
    );
}

#[test]
fn test_info_lines() {
    let h = harness(&["Hi %s!"]);

    let lines = h.controller.handle_line("/welcomer info");

    assert_eq!(lines[0], format!("Welcomer v{}", welcomer::VERSION));
    assert!(lines.iter().any(|l| l.contains("github.com")));
}
