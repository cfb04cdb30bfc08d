//! Shared fixture wiring the greeter the way the binary does, over a temp dir

#![allow(dead_code)]

use camino::Utf8PathBuf;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use welcomer::services::{
    ChannelSink, CooldownPolicy, IgnoreRegistry, MessageBank, PoolKind, SelfGreetTiming,
};
use welcomer::{
    CommandController, ConfigManager, GreetingEngine, MessageSink, Metrics, SelfGreetScheduler,
    StateManager, WelcomerSettings,
};

pub struct Harness {
    pub _temp_dir: TempDir,
    pub config_path: Utf8PathBuf,
    pub config: ConfigManager,
    pub state: StateManager,
    pub metrics: Arc<Metrics>,
    pub engine: Arc<GreetingEngine>,
    pub self_greeter: Arc<SelfGreetScheduler>,
    pub controller: CommandController,
    pub outbound: UnboundedReceiver<String>,
}

impl Harness {
    /// Drain everything sent so far
    pub fn sent(&mut self) -> Vec<String> {
        let mut sent = Vec::new();
        while let Ok(message) = self.outbound.try_recv() {
            sent.push(message);
        }
        sent
    }
}

pub fn create_test_config_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, config_path)
}

/// Greeter with greeting enabled and the given welcome templates on disk
pub fn harness(welcome: &[&str]) -> Harness {
    harness_with(welcome, &["I made it!"], WelcomerSettings::default())
}

pub fn harness_with(welcome: &[&str], self_messages: &[&str], settings: WelcomerSettings) -> Harness {
    let (temp_dir, config_path) = create_test_config_dir();
    let config = ConfigManager::new(&config_path).unwrap();

    if !welcome.is_empty() {
        fs::write(config.messages_path(), welcome.join("\n")).unwrap();
    }
    if !self_messages.is_empty() {
        fs::write(config.self_messages_path(), self_messages.join("\n")).unwrap();
    }

    let state = StateManager::from_settings(&settings);
    state.set_enabled(true);

    let metrics = Arc::new(Metrics::new());
    let (sink, outbound) = ChannelSink::new();
    let sink: Arc<dyn MessageSink> = Arc::new(sink);

    let engine = Arc::new(GreetingEngine::new(
        state.clone(),
        MessageBank::load(config.messages_path(), PoolKind::Welcome),
        IgnoreRegistry::load(config.ignore_path()),
        CooldownPolicy::new(),
        Arc::clone(&sink),
        Arc::clone(&metrics),
    ));

    let self_greeter = Arc::new(SelfGreetScheduler::new(
        state.clone(),
        MessageBank::load(config.self_messages_path(), PoolKind::SelfGreet),
        SelfGreetTiming::from_settings(&settings),
        sink,
        Arc::clone(&metrics),
    ));

    let controller = CommandController::new(
        state.clone(),
        Arc::clone(&engine),
        Arc::clone(&self_greeter),
        settings,
    );

    Harness {
        _temp_dir: temp_dir,
        config_path,
        config,
        state,
        metrics,
        engine,
        self_greeter,
        controller,
        outbound,
    }
}
