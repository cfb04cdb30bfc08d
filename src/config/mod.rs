pub mod list_file;

use crate::models::WelcomerConfig;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

pub const MESSAGES_FILE: &str = "welcomer_messages.txt";
pub const IGNORE_FILE: &str = "welcomer_ignore.txt";
pub const SELF_MESSAGES_FILE: &str = "welcomer_selfmessages.txt";
pub const SETTINGS_FILE: &str = "welcomer.yaml";

/// Prefix for environment overrides, e.g. `WELCOMER__MODE=hypersafe`
pub const ENV_PREFIX: &str = "WELCOMER";

/// Configuration manager for the welcomer's files.
///
/// Manages four files in one directory:
/// - `welcomer_messages.txt`: welcome templates (`%s` = player name)
/// - `welcomer_ignore.txt`: ignored players, one per line
/// - `welcomer_selfmessages.txt`: first-person self-greet templates
/// - `welcomer.yaml`: start-up settings
///
/// The list files are read and written by the services themselves through
/// [`list_file`]; this type only resolves their locations and owns the settings file.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    messages_path: Utf8PathBuf,
    ignore_path: Utf8PathBuf,
    self_messages_path: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    ///
    /// # Arguments
    /// * `config_dir` - Directory containing configuration files (e.g., "config")
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            messages_path: config_dir.join(MESSAGES_FILE),
            ignore_path: config_dir.join(IGNORE_FILE),
            self_messages_path: config_dir.join(SELF_MESSAGES_FILE),
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from `welcomer.yaml` with `WELCOMER__*` environment overrides.
    ///
    /// Missing keys take their defaults. If the file doesn't exist, the
    /// defaults are written out so the file documents itself.
    pub fn load_settings(&self) -> Result<WelcomerConfig> {
        if let Err(e) = self.ensure_settings_file() {
            tracing::error!("Failed to write default settings: {:#}", e);
        }
        self.read_settings()
    }

    /// Write the default settings file if there is none.
    ///
    /// Returns whether defaults were written.
    pub fn ensure_settings_file(&self) -> Result<bool> {
        if self.settings_path.exists() {
            return Ok(false);
        }
        tracing::warn!(
            "Settings file not found at {}, writing defaults",
            self.settings_path
        );
        self.save_settings(&WelcomerConfig::default())?;
        Ok(true)
    }

    /// Layered read of the settings without touching the file.
    pub fn read_settings(&self) -> Result<WelcomerConfig> {
        let layered = config::Config::builder()
            .add_source(
                config::File::new(self.settings_path.as_str(), config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .keep_prefix(true)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: WelcomerConfig = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save the settings file.
    pub fn save_settings(&self, config: &WelcomerConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    pub fn messages_path(&self) -> &Utf8Path {
        &self.messages_path
    }

    pub fn ignore_path(&self) -> &Utf8Path {
        &self.ignore_path
    }

    pub fn self_messages_path(&self) -> &Utf8Path {
        &self.self_messages_path
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
