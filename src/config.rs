use anyhow::Result;
use holomenu_ui3d::MenuSettings;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/holomenu.toml";

/// Everything the demo binary reads from disk.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub menu: MenuSettings,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Ticks to simulate before shutting down.
    pub ticks: u64,
    /// Pace ticks at 20 TPS instead of running flat out.
    pub realtime: bool,
    /// Degrees the anchor turns on every sync pass (0 keeps it still).
    pub spin_degrees: f32,
    /// Ticks between scripted presses by the owner.
    pub press_every_ticks: u64,
    /// Where published interactions are logged as JSON lines.
    pub event_log: Option<PathBuf>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 400,
            realtime: false,
            spin_degrees: 15.0,
            press_every_ticks: 40,
            event_log: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Config not found at {}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
