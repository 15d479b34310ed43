use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "slidecast";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seek_step_secs: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osd: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_bar: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `slidecast config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# slidecast configuration\n{yaml}");
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.width" | "defaults.height" => {
                let parsed: i32 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid dimension: {value}"))?;
                if parsed <= 0 {
                    anyhow::bail!("Invalid dimension: {value}. Must be a positive pixel count.");
                }
                if key == "defaults.width" {
                    defaults.width = Some(parsed);
                } else {
                    defaults.height = Some(parsed);
                }
            }
            "defaults.seek_step_secs" => {
                let parsed: f64 = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid seek step: {value}"))?;
                if !parsed.is_finite() || parsed <= 0.0 {
                    anyhow::bail!("Invalid seek step: {value}. Must be a positive number of seconds.");
                }
                defaults.seek_step_secs = Some(parsed);
            }
            "defaults.osd" | "defaults.progress_bar" => {
                let parsed: bool = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid flag: {value}. Must be 'true' or 'false'."))?;
                if key == "defaults.osd" {
                    defaults.osd = Some(parsed);
                } else {
                    defaults.progress_bar = Some(parsed);
                }
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.width, defaults.height, \
                 defaults.seek_step_secs, defaults.osd, defaults.progress_bar"
            ),
        }
        Ok(())
    }
}
