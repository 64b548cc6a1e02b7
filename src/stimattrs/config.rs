use crate::error::{Result, StimulusError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "stimattrs.json";
const DEFAULT_ATTRIBUTE_PREFIX: &str = "data-";

/// Configuration for the `stimattrs` tool, stored in `stimattrs.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StimattrsConfig {
    /// Prefix put in front of every key when rendering HTML attributes
    #[serde(default = "default_attribute_prefix")]
    pub attribute_prefix: String,

    /// Controller name for manifests that do not declare one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
}

fn default_attribute_prefix() -> String {
    DEFAULT_ATTRIBUTE_PREFIX.to_string()
}

impl Default for StimattrsConfig {
    fn default() -> Self {
        Self {
            attribute_prefix: default_attribute_prefix(),
            controller: None,
        }
    }
}

impl StimattrsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: StimattrsConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["attribute-prefix", "controller"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "attribute-prefix" => Some(self.attribute_prefix.clone()),
            "controller" => Some(self.controller.clone().unwrap_or_default()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "attribute-prefix" => {
                // Prefixes always end in a dash unless cleared
                self.attribute_prefix = if value.is_empty() || value.ends_with('-') {
                    value.to_string()
                } else {
                    format!("{}-", value)
                };
                Ok(())
            }
            "controller" => {
                let value = value.trim();
                self.controller = (!value.is_empty()).then(|| value.to_string());
                Ok(())
            }
            _ => Err(StimulusError::Config(format!("Unknown config key: {}", key))),
        }
    }
}
