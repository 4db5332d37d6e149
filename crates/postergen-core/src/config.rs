use crate::error::{Error, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081/api";
pub const DEFAULT_FILE_BASE_URL: &str = "http://localhost:8081";
pub const ENV_API_BASE_URL: &str = "POSTERGEN_API_URL";
pub const ENV_FILE_BASE_URL: &str = "POSTERGEN_FILE_URL";

/// Runtime configuration resolved from environment and optional config file.
///
/// `api_base_url` points at the backend API root; `file_base_url` is the
/// origin serving generated artifacts.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub file_base_url: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    file_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigDoctor {
    pub api_base_url: String,
    pub file_base_url: String,
    pub source: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let file_path = config_path();
        let file_config = file_path
            .as_ref()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|contents| toml::from_str::<ConfigFile>(&contents))
            .transpose()
            .map_err(|err| Error::InvalidConfig(format!("config parse error: {err}")))?;

        Ok(Self::resolve(
            std::env::var(ENV_API_BASE_URL).ok(),
            std::env::var(ENV_FILE_BASE_URL).ok(),
            file_config.as_ref(),
        ))
    }

    // Precedence: environment, then config file, then defaults. Blank
    // values fall through to the default.
    fn resolve(
        env_api: Option<String>,
        env_file: Option<String>,
        file_config: Option<&ConfigFile>,
    ) -> Self {
        let api_base_url = env_api
            .or_else(|| file_config.and_then(|c| c.api_base_url.clone()))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let file_base_url = env_file
            .or_else(|| file_config.and_then(|c| c.file_base_url.clone()))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_BASE_URL.to_string());

        Self {
            api_base_url,
            file_base_url,
        }
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = config_path() else {
            return Err(Error::InvalidConfig(
                "unable to determine config directory".into(),
            ));
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::InvalidConfig(format!("failed to create config dir: {err}"))
            })?;
        }
        let file_config = ConfigFile {
            api_base_url: Some(self.api_base_url.clone()),
            file_base_url: Some(self.file_base_url.clone()),
        };
        let serialized = toml::to_string_pretty(&file_config)
            .map_err(|err| Error::InvalidConfig(format!("failed to serialize config: {err}")))?;
        fs::write(&path, serialized)
            .map_err(|err| Error::InvalidConfig(format!("failed to write config: {err}")))?;
        Ok(())
    }

    pub fn doctor(&self) -> ConfigDoctor {
        let source = if std::env::var(ENV_API_BASE_URL).is_ok()
            || std::env::var(ENV_FILE_BASE_URL).is_ok()
        {
            "environment".to_string()
        } else {
            "config file / defaults".to_string()
        };
        ConfigDoctor {
            api_base_url: self.api_base_url.clone(),
            file_base_url: self.file_base_url.clone(),
            source,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            file_base_url: DEFAULT_FILE_BASE_URL.to_string(),
        }
    }
}

fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("postergen").join("config.toml"))
}
