use anyhow::{Context, Result};
use pulse_api::DataSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    /// Backend base URL, e.g. "http://localhost:8080/api/v1"
    pub base_url: String,
    /// Use the offline fixture source instead of the backend
    pub use_mocks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSection {
                base_url: "http://localhost:8080/api/v1".to_string(),
                use_mocks: true,
            },
        }
    }
}

impl Config {
    /// Build the data source this run will fetch from. The choice is made
    /// once here and handed down; nothing below consults config again.
    pub fn data_source(&self, force_mock: bool) -> DataSource {
        if force_mock || self.api.use_mocks {
            DataSource::mock()
        } else {
            DataSource::rest(&self.api.base_url)
        }
    }
}

pub fn pulse_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pulse"))
}

pub fn ensure_pulse_home() -> Result<PathBuf> {
    let dir = pulse_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_pulse_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
