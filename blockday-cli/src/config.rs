use anyhow::{Context, Result};
use blockday_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{blockday_home, ensure_blockday_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub output: OutputSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Emit JSON instead of text.
    pub json: bool,
    /// Print the per-day slot grid.
    pub grid: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            json: false,
            grid: true,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(blockday_home()?.join("config.toml"))
}

/// Load from `path`, or the default location. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.engine.validate()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_blockday_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockday_core::SleepOrder;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = parse_config("[engine]\nchunk_minutes = 90\n").unwrap();
        assert_eq!(cfg.engine.chunk_minutes, 90);
        assert_eq!(cfg.engine.sleep_label, "sleep");
        assert!(cfg.output.grid);
    }

    #[test]
    fn sleep_order_is_snake_case() {
        let cfg = parse_config("[engine]\nsleep_order = \"after_tasks\"\n").unwrap();
        assert_eq!(cfg.engine.sleep_order, SleepOrder::AfterTasks);
    }

    #[test]
    fn invalid_chunk_is_rejected() {
        assert!(parse_config("[engine]\nchunk_minutes = 50\n").is_err());
    }

    #[test]
    fn default_roundtrips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        assert_eq!(parse_config(&s).unwrap(), Config::default());
    }
}
