use anyhow::{anyhow, Context, Result};
use clogc_model::{Legend, NormalizeRange, StyleName, TimestampSource};
use clogc_render::LayoutMode;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::Cli;

pub const DEFAULT_HOST: &str = "8.8.8.8";
pub const DEFAULT_COLUMNS: u32 = 1;

/// Optional JSON file; every field may be left out.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub col: Option<u32>,
    pub style: Option<StyleName>,
    pub timestamps: Option<TimestampSource>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub legend: Legend,
}

pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {:?}", path))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse config {:?}", path))
}

/// Effective settings: command line over config file over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub layout: LayoutMode,
    pub style: StyleName,
    pub timestamps: TimestampSource,
    pub range: NormalizeRange,
    pub legend: Legend,
    pub plain: bool,
}

impl Settings {
    pub fn resolve(cli: &Cli, file: Option<ConfigFile>) -> Result<Self> {
        let file = file.unwrap_or_default();
        let defaults = NormalizeRange::default();

        let host = cli
            .host
            .clone()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host.trim().to_string();
        if host.is_empty() {
            return Err(anyhow!("host must not be empty"));
        }
        if host.starts_with('-') {
            return Err(anyhow!("host {host:?} looks like a flag"));
        }

        let columns = cli.col.or(file.col).unwrap_or(DEFAULT_COLUMNS);

        Ok(Self {
            host,
            layout: LayoutMode::from_columns(columns),
            style: cli.style.or(file.style).unwrap_or_default(),
            timestamps: cli.timestamps.or(file.timestamps).unwrap_or_default(),
            range: NormalizeRange {
                min: cli.min.or(file.min).unwrap_or(defaults.min),
                max: cli.max.or(file.max).unwrap_or(defaults.max),
            },
            legend: file.legend,
            plain: cli.plain,
        })
    }
}
