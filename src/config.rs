use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::data::loader::{ColumnMapping, DataSource, Field, LoaderConfig};

/// The published sheet the explorer was built around.
pub const DEFAULT_SOURCE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vSteXbAdUyJFek-Uysk9Jlb4iwF6G51Yt3ThxOHQVmacBjZicJ7NDPKoMCR0uJoGJdPoe8jHvLYqwyC/pub?gid=843924243&single=true&output=csv";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "quran-explorer",
    version,
    about = "Browse Qur'anic verses by main category and topic",
    long_about = "Browse Qur'anic verses by main category and topic.\n\nExamples:\n  quran-explorer\n  quran-explorer ./verses.csv --require category --require topic\n  quran-explorer https://example.com/sheet.csv --timeout 10"
)]
pub struct CliArgs {
    /// CSV file or http(s) URL. Defaults to the published sheet.
    #[arg(value_name = "SOURCE")]
    pub source: Option<String>,

    /// YAML config file (default: ~/.quran-explorer/config.yml if present).
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Drop rows where this field is blank (repeatable).
    #[arg(short = 'r', long = "require", value_name = "FIELD", value_enum)]
    pub require: Vec<Field>,

    /// HTTP timeout in seconds for remote sources.
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

// ---------------------------------------------------------------------------
// Config file
// ---------------------------------------------------------------------------

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub source: Option<String>,
    pub required_fields: Option<Vec<Field>>,
    pub http_timeout_secs: Option<u64>,
    pub columns: Option<ColumnMapping>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".quran-explorer").join("config.yml"))
}

pub fn parse_config(text: &str) -> Result<ConfigFile> {
    // An empty file deserializes to unit, not a map.
    if text.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

/// Read a config file. A missing file is only acceptable when
/// `allow_missing` is set.
pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text)
            .with_context(|| format!("failed to parse config '{}'", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read config '{}'", path.display())),
    }
}

// ---------------------------------------------------------------------------
// Merged settings
// ---------------------------------------------------------------------------

/// Final settings: CLI over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: DataSource,
    pub loader: LoaderConfig,
}

impl Settings {
    pub fn merge(cli: &CliArgs, file: ConfigFile) -> Self {
        let source = cli
            .source
            .as_deref()
            .or(file.source.as_deref())
            .unwrap_or(DEFAULT_SOURCE);

        let required_fields = if cli.require.is_empty() {
            file.required_fields.unwrap_or_default()
        } else {
            cli.require.clone()
        };

        let timeout = cli
            .timeout
            .or(file.http_timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Settings {
            source: DataSource::parse(source),
            loader: LoaderConfig {
                columns: file.columns.unwrap_or_default(),
                required_fields,
                http_timeout: Duration::from_secs(timeout),
            },
        }
    }

    /// Parse the command line and fold in the config file it points at.
    pub fn from_args(cli: &CliArgs) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => load_config(path, false)?,
            None => match default_config_path() {
                Some(path) => load_config(&path, true)?,
                None => ConfigFile::default(),
            },
        };
        Ok(Self::merge(cli, file))
    }
}
