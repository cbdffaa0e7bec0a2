pub mod cli;
pub mod toml_config;

use crate::core::fetcher::{FileSource, HttpSource, DEFAULT_SOURCE_URL};
use crate::core::query::MINISTRY_KIND;
use crate::core::render::OutputFormat;
use crate::core::ConfigProvider;
use crate::domain::ports::DocumentSource;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "bolivia-gabinete")]
#[command(about = "Lists the current ministers of Bolivia's executive branch")]
pub struct CliConfig {
    /// URL of the bolivia-maes JSON dataset
    #[arg(long)]
    pub source_url: Option<String>,

    /// Read a local copy of the dataset instead of downloading it
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Entity kind to list
    #[arg(long)]
    pub kind: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the listing into this directory instead of stdout
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print every recorded authority of one entity
    #[arg(long, value_name = "ENTITY_ID")]
    pub history: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Command-line flags win over the config file, which wins over defaults.
    pub fn resolve(&self) -> Result<DirectoryConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        Ok(DirectoryConfig::from_toml(file).with_overrides(self))
    }
}

/// Settings for one run after merging every configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub source_url: String,
    pub input_file: Option<String>,
    pub output_path: Option<String>,
    pub format: OutputFormat,
    pub kind: String,
    pub timeout_secs: Option<u64>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            input_file: None,
            output_path: None,
            format: OutputFormat::Text,
            kind: MINISTRY_KIND.to_string(),
            timeout_secs: None,
        }
    }
}

impl DirectoryConfig {
    pub fn from_toml(file: TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            source_url: file.source.url.unwrap_or(defaults.source_url),
            input_file: file.source.input_file,
            output_path: file.output.path,
            format: file.output.format.unwrap_or(defaults.format),
            kind: file.query.kind.unwrap_or(defaults.kind),
            timeout_secs: file.source.timeout_seconds,
        }
    }

    #[cfg(feature = "cli")]
    fn with_overrides(mut self, cli: &CliConfig) -> Self {
        if let Some(url) = &cli.source_url {
            self.source_url = url.clone();
        }
        if let Some(input) = &cli.input {
            self.input_file = Some(input.clone());
        }
        if let Some(output) = &cli.output {
            self.output_path = Some(output.clone());
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(kind) = &cli.kind {
            self.kind = kind.clone();
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = Some(timeout);
        }
        self
    }

    /// A local input file takes precedence over the URL.
    pub fn source(&self) -> Result<Box<dyn DocumentSource>> {
        if let Some(path) = &self.input_file {
            return Ok(Box::new(FileSource::new(path)));
        }
        let source = match self.timeout_secs {
            Some(secs) => HttpSource::with_timeout(&self.source_url, Duration::from_secs(secs))?,
            None => HttpSource::new(&self.source_url)?,
        };
        Ok(Box::new(source))
    }
}

impl ConfigProvider for DirectoryConfig {
    fn source_url(&self) -> &str {
        &self.source_url
    }

    fn input_file(&self) -> Option<&str> {
        self.input_file.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn timeout_secs(&self) -> Option<u64> {
        self.timeout_secs
    }
}

impl Validate for DirectoryConfig {
    fn validate(&self) -> Result<()> {
        match self.input_file() {
            Some(path) => validation::validate_path("input", path)?,
            None => validation::validate_url("source_url", self.source_url())?,
        }
        if let Some(path) = self.output_path() {
            validation::validate_path("output", path)?;
        }
        validation::validate_non_empty_string("kind", self.kind())?;
        if let Some(timeout) = self.timeout_secs() {
            validation::validate_positive_number("timeout_secs", timeout, 1)?;
        }
        Ok(())
    }
}
