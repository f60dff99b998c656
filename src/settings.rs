//! Layered configuration.
//!
//! Values come from built-in defaults, then a config file (`pinpoint.toml`,
//! `pinpoint.json`, ... in the working directory, or the file named by
//! `PINPOINT_CONFIG`), then `PINPOINT_*` environment variables using `__`
//! between sections (`PINPOINT_SOURCE__USERNAME`). Command-line flags are
//! applied last by the binaries.
use config::{Config, Environment, File};
use serde::Deserialize;

use std::path::{Path, PathBuf};

use crate::error::{PinpointError, Result};
use crate::extract::{ExtractorOptions, MANDATORY_ATTRIBUTES};
use crate::fetch::{CollectionPolicy, Credentials};
use crate::narrow::NarrowingOptions;

pub const CONFIG_ENV: &str = "PINPOINT_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON document backing the data source.
    pub path: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub output: PathBuf,
    /// Collection to fetch when a dataset has several; the first one otherwise.
    pub collection: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self { output: PathBuf::from("data_from_database.csv"), collection: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectSettings {
    pub output: PathBuf,
}

impl Default for SelectSettings {
    fn default() -> Self {
        Self { output: PathBuf::from("attributes_for_simulation.json") }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractSettings {
    pub mandatory: Vec<String>,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self { mandatory: MANDATORY_ATTRIBUTES.iter().map(|a| a.to_string()).collect() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub verbose: bool,
    pub max_refinements: Option<usize>,
    pub source: SourceSettings,
    pub fetch: FetchSettings,
    pub select: SelectSettings,
    pub extract: ExtractSettings,
}

impl Settings {
    /// Loads settings, reading `file` if given (it must then exist), else the
    /// optional default config file.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => match std::env::var(CONFIG_ENV) {
                Ok(path) => builder.add_source(File::with_name(&path).required(true)),
                Err(_) => builder.add_source(File::with_name("pinpoint").required(false)),
            },
        };
        let settings = builder
            .add_source(
                Environment::with_prefix("PINPOINT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;
        Ok(settings)
    }

    pub fn narrowing_options(&self) -> NarrowingOptions {
        NarrowingOptions { verbose: self.verbose, max_refinements: self.max_refinements }
    }

    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions { verbose: self.verbose, mandatory: self.extract.mandatory.clone() }
    }

    pub fn collection_policy(&self) -> CollectionPolicy {
        match &self.fetch.collection {
            Some(name) => CollectionPolicy::Named(name.clone()),
            None => CollectionPolicy::First,
        }
    }

    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.source.username, &self.source.password) {
            (Some(username), Some(password)) => Ok(Credentials::new(username, password)),
            _ => Err(PinpointError::Config(
                "source.username and source.password must be set (PINPOINT_SOURCE__USERNAME, PINPOINT_SOURCE__PASSWORD)"
                    .to_string(),
            )),
        }
    }

    pub fn source_path(&self) -> Result<&Path> {
        self.source
            .path
            .as_deref()
            .ok_or_else(|| PinpointError::Config("source.path is not set (PINPOINT_SOURCE__PATH)".to_string()))
    }
}
