use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_FILE: &str = "taxfilter.toml";

/// Runtime settings: built-in defaults, then an optional settings file, then
/// `TAXFILTER_*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub bind: String,
    /// Lists are identified as `<list_prefix>-<queryId>`.
    pub list_prefix: String,
    pub filter_block: String,
    /// JSON file with the term catalog served by `/v1/options`.
    pub catalog: Option<PathBuf>,
    pub log: String,
}

impl Settings {
    pub fn load(file: Option<&str>) -> Result<Self> {
        let settings = Config::builder()
            .set_default("bind", "127.0.0.1:8080")?
            .set_default("list_prefix", "query")?
            .set_default("filter_block", "ctlt/query-taxonomy-filter")?
            .set_default("log", "info")?
            .add_source(File::with_name(file.unwrap_or(DEFAULT_FILE)).required(file.is_some()))
            .add_source(Environment::with_prefix("TAXFILTER"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
