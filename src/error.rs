use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Url error: {0}")]
    Url(String),
    #[error("Navigation error: {0}")]
    Navigation(String),
    #[error("Catalog error: {0}")]
    Catalog(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;

// Helper conversions
impl From<config::ConfigError> for FilterError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<url::ParseError> for FilterError {
    fn from(e: url::ParseError) -> Self { Self::Url(e.to_string()) }
}
impl From<serde_json::Error> for FilterError {
    fn from(e: serde_json::Error) -> Self { Self::Catalog(e.to_string()) }
}
