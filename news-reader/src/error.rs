use snafu::prelude::*;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AppError {
    #[snafu(display("Invalid value '{value}' for {key}"))]
    InvalidConfig { key: String, value: String },

    #[snafu(display("Failed to read feed {}: {source}", path.display()))]
    ReadFeed { path: PathBuf, source: std::io::Error },

    #[snafu(display("Malformed feed document: {source}"))]
    ParseFeed { source: serde_json::Error },

    #[snafu(display("Failed to set up logging: {message}"))]
    Logging { message: String },

    #[snafu(display("Routing error: {source}"), context(false))]
    Routing { source: news_nexus::Error },
}

pub type Result<T> = std::result::Result<T, AppError>;
