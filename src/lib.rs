pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{cli::LocalStorage, DirectoryConfig};
pub use crate::core::{
    engine::DirectoryEngine,
    fetcher::{FileSource, HttpSource, DEFAULT_SOURCE_URL},
    normalizer::normalize,
    query::{current_holders, ministries},
    render::OutputFormat,
};
pub use crate::domain::model::{Directory, ListingRow, MinistryListing};
pub use crate::utils::error::{DirectoryError, Result};
