pub mod engine;
pub mod fetcher;
pub mod normalizer;
pub mod query;
pub mod render;

pub use crate::domain::model::{Authority, Directory, Entity, Person};
pub use crate::domain::ports::{ConfigProvider, DocumentSource, Storage};
pub use crate::utils::error::Result;
