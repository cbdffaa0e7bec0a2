use crate::core::normalizer::normalize;
use crate::core::query::{authorities_of, current_holders};
use crate::core::render::{render, render_history, OutputFormat};
use crate::domain::model::{Directory, ListingRow};
use crate::domain::ports::{DocumentSource, Storage};
use crate::utils::error::{DirectoryError, Result};

/// Fetch, normalize and query, once per run.
pub struct DirectoryEngine<S: DocumentSource> {
    source: S,
}

impl<S: DocumentSource> DirectoryEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> Result<Directory> {
        tracing::info!("Fetching dataset from {}", self.source.location());
        let document = self.source.fetch().await?;

        let directory = normalize(&document)?;
        tracing::info!(
            "Loaded {} persons, {} entities, {} authorities",
            directory.persons.len(),
            directory.entities.len(),
            directory.authorities.len()
        );
        Ok(directory)
    }

    /// Current holder of every entity of `kind`, resolved to owned rows.
    pub async fn listing(&self, kind: &str) -> Result<Vec<ListingRow>> {
        let directory = self.load().await?;
        let listings = current_holders(&directory, kind)?;

        let rows = listings
            .iter()
            .map(|listing| listing.to_row(&directory))
            .collect::<Result<Vec<ListingRow>>>()?;

        let vacant = rows.iter().filter(|row| row.is_vacant()).count();
        if vacant > 0 {
            tracing::warn!("{} of {} positions have no current authority", vacant, rows.len());
        }
        Ok(rows)
    }

    pub async fn render(&self, kind: &str, format: OutputFormat) -> Result<String> {
        let rows = self.listing(kind).await?;
        render(&rows, format)
    }

    /// Every recorded authority of one entity, oldest record first.
    pub async fn history(&self, entity_id: &str) -> Result<String> {
        let directory = self.load().await?;
        let entity = directory
            .entities
            .get(entity_id)
            .ok_or_else(|| DirectoryError::InvalidConfigValue {
                field: "history".to_string(),
                value: entity_id.to_string(),
                reason: "No entity with this identifier in the dataset".to_string(),
            })?;
        let authorities = authorities_of(&directory, entity_id);
        render_history(&directory, entity, &authorities)
    }

    /// Renders the listing and hands it to `storage`; returns where it went.
    pub async fn run<T: Storage>(&self, kind: &str, format: OutputFormat, storage: &T) -> Result<String> {
        let output = self.render(kind, format).await?;
        let filename = format!("gabinete.{}", format.extension());
        tracing::debug!("Writing {} bytes to {}", output.len(), filename);
        storage.write_file(&filename, output.as_bytes()).await
    }
}
