use crate::domain::ports::DocumentSource;
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str =
    "https://github.com/BoliviaMaes/bolivia-maes/raw/refs/heads/main/bolivia-maes.json";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads the dataset with a single GET. No retries.
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::build(url.into(), None)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::build(url.into(), Some(timeout))
    }

    fn build(url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            url,
            client: builder.build()?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self) -> Result<serde_json::Value> {
        tracing::debug!("Making API request to: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(DirectoryError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        tracing::debug!("Received {} bytes", body.len());
        Ok(serde_json::from_slice(&body)?)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Reads a previously downloaded copy of the dataset.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self) -> Result<serde_json::Value> {
        tracing::debug!("Reading dataset from {}", self.path.display());
        let content = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&content)?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_http_source_returns_document() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/bolivia-maes.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"personas": [], "entidades": []}));
        });

        let source = HttpSource::new(server.url("/bolivia-maes.json")).unwrap();
        let document = source.fetch().await.unwrap();

        api_mock.assert();
        assert!(document["personas"].is_array());
        assert!(document.get("autoridades").is_none());
    }

    #[tokio::test]
    async fn test_http_source_fails_on_error_status() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.json");
            then.status(404);
        });

        let source = HttpSource::new(server.url("/missing.json")).unwrap();
        let err = source.fetch().await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, DirectoryError::HttpStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_http_source_rejects_non_json_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("<html>not json</html>");
        });

        let source = HttpSource::new(server.url("/page")).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/bolivia-maes.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, DirectoryError::Io(_)));
    }
}
