use crate::utils::error::Result;
use async_trait::async_trait;

/// Where the raw dataset document comes from.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<serde_json::Value>;

    /// Human readable location, used in logs.
    fn location(&self) -> String;
}

#[async_trait]
impl<T: DocumentSource + ?Sized> DocumentSource for Box<T> {
    async fn fetch(&self) -> Result<serde_json::Value> {
        (**self).fetch().await
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn input_file(&self) -> Option<&str>;
    fn output_path(&self) -> Option<&str>;
    fn kind(&self) -> &str;
    fn timeout_secs(&self) -> Option<u64>;
}
