use crate::utils::error::Result;
use async_trait::async_trait;
use url::Url;

/// Raw HTTP outcome handed to the mapper. Status interpretation (404 as
/// absence, other failures as errors) happens in the lookup client.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn user_agent(&self) -> &str;
    fn batch_size(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn page_size(&self) -> usize;
    fn max_pages(&self) -> usize;
}
