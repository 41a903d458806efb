use crate::domain::ports::{ConfigProvider, Transport, TransportResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// [`Transport`] over a shared reqwest client. Timeouts are enforced here;
/// there is no retry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds()))
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.api+json")
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Registry response status: {}", status);

        let body = response.text().await?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LookupConfig;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_get_returns_status_and_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/lei-records")
                .query_param("filter[lei]", "529900T8BM49AURSDO55")
                .header("accept", "application/vnd.api+json");
            then.status(200)
                .header("Content-Type", "application/vnd.api+json")
                .body(r#"{"data":[]}"#);
        });

        let transport = HttpTransport::new(&LookupConfig::default()).unwrap();
        let mut url = Url::parse(&server.url("/lei-records")).unwrap();
        url.query_pairs_mut()
            .append_pair("filter[lei]", "529900T8BM49AURSDO55");

        let response = transport.get(&url).await.unwrap();

        api_mock.assert();
        assert!(response.is_success());
        assert_eq!(response.body, r#"{"data":[]}"#);
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/lei-records");
            then.status(503).body("maintenance");
        });

        let transport = HttpTransport::new(&LookupConfig::default()).unwrap();
        let url = Url::parse(&server.url("/lei-records")).unwrap();

        let response = transport.get(&url).await.unwrap();

        api_mock.assert();
        assert_eq!(response.status, 503);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::new(&LookupConfig::default()).unwrap();
        // port 9 (discard) is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/lei-records").unwrap();

        let err = transport.get(&url).await.unwrap_err();
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Transport);
    }
}
