use crate::domain::ports::Transport;
use crate::utils::error::TransportError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// reqwest-backed [`Transport`]. Issues a single GET per call, no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        server_url: &str,
        api_code: &str,
        xml: &str,
        timeout: Duration,
    ) -> Result<String, TransportError> {
        tracing::debug!("📡 Sending {} request to {}", api_code, server_url);

        let response = self
            .client
            .get(server_url)
            .query(&[("API", api_code), ("XML", xml)])
            .timeout(timeout)
            .send()
            .await?;

        // 服務以 XML <Error> 回報失敗，狀態碼不另行判斷
        tracing::debug!("📡 {} response status: {}", api_code, response.status());

        let body = response.text().await?;
        tracing::debug!("📡 {} response body: {} bytes", api_code, body.len());

        Ok(body)
    }
}
