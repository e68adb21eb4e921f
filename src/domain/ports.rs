use crate::utils::error::TransportError;
use async_trait::async_trait;
use std::time::Duration;

/// One outbound call carrying `API=<api_code>` and `XML=<xml>` as query parameters.
///
/// Implementations must make exactly one attempt and honour `timeout` as a hard
/// deadline, reporting expiry through [`TransportError::timed_out`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        server_url: &str,
        api_code: &str,
        xml: &str,
        timeout: Duration,
    ) -> Result<String, TransportError>;
}
