use crate::config::settings::UspsSettings;
use crate::config::ClientConfig;
use crate::core::envelope::{self, Params};
use crate::core::extractor;
use crate::core::facade;
use crate::core::operation::Operation;
use crate::core::transport::HttpTransport;
use crate::core::xml_tree::{self, XmlNode};
use crate::domain::model::{Address, CityState, RateRequest, VerifiedAddress, ZipLookupAddress};
use crate::domain::ports::Transport;
use crate::utils::error::{ErrorContext, Phase, Result, UspsError};
use std::sync::Arc;

/// USPS Web Tools client.
///
/// Holds only read-only configuration and a transport handle, so one client
/// can serve any number of concurrent calls. Each call makes exactly one
/// request and resolves once, with either a result or an error.
#[derive(Debug, Clone)]
pub struct UspsClient<T: Transport = HttpTransport> {
    config: Arc<ClientConfig>,
    transport: T,
}

impl UspsClient<HttpTransport> {
    /// 建立客戶端；缺少 server_url 或 user_id 時立即失敗
    pub fn new(server_url: impl Into<String>, user_id: impl Into<String>) -> Result<Self> {
        Ok(Self::with_config(ClientConfig::new(server_url, user_id)?))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }

    pub fn from_settings(settings: UspsSettings) -> Result<Self> {
        Ok(Self::with_config(settings.into_client_config()?))
    }
}

impl<T: Transport> UspsClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run one operation through the full pipeline and return the extracted node.
    pub async fn call(&self, operation: Operation, params: &Params) -> Result<XmlNode> {
        let api = operation.api_code();

        let xml = envelope::build(operation.request_root(), self.config.user_id(), params)
            .map_err(|source| UspsError::Envelope {
                operation: api,
                source,
            })?;

        tracing::debug!("Calling {} ({} byte envelope)", api, xml.len());

        let body = self
            .transport
            .send(self.config.server_url(), api, &xml, self.config.timeout())
            .await
            .map_err(|source| UspsError::Transport {
                context: ErrorContext::new(api, Phase::Request),
                source,
            })?;

        let tree = xml_tree::parse(&body).map_err(|source| UspsError::Parse {
            context: ErrorContext::new(api, Phase::XmlParse),
            source,
        })?;

        extractor::extract(api, &tree, operation.result_path()).cloned()
    }

    /// Standardize an address. `street2` comes back empty when the service has none.
    pub async fn verify(&self, address: &Address) -> Result<VerifiedAddress> {
        let node = self
            .call(Operation::Verify, &facade::verify_params(address))
            .await?;
        facade::reshape_verified(&node)
    }

    /// Look up the ZIP+4 for an address; `zip` is returned as `ZIP5-ZIP4`.
    pub async fn zip_code_lookup(&self, address: &Address) -> Result<ZipLookupAddress> {
        let node = self
            .call(Operation::ZipCodeLookup, &facade::zip_code_lookup_params(address))
            .await?;
        facade::reshape_zip_lookup(&node)
    }

    pub async fn city_state_lookup(&self, zip: &str) -> Result<CityState> {
        let node = self
            .call(Operation::CityStateLookup, &facade::city_state_lookup_params(zip))
            .await?;
        facade::reshape_city_state(&node)
    }

    /// Domestic rates (RateV4). The response node is returned unchanged.
    pub async fn rates(&self, request: &RateRequest) -> Result<XmlNode> {
        self.call(Operation::RateV4, &facade::rate_params(request))
            .await
    }
}
