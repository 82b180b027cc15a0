//! Data source for the amphibian list.

use async_trait::async_trait;

use crate::client::AmphibiansClient;
use crate::config::ClientConfig;
use crate::error::FetchError;
use crate::transport::{Transport, UreqTransport};
use crate::types::Amphibian;

#[async_trait]
pub trait AmphibiansRepository: Send + Sync {
    /// Fetch the full list in server order. One call, one request.
    async fn fetch_all(&self) -> Result<Vec<Amphibian>, FetchError>;
}

/// Repository backed by the remote API. Returns the parsed list unchanged.
pub struct NetworkAmphibiansRepository<T = UreqTransport> {
    client: AmphibiansClient,
    transport: T,
}

impl<T: Transport> NetworkAmphibiansRepository<T> {
    pub fn new(client: AmphibiansClient, transport: T) -> Self {
        Self { client, transport }
    }
}

impl NetworkAmphibiansRepository<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(
            AmphibiansClient::new(&config.base_url),
            UreqTransport::new(config.timeout),
        )
    }
}

#[async_trait]
impl<T: Transport> AmphibiansRepository for NetworkAmphibiansRepository<T> {
    async fn fetch_all(&self) -> Result<Vec<Amphibian>, FetchError> {
        let request = self.client.build_list_amphibians();
        let response = self.transport.execute(request).await?;
        let amphibians = self.client.parse_list_amphibians(response)?;
        tracing::debug!(count = amphibians.len(), "fetched amphibians");
        Ok(amphibians)
    }
}
