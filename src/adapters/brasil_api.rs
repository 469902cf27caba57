use crate::adapters::http::get_json;
use crate::core::deadline::Deadline;
use crate::domain::model::{BrasilApiAddress, LookupKey, ProviderName, ProviderPayload};
use crate::domain::ports::Provider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br/api/cep/v1";

#[derive(Debug, Clone)]
pub struct BrasilApiClient {
    client: Client,
    base_url: String,
}

impl BrasilApiClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, key: &LookupKey) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Provider for BrasilApiClient {
    fn name(&self) -> ProviderName {
        ProviderName::BrasilApi
    }

    async fn fetch(
        &self,
        key: &LookupKey,
        deadline: &Deadline,
    ) -> Result<Option<ProviderPayload>> {
        let url = self.url_for(key);
        let address: Option<BrasilApiAddress> =
            get_json(&self.client, self.name(), &url, deadline).await?;

        Ok(address.map(ProviderPayload::BrasilApi))
    }
}
