use crate::adapters::http::get_json;
use crate::core::deadline::Deadline;
use crate::domain::model::{LookupKey, ProviderName, ProviderPayload, ViaCepAddress};
use crate::domain::ports::Provider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br/ws";

#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, key: &LookupKey) -> String {
        format!("{}/{}/json/", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl Provider for ViaCepClient {
    fn name(&self) -> ProviderName {
        ProviderName::ViaCep
    }

    async fn fetch(
        &self,
        key: &LookupKey,
        deadline: &Deadline,
    ) -> Result<Option<ProviderPayload>> {
        let url = self.url_for(key);
        let address: Option<ViaCepAddress> =
            get_json(&self.client, self.name(), &url, deadline).await?;

        Ok(address
            .filter(|address| {
                if address.is_not_found() {
                    tracing::debug!("ViaCep has no address for {}", key);
                }
                !address.is_not_found()
            })
            .map(ProviderPayload::ViaCep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadline::DeadlineGovernor;
    use httpmock::prelude::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_url_appends_json_suffix() {
        let client = ViaCepClient::new(Client::new(), "https://viacep.com.br/ws");
        assert_eq!(
            client.url_for(&"01001000".into()),
            "https://viacep.com.br/ws/01001000/json/"
        );
    }

    #[tokio::test]
    async fn test_fetch_tags_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(200).json_body(serde_json::json!({
                    "cep": "01001-000",
                    "logradouro": "Praça da Sé",
                    "complemento": "lado ímpar",
                    "bairro": "Sé",
                    "localidade": "São Paulo",
                    "uf": "SP",
                    "ibge": "3550308",
                    "gia": "1004",
                    "ddd": "11",
                    "siafi": "7107"
                }));
            })
            .await;

        let client = ViaCepClient::new(Client::new(), server.url("/ws"));
        let (deadline, _guard) =
            DeadlineGovernor::with_deadline(&CancellationToken::new(), Duration::from_secs(2));

        let payload = client.fetch(&"01001000".into(), &deadline).await.unwrap().unwrap();

        assert_eq!(payload.source(), ProviderName::ViaCep);
        assert_eq!(payload.cep(), "01001-000");
    }

    #[tokio::test]
    async fn test_erro_body_is_not_an_address() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/99999999/json/");
                then.status(200).json_body(serde_json::json!({"erro": true}));
            })
            .await;

        let client = ViaCepClient::new(Client::new(), server.url("/ws"));
        let (deadline, _guard) =
            DeadlineGovernor::with_deadline(&CancellationToken::new(), Duration::from_secs(2));

        let payload = client.fetch(&"99999999".into(), &deadline).await.unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_fetch_aborts_when_deadline_ends() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/ws/01001000/json/");
                then.status(200)
                    .delay(Duration::from_secs(5))
                    .json_body(serde_json::json!({"cep": "01001-000"}));
            })
            .await;

        let client = ViaCepClient::new(Client::new(), server.url("/ws"));
        let (deadline, _guard) =
            DeadlineGovernor::with_deadline(&CancellationToken::new(), Duration::from_millis(100));

        let started = std::time::Instant::now();
        let payload = client.fetch(&"01001000".into(), &deadline).await.unwrap();

        assert!(payload.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
