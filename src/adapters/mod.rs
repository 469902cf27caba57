// Adapters layer: concrete providers over HTTP.

pub mod brasil_api;
pub mod http;
pub mod via_cep;

use crate::domain::ports::{ConfigProvider, Provider};
use reqwest::Client;
use std::sync::Arc;

pub use brasil_api::BrasilApiClient;
pub use via_cep::ViaCepClient;

/// Both providers, sharing one connection pool.
pub fn build_providers<C: ConfigProvider + ?Sized>(
    config: &C,
    client: Client,
) -> Vec<Arc<dyn Provider>> {
    vec![
        Arc::new(BrasilApiClient::new(client.clone(), config.brasil_api_url())),
        Arc::new(ViaCepClient::new(client, config.via_cep_url())),
    ]
}
