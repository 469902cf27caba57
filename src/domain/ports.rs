use crate::core::deadline::Deadline;
use crate::domain::model::{LookupKey, ProviderName, ProviderPayload};
use crate::utils::error::Result;
use async_trait::async_trait;

/// One upstream postal-code source.
///
/// `Ok(None)` covers every provider-local failure (transport error,
/// non-success status, unparseable body). `Err` is reserved for local
/// defects such as an outbound request that cannot be built.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> ProviderName;

    async fn fetch(&self, key: &LookupKey, deadline: &Deadline)
        -> Result<Option<ProviderPayload>>;
}

pub trait ConfigProvider: Send + Sync {
    fn listen_addr(&self) -> &str;
    fn timeout_ms(&self) -> u64;
    fn brasil_api_url(&self) -> &str;
    fn via_cep_url(&self) -> &str;
}
