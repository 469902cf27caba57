use crate::core::deadline::Deadline;
use crate::domain::model::ProviderName;
use crate::utils::error::{LookupError, Result};
use reqwest::{Client, Request};
use serde::de::DeserializeOwned;

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(concat!("cep-race/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Single GET bound to `deadline`.
///
/// Only a request that cannot be built is an error. Transport failures,
/// non-success statuses, bodies that do not decode into `T` and an ended
/// deadline all come back as `Ok(None)`.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: ProviderName,
    url: &str,
    deadline: &Deadline,
) -> Result<Option<T>> {
    let request = client
        .get(url)
        .timeout(deadline.remaining())
        .build()
        .map_err(|e| {
            LookupError::internal(
                provider.as_str(),
                format!("cannot build request for {}: {}", url, e),
            )
        })?;

    tracing::debug!("{} request: GET {}", provider, url);

    tokio::select! {
        _ = deadline.expired() => {
            tracing::debug!("{} request abandoned, deadline ended", provider);
            Ok(None)
        }
        decoded = execute(client, request, provider) => Ok(decoded),
    }
}

async fn execute<T: DeserializeOwned>(
    client: &Client,
    request: Request,
    provider: ProviderName,
) -> Option<T> {
    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("{} transport error: {}", provider, e);
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("{} responded with status {}", provider, status);
        return None;
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("{} body could not be read: {}", provider, e);
            return None;
        }
    };

    decode_object(provider, &body)
}

/// Decodes `body` into `T` only when it is a JSON object. serde would also
/// accept an array for a struct, which no provider sends for an address.
fn decode_object<T: DeserializeOwned>(provider: ProviderName, body: &[u8]) -> Option<T> {
    let object = match serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body) {
        Ok(object) => object,
        Err(e) => {
            tracing::debug!("{} body is not a JSON object: {}", provider, e);
            return None;
        }
    };

    match serde_json::from_value::<T>(serde_json::Value::Object(object)) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::debug!("{} body is not a valid payload: {}", provider, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deadline::DeadlineGovernor;
    use crate::domain::model::{BrasilApiAddress, ViaCepAddress};
    use httpmock::prelude::*;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_array_bodies_are_rejected() {
        assert!(decode_object::<BrasilApiAddress>(ProviderName::BrasilApi, b"[]").is_none());
        assert!(decode_object::<ViaCepAddress>(ProviderName::ViaCep, b"[\"x\"]").is_none());
        assert!(decode_object::<BrasilApiAddress>(ProviderName::BrasilApi, b"\"01001000\"").is_none());
    }

    #[test]
    fn test_object_body_is_decoded() {
        let address: BrasilApiAddress =
            decode_object(ProviderName::BrasilApi, br#"{"cep":"01001000","city":"S\u00e3o Paulo"}"#)
                .unwrap();
        assert_eq!(address.cep, "01001000");
        assert_eq!(address.city, "São Paulo");
    }

    #[tokio::test]
    async fn test_get_json_yields_nothing_for_array_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/cep/v1/01001000");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body("[]");
            })
            .await;

        let (deadline, _guard) =
            DeadlineGovernor::with_deadline(&CancellationToken::new(), Duration::from_secs(2));
        let decoded: Option<BrasilApiAddress> = get_json(
            &Client::new(),
            ProviderName::BrasilApi,
            &server.url("/api/cep/v1/01001000"),
            &deadline,
        )
        .await
        .unwrap();

        assert!(decoded.is_none());
    }
}
