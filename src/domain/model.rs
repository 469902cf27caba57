use serde::{Deserialize, Serialize};
use std::fmt;

/// Postal code as supplied by the caller. Never validated locally; each
/// provider rejects malformed codes through its own HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LookupKey {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LookupKey {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderName {
    #[serde(rename = "BrasilAPI")]
    BrasilApi,
    #[serde(rename = "ViaCep")]
    ViaCep,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::BrasilApi => "BrasilAPI",
            ProviderName::ViaCep => "ViaCep",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Coordinates,
}

/// Address as returned by `brasilapi.com.br/api/cep/v1/{cep}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrasilApiAddress {
    pub cep: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub service: String,
    pub location: Location,
}

/// Address as returned by `viacep.com.br/ws/{cep}/json/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaCepAddress {
    pub cep: String,
    pub logradouro: String,
    pub complemento: String,
    pub unidade: String,
    pub bairro: String,
    pub localidade: String,
    pub uf: String,
    pub estado: String,
    pub regiao: String,
    pub ibge: String,
    pub gia: String,
    pub ddd: String,
    pub siafi: String,
    #[serde(skip_serializing)]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepAddress {
    /// ViaCep answers unknown codes with `200 {"erro": true}`.
    pub fn is_not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        }
    }
}

/// A single provider's answer, tagged with the provider that produced it.
/// Serializes as the provider's own fields plus an `api` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "api")]
pub enum ProviderPayload {
    #[serde(rename = "BrasilAPI")]
    BrasilApi(BrasilApiAddress),
    #[serde(rename = "ViaCep")]
    ViaCep(ViaCepAddress),
}

impl ProviderPayload {
    pub fn source(&self) -> ProviderName {
        match self {
            ProviderPayload::BrasilApi(_) => ProviderName::BrasilApi,
            ProviderPayload::ViaCep(_) => ProviderName::ViaCep,
        }
    }

    pub fn cep(&self) -> &str {
        match self {
            ProviderPayload::BrasilApi(address) => &address.cep,
            ProviderPayload::ViaCep(address) => &address.cep,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Resolved(ProviderPayload),
    TimedOut,
}

impl LookupOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, LookupOutcome::Resolved(_))
    }

    pub fn payload(&self) -> Option<&ProviderPayload> {
        match self {
            LookupOutcome::Resolved(payload) => Some(payload),
            LookupOutcome::TimedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_with_provider_tag() {
        let payload = ProviderPayload::ViaCep(ViaCepAddress {
            cep: "01001-000".to_string(),
            localidade: "São Paulo".to_string(),
            uf: "SP".to_string(),
            ..Default::default()
        });

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["api"], "ViaCep");
        assert_eq!(json["localidade"], "São Paulo");
        assert!(json.get("erro").is_none());
        assert!(json.get("city").is_none());
    }

    #[test]
    fn test_brasil_api_body_tolerates_missing_fields() {
        let body = r#"{"cep":"01001000","state":"SP","city":"São Paulo","location":{"type":"Point","coordinates":{}}}"#;
        let address: BrasilApiAddress = serde_json::from_str(body).unwrap();

        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.location.kind, "Point");
        assert!(address.location.coordinates.latitude.is_none());
        assert!(address.street.is_empty());
    }

    #[test]
    fn test_via_cep_not_found_marker() {
        let address: ViaCepAddress = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(address.is_not_found());

        let address: ViaCepAddress = serde_json::from_str(r#"{"erro": "true"}"#).unwrap();
        assert!(address.is_not_found());

        let address: ViaCepAddress = serde_json::from_str(r#"{"cep": "01001-000"}"#).unwrap();
        assert!(!address.is_not_found());
    }

    #[test]
    fn test_source_matches_variant() {
        let payload = ProviderPayload::BrasilApi(BrasilApiAddress::default());
        assert_eq!(payload.source(), ProviderName::BrasilApi);
        assert_eq!(payload.source().to_string(), "BrasilAPI");
    }
}
