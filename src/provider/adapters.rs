//! Per-backend response shapes and their conversion into [`LookupRecord`].
//!
//! # Responsibilities
//! - Model each backend's JSON body as its own record type
//! - Convert that record into the shared [`LookupRecord`] with a pure function
//!
//! # Design Decisions
//! - Every field is optional; a decodable body with gaps is still a success
//! - Only a body that is not the expected JSON shape is a decode failure

use serde::{Deserialize, Serialize};

use crate::provider::types::{non_empty, LookupError, LookupRecord};

/// Response shape understood by a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// viacep.com.br
    ViaCep,
    /// apicep.com
    ApiCep,
}

impl ProviderKind {
    /// Display name used when no explicit name is configured.
    pub fn default_name(self) -> &'static str {
        match self {
            ProviderKind::ViaCep => "ViaCEP",
            ProviderKind::ApiCep => "ApiCEP",
        }
    }

    /// Public endpoint template for this backend.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            ProviderKind::ViaCep => "https://viacep.com.br/ws/{cep}/json/",
            ProviderKind::ApiCep => "https://cdn.apicep.com/file/apicep/{cep_hyphenated}.json",
        }
    }

    /// Decode a response body into a normalized record.
    pub fn decode(self, provider: &str, body: &[u8]) -> Result<LookupRecord, LookupError> {
        let decoded = match self {
            ProviderKind::ViaCep => {
                serde_json::from_slice::<ViaCepResponse>(body).map(|r| r.into_record(provider))
            }
            ProviderKind::ApiCep => {
                serde_json::from_slice::<ApiCepResponse>(body).map(|r| r.into_record(provider))
            }
        };

        decoded.map_err(|source| LookupError::Decode {
            provider: provider.to_string(),
            source,
        })
    }
}

/// ViaCEP body.
///
/// Unknown CEPs come back as `200 {"erro": true}` (older deployments send
/// the string `"true"`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViaCepResponse {
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    pub ibge: Option<String>,
    pub gia: Option<String>,
    pub ddd: Option<String>,
    pub siafi: Option<String>,
    pub erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn not_found(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn into_record(self, provider: &str) -> LookupRecord {
        let status = if self.not_found() { "not found" } else { "ok" };

        LookupRecord {
            provider: provider.to_string(),
            postal_code: non_empty(self.cep),
            region: non_empty(self.uf),
            locality: non_empty(self.localidade),
            sub_locality: non_empty(self.bairro),
            street: non_empty(self.logradouro),
            status: Some(status.to_string()),
            extras: Default::default(),
        }
        .with_extra("complemento", self.complemento)
        .with_extra("ibge", self.ibge)
        .with_extra("gia", self.gia)
        .with_extra("ddd", self.ddd)
        .with_extra("siafi", self.siafi)
    }
}

/// ApiCEP body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiCepResponse {
    pub code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub status: Option<u16>,
    pub ok: Option<bool>,
    #[serde(rename = "statusText")]
    pub status_text: Option<String>,
}

impl ApiCepResponse {
    pub fn into_record(self, provider: &str) -> LookupRecord {
        let status = non_empty(self.status_text).or_else(|| self.status.map(|s| s.to_string()));

        LookupRecord {
            provider: provider.to_string(),
            postal_code: non_empty(self.code),
            region: non_empty(self.state),
            locality: non_empty(self.city),
            sub_locality: non_empty(self.district),
            street: non_empty(self.address),
            status,
            extras: Default::default(),
        }
        .with_extra("ok", self.ok.map(|ok| ok.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIACEP_BODY: &str = r#"{
        "cep": "22621-252",
        "logradouro": "Rua Professor Hermes Lima",
        "complemento": "",
        "bairro": "Barra da Tijuca",
        "localidade": "Rio de Janeiro",
        "uf": "RJ",
        "ibge": "3304557",
        "gia": "",
        "ddd": "21",
        "siafi": "6001"
    }"#;

    const APICEP_BODY: &str = r#"{
        "code": "22260-003",
        "state": "RJ",
        "city": "Rio de Janeiro",
        "district": "Botafogo",
        "address": "Rua Sorocaba",
        "status": 200,
        "ok": true,
        "statusText": "ok"
    }"#;

    #[test]
    fn test_viacep_maps_fields() {
        let record = ProviderKind::ViaCep.decode("ViaCEP", VIACEP_BODY.as_bytes()).unwrap();
        assert_eq!(record.provider, "ViaCEP");
        assert_eq!(record.postal_code.as_deref(), Some("22621-252"));
        assert_eq!(record.region.as_deref(), Some("RJ"));
        assert_eq!(record.locality.as_deref(), Some("Rio de Janeiro"));
        assert_eq!(record.sub_locality.as_deref(), Some("Barra da Tijuca"));
        assert_eq!(record.street.as_deref(), Some("Rua Professor Hermes Lima"));
        assert_eq!(record.status.as_deref(), Some("ok"));
        assert_eq!(record.extras.get("ddd").map(String::as_str), Some("21"));
        assert!(!record.extras.contains_key("complemento"));
    }

    #[test]
    fn test_viacep_unknown_cep_is_not_an_error() {
        let record = ProviderKind::ViaCep.decode("ViaCEP", br#"{"erro": true}"#).unwrap();
        assert_eq!(record.status.as_deref(), Some("not found"));
        assert!(record.locality.is_none());

        let record = ProviderKind::ViaCep.decode("ViaCEP", br#"{"erro": "true"}"#).unwrap();
        assert_eq!(record.status.as_deref(), Some("not found"));
    }

    #[test]
    fn test_apicep_maps_fields() {
        let record = ProviderKind::ApiCep.decode("ApiCEP", APICEP_BODY.as_bytes()).unwrap();
        assert_eq!(record.postal_code.as_deref(), Some("22260-003"));
        assert_eq!(record.sub_locality.as_deref(), Some("Botafogo"));
        assert_eq!(record.street.as_deref(), Some("Rua Sorocaba"));
        assert_eq!(record.status.as_deref(), Some("ok"));
        assert_eq!(record.extras.get("ok").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_apicep_falls_back_to_numeric_status() {
        let record = ProviderKind::ApiCep
            .decode("ApiCEP", br#"{"status": 404, "ok": false}"#)
            .unwrap();
        assert_eq!(record.status.as_deref(), Some("404"));
        assert!(record.locality.is_none());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let err = ProviderKind::ApiCep.decode("ApiCEP", b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode { ref provider, .. } if provider == "ApiCEP"));

        let err = ProviderKind::ViaCep.decode("ViaCEP", b"[1, 2, 3]").unwrap_err();
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn test_wrong_field_type_is_decode_error() {
        let err = ProviderKind::ApiCep.decode("ApiCEP", br#"{"status": "two hundred"}"#).unwrap_err();
        assert_eq!(err.kind(), "decode");
    }
}
