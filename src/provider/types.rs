//! Query, record and error types shared by every provider.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier sent to every provider taking part in a race.
///
/// The raw text is kept as given (trimmed). Providers that address CEPs pick
/// the rendering they need through [`LookupQuery::digits`] or
/// [`LookupQuery::hyphenated`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupQuery {
    raw: String,
}

impl LookupQuery {
    /// Build an opaque query. Only emptiness is rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, QueryError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self {
            raw: trimmed.to_string(),
        })
    }

    /// Parse a CEP written as `NNNNNNNN` or `NNNNN-NNN`.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }

        let bytes = trimmed.as_bytes();
        let well_formed = match bytes.len() {
            8 => bytes.iter().all(u8::is_ascii_digit),
            9 => {
                bytes[5] == b'-'
                    && bytes[..5].iter().all(u8::is_ascii_digit)
                    && bytes[6..].iter().all(u8::is_ascii_digit)
            }
            _ => false,
        };
        if !well_formed {
            return Err(QueryError::Malformed(trimmed.to_string()));
        }

        Ok(Self {
            raw: trimmed.to_string(),
        })
    }

    /// The query as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Only the ASCII digits of the query (`22621252`).
    pub fn digits(&self) -> String {
        self.raw.chars().filter(char::is_ascii_digit).collect()
    }

    /// `NNNNN-NNN` form. Falls back to the raw text when the query is not an
    /// 8-digit code.
    pub fn hyphenated(&self) -> String {
        let digits = self.digits();
        if digits.len() == 8 {
            format!("{}-{}", &digits[..5], &digits[5..])
        } else {
            self.raw.clone()
        }
    }
}

impl FromStr for LookupQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Errors produced while building a [`LookupQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("'{0}' is not a CEP (expected NNNNNNNN or NNNNN-NNN)")]
    Malformed(String),
}

/// Normalized result of one provider's lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// Name of the provider that produced this record.
    pub provider: String,

    pub postal_code: Option<String>,

    /// State (UF).
    pub region: Option<String>,

    /// City.
    pub locality: Option<String>,

    /// District / neighbourhood (bairro).
    pub sub_locality: Option<String>,

    pub street: Option<String>,

    /// Status as reported by the backend, verbatim.
    pub status: Option<String>,

    /// Backend-specific fields with no semantic slot (IBGE code, DDD, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl LookupRecord {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Self::default()
        }
    }

    /// Insert an extra field, skipping empty values.
    pub fn with_extra(mut self, key: &str, value: Option<String>) -> Self {
        if let Some(value) = non_empty(value) {
            self.extras.insert(key.to_string(), value);
        }
        self
    }
}

/// Collapse blank strings to `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Errors a provider can report for a single lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection, TLS, timeout or body read failure.
    #[error("{provider}: transport error: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success HTTP status.
    #[error("{provider}: backend returned HTTP {status}")]
    Status { provider: String, status: u16 },

    /// Body does not match the backend's response shape.
    #[error("{provider}: could not decode response: {source}")]
    Decode {
        provider: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{provider}: invalid endpoint: {reason}")]
    InvalidEndpoint { provider: String, reason: String },

    /// Endpoint addresses CEPs but the query is not one.
    #[error("{provider}: '{query}' is not a CEP this endpoint can address")]
    InvalidQuery { provider: String, query: String },

    /// Lookup task ended without reporting a result.
    #[error("{provider}: lookup task aborted")]
    Aborted { provider: String },
}

impl LookupError {
    /// Name of the provider that failed.
    pub fn provider(&self) -> &str {
        match self {
            LookupError::Transport { provider, .. }
            | LookupError::Status { provider, .. }
            | LookupError::Decode { provider, .. }
            | LookupError::InvalidEndpoint { provider, .. }
            | LookupError::InvalidQuery { provider, .. }
            | LookupError::Aborted { provider } => provider,
        }
    }

    /// Short label used for metrics and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupError::Transport { source, .. } if source.is_timeout() => "timeout",
            LookupError::Transport { .. } => "transport",
            LookupError::Status { .. } => "status",
            LookupError::Decode { .. } => "decode",
            LookupError::InvalidEndpoint { .. } => "invalid_endpoint",
            LookupError::InvalidQuery { .. } => "invalid_query",
            LookupError::Aborted { .. } => "aborted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_hyphenated() {
        let plain = LookupQuery::parse("22621252").unwrap();
        assert_eq!(plain.digits(), "22621252");
        assert_eq!(plain.hyphenated(), "22621-252");

        let hyphenated = LookupQuery::parse(" 22260-003 ").unwrap();
        assert_eq!(hyphenated.as_str(), "22260-003");
        assert_eq!(hyphenated.digits(), "22260003");
        assert_eq!(hyphenated.hyphenated(), "22260-003");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(LookupQuery::parse("   "), Err(QueryError::Empty));
        assert!(matches!(LookupQuery::parse("2262125"), Err(QueryError::Malformed(_))));
        assert!(matches!(LookupQuery::parse("2262-1252"), Err(QueryError::Malformed(_))));
        assert!(matches!(LookupQuery::parse("22621-25a"), Err(QueryError::Malformed(_))));
        assert!("abcdefgh".parse::<LookupQuery>().is_err());
    }

    #[test]
    fn test_opaque_query_keeps_raw_text() {
        let query = LookupQuery::new("SW1A 1AA").unwrap();
        assert_eq!(query.to_string(), "SW1A 1AA");
        assert_eq!(query.hyphenated(), "SW1A 1AA");
        assert_eq!(LookupQuery::new(""), Err(QueryError::Empty));
    }

    #[test]
    fn test_record_extras_skip_blank_values() {
        let record = LookupRecord::new("ViaCEP")
            .with_extra("ddd", Some("21".into()))
            .with_extra("gia", Some("  ".into()))
            .with_extra("siafi", None);
        assert_eq!(record.extras.len(), 1);
        assert_eq!(record.extras["ddd"], "21");
    }

    #[test]
    fn test_error_reports_provider() {
        let err = LookupError::Status {
            provider: "ApiCEP".into(),
            status: 429,
        };
        assert_eq!(err.provider(), "ApiCEP");
        assert_eq!(err.kind(), "status");
        assert_eq!(err.to_string(), "ApiCEP: backend returned HTTP 429");
    }
}
