//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files. Every
//! field has a default so an empty file is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::provider::ProviderKind;
use crate::race::RaceStrategy;

/// Root configuration for a race.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Overall race deadline in milliseconds.
    pub timeout_ms: u64,

    /// What to do when the first provider to finish has failed.
    pub strategy: RaceStrategy,

    /// Backends taking part in the race.
    pub providers: Vec<ProviderConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            strategy: RaceStrategy::FirstCompleted,
            providers: vec![
                ProviderConfig::for_kind(ProviderKind::ViaCep),
                ProviderConfig::for_kind(ProviderKind::ApiCep),
            ],
            observability: ObservabilityConfig::default(),
        }
    }
}

impl RaceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Keep only the providers whose name matches one of `names`
    /// (case-insensitive). Returns the names that matched nothing.
    pub fn retain_providers(&mut self, names: &[String]) -> Vec<String> {
        let unknown = names
            .iter()
            .filter(|n| !self.providers.iter().any(|p| p.name.eq_ignore_ascii_case(n)))
            .cloned()
            .collect();

        self.providers
            .retain(|p| names.iter().any(|n| p.name.eq_ignore_ascii_case(n)));
        unknown
    }
}

/// One backend taking part in the race.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name used in records, errors and logs.
    pub name: String,

    /// Response shape of the backend.
    pub kind: ProviderKind,

    /// Endpoint template with `{cep}` / `{cep_hyphenated}` placeholders.
    /// Defaults to the public endpoint for `kind`.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Provider's own network timeout; capped by the race deadline.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ProviderConfig {
    /// The public endpoint of `kind` under its usual name.
    pub fn for_kind(kind: ProviderKind) -> Self {
        Self {
            name: kind.default_name().to_string(),
            kind,
            endpoint: None,
            timeout_ms: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.kind.default_endpoint())
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}
