//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Value ranges (timeouts > 0)
//! - Provider names unique and endpoints parseable
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: RaceConfig → Result<(), Vec<ValidationError>>

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::config::schema::RaceConfig;
use crate::provider::http::expand_endpoint;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeout_ms must be greater than zero")]
    ZeroTimeout,

    #[error("at least one provider is required")]
    NoProviders,

    #[error("provider #{0} has an empty name")]
    EmptyProviderName(usize),

    #[error("provider '{0}' is defined more than once")]
    DuplicateProvider(String),

    #[error("provider '{0}' has timeout_ms of zero")]
    ZeroProviderTimeout(String),

    #[error("provider '{name}' has an invalid endpoint: {reason}")]
    InvalidEndpoint { name: String, reason: String },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RaceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.providers.is_empty() {
        errors.push(ValidationError::NoProviders);
    }

    let mut seen = HashSet::new();
    for (index, provider) in config.providers.iter().enumerate() {
        if provider.name.trim().is_empty() {
            errors.push(ValidationError::EmptyProviderName(index));
        } else if !seen.insert(provider.name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateProvider(provider.name.clone()));
        }

        if provider.timeout_ms == Some(0) {
            errors.push(ValidationError::ZeroProviderTimeout(provider.name.clone()));
        }

        if let Err(reason) = check_endpoint(provider.endpoint()) {
            errors.push(ValidationError::InvalidEndpoint {
                name: provider.name.clone(),
                reason,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_endpoint(template: &str) -> Result<(), String> {
    let sample = expand_endpoint(template, "01001000", "01001-000");
    let url = Url::parse(&sample).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
