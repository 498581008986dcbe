//! Metrics collection.
//!
//! # Metrics
//! - `cep_race_outcomes_total` (counter): races by outcome
//! - `cep_race_wins_total` (counter): successful races by winning provider
//! - `cep_provider_lookups_total` (counter): lookups by provider and result
//! - `cep_provider_lookup_duration_seconds` (histogram): lookup latency
//!
//! Without an installed recorder every call is a no-op.

use std::time::Duration;

use crate::provider::LookupError;
use crate::race::LookupOutcome;

/// Record one finished provider lookup.
pub fn record_lookup(provider: &str, error: Option<&LookupError>, elapsed: Duration) {
    let result = error.map_or("success", LookupError::kind);

    ::metrics::counter!(
        "cep_provider_lookups_total",
        "provider" => provider.to_string(),
        "result" => result
    )
    .increment(1);

    ::metrics::histogram!(
        "cep_provider_lookup_duration_seconds",
        "provider" => provider.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record the single outcome of a race.
pub fn record_outcome(outcome: &LookupOutcome) {
    ::metrics::counter!("cep_race_outcomes_total", "outcome" => outcome.kind()).increment(1);

    if let LookupOutcome::Success(record) = outcome {
        ::metrics::counter!("cep_race_wins_total", "provider" => record.provider.clone())
            .increment(1);
    }
}
