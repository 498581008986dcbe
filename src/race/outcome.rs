//! Terminal result of a race.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::provider::{LookupError, LookupRecord};

/// Process exit status when the race never ran (bad config, bad CEP).
pub const EXIT_STARTUP_ERROR: u8 = 3;

/// Exactly one of these is produced per race.
#[derive(Debug)]
pub enum LookupOutcome {
    /// A provider answered first with a record.
    Success(LookupRecord),

    /// A provider finished first, but with an error.
    Failure(LookupError),

    /// No provider finished before the deadline.
    Timeout { after: Duration },
}

impl LookupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupOutcome::Success(_))
    }

    /// `success`, `failure` or `timeout`.
    pub fn kind(&self) -> &'static str {
        match self {
            LookupOutcome::Success(_) => "success",
            LookupOutcome::Failure(_) => "failure",
            LookupOutcome::Timeout { .. } => "timeout",
        }
    }

    /// Provider that decided the race, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            LookupOutcome::Success(record) => Some(&record.provider),
            LookupOutcome::Failure(error) => Some(error.provider()),
            LookupOutcome::Timeout { .. } => None,
        }
    }

    pub fn record(&self) -> Option<&LookupRecord> {
        match self {
            LookupOutcome::Success(record) => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupOutcome::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// Process exit status: 0 success, 1 failure, 2 timeout.
    pub fn exit_code(&self) -> u8 {
        match self {
            LookupOutcome::Success(_) => 0,
            LookupOutcome::Failure(_) => 1,
            LookupOutcome::Timeout { .. } => 2,
        }
    }
}

/// How the coordinator treats a provider that finishes first with an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RaceStrategy {
    /// First completion decides the race, even when it is a failure.
    #[default]
    FirstCompleted,

    /// Failures are set aside while other providers are still running; the
    /// earliest failure is reported only when every provider has failed.
    FirstSuccess,
}
