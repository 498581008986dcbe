//! Text and JSON rendering of a [`LookupOutcome`].

use serde_json::{json, Value};

use crate::provider::LookupRecord;
use crate::race::LookupOutcome;

/// Output format selected by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One pretty-printed JSON document.
    Json,
}

/// Render an outcome as human-readable text.
pub fn report(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Success(record) => report_record(record),
        LookupOutcome::Failure(error) => {
            let mut text = format!("Failure: {}", error);
            let mut source = std::error::Error::source(error);
            while let Some(cause) = source {
                text.push_str(&format!("\n  caused by: {}", cause));
                source = cause.source();
            }
            text
        }
        LookupOutcome::Timeout { after } => {
            format!("Timeout: no provider answered within {}ms", after.as_millis())
        }
    }
}

fn report_record(record: &LookupRecord) -> String {
    let fields = [
        ("postal_code", &record.postal_code),
        ("street", &record.street),
        ("sub_locality", &record.sub_locality),
        ("locality", &record.locality),
        ("region", &record.region),
        ("status", &record.status),
    ];

    let mut lines = vec![format!("Provider: {}", record.provider)];
    for (label, value) in fields {
        lines.push(format!("  {:<13} {}", label, value.as_deref().unwrap_or("-")));
    }
    for (label, value) in &record.extras {
        lines.push(format!("  {:<13} {}", label, value));
    }
    lines.join("\n")
}

/// Render an outcome as a JSON value.
pub fn to_json(outcome: &LookupOutcome) -> Value {
    match outcome {
        LookupOutcome::Success(record) => json!({
            "outcome": "success",
            "record": record,
        }),
        LookupOutcome::Failure(error) => json!({
            "outcome": "failure",
            "provider": error.provider(),
            "kind": error.kind(),
            "error": error.to_string(),
        }),
        LookupOutcome::Timeout { after } => json!({
            "outcome": "timeout",
            "after_ms": after.as_millis() as u64,
        }),
    }
}

/// Render an outcome in the requested format.
pub fn render(outcome: &LookupOutcome, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => report(outcome),
        OutputFormat::Json => format!("{:#}", to_json(outcome)),
    }
}
