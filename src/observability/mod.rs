//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! provider lookups, race coordinator
//!     → logging.rs (structured tracing events, stderr)
//!     → metrics.rs (counters and histograms through the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so stdout carries only the rendered outcome
//! - Every race span carries a `race_id` for correlation
//! - No metrics recorder is installed here; embedding applications pick one

pub mod logging;
pub mod metrics;
