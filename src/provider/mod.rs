//! Provider client subsystem.
//!
//! # Data Flow
//! ```text
//! LookupQuery
//!     → http.rs (expand endpoint, one GET bounded by the race deadline)
//!     → adapters.rs (backend-specific body → LookupRecord)
//!     → Result<LookupRecord, LookupError> handed to the race coordinator
//! ```
//!
//! # Design Decisions
//! - One outbound request per lookup; retry policy belongs to callers
//! - Non-success HTTP status fails before the body is read
//! - Each backend keeps its own response type; only the adapter knows it

pub mod adapters;
pub mod http;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;

pub use adapters::ProviderKind;
pub use http::HttpProvider;
pub use types::{LookupError, LookupQuery, LookupRecord, QueryError};

/// A single postal-code backend.
///
/// Implementations must not run past `deadline`; the coordinator abandons
/// them after the race is decided but does not interrupt them.
#[async_trait]
pub trait LookupProvider: Send + Sync {
    /// Identifying name, copied into records and errors.
    fn name(&self) -> &str;

    async fn lookup(
        &self,
        query: &LookupQuery,
        deadline: Duration,
    ) -> Result<LookupRecord, LookupError>;
}
