//! CEP lookup race.
//!
//! Queries several postal-code backends for the same CEP at once and keeps
//! whichever answers first, bounded by an overall deadline.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!   LookupQuery   │                 race coordinator             │
//!   ─────────────▶│  spawn ──▶ ViaCEP  lookup ──oneshot──┐       │
//!                 │  spawn ──▶ ApiCEP  lookup ──oneshot──┤       │
//!                 │  spawn ──▶ ...            ──oneshot──┤       │
//!                 │                                      ▼       │
//!                 │        select(first completion, deadline)    │
//!                 └──────────────────────┬───────────────────────┘
//!                                        ▼
//!                     LookupOutcome (Success | Failure | Timeout)
//!                                        ▼
//!                                 report (text / JSON)
//! ```

// Core
pub mod provider;
pub mod race;
pub mod report;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::RaceConfig;
pub use provider::{HttpProvider, LookupError, LookupProvider, LookupQuery, LookupRecord};
pub use race::{race, LookupOutcome, RaceCoordinator, RaceStrategy};
pub use report::{render, report, OutputFormat};
