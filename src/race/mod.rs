//! Race coordination subsystem.
//!
//! # Data Flow
//! ```text
//! LookupQuery + providers + timeout
//!     → coordinator.rs (spawn one task per provider, single select on
//!       the fan-in of completions and the deadline)
//!     → outcome.rs (Success | Failure | Timeout, exactly one per race)
//! ```
//!
//! # Design Decisions
//! - First arrival decides the race, even when it is a failure
//! - `RaceStrategy::FirstSuccess` is the opt-in failover variant
//! - `race` never returns an error; callers always get an outcome

pub mod coordinator;
pub mod outcome;

pub use coordinator::{race, RaceCoordinator};
pub use outcome::{LookupOutcome, RaceStrategy, EXIT_STARTUP_ERROR};
