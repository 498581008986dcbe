//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RaceConfig (validated, immutable)
//!     → RaceCoordinator::from_config
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file at all means ViaCEP + ApiCEP, 1s
//! - Validation separates syntactic (serde) from semantic checks
//! - CLI flags are applied on top of the loaded config, then re-validated

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ObservabilityConfig, ProviderConfig, RaceConfig};
pub use validation::{validate_config, ValidationError};
