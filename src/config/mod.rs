//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! proxy.toml
//!     → loader.rs (parse & deserialize, resolve route_file)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → RouterGeneration::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes build a new generation
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Route trees stay JSON (`serde_json::Value`) and are walked by the factory

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_route, ConfigError};
pub use schema::{CodecEntry, DestinationConfig, ObservabilityConfig, ProxyConfig};
pub use validation::{validate_config, ValidationError};
