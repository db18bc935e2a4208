//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges via the metrics facade)
//!
//! Consumers:
//!     → stderr subscriber installed by the binary
//!     → whatever metrics recorder the embedding process installs
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Metric updates are no-ops until a recorder is installed
//! - Nothing on the request path allocates for observability

pub mod logging;
pub mod metrics;
