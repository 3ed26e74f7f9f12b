//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Both servers produce:
//!     → logging.rs (tracing events on stderr)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → terminal / log capture
//!     → Prometheus scrape (optional)
//! ```
//!
//! The transcript on stdout is separate; see `crate::transcript`.

pub mod logging;
pub mod metrics;
