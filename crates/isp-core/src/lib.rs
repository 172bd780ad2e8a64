//! isp-core: stable foundation for the rocket Isp workspace.
//!
//! Contains:
//! - units (uom SI types + US-customary constructors and extractors)
//! - numeric (fixed-count bisection, table interpolation)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{IspError, IspResult};
pub use numeric::*;
pub use units::*;
