//! Air-quality classification.
//!
//! A single authoritative home for the per-pollutant breakpoint tables and the
//! lookup that turns a concentration into a severity tier, label and colour.
//! Everything here is `const` data plus pure functions, so callers on any
//! thread can classify without coordination.

pub mod classify;
pub mod palette;
pub mod pollutant;
pub mod thresholds;
pub mod tier;

pub use classify::*;
pub use palette::*;
pub use pollutant::*;
pub use thresholds::*;
pub use tier::*;
