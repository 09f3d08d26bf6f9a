//! Converter backends.
//!
//! [`MarkdownConverter`] is the seam where a real external conversion call
//! plugs in. [`SimulatedConverter`] is the default backend.

pub mod simulated;
pub mod traits;

pub use simulated::{DEFAULT_LATENCY, SimulatedConverter};
pub use traits::MarkdownConverter;
