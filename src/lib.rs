//! mdmint - cached text-to-markdown conversion
//!
//! Raw text goes in, a markdown document comes out. Every conversion passes
//! through a [`ResponseCache`] keyed on a hash of the input, so repeating a
//! conversion within the TTL (one hour by default) skips the backend and
//! its latency entirely.
//!
//! # Example
//!
//! ```rust,no_run
//! use mdmint::{ConversionInput, Mdmint};
//!
//! #[tokio::main]
//! async fn main() -> mdmint::Result<()> {
//!     let service = Mdmint::builder().build()?;
//!
//!     let input = ConversionInput::new("Meeting notes\nShip on Friday");
//!     let response = service.convert_text(&input).await;
//!     assert!(response.success);
//!     print!("{}", response.markdown);
//!
//!     // Served from cache, no simulated latency.
//!     let again = service.convert_text(&input).await;
//!     assert_eq!(again.markdown, response.markdown);
//!     Ok(())
//! }
//! ```
//!
//! # Front ends
//!
//! The [`controller`] module carries the page-level behaviour: optimistic
//! updates with rollback, debounced draft saving, copy and download.

pub mod cache;
pub mod clock;
#[cfg(feature = "cli")]
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod providers;
pub mod service;
pub mod telemetry;
pub mod traits;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheKey, ResponseCache, hash_text};
pub use clock::{Clock, ManualClock, SystemClock};
pub use convert::to_markdown;
pub use error::{MdmintError, Result};
pub use providers::{MarkdownConverter, SimulatedConverter};
pub use service::{CachePolicy, ConversionService, Mdmint, MdmintBuilder};
pub use traits::ConversionGateway;
pub use types::{ConversionInput, ConversionResponse, DownloadOptions};
pub use version::{GIT_BRANCH, GIT_SHA, PKG_VERSION, git_dirty, version_string};
