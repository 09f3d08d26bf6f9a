//! Caching subsystem.
//!
//! - [`key`] derives the narrow base-36 [`CacheKey`] for an input text.
//! - [`response::ResponseCache`] stores conversion responses under those
//!   keys with a TTL enforced lazily on read. See the [`response`] module
//!   docs for ownership and concurrency notes.

pub mod key;
pub mod response;

pub use key::{CacheKey, hash_text};
pub use response::{CacheConfig, DEFAULT_TTL, ResponseCache};
