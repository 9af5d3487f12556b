#![warn(clippy::unwrap_used)]

pub mod key;
pub mod ttl;

pub use key::CacheKey;
pub use ttl::{CacheEntryStats, CacheStats, TtlCache};
