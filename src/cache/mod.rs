//! Cache Module
//!
//! TTL-aware cache semantics over a pluggable backing store: entry model,
//! storage codec, time source, TTL parsing and the cache service itself.

mod clock;
pub mod codec;
mod entry;
mod service;
mod ttl;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::CodecError;
pub use entry::{CacheEntry, Expiry};
pub use service::{OpContext, TtlCache};
pub use ttl::{parse_duration, TtlParseError, TtlPolicy};
