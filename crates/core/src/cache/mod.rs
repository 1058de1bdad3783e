//! Summary cache over a shared key-value namespace.
//!
//! Summaries are stored under keys derived from the page URL and carry the
//! time they were written. This module provides:
//!
//! - The 32-bit rolling string hash used for key shortening and fingerprints
//! - Cache-key derivation (page-level and path-level scopes)
//! - The `KeyValueStore` port with SQLite and in-memory adapters
//! - TTL validity checks, invalidation, sweeping and bulk clearing
//! - Content fingerprints for change detection
//! - A periodic background sweeper

pub mod clock;
pub mod connection;
pub mod fingerprint;
pub mod hash;
pub mod key;
pub mod migrations;
pub mod store;
pub mod sweeper;
pub mod ttl;

pub use crate::Error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use connection::CacheDb;
pub use fingerprint::{ChangeTracker, ContentFingerprint, has_changed};
pub use key::{CACHE_PREFIX, CacheKey, KeyScope, derive_key};
pub use store::{KeyValueStore, MemoryStore};
pub use sweeper::spawn_sweeper;
pub use ttl::{CACHE_TTL_MS, CacheEntry, SummaryCache, SweepReport};
