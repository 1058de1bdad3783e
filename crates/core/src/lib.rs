//! Core types and shared functionality for sumlify.
//!
//! This crate provides:
//! - The rolling string hash and summary cache-key derivation
//! - A TTL summary cache over a pluggable key-value store (SQLite or in-memory)
//! - Content fingerprinting for change detection
//! - Install/usage settings kept in the same store
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod settings;

pub use cache::{
    CacheDb, CacheEntry, CacheKey, ChangeTracker, Clock, ContentFingerprint, KeyScope, KeyValueStore, MemoryStore,
    SummaryCache, SweepReport, SystemClock, derive_key,
};
pub use config::AppConfig;
pub use error::Error;
pub use settings::{LaunchKind, Stats};
