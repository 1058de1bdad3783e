//! Cache-related MCP tools.
//!
//! Lookup, purging and usage statistics over the summary cache.

pub mod get;
pub mod purge;
pub mod stats;

pub use get::{CacheGetParams, get_impl};
pub use purge::{CachePurgeParams, purge_impl};
pub use stats::stats_impl;
