//! Content fingerprints for change detection.
//!
//! A fingerprint is the decimal rolling hash of the first
//! [`FINGERPRINT_UNITS`] UTF-16 code units of a page's extracted text. It is a
//! cheap change signal, not a content-addressed identity: edits past the
//! sampled prefix go unnoticed.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::hash::hash_units;

/// Number of leading UTF-16 code units sampled.
pub const FINGERPRINT_UNITS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    pub fn of(text: &str) -> Self {
        let hash = hash_units(text.encode_utf16().take(FINGERPRINT_UNITS));
        Self(hash.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether content changed between two samples. The first sample never counts.
pub fn has_changed(previous: Option<&ContentFingerprint>, current: &ContentFingerprint) -> bool {
    previous.is_some_and(|p| p != current)
}

/// Last fingerprint seen per identifier. Held in memory only.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    seen: Mutex<HashMap<String, ContentFingerprint>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` for `identifier` and report whether it differs from
    /// the previous sample.
    pub async fn observe(&self, identifier: &str, current: &ContentFingerprint) -> bool {
        let previous = self.seen.lock().await.insert(identifier.to_string(), current.clone());
        let changed = has_changed(previous.as_ref(), current);

        if changed {
            tracing::debug!(identifier, fingerprint = %current, "content changed");
        }
        changed
    }

    pub async fn last(&self, identifier: &str) -> Option<ContentFingerprint> {
        self.seen.lock().await.get(identifier).cloned()
    }

    /// Drop the sample for `identifier`, e.g. when its tab closes.
    pub async fn forget(&self, identifier: &str) {
        self.seen.lock().await.remove(identifier);
    }
}
