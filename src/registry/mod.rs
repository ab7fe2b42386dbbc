//! In-memory link registry
//!
//! Keys are derived from the MD5 digest of the normalized URL, truncated to a
//! fixed number of bytes and hex-encoded. The table is last-write-wins: two
//! URLs that truncate to the same key overwrite each other silently.

use std::collections::HashMap;

use md5::{Digest, Md5};
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::errors::{Result, ShortifyError};

/// Scheme prepended to URLs submitted without one
pub const DEFAULT_SCHEME: &str = "https://";

/// Schemes recognized as already qualified (case-sensitive)
const RECOGNIZED_SCHEMES: [&str; 2] = ["http://", "https://"];

/// Truncation width reproducing the historical 6-character keys
pub const DEFAULT_KEY_BYTES: usize = 3;

/// MD5 digest length, the upper bound for the key width
pub const MAX_KEY_BYTES: usize = 16;

/// Message shown when the submitted URL is empty
pub const EMPTY_URL_MESSAGE: &str = "Please enter a URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub normalized_url: String,
    pub key: String,
}

/// Prefix `https://` unless the URL already starts with `http://` or `https://`.
pub fn normalize_url(url: &str) -> String {
    if RECOGNIZED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME, url)
    }
}

/// Hex-encode the first `key_bytes` bytes of the MD5 digest of `normalized_url`.
///
/// `key_bytes` is clamped to `1..=16`.
pub fn derive_key(normalized_url: &str, key_bytes: usize) -> String {
    let width = key_bytes.clamp(1, MAX_KEY_BYTES);
    let digest = Md5::digest(normalized_url.as_bytes());

    digest[..width]
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

pub struct LinkRegistry {
    links: RwLock<HashMap<String, String>>,
    key_bytes: usize,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_BYTES)
    }
}

impl LinkRegistry {
    pub fn new(key_bytes: usize) -> Self {
        Self {
            links: RwLock::new(HashMap::new()),
            key_bytes: key_bytes.clamp(1, MAX_KEY_BYTES),
        }
    }

    /// Effective key width in bytes (after clamping)
    pub fn key_bytes(&self) -> usize {
        self.key_bytes
    }

    /// Normalize `url`, derive its key and store the mapping.
    ///
    /// Blank input is rejected without touching the table.
    pub fn shorten(&self, url: &str) -> Result<ShortLink> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ShortifyError::validation(EMPTY_URL_MESSAGE));
        }

        let normalized_url = normalize_url(url);
        let key = derive_key(&normalized_url, self.key_bytes);

        let previous = self
            .links
            .write()
            .insert(key.clone(), normalized_url.clone());

        if let Some(previous) = previous
            && previous != normalized_url
        {
            // 截断宽度较小时碰撞是预期内的，后写覆盖
            debug!(
                "Key collision on {}: {} replaced by {}",
                key, previous, normalized_url
            );
        }

        trace!("Shortened {} -> {}", normalized_url, key);
        Ok(ShortLink {
            normalized_url,
            key,
        })
    }

    pub fn resolve(&self, key: &str) -> Option<String> {
        self.links.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.links.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.read().is_empty()
    }

    /// Store a mapping under an explicit key, bypassing derivation.
    #[cfg(test)]
    fn insert_raw(&self, key: &str, url: &str) {
        self.links.write().insert(key.to_string(), url.to_string());
    }
}
