/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use bytes::Bytes;

use crate::ZoneKey;

const QUERY_KEY_CONTEXT: &str = "gns 2025 query key derivation";

/// The DHT / cache key of the records a zone publishes under one label.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey([u8; 32]);

impl QueryKey {
    pub fn derive(zone: &ZoneKey, label: &str) -> Self {
        let mut hasher = blake3::Hasher::new_derive_key(QUERY_KEY_CONTEXT);
        hasher.update(&zone.key_type().record_type().value().to_be_bytes());
        hasher.update(zone.key_bytes());
        hasher.update(label.as_bytes());
        QueryKey(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("QueryKey(")?;
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        f.write_str("..)")
    }
}

/// An encrypted record set as stored in the cache and the DHT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub query: QueryKey,
    /// Absolute, microseconds since the UNIX epoch.
    pub expiration_time: u64,
    pub payload: Bytes,
}

impl Block {
    pub fn new(query: QueryKey, expiration_time: u64, payload: Bytes) -> Self {
        Block {
            query,
            expiration_time,
            payload,
        }
    }

    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        self.expiration_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ZONE_KEY_BYTES, ZoneKeyType};

    #[test]
    fn derive_distinct() {
        let z1 = ZoneKey::new(ZoneKeyType::EdDsa, [1u8; ZONE_KEY_BYTES]);
        let z2 = ZoneKey::new(ZoneKeyType::Ecdsa, [1u8; ZONE_KEY_BYTES]);
        assert_eq!(QueryKey::derive(&z1, "www"), QueryKey::derive(&z1, "www"));
        assert_ne!(QueryKey::derive(&z1, "www"), QueryKey::derive(&z1, "ftp"));
        assert_ne!(QueryKey::derive(&z1, "www"), QueryKey::derive(&z2, "www"));
    }

    #[test]
    fn expired() {
        let z = ZoneKey::new(ZoneKeyType::EdDsa, [1u8; ZONE_KEY_BYTES]);
        let b = Block::new(QueryKey::derive(&z, "@"), 100, Bytes::new());
        assert!(!b.is_expired(99));
        assert!(b.is_expired(100));
    }
}
