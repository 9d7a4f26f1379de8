/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::base32;
use crate::rdata::RecordDataError;
use crate::{GnsRecord, RecordType};

pub const ZONE_KEY_BYTES: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZoneKeyType {
    Ecdsa,
    EdDsa,
}

impl ZoneKeyType {
    pub fn record_type(&self) -> RecordType {
        match self {
            ZoneKeyType::Ecdsa => RecordType::PKEY,
            ZoneKeyType::EdDsa => RecordType::EDKEY,
        }
    }

    pub fn from_record_type(t: RecordType) -> Option<Self> {
        match t {
            RecordType::PKEY => Some(ZoneKeyType::Ecdsa),
            RecordType::EDKEY => Some(ZoneKeyType::EdDsa),
            _ => None,
        }
    }
}

/// The public key identifying a zone.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneKey {
    key_type: ZoneKeyType,
    key: [u8; ZONE_KEY_BYTES],
}

impl ZoneKey {
    pub fn new(key_type: ZoneKeyType, key: [u8; ZONE_KEY_BYTES]) -> Self {
        ZoneKey { key_type, key }
    }

    #[inline]
    pub fn key_type(&self) -> ZoneKeyType {
        self.key_type
    }

    #[inline]
    pub fn key_bytes(&self) -> &[u8; ZONE_KEY_BYTES] {
        &self.key
    }

    pub fn from_record(record: &GnsRecord) -> Result<Self, RecordDataError> {
        let Some(key_type) = ZoneKeyType::from_record_type(record.record_type) else {
            return Err(RecordDataError::UnexpectedType(record.record_type));
        };
        let key = <[u8; ZONE_KEY_BYTES]>::try_from(record.data.as_slice())
            .map_err(|_| RecordDataError::InvalidLength(record.data.len()))?;
        Ok(ZoneKey { key_type, key })
    }

    pub fn to_record_data(&self) -> Vec<u8> {
        self.key.to_vec()
    }

    fn to_bytes(self) -> [u8; 4 + ZONE_KEY_BYTES] {
        let mut buf = [0u8; 4 + ZONE_KEY_BYTES];
        buf[..4].copy_from_slice(&self.key_type.record_type().value().to_be_bytes());
        buf[4..].copy_from_slice(&self.key);
        buf
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base32::encode(&self.to_bytes()))
    }
}

impl fmt::Debug for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneKey({self})")
    }
}

impl FromStr for ZoneKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = base32::decode(s).ok_or_else(|| anyhow!("invalid base32 string"))?;
        if data.len() != 4 + ZONE_KEY_BYTES {
            return Err(anyhow!("invalid zone key length {}", data.len()));
        }
        let t = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let key_type = ZoneKeyType::from_record_type(RecordType::new(t))
            .ok_or_else(|| anyhow!("unsupported zone key type {t}"))?;
        let mut key = [0u8; ZONE_KEY_BYTES];
        key.copy_from_slice(&data[4..]);
        Ok(ZoneKey { key_type, key })
    }
}
