/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use bitflags::bitflags;

/// Expiration value of records that never expire.
pub const EXPIRATION_NEVER: u64 = u64::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordType(u32);

impl RecordType {
    pub const A: RecordType = RecordType(1);
    pub const NS: RecordType = RecordType(2);
    pub const CNAME: RecordType = RecordType(5);
    pub const SOA: RecordType = RecordType(6);
    pub const PTR: RecordType = RecordType(12);
    pub const MX: RecordType = RecordType(15);
    pub const TXT: RecordType = RecordType(16);
    pub const AAAA: RecordType = RecordType(28);
    pub const SRV: RecordType = RecordType(33);
    pub const CERT: RecordType = RecordType(37);
    pub const TLSA: RecordType = RecordType(52);
    pub const SMIMEA: RecordType = RecordType(53);
    pub const ANY: RecordType = RecordType(255);
    pub const URI: RecordType = RecordType(256);
    pub const CAA: RecordType = RecordType(257);

    pub const PKEY: RecordType = RecordType(65536);
    pub const NICK: RecordType = RecordType(65537);
    pub const LEHO: RecordType = RecordType(65538);
    pub const VPN: RecordType = RecordType(65539);
    pub const GNS2DNS: RecordType = RecordType(65540);
    pub const BOX: RecordType = RecordType(65541);
    pub const SBOX: RecordType = RecordType(65547);
    pub const REDIRECT: RecordType = RecordType(65551);
    pub const EDKEY: RecordType = RecordType(65556);

    const NAMES: &'static [(RecordType, &'static str)] = &[
        (RecordType::A, "A"),
        (RecordType::NS, "NS"),
        (RecordType::CNAME, "CNAME"),
        (RecordType::SOA, "SOA"),
        (RecordType::PTR, "PTR"),
        (RecordType::MX, "MX"),
        (RecordType::TXT, "TXT"),
        (RecordType::AAAA, "AAAA"),
        (RecordType::SRV, "SRV"),
        (RecordType::CERT, "CERT"),
        (RecordType::TLSA, "TLSA"),
        (RecordType::SMIMEA, "SMIMEA"),
        (RecordType::ANY, "ANY"),
        (RecordType::URI, "URI"),
        (RecordType::CAA, "CAA"),
        (RecordType::PKEY, "PKEY"),
        (RecordType::NICK, "NICK"),
        (RecordType::LEHO, "LEHO"),
        (RecordType::VPN, "VPN"),
        (RecordType::GNS2DNS, "GNS2DNS"),
        (RecordType::BOX, "BOX"),
        (RecordType::SBOX, "SBOX"),
        (RecordType::REDIRECT, "REDIRECT"),
        (RecordType::EDKEY, "EDKEY"),
    ];

    pub const fn new(v: u32) -> Self {
        RecordType(v)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    pub fn name(&self) -> Option<&'static str> {
        RecordType::NAMES
            .iter()
            .find(|(t, _)| t == self)
            .map(|(_, name)| *name)
    }

    /// Whether this engine knows how to handle records of this type.
    pub fn is_known(&self) -> bool {
        self.name().is_some()
    }

    pub fn is_zone_delegation(&self) -> bool {
        matches!(*self, RecordType::PKEY | RecordType::EDKEY)
    }

    pub fn is_address(&self) -> bool {
        matches!(*self, RecordType::A | RecordType::AAAA | RecordType::ANY)
    }

    pub fn is_boxed(&self) -> bool {
        matches!(*self, RecordType::BOX | RecordType::SBOX)
    }

    /// Whether a record of this type satisfies a request for `requested`.
    pub fn matches(&self, requested: RecordType) -> bool {
        requested == RecordType::ANY || *self == requested
    }

    /// The DNS type code, if this type has one.
    pub fn as_dns(&self) -> Option<u16> {
        u16::try_from(self.0).ok()
    }
}

impl From<u16> for RecordType {
    fn from(v: u16) -> Self {
        RecordType(u32::from(v))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

impl FromStr for RecordType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((t, _)) = RecordType::NAMES
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*t);
        }
        let num = s
            .strip_prefix("TYPE")
            .or_else(|| s.strip_prefix("type"))
            .unwrap_or(s);
        u32::from_str(num)
            .map(RecordType)
            .map_err(|_| anyhow!("unknown record type {s}"))
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RecordFlags: u16 {
        const CRITICAL = 1;
        const SUPPLEMENTAL = 1 << 1;
        const SHADOW = 1 << 2;
        const RELATIVE_EXPIRATION = 1 << 14;
        const PRIVATE = 1 << 15;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GnsRecord {
    pub record_type: RecordType,
    /// Microseconds, absolute or relative depending on the flags.
    pub expiration_time: u64,
    pub flags: RecordFlags,
    pub data: Vec<u8>,
}

impl GnsRecord {
    pub fn new(record_type: RecordType, expiration_time: u64, data: Vec<u8>) -> Self {
        GnsRecord {
            record_type,
            expiration_time,
            flags: RecordFlags::empty(),
            data,
        }
    }

    pub fn with_flags(mut self, flags: RecordFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub fn is_supplemental(&self) -> bool {
        self.flags.contains(RecordFlags::SUPPLEMENTAL)
    }

    #[inline]
    pub fn is_critical(&self) -> bool {
        self.flags.contains(RecordFlags::CRITICAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type() {
        assert_eq!(RecordType::from_str("aaaa").unwrap(), RecordType::AAAA);
        assert_eq!(RecordType::from_str("GNS2DNS").unwrap(), RecordType::GNS2DNS);
        assert_eq!(RecordType::from_str("TYPE65600").unwrap().value(), 65600);
        assert_eq!(RecordType::from_str("99").unwrap().value(), 99);
        assert!(RecordType::from_str("NOPE").is_err());
    }

    #[test]
    fn display_type() {
        assert_eq!(RecordType::LEHO.to_string(), "LEHO");
        assert_eq!(RecordType::new(65600).to_string(), "TYPE65600");
    }

    #[test]
    fn type_classes() {
        assert!(RecordType::EDKEY.is_zone_delegation());
        assert!(RecordType::ANY.is_address());
        assert!(!RecordType::MX.is_address());
        assert!(RecordType::TXT.matches(RecordType::ANY));
        assert!(!RecordType::TXT.matches(RecordType::A));
        assert_eq!(RecordType::PKEY.as_dns(), None);
        assert_eq!(RecordType::MX.as_dns(), Some(15));
        assert!(!RecordType::new(65600).is_known());
    }
}
