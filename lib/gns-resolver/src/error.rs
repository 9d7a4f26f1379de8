/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use gns_types::RecordType;

#[derive(Error, Debug, Clone)]
pub enum ResolveTransportError {
    #[error("dht lookup timed out")]
    DhtTimeout,
    #[error("dht query stream closed")]
    DhtDisconnected,
    #[error("dht query evicted by newer background queries")]
    DhtEvicted,
    #[error("dns lookup timed out")]
    DnsTimeout,
    #[error("dns stub closed without reply")]
    DnsDisconnected,
    #[error("address lookup failed: {0}")]
    AddressLookup(String),
    #[error("revocation check failed: {0}")]
    RevocationCheck(String),
}

impl ResolveTransportError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveTransportError::DhtTimeout => "DhtTimeout",
            ResolveTransportError::DhtDisconnected => "DhtDisconnected",
            ResolveTransportError::DhtEvicted => "DhtEvicted",
            ResolveTransportError::DnsTimeout => "DnsTimeout",
            ResolveTransportError::DnsDisconnected => "DnsDisconnected",
            ResolveTransportError::AddressLookup(_) => "AddressLookup",
            ResolveTransportError::RevocationCheck(_) => "RevocationCheck",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveProtocolError {
    #[error("malformed block: {0}")]
    MalformedBlock(String),
    #[error("malformed {0} record: {1}")]
    MalformedRecord(RecordType, String),
    #[error("malformed dns reply: {0}")]
    MalformedDnsReply(String),
    #[error("zone delegation found at the zone apex")]
    DelegationAtApex,
}

impl ResolveProtocolError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveProtocolError::MalformedBlock(_) => "MalformedBlock",
            ResolveProtocolError::MalformedRecord(_, _) => "MalformedRecord",
            ResolveProtocolError::MalformedDnsReply(_) => "MalformedDnsReply",
            ResolveProtocolError::DelegationAtApex => "DelegationAtApex",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolvePolicyError {
    #[error("recursion ceiling {0} exceeded")]
    RecursionCeiling(u32),
    #[error("zone {0} has been revoked")]
    Revoked(String),
    #[error("dns bridge records mixed with other records")]
    MixedBridgeRecords,
    #[error("dns bridge records name different dns names")]
    BridgeNameMismatch,
    #[error("synthetic dns name too long")]
    NameTooLong,
    #[error("critical record of type {0} can not be processed")]
    CriticalRecord(RecordType),
    #[error("no dns server to escape to")]
    NoDnsEscape,
    #[error("record type {0} can not be queried in dns")]
    NoDnsType(RecordType),
}

impl ResolvePolicyError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolvePolicyError::RecursionCeiling(_) => "RecursionCeiling",
            ResolvePolicyError::Revoked(_) => "Revoked",
            ResolvePolicyError::MixedBridgeRecords => "MixedBridgeRecords",
            ResolvePolicyError::BridgeNameMismatch => "BridgeNameMismatch",
            ResolvePolicyError::NameTooLong => "NameTooLong",
            ResolvePolicyError::CriticalRecord(_) => "CriticalRecord",
            ResolvePolicyError::NoDnsEscape => "NoDnsEscape",
            ResolvePolicyError::NoDnsType(_) => "NoDnsType",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveNotFoundError {
    #[error("empty record set")]
    EmptyRecordSet,
    #[error("no delegation found")]
    NoDelegation,
    #[error("no record of the requested type")]
    NoMatchingRecord,
    #[error("record set not found in local cache")]
    LocalMiss,
    #[error("no dns bridge server address resolved")]
    BridgeUnresolved,
}

impl ResolveNotFoundError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveNotFoundError::EmptyRecordSet => "EmptyRecordSet",
            ResolveNotFoundError::NoDelegation => "NoDelegation",
            ResolveNotFoundError::NoMatchingRecord => "NoMatchingRecord",
            ResolveNotFoundError::LocalMiss => "LocalMiss",
            ResolveNotFoundError::BridgeUnresolved => "BridgeUnresolved",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveServerError {
    #[error("server claims query was malformed")]
    FormErr,
    #[error("server returned general failure")]
    ServFail,
    #[error("server claims domain name not found")]
    NotFound,
    #[error("server does not implement requested operation")]
    NotImp,
    #[error("server refused query")]
    Refused,
    #[error("server returned rcode {0}")]
    Other(String),
}

impl ResolveServerError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveServerError::FormErr => "FORMERR",
            ResolveServerError::ServFail => "SERVFAIL",
            ResolveServerError::NotFound => "NXDOMAIN",
            ResolveServerError::NotImp => "NOTIMP",
            ResolveServerError::Refused => "REFUSED",
            ResolveServerError::Other(_) => "OTHER",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveLocalError {
    #[error("no resolver running")]
    NoResolverRunning,
    #[error("lookup cancelled")]
    Cancelled,
    #[error("lookup timed out")]
    QueryTimedOut,
}

impl ResolveLocalError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveLocalError::NoResolverRunning => "NoResolverRunning",
            ResolveLocalError::Cancelled => "Cancelled",
            ResolveLocalError::QueryTimedOut => "QueryTimedOut",
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("invalid name: {0}")]
    InvalidName(String),
    #[error("transport error: {0}")]
    FromTransport(#[from] ResolveTransportError),
    #[error("protocol error: {0}")]
    FromProtocol(#[from] ResolveProtocolError),
    #[error("policy error: {0}")]
    FromPolicy(#[from] ResolvePolicyError),
    #[error("not found: {0}")]
    FromNotFound(#[from] ResolveNotFoundError),
    #[error("server error: {0}")]
    FromServer(#[from] ResolveServerError),
    #[error("local error: {0}")]
    FromLocal(#[from] ResolveLocalError),
}

impl ResolveError {
    pub fn get_type(&self) -> &str {
        match self {
            ResolveError::InvalidName(_) => "InvalidName",
            ResolveError::FromTransport(_) => "TransportError",
            ResolveError::FromProtocol(_) => "ProtocolError",
            ResolveError::FromPolicy(_) => "PolicyError",
            ResolveError::FromNotFound(_) => "NotFound",
            ResolveError::FromServer(_) => "ServerError",
            ResolveError::FromLocal(_) => "LocalError",
        }
    }

    pub fn get_subtype(&self) -> &str {
        match self {
            ResolveError::InvalidName(_) => "",
            ResolveError::FromTransport(e) => e.get_type(),
            ResolveError::FromProtocol(e) => e.get_type(),
            ResolveError::FromPolicy(e) => e.get_type(),
            ResolveError::FromNotFound(e) => e.get_type(),
            ResolveError::FromServer(e) => e.get_type(),
            ResolveError::FromLocal(e) => e.get_type(),
        }
    }
}
