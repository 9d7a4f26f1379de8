/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use gns_types::{Block, GnsRecord, QueryKey, RecordType, ZoneKey};

mod system;
pub use system::SystemAddressResolver;

mod udp;
pub use udp::UdpDnsStub;

#[async_trait]
pub trait RecordCache: Send + Sync {
    async fn lookup(&self, query: &QueryKey) -> anyhow::Result<Option<Block>>;

    async fn store(&self, block: Block) -> anyhow::Result<()>;
}

pub trait DhtClient: Send + Sync {
    /// Start a query. Blocks are sent as they are found, the query is stopped
    /// when the receiver is dropped.
    fn get(&self, query: QueryKey, replication: u32) -> mpsc::Receiver<Block>;
}

pub trait BlockDecryptor: Send + Sync {
    fn decrypt(&self, block: &Block, zone: &ZoneKey, label: &str) -> anyhow::Result<Vec<GnsRecord>>;
}

#[async_trait]
pub trait RevocationOracle: Send + Sync {
    async fn is_valid(&self, zone: &ZoneKey) -> anyhow::Result<bool>;
}

pub trait DnsStub: Send + Sync {
    /// Send a wire format query. Every datagram received in reply is
    /// forwarded until the receiver is dropped.
    fn resolve(&self, servers: &[SocketAddr], query: Vec<u8>) -> mpsc::Receiver<Vec<u8>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Any,
}

impl AddressFamily {
    pub fn for_record_type(t: RecordType) -> Self {
        match t {
            RecordType::A => AddressFamily::Ipv4,
            RecordType::AAAA => AddressFamily::Ipv6,
            _ => AddressFamily::Any,
        }
    }

    pub fn accept(&self, ip: &IpAddr) -> bool {
        match self {
            AddressFamily::Ipv4 => ip.is_ipv4(),
            AddressFamily::Ipv6 => ip.is_ipv6(),
            AddressFamily::Any => true,
        }
    }
}

#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, name: &str, family: AddressFamily) -> io::Result<Vec<IpAddr>>;
}

pub trait CriticalPolicy: Send + Sync {
    fn is_critical(&self, record: &GnsRecord) -> bool;
}

/// Critical are flagged records of unknown type, and every configured type.
pub struct FlagCriticalPolicy {
    types: Vec<RecordType>,
}

impl FlagCriticalPolicy {
    pub fn new(types: Vec<RecordType>) -> Self {
        FlagCriticalPolicy { types }
    }
}

impl CriticalPolicy for FlagCriticalPolicy {
    fn is_critical(&self, record: &GnsRecord) -> bool {
        (record.is_critical() && !record.record_type.is_known())
            || self.types.contains(&record.record_type)
    }
}

#[derive(Clone)]
pub struct ResolverBackends {
    pub cache: Arc<dyn RecordCache>,
    pub dht: Arc<dyn DhtClient>,
    pub decryptor: Arc<dyn BlockDecryptor>,
    pub revocation: Arc<dyn RevocationOracle>,
    pub dns: Arc<dyn DnsStub>,
    pub address: Arc<dyn AddressResolver>,
    pub critical: Option<Arc<dyn CriticalPolicy>>,
}

impl ResolverBackends {
    pub fn new(
        cache: Arc<dyn RecordCache>,
        dht: Arc<dyn DhtClient>,
        decryptor: Arc<dyn BlockDecryptor>,
        revocation: Arc<dyn RevocationOracle>,
        dns: Arc<dyn DnsStub>,
        address: Arc<dyn AddressResolver>,
    ) -> Self {
        ResolverBackends {
            cache,
            dht,
            decryptor,
            revocation,
            dns,
            address,
            critical: None,
        }
    }

    pub fn set_critical_policy(&mut self, policy: Arc<dyn CriticalPolicy>) {
        self.critical = Some(policy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gns_types::RecordFlags;

    #[test]
    fn flag_policy() {
        let policy = FlagCriticalPolicy::new(vec![RecordType::VPN]);
        let unknown = GnsRecord::new(RecordType::new(65600), 0, vec![]);
        assert!(!policy.is_critical(&unknown));
        assert!(policy.is_critical(&unknown.clone().with_flags(RecordFlags::CRITICAL)));

        let txt = GnsRecord::new(RecordType::TXT, 0, vec![]).with_flags(RecordFlags::CRITICAL);
        assert!(!policy.is_critical(&txt));
        assert!(policy.is_critical(&GnsRecord::new(RecordType::VPN, 0, vec![])));
    }

    #[test]
    fn family() {
        assert_eq!(
            AddressFamily::for_record_type(RecordType::AAAA),
            AddressFamily::Ipv6
        );
        let ip: IpAddr = "192.0.2.1".parse().unwrap();
        assert!(AddressFamily::Ipv4.accept(&ip));
        assert!(!AddressFamily::Ipv6.accept(&ip));
        assert!(AddressFamily::Any.accept(&ip));
    }
}
