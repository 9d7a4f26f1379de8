/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use bytes::Bytes;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::{Name, RData, Record};
use tokio::sync::mpsc;

use gns_resolver::backend::{
    AddressFamily, AddressResolver, BlockDecryptor, DhtClient, DnsStub, RecordCache,
    ResolverBackends, RevocationOracle,
};
use gns_resolver::{Resolver, ResolverBuilder, ResolverConfig};
use gns_types::rdata::{self, Gns2DnsData};
use gns_types::{
    Block, EXPIRATION_NEVER, GnsRecord, QueryKey, RecordFlags, RecordType, ZONE_KEY_BYTES,
    ZoneKey, ZoneKeyType,
};

const CORRUPT_PAYLOAD: &[u8] = b"corrupt";

pub fn zone(n: u8) -> ZoneKey {
    ZoneKey::new(ZoneKeyType::EdDsa, [n; ZONE_KEY_BYTES])
}

pub fn zone_record(zone: &ZoneKey) -> GnsRecord {
    GnsRecord::new(
        zone.key_type().record_type(),
        EXPIRATION_NEVER,
        zone.to_record_data(),
    )
}

pub fn ip_record(ip: &str) -> GnsRecord {
    let (record_type, data) = match ip.parse::<IpAddr>().unwrap() {
        IpAddr::V4(ip) => (RecordType::A, ip.octets().to_vec()),
        IpAddr::V6(ip) => (RecordType::AAAA, ip.octets().to_vec()),
    };
    GnsRecord::new(record_type, EXPIRATION_NEVER, data)
}

pub fn name_record(record_type: RecordType, name: &str) -> GnsRecord {
    let mut data = Vec::new();
    rdata::encode_name(name, &mut data).unwrap();
    GnsRecord::new(record_type, EXPIRATION_NEVER, data)
}

pub fn txt_record(text: &str) -> GnsRecord {
    GnsRecord::new(RecordType::TXT, EXPIRATION_NEVER, text.as_bytes().to_vec())
}

pub fn bridge_record(dns_name: &str, server: &str) -> GnsRecord {
    let data = Gns2DnsData {
        dns_name: dns_name.to_string(),
        server: server.to_string(),
    };
    GnsRecord::new(RecordType::GNS2DNS, EXPIRATION_NEVER, data.to_bytes().unwrap())
}

pub fn critical(record: GnsRecord) -> GnsRecord {
    record.with_flags(RecordFlags::CRITICAL)
}

/// Record sets published by every zone, keyed by query key.
#[derive(Default)]
pub struct Publisher {
    records: Mutex<HashMap<QueryKey, Vec<GnsRecord>>>,
    corrupt: Mutex<HashSet<QueryKey>>,
}

impl Publisher {
    fn block(&self, query: QueryKey) -> Option<Block> {
        if self.corrupt.lock().unwrap().contains(&query) {
            return Some(Block::new(
                query,
                EXPIRATION_NEVER,
                Bytes::from_static(CORRUPT_PAYLOAD),
            ));
        }
        self.records.lock().unwrap().get(&query)?;
        Some(Block::new(query, EXPIRATION_NEVER, Bytes::from_static(b"records")))
    }
}

pub struct TestDecryptor {
    publisher: Arc<Publisher>,
}

impl BlockDecryptor for TestDecryptor {
    fn decrypt(&self, block: &Block, zone: &ZoneKey, label: &str) -> anyhow::Result<Vec<GnsRecord>> {
        if block.query != QueryKey::derive(zone, label) {
            return Err(anyhow!("block does not belong to label {label}"));
        }
        if block.payload.as_ref() == CORRUPT_PAYLOAD {
            return Err(anyhow!("invalid block signature"));
        }
        self.publisher
            .records
            .lock()
            .unwrap()
            .get(&block.query)
            .cloned()
            .ok_or_else(|| anyhow!("no records"))
    }
}

/// Answers with the published block. Stalled queries never answer.
#[derive(Default)]
pub struct TestDht {
    publisher: Arc<Publisher>,
    stalled: Mutex<HashSet<QueryKey>>,
    queries: Mutex<Vec<QueryKey>>,
    pending: Mutex<Vec<mpsc::Sender<Block>>>,
}

impl TestDht {
    pub fn stall(&self, zone: &ZoneKey, label: &str) {
        self.stalled
            .lock()
            .unwrap()
            .insert(QueryKey::derive(zone, label));
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queried(&self, zone: &ZoneKey, label: &str) -> usize {
        let query = QueryKey::derive(zone, label);
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|q| **q == query)
            .count()
    }
}

impl DhtClient for TestDht {
    fn get(&self, query: QueryKey, _replication: u32) -> mpsc::Receiver<Block> {
        self.queries.lock().unwrap().push(query);
        let (sender, receiver) = mpsc::channel(1);
        if self.stalled.lock().unwrap().contains(&query) {
            self.pending.lock().unwrap().push(sender);
        } else if let Some(block) = self.publisher.block(query) {
            let _ = sender.try_send(block);
        }
        receiver
    }
}

#[derive(Default)]
pub struct TestCache {
    blocks: Mutex<HashMap<QueryKey, Block>>,
    lookups: Mutex<Vec<QueryKey>>,
    stored: AtomicUsize,
}

impl TestCache {
    pub fn stored(&self) -> usize {
        self.stored.load(Ordering::Relaxed)
    }

    pub fn looked_up(&self, zone: &ZoneKey, label: &str) -> usize {
        let query = QueryKey::derive(zone, label);
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .filter(|q| **q == query)
            .count()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordCache for TestCache {
    async fn lookup(&self, query: &QueryKey) -> anyhow::Result<Option<Block>> {
        self.lookups.lock().unwrap().push(*query);
        Ok(self.blocks.lock().unwrap().get(query).cloned())
    }

    async fn store(&self, block: Block) -> anyhow::Result<()> {
        self.blocks.lock().unwrap().insert(block.query, block);
        self.stored.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[derive(Default)]
pub struct TestRevocation {
    revoked: Mutex<HashSet<ZoneKey>>,
    checks: AtomicUsize,
}

impl TestRevocation {
    pub fn revoke(&self, zone: ZoneKey) {
        self.revoked.lock().unwrap().insert(zone);
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RevocationOracle for TestRevocation {
    async fn is_valid(&self, zone: &ZoneKey) -> anyhow::Result<bool> {
        self.checks.fetch_add(1, Ordering::Relaxed);
        Ok(!self.revoked.lock().unwrap().contains(zone))
    }
}

/// Replies from a fixed answer table, NXDOMAIN for anything else.
#[derive(Default)]
pub struct TestDns {
    pub answers: Mutex<HashMap<(String, u16), Vec<RData>>>,
    pub queries: Mutex<Vec<(Vec<SocketAddr>, String)>>,
    pub bogus_first: bool,
}

impl TestDns {
    pub fn answer(&self, name: &str, rdata: RData) {
        let key = (name.to_string(), u16::from(rdata.record_type()));
        self.answers.lock().unwrap().entry(key).or_default().push(rdata);
    }

    pub fn queries(&self) -> Vec<(Vec<SocketAddr>, String)> {
        self.queries.lock().unwrap().clone()
    }

    fn reply(&self, query: &[u8]) -> Message {
        let request = Message::from_vec(query).unwrap();
        let q = request.queries()[0].clone();
        let name = q.name().to_ascii();
        let name = name.trim_end_matches('.').to_string();

        let mut msg = Message::new();
        msg.set_id(request.id());
        msg.set_message_type(MessageType::Response);
        msg.add_query(q.clone());

        let answers = self.answers.lock().unwrap();
        let mut found = false;
        for t in [u16::from(q.query_type()), 5] {
            if let Some(list) = answers.get(&(name.clone(), t)) {
                for rdata in list {
                    msg.add_answer(Record::from_rdata(q.name().clone(), 300, rdata.clone()));
                }
                found = true;
                break;
            }
        }
        if !found {
            msg.set_response_code(ResponseCode::NXDomain);
        }
        msg
    }
}

impl DnsStub for TestDns {
    fn resolve(&self, servers: &[SocketAddr], query: Vec<u8>) -> mpsc::Receiver<Vec<u8>> {
        let reply = self.reply(&query);
        let name = reply.queries()[0].name().to_ascii();
        self.queries
            .lock()
            .unwrap()
            .push((servers.to_vec(), name.trim_end_matches('.').to_string()));

        let (sender, receiver) = mpsc::channel(2);
        if self.bogus_first {
            let mut bogus = reply.clone();
            bogus.set_id(reply.id().wrapping_add(1));
            let _ = sender.try_send(bogus.to_vec().unwrap());
        }
        let _ = sender.try_send(reply.to_vec().unwrap());
        receiver
    }
}

struct ActiveGuard(Arc<AtomicUsize>);

impl ActiveGuard {
    fn new(active: &Arc<AtomicUsize>) -> Self {
        active.fetch_add(1, Ordering::SeqCst);
        ActiveGuard(Arc::clone(active))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Host lookups with a delay each. Unknown hosts never answer.
#[derive(Default)]
pub struct TestAddressResolver {
    hosts: Mutex<HashMap<String, (Duration, Option<Vec<IpAddr>>)>>,
    active: Arc<AtomicUsize>,
    finished: AtomicUsize,
}

impl TestAddressResolver {
    pub fn add_host(&self, name: &str, delay: Duration, ips: &[&str]) {
        let ips = ips.iter().map(|ip| ip.parse().unwrap()).collect();
        self.hosts
            .lock()
            .unwrap()
            .insert(name.to_string(), (delay, Some(ips)));
    }

    pub fn add_failure(&self, name: &str, delay: Duration) {
        self.hosts
            .lock()
            .unwrap()
            .insert(name.to_string(), (delay, None));
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressResolver for TestAddressResolver {
    async fn resolve(&self, name: &str, family: AddressFamily) -> io::Result<Vec<IpAddr>> {
        let _guard = ActiveGuard::new(&self.active);
        let host = self.hosts.lock().unwrap().get(name).cloned();
        let Some((delay, ips)) = host else {
            std::future::pending::<()>().await;
            unreachable!();
        };
        tokio::time::sleep(delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        match ips {
            Some(ips) => Ok(ips.into_iter().filter(|ip| family.accept(ip)).collect()),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "no such host")),
        }
    }
}

#[derive(Default)]
pub struct TestNet {
    pub publisher: Arc<Publisher>,
    pub dht: Arc<TestDht>,
    pub cache: Arc<TestCache>,
    pub revocation: Arc<TestRevocation>,
    pub dns: Arc<TestDns>,
    pub address: Arc<TestAddressResolver>,
}

impl TestNet {
    pub fn new() -> Self {
        TestNet::with_dns(TestDns::default())
    }

    pub fn with_dns(dns: TestDns) -> Self {
        let publisher = Arc::new(Publisher::default());
        let dht = TestDht {
            publisher: Arc::clone(&publisher),
            ..Default::default()
        };
        TestNet {
            publisher,
            dht: Arc::new(dht),
            dns: Arc::new(dns),
            ..Default::default()
        }
    }

    pub fn publish(&self, zone: &ZoneKey, label: &str, records: Vec<GnsRecord>) {
        self.publisher
            .records
            .lock()
            .unwrap()
            .insert(QueryKey::derive(zone, label), records);
    }

    pub fn publish_corrupt(&self, zone: &ZoneKey, label: &str) {
        self.publisher
            .corrupt
            .lock()
            .unwrap()
            .insert(QueryKey::derive(zone, label));
    }

    /// Publish only to the local cache.
    pub fn publish_cached(&self, zone: &ZoneKey, label: &str, records: Vec<GnsRecord>) {
        let query = QueryKey::derive(zone, label);
        self.publish(zone, label, records);
        self.dht.stall(zone, label);
        let block = Block::new(query, EXPIRATION_NEVER, Bytes::from_static(b"records"));
        self.cache.blocks.lock().unwrap().insert(query, block);
    }

    pub fn backends(&self) -> ResolverBackends {
        ResolverBackends::new(
            self.cache.clone(),
            self.dht.clone(),
            Arc::new(TestDecryptor {
                publisher: Arc::clone(&self.publisher),
            }),
            self.revocation.clone(),
            self.dns.clone(),
            self.address.clone(),
        )
    }

    pub fn resolver(&self, config: ResolverConfig) -> Resolver {
        ResolverBuilder::new(config, self.backends()).build().unwrap()
    }
}

pub fn test_config() -> ResolverConfig {
    let mut config = ResolverConfig::new("test");
    config.runtime.dht_lookup_timeout = Duration::from_secs(5);
    config.runtime.dns_lookup_timeout = Duration::from_secs(5);
    config.runtime.dns_request_timeout = Duration::from_secs(1);
    config.runtime.protective_query_timeout = Duration::from_secs(10);
    config
}

pub async fn wait_for<F: Fn() -> bool>(f: F) {
    for _ in 0..500 {
        if f() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
