/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use ahash::AHashMap;
use anyhow::anyhow;

use gns_types::{RecordType, ZoneKey};

use crate::ServiceRegistry;

#[cfg(feature = "yaml")]
mod yaml;

const DEFAULT_DHT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_DNS_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_DNS_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PROTECTIVE_QUERY_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_GRACEFUL_STOP_WAIT: Duration = Duration::from_secs(30);
const DEFAULT_DHT_REPLICATION_LEVEL: u32 = 10;
const DEFAULT_MAX_BACKGROUND_QUERIES: usize = 1000;
const DEFAULT_RECURSION_CEILING: u32 = 128;
const DEFAULT_ADDRESS_RECORD_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolverRuntimeConfig {
    pub dht_lookup_timeout: Duration,
    pub dns_lookup_timeout: Duration,
    pub dns_request_timeout: Duration,
    pub protective_query_timeout: Duration,
    pub graceful_stop_wait: Duration,
    pub dht_replication_level: u32,
    pub max_background_queries: usize,
    pub recursion_ceiling: u32,
    pub disable_cache: bool,
    pub address_record_ttl: Duration,
}

impl Default for ResolverRuntimeConfig {
    fn default() -> Self {
        ResolverRuntimeConfig {
            dht_lookup_timeout: DEFAULT_DHT_LOOKUP_TIMEOUT,
            dns_lookup_timeout: DEFAULT_DNS_LOOKUP_TIMEOUT,
            dns_request_timeout: DEFAULT_DNS_REQUEST_TIMEOUT,
            protective_query_timeout: DEFAULT_PROTECTIVE_QUERY_TIMEOUT,
            graceful_stop_wait: DEFAULT_GRACEFUL_STOP_WAIT,
            dht_replication_level: DEFAULT_DHT_REPLICATION_LEVEL,
            max_background_queries: DEFAULT_MAX_BACKGROUND_QUERIES,
            recursion_ceiling: DEFAULT_RECURSION_CEILING,
            disable_cache: false,
            address_record_ttl: DEFAULT_ADDRESS_RECORD_TTL,
        }
    }
}

/// What to do when the bridge records of one label name different DNS names.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BridgeNamePolicy {
    #[default]
    Reject,
    PickFirst,
}

impl FromStr for BridgeNamePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "reject" | "strict" => Ok(BridgeNamePolicy::Reject),
            "pick_first" | "first" => Ok(BridgeNamePolicy::PickFirst),
            _ => Err(anyhow!("invalid bridge name policy {s}")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolverConfig {
    pub name: String,
    pub runtime: ResolverRuntimeConfig,
    pub default_dns_servers: Vec<SocketAddr>,
    pseudo_tlds: AHashMap<String, ZoneKey>,
    pub critical_types: Vec<RecordType>,
    pub bridge_name_policy: BridgeNamePolicy,
    pub services: ServiceRegistry,
}

impl ResolverConfig {
    pub fn new(name: &str) -> Self {
        ResolverConfig {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_pseudo_tld(&mut self, tld: &str, zone: ZoneKey) {
        self.pseudo_tlds.insert(tld.to_ascii_lowercase(), zone);
    }

    pub fn pseudo_tld(&self, tld: &str) -> Option<&ZoneKey> {
        self.pseudo_tlds.get(&tld.to_ascii_lowercase())
    }

    pub fn add_default_dns_server(&mut self, addr: SocketAddr) {
        if !self.default_dns_servers.contains(&addr) {
            self.default_dns_servers.push(addr);
        }
    }

    pub fn add_critical_type(&mut self, record_type: RecordType) {
        if !self.critical_types.contains(&record_type) {
            self.critical_types.push(record_type);
        }
    }

    pub fn check(&self) -> anyhow::Result<()> {
        if self.runtime.max_background_queries == 0 {
            return Err(anyhow!("max background queries should not be zero"));
        }
        if self.runtime.recursion_ceiling == 0 {
            return Err(anyhow!("recursion ceiling should not be zero"));
        }
        if self.runtime.dns_lookup_timeout.is_zero() || self.runtime.dht_lookup_timeout.is_zero()
        {
            return Err(anyhow!("lookup timeout should not be zero"));
        }
        if self.runtime.dns_request_timeout > self.runtime.dns_lookup_timeout {
            return Err(anyhow!(
                "dns request timeout should not be greater than dns lookup timeout"
            ));
        }
        Ok(())
    }
}
