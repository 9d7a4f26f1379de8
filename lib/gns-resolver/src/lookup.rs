/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use ahash::AHashSet;
use async_recursion::async_recursion;
use log::debug;

use gns_types::name::{self, ROOT_LABEL};
use gns_types::rdata::Gns2DnsData;
use gns_types::{GnsRecord, RecordType, ZoneKey, time};

use crate::chain::{Authority, AuthorityChain, DnsAuthority};
use crate::context::ResolverContext;
use crate::dns::{self, DnsOutcome};
use crate::interpret::{Delegation, Interpreter};
use crate::label::Labels;
use crate::post::PostProcessor;
use crate::target::{self, NameTarget};
use crate::{
    ResolveError, ResolveNotFoundError, ResolvePolicyError, ResolveProtocolError, address,
    bridge, fetch, revocation,
};

/// Where records may be fetched from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocalOptions {
    /// Cache first, then the DHT.
    #[default]
    Default,
    /// Never query the DHT.
    NoDht,
    /// Only the starting zone is restricted to the cache.
    LocalMaster,
}

impl LocalOptions {
    fn allow_dht(&self, first_hop: bool) -> bool {
        match self {
            LocalOptions::Default => true,
            LocalOptions::NoDht => false,
            LocalOptions::LocalMaster => !first_hop,
        }
    }

    /// Options of a lookup started on behalf of this one.
    pub(crate) fn nested(self) -> Self {
        match self {
            LocalOptions::LocalMaster => LocalOptions::Default,
            o => o,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct LoopLimiter {
    count: u32,
    ceiling: u32,
}

impl LoopLimiter {
    pub(crate) fn new(ceiling: u32) -> Self {
        LoopLimiter { count: 0, ceiling }
    }

    /// Account one fetch step.
    pub(crate) fn step(&mut self) -> Result<(), ResolveError> {
        self.count += 1;
        if self.count > self.ceiling {
            debug!("recursion ceiling {} reached", self.ceiling);
            return Err(ResolvePolicyError::RecursionCeiling(self.ceiling).into());
        }
        Ok(())
    }

    pub(crate) fn nested(&self) -> Self {
        LoopLimiter {
            count: self.count + 1,
            ceiling: self.ceiling,
        }
    }
}

const MAX_NAME_LENGTH: usize = 253;

fn check_name(name: &str) -> Result<String, ResolveError> {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.len() > MAX_NAME_LENGTH {
        return Err(ResolveError::InvalidName(format!(
            "name of {} bytes is too long",
            name.len()
        )));
    }
    if !name.is_empty() && name.split('.').any(str::is_empty) {
        return Err(ResolveError::InvalidName(format!("empty label in {name}")));
    }
    Ok(name.to_string())
}

pub(crate) struct Lookup {
    ctx: Arc<ResolverContext>,
    name: String,
    record_type: RecordType,
    options: LocalOptions,
    limiter: LoopLimiter,
    labels: Labels,
    chain: AuthorityChain,
    checked: AHashSet<ZoneKey>,
    /// The DNS name of the last bridge.
    leho: Option<String>,
}

impl Lookup {
    pub(crate) fn new(
        ctx: Arc<ResolverContext>,
        zone: ZoneKey,
        record_type: RecordType,
        name: String,
        options: LocalOptions,
        limiter: LoopLimiter,
    ) -> Self {
        Lookup {
            ctx,
            name,
            record_type,
            options,
            limiter,
            labels: Labels::new(String::new()),
            chain: AuthorityChain::new(zone),
            checked: AHashSet::new(),
            leho: None,
        }
    }

    #[async_recursion]
    pub(crate) async fn run(mut self) -> Result<Vec<GnsRecord>, ResolveError> {
        if let Some(ip) = name::parse_literal_ip(&self.name) {
            self.ctx.stats.lookup.add_literal();
            let expiration_time = time::expiration_after(self.ctx.config.runtime.address_record_ttl);
            return Ok(vec![address::ip_record(ip, expiration_time)]);
        }
        let name = check_name(&self.name)?;
        self.labels.reset(name);

        loop {
            let zone = match &self.chain.tail().authority {
                Authority::Zone(zone) => *zone,
                Authority::Dns(dns) => {
                    let dns = dns.clone();
                    if let Some(records) = self.dns_step(dns).await? {
                        return Ok(records);
                    }
                    continue;
                }
            };
            if let Some(records) = self.zone_step(zone).await? {
                return Ok(records);
            }
        }
    }

    fn leho_expiration(&self) -> u64 {
        time::expiration_after(self.ctx.config.runtime.address_record_ttl)
    }

    async fn zone_step(&mut self, zone: ZoneKey) -> Result<Option<Vec<GnsRecord>>, ResolveError> {
        let (label, is_final) = match self.labels.next_label(&self.ctx.config.services) {
            Some(label) => (label, self.labels.is_done()),
            None => (ROOT_LABEL.to_string(), true),
        };
        debug!(
            "resolving label {label} in zone {zone}, after {}",
            self.chain.tail().label
        );

        self.limiter.step()?;
        if self.checked.insert(zone) {
            revocation::check(&self.ctx, &zone).await?;
        }
        let allow_dht = self.options.allow_dht(self.chain.len() == 1);
        let records = fetch::lookup_records(&self.ctx, &zone, &label, allow_dht).await?;

        let interpreter = Interpreter {
            requested: self.record_type,
            is_final,
            critical: self.ctx.critical.as_ref(),
            bridge_name_policy: self.ctx.config.bridge_name_policy,
        };
        match interpreter.interpret(records)? {
            Delegation::Deliver(records) => {
                let post = PostProcessor {
                    requested: self.record_type,
                    selector: self.labels.selector(),
                    zone: Some(&zone),
                    leho: self.leho.as_deref(),
                    leho_first: false,
                    leho_expiration: self.leho_expiration(),
                };
                post.finish(records).map(Some)
            }
            Delegation::Zone(next) => {
                if label == ROOT_LABEL {
                    return Err(ResolveProtocolError::DelegationAtApex.into());
                }
                debug!("label {label} delegated to zone {next}");
                self.chain.push(label, Authority::Zone(next));
                Ok(None)
            }
            Delegation::Redirect(target) => self.redirect(zone, label, target).await,
            Delegation::Bridge(bridges) => {
                self.bridge(zone, label, bridges).await?;
                Ok(None)
            }
        }
    }

    async fn redirect(
        &mut self,
        zone: ZoneKey,
        label: String,
        target: String,
    ) -> Result<Option<Vec<GnsRecord>>, ResolveError> {
        match target::classify(&target, Some(&zone), &self.ctx.config, false)? {
            NameTarget::Zone { zone: next, name } => {
                self.labels.reset(name);
                self.chain.push(label, Authority::Zone(next));
                Ok(None)
            }
            NameTarget::Dns(name) => {
                if self.record_type.is_address() {
                    debug!("escaping to dns address lookup of {name}");
                    let records =
                        address::resolve_records(&self.ctx, &name, self.record_type).await?;
                    return self.finish_dns(records).map(Some);
                }
                if self.ctx.config.default_dns_servers.is_empty() {
                    return Err(ResolvePolicyError::NoDnsEscape.into());
                }
                debug!("escaping to dns lookup of {name}");
                let servers = self.ctx.config.default_dns_servers.clone();
                self.labels.finish();
                self.chain
                    .push(label, Authority::Dns(DnsAuthority { name, servers }));
                Ok(None)
            }
            NameTarget::Ip(ip) => Err(ResolveError::InvalidName(format!(
                "redirect to address {ip}"
            ))),
        }
    }

    async fn bridge(
        &mut self,
        zone: ZoneKey,
        label: String,
        bridges: Vec<Gns2DnsData>,
    ) -> Result<(), ResolveError> {
        let Some(dns_name) = bridges.first().map(|b| b.dns_name.as_str()) else {
            return Err(ResolveNotFoundError::NoDelegation.into());
        };
        let unresolved = self.labels.unresolved();
        let dns_name = dns_name.strip_suffix('.').unwrap_or(dns_name);
        let synthetic = if unresolved.is_empty() {
            dns_name.to_string()
        } else {
            format!("{unresolved}.{dns_name}")
        };
        let name = idna::domain_to_ascii(&synthetic)
            .map_err(|e| ResolveError::InvalidName(format!("{synthetic}: {e}")))?;
        if name.len() > MAX_NAME_LENGTH {
            return Err(ResolvePolicyError::NameTooLong.into());
        }

        let servers = bridge::resolve_servers(
            &self.ctx,
            &zone,
            &bridges,
            self.options.nested(),
            &self.limiter,
        )
        .await?;
        debug!("label {label} bridged to dns name {name} at {servers:?}");

        self.leho = Some(name.clone());
        self.labels.finish();
        self.chain
            .push(label, Authority::Dns(DnsAuthority { name, servers }));
        Ok(())
    }

    async fn dns_step(
        &mut self,
        dns: DnsAuthority,
    ) -> Result<Option<Vec<GnsRecord>>, ResolveError> {
        match dns::resolve(
            &self.ctx,
            &dns.servers,
            &dns.name,
            self.record_type,
            &mut self.limiter,
        )
        .await?
        {
            DnsOutcome::Answer(records) => self.finish_dns(records).map(Some),
            DnsOutcome::Overlay { zone, name } => {
                debug!("dns name {} leads back to zone {zone}", dns.name);
                self.labels.reset(name);
                self.chain.push(dns.name, Authority::Zone(zone));
                Ok(None)
            }
        }
    }

    fn finish_dns(&self, records: Vec<GnsRecord>) -> Result<Vec<GnsRecord>, ResolveError> {
        let post = PostProcessor {
            requested: self.record_type,
            selector: None,
            zone: None,
            leho: self.leho.as_deref(),
            leho_first: true,
            leho_expiration: self.leho_expiration(),
        };
        post.finish(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter() {
        let mut limiter = LoopLimiter::new(2);
        assert!(limiter.step().is_ok());
        let mut nested = limiter.nested();
        assert!(limiter.step().is_ok());
        assert!(matches!(
            limiter.step(),
            Err(ResolveError::FromPolicy(ResolvePolicyError::RecursionCeiling(2)))
        ));
        assert!(nested.step().is_err());
    }

    #[test]
    fn options() {
        assert!(LocalOptions::Default.allow_dht(true));
        assert!(!LocalOptions::NoDht.allow_dht(false));
        assert!(!LocalOptions::LocalMaster.allow_dht(true));
        assert!(LocalOptions::LocalMaster.allow_dht(false));
        assert_eq!(LocalOptions::LocalMaster.nested(), LocalOptions::Default);
        assert_eq!(LocalOptions::NoDht.nested(), LocalOptions::NoDht);
    }

    #[test]
    fn names() {
        assert_eq!(check_name("www.gnu.").unwrap(), "www.gnu");
        assert_eq!(check_name("").unwrap(), "");
        assert!(check_name("www..gnu").is_err());
        assert!(check_name(&"a.".repeat(200)).is_err());
    }
}
