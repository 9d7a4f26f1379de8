/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;

use log::debug;

use gns_types::{GnsRecord, RecordType, time};

use crate::backend::AddressFamily;
use crate::context::ResolverContext;
use crate::{ResolveError, ResolveTransportError};

pub(crate) fn ip_record(ip: IpAddr, expiration_time: u64) -> GnsRecord {
    match ip {
        IpAddr::V4(ip4) => GnsRecord::new(RecordType::A, expiration_time, ip4.octets().to_vec()),
        IpAddr::V6(ip6) => {
            GnsRecord::new(RecordType::AAAA, expiration_time, ip6.octets().to_vec())
        }
    }
}

pub(crate) fn record_ip(record: &GnsRecord) -> Option<IpAddr> {
    match record.record_type {
        RecordType::A => <[u8; 4]>::try_from(record.data.as_slice())
            .ok()
            .map(IpAddr::from),
        RecordType::AAAA => <[u8; 16]>::try_from(record.data.as_slice())
            .ok()
            .map(IpAddr::from),
        _ => None,
    }
}

/// Resolve a DNS host name with the address resolver.
pub(crate) async fn resolve_host(
    ctx: &ResolverContext,
    name: &str,
    family: AddressFamily,
) -> Result<Vec<IpAddr>, ResolveError> {
    let ips = ctx
        .backends
        .address
        .resolve(name, family)
        .await
        .map_err(|e| ResolveTransportError::AddressLookup(format!("{name}: {e}")))?;
    let ips: Vec<IpAddr> = ips.into_iter().filter(|ip| family.accept(ip)).collect();
    debug!("address lookup of {name} returned {} addresses", ips.len());
    Ok(ips)
}

/// Address records for an address class request escaping to DNS.
pub(crate) async fn resolve_records(
    ctx: &ResolverContext,
    name: &str,
    record_type: RecordType,
) -> Result<Vec<GnsRecord>, ResolveError> {
    let ips = resolve_host(ctx, name, AddressFamily::for_record_type(record_type)).await?;
    let expiration_time = time::expiration_after(ctx.config.runtime.address_record_ttl);
    Ok(ips
        .into_iter()
        .map(|ip| ip_record(ip, expiration_time))
        .collect())
}
