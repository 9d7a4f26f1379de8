/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use futures_util::stream::{FuturesUnordered, StreamExt};
use log::debug;

use gns_types::rdata::Gns2DnsData;
use gns_types::{RecordType, ZoneKey};

use crate::backend::AddressFamily;
use crate::context::ResolverContext;
use crate::lookup::{LocalOptions, LoopLimiter, Lookup};
use crate::target::{self, NameTarget};
use crate::{ResolveError, ResolveNotFoundError, ResolvePolicyError, address};

const DNS_PORT: u16 = 53;

type ServerLookup = BoxFuture<'static, Result<Vec<IpAddr>, ResolveError>>;

/// Find the addresses of the DNS servers named by bridge records.
///
/// Literal addresses are used as is. Every named server is looked up
/// concurrently and all lookups are awaited, the addresses of each
/// successful one are appended after the literal ones.
pub(crate) async fn resolve_servers(
    ctx: &Arc<ResolverContext>,
    zone: &ZoneKey,
    bridges: &[Gns2DnsData],
    options: LocalOptions,
    limiter: &LoopLimiter,
) -> Result<Vec<SocketAddr>, ResolveError> {
    let mut servers = Vec::new();
    let mut pending: FuturesUnordered<ServerLookup> = FuturesUnordered::new();

    for bridge in bridges {
        match target::classify(&bridge.server, Some(zone), &ctx.config, true)? {
            NameTarget::Ip(ip) => servers.push(SocketAddr::new(ip, DNS_PORT)),
            NameTarget::Dns(name) => {
                let ctx = Arc::clone(ctx);
                pending.push(
                    async move { address::resolve_host(&ctx, &name, AddressFamily::Any).await }
                        .boxed(),
                );
            }
            NameTarget::Zone { zone, name } => {
                debug!("resolving bridge server {name} in zone {zone}");
                let lookup = Lookup::new(
                    Arc::clone(ctx),
                    zone,
                    RecordType::ANY,
                    name,
                    options,
                    limiter.nested(),
                );
                pending.push(
                    async move {
                        let records = lookup.run().await?;
                        Ok(records.iter().filter_map(address::record_ip).collect())
                    }
                    .boxed(),
                );
            }
        }
    }

    while let Some(r) = pending.next().await {
        match r {
            Ok(ips) if !ips.is_empty() => {
                servers.extend(ips.into_iter().map(|ip| SocketAddr::new(ip, DNS_PORT)));
            }
            Ok(_) => debug!("bridge server has no address"),
            Err(e @ ResolveError::FromPolicy(ResolvePolicyError::RecursionCeiling(_))) => {
                return Err(e);
            }
            Err(e) => debug!("bridge server lookup failed: {e}"),
        }
    }

    if servers.is_empty() {
        Err(ResolveNotFoundError::BridgeUnresolved.into())
    } else {
        Ok(servers)
    }
}
