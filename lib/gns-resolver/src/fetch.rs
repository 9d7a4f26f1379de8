/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::{debug, warn};

use gns_types::{Block, GnsRecord, QueryKey, ZoneKey, time};

use crate::context::ResolverContext;
use crate::{ResolveError, ResolveNotFoundError, ResolveProtocolError, dht};

/// Fetch the record set published by `zone` under `label`.
pub(crate) async fn lookup_records(
    ctx: &ResolverContext,
    zone: &ZoneKey,
    label: &str,
    allow_dht: bool,
) -> Result<Vec<GnsRecord>, ResolveError> {
    let query = QueryKey::derive(zone, label);

    if !ctx.config.runtime.disable_cache {
        match ctx.backends.cache.lookup(&query).await {
            Ok(Some(block)) if !block.is_expired(time::now_micros()) => {
                ctx.stats.backend.add_cache_hit();
                debug!("cache hit for label {label} in zone {zone}");
                return decrypt(ctx, &block, zone, label);
            }
            Ok(_) => ctx.stats.backend.add_cache_miss(),
            Err(e) => {
                ctx.stats.backend.add_cache_miss();
                warn!("cache lookup for label {label} in zone {zone} failed: {e:?}");
            }
        }
    }

    if !allow_dht {
        debug!("local lookup of label {label} in zone {zone} missed");
        return Err(ResolveNotFoundError::LocalMiss.into());
    }
    dht::lookup(ctx, query, zone, label).await
}

pub(crate) fn decrypt(
    ctx: &ResolverContext,
    block: &Block,
    zone: &ZoneKey,
    label: &str,
) -> Result<Vec<GnsRecord>, ResolveError> {
    ctx.backends
        .decryptor
        .decrypt(block, zone, label)
        .map_err(|e| {
            warn!("failed to decrypt block for label {label} in zone {zone}: {e}");
            ResolveError::from(ResolveProtocolError::MalformedBlock(e.to_string()))
        })
}

/// Write a fresh DHT block back to the cache, in the background.
pub(crate) fn store_in_cache(ctx: &ResolverContext, block: Block) {
    if ctx.config.runtime.disable_cache {
        return;
    }
    let cache = Arc::clone(&ctx.backends.cache);
    let stats = Arc::clone(&ctx.stats);
    tokio::spawn(async move {
        match cache.store(block).await {
            Ok(_) => stats.backend.add_cache_store(true),
            Err(e) => {
                stats.backend.add_cache_store(false);
                warn!("failed to store block in cache: {e:?}");
            }
        }
    });
}
