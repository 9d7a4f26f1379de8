/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use log::{debug, trace};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use gns_types::{Block, GnsRecord, QueryKey, ZoneKey, time};

use crate::context::ResolverContext;
use crate::fetch;
use crate::{ResolveError, ResolveTransportError};

type QueryId = (Instant, u64);

#[derive(Default)]
struct HeapInner {
    next_seq: u64,
    queries: BTreeMap<QueryId, CancellationToken>,
}

/// Outstanding background DHT queries of all lookups, oldest first.
pub(crate) struct DhtQueryHeap {
    cap: usize,
    inner: Mutex<HeapInner>,
}

pub(crate) struct DhtQueryGuard<'a> {
    heap: &'a DhtQueryHeap,
    id: QueryId,
    evicted: CancellationToken,
}

impl DhtQueryHeap {
    pub(crate) fn new(cap: usize) -> Self {
        DhtQueryHeap {
            cap: cap.max(1),
            inner: Mutex::new(HeapInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HeapInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a new query, evicting the oldest ones beyond the cap.
    ///
    /// Returns the guard of the new query and the number of evicted queries.
    pub(crate) fn register(&self) -> (DhtQueryGuard<'_>, usize) {
        let evicted = CancellationToken::new();
        let mut inner = self.lock();
        let id = (Instant::now(), inner.next_seq);
        inner.next_seq += 1;
        inner.queries.insert(id, evicted.clone());

        let mut n = 0;
        while inner.queries.len() > self.cap {
            let Some((_, oldest)) = inner.queries.pop_first() else {
                break;
            };
            oldest.cancel();
            n += 1;
        }
        drop(inner);

        (
            DhtQueryGuard {
                heap: self,
                id,
                evicted,
            },
            n,
        )
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().queries.len()
    }
}

impl DhtQueryGuard<'_> {
    pub(crate) async fn evicted(&self) {
        self.evicted.cancelled().await
    }
}

impl Drop for DhtQueryGuard<'_> {
    fn drop(&mut self) {
        self.heap.lock().queries.remove(&self.id);
    }
}

/// Query the DHT until a valid block for `query` shows up.
pub(crate) async fn lookup(
    ctx: &ResolverContext,
    query: QueryKey,
    zone: &ZoneKey,
    label: &str,
) -> Result<Vec<GnsRecord>, ResolveError> {
    let (guard, evicted) = ctx.dht_queries.register();
    ctx.stats.backend.add_dht_started();
    ctx.stats.backend.add_dht_evicted_n(evicted);
    debug!("starting dht query for label {label} in zone {zone}");

    let mut receiver = ctx
        .backends
        .dht
        .get(query, ctx.config.runtime.dht_replication_level);
    let deadline = tokio::time::sleep(ctx.config.runtime.dht_lookup_timeout);
    tokio::pin!(deadline);

    loop {
        let block: Block = tokio::select! {
            biased;

            _ = guard.evicted() => {
                debug!("dht query for label {label} in zone {zone} evicted");
                return Err(ResolveTransportError::DhtEvicted.into());
            }
            _ = &mut deadline => {
                debug!("dht query for label {label} in zone {zone} timed out");
                return Err(ResolveTransportError::DhtTimeout.into());
            }
            r = receiver.recv() => match r {
                Some(block) => block,
                None => return Err(ResolveTransportError::DhtDisconnected.into()),
            },
        };

        if block.query != query {
            trace!("ignoring dht block for another query key");
            continue;
        }
        if block.is_expired(time::now_micros()) {
            trace!("ignoring expired dht block for label {label}");
            continue;
        }
        let records = fetch::decrypt(ctx, &block, zone, label)?;
        fetch::store_in_cache(ctx, block);
        return Ok(records);
    }
}
