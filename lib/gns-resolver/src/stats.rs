/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::atomic::{AtomicU64, Ordering};

use super::ResolveError;

#[derive(Default)]
pub struct ResolverLookupStats {
    total: AtomicU64,
    ok: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
    literal: AtomicU64,
    failed_transport: AtomicU64,
    failed_protocol: AtomicU64,
    failed_policy: AtomicU64,
    failed_not_found: AtomicU64,
}

#[derive(Default, Debug)]
pub struct ResolverLookupSnapshot {
    pub total: u64,
    pub ok: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub literal: u64,
    pub failed_transport: u64,
    pub failed_protocol: u64,
    pub failed_policy: u64,
    pub failed_not_found: u64,
}

impl ResolverLookupStats {
    fn snapshot(&self) -> ResolverLookupSnapshot {
        ResolverLookupSnapshot {
            total: self.total.load(Ordering::Relaxed),
            ok: self.ok.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            literal: self.literal.load(Ordering::Relaxed),
            failed_transport: self.failed_transport.load(Ordering::Relaxed),
            failed_protocol: self.failed_protocol.load(Ordering::Relaxed),
            failed_policy: self.failed_policy.load(Ordering::Relaxed),
            failed_not_found: self.failed_not_found.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add_total(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_ok(&self) {
        self.ok.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_literal(&self) {
        self.literal.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_failed(&self, e: &ResolveError) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        let counter = match e {
            ResolveError::FromTransport(_) => &self.failed_transport,
            ResolveError::FromProtocol(_) => &self.failed_protocol,
            ResolveError::FromPolicy(_) => &self.failed_policy,
            ResolveError::FromNotFound(_) => &self.failed_not_found,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Default)]
pub struct ResolverBackendStats {
    cache_hit: AtomicU64,
    cache_miss: AtomicU64,
    cache_store_ok: AtomicU64,
    cache_store_failed: AtomicU64,
    dht_started: AtomicU64,
    dht_evicted: AtomicU64,
    dns_query: AtomicU64,
    revocation_check: AtomicU64,
}

#[derive(Default, Debug)]
pub struct ResolverBackendSnapshot {
    pub cache_hit: u64,
    pub cache_miss: u64,
    pub cache_store_ok: u64,
    pub cache_store_failed: u64,
    pub dht_started: u64,
    pub dht_evicted: u64,
    pub dns_query: u64,
    pub revocation_check: u64,
}

impl ResolverBackendStats {
    fn snapshot(&self) -> ResolverBackendSnapshot {
        ResolverBackendSnapshot {
            cache_hit: self.cache_hit.load(Ordering::Relaxed),
            cache_miss: self.cache_miss.load(Ordering::Relaxed),
            cache_store_ok: self.cache_store_ok.load(Ordering::Relaxed),
            cache_store_failed: self.cache_store_failed.load(Ordering::Relaxed),
            dht_started: self.dht_started.load(Ordering::Relaxed),
            dht_evicted: self.dht_evicted.load(Ordering::Relaxed),
            dns_query: self.dns_query.load(Ordering::Relaxed),
            revocation_check: self.revocation_check.load(Ordering::Relaxed),
        }
    }

    #[inline]
    pub(crate) fn add_cache_hit(&self) {
        self.cache_hit.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_cache_miss(&self) {
        self.cache_miss.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_cache_store(&self, ok: bool) {
        if ok {
            self.cache_store_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_store_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn add_dht_started(&self) {
        self.dht_started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_dht_evicted_n(&self, n: usize) {
        if n > 0 {
            self.dht_evicted.fetch_add(n as u64, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn add_dns_query(&self) {
        self.dns_query.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_revocation_check(&self) {
        self.revocation_check.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Default)]
pub struct ResolverStats {
    pub(crate) lookup: ResolverLookupStats,
    pub(crate) backend: ResolverBackendStats,
}

impl ResolverStats {
    pub fn snapshot(&self) -> ResolverSnapshot {
        ResolverSnapshot {
            lookup: self.lookup.snapshot(),
            backend: self.backend.snapshot(),
        }
    }
}

#[derive(Default, Debug)]
pub struct ResolverSnapshot {
    pub lookup: ResolverLookupSnapshot,
    pub backend: ResolverBackendSnapshot,
}
