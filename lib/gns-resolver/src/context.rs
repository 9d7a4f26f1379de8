/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use crate::backend::{CriticalPolicy, FlagCriticalPolicy, ResolverBackends};
use crate::dht::DhtQueryHeap;
use crate::{ResolverConfig, ResolverStats};

/// State shared by every lookup of one resolver.
pub(crate) struct ResolverContext {
    pub(crate) config: ResolverConfig,
    pub(crate) backends: ResolverBackends,
    pub(crate) critical: Arc<dyn CriticalPolicy>,
    pub(crate) dht_queries: DhtQueryHeap,
    pub(crate) stats: Arc<ResolverStats>,
}

impl ResolverContext {
    pub(crate) fn new(
        config: ResolverConfig,
        backends: ResolverBackends,
        stats: Arc<ResolverStats>,
    ) -> Self {
        let critical = match &backends.critical {
            Some(policy) => Arc::clone(policy),
            None => Arc::new(FlagCriticalPolicy::new(config.critical_types.clone())),
        };
        let dht_queries = DhtQueryHeap::new(config.runtime.max_background_queries);
        ResolverContext {
            config,
            backends,
            critical,
            dht_queries,
            stats,
        }
    }
}
