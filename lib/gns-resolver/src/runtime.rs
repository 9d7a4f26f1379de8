/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use log::{debug, trace};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::context::ResolverContext;
use crate::lookup::{LoopLimiter, Lookup};
use crate::message::{LookupRequest, ResolverCommand};
use crate::ResolveLocalError;

pub(crate) struct ResolverRuntime {
    ctx: Arc<ResolverContext>,
    req_receiver: mpsc::UnboundedReceiver<LookupRequest>,
    ctl_receiver: mpsc::UnboundedReceiver<ResolverCommand>,
    shutdown: CancellationToken,
    tasks: JoinSet<()>,
}

impl ResolverRuntime {
    pub(crate) fn new(
        ctx: Arc<ResolverContext>,
        req_receiver: mpsc::UnboundedReceiver<LookupRequest>,
        ctl_receiver: mpsc::UnboundedReceiver<ResolverCommand>,
    ) -> Self {
        ResolverRuntime {
            ctx,
            req_receiver,
            ctl_receiver,
            shutdown: CancellationToken::new(),
            tasks: JoinSet::new(),
        }
    }

    fn spawn_lookup(&mut self, req: LookupRequest) {
        let ctx = Arc::clone(&self.ctx);
        let shutdown = self.shutdown.clone();
        ctx.stats.lookup.add_total();
        self.tasks.spawn(async move {
            let ceiling = req
                .recursion_ceiling
                .unwrap_or(ctx.config.runtime.recursion_ceiling);
            trace!(
                "lookup of {} type {} in zone {}",
                req.name, req.record_type, req.zone
            );
            let lookup = Lookup::new(
                Arc::clone(&ctx),
                req.zone,
                req.record_type,
                req.name,
                req.options,
                LoopLimiter::new(ceiling),
            );
            let timeout = ctx.config.runtime.protective_query_timeout;

            let r = tokio::select! {
                biased;

                _ = req.cancel.cancelled() => {
                    ctx.stats.lookup.add_cancelled();
                    return;
                }
                _ = shutdown.cancelled() => Err(ResolveLocalError::NoResolverRunning.into()),
                r = tokio::time::timeout(timeout, lookup.run()) => match r {
                    Ok(r) => r,
                    Err(_) => Err(ResolveLocalError::QueryTimedOut.into()),
                },
            };
            match &r {
                Ok(_) => ctx.stats.lookup.add_ok(),
                Err(e) => {
                    debug!("lookup failed: {e}");
                    ctx.stats.lookup.add_failed(e);
                }
            }
            let _ = req.sender.send(r);
        });
    }

    pub(crate) async fn into_running(mut self) {
        loop {
            tokio::select! {
                biased;

                cmd = self.ctl_receiver.recv() => {
                    match cmd {
                        Some(ResolverCommand::Quit) | None => break,
                    }
                }
                req = self.req_receiver.recv() => {
                    match req {
                        Some(req) => self.spawn_lookup(req),
                        None => break,
                    }
                }
                Some(_) = self.tasks.join_next(), if !self.tasks.is_empty() => {}
            }
        }

        debug!("resolver {} stopping", self.ctx.config.name);
        self.shutdown.cancel();
        while self.tasks.join_next().await.is_some() {}
    }
}
