/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use log::warn;
use tokio::sync::mpsc;

use super::{ResolverConfig, ResolverStats};
use crate::backend::ResolverBackends;
use crate::context::ResolverContext;
use crate::handle::ResolverHandle;
use crate::message::{LookupRequest, ResolverCommand};
use crate::runtime::ResolverRuntime;

pub struct ResolverBuilder {
    config: ResolverConfig,
    backends: ResolverBackends,
    thread_name: Option<String>,
}

pub struct Resolver {
    config: ResolverConfig,
    stats: Arc<ResolverStats>,
    thread_handle: Option<JoinHandle<()>>,
    req_sender: mpsc::UnboundedSender<LookupRequest>,
    ctl_sender: mpsc::UnboundedSender<ResolverCommand>,
}

impl ResolverBuilder {
    pub fn new(config: ResolverConfig, backends: ResolverBackends) -> Self {
        ResolverBuilder {
            config,
            backends,
            thread_name: None,
        }
    }

    pub fn thread_name(&mut self, name: String) {
        self.thread_name = Some(name);
    }

    pub fn build(mut self) -> anyhow::Result<Resolver> {
        self.config
            .check()
            .context(format!("invalid config for resolver {}", self.config.name))?;

        let (req_sender, req_receiver) = mpsc::unbounded_channel();
        let (ctl_sender, ctl_receiver) = mpsc::unbounded_channel();

        let basic_rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build resolver runtime")?;

        let mut thread_builder = std::thread::Builder::new();
        if let Some(name) = self.thread_name.take() {
            thread_builder = thread_builder.name(name);
        }
        let stats = Arc::new(ResolverStats::default());
        let ctx = ResolverContext::new(self.config.clone(), self.backends, Arc::clone(&stats));
        let thread_handle = thread_builder
            .spawn(move || {
                basic_rt.block_on(async move {
                    let runtime = ResolverRuntime::new(Arc::new(ctx), req_receiver, ctl_receiver);
                    runtime.into_running().await;
                });
            })
            .context("failed to spawn resolver thread")?;

        Ok(Resolver {
            config: self.config,
            stats,
            thread_handle: Some(thread_handle),
            req_sender,
            ctl_sender,
        })
    }
}

impl Resolver {
    pub fn get_stats(&self) -> Arc<ResolverStats> {
        Arc::clone(&self.stats)
    }

    pub fn get_handle(&self) -> ResolverHandle {
        ResolverHandle::new(self.req_sender.clone())
    }

    pub fn get_config(&self) -> ResolverConfig {
        self.config.clone()
    }

    fn stop(&self) {
        let _ = self.ctl_sender.send(ResolverCommand::Quit);
    }

    pub async fn shutdown(&mut self) {
        if let Some(join) = self.thread_handle.take() {
            tokio::time::sleep(self.config.runtime.graceful_stop_wait).await;

            self.stop();
            let resolver_name = self.config.name.to_owned();
            if let Err(e) = tokio::task::spawn_blocking(move || {
                let thread_id = join.thread().id();
                if let Err(e) = join.join() {
                    warn!(
                        "error while waiting thread {thread_id:?} for resolver {resolver_name}: {e:?}",
                    );
                }
            })
            .await
            {
                warn!(
                    "error while waiting shutdown task for resolver {}: {e:?}",
                    self.config.name
                );
            }
        }
    }
}

impl Drop for Resolver {
    fn drop(&mut self) {
        if let Some(join) = self.thread_handle.take() {
            self.stop();
            let thread_id = join.thread().id();
            if let Err(e) = join.join() {
                warn!(
                    "error while waiting thread {thread_id:?} for resolver {}: {e:?}",
                    self.config.name
                );
            }
        }
    }
}
