/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::future::poll_fn;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use gns_types::{GnsRecord, RecordType, ZoneKey};

use super::{LocalOptions, LookupResult, ResolveError, ResolveLocalError};
use crate::message::LookupRequest;

#[derive(Clone, Debug)]
pub struct ResolverHandle {
    req_sender: mpsc::UnboundedSender<LookupRequest>,
}

impl PartialEq for ResolverHandle {
    fn eq(&self, other: &Self) -> bool {
        self.req_sender.same_channel(&other.req_sender)
    }
}

impl ResolverHandle {
    pub(crate) fn new(req_sender: mpsc::UnboundedSender<LookupRequest>) -> Self {
        ResolverHandle { req_sender }
    }

    pub fn is_closed(&self) -> bool {
        self.req_sender.is_closed()
    }

    /// Resolve `name` in `zone`, with the configured recursion ceiling.
    pub fn lookup(
        &self,
        zone: ZoneKey,
        record_type: RecordType,
        name: &str,
        options: LocalOptions,
    ) -> Result<LookupJob, ResolveLocalError> {
        self.send(zone, record_type, name, options, None)
    }

    pub fn lookup_with_ceiling(
        &self,
        zone: ZoneKey,
        record_type: RecordType,
        name: &str,
        options: LocalOptions,
        recursion_ceiling: u32,
    ) -> Result<LookupJob, ResolveLocalError> {
        self.send(zone, record_type, name, options, Some(recursion_ceiling))
    }

    fn send(
        &self,
        zone: ZoneKey,
        record_type: RecordType,
        name: &str,
        options: LocalOptions,
        recursion_ceiling: Option<u32>,
    ) -> Result<LookupJob, ResolveLocalError> {
        let (sender, receiver) = oneshot::channel();
        let cancel = CancellationToken::new();
        let req = LookupRequest {
            zone,
            record_type,
            name: name.to_string(),
            options,
            recursion_ceiling,
            cancel: cancel.clone(),
            sender,
        };
        match self.req_sender.send(req) {
            Ok(_) => Ok(LookupJob { receiver, cancel }),
            Err(_) => Err(ResolveLocalError::NoResolverRunning),
        }
    }
}

/// A running lookup. Dropping it cancels the lookup.
pub struct LookupJob {
    receiver: oneshot::Receiver<LookupResult>,
    cancel: CancellationToken,
}

impl LookupJob {
    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<LookupResult> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(ret)) => Poll::Ready(ret),
            Poll::Ready(Err(_)) => Poll::Ready(Err(ResolveError::FromLocal(
                ResolveLocalError::NoResolverRunning,
            ))),
        }
    }

    pub async fn recv(&mut self) -> LookupResult {
        poll_fn(|cx| self.poll_recv(cx)).await
    }

    /// The records, or nothing on any failure.
    pub async fn records(mut self) -> Vec<GnsRecord> {
        self.recv().await.unwrap_or_default()
    }

    pub fn cancel(self) {
        self.cancel.cancel();
    }
}

impl Drop for LookupJob {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
