/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use gns_types::{GnsRecord, RecordType, ZoneKey};

use super::{LocalOptions, ResolveError};

pub type LookupResult = Result<Vec<GnsRecord>, ResolveError>;

#[derive(Clone, Debug)]
pub(crate) enum ResolverCommand {
    Quit,
}

pub(crate) struct LookupRequest {
    pub(crate) zone: ZoneKey,
    pub(crate) record_type: RecordType,
    pub(crate) name: String,
    pub(crate) options: LocalOptions,
    pub(crate) recursion_ceiling: Option<u32>,
    pub(crate) cancel: CancellationToken,
    pub(crate) sender: oneshot::Sender<LookupResult>,
}
