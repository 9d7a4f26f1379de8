/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::{debug, warn};

use gns_types::ZoneKey;

use crate::context::ResolverContext;
use crate::{ResolveError, ResolvePolicyError, ResolveTransportError};

pub(crate) async fn check(ctx: &ResolverContext, zone: &ZoneKey) -> Result<(), ResolveError> {
    ctx.stats.backend.add_revocation_check();
    match ctx.backends.revocation.is_valid(zone).await {
        Ok(true) => {
            debug!("zone {zone} is not revoked");
            Ok(())
        }
        Ok(false) => {
            warn!("zone {zone} has been revoked");
            Err(ResolvePolicyError::Revoked(zone.to_string()).into())
        }
        Err(e) => Err(ResolveTransportError::RevocationCheck(format!("{e:?}")).into()),
    }
}
