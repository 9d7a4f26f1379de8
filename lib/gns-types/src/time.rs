/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::EXPIRATION_NEVER;

/// Microseconds since the UNIX epoch.
pub fn now_micros() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_micros()).unwrap_or(EXPIRATION_NEVER))
        .unwrap_or(0)
}

pub fn expiration_after(ttl: Duration) -> u64 {
    let ttl = u64::try_from(ttl.as_micros()).unwrap_or(EXPIRATION_NEVER);
    now_micros().saturating_add(ttl)
}
