/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

#[macro_use]
mod macros;

mod hash;
pub use hash::foreach_kv;

pub mod humanize;
pub mod value;

/// Config keys are matched case-insensitively, with `-` and `_` treated alike.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('-', "_")
}
