/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

pub mod base32;
pub mod name;
pub mod rdata;
pub mod time;

mod block;
pub use block::{Block, QueryKey};

mod record;
pub use record::{EXPIRATION_NEVER, GnsRecord, RecordFlags, RecordType};

mod zone;
pub use zone::{ZONE_KEY_BYTES, ZoneKey, ZoneKeyType};
