/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod primary;
pub use primary::{as_bool, as_list, as_string, as_u16, as_u32, as_usize};

mod net;
pub use net::{as_dns_server, as_ipaddr};

mod gns;
pub use gns::{as_record_type, as_zone_key};
