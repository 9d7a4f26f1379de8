/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

use anyhow::{Context, anyhow};
use yaml_rust::Yaml;

use gns_types::{RecordType, ZoneKey};

pub fn as_zone_key(v: &Yaml) -> anyhow::Result<ZoneKey> {
    if let Yaml::String(s) = v {
        ZoneKey::from_str(s).context(format!("invalid zone key string {s}"))
    } else {
        Err(anyhow!("yaml value type for 'ZoneKey' should be 'string'"))
    }
}

/// Record type by name (`MX`, `GNS2DNS`) or number.
pub fn as_record_type(v: &Yaml) -> anyhow::Result<RecordType> {
    match v {
        Yaml::String(s) => RecordType::from_str(s),
        Yaml::Integer(i) => u32::try_from(*i)
            .map(RecordType::new)
            .map_err(|_| anyhow!("out of range record type {i}")),
        _ => Err(anyhow!(
            "yaml value type for 'RecordType' should be 'string' or 'integer'"
        )),
    }
}
