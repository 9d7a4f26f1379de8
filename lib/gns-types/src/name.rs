/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;
use std::str::FromStr;

use crate::ZoneKey;

/// Label of the records published at the apex of a zone.
pub const ROOT_LABEL: &str = "@";
/// Pseudo label standing for the zone that published a record.
pub const RELATIVE_ROOT_LABEL: &str = "+";

/// Split off the rightmost label.
pub fn split_tld(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(p) => (&name[..p], &name[p + 1..]),
        None => ("", name),
    }
}

pub fn is_relative(name: &str) -> bool {
    name == RELATIVE_ROOT_LABEL || name.ends_with(".+")
}

/// The name without its relative root suffix, empty for the zone apex.
pub fn strip_relative_root(name: &str) -> Option<&str> {
    if name == RELATIVE_ROOT_LABEL {
        Some("")
    } else {
        name.strip_suffix(".+")
    }
}

/// Rewrite a trailing relative root to the key string of `zone`.
pub fn expand_relative_root(name: &str, zone: &ZoneKey) -> Option<String> {
    strip_relative_root(name).map(|prefix| {
        if prefix.is_empty() {
            zone.to_string()
        } else {
            format!("{prefix}.{zone}")
        }
    })
}

pub fn parse_literal_ip(name: &str) -> Option<IpAddr> {
    let name = name
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(name);
    IpAddr::from_str(name).ok()
}
