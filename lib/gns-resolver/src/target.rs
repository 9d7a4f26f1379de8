/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::IpAddr;
use std::str::FromStr;

use gns_types::{ZoneKey, name};

use crate::{ResolveError, ResolverConfig};

/// Where a name embedded in a record leads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NameTarget {
    /// `name` is what is left to resolve inside `zone`.
    Zone { zone: ZoneKey, name: String },
    Dns(String),
    Ip(IpAddr),
}

pub(crate) fn classify(
    target: &str,
    current: Option<&ZoneKey>,
    config: &ResolverConfig,
    allow_ip: bool,
) -> Result<NameTarget, ResolveError> {
    let target = target.strip_suffix('.').unwrap_or(target);
    if target.is_empty() {
        return Err(ResolveError::InvalidName("empty target name".to_string()));
    }

    if let Some(prefix) = name::strip_relative_root(target) {
        let Some(zone) = current else {
            return Err(ResolveError::InvalidName(format!(
                "relative name {target} outside of any zone"
            )));
        };
        return Ok(NameTarget::Zone {
            zone: *zone,
            name: prefix.to_string(),
        });
    }

    let (rest, tld) = name::split_tld(target);
    if let Ok(zone) = ZoneKey::from_str(tld) {
        return Ok(NameTarget::Zone {
            zone,
            name: rest.to_string(),
        });
    }
    if let Some(zone) = config.pseudo_tld(tld) {
        return Ok(NameTarget::Zone {
            zone: *zone,
            name: rest.to_string(),
        });
    }

    if allow_ip && let Some(ip) = name::parse_literal_ip(target) {
        return Ok(NameTarget::Ip(ip));
    }
    Ok(NameTarget::Dns(target.to_string()))
}
