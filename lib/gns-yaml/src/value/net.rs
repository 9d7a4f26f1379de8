/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use anyhow::anyhow;
use yaml_rust::Yaml;

const DNS_DEFAULT_PORT: u16 = 53;

pub fn as_ipaddr(v: &Yaml) -> anyhow::Result<IpAddr> {
    if let Yaml::String(s) = v {
        IpAddr::from_str(s).map_err(|e| anyhow!("invalid ip address {s}: {e}"))
    } else {
        Err(anyhow!("yaml value type for 'IpAddr' should be 'string'"))
    }
}

/// A DNS server address, the port defaults to 53.
pub fn as_dns_server(v: &Yaml) -> anyhow::Result<SocketAddr> {
    let Yaml::String(s) = v else {
        return Err(anyhow!("yaml value type for dns server should be 'string'"));
    };
    if let Ok(addr) = SocketAddr::from_str(s) {
        return Ok(addr);
    }
    let ip = s
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(s);
    match IpAddr::from_str(ip) {
        Ok(ip) => Ok(SocketAddr::new(ip, DNS_DEFAULT_PORT)),
        Err(_) => Err(anyhow!("invalid dns server address {s}")),
    }
}
