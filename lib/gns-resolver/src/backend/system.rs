/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::IpAddr;

use async_trait::async_trait;

use super::{AddressFamily, AddressResolver};

/// Resolves host names with the system resolver.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAddressResolver;

#[async_trait]
impl AddressResolver for SystemAddressResolver {
    async fn resolve(&self, name: &str, family: AddressFamily) -> io::Result<Vec<IpAddr>> {
        let mut ips: Vec<IpAddr> = Vec::new();
        for addr in tokio::net::lookup_host((name, 0)).await? {
            let ip = addr.ip();
            if family.accept(&ip) && !ips.contains(&ip) {
                ips.push(ip);
            }
        }
        Ok(ips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn literal() {
        let ips = SystemAddressResolver
            .resolve("127.0.0.1", AddressFamily::Any)
            .await
            .unwrap();
        assert_eq!(ips, vec![IpAddr::from([127, 0, 0, 1])]);

        let ips = SystemAddressResolver
            .resolve("127.0.0.1", AddressFamily::Ipv6)
            .await
            .unwrap();
        assert!(ips.is_empty());
    }
}
