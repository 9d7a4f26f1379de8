/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;

use gns_types::ZoneKey;

#[derive(Clone, Debug)]
pub(crate) struct DnsAuthority {
    /// The (synthetic) DNS name queried through `servers`.
    pub(crate) name: String,
    pub(crate) servers: Vec<SocketAddr>,
}

#[derive(Clone, Debug)]
pub(crate) enum Authority {
    Zone(ZoneKey),
    Dns(DnsAuthority),
}

#[derive(Clone, Debug)]
pub(crate) struct AuthorityLink {
    pub(crate) label: String,
    pub(crate) authority: Authority,
}

/// The authorities visited so far, the tail is the current one.
#[derive(Debug)]
pub(crate) struct AuthorityChain {
    links: Vec<AuthorityLink>,
}

impl AuthorityChain {
    pub(crate) fn new(zone: ZoneKey) -> Self {
        AuthorityChain {
            links: vec![AuthorityLink {
                label: String::new(),
                authority: Authority::Zone(zone),
            }],
        }
    }

    pub(crate) fn push(&mut self, label: String, authority: Authority) {
        self.links.push(AuthorityLink { label, authority });
    }

    pub(crate) fn tail(&self) -> &AuthorityLink {
        // never empty, created with the starting zone
        &self.links[self.links.len() - 1]
    }

    pub(crate) fn len(&self) -> usize {
        self.links.len()
    }
}
