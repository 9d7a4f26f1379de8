/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;

const BUILTIN_PROTOCOLS: &[(&str, u16)] = &[
    ("icmp", 1),
    ("tcp", 6),
    ("udp", 17),
    ("dccp", 33),
    ("sctp", 132),
];

const BUILTIN_SERVICES: &[(&str, u16)] = &[
    ("ftp", 21),
    ("ssh", 22),
    ("telnet", 23),
    ("smtp", 25),
    ("domain", 53),
    ("http", 80),
    ("pop3", 110),
    ("imap", 143),
    ("ldap", 389),
    ("https", 443),
    ("submissions", 465),
    ("submission", 587),
    ("ldaps", 636),
    ("imaps", 993),
    ("pop3s", 995),
    ("sip", 5060),
    ("sips", 5061),
    ("xmpp-client", 5222),
    ("xmpp-server", 5269),
    ("matrix", 8448),
    ("gnunet", 2086),
];

/// Name tables for the `_service._proto` labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceRegistry {
    protocols: Vec<(String, u16)>,
    services: Vec<(String, u16)>,
}

fn find(extra: &[(String, u16)], builtin: &[(&str, u16)], name: &str) -> Option<u16> {
    extra
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
        .or_else(|| {
            builtin
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| *v)
        })
        .or_else(|| u16::from_str(name).ok())
}

impl ServiceRegistry {
    pub fn add_protocol(&mut self, name: &str, number: u16) {
        self.protocols.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.protocols.push((name.to_string(), number));
    }

    pub fn add_service(&mut self, name: &str, port: u16) {
        self.services.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.services.push((name.to_string(), port));
    }

    pub fn protocol(&self, name: &str) -> Option<u16> {
        find(&self.protocols, BUILTIN_PROTOCOLS, name)
    }

    pub fn service(&self, name: &str) -> Option<u16> {
        find(&self.services, BUILTIN_SERVICES, name)
    }
}

/// Selects boxed records at the final label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServiceSelector {
    Port { protocol: u16, service: u16 },
    Prefix(String),
}

/// Splits `_service._proto`, which must be everything left of the cursor.
fn split_service_pair(prefix: &str) -> Option<(&str, &str)> {
    let (service, protocol) = prefix.split_once('.')?;
    let service = service.strip_prefix('_')?;
    let protocol = protocol.strip_prefix('_')?;
    if service.is_empty() || protocol.is_empty() || protocol.contains('.') {
        return None;
    }
    Some((service, protocol))
}

/// Walks a name right to left, one label at a time.
#[derive(Debug)]
pub(crate) struct Labels {
    name: String,
    cursor: usize,
    service_prefix: Option<String>,
    selector: Option<ServiceSelector>,
}

impl Labels {
    pub(crate) fn new(name: String) -> Self {
        let cursor = name.len();
        Labels {
            name,
            cursor,
            service_prefix: None,
            selector: None,
        }
    }

    pub(crate) fn reset(&mut self, name: String) {
        *self = Labels::new(name);
    }

    /// Returns `None` once every label has been consumed.
    pub(crate) fn next_label(&mut self, registry: &ServiceRegistry) -> Option<String> {
        self.absorb_service_pair(registry);
        if self.cursor == 0 {
            return None;
        }
        let prefix = &self.name[..self.cursor];
        let label = match prefix.rfind('.') {
            Some(p) => {
                self.cursor = p;
                prefix[p + 1..].to_string()
            }
            None => {
                self.cursor = 0;
                prefix.to_string()
            }
        };
        self.absorb_service_pair(registry);
        Some(label)
    }

    fn absorb_service_pair(&mut self, registry: &ServiceRegistry) {
        if self.cursor == 0 || self.service_prefix.is_some() {
            return;
        }
        let prefix = &self.name[..self.cursor];
        let Some((service, protocol)) = split_service_pair(prefix) else {
            return;
        };
        let selector = match (registry.protocol(protocol), registry.service(service)) {
            (Some(protocol), Some(service)) => ServiceSelector::Port { protocol, service },
            _ => ServiceSelector::Prefix(prefix.to_string()),
        };
        self.selector = Some(selector);
        self.service_prefix = Some(prefix.to_string());
        self.cursor = 0;
    }

    #[inline]
    pub(crate) fn is_done(&self) -> bool {
        self.cursor == 0
    }

    /// Everything not resolved yet, including an absorbed service pair.
    pub(crate) fn unresolved(&self) -> &str {
        if self.cursor > 0 {
            &self.name[..self.cursor]
        } else {
            self.service_prefix.as_deref().unwrap_or_default()
        }
    }

    pub(crate) fn finish(&mut self) {
        self.cursor = 0;
        self.service_prefix = None;
        self.selector = None;
    }

    pub(crate) fn selector(&self) -> Option<&ServiceSelector> {
        self.selector.as_ref()
    }
}
