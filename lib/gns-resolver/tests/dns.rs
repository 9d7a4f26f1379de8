/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod common;

use std::time::Duration;

use hickory_proto::rr::rdata::{A, CNAME, TXT};
use hickory_proto::rr::{Name, RData};

use gns_resolver::{
    LocalOptions, ResolveError, ResolvePolicyError, ResolveServerError,
};
use gns_types::RecordType;

use common::*;

fn cname(target: &str) -> RData {
    RData::CNAME(CNAME(Name::from_ascii(target).unwrap()))
}

#[tokio::test]
async fn escape_address_lookup() {
    let net = TestNet::new();
    net.publish(&zone(1), "alias", vec![name_record(RecordType::CNAME, "www.example.org")]);
    net.address
        .add_host("www.example.org", Duration::ZERO, &["192.0.2.77", "2001:db8::77"]);
    let resolver = net.resolver(test_config());
    let handle = resolver.get_handle();

    let records = handle
        .lookup(zone(1), RecordType::A, "alias", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::A);
    assert_eq!(records[0].data, vec![192, 0, 2, 77]);
    assert!(net.dns.queries().is_empty());

    let r = handle
        .lookup(zone(1), RecordType::TXT, "alias", LocalOptions::Default)
        .unwrap()
        .recv()
        .await;
    assert!(matches!(
        r,
        Err(ResolveError::FromPolicy(ResolvePolicyError::NoDnsEscape))
    ));
}

#[tokio::test]
async fn escape_default_servers() {
    let net = TestNet::with_dns(TestDns {
        bogus_first: true,
        ..Default::default()
    });
    net.publish(&zone(1), "alias", vec![name_record(RecordType::CNAME, "www.example.org")]);
    net.dns.answer(
        "www.example.org",
        RData::TXT(TXT::new(vec!["v=1".to_string()])),
    );
    let mut config = test_config();
    config.add_default_dns_server("192.0.2.1:53".parse().unwrap());
    let resolver = net.resolver(config);

    let records = resolver
        .get_handle()
        .lookup(zone(1), RecordType::TXT, "alias", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::TXT);
    assert_eq!(records[0].data, b"\x03v=1");
    let queries = net.dns.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, vec!["192.0.2.1:53".parse().unwrap()]);
}

#[tokio::test]
async fn alias_back_into_zone() {
    let net = TestNet::new();
    net.publish(&zone(1), "legacy", vec![bridge_record("example.com", "192.0.2.53")]);
    net.publish(&zone(2), "host", vec![ip_record("192.0.2.9")]);
    net.dns
        .answer("www.example.com", cname(&format!("host.{}.", zone(2))));
    let resolver = net.resolver(test_config());

    let records = resolver
        .get_handle()
        .lookup(zone(1), RecordType::A, "www.legacy", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], ip_record("192.0.2.9"));
    assert_eq!(records[1].record_type, RecordType::LEHO);
}

#[tokio::test]
async fn alias_address_lookup() {
    let net = TestNet::new();
    net.publish(&zone(1), "legacy", vec![bridge_record("example.com", "192.0.2.53")]);
    net.dns.answer("www.example.com", cname("cdn.example.net."));
    net.address
        .add_host("cdn.example.net", Duration::ZERO, &["198.51.100.8"]);
    let resolver = net.resolver(test_config());

    let records = resolver
        .get_handle()
        .lookup(zone(1), RecordType::A, "www.legacy", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].record_type, RecordType::LEHO);
    assert_eq!(records[1].data, vec![198, 51, 100, 8]);
}

#[tokio::test]
async fn alias_followed_by_query() {
    let net = TestNet::new();
    net.publish(&zone(1), "legacy", vec![bridge_record("example.com", "192.0.2.53")]);
    net.dns.answer("www.example.com", cname("txt.example.net."));
    net.dns.answer(
        "txt.example.net",
        RData::TXT(TXT::new(vec!["hello".to_string()])),
    );
    let resolver = net.resolver(test_config());

    let records = resolver
        .get_handle()
        .lookup(zone(1), RecordType::TXT, "www.legacy", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].data, b"\x05hello");
    let queries = net.dns.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].1, "txt.example.net");
}

#[tokio::test]
async fn server_errors() {
    let net = TestNet::new();
    net.publish(&zone(1), "legacy", vec![bridge_record("example.com", "192.0.2.53")]);
    net.dns
        .answer("www.example.com", RData::A(A::new(198, 51, 100, 1)));
    let resolver = net.resolver(test_config());
    let handle = resolver.get_handle();

    let r = handle
        .lookup(zone(1), RecordType::A, "missing.legacy", LocalOptions::Default)
        .unwrap()
        .recv()
        .await;
    assert!(matches!(
        r,
        Err(ResolveError::FromServer(ResolveServerError::NotFound))
    ));

    let r = handle
        .lookup(zone(1), RecordType::PKEY, "www.legacy", LocalOptions::Default)
        .unwrap()
        .recv()
        .await;
    assert!(matches!(
        r,
        Err(ResolveError::FromPolicy(ResolvePolicyError::NoDnsType(_)))
    ));
}
