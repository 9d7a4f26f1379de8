/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

mod common;

use std::time::Duration;

use gns_resolver::{LocalOptions, ResolveError, ResolveTransportError};
use gns_types::RecordType;

use common::*;

#[tokio::test]
async fn oldest_query_evicted() {
    let net = TestNet::new();
    net.dht.stall(&zone(1), "one");
    net.dht.stall(&zone(1), "two");
    net.publish(&zone(1), "three", vec![ip_record("192.0.2.3")]);
    let mut config = test_config();
    config.runtime.max_background_queries = 2;
    let resolver = net.resolver(config);
    let handle = resolver.get_handle();

    let mut first = handle
        .lookup(zone(1), RecordType::A, "one", LocalOptions::Default)
        .unwrap();
    wait_for(|| net.dht.query_count() == 1).await;
    let mut second = handle
        .lookup(zone(1), RecordType::A, "two", LocalOptions::Default)
        .unwrap();
    wait_for(|| net.dht.query_count() == 2).await;

    let records = handle
        .lookup(zone(1), RecordType::A, "three", LocalOptions::Default)
        .unwrap()
        .records()
        .await;
    assert_eq!(records, vec![ip_record("192.0.2.3")]);

    assert!(matches!(
        first.recv().await,
        Err(ResolveError::FromTransport(ResolveTransportError::DhtEvicted))
    ));
    assert!(
        tokio::time::timeout(Duration::from_millis(100), second.recv())
            .await
            .is_err()
    );
    assert_eq!(resolver.get_stats().snapshot().backend.dht_evicted, 1);
}

#[tokio::test]
async fn query_timeout() {
    let net = TestNet::new();
    net.dht.stall(&zone(1), "slow");
    let mut config = test_config();
    config.runtime.dht_lookup_timeout = Duration::from_millis(50);
    let resolver = net.resolver(config);

    let r = resolver
        .get_handle()
        .lookup(zone(1), RecordType::A, "slow", LocalOptions::Default)
        .unwrap()
        .recv()
        .await;
    assert!(matches!(
        r,
        Err(ResolveError::FromTransport(ResolveTransportError::DhtTimeout))
    ));
}

#[tokio::test]
async fn cancelled_lookup() {
    let net = TestNet::new();
    net.dht.stall(&zone(1), "slow");
    let resolver = net.resolver(test_config());
    let stats = resolver.get_stats();

    let job = resolver
        .get_handle()
        .lookup(zone(1), RecordType::A, "slow", LocalOptions::Default)
        .unwrap();
    wait_for(|| net.dht.query_count() == 1).await;
    job.cancel();
    wait_for(|| stats.snapshot().lookup.cancelled == 1).await;
}
