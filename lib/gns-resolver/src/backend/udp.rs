/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use log::debug;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

use super::DnsStub;
use crate::config::ResolverRuntimeConfig;

/// Max size for the UDP receive buffer as recommended by
/// [RFC6891](https://datatracker.ietf.org/doc/html/rfc6891#section-6.2.5).
const MAX_RECEIVE_BUFFER_SIZE: usize = 4_096;

const REPLY_CHANNEL_SIZE: usize = 4;

/// Plain UDP DNS transport.
///
/// The servers are tried in order, each for at most `request_timeout`. A
/// fresh socket, and by that a random source port, is used for each server.
#[derive(Clone, Debug)]
pub struct UdpDnsStub {
    request_timeout: Duration,
}

impl UdpDnsStub {
    pub fn new(request_timeout: Duration) -> Self {
        UdpDnsStub { request_timeout }
    }

    /// Use the configured `dns_request_timeout` as the per-server timeout.
    pub fn with_config(config: &ResolverRuntimeConfig) -> Self {
        UdpDnsStub::new(config.dns_request_timeout)
    }
}

impl DnsStub for UdpDnsStub {
    fn resolve(&self, servers: &[SocketAddr], query: Vec<u8>) -> mpsc::Receiver<Vec<u8>> {
        let (sender, receiver) = mpsc::channel(REPLY_CHANNEL_SIZE);
        let servers = servers.to_vec();
        let request_timeout = self.request_timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = sender.closed() => {}
                _ = query_servers(&servers, &query, request_timeout, &sender) => {}
            }
        });
        receiver
    }
}

async fn query_servers(
    servers: &[SocketAddr],
    query: &[u8],
    request_timeout: Duration,
    sender: &mpsc::Sender<Vec<u8>>,
) {
    for server in servers {
        match tokio::time::timeout(request_timeout, udp_send_recv(*server, query, sender)).await
        {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => debug!("dns query to {server} failed: {e}"),
            Err(_) => debug!("dns query to {server} timed out"),
        }
    }
}

async fn udp_send_recv(
    server: SocketAddr,
    query: &[u8],
    sender: &mpsc::Sender<Vec<u8>>,
) -> io::Result<()> {
    let bind_addr = match server {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(server).await?;

    let nw = socket.send(query).await?;
    if nw != query.len() {
        return Err(io::Error::other(format!(
            "not all bytes of message sent, {nw} of {}",
            query.len()
        )));
    }

    loop {
        let mut recv_buf = vec![0; MAX_RECEIVE_BUFFER_SIZE];
        let nr = socket.recv(&mut recv_buf).await?;
        recv_buf.truncate(nr);
        if sender.send(recv_buf).await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forward_reply() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (n, peer) = server.recv_from(&mut buf).await.unwrap();
            let mut reply = buf[..n].to_vec();
            reply.push(0xff);
            server.send_to(&reply, peer).await.unwrap();
        });

        let stub = UdpDnsStub::new(Duration::from_secs(2));
        let mut receiver = stub.resolve(&[server_addr], vec![1, 2, 3]);
        let reply = receiver.recv().await.unwrap();
        assert_eq!(reply, vec![1, 2, 3, 0xff]);
    }

    #[test]
    fn request_timeout_from_config() {
        let mut config = ResolverRuntimeConfig::default();
        config.dns_request_timeout = Duration::from_millis(1500);
        let stub = UdpDnsStub::with_config(&config);
        assert_eq!(stub.request_timeout, Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn all_servers_silent() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = silent.local_addr().unwrap();
        let stub = UdpDnsStub::new(Duration::from_millis(50));
        let mut receiver = stub.resolve(&[addr, addr], vec![0; 12]);
        assert!(receiver.recv().await.is_none());
        drop(silent);
    }
}
