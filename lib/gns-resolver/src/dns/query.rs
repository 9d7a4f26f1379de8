/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use log::{debug, trace};

use crate::context::ResolverContext;
use crate::{
    ResolveError, ResolveProtocolError, ResolveServerError, ResolveTransportError,
};

const DNS_HEADER_LEN: usize = 12;

impl ResolveError {
    pub(super) fn from_response_code(code: ResponseCode) -> Option<Self> {
        match code {
            ResponseCode::NoError => None,
            ResponseCode::FormErr => Some(ResolveServerError::FormErr.into()),
            ResponseCode::ServFail => Some(ResolveServerError::ServFail.into()),
            ResponseCode::NXDomain => Some(ResolveServerError::NotFound.into()),
            ResponseCode::NotImp => Some(ResolveServerError::NotImp.into()),
            ResponseCode::Refused => Some(ResolveServerError::Refused.into()),
            c => Some(ResolveServerError::Other(format!("{c:?}")).into()),
        }
    }
}

pub(super) fn build_query(id: u16, name: &str, dns_type: u16) -> Result<Vec<u8>, ResolveError> {
    let name = Name::from_ascii(name)
        .map_err(|e| ResolveError::InvalidName(format!("{name}: {e}")))?;

    let mut query = Query::new();
    query.set_name(name);
    query.set_query_type(RecordType::from(dns_type));
    query.set_query_class(DNSClass::IN);

    let mut msg = Message::new();
    msg.set_id(id);
    msg.set_message_type(MessageType::Query);
    msg.set_op_code(OpCode::Query);
    msg.set_recursion_desired(true);
    msg.add_query(query);
    msg.to_vec()
        .map_err(|e| ResolveError::InvalidName(format!("unable to encode query: {e}")))
}

/// Send one query and wait for the reply carrying its id.
pub(super) async fn query_once(
    ctx: &ResolverContext,
    servers: &[SocketAddr],
    name: &str,
    dns_type: u16,
) -> Result<Message, ResolveError> {
    let id = fastrand::u16(..);
    let query = build_query(id, name, dns_type)?;
    ctx.stats.backend.add_dns_query();
    debug!("dns query {id} for {name} type {dns_type} to {servers:?}");

    let mut receiver = ctx.backends.dns.resolve(servers, query);
    let wait = async {
        loop {
            let Some(reply) = receiver.recv().await else {
                return Err(ResolveError::from(ResolveTransportError::DnsDisconnected));
            };
            if reply.len() < DNS_HEADER_LEN {
                return Err(ResolveProtocolError::MalformedDnsReply(format!(
                    "reply of {} bytes too short",
                    reply.len()
                ))
                .into());
            }
            let msg = Message::from_vec(&reply)
                .map_err(|e| ResolveProtocolError::MalformedDnsReply(e.to_string()))?;
            if msg.id() != id {
                trace!("ignoring dns reply with id {}, expecting {id}", msg.id());
                continue;
            }
            return Ok(msg);
        }
    };
    match tokio::time::timeout(ctx.config.runtime.dns_lookup_timeout, wait).await {
        Ok(r) => r,
        Err(_) => Err(ResolveTransportError::DnsTimeout.into()),
    }
}
