/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::SocketAddr;

use log::debug;

use gns_types::{GnsRecord, RecordType, ZoneKey};

use crate::context::ResolverContext;
use crate::interpret::record_name;
use crate::lookup::LoopLimiter;
use crate::target::{self, NameTarget};
use crate::{ResolveError, ResolvePolicyError, address};

mod convert;
mod query;

pub(crate) enum DnsOutcome {
    Answer(Vec<GnsRecord>),
    /// A CNAME led back into a zone.
    Overlay { zone: ZoneKey, name: String },
}

/// Resolve `name` at `servers`, following CNAME answers.
pub(crate) async fn resolve(
    ctx: &ResolverContext,
    servers: &[SocketAddr],
    name: &str,
    record_type: RecordType,
    limiter: &mut LoopLimiter,
) -> Result<DnsOutcome, ResolveError> {
    let Some(dns_type) = record_type.as_dns() else {
        return Err(ResolvePolicyError::NoDnsType(record_type).into());
    };

    let mut name = name.to_string();
    loop {
        limiter.step()?;
        let msg = query::query_once(ctx, servers, &name, dns_type).await?;
        if let Some(e) = ResolveError::from_response_code(msg.response_code()) {
            debug!("dns query for {name} failed: {e}");
            return Err(e);
        }
        let answers = convert::convert_answers(&msg, &name)?;

        if matches!(record_type, RecordType::CNAME | RecordType::ANY) {
            return Ok(DnsOutcome::Answer(answers));
        }
        let Some(cname) = answers.iter().find(|r| r.record_type == RecordType::CNAME) else {
            return Ok(DnsOutcome::Answer(answers));
        };

        let cname = record_name(cname)?;
        debug!("dns name {name} is an alias of {cname}");
        match target::classify(&cname, None, &ctx.config, false)? {
            NameTarget::Zone { zone, name } => return Ok(DnsOutcome::Overlay { zone, name }),
            NameTarget::Dns(cname) => {
                if record_type.is_address() {
                    let records = address::resolve_records(ctx, &cname, record_type).await?;
                    return Ok(DnsOutcome::Answer(records));
                }
                name = cname;
            }
            NameTarget::Ip(ip) => {
                return Err(ResolveError::InvalidName(format!("alias to address {ip}")));
            }
        }
    }
}
