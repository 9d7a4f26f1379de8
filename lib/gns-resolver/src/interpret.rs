/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::debug;

use gns_types::rdata::{self, Gns2DnsData};
use gns_types::{GnsRecord, RecordType, ZoneKey};

use crate::backend::CriticalPolicy;
use crate::{
    BridgeNamePolicy, ResolveError, ResolveNotFoundError, ResolvePolicyError,
    ResolveProtocolError,
};

/// The next step decided from the record set of one label.
#[derive(Debug)]
pub(crate) enum Delegation {
    Deliver(Vec<GnsRecord>),
    Zone(ZoneKey),
    Redirect(String),
    Bridge(Vec<Gns2DnsData>),
}

pub(crate) struct Interpreter<'a> {
    pub(crate) requested: RecordType,
    pub(crate) is_final: bool,
    pub(crate) critical: &'a dyn CriticalPolicy,
    pub(crate) bridge_name_policy: BridgeNamePolicy,
}

pub(crate) fn malformed(t: RecordType, e: rdata::RecordDataError) -> ResolveError {
    ResolveProtocolError::MalformedRecord(t, e.to_string()).into()
}

pub(crate) fn record_name(record: &GnsRecord) -> Result<String, ResolveError> {
    let mut data = record.data.as_slice();
    let name = rdata::decode_name(&mut data).map_err(|e| malformed(record.record_type, e))?;
    if !data.is_empty() {
        return Err(malformed(
            record.record_type,
            rdata::RecordDataError::TrailingData(data.len()),
        ));
    }
    Ok(name)
}

impl Interpreter<'_> {
    pub(crate) fn interpret(&self, records: Vec<GnsRecord>) -> Result<Delegation, ResolveError> {
        if records.is_empty() {
            return Err(ResolveNotFoundError::EmptyRecordSet.into());
        }

        if self.is_final
            && let Some(r) = records.iter().find(|r| {
                matches!(r.record_type, RecordType::CNAME | RecordType::REDIRECT)
                    && !r.record_type.matches(self.requested)
            })
        {
            let target = record_name(r)?;
            debug!("following {} to {target}", r.record_type);
            return Ok(Delegation::Redirect(target));
        }

        if let Some(r) = records.iter().find(|r| r.record_type.is_zone_delegation())
            && !(self.is_final && r.record_type.matches(self.requested))
        {
            let zone = ZoneKey::from_record(r).map_err(|e| malformed(r.record_type, e))?;
            return Ok(Delegation::Zone(zone));
        }

        if records.iter().any(|r| r.record_type == RecordType::GNS2DNS)
            && !(self.is_final && RecordType::GNS2DNS.matches(self.requested))
        {
            return self.bridge(&records).map(Delegation::Bridge);
        }

        if let Some(r) = records.iter().find(|r| {
            !(self.is_final && r.record_type.matches(self.requested))
                && self.critical.is_critical(r)
        }) {
            return Err(ResolvePolicyError::CriticalRecord(r.record_type).into());
        }

        if self.is_final {
            return Ok(Delegation::Deliver(records));
        }
        Err(ResolveNotFoundError::NoDelegation.into())
    }

    fn bridge(&self, records: &[GnsRecord]) -> Result<Vec<Gns2DnsData>, ResolveError> {
        let mut bridges: Vec<Gns2DnsData> = Vec::with_capacity(records.len());
        for r in records {
            if r.record_type != RecordType::GNS2DNS {
                if r.is_supplemental() {
                    continue;
                }
                return Err(ResolvePolicyError::MixedBridgeRecords.into());
            }
            let data = Gns2DnsData::parse(&r.data).map_err(|e| malformed(r.record_type, e))?;
            if let Some(first) = bridges.first()
                && !first.dns_name.eq_ignore_ascii_case(&data.dns_name)
            {
                match self.bridge_name_policy {
                    BridgeNamePolicy::Reject => {
                        return Err(ResolvePolicyError::BridgeNameMismatch.into());
                    }
                    BridgeNamePolicy::PickFirst => {
                        debug!("ignoring bridge to {}", data.dns_name);
                        continue;
                    }
                }
            }
            bridges.push(data);
        }
        Ok(bridges)
    }
}
