/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use log::trace;

use gns_types::name::expand_relative_root;
use gns_types::rdata::{self, BoxData, Gns2DnsData, MxData, SboxData, SoaData, SrvData};
use gns_types::{GnsRecord, RecordFlags, RecordType, ZoneKey};

use crate::interpret::{malformed, record_name};
use crate::{ResolveError, ResolveNotFoundError, ServiceSelector};

pub(crate) struct PostProcessor<'a> {
    pub(crate) requested: RecordType,
    pub(crate) selector: Option<&'a ServiceSelector>,
    /// Zone the relative names are expanded to.
    pub(crate) zone: Option<&'a ZoneKey>,
    pub(crate) leho: Option<&'a str>,
    pub(crate) leho_first: bool,
    pub(crate) leho_expiration: u64,
}

impl PostProcessor<'_> {
    pub(crate) fn finish(&self, records: Vec<GnsRecord>) -> Result<Vec<GnsRecord>, ResolveError> {
        let mut out = Vec::with_capacity(records.len() + 1);
        for record in records {
            let Some(record) = self.unbox(record)? else {
                continue;
            };
            let record = match self.zone {
                Some(zone) => rewrite_relative(record, zone)?,
                None => record,
            };
            out.push(record);
        }

        if !out.iter().any(|r| r.record_type.matches(self.requested)) {
            return Err(ResolveNotFoundError::NoMatchingRecord.into());
        }

        if let Some(leho) = self.leho
            && !out.iter().any(|r| r.record_type == RecordType::LEHO)
        {
            let mut data = Vec::with_capacity(leho.len() + 2);
            rdata::encode_name(leho, &mut data).map_err(|e| malformed(RecordType::LEHO, e))?;
            let record = GnsRecord::new(RecordType::LEHO, self.leho_expiration, data)
                .with_flags(RecordFlags::SUPPLEMENTAL);
            if self.leho_first {
                out.insert(0, record);
            } else {
                out.push(record);
            }
        }
        Ok(out)
    }

    fn unbox(&self, record: GnsRecord) -> Result<Option<GnsRecord>, ResolveError> {
        let Some(selector) = self.selector else {
            return Ok(Some(record));
        };
        match (record.record_type, selector) {
            (RecordType::BOX, ServiceSelector::Port { protocol, service }) => {
                let b = BoxData::parse(&record.data).map_err(|e| malformed(RecordType::BOX, e))?;
                if b.protocol == *protocol && b.service == *service {
                    Ok(Some(GnsRecord {
                        record_type: b.record_type,
                        data: b.data,
                        ..record
                    }))
                } else {
                    trace!("dropping box for {}/{}", b.service, b.protocol);
                    Ok(None)
                }
            }
            (RecordType::SBOX, ServiceSelector::Prefix(prefix)) => {
                let b =
                    SboxData::parse(&record.data).map_err(|e| malformed(RecordType::SBOX, e))?;
                if b.prefix == *prefix {
                    Ok(Some(GnsRecord {
                        record_type: b.record_type,
                        data: b.data,
                        ..record
                    }))
                } else {
                    trace!("dropping sbox for prefix {}", b.prefix);
                    Ok(None)
                }
            }
            (RecordType::BOX | RecordType::SBOX, _) => Ok(None),
            _ => Ok(Some(record)),
        }
    }
}

fn expand(name: &mut String, zone: &ZoneKey) -> bool {
    match expand_relative_root(name, zone) {
        Some(expanded) => {
            *name = expanded;
            true
        }
        None => false,
    }
}

fn rewrite_relative(mut record: GnsRecord, zone: &ZoneKey) -> Result<GnsRecord, ResolveError> {
    let t = record.record_type;
    let data = match t {
        RecordType::CNAME | RecordType::NS | RecordType::PTR | RecordType::REDIRECT => {
            let mut name = record_name(&record)?;
            if !expand(&mut name, zone) {
                return Ok(record);
            }
            let mut data = Vec::with_capacity(name.len() + 2);
            rdata::encode_name(&name, &mut data).map_err(|e| malformed(t, e))?;
            data
        }
        RecordType::MX => {
            let mut mx = MxData::parse(&record.data).map_err(|e| malformed(t, e))?;
            if !expand(&mut mx.exchange, zone) {
                return Ok(record);
            }
            mx.to_bytes().map_err(|e| malformed(t, e))?
        }
        RecordType::SRV => {
            let mut srv = SrvData::parse(&record.data).map_err(|e| malformed(t, e))?;
            if !expand(&mut srv.target, zone) {
                return Ok(record);
            }
            srv.to_bytes().map_err(|e| malformed(t, e))?
        }
        RecordType::SOA => {
            let mut soa = SoaData::parse(&record.data).map_err(|e| malformed(t, e))?;
            let mname = expand(&mut soa.mname, zone);
            let rname = expand(&mut soa.rname, zone);
            if !(mname || rname) {
                return Ok(record);
            }
            soa.to_bytes().map_err(|e| malformed(t, e))?
        }
        RecordType::GNS2DNS => {
            let mut g = Gns2DnsData::parse(&record.data).map_err(|e| malformed(t, e))?;
            if !expand(&mut g.server, zone) {
                return Ok(record);
            }
            g.to_bytes().map_err(|e| malformed(t, e))?
        }
        _ => return Ok(record),
    };
    record.data = data;
    Ok(record)
}
