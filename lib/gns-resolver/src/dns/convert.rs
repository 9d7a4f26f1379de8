/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use hickory_proto::op::Message;
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

use gns_types::rdata::{self, MxData, SoaData, SrvData, UriData};
use gns_types::{GnsRecord, RecordType, time};

use crate::{ResolveError, ResolveProtocolError};

fn ascii_name(name: &Name) -> String {
    let s = name.to_ascii();
    match s.strip_suffix('.') {
        Some(s) => s.to_string(),
        None => s,
    }
}

fn bad_data(t: RecordType, e: impl std::fmt::Display) -> ResolveError {
    ResolveProtocolError::MalformedDnsReply(format!("invalid {t} answer: {e}")).into()
}

fn encode_dns_name(t: RecordType, name: &Name) -> Result<Vec<u8>, ResolveError> {
    let mut buf = Vec::new();
    rdata::encode_name(&ascii_name(name), &mut buf).map_err(|e| bad_data(t, e))?;
    Ok(buf)
}

fn convert_record(record: &Record) -> Result<GnsRecord, ResolveError> {
    let t = RecordType::from(u16::from(record.record_type()));
    let data = match record.data() {
        RData::A(a) => Ipv4Addr::from(*a).octets().to_vec(),
        RData::AAAA(aaaa) => Ipv6Addr::from(*aaaa).octets().to_vec(),
        RData::CNAME(v) => encode_dns_name(t, &v.0)?,
        RData::NS(v) => encode_dns_name(t, &v.0)?,
        RData::PTR(v) => encode_dns_name(t, &v.0)?,
        RData::MX(mx) => MxData {
            preference: mx.preference(),
            exchange: ascii_name(mx.exchange()),
        }
        .to_bytes()
        .map_err(|e| bad_data(t, e))?,
        RData::SOA(soa) => SoaData {
            mname: ascii_name(soa.mname()),
            rname: ascii_name(soa.rname()),
            serial: soa.serial(),
            refresh: soa.refresh() as u32,
            retry: soa.retry() as u32,
            expire: soa.expire() as u32,
            minimum: soa.minimum(),
        }
        .to_bytes()
        .map_err(|e| bad_data(t, e))?,
        RData::SRV(srv) => SrvData {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: ascii_name(srv.target()),
        }
        .to_bytes()
        .map_err(|e| bad_data(t, e))?,
        other => {
            let mut buf = Vec::new();
            let mut encoder = BinEncoder::new(&mut buf);
            other.emit(&mut encoder).map_err(|e| bad_data(t, e))?;
            if t == RecordType::URI {
                UriData::parse(&buf).map_err(|e| bad_data(t, e))?;
            }
            buf
        }
    };
    let expiration = time::expiration_after(Duration::from_secs(u64::from(record.ttl())));
    Ok(GnsRecord::new(t, expiration, data))
}

/// The answers owned by `name`, in GNS record format.
pub(super) fn convert_answers(msg: &Message, name: &str) -> Result<Vec<GnsRecord>, ResolveError> {
    let mut records = Vec::with_capacity(msg.answers().len());
    for r in msg.answers() {
        if !ascii_name(r.name()).eq_ignore_ascii_case(name) {
            continue;
        }
        records.push(convert_record(r)?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::rdata::{A, CNAME, MX, TXT};

    fn answer(name: &str, ttl: u32, data: RData) -> Record {
        Record::from_rdata(Name::from_ascii(name).unwrap(), ttl, data)
    }

    #[test]
    fn convert() {
        let mut msg = Message::new();
        msg.add_answer(answer(
            "www.example.com.",
            60,
            RData::A(A::new(192, 0, 2, 7)),
        ));
        msg.add_answer(answer(
            "www.example.com.",
            60,
            RData::MX(MX::new(5, Name::from_ascii("mx.example.com.").unwrap())),
        ));
        msg.add_answer(answer(
            "www.example.com.",
            60,
            RData::TXT(TXT::new(vec!["hi".to_string()])),
        ));
        msg.add_answer(answer(
            "other.example.com.",
            60,
            RData::CNAME(CNAME(Name::from_ascii("x.example.com.").unwrap())),
        ));

        let records = convert_answers(&msg, "www.example.com").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].record_type, RecordType::A);
        assert_eq!(records[0].data, vec![192, 0, 2, 7]);
        assert!(records[0].expiration_time > time::now_micros());
        let mx = MxData::parse(&records[1].data).unwrap();
        assert_eq!(mx.preference, 5);
        assert_eq!(mx.exchange, "mx.example.com");
        assert_eq!(records[2].record_type, RecordType::TXT);
        assert_eq!(records[2].data, b"\x02hi");
    }
}
