/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bytes::{Buf, BufMut};

use super::{RecordDataError, decode_name, encode_name, ensure_consumed};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MxData {
    pub preference: u16,
    pub exchange: String,
}

impl MxData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let preference = data.try_get_u16()?;
        let exchange = decode_name(&mut data)?;
        ensure_consumed(data)?;
        Ok(MxData {
            preference,
            exchange,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordDataError> {
        let mut buf = Vec::with_capacity(4 + self.exchange.len());
        buf.put_u16(self.preference);
        encode_name(&self.exchange, &mut buf)?;
        Ok(buf)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SrvData {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl SrvData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let priority = data.try_get_u16()?;
        let weight = data.try_get_u16()?;
        let port = data.try_get_u16()?;
        let target = decode_name(&mut data)?;
        ensure_consumed(data)?;
        Ok(SrvData {
            priority,
            weight,
            port,
            target,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordDataError> {
        let mut buf = Vec::with_capacity(8 + self.target.len());
        buf.put_u16(self.priority);
        buf.put_u16(self.weight);
        buf.put_u16(self.port);
        encode_name(&self.target, &mut buf)?;
        Ok(buf)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoaData {
    pub mname: String,
    pub rname: String,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

impl SoaData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let mname = decode_name(&mut data)?;
        let rname = decode_name(&mut data)?;
        let soa = SoaData {
            mname,
            rname,
            serial: data.try_get_u32()?,
            refresh: data.try_get_u32()?,
            retry: data.try_get_u32()?,
            expire: data.try_get_u32()?,
            minimum: data.try_get_u32()?,
        };
        ensure_consumed(data)?;
        Ok(soa)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordDataError> {
        let mut buf = Vec::with_capacity(24 + self.mname.len() + self.rname.len());
        encode_name(&self.mname, &mut buf)?;
        encode_name(&self.rname, &mut buf)?;
        buf.put_u32(self.serial);
        buf.put_u32(self.refresh);
        buf.put_u32(self.retry);
        buf.put_u32(self.expire);
        buf.put_u32(self.minimum);
        Ok(buf)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UriData {
    pub priority: u16,
    pub weight: u16,
    pub target: String,
}

impl UriData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let priority = data.try_get_u16()?;
        let weight = data.try_get_u16()?;
        if data.is_empty() {
            return Err(RecordDataError::Truncated);
        }
        let target = std::str::from_utf8(data)
            .map_err(|_| RecordDataError::InvalidText)?
            .to_string();
        Ok(UriData {
            priority,
            weight,
            target,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4 + self.target.len());
        buf.put_u16(self.priority);
        buf.put_u16(self.weight);
        buf.put_slice(self.target.as_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mx() {
        let data = b"\x00\x0a\x04mail\x01+\x00";
        let mx = MxData::parse(data).unwrap();
        assert_eq!(mx.preference, 10);
        assert_eq!(mx.exchange, "mail.+");
        assert_eq!(mx.to_bytes().unwrap(), data);

        assert!(MxData::parse(b"\x00").is_err());
        assert_eq!(
            MxData::parse(b"\x00\x0a\x00\x01"),
            Err(RecordDataError::TrailingData(1))
        );
    }

    #[test]
    fn srv() {
        let srv = SrvData::parse(b"\x00\x01\x00\x02\x01\xbb\x03www\x00").unwrap();
        assert_eq!(srv.priority, 1);
        assert_eq!(srv.weight, 2);
        assert_eq!(srv.port, 443);
        assert_eq!(srv.target, "www");
    }

    #[test]
    fn soa() {
        let soa = SoaData {
            mname: "ns.+".to_string(),
            rname: "hostmaster.+".to_string(),
            serial: 1,
            refresh: 2,
            retry: 3,
            expire: 4,
            minimum: 5,
        };
        let data = soa.to_bytes().unwrap();
        assert_eq!(SoaData::parse(&data).unwrap(), soa);
        assert!(SoaData::parse(&data[..data.len() - 1]).is_err());
    }

    #[test]
    fn uri() {
        let uri = UriData::parse(b"\x00\x01\x00\x02https://example.com/").unwrap();
        assert_eq!(uri.target, "https://example.com/");
        assert!(UriData::parse(b"\x00\x01\x00\x02").is_err());
        assert!(UriData::parse(b"\x00\x01\x00\x02\xff\xfe").is_err());
    }
}
