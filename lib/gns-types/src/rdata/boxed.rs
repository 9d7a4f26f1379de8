/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bytes::{Buf, BufMut};

use super::RecordDataError;
use crate::RecordType;

/// A record boxed under a protocol and service (port) number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxData {
    pub protocol: u16,
    pub service: u16,
    pub record_type: RecordType,
    pub data: Vec<u8>,
}

impl BoxData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let protocol = data.try_get_u16()?;
        let service = data.try_get_u16()?;
        let record_type = RecordType::new(data.try_get_u32()?);
        Ok(BoxData {
            protocol,
            service,
            record_type,
            data: data.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(8 + self.data.len());
        buf.put_u16(self.protocol);
        buf.put_u16(self.service);
        buf.put_u32(self.record_type.value());
        buf.put_slice(&self.data);
        buf
    }
}

/// A record boxed under a free form prefix such as `_acme._foo`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SboxData {
    pub prefix: String,
    pub record_type: RecordType,
    pub data: Vec<u8>,
}

impl SboxData {
    pub fn parse(data: &[u8]) -> Result<Self, RecordDataError> {
        let Some(end) = data.iter().position(|b| *b == 0) else {
            return Err(RecordDataError::Truncated);
        };
        let prefix = std::str::from_utf8(&data[..end])
            .map_err(|_| RecordDataError::InvalidText)?
            .to_string();
        let mut left = &data[end + 1..];
        let record_type = RecordType::new(left.try_get_u32()?);
        Ok(SboxData {
            prefix,
            record_type,
            data: left.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.prefix.len() + 5 + self.data.len());
        buf.put_slice(self.prefix.as_bytes());
        buf.put_u8(0);
        buf.put_u32(self.record_type.value());
        buf.put_slice(&self.data);
        buf
    }
}
