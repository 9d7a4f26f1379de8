/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use super::{RecordDataError, decode_name, encode_name, ensure_consumed};

/// Hands a label over to classic DNS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gns2DnsData {
    /// The DNS name resolution continues with.
    pub dns_name: String,
    /// Literal IP, DNS host name or overlay name of the server to ask.
    pub server: String,
}

impl Gns2DnsData {
    pub fn parse(mut data: &[u8]) -> Result<Self, RecordDataError> {
        let dns_name = decode_name(&mut data)?;
        let server = decode_name(&mut data)?;
        ensure_consumed(data)?;
        Ok(Gns2DnsData { dns_name, server })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordDataError> {
        let mut buf = Vec::with_capacity(self.dns_name.len() + self.server.len() + 4);
        encode_name(&self.dns_name, &mut buf)?;
        encode_name(&self.server, &mut buf)?;
        Ok(buf)
    }
}
