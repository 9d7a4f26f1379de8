/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use bytes::{Buf, BufMut};

use super::RecordDataError;

pub const MAX_NAME_LENGTH: usize = 255;
const MAX_LABEL_LENGTH: usize = 63;

/// Append `name` in uncompressed DNS label form, leaving `buf` untouched on
/// error.
///
/// A single trailing dot is ignored, the empty name encodes as the root.
pub fn encode_name(name: &str, buf: &mut Vec<u8>) -> Result<(), RecordDataError> {
    let start = buf.len();
    encode_labels(name, buf).inspect_err(|_| buf.truncate(start))?;
    if buf.len() - start > MAX_NAME_LENGTH {
        buf.truncate(start);
        return Err(RecordDataError::NameTooLong);
    }
    Ok(())
}

fn encode_labels(name: &str, buf: &mut Vec<u8>) -> Result<(), RecordDataError> {
    let name = name.strip_suffix('.').unwrap_or(name);
    if !name.is_empty() {
        for label in name.split('.') {
            if label.is_empty() {
                return Err(RecordDataError::EmptyLabel);
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(RecordDataError::LabelTooLong);
            }
            buf.put_u8(label.len() as u8);
            buf.put_slice(label.as_bytes());
        }
    }
    buf.put_u8(0);
    Ok(())
}

pub fn decode_name(buf: &mut &[u8]) -> Result<String, RecordDataError> {
    let mut name = String::new();
    let mut total = 0usize;
    loop {
        let len = buf.try_get_u8()? as usize;
        total += 1;
        if len == 0 {
            return Ok(name);
        }
        if len > MAX_LABEL_LENGTH {
            return Err(RecordDataError::CompressedName);
        }
        if buf.remaining() < len {
            return Err(RecordDataError::Truncated);
        }
        total += len;
        if total > MAX_NAME_LENGTH {
            return Err(RecordDataError::NameTooLong);
        }
        let label =
            std::str::from_utf8(&buf[..len]).map_err(|_| RecordDataError::InvalidText)?;
        if !name.is_empty() {
            name.push('.');
        }
        name.push_str(label);
        buf.advance(len);
    }
}
