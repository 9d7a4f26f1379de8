/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use crate::RecordType;

mod name;
pub use name::{MAX_NAME_LENGTH, decode_name, encode_name};

mod dns;
pub use dns::{MxData, SoaData, SrvData, UriData};

mod gns2dns;
pub use gns2dns::Gns2DnsData;

mod boxed;
pub use boxed::{BoxData, SboxData};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordDataError {
    #[error("truncated record data")]
    Truncated,
    #[error("{0} trailing bytes after record data")]
    TrailingData(usize),
    #[error("invalid record data length {0}")]
    InvalidLength(usize),
    #[error("unexpected record type {0}")]
    UnexpectedType(RecordType),
    #[error("empty label in name")]
    EmptyLabel,
    #[error("label too long")]
    LabelTooLong,
    #[error("name too long")]
    NameTooLong,
    #[error("compressed name is not allowed")]
    CompressedName,
    #[error("invalid utf-8 text")]
    InvalidText,
}

impl From<bytes::TryGetError> for RecordDataError {
    fn from(_: bytes::TryGetError) -> Self {
        RecordDataError::Truncated
    }
}

fn ensure_consumed(buf: &[u8]) -> Result<(), RecordDataError> {
    if buf.is_empty() {
        Ok(())
    } else {
        Err(RecordDataError::TrailingData(buf.len()))
    }
}
