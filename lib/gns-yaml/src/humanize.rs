/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::str::FromStr;
use std::time::Duration;

use anyhow::anyhow;
use humanize_rs::ParseError;
use yaml_rust::Yaml;

fn seconds(f: f64) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(f).map_err(|e| anyhow!("invalid seconds value {f}: {e}"))
}

/// Accepts humanized strings like `1m30s`, or plain (fractional) seconds.
pub fn as_duration(v: &Yaml) -> anyhow::Result<Duration> {
    match v {
        Yaml::String(s) => match humanize_rs::duration::parse(s) {
            Ok(d) => Ok(d),
            Err(ParseError::MissingUnit) => match u64::from_str(s) {
                Ok(u) => Ok(Duration::from_secs(u)),
                Err(_) => Err(anyhow!("invalid duration string {s}")),
            },
            Err(e) => Err(anyhow!("invalid humanize duration string {s}: {e}")),
        },
        Yaml::Integer(i) => u64::try_from(*i)
            .map(Duration::from_secs)
            .map_err(|_| anyhow!("negative duration value {i}")),
        Yaml::Real(s) => {
            let f = f64::from_str(s).map_err(|e| anyhow!("invalid real value {s}: {e}"))?;
            seconds(f)
        }
        _ => Err(anyhow!(
            "yaml value type for duration should be 'string', 'integer' or 'real'"
        )),
    }
}
