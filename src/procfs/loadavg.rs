//! `/proc/loadavg`.
//!
//! ```text
//! 0.75 0.35 0.25 1/25 1747
//! ```
//!
//! The first three fields are the number of jobs in the run queue (state R)
//! or waiting for disk I/O (state D) averaged over 1, 5 and 15 minutes. The
//! fourth is "currently runnable scheduling entities / existing scheduling
//! entities". The fifth is the PID most recently created on the system.

use serde::{Deserialize, Serialize};

use crate::decode::primitive;
use crate::error::DecodeError;
use crate::reader::ProcFile;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAvg {
    #[serde(rename = "last1min")]
    pub last_1min: f64,
    #[serde(rename = "last5min")]
    pub last_5min: f64,
    #[serde(rename = "last15min")]
    pub last_15min: f64,
    pub process_running: u64,
    pub process_total: u64,
    pub last_pid: u64,
}

/// Parses `/proc/loadavg` content. Every field is required.
pub fn parse_loadavg(content: &str) -> Result<LoadAvg, DecodeError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    if fields.len() < 5 {
        return Err(DecodeError::MissingField {
            record: "loadavg",
            expected: 5,
            found: fields.len(),
        });
    }

    let (process_running, process_total) = primitive::pair("processes", fields[3])?;

    Ok(LoadAvg {
        last_1min: primitive::float("last1min", fields[0])?,
        last_5min: primitive::float("last5min", fields[1])?,
        last_15min: primitive::float("last15min", fields[2])?,
        process_running,
        process_total,
        last_pid: primitive::uint("last_pid", fields[4])?,
    })
}

impl ProcFile for LoadAvg {
    const KIND: &'static str = "loadavg";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_loadavg(content)
    }
}
