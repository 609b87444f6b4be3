//! `/proc/uptime`: seconds since boot and seconds spent idle, summed over
//! all CPUs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decode::primitive;
use crate::error::DecodeError;
use crate::reader::ProcFile;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uptime {
    pub total: f64,
    pub idle: f64,
}

impl Uptime {
    /// Time since boot, truncated to whole seconds.
    pub fn total_duration(&self) -> Duration {
        Duration::from_secs(self.total as u64)
    }

    /// Accumulated idle time, truncated to whole seconds.
    pub fn idle_duration(&self) -> Duration {
        Duration::from_secs(self.idle as u64)
    }

    /// Fraction of available CPU time spent idle since boot.
    ///
    /// The idle counter sums over every CPU, so it is divided by
    /// `total * cpus`. Returns 0 when either is zero.
    pub fn idle_ratio(&self, cpus: usize) -> f64 {
        let capacity = self.total * cpus as f64;
        if capacity <= 0.0 {
            return 0.0;
        }
        self.idle / capacity
    }
}

/// Parses `/proc/uptime` content.
pub fn parse_uptime(content: &str) -> Result<Uptime, DecodeError> {
    let fields: Vec<&str> = content.split_whitespace().collect();
    let [total, idle, ..] = fields[..] else {
        return Err(DecodeError::MissingField {
            record: "uptime",
            expected: 2,
            found: fields.len(),
        });
    };

    Ok(Uptime {
        total: primitive::float("total", total)?,
        idle: primitive::float("idle", idle)?,
    })
}

impl ProcFile for Uptime {
    const KIND: &'static str = "uptime";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_uptime(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uptime() {
        let uptime = parse_uptime("12345.67 98765.43\n").unwrap();
        assert!((uptime.total - 12345.67).abs() < 0.001);
        assert!((uptime.idle - 98765.43).abs() < 0.001);
        assert_eq!(uptime.total_duration(), Duration::from_secs(12345));
        assert_eq!(uptime.idle_duration(), Duration::from_secs(98765));
    }

    #[test]
    fn test_missing_idle_is_an_error() {
        let err = parse_uptime("12345.67\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                record: "uptime",
                expected: 2,
                found: 1,
            }
        );
        assert!(parse_uptime("").is_err());
    }

    #[test]
    fn test_malformed_float_is_fatal() {
        assert!(matches!(
            parse_uptime("abc 1.0"),
            Err(DecodeError::InvalidValue { field: "total", .. })
        ));
    }

    #[test]
    fn test_idle_ratio() {
        let uptime = Uptime {
            total: 100.0,
            idle: 300.0,
        };
        assert!((uptime.idle_ratio(4) - 0.75).abs() < 1e-9);
        assert_eq!(uptime.idle_ratio(0), 0.0);
        assert_eq!(Uptime::default().idle_ratio(8), 0.0);
    }
}
