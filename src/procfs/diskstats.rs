//! `/proc/diskstats`: one line of whitespace separated counters per block
//! device.
//!
//! On a busy or long-lived system the counters may wrap, and the kernel holds
//! no locks while updating them, so small inaccuracies are possible. See
//! `Documentation/admin-guide/iostats.rst` in the kernel tree.

use std::sync::LazyLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::decode::{Column, Layout, split};
use crate::error::DecodeError;
use crate::reader::ProcFile;

/// Size of the sector unit used by the block layer accounting.
pub const SECTOR_SIZE: u64 = 512;

/// Counters of one block device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskStat {
    /// Major device number.
    pub major: i64,
    /// Minor device number.
    pub minor: i64,
    /// Device name (sda, nvme0n1, ...).
    pub name: String,
    /// Read I/Os processed.
    pub read_ios: u64,
    /// Read I/Os merged with in-queue I/O.
    pub read_merges: u64,
    /// 512 byte sectors read.
    pub read_sectors: u64,
    /// Total wait time for read requests (ms).
    pub read_ticks: u64,
    /// Write I/Os processed.
    pub write_ios: u64,
    /// Write I/Os merged with in-queue I/O.
    pub write_merges: u64,
    /// 512 byte sectors written.
    pub write_sectors: u64,
    /// Total wait time for write requests (ms).
    pub write_ticks: u64,
    /// I/Os currently in flight.
    pub in_flight: u64,
    /// Time the device has been active (ms).
    pub io_ticks: u64,
    /// Total wait time for all requests (ms).
    pub time_in_queue: u64,
}

impl DiskStat {
    pub fn read_bytes(&self) -> u64 {
        self.read_sectors.saturating_mul(SECTOR_SIZE)
    }

    pub fn write_bytes(&self) -> u64 {
        self.write_sectors.saturating_mul(SECTOR_SIZE)
    }

    pub fn read_time(&self) -> Duration {
        Duration::from_millis(self.read_ticks)
    }

    pub fn write_time(&self) -> Duration {
        Duration::from_millis(self.write_ticks)
    }

    pub fn io_time(&self) -> Duration {
        Duration::from_millis(self.io_ticks)
    }

    pub fn queue_time(&self) -> Duration {
        Duration::from_millis(self.time_in_queue)
    }
}

type C = Column<DiskStat>;

/// Format: major minor name reads r_merged r_sectors r_ticks writes w_merged
/// w_sectors w_ticks in_flight io_ticks time_in_queue [discard/flush ...]
static DISK_LAYOUT: LazyLock<Layout<DiskStat>> = LazyLock::new(|| {
    Layout::new(
        "diskstats",
        14,
        vec![
            C::int(0, "major", |d, v| d.major = v).lenient(),
            C::int(1, "minor", |d, v| d.minor = v).lenient(),
            C::str(2, "name", |d, v| d.name = v.to_string()),
            C::uint(3, "read_ios", |d, v| d.read_ios = v).lenient(),
            C::uint(4, "read_merges", |d, v| d.read_merges = v).lenient(),
            C::uint(5, "read_sectors", |d, v| d.read_sectors = v).lenient(),
            C::uint(6, "read_ticks", |d, v| d.read_ticks = v).lenient(),
            C::uint(7, "write_ios", |d, v| d.write_ios = v).lenient(),
            C::uint(8, "write_merges", |d, v| d.write_merges = v).lenient(),
            C::uint(9, "write_sectors", |d, v| d.write_sectors = v).lenient(),
            C::uint(10, "write_ticks", |d, v| d.write_ticks = v).lenient(),
            C::uint(11, "in_flight", |d, v| d.in_flight = v).lenient(),
            C::uint(12, "io_ticks", |d, v| d.io_ticks = v).lenient(),
            C::uint(13, "time_in_queue", |d, v| d.time_in_queue = v).lenient(),
        ],
    )
});

/// Parses `/proc/diskstats` content. Devices are returned in file order.
pub fn parse_diskstats(content: &str) -> Result<Vec<DiskStat>, DecodeError> {
    split::lines(content)
        .map(|line| DISK_LAYOUT.decode_line(line))
        .collect()
}

impl ProcFile for Vec<DiskStat> {
    const KIND: &'static str = "diskstats";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_diskstats(content)
    }

    fn records(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diskstats() {
        let content = "\
   8       0 sda 1234 10 56789 100 5678 20 98765 200 0 150 300 0 0 0 0
   8       1 sda1 1000 0 50000 80 5000 0 90000 180 0 130 260
 259       0 nvme0n1 9999 0 123456 500 8888 0 654321 400 5 1000 2000 0 0 0 0 7 9
";
        let disks = parse_diskstats(content).unwrap();

        assert_eq!(disks.len(), 3);

        assert_eq!(disks[0].major, 8);
        assert_eq!(disks[0].minor, 0);
        assert_eq!(disks[0].name, "sda");
        assert_eq!(disks[0].read_ios, 1234);
        assert_eq!(disks[0].read_merges, 10);
        assert_eq!(disks[0].read_sectors, 56789);
        assert_eq!(disks[0].read_ticks, 100);
        assert_eq!(disks[0].write_ios, 5678);
        assert_eq!(disks[0].write_merges, 20);
        assert_eq!(disks[0].write_sectors, 98765);
        assert_eq!(disks[0].write_ticks, 200);
        assert_eq!(disks[0].in_flight, 0);
        assert_eq!(disks[0].io_ticks, 150);
        assert_eq!(disks[0].time_in_queue, 300);

        assert_eq!(disks[1].name, "sda1");
        assert_eq!(disks[2].major, 259);
        assert_eq!(disks[2].name, "nvme0n1");
        assert_eq!(disks[2].in_flight, 5);
    }

    #[test]
    fn test_derived_accessors() {
        let disk = DiskStat {
            read_sectors: 2,
            write_sectors: 4,
            read_ticks: 1500,
            write_ticks: 20,
            io_ticks: 3000,
            time_in_queue: 5,
            ..DiskStat::default()
        };
        assert_eq!(disk.read_bytes(), 1024);
        assert_eq!(disk.write_bytes(), 2048);
        assert_eq!(disk.read_time(), Duration::from_millis(1500));
        assert_eq!(disk.write_time(), Duration::from_millis(20));
        assert_eq!(disk.io_time(), Duration::from_secs(3));
        assert_eq!(disk.queue_time(), Duration::from_millis(5));
    }

    #[test]
    fn test_short_line_is_an_error() {
        let content = "   8       0 sda 1234 0 56789\n";
        let err = parse_diskstats(content).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField {
                record: "diskstats",
                expected: 14,
                found: 6,
            }
        );
    }

    #[test]
    fn test_malformed_counter_is_zero() {
        let content = "8 0 sda x 0 0 0 0 0 0 0 0 0 0\n";
        let disks = parse_diskstats(content).unwrap();
        assert_eq!(disks[0].read_ios, 0);
    }

    #[test]
    fn test_empty_file() {
        assert!(parse_diskstats("").unwrap().is_empty());
    }
}
