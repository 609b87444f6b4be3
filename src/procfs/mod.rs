//! Parsers for individual `/proc` files.
//!
//! Each module owns one file family: the entity types, the static field
//! table and a `parse_*` function taking the file content. Parsers never
//! touch the filesystem; see [`crate::reader`] for that.

pub mod cpuinfo;
pub mod diskstats;
pub mod loadavg;
pub mod meminfo;
pub mod net_dev;
pub mod process_stat;
pub mod process_status;
pub mod sockstat;
pub mod uptime;

pub use cpuinfo::{CpuInfo, Processor, parse_cpuinfo};
pub use diskstats::{DiskStat, parse_diskstats};
pub use loadavg::{LoadAvg, parse_loadavg};
pub use meminfo::{MemInfo, parse_meminfo};
pub use net_dev::{NetworkStat, parse_net_dev};
pub use process_stat::{ProcessStat, parse_process_stat};
pub use process_status::{ProcessStatus, parse_process_status};
pub use sockstat::{SockStat, parse_sockstat};
pub use uptime::{Uptime, parse_uptime};
