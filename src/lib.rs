//! procstat - typed decoders for Linux `/proc` pseudo-files.
//!
//! The library turns the text exposed by the kernel into plain structs:
//! - `decode`: primitive value decoders, record splitting, positional and
//!   label-keyed field mapping
//! - `procfs`: one module per kernel file family (cpuinfo, meminfo,
//!   diskstats, net/dev, loadavg, uptime, sockstat, `[pid]/stat`,
//!   `[pid]/status`)
//! - `reader`: `ProcReader`, which resolves paths under a proc root and
//!   dispatches file content to the right parser
//! - `fs`: filesystem abstraction with real and in-memory implementations
//!
//! Every read is a single synchronous pass that returns an owned snapshot.

pub mod decode;
pub mod error;
pub mod fs;
pub mod procfs;
pub mod reader;

pub use error::{DecodeError, ReadError};
pub use fs::{FileSystem, MockFs, RealFs};
pub use reader::{ProcFile, ProcReader, read};
