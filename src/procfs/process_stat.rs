//! `/proc/[pid]/stat`: one line of process status fields, see `proc(5)`.
//!
//! ```text
//! 1234 (bash) S 1000 1234 1234 34816 1234 4194304 1234 5678 0 0 100 50 ...
//! ```
//!
//! The command name is enclosed in parentheses and may contain spaces. It
//! ends at the first ") " after the pid, so a command that itself contains
//! ") " is cut short and shifts the remaining fields.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::decode::{Column, Layout};
use crate::error::DecodeError;
use crate::reader::ProcFile;

/// Fields up to and including `delayacct_blkio_ticks` (kernel 2.6.18).
/// Later fields are read when present.
const REQUIRED_FIELDS: usize = 42;

static STAT_LINE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(\d+)( \(.*?\) )(.*)$"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStat {
    pub pid: u64,
    /// Executable name as printed by the kernel, parentheses included.
    /// See [`ProcessStat::name`] for the bare name.
    pub comm: String,
    /// One of "RSDZTtWXxKWP".
    pub state: String,
    pub ppid: i64,
    pub pgrp: i64,
    pub session: i64,
    pub tty_nr: i64,
    pub tpgid: i64,
    pub flags: u64,
    pub minflt: u64,
    pub cminflt: u64,
    pub majflt: u64,
    pub cmajflt: u64,
    /// User mode time in clock ticks.
    pub utime: u64,
    /// Kernel mode time in clock ticks.
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: i64,
    pub itrealvalue: i64,
    /// Start time after boot in clock ticks.
    pub starttime: u64,
    /// Virtual memory size in bytes.
    pub vsize: u64,
    /// Resident set size in pages.
    pub rss: i64,
    pub rsslim: u64,
    pub startcode: u64,
    pub endcode: u64,
    pub startstack: u64,
    pub kstkesp: u64,
    pub kstkeip: u64,
    pub signal: u64,
    pub blocked: u64,
    pub sigignore: u64,
    pub sigcatch: u64,
    pub wchan: u64,
    pub nswap: u64,
    pub cnswap: u64,
    pub exit_signal: i64,
    pub processor: i64,
    pub rt_priority: u64,
    pub policy: u64,
    pub delayacct_blkio_ticks: u64,
    pub guest_time: u64,
    pub cguest_time: i64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
    pub exit_code: i64,
}

impl ProcessStat {
    /// Executable name without the enclosing parentheses.
    pub fn name(&self) -> &str {
        self.comm
            .strip_prefix('(')
            .and_then(|c| c.strip_suffix(')'))
            .unwrap_or(&self.comm)
    }

    /// User plus kernel time in clock ticks.
    pub fn cpu_ticks(&self) -> u64 {
        self.utime.saturating_add(self.stime)
    }
}

type C = Column<ProcessStat>;

static STAT_LAYOUT: LazyLock<Layout<ProcessStat>> = LazyLock::new(|| {
    Layout::new(
        "process stat",
        REQUIRED_FIELDS,
        vec![
            C::uint(0, "pid", |s, v| s.pid = v),
            C::str(1, "comm", |s, v| s.comm = v.trim().to_string()),
            C::str(2, "state", |s, v| s.state = v.to_string()),
            C::int(3, "ppid", |s, v| s.ppid = v),
            C::int(4, "pgrp", |s, v| s.pgrp = v),
            C::int(5, "session", |s, v| s.session = v),
            C::int(6, "tty_nr", |s, v| s.tty_nr = v),
            C::int(7, "tpgid", |s, v| s.tpgid = v),
            C::uint(8, "flags", |s, v| s.flags = v),
            C::uint(9, "minflt", |s, v| s.minflt = v),
            C::uint(10, "cminflt", |s, v| s.cminflt = v),
            C::uint(11, "majflt", |s, v| s.majflt = v),
            C::uint(12, "cmajflt", |s, v| s.cmajflt = v),
            C::uint(13, "utime", |s, v| s.utime = v),
            C::uint(14, "stime", |s, v| s.stime = v),
            C::int(15, "cutime", |s, v| s.cutime = v),
            C::int(16, "cstime", |s, v| s.cstime = v),
            C::int(17, "priority", |s, v| s.priority = v),
            C::int(18, "nice", |s, v| s.nice = v),
            C::int(19, "num_threads", |s, v| s.num_threads = v),
            C::int(20, "itrealvalue", |s, v| s.itrealvalue = v),
            C::uint(21, "starttime", |s, v| s.starttime = v),
            C::uint(22, "vsize", |s, v| s.vsize = v),
            C::int(23, "rss", |s, v| s.rss = v),
            C::uint(24, "rsslim", |s, v| s.rsslim = v),
            C::uint(25, "startcode", |s, v| s.startcode = v),
            C::uint(26, "endcode", |s, v| s.endcode = v),
            C::uint(27, "startstack", |s, v| s.startstack = v),
            C::uint(28, "kstkesp", |s, v| s.kstkesp = v),
            C::uint(29, "kstkeip", |s, v| s.kstkeip = v),
            C::uint(30, "signal", |s, v| s.signal = v),
            C::uint(31, "blocked", |s, v| s.blocked = v),
            C::uint(32, "sigignore", |s, v| s.sigignore = v),
            C::uint(33, "sigcatch", |s, v| s.sigcatch = v),
            C::uint(34, "wchan", |s, v| s.wchan = v),
            C::uint(35, "nswap", |s, v| s.nswap = v),
            C::uint(36, "cnswap", |s, v| s.cnswap = v),
            C::int(37, "exit_signal", |s, v| s.exit_signal = v),
            C::int(38, "processor", |s, v| s.processor = v),
            C::uint(39, "rt_priority", |s, v| s.rt_priority = v),
            C::uint(40, "policy", |s, v| s.policy = v),
            C::uint(41, "delayacct_blkio_ticks", |s, v| s.delayacct_blkio_ticks = v),
            C::uint(42, "guest_time", |s, v| s.guest_time = v),
            C::int(43, "cguest_time", |s, v| s.cguest_time = v),
            C::uint(44, "start_data", |s, v| s.start_data = v),
            C::uint(45, "end_data", |s, v| s.end_data = v),
            C::uint(46, "start_brk", |s, v| s.start_brk = v),
            C::uint(47, "arg_start", |s, v| s.arg_start = v),
            C::uint(48, "arg_end", |s, v| s.arg_end = v),
            C::uint(49, "env_start", |s, v| s.env_start = v),
            C::uint(50, "env_end", |s, v| s.env_end = v),
            C::int(51, "exit_code", |s, v| s.exit_code = v),
        ],
    )
});

/// Splits a stat line into pid, parenthesized comm and the remaining fields.
fn tokenize(line: &str) -> Result<Vec<&str>, DecodeError> {
    let pattern = (*STAT_LINE)
        .as_ref()
        .map_err(|e| DecodeError::format("process stat", e.to_string()))?;

    let captures = pattern
        .captures(line)
        .ok_or_else(|| DecodeError::format("process stat", "expected \"pid (comm) ...\""))?;

    let mut tokens = Vec::with_capacity(52);
    for group in 1..=2 {
        if let Some(m) = captures.get(group) {
            tokens.push(m.as_str());
        }
    }
    if let Some(rest) = captures.get(3) {
        tokens.extend(rest.as_str().split_whitespace());
    }
    Ok(tokens)
}

/// Parses `/proc/[pid]/stat` content. Any malformed number is an error.
pub fn parse_process_stat(content: &str) -> Result<ProcessStat, DecodeError> {
    let tokens = tokenize(content.trim())?;
    STAT_LAYOUT.decode(&tokens)
}

impl ProcFile for ProcessStat {
    const KIND: &'static str = "process stat";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_process_stat(content)
    }
}
