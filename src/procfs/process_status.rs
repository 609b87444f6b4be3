//! `/proc/[pid]/status`: human readable process state, one "Label:\tvalue"
//! line per field.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::decode::{Field, LabelTable};
use crate::error::DecodeError;
use crate::reader::ProcFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    pub name: String,
    /// State letter followed by its description, e.g. "S (sleeping)".
    pub state: String,
    pub tgid: u64,
    pub pid: u64,
    pub ppid: i64,
    pub tracer_pid: u64,
    pub real_uid: u64,
    pub effective_uid: u64,
    pub saved_set_uid: u64,
    pub filesystem_uid: u64,
    pub real_gid: u64,
    pub effective_gid: u64,
    pub saved_set_gid: u64,
    pub filesystem_gid: u64,
    pub fd_size: u64,
    /// Supplementary group ids.
    pub groups: Vec<i64>,
    /// Memory sizes in KB.
    pub vm_peak: u64,
    pub vm_size: u64,
    pub vm_lck: u64,
    pub vm_hwm: u64,
    pub vm_rss: u64,
    pub vm_data: u64,
    pub vm_stk: u64,
    pub vm_exe: u64,
    pub vm_lib: u64,
    pub vm_pte: u64,
    pub vm_swap: u64,
    pub threads: u64,
    /// Queued signals for the real uid, and the limit on them.
    pub sig_q_length: u64,
    pub sig_q_limit: u64,
    /// Signal masks.
    pub sig_pnd: u64,
    pub shd_pnd: u64,
    pub sig_blk: u64,
    pub sig_ign: u64,
    pub sig_cgt: u64,
    /// Capability sets.
    pub cap_inh: u64,
    pub cap_prm: u64,
    pub cap_eff: u64,
    pub cap_bnd: u64,
    /// 0 disabled, 1 strict, 2 filter.
    pub seccomp: u8,
    /// Affinity masks as 32-bit words, most significant first.
    pub cpus_allowed: Vec<u32>,
    pub mems_allowed: Vec<u32>,
    pub voluntary_ctxt_switches: u64,
    pub nonvoluntary_ctxt_switches: u64,
}

impl ProcessStatus {
    /// Number of CPUs set in the affinity mask.
    pub fn allowed_cpu_count(&self) -> u32 {
        self.cpus_allowed.iter().map(|word| word.count_ones()).sum()
    }

    pub fn total_ctxt_switches(&self) -> u64 {
        self.voluntary_ctxt_switches
            .saturating_add(self.nonvoluntary_ctxt_switches)
    }
}

type F = Field<ProcessStatus>;

static STATUS_FIELDS: LazyLock<LabelTable<ProcessStatus>> = LazyLock::new(|| {
    LabelTable::new(
        "process status",
        vec![
            F::str("Name", |s, v| s.name = v.to_string()),
            F::str("State", |s, v| s.state = v.to_string()),
            F::uint("Tgid", |s, v| s.tgid = v),
            F::uint("Pid", |s, v| s.pid = v),
            F::int("PPid", |s, v| s.ppid = v),
            F::uint("TracerPid", |s, v| s.tracer_pid = v),
            F::quad("Uid", |s, [real, effective, saved, fs]| {
                s.real_uid = real;
                s.effective_uid = effective;
                s.saved_set_uid = saved;
                s.filesystem_uid = fs;
            }),
            F::quad("Gid", |s, [real, effective, saved, fs]| {
                s.real_gid = real;
                s.effective_gid = effective;
                s.saved_set_gid = saved;
                s.filesystem_gid = fs;
            }),
            F::uint("FDSize", |s, v| s.fd_size = v),
            F::int_list("Groups", |s, v| s.groups = v),
            F::size("VmPeak", |s, v| s.vm_peak = v),
            F::size("VmSize", |s, v| s.vm_size = v),
            F::size("VmLck", |s, v| s.vm_lck = v),
            F::size("VmHWM", |s, v| s.vm_hwm = v),
            F::size("VmRSS", |s, v| s.vm_rss = v),
            F::size("VmData", |s, v| s.vm_data = v),
            F::size("VmStk", |s, v| s.vm_stk = v),
            F::size("VmExe", |s, v| s.vm_exe = v),
            F::size("VmLib", |s, v| s.vm_lib = v),
            F::size("VmPTE", |s, v| s.vm_pte = v),
            F::size("VmSwap", |s, v| s.vm_swap = v),
            F::uint("Threads", |s, v| s.threads = v),
            F::pair("SigQ", |s, length, limit| {
                s.sig_q_length = length;
                s.sig_q_limit = limit;
            }),
            F::hex("SigPnd", |s, v| s.sig_pnd = v),
            F::hex("ShdPnd", |s, v| s.shd_pnd = v),
            F::hex("SigBlk", |s, v| s.sig_blk = v),
            F::hex("SigIgn", |s, v| s.sig_ign = v),
            F::hex("SigCgt", |s, v| s.sig_cgt = v),
            F::hex("CapInh", |s, v| s.cap_inh = v),
            F::hex("CapPrm", |s, v| s.cap_prm = v),
            F::hex("CapEff", |s, v| s.cap_eff = v),
            F::hex("CapBnd", |s, v| s.cap_bnd = v),
            F::byte("Seccomp", |s, v| s.seccomp = v),
            F::hex_list("Cpus_allowed", |s, v| s.cpus_allowed = v),
            F::hex_list("Mems_allowed", |s, v| s.mems_allowed = v),
            F::uint("voluntary_ctxt_switches", |s, v| s.voluntary_ctxt_switches = v),
            F::uint("nonvoluntary_ctxt_switches", |s, v| {
                s.nonvoluntary_ctxt_switches = v
            }),
        ],
    )
});

/// Parses `/proc/[pid]/status` content.
///
/// Labels this crate does not know (`Umask`, `NStgid`, `Cpus_allowed_list`,
/// ...) are skipped. A malformed value in a known field is an error.
pub fn parse_process_status(content: &str) -> Result<ProcessStatus, DecodeError> {
    STATUS_FIELDS.decode(content)
}

impl ProcFile for ProcessStatus {
    const KIND: &'static str = "process status";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_process_status(content)
    }
}
