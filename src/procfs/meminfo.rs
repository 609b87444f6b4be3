//! `/proc/meminfo`: system memory usage, one "Label: value [kB]" line per
//! counter. Which labels are present depends on kernel version and config.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::decode::{Field, LabelTable};
use crate::error::DecodeError;
use crate::reader::ProcFile;

/// Memory counters in KB, except the `huge_pages_*` page counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_cached: u64,
    pub active: u64,
    pub inactive: u64,
    pub active_anon: u64,
    pub inactive_anon: u64,
    pub active_file: u64,
    pub inactive_file: u64,
    pub unevictable: u64,
    pub mlocked: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub dirty: u64,
    #[serde(rename = "write_back")]
    pub writeback: u64,
    pub anon_pages: u64,
    pub mapped: u64,
    pub shmem: u64,
    pub slab: u64,
    pub s_reclaimable: u64,
    #[serde(rename = "s_unclaim")]
    pub s_unreclaim: u64,
    pub kernel_stack: u64,
    pub page_tables: u64,
    pub nfs_unstable: u64,
    pub bounce: u64,
    pub writeback_tmp: u64,
    pub commit_limit: u64,
    pub committed_as: u64,
    pub vmalloc_total: u64,
    pub vmalloc_used: u64,
    pub vmalloc_chunk: u64,
    pub hardware_corrupted: u64,
    pub anon_huge_pages: u64,
    pub huge_pages_total: u64,
    pub huge_pages_free: u64,
    pub huge_pages_rsvd: u64,
    pub huge_pages_surp: u64,
    pub hugepagesize: u64,
    pub direct_map_4k: u64,
    #[serde(rename = "direct_map_2M")]
    pub direct_map_2m: u64,
    #[serde(rename = "direct_map_1G")]
    pub direct_map_1g: u64,
}

impl MemInfo {
    /// Memory in use: total minus free, buffers and page cache.
    pub fn used(&self) -> u64 {
        self.mem_total
            .saturating_sub(self.mem_free)
            .saturating_sub(self.buffers)
            .saturating_sub(self.cached)
    }

    pub fn swap_used(&self) -> u64 {
        self.swap_total.saturating_sub(self.swap_free)
    }
}

type F = Field<MemInfo>;

// The split active/inactive counters are matched by their compact name first
// and by the kernel's parenthesized spelling otherwise.
static MEMINFO_FIELDS: LazyLock<LabelTable<MemInfo>> = LazyLock::new(|| {
    let fields = vec![
        F::size("MemTotal", |m, v| m.mem_total = v),
        F::size("MemFree", |m, v| m.mem_free = v),
        F::size("MemAvailable", |m, v| m.mem_available = v),
        F::size("Buffers", |m, v| m.buffers = v),
        F::size("Cached", |m, v| m.cached = v),
        F::size("SwapCached", |m, v| m.swap_cached = v),
        F::size("Active", |m, v| m.active = v),
        F::size("Inactive", |m, v| m.inactive = v),
        F::size("ActiveAnon", |m, v| m.active_anon = v).alias(&["Active(anon)"]),
        F::size("InactiveAnon", |m, v| m.inactive_anon = v).alias(&["Inactive(anon)"]),
        F::size("ActiveFile", |m, v| m.active_file = v).alias(&["Active(file)"]),
        F::size("InactiveFile", |m, v| m.inactive_file = v).alias(&["Inactive(file)"]),
        F::size("Unevictable", |m, v| m.unevictable = v),
        F::size("Mlocked", |m, v| m.mlocked = v),
        F::size("SwapTotal", |m, v| m.swap_total = v),
        F::size("SwapFree", |m, v| m.swap_free = v),
        F::size("Dirty", |m, v| m.dirty = v),
        F::size("Writeback", |m, v| m.writeback = v),
        F::size("AnonPages", |m, v| m.anon_pages = v),
        F::size("Mapped", |m, v| m.mapped = v),
        F::size("Shmem", |m, v| m.shmem = v),
        F::size("Slab", |m, v| m.slab = v),
        F::size("SReclaimable", |m, v| m.s_reclaimable = v),
        F::size("SUnreclaim", |m, v| m.s_unreclaim = v),
        F::size("KernelStack", |m, v| m.kernel_stack = v),
        F::size("PageTables", |m, v| m.page_tables = v),
        F::size("NFS_Unstable", |m, v| m.nfs_unstable = v),
        F::size("Bounce", |m, v| m.bounce = v),
        F::size("WritebackTmp", |m, v| m.writeback_tmp = v),
        F::size("CommitLimit", |m, v| m.commit_limit = v),
        F::size("Committed_AS", |m, v| m.committed_as = v),
        F::size("VmallocTotal", |m, v| m.vmalloc_total = v),
        F::size("VmallocUsed", |m, v| m.vmalloc_used = v),
        F::size("VmallocChunk", |m, v| m.vmalloc_chunk = v),
        F::size("HardwareCorrupted", |m, v| m.hardware_corrupted = v),
        F::size("AnonHugePages", |m, v| m.anon_huge_pages = v),
        F::size("HugePages_Total", |m, v| m.huge_pages_total = v),
        F::size("HugePages_Free", |m, v| m.huge_pages_free = v),
        F::size("HugePages_Rsvd", |m, v| m.huge_pages_rsvd = v),
        F::size("HugePages_Surp", |m, v| m.huge_pages_surp = v),
        F::size("Hugepagesize", |m, v| m.hugepagesize = v),
        F::size("DirectMap4k", |m, v| m.direct_map_4k = v),
        F::size("DirectMap2M", |m, v| m.direct_map_2m = v),
        F::size("DirectMap1G", |m, v| m.direct_map_1g = v),
    ];
    LabelTable::new("meminfo", fields.into_iter().map(F::lenient).collect())
});

/// Parses `/proc/meminfo` content. Unknown labels are ignored and malformed
/// values read as 0.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, DecodeError> {
    MEMINFO_FIELDS.decode(content)
}

impl ProcFile for MemInfo {
    const KIND: &'static str = "meminfo";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_meminfo(content)
    }
}
