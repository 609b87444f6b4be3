//! `/proc/cpuinfo`: one block of "label : value" lines per logical processor,
//! blocks separated by a blank line.
//!
//! ```text
//! processor	: 0
//! vendor_id	: GenuineIntel
//! model		: 26
//! model name	: Intel(R) Xeon(R) CPU           L5520  @ 2.27GHz
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::decode::{Field, LabelTable, split};
use crate::error::DecodeError;
use crate::reader::ProcFile;

/// Topology id value when the kernel did not report one.
pub const UNKNOWN_ID: i64 = -1;

/// One logical processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Processor {
    pub id: i64,
    pub vendor_id: String,
    pub model: i64,
    pub model_name: String,
    pub flags: Vec<String>,
    pub cores: i64,
    pub mhz: f64,
    /// Cache size in KB.
    pub cache_size: u64,
    /// Physical package id, [`UNKNOWN_ID`] if absent.
    pub physical_id: i64,
    /// Core id within the package, [`UNKNOWN_ID`] if absent.
    pub core_id: i64,
}

impl Default for Processor {
    fn default() -> Self {
        Self {
            id: 0,
            vendor_id: String::new(),
            model: 0,
            model_name: String::new(),
            flags: Vec::new(),
            cores: 0,
            mhz: 0.0,
            cache_size: 0,
            physical_id: UNKNOWN_ID,
            core_id: UNKNOWN_ID,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub processors: Vec<Processor>,
}

impl CpuInfo {
    /// Number of logical processors.
    pub fn num_cpu(&self) -> usize {
        self.processors.len()
    }

    /// Number of distinct (physical id, core id) pairs.
    ///
    /// Falls back to [`num_cpu`](Self::num_cpu) if any processor lacks either id.
    pub fn num_core(&self) -> usize {
        let mut cores = HashSet::new();
        for p in &self.processors {
            if p.physical_id == UNKNOWN_ID || p.core_id == UNKNOWN_ID {
                return self.num_cpu();
            }
            cores.insert((p.physical_id, p.core_id));
        }
        cores.len()
    }

    /// Number of distinct physical packages.
    ///
    /// Falls back to [`num_cpu`](Self::num_cpu) if any processor lacks a
    /// physical id. This heuristic has not been checked against
    /// hyper-threaded layouts that omit physical ids.
    pub fn num_physical_cpu(&self) -> usize {
        let mut packages = HashSet::new();
        for p in &self.processors {
            if p.physical_id == UNKNOWN_ID {
                return self.num_cpu();
            }
            packages.insert(p.physical_id);
        }
        packages.len()
    }
}

type F = Field<Processor>;

static PROCESSOR_FIELDS: LazyLock<LabelTable<Processor>> = LazyLock::new(|| {
    LabelTable::new(
        "cpuinfo",
        vec![
            F::int("processor", |p, v| p.id = v).lenient(),
            F::str("vendor_id", |p, v| p.vendor_id = v.to_string()),
            F::int("model", |p, v| p.model = v).lenient(),
            F::str("model name", |p, v| p.model_name = v.to_string()),
            F::str_list("flags", |p, v| p.flags = v),
            F::int("cpu cores", |p, v| p.cores = v).lenient(),
            F::float("cpu MHz", |p, v| p.mhz = v).lenient(),
            F::size("cache size", |p, v| p.cache_size = v).lenient(),
            F::str("physical id", |p, v| p.physical_id = topology_id(v)),
            F::str("core id", |p, v| p.core_id = topology_id(v)),
        ],
    )
});

/// A malformed id counts as absent, not as id 0.
fn topology_id(value: &str) -> i64 {
    value.trim().parse().unwrap_or(UNKNOWN_ID)
}

/// Parses `/proc/cpuinfo` content.
pub fn parse_cpuinfo(content: &str) -> Result<CpuInfo, DecodeError> {
    let table = &*PROCESSOR_FIELDS;
    let mut info = CpuInfo::default();

    for block in split::blocks(content) {
        let mut processor = Processor::default();
        table.apply_all(
            &mut processor,
            block.into_iter().filter_map(split::label_value),
        )?;
        info.processors.push(processor);
    }

    Ok(info)
}

impl ProcFile for CpuInfo {
    const KIND: &'static str = "cpuinfo";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_cpuinfo(content)
    }

    fn records(&self) -> usize {
        self.num_cpu()
    }
}
