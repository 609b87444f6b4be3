//! `/proc/net/sockstat` and `/proc/net/sockstat6`: socket counts per
//! protocol.
//!
//! ```text
//! sockets: used 231
//! TCP: inuse 27 orphan 1 tw 23 alloc 31 mem 3
//! UDP: inuse 19 mem 17
//! FRAG: inuse 0 memory 0
//! ```
//!
//! Each line is a protocol followed by "key value" pairs. A pair is looked up
//! as "PROTOCOL key" so both files share one table and can be decoded as a
//! single concatenated text.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::decode::{Field, LabelTable, split};
use crate::error::DecodeError;
use crate::reader::ProcFile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SockStat {
    pub sockets_used: u64,
    pub tcp_in_use: u64,
    pub tcp_orphan: u64,
    pub tcp_time_wait: u64,
    pub tcp_allocated: u64,
    /// Pages.
    pub tcp_memory: u64,
    pub tcp6_in_use: u64,
    pub udp_in_use: u64,
    /// Pages.
    pub udp_memory: u64,
    pub udp6_in_use: u64,
    pub udplite_in_use: u64,
    pub udplite6_in_use: u64,
    pub raw_in_use: u64,
    pub raw6_in_use: u64,
    pub frag_in_use: u64,
    /// Bytes.
    pub frag_memory: u64,
    pub frag6_in_use: u64,
    pub frag6_memory: u64,
}

type F = Field<SockStat>;

static SOCKSTAT_FIELDS: LazyLock<LabelTable<SockStat>> = LazyLock::new(|| {
    let fields = vec![
        F::uint("sockets used", |s, v| s.sockets_used = v),
        F::uint("TCP inuse", |s, v| s.tcp_in_use = v),
        F::uint("TCP orphan", |s, v| s.tcp_orphan = v),
        F::uint("TCP tw", |s, v| s.tcp_time_wait = v),
        F::uint("TCP alloc", |s, v| s.tcp_allocated = v),
        F::uint("TCP mem", |s, v| s.tcp_memory = v),
        F::uint("TCP6 inuse", |s, v| s.tcp6_in_use = v),
        F::uint("UDP inuse", |s, v| s.udp_in_use = v),
        F::uint("UDP mem", |s, v| s.udp_memory = v),
        F::uint("UDP6 inuse", |s, v| s.udp6_in_use = v),
        F::uint("UDPLITE inuse", |s, v| s.udplite_in_use = v),
        F::uint("UDPLITE6 inuse", |s, v| s.udplite6_in_use = v),
        F::uint("RAW inuse", |s, v| s.raw_in_use = v),
        F::uint("RAW6 inuse", |s, v| s.raw6_in_use = v),
        F::uint("FRAG inuse", |s, v| s.frag_in_use = v),
        F::uint("FRAG memory", |s, v| s.frag_memory = v),
        F::uint("FRAG6 inuse", |s, v| s.frag6_in_use = v),
        F::uint("FRAG6 memory", |s, v| s.frag6_memory = v),
    ];
    LabelTable::new("sockstat", fields.into_iter().map(F::lenient).collect())
});

/// Parses sockstat content, optionally with sockstat6 content appended.
pub fn parse_sockstat(content: &str) -> Result<SockStat, DecodeError> {
    let table = &*SOCKSTAT_FIELDS;
    let mut stat = SockStat::default();

    for (protocol, values) in split::label_values(content) {
        let tokens: Vec<&str> = values.split_whitespace().collect();
        if tokens.len() % 2 != 0 {
            return Err(DecodeError::format(
                "sockstat",
                format!("{protocol}: odd number of tokens in {values:?}"),
            ));
        }
        for pair in tokens.chunks_exact(2) {
            let label = format!("{protocol} {}", pair[0]);
            table.apply(&mut stat, &label, pair[1])?;
        }
    }

    Ok(stat)
}

impl ProcFile for SockStat {
    const KIND: &'static str = "sockstat";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_sockstat(content)
    }
}
