//! `/proc/net/dev`: per-interface receive and transmit counters.
//!
//! ```text
//! Inter-|   Receive                                                |  Transmit
//!  face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
//!     lo: 1234567    1234    0    0    0     0          0         0  1234567    1234    0    0    0     0       0          0
//! ```
//!
//! The interface name ends at the first colon; older kernels print no space
//! between the colon and the first counter.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::decode::{Column, Layout, split};
use crate::error::DecodeError;
use crate::reader::ProcFile;

/// Lines of column headings before the first interface.
const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStat {
    pub iface: String,
    #[serde(rename = "rxbytes")]
    pub rx_bytes: u64,
    #[serde(rename = "rxpackets")]
    pub rx_packets: u64,
    #[serde(rename = "rxerrs")]
    pub rx_errs: u64,
    #[serde(rename = "rxdrop")]
    pub rx_drop: u64,
    #[serde(rename = "rxfifo")]
    pub rx_fifo: u64,
    #[serde(rename = "rxframe")]
    pub rx_frame: u64,
    #[serde(rename = "rxcompressed")]
    pub rx_compressed: u64,
    #[serde(rename = "rxmulticast")]
    pub rx_multicast: u64,
    #[serde(rename = "txbytes")]
    pub tx_bytes: u64,
    #[serde(rename = "txpackets")]
    pub tx_packets: u64,
    #[serde(rename = "txerrs")]
    pub tx_errs: u64,
    #[serde(rename = "txdrop")]
    pub tx_drop: u64,
    #[serde(rename = "txfifo")]
    pub tx_fifo: u64,
    #[serde(rename = "txcolls")]
    pub tx_colls: u64,
    #[serde(rename = "txcarrier")]
    pub tx_carrier: u64,
    #[serde(rename = "txcompressed")]
    pub tx_compressed: u64,
}

type C = Column<NetworkStat>;

/// Counters after the colon. The interface name is not part of the layout.
static COUNTER_LAYOUT: LazyLock<Layout<NetworkStat>> = LazyLock::new(|| {
    let columns = vec![
        C::uint(0, "rxbytes", |n, v| n.rx_bytes = v),
        C::uint(1, "rxpackets", |n, v| n.rx_packets = v),
        C::uint(2, "rxerrs", |n, v| n.rx_errs = v),
        C::uint(3, "rxdrop", |n, v| n.rx_drop = v),
        C::uint(4, "rxfifo", |n, v| n.rx_fifo = v),
        C::uint(5, "rxframe", |n, v| n.rx_frame = v),
        C::uint(6, "rxcompressed", |n, v| n.rx_compressed = v),
        C::uint(7, "rxmulticast", |n, v| n.rx_multicast = v),
        C::uint(8, "txbytes", |n, v| n.tx_bytes = v),
        C::uint(9, "txpackets", |n, v| n.tx_packets = v),
        C::uint(10, "txerrs", |n, v| n.tx_errs = v),
        C::uint(11, "txdrop", |n, v| n.tx_drop = v),
        C::uint(12, "txfifo", |n, v| n.tx_fifo = v),
        C::uint(13, "txcolls", |n, v| n.tx_colls = v),
        C::uint(14, "txcarrier", |n, v| n.tx_carrier = v),
        C::uint(15, "txcompressed", |n, v| n.tx_compressed = v),
    ];
    Layout::new("net/dev", 16, columns.into_iter().map(C::lenient).collect())
});

fn parse_interface(line: &str) -> Result<NetworkStat, DecodeError> {
    let Some((name, counters)) = line.split_once(':') else {
        return Err(DecodeError::format("net/dev", format!("no ':' in line {line:?}")));
    };

    let mut stat = COUNTER_LAYOUT.decode_line(counters)?;
    stat.iface = name.replace(' ', "");
    Ok(stat)
}

/// Parses `/proc/net/dev` content. Interfaces are returned in file order.
pub fn parse_net_dev(content: &str) -> Result<Vec<NetworkStat>, DecodeError> {
    let Some(lines) = split::lines_after_header(content, HEADER_LINES) else {
        return Err(DecodeError::format("net/dev", "missing column header"));
    };
    lines.map(parse_interface).collect()
}

impl ProcFile for Vec<NetworkStat> {
    const KIND: &'static str = "net/dev";

    fn parse(content: &str) -> Result<Self, DecodeError> {
        parse_net_dev(content)
    }

    fn records(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1234567    1234    0    0    0     0          0         0  1234567    1234    0    0    0     0       0          0
  eth0: 9876543210 8765432  1  2  3  4  5  6 1234567890 7654321  7  8  9 10 11 12
";

    #[test]
    fn test_parse_net_dev() {
        let stats = parse_net_dev(NET_DEV).unwrap();
        assert_eq!(stats.len(), 2);

        assert_eq!(stats[0].iface, "lo");
        assert_eq!(stats[0].rx_bytes, 1_234_567);
        assert_eq!(stats[0].tx_packets, 1234);

        let eth0 = &stats[1];
        assert_eq!(eth0.iface, "eth0");
        assert_eq!(eth0.rx_bytes, 9_876_543_210);
        assert_eq!(eth0.rx_packets, 8_765_432);
        assert_eq!(eth0.rx_errs, 1);
        assert_eq!(eth0.rx_drop, 2);
        assert_eq!(eth0.rx_fifo, 3);
        assert_eq!(eth0.rx_frame, 4);
        assert_eq!(eth0.rx_compressed, 5);
        assert_eq!(eth0.rx_multicast, 6);
        assert_eq!(eth0.tx_bytes, 1_234_567_890);
        assert_eq!(eth0.tx_packets, 7_654_321);
        assert_eq!(eth0.tx_errs, 7);
        assert_eq!(eth0.tx_drop, 8);
        assert_eq!(eth0.tx_fifo, 9);
        assert_eq!(eth0.tx_colls, 10);
        assert_eq!(eth0.tx_carrier, 11);
        assert_eq!(eth0.tx_compressed, 12);
    }

    #[test]
    fn test_no_space_after_colon() {
        let content = "h1\nh2\n  eth1:100 2 0 0 0 0 0 0 300 4 0 0 0 0 0 0\n";
        let stats = parse_net_dev(content).unwrap();
        assert_eq!(stats[0].iface, "eth1");
        assert_eq!(stats[0].rx_bytes, 100);
        assert_eq!(stats[0].tx_bytes, 300);

        let packed = parse_interface("  eth0:1000 10 0 0 0 0 0 0 2000 20 0 0 0 0 0 0").unwrap();
        let spaced = parse_interface("eth0: 1000 10 0 0 0 0 0 0 2000 20 0 0 0 0 0 0").unwrap();
        assert_eq!(packed, spaced);
        assert_eq!(packed.iface, "eth0");
    }

    #[test]
    fn test_header_only() {
        assert!(parse_net_dev("h1\nh2\n").unwrap().is_empty());
        assert!(parse_net_dev("h1\n").is_err());
    }

    #[test]
    fn test_short_line_is_an_error() {
        let content = "h1\nh2\n  eth0: 1 2 3\n";
        assert_eq!(
            parse_net_dev(content).unwrap_err(),
            DecodeError::MissingField {
                record: "net/dev",
                expected: 16,
                found: 3,
            }
        );
    }

    #[test]
    fn test_line_without_colon() {
        let content = "h1\nh2\n  eth0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16\n";
        assert!(matches!(
            parse_net_dev(content),
            Err(DecodeError::Format { record: "net/dev", .. })
        ));
    }

    #[test]
    fn test_malformed_counter_is_zero() {
        let content = "h1\nh2\nlo: x 1 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n";
        let stats = parse_net_dev(content).unwrap();
        assert_eq!(stats[0].rx_bytes, 0);
        assert_eq!(stats[0].rx_packets, 1);
    }
}
