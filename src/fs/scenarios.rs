//! Pre-built `/proc` trees for tests and demos.

use super::MockFs;

const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
model\t\t: 85
model name\t: Intel(R) Xeon(R) Gold 6230 CPU @ 2.10GHz
cpu MHz\t\t: 2100.000
cache size\t: 28160 KB
physical id\t: 0
core id\t\t: 0
cpu cores\t: 2
flags\t\t: fpu vme de pse tsc msr

processor\t: 1
vendor_id\t: GenuineIntel
model\t\t: 85
model name\t: Intel(R) Xeon(R) Gold 6230 CPU @ 2.10GHz
cpu MHz\t\t: 2100.000
cache size\t: 28160 KB
physical id\t: 0
core id\t\t: 1
cpu cores\t: 2
flags\t\t: fpu vme de pse tsc msr

";

const MEMINFO: &str = "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12288000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
Active(anon):    3000000 kB
Inactive(anon):   100000 kB
Active(file):    1096000 kB
Inactive(file):  1948000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
Slab:             320000 kB
SReclaimable:     256000 kB
SUnreclaim:        64000 kB
HugePages_Total:       0
Hugepagesize:       2048 kB
";

const DISKSTATS: &str = "\
   8       0 sda 1234 10 56789 100 5678 20 98765 200 0 150 300 0 0 0 0
   8       1 sda1 1000 0 50000 80 5000 0 90000 180 0 130 260
";

const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1234567    1234    0    0    0     0          0         0  1234567    1234    0    0    0     0       0          0
  eth0: 9876543210 8765432  1  2  3  4  5  6 1234567890 7654321  7  8  9 10 11 12
";

const SOCKSTAT: &str = "\
sockets: used 231
TCP: inuse 27 orphan 1 tw 23 alloc 31 mem 3
UDP: inuse 19 mem 17
UDPLITE: inuse 0
RAW: inuse 0
FRAG: inuse 0 memory 0
";

const SOCKSTAT6: &str = "\
TCP6: inuse 4
UDP6: inuse 2
UDPLITE6: inuse 0
RAW6: inuse 0
FRAG6: inuse 0 memory 0
";

impl MockFs {
    /// A two CPU host with `init` and a `bash` child.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file("/proc/cpuinfo", CPUINFO);
        fs.add_file("/proc/meminfo", MEMINFO);
        fs.add_file("/proc/diskstats", DISKSTATS);
        fs.add_file("/proc/net/dev", NET_DEV);
        fs.add_file("/proc/net/sockstat", SOCKSTAT);
        fs.add_file("/proc/net/sockstat6", SOCKSTAT6);
        fs.add_file("/proc/loadavg", "0.75 0.35 0.25 1/25 1747\n");
        fs.add_file("/proc/uptime", "12345.67 20000.00\n");

        fs.add_process(
            1,
            &stat_line(1, "systemd", 'S', 0, 500, 300),
            &status_text(1, "systemd", 0, 0),
        );
        fs.add_process(
            1234,
            &stat_line(1234, "bash", 'S', 1, 100, 50),
            &status_text(1234, "bash", 1, 1000),
        );

        fs
    }

    /// Like [`typical_system`](Self::typical_system), plus one pid directory
    /// with a truncated stat file and one without any files.
    pub fn broken_processes() -> Self {
        let mut fs = Self::typical_system();
        fs.add_process(4321, "4321 (trunc) R 1", &status_text(4321, "trunc", 1, 0));
        fs.add_dir("/proc/5555");
        fs
    }
}

/// Builds a 52 field `[pid]/stat` line.
pub(crate) fn stat_line(
    pid: u32,
    comm: &str,
    state: char,
    ppid: u32,
    utime: u64,
    stime: u64,
) -> String {
    format!(
        "{pid} ({comm}) {state} {ppid} {pid} {pid} 0 -1 4194560 1500 0 12 0 {utime} {stime} 0 0 20 0 1 0 \
         100 170000000 2500 18446744073709551615 1 1 0 0 0 0 0 4096 1260 0 0 0 17 0 0 0 0 0 0 \
         0 0 0 0 0 0 0 0"
    )
}

/// Builds a minimal `[pid]/status` text.
pub(crate) fn status_text(pid: u32, name: &str, ppid: u32, uid: u32) -> String {
    format!(
        "Name:\t{name}\nState:\tS (sleeping)\nTgid:\t{pid}\nPid:\t{pid}\nPPid:\t{ppid}\n\
         TracerPid:\t0\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nGid:\t{uid}\t{uid}\t{uid}\t{uid}\n\
         FDSize:\t64\nGroups:\t\nVmRSS:\t    4800 kB\nThreads:\t1\nSigQ:\t0/63432\n\
         SigBlk:\t0000000000000000\nCapEff:\t0000000000000000\nSeccomp:\t0\n\
         Cpus_allowed:\t3\nMems_allowed:\t1\n\
         voluntary_ctxt_switches:\t10\nnonvoluntary_ctxt_switches:\t2\n"
    )
}
