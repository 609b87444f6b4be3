//! Reading `/proc` files through a [`FileSystem`].
//!
//! [`ProcReader`] resolves the kernel path of each file family under a
//! configurable proc root, reads the whole file in one call and hands the
//! content to the matching parser. Nothing is cached between calls.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DecodeError, ReadError};
use crate::fs::{FileSystem, RealFs};
use crate::procfs::{
    CpuInfo, DiskStat, LoadAvg, MemInfo, NetworkStat, ProcessStat, ProcessStatus, SockStat,
    Uptime,
};

/// A decodable `/proc` file format.
pub trait ProcFile: Sized {
    /// Short name used in logs.
    const KIND: &'static str;

    fn parse(content: &str) -> Result<Self, DecodeError>;

    /// Number of entities decoded, for logging.
    fn records(&self) -> usize {
        1
    }
}

fn decode<T: ProcFile>(path: &Path, content: &str) -> Result<T, ReadError> {
    let value = T::parse(content).map_err(|source| ReadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        kind = T::KIND,
        path = %path.display(),
        records = value.records(),
        "decoded"
    );
    Ok(value)
}

fn read_file<F: FileSystem>(fs: &F, path: &Path) -> Result<String, ReadError> {
    fs.read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and decodes an arbitrary file with the parser for `T`.
///
/// ```no_run
/// let load: procstat::procfs::LoadAvg = procstat::read("/proc/loadavg")?;
/// # Ok::<(), procstat::ReadError>(())
/// ```
pub fn read<T: ProcFile>(path: impl AsRef<Path>) -> Result<T, ReadError> {
    let path = path.as_ref();
    let content = read_file(&RealFs, path)?;
    decode(path, &content)
}

/// Reads `/proc` files from a filesystem rooted at `proc_path`.
pub struct ProcReader<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
}

impl ProcReader<RealFs> {
    /// Reader for the host's `/proc`.
    pub fn system() -> Self {
        Self::new(RealFs, "/proc")
    }
}

impl<F: FileSystem> ProcReader<F> {
    /// Creates a new reader.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    pub fn proc_path(&self) -> &Path {
        &self.proc_path
    }

    /// Reads and decodes `relative` under the proc root.
    pub fn read<T: ProcFile>(&self, relative: impl AsRef<Path>) -> Result<T, ReadError> {
        let path = self.proc_path.join(relative);
        let content = read_file(&self.fs, &path)?;
        decode(&path, &content)
    }

    pub fn cpuinfo(&self) -> Result<CpuInfo, ReadError> {
        self.read("cpuinfo")
    }

    pub fn meminfo(&self) -> Result<MemInfo, ReadError> {
        self.read("meminfo")
    }

    pub fn diskstats(&self) -> Result<Vec<DiskStat>, ReadError> {
        self.read("diskstats")
    }

    pub fn net_dev(&self) -> Result<Vec<NetworkStat>, ReadError> {
        self.read("net/dev")
    }

    pub fn loadavg(&self) -> Result<LoadAvg, ReadError> {
        self.read("loadavg")
    }

    pub fn uptime(&self) -> Result<Uptime, ReadError> {
        self.read("uptime")
    }

    /// Reads `net/sockstat`, followed by `net/sockstat6` if the kernel has
    /// IPv6 enabled.
    pub fn sockstat(&self) -> Result<SockStat, ReadError> {
        let path = self.proc_path.join("net/sockstat");
        let mut content = read_file(&self.fs, &path)?;

        let path6 = self.proc_path.join("net/sockstat6");
        match read_file(&self.fs, &path6) {
            Ok(extra) => {
                if !content.is_empty() && !content.ends_with('\n') {
                    content.push('\n');
                }
                content.push_str(&extra);
            }
            Err(e) if e.is_not_found() => debug!(path = %path6.display(), "no IPv6 socket stats"),
            Err(e) => return Err(e),
        }

        decode(&path, &content)
    }

    pub fn process_stat(&self, pid: u32) -> Result<ProcessStat, ReadError> {
        self.read(Path::new(&pid.to_string()).join("stat"))
    }

    pub fn process_status(&self, pid: u32) -> Result<ProcessStatus, ReadError> {
        self.read(Path::new(&pid.to_string()).join("status"))
    }

    /// Lists numeric entries of the proc root in ascending order.
    pub fn pids(&self) -> Result<Vec<u32>, ReadError> {
        let entries = self
            .fs
            .read_dir(&self.proc_path)
            .map_err(|source| ReadError::Io {
                path: self.proc_path.clone(),
                source,
            })?;

        let mut pids: Vec<u32> = entries
            .iter()
            .filter_map(|entry| entry.file_name()?.to_str()?.parse().ok())
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    /// Reads `stat` of every process.
    ///
    /// Processes that exit while being read are skipped. Any other per-process
    /// failure is logged and skipped as well; only failing to list the proc
    /// root is an error.
    pub fn processes(&self) -> Result<Vec<ProcessStat>, ReadError> {
        let pids = self.pids()?;
        let mut processes = Vec::with_capacity(pids.len());

        for pid in pids {
            match self.process_stat(pid) {
                Ok(stat) => processes.push(stat),
                Err(e) if e.is_not_found() => debug!(pid, "process exited before read"),
                Err(e) => warn!(pid, error = %e, "skipping process"),
            }
        }

        debug!(count = processes.len(), "collected processes");
        Ok(processes)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::fs::MockFs;

    fn reader() -> ProcReader<MockFs> {
        ProcReader::new(MockFs::typical_system(), "/proc")
    }

    #[test]
    fn test_read_system_files() {
        let reader = reader();

        let cpu = reader.cpuinfo().unwrap();
        assert_eq!(cpu.num_cpu(), 2);
        assert_eq!(cpu.num_core(), 2);
        assert_eq!(cpu.num_physical_cpu(), 1);

        let mem = reader.meminfo().unwrap();
        assert_eq!(mem.mem_total, 16_384_000);
        assert_eq!(mem.active_anon, 3_000_000);

        let disks = reader.diskstats().unwrap();
        assert_eq!(disks.len(), 2);
        assert_eq!(disks[0].name, "sda");

        let nets = reader.net_dev().unwrap();
        assert_eq!(nets.len(), 2);
        assert_eq!(nets[1].iface, "eth0");

        let load = reader.loadavg().unwrap();
        assert_eq!(load.last_pid, 1747);

        let uptime = reader.uptime().unwrap();
        assert!((uptime.idle_ratio(cpu.num_cpu()) - 20000.0 / (12345.67 * 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_sockstat_merges_ipv6() {
        let stat = reader().sockstat().unwrap();
        assert_eq!(stat.sockets_used, 231);
        assert_eq!(stat.tcp_in_use, 27);
        assert_eq!(stat.tcp6_in_use, 4);
        assert_eq!(stat.udp6_in_use, 2);
    }

    #[test]
    fn test_sockstat_without_ipv6() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/net/sockstat", "sockets: used 5\n");
        let stat = ProcReader::new(fs, "/proc").sockstat().unwrap();
        assert_eq!(stat.sockets_used, 5);
        assert_eq!(stat.tcp6_in_use, 0);
    }

    #[test]
    fn test_sockstat_without_trailing_newline() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/net/sockstat", "sockets: used 5\nTCP: inuse 27");
        fs.add_file("/proc/net/sockstat6", "TCP6: inuse 4\n");
        let stat = ProcReader::new(fs, "/proc").sockstat().unwrap();
        assert_eq!(stat.sockets_used, 5);
        assert_eq!(stat.tcp_in_use, 27);
        assert_eq!(stat.tcp6_in_use, 4);
    }

    #[test]
    fn test_process_files() {
        let reader = reader();

        let stat = reader.process_stat(1234).unwrap();
        assert_eq!(stat.pid, 1234);
        assert_eq!(stat.name(), "bash");
        assert_eq!(stat.ppid, 1);
        assert_eq!(stat.cpu_ticks(), 150);

        let status = reader.process_status(1234).unwrap();
        assert_eq!(status.name, "bash");
        assert_eq!(status.real_uid, 1000);
        assert_eq!(status.allowed_cpu_count(), 2);
    }

    #[test]
    fn test_pids_and_processes() {
        let reader = reader();
        assert_eq!(reader.pids().unwrap(), vec![1, 1234]);

        let processes = reader.processes().unwrap();
        let comms: Vec<&str> = processes.iter().map(|p| p.name()).collect();
        assert_eq!(comms, vec!["systemd", "bash"]);
    }

    #[test]
    fn test_processes_skip_broken_entries() {
        let reader = ProcReader::new(MockFs::broken_processes(), "/proc");
        assert_eq!(reader.pids().unwrap(), vec![1, 1234, 4321, 5555]);

        let processes = reader.processes().unwrap();
        assert_eq!(processes.len(), 2);

        let err = reader.process_stat(4321).unwrap_err();
        assert!(matches!(
            err,
            ReadError::Decode {
                source: DecodeError::MissingField { .. },
                ..
            }
        ));
        assert!(reader.process_stat(5555).unwrap_err().is_not_found());
    }

    #[test]
    fn test_errors_carry_path() {
        let reader = ProcReader::new(MockFs::new(), "/proc");
        let err = reader.loadavg().unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), Path::new("/proc/loadavg"));
        assert!(reader.pids().is_err());

        let mut fs = MockFs::new();
        fs.add_file("/proc/uptime", "1.0\n");
        let err = ProcReader::new(fs, "/proc").uptime().unwrap_err();
        assert!(matches!(err, ReadError::Decode { .. }));
        assert_eq!(err.path(), Path::new("/proc/uptime"));
    }

    #[test]
    fn test_custom_proc_root() {
        let mut fs = MockFs::new();
        fs.add_file("/host/proc/loadavg", "1.00 2.00 3.00 4/50 99\n");
        let reader = ProcReader::new(fs, "/host/proc");
        assert_eq!(reader.proc_path(), Path::new("/host/proc"));
        assert_eq!(reader.loadavg().unwrap().process_total, 50);
    }

    #[test]
    fn test_read_real_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"350735.47 234388.90\n").unwrap();

        let uptime: Uptime = read(file.path()).unwrap();
        assert!((uptime.total - 350735.47).abs() < 0.001);

        let err = read::<Uptime>("/nonexistent/uptime").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_read_generic_kind() {
        let reader = reader();
        let disks: Vec<DiskStat> = reader.read("diskstats").unwrap();
        assert_eq!(disks.len(), 2);
        assert_eq!(<Vec<DiskStat> as ProcFile>::KIND, "diskstats");
    }
}
