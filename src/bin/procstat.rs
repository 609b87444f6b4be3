//! procstat - print decoded `/proc` files as JSON.
//!
//! Usage:
//!   procstat meminfo                  # /proc/meminfo
//!   procstat --pretty stat 1          # /proc/1/stat, indented
//!   procstat --proc-path /host/proc processes
//!   procstat file loadavg ./loadavg   # decode any file as a given kind

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{Level, debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use procstat::procfs::{
    CpuInfo, DiskStat, LoadAvg, MemInfo, NetworkStat, ProcessStat, ProcessStatus, SockStat,
    Uptime,
};
use procstat::{ProcReader, ReadError, RealFs};

/// Decodes Linux /proc pseudo-files into JSON.
#[derive(Parser)]
#[command(name = "procstat", about = "Decode Linux /proc files", version)]
struct Args {
    /// Path to /proc filesystem.
    #[arg(long, env = "PROCSTAT_PROC_PATH", default_value = "/proc", global = true)]
    proc_path: PathBuf,

    /// Indent JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Processors and topology counts.
    Cpuinfo,
    /// Memory usage.
    Meminfo,
    /// Block device I/O counters.
    Diskstats,
    /// Network interface counters.
    Netdev,
    /// Load averages.
    Loadavg,
    /// Uptime and idle time.
    Uptime,
    /// Socket counts (IPv4 and IPv6).
    Sockstat,
    /// `[pid]/stat` of one process.
    Stat { pid: u32 },
    /// `[pid]/status` of one process.
    Status { pid: u32 },
    /// `stat` of every process.
    Processes,
    /// Decode an arbitrary file as the given kind.
    File { kind: Kind, path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Cpuinfo,
    Meminfo,
    Diskstats,
    Netdev,
    Loadavg,
    Uptime,
    Sockstat,
    Stat,
    Status,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// cpuinfo with the derived topology counts alongside the processors.
fn cpuinfo_json(info: &CpuInfo, pretty: bool) -> Result<String, CliError> {
    let value = serde_json::json!({
        "num_cpu": info.num_cpu(),
        "num_core": info.num_core(),
        "num_physical_cpu": info.num_physical_cpu(),
        "processors": info.processors,
    });
    to_json(&value, pretty)
}

fn decode_file(kind: Kind, path: &Path, pretty: bool) -> Result<String, CliError> {
    match kind {
        Kind::Cpuinfo => cpuinfo_json(&procstat::read::<CpuInfo>(path)?, pretty),
        Kind::Meminfo => to_json(&procstat::read::<MemInfo>(path)?, pretty),
        Kind::Diskstats => to_json(&procstat::read::<Vec<DiskStat>>(path)?, pretty),
        Kind::Netdev => to_json(&procstat::read::<Vec<NetworkStat>>(path)?, pretty),
        Kind::Loadavg => to_json(&procstat::read::<LoadAvg>(path)?, pretty),
        Kind::Uptime => to_json(&procstat::read::<Uptime>(path)?, pretty),
        Kind::Sockstat => to_json(&procstat::read::<SockStat>(path)?, pretty),
        Kind::Stat => to_json(&procstat::read::<ProcessStat>(path)?, pretty),
        Kind::Status => to_json(&procstat::read::<ProcessStatus>(path)?, pretty),
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let reader = ProcReader::new(RealFs::new(), args.proc_path.clone());
    let pretty = args.pretty;

    match &args.command {
        Command::Cpuinfo => cpuinfo_json(&reader.cpuinfo()?, pretty),
        Command::Meminfo => to_json(&reader.meminfo()?, pretty),
        Command::Diskstats => to_json(&reader.diskstats()?, pretty),
        Command::Netdev => to_json(&reader.net_dev()?, pretty),
        Command::Loadavg => to_json(&reader.loadavg()?, pretty),
        Command::Uptime => to_json(&reader.uptime()?, pretty),
        Command::Sockstat => to_json(&reader.sockstat()?, pretty),
        Command::Stat { pid } => to_json(&reader.process_stat(*pid)?, pretty),
        Command::Status { pid } => to_json(&reader.process_status(*pid)?, pretty),
        Command::Processes => to_json(&reader.processes()?, pretty),
        Command::File { kind, path } => decode_file(*kind, path, pretty),
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    debug!(proc_path = %args.proc_path.display(), "starting");

    match run(&args) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
