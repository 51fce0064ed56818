pub mod check;
pub mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use hostwatch_common::config::Config;

#[derive(Parser)]
#[command(name = "hostwatch")]
#[command(about = "Continuous reachability and latency monitoring over ICMP.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat for even less
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Print debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Accept DNS host names besides IPv4 addresses
    #[arg(long, global = true)]
    pub allow_hostnames: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe hosts continuously until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),
    /// Validate a host list without probing
    #[command(alias = "c")]
    Check {
        /// Plain text list (one host per line) or a CSV export
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct WatchArgs {
    /// Hosts to monitor
    pub hosts: Vec<String>,

    /// Import hosts from a CSV export
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Read hosts from a text file, one per line
    #[arg(short, long)]
    pub list: Option<PathBuf>,

    /// Export the final table to this CSV file on exit
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Stop on its own after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Pause between probes of the same host, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    pub interval_ms: u64,

    /// Echo reply timeout, in milliseconds
    #[arg(long, default_value_t = 1_000)]
    pub timeout_ms: u64,

    /// How long stopping waits for a monitor before aborting it, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub grace_ms: u64,

    /// Number of recent probes the delivery percentages cover
    #[arg(long, default_value_t = 1)]
    pub window: usize,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let mut cfg = Config {
            allow_hostnames: self.allow_hostnames,
            quiet: self.quiet,
            no_color: self.no_color,
            ..Config::default()
        };

        if let Commands::Watch(args) = &self.command {
            cfg.interval = Duration::from_millis(args.interval_ms);
            cfg.timeout = Duration::from_millis(args.timeout_ms);
            cfg.grace_period = Duration::from_millis(args.grace_ms);
            cfg.window = args.window;
        }
        cfg
    }
}
