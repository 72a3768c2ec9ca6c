//! kvlog CLI
//!
//! Command-line interface for a kvlog store.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use kvlog::{Config, KvStore, SyncMode, Wal};
use tracing_subscriber::{fmt, EnvFilter};

/// kvlog CLI
#[derive(Parser, Debug)]
#[command(name = "kvlog")]
#[command(about = "Append-only key-value log with compaction")]
#[command(version)]
struct Args {
    /// Log file (defaults to ~/.kls/log.bin)
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// fsync after every append
    #[arg(long)]
    sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print every record in file order, escaped as on disk
    Dump,

    /// Keep only the latest record per key
    Compact,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kvlog=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> kvlog::Result<ExitCode> {
    let mut builder = Config::builder();
    if let Some(path) = args.log {
        builder = builder.log_path(path);
    }
    if args.sync {
        builder = builder.sync_mode(SyncMode::EveryAppend);
    }
    let config = builder.build()?;

    tracing::debug!("kvlog v{} using {}", kvlog::VERSION, config.log_path.display());

    match args.command {
        Commands::Get { key } => {
            let store = KvStore::open(config)?;
            match store.get(&key) {
                Some(value) => println!("{}", value),
                None => {
                    eprintln!("(not found)");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Set { key, value } => {
            let store = KvStore::open(config)?;
            store.set(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => {
            let store = KvStore::open(config)?;
            if store.delete(&key)? {
                println!("OK");
            } else {
                println!("(not found)");
            }
        }
        Commands::Dump => {
            let wal = Wal::new(config);
            for entry in wal.read_all()? {
                println!("{}", entry);
            }
        }
        Commands::Compact => {
            let wal = Wal::new(config);
            let report = wal.compact_with_report()?;
            println!(
                "{} -> {} bytes ({:.1}% saved, {} records kept, {} malformed lines dropped)",
                report.before_size,
                report.after_size,
                report.savings_ratio() * 100.0,
                report.records_kept,
                report.lines_skipped
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
