use anyhow::Result;
use clap::{Parser, Subcommand};

mod args;
mod commands;
mod logging;
mod utils;

use args::{FileSetArgs, ReadArgs, WriteArgs};

#[derive(Parser)]
#[command(name = "readbench-cmd")]
#[command(about = "File open/read/close latency benchmark with optional direct I/O")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the file set, run the benchmark and remove the files
    Run {
        #[command(flatten)]
        files: FileSetArgs,

        #[command(flatten)]
        write: WriteArgs,

        #[command(flatten)]
        read: ReadArgs,

        /// Drop the OS page cache after creating the files (requires root)
        #[arg(long)]
        drop_caches: bool,

        /// Keep the benchmark directory after the run
        #[arg(long)]
        keep_files: bool,
    },

    /// Create the file set only
    Prepare {
        #[command(flatten)]
        files: FileSetArgs,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Run the benchmark against an existing file set
    Read {
        #[command(flatten)]
        files: FileSetArgs,

        #[command(flatten)]
        read: ReadArgs,

        /// Drop the OS page cache before reading (requires root)
        #[arg(long)]
        drop_caches: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_subscriber(cli.verbose);

    match cli.command {
        Commands::Run {
            files,
            write,
            read,
            drop_caches,
            keep_files,
        } => commands::run::run(
            args::build_config(&files, Some(&write), Some(&read), drop_caches),
            keep_files,
        ),
        Commands::Prepare { files, write } => {
            commands::prepare::run(args::build_config(&files, Some(&write), None, false))
        }
        Commands::Read {
            files,
            read,
            drop_caches,
        } => commands::read::run(args::build_config(&files, None, Some(&read), drop_caches)),
    }
}
