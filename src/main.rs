//! Binary entry point: CLI parsing, logging setup, exit codes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use fourget::{Client, Fetcher};

/// Log file written alongside console output, in the working directory.
const LOG_FILE: &str = "fourget.log";

/// Fetch threads and images from an imageboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The board to fetch from (e.g. po, g).
    #[arg(short, long)]
    board: String,

    /// Number of threads to fetch.
    #[arg(short = 't', long = "threads", default_value_t = 5)]
    threads: usize,

    /// Offset into the catalog to start fetching threads from.
    #[arg(short, long, default_value_t = 0)]
    offset: usize,

    /// Output directory for saved data.
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = fourget::logging::init(Path::new(LOG_FILE)) {
        eprintln!("could not open log file {LOG_FILE}: {err}");
        return ExitCode::FAILURE;
    }

    info!(board = %args.board, threads = args.threads, offset = args.offset, "starting fetch");

    let fetcher = match Fetcher::new(Client::new(), &args.board, &args.directory) {
        Ok(fetcher) => fetcher,
        Err(err) => {
            error!(%err, "board validation failed");
            eprintln!("Error: {err}. Please check the board name and try again.");
            return ExitCode::FAILURE;
        }
    };

    match fetcher.run(args.threads, args.offset).await {
        Ok(summary) => {
            // partial per-thread failures still exit 0
            info!(
                fetched = summary.fetched,
                failed = summary.failed,
                images = summary.images,
                "fetching process completed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "fetch aborted");
            eprintln!("An error occurred: {err}. See {LOG_FILE} for details.");
            ExitCode::FAILURE
        }
    }
}
