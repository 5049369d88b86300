//! Crop Contract API smoke runner
//!
//! Runs the marketplace endpoint sequence once and exits non-zero if any
//! step failed.

use std::path::PathBuf;

use clap::Parser;
use crop_smoke::common::{config::BASE_URL_ENV, logging};
use crop_smoke::testing::Reporter;
use crop_smoke::{run_all, Config, HttpSession};

#[derive(Parser)]
#[command(name = "crop-smoke", about = "Smoke-test the crop contract marketplace API")]
#[command(version, long_about = None)]
struct Cli {
    /// Base URL of the API (overrides config file and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Configuration file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => {
            config.with_overrides(cli.base_url, std::env::var(BASE_URL_ENV).ok(), cli.timeout)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let session = match HttpSession::new(&config.server.base_url, config.server.timeout_secs) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    };

    let mut reporter = Reporter::stdout();
    reporter.banner(session.base_url());
    let summary = run_all(&session, &config.fixtures, &mut reporter).await;

    std::process::exit(summary.exit_code());
}
