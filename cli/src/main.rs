//! CLI for the commit harvester.
//!
//! Lists recently updated Bitbucket repositories, fetches their commits
//! concurrently and writes them to a newline-delimited JSON file.

use chrono::Utc;
use clap::Parser;
use commit_harvester::{
    resolve_date, resolve_total, ConfigError, FileConfig, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Commit Harvester - Collect Bitbucket commit metadata into a JSON lines file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Total number of commits to harvest [default: 100].
    #[arg(long, allow_negative_numbers = true)]
    total: Option<i64>,

    /// List repositories updated after this ISO-8601 date [default: three months ago].
    #[arg(long)]
    date: Option<String>,

    /// Scan each commit's patch for referenced subdomains.
    #[arg(long)]
    enrich: bool,

    /// Directory the output file is created in [default: .].
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Repositories and commits requested per page [default: 100].
    #[arg(long)]
    page_size: Option<u32>,

    /// Maximum repositories fetched at once [default: 8].
    #[arg(long)]
    concurrency: Option<usize>,

    /// Maximum repository pages to request [default: 1].
    #[arg(long)]
    max_pages: Option<usize>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bitbucket API root URL.
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,

    /// Bitbucket web root used for repository links.
    #[arg(long)]
    web_url: Option<String>,

    /// Per-request timeout in seconds [default: 30].
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Environment variable overriding the API root URL.
const API_URL_ENV: &str = "COMMIT_HARVESTER_API_URL";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // reqwest is built on rustls; make the process-wide provider explicit.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::from(0)
        }
        Err(RunnerError::Config(e)) => {
            error!(error = %e, "Invalid configuration");
            ExitCode::from(1)
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config = build_config(args)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Resolves flags on top of the optional config file. Nothing here touches the network.
fn build_config(args: Args) -> Result<RunnerConfig, ConfigError> {
    let total = resolve_total(args.total)?;
    let date = resolve_date(args.date.as_deref(), Utc::now())?;

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let mut config = RunnerConfig::new(total, date).with_file_config(&file);
    if args.enrich {
        config = config.with_enrich(true);
    }
    if let Some(output_dir) = args.output_dir {
        config = config.with_output_dir(output_dir);
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(max_pages) = args.max_pages {
        config = config.with_max_pages(max_pages);
    }
    if let Some(api_url) = args.api_url {
        config = config.with_api_url(api_url);
    }
    if let Some(web_url) = args.web_url {
        config = config.with_web_url(web_url);
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(timeout_secs));
    }

    config.validate()?;
    Ok(config)
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!("  Repositories listed: {}", summary.repositories_listed);
    println!(
        "  Repositories dispatched: {}",
        summary.repositories_dispatched
    );
    println!("  Repositories failed: {}", summary.repositories_failed);
    println!("  Commits written: {}", summary.commits_written);

    if summary.commits_dropped > 0 {
        println!("  Commits without patch: {}", summary.commits_dropped);
    }
    if summary.commits_failed > 0 {
        println!("  Commits failed to write: {}", summary.commits_failed);
    }
    if summary.commits_discarded > 0 {
        println!("  Commits over total: {}", summary.commits_discarded);
    }
    if summary.has_failures() {
        println!("\nSome repositories or commits failed; see the log for details.");
    }

    match summary.output() {
        Some(path) => println!("\nCommits stored to {}", path.display()),
        None => println!("\nNo commits were written"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("commit-harvester").chain(args.iter().copied()))
            .unwrap()
    }

    /// Builds a config from `args` with the API URL variable unset.
    fn build(args: &[&str]) -> Result<RunnerConfig, ConfigError> {
        temp_env::with_var_unset(API_URL_ENV, || build_config(parse(args)))
    }

    #[test]
    fn explicit_zero_total_is_rejected() {
        let result = build(&["--total", "0"]);
        assert!(matches!(result, Err(ConfigError::InvalidTotal { value: 0 })));
    }

    #[test]
    fn negative_total_is_rejected() {
        let result = build(&["--total", "-4"]);
        assert!(matches!(result, Err(ConfigError::InvalidTotal { value: -4 })));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = build(&[]).unwrap();

        assert_eq!(config.total(), 100);
        assert!(!config.date().is_empty());
        assert!(!config.enrich());
        assert_eq!(config.api_url(), "https://api.bitbucket.org/2.0");
        assert_eq!(config.web_url(), "https://bitbucket.org");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn flags_are_applied() {
        let config = build(&[
            "--total",
            "5",
            "--date",
            "2024-11-15",
            "--enrich",
            "--page-size",
            "10",
            "--api-url",
            "http://localhost:9000/2.0",
            "--web-url",
            "http://localhost:9000",
            "--timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(config.total(), 5);
        assert_eq!(config.date(), "2024-11-15");
        assert!(config.enrich());
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.api_url(), "http://localhost:9000/2.0");
        assert_eq!(config.web_url(), "http://localhost:9000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn api_url_is_read_from_environment() {
        let config = temp_env::with_var(API_URL_ENV, Some("http://mirror.internal:8080/2.0"), || {
            build_config(parse(&[]))
        })
        .unwrap();

        assert_eq!(config.api_url(), "http://mirror.internal:8080/2.0");
    }

    #[test]
    fn api_url_flag_wins_over_environment() {
        let config = temp_env::with_var(API_URL_ENV, Some("http://mirror.internal:8080/2.0"), || {
            build_config(parse(&["--api-url", "http://localhost:9000/2.0"]))
        })
        .unwrap();

        assert_eq!(config.api_url(), "http://localhost:9000/2.0");
    }

    #[test]
    fn invalid_api_url_from_environment_is_rejected() {
        let result = temp_env::with_var(API_URL_ENV, Some("not a url"), || build_config(parse(&[])));

        assert!(matches!(
            result,
            Err(ConfigError::ValidationError { ref field, .. }) if field == "api-url"
        ));
    }
}
