//! Main entry point for the finder binary
//!
//! Wires the real service implementations into the orchestrator and runs it
//! either once or on a daily schedule.

use clap::Parser;
use std::path::PathBuf;
use tokio::signal;

use finder::{
    services::{HtmlPageParser, RealFileSystem, RealPageFetcher, SystemClock},
    FinderConfig, FinderResult, Orchestrator, Scheduler,
};
use shared::logging;

/// Finds directory-listed firms without a website of their own
#[derive(Parser)]
#[command(name = "finder")]
#[command(about = "Collects firms without a website from an online business directory")]
pub struct Args {
    /// Run once and exit (exit code 1 if the run aborts)
    #[arg(long)]
    pub once: bool,

    /// Daily trigger time for daemon mode, HH:MM local time
    #[arg(long)]
    pub at: Option<String>,

    /// Daemon mode: wait for the first trigger instead of running at startup
    #[arg(long)]
    pub no_initial_run: bool,

    /// JSON configuration file; missing keys use defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the ledger and the dated result files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Maximum number of firms per run
    #[arg(long)]
    pub target: Option<usize>,

    /// Search keyword, repeatable; replaces the configured list
    #[arg(long = "keyword")]
    pub keywords: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Append-only log file
    #[arg(long, default_value = "firm_finder.log")]
    pub log_file: PathBuf,
}

impl Args {
    /// Defaults, then the config file, then command line overrides
    fn load_config(&self) -> FinderResult<FinderConfig> {
        let mut config = match &self.config {
            Some(path) => FinderConfig::from_file(path)?,
            None => FinderConfig::default(),
        };

        if let Some(at) = &self.at {
            config.schedule.at = at.clone();
        }
        if self.no_initial_run {
            config.schedule.run_on_start = false;
        }
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(target) = self.target {
            config.target_count = target;
        }
        if !self.keywords.is_empty() {
            config.keywords = self.keywords.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init_tracing(&args.log_level, Some(&args.log_file)) {
        eprintln!("Cannot open log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    match run(args).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            logging::log_error("Finder startup", &e);
            std::process::exit(1);
        }
    }
}

async fn run(args: Args) -> FinderResult<i32> {
    let config = args.load_config()?;
    let trigger_time = config.schedule.trigger_time()?;
    let run_on_start = config.schedule.run_on_start;

    // Initialize services
    let fetcher = RealPageFetcher::new(&config.http)?;
    let parser = HtmlPageParser::new(&config.site)?;
    let file_system = RealFileSystem::with_base_dir(config.data_dir.clone());

    // Create orchestrator with dependency injection
    let orchestrator = Orchestrator::new(config, fetcher, parser, file_system, SystemClock);

    if args.once {
        logging::log_startup("firm finder (single run)");
        let outcome = orchestrator.run_once().await?;
        logging::log_shutdown(if outcome.is_completed() { "run completed" } else { "run aborted" });
        return Ok(outcome.exit_code());
    }

    logging::log_startup(&format!("firm finder daemon (daily at {})", trigger_time.format("%H:%M")));
    let scheduler = Scheduler::new(SystemClock, trigger_time, run_on_start);

    tokio::select! {
        _ = scheduler.run(|| orchestrator.run_once(), None) => {}
        result = signal::ctrl_c() => match result {
            Ok(()) => logging::log_shutdown("Received Ctrl+C signal"),
            Err(err) => logging::log_error("Signal handling", &err),
        },
    }

    Ok(0)
}
