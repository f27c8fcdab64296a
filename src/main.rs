//! CLI entry point for the bikeshare statistics tool.
//!
//! Provides subcommands for computing the trip statistics of one city export
//! under an optional month or date filter, and for paging through the raw
//! trips that filter selects.

use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bikeshare_stats::{
    city::City,
    config::AppConfig,
    filter::{TimeFilter, TripMonth},
    logging::{console_layer, env_filter, json_layer},
    output::{append_record, paginate, print_pretty, render_text, write_json, write_records},
    parser::load_dataset,
    stats::TripStats,
    trip::Dataset,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Descriptive statistics for bikeshare trip exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute trip statistics for a city or file
    Stats {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Report format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// CSV file to append a one-row summary to
        #[arg(long, value_name = "PATH")]
        append_csv: Option<PathBuf>,
    },
    /// Print one page of the filtered raw trips as CSV
    Show {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filter: FilterArgs,

        /// Trips per page
        #[arg(long, default_value_t = 5)]
        page_size: usize,

        /// Page to print, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// City whose export to load from the data directory
    #[arg(short, long, value_enum, required_unless_present = "file")]
    city: Option<City>,

    /// Path to a trip CSV (plain or .gz)
    #[arg(short, long, value_name = "PATH", conflicts_with = "city")]
    file: Option<PathBuf>,

    /// Directory holding the city exports (defaults to $BIKESHARE_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct FilterArgs {
    /// Only trips starting in this month (January..June)
    #[arg(short, long)]
    month: Option<TripMonth>,

    /// Only trips starting on this day of --month, 2017
    #[arg(short, long, requires = "month")]
    day: Option<u32>,
}

impl FilterArgs {
    fn time_filter(&self) -> Result<TimeFilter> {
        Ok(match (self.month, self.day) {
            (None, _) => TimeFilter::All,
            (Some(month), None) => TimeFilter::by_month(month),
            (Some(month), Some(day)) => TimeFilter::by_date(month, day)?,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = AppConfig::from_env();
    let _file_guard = init_tracing(&config.log_file_path)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats {
            source,
            filter,
            format,
            append_csv,
        } => {
            let filter = filter.time_filter()?;
            let (name, dataset) = load(&source, &config)?;

            let stats = TripStats::from_dataset(&dataset, filter).with_source(&name);
            print_pretty(&stats);

            let stdout = std::io::stdout().lock();
            match format {
                Format::Text => write_text(stdout, &stats)?,
                Format::Json => write_json(stdout, &stats)?,
            }

            if let Some(path) = append_csv {
                append_record(&path, &stats)?;
                info!(path = %path.display(), "Summary appended");
            }
        }
        Commands::Show {
            source,
            filter,
            page_size,
            page,
        } => {
            let filter = filter.time_filter()?;
            let (_, dataset) = load(&source, &config)?;

            let page = paginate(&dataset.trips, filter, page, page_size);
            if page.trips.is_empty() {
                warn!(page = page.number, %filter, "No trips on this page");
            } else {
                write_records(
                    std::io::stdout().lock(),
                    dataset.schema,
                    page.trips.iter().copied(),
                )?;
            }

            if page.is_last {
                info!(page = page.number, "This is the end of the data");
            }
        }
    }

    Ok(())
}

/// Colored stderr logs plus a JSON rolling log file.
fn init_tracing(log_file_path: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = log_file_path
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = console_layer(std::io::stderr, env_filter("RUST_LOG", LevelFilter::INFO));
    let file_layer = json_layer(
        non_blocking_file,
        env_filter("RUST_LOG_JSON", LevelFilter::DEBUG),
    );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(file_guard)
}

/// Resolves the trip source named on the command line and loads it.
fn load(source: &SourceArgs, config: &AppConfig) -> Result<(String, Dataset)> {
    let (name, path) = match (&source.file, source.city) {
        (Some(path), _) => (path.display().to_string(), path.clone()),
        (None, Some(city)) => {
            let dir = source.data_dir.as_deref().unwrap_or(&config.data_dir);
            let path = city.resolve(dir).with_context(|| {
                format!("no {} export found in {}", city.file_stem(), dir.display())
            })?;
            (city.to_string(), path)
        }
        (None, None) => bail!("either --city or --file is required"),
    };

    info!(source = %name, path = %path.display(), "Loading trips");
    let dataset = load_dataset(&path).with_context(|| format!("loading {}", path.display()))?;
    Ok((name, dataset))
}

fn write_text<W: Write>(mut out: W, stats: &TripStats) -> Result<()> {
    out.write_all(render_text(stats).as_bytes())?;
    Ok(())
}
