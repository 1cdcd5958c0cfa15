use anyhow::Result;
use clap::{Parser, Subcommand};
use vacancy_acquire::fetch::{HttpFetcher, RateLimiter, DEFAULT_REQUESTS_PER_MINUTE};

#[derive(Parser)]
#[command(name = "vacancy")]
#[command(about = "Studio availability calendar scraping tool")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a booking site's availability calendar
    Scrape {
        /// Site to scrape
        #[arg(short, long, value_enum, default_value = "bass-on-top")]
        site: Site,

        /// Override the site's reservation index URL (must end with '/')
        #[arg(long)]
        base_url: Option<String>,

        /// Output directory for the availability JSON and provenance files
        #[arg(short = 'O', long, default_value = ".")]
        output_dir: String,

        /// Fetch budget shared across index, calendar, and day pages
        #[arg(long, default_value_t = DEFAULT_REQUESTS_PER_MINUTE)]
        requests_per_minute: u32,
    },
}

#[derive(Clone, clap::ValueEnum)]
enum Site {
    /// Bass On Top a-cappella studios, Takadanobaba (frame-based calendar)
    BassOnTop,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Map log level, suppressing noisy HTML-parsing crates at debug/trace
    let level = match cli.log_level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug,selectors=warn,html5ever=warn",
        LogLevel::Trace => "trace,selectors=warn,html5ever=warn",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    if cli.utc {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }

    match cli.command {
        Commands::Scrape {
            site,
            base_url,
            output_dir,
            requests_per_minute,
        } => {
            let limiter = RateLimiter::per_minute(requests_per_minute);
            let fetcher = HttpFetcher::new(limiter)?;

            match site {
                Site::BassOnTop => {
                    let base = base_url
                        .unwrap_or_else(|| vacancy_acquire::bassontop::BASE_URL.to_string());
                    tracing::info!(
                        url = %base,
                        rpm = requests_per_minute,
                        "Scraping availability calendar"
                    );
                    vacancy_acquire::bassontop::acquire(&fetcher, &base, &output_dir).await?;
                }
            }
        }
    }

    Ok(())
}
