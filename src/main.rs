use anyhow::Result;
use clap::Parser;
use olx_car_covers::{run_once, AppConfig, OutputFormat, RunOutcome};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "olx-car-covers", version, about = "Scrape car cover listings from OLX")]
struct Cli {
    /// Extra configuration file layered over config/default
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the result files are written to
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output formats to write (repeatable); all formats when omitted
    #[arg(short, long = "format", value_enum)]
    formats: Vec<OutputFormat>,

    /// Skip the headless browser and fetch over plain HTTP only
    #[arg(long)]
    no_browser: bool,

    /// HTTP attempts per candidate URL
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Write the JSON document even when nothing matched
    #[arg(long)]
    write_empty: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive("olx_car_covers=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("olx_car_covers=info"))
    };

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stdout.and(writer))
        .init();

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _guard = init_tracing(&cli)?;

    info!("Starting OLX car cover scraper...");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if cli.no_browser {
        config.browser.enabled = false;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.fetch.max_attempts = max_attempts;
    }
    if let Some(dir) = cli.output_dir {
        config.output.directory = dir;
    }
    if cli.write_empty {
        config.output.write_empty_json = true;
    }
    config.validate()?;

    let formats = if cli.formats.is_empty() {
        OutputFormat::ALL.to_vec()
    } else {
        cli.formats
    };

    match run_once(config, &formats).await? {
        RunOutcome::Completed {
            source_url,
            transport,
            records,
            files,
        } => {
            info!(url = source_url.as_str(), %transport, "Scrape complete");
            info!("Total car cover listings found: {}", records.len());
            for file in files {
                info!("Created {}", file.display());
            }
        }
        RunOutcome::NoMatches {
            source_url,
            blocks_seen,
            sample_titles,
            ..
        } => {
            warn!(
                url = source_url.as_str(),
                blocks_seen, "No car cover listings found"
            );
            if !sample_titles.is_empty() {
                warn!(
                    "Titles seen instead: {}. The search may need adjusting or the site markup changed",
                    sample_titles.join(" | ")
                );
            }
        }
        RunOutcome::NoContent { tried } => {
            warn!(
                attempts = tried.len(),
                "Failed to fetch search results from all URLs using every transport"
            );
            warn!("Possible causes: network issues, site structure changes, or automated requests being blocked");
        }
    }

    info!("Shutting down...");
    Ok(())
}
