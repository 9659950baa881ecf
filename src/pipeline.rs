use scraper::Html;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::element_finder::{BlockFinder, DiscoveryStrategy};
use crate::extractor::ListingExtractor;
use crate::fetcher::Fetcher;
use crate::filter::KeywordFilter;
use crate::models::{FetchResult, ResultSet, TransportKind};
use crate::utils::error::AppError;
use crate::writer::{OutputFormat, ResultWriter, SearchMetadata};
use crate::Result;

/// How many discarded titles to report when nothing matched.
pub const SAMPLE_TITLE_COUNT: usize = 5;

#[derive(Debug)]
pub enum RunOutcome {
    /// Every candidate URL failed on every transport; nothing was written.
    NoContent { tried: Vec<FetchResult> },
    /// Content was fetched but no block survived the keyword filter.
    NoMatches {
        source_url: String,
        blocks_seen: usize,
        sample_titles: Vec<String>,
        files: Vec<PathBuf>,
    },
    Completed {
        source_url: String,
        transport: TransportKind,
        records: ResultSet,
        files: Vec<PathBuf>,
    },
}

impl RunOutcome {
    pub fn record_count(&self) -> usize {
        match self {
            RunOutcome::Completed { records, .. } => records.len(),
            _ => 0,
        }
    }
}

/// What extraction made of one page.
#[derive(Debug)]
pub struct PageExtraction {
    pub records: ResultSet,
    pub blocks_seen: usize,
    pub strategy: DiscoveryStrategy,
    pub sample_titles: Vec<String>,
}

/// Everything one scrape needs, owned in one place and torn down together.
pub struct RunContext {
    config: AppConfig,
    fetcher: Fetcher,
    finder: BlockFinder,
    extractor: ListingExtractor,
    writer: ResultWriter,
}

impl RunContext {
    pub fn open(config: AppConfig) -> Result<Self> {
        let fetcher = Fetcher::from_config(&config)?;
        Self::with_fetcher(config, fetcher)
    }

    pub fn with_fetcher(config: AppConfig, fetcher: Fetcher) -> Result<Self> {
        let keywords = KeywordFilter::new(&config.search.keywords);
        debug!(keywords = ?keywords.keywords(), "Title keyword filter");
        let extractor = ListingExtractor::new(&config.search.base_url, keywords)?;

        Ok(Self {
            finder: BlockFinder::new()?,
            extractor,
            writer: ResultWriter::new(config.output.clone()),
            fetcher,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Fetch, extract, filter and write. Never fails: every problem ends up
    /// in the returned outcome or the log.
    pub async fn run(&self, formats: &[OutputFormat]) -> RunOutcome {
        info!(query = self.config.search.query.as_str(), "Searching OLX");

        let fetched = match self.fetcher.fetch_first(&self.config.search.candidate_urls).await {
            Ok(fetched) => fetched,
            Err(AppError::FetchExhausted { tried }) => return RunOutcome::NoContent { tried },
            Err(e) => {
                warn!("Fetch failed: {}", e);
                return RunOutcome::NoContent { tried: Vec::new() };
            }
        };

        info!(
            url = fetched.url.as_str(),
            transport = %fetched.transport_used,
            "Successfully fetched content"
        );

        let extraction = self.extract_page(fetched.body());
        let metadata = SearchMetadata::now(&self.config.search.query, &fetched.url);
        let files = self.writer.write(&extraction.records, formats, &metadata);

        if extraction.records.is_empty() {
            return RunOutcome::NoMatches {
                source_url: fetched.url,
                blocks_seen: extraction.blocks_seen,
                sample_titles: extraction.sample_titles,
                files,
            };
        }

        RunOutcome::Completed {
            source_url: fetched.url,
            transport: fetched.transport_used,
            records: extraction.records,
            files,
        }
    }

    /// Block discovery and per-block extraction over one page body.
    pub fn extract_page(&self, body: &str) -> PageExtraction {
        let document = Html::parse_document(body);
        let discovery = self.finder.locate_blocks(&document);
        info!(
            count = discovery.blocks.len(),
            strategy = %discovery.strategy,
            "Processing listings"
        );

        let records: ResultSet = discovery
            .blocks
            .iter()
            .filter_map(|block| self.extractor.extract_record(block))
            .collect();

        info!(
            kept = records.len(),
            total = discovery.blocks.len(),
            "Parsed car cover listings"
        );

        let sample_titles = if records.is_empty() {
            let titles: Vec<String> = discovery
                .blocks
                .iter()
                .take(SAMPLE_TITLE_COUNT)
                .filter_map(|block| self.extractor.title_of(block))
                .collect();
            for (i, title) in titles.iter().enumerate() {
                info!("Sample title {}: {}", i + 1, title);
            }
            titles
        } else {
            Vec::new()
        };

        PageExtraction {
            records,
            blocks_seen: discovery.blocks.len(),
            strategy: discovery.strategy,
            sample_titles,
        }
    }

    /// Release the browser and any other transport resources.
    pub fn shutdown(self) {
        self.fetcher.shutdown();
    }
}

/// Open a context, run one scrape, and always shut down afterwards.
pub async fn run_once(config: AppConfig, formats: &[OutputFormat]) -> Result<RunOutcome> {
    let context = RunContext::open(config)?;
    let outcome = context.run(formats).await;
    context.shutdown();
    Ok(outcome)
}
