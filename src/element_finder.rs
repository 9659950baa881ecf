use regex::Regex;
use scraper::{ElementRef, Html};
use std::fmt;
use tracing::{debug, info, warn};

use crate::selectors::{element_text, RuleList, SelectorRule};
use crate::utils::error::AppError;
use crate::Result;

/// Listing container patterns, most specific first.
pub const BLOCK_SELECTORS: &[&str] = &[
    r#"li[data-aut-id^="itemBox"]"#,
    r#"li[class*="_1DNjI"]"#,
    r#"div[data-aut-id="itemBox"]"#,
    r#"div[data-cy="l-card"]"#,
    r#"div[data-testid="adCard"]"#,
    r#"div[class*="listing"]"#,
    r#"div[class*="card"]"#,
];

pub const HEURISTIC_LIMIT: usize = 20;

const CURRENCY_PATTERN: &str = r"₹|Rs\.|INR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    Rule(String),
    CurrencyHeuristic,
    Nothing,
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryStrategy::Rule(selector) => write!(f, "selector {}", selector),
            DiscoveryStrategy::CurrencyHeuristic => write!(f, "currency heuristic"),
            DiscoveryStrategy::Nothing => write!(f, "nothing"),
        }
    }
}

/// Candidate listing blocks in document order.
#[derive(Debug)]
pub struct BlockDiscovery<'a> {
    pub blocks: Vec<ElementRef<'a>>,
    pub strategy: DiscoveryStrategy,
}

pub struct BlockFinder {
    rules: RuleList,
    containers: SelectorRule,
    currency: Regex,
    heuristic_limit: usize,
}

impl BlockFinder {
    pub fn new() -> Result<Self> {
        Self::with_rules(BLOCK_SELECTORS)
    }

    pub fn with_rules(selectors: &[&str]) -> Result<Self> {
        Ok(Self {
            rules: RuleList::new(selectors)?,
            containers: SelectorRule::new("div")?,
            currency: Regex::new(CURRENCY_PATTERN)
                .map_err(|e| AppError::Extraction(format!("Invalid currency pattern: {}", e)))?,
            heuristic_limit: HEURISTIC_LIMIT,
        })
    }

    pub fn locate_blocks<'a>(&self, document: &'a Html) -> BlockDiscovery<'a> {
        if let Some((rule, blocks)) = self.rules.first_match(document) {
            info!(count = blocks.len(), selector = rule.source.as_str(), "Found listings");
            return BlockDiscovery {
                blocks,
                strategy: DiscoveryStrategy::Rule(rule.source.clone()),
            };
        }

        warn!("No listings found with standard selectors, trying currency heuristic");
        let blocks: Vec<ElementRef<'a>> = self
            .containers
            .select_in(document)
            .into_iter()
            .filter(|div| self.currency.is_match(&element_text(div)))
            .take(self.heuristic_limit)
            .collect();

        if blocks.is_empty() {
            debug!("Currency heuristic found nothing");
            BlockDiscovery {
                blocks,
                strategy: DiscoveryStrategy::Nothing,
            }
        } else {
            info!(count = blocks.len(), "Found candidate blocks by currency heuristic");
            BlockDiscovery {
                blocks,
                strategy: DiscoveryStrategy::CurrencyHeuristic,
            }
        }
    }
}
