//! Ordered selector rules evaluated with early exit: the first rule that
//! produces something wins and later rules are never consulted.

use scraper::element_ref::Select;
use scraper::{ElementRef, Html, Selector};

use crate::utils::error::AppError;
use crate::Result;

/// Parse a CSS selector, keeping the source text for diagnostics.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|_| AppError::InvalidSelector {
        selector: selector.to_string(),
    })
}

/// Element text with runs of whitespace collapsed to single spaces.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct SelectorRule {
    pub source: String,
    selector: Selector,
}

impl SelectorRule {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            source: source.to_string(),
            selector: parse_selector(source)?,
        })
    }

    pub fn select_in<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.selector).collect()
    }

    pub fn select_within<'a, 's>(&'s self, element: &ElementRef<'a>) -> Select<'a, 's> {
        element.select(&self.selector)
    }
}

/// A prioritized list of document-level rules.
#[derive(Debug, Clone)]
pub struct RuleList {
    rules: Vec<SelectorRule>,
}

impl RuleList {
    pub fn new(selectors: &[&str]) -> Result<Self> {
        let rules = selectors
            .iter()
            .map(|s| SelectorRule::new(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Matches of the first rule that matches anything, with that rule.
    pub fn first_match<'a, 'r>(&'r self, document: &'a Html) -> Option<(&'r SelectorRule, Vec<ElementRef<'a>>)> {
        self.rules.iter().find_map(|rule| {
            let matches = rule.select_in(document);
            if matches.is_empty() {
                None
            } else {
                Some((rule, matches))
            }
        })
    }
}

/// Where a field's value comes from once its element is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Text,
    Attr(&'static str),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    rule: SelectorRule,
    source: FieldSource,
}

impl FieldRule {
    pub fn text(selector: &str) -> Result<Self> {
        Ok(Self {
            rule: SelectorRule::new(selector)?,
            source: FieldSource::Text,
        })
    }

    pub fn attr(selector: &str, attribute: &'static str) -> Result<Self> {
        Ok(Self {
            rule: SelectorRule::new(selector)?,
            source: FieldSource::Attr(attribute),
        })
    }

    /// Value of the first matching element inside `block`, if non-empty.
    pub fn extract(&self, block: &ElementRef<'_>) -> Option<String> {
        let element = self.rule.select_within(block).next()?;
        let value = match self.source {
            FieldSource::Text => element_text(&element),
            FieldSource::Attr(name) => element.value().attr(name)?.trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Field rules in priority order; the first non-empty value wins.
#[derive(Debug, Clone)]
pub struct FieldChain {
    rules: Vec<FieldRule>,
}

impl FieldChain {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    pub fn texts(selectors: &[&str]) -> Result<Self> {
        let rules = selectors
            .iter()
            .map(|s| FieldRule::text(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn attrs(selectors: &[&str], attribute: &'static str) -> Result<Self> {
        let rules = selectors
            .iter()
            .map(|s| FieldRule::attr(s, attribute))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn extract(&self, block: &ElementRef<'_>) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.extract(block))
    }
}
