// Integration tests for the OLX car cover scraper
// These tests run the fetch and pipeline stages against a local mock server

pub mod fetch_tests;
pub mod pipeline_tests;

use std::path::Path;

use olx_car_covers::{
    AppConfig,
    config::{BrowserConfig, FetchConfig, OutputConfig, SearchConfig},
};

pub const SEARCH_PAGE: &str = include_str!("../fixtures/olx_search.html");

/// Test configuration pointing every candidate at the mock server
pub fn get_test_config(server_uri: &str, paths: &[&str], output_dir: &Path) -> AppConfig {
    AppConfig {
        search: SearchConfig {
            candidate_urls: paths
                .iter()
                .map(|path| format!("{}{}", server_uri, path))
                .collect(),
            ..SearchConfig::default()
        },
        fetch: fast_fetch_config(3),
        browser: BrowserConfig {
            enabled: false,
            ..BrowserConfig::default()
        },
        output: OutputConfig {
            directory: output_dir.to_path_buf(),
            ..OutputConfig::default()
        },
    }
}

/// Real thresholds with a backoff short enough for tests
pub fn fast_fetch_config(max_attempts: u32) -> FetchConfig {
    FetchConfig {
        max_attempts,
        backoff_unit_ms: 1,
        connect_timeout_secs: 2,
        read_timeout_secs: 3,
        ..FetchConfig::default()
    }
}

/// A page long enough to clear the content threshold, with the given listing blocks
pub fn listing_page(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                r#"<li class="_1DNjI" data-aut-id="itemBox"><a class="_2cbZ2" href="/item/listing-iid-{i}"><span class="_2Ks63" data-aut-id="itemPrice">₹ {price}</span><span class="_2poNJ" data-aut-id="itemTitle">{title}</span></a></li>"#,
                price = 100 * (i + 1)
            )
        })
        .collect();

    format!(
        "<html><head><title>OLX</title></head><body><ul data-aut-id=\"itemsList\">{}</ul><footer>{}</footer></body></html>",
        items,
        "Free Classifieds in India. ".repeat(60)
    )
}
