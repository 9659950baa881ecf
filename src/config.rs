use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub fetch: FetchConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub query: String,
    pub base_url: String,
    pub candidate_urls: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub max_attempts: u32,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub backoff_unit_ms: u64,
    pub backoff_cap: u64,
    pub min_body_chars: usize,
    pub min_content_chars: usize,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub enabled: bool,
    pub chrome_path: Option<String>,
    pub wait_selector: String,
    pub settle_ms: u64,
    pub navigation_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub json_file: String,
    pub csv_file: String,
    pub text_file: String,
    pub write_empty_json: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: "Car Cover".to_string(),
            base_url: "https://www.olx.in".to_string(),
            candidate_urls: vec![
                "https://www.olx.in/items/q-car-cover".to_string(),
                "https://www.olx.in/cars/car-accessories/car-covers".to_string(),
                "https://www.olx.in/search?q=car+cover".to_string(),
            ],
            keywords: vec![
                "car cover".to_string(),
                "car body cover".to_string(),
                "vehicle cover".to_string(),
                "auto cover".to_string(),
            ],
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            connect_timeout_secs: 10,
            read_timeout_secs: 20,
            backoff_unit_ms: 1000,
            backoff_cap: 10,
            min_body_chars: 100,
            min_content_chars: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            chrome_path: None,
            wait_selector: "body".to_string(),
            settle_ms: 3000,
            navigation_timeout_secs: 30,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            json_file: "olx_car_cover_results.json".to_string(),
            csv_file: "olx_car_cover_results.csv".to_string(),
            text_file: "olx_car_cover_results.txt".to_string(),
            write_empty_json: false,
        }
    }
}

impl AppConfig {
    /// Compiled defaults, then `config/default`, then `extra_file`, then
    /// `OLX_SCRAPER__SECTION__KEY` environment variables.
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let s = builder
            .add_source(
                Environment::with_prefix("OLX_SCRAPER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("search.candidate_urls")
                    .with_list_parse_key("search.keywords"),
            )
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.search.base_url).is_err() {
            return Err(ConfigError::Message("Invalid base URL format".into()));
        }

        if self.search.candidate_urls.is_empty() {
            return Err(ConfigError::Message("At least one candidate URL is required".into()));
        }

        for candidate in &self.search.candidate_urls {
            if Url::parse(candidate).is_err() {
                return Err(ConfigError::Message(format!("Invalid candidate URL: {}", candidate)));
            }
        }

        if self.search.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Message("At least one search keyword is required".into()));
        }

        if self.fetch.max_attempts == 0 {
            return Err(ConfigError::Message("Fetch max_attempts must be greater than 0".into()));
        }

        if self.fetch.min_body_chars > self.fetch.min_content_chars {
            return Err(ConfigError::Message(
                "Fetch min_body_chars cannot exceed min_content_chars".into(),
            ));
        }

        if self.browser.wait_selector.trim().is_empty() {
            return Err(ConfigError::Message("Browser wait_selector must not be empty".into()));
        }

        let files = [
            &self.output.json_file,
            &self.output.csv_file,
            &self.output.text_file,
        ];
        if files.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::Message("Output file names must not be empty".into()));
        }

        Ok(())
    }
}
