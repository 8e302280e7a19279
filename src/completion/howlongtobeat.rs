use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::completion::{title_similarity, TitleCandidate, TitleSearch};
use crate::config::Settings;
use crate::error::{LibraryStatsError, Result};

const SERVICE: &str = "howlongtobeat";
const SECONDS_PER_HOUR: f64 = 3600.0;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

static APP_SCRIPT: OnceLock<Regex> = OnceLock::new();
static CONCAT_KEY: OnceLock<Regex> = OnceLock::new();
static CONCAT_PART: OnceLock<Regex> = OnceLock::new();
static INLINE_KEY: OnceLock<Regex> = OnceLock::new();

/// HowLongToBeat search client
///
/// The search endpoint carries a key that rotates with every site deploy;
/// the keyed URL is scraped from the `_app` bundle on first use and reused for
/// the rest of the run.
pub struct HowLongToBeatSearch {
    client: Client,
    base_url: String,
    search_url: OnceCell<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    search_type: &'static str,
    search_terms: Vec<String>,
    search_page: u32,
    size: u32,
    search_options: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    game_id: u64,
    game_name: String,
    /// Main story time in seconds, 0 when nobody submitted one
    #[serde(default)]
    comp_main: u64,
}

/// Path of the `_app` bundle referenced by the homepage
fn find_app_script(html: &str) -> Option<&str> {
    let re = APP_SCRIPT
        .get_or_init(|| Regex::new(r#"src="([^"]*/_app-[^"]*\.js)""#).expect("valid regex"));

    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Keyed search path (`/api/<endpoint>/<key>`) embedded in the `_app` bundle
fn extract_search_path(script: &str) -> Option<String> {
    let concat_key = CONCAT_KEY.get_or_init(|| {
        Regex::new(r#""/api/([A-Za-z]+)/"((?:\.concat\("[^"]*"\))+)"#).expect("valid regex")
    });
    let concat_part =
        CONCAT_PART.get_or_init(|| Regex::new(r#"\.concat\("([^"]*)"\)"#).expect("valid regex"));

    if let Some(caps) = concat_key.captures(script) {
        let key: String = concat_part
            .captures_iter(&caps[2])
            .map(|part| part[1].to_string())
            .collect();
        if !key.is_empty() {
            return Some(format!("/api/{}/{}", &caps[1], key));
        }
    }

    let inline_key = INLINE_KEY.get_or_init(|| {
        Regex::new(r#"fetch\("/api/([A-Za-z]+)/([0-9a-f]{8,})""#).expect("valid regex")
    });

    inline_key
        .captures(script)
        .map(|caps| format!("/api/{}/{}", &caps[1], &caps[2]))
}

impl HowLongToBeatSearch {
    /// Create new HowLongToBeat client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            search_url: OnceCell::new(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.endpoints.howlongtobeat.clone(), settings.timeout())
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .header("Referer", format!("{}/", self.base_url))
            .send()
            .await
            .map_err(|e| LibraryStatsError::upstream(SERVICE, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LibraryStatsError::upstream(
                SERVICE,
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| LibraryStatsError::upstream(SERVICE, format!("Unreadable body: {}", e)))
    }

    /// Scrape the keyed search URL from the homepage's `_app` bundle
    async fn resolve_search_url(&self) -> Result<String> {
        let html = self.get_text(&format!("{}/", self.base_url)).await?;

        let script = find_app_script(&html).ok_or_else(|| {
            LibraryStatsError::upstream(SERVICE, "No _app script on the homepage")
        })?;
        let script_url = if script.starts_with("http") {
            script.to_string()
        } else {
            format!("{}/{}", self.base_url, script.trim_start_matches('/'))
        };

        let bundle = self.get_text(&script_url).await?;
        let path = extract_search_path(&bundle).ok_or_else(|| {
            LibraryStatsError::upstream(SERVICE, format!("No search key in {}", script_url))
        })?;

        tracing::debug!("Resolved HowLongToBeat search endpoint {}", path);
        Ok(format!("{}{}", self.base_url, path))
    }

    async fn keyed_search_url(&self) -> Result<&str> {
        self.search_url
            .get_or_try_init(|| self.resolve_search_url())
            .await
            .map(String::as_str)
    }

    fn build_request(name: &str) -> SearchRequest {
        SearchRequest {
            search_type: "games",
            search_terms: name.split_whitespace().map(str::to_string).collect(),
            search_page: 1,
            size: 20,
            search_options: serde_json::json!({
                "games": {
                    "userId": 0,
                    "platform": "",
                    "sortCategory": "popular",
                    "rangeCategory": "main",
                    "rangeTime": {"min": 0, "max": 0},
                    "gameplay": {"perspective": "", "flow": "", "genre": ""},
                    "modifier": ""
                },
                "users": {"sortCategory": "postcount"},
                "filter": "",
                "sort": 0,
                "randomizer": 0
            }),
        }
    }

    fn to_candidate(&self, query: &str, entry: SearchEntry) -> TitleCandidate {
        let completion_hours = match entry.comp_main {
            0 => None,
            seconds => Some(seconds as f64 / SECONDS_PER_HOUR),
        };

        TitleCandidate {
            similarity: title_similarity(query, &entry.game_name),
            reference_link: format!("{}/game/{}", self.base_url, entry.game_id),
            candidate_name: entry.game_name,
            completion_hours,
        }
    }
}

#[async_trait]
impl TitleSearch for HowLongToBeatSearch {
    async fn search(&self, name: &str) -> Result<Vec<TitleCandidate>> {
        let url = self.keyed_search_url().await?;

        let response = self
            .client
            .post(url)
            .header("Referer", format!("{}/", self.base_url))
            .json(&Self::build_request(name))
            .send()
            .await
            .map_err(|e| LibraryStatsError::upstream(SERVICE, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LibraryStatsError::upstream(
                SERVICE,
                format!("HTTP {}", response.status()),
            ));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| LibraryStatsError::upstream(SERVICE, format!("Invalid JSON: {}", e)))?;

        Ok(search_response
            .data
            .into_iter()
            .map(|entry| self.to_candidate(name, entry))
            .collect())
    }

    fn name(&self) -> &str {
        SERVICE
    }
}
