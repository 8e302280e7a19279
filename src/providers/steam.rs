use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::Settings;
use crate::core::{CatalogInfo, LibraryEntry, ReviewSummary};
use crate::error::{LibraryStatsError, Result};
use crate::providers::GameStore;

const API_SERVICE: &str = "steam-api";
const STORE_SERVICE: &str = "steam-store";

/// Steam Web API + storefront provider
pub struct SteamProvider {
    client: Client,
    api_key: String,
    api_base: String,
    store_base: String,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    response: OwnedGamesResponse,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    /// Missing when the profile's game details are private
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    playtime_forever: u64,
}

#[derive(Debug, Deserialize)]
struct SteamAppDetailsResponse {
    #[serde(flatten)]
    apps: HashMap<String, AppDetailsData>,
}

#[derive(Debug, Deserialize)]
struct AppDetailsData {
    success: bool,
    #[serde(default)]
    data: Option<SteamAppDetails>,
}

#[derive(Debug, Deserialize, Default)]
struct SteamAppDetails {
    #[serde(default)]
    name: String,
    #[serde(default)]
    steam_appid: u64,
    #[serde(default)]
    genres: Vec<SteamGenre>,
}

#[derive(Debug, Deserialize)]
struct SteamGenre {
    description: String,
}

#[derive(Debug, Deserialize)]
struct AppReviewsResponse {
    #[serde(default)]
    query_summary: Option<QuerySummary>,
}

#[derive(Debug, Deserialize)]
struct QuerySummary {
    #[serde(default)]
    total_positive: u64,
    #[serde(default)]
    total_negative: u64,
}

impl SteamProvider {
    /// Create new Steam provider
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        store_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            store_base: store_base.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.steam_api_key.clone(),
            settings.endpoints.steam_api.clone(),
            settings.endpoints.steam_store.clone(),
            settings.timeout(),
        )
    }

    /// GET a JSON document, mapping every failure to `UpstreamUnavailable`
    async fn get_json<T: DeserializeOwned>(&self, service: &str, url: &str) -> Result<T> {
        // query string carries the API key
        tracing::debug!("GET {}", url.split('?').next().unwrap_or(url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LibraryStatsError::upstream(service, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(LibraryStatsError::upstream(
                service,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| LibraryStatsError::upstream(service, format!("Invalid JSON: {}", e)))
    }
}

#[async_trait]
impl GameStore for SteamProvider {
    async fn owned_games(&self, user_id: &str) -> Result<Vec<LibraryEntry>> {
        let url = format!(
            "{}/IPlayerService/GetOwnedGames/v1/?key={}&steamid={}&include_appinfo=true\
             &include_played_free_games=true&include_free_sub=true&language=english&format=json",
            self.api_base,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(user_id),
        );

        let envelope: OwnedGamesEnvelope = self.get_json(API_SERVICE, &url).await?;

        let games = envelope.response.games.ok_or_else(|| {
            LibraryStatsError::upstream(
                API_SERVICE,
                format!("No games listed for user {} (private profile?)", user_id),
            )
        })?;

        Ok(games
            .into_iter()
            .map(|g| LibraryEntry::new(g.appid, g.name, g.playtime_forever))
            .collect())
    }

    async fn catalog_info(&self, app_id: u64) -> Result<CatalogInfo> {
        let url = format!("{}/api/appdetails?appids={}", self.store_base, app_id);

        let details_response: SteamAppDetailsResponse = self.get_json(STORE_SERVICE, &url).await?;

        let app_data = details_response
            .apps
            .get(&app_id.to_string())
            .ok_or_else(|| {
                LibraryStatsError::upstream(STORE_SERVICE, format!("App {} not found", app_id))
            })?;

        if !app_data.success {
            return Err(LibraryStatsError::upstream(
                STORE_SERVICE,
                format!("App {} fetch failed", app_id),
            ));
        }

        let details = app_data.data.as_ref().ok_or_else(|| {
            LibraryStatsError::upstream(STORE_SERVICE, format!("No data for app {}", app_id))
        })?;

        Ok(CatalogInfo {
            id: if details.steam_appid == 0 { app_id } else { details.steam_appid },
            name: details.name.clone(),
            genres: details.genres.iter().map(|g| g.description.clone()).collect(),
        })
    }

    async fn review_summary(&self, app_id: u64) -> Result<ReviewSummary> {
        let url = format!(
            "{}/appreviews/{}?json=1&language=all",
            self.store_base, app_id
        );

        let reviews: AppReviewsResponse = self.get_json(STORE_SERVICE, &url).await?;

        Ok(reviews
            .query_summary
            .map(|s| ReviewSummary::new(s.total_positive, s.total_negative))
            .unwrap_or_default())
    }

    fn name(&self) -> &str {
        "steam"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn provider(base: &str) -> SteamProvider {
        SteamProvider::new("test-key", base, base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_owned_games() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/IPlayerService/GetOwnedGames/v1/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("steamid".into(), "7656".into()),
                Matcher::UrlEncoded("include_played_free_games".into(), "true".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"response": {"game_count": 2, "games": [
                    {"appid": 440, "name": "Team Fortress 2", "playtime_forever": 1234},
                    {"appid": 620, "name": "Portal 2", "playtime_forever": 0}
                ]}}"#,
            )
            .create_async()
            .await;

        let games = provider(&server.url()).owned_games("7656").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            games,
            vec![
                LibraryEntry::new(440, "Team Fortress 2", 1234),
                LibraryEntry::new(620, "Portal 2", 0),
            ]
        );
    }

    #[tokio::test]
    async fn test_owned_games_private_profile() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/IPlayerService/GetOwnedGames/v1/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": {}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).owned_games("7656").await.unwrap_err();
        assert!(matches!(err, LibraryStatsError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_owned_games_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/IPlayerService/GetOwnedGames/v1/")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = provider(&server.url()).owned_games("7656").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_catalog_info() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/appdetails")
            .match_query(Matcher::UrlEncoded("appids".into(), "440".into()))
            .with_status(200)
            .with_body(
                r#"{"440": {"success": true, "data": {
                    "name": "Team Fortress 2",
                    "steam_appid": 440,
                    "genres": [{"id": "1", "description": "Action"},
                               {"id": "37", "description": "Free to Play"}]
                }}}"#,
            )
            .create_async()
            .await;

        let info = provider(&server.url()).catalog_info(440).await.unwrap();

        assert_eq!(info.id, 440);
        assert_eq!(info.name, "Team Fortress 2");
        assert_eq!(info.genres, vec!["Action", "Free to Play"]);
    }

    #[tokio::test]
    async fn test_catalog_info_without_genres() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/appdetails")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"99": {"success": true, "data": {"name": "Tool"}}}"#)
            .create_async()
            .await;

        let info = provider(&server.url()).catalog_info(99).await.unwrap();

        assert_eq!(info.id, 99);
        assert!(info.genres.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_info_delisted() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/appdetails")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"12": {"success": false}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).catalog_info(12).await.unwrap_err();
        assert!(matches!(err, LibraryStatsError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_review_summary() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/appreviews/440")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("json".into(), "1".into()),
                Matcher::UrlEncoded("language".into(), "all".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"success": 1, "query_summary": {
                    "num_reviews": 20, "review_score": 9,
                    "total_positive": 70, "total_negative": 30, "total_reviews": 100
                }}"#,
            )
            .create_async()
            .await;

        let summary = provider(&server.url()).review_summary(440).await.unwrap();
        assert_eq!(summary, ReviewSummary::new(70, 30));
    }

    #[tokio::test]
    async fn test_review_summary_missing_section() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/appreviews/7")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": 1}"#)
            .create_async()
            .await;

        let summary = provider(&server.url()).review_summary(7).await.unwrap();
        assert_eq!(summary, ReviewSummary::new(0, 0));
    }

    #[tokio::test]
    async fn test_review_summary_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/appreviews/7")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = provider(&server.url()).review_summary(7).await.unwrap_err();
        assert!(matches!(err, LibraryStatsError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_steam_catalog_live() {
        let provider = SteamProvider::new(
            "",
            "https://api.steampowered.com",
            "https://store.steampowered.com",
            Duration::from_secs(10),
        )
        .unwrap();
        let info = provider.catalog_info(730).await.unwrap();

        assert!(info.name.contains("Counter-Strike"));
    }
}
