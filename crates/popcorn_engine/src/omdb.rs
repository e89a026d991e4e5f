use std::time::Duration;

use futures_util::StreamExt;
use popcorn_logging::popcorn_debug;
use reqwest::Url;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::{FailureKind, FetchError, MovieDetails, MovieHit, SearchPayload};

#[derive(Debug, Clone)]
pub struct OmdbSettings {
    pub base_url: String,
    pub api_key: String,
    pub connect_timeout: Duration,
    /// Whole-request limit. `None` lets a hung request stay pending until cancelled.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for OmdbSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.omdbapi.com/".to_string(),
            api_key: String::new(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            max_bytes: 1024 * 1024,
        }
    }
}

/// A movie database reachable over some transport.
///
/// Implementations must return promptly with [`FailureKind::Cancelled`] once
/// `cancel` fires, releasing whatever the request holds.
#[async_trait::async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchPayload, FetchError>;

    async fn details(
        &self,
        imdb_id: &str,
        cancel: &CancellationToken,
    ) -> Result<MovieDetails, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    settings: OmdbSettings,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn new(settings: OmdbSettings) -> Result<Self, FetchError> {
        Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { settings, client })
    }

    fn endpoint(&self, param: &str, value: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.settings.api_key)
            .append_pair(param, value);
        Ok(url)
    }

    /// Runs the download until it finishes or `cancel` fires. Dropping the
    /// download future aborts the underlying connection.
    async fn get(&self, url: Url, cancel: &CancellationToken) -> Result<Vec<u8>, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                Err(FetchError::new(FailureKind::Cancelled, "request cancelled"))
            }
            result = self.download(url) => result,
        }
    }

    async fn download(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(ToOwned::to_owned)
                .unwrap_or_else(|| status.to_string());
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                reason,
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl MovieSource for OmdbClient {
    async fn search(
        &self,
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<SearchPayload, FetchError> {
        let url = self.endpoint("s", query)?;
        popcorn_debug!("search query_len={}", query.chars().count());
        let body = self.get(url, cancel).await?;
        parse_search(&body)
    }

    async fn details(
        &self,
        imdb_id: &str,
        cancel: &CancellationToken,
    ) -> Result<MovieDetails, FetchError> {
        let url = self.endpoint("i", imdb_id)?;
        popcorn_debug!("details imdb_id={}", imdb_id);
        let body = self.get(url, cancel).await?;
        parse_details(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Search")]
    search: Option<Vec<RawHit>>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(rename = "Title", default)]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDetails {
    response: Option<String>,
    error: Option<String>,
    #[serde(rename = "imdbID", default)]
    imdb_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    released: String,
    #[serde(default)]
    runtime: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    plot: String,
    #[serde(default)]
    poster: String,
    #[serde(default)]
    actors: String,
    #[serde(default)]
    director: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
}

fn is_rejection(response: Option<&str>) -> bool {
    response == Some("False")
}

/// Decodes a search body.
///
/// Only an explicit `Response: "False"` counts as no match. A body without
/// the discriminator, or without a result list, decodes to an empty match list.
pub fn parse_search(body: &[u8]) -> Result<SearchPayload, FetchError> {
    let raw: RawSearch = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

    if is_rejection(raw.response.as_deref()) {
        return Ok(SearchPayload::NoMatch {
            message: raw.error.unwrap_or_default(),
        });
    }

    let hits = raw
        .search
        .unwrap_or_default()
        .into_iter()
        .map(|hit| MovieHit {
            imdb_id: hit.imdb_id,
            title: hit.title,
            year: hit.year,
            poster: hit.poster,
        })
        .collect();
    Ok(SearchPayload::Matches(hits))
}

pub fn parse_details(body: &[u8]) -> Result<MovieDetails, FetchError> {
    let raw: RawDetails = serde_json::from_slice(body)
        .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

    if is_rejection(raw.response.as_deref()) {
        let message = raw
            .error
            .unwrap_or_else(|| "movie details unavailable".to_string());
        return Err(FetchError::new(FailureKind::Rejected, message));
    }

    Ok(MovieDetails {
        imdb_id: raw.imdb_id,
        title: raw.title,
        year: raw.year,
        released: raw.released,
        runtime: raw.runtime,
        genre: raw.genre,
        plot: raw.plot,
        poster: raw.poster,
        actors: raw.actors,
        director: raw.director,
        imdb_rating: raw.imdb_rating,
    })
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> FetchError {
    FetchError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
