//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API; we only use its plain (unsynced) lyrics.
//! API Documentation: https://lrclib.net/docs

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::LrclibConfig;

/// LRCLIB API response
#[derive(Debug, Deserialize, Clone)]
pub struct LrclibResponse {
    #[serde(rename = "trackName")]
    pub track_name: String,
    #[serde(rename = "artistName")]
    pub artist_name: String,
    #[serde(rename = "plainLyrics")]
    pub plain_lyrics: Option<String>,
}

impl LrclibResponse {
    fn has_lyrics(&self) -> bool {
        self.plain_lyrics.as_deref().is_some_and(|l| !l.is_empty())
    }
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    /// Create a client from config
    pub fn new(cfg: &LrclibConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get plain lyrics for a song, exact lookup first, then search.
    pub async fn get_lyrics(&self, artist: &str, title: &str) -> anyhow::Result<Option<String>> {
        if let Some(hit) = self.get_exact(artist, title).await? {
            return Ok(hit.plain_lyrics);
        }

        Ok(self.search(artist, title).await?.and_then(|hit| hit.plain_lyrics))
    }

    /// Get lyrics with exact match
    async fn get_exact(&self, artist: &str, title: &str) -> anyhow::Result<Option<LrclibResponse>> {
        let url = format!(
            "{}/get?artist_name={}&track_name={}",
            self.base_url,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "lrclib exact match request failed");
                return Ok(None);
            }
        };

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            debug!(status = %response.status(), "lrclib exact match failed");
            return Ok(None);
        }

        match response.json::<LrclibResponse>().await {
            Ok(hit) => Ok(hit.has_lyrics().then_some(hit)),
            Err(e) => {
                warn!(error = %e, "lrclib exact match returned an unreadable body");
                Ok(None)
            }
        }
    }

    /// Search for lyrics
    async fn search(&self, artist: &str, title: &str) -> anyhow::Result<Option<LrclibResponse>> {
        let query = format!("{} {}", artist, title);
        let url = format!("{}/search?q={}", self.base_url, urlencoding::encode(&query));

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "lrclib search request failed");
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "lrclib search failed");
            return Ok(None);
        }

        match response.json::<Vec<LrclibResponse>>().await {
            Ok(results) => Ok(pick_best(results, artist, title)),
            Err(e) => {
                warn!(error = %e, "lrclib search returned an unreadable body");
                Ok(None)
            }
        }
    }
}

/// Prefer a result whose artist and title loosely match; otherwise take the
/// first result that has lyrics at all.
fn pick_best(results: Vec<LrclibResponse>, artist: &str, title: &str) -> Option<LrclibResponse> {
    let want_artist = normalize(artist);
    let want_title = normalize(title);

    let matched = results.iter().position(|r| {
        r.has_lyrics()
            && loosely_equal(&normalize(&r.artist_name), &want_artist)
            && loosely_equal(&normalize(&r.track_name), &want_title)
    });
    if let Some(i) = matched {
        return results.into_iter().nth(i);
    }

    let fallback = results.into_iter().find(LrclibResponse::has_lyrics)?;
    warn!(
        "lrclib: no close match for \"{artist} - {title}\", using \"{} - {}\"",
        fallback.artist_name, fallback.track_name
    );
    Some(fallback)
}

fn loosely_equal(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Lowercase, drop a leading "the " and anything that isn't an ASCII word
/// character or whitespace.
pub fn normalize(s: &str) -> String {
    let lower = s.to_lowercase();
    let lower = lower.strip_prefix("the ").unwrap_or(&lower);
    lower
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}
