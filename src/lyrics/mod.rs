//! Lyrics module: retrieval, cleanup and section parsing
//!
//! This module provides:
//! - LRCLIB API client for fetching plain lyrics
//! - Markup cleanup for scraped lyrics
//! - Section parser splitting lyrics into verses, choruses, etc.

pub mod clean;
pub mod lrclib;
pub mod sections;

pub use lrclib::LrclibClient;
pub use sections::{LyricSection, SectionKind};

use crate::storage::Storage;

/// Get lyrics for a song, consulting the cache before the network.
///
/// Fetched lyrics are cleaned before they are cached, so cached text can be
/// handed straight to [`sections::parse`].
pub async fn fetch_lyrics(
    client: &LrclibClient,
    cache: Option<&Storage>,
    artist: &str,
    title: &str,
    now_unix: i64,
) -> anyhow::Result<Option<String>> {
    if let Some(store) = cache
        && let Some(cached) = store.get_lyrics(artist, title)?
    {
        tracing::debug!(artist, title, "lyrics cache hit");
        return Ok(Some(cached));
    }

    let Some(raw) = client.get_lyrics(artist, title).await? else {
        return Ok(None);
    };

    let lyrics = clean::clean_lyrics(&raw);
    if lyrics.is_empty() {
        return Ok(None);
    }

    if let Some(store) = cache {
        store.cache_lyrics(artist, title, &lyrics, now_unix)?;
    }

    Ok(Some(lyrics))
}
