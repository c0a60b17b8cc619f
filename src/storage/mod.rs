use anyhow::Context;
use rusqlite::{Connection, params};
use std::path::Path;

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS lyrics_cache (
  artist_key TEXT NOT NULL,
  title_key TEXT NOT NULL,
  lyrics TEXT NOT NULL,
  fetched_at INTEGER NOT NULL,
  PRIMARY KEY (artist_key, title_key)
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Cache lyrics for a song
    pub fn cache_lyrics(
        &self,
        artist: &str,
        title: &str,
        lyrics: &str,
        now_unix: i64,
    ) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(artist_key, title_key, lyrics, fetched_at)
VALUES(?1, ?2, ?3, ?4)
ON CONFLICT(artist_key, title_key) DO UPDATE SET
  lyrics=excluded.lyrics,
  fetched_at=excluded.fetched_at
"#,
                params![cache_key(artist), cache_key(title), lyrics, now_unix],
            )
            .context("cache lyrics")?;
        Ok(())
    }

    /// Get cached lyrics
    pub fn get_lyrics(&self, artist: &str, title: &str) -> anyhow::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lyrics FROM lyrics_cache WHERE artist_key=?1 AND title_key=?2")
            .context("prepare lyrics cache")?;
        let mut rows = stmt
            .query(params![cache_key(artist), cache_key(title)])
            .context("query lyrics cache")?;
        if let Some(row) = rows.next().context("read lyrics cache row")? {
            let lyrics: String = row.get(0)?;
            Ok(Some(lyrics))
        } else {
            Ok(None)
        }
    }

    /// Drop every cached entry; returns how many were removed
    pub fn clear_lyrics(&self) -> anyhow::Result<usize> {
        let n = self
            .conn
            .execute("DELETE FROM lyrics_cache", [])
            .context("clear lyrics cache")?;
        Ok(n)
    }
}

fn cache_key(s: &str) -> String {
    s.trim().to_lowercase()
}
