//! Snippet extraction
//!
//! Turns parsed lyric sections into three graded snippets (hard, medium, easy):
//! - guided extraction driven by section/line/keyword hints
//! - batch extraction and dry-run validation over one song's hints
//! - keyword-free fallback extraction by section kind

pub mod batch;
pub mod extract;
pub mod fallback;
pub mod score;

pub use batch::{BatchOutcome, extract_all, validate};
pub use extract::Extractor;
pub use fallback::extract_fallback;

use serde::{Deserialize, Serialize};

use crate::lyrics::SectionKind;

/// Separator placed between lines of a snippet.
pub const LINE_SEPARATOR: &str = " / ";

/// How identifiable a snippet is meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Position in a finished result set: hard first, easy last.
    pub fn rank(self) -> u8 {
        match self {
            Self::Hard => 0,
            Self::Medium => 1,
            Self::Easy => 2,
        }
    }
}

/// 1-based inclusive line window inside a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

/// Where to look for one snippet. Keywords verify a candidate; they are never
/// emitted as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnippetGuidance {
    pub difficulty: Difficulty,
    pub section: SectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_number: Option<u32>,
    pub line_range: LineRange,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_lyrics: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricSnippet {
    pub text: String,
    pub difficulty: Difficulty,
}

impl LyricSnippet {
    pub fn from_lines(lines: &[String], difficulty: Difficulty) -> Self {
        Self {
            text: lines.join(LINE_SEPARATOR),
            difficulty,
        }
    }
}

/// Sort into the canonical hard, medium, easy order.
pub fn sort_by_difficulty(snippets: &mut [LyricSnippet]) {
    snippets.sort_by_key(|s| s.difficulty.rank());
}

/// Tunable acceptance bars for keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum score when the candidate came from the targeted section kind
    pub section_match_threshold: f64,
    /// Minimum score for the lyrics-wide search
    pub fallback_match_threshold: f64,
    /// Lines per sliding window
    pub window_size: usize,
}

impl Thresholds {
    pub const SECTION_MATCH_THRESHOLD: f64 = 0.4;
    pub const FALLBACK_MATCH_THRESHOLD: f64 = 0.3;
    pub const DEFAULT_WINDOW_SIZE: usize = 3;

    pub fn check(&self) -> anyhow::Result<()> {
        for (name, v) in [
            ("section_match_threshold", self.section_match_threshold),
            ("fallback_match_threshold", self.fallback_match_threshold),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&v),
                "{name} must be within 0..=1, got {v}"
            );
        }
        anyhow::ensure!(self.window_size >= 1, "window_size must be at least 1");
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            section_match_threshold: Self::SECTION_MATCH_THRESHOLD,
            fallback_match_threshold: Self::FALLBACK_MATCH_THRESHOLD,
            window_size: Self::DEFAULT_WINDOW_SIZE,
        }
    }
}
