//! Guided snippet extraction
//!
//! A guidance record names a section, an approximate line range and a few
//! keywords. The search widens in three steps until something verifies:
//! 1. the first section matching kind and number, at the given line range
//! 2. every section of the kind, at the given line range
//! 3. every window of every section, by keywords alone

use tracing::debug;

use super::score::keyword_score;
use super::{LyricSnippet, SnippetGuidance, Thresholds};
use crate::lyrics::LyricSection;

/// Why a single guidance could not be turned into a snippet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("Line range out of bounds")]
    LineRangeOutOfBounds,
    #[error("No lines in range")]
    NoLinesInRange,
    #[error("Could not find snippet matching keywords in section: {}", .keywords.join(", "))]
    NoMatchInSection { keywords: Vec<String> },
    #[error("Could not find snippet matching keywords: {}", .keywords.join(", "))]
    NoMatch { keywords: Vec<String> },
}

/// Best-scoring run of lines seen so far; earlier candidates win ties.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    lines: &'a [String],
    score: f64,
}

fn offer<'a>(best: &mut Option<Candidate<'a>>, lines: &'a [String], keywords: &[String]) {
    let score = keyword_score(&lines.join(super::LINE_SEPARATOR), keywords);
    if best.is_none_or(|b| score > b.score) {
        *best = Some(Candidate { lines, score });
    }
}

/// Every window of `size` lines, clamped to the section end. A section shorter
/// than `size` yields a single window holding all of it.
fn windows(lines: &[String], size: usize) -> impl Iterator<Item = &[String]> {
    let last = lines.len().saturating_sub(size);
    (0..=last).map(move |i| &lines[i..(i + size).min(lines.len())])
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    thresholds: Thresholds,
}

impl Extractor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Locate the snippet described by `guidance`.
    pub fn extract(
        &self,
        sections: &[LyricSection],
        guidance: &SnippetGuidance,
    ) -> Result<LyricSnippet, ExtractError> {
        let exact = sections.iter().find(|s| {
            s.kind == guidance.section && guidance.verse_number.is_none_or(|n| s.number == n)
        });
        if let Some(section) = exact {
            match self.extract_from_section(section, guidance) {
                Ok(snippet) => return Ok(snippet),
                Err(e) => debug!(
                    section = %section.kind,
                    number = section.number,
                    error = %e,
                    "exact section miss"
                ),
            }
        }

        for section in sections.iter().filter(|s| s.kind == guidance.section) {
            if let Ok(snippet) = self.extract_from_section(section, guidance) {
                debug!(section = %section.kind, number = section.number, "matched by section kind");
                return Ok(snippet);
            }
        }

        debug!(section = %guidance.section, "searching all sections by keywords");
        self.extract_by_keywords(sections, guidance)
    }

    fn extract_from_section(
        &self,
        section: &LyricSection,
        guidance: &SnippetGuidance,
    ) -> Result<LyricSnippet, ExtractError> {
        let lines = &section.lines;
        let start = (guidance.line_range.start as usize).saturating_sub(1);
        let end = (guidance.line_range.end as usize).min(lines.len());
        let threshold = self.thresholds.section_match_threshold;

        if start >= lines.len() {
            // Range past the end: settle for the opening lines if they verify.
            let head = &lines[..lines.len().min(self.thresholds.window_size)];
            let text = head.join(super::LINE_SEPARATOR);
            if keyword_score(&text, &guidance.keywords) >= threshold {
                return Ok(LyricSnippet { text, difficulty: guidance.difficulty });
            }
            return Err(ExtractError::LineRangeOutOfBounds);
        }

        if end <= start {
            return Err(ExtractError::NoLinesInRange);
        }

        let text = lines[start..end].join(super::LINE_SEPARATOR);
        if keyword_score(&text, &guidance.keywords) >= threshold {
            return Ok(LyricSnippet { text, difficulty: guidance.difficulty });
        }

        self.expanded_section_search(section, guidance)
    }

    fn expanded_section_search(
        &self,
        section: &LyricSection,
        guidance: &SnippetGuidance,
    ) -> Result<LyricSnippet, ExtractError> {
        let mut best = None;
        for window in windows(&section.lines, self.thresholds.window_size) {
            offer(&mut best, window, &guidance.keywords);
        }

        match best {
            Some(c) if c.score >= self.thresholds.section_match_threshold => {
                Ok(LyricSnippet::from_lines(c.lines, guidance.difficulty))
            }
            _ => Err(ExtractError::NoMatchInSection {
                keywords: guidance.keywords.clone(),
            }),
        }
    }

    fn extract_by_keywords(
        &self,
        sections: &[LyricSection],
        guidance: &SnippetGuidance,
    ) -> Result<LyricSnippet, ExtractError> {
        let size = self.thresholds.window_size;
        let mut best = None;

        for section in sections {
            for window in windows(&section.lines, size) {
                offer(&mut best, window, &guidance.keywords);
            }
            // Shorter windows catch short sections and tight matches.
            for small in (1..size).take_while(|&n| n <= section.lines.len()) {
                for window in windows(&section.lines, small) {
                    offer(&mut best, window, &guidance.keywords);
                }
            }
        }

        match best {
            Some(c) if c.score >= self.thresholds.fallback_match_threshold => {
                Ok(LyricSnippet::from_lines(c.lines, guidance.difficulty))
            }
            _ => Err(ExtractError::NoMatch {
                keywords: guidance.keywords.clone(),
            }),
        }
    }
}
