//! Keyword-free snippet picking
//!
//! Used when a song has no guidance (alternates, replacements). Choruses are
//! the most recognizable, so they go to easy; verses to medium; bridges and
//! the like to hard. Sections are reused at successive 3-line offsets when the
//! song is short on material.

use std::collections::HashMap;

use tracing::debug;

use super::batch::{BatchOutcome, SNIPPETS_PER_SONG};
use super::{Difficulty, LyricSnippet, Thresholds};
use crate::lyrics::{LyricSection, SectionKind};

const EASY_KINDS: &[SectionKind] = &[SectionKind::Chorus, SectionKind::Verse, SectionKind::Other];
const MEDIUM_KINDS: &[SectionKind] = &[SectionKind::Verse, SectionKind::Chorus, SectionKind::Other];
const HARD_KINDS: &[SectionKind] = &[
    SectionKind::Bridge,
    SectionKind::PreChorus,
    SectionKind::Intro,
    SectionKind::Outro,
    SectionKind::Verse,
    SectionKind::Other,
];

/// Sections with fewer lines never yield a snippet.
const MIN_SECTION_LINES: usize = 2;

/// Tracks how many windows have been taken from each section.
#[derive(Debug)]
pub struct SectionUsage<'a> {
    sections: &'a [LyricSection],
    window: usize,
    uses: HashMap<usize, usize>,
}

impl<'a> SectionUsage<'a> {
    pub fn new(sections: &'a [LyricSection], window: usize) -> Self {
        Self {
            sections,
            window: window.max(1),
            uses: HashMap::new(),
        }
    }

    pub fn uses(&self, index: usize) -> usize {
        self.uses.get(&index).copied().unwrap_or(0)
    }

    fn is_unused(&self, index: usize) -> bool {
        !self.uses.contains_key(&index)
            && self.sections[index].lines.len() >= MIN_SECTION_LINES
    }

    /// Long enough and not yet read to the end.
    pub fn is_available(&self, index: usize) -> bool {
        let lines = self.sections[index].lines.len();
        lines >= MIN_SECTION_LINES && self.uses(index) * self.window < lines
    }

    /// First untouched section of the listed kinds, in priority order; then
    /// the first partly used one that still has lines.
    pub fn find(&self, kinds: &[SectionKind]) -> Option<usize> {
        let of_kind = |kind: SectionKind| {
            self.sections
                .iter()
                .enumerate()
                .filter(move |(_, s)| s.kind == kind)
                .map(|(i, _)| i)
        };

        kinds
            .iter()
            .find_map(|&k| of_kind(k).find(|&i| self.is_unused(i)))
            .or_else(|| {
                kinds
                    .iter()
                    .find_map(|&k| of_kind(k).find(|&i| self.is_available(i)))
            })
    }

    /// First available section in document order, regardless of kind.
    pub fn find_any(&self) -> Option<usize> {
        (0..self.sections.len()).find(|&i| self.is_available(i))
    }

    /// Take the next window from a section and mark it used.
    pub fn take(&mut self, index: usize) -> &'a [String] {
        let count = self.uses.entry(index).or_insert(0);
        let offset = *count * self.window;
        *count += 1;

        let sections: &'a [LyricSection] = self.sections;
        let lines = &sections[index].lines;
        let start = offset.min(lines.len());
        &lines[start..(start + self.window).min(lines.len())]
    }
}

/// Pick three snippets by section kind alone.
pub fn extract_fallback(thresholds: &Thresholds, sections: &[LyricSection]) -> BatchOutcome {
    if sections.is_empty() {
        return BatchOutcome {
            success: false,
            snippets: Vec::new(),
            errors: vec!["No sections available".to_string()],
        };
    }

    let mut usage = SectionUsage::new(sections, thresholds.window_size);
    let mut snippets = Vec::with_capacity(SNIPPETS_PER_SONG);

    for (difficulty, kinds) in [
        (Difficulty::Easy, EASY_KINDS),
        (Difficulty::Medium, MEDIUM_KINDS),
        (Difficulty::Hard, HARD_KINDS),
    ] {
        if let Some(index) = usage.find(kinds) {
            debug!(?difficulty, section = %sections[index].kind, index, "fallback pick");
            snippets.push(LyricSnippet::from_lines(usage.take(index), difficulty));
        }
    }

    if snippets.len() < SNIPPETS_PER_SONG {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            if snippets.len() >= SNIPPETS_PER_SONG {
                break;
            }
            if snippets.iter().any(|s| s.difficulty == difficulty) {
                continue;
            }
            if let Some(index) = usage.find_any() {
                debug!(?difficulty, index, "fallback backfill");
                snippets.push(LyricSnippet::from_lines(usage.take(index), difficulty));
            }
        }
    }

    let errors = if snippets.len() < SNIPPETS_PER_SONG {
        vec!["Could not extract 3 distinct snippets from lyrics".to_string()]
    } else {
        Vec::new()
    };

    BatchOutcome::finish(snippets, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(kind: SectionKind, number: u32, lines: &[&str]) -> LyricSection {
        LyricSection {
            kind,
            number,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn text_for(outcome: &BatchOutcome, difficulty: Difficulty) -> &str {
        outcome
            .snippets
            .iter()
            .find(|s| s.difficulty == difficulty)
            .map(|s| s.text.as_str())
            .unwrap_or_default()
    }

    fn run(sections: &[LyricSection]) -> BatchOutcome {
        extract_fallback(&Thresholds::default(), sections)
    }

    #[test]
    fn test_prefers_chorus_verse_bridge() {
        let sections = vec![
            section(
                SectionKind::Chorus,
                1,
                &["Catchy chorus here", "Everyone knows this", "Sing along now"],
            ),
            section(
                SectionKind::Verse,
                1,
                &["Verse content here", "More verse lyrics", "Keep reading"],
            ),
            section(SectionKind::Bridge, 1, &["Bridge is obscure", "Nobody knows this part"]),
        ];
        let outcome = run(&sections);
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            text_for(&outcome, Difficulty::Easy),
            "Catchy chorus here / Everyone knows this / Sing along now"
        );
        assert!(text_for(&outcome, Difficulty::Medium).starts_with("Verse content here"));
        assert_eq!(
            text_for(&outcome, Difficulty::Hard),
            "Bridge is obscure / Nobody knows this part"
        );
        let order: Vec<Difficulty> = outcome.snippets.iter().map(|s| s.difficulty).collect();
        assert_eq!(order, vec![Difficulty::Hard, Difficulty::Medium, Difficulty::Easy]);
    }

    #[test]
    fn test_only_verses() {
        let sections = vec![
            section(SectionKind::Verse, 1, &["1a", "1b", "1c", "1d"]),
            section(SectionKind::Verse, 2, &["2a", "2b", "2c"]),
            section(SectionKind::Verse, 3, &["3a", "3b", "3c"]),
        ];
        let outcome = run(&sections);
        assert!(outcome.success);
        assert_eq!(text_for(&outcome, Difficulty::Easy), "1a / 1b / 1c");
        assert_eq!(text_for(&outcome, Difficulty::Medium), "2a / 2b / 2c");
        assert_eq!(text_for(&outcome, Difficulty::Hard), "3a / 3b / 3c");
    }

    #[test]
    fn test_reuses_long_section_at_offset() {
        let sections = vec![section(
            SectionKind::Verse,
            1,
            &["a", "b", "c", "d", "e", "f", "g", "h"],
        )];
        let outcome = run(&sections);
        assert!(outcome.success);
        assert_eq!(text_for(&outcome, Difficulty::Easy), "a / b / c");
        assert_eq!(text_for(&outcome, Difficulty::Medium), "d / e / f");
        assert_eq!(text_for(&outcome, Difficulty::Hard), "g / h");
    }

    #[test]
    fn test_backfills_from_unlisted_kinds() {
        // Intro is only listed for hard; easy and medium are backfilled.
        let sections = vec![
            section(SectionKind::Intro, 1, &["i1", "i2", "i3", "i4", "i5", "i6", "i7"]),
        ];
        let outcome = run(&sections);
        assert!(outcome.success);
        assert_eq!(text_for(&outcome, Difficulty::Hard), "i1 / i2 / i3");
        assert_eq!(text_for(&outcome, Difficulty::Easy), "i4 / i5 / i6");
        assert_eq!(text_for(&outcome, Difficulty::Medium), "i7");
    }

    #[test]
    fn test_empty_sections() {
        let outcome = run(&[]);
        assert!(!outcome.success);
        assert!(outcome.snippets.is_empty());
        assert_eq!(outcome.errors, vec!["No sections available"]);
    }

    #[test]
    fn test_two_line_song_is_insufficient() {
        let sections = vec![section(SectionKind::Verse, 1, &["only one", "and two"])];
        let outcome = run(&sections);
        assert!(!outcome.success);
        assert_eq!(outcome.snippets.len(), 1);
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn test_single_line_sections_skipped() {
        let sections = vec![
            section(SectionKind::Chorus, 1, &["lonely"]),
            section(SectionKind::Verse, 1, &["v1", "v2"]),
        ];
        let usage = SectionUsage::new(&sections, 3);
        assert!(!usage.is_available(0));
        assert_eq!(usage.find(EASY_KINDS), Some(1));
    }

    #[test]
    fn test_usage_offsets() {
        let sections = vec![section(SectionKind::Verse, 1, &["a", "b", "c", "d"])];
        let mut usage = SectionUsage::new(&sections, 3);
        assert_eq!(usage.take(0), &["a", "b", "c"]);
        assert_eq!(usage.uses(0), 1);
        assert!(usage.is_available(0));
        assert_eq!(usage.take(0), &["d"]);
        assert!(!usage.is_available(0));
        assert_eq!(usage.find(MEDIUM_KINDS), None);
    }
}
