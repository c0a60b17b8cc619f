//! Section parser
//!
//! Splits plain lyrics into structural blocks using `[Label]` header lines:
//! [Verse 1]
//! First line
//! [Chorus]
//! Chorus line

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]+)\]$").expect("valid header regex"));

/// Structural role of a block of lyrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Verse,
    Chorus,
    Bridge,
    PreChorus,
    Intro,
    Outro,
    Other,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Verse,
        SectionKind::Chorus,
        SectionKind::Bridge,
        SectionKind::PreChorus,
        SectionKind::Intro,
        SectionKind::Outro,
        SectionKind::Other,
    ];

    /// Classify a header label.
    ///
    /// First substring match wins, and `chorus` is checked before
    /// `pre-chorus`, so "Pre-Chorus" lands in [`SectionKind::Chorus`].
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("verse") {
            Self::Verse
        } else if label.contains("chorus") || label.contains("hook") {
            Self::Chorus
        } else if label.contains("bridge") {
            Self::Bridge
        } else if label.contains("pre-chorus")
            || label.contains("prechorus")
            || label.contains("pre chorus")
        {
            Self::PreChorus
        } else if label.contains("intro") {
            Self::Intro
        } else if label.contains("outro") {
            Self::Outro
        } else {
            Self::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verse => "verse",
            Self::Chorus => "chorus",
            Self::Bridge => "bridge",
            Self::PreChorus => "pre-chorus",
            Self::Intro => "intro",
            Self::Outro => "outro",
            Self::Other => "other",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Verse => 0,
            Self::Chorus => 1,
            Self::Bridge => 2,
            Self::PreChorus => 3,
            Self::Intro => 4,
            Self::Outro => 5,
            Self::Other => 6,
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structural block of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricSection {
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// 1-based ordinal among sections of the same kind
    pub number: u32,
    /// Trimmed, non-empty lines
    pub lines: Vec<String>,
}

impl LyricSection {
    pub fn new(kind: SectionKind, number: u32) -> Self {
        Self {
            kind,
            number,
            lines: Vec::new(),
        }
    }
}

/// Running per-kind ordinals for a single parse.
#[derive(Debug, Default)]
struct SectionCounter {
    counts: [u32; SectionKind::ALL.len()],
}

impl SectionCounter {
    fn next(&mut self, kind: SectionKind) -> u32 {
        let slot = &mut self.counts[kind.index()];
        *slot += 1;
        *slot
    }
}

/// Parse lyrics text into ordered sections.
///
/// Lines before the first header form an implicit verse. Blank lines are
/// dropped and never close a section; sections without lines are not emitted.
pub fn parse(content: &str) -> Vec<LyricSection> {
    let mut sections = Vec::new();
    let mut counter = SectionCounter::default();
    let mut current: Option<LyricSection> = None;

    for line in content.lines() {
        let line = line.trim();

        if let Some(caps) = HEADER_RE.captures(line) {
            if let Some(done) = current.take()
                && !done.lines.is_empty()
            {
                sections.push(done);
            }
            let kind = SectionKind::classify(&caps[1]);
            current = Some(LyricSection::new(kind, counter.next(kind)));
            continue;
        }

        if line.is_empty() {
            continue;
        }

        current
            .get_or_insert_with(|| {
                LyricSection::new(SectionKind::Verse, counter.next(SectionKind::Verse))
            })
            .lines
            .push(line.to_string());
    }

    if let Some(done) = current
        && !done.lines.is_empty()
    {
        sections.push(done);
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sections: &[LyricSection]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_parse_headers() {
        let lyrics = "[Verse 1]
Line one of verse one
Line two of verse one

[Chorus]
Chorus line one
Chorus line two

[Verse 2]
Line one of verse two";
        let sections = parse(lyrics);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].kind, SectionKind::Verse);
        assert_eq!(sections[0].number, 1);
        assert_eq!(
            sections[0].lines,
            vec!["Line one of verse one", "Line two of verse one"]
        );
        assert_eq!(sections[1].kind, SectionKind::Chorus);
        assert_eq!(sections[1].number, 1);
        assert_eq!(sections[2].kind, SectionKind::Verse);
        assert_eq!(sections[2].number, 2);
    }

    #[test]
    fn test_implicit_verse() {
        let sections = parse("  First line\nSecond line  \n\nThird line\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Verse);
        assert_eq!(sections[0].number, 1);
        assert_eq!(
            sections[0].lines,
            vec!["First line", "Second line", "Third line"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n   \t\n").is_empty());
    }

    // Pins the first-match-wins ordering: anything mentioning "chorus" is a chorus.
    #[test]
    fn test_pre_chorus_classified_as_chorus() {
        for label in ["Pre-Chorus", "Prechorus", "pre chorus", "Hook"] {
            let sections = parse(&format!("[{label}]\nsome line"));
            assert_eq!(sections[0].kind, SectionKind::Chorus, "label {label}");
        }
    }

    #[test]
    fn test_classify_other_kinds() {
        let lyrics = "[Bridge]\nb\n[Intro]\ni\n[Outro]\no\n[Instrumental]\nx";
        assert_eq!(
            kinds(&parse(lyrics)),
            vec![
                SectionKind::Bridge,
                SectionKind::Intro,
                SectionKind::Outro,
                SectionKind::Other
            ]
        );
    }

    #[test]
    fn test_numbering_per_kind() {
        let lyrics = "[Verse 1]
First verse
[Chorus]
First chorus
[Verse 2]
Second verse
[Chorus]
Second chorus
[Verse 3]
Third verse";
        let numbers: Vec<u32> = parse(lyrics).iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 1, 2, 2, 3]);
    }

    #[test]
    fn test_empty_section_dropped_but_counted() {
        let sections = parse("[Chorus]\n\n[Chorus]\nsecond");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].number, 2);
    }

    #[test]
    fn test_implicit_verse_then_header() {
        let sections = parse("opening line\n[Verse]\nnext");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].number, 1);
        assert_eq!(sections[1].number, 2);
    }

    #[test]
    fn test_bracketed_text_inside_line_is_lyric() {
        let sections = parse("[Verse]\nhello [world] again");
        assert_eq!(sections[0].lines, vec!["hello [world] again"]);
    }

    #[test]
    fn test_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&SectionKind::PreChorus).unwrap();
        assert_eq!(json, "\"pre-chorus\"");
    }
}
