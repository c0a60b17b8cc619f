use serde::Serialize;
use tracing::debug;

use super::{Extractor, LyricSnippet, SnippetGuidance, sort_by_difficulty};
use crate::lyrics::LyricSection;

/// Number of snippets a finished song needs, one per difficulty.
pub const SNIPPETS_PER_SONG: usize = 3;

/// Outcome of extracting a whole song's snippets.
///
/// Partial results are kept: `snippets` holds whatever verified even when
/// `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub success: bool,
    pub snippets: Vec<LyricSnippet>,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    pub(crate) fn finish(mut snippets: Vec<LyricSnippet>, errors: Vec<String>) -> Self {
        sort_by_difficulty(&mut snippets);
        Self {
            success: snippets.len() == SNIPPETS_PER_SONG,
            snippets,
            errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub valid: bool,
    pub missing: Vec<SnippetGuidance>,
}

/// Run every guidance and collect the results, sorted hard, medium, easy.
pub fn extract_all(
    extractor: &Extractor,
    sections: &[LyricSection],
    guidances: &[SnippetGuidance],
) -> BatchOutcome {
    let mut snippets = Vec::with_capacity(guidances.len());
    let mut errors = Vec::new();

    for guidance in guidances {
        match extractor.extract(sections, guidance) {
            Ok(snippet) => snippets.push(snippet),
            Err(e) => {
                debug!(difficulty = ?guidance.difficulty, error = %e, "snippet extraction failed");
                errors.push(e.to_string());
            }
        }
    }

    BatchOutcome::finish(snippets, errors)
}

/// Dry run: which guidances would fail to extract.
pub fn validate(
    extractor: &Extractor,
    sections: &[LyricSection],
    guidances: &[SnippetGuidance],
) -> Validation {
    let missing: Vec<SnippetGuidance> = guidances
        .iter()
        .filter(|g| extractor.extract(sections, g).is_err())
        .cloned()
        .collect();

    Validation {
        valid: missing.is_empty(),
        missing,
    }
}
