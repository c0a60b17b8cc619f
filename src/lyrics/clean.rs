//! Normalization for lyrics scraped out of HTML pages.

use once_cell::sync::Lazy;
use regex::Regex;

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid br regex"));
static ANCHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a[^>]*>(.*?)</a>").expect("valid anchor regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank regex"));

const ENTITIES: [(&str, &str); 8] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
];

/// Turn a fragment of lyrics markup into plain `\n`-delimited text.
///
/// Plain text passes through with only line-ending and blank-run cleanup,
/// so this is safe to apply to any provider's output.
pub fn clean_lyrics(raw: &str) -> String {
    let text = BR_RE.replace_all(raw, "\n");
    let text = ANCHOR_RE.replace_all(&text, "$1");
    let text = TAG_RE.replace_all(&text, "");

    let mut text = text.into_owned();
    for (entity, replacement) in ENTITIES {
        text = text.replace(entity, replacement);
    }

    let text = text.replace("\r\n", "\n");
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}
