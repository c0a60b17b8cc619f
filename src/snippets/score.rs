/// Fraction of `keywords` that appear anywhere in `text`, case-insensitively.
///
/// Plain substring containment: "love" matches "loved" and "glove" alike.
/// An empty keyword list scores 0.
pub fn keyword_score<S: AsRef<str>>(text: &str, keywords: &[S]) -> f64 {
    if keywords.is_empty() {
        return 0.0;
    }
    let text = text.to_lowercase();
    let found = keywords
        .iter()
        .filter(|kw| text.contains(&kw.as_ref().to_lowercase()))
        .count();
    found as f64 / keywords.len() as f64
}
