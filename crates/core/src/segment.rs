/// Splits a review into sentence-like segments on period characters.
///
/// This is a deliberately naive splitter: it has no abbreviation handling
/// and no locale awareness, so "Dr." or a decimal number is treated as a
/// sentence boundary. The iterator is lazy and can be restarted by calling
/// again on the same text.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}
