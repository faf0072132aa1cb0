/// Fold the Croatian diacritics to their ASCII counterparts.
/// Unmapped characters pass through unchanged.
fn fold_diacritic(ch: char) -> Option<&'static str> {
    match ch {
        'č' | 'ć' => Some("c"),
        'đ' => Some("dj"),
        'š' => Some("s"),
        'ž' => Some("z"),
        _ => None,
    }
}

/// Convert a free-text tag into a lowercase, path-safe slug segment.
///
/// Whitespace runs collapse to a single hyphen and every character that is
/// not a letter or digit becomes a hyphen (underscores included).
/// Consecutive hyphens are kept as-is, so existing folder names stay stable.
pub fn tag_to_slug(tag: &str) -> String {
    let lowered = tag.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        match fold_diacritic(ch) {
            Some(folded) => slug.push_str(folded),
            None if ch.is_alphanumeric() => slug.push(ch),
            None => slug.push('-'),
        }
    }
    slug
}
