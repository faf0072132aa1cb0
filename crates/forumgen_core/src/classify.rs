use crate::config::TagSets;
use crate::slug::tag_to_slug;

/// Sentinel folder for discussions whose tag list names no primary tag.
pub const UNCATEGORIZED_SEGMENT: &str = "uncategorized";

/// Derive a discussion's category path from its ordered tag list.
///
/// The first occurrence of a primary tag opens the category span and the
/// second closes it; with a single occurrence the span runs to the end of
/// the list. Tags inside the span are slugified in order until a secondary
/// tag truncates the path. Occurrences past the second are never reached.
pub fn category_path(tags: &[String], sets: &TagSets) -> Vec<String> {
    let mut span_start = None;
    let mut span_end = None;
    for (index, tag) in tags.iter().enumerate() {
        if sets.is_primary(tag) {
            if span_start.is_none() {
                span_start = Some(index);
            } else {
                span_end = Some(index);
                break;
            }
        }
    }

    let Some(start) = span_start else {
        return vec![UNCATEGORIZED_SEGMENT.to_string()];
    };
    let end = span_end.unwrap_or(tags.len());

    let mut path = Vec::new();
    for tag in &tags[start..end] {
        if sets.is_secondary(tag) {
            break;
        }
        path.push(tag_to_slug(tag));
    }
    path
}
