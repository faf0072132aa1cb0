use std::collections::BTreeSet;

use serde::Serialize;

use crate::classify::category_path;
use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::paginate::paginate;
use crate::posts::{RawDiscussion, normalize_posts};
use crate::render::{extract_assets, post_to_markdown};

/// Everything the writer and the asset linker need for one discussion:
/// the destination folder path (category slugs plus the discussion's own
/// slug), the page documents in order, and the referenced asset paths.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedDiscussion {
    pub dest_segments: Vec<String>,
    pub pages: Vec<String>,
    pub assets: BTreeSet<String>,
}

/// Run the whole pipeline over one parsed discussion record.
/// Pure: no filesystem access, no state across calls.
pub fn convert_discussion(
    record: &RawDiscussion,
    options: &ConvertOptions,
) -> Result<ConvertedDiscussion, ConvertError> {
    options.validate()?;

    let mut dest_segments = category_path(&record.tags, &options.config.tags);
    dest_segments.push(record.slug.clone());

    let posts = normalize_posts(&record.posts)?;
    let mut blocks = Vec::with_capacity(posts.len());
    let mut assets = BTreeSet::new();
    for post in &posts {
        // Assets are scanned in the raw content, before heading demotion.
        assets.extend(extract_assets(&post.content));
        blocks.push(post_to_markdown(post, &options.config.render));
    }
    let pages = paginate(&blocks, options.posts_per_page)?;

    Ok(ConvertedDiscussion {
        dest_segments,
        pages,
        assets,
    })
}
