use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::RenderStyle;
use crate::posts::Post;

/// Image links whose target lives in a dated assets folder with a five-digit
/// file stem, e.g. `![](assets/2022-07-01/00001.png)`.
fn asset_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!\[\]\((assets/\d{4}-\d{2}-\d{2}/\d{5}\.[^)]+)\)")
            .expect("asset reference pattern")
    })
}

/// Escape leading `#` runs so content lines cannot start a document heading.
///
/// A backslash before the run makes CommonMark render the `#` characters as
/// literal text while keeping the original run visible.
fn demote_headings(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.starts_with('#') {
                format!("\\{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one normalized post as a self-contained Markdown block: author
/// heading, demoted content, separator, vote score, and reaction tallies.
pub fn post_to_markdown(post: &Post, style: &RenderStyle) -> String {
    let content = demote_headings(&post.content);
    let separator = style.separator();
    format!(
        "# {author}:\n\n{content}\n\n{separator}\n\n\
         {up} {votes} {down}\n\n\
         {haha}: {haha_count} {wtf}: {wtf_count} {tuga}: {tuga_count}\n\n{separator}",
        author = post.author,
        content = content,
        separator = separator,
        up = style.upvote_label,
        votes = post.votes,
        down = style.downvote_label,
        haha = style.haha_label,
        haha_count = post.reactions.haha,
        wtf = style.wtf_label,
        wtf_count = post.reactions.wtf,
        tuga = style.tuga_label,
        tuga_count = post.reactions.tuga,
    )
}

/// Collect the distinct dated asset paths referenced by image links in the
/// raw (pre-demotion) post content.
pub fn extract_assets(content: &str) -> BTreeSet<String> {
    asset_reference()
        .captures_iter(content)
        .map(|captures| captures[1].trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::Reactions;

    fn post(content: &str, votes: i64, reactions: Reactions) -> Post {
        Post {
            author: "ana".to_string(),
            content: content.to_string(),
            votes,
            reactions,
        }
    }

    #[test]
    fn renders_the_full_block() {
        let rendered = post_to_markdown(
            &post("hello", 3, Reactions { haha: 1, wtf: 2, tuga: 0 }),
            &RenderStyle::default(),
        );
        let separator = "-".repeat(88);
        let expected = format!(
            "# ana:\n\nhello\n\n{separator}\n\n👍 3 👎\n\n😆: 1 😶: 2 😢: 0\n\n{separator}"
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn demotes_leading_heading_runs() {
        let rendered = post_to_markdown(
            &post("### loud\nplain\n# also loud", 0, Reactions { haha: 0, wtf: 0, tuga: 0 }),
            &RenderStyle::default(),
        );
        assert!(rendered.contains("\\### loud\nplain\n\\# also loud"));
        // Only the author line opens a heading.
        assert_eq!(
            rendered.lines().filter(|line| line.starts_with('#')).count(),
            1
        );
    }

    #[test]
    fn hash_inside_a_line_is_untouched() {
        let rendered = post_to_markdown(
            &post("see #42 for details", 0, Reactions { haha: 0, wtf: 0, tuga: 0 }),
            &RenderStyle::default(),
        );
        assert!(rendered.contains("\nsee #42 for details\n"));
    }

    #[test]
    fn respects_substitute_style() {
        let style = RenderStyle {
            separator_width: 4,
            upvote_label: "+".to_string(),
            downvote_label: "-".to_string(),
            haha_label: "h".to_string(),
            wtf_label: "w".to_string(),
            tuga_label: "t".to_string(),
        };
        let rendered = post_to_markdown(
            &post("x", -1, Reactions { haha: 0, wtf: 0, tuga: 0 }),
            &style,
        );
        assert_eq!(rendered, "# ana:\n\nx\n\n----\n\n+ -1 -\n\nh: 0 w: 0 t: 0\n\n----");
    }

    #[test]
    fn extracts_only_dated_asset_references() {
        let content = "intro ![](assets/2022-07-01/00001.png) mid \
                       ![](other.png) ![](assets/22-07-01/00002.png) \
                       ![](assets/2022-07-01/123.png) again ![](assets/2022-07-01/00001.png)";
        let assets = extract_assets(content);
        assert_eq!(
            assets.into_iter().collect::<Vec<_>>(),
            vec!["assets/2022-07-01/00001.png".to_string()]
        );
    }

    #[test]
    fn no_references_yield_an_empty_set() {
        assert!(extract_assets("plain text").is_empty());
    }

    #[test]
    fn votes_and_reactions_lines_round_trip() {
        let original = post("content", -4, Reactions { haha: 2, wtf: 0, tuga: 5 });
        let style = RenderStyle::default();
        let rendered = post_to_markdown(&original, &style);

        let votes_line = rendered
            .lines()
            .find(|line| line.starts_with(&style.upvote_label))
            .expect("votes line");
        let votes: i64 = votes_line
            .split_whitespace()
            .nth(1)
            .expect("score token")
            .parse()
            .expect("score parses");
        assert_eq!(votes, original.votes);

        let reactions_line = rendered
            .lines()
            .find(|line| line.starts_with(&style.haha_label))
            .expect("reactions line");
        let counts: Vec<usize> = reactions_line
            .split_whitespace()
            .filter_map(|token| token.parse().ok())
            .collect();
        assert_eq!(
            counts,
            vec![
                original.reactions.haha,
                original.reactions.wtf,
                original.reactions.tuga
            ]
        );
    }
}
