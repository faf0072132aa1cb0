use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;

use crate::error::ConvertError;

/// One archived discussion as stored on disk: a path slug, the ordered tag
/// list, and posts keyed by their numeric position in the thread.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDiscussion {
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub posts: BTreeMap<String, RawPost>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub poster: String,
    pub content: String,
    #[serde(default)]
    pub votes: RawVotes,
    #[serde(default)]
    pub reactions: RawReactions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVotes {
    #[serde(default)]
    pub upvoters: Vec<String>,
    #[serde(default)]
    pub downvoters: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReactions {
    #[serde(default)]
    pub haha: Vec<String>,
    #[serde(default)]
    pub wtf: Vec<String>,
    #[serde(default)]
    pub tuga: Vec<String>,
}

/// A post with vote and reaction overlaps resolved into final tallies.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub author: String,
    pub content: String,
    pub votes: i64,
    pub reactions: Reactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reactions {
    pub haha: usize,
    pub wtf: usize,
    pub tuga: usize,
}

/// Net vote score. A voter present on both sides counts as an upvote only.
pub fn resolve_votes(votes: &RawVotes) -> i64 {
    let upvoters: HashSet<&str> = votes.upvoters.iter().map(String::as_str).collect();
    let downvoters: HashSet<&str> = votes.downvoters.iter().map(String::as_str).collect();
    let effective_downvotes = downvoters.difference(&upvoters).count();
    upvoters.len() as i64 - effective_downvotes as i64
}

/// Reaction tallies with precedence haha > wtf > tuga.
/// Each reactor counts toward at most one reaction.
pub fn resolve_reactions(reactions: &RawReactions) -> Reactions {
    let haha: HashSet<&str> = reactions.haha.iter().map(String::as_str).collect();
    let mut wtf: HashSet<&str> = reactions.wtf.iter().map(String::as_str).collect();
    wtf.retain(|reactor| !haha.contains(reactor));
    let mut tuga: HashSet<&str> = reactions.tuga.iter().map(String::as_str).collect();
    tuga.retain(|reactor| !wtf.contains(reactor) && !haha.contains(reactor));

    Reactions {
        haha: haha.len(),
        wtf: wtf.len(),
        tuga: tuga.len(),
    }
}

/// Order a discussion's posts by the numeric value of their keys and resolve
/// each one into a [`Post`]. Key `"10"` sorts after `"2"`; a key that does
/// not parse as an integer fails the whole discussion.
pub fn normalize_posts(posts: &BTreeMap<String, RawPost>) -> Result<Vec<Post>, ConvertError> {
    let mut ordered: Vec<(i64, &RawPost)> = Vec::with_capacity(posts.len());
    for (key, post) in posts {
        let index: i64 = key
            .parse()
            .map_err(|_| ConvertError::BadPostKey { key: key.clone() })?;
        ordered.push((index, post));
    }
    ordered.sort_by_key(|(index, _)| *index);

    Ok(ordered
        .into_iter()
        .map(|(_, raw)| Post {
            author: raw.poster.clone(),
            content: raw.content.clone(),
            votes: resolve_votes(&raw.votes),
            reactions: resolve_reactions(&raw.reactions),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn overlapping_voter_counts_as_upvote() {
        let votes = RawVotes {
            upvoters: names(&["A", "B"]),
            downvoters: names(&["B", "C"]),
        };
        assert_eq!(resolve_votes(&votes), 1);
    }

    #[test]
    fn net_score_can_be_negative() {
        let votes = RawVotes {
            upvoters: names(&["A"]),
            downvoters: names(&["B", "C", "D"]),
        };
        assert_eq!(resolve_votes(&votes), -2);
    }

    #[test]
    fn duplicate_voters_count_once() {
        let votes = RawVotes {
            upvoters: names(&["A", "A", "A"]),
            downvoters: Vec::new(),
        };
        assert_eq!(resolve_votes(&votes), 1);
    }

    #[test]
    fn reaction_precedence_haha_wtf_tuga() {
        let reactions = RawReactions {
            haha: names(&["X"]),
            wtf: names(&["X", "Y"]),
            tuga: names(&["X", "Y", "Z"]),
        };
        let resolved = resolve_reactions(&reactions);
        assert_eq!(resolved, Reactions { haha: 1, wtf: 1, tuga: 1 });
    }

    #[test]
    fn missing_vote_and_reaction_keys_default_to_empty() {
        let raw: RawPost = serde_json::from_str(r#"{"poster": "ana", "content": "hi"}"#)
            .expect("deserialize post");
        assert_eq!(resolve_votes(&raw.votes), 0);
        assert_eq!(
            resolve_reactions(&raw.reactions),
            Reactions { haha: 0, wtf: 0, tuga: 0 }
        );
    }

    #[test]
    fn posts_order_numerically_not_lexically() {
        let discussion: RawDiscussion = serde_json::from_str(
            r#"{
                "slug": "thread",
                "tags": [],
                "posts": {
                    "10": {"poster": "second", "content": "b"},
                    "2": {"poster": "first", "content": "a"}
                }
            }"#,
        )
        .expect("deserialize discussion");

        let posts = normalize_posts(&discussion.posts).expect("normalize");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].author, "first");
        assert_eq!(posts[1].author, "second");
    }

    #[test]
    fn non_numeric_post_key_fails_the_discussion() {
        let mut posts = BTreeMap::new();
        posts.insert(
            "latest".to_string(),
            RawPost {
                poster: "ana".to_string(),
                content: String::new(),
                votes: RawVotes::default(),
                reactions: RawReactions::default(),
            },
        );
        let error = normalize_posts(&posts).expect_err("must fail");
        assert_eq!(
            error,
            ConvertError::BadPostKey {
                key: "latest".to_string()
            }
        );
    }
}
