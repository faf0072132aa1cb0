use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

pub const DEFAULT_POSTS_PER_PAGE: usize = 10;
pub const DEFAULT_SEPARATOR_WIDTH: usize = 88;

const DEFAULT_PRIMARY_TAGS: &[&str] = &[
    "FER",
    "Oglasi",
    "Opušteno",
    "Slubeno",
    "Studentska politika",
    "Sudnica",
];

const DEFAULT_SECONDARY_TAGS: &[&str] = &[
    "Alati",
    "Informacije o predmetima",
    "Ispiti",
    "It's just a trolle bro",
    "Izlaganja",
    "Laboratorijske vježbe",
    "Na vlastitu odgovornost",
    "Organizacija",
    "Pikantno",
    "Pitalice",
    "Razgovor",
    "Vježba",
    "Zadaće",
];

/// Category tag sets consulted by the classifier.
///
/// Primary tags delimit the category span; secondary tags truncate it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TagSets {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

impl Default for TagSets {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_TAGS.iter().map(|tag| tag.to_string()).collect(),
            secondary: DEFAULT_SECONDARY_TAGS
                .iter()
                .map(|tag| tag.to_string())
                .collect(),
        }
    }
}

impl TagSets {
    pub fn is_primary(&self, tag: &str) -> bool {
        self.primary.iter().any(|candidate| candidate == tag)
    }

    pub fn is_secondary(&self, tag: &str) -> bool {
        self.secondary.iter().any(|candidate| candidate == tag)
    }
}

/// Markdown output knobs for the post renderer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderStyle {
    pub separator_width: usize,
    pub upvote_label: String,
    pub downvote_label: String,
    pub haha_label: String,
    pub wtf_label: String,
    pub tuga_label: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            separator_width: DEFAULT_SEPARATOR_WIDTH,
            upvote_label: "👍".to_string(),
            downvote_label: "👎".to_string(),
            haha_label: "😆".to_string(),
            wtf_label: "😶".to_string(),
            tuga_label: "😢".to_string(),
        }
    }
}

impl RenderStyle {
    pub fn separator(&self) -> String {
        "-".repeat(self.separator_width)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ForumConfig {
    pub tags: TagSets,
    pub render: RenderStyle,
}

/// Load a ForumConfig from a TOML file. Returns defaults if the file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<ForumConfig> {
    if !config_path.exists() {
        return Ok(ForumConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: ForumConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

/// Per-run conversion parameters handed to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub posts_per_page: usize,
    pub config: ForumConfig,
}

impl ConvertOptions {
    pub fn new(posts_per_page: usize, config: ForumConfig) -> Self {
        Self {
            posts_per_page,
            config,
        }
    }

    /// Reject an unusable page size before any discussion is touched.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.posts_per_page == 0 {
            return Err(ConvertError::InvalidPageSize(self.posts_per_page));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_tag_sets_match_documented_lists() {
        let sets = TagSets::default();
        assert_eq!(sets.primary.len(), 6);
        assert_eq!(sets.secondary.len(), 13);
        assert!(sets.is_primary("FER"));
        assert!(sets.is_primary("Studentska politika"));
        assert!(sets.is_secondary("Ispiti"));
        assert!(sets.is_secondary("It's just a trolle bro"));
        assert!(!sets.is_primary("Razgovor"));
        assert!(!sets.is_secondary("FER"));
    }

    #[test]
    fn default_render_style() {
        let style = RenderStyle::default();
        assert_eq!(style.separator_width, 88);
        assert_eq!(style.separator(), "-".repeat(88));
        assert_eq!(style.upvote_label, "👍");
    }

    #[test]
    fn load_config_returns_default_for_missing_file() {
        let config = load_config(Path::new("/nonexistent/forumgen.toml")).expect("load config");
        assert_eq!(config, ForumConfig::default());
    }

    #[test]
    fn load_config_parses_partial_toml() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("forumgen.toml");
        fs::write(
            &config_path,
            r#"
[tags]
primary = ["Main"]

[render]
separator_width = 8
"#,
        )
        .expect("write config");

        let config = load_config(&config_path).expect("load config");
        assert_eq!(config.tags.primary, vec!["Main"]);
        assert_eq!(config.tags.secondary, TagSets::default().secondary);
        assert_eq!(config.render.separator(), "--------");
        assert_eq!(config.render.haha_label, "😆");
    }

    #[test]
    fn load_config_returns_error_for_invalid_toml() {
        let temp = tempdir().expect("tempdir");
        let config_path = temp.path().join("forumgen.toml");
        fs::write(&config_path, "[tags\nprimary = 3").expect("write config");
        let error = load_config(&config_path).expect_err("must fail");
        assert!(error.to_string().contains("failed to parse"));
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let options = ConvertOptions::new(0, ForumConfig::default());
        assert_eq!(options.validate(), Err(ConvertError::InvalidPageSize(0)));
        assert!(ConvertOptions::new(1, ForumConfig::default()).validate().is_ok());
    }
}
