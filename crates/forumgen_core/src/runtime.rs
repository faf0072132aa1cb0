use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const ARCHIVE_ROOT_ENV: &str = "FORUMGEN_ARCHIVE_ROOT";
pub const CONFIG_FILENAME: &str = "forumgen.toml";

/// Where a resolved value came from, for diagnostics output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Flag,
    Env,
    Default,
}

impl ValueSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::Default => "default",
        }
    }
}

/// CLI-level path overrides, applied before env and defaults.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub archive_root: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// The archive layout every command works against.
///
/// `assets/` holds dated media folders, `discussions/json/` the archived
/// records, `discussions/markdown/` the generated output tree.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub archive_root: PathBuf,
    pub assets_dir: PathBuf,
    pub json_dir: PathBuf,
    pub markdown_dir: PathBuf,
    pub config_path: PathBuf,
    pub root_source: ValueSource,
    pub config_source: ValueSource,
}

impl ResolvedPaths {
    pub fn diagnostics(&self) -> String {
        format!(
            "archive_root={} ({})\nassets_dir={}\njson_dir={}\nmarkdown_dir={}\nconfig_path={} ({})",
            self.archive_root.display(),
            self.root_source.as_str(),
            self.assets_dir.display(),
            self.json_dir.display(),
            self.markdown_dir.display(),
            self.config_path.display(),
            self.config_source.as_str(),
        )
    }
}

/// Resolve the archive layout: flag > `FORUMGEN_ARCHIVE_ROOT` > current dir.
pub fn resolve_paths(overrides: &PathOverrides) -> Result<ResolvedPaths> {
    resolve_paths_with_lookup(overrides, |key| env::var(key).ok())
}

fn resolve_paths_with_lookup<F>(overrides: &PathOverrides, lookup_env: F) -> Result<ResolvedPaths>
where
    F: Fn(&str) -> Option<String>,
{
    let (archive_root, root_source) = if let Some(root) = &overrides.archive_root {
        (root.clone(), ValueSource::Flag)
    } else if let Some(value) = lookup_env(ARCHIVE_ROOT_ENV)
        && !value.trim().is_empty()
    {
        (PathBuf::from(value.trim()), ValueSource::Env)
    } else {
        (
            env::current_dir().context("failed to read current directory")?,
            ValueSource::Default,
        )
    };

    let (config_path, config_source) = match &overrides.config {
        Some(path) => (path.clone(), ValueSource::Flag),
        None => (archive_root.join(CONFIG_FILENAME), ValueSource::Default),
    };

    Ok(ResolvedPaths {
        assets_dir: archive_root.join("assets"),
        json_dir: archive_root.join("discussions").join("json"),
        markdown_dir: archive_root.join("discussions").join("markdown"),
        config_path,
        archive_root,
        root_source,
        config_source,
    })
}

/// Existence snapshot of the resolved layout, with human-readable warnings.
#[derive(Debug, Clone)]
pub struct RuntimeStatus {
    pub archive_root_exists: bool,
    pub assets_exists: bool,
    pub json_exists: bool,
    pub markdown_exists: bool,
    pub config_exists: bool,
    pub warnings: Vec<String>,
}

pub fn inspect_runtime(paths: &ResolvedPaths) -> RuntimeStatus {
    let archive_root_exists = paths.archive_root.exists();
    let assets_exists = paths.assets_dir.exists();
    let json_exists = paths.json_dir.exists();
    let markdown_exists = paths.markdown_dir.exists();
    let config_exists = paths.config_path.exists();

    let mut warnings = Vec::new();
    if !assets_exists {
        warnings.push(
            "assets/ is missing; conversion requires at least one dated assets folder".to_string(),
        );
    }
    if !json_exists {
        warnings.push("discussions/json/ is missing; nothing to convert".to_string());
    }

    RuntimeStatus {
        archive_root_exists,
        assets_exists,
        json_exists,
        markdown_exists,
        config_exists,
        warnings,
    }
}
