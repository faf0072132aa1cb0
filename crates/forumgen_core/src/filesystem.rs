use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::ConvertOptions;
use crate::convert::{ConvertedDiscussion, convert_discussion};
use crate::posts::RawDiscussion;
use crate::runtime::ResolvedPaths;

/// Dated media folder names, e.g. `2022-07-01`.
fn dated_folder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("dated folder pattern"))
}

/// Immediate children of the assets folder whose names are dated folders,
/// sorted. Missing or unreadable assets folder is an error; an empty result
/// is left to the caller (preflight treats it as fatal, status reports it).
pub fn discover_asset_dirs(assets_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(assets_dir)
        .with_context(|| format!("failed to read assets folder {}", assets_dir.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read assets folder {}", assets_dir.display()))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if path.is_dir() && dated_folder().is_match(name) {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Distinct asset files under the dated folders.
pub fn collect_source_assets(asset_dirs: &[PathBuf]) -> Result<BTreeSet<PathBuf>> {
    let mut assets = BTreeSet::new();
    for dir in asset_dirs {
        for entry in WalkDir::new(dir).min_depth(1) {
            let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
            if entry.file_type().is_file() {
                assets.insert(entry.into_path());
            }
        }
    }
    Ok(assets)
}

/// Discussion JSON files, sorted by path.
pub fn discover_discussions(json_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(json_dir)
        .with_context(|| format!("failed to read discussions folder {}", json_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("failed to read discussions folder {}", json_dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub fn load_discussion(path: &Path) -> Result<RawDiscussion> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read discussion {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse discussion {}", path.display()))
}

/// Write page documents as 1-based `page-NNNNN.md` files under `dest_dir`.
pub fn write_pages(dest_dir: &Path, pages: &[String]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("failed to create {}", dest_dir.display()))?;

    let mut written = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let path = dest_dir.join(format!("page-{:05}.md", index + 1));
        fs::write(&path, page).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    pub links_created: usize,
    pub placeholders_created: usize,
}

/// Link every referenced asset from the archive into the destination folder.
///
/// A missing source file gets an empty placeholder first, so the link always
/// resolves (some archives reference media that was never exported). An
/// already-existing destination is an error: each run regenerates the output
/// tree from scratch.
pub fn link_assets(
    archive_root: &Path,
    dest_dir: &Path,
    assets: &BTreeSet<String>,
) -> Result<LinkReport> {
    let mut report = LinkReport::default();
    for asset in assets {
        let source = archive_root.join(asset);
        let dest = dest_dir.join(asset);

        if !source.exists() {
            if let Some(parent) = source.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&source, "")
                .with_context(|| format!("failed to create placeholder {}", source.display()))?;
            report.placeholders_created += 1;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        symlink_file(&source, &dest).with_context(|| {
            format!("failed to link {} -> {}", dest.display(), source.display())
        })?;
        report.links_created += 1;
    }
    Ok(report)
}

#[cfg(unix)]
fn symlink_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(windows)]
fn symlink_file(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(source, dest)
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscussionOutcome {
    pub slug: String,
    pub dest: String,
    pub pages_written: usize,
    pub assets_linked: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub asset_dirs: usize,
    pub source_assets: usize,
    pub discussions: usize,
    pub pages_written: usize,
    pub links_created: usize,
    pub placeholders_created: usize,
    pub outcomes: Vec<DiscussionOutcome>,
}

/// Convert every discussion under the archive root into paginated Markdown.
///
/// Preflight validates the page size and requires at least one dated assets
/// folder before any discussion is touched. Each discussion then goes
/// load -> convert -> write pages -> link assets; the first failure aborts
/// the run with the offending discussion named in the error chain.
pub fn convert_archive(paths: &ResolvedPaths, options: &ConvertOptions) -> Result<ConvertReport> {
    options.validate()?;

    let asset_dirs = discover_asset_dirs(&paths.assets_dir)?;
    if asset_dirs.is_empty() {
        bail!(
            "no valid assets found; ensure a dated folder (ex. 2022-07-01) is in {}",
            paths.assets_dir.display()
        );
    }
    let source_assets = collect_source_assets(&asset_dirs)?;
    let discussion_files = discover_discussions(&paths.json_dir)?;

    let mut report = ConvertReport {
        asset_dirs: asset_dirs.len(),
        source_assets: source_assets.len(),
        discussions: discussion_files.len(),
        pages_written: 0,
        links_created: 0,
        placeholders_created: 0,
        outcomes: Vec::with_capacity(discussion_files.len()),
    };

    for path in &discussion_files {
        let record = load_discussion(path)?;
        let converted = convert_discussion(&record, options)
            .with_context(|| format!("failed to convert discussion {}", path.display()))?;

        let dest_dir = destination_dir(&paths.markdown_dir, &converted);
        let written = write_pages(&dest_dir, &converted.pages)?;
        let links = link_assets(&paths.archive_root, &dest_dir, &converted.assets)?;

        report.pages_written += written.len();
        report.links_created += links.links_created;
        report.placeholders_created += links.placeholders_created;
        report.outcomes.push(DiscussionOutcome {
            slug: record.slug.clone(),
            dest: converted.dest_segments.join("/"),
            pages_written: written.len(),
            assets_linked: links.links_created,
        });
    }

    Ok(report)
}

fn destination_dir(markdown_dir: &Path, converted: &ConvertedDiscussion) -> PathBuf {
    let mut dir = markdown_dir.to_path_buf();
    for segment in &converted.dest_segments {
        dir.push(segment);
    }
    dir
}
