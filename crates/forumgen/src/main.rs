use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use forumgen_core::config::{ConvertOptions, DEFAULT_POSTS_PER_PAGE, load_config};
use forumgen_core::filesystem::{convert_archive, discover_asset_dirs, discover_discussions};
use forumgen_core::runtime::{PathOverrides, ResolvedPaths, RuntimeStatus, inspect_runtime, resolve_paths};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "forumgen",
    version,
    about = "Convert archived forum discussions into paginated Markdown"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH")]
    archive_root: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Print resolved runtime diagnostics")]
    diagnostics: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Convert(ConvertArgs),
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct ConvertArgs {
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_POSTS_PER_PAGE,
        help = "Number of posts per page of Markdown"
    )]
    posts_per_page: usize,
    #[arg(long, help = "Print the conversion report as JSON")]
    json: bool,
}

#[derive(Debug, Args)]
struct StatusArgs {
    #[arg(long, help = "Print the status as JSON")]
    json: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let overrides = PathOverrides {
        archive_root: cli.archive_root.clone(),
        config: cli.config.clone(),
    };

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(&overrides, cli.diagnostics, args),
        Some(Commands::Status(args)) => run_status(&overrides, cli.diagnostics, args),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn run_convert(overrides: &PathOverrides, diagnostics: bool, args: ConvertArgs) -> Result<()> {
    let paths = resolve_paths(overrides)?;
    let config = load_config(&paths.config_path)?;
    let options = ConvertOptions::new(args.posts_per_page, config);
    options.validate()?;

    let report = convert_archive(&paths, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("[INFO] Found {} assets subfolders", report.asset_dirs);
    println!("[INFO] Found {} unique assets", report.source_assets);
    println!("[INFO] Found {} discussions", report.discussions);
    for (index, outcome) in report.outcomes.iter().enumerate() {
        println!(
            "[{:>6.2}%] {} ({} pages, {} assets)",
            (index + 1) as f64 / report.outcomes.len() as f64 * 100.0,
            outcome.dest,
            outcome.pages_written,
            outcome.assets_linked,
        );
    }
    println!("pages_written: {}", report.pages_written);
    println!("links_created: {}", report.links_created);
    println!("placeholders_created: {}", report.placeholders_created);
    if diagnostics {
        println!("\n[diagnostics]\n{}", paths.diagnostics());
    }

    Ok(())
}

fn run_status(overrides: &PathOverrides, diagnostics: bool, args: StatusArgs) -> Result<()> {
    let paths = resolve_paths(overrides)?;
    let status = inspect_runtime(&paths);
    let summary = status_summary(&paths, &status)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("archive_root: {}", paths.archive_root.display());
    println!("assets_dir: {} (exists: {})", paths.assets_dir.display(), status.assets_exists);
    println!("json_dir: {} (exists: {})", paths.json_dir.display(), status.json_exists);
    println!(
        "markdown_dir: {} (exists: {})",
        paths.markdown_dir.display(),
        status.markdown_exists
    );
    println!(
        "config_path: {} (exists: {})",
        paths.config_path.display(),
        status.config_exists
    );
    println!("asset_dirs: {}", summary.asset_dirs);
    println!("discussions: {}", summary.discussions);
    if !status.warnings.is_empty() {
        println!("warnings:");
        for warning in &status.warnings {
            println!("  - {warning}");
        }
    }
    if diagnostics {
        println!("\n[diagnostics]\n{}", paths.diagnostics());
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusSummary {
    archive_root: String,
    assets_exists: bool,
    json_exists: bool,
    markdown_exists: bool,
    config_exists: bool,
    asset_dirs: usize,
    discussions: usize,
    warnings: Vec<String>,
}

fn status_summary(paths: &ResolvedPaths, status: &RuntimeStatus) -> Result<StatusSummary> {
    let asset_dirs = if status.assets_exists {
        discover_asset_dirs(&paths.assets_dir)?.len()
    } else {
        0
    };
    let discussions = if status.json_exists {
        discover_discussions(&paths.json_dir)?.len()
    } else {
        0
    };

    Ok(StatusSummary {
        archive_root: paths.archive_root.display().to_string(),
        assets_exists: status.assets_exists,
        json_exists: status.json_exists,
        markdown_exists: status.markdown_exists,
        config_exists: status.config_exists,
        asset_dirs,
        discussions,
        warnings: status.warnings.clone(),
    })
}
