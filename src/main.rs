//! worklens - indexes VS Code workspaces and git repositories.
//!
//! Usage:
//!   worklens [ROOTS...]          Flat list of discovered workspaces
//!   worklens tree [ROOTS...]     Condensed folder hierarchy
//!   worklens export [ROOTS...]   Export the snapshot to JSON
//!   worklens --help              Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use worklens_core::{DiscoveryConfig, normalize_lexically};
use worklens_engine::DiscoveryEngine;
use worklens_tree::{TreeItem, WorkspaceTree};

#[derive(Parser)]
#[command(
    name = "worklens",
    version,
    about = "Indexes VS Code workspace files and git repositories",
    long_about = "worklens walks your configured root directories looking for \
                  .code-workspace files and git-marked project folders, and \
                  presents them as a flat list or a condensed folder tree."
)]
struct Cli {
    /// Root directories to search (defaults to the current directory)
    #[arg(default_value = ".")]
    roots: Vec<PathBuf>,

    /// Maximum search depth below each root
    #[arg(short, long, global = true, default_value = "5")]
    depth: u32,

    /// Additional exclusion globs (appended to the built-in defaults)
    #[arg(short, long, global = true)]
    exclude: Vec<String>,

    /// Do not surface plain git repositories as workspaces
    #[arg(long, global = true)]
    no_repositories: bool,

    /// Maximum simultaneous directory reads
    #[arg(short, long, global = true, default_value = "16")]
    jobs: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the condensed folder hierarchy
    Tree {
        /// Root directories to search
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Keep every folder level instead of condensing chains
        #[arg(long)]
        no_condense: bool,
    },

    /// Export the snapshot to JSON
    Export {
        /// Root directories to search
        #[arg(default_value = ".")]
        roots: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Tree { roots, no_condense }) => {
            let config = build_config(&roots, &cli.exclude, cli.depth, cli.no_repositories, cli.jobs, !no_condense)?;
            run_tree(config).await
        }
        Some(Command::Export { roots, output }) => {
            let config = build_config(&roots, &cli.exclude, cli.depth, cli.no_repositories, cli.jobs, true)?;
            run_export(config, output).await
        }
        None => {
            let config = build_config(&cli.roots, &cli.exclude, cli.depth, cli.no_repositories, cli.jobs, true)?;
            run_list(config).await
        }
    }
}

/// Resolve roots and assemble the discovery configuration.
fn build_config(
    roots: &[PathBuf],
    extra_excludes: &[String],
    depth: u32,
    no_repositories: bool,
    jobs: usize,
    condense: bool,
) -> Result<DiscoveryConfig> {
    let roots: Vec<PathBuf> = roots.iter().map(|root| resolve_root(root)).collect::<Result<_>>()?;

    let mut exclude_patterns = worklens_core::default_exclude_patterns();
    exclude_patterns.extend(extra_excludes.iter().cloned());

    let config = DiscoveryConfig::builder()
        .roots(roots)
        .max_depth(depth)
        .exclude_patterns(exclude_patterns)
        .include_repositories(!no_repositories)
        .concurrency(jobs)
        .condense_folders(condense)
        .build()
        .map_err(|err| color_eyre::eyre::eyre!("invalid configuration: {err}"))?;
    Ok(config)
}

/// Expand `~` and absolutize without requiring the path to exist.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let expanded = match root.to_string_lossy().strip_prefix('~') {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(format!("{home}{rest}"))
        }
        None => root.to_path_buf(),
    };
    let absolute = std::path::absolute(&expanded)?;
    Ok(normalize_lexically(&absolute))
}

/// Print the flat, name-sorted workspace list.
async fn run_list(config: DiscoveryConfig) -> Result<()> {
    let engine = DiscoveryEngine::new(config)?;
    let snapshot = engine.entries(false).await;

    for entry in snapshot.iter() {
        let marker = if entry.is_repository() { "git" } else { " ws" };
        println!("[{marker}] {:<30} {}", entry.name, entry.path.display());
    }

    println!();
    println!(
        "{} workspace(s) in {:.2}s",
        snapshot.len(),
        snapshot.scan_duration.as_secs_f64()
    );
    if snapshot.has_warnings() {
        println!("{} warning(s) during scan", snapshot.warnings.len());
    }

    Ok(())
}

/// Print the condensed folder hierarchy.
async fn run_tree(config: DiscoveryConfig) -> Result<()> {
    let engine = DiscoveryEngine::new(config)?;
    let snapshot = engine.entries(false).await;

    let roots = engine.config().roots.clone();
    let condense = engine.config().condense_folders;
    let tree = WorkspaceTree::build(&snapshot, &roots, condense);

    print_items(&tree, &tree.top_level(), 0);

    println!();
    println!("{} workspace(s)", snapshot.len());

    Ok(())
}

fn print_items(tree: &WorkspaceTree, items: &[TreeItem], depth: usize) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            TreeItem::Folder { name, path } => {
                println!("{indent}▼ {name}/");
                print_items(tree, &tree.children_of(path), depth + 1);
            }
            TreeItem::Workspace(entry) => {
                let marker = if entry.is_repository() { "git" } else { " ws" };
                println!("{indent}  [{marker}] {}", entry.name);
            }
        }
    }
}

/// Export the snapshot to JSON.
async fn run_export(config: DiscoveryConfig, output: Option<PathBuf>) -> Result<()> {
    let engine = DiscoveryEngine::new(config)?;
    let snapshot = engine.entries(false).await;

    let json = serde_json::to_string_pretty(&*snapshot)?;
    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}
