//! CLI configuration and runtime settings for the static asset copy.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Output directory below the web root
const DEFAULT_OUTPUT: &[&str] = &["public", "app-store"];

/// Source directory relative to the monorepo root
const DEFAULT_SOURCE: &[&str] = &["packages", "app-store"];

/// Copy app-store static assets into the public directory
#[derive(Parser, Debug)]
#[command(name = "app-store-static")]
#[command(version)]
#[command(about = "Copy app-store static assets into the public directory and hash icon SVGs")]
pub struct Cli {
    /// Web app directory (holds public/, two levels below the repo root)
    #[arg(default_value = ".")]
    pub web_root: PathBuf,

    /// Directory scanned for static folders [default: <WEB_ROOT>/../../packages/app-store]
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Directory receiving the copies [default: <WEB_ROOT>/public/app-store]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of copy workers (0 = one per CPU)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Show a progress bar and overwrite notices
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Do not print a line per copied file
    #[arg(short, long)]
    pub quiet: bool,
}

/// Runtime configuration parsed from CLI
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for static folders
    pub source_root: PathBuf,
    /// Directory receiving the copies and the manifest
    pub output_root: PathBuf,
    /// Number of copy workers, at least 1
    pub jobs: usize,
    /// Show a progress bar and overwrite notices
    pub verbose: bool,
    /// Suppress per-file lines
    pub quiet: bool,
}

impl Config {
    /// Create Config from CLI arguments
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let needs_web_root = cli.source.is_none() || cli.output.is_none();
        if needs_web_root && !cli.web_root.is_dir() {
            anyhow::bail!("Web root not found: {}", cli.web_root.display());
        }

        let web_root = cli.web_root.canonicalize().unwrap_or(cli.web_root);

        let source_root = cli
            .source
            .unwrap_or_else(|| default_source_root(&web_root));
        let output_root = cli
            .output
            .unwrap_or_else(|| join_all(&web_root, DEFAULT_OUTPUT));

        let jobs = match cli.jobs {
            0 => num_cpus::get(),
            n => n,
        };

        Ok(Config {
            source_root,
            output_root,
            jobs: jobs.max(1),
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }
}

fn join_all(base: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(base.to_path_buf(), |path, part| path.join(part))
}

/// `<web_root>/../../packages/app-store`, without `..` where the web root allows
fn default_source_root(web_root: &Path) -> PathBuf {
    let repo_root = match web_root.ancestors().nth(2) {
        Some(root) if !root.as_os_str().is_empty() => root.to_path_buf(),
        _ => web_root.join("..").join(".."),
    };
    join_all(&repo_root, DEFAULT_SOURCE)
}
