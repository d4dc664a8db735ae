//! Command-line interface for doccheck.

use clap::{Parser, Subcommand};
use globset::GlobSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::analysis;
use crate::config::Config;
use crate::detect::{DetectionResult, Runner, ScopeSelector};
use crate::docs;
use crate::report;
use crate::vcs::{normalize_path, GitCli};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage", "vendor"];

/// Change-scoped JSDoc checker for JavaScript and TypeScript.
///
/// Flags named functions, variable-bound arrows and hooks that lack a
/// `/** ... */` comment, either across the whole source tree or only in code
/// that is new in the working tree or staged for commit.
#[derive(Parser)]
#[command(name = "doccheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides DOCCHECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check functions for JSDoc comments
    Check(CheckArgs),
    /// Generate API documentation from JSDoc comments
    Docs(DocsArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Path to check (default: the configured source root)
    pub path: Option<PathBuf>,

    /// Check every function (default)
    #[arg(short = 'f', long, conflicts_with_all = ["new", "staged"])]
    pub full: bool,

    /// Check only functions added relative to HEAD
    #[arg(short = 'n', long, conflicts_with = "staged")]
    pub new: bool,

    /// Check only functions in staged changes
    #[arg(short = 's', long)]
    pub staged: bool,

    /// Output format: pretty or json
    #[arg(long, default_value = "pretty")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl CheckArgs {
    /// Mode selected by flags, if any.
    pub fn selector(&self) -> Option<ScopeSelector> {
        if self.staged {
            Some(ScopeSelector::Staged)
        } else if self.new {
            Some(ScopeSelector::New)
        } else if self.full {
            Some(ScopeSelector::Full)
        } else {
            None
        }
    }
}

/// Arguments for the docs command.
#[derive(Parser)]
pub struct DocsArgs {
    /// Directory to scan (default: the configured source root)
    pub path: Option<PathBuf>,

    /// README file to update (default: from config, README.md)
    #[arg(long)]
    pub readme: Option<PathBuf>,

    /// Print the generated section instead of updating the README
    #[arg(long)]
    pub stdout: bool,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Collect supported source files under `root`.
pub fn collect_files(root: &Path, config: &Config, excluded: &GlobSet) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if is_candidate(path, root, config, excluded) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

fn is_candidate(path: &Path, base: &Path, config: &Config, excluded: &GlobSet) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !analysis::is_supported(path) || !config.includes_extension(ext) {
        return false;
    }
    let rel = path.strip_prefix(base).unwrap_or(path);
    !(excluded.is_match(path) || excluded.is_match(normalize_path(&rel.to_string_lossy())))
}

/// Load the config, reporting failures on stderr.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> Option<Config> {
    match Config::load(explicit, cwd) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error: {}", e);
            None
        }
    }
}

/// `source_root` relative to the repository root, `/`-separated.
fn repo_relative(dir: &Path, repo_root: &Path) -> Option<String> {
    let dir = dir.canonicalize().ok()?;
    let repo_root = repo_root.canonicalize().ok()?;
    dir.strip_prefix(&repo_root)
        .ok()
        .map(|rel| normalize_path(&rel.to_string_lossy()))
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let cwd = std::env::current_dir()?;
    let Some(config) = load_config(args.config.as_deref(), &cwd) else {
        return Ok(EXIT_ERROR);
    };
    let excluded = config.excluded_matcher()?;
    let mode = args.selector().unwrap_or(config.mode);

    let target = args
        .path
        .clone()
        .unwrap_or_else(|| cwd.join(&config.source_root));
    let path_str = args
        .path
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| config.source_root.clone());

    let git = GitCli::new(&cwd)
        .program(config.git.program.clone())
        .timeout(config.git.timeout())
        .discover();
    let repo_root = git.root().to_path_buf();
    debug!(root = %repo_root.display(), %mode, "starting check");

    let source_root = repo_relative(&cwd.join(&config.source_root), &repo_root);
    let runner = Runner::new(&repo_root, mode, &git).source_root(source_root.as_deref());

    let files = match mode {
        ScopeSelector::Full => {
            let abs_path = match target.canonicalize() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: cannot access path {:?}: {}", target, e);
                    return Ok(EXIT_ERROR);
                }
            };
            if abs_path.is_dir() {
                collect_files(&abs_path, &config, &excluded)?
            } else {
                vec![abs_path]
            }
        }
        ScopeSelector::New | ScopeSelector::Staged => {
            let within = args.path.as_ref().and_then(|p| p.canonicalize().ok());
            runner
                .changed_files()
                .into_iter()
                .filter(|f| is_candidate(f, &repo_root, &config, &excluded))
                .filter(|f| within.as_ref().map(|w| f.starts_with(w)).unwrap_or(true))
                .collect()
        }
    };

    if files.is_empty() {
        let result = DetectionResult::new(mode);
        match args.format.as_str() {
            "json" => report::write_json(&path_str, &result)?,
            _ => match mode {
                ScopeSelector::Full => eprintln!("Warning: no files to scan"),
                _ => println!("✓ No changed JS/TS files to check ({})", report::mode_description(mode)),
            },
        }
        return Ok(EXIT_SUCCESS);
    }

    info!(files = files.len(), "scanning");
    let result = runner.run(&files)?;

    match args.format.as_str() {
        "json" => report::write_json(&path_str, &result)?,
        _ => report::write_pretty(&path_str, &result)?,
    }

    if result.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Run the docs command.
pub fn run_docs(args: &DocsArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let Some(config) = load_config(args.config.as_deref(), &cwd) else {
        return Ok(EXIT_ERROR);
    };
    let excluded = config.excluded_matcher()?;

    let target = args
        .path
        .clone()
        .unwrap_or_else(|| cwd.join(&config.source_root));

    let files = if target.is_dir() {
        collect_files(&target, &config, &excluded)?
    } else if target.is_file() {
        vec![target.clone()]
    } else {
        eprintln!(
            "Warning: {} not found, generating empty documentation",
            target.display()
        );
        Vec::new()
    };

    let entries = docs::extract_all(&files, &cwd);
    let section = docs::render_section(&config.docs.heading, &entries);

    if args.stdout {
        print!("{}", section);
        return Ok(EXIT_SUCCESS);
    }

    let readme = args
        .readme
        .clone()
        .unwrap_or_else(|| cwd.join(&config.docs.readme));
    docs::update_readme(&readme, &config.docs.heading, &entries)?;
    println!(
        "Found {} documented functions in {} files; updated {}",
        entries.len(),
        files.len(),
        readme.display()
    );
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args)
    }

    fn check_args(cli: Cli) -> CheckArgs {
        match cli.command {
            Commands::Check(args) => args,
            Commands::Docs(_) => panic!("expected check"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_mode_flags() {
        let args = check_args(parse(&["doccheck", "check"]).unwrap());
        assert_eq!(args.selector(), None);

        let args = check_args(parse(&["doccheck", "check", "-n"]).unwrap());
        assert_eq!(args.selector(), Some(ScopeSelector::New));

        let args = check_args(parse(&["doccheck", "check", "--staged", "lib"]).unwrap());
        assert_eq!(args.selector(), Some(ScopeSelector::Staged));
        assert_eq!(args.path, Some(PathBuf::from("lib")));

        let args = check_args(parse(&["doccheck", "check", "--full"]).unwrap());
        assert_eq!(args.selector(), Some(ScopeSelector::Full));
    }

    #[test]
    fn test_conflicting_mode_flags() {
        assert!(parse(&["doccheck", "check", "-n", "-s"]).is_err());
        assert!(parse(&["doccheck", "check", "-f", "--new"]).is_err());
    }

    #[test]
    fn test_collect_files() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for rel in [
            "a.ts",
            "b.jsx",
            "types.d.ts",
            "notes.md",
            "nested/c.mjs",
            "nested/c.test.ts",
            "node_modules/dep/index.js",
            ".cache/x.ts",
            "dist/out.js",
        ] {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "").unwrap();
        }

        let config = Config::parse("excluded_paths: ['**/*.test.ts']").unwrap();
        let excluded = config.excluded_matcher().unwrap();
        let files = collect_files(root, &config, &excluded).unwrap();
        let mut names: Vec<_> = files
            .iter()
            .map(|f| normalize_path(&f.strip_prefix(root).unwrap().to_string_lossy()))
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.ts", "b.jsx", "nested/c.mjs"]);
    }
}
