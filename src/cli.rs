use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand, ValueEnum};

use crate::core::tfidf::IdfWeighting;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext
{
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "twinscan")]
#[command(about = "Flag near-duplicate source files with TF-IDF cosine similarity")]
#[command(version, long_about = None)]
pub struct Cli
{
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands
{
    /// Compare source files and report pairwise similarity
    Scan(ScanArgs),

    /// Initialize a twinscan.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("sources")
        .required(true)
        .args(["directories", "files"]),
))]
pub struct ScanArgs
{
    /// Directories to scan recursively for source files
    #[arg(short, long, num_args = 1..)]
    pub directories: Vec<PathBuf>,

    /// Explicit files to compare (at least two)
    #[arg(short, long, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Directories whose files are excluded from the comparison (with --directories only)
    #[arg(long, num_args = 1..)]
    pub ignore_directories: Vec<PathBuf>,

    /// Files excluded from the comparison
    #[arg(long, num_args = 1..)]
    pub ignore_files: Vec<PathBuf>,

    /// Show file labels relative to this directory
    #[arg(long)]
    pub project_root_dir: Option<PathBuf>,

    /// Extensions to compare, without the dot (default: h c cpp cc java py cs)
    #[arg(long, num_args = 1..)]
    pub file_extensions: Option<Vec<String>>,

    /// Fail (exit 2) when any pair is more similar than this percentage
    #[arg(short = 't', long)]
    pub fail_threshold: Option<i32>,

    /// Omit pairs less similar than this percentage
    #[arg(long)]
    pub ignore_threshold: Option<i32>,

    /// Compare code only: strip comments and docstrings first
    #[arg(long)]
    pub only_code: bool,

    /// Do not honor .gitignore files while walking directories
    #[arg(long)]
    pub no_gitignore: bool,

    /// Write a JSON report instead of printing tables
    #[arg(short, long)]
    pub json: bool,

    /// Destination of the JSON report (default: result.json)
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Also write a Markdown report to this path
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// Prefix that turns file labels into links in the Markdown report
    #[arg(long)]
    pub url_prefix: Option<String>,

    /// Mark Markdown rows at or above this percentage with a warning
    #[arg(long)]
    pub warn_threshold: Option<i32>,

    /// IDF formula [default: smoothed]. Use `standard` for gensim's log2(N/df)
    /// weights, which reproduce the scores of the classic gensim-based
    /// duplicate-code-detection tool
    #[arg(long, value_enum)]
    pub idf: Option<IdfWeighting>,
}

#[derive(Debug, Parser)]
pub struct InitArgs
{
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell
{
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs
{
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
