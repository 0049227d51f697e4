use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cli::{AppContext, InitArgs};
use crate::core::tfidf::IdfWeighting;

/// Extensions scanned when none are configured
pub const DEFAULT_EXTENSIONS: [&str; 7] = ["h", "c", "cpp", "cc", "java", "py", "cs"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Maximum allowed similarity (%) before the run fails
    pub fail_threshold: i32,

    /// Similarities (%) below this are not reported
    pub ignore_threshold: i32,

    /// File extensions to compare (without the dot)
    pub file_extensions: Vec<String>,

    /// Extra ignore globs, relative to each scanned directory
    pub ignore_patterns: Vec<String>,

    /// Honor .gitignore files while walking directories
    pub respect_gitignore: bool,

    /// Strip comments and docstrings before comparing
    pub only_code: bool,

    /// IDF formula: "smoothed" or "standard"
    pub idf_weighting: IdfWeighting,

    /// Report output settings
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig
{
    /// Where `--json` writes its report
    pub json_output: PathBuf,

    /// Minimum similarity (%) kept in the JSON report
    pub json_min_similarity: f64,

    /// Markdown rows at or above this similarity (%) get a warning marker
    pub warn_threshold: i32,

    /// Prefix turning a file label into a link in Markdown reports
    pub url_prefix: String,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            fail_threshold: 100,
            ignore_threshold: 0,
            file_extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            ignore_patterns: vec![
                "**/node_modules/**".to_string(),
                "**/target/**".to_string(),
                "**/__pycache__/**".to_string(),
            ],
            respect_gitignore: true,
            only_code: false,
            idf_weighting: IdfWeighting::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for ReportConfig
{
    fn default() -> Self
    {
        Self {
            json_output: PathBuf::from("result.json"),
            json_min_similarity: 50.0,
            warn_threshold: 100,
            url_prefix: String::new(),
        }
    }
}

/// Config files probed in the working directory, in priority order
const CONFIG_PATHS: [&str; 4] = ["twinscan.toml", "twinscan.yaml", "twinscan.json", ".twinscan.toml"];

pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Layer the first config file found in `dir` and `TWINSCAN_*` environment
/// variables (nested keys use `__`, e.g. `TWINSCAN_REPORT__URL_PREFIX`).
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    for name in &CONFIG_PATHS
    {
        let path = dir.join(name);
        if path.exists()
        {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    // Add environment variables with TWINSCAN_ prefix
    builder = builder.add_source(
        config::Environment::with_prefix("TWINSCAN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

/// Load configuration, falling back to defaults on error.
pub fn load_config_or_default() -> Config
{
    match load_config()
    {
        Ok(cfg) => cfg,
        Err(err) =>
        {
            warn!("{err:#}; using default configuration");
            Config::default()
        }
    }
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("twinscan.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("Would write {}:\n{}", config_path.display(), toml_string);
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
