//! Filepath: src/core/scan.rs
//! The `scan` command: discovery -> loading -> engine -> reports.
//!
//! `scan` is the library entry point and never prints; `run` merges the
//! CLI over the configuration, renders reports and maps the run onto an
//! `Outcome` for the exit status.

use std::path::PathBuf;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::{info, instrument};

use super::corpus::{self, LoadError, LoadOptions};
use super::discover::{DiscoveryRequest, ScanError, Sources, discover, resolve_project_root};
use super::engine::{Detection, SimilarityEngine};
use super::rank::{Outcome, ThresholdPolicy};
use super::tfidf::IdfWeighting;
use crate::cli::{AppContext, ScanArgs};
use crate::infra::config::{Config, load_config_or_default};
use crate::report;

/// Fully resolved inputs of one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions
{
    pub request: DiscoveryRequest,
    pub project_root: Option<PathBuf>,
    pub only_code: bool,
    pub weighting: IdfWeighting,
    pub policy: ThresholdPolicy,
    pub progress: bool,
}

/// Everything a finished scan produced.
#[derive(Debug)]
pub struct ScanReport
{
    /// Files that were discovered, before loading
    pub files: Vec<PathBuf>,
    /// Files excluded because they could not be read
    pub diagnostics: Vec<LoadError>,
    pub detection: Detection,
}

/// Discover, load and score. Every error is a BAD_INPUT condition.
#[instrument(skip_all, fields(only_code = opts.only_code))]
pub fn scan(opts: &ScanOptions) -> Result<ScanReport, ScanError>
{
    let project_root = resolve_project_root(
        opts.project_root
            .as_deref(),
    )?;
    let files = discover(&opts.request)?;

    let corpus = corpus::load(
        &files,
        LoadOptions {
            project_root: project_root.as_deref(),
            only_code: opts.only_code,
            progress: opts.progress,
        },
    );

    let readable = corpus
        .documents
        .len();
    if readable < 2
    {
        return Err(ScanError::NotEnoughReadable { readable, found: files.len() });
    }

    let engine = SimilarityEngine::fit(&corpus.documents, opts.weighting)?;
    let detection = engine.detect(&opts.policy)?;

    info!(
        documents = readable,
        pairs = detection
            .similarity
            .pair_count(),
        outcome = ?detection.outcome,
        "scan finished"
    );

    Ok(ScanReport { files, diagnostics: corpus.diagnostics, detection })
}

impl ScanOptions
{
    /// CLI flags override configuration values.
    pub fn from_args(
        args: &ScanArgs,
        cfg: &Config,
        progress: bool,
    ) -> Self
    {
        let sources = if args
            .files
            .is_empty()
        {
            Sources::Directories(
                args.directories
                    .clone(),
            )
        }
        else
        {
            Sources::Files(
                args.files
                    .clone(),
            )
        };

        Self {
            request: DiscoveryRequest {
                sources,
                ignore_directories: args
                    .ignore_directories
                    .clone(),
                ignore_files: args
                    .ignore_files
                    .clone(),
                extensions: args
                    .file_extensions
                    .clone()
                    .unwrap_or_else(|| {
                        cfg.file_extensions
                            .clone()
                    }),
                ignore_patterns: cfg
                    .ignore_patterns
                    .clone(),
                respect_gitignore: cfg.respect_gitignore && !args.no_gitignore,
            },
            project_root: args
                .project_root_dir
                .clone(),
            only_code: cfg.only_code || args.only_code,
            weighting: args
                .idf
                .unwrap_or(cfg.idf_weighting),
            policy: ThresholdPolicy {
                fail_threshold: args
                    .fail_threshold
                    .unwrap_or(cfg.fail_threshold),
                ignore_threshold: args
                    .ignore_threshold
                    .unwrap_or(cfg.ignore_threshold),
            },
            progress,
        }
    }
}

pub fn run(
    args: ScanArgs,
    ctx: &AppContext,
) -> Result<Outcome>
{
    let cfg = load_config_or_default();
    let opts = ScanOptions::from_args(&args, &cfg, !ctx.quiet && !args.json);
    let color = !ctx.no_color;

    if ctx.dry_run
    {
        return dry_run(&opts, ctx);
    }

    let scanned = match scan(&opts)
    {
        Ok(scanned) => scanned,
        Err(err) =>
        {
            eprintln!("error: {err}");
            return Ok(Outcome::BadInput);
        }
    };

    let detection = &scanned.detection;
    let json_output = args
        .json_output
        .unwrap_or(
            cfg.report
                .json_output,
        );

    if args.json
    {
        report::json::write(
            &detection.similarity,
            cfg.report
                .json_min_similarity,
            &json_output,
        )?;
        if !ctx.quiet
        {
            let tick = if color { "✓".green().to_string() } else { "✓".to_string() };
            eprintln!("{tick} Wrote JSON report to {}", json_output.display());
        }
    }
    else if !ctx.quiet
    {
        print!("{}", report::console::render(&detection.similarity, color));
    }

    if let Some(path) = &args.markdown
    {
        let url_prefix = args
            .url_prefix
            .as_deref()
            .unwrap_or(&cfg.report.url_prefix);
        let warn = args
            .warn_threshold
            .unwrap_or(cfg.report.warn_threshold);
        let body = report::markdown::render(&detection.similarity, url_prefix, warn);
        std::fs::write(path, body)
            .with_context(|| format!("Failed to write Markdown report to {}", path.display()))?;
    }

    if detection.outcome == Outcome::ThresholdExceeded
    {
        let line = "Code duplication threshold exceeded. Please consult logs.";
        if color
        {
            eprintln!("{}", line.red());
        }
        else
        {
            eprintln!("{line}");
        }
    }

    Ok(detection.outcome)
}

/// List what would be compared, without loading or scoring.
fn dry_run(
    opts: &ScanOptions,
    ctx: &AppContext,
) -> Result<Outcome>
{
    let files = match resolve_project_root(
        opts.project_root
            .as_deref(),
    )
    .and_then(|_| discover(&opts.request))
    {
        Ok(files) => files,
        Err(err) =>
        {
            eprintln!("error: {err}");
            return Ok(Outcome::BadInput);
        }
    };

    if !ctx.quiet
    {
        let banner = format!("DRY RUN: Would compare {} files:", files.len());
        if ctx.no_color
        {
            println!("{banner}");
        }
        else
        {
            println!("{}", banner.yellow());
        }
        for file in &files
        {
            println!("  {}", file.display());
        }
    }

    Ok(Outcome::Success)
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn options(dir: &TempDir) -> ScanOptions
    {
        ScanOptions {
            request: DiscoveryRequest {
                sources: Sources::Directories(vec![dir.path().to_path_buf()]),
                ignore_directories: Vec::new(),
                ignore_files: Vec::new(),
                extensions: vec!["py".into()],
                ignore_patterns: Vec::new(),
                respect_gitignore: true,
            },
            project_root: Some(dir.path().to_path_buf()),
            only_code: false,
            weighting: IdfWeighting::Smoothed,
            policy: ThresholdPolicy::default(),
            progress: false,
        }
    }

    fn scenario() -> TempDir
    {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path()
                .join("a.py"),
            "def foo():\n    return 1\n",
        )
        .unwrap();
        fs::write(
            tmp.path()
                .join("b.py"),
            "def foo():\n    return 1\n",
        )
        .unwrap();
        fs::write(
            tmp.path()
                .join("c.py"),
            "class X: pass\n",
        )
        .unwrap();
        tmp
    }

    #[test]
    fn labels_are_relative_to_project_root()
    {
        let tmp = scenario();
        let report = scan(&options(&tmp)).unwrap();
        let result = &report
            .detection
            .similarity;

        assert_eq!(
            result
                .iter()
                .map(|(k, _)| k.as_str())
                .collect::<Vec<_>>(),
            vec!["a.py", "b.py", "c.py"]
        );
        assert!(result.get("a.py", "b.py").unwrap() > 90.0);
        assert!(result.get("a.py", "c.py").unwrap() < 1.0);
        assert_eq!(report.detection.outcome, Outcome::Success);
    }

    #[test]
    fn fail_threshold_marks_the_run()
    {
        let tmp = scenario();
        let mut opts = options(&tmp);
        opts.policy.fail_threshold = 50;

        let report = scan(&opts).unwrap();
        assert_eq!(report.detection.outcome, Outcome::ThresholdExceeded);
    }

    #[test]
    fn invalid_project_root_is_rejected()
    {
        let tmp = scenario();
        let mut opts = options(&tmp);
        opts.project_root = Some(
            tmp.path()
                .join("missing"),
        );

        assert!(matches!(scan(&opts), Err(ScanError::InvalidProjectRoot(_))));
    }

    #[test]
    fn cli_overrides_config()
    {
        let args = ScanArgs {
            directories: vec!["src".into()],
            files: Vec::new(),
            ignore_directories: Vec::new(),
            ignore_files: Vec::new(),
            project_root_dir: None,
            file_extensions: Some(vec!["rs".into()]),
            fail_threshold: Some(70),
            ignore_threshold: None,
            only_code: false,
            no_gitignore: true,
            json: false,
            json_output: None,
            markdown: None,
            url_prefix: None,
            warn_threshold: None,
            idf: None,
        };
        let cfg = Config { ignore_threshold: 15, only_code: true, ..Config::default() };

        let opts = ScanOptions::from_args(&args, &cfg, false);
        assert_eq!(opts.request.extensions, vec!["rs".to_string()]);
        assert_eq!(opts.policy, ThresholdPolicy { fail_threshold: 70, ignore_threshold: 15 });
        assert!(!opts.request.respect_gitignore);
        assert!(opts.only_code);
        assert_eq!(opts.weighting, IdfWeighting::Smoothed);
        assert!(matches!(opts.request.sources, Sources::Directories(_)));
    }
}
