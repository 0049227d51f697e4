//! Filepath: src/core/corpus.rs
//! Load discovered files into the ordered key -> text corpus the engine
//! consumes. Unreadable files become diagnostics and are left out.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::infra::io::read_text_lossy;
use crate::infra::paths::label_for;
use crate::parsers::strip::strip_source;

/// One file that could not be turned into a document.
#[derive(Debug, Clone, Error)]
#[error("failed to open file {}: {reason}", .path.display())]
pub struct LoadError
{
    pub path: PathBuf,
    pub reason: String,
}

/// Documents keyed by report label, in discovery order.
#[derive(Debug, Default)]
pub struct Corpus
{
    pub documents: IndexMap<String, String>,
    pub diagnostics: Vec<LoadError>,
}

/// How files are turned into document text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions<'a>
{
    /// Labels are made relative to this directory
    pub project_root: Option<&'a Path>,
    /// Strip comments/docstrings before comparing
    pub only_code: bool,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

/// Read `files` in parallel; document order follows `files`.
pub fn load(
    files: &[PathBuf],
    opts: LoadOptions<'_>,
) -> Corpus
{
    let pb = if opts.progress
    {
        let pb = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style.progress_chars("#>-"));
        pb
    }
    else
    {
        ProgressBar::hidden()
    };

    let loaded: Vec<Result<(String, String), LoadError>> = files
        .par_iter()
        .map(|path| {
            pb.inc(1);
            let text = read_text_lossy(path).map_err(|e| LoadError {
                path: path.clone(),
                reason: format!("{e:#}"),
            })?;

            let text = if opts.only_code
            {
                strip_source(path, &text).into_owned()
            }
            else
            {
                text
            };

            Ok((label_for(path, opts.project_root), text))
        })
        .collect();

    pb.finish_and_clear();

    let mut corpus = Corpus::default();
    for item in loaded
    {
        match item
        {
            Ok((label, text)) =>
            {
                debug!(%label, bytes = text.len(), "loaded document");
                corpus
                    .documents
                    .insert(label, text);
            }
            Err(err) =>
            {
                warn!("{err}");
                corpus
                    .diagnostics
                    .push(err);
            }
        }
    }

    info!(
        documents = corpus
            .documents
            .len(),
        failed = corpus
            .diagnostics
            .len(),
        "loaded corpus"
    );

    corpus
}
