//! Filepath: src/infra/walk.rs
//! Source file walker for duplicate detection.
//! - Respects .gitignore, .git/info/exclude, and global gitignore (opt-out)
//! - Extra ignore globs (early prune + late filter) on root-relative paths
//! - Extension allow-list ("py", "cpp", ...), compared as written
//! - Hidden files are walked; `.git` directories never are
//! - Deterministic ordering for stable reports
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use tracing::debug;

/// Gitignore-aware walker with extra ignore globs and an extension filter.
/// Extra globs are applied in two places:
///   1) Early: prune directories during traversal (filter_entry).
///   2) Late: filter out files that still slipped through.
pub struct FileWalker
{
    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Allowed extensions without the dot; empty means "any"
    extensions: HashSet<String>,

    /// Honor .gitignore and friends; default true
    respect_gitignore: bool,
}

impl FileWalker
{
    /// Build a walker with additional ignore patterns (e.g., "**/target/**",
    /// "**/*.min.js"). Patterns match paths relative to the walk root; a
    /// trailing `/**` also prunes the directory itself.
    pub fn new(additional_ignores: &[String]) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(Glob::new(pattern).with_context(|| format!("invalid ignore pattern '{pattern}'"))?);

            if let Some(dir) = pattern.strip_suffix("/**")
                && !dir.is_empty()
            {
                builder.add(Glob::new(dir).with_context(|| format!("invalid ignore pattern '{pattern}'"))?);
            }
        }

        Ok(Self {
            ignore_patterns: builder.build()?,
            extensions: HashSet::new(),
            respect_gitignore: true,
        })
    }

    /// Keep only files whose extension is in `extensions`.
    /// Leading dots are tolerated (".py" == "py").
    pub fn with_extensions<S: AsRef<str>>(
        mut self,
        extensions: &[S],
    ) -> Self
    {
        self.extensions = extensions
            .iter()
            .map(|e| {
                e.as_ref()
                    .trim_start_matches('.')
                    .to_string()
            })
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Honor or ignore .gitignore / .ignore rules (default true).
    pub fn with_gitignore(
        mut self,
        respect: bool,
    ) -> Self
    {
        self.respect_gitignore = respect;
        self
    }

    /// Whether `path` passes the extension filter.
    pub fn accepts_extension(
        &self,
        path: &Path,
    ) -> bool
    {
        if self
            .extensions
            .is_empty()
        {
            return true;
        }

        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| {
                self.extensions
                    .contains(e)
            })
    }

    /// Internal: construct a configured WalkBuilder for `root`.
    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        // Dotfiles are source too; only .git is pruned (below)
        b.hidden(false);

        // Ignore files apply even outside a git checkout
        let respect = self.respect_gitignore;
        b.git_ignore(respect);
        b.git_global(respect);
        b.git_exclude(respect);
        b.ignore(respect);
        b.parents(respect);
        b.require_git(false);

        // Early directory pruning using extra ignores (fast short-circuit).
        let extra = self
            .ignore_patterns
            .clone();
        let root_owned = root.to_path_buf();
        b.filter_entry(move |ent: &DirEntry| {
            // Be conservative on unknown types.
            let is_dir = ent
                .file_type()
                .map(|ft| ft.is_dir())
                .unwrap_or(false);
            if !is_dir
            {
                return true;
            }

            if ent.file_name() == ".git"
            {
                return false;
            }

            let rel = ent
                .path()
                .strip_prefix(&root_owned)
                .unwrap_or(ent.path());
            rel.as_os_str()
                .is_empty()
                || !extra.is_match(rel)
        });

        b
    }

    /// Traverse files under `root`, respecting ignore rules, extra globs and
    /// the extension filter. Returns a **sorted** list of file paths.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<PathBuf>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out: Vec<PathBuf> = walker
            .filter_map(|res| match res
            {
                Ok(entry) => Some(entry),
                Err(err) =>
                {
                    debug!(root = %root_path.display(), %err, "skipping unreadable entry");
                    None
                }
            })
            // Keep regular files and symlinks that point at one
            .filter(|entry| {
                entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()))
            })
            // Convert to owned path
            .map(|entry| entry.into_path())
            .filter(|abs| self.accepts_extension(abs))
            // Late file-level extra ignore filtering using RELATIVE path
            .filter(|abs| {
                let rel = abs
                    .strip_prefix(root_path)
                    .unwrap_or(abs);
                !self
                    .ignore_patterns
                    .is_match(rel)
            })
            .collect();

        // Deterministic order (stable reports & tests)
        out.sort();

        out
    }
}
