//! Filepath: src/core/discover.rs
//! Turn `--directories`/`--files` plus ignore lists into the sorted set of
//! files to compare. Every rejection here is a BAD_INPUT outcome.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use super::EngineError;
use crate::infra::paths::normalize;
use crate::infra::walk::FileWalker;

/// Input rejected before (or while) the corpus is scored.
#[derive(Debug, Error)]
pub enum ScanError
{
    #[error("Path does not exist or is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Too few files to compare, you need to supply at least 2")]
    TooFewFiles,

    #[error("Supplied file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Not enough source code files found")]
    NotEnoughFiles,

    #[error("The project root directory does not exist or is not a directory: {}", .0.display())]
    InvalidProjectRoot(PathBuf),

    #[error("Not enough readable source files: {readable} of {found} could be loaded")]
    NotEnoughReadable
    {
        readable: usize,
        found: usize,
    },

    #[error("invalid ignore pattern: {0:#}")]
    InvalidPattern(anyhow::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Where the candidate files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sources
{
    Directories(Vec<PathBuf>),
    Files(Vec<PathBuf>),
}

/// Everything discovery needs; built by the scan command from CLI + config.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest
{
    pub sources: Sources,
    pub ignore_directories: Vec<PathBuf>,
    pub ignore_files: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub ignore_patterns: Vec<String>,
    pub respect_gitignore: bool,
}

impl DiscoveryRequest
{
    fn walker(&self) -> Result<FileWalker, ScanError>
    {
        Ok(FileWalker::new(&self.ignore_patterns)
            .map_err(ScanError::InvalidPattern)?
            .with_extensions(&self.extensions)
            .with_gitignore(self.respect_gitignore))
    }
}

/// Resolve the request into at least two normalized, sorted, unique paths.
#[instrument(skip_all)]
pub fn discover(request: &DiscoveryRequest) -> Result<Vec<PathBuf>, ScanError>
{
    let walker = request.walker()?;

    let mut files: BTreeSet<PathBuf> = match &request.sources
    {
        Sources::Directories(dirs) =>
        {
            let mut found = BTreeSet::new();
            for dir in dirs
            {
                if !dir.is_dir()
                {
                    return Err(ScanError::NotADirectory(dir.clone()));
                }
                let root = normalize(dir);
                found.extend(walker.walk_files(&root));
            }
            found
        }
        Sources::Files(files) =>
        {
            if files.len() < 2
            {
                return Err(ScanError::TooFewFiles);
            }
            let mut found = BTreeSet::new();
            for file in files
            {
                if !file.is_file()
                {
                    return Err(ScanError::MissingFile(file.clone()));
                }
                found.insert(normalize(file));
            }
            found
        }
    };

    // Ignored directories only apply to directory mode; explicit files win
    if matches!(request.sources, Sources::Directories(_))
    {
        for dir in request
            .ignore_directories
            .iter()
            .filter(|d| d.is_dir())
        {
            for ignored in walker.walk_files(normalize(dir))
            {
                files.remove(&ignored);
            }
        }
    }
    for file in &request.ignore_files
    {
        files.remove(&normalize(file));
    }

    debug!(count = files.len(), "discovered source files");

    if files.len() < 2
    {
        return Err(ScanError::NotEnoughFiles);
    }

    Ok(files
        .into_iter()
        .collect())
}

/// Validate `--project-root-dir` and return its normalized form.
pub fn resolve_project_root(root: Option<&Path>) -> Result<Option<PathBuf>, ScanError>
{
    match root
    {
        None => Ok(None),
        Some(dir) if dir.is_dir() => Ok(Some(normalize(dir))),
        Some(dir) => Err(ScanError::InvalidProjectRoot(dir.to_path_buf())),
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn tree(files: &[&str]) -> TempDir
    {
        let tmp = TempDir::new().unwrap();
        for rel in files
        {
            let path = tmp
                .path()
                .join(rel);
            fs::create_dir_all(
                path.parent()
                    .unwrap(),
            )
            .unwrap();
            fs::write(path, "x = 1\n").unwrap();
        }
        tmp
    }

    fn request(sources: Sources) -> DiscoveryRequest
    {
        DiscoveryRequest {
            sources,
            ignore_directories: Vec::new(),
            ignore_files: Vec::new(),
            extensions: vec!["py".into(), "c".into()],
            ignore_patterns: Vec::new(),
            respect_gitignore: true,
        }
    }

    fn names(paths: &[PathBuf]) -> Vec<String>
    {
        paths
            .iter()
            .map(|p| {
                p.file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn directories_are_walked_filtered_and_sorted()
    {
        let tmp = tree(&["b.py", "a.c", "notes.txt", "pkg/c.py"]);
        let files = discover(&request(Sources::Directories(vec![tmp.path().into()]))).unwrap();

        assert_eq!(names(&files), vec!["a.c", "b.py", "c.py"]);
        assert!(
            files
                .iter()
                .all(|p| p.is_absolute())
        );
    }

    #[test]
    fn ignored_directories_and_files_are_subtracted()
    {
        let tmp = tree(&["a.py", "b.py", "c.py", "vendor/v.py"]);
        let mut req = request(Sources::Directories(vec![tmp.path().into()]));
        req.ignore_directories = vec![
            tmp.path()
                .join("vendor"),
        ];
        req.ignore_files = vec![
            tmp.path()
                .join("c.py"),
        ];

        assert_eq!(names(&discover(&req).unwrap()), vec!["a.py", "b.py"]);
    }

    #[test]
    fn ignored_directories_do_not_apply_to_file_mode()
    {
        let tmp = tree(&["vendor/a.py", "vendor/b.py"]);
        let mut req = request(Sources::Files(vec![
            tmp.path()
                .join("vendor/a.py"),
            tmp.path()
                .join("vendor/b.py"),
        ]));
        req.ignore_directories = vec![
            tmp.path()
                .join("vendor"),
        ];

        assert_eq!(names(&discover(&req).unwrap()), vec!["a.py", "b.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_and_its_target_are_two_files()
    {
        let tmp = tree(&["target.py"]);
        let target = tmp
            .path()
            .join("target.py");
        let link = tmp
            .path()
            .join("link.py");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let files = discover(&request(Sources::Files(vec![link, target]))).unwrap();
        assert_eq!(names(&files), vec!["link.py", "target.py"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_in_a_directory_can_be_ignored()
    {
        let tmp = tree(&["a.py", "b.py"]);
        let link = tmp
            .path()
            .join("link.py");
        std::os::unix::fs::symlink(
            tmp.path()
                .join("a.py"),
            &link,
        )
        .unwrap();

        let mut req = request(Sources::Directories(vec![tmp.path().into()]));
        assert_eq!(names(&discover(&req).unwrap()), vec!["a.py", "b.py", "link.py"]);

        req.ignore_files = vec![link];
        assert_eq!(names(&discover(&req).unwrap()), vec!["a.py", "b.py"]);
    }

    #[test]
    fn missing_directory_is_bad_input()
    {
        let tmp = tree(&[]);
        let err = discover(&request(Sources::Directories(vec![
            tmp.path()
                .join("nope"),
        ])))
        .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[test]
    fn file_mode_requires_two_existing_files()
    {
        let tmp = tree(&["a.py", "b.py"]);
        let a = tmp
            .path()
            .join("a.py");

        assert!(matches!(
            discover(&request(Sources::Files(vec![a.clone()]))),
            Err(ScanError::TooFewFiles)
        ));
        assert!(matches!(
            discover(&request(Sources::Files(vec![
                a.clone(),
                tmp.path()
                    .join("zzz.py")
            ]))),
            Err(ScanError::MissingFile(_))
        ));

        let both = discover(&request(Sources::Files(vec![
            tmp.path()
                .join("b.py"),
            a,
        ])))
        .unwrap();
        assert_eq!(names(&both), vec!["a.py", "b.py"]);
    }

    #[test]
    fn single_surviving_file_is_not_enough()
    {
        let tmp = tree(&["only.py", "readme.md"]);
        assert!(matches!(
            discover(&request(Sources::Directories(vec![tmp.path().into()]))),
            Err(ScanError::NotEnoughFiles)
        ));
    }

    #[test]
    fn project_root_must_be_a_directory()
    {
        let tmp = tree(&["a.py"]);
        assert!(
            resolve_project_root(None)
                .unwrap()
                .is_none()
        );
        assert!(
            resolve_project_root(Some(tmp.path()))
                .unwrap()
                .is_some()
        );
        assert!(matches!(
            resolve_project_root(Some(
                &tmp.path()
                    .join("a.py")
            )),
            Err(ScanError::InvalidProjectRoot(_))
        ));
    }
}
