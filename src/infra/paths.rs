//! Filepath: src/infra/paths.rs
//! Path normalization and report labels.

use std::path::{Component, Path, PathBuf};

use itertools::Itertools;

/// Absolute, lexically cleaned form of `path`. Symlinks are NOT resolved,
/// so a link and its target stay two distinct files; `.` and `..` are
/// folded without touching the filesystem. dunce keeps Windows paths free
/// of `\\?\`.
pub fn normalize(path: &Path) -> PathBuf
{
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    let mut out = PathBuf::new();
    for component in absolute.components()
    {
        match component
        {
            Component::CurDir => {}
            Component::ParentDir =>
            {
                // Never pops past the root
                if !out.pop()
                {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }

    dunce::simplified(&out).to_path_buf()
}

/// Report label for `path`: relative to `root` when it lives under it,
/// otherwise the full path. Separators are always `/`.
pub fn label_for(
    path: &Path,
    root: Option<&Path>,
) -> String
{
    let shown = root
        .and_then(|r| {
            path.strip_prefix(r)
                .ok()
        })
        .unwrap_or(path);

    let has_root = shown.has_root();
    let joined = shown
        .components()
        .filter_map(|c| match c
        {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::CurDir | Component::RootDir => None,
            Component::ParentDir => Some("..".into()),
            Component::Prefix(prefix) => Some(
                prefix
                    .as_os_str()
                    .to_string_lossy(),
            ),
        })
        .join("/");

    if has_root && !cfg!(windows) { format!("/{joined}") } else { joined }
}
