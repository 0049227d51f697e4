//! Filepath: src/parsers/strip.rs
//! ------------------------------------------------------------------
//! Comment and docstring stripping built on Tree-sitter 0.25.x.
//!   - Every comment node is removed, whatever the grammar calls it.
//!   - Python docstrings (a lone string expression that opens a
//!     module, class body or function body) are removed too.
//!   - Newlines inside removed ranges are kept so line structure
//!     survives; a removed range without newlines leaves one space so
//!     the tokens around it never fuse.
//!
//! Stripping never fails a scan: unsupported extensions and
//! unparseable sources come back unchanged.
//! ------------------------------------------------------------------

use std::borrow::Cow;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tree_sitter::{Node, Parser};
use tracing::{debug, warn};

use super::language::{SourceLanguage, is_comment_kind};

/// Strip comments/docstrings from `text`, choosing the grammar by the
/// extension of `path`.
pub fn strip_source<'a>(
    path: &Path,
    text: &'a str,
) -> Cow<'a, str>
{
    let Some(lang) = SourceLanguage::from_path(path)
    else
    {
        debug!(path = %path.display(), "no grammar for extension; keeping comments");
        return Cow::Borrowed(text);
    };

    match strip_comments(text, lang)
    {
        Ok(stripped) => Cow::Owned(stripped),
        Err(err) =>
        {
            warn!(path = %path.display(), "{err:#}; comparing unstripped source");
            Cow::Borrowed(text)
        }
    }
}

/// Remove every comment (and, for Python, docstring) from `text`.
pub fn strip_comments(
    text: &str,
    lang: SourceLanguage,
) -> Result<String>
{
    let mut parser = Parser::new();
    parser
        .set_language(&lang.grammar())
        .context("set Tree-sitter language")?;

    let tree = parser
        .parse(text, None)
        .ok_or_else(|| anyhow!("Failed to parse {lang:?} source"))?;

    let ranges = removable_ranges(tree.root_node(), lang);
    Ok(cut_ranges(text, ranges))
}

/// Collect byte ranges of comment and docstring nodes.
fn removable_ranges(
    root: Node<'_>,
    lang: SourceLanguage,
) -> Vec<Range<usize>>
{
    let mut ranges = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop()
    {
        if is_comment_kind(node.kind())
        {
            ranges.push(node.byte_range());
            continue;
        }

        if lang.has_docstrings()
            && let Some(doc) = python_docstring(node)
        {
            ranges.push(doc.byte_range());
        }

        let mut cursor = node.walk();
        stack.extend(node.children(&mut cursor));
    }

    ranges
}

/// The docstring statement opening `node`'s body, if any.
fn python_docstring<'t>(node: Node<'t>) -> Option<Node<'t>>
{
    let body = match node.kind()
    {
        "module" => node,
        "function_definition" | "class_definition" => node.child_by_field_name("body")?,
        _ => return None,
    };

    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| !is_comment_kind(child.kind()))?;

    if first.kind() != "expression_statement"
    {
        return None;
    }

    let mut inner_cursor = first.walk();
    let inner: Vec<Node<'t>> = first
        .named_children(&mut inner_cursor)
        .collect();

    match inner.as_slice()
    {
        [only] if matches!(only.kind(), "string" | "concatenated_string") => Some(first),
        _ => None,
    }
}

/// Drop `ranges` from `text`. A range keeps the newlines it contained;
/// one without newlines becomes a single space so neighbours stay apart.
fn cut_ranges(
    text: &str,
    mut ranges: Vec<Range<usize>>,
) -> String
{
    ranges.sort_by_key(|r| r.start);

    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    for range in ranges
    {
        // Nested or overlapping ranges were already covered
        if range.end <= pos
        {
            continue;
        }
        let start = range
            .start
            .max(pos);

        out.extend_from_slice(&bytes[pos..start]);

        let removed = &bytes[start..range.end];
        let newlines = removed
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        if newlines == 0
        {
            out.push(b' ');
        }
        else
        {
            out.extend(std::iter::repeat_n(b'\n', newlines));
        }
        pos = range.end;
    }
    out.extend_from_slice(&bytes[pos..]);

    // Node boundaries fall on token boundaries, so this stays valid UTF-8
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
