//! Filepath: src/report/markdown.rs
//! Collapsible Markdown report, ready to post as a pull-request comment.

use std::fmt::Write as _;

use super::sorted_desc;
use crate::core::rank::SimilarityResult;

const WARNING_SUFFIX: &str = " ⚠️";

/// Label text safe inside link text and table cells.
fn escape_label(label: &str) -> String
{
    let mut out = String::with_capacity(label.len());
    for ch in label.chars()
    {
        if matches!(ch, '|' | '[' | ']')
        {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Percent-encode the characters that would end the link target or the
/// table cell.
fn escape_target(label: &str) -> String
{
    let mut out = String::with_capacity(label.len());
    for ch in label.chars()
    {
        match ch
        {
            '|' => out.push_str("%7C"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            ' ' => out.push_str("%20"),
            other => out.push(other),
        }
    }
    out
}

fn link(
    file: &str,
    url_prefix: &str,
) -> String
{
    format!("[{}]({url_prefix}{})", escape_label(file), escape_target(file))
}

pub fn render(
    result: &SimilarityResult,
    url_prefix: &str,
    warn_threshold: i32,
) -> String
{
    let warn = f64::from(warn_threshold);
    let mut md = String::from("## 📌 Duplicate code detection tool report\n");
    md.push_str(
        "The tool analyzed your source code and found the following degree of similarity between the files:\n",
    );

    for (source, row) in result.iter()
    {
        let _ = writeln!(md, "<details><summary>{}</summary>\n", escape_label(source));
        let _ = writeln!(md, "### 📄 {}\n", link(source, url_prefix));
        md.push_str("| File | Similarity (%) |\n");
        md.push_str("| --- | --- |\n");

        for (file, percent) in sorted_desc(row)
        {
            let marker = if percent >= warn { WARNING_SUFFIX } else { "" };
            let _ = writeln!(md, "| {} | {percent:.2}{marker} |", link(file, url_prefix));
        }

        md.push_str("\n</details>\n");
    }

    md
}
