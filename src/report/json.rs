//! Filepath: src/report/json.rs
//! `result.json`: strong matches only, strongest first.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::sorted_desc;
use crate::core::rank::SimilarityResult;

/// Keep pairs at or above `min_similarity`, sort each row descending and
/// drop sources left without rows.
pub fn filtered(
    result: &SimilarityResult,
    min_similarity: f64,
) -> IndexMap<String, IndexMap<String, f64>>
{
    result
        .iter()
        .filter_map(|(source, row)| {
            let kept: IndexMap<String, f64> = sorted_desc(row)
                .into_iter()
                .filter(|&(_, percent)| percent >= min_similarity)
                .map(|(file, percent)| (file.clone(), percent))
                .collect();
            (!kept.is_empty()).then(|| (source.clone(), kept))
        })
        .collect()
}

/// Serialize with four-space indentation.
pub fn render(
    result: &SimilarityResult,
    min_similarity: f64,
) -> Result<String>
{
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    filtered(result, min_similarity)
        .serialize(&mut ser)
        .context("Failed to serialize JSON report")?;

    let mut text = String::from_utf8(buf).context("JSON report is not valid UTF-8")?;
    text.push('\n');
    Ok(text)
}

pub fn write(
    result: &SimilarityResult,
    min_similarity: f64,
    path: &Path,
) -> Result<()>
{
    let text = render(result, min_similarity)?;
    fs::write(path, text).with_context(|| format!("Failed to write JSON report to {}", path.display()))
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::core::rank::SimilarityRow;

    #[test]
    fn weak_pairs_and_empty_sources_are_dropped()
    {
        let mut a = SimilarityRow::new();
        a.insert("c.py".into(), 60.0);
        a.insert("b.py".into(), 99.5);
        a.insert("d.py".into(), 12.0);
        let mut e = SimilarityRow::new();
        e.insert("a.py".into(), 49.99);

        let mut result = SimilarityResult::new();
        result.insert("a.py".into(), a);
        result.insert("e.py".into(), e);

        let text = render(&result, 50.0).unwrap();
        assert_eq!(
            text,
            "{\n    \"a.py\": {\n        \"b.py\": 99.5,\n        \"c.py\": 60.0\n    }\n}\n"
        );
    }
}
