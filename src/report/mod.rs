//! Filepath: src/report/mod.rs
//! Renderers for a finished detection.

pub mod console;
pub mod json;
pub mod markdown;

use crate::core::rank::SimilarityRow;

/// Row entries ordered by descending similarity; ties keep corpus order.
pub(crate) fn sorted_desc(row: &SimilarityRow) -> Vec<(&String, f64)>
{
    let mut entries: Vec<(&String, f64)> = row
        .iter()
        .map(|(k, &v)| (k, v))
        .collect();
    entries.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
    });
    entries
}
