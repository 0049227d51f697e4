//! Filepath: src/core/rank.rs
//! Threshold filtering of raw similarity scores.
//!
//! Per compared document: skip the source itself (by key), convert to
//! percent, drop anything strictly below `ignore_threshold`, record the
//! rest rounded to two decimals, and flag anything strictly above
//! `fail_threshold`. Flagging never stops processing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Run-level outcome, also used as the process exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome
{
    #[default]
    Success,
    /// Input rejected before any similarity was computed
    BadInput,
    /// At least one pair scored above the fail threshold
    ThresholdExceeded,
}

impl Outcome
{
    /// Process exit code.
    pub fn exit_code(self) -> u8
    {
        match self
        {
            Outcome::Success => 0,
            Outcome::BadInput => 1,
            Outcome::ThresholdExceeded => 2,
        }
    }

    /// Fold a pair's verdict into the run outcome. `ThresholdExceeded`
    /// is sticky.
    pub fn record(
        self,
        exceeded: bool,
    ) -> Self
    {
        match (self, exceeded)
        {
            (Outcome::Success, true) => Outcome::ThresholdExceeded,
            (current, _) => current,
        }
    }
}

/// Percentage boundaries applied to every scored pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPolicy
{
    /// Pairs strictly above this percentage fail the run
    pub fail_threshold: i32,
    /// Pairs strictly below this percentage are omitted
    pub ignore_threshold: i32,
}

impl Default for ThresholdPolicy
{
    fn default() -> Self
    {
        Self { fail_threshold: 100, ignore_threshold: 0 }
    }
}

/// Compared document label -> similarity percentage (0-100, 2 decimals).
pub type SimilarityRow = IndexMap<String, f64>;

/// Source document label -> its retained comparisons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityResult(IndexMap<String, SimilarityRow>);

impl SimilarityResult
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Add the row for `source`, replacing any earlier one.
    pub fn insert(
        &mut self,
        source: String,
        row: SimilarityRow,
    )
    {
        self.0
            .insert(source, row);
    }

    /// Retained comparisons of `source`.
    pub fn row(
        &self,
        source: &str,
    ) -> Option<&SimilarityRow>
    {
        self.0
            .get(source)
    }

    /// Score of the pair `source` -> `compared`, if retained.
    pub fn get(
        &self,
        source: &str,
        compared: &str,
    ) -> Option<f64>
    {
        self.row(source)?
            .get(compared)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SimilarityRow)>
    {
        self.0
            .iter()
    }

    /// Number of source documents.
    pub fn len(&self) -> usize
    {
        self.0
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.0
            .is_empty()
    }

    /// Total number of retained pairs.
    pub fn pair_count(&self) -> usize
    {
        self.0
            .values()
            .map(IndexMap::len)
            .sum()
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64
{
    (value * 100.0).round() / 100.0
}

/// Filter one source document's raw scores.
///
/// `keys[i]` labels `scores[i]`; the entry whose key equals `source` is
/// skipped. Returns the retained row and whether any pair exceeded the
/// fail threshold.
pub fn rank_row(
    source: &str,
    keys: &[String],
    scores: &[f64],
    policy: &ThresholdPolicy,
) -> (SimilarityRow, bool)
{
    let ignore = f64::from(policy.ignore_threshold);
    let fail = f64::from(policy.fail_threshold);

    let mut row = SimilarityRow::new();
    let mut exceeded = false;

    for (key, &score) in keys
        .iter()
        .zip(scores)
    {
        // Identity is the label, not the content
        if key == source
        {
            continue;
        }

        let percent = score * 100.0;
        if percent < ignore
        {
            continue;
        }

        row.insert(key.clone(), round2(percent));
        exceeded |= percent > fail;
    }

    (row, exceeded)
}
