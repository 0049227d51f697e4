//! Filepath: src/core/tfidf.rs
//! TF-IDF weighting over a fitted corpus.
//!
//! `fit` computes one IDF weight per vocabulary id from document
//! frequencies; `transform` turns any bag-of-words into a sparse
//! weighted vector `raw_count(id) * idf(id)`. A fitted model is
//! immutable. Every fit gets a process-unique `FitId` that travels with
//! the vectors it produces so they cannot be mixed with another fit.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use super::EngineError;
use super::vocab::{BagOfWords, TermId};

static NEXT_FIT: AtomicU64 = AtomicU64::new(1);

/// Identity of one `TfIdfModel::fit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FitId(u64);

impl FitId
{
    fn next() -> Self
    {
        Self(NEXT_FIT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for FitId
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result
    {
        write!(f, "#{}", self.0)
    }
}

/// IDF formula used by `fit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdfWeighting
{
    /// `ln((N + 1) / df)`: strictly positive for every term
    #[default]
    Smoothed,
    /// `log2(N / df)`, gensim's weighting: same scores as gensim-based
    /// detectors; terms present in every document weigh 0
    Standard,
}

impl IdfWeighting
{
    /// IDF of a term found in `df` of `n` documents.
    pub fn idf(
        self,
        n: usize,
        df: usize,
    ) -> f64
    {
        if df == 0 || n == 0
        {
            return 0.0;
        }

        let (n, df) = (n as f64, df as f64);
        match self
        {
            IdfWeighting::Smoothed => ((n + 1.0) / df).ln(),
            IdfWeighting::Standard => (n / df).log2(),
        }
    }
}

/// Fitted IDF weights for one corpus.
#[derive(Debug, Clone)]
pub struct TfIdfModel
{
    fit: FitId,
    weighting: IdfWeighting,
    num_docs: usize,
    /// Indexed by term id
    idf: Vec<f64>,
}

/// Sparse TF-IDF vector produced by one fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfVector
{
    fit: FitId,
    /// Sorted by id; weights are strictly positive
    entries: Vec<(TermId, f64)>,
    norm: f64,
}

impl TfIdfModel
{
    /// Compute IDF weights for `vocab_len` term ids from the corpus bags.
    pub fn fit(
        bags: &[BagOfWords],
        vocab_len: usize,
        weighting: IdfWeighting,
    ) -> Result<Self, EngineError>
    {
        if bags.is_empty()
        {
            return Err(EngineError::EmptyCorpus);
        }

        // Document frequency: entries are unique per bag
        let mut df = vec![0usize; vocab_len];
        for bag in bags
        {
            for &(id, _) in bag.entries()
            {
                if let Some(slot) = df.get_mut(id as usize)
                {
                    *slot += 1;
                }
            }
        }

        let num_docs = bags.len();
        let idf = df
            .into_iter()
            .map(|d| weighting.idf(num_docs, d))
            .collect();

        Ok(Self { fit: FitId::next(), weighting, num_docs, idf })
    }

    /// Weight `bag` by the fitted IDF. Ids outside the vocabulary and
    /// zero-weight terms are dropped.
    pub fn transform(
        &self,
        bag: &BagOfWords,
    ) -> TfIdfVector
    {
        let entries: Vec<(TermId, f64)> = bag
            .entries()
            .iter()
            .filter_map(|&(id, count)| {
                let idf = *self
                    .idf
                    .get(id as usize)?;
                let weight = f64::from(count) * idf;
                (weight > 0.0).then_some((id, weight))
            })
            .collect();

        TfIdfVector::new(self.fit, entries)
    }

    /// IDF of `id` (0 when unknown).
    pub fn idf(
        &self,
        id: TermId,
    ) -> f64
    {
        self.idf
            .get(id as usize)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn fit_id(&self) -> FitId
    {
        self.fit
    }

    pub fn weighting(&self) -> IdfWeighting
    {
        self.weighting
    }

    /// Corpus size the model was fitted on.
    pub fn num_docs(&self) -> usize
    {
        self.num_docs
    }
}

impl TfIdfVector
{
    fn new(
        fit: FitId,
        entries: Vec<(TermId, f64)>,
    ) -> Self
    {
        let norm = entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f64>()
            .sqrt();
        Self { fit, entries, norm }
    }

    /// `(id, weight)` pairs sorted by id.
    pub fn entries(&self) -> &[(TermId, f64)]
    {
        &self.entries
    }

    /// Weight of `id` (0 when absent).
    pub fn weight(
        &self,
        id: TermId,
    ) -> f64
    {
        self.entries
            .binary_search_by_key(&id, |&(term, _)| term)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean length.
    pub fn norm(&self) -> f64
    {
        self.norm
    }

    pub fn is_zero(&self) -> bool
    {
        self.entries
            .is_empty()
    }

    pub fn fit_id(&self) -> FitId
    {
        self.fit
    }

    /// Sparse dot product (merge of two id-sorted lists).
    pub fn dot(
        &self,
        other: &Self,
    ) -> f64
    {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < a.len() && j < b.len()
        {
            match a[i]
                .0
                .cmp(&b[j].0)
            {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal =>
                {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}
