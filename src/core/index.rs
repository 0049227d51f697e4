//! Filepath: src/core/index.rs
//! Cosine-similarity index over the weighted corpus vectors.
//!
//! Built once, in corpus order; scoring is a pure read, so one index can
//! serve any number of threads.

use super::EngineError;
use super::tfidf::{FitId, TfIdfVector};

/// Cosine similarity of two weighted vectors, clamped into [0, 1].
/// A zero-magnitude vector scores 0 against everything.
pub fn cosine(
    a: &TfIdfVector,
    b: &TfIdfVector,
) -> f64
{
    let denom = a.norm() * b.norm();
    if denom == 0.0
    {
        return 0.0;
    }

    (a.dot(b) / denom).clamp(0.0, 1.0)
}

/// Immutable index of the corpus vectors of one fit.
#[derive(Debug, Clone)]
pub struct SimilarityIndex
{
    fit: FitId,
    vectors: Vec<TfIdfVector>,
}

impl SimilarityIndex
{
    /// Index `vectors` (corpus order) produced by fit `fit`.
    pub fn build(
        fit: FitId,
        vectors: Vec<TfIdfVector>,
    ) -> Result<Self, EngineError>
    {
        if let Some(foreign) = vectors
            .iter()
            .find(|v| v.fit_id() != fit)
        {
            return Err(EngineError::FitMismatch { expected: fit, found: foreign.fit_id() });
        }

        Ok(Self { fit, vectors })
    }

    /// Cosine similarity of `query` against every indexed document,
    /// in corpus order.
    pub fn score(
        &self,
        query: &TfIdfVector,
    ) -> Result<Vec<f64>, EngineError>
    {
        if query.fit_id() != self.fit
        {
            return Err(EngineError::FitMismatch { expected: self.fit, found: query.fit_id() });
        }

        Ok(self
            .vectors
            .iter()
            .map(|doc| cosine(query, doc))
            .collect())
    }

    /// Indexed vector at corpus position `pos`.
    pub fn vector(
        &self,
        pos: usize,
    ) -> Option<&TfIdfVector>
    {
        self.vectors
            .get(pos)
    }

    pub fn len(&self) -> usize
    {
        self.vectors
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.vectors
            .is_empty()
    }
}
