//! Filepath: src/core/vocab.rs
//! Corpus vocabulary and sparse bag-of-words counts.
//!
//! Ids are assigned in first-seen order across the corpus, which keeps
//! them deterministic within a run. A `BagOfWords` stores `(id, count)`
//! pairs sorted by id with every count >= 1, so two bags can be merged
//! with a single linear pass.

use std::collections::BTreeMap;

use indexmap::IndexSet;

use super::EngineError;

/// Stable integer id of a vocabulary term.
pub type TermId = u32;

/// Token string -> term id mapping, built once per run.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary
{
    /// Insertion-ordered token set; a token's index is its id
    terms: IndexSet<String>,
}

/// Sparse term counts of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BagOfWords
{
    /// Sorted by id; counts are never zero
    entries: Vec<(TermId, u32)>,
}

impl Vocabulary
{
    /// Register every token of every document and return the vocabulary
    /// together with one bag per document, in input order.
    ///
    /// Fails only when `documents` is empty.
    pub fn build<I, D>(documents: I) -> Result<(Self, Vec<BagOfWords>), EngineError>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = String>,
    {
        let mut vocab = Self::default();
        let bags: Vec<BagOfWords> = documents
            .into_iter()
            .map(|tokens| vocab.register(tokens))
            .collect();

        if bags.is_empty()
        {
            return Err(EngineError::EmptyCorpus);
        }

        Ok((vocab, bags))
    }

    /// Count `tokens`, registering unseen ones.
    fn register<D>(
        &mut self,
        tokens: D,
    ) -> BagOfWords
    where
        D: IntoIterator<Item = String>,
    {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();

        for token in tokens
        {
            let (idx, _) = self
                .terms
                .insert_full(token);
            *counts
                .entry(idx as TermId)
                .or_insert(0) += 1;
        }

        BagOfWords::from_counts(counts)
    }

    /// Count `tokens` against the frozen vocabulary.
    /// Tokens that were never registered are dropped.
    pub fn bag_of_words<D>(
        &self,
        tokens: D,
    ) -> BagOfWords
    where
        D: IntoIterator<Item = String>,
    {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();

        for token in tokens
        {
            if let Some(idx) = self
                .terms
                .get_index_of(&token)
            {
                *counts
                    .entry(idx as TermId)
                    .or_insert(0) += 1;
            }
        }

        BagOfWords::from_counts(counts)
    }

    /// Id of `token`, if registered.
    pub fn id(
        &self,
        token: &str,
    ) -> Option<TermId>
    {
        self.terms
            .get_index_of(token)
            .map(|idx| idx as TermId)
    }

    /// Token registered under `id`.
    pub fn term(
        &self,
        id: TermId,
    ) -> Option<&str>
    {
        self.terms
            .get_index(id as usize)
            .map(String::as_str)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize
    {
        self.terms
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.terms
            .is_empty()
    }
}

impl BagOfWords
{
    fn from_counts(counts: BTreeMap<TermId, u32>) -> Self
    {
        // BTreeMap iteration is already sorted by id
        Self {
            entries: counts
                .into_iter()
                .filter(|&(_, count)| count > 0)
                .collect(),
        }
    }

    /// `(id, count)` pairs sorted by id.
    pub fn entries(&self) -> &[(TermId, u32)]
    {
        &self.entries
    }

    /// Occurrences of `id` (0 when absent).
    pub fn count(
        &self,
        id: TermId,
    ) -> u32
    {
        self.entries
            .binary_search_by_key(&id, |&(term, _)| term)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Number of distinct terms in the document.
    pub fn len(&self) -> usize
    {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.entries
            .is_empty()
    }

    /// Total token count.
    pub fn total(&self) -> u64
    {
        self.entries
            .iter()
            .map(|&(_, count)| u64::from(count))
            .sum()
    }
}
