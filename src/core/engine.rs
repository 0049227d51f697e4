//! Filepath: src/core/engine.rs
//! Explicit similarity context for one run.
//!
//! `SimilarityEngine::fit` tokenizes the corpus, builds the vocabulary,
//! fits TF-IDF and indexes every weighted document, all in corpus order.
//! Nothing is mutated afterwards, so `detect` scores documents on the
//! rayon pool and merges the per-document rows back in corpus order.

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::EngineError;
use super::index::SimilarityIndex;
use super::rank::{Outcome, SimilarityResult, ThresholdPolicy, rank_row};
use super::tfidf::{IdfWeighting, TfIdfModel};
use super::tokenize::tokenize;
use super::vocab::Vocabulary;

/// Outcome of scoring the whole corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection
{
    /// Retained pairs per source document
    pub similarity: SimilarityResult,
    /// `Success` or `ThresholdExceeded`
    pub outcome: Outcome,
}

/// Vocabulary, fitted weights and index of one corpus.
#[derive(Debug, Clone)]
pub struct SimilarityEngine
{
    keys: Vec<String>,
    vocab: Vocabulary,
    model: TfIdfModel,
    index: SimilarityIndex,
}

impl SimilarityEngine
{
    /// Fit on `corpus` (document key -> text, in corpus order).
    #[instrument(skip_all, fields(docs = corpus.len()))]
    pub fn fit(
        corpus: &IndexMap<String, String>,
        weighting: IdfWeighting,
    ) -> Result<Self, EngineError>
    {
        let (vocab, bags) = Vocabulary::build(
            corpus
                .values()
                .map(|text| {
                    tokenize(text)
                        .iter()
                }),
        )?;
        let model = TfIdfModel::fit(&bags, vocab.len(), weighting)?;
        let vectors = bags
            .iter()
            .map(|bag| model.transform(bag))
            .collect();
        let index = SimilarityIndex::build(model.fit_id(), vectors)?;

        debug!(terms = vocab.len(), fit = %model.fit_id(), "fitted corpus");

        Ok(Self {
            keys: corpus
                .keys()
                .cloned()
                .collect(),
            vocab,
            model,
            index,
        })
    }

    /// Raw cosine scores of corpus document `pos` against the corpus.
    pub fn scores(
        &self,
        pos: usize,
    ) -> Result<Vec<f64>, EngineError>
    {
        match self
            .index
            .vector(pos)
        {
            Some(vector) => self
                .index
                .score(vector),
            None => Ok(vec![0.0; self.keys.len()]),
        }
    }

    /// Raw cosine scores of arbitrary `text` against the corpus. Tokens
    /// outside the fitted vocabulary are ignored.
    pub fn query(
        &self,
        text: &str,
    ) -> Result<Vec<f64>, EngineError>
    {
        let bag = self
            .vocab
            .bag_of_words(
                tokenize(text)
                    .iter(),
            );
        let vector = self
            .model
            .transform(&bag);
        self.index
            .score(&vector)
    }

    /// Score every document against the corpus and apply `policy`.
    #[instrument(skip_all, fields(docs = self.keys.len()))]
    pub fn detect(
        &self,
        policy: &ThresholdPolicy,
    ) -> Result<Detection, EngineError>
    {
        // Each worker owns its row; merged below in corpus order
        let rows = (0..self.keys.len())
            .into_par_iter()
            .map(|pos| {
                let scores = self.scores(pos)?;
                let source = &self.keys[pos];
                let (row, exceeded) = rank_row(source, &self.keys, &scores, policy);
                Ok((source.clone(), row, exceeded))
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        let mut similarity = SimilarityResult::new();
        let mut outcome = Outcome::Success;
        for (source, row, exceeded) in rows
        {
            outcome = outcome.record(exceeded);
            similarity.insert(source, row);
        }

        debug!(pairs = similarity.pair_count(), ?outcome, "scored corpus");

        Ok(Detection { similarity, outcome })
    }

    /// Document keys in corpus order.
    pub fn keys(&self) -> &[String]
    {
        &self.keys
    }

    pub fn vocabulary(&self) -> &Vocabulary
    {
        &self.vocab
    }

    pub fn model(&self) -> &TfIdfModel
    {
        &self.model
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::*;

    fn corpus(docs: &[(&str, &str)]) -> IndexMap<String, String>
    {
        docs.iter()
            .map(|&(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn scenario() -> IndexMap<String, String>
    {
        corpus(&[
            ("a.py", "def foo():\n    return 1\n"),
            ("b.py", "def foo():\n    return 1\n"),
            ("c.py", "class X: pass\n"),
        ])
    }

    #[test]
    fn duplicate_files_score_high_and_unrelated_low()
    {
        let engine = SimilarityEngine::fit(&scenario(), IdfWeighting::Smoothed).unwrap();
        let det = engine
            .detect(&ThresholdPolicy::default())
            .unwrap();

        assert_eq!(det.outcome, Outcome::Success);
        assert!(det.similarity.get("a.py", "b.py").unwrap() > 90.0);
        assert!(det.similarity.get("a.py", "c.py").unwrap() < 1.0);
        assert!(det.similarity.get("a.py", "a.py").is_none());
    }

    #[test]
    fn low_fail_threshold_is_exceeded()
    {
        let engine = SimilarityEngine::fit(&scenario(), IdfWeighting::Smoothed).unwrap();
        let policy = ThresholdPolicy { fail_threshold: 50, ignore_threshold: 0 };
        let det = engine
            .detect(&policy)
            .unwrap();

        assert_eq!(det.outcome, Outcome::ThresholdExceeded);
        // Complete result is still produced
        assert_eq!(det.similarity.pair_count(), 6);
    }

    #[test]
    fn high_ignore_threshold_drops_unrelated_pairs()
    {
        let engine = SimilarityEngine::fit(&scenario(), IdfWeighting::Smoothed).unwrap();
        let policy = ThresholdPolicy { fail_threshold: 100, ignore_threshold: 95 };
        let det = engine
            .detect(&policy)
            .unwrap();

        let row = det
            .similarity
            .row("a.py")
            .unwrap();
        assert!(!row.contains_key("c.py"));
        assert!(row.contains_key("b.py"));
    }

    #[test]
    fn standard_weighting_matches_scenario_too()
    {
        let engine = SimilarityEngine::fit(&scenario(), IdfWeighting::Standard).unwrap();
        let det = engine
            .detect(&ThresholdPolicy::default())
            .unwrap();

        assert!(det.similarity.get("a.py", "b.py").unwrap() > 90.0);
        assert_eq!(det.similarity.get("a.py", "c.py"), Some(0.0));
    }

    #[test]
    fn query_ignores_unknown_tokens()
    {
        let engine = SimilarityEngine::fit(&scenario(), IdfWeighting::Smoothed).unwrap();
        let scores = engine
            .query("def foo return 1 completely unseen words")
            .unwrap();

        assert!((scores[0] - 1.0).abs() < 1e-6);
        assert!(scores[2] < 1e-6);
    }

    #[test]
    fn single_document_scores_trivially()
    {
        let engine = SimilarityEngine::fit(&corpus(&[("only.py", "x = 1")]), IdfWeighting::Smoothed).unwrap();
        let det = engine
            .detect(&ThresholdPolicy::default())
            .unwrap();

        assert_eq!(det.similarity.pair_count(), 0);
        assert_eq!(det.outcome, Outcome::Success);
    }

    #[test]
    fn empty_corpus_is_an_error()
    {
        assert!(matches!(
            SimilarityEngine::fit(&IndexMap::new(), IdfWeighting::Smoothed),
            Err(EngineError::EmptyCorpus)
        ));
    }

    fn arb_corpus() -> impl Strategy<Value = IndexMap<String, String>>
    {
        prop::collection::vec(prop::collection::vec("[a-e]{1,3}", 0..12), 2..6).prop_map(|docs| {
            docs.into_iter()
                .enumerate()
                .map(|(i, words)| (format!("doc{i}.rs"), words.join(" ")))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn similarity_is_symmetric_bounded_and_reflexive(docs in arb_corpus())
        {
            let engine = SimilarityEngine::fit(&docs, IdfWeighting::Smoothed).unwrap();
            let n = docs.len();
            let matrix: Vec<Vec<f64>> = (0..n).map(|i| engine.scores(i).unwrap()).collect();

            for i in 0..n
            {
                let non_empty = !docs[i].is_empty();
                if non_empty
                {
                    prop_assert!((matrix[i][i] - 1.0).abs() < 1e-6);
                }
                for j in 0..n
                {
                    prop_assert!((0.0..=1.0).contains(&matrix[i][j]));
                    prop_assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn detection_obeys_filter_and_threshold_laws(
            docs in arb_corpus(),
            ignore in 0i32..=100,
            fail in 0i32..=100,
        )
        {
            let engine = SimilarityEngine::fit(&docs, IdfWeighting::Smoothed).unwrap();
            let policy = ThresholdPolicy { fail_threshold: fail, ignore_threshold: ignore };
            let det = engine.detect(&policy).unwrap();

            let mut any_above = false;
            for (i, source) in engine.keys().iter().enumerate()
            {
                let raw = engine.scores(i).unwrap();
                let row = det.similarity.row(source).unwrap();
                for (j, compared) in engine.keys().iter().enumerate()
                {
                    let percent = raw[j] * 100.0;
                    let kept = compared != source && percent >= f64::from(ignore);
                    prop_assert_eq!(row.contains_key(compared), kept);
                    any_above |= kept && percent > f64::from(fail);
                }
            }

            let expected = if any_above { Outcome::ThresholdExceeded } else { Outcome::Success };
            prop_assert_eq!(det.outcome, expected);

            // Same corpus, same config, same answer
            prop_assert_eq!(engine.detect(&policy).unwrap(), det);
        }
    }
}
