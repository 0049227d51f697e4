//! Engine error taxonomy.

use super::tfidf::FitId;

/// Failures raised by the similarity engine itself.
///
/// Malformed or empty documents never end up here: they degrade to
/// zero-weight vectors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError
{
    /// No documents were supplied
    #[error("cannot build a vocabulary from an empty corpus")]
    EmptyCorpus,

    /// A weighted vector produced by one fit was scored against another
    #[error("vector from fit {found} cannot be scored against index built by fit {expected}")]
    FitMismatch
    {
        expected: FitId,
        found: FitId,
    },
}
