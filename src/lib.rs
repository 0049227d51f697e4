//! **twinscan** - Near-duplicate source file detection for CI pipelines
//!
//! Gitignore-aware discovery, optional tree-sitter comment stripping, and a
//! TF-IDF/cosine similarity engine scored in parallel with rayon.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core pipeline - similarity engine and the scan command around it
pub mod core {
    /// Lowercased word tokens over borrowed text
    pub mod tokenize;

    /// Corpus-wide term ids and per-document bags of words
    pub mod vocab;

    /// IDF fitting and sparse weighted vectors
    pub mod tfidf;

    /// Cosine similarity against every indexed document
    pub mod index;

    /// Threshold filtering, rounding and the run outcome
    pub mod rank;

    /// Fitted context for one run; parallel detection
    pub mod engine;
    pub use engine::{Detection, SimilarityEngine};

    mod error;
    pub use error::EngineError;

    /// Source discovery and input validation
    pub mod discover;
    pub use discover::ScanError;

    /// Parallel document loading with per-file diagnostics
    pub mod corpus;

    /// `scan` command entry point
    pub mod scan;
    pub use scan::run as scan_run;
}

/// Language processing - tree-sitter comment and docstring stripping
pub mod parsers {
    pub mod language;
    pub use language::SourceLanguage;

    pub mod strip;
    pub use strip::strip_source;
}

/// Infrastructure - configuration, I/O, walking and logging
pub mod infra {
    /// Layered configuration (file + TWINSCAN_* env) and `init`
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Memory-mapped file I/O for large files (>1MB threshold)
    pub mod io;
    pub use io::{FileContent, read_file_smart};

    /// Gitignore-aware directory walking
    pub mod walk;
    pub use walk::FileWalker;

    /// Report labels and path normalization
    pub mod paths;

    /// tracing-subscriber setup
    pub mod logging;
}

/// Console, JSON and Markdown renderers
pub mod report;

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::scan_run;
pub use crate::core::{Detection, EngineError, ScanError, SimilarityEngine};
pub use infra::{Config, FileWalker, load_config};
