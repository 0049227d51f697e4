//! Filepath: src/parsers/language.rs
//! Extension -> Tree-sitter grammar mapping for comment stripping.

use std::path::Path;

use tree_sitter::Language;

/// Languages whose comments (and docstrings) can be stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage
{
    Python,
    Rust,
    /// C and C++ share the C++ grammar
    Cpp,
    Go,
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage
{
    /// Detect the language from the file extension.
    pub fn from_path(path: &Path) -> Option<Self>
    {
        let ext = path
            .extension()?
            .to_str()?
            .to_ascii_lowercase();

        let lang = match ext.as_str()
        {
            "py" | "pyi" => Self::Python,
            "rs" => Self::Rust,
            "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" => Self::Cpp,
            "go" => Self::Go,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "mts" | "cts" => Self::TypeScript,
            "tsx" => Self::Tsx,
            _ => return None,
        };

        Some(lang)
    }

    /// Tree-sitter grammar for this language.
    pub fn grammar(self) -> Language
    {
        match self
        {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Whether the grammar models docstrings as leading string statements.
    pub fn has_docstrings(self) -> bool
    {
        matches!(self, Self::Python)
    }
}

/// Comment node kinds across the supported grammars.
pub fn is_comment_kind(kind: &str) -> bool
{
    matches!(kind, "comment" | "line_comment" | "block_comment" | "html_comment")
}
