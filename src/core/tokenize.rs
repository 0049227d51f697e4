//! Filepath: src/core/tokenize.rs
//! Locale-neutral word tokenizer.
//! - A token is a maximal run of Unicode word characters (`\w`)
//! - An apostrophe between word characters joins (`don't` is one token)
//! - Everything else (operators, brackets, hyphens, whitespace) separates
//! - Tokens are lowercased
//!
//! `TokenStream` is a cheap handle over borrowed text. Iterating it twice
//! yields the same sequence, so a document can be retokenized for diagnostics
//! without keeping the tokens around.

use std::sync::LazyLock;

use regex::Regex;

/// Word pattern shared by every document of a run.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+(?:['’]\w+)*").expect("word pattern is valid"));

/// Restartable, finite token sequence over a document's text.
#[derive(Debug, Clone, Copy)]
pub struct TokenStream<'a>
{
    text: &'a str,
}

impl<'a> TokenStream<'a>
{
    /// Wrap `text` without scanning it.
    pub fn new(text: &'a str) -> Self
    {
        Self { text }
    }

    /// Start a fresh pass over the text.
    pub fn iter(self) -> impl Iterator<Item = String> + 'a
    {
        WORD.find_iter(self.text)
            .map(|m| {
                m.as_str()
                    .to_lowercase()
            })
    }

    /// Count tokens without allocating them.
    pub fn count(self) -> usize
    {
        WORD.find_iter(self.text)
            .count()
    }
}

impl<'a> IntoIterator for TokenStream<'a>
{
    type IntoIter = Box<dyn Iterator<Item = String> + 'a>;
    type Item = String;

    fn into_iter(self) -> Self::IntoIter
    {
        Box::new(self.iter())
    }
}

/// Convenience wrapper: tokenize `text` into a stream.
pub fn tokenize(text: &str) -> TokenStream<'_>
{
    TokenStream::new(text)
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn collect(text: &str) -> Vec<String>
    {
        tokenize(text)
            .iter()
            .collect()
    }

    #[test]
    fn splits_code_on_punctuation_and_lowercases()
    {
        assert_eq!(collect("def Foo():\n    return 1\n"), vec!["def", "foo", "return", "1"]);
    }

    #[test]
    fn keeps_identifiers_and_contractions_whole()
    {
        assert_eq!(collect("snake_case don't x-y"), vec!["snake_case", "don't", "x", "y"]);
    }

    #[test]
    fn punctuation_only_yields_nothing()
    {
        assert!(collect("(){}[];:,. -- ++ \n\t").is_empty());
        assert_eq!(tokenize("").count(), 0);
    }

    #[test]
    fn unicode_words_are_tokens()
    {
        assert_eq!(collect("Größe ÉTÉ"), vec!["größe", "été"]);
    }

    #[test]
    fn stream_is_restartable()
    {
        let stream = tokenize("alpha beta, Gamma");
        let first: Vec<_> = stream
            .iter()
            .collect();
        let second: Vec<_> = stream
            .into_iter()
            .collect();

        assert_eq!(first, second);
        assert_eq!(stream.count(), 3);
    }
}
