use thiserror::Error;
use tokenizers::pre_tokenizers::split::{Split, SplitPattern};
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, SplitDelimiterBehavior};

// Runs of anything that is not a letter, digit or underscore separate words.
const WORD_DELIMITER_PATTERN: &str = r"\W+";

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("failed to build word splitter: {0}")]
    Build(String),
    #[error("failed to split text into words: {0}")]
    Split(String),
}

/// Turns a raw sentence into an ordered list of word tokens.
///
/// The request handlers only depend on this trait, so a different segmenter
/// (or a failing one, in tests) can be injected through `AppState`.
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError>;
}

/// Word tokenizer backed by the `tokenizers` pre-tokenization pipeline.
///
/// Punctuation and whitespace are dropped, so `"Hello, world!"` yields
/// `["Hello", "world"]`. Case is preserved.
pub struct TokenizerWrapper {
    splitter: Split,
}

impl TokenizerWrapper {
    pub fn new() -> Result<Self, TokenizeError> {
        let splitter = Split::new(
            SplitPattern::Regex(WORD_DELIMITER_PATTERN.to_string()),
            SplitDelimiterBehavior::Removed,
            false,
        )
        .map_err(|e| TokenizeError::Build(e.to_string()))?;
        Ok(Self { splitter })
    }
}

impl WordTokenizer for TokenizerWrapper {
    fn tokenize(&self, text: &str) -> Result<Vec<String>, TokenizeError> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.splitter
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| TokenizeError::Split(e.to_string()))?;

        let tokens = pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(piece, _, _)| piece)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();
        Ok(tokens)
    }
}
