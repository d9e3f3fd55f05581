//! Tag words and the patterns built from them.
//!
//! A tag is a word followed by a colon (`Q:`), optionally preceded by up
//! to two markdown emphasis characters (`**Q:**`). Matching is
//! case-insensitive.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// The three configurable tag words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagConfig {
    pub question_word: String,
    pub answer_word: String,
    pub image_word: String,
}

impl TagConfig {
    pub const DEFAULT_QUESTION: &'static str = "Q";
    pub const DEFAULT_ANSWER: &'static str = "A";
    pub const DEFAULT_IMAGE: &'static str = "I";

    pub fn new(
        question_word: impl Into<String>,
        answer_word: impl Into<String>,
        image_word: impl Into<String>,
    ) -> Self {
        Self {
            question_word: question_word.into(),
            answer_word: answer_word.into(),
            image_word: image_word.into(),
        }
    }

    /// Compile the patterns used by the extractor.
    pub fn compile(&self) -> Result<TagPatterns> {
        TagPatterns::compile(self)
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUESTION, Self::DEFAULT_ANSWER, Self::DEFAULT_IMAGE)
    }
}

/// Escape a tag word so it matches literally inside a pattern.
pub fn escape(word: &str) -> String {
    regex::escape(word)
}

/// Pattern fragment for one tag: up to two emphasis markers, the word,
/// a colon, then any whitespace.
pub fn tag_pattern(word: &str) -> String {
    format!(r"[*_]{{0,2}}{}:\s*", escape(word))
}

/// Compiled tag patterns for one [`TagConfig`].
#[derive(Debug, Clone)]
pub struct TagPatterns {
    /// `Q: … A: … I: …` anywhere on a line.
    pub(crate) question_answer_image: Regex,
    /// `Q: … I: …` anywhere on a line.
    pub(crate) question_image: Regex,
    /// `Q: … A: …` anywhere on a line.
    pub(crate) question_answer: Regex,
    pub(crate) answer_tag: Regex,
    pub(crate) image_tag: Regex,
    pub(crate) question_start: Regex,
    pub(crate) answer_start: Regex,
    pub(crate) image_start: Regex,
}

impl TagPatterns {
    pub fn compile(config: &TagConfig) -> Result<Self> {
        let q = tag_pattern(&config.question_word);
        let a = tag_pattern(&config.answer_word);
        let i = tag_pattern(&config.image_word);
        let qword = config.question_word.as_str();

        Ok(Self {
            question_answer_image: build(qword, &format!(r"{q}(.+?)\s*{a}(.+?)\s*{i}(.*)"))?,
            question_image: build(qword, &format!(r"{q}(.+?)\s*{i}(.+)"))?,
            question_answer: build(qword, &format!(r"{q}(.+?)\s*{a}(.+)"))?,
            answer_tag: build(&config.answer_word, &a)?,
            image_tag: build(&config.image_word, &i)?,
            question_start: build(qword, &format!(r"^{q}(.*)"))?,
            answer_start: build(&config.answer_word, &format!(r"^{a}(.*)"))?,
            image_start: build(&config.image_word, &format!(r"^{i}(.*)"))?,
        })
    }

    /// Remainder of the line after a leading question tag.
    pub fn strip_question<'a>(&self, line: &'a str) -> Option<&'a str> {
        capture_rest(&self.question_start, line)
    }

    /// Remainder of the line after a leading answer tag.
    pub fn strip_answer<'a>(&self, line: &'a str) -> Option<&'a str> {
        capture_rest(&self.answer_start, line)
    }

    /// Remainder of the line after a leading image tag.
    pub fn strip_image<'a>(&self, line: &'a str) -> Option<&'a str> {
        capture_rest(&self.image_start, line)
    }

    pub fn contains_answer_tag(&self, text: &str) -> bool {
        self.answer_tag.is_match(text)
    }

    pub fn contains_image_tag(&self, text: &str) -> bool {
        self.image_tag.is_match(text)
    }
}

fn build(word: &str, pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| ExtractError::InvalidTagPattern {
            word: word.to_string(),
            source,
        })
}

fn capture_rest<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
