//! Card extraction from note text.
//!
//! # Format
//! ```markdown
//! Q: What is Rust? A: A systems programming language.
//! Q: Capital of France? A: Paris I: [[paris.jpg]]
//! Q: Which flag is this? I: ![[flag.png]]
//!
//! Q: Explain borrowing
//! A: Borrowing allows references without ownership.
//! Multiple lines are supported.
//! I: ![diagram](borrow.png)
//! ```
//!
//! A multi-line block ends at a blank line or the next question tag.

use tracing::warn;

use crate::error::Result;
use crate::image::parse_image;
use crate::tags::{TagConfig, TagPatterns};
use crate::types::Card;

/// Extract cards from note text.
///
/// Extraction is all-or-nothing: if the tag patterns cannot be built the
/// result is empty.
pub fn extract(content: &str, tags: &TagConfig) -> Vec<Card> {
    match Extractor::new(tags) {
        Ok(extractor) => extractor.extract(content),
        Err(e) => {
            warn!(error = %e, "card extraction failed");
            Vec::new()
        }
    }
}

/// Card extractor holding the compiled patterns for one tag configuration.
#[derive(Debug, Clone)]
pub struct Extractor {
    patterns: TagPatterns,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    None,
    Answer,
    Image,
}

impl Extractor {
    pub fn new(tags: &TagConfig) -> Result<Self> {
        Ok(Self {
            patterns: tags.compile()?,
        })
    }

    /// Extract cards in source order.
    pub fn extract(&self, content: &str) -> Vec<Card> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let lines: Vec<&str> = content.lines().collect();
        let mut cards = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line_num = i + 1;

            if let Some(card) = self.single_line(lines[i], line_num) {
                cards.push(card);
                i += 1;
            } else if let Some((card, next)) = self.multi_line(&lines, i) {
                cards.push(card);
                i = next;
            } else {
                i += 1;
            }
        }

        cards
    }

    /// Combined forms on one line, most specific first.
    fn single_line(&self, line: &str, line_num: usize) -> Option<Card> {
        let p = &self.patterns;

        if let Some(caps) = p.question_answer_image.captures(line) {
            let question = clean(&caps[1]);
            let answer = clean(&caps[2]);
            let image = parse_image(&caps[3]);
            if !question.is_empty() && (!answer.is_empty() || image.is_some()) {
                return Some(Card {
                    question,
                    answer,
                    image,
                    source_line: line_num,
                });
            }
        }

        if let Some(caps) = p.question_image.captures(line) {
            if !p.contains_answer_tag(&caps[1]) {
                let question = clean(&caps[1]);
                let image = parse_image(&caps[2]);
                if !question.is_empty() && image.is_some() {
                    return Some(Card {
                        question,
                        answer: String::new(),
                        image,
                        source_line: line_num,
                    });
                }
            }
        }

        if let Some(caps) = p.question_answer.captures(line) {
            if !p.contains_image_tag(&caps[2]) {
                let question = clean(&caps[1]);
                let answer = clean(&caps[2]);
                if !question.is_empty() && !answer.is_empty() {
                    return Some(Card {
                        question,
                        answer,
                        image: None,
                        source_line: line_num,
                    });
                }
            }
        }

        None
    }

    /// Question tag at line `start`, answer and image on following lines.
    ///
    /// Returns the card and the index of the first line not consumed.
    fn multi_line(&self, lines: &[&str], start: usize) -> Option<(Card, usize)> {
        let p = &self.patterns;

        let question = clean(p.strip_question(lines[start])?);
        if question.is_empty() {
            return None;
        }

        let mut mode = Mode::None;
        let mut answer_lines: Vec<&str> = Vec::new();
        let mut image: Option<String> = None;
        let mut j = start + 1;

        while j < lines.len() {
            let line = lines[j];
            if line.trim().is_empty() || p.strip_question(line).is_some() {
                break;
            }

            if let Some(rest) = p.strip_image(line) {
                mode = Mode::Image;
                if image.is_none() {
                    image = parse_image(strip_closing_emphasis(rest));
                }
            } else if let Some(rest) = p.strip_answer(line) {
                mode = Mode::Answer;
                let rest = strip_closing_emphasis(rest);
                if !rest.trim().is_empty() {
                    answer_lines.push(rest);
                }
            } else {
                match mode {
                    Mode::Answer => answer_lines.push(line),
                    Mode::Image if image.is_none() => image = parse_image(line),
                    Mode::Image | Mode::None => break,
                }
            }

            j += 1;
        }

        let answer = answer_lines.join("\n").trim().to_string();
        if answer.is_empty() && image.is_none() {
            return None;
        }

        Some((
            Card {
                question,
                answer,
                image,
                source_line: start + 1,
            },
            j,
        ))
    }
}

/// Remove emphasis markers and surrounding whitespace.
fn clean(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| *c != '*' && *c != '_')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Drop the closing half of an emphasized tag (`**A:** text`).
fn strip_closing_emphasis(rest: &str) -> &str {
    let unmarked = rest.trim_start_matches(['*', '_']);
    let run = rest.len() - unmarked.len();
    if (1..=2).contains(&run) && (unmarked.is_empty() || unmarked.starts_with(char::is_whitespace)) {
        unmarked.trim_start()
    } else {
        rest
    }
}
