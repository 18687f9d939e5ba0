//! Parser for flashcard set files.
//!
//! # Format
//! ```text
//! Set: Chemistry
//! Difficulty: Medium
//!
//! Q: Symbol for oxygen?
//! A: O
//! H: First letter of the element
//! D: Easy
//!
//! Q: Explain covalent bonding
//! A: Atoms share electron pairs.
//! Multiple lines are supported.
//! ```
//!
//! `Set:` and `Difficulty:` are optional. A missing `Set:` leaves the name
//! empty for the caller to fill in. Continuation lines are allowed after
//! `Q:`, `A:` and `H:` only.

use crate::error::ParseError;
use crate::types::{Card, Difficulty, FlashcardSet};

type Result<T> = std::result::Result<T, ParseError>;

/// Parse set file content.
pub fn parse_set(content: &str) -> Result<FlashcardSet> {
    if content.trim().is_empty() {
        return Err(ParseError::EmptyFile);
    }

    let mut parser = Parser::new();
    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1)?;
    }
    parser.finish()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Question,
    Answer,
    Hint,
}

struct CardBuilder {
    question: Option<String>,
    answer: Option<String>,
    hint: Option<String>,
    difficulty: Option<Difficulty>,
    start_line: usize,
}

impl CardBuilder {
    fn new(start_line: usize) -> Self {
        Self {
            question: None,
            answer: None,
            hint: None,
            difficulty: None,
            start_line,
        }
    }

    fn build(self) -> Result<Card> {
        let question = non_blank(self.question).ok_or(ParseError::MissingQuestion {
            line: self.start_line,
        })?;
        let answer = non_blank(self.answer).ok_or(ParseError::MissingAnswer {
            line: self.start_line,
        })?;

        let mut card = Card::new(question, answer);
        card.custom_hint = non_blank(self.hint);
        card.difficulty = self.difficulty;
        Ok(card)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

struct Parser {
    set_name: Option<String>,
    difficulty: Option<Difficulty>,
    cards: Vec<Card>,
    current: Option<CardBuilder>,
    current_field: Option<Field>,
    buffer: Vec<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            set_name: None,
            difficulty: None,
            cards: Vec::new(),
            current: None,
            current_field: None,
            buffer: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<()> {
        match Self::parse_line(line) {
            LineType::SetName(name) => {
                self.flush_buffer();
                self.current_field = None;
                self.set_name = Some(name.to_string());
            }
            LineType::SetDifficulty(value) => {
                self.flush_buffer();
                self.current_field = None;
                self.difficulty = Some(parse_difficulty(value, line_num)?);
            }
            LineType::Question(text) => self.handle_question(text, line_num)?,
            LineType::Answer(text) => self.handle_field(Field::Answer, text, line_num)?,
            LineType::Hint(text) => self.handle_field(Field::Hint, text, line_num)?,
            LineType::CardDifficulty(value) => {
                self.flush_buffer();
                self.current_field = None;
                let difficulty = parse_difficulty(value, line_num)?;
                let card = self
                    .current
                    .as_mut()
                    .ok_or(ParseError::MissingQuestion { line: line_num })?;
                card.difficulty = Some(difficulty);
            }
            LineType::Text(text) => {
                if self.current_field.is_none() {
                    return Err(ParseError::UnexpectedText { line: line_num });
                }
                self.buffer.push(text.to_string());
            }
            LineType::Empty => {
                if self.current_field.is_some() {
                    self.buffer.push(String::new());
                }
            }
        }
        Ok(())
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("Set:") {
            LineType::SetName(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("Difficulty:") {
            LineType::SetDifficulty(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("Q:") {
            LineType::Question(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("A:") {
            LineType::Answer(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("H:") {
            LineType::Hint(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("D:") {
            LineType::CardDifficulty(rest.trim())
        } else if trimmed.is_empty() {
            LineType::Empty
        } else {
            LineType::Text(line)
        }
    }

    fn handle_question(&mut self, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();
        if let Some(card) = self.current.take() {
            self.cards.push(card.build()?);
        }
        self.current = Some(CardBuilder::new(line_num));
        self.current_field = Some(Field::Question);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn handle_field(&mut self, field: Field, text: &str, line_num: usize) -> Result<()> {
        self.flush_buffer();
        if self.current.is_none() {
            return Err(ParseError::MissingQuestion { line: line_num });
        }
        self.current_field = Some(field);
        self.buffer.push(text.to_string());
        Ok(())
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }

        let content = self.buffer.join("\n");
        self.buffer.clear();

        if let Some(ref mut card) = self.current {
            match self.current_field {
                Some(Field::Question) => card.question = Some(content),
                Some(Field::Answer) => card.answer = Some(content),
                Some(Field::Hint) => card.hint = Some(content),
                None => {}
            }
        }
    }

    fn finish(mut self) -> Result<FlashcardSet> {
        self.flush_buffer();
        if let Some(card) = self.current.take() {
            self.cards.push(card.build()?);
        }
        if self.cards.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        Ok(FlashcardSet::new(
            self.set_name.unwrap_or_default(),
            self.difficulty.unwrap_or_default(),
            self.cards,
        ))
    }
}

fn parse_difficulty(value: &str, line: usize) -> Result<Difficulty> {
    Difficulty::from_str(value).ok_or_else(|| ParseError::InvalidDifficulty {
        line,
        value: value.to_string(),
    })
}

enum LineType<'a> {
    SetName(&'a str),
    SetDifficulty(&'a str),
    Question(&'a str),
    Answer(&'a str),
    Hint(&'a str),
    CardDifficulty(&'a str),
    Text(&'a str),
    Empty,
}
