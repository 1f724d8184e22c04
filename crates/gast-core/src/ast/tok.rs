//! Tokens and the two generic carriers built on them.
//!
//! A [`Token`] is the only place where source positions live in the generic AST.
//! Literals and identifiers travel as [`Wrap`]ped values so their text and
//! position stay together; bracket-delimited constructs keep both delimiters in
//! a [`Bracket`] even when they carry no meaning, so that an empty `[]` still has
//! a span.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A concrete position in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Source text of the token.
    pub str: String,
    /// Byte offset of the first character.
    pub charpos: usize,
    /// 1-based line.
    pub line: usize,
    /// 0-based column, in bytes.
    pub column: usize,
    pub file: Arc<str>,
}

impl Location {
    pub fn end_charpos(&self) -> usize {
        self.charpos + self.str.len()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A token read from source.
    Origin(Location),
    /// A token synthesized by a normalizer; the label says what it stands for.
    Fake(String),
    /// A token whose position was erased for structural comparison.
    Abstract,
}

impl Token {
    pub fn fake(label: impl Into<String>) -> Self {
        Token::Fake(label.into())
    }

    /// Erase the position, keeping the fake marker of synthesized tokens.
    pub fn abstracted(&self) -> Self {
        match self {
            Token::Origin(_) | Token::Abstract => Token::Abstract,
            Token::Fake(label) => Token::Fake(label.clone()),
        }
    }

    pub fn is_fake(&self) -> bool {
        matches!(self, Token::Fake(_))
    }

    pub fn is_origin(&self) -> bool {
        matches!(self, Token::Origin(_))
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, Token::Abstract)
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Token::Origin(loc) => Some(loc),
            _ => None,
        }
    }

    /// Text of the token: source text, fake label, or nothing.
    pub fn str_of(&self) -> &str {
        match self {
            Token::Origin(loc) => &loc.str,
            Token::Fake(label) => label,
            Token::Abstract => "",
        }
    }

    pub fn charpos(&self) -> Option<usize> {
        self.location().map(|loc| loc.charpos)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Origin(loc) => write!(f, "{:?}@{}", loc.str, loc),
            Token::Fake(label) => write!(f, "fake({label:?})"),
            Token::Abstract => f.write_str("abstract"),
        }
    }
}

/// A value paired with the token it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wrap<T> {
    pub value: T,
    pub tok: Token,
}

impl<T> Wrap<T> {
    pub fn new(value: T, tok: Token) -> Self {
        Self { value, tok }
    }

    pub fn fake(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            tok: Token::fake(label),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Wrap<U> {
        Wrap {
            value: f(self.value),
            tok: self.tok,
        }
    }
}

impl Wrap<String> {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// A value between an opening and a closing delimiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket<T> {
    pub open: Token,
    pub value: T,
    pub close: Token,
}

impl<T> Bracket<T> {
    pub fn new(open: Token, value: T, close: Token) -> Self {
        Self { open, value, close }
    }

    /// Bracket with synthesized `(`/`)` delimiters.
    pub fn fake(value: T) -> Self {
        Self {
            open: Token::fake("("),
            value,
            close: Token::fake(")"),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Bracket<U> {
        Bracket {
            open: self.open,
            value: f(self.value),
            close: self.close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(text: &str, charpos: usize) -> Token {
        Token::Origin(Location {
            str: text.to_string(),
            charpos,
            line: 1,
            column: charpos,
            file: Arc::from("a.js"),
        })
    }

    #[test]
    fn abstracting_erases_positions() {
        let a = origin("x", 0);
        let b = origin("x", 10);
        assert_ne!(a, b);
        assert_eq!(a.abstracted(), b.abstracted());
        assert!(a.abstracted().is_abstract());
    }

    #[test]
    fn abstracting_keeps_fake_marker() {
        let fake = Token::fake("this");
        let abs = fake.abstracted();
        assert!(abs.is_fake());
        assert_eq!(abs.str_of(), "this");
        assert_eq!(abs.abstracted(), abs);
    }
}
