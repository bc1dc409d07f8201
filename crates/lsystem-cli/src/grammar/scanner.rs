//! Character-level cursor shared by the grammar parser's module-list, predecessor, and
//! expression parsing functions.
//!
//! Unlike a conventional token-stream lexer, this scanner exposes raw character peeking:
//! the grammar mixes two lexical regimes (bare drawing symbols like `+`/`[`/`~` in a module
//! list, and a full arithmetic grammar inside a module's parenthesized arguments), and which
//! regime applies depends on parser state rather than anything a single tokenizer pass could
//! decide up front.

use std::fmt;

/// A 1-based source position, used only for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

pub(crate) struct Scanner<'a> {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    _src: &'a str,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            _src: src,
        }
    }

    #[must_use]
    pub(crate) fn position(&self) -> Position {
        Position { line: self.line, column: self.column }
    }

    #[must_use]
    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    #[must_use]
    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    #[must_use]
    pub(crate) fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Advances one character, updating line/column bookkeeping.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consumes `c` if it is next, returning whether it matched.
    pub(crate) fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes the two-character literal `"->"` if it is next.
    pub(crate) fn eat_arrow(&mut self) -> bool {
        if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
            self.bump();
            self.bump();
            true
        } else {
            false
        }
    }

    /// True if the next two characters form the production arrow `->`.
    #[must_use]
    pub(crate) fn at_arrow(&self) -> bool {
        self.peek() == Some('-') && self.peek_at(1) == Some('>')
    }

    /// Skips spaces and tabs, but not newlines: statements in this grammar are one line each,
    /// so a newline always terminates whatever is being parsed.
    pub(crate) fn skip_inline_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    /// Skips blank lines, inline whitespace, and `#`-comment lines between statements. Stops
    /// right before a `#define`/`#ignore` directive keyword or any other statement.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            self.skip_inline_ws();
            match self.peek() {
                Some('\n') => {
                    self.bump();
                }
                Some('#') if !self.at_directive_keyword() => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    /// True if the scanner is sitting on `#define` or `#ignore` (a directive, not a comment).
    #[must_use]
    fn at_directive_keyword(&self) -> bool {
        self.matches_keyword_at(1, "define") || self.matches_keyword_at(1, "ignore")
    }

    /// True if `keyword` appears at `offset` characters ahead, as a whole word (not a prefix
    /// of a longer identifier).
    #[must_use]
    pub(crate) fn matches_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        let mut idx = offset;
        for expected in keyword.chars() {
            if self.chars.get(self.pos + idx) != Some(&expected) {
                return false;
            }
            idx += 1;
        }
        !matches!(self.chars.get(self.pos + idx), Some(c) if c.is_alphanumeric() || *c == '_')
    }

    /// Reads an identifier (`[A-Za-z_][A-Za-z0-9_]*`) starting at the current position, or
    /// `None` if the current character cannot start one.
    pub(crate) fn read_identifier(&mut self) -> Option<String> {
        let first = self.peek()?;
        if !(first.is_alphabetic() || first == '_') {
            return None;
        }
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Some(ident)
    }
}
