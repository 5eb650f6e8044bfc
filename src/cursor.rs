//! Component C: the token-stream cursor.
//!
//! Wraps a [`Scanner`] with one-token lookahead, folding whitespace and
//! comments into a trivia queue attached to the next significant token
//! rather than handing them to the parser as ordinary tokens.

use crate::scanner::{Mark as ScannerMark, Scanner};
use crate::token::{Token, TokenKind};

/// Backtracking checkpoint. Restoring is O(1): the scanner's token cache
/// never shrinks, so rewinding is just moving read cursors back.
#[derive(Debug, Clone)]
pub struct Mark {
    scanner: ScannerMark,
    current: Token,
    has_whitespace: bool,
    trivia: Vec<Token>,
}

pub struct Cursor<'src> {
    scanner: Scanner<'src>,
    current: Token,
    has_whitespace: bool,
    trivia: Vec<Token>,
}

impl<'src> Cursor<'src> {
    #[must_use]
    pub fn new(mut scanner: Scanner<'src>) -> Self {
        let (current, has_whitespace, trivia) = Self::pull_significant(&mut scanner);
        Self { scanner, current, has_whitespace, trivia }
    }

    fn pull_significant(scanner: &mut Scanner<'src>) -> (Token, bool, Vec<Token>) {
        let mut trivia = Vec::new();
        let mut has_whitespace = false;
        loop {
            let t = scanner.consume();
            match t.kind {
                TokenKind::Whitespace => {
                    has_whitespace = true;
                    trivia.push(t);
                }
                TokenKind::Comment(_) => {
                    trivia.push(t);
                }
                _ => return (t, has_whitespace, trivia),
            }
        }
    }

    /// The current, already-significant token.
    #[must_use]
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Trivia (whitespace/comments) that preceded the current token.
    #[must_use]
    pub fn leading_trivia(&self) -> &[Token] {
        &self.trivia
    }

    /// Whether whitespace (of any kind, including across comments)
    /// separates the current token from whatever preceded it.
    #[must_use]
    pub fn has_whitespace(&self) -> bool {
        self.has_whitespace
    }

    #[must_use]
    pub fn dialect(&self) -> crate::dialect::Dialect {
        self.scanner.dialect()
    }

    /// Non-consuming predicate over the current token's kind.
    #[must_use]
    pub fn peek(&self, pred: impl Fn(&TokenKind) -> bool) -> bool {
        pred(&self.current.kind)
    }

    /// Non-consuming check for a case-insensitive ident match.
    #[must_use]
    pub fn peek_keyword(&self, literal: &str) -> bool {
        matches!(&self.current.kind, TokenKind::Ident(v) if v.eq_ignore_ascii_case(literal))
    }

    #[must_use]
    pub fn peek_delim(&self, ch: char) -> bool {
        self.current.is_delim(ch)
    }

    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.current.is_eof()
    }

    /// Consumes and returns the current token unconditionally, advancing
    /// to the next significant token.
    pub fn consume(&mut self) -> Token {
        let consumed = self.current.clone();
        if !consumed.is_eof() {
            let (next, has_whitespace, trivia) = Self::pull_significant(&mut self.scanner);
            self.current = next;
            self.has_whitespace = has_whitespace;
            self.trivia = trivia;
        }
        consumed
    }

    /// Consumes the current token if `pred` matches it; never consumes
    /// otherwise.
    pub fn accept(&mut self, pred: impl Fn(&TokenKind) -> bool) -> Option<Token> {
        if pred(&self.current.kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    pub fn accept_ident(&mut self, literal: &str) -> Option<Token> {
        if self.peek_keyword(literal) {
            Some(self.consume())
        } else {
            None
        }
    }

    pub fn accept_delim(&mut self, ch: char) -> Option<Token> {
        if self.peek_delim(ch) {
            Some(self.consume())
        } else {
            None
        }
    }

    pub fn accept_any_ident(&mut self) -> Option<Token> {
        if self.current.is_ident() {
            Some(self.consume())
        } else {
            None
        }
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark {
            scanner: self.scanner.mark(),
            current: self.current.clone(),
            has_whitespace: self.has_whitespace,
            trivia: self.trivia.clone(),
        }
    }

    pub fn restore_at_mark(&mut self, mark: Mark) {
        self.scanner.restore(mark.scanner);
        self.current = mark.current;
        self.has_whitespace = mark.has_whitespace;
        self.trivia = mark.trivia;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dialect::Dialect;

    fn cursor(src: &str) -> Cursor<'_> {
        Cursor::new(Scanner::new(src, Dialect::Css))
    }

    #[test]
    fn whitespace_becomes_trivia() {
        let mut c = cursor("a   b");
        assert!(c.current().is_ident());
        assert!(!c.has_whitespace());
        c.consume();
        assert!(c.has_whitespace());
        assert_eq!(c.current().ident_value(), Some("b"));
    }

    #[test]
    fn failed_accept_does_not_consume() {
        let mut c = cursor("ident");
        assert!(c.accept_delim(',').is_none());
        assert!(c.current().is_ident());
    }

    #[test]
    fn mark_restore_round_trip() {
        let mut c = cursor("a b c");
        let mark = c.mark();
        c.consume();
        c.consume();
        assert_eq!(c.current().ident_value(), Some("c"));
        c.restore_at_mark(mark);
        assert_eq!(c.current().ident_value(), Some("a"));
    }

    #[test]
    fn comments_are_trivia_not_tokens() {
        let mut c = cursor("/* hi */ a");
        assert!(c.current().is_ident());
        assert_eq!(c.leading_trivia().len(), 2); // comment + whitespace
    }
}
