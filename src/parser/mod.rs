//! Component E/F/G: the recursive-descent parser and its SCSS/LESS
//! overlays.
//!
//! Every non-terminal follows the same discipline: allocate a node at the
//! current offset, try to populate it (marking and restoring around
//! optional alternatives), attach a diagnostic and optionally resync when
//! a required piece is missing, then finish the node's length. Errors
//! never propagate as Rust errors — a non-terminal either returns a
//! finished node or `Err(Unmatched)`, meaning "try the next alternative".

mod at_rule;
mod declaration;
mod less;
mod scss;
mod selector;
mod stylesheet;

use crate::ast::{NodeData, NodeId, NodeKind, Tree};
use crate::cursor::{Cursor, Mark};
use crate::dialect::Dialect;
use crate::diagnostics::{Diagnostic, ParseErrorKind, ParseResult, Severity, Unmatched};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind};

/// Parser configuration: which dialect's overlay non-terminals are
/// installed, and how aggressively to recover from errors.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    pub dialect: Dialect,
    /// When true, a failed required construct resyncs and keeps parsing
    /// the enclosing construct; when false, the enclosing construct is
    /// abandoned at the first diagnostic. The spec's default policy (and
    /// the only mode `parse` uses) is `true` — best-effort recovery.
    pub ignore_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { dialect: Dialect::Css, ignore_errors: true }
    }
}

pub(crate) struct Parser<'src> {
    cursor: Cursor<'src>,
    tree: Tree,
    config: ParserConfig,
    /// Byte offset just past the last token actually consumed; used to
    /// finish a node's length without re-reading the cursor.
    last_end: usize,
}

type StopPred = fn(&TokenKind) -> bool;

pub(crate) fn is_semicolon(k: &TokenKind) -> bool {
    matches!(k, TokenKind::Semicolon)
}
pub(crate) fn is_rcurly(k: &TokenKind) -> bool {
    matches!(k, TokenKind::RCurly)
}
pub(crate) fn is_rparen(k: &TokenKind) -> bool {
    matches!(k, TokenKind::RParen)
}
pub(crate) fn is_eof(k: &TokenKind) -> bool {
    matches!(k, TokenKind::Eof)
}

impl<'src> Parser<'src> {
    pub(crate) fn new(text: &'src str, config: ParserConfig) -> Self {
        let scanner = Scanner::new(text, config.dialect);
        Self { cursor: Cursor::new(scanner), tree: Tree::new(), config, last_end: 0 }
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    // --- node lifecycle -----------------------------------------------

    fn open(&mut self, kind: NodeKind) -> NodeId {
        self.tree.alloc(kind, self.cursor.current().offset)
    }

    fn open_at(&mut self, kind: NodeKind, offset: usize) -> NodeId {
        self.tree.alloc(kind, offset)
    }

    fn close(&mut self, id: NodeId) -> NodeId {
        self.tree.finish(id, self.last_end.max(self.tree.get(id).offset));
        id
    }

    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.tree.add_child(parent, child);
    }

    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.tree.get_mut(id).data
    }

    // --- cursor plumbing ------------------------------------------------

    fn current(&self) -> &Token {
        self.cursor.current()
    }

    fn at_eof(&self) -> bool {
        self.cursor.at_eof()
    }

    fn mark(&self) -> Mark {
        self.cursor.mark()
    }

    fn restore(&mut self, mark: Mark) {
        self.cursor.restore_at_mark(mark);
    }

    fn consume(&mut self) -> Token {
        let t = self.cursor.consume();
        self.last_end = t.end();
        t
    }

    fn accept(&mut self, pred: impl Fn(&TokenKind) -> bool) -> Option<Token> {
        if pred(&self.current().kind) {
            Some(self.consume())
        } else {
            None
        }
    }

    fn accept_ident(&mut self, literal: &str) -> Option<Token> {
        if self.cursor.peek_keyword(literal) {
            Some(self.consume())
        } else {
            None
        }
    }

    fn accept_delim(&mut self, ch: char) -> Option<Token> {
        if self.cursor.peek_delim(ch) {
            Some(self.consume())
        } else {
            None
        }
    }

    fn accept_any_ident(&mut self) -> Option<Token> {
        if self.current().is_ident() {
            Some(self.consume())
        } else {
            None
        }
    }

    // --- diagnostics ----------------------------------------------------

    /// Attaches an error diagnostic to `node` at the current token (or a
    /// zero-length marker at the current offset if the stream is at EOF).
    fn error(&mut self, node: NodeId, kind: ParseErrorKind) {
        let t = self.current();
        let (offset, length) = if t.is_eof() { (t.offset, 0) } else { (t.offset, t.len) };
        self.tree.push_diagnostic(node, Diagnostic { severity: Severity::Error, ..Diagnostic::error(kind, offset, length) });
        log::warn!("parse error {:?} at {}:{}", kind, offset, length);
    }

    /// A required terminal is missing: attach a diagnostic and, if a
    /// resync set is given, discard tokens up to it.
    fn expect_or_resync(&mut self, node: NodeId, kind: ParseErrorKind, stops: &[StopPred]) {
        self.error(node, kind);
        if !stops.is_empty() {
            self.resync(stops);
        }
    }

    fn resync(&mut self, stops: &[StopPred]) {
        while !self.at_eof() {
            if stops.iter().any(|f| f(&self.current().kind)) {
                break;
            }
            self.consume();
        }
    }

    /// Runs `f`; on `Unmatched`, rewinds the cursor so the caller can try
    /// another alternative.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let mark = self.mark();
        let result = f(self);
        if result.is_err() {
            self.restore(mark);
        }
        result
    }

    /// Runs the parse to completion, returning the populated arena and its
    /// root. `lib.rs` pairs this with the `SourceBuffer` it already holds
    /// to build the public `Stylesheet`.
    pub(crate) fn parse(mut self) -> (Tree, NodeId) {
        log::trace!("parse stylesheet, dialect={:?}", self.config.dialect);
        let root = self.stylesheet();
        (self.tree, root)
    }
}

pub(crate) fn unmatched<T>() -> ParseResult<T> {
    Err(Unmatched)
}
