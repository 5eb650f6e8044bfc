//! Top-level grammar: `Stylesheet`, `Ruleset`, and the shared
//! `Declarations` block used by rulesets, at-rule bodies and (through the
//! SCSS overlay) nested properties.

use super::{is_rcurly, is_semicolon, Parser};
use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    /// `Stylesheet = (AtRule | Ruleset | UnknownAtRule)*`
    pub(super) fn stylesheet(&mut self) -> NodeId {
        let root = self.open(NodeKind::Stylesheet);
        while !self.at_eof() {
            if matches!(self.current().kind, TokenKind::Cdo | TokenKind::Cdc) {
                self.consume();
                continue;
            }
            match self.parse_top_level_statement() {
                Ok(stmt) => self.add_child(root, stmt),
                Err(Unmatched) => {
                    self.error(root, ParseErrorKind::RuleOrSelectorExpected);
                    self.consume();
                }
            }
        }
        self.close(root)
    }

    fn parse_top_level_statement(&mut self) -> ParseResult<NodeId> {
        if matches!(self.current().kind, TokenKind::AtKeyword(_)) {
            return self.parse_at_rule();
        }
        if self.dialect().is_scss() && matches!(self.current().kind, TokenKind::ScssVariable(_)) {
            return self.parse_scss_variable_declaration();
        }
        if self.dialect().is_less() {
            if let Ok(mixin_ref) = self.attempt(Self::parse_less_mixin_reference) {
                return Ok(mixin_ref);
            }
            if let Ok(mixin_decl) = self.attempt(Self::parse_less_mixin_declaration) {
                return Ok(mixin_decl);
            }
        }
        self.attempt(Self::parse_ruleset)
    }

    /// `Selectors '{' DeclarationBody '}'`
    fn parse_ruleset(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Ruleset);
        let selectors = self.parse_selector_list()?;
        self.add_child(node, selectors);

        if !matches!(self.current().kind, TokenKind::LCurly) {
            return Err(Unmatched);
        }
        let body = self.parse_declarations_block();
        self.add_child(node, body);
        Ok(self.close(node))
    }

    /// Parses `'{' statement* '}'`, assuming the current token is the
    /// opening `{`. Shared by rulesets, at-rule bodies, and SCSS nested
    /// properties — all are "a block of statements", and this parser is
    /// permissive about which statement kinds show up where, matching the
    /// spec's best-effort recovery policy.
    pub(super) fn parse_declarations_block(&mut self) -> NodeId {
        let node = self.open(NodeKind::Declarations);
        self.consume(); // '{'

        while !matches!(self.current().kind, TokenKind::RCurly | TokenKind::Eof) {
            match self.parse_block_statement() {
                Ok(stmt) => self.add_child(node, stmt),
                Err(Unmatched) => {
                    self.error(node, ParseErrorKind::DeclarationExpected);
                    self.resync(&[is_semicolon, is_rcurly]);
                    self.accept(|k| matches!(k, TokenKind::Semicolon));
                }
            }
        }

        if self.accept(|k| matches!(k, TokenKind::RCurly)).is_none() {
            self.error(node, ParseErrorKind::RightCurlyExpected);
        }
        self.close(node)
    }

    fn parse_block_statement(&mut self) -> ParseResult<NodeId> {
        if matches!(self.current().kind, TokenKind::AtKeyword(_)) {
            return self.parse_at_rule();
        }
        if self.dialect().is_scss() && matches!(self.current().kind, TokenKind::ScssVariable(_)) {
            return self.parse_scss_variable_declaration();
        }
        if self.dialect().is_less() {
            if let Ok(mixin_ref) = self.attempt(Self::parse_less_mixin_reference) {
                return Ok(mixin_ref);
            }
            if let Ok(mixin_decl) = self.attempt(Self::parse_less_mixin_declaration) {
                return Ok(mixin_decl);
            }
        }
        if let Ok(decl) = self.attempt(Self::parse_declaration) {
            return Ok(decl);
        }
        self.attempt(Self::parse_ruleset)
    }

    /// Used by `@media`/`@supports`/`@font-face`/`@page`/`@viewport`/
    /// `@document` bodies: requires `{` and attaches a `Declarations`
    /// child, or emits a diagnostic if it's missing.
    pub(super) fn parse_block_body_into(&mut self, node: NodeId) {
        if matches!(self.current().kind, TokenKind::LCurly) {
            let body = self.parse_declarations_block();
            self.add_child(node, body);
        } else {
            self.error(node, ParseErrorKind::LeftCurlyExpected);
        }
    }
}
