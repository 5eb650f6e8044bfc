//! Selector non-terminals: `SelectorList`, `Selector`, `SimpleSelector`
//! and its class/id/attribute/pseudo/type components.

use super::{is_rcurly, is_rparen, is_semicolon, Parser};
use crate::ast::{Combinator, NodeKind};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;
use lazy_static::lazy_static;

lazy_static! {
    /// Standard CSS Selectors pseudo-class/element names. Used only to
    /// flag a `PseudoSelector` as standard vs. framework/vendor-specific;
    /// an unrecognized name still parses the same way, matching the rest
    /// of the grammar's best-effort recovery policy.
    static ref KNOWN_PSEUDOS: &'static [&'static str] = &[
        "hover", "active", "focus", "focus-visible", "focus-within", "visited",
        "link", "target", "root", "empty", "first-child", "last-child",
        "only-child", "first-of-type", "last-of-type", "only-of-type",
        "nth-child", "nth-last-child", "nth-of-type", "nth-last-of-type",
        "not", "is", "where", "has", "lang", "dir", "disabled", "enabled",
        "checked", "required", "optional", "read-only", "read-write",
        "placeholder-shown", "default", "valid", "invalid", "in-range",
        "out-of-range", "before", "after", "first-line", "first-letter",
        "selection", "placeholder", "backdrop", "marker", "host",
        "host-context", "slotted", "scope",
    ];
}

impl<'src> Parser<'src> {
    /// A comma-separated list of selectors, terminated by the caller's
    /// `{` (ruleset) or the construct that follows (e.g. `@include`).
    pub(super) fn parse_selector_list(&mut self) -> ParseResult<crate::ast::NodeId> {
        let list = self.open(NodeKind::SelectorList);
        let first = self.parse_selector()?;
        self.add_child(list, first);

        while self.accept(|k| matches!(k, TokenKind::Comma)).is_some() {
            match self.parse_selector() {
                Ok(sel) => self.add_child(list, sel),
                Err(Unmatched) => {
                    self.error(list, ParseErrorKind::SelectorExpected);
                    break;
                }
            }
        }

        Ok(self.close(list))
    }

    /// A sequence of simple selectors joined by explicit or implicit
    /// (descendant) combinators.
    pub(super) fn parse_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let sel = self.open(NodeKind::Selector);
        let first = self.parse_simple_selector()?;
        self.add_child(sel, first);

        loop {
            let had_whitespace = self.cursor.has_whitespace();
            if let Some(combinator) = self.try_parse_combinator() {
                let node = self.open(NodeKind::SelectorCombinator);
                self.data_mut(node).combinator = Some(combinator);
                self.close(node);
                self.add_child(sel, node);
            } else if had_whitespace {
                if self.at_selector_end() {
                    break;
                }
                let node = self.open(NodeKind::SelectorCombinator);
                self.data_mut(node).combinator = Some(Combinator::Descendant);
                self.close(node);
                self.add_child(sel, node);
            } else {
                break;
            }

            match self.attempt(Self::parse_simple_selector) {
                Ok(simple) => self.add_child(sel, simple),
                Err(Unmatched) => break,
            }
        }

        Ok(self.close(sel))
    }

    fn at_selector_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::LCurly | TokenKind::Comma | TokenKind::Semicolon | TokenKind::RParen | TokenKind::Eof)
    }

    fn try_parse_combinator(&mut self) -> Option<Combinator> {
        if self.accept_delim('>').is_some() {
            if self.accept_delim('>').is_some() {
                if self.accept_delim('>').is_some() {
                    return Some(Combinator::ShadowPiercing);
                }
                return Some(Combinator::Child);
            }
            return Some(Combinator::Child);
        }
        if self.accept_delim('+').is_some() {
            return Some(Combinator::Sibling);
        }
        if self.accept(|k| matches!(k, TokenKind::Includes)).is_some() {
            return Some(Combinator::GeneralSibling);
        }
        if self.accept_delim('~').is_some() {
            return Some(Combinator::GeneralSibling);
        }
        None
    }

    fn parse_simple_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let simple = self.open(NodeKind::SimpleSelector);
        let mut matched_any = false;

        if self.accept_any_ident().is_some() || self.accept_delim('*').is_some() || self.accept_delim('&').is_some() {
            matched_any = true;
        }

        loop {
            if self.peek_class() {
                let node = self.parse_class_selector()?;
                self.add_child(simple, node);
            } else if matches!(self.current().kind, TokenKind::Hash { .. }) {
                let node = self.parse_id_selector()?;
                self.add_child(simple, node);
            } else if matches!(self.current().kind, TokenKind::LBracket) {
                let node = self.parse_attribute_selector()?;
                self.add_child(simple, node);
            } else if matches!(self.current().kind, TokenKind::Colon) {
                let node = self.parse_pseudo_selector()?;
                self.add_child(simple, node);
            } else {
                break;
            }
            matched_any = true;
        }

        if !matched_any {
            return Err(Unmatched);
        }
        Ok(self.close(simple))
    }

    fn peek_class(&self) -> bool {
        self.current().is_delim('.')
    }

    fn parse_class_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let node = self.open(NodeKind::ClassSelector);
        self.accept_delim('.');
        match self.accept_any_ident() {
            Some(t) => {
                self.data_mut(node).text = t.ident_value().map(str::to_owned);
            }
            None => {
                self.error(node, ParseErrorKind::IdentifierExpected);
            }
        }
        Ok(self.close(node))
    }

    fn parse_id_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let node = self.open(NodeKind::IdSelector);
        if let Some(t) = self.accept(|k| matches!(k, TokenKind::Hash { .. })) {
            if let TokenKind::Hash { value, is_id } = &t.kind {
                self.data_mut(node).text = Some(value.clone());
                self.data_mut(node).is_id_selector = *is_id;
            }
        }
        Ok(self.close(node))
    }

    /// `'[' ((IDENT | '*') '|')? IDENT (AttributeOperator (STRING | IDENT))? ']'`
    ///
    /// A bare `[attr]` yields just an `Identifier` child; `[attr op val]`
    /// wraps the name/value pair in a `BinaryExpression` so the matched
    /// operator and value are inspectable the same way any other operator
    /// chain in the grammar is, instead of being silently discarded.
    fn parse_attribute_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let node = self.open(NodeKind::AttributeSelector);
        self.consume(); // [

        self.parse_attribute_namespace(node);

        let name = match self.accept_any_ident() {
            Some(t) => {
                self.data_mut(node).text = t.ident_value().map(str::to_owned);
                let ident = self.open_at(NodeKind::Identifier, t.offset);
                self.data_mut(ident).text = t.ident_value().map(str::to_owned);
                self.tree.finish(ident, t.end());
                Some(ident)
            }
            None => {
                self.error(node, ParseErrorKind::IdentifierExpected);
                None
            }
        };

        if let Some(op) = self.parse_attribute_operator() {
            let value = self.parse_attribute_value();
            if value.is_none() {
                self.error(node, ParseErrorKind::StringLiteralExpected);
            }
            if let (Some(name), Some(value)) = (name, value) {
                let offset = self.tree.get(name).offset;
                let bin = self.open_at(NodeKind::BinaryExpression, offset);
                self.add_child(bin, name);
                self.add_child(bin, op);
                self.add_child(bin, value);
                let bin = self.close(bin);
                self.add_child(node, bin);
            }
        } else if let Some(name) = name {
            self.add_child(node, name);
        }

        if self.accept(|k| matches!(k, TokenKind::RBracket)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::RightSquareBracketExpected, &[is_rcurly, is_semicolon]);
        }

        Ok(self.close(node))
    }

    /// `((IDENT | '*') '|')?`, tried speculatively since a bare `attr` and
    /// a namespace-prefixed `ns|attr` share their first token.
    fn parse_attribute_namespace(&mut self, node: crate::ast::NodeId) {
        let mark = self.mark();
        let ns = self.accept_any_ident().or_else(|| self.accept_delim('*'));
        match ns {
            Some(t) if self.current().is_delim('|') => {
                self.consume(); // '|'
                let ns_node = self.open_at(NodeKind::Identifier, t.offset);
                let text = match &t.kind {
                    TokenKind::Ident(v) => v.clone(),
                    _ => "*".to_owned(),
                };
                self.data_mut(ns_node).text = Some(text);
                self.tree.finish(ns_node, t.end());
                self.add_child(node, ns_node);
            }
            _ => self.restore(mark),
        }
    }

    fn parse_attribute_operator(&mut self) -> Option<crate::ast::NodeId> {
        let spelling = match &self.current().kind {
            TokenKind::Delim('=') => "=",
            TokenKind::Includes => "~=",
            TokenKind::DashMatch => "|=",
            TokenKind::PrefixMatch => "^=",
            TokenKind::SuffixMatch => "$=",
            TokenKind::SubstringMatch => "*=",
            _ => return None,
        };
        let t = self.consume();
        let node = self.open_at(NodeKind::Operator, t.offset);
        self.data_mut(node).text = Some(spelling.to_owned());
        self.tree.finish(node, t.end());
        Some(node)
    }

    fn parse_attribute_value(&mut self) -> Option<crate::ast::NodeId> {
        if let Some(t) = self.accept(|k| matches!(k, TokenKind::QuotedString(_))) {
            let node = self.open_at(NodeKind::StringLiteral, t.offset);
            if let TokenKind::QuotedString(v) = &t.kind {
                self.data_mut(node).text = Some(v.clone());
            }
            self.tree.finish(node, t.end());
            return Some(node);
        }
        if let Some(t) = self.accept_any_ident() {
            let node = self.open_at(NodeKind::Identifier, t.offset);
            self.data_mut(node).text = t.ident_value().map(str::to_owned);
            self.tree.finish(node, t.end());
            return Some(node);
        }
        None
    }

    fn parse_pseudo_selector(&mut self) -> ParseResult<crate::ast::NodeId> {
        let node = self.open(NodeKind::PseudoSelector);
        self.consume(); // first ':'
        self.accept(|k| matches!(k, TokenKind::Colon)); // optional second ':' (pseudo-element)

        match self.accept_any_ident().or_else(|| self.accept(|k| matches!(k, TokenKind::Function(_)))) {
            Some(t) => {
                let is_function = matches!(t.kind, TokenKind::Function(_));
                let name = match &t.kind {
                    TokenKind::Ident(v) | TokenKind::Function(v) => Some(v.clone()),
                    _ => None,
                };
                if let Some(name) = &name {
                    self.data_mut(node).is_known_pseudo = KNOWN_PSEUDOS.contains(&name.to_ascii_lowercase().as_str());
                }
                self.data_mut(node).text = name;
                if is_function {
                    if matches!(self.dialect(), crate::dialect::Dialect::Scss | crate::dialect::Dialect::Less) {
                        if let Ok(sel) = self.attempt(Self::parse_selector_list) {
                            self.add_child(node, sel);
                        }
                    } else if let Ok(expr) = self.attempt(Self::parse_expression) {
                        self.add_child(node, expr);
                    }
                    if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                        self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly]);
                    }
                }
            }
            None => self.error(node, ParseErrorKind::IdentifierExpected),
        }

        Ok(self.close(node))
    }
}
