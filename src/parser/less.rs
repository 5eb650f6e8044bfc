//! Component G: the LESS overlay — variables, mixin declarations with
//! guards, and mixin references (including parent-selector lookup
//! chains).

use super::{is_rcurly, is_rparen, Parser};
use crate::ast::{Comparator, NodeId, NodeKind, ReferenceType};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    /// `@name : expr ;`. Entered only after the base at-rule keywords
    /// have been ruled out, so any `AtKeyword` reaching here is a
    /// variable by construction.
    pub(super) fn parse_less_variable_declaration(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::VariableDeclaration);
        let t = self.consume();
        let name = match t.kind {
            TokenKind::AtKeyword(n) => n,
            _ => return Err(Unmatched),
        };
        self.data_mut(node).text = Some(name);
        self.data_mut(node).reference_types = vec![ReferenceType::Variable];

        if self.accept(|k| matches!(k, TokenKind::Colon)).is_none() {
            return Err(Unmatched);
        }

        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::VariableValueExpected),
        }

        self.finish_statement(node);
        Ok(self.close(node))
    }

    /// `.name(params) (when guard)? { … }` or `#name(params) { … }`. Tried
    /// ahead of a plain ruleset since the leading `.ident`/`#ident` is
    /// otherwise indistinguishable from a class/id selector.
    pub(super) fn parse_less_mixin_declaration(&mut self) -> ParseResult<NodeId> {
        let is_class = self.current().is_delim('.');
        let is_id = matches!(self.current().kind, TokenKind::Hash { .. });
        if !is_class && !is_id {
            return Err(Unmatched);
        }

        let node = self.open(NodeKind::MixinDeclaration);
        if is_class {
            self.consume(); // '.'
            match self.accept_any_ident() {
                Some(t) => self.data_mut(node).text = t.ident_value().map(str::to_owned),
                None => return Err(Unmatched),
            }
        } else {
            let t = self.consume(); // Hash
            match t.kind {
                TokenKind::Hash { value, .. } => self.data_mut(node).text = Some(value),
                _ => return Err(Unmatched),
            }
        }

        if !matches!(self.current().kind, TokenKind::LParen) {
            return Err(Unmatched);
        }
        self.consume();
        self.parse_parameter_list(node);

        if self.accept_ident("when").is_some() {
            let guard = self.parse_less_guard()?;
            self.add_child(node, guard);
        }

        if !matches!(self.current().kind, TokenKind::LCurly) {
            return Err(Unmatched);
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    /// `guard-group (('and'|',') guard-group)*`, a `guard-group` being
    /// `'not'? '(' condition ')'`.
    fn parse_less_guard(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::LessGuard);
        loop {
            self.accept_ident("not");
            if !matches!(self.current().kind, TokenKind::LParen) {
                self.error(node, ParseErrorKind::LeftParenthesisExpected);
                return Err(Unmatched);
            }
            self.consume();
            match self.attempt(Self::parse_guard_condition) {
                Ok(cond) => self.add_child(node, cond),
                Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
            }
            if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly]);
            }

            if self.accept_ident("and").is_some() || self.accept(|k| matches!(k, TokenKind::Comma)).is_some() {
                continue;
            }
            break;
        }
        Ok(self.close(node))
    }

    /// `expr (comparator expr)?` — a bare expression is truthy, matching
    /// LESS's guard semantics for calls like `(iscolor(@c))`.
    fn parse_guard_condition(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::GuardCondition);
        let left = self.parse_expression()?;
        self.add_child(node, left);

        if let Some(cmp) = self.try_parse_comparator() {
            self.data_mut(node).comparator = Some(cmp);
            match self.attempt(Self::parse_expression) {
                Ok(right) => self.add_child(node, right),
                Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
            }
        }
        Ok(self.close(node))
    }

    /// `>`, `>=`, `=`, `=<`, `<` — see [`Comparator`].
    fn try_parse_comparator(&mut self) -> Option<Comparator> {
        if self.accept_delim('>').is_some() {
            return Some(if self.accept_delim('=').is_some() { Comparator::Gte } else { Comparator::Gt });
        }
        if self.accept_delim('=').is_some() {
            return Some(if self.accept_delim('<').is_some() { Comparator::Lte } else { Comparator::Eq });
        }
        if self.accept_delim('<').is_some() {
            return Some(Comparator::Lt);
        }
        None
    }

    /// `.a > .b(args);`, `.a.b(args) !important;`, `#ns > .mixin();` — a
    /// chain of class/id segments (optionally `>`-separated for an
    /// explicit parent lookup, or bare-adjacent for an implicit one),
    /// the last of which may carry a call's `(args)`.
    pub(super) fn parse_less_mixin_reference(&mut self) -> ParseResult<NodeId> {
        if !self.current().is_delim('.') && !matches!(self.current().kind, TokenKind::Hash { .. }) {
            return Err(Unmatched);
        }

        let node = self.open(NodeKind::MixinReference);
        let mut name = String::new();

        loop {
            if self.current().is_delim('.') {
                self.consume();
                match self.accept_any_ident() {
                    Some(t) => {
                        if !name.is_empty() {
                            name.push('.');
                        }
                        name.push_str(t.ident_value().unwrap_or_default());
                    }
                    None => return Err(Unmatched),
                }
            } else if matches!(self.current().kind, TokenKind::Hash { .. }) {
                let t = self.consume();
                if let TokenKind::Hash { value, .. } = t.kind {
                    if !name.is_empty() {
                        name.push('#');
                    }
                    name.push_str(&value);
                }
            } else {
                break;
            }

            if self.accept_delim('>').is_some() {
                continue;
            }
            let next_is_segment = self.current().is_delim('.') || matches!(self.current().kind, TokenKind::Hash { .. });
            if next_is_segment && !self.cursor.has_whitespace() {
                continue;
            }
            break;
        }

        if name.is_empty() {
            return Err(Unmatched);
        }
        self.data_mut(node).text = Some(name);
        self.data_mut(node).reference_types = vec![ReferenceType::Mixin];

        if matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            self.parse_argument_list(node);
        }

        if self.accept_delim('!').is_some() {
            self.accept_ident("important");
        }

        if !matches!(self.current().kind, TokenKind::Semicolon | TokenKind::RCurly | TokenKind::Eof) {
            return Err(Unmatched);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }
}
