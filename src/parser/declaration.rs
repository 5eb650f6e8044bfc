//! Declaration and expression non-terminals: `Declaration`, `Property`,
//! `Expression`, `BinaryExpression`, `Term` and its leaf kinds.

use super::{is_rcurly, is_rparen, is_semicolon, Parser};
use crate::ast::{NodeId, NodeKind, ReferenceType};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    /// `Property ':' Expression ('!' 'important')? ';'?`
    pub(super) fn parse_declaration(&mut self) -> ParseResult<NodeId> {
        if !self.looks_like_property_start() {
            return Err(Unmatched);
        }

        let decl = self.open(NodeKind::Declaration);
        let prop = self.parse_property()?;
        let is_custom = self.tree.get(prop).data.is_custom_property;
        self.data_mut(decl).is_custom_property = is_custom;
        if is_custom {
            self.tree.get_mut(decl).kind = NodeKind::CustomPropertyDeclaration;
        }
        self.add_child(decl, prop);

        match self.accept(|k| matches!(k, TokenKind::Colon)) {
            Some(t) => self.data_mut(decl).colon_offset = Some(t.offset),
            None => {
                self.error(decl, ParseErrorKind::ColonExpected);
                self.resync(&[is_semicolon, is_rcurly]);
                self.accept(|k| matches!(k, TokenKind::Semicolon));
                return Ok(self.close(decl));
            }
        }

        if is_custom {
            let raw = self.parse_custom_property_value()?;
            self.add_child(decl, raw);
        } else if self.dialect().is_scss() && matches!(self.current().kind, TokenKind::LCurly) {
            let prefix = self.tree.get(prop).data.text.clone().unwrap_or_default();
            match self.parse_nested_properties(&prefix) {
                Ok(nested) => self.add_child(decl, nested),
                Err(Unmatched) => self.error(decl, ParseErrorKind::PropertyValueExpected),
            }
        } else {
            match self.attempt(Self::parse_expression) {
                Ok(expr) => self.add_child(decl, expr),
                Err(Unmatched) => self.error(decl, ParseErrorKind::PropertyValueExpected),
            }
        }

        if self.accept_delim('!').is_some() {
            if self.accept_ident("important").is_none() {
                self.error(decl, ParseErrorKind::UnknownKeyword);
            } else {
                self.data_mut(decl).important = true;
            }
        }

        if !matches!(self.current().kind, TokenKind::Semicolon | TokenKind::RCurly | TokenKind::Eof) {
            self.error(decl, ParseErrorKind::SemiColonExpected);
            self.resync(&[is_semicolon, is_rcurly]);
        }
        if let Some(t) = self.accept(|k| matches!(k, TokenKind::Semicolon)) {
            self.data_mut(decl).semicolon_offset = Some(t.offset);
        }

        Ok(self.close(decl))
    }

    fn looks_like_property_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Ident(_) | TokenKind::InterpolationStart | TokenKind::LessInterpolationStart
        )
    }

    fn parse_property(&mut self) -> ParseResult<NodeId> {
        let prop = self.open(NodeKind::Property);

        if matches!(self.current().kind, TokenKind::InterpolationStart | TokenKind::LessInterpolationStart) {
            let ident = self.parse_interpolated_identifier()?;
            self.add_child(prop, ident);
        } else if let Some(t) = self.accept_any_ident() {
            let name = t.ident_value().unwrap_or_default().to_string();
            let is_custom = name.starts_with("--");
            self.data_mut(prop).is_custom_property = is_custom;

            if (self.dialect().is_scss() || self.dialect().is_less())
                && matches!(self.current().kind, TokenKind::InterpolationStart | TokenKind::LessInterpolationStart)
            {
                let ident = self.parse_interpolated_identifier()?;
                self.data_mut(prop).text = Some(name);
                self.add_child(prop, ident);
            } else {
                self.data_mut(prop).text = Some(name);
            }
        } else {
            return Err(Unmatched);
        }

        Ok(self.close(prop))
    }

    /// `prefix-#{expr}-suffix` (or LESS's `@{…}`): a composite identifier
    /// whose only modeled children are the interpolation spans — the
    /// literal ident runs between them are recovered from the node's own
    /// byte range, not re-modeled as children.
    pub(super) fn parse_interpolated_identifier(&mut self) -> ParseResult<NodeId> {
        let ident = self.open(NodeKind::Identifier);
        loop {
            match self.current().kind {
                TokenKind::InterpolationStart if self.dialect().is_scss() => {
                    let interp = self.parse_interpolation()?;
                    self.add_child(ident, interp);
                }
                TokenKind::LessInterpolationStart if self.dialect().is_less() => {
                    let interp = self.parse_interpolation()?;
                    self.add_child(ident, interp);
                }
                TokenKind::Ident(_) if !self.cursor.has_whitespace() => {
                    self.consume();
                }
                _ => break,
            }
        }
        Ok(self.close(ident))
    }

    fn parse_custom_property_value(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::CustomPropertySet);
        while !matches!(self.current().kind, TokenKind::Semicolon | TokenKind::RCurly | TokenKind::Eof) {
            self.consume();
        }
        Ok(self.close(node))
    }

    /// `#{…}` / `@{…}`: the opener has already been matched by the caller
    /// through `current().kind`; this consumes it, the inner expression,
    /// and the closing `}`.
    pub(super) fn parse_interpolation(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Interpolation);
        self.consume();
        match self.attempt(Self::parse_expression) {
            Ok(expr) => self.add_child(node, expr),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }
        if self.accept(|k| matches!(k, TokenKind::RCurly)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::RightCurlyExpected, &[is_rcurly, is_semicolon]);
        }
        Ok(self.close(node))
    }

    /// Left-associative chain of `BinaryExpression`s. Adjacent terms with
    /// no explicit operator between them are joined by an implicit
    /// "space" operator (an `Operator` node with no text), matching CSS
    /// shorthand syntax like `1px solid red`.
    pub(super) fn parse_expression(&mut self) -> ParseResult<NodeId> {
        let expr = self.open(NodeKind::Expression);
        let mut left = self.parse_term()?;

        loop {
            let mark = self.mark();
            if let Some(op) = self.try_parse_operator() {
                match self.attempt(Self::parse_term) {
                    Ok(right) => left = self.wrap_binary(left, op, right),
                    Err(Unmatched) => {
                        self.restore(mark);
                        break;
                    }
                }
                continue;
            }

            match self.attempt(Self::parse_term) {
                Ok(right) => {
                    let left_end = self.tree.get(left).end();
                    let right_offset = self.tree.get(right).offset;
                    let space = self.open_at(NodeKind::Operator, left_end);
                    self.tree.finish(space, right_offset);
                    left = self.wrap_binary(left, space, right);
                }
                Err(Unmatched) => {
                    self.restore(mark);
                    break;
                }
            }
        }

        self.add_child(expr, left);
        Ok(self.close(expr))
    }

    fn wrap_binary(&mut self, left: NodeId, op: NodeId, right: NodeId) -> NodeId {
        let offset = self.tree.get(left).offset;
        let bin = self.open_at(NodeKind::BinaryExpression, offset);
        self.add_child(bin, left);
        self.add_child(bin, op);
        self.add_child(bin, right);
        self.close(bin)
    }

    fn try_parse_operator(&mut self) -> Option<NodeId> {
        let chars = [',', '/', '*', '+', '-'];
        for ch in chars {
            if let Some(t) = self.accept_delim(ch) {
                let node = self.open_at(NodeKind::Operator, t.offset);
                self.data_mut(node).text = Some(ch.to_string());
                self.tree.finish(node, t.end());
                return Some(node);
            }
        }
        None
    }

    pub(super) fn parse_term(&mut self) -> ParseResult<NodeId> {
        let term = self.open(NodeKind::Term);
        let child = self.parse_term_inner()?;
        self.add_child(term, child);
        Ok(self.close(term))
    }

    fn parse_term_inner(&mut self) -> ParseResult<NodeId> {
        match &self.current().kind {
            TokenKind::Number(_) | TokenKind::Percentage(_) | TokenKind::Dimension { .. } => self.parse_numeric_value(),
            TokenKind::Hash { .. } => self.parse_hex_color(),
            TokenKind::QuotedString(_) | TokenKind::BadString(_) => self.parse_string_literal(),
            TokenKind::Url(_) | TokenKind::BadUrl(_) => self.parse_uri(),
            TokenKind::Function(_) => self.parse_function(),
            TokenKind::Ident(_) => self.parse_identifier_term(),
            TokenKind::ScssVariable(_) if self.dialect().is_scss() => self.parse_variable_name_ref(),
            TokenKind::AtKeyword(_) if self.dialect().is_less() => self.parse_variable_name_ref(),
            TokenKind::InterpolationStart if self.dialect().is_scss() => self.parse_interpolation(),
            TokenKind::LessInterpolationStart if self.dialect().is_less() => self.parse_interpolation(),
            TokenKind::EscapedValue(_) if self.dialect().is_less() => self.parse_escaped_value(),
            TokenKind::LParen if self.dialect().is_scss() => self.parse_map(),
            _ => Err(Unmatched),
        }
    }

    fn parse_numeric_value(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::NumericValue);
        let t = self.consume();
        match t.kind {
            TokenKind::Number(n) => self.data_mut(node).number = Some(n),
            TokenKind::Percentage(n) => {
                self.data_mut(node).number = Some(n);
                self.data_mut(node).unit = Some("%".to_string());
            }
            TokenKind::Dimension { value, unit } => {
                self.data_mut(node).number = Some(value);
                self.data_mut(node).unit = Some(unit);
            }
            _ => return Err(Unmatched),
        }
        Ok(self.close(node))
    }

    fn parse_hex_color(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::HexColorValue);
        let t = self.consume();
        if let TokenKind::Hash { value, .. } = t.kind {
            self.data_mut(node).text = Some(value);
        }
        Ok(self.close(node))
    }

    fn parse_string_literal(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::StringLiteral);
        let t = self.consume();
        let bad = matches!(t.kind, TokenKind::BadString(_));
        if let TokenKind::QuotedString(v) | TokenKind::BadString(v) = t.kind {
            self.data_mut(node).text = Some(v);
        }
        if bad {
            self.error(node, ParseErrorKind::StringLiteralExpected);
        }
        Ok(self.close(node))
    }

    fn parse_uri(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Uri);
        let t = self.consume();
        let bad = matches!(t.kind, TokenKind::BadUrl(_));
        if let TokenKind::Url(v) | TokenKind::BadUrl(v) = t.kind {
            self.data_mut(node).text = Some(v);
        }
        if bad {
            self.error(node, ParseErrorKind::URIOrStringExpected);
        }
        Ok(self.close(node))
    }

    pub(super) fn parse_function(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Function);
        let t = self.consume();
        if let TokenKind::Function(name) = t.kind {
            self.data_mut(node).text = Some(name);
        }

        if !matches!(self.current().kind, TokenKind::RParen) {
            loop {
                match self.attempt(Self::parse_function_argument) {
                    Ok(arg) => self.add_child(node, arg),
                    Err(Unmatched) => break,
                }
                if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
        }

        if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly, is_semicolon]);
        }
        Ok(self.close(node))
    }

    fn parse_function_argument(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::FunctionArgument);
        let expr = self.parse_expression()?;
        self.add_child(node, expr);
        Ok(self.close(node))
    }

    fn parse_identifier_term(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Identifier);
        let t = self.consume();
        let mut name = t.ident_value().unwrap_or_default().to_string();

        if self.dialect().is_scss() && self.current().is_delim('.') {
            let mark = self.mark();
            self.consume();
            match self.accept_any_ident() {
                Some(member) => {
                    name.push('.');
                    name.push_str(member.ident_value().unwrap_or_default());
                    self.data_mut(node).reference_types = vec![ReferenceType::Module];
                }
                None => self.restore(mark),
            }
        }

        self.data_mut(node).text = Some(name);
        Ok(self.close(node))
    }

    /// SCSS `$name` or LESS `@name` used in value position: always a
    /// variable reference (unlike at statement start, where `@name` in
    /// LESS is ambiguous with an at-rule keyword).
    fn parse_variable_name_ref(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::VariableName);
        let t = self.consume();
        let name = match t.kind {
            TokenKind::ScssVariable(v) | TokenKind::AtKeyword(v) => v,
            _ => return Err(Unmatched),
        };
        self.data_mut(node).text = Some(name);
        self.data_mut(node).reference_types = vec![ReferenceType::Variable];
        Ok(self.close(node))
    }

    fn parse_escaped_value(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::EscapedValue);
        let t = self.consume();
        if let TokenKind::EscapedValue(v) = t.kind {
            self.data_mut(node).text = Some(v);
        }
        Ok(self.close(node))
    }
}
