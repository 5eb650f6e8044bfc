//! Component F: the SCSS overlay — variables, mixins, control-flow
//! at-rules, maps, module statements, and nested properties.

use super::{is_rcurly, is_rparen, is_semicolon, Parser};
use crate::ast::{NodeId, NodeKind, ReferenceType};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    /// Dispatches `@mixin`/`@include`/… once the base at-rule keywords
    /// have already been ruled out.
    pub(super) fn parse_scss_at_statement(&mut self) -> ParseResult<NodeId> {
        let name = match &self.current().kind {
            TokenKind::AtKeyword(n) => n.to_ascii_lowercase(),
            _ => return Err(Unmatched),
        };

        match name.as_str() {
            "mixin" => self.parse_mixin_declaration(),
            "include" => self.parse_mixin_reference_scss(),
            "function" => self.parse_function_declaration(),
            "return" => self.parse_return_statement(),
            "if" => self.parse_if_statement(),
            "for" => self.parse_for_statement(),
            "each" => self.parse_each_statement(),
            "while" => self.parse_while_statement(),
            "extend" => self.parse_extends_reference(),
            "at-root" => self.parse_at_root_statement(),
            "debug" => self.parse_simple_directive(NodeKind::DebugStatement),
            "warn" => self.parse_simple_directive(NodeKind::WarnStatement),
            "error" => self.parse_simple_directive(NodeKind::ErrorStatement),
            "use" => self.parse_use_statement(),
            "forward" => self.parse_forward_statement(),
            _ => Err(Unmatched),
        }
    }

    /// `$name : expr ('!' ('default'|'global'))* ';'`
    pub(super) fn parse_scss_variable_declaration(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::VariableDeclaration);
        let t = self.consume();
        if let TokenKind::ScssVariable(name) = t.kind {
            self.data_mut(node).text = Some(name);
        }

        if self.accept(|k| matches!(k, TokenKind::Colon)).is_none() {
            self.error(node, ParseErrorKind::ColonExpected);
            self.resync(&[is_semicolon, is_rcurly]);
            return Ok(self.close(node));
        }

        match self.attempt(Self::parse_expression) {
            Ok(expr) => self.add_child(node, expr),
            Err(Unmatched) => self.error(node, ParseErrorKind::VariableValueExpected),
        }

        loop {
            if self.accept_delim('!').is_none() {
                break;
            }
            if self.accept_ident("default").is_some() {
                self.data_mut(node).default = true;
            } else if self.accept_ident("global").is_some() {
                self.data_mut(node).global = true;
            } else {
                self.error(node, ParseErrorKind::UnknownKeyword);
                break;
            }
        }

        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_mixin_declaration(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::MixinDeclaration);
        self.consume(); // @mixin
        match self.accept_any_ident() {
            Some(t) => self.data_mut(node).text = t.ident_value().map(str::to_owned),
            None => self.error(node, ParseErrorKind::IdentifierExpected),
        }
        if matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            self.parse_parameter_list(node);
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_mixin_reference_scss(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::MixinReference);
        self.consume(); // @include
        match self.accept_any_ident() {
            Some(t) => self.data_mut(node).text = t.ident_value().map(str::to_owned),
            None => self.error(node, ParseErrorKind::IdentifierExpected),
        }
        self.data_mut(node).reference_types = vec![ReferenceType::Mixin];

        if matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            self.parse_argument_list(node);
        }

        if matches!(self.current().kind, TokenKind::LCurly) {
            self.parse_block_body_into(node);
        } else {
            self.finish_statement(node);
        }
        Ok(self.close(node))
    }

    fn parse_function_declaration(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::FunctionDeclaration);
        self.consume(); // @function
        match self.accept_any_ident() {
            Some(t) => self.data_mut(node).text = t.ident_value().map(str::to_owned),
            None => self.error(node, ParseErrorKind::FunctionDeclarationExpected),
        }
        if matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            self.parse_parameter_list(node);
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::ReturnStatement);
        self.consume();
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    /// `@if cond { … } (@else if cond { … })* (@else { … })?`. Each
    /// branch's condition (if any) and body are appended as children in
    /// order, rather than nesting `@else if` as a separate `IfStatement`.
    fn parse_if_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::IfStatement);
        self.consume(); // @if
        match self.attempt(Self::parse_expression) {
            Ok(cond) => self.add_child(node, cond),
            Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
        }
        self.parse_block_body_into(node);

        loop {
            let is_else = matches!(&self.current().kind, TokenKind::AtKeyword(n) if n.eq_ignore_ascii_case("else"));
            if !is_else {
                break;
            }
            self.consume();
            let is_else_if = self.accept_ident("if").is_some();
            if is_else_if {
                match self.attempt(Self::parse_expression) {
                    Ok(cond) => self.add_child(node, cond),
                    Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
                }
            }
            self.parse_block_body_into(node);
            if !is_else_if {
                break;
            }
        }

        Ok(self.close(node))
    }

    /// `@for $i from A (through|to) B { … }`
    fn parse_for_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::ForStatement);
        self.consume();

        match self.accept(|k| matches!(k, TokenKind::ScssVariable(_))) {
            Some(t) => {
                if let TokenKind::ScssVariable(v) = t.kind {
                    self.data_mut(node).text = Some(v);
                }
                self.data_mut(node).reference_types = vec![ReferenceType::Variable];
            }
            None => self.error(node, ParseErrorKind::IdentifierExpected),
        }

        if self.accept_ident("from").is_none() {
            self.error(node, ParseErrorKind::UnknownKeyword);
        }
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }

        if self.accept_ident("through").is_none() && self.accept_ident("to").is_none() {
            self.error(node, ParseErrorKind::UnknownKeyword);
        }
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }

        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    /// `@each $a, $b in expr { … }`
    fn parse_each_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::EachStatement);
        self.consume();

        loop {
            match self.accept(|k| matches!(k, TokenKind::ScssVariable(_))) {
                Some(t) => {
                    let (offset, end) = (t.offset, t.end());
                    let var = self.open_at(NodeKind::VariableName, offset);
                    if let TokenKind::ScssVariable(v) = t.kind {
                        self.data_mut(var).text = Some(v);
                    }
                    self.data_mut(var).reference_types = vec![ReferenceType::Variable];
                    self.tree.finish(var, end);
                    self.add_child(node, var);
                }
                None => {
                    self.error(node, ParseErrorKind::IdentifierExpected);
                    break;
                }
            }
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }

        if self.accept_ident("in").is_none() {
            self.error(node, ParseErrorKind::UnknownKeyword);
        }
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }

        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::WhileStatement);
        self.consume();
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    /// `@extend selector ('!optional')?;`. Decision (see DESIGN.md): a
    /// selector that fails to parse resyncs to `;`, not `)`  — there is
    /// no enclosing `)` at this position, unlike a selector nested inside
    /// a function-like pseudo.
    fn parse_extends_reference(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::ExtendsReference);
        self.consume();
        match self.attempt(Self::parse_selector_list) {
            Ok(sel) => self.add_child(node, sel),
            Err(Unmatched) => {
                self.error(node, ParseErrorKind::SelectorExpected);
                self.resync(&[is_semicolon, is_rcurly]);
            }
        }
        if self.accept_delim('!').is_some() {
            if self.accept_ident("optional").is_some() {
                self.data_mut(node).optional = true;
            } else {
                self.error(node, ParseErrorKind::UnknownKeyword);
            }
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_at_root_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::AtRootStatement);
        self.consume();
        if matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            while !matches!(self.current().kind, TokenKind::RParen | TokenKind::RCurly | TokenKind::Eof) {
                self.consume();
            }
            self.accept(|k| matches!(k, TokenKind::RParen));
        } else if !matches!(self.current().kind, TokenKind::LCurly) {
            if let Ok(sel) = self.attempt(Self::parse_selector_list) {
                self.add_child(node, sel);
            }
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_simple_directive(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let node = self.open(kind);
        self.consume();
        match self.attempt(Self::parse_expression) {
            Ok(e) => self.add_child(node, e),
            Err(Unmatched) => self.error(node, ParseErrorKind::ExpressionExpected),
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    /// `@use "path" ('as' (ident|'*'))? ('with' '(' args ')')?;`
    fn parse_use_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::UseStatement);
        self.consume();
        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none() {
            self.error(node, ParseErrorKind::StringLiteralExpected);
        }
        if self.accept_ident("as").is_some() && self.accept_delim('*').is_none() && self.accept_any_ident().is_none() {
            self.error(node, ParseErrorKind::IdentifierExpected);
        }
        if self.accept_ident("with").is_some() && matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            self.parse_argument_list(node);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    /// `@forward "path" ('as' ident '*')? ('show'|'hide' ident,*)?;`
    fn parse_forward_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::ForwardStatement);
        self.consume();
        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none() {
            self.error(node, ParseErrorKind::StringLiteralExpected);
        }
        if self.accept_ident("as").is_some() {
            if self.accept_any_ident().is_none() {
                self.error(node, ParseErrorKind::IdentifierExpected);
            }
            self.accept_delim('*');
        }
        if self.accept_ident("show").is_some() || self.accept_ident("hide").is_some() {
            loop {
                match self.accept_any_ident() {
                    Some(t) => {
                        let (offset, end) = (t.offset, t.end());
                        let item = self.open_at(NodeKind::Identifier, offset);
                        self.data_mut(item).text = t.ident_value().map(str::to_owned);
                        self.data_mut(item).reference_types = vec![ReferenceType::ForwardVisibility];
                        self.tree.finish(item, end);
                        self.add_child(node, item);
                    }
                    None => break,
                }
                if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    /// Shared by `@mixin`/`@function` declarations and (via LESS) mixin
    /// declarations: `(` has already been consumed by the caller.
    pub(super) fn parse_parameter_list(&mut self, parent: NodeId) {
        if self.accept(|k| matches!(k, TokenKind::RParen)).is_some() {
            return;
        }
        loop {
            let param = self.open(NodeKind::Parameter);
            match &self.current().kind {
                TokenKind::ScssVariable(_) | TokenKind::AtKeyword(_) => {
                    let t = self.consume();
                    let name = match t.kind {
                        TokenKind::ScssVariable(v) | TokenKind::AtKeyword(v) => v,
                        _ => String::new(),
                    };
                    self.data_mut(param).text = Some(name);
                    self.data_mut(param).reference_types = vec![ReferenceType::Variable];
                }
                _ => self.error(param, ParseErrorKind::IdentifierExpected),
            }
            if self.accept(|k| matches!(k, TokenKind::Colon)).is_some() {
                match self.attempt(Self::parse_expression) {
                    Ok(expr) => self.add_child(param, expr),
                    Err(Unmatched) => self.error(param, ParseErrorKind::ExpressionExpected),
                }
            }
            self.accept(|k| matches!(k, TokenKind::Ellipsis));
            self.close(param);
            self.add_child(parent, param);
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
            self.expect_or_resync(parent, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly, is_semicolon]);
        }
    }

    /// Shared by `@include`/`@use ... with`/LESS mixin calls: `(` has
    /// already been consumed by the caller.
    pub(super) fn parse_argument_list(&mut self, parent: NodeId) {
        if self.accept(|k| matches!(k, TokenKind::RParen)).is_some() {
            return;
        }
        loop {
            let arg = self.open(NodeKind::FunctionArgument);
            match self.attempt(Self::parse_expression) {
                Ok(e) => self.add_child(arg, e),
                Err(Unmatched) => self.error(arg, ParseErrorKind::ExpressionExpected),
            }
            self.close(arg);
            self.add_child(parent, arg);
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
            self.expect_or_resync(parent, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly, is_semicolon]);
        }
    }

    /// `( expr ( ':' expr ',' expr ':' expr … ) )` — a map literal, or
    /// (when no `:` ever appears) a plain parenthesized expression.
    pub(super) fn parse_map(&mut self) -> ParseResult<NodeId> {
        let start = self.current().offset;
        self.consume(); // '('

        if self.accept(|k| matches!(k, TokenKind::RParen)).is_some() {
            let empty = self.open_at(NodeKind::Map, start);
            return Ok(self.close(empty));
        }

        let first_key = self.parse_expression()?;
        if self.accept(|k| matches!(k, TokenKind::Colon)).is_some() {
            let map = self.open_at(NodeKind::Map, start);
            self.parse_map_entry_value(map, first_key);
            while self.accept(|k| matches!(k, TokenKind::Comma)).is_some() {
                match self.attempt(Self::parse_expression) {
                    Ok(key) => self.parse_map_entry_value(map, key),
                    Err(Unmatched) => {
                        self.error(map, ParseErrorKind::ExpressionExpected);
                        break;
                    }
                }
            }
            if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                self.expect_or_resync(map, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly, is_semicolon]);
            }
            Ok(self.close(map))
        } else {
            if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                self.error(first_key, ParseErrorKind::RightParenthesisExpected);
            }
            Ok(first_key)
        }
    }

    fn parse_map_entry_value(&mut self, map: NodeId, key: NodeId) {
        let offset = self.tree.get(key).offset;
        let entry = self.open_at(NodeKind::MapEntry, offset);
        self.add_child(entry, key);
        match self.attempt(Self::parse_expression) {
            Ok(v) => self.add_child(entry, v),
            Err(Unmatched) => self.error(entry, ParseErrorKind::ExpressionExpected),
        }
        self.close(entry);
        self.add_child(map, entry);
    }

    /// `font: { family: …; size: …; }` — the caller has already matched
    /// `{` via `current().kind`.
    /// `prefix` is the outer declaration's own property name; each inner
    /// declaration's `Property` gets `full_property_name` set to `prefix`
    /// concatenated with its own name (`font` + `size` -> `font-size`),
    /// recursing for properties nested more than one level deep.
    pub(super) fn parse_nested_properties(&mut self, prefix: &str) -> ParseResult<NodeId> {
        if !matches!(self.current().kind, TokenKind::LCurly) {
            return Err(Unmatched);
        }
        let node = self.open(NodeKind::NestedProperties);
        let body = self.parse_declarations_block();
        self.annotate_nested_property_names(body, prefix);
        self.add_child(node, body);
        Ok(self.close(node))
    }

    fn annotate_nested_property_names(&mut self, declarations: NodeId, prefix: &str) {
        let children = self.tree.get(declarations).children.clone();
        for decl in children {
            if !matches!(self.tree.get(decl).kind, NodeKind::Declaration | NodeKind::CustomPropertyDeclaration) {
                continue;
            }
            let Some(&prop) = self.tree.get(decl).children.first() else { continue };
            let own_name = self.tree.get(prop).data.text.clone().unwrap_or_default();
            let full = format!("{prefix}-{own_name}");
            self.data_mut(prop).full_property_name = Some(full.clone());

            if let Some(&nested) = self.tree.get(decl).children.get(1) {
                if self.tree.get(nested).kind == NodeKind::NestedProperties {
                    if let Some(&inner_body) = self.tree.get(nested).children.first() {
                        self.annotate_nested_property_names(inner_body, &full);
                    }
                }
            }
        }
    }
}
