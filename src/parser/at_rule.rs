//! Base CSS at-rules: `@media`, `@supports`, `@keyframes`, `@font-face`,
//! `@page`, `@import`, `@namespace`, `@document`, `@viewport`,
//! `@charset`, `@-apply`, and the `UnknownAtRule` fallback.

use super::{is_rcurly, is_rparen, is_semicolon, Parser};
use crate::ast::{NodeId, NodeKind};
use crate::diagnostics::{ParseErrorKind, ParseResult, Unmatched};
use crate::token::TokenKind;

impl<'src> Parser<'src> {
    pub(super) fn parse_at_rule(&mut self) -> ParseResult<NodeId> {
        let name = match &self.current().kind {
            TokenKind::AtKeyword(n) => n.clone(),
            _ => return Err(Unmatched),
        };
        let lname = name.to_ascii_lowercase();

        match lname.as_str() {
            "media" => return self.parse_media(),
            "supports" => return self.parse_supports(),
            "keyframes" | "-webkit-keyframes" | "-moz-keyframes" | "-o-keyframes" => return self.parse_keyframes(),
            "font-face" => return self.parse_font_face(),
            "page" => return self.parse_page(),
            "import" => return self.parse_import(),
            "namespace" => return self.parse_namespace(),
            "document" | "-moz-document" => return self.parse_document_rule(),
            "viewport" | "-ms-viewport" => return self.parse_simple_block_at_rule(NodeKind::Viewport),
            "charset" => return self.parse_charset(),
            "apply" | "-apply" => return self.parse_apply_rule(),
            _ => {}
        }

        if self.dialect().is_scss() {
            if let Ok(node) = self.attempt(Self::parse_scss_at_statement) {
                return Ok(node);
            }
        }
        if self.dialect().is_less() {
            if lname == "plugin" {
                return self.parse_plugin();
            }
            if let Ok(node) = self.attempt(Self::parse_less_variable_declaration) {
                return Ok(node);
            }
        }

        self.parse_unknown_at_rule()
    }

    fn parse_media(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Media);
        self.consume();
        loop {
            match self.attempt(Self::parse_media_query) {
                Ok(q) => self.add_child(node, q),
                Err(Unmatched) => {
                    self.error(node, ParseErrorKind::MediaQueryExpected);
                    break;
                }
            }
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    pub(super) fn parse_media_query(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::MediaQuery);
        let mut matched = false;
        loop {
            match &self.current().kind {
                TokenKind::LParen => {
                    let feature = self.parse_media_feature()?;
                    self.add_child(node, feature);
                    matched = true;
                }
                TokenKind::Ident(_) => {
                    self.consume();
                    matched = true;
                }
                _ => break,
            }
        }
        if !matched {
            return Err(Unmatched);
        }
        Ok(self.close(node))
    }

    fn parse_media_feature(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::MediaFeature);
        self.consume(); // '('
        if self.accept_any_ident().is_none() {
            self.error(node, ParseErrorKind::IdentifierExpected);
        }
        if self.accept(|k| matches!(k, TokenKind::Colon)).is_some() {
            match self.attempt(Self::parse_expression) {
                Ok(e) => self.add_child(node, e),
                Err(Unmatched) => self.error(node, ParseErrorKind::TermExpected),
            }
        }
        if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly]);
        }
        Ok(self.close(node))
    }

    fn parse_supports(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Supports);
        self.consume();
        match self.attempt(Self::parse_supports_condition) {
            Ok(c) => self.add_child(node, c),
            Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_supports_condition(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::SupportsCondition);
        self.accept_ident("not");
        let mut matched = false;

        loop {
            if !matches!(self.current().kind, TokenKind::LParen) {
                break;
            }
            self.consume();
            match self.attempt(Self::parse_declaration) {
                Ok(decl) => self.add_child(node, decl),
                Err(Unmatched) => match self.attempt(Self::parse_supports_condition) {
                    Ok(cond) => self.add_child(node, cond),
                    Err(Unmatched) => self.error(node, ParseErrorKind::ConditionExpected),
                },
            }
            if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_rparen, is_rcurly]);
            }
            matched = true;

            if self.accept_ident("and").is_some() || self.accept_ident("or").is_some() {
                continue;
            }
            break;
        }

        if !matched {
            return Err(Unmatched);
        }
        Ok(self.close(node))
    }

    fn parse_keyframes(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Keyframe);
        self.consume();
        if self.accept_any_ident().is_none() {
            self.error(node, ParseErrorKind::IdentifierExpected);
        }
        if self.accept(|k| matches!(k, TokenKind::LCurly)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::LeftCurlyExpected, &[is_rcurly]);
            return Ok(self.close(node));
        }

        while !matches!(self.current().kind, TokenKind::RCurly | TokenKind::Eof) {
            match self.attempt(Self::parse_keyframe_rule) {
                Ok(rule) => self.add_child(node, rule),
                Err(Unmatched) => {
                    self.error(node, ParseErrorKind::SelectorExpected);
                    self.resync(&[is_rcurly]);
                    break;
                }
            }
        }
        if self.accept(|k| matches!(k, TokenKind::RCurly)).is_none() {
            self.error(node, ParseErrorKind::RightCurlyExpected);
        }
        Ok(self.close(node))
    }

    fn parse_keyframe_rule(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Ruleset);
        loop {
            let sel = self.open(NodeKind::KeyframeSelector);
            if self.accept_any_ident().is_none() && self.accept(|k| matches!(k, TokenKind::Percentage(_))).is_none() {
                return Err(Unmatched);
            }
            self.close(sel);
            self.add_child(node, sel);
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        let body = self.parse_declarations_block();
        self.add_child(node, body);
        Ok(self.close(node))
    }

    fn parse_font_face(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::FontFace);
        self.consume();
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_page(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Page);
        self.consume();

        if matches!(self.current().kind, TokenKind::Colon) || self.current().is_ident() {
            let sel = self.open(NodeKind::PageSelector);
            self.accept(|k| matches!(k, TokenKind::Colon));
            if self.accept_any_ident().is_none() {
                self.error(sel, ParseErrorKind::IdentifierExpected);
            }
            self.close(sel);
            self.add_child(node, sel);
        }

        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_import(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Import);
        self.consume();

        if self.dialect().is_less() && matches!(self.current().kind, TokenKind::LParen) {
            self.consume();
            loop {
                match self.accept_any_ident() {
                    Some(t) if t.ident_value() == Some("once") => self.data_mut(node).once = true,
                    Some(_) => {}
                    None => break,
                }
                if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                    break;
                }
            }
            if self.accept(|k| matches!(k, TokenKind::RParen)).is_none() {
                self.expect_or_resync(node, ParseErrorKind::RightParenthesisExpected, &[is_semicolon, is_rcurly]);
            }
        }

        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none()
            && self.accept(|k| matches!(k, TokenKind::Url(_) | TokenKind::BadUrl(_))).is_none()
        {
            self.error(node, ParseErrorKind::URIOrStringExpected);
        }

        if !matches!(self.current().kind, TokenKind::Semicolon | TokenKind::Eof) {
            let _ = self.attempt(Self::parse_media_query);
        }

        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_namespace(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Namespace);
        self.consume();
        self.accept_any_ident();
        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none()
            && self.accept(|k| matches!(k, TokenKind::Url(_) | TokenKind::BadUrl(_))).is_none()
        {
            self.error(node, ParseErrorKind::URIOrStringExpected);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_document_rule(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::DocumentRule);
        self.consume();
        loop {
            match &self.current().kind {
                TokenKind::Function(_) => {
                    if let Ok(f) = self.parse_function() {
                        self.add_child(node, f);
                    }
                }
                TokenKind::Url(_) | TokenKind::BadUrl(_) => {
                    self.consume();
                }
                _ => break,
            }
            if self.accept(|k| matches!(k, TokenKind::Comma)).is_none() {
                break;
            }
        }
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_simple_block_at_rule(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let node = self.open(kind);
        self.consume();
        self.parse_block_body_into(node);
        Ok(self.close(node))
    }

    fn parse_charset(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Charset);
        self.consume();
        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none() {
            self.error(node, ParseErrorKind::StringLiteralExpected);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_apply_rule(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::ApplyRule);
        self.consume();
        if self.accept_any_ident().is_none() {
            self.error(node, ParseErrorKind::IdentifierExpected);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    pub(super) fn parse_plugin(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::Plugin);
        self.consume();
        if self.accept(|k| matches!(k, TokenKind::QuotedString(_))).is_none() {
            self.error(node, ParseErrorKind::StringLiteralExpected);
        }
        self.finish_statement(node);
        Ok(self.close(node))
    }

    fn parse_unknown_at_rule(&mut self) -> ParseResult<NodeId> {
        let node = self.open(NodeKind::UnknownAtRule);
        self.consume();
        while !matches!(self.current().kind, TokenKind::LCurly | TokenKind::Semicolon | TokenKind::Eof) {
            self.consume();
        }
        if matches!(self.current().kind, TokenKind::LCurly) {
            let body = self.parse_declarations_block();
            self.add_child(node, body);
        } else {
            self.accept(|k| matches!(k, TokenKind::Semicolon));
        }
        Ok(self.close(node))
    }

    /// `;`-terminated statement tail shared by the simple at-rules above
    /// and by the SCSS/LESS overlay statements.
    pub(super) fn finish_statement(&mut self, node: NodeId) {
        if self.accept(|k| matches!(k, TokenKind::Semicolon)).is_none() {
            self.expect_or_resync(node, ParseErrorKind::SemiColonExpected, &[is_semicolon, is_rcurly]);
            self.accept(|k| matches!(k, TokenKind::Semicolon));
        }
    }
}
