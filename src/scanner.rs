//! Component B: the re-entrant scanner, and its SCSS/LESS overlays.
//!
//! CSS Tokenizer per the [w3 specification](https://www.w3.org/TR/css-syntax-3/#tokenization),
//! extended with the SCSS and LESS lexical additions described in spec.md
//! §4.B. Scan errors never abort the scanner: they surface as distinct
//! token kinds (`BadString`, `BadUrl`) and are turned into diagnostics by
//! the parser.

use crate::dialect::Dialect;
use crate::location::Location;
use crate::token::{Number, Token, TokenKind};

const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Opaque snapshot of scanner state. Restoring a mark is O(1): every token
/// the scanner has ever produced stays cached, so backtracking is just
/// rewinding the read cursor over that cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

/// Re-entrant token scanner. One scanner is created per parse request and
/// is never shared across requests.
pub struct Scanner<'src> {
    text: &'src str,
    chars: Vec<char>,
    /// `byte_of[i]` is the byte offset of `chars[i]`; `byte_of[chars.len()]`
    /// is the total byte length.
    byte_of: Vec<usize>,
    dialect: Dialect,
    /// Current read position into `chars`.
    pos: usize,
    line: u32,
    column: u32,
    /// All tokens produced so far, in order. `cursor` indexes into this.
    tokens: Vec<Token>,
    /// Index of the next token to hand out from `consume`.
    cursor: usize,
}

impl<'src> Scanner<'src> {
    #[must_use]
    pub fn new(text: &'src str, dialect: Dialect) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut byte_of = Vec::with_capacity(chars.len() + 1);
        let mut offset = 0;
        for c in &chars {
            byte_of.push(offset);
            offset += c.len_utf8();
        }
        byte_of.push(offset);

        Self {
            text,
            chars,
            byte_of,
            dialect,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            cursor: 0,
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.cursor)
    }

    pub fn restore(&mut self, mark: Mark) {
        self.cursor = mark.0;
    }

    /// Returns true once both the character stream and the token cache are
    /// exhausted.
    #[must_use]
    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len() && self.cursor >= self.tokens.len()
    }

    /// Consumes and returns the next token. Total: past the end of input it
    /// keeps returning `Eof`.
    pub fn consume(&mut self) -> Token {
        self.ensure_buffered(0);
        let token = self.tokens[self.cursor].clone();
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
        token
    }

    /// Un-consumes the last returned token so the next `consume` yields it
    /// again.
    pub fn reconsume(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Looks ahead `offset` tokens without consuming (`lookahead(0)` is the
    /// next token `consume` would return).
    pub fn lookahead(&mut self, offset: usize) -> Token {
        self.ensure_buffered(offset);
        let idx = self.cursor + offset;
        self.tokens.get(idx).cloned().unwrap_or_else(|| self.eof_token())
    }

    fn eof_token(&self) -> Token {
        Token::new(TokenKind::Eof, self.current_location(), self.byte_len(), 0)
    }

    fn ensure_buffered(&mut self, offset: usize) {
        while self.tokens.len() <= self.cursor + offset {
            if self.pos >= self.chars.len() && !self.tokens.is_empty() {
                if let Some(last) = self.tokens.last() {
                    if last.kind == TokenKind::Eof {
                        break;
                    }
                }
            }
            let t = self.scan_one();
            let is_eof = t.kind == TokenKind::Eof;
            self.tokens.push(t);
            if is_eof {
                break;
            }
        }
    }

    #[must_use]
    fn byte_len(&self) -> usize {
        *self.byte_of.last().unwrap_or(&0)
    }

    #[must_use]
    pub fn current_location(&self) -> Location {
        Location::new(self.line, self.column, self.byte_offset() as u32)
    }

    #[must_use]
    fn byte_offset(&self) -> usize {
        self.byte_of.get(self.pos).copied().unwrap_or_else(|| self.byte_len())
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek_str(&self, len: usize) -> String {
        (0..len).filter_map(|i| self.peek_char(i)).collect()
    }

    /// 4.3.1. [Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn scan_one(&mut self) -> Token {
        if self.peek_str(2) == "/*" {
            return self.scan_block_comment();
        }
        if (self.dialect.is_scss() || self.dialect.is_less()) && self.peek_str(2) == "//" {
            return self.scan_line_comment();
        }

        let start_loc = self.current_location();
        let start_byte = self.byte_offset();

        let Some(c) = self.current_char() else {
            return Token::new(TokenKind::Eof, start_loc, start_byte, 0);
        };

        let kind = match c {
            c if c.is_whitespace() => {
                self.consume_whitespace();
                TokenKind::Whitespace
            }
            '"' | '\'' => return self.scan_string(),
            '#' => return self.scan_hash_or_interpolation(start_loc, start_byte),
            ')' => { self.advance(); TokenKind::RParen }
            '(' => { self.advance(); TokenKind::LParen }
            '[' => { self.advance(); TokenKind::LBracket }
            ']' => { self.advance(); TokenKind::RBracket }
            '{' => { self.advance(); TokenKind::LCurly }
            '}' => { self.advance(); TokenKind::RCurly }
            ',' => { self.advance(); TokenKind::Comma }
            ':' => { self.advance(); TokenKind::Colon }
            ';' => { self.advance(); TokenKind::Semicolon }
            '~' => return self.scan_tilde(start_loc, start_byte),
            '|' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::DashMatch
                } else {
                    TokenKind::Delim('|')
                }
            }
            '^' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::PrefixMatch
                } else {
                    TokenKind::Delim('^')
                }
            }
            '*' => {
                self.advance();
                if self.current_char() == Some('=') {
                    self.advance();
                    TokenKind::SubstringMatch
                } else {
                    TokenKind::Delim('*')
                }
            }
            '$' => return self.scan_dollar(start_loc, start_byte),
            '+' => {
                if self.is_signed_decimal(0) {
                    return self.scan_numeric();
                }
                self.advance();
                TokenKind::Delim('+')
            }
            '.' => {
                if self.peek_str(3) == "..." {
                    self.advance();
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else if matches!(self.peek_char(1), Some(c) if c.is_ascii_digit()) {
                    return self.scan_numeric();
                } else {
                    self.advance();
                    TokenKind::Delim('.')
                }
            }
            '-' => {
                if self.is_signed_decimal(0) {
                    return self.scan_numeric();
                }
                if self.peek_str(3) == "-->" {
                    self.advance();
                    self.advance();
                    self.advance();
                    TokenKind::Cdc
                } else if self.is_ident_seq_start(0) {
                    return self.scan_ident_like();
                } else {
                    self.advance();
                    TokenKind::Delim('-')
                }
            }
            '<' => {
                if self.peek_str(4) == "<!--" {
                    self.advance();
                    self.advance();
                    self.advance();
                    self.advance();
                    TokenKind::Cdo
                } else {
                    self.advance();
                    TokenKind::Delim('<')
                }
            }
            '@' => return self.scan_at(start_loc, start_byte),
            '\\' => {
                if self.is_start_of_escape(0) {
                    return self.scan_ident_like();
                }
                self.advance();
                TokenKind::Delim('\\')
            }
            c if c.is_ascii_digit() => return self.scan_numeric(),
            c if self.is_ident_start(c) => return self.scan_ident_like(),
            c => {
                self.advance();
                TokenKind::Delim(c)
            }
        };

        let end_byte = self.byte_offset();
        Token::new(kind, start_loc, start_byte, end_byte - start_byte)
    }

    fn scan_block_comment(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.byte_offset();
        let mut value = String::new();
        value.push(self.advance().unwrap_or_default());
        value.push(self.advance().unwrap_or_default());
        while self.peek_str(2) != "*/" && self.current_char().is_some() {
            value.push(self.advance().unwrap_or_default());
        }
        if self.current_char().is_some() {
            value.push(self.advance().unwrap_or_default());
            value.push(self.advance().unwrap_or_default());
        }
        let end = self.byte_offset();
        Token::new(TokenKind::Comment(value), loc, start, end - start)
    }

    /// SCSS/LESS `// ...` single-line comment, terminated by a newline or EOF.
    fn scan_line_comment(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.byte_offset();
        let mut value = String::new();
        value.push(self.advance().unwrap_or_default());
        value.push(self.advance().unwrap_or_default());
        while let Some(c) = self.current_char() {
            if c == '\n' {
                break;
            }
            value.push(self.advance().unwrap_or_default());
        }
        let end = self.byte_offset();
        Token::new(TokenKind::Comment(value), loc, start, end - start)
    }

    fn scan_hash_or_interpolation(&mut self, loc: Location, start: usize) -> Token {
        self.advance(); // '#'
        if self.dialect.is_scss() && self.current_char() == Some('{') {
            self.advance();
            let end = self.byte_offset();
            return Token::new(TokenKind::InterpolationStart, loc, start, end - start);
        }

        if self.is_ident_char(self.current_char()) || self.is_start_of_escape(0) {
            let is_id = self.is_ident_seq_start(0);
            let value = self.consume_ident();
            let end = self.byte_offset();
            return Token::new(TokenKind::Hash { value, is_id }, loc, start, end - start);
        }

        let end = self.byte_offset();
        Token::new(TokenKind::Delim('#'), loc, start, end - start)
    }

    fn scan_dollar(&mut self, loc: Location, start: usize) -> Token {
        if self.dialect.is_scss() {
            let next = self.peek_char(1);
            if next.map(|c| self.is_ident_start(c)).unwrap_or(false) || next == Some('-') {
                self.advance(); // '$'
                let name = self.consume_ident();
                let end = self.byte_offset();
                return Token::new(TokenKind::ScssVariable(name), loc, start, end - start);
            }
        }
        self.advance();
        let kind = if self.current_char() == Some('=') {
            self.advance();
            TokenKind::SuffixMatch
        } else {
            TokenKind::Delim('$')
        };
        let end = self.byte_offset();
        Token::new(kind, loc, start, end - start)
    }

    fn scan_tilde(&mut self, loc: Location, start: usize) -> Token {
        if self.dialect.is_less() {
            if self.peek_char(1) == Some('`') {
                self.advance(); // '~'
                self.advance(); // '`'
                let mut value = String::new();
                while let Some(c) = self.current_char() {
                    if c == '`' {
                        self.advance();
                        break;
                    }
                    value.push(self.advance().unwrap_or_default());
                }
                let end = self.byte_offset();
                return Token::new(TokenKind::EscapedValue(value), loc, start, end - start);
            }
            if matches!(self.peek_char(1), Some('"' | '\'')) {
                self.advance(); // '~'
                let inner = self.scan_string();
                let value = match inner.kind {
                    TokenKind::QuotedString(v) | TokenKind::BadString(v) => v,
                    _ => String::new(),
                };
                let end = self.byte_offset();
                return Token::new(TokenKind::EscapedValue(value), loc, start, end - start);
            }
        }

        self.advance();
        let kind = if self.current_char() == Some('=') {
            self.advance();
            TokenKind::Includes
        } else {
            TokenKind::Delim('~')
        };
        let end = self.byte_offset();
        Token::new(kind, loc, start, end - start)
    }

    fn scan_at(&mut self, loc: Location, start: usize) -> Token {
        self.advance(); // '@'
        if self.dialect.is_less() && self.current_char() == Some('{') {
            self.advance();
            let end = self.byte_offset();
            return Token::new(TokenKind::LessInterpolationStart, loc, start, end - start);
        }
        if self.is_ident_seq_start(0) {
            let name = self.consume_ident();
            let end = self.byte_offset();
            return Token::new(TokenKind::AtKeyword(name), loc, start, end - start);
        }
        let end = self.byte_offset();
        Token::new(TokenKind::Delim('@'), loc, start, end - start)
    }

    /// 4.3.3. [Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn scan_numeric(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.byte_offset();
        let value = self.consume_number();

        let kind = if self.is_ident_seq_start(0) {
            let unit = self.consume_ident();
            TokenKind::Dimension { value, unit }
        } else if self.current_char() == Some('%') {
            self.advance();
            TokenKind::Percentage(value)
        } else {
            TokenKind::Number(value)
        };

        let end = self.byte_offset();
        Token::new(kind, loc, start, end - start)
    }

    /// 4.3.5. [Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn scan_string(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.byte_offset();
        let ending = self.advance().unwrap_or('"');
        let mut value = String::new();

        loop {
            match self.current_char() {
                None => {
                    let end = self.byte_offset();
                    return Token::new(TokenKind::QuotedString(value), loc, start, end - start);
                }
                Some(c) if c == ending => {
                    self.advance();
                    let end = self.byte_offset();
                    return Token::new(TokenKind::QuotedString(value), loc, start, end - start);
                }
                Some('\n') => {
                    let end = self.byte_offset();
                    return Token::new(TokenKind::BadString(value), loc, start, end - start);
                }
                Some('\\') if self.peek_char(1) == Some('\n') => {
                    self.advance();
                    self.advance();
                }
                Some('\\') if self.is_start_of_escape(0) => {
                    value.push(self.consume_escaped_char());
                }
                Some(_) => {
                    value.push(self.advance().unwrap_or_default());
                }
            }
        }
    }

    /// 4.3.12. [Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> Number {
        let mut value = String::new();

        if matches!(self.current_char(), Some('+' | '-')) {
            value.push(self.advance().unwrap_or_default());
        }
        value.push_str(&self.consume_digits());

        if self.current_char() == Some('.') && matches!(self.peek_char(1), Some(c) if c.is_ascii_digit()) {
            value.push(self.advance().unwrap_or_default());
            value.push(self.advance().unwrap_or_default());
            value.push_str(&self.consume_digits());
        }

        let (c1, c2, c3) = (self.peek_char(0), self.peek_char(1), self.peek_char(2));
        if matches!(c1, Some('e' | 'E'))
            && ((matches!(c2, Some('-' | '+')) && c3.map(|c| c.is_ascii_digit()).unwrap_or(false))
                || c2.map(|c| c.is_ascii_digit()).unwrap_or(false))
        {
            value.push(self.advance().unwrap_or_default());
            value.push(self.advance().unwrap_or_default());
            value.push_str(&self.consume_digits());
        }

        value.parse().unwrap_or(0.0)
    }

    /// 4.3.4. [Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn scan_ident_like(&mut self) -> Token {
        let loc = self.current_location();
        let start = self.byte_offset();
        let value = self.consume_ident();

        if value.eq_ignore_ascii_case("url") && self.current_char() == Some('(') {
            self.advance();
            self.consume_whitespace();
            if matches!(self.current_char(), Some('"' | '\'')) {
                let end = self.byte_offset();
                return Token::new(TokenKind::Function(value), loc, start, end - start);
            }
            return self.scan_url(loc, start);
        }

        let kind = if self.current_char() == Some('(') {
            self.advance();
            TokenKind::Function(value)
        } else {
            TokenKind::Ident(value)
        };
        let end = self.byte_offset();
        Token::new(kind, loc, start, end - start)
    }

    /// 4.3.6. [Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-a-url-token)
    fn scan_url(&mut self, loc: Location, start: usize) -> Token {
        let mut url = String::new();
        self.consume_whitespace();

        loop {
            match self.current_char() {
                Some(')') => {
                    self.advance();
                    break;
                }
                None => break,
                Some(c) if c.is_whitespace() => {
                    self.consume_whitespace();
                }
                Some('"' | '\'' | '(') => {
                    self.consume_remnants_of_bad_url();
                    let end = self.byte_offset();
                    return Token::new(TokenKind::BadUrl(url), loc, start, end - start);
                }
                Some(c) if self.is_non_printable(c) => {
                    self.consume_remnants_of_bad_url();
                    let end = self.byte_offset();
                    return Token::new(TokenKind::BadUrl(url), loc, start, end - start);
                }
                Some('\\') if self.is_start_of_escape(0) => {
                    url.push(self.consume_escaped_char());
                }
                Some(_) => {
                    url.push(self.advance().unwrap_or_default());
                }
            }
        }

        let end = self.byte_offset();
        Token::new(TokenKind::Url(url), loc, start, end - start)
    }

    /// 4.3.14. [Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_remnants_of_bad_url(&mut self) {
        loop {
            match self.current_char() {
                Some(')') | None => break,
                Some('\\') if self.is_start_of_escape(0) => {
                    self.consume_escaped_char();
                }
                _ => {
                    self.advance();
                }
            }
        }
        if self.current_char() == Some(')') {
            self.advance();
        }
    }

    /// 4.3.7. [Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-an-escaped-code-point)
    fn consume_escaped_char(&mut self) -> char {
        self.advance(); // '\'

        let Some(first) = self.current_char() else {
            return REPLACEMENT_CHAR;
        };

        if !first.is_ascii_hexdigit() {
            return self.advance().unwrap_or(REPLACEMENT_CHAR);
        }

        let mut hex = String::new();
        while matches!(self.current_char(), Some(c) if c.is_ascii_hexdigit()) && hex.len() < 6 {
            hex.push(self.advance().unwrap_or_default());
        }
        if matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }

        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        match char::from_u32(code) {
            Some(c) if c != '\0' && (code as u32) <= 0x10_FFFF && !(0xD800..=0xDFFF).contains(&code) => c,
            _ => REPLACEMENT_CHAR,
        }
    }

    /// 4.3.11. [Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident(&mut self) -> String {
        let mut value = String::new();
        loop {
            match self.current_char() {
                Some('\\') if self.is_start_of_escape(0) => {
                    value.push(self.consume_escaped_char());
                }
                Some(c) if self.is_ident_char(Some(c)) => {
                    value.push(self.advance().unwrap_or_default());
                }
                _ => break,
            }
        }
        value
    }

    fn consume_digits(&mut self) -> String {
        let mut value = String::new();
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            value.push(self.advance().unwrap_or_default());
        }
        value
    }

    fn consume_whitespace(&mut self) {
        while matches!(self.current_char(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_ident_start(&self, c: char) -> bool {
        c.is_alphabetic() || !c.is_ascii() || c == '_'
    }

    fn is_ident_char(&self, c: Option<char>) -> bool {
        match c {
            Some(c) => self.is_ident_start(c) || c.is_ascii_digit() || c == '-',
            None => false,
        }
    }

    fn is_non_printable(&self, c: char) -> bool {
        matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{e}'..='\u{1f}' | '\u{7f}')
    }

    /// 4.3.8. [Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
    fn is_start_of_escape(&self, start: usize) -> bool {
        self.peek_char(start) == Some('\\') && self.peek_char(start + 1) != Some('\n')
    }

    /// [Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#check-if-three-code-points-would-start-an-ident-sequence)
    fn is_ident_seq_start(&self, start: usize) -> bool {
        let first = self.peek_char(start);
        let second = self.peek_char(start + 1);

        match first {
            Some('-') => {
                second.map(|c| self.is_ident_start(c)).unwrap_or(false)
                    || second == Some('-')
                    || self.is_start_of_escape(start + 1)
            }
            Some('\\') => self.is_start_of_escape(start),
            Some(c) => self.is_ident_start(c),
            None => false,
        }
    }

    fn is_signed_decimal(&self, start: usize) -> bool {
        let current = self.peek_char(start);
        let next = self.peek_char(start + 1);
        let last = self.peek_char(start + 2);

        matches!(current, Some('+' | '-'))
            && ((next == Some('.') && last.map(|c| c.is_ascii_digit()).unwrap_or(false))
                || next.map(|c| c.is_ascii_digit()).unwrap_or(false))
    }

    /// Returns the raw source text in `[start, end)` byte range, for
    /// building composite tokens (e.g. LESS guard text) without re-scanning.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'src str {
        let end = end.min(self.text.len());
        &self.text[start.min(end)..end]
    }

    #[must_use]
    pub fn tell(&self) -> usize {
        self.byte_offset()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn tokens(src: &str, dialect: Dialect) -> Vec<TokenKind> {
        let mut s = Scanner::new(src, dialect);
        let mut out = Vec::new();
        loop {
            let t = s.consume();
            let eof = t.kind == TokenKind::Eof;
            out.push(t.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn parse_numbers() {
        let cases = [("1e+1", 10.0), ("1e1", 10.0), ("1e-1", 0.1), ("12", 12.0), ("-56", -56.0)];
        for (src, expected) in cases {
            let mut s = Scanner::new(src, Dialect::Css);
            assert_eq!(s.consume_number(), expected, "source {src}");
        }
    }

    #[test]
    fn parse_ident_tokens() {
        let cases = [("-ident", "-ident"), ("ide  nt", "ide"), ("_123-ident", "_123-ident")];
        for (src, expected) in cases {
            let mut s = Scanner::new(src, Dialect::Css);
            assert_eq!(s.consume_ident(), expected);
        }
    }

    #[test]
    fn parse_urls() {
        assert_eq!(
            tokens("url(https://gosub.io/)", Dialect::Css),
            vec![TokenKind::Url("https://gosub.io/".into()), TokenKind::Eof]
        );
        assert_eq!(
            tokens("url(gosub\u{0000}io)", Dialect::Css),
            vec![TokenKind::BadUrl("gosub".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn parse_string_tokens() {
        assert_eq!(
            tokens("'line\nnewline'", Dialect::Css)[0],
            TokenKind::BadString("line".into())
        );
        assert_eq!(
            tokens("\"double quotes\"", Dialect::Css)[0],
            TokenKind::QuotedString("double quotes".into())
        );
    }

    #[test]
    fn parse_at_keywords() {
        assert_eq!(tokens("@media", Dialect::Css)[0], TokenKind::AtKeyword("media".into()));
    }

    #[test]
    fn cdo_cdc_not_special_outside_html() {
        assert_eq!(
            tokens("<!-- -->", Dialect::Css),
            vec![TokenKind::Cdo, TokenKind::Whitespace, TokenKind::Cdc, TokenKind::Eof]
        );
    }

    #[test]
    fn scss_variable_and_interpolation() {
        assert_eq!(
            tokens("$c: #{$c}", Dialect::Scss),
            vec![
                TokenKind::ScssVariable("c".into()),
                TokenKind::Colon,
                TokenKind::Whitespace,
                TokenKind::InterpolationStart,
                TokenKind::ScssVariable("c".into()),
                TokenKind::RCurly,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scss_line_comment_is_trivia() {
        assert_eq!(
            tokens("// hi\na", Dialect::Scss),
            vec![TokenKind::Comment("// hi".into()), TokenKind::Whitespace, TokenKind::Ident("a".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn less_variable_and_interpolation() {
        assert_eq!(tokens("@x", Dialect::Less)[0], TokenKind::AtKeyword("x".into()));
        assert_eq!(
            tokens("@{x}", Dialect::Less),
            vec![TokenKind::LessInterpolationStart, TokenKind::Ident("x".into()), TokenKind::RCurly, TokenKind::Eof]
        );
    }

    #[test]
    fn less_escaped_value() {
        assert_eq!(
            tokens("~\"literal\"", Dialect::Less),
            vec![TokenKind::EscapedValue("literal".into()), TokenKind::Eof]
        );
        assert_eq!(
            tokens("~`js`", Dialect::Less),
            vec![TokenKind::EscapedValue("js".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn less_ellipsis() {
        assert_eq!(tokens("...", Dialect::Less), vec![TokenKind::Ellipsis, TokenKind::Eof]);
    }

    #[test]
    fn match_operators() {
        assert_eq!(
            tokens("~= |= ^= $= *=", Dialect::Css)
                .into_iter()
                .filter(|t| *t != TokenKind::Whitespace)
                .collect::<Vec<_>>(),
            vec![
                TokenKind::Includes,
                TokenKind::DashMatch,
                TokenKind::PrefixMatch,
                TokenKind::SuffixMatch,
                TokenKind::SubstringMatch,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn mark_and_restore_round_trip() {
        let mut s = Scanner::new("a b c", Dialect::Css);
        let _ = s.consume();
        let mark = s.mark();
        let _ = s.consume();
        let _ = s.consume();
        s.restore(mark);
        assert_eq!(s.consume().kind, TokenKind::Whitespace);
    }
}
