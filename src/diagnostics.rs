//! Diagnostics: the closed parse-error taxonomy, severities, and the
//! markers attached to AST nodes.

use thiserror::Error;

/// How serious a diagnostic is. Parse errors are always `Error`; the
/// scope builder and external collaborators may attach `Warning`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ignore,
    Warning,
    Error,
}

/// The closed set of parse-error kinds. Each carries a stable rule id
/// (its variant name) and a default message via `thiserror`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("identifier expected")]
    IdentifierExpected,
    #[error("colon expected")]
    ColonExpected,
    #[error("semicolon expected")]
    SemiColonExpected,
    #[error("{{ expected")]
    LeftCurlyExpected,
    #[error("}} expected")]
    RightCurlyExpected,
    #[error("( expected")]
    LeftParenthesisExpected,
    #[error(") expected")]
    RightParenthesisExpected,
    #[error("] expected")]
    RightSquareBracketExpected,
    #[error("selector expected")]
    SelectorExpected,
    #[error("term expected")]
    TermExpected,
    #[error("uri or string expected")]
    URIOrStringExpected,
    #[error("string literal expected")]
    StringLiteralExpected,
    #[error("variable value expected")]
    VariableValueExpected,
    #[error("expression expected")]
    ExpressionExpected,
    #[error("condition expected")]
    ConditionExpected,
    #[error("operator expected")]
    OperatorExpected,
    #[error(". expected")]
    DotExpected,
    #[error("property value expected")]
    PropertyValueExpected,
    #[error("function declaration expected")]
    FunctionDeclarationExpected,
    #[error("unknown keyword")]
    UnknownKeyword,
    #[error("at-rule or selector expected")]
    RuleOrSelectorExpected,
    #[error("declaration expected")]
    DeclarationExpected,
    #[error("media query expected")]
    MediaQueryExpected,
    #[error("number expected")]
    NumberExpected,
    #[error("comparator expected (> >= = =< <)")]
    ComparatorExpected,
    #[error("unterminated comment")]
    UnterminatedComment,
}

impl ParseErrorKind {
    /// Stable rule identifier, matching the variant name. Used by
    /// external collaborators that key off a string id rather than a
    /// Rust enum (e.g. serialized diagnostics).
    #[must_use]
    pub fn rule_id(&self) -> &'static str {
        match self {
            ParseErrorKind::IdentifierExpected => "IdentifierExpected",
            ParseErrorKind::ColonExpected => "ColonExpected",
            ParseErrorKind::SemiColonExpected => "SemiColonExpected",
            ParseErrorKind::LeftCurlyExpected => "LeftCurlyExpected",
            ParseErrorKind::RightCurlyExpected => "RightCurlyExpected",
            ParseErrorKind::LeftParenthesisExpected => "LeftParenthesisExpected",
            ParseErrorKind::RightParenthesisExpected => "RightParenthesisExpected",
            ParseErrorKind::RightSquareBracketExpected => "RightSquareBracketExpected",
            ParseErrorKind::SelectorExpected => "SelectorExpected",
            ParseErrorKind::TermExpected => "TermExpected",
            ParseErrorKind::URIOrStringExpected => "URIOrStringExpected",
            ParseErrorKind::StringLiteralExpected => "StringLiteralExpected",
            ParseErrorKind::VariableValueExpected => "VariableValueExpected",
            ParseErrorKind::ExpressionExpected => "ExpressionExpected",
            ParseErrorKind::ConditionExpected => "ConditionExpected",
            ParseErrorKind::OperatorExpected => "OperatorExpected",
            ParseErrorKind::DotExpected => "DotExpected",
            ParseErrorKind::PropertyValueExpected => "PropertyValueExpected",
            ParseErrorKind::FunctionDeclarationExpected => "FunctionDeclarationExpected",
            ParseErrorKind::UnknownKeyword => "UnknownKeyword",
            ParseErrorKind::RuleOrSelectorExpected => "RuleOrSelectorExpected",
            ParseErrorKind::DeclarationExpected => "DeclarationExpected",
            ParseErrorKind::MediaQueryExpected => "MediaQueryExpected",
            ParseErrorKind::NumberExpected => "NumberExpected",
            ParseErrorKind::ComparatorExpected => "ComparatorExpected",
            ParseErrorKind::UnterminatedComment => "UnterminatedComment",
        }
    }
}

/// A diagnostic attached to a node (the spec's *Marker*).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ParseErrorKind,
    pub severity: Severity,
    pub message: String,
    pub offset: usize,
    pub length: usize,
}

impl Diagnostic {
    #[must_use]
    pub fn error(kind: ParseErrorKind, offset: usize, length: usize) -> Self {
        let message = kind.to_string();
        Self { kind, severity: Severity::Error, message, offset, length }
    }
}

/// Zero-data "this alternative did not match" signal used internally by
/// non-terminals. Never reaches the public API: a required construct
/// that fails instead pushes a [`Diagnostic`] onto the open node and the
/// caller decides whether to resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unmatched;

pub type ParseResult<T> = Result<T, Unmatched>;
