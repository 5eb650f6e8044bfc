//! A CSS/SCSS/LESS language-service core: a CSS Syntax Level 3 scanner,
//! SCSS/LESS token overlays, a backtracking recursive-descent parser
//! producing an arena-based AST, and a scope/symbol table for
//! variable/mixin/rule lookup. Built for editor tooling — completion,
//! navigation, rename — rather than for producing a render tree.

mod ast;
mod cursor;
mod diagnostics;
mod dialect;
mod location;
mod parser;
mod scanner;
mod scope;
mod token;

pub use ast::{Combinator, Comparator, Node, NodeData, NodeId, NodeKind, ReferenceType, Stylesheet};
pub use diagnostics::{Diagnostic, ParseErrorKind, Severity};
pub use dialect::Dialect;
pub use location::{Location, SourceBuffer};
pub use parser::ParserConfig;
pub use scope::{Symbol, Symbols};

use parser::Parser;

/// A text document as the host editor knows it: identity, dialect and
/// version live alongside the text so collaborators that resolve
/// `@import`/`@use` targets or cache parses by version don't need a
/// side channel.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: String,
    pub dialect: Dialect,
    pub version: u64,
    pub text: String,
}

impl Document {
    #[must_use]
    pub fn new(uri: impl Into<String>, dialect: Dialect, version: u64, text: impl Into<String>) -> Self {
        Self { uri: uri.into(), dialect, version, text: text.into() }
    }
}

/// Parses a document with the default best-effort recovery policy.
#[must_use]
pub fn parse(document: &Document) -> Stylesheet {
    parse_with_config(&document.text, ParserConfig { dialect: document.dialect, ignore_errors: true })
}

/// Parses raw source text against a dialect, bypassing `Document`'s
/// uri/version bookkeeping. The entry point most tests and standalone
/// tools want.
#[must_use]
pub fn parse_str(text: &str, dialect: Dialect) -> Stylesheet {
    parse_with_config(text, ParserConfig { dialect, ignore_errors: true })
}

#[must_use]
pub fn parse_with_config(text: &str, config: ParserConfig) -> Stylesheet {
    log::trace!("parse request, {} bytes, dialect={:?}", text.len(), config.dialect);
    let buffer = SourceBuffer::new(text);
    let dialect = config.dialect;
    let parser = Parser::new(text, config);
    let (tree, root) = parser.parse();
    Stylesheet { buffer, tree, root, dialect }
}

/// Flattens every [`Diagnostic`] attached anywhere under `node`, in
/// document order.
pub struct ParseErrorCollector;

impl ParseErrorCollector {
    #[must_use]
    pub fn entries(stylesheet: &Stylesheet, node: NodeId) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        stylesheet.accept(node, &mut |id| {
            out.extend(stylesheet.node(id).diagnostics.iter().cloned());
            true
        });
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_css_value_resolution() {
        let sheet = parse_str(".foo { color: #abc; }", Dialect::Css);
        assert!(ParseErrorCollector::entries(&sheet, sheet.root()).is_empty());

        let ruleset = sheet.node(sheet.root()).children[0];
        assert_eq!(sheet.node(ruleset).kind, NodeKind::Ruleset);

        let selector_list = sheet.node(ruleset).children[0];
        let selector = sheet.node(selector_list).children[0];
        assert_eq!(sheet.get_text(selector), ".foo");

        let declarations = sheet.node(ruleset).children[1];
        let decl = sheet.node(declarations).children[0];
        assert_eq!(sheet.node(decl).kind, NodeKind::Declaration);
        let prop = sheet.node(decl).children[0];
        assert_eq!(sheet.get_text(prop), "color");
    }

    #[test]
    fn scss_variable_interpolation_resolves_across_rules() {
        let sheet = parse_str("$c: red; .a { color: #{$c}; }", Dialect::Scss);
        assert!(ParseErrorCollector::entries(&sheet, sheet.root()).is_empty());

        let symbols = Symbols::new(&sheet);
        let interp_offset = sheet.buffer().text().find("$c}").unwrap();
        let var_ref = sheet.find_node_at_offset(interp_offset).expect("variable node at offset");
        let resolved = symbols.find_symbol_from_node(&sheet, var_ref).expect("variable should resolve");
        assert_eq!(resolved.name, "c");
    }

    #[test]
    fn less_mixin_guard_registers_parameter_in_body_scope() {
        let sheet = parse_str(".m(@x) when (@x > 0) { color: red; }", Dialect::Less);
        let symbols = Symbols::new(&sheet);

        let mixin = sheet.node(sheet.root()).children[0];
        assert_eq!(sheet.node(mixin).kind, NodeKind::MixinDeclaration);

        let body_offset = sheet.buffer().text().find("color").unwrap();
        let found = symbols.find_symbol("x", ReferenceType::Variable, body_offset);
        assert!(found.is_some());
    }

    #[test]
    fn missing_colon_still_finishes_the_ruleset() {
        let sheet = parse_str(".a { color red; }", Dialect::Css);
        let errors = ParseErrorCollector::entries(&sheet, sheet.root());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::ColonExpected);

        let ruleset = sheet.node(sheet.root()).children[0];
        assert_eq!(sheet.node(ruleset).kind, NodeKind::Ruleset);
    }

    #[test]
    fn cross_reference_highlight_matches_both_usages() {
        let text = "$x: 1; .a { width: $x; } .b { height: $x; }";
        let sheet = parse_str(text, Dialect::Scss);
        let symbols = Symbols::new(&sheet);

        let first = sheet.find_node_at_offset(text.find("width: $x").unwrap() + 7).unwrap();
        let second = sheet.find_node_at_offset(text.rfind("$x").unwrap()).unwrap();

        let symbol = symbols.find_symbol_from_node(&sheet, first).expect("first usage resolves").clone();
        assert!(symbols.matches_symbol(&sheet, first, &symbol));
        assert!(symbols.matches_symbol(&sheet, second, &symbol));
    }
}
