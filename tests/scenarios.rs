//! End-to-end scenarios exercising the public API surface against the
//! three dialects together, rather than one parser path at a time.

use css_lang_core::{parse_str, Dialect, NodeKind, ReferenceType, Symbols};

#[test]
fn selection_range_pyramid_narrows_from_stylesheet_to_property() {
    let text = ".foo { color: blue; }";
    let sheet = parse_str(text, Dialect::Css);
    let cursor = text.find(':').unwrap();

    let path = sheet.selection_range_path(cursor);
    let kinds: Vec<NodeKind> = path.iter().map(|&id| sheet.node(id).kind).collect();

    assert_eq!(kinds[0], NodeKind::Property);
    assert_eq!(kinds[1], NodeKind::Declaration);
    assert_eq!(kinds[2], NodeKind::Declarations);
    assert_eq!(kinds[3], NodeKind::Ruleset);

    assert_eq!(sheet.get_text(path[0]), "color");
    assert!(sheet.get_text(path[2]).contains("color: blue"));
    assert!(sheet.get_text(path[3]).starts_with(".foo"));
}

#[test]
fn extend_with_optional_flag_is_recorded() {
    let sheet = parse_str(".a { @extend .b !optional; }", Dialect::Scss);
    let ruleset = sheet.node(sheet.root()).children[0];
    let declarations = sheet.node(ruleset).children[1];
    let extend = sheet.node(declarations).children[0];

    assert_eq!(sheet.node(extend).kind, NodeKind::ExtendsReference);
    assert!(sheet.node(extend).data.optional);
}

#[test]
fn less_import_once_sets_the_once_flag() {
    let sheet = parse_str("@import (once) \"foo.less\";", Dialect::Less);
    let import = sheet.node(sheet.root()).children[0];
    assert_eq!(sheet.node(import).kind, NodeKind::Import);
    assert!(sheet.node(import).data.once);
}

#[test]
fn scss_map_literal_parses_as_nested_entries() {
    let sheet = parse_str("$sizes: (small: 1px, large: 10px);", Dialect::Scss);
    assert!(sheet.find_node_at_offset(0).is_some());

    let var_decl = sheet.node(sheet.root()).children[0];
    assert_eq!(sheet.node(var_decl).kind, NodeKind::VariableDeclaration);
    let expr = sheet.node(var_decl).children[0];
    let term = sheet.node(expr).children[0];
    let map = sheet.node(term).children[0];
    assert_eq!(sheet.node(map).kind, NodeKind::Map);
    assert_eq!(sheet.node(map).children.len(), 2);
    for &entry in &sheet.node(map).children {
        assert_eq!(sheet.node(entry).kind, NodeKind::MapEntry);
    }
}

#[test]
fn forward_show_list_items_carry_forward_visibility_reference_type() {
    let sheet = parse_str("@forward \"src/list\" show list-item, list-reset;", Dialect::Scss);
    let forward = sheet.node(sheet.root()).children[0];
    assert_eq!(sheet.node(forward).kind, NodeKind::ForwardStatement);
    assert_eq!(sheet.node(forward).children.len(), 2);
    for &item in &sheet.node(forward).children {
        assert_eq!(sheet.node(item).data.reference_types, vec![ReferenceType::ForwardVisibility]);
    }
}

#[test]
fn custom_property_is_hoisted_to_global_scope() {
    let text = ".a { --main-color: #fff; } .b { color: var(--main-color); }";
    let sheet = parse_str(text, Dialect::Css);
    let symbols = Symbols::new(&sheet);

    let usage_offset = text.rfind("--main-color").unwrap();
    let found = symbols.find_symbol("--main-color", ReferenceType::Unknown, usage_offset);
    assert!(found.is_some());
}

#[test]
fn each_statement_binds_loop_variables_in_its_body_scope() {
    let text = "@each $name, $glyph in $icons { .icon-#{$name} { content: $glyph; } }";
    let sheet = parse_str(text, Dialect::Scss);
    let symbols = Symbols::new(&sheet);

    let body_offset = text.find("content").unwrap();
    assert!(symbols.find_symbol("glyph", ReferenceType::Variable, body_offset).is_some());
    assert!(symbols.find_symbol("name", ReferenceType::Variable, body_offset).is_some());
}

#[test]
fn all_symbols_lists_every_registered_declaration() {
    let text = "$a: 1; @mixin m() { $b: 2; } .c {}";
    let sheet = parse_str(text, Dialect::Scss);
    let symbols = Symbols::new(&sheet);

    let names: Vec<&str> = symbols.all_symbols().iter().map(|s| s.name.as_str()).collect();
    assert!(names.contains(&"a"));
    assert!(names.contains(&"m"));
    assert!(names.contains(&"b"));
    assert!(names.contains(&".c"));
}

#[test]
fn mixin_reference_with_arguments_resolves_despite_call_text() {
    let text = "@mixin button($color) { color: $color; } .a { @include button($color: red); }";
    let sheet = parse_str(text, Dialect::Scss);
    let symbols = Symbols::new(&sheet);

    let ruleset = sheet.node(sheet.root()).children[1];
    let declarations = sheet.node(ruleset).children[1];
    let mixin_ref = sheet.node(declarations).children[0];
    assert_eq!(sheet.node(mixin_ref).kind, NodeKind::MixinReference);

    let resolved = symbols
        .find_symbol_from_node(&sheet, mixin_ref)
        .expect("a mixin call with arguments should still resolve to its declaration");
    assert_eq!(resolved.name, "button");
}

#[test]
fn function_call_with_arguments_resolves_despite_call_text() {
    let text = "@function double($x) { @return $x * 2; } $y: double(3);";
    let sheet = parse_str(text, Dialect::Scss);
    let symbols = Symbols::new(&sheet);

    let var_decl = sheet.node(sheet.root()).children[1];
    let expr = sheet.node(var_decl).children[0];
    let term = sheet.node(expr).children[0];
    let call = sheet.node(term).children[0];
    assert_eq!(sheet.node(call).kind, NodeKind::Function);

    let resolved = symbols
        .find_symbol_from_node(&sheet, call)
        .expect("a function call with arguments should still resolve to its declaration");
    assert_eq!(resolved.name, "double");
}

#[test]
fn attribute_selector_operator_and_value_are_captured() {
    let sheet = parse_str("[href^=\"http\"] { color: red; }", Dialect::Css);
    let ruleset = sheet.node(sheet.root()).children[0];
    let selector_list = sheet.node(ruleset).children[0];
    let selector = sheet.node(selector_list).children[0];
    let simple = sheet.node(selector).children[0];
    let attr = sheet.node(simple).children[0];
    assert_eq!(sheet.node(attr).kind, NodeKind::AttributeSelector);

    let binary = sheet.node(attr).children[0];
    assert_eq!(sheet.node(binary).kind, NodeKind::BinaryExpression);
    let name = sheet.node(binary).children[0];
    let op = sheet.node(binary).children[1];
    let value = sheet.node(binary).children[2];

    assert_eq!(sheet.get_text(name), "href");
    assert_eq!(sheet.node(op).data.text.as_deref(), Some("^="));
    assert_eq!(sheet.node(value).data.text.as_deref(), Some("http"));
}

#[test]
fn nested_property_gets_its_concatenated_full_name() {
    let sheet = parse_str(".a { font: { size: 10px; } }", Dialect::Scss);
    let ruleset = sheet.node(sheet.root()).children[0];
    let declarations = sheet.node(ruleset).children[1];
    let outer_decl = sheet.node(declarations).children[0];
    let nested = sheet.node(outer_decl).children[1];
    assert_eq!(sheet.node(nested).kind, NodeKind::NestedProperties);

    let inner_body = sheet.node(nested).children[0];
    let inner_decl = sheet.node(inner_body).children[0];
    let inner_prop = sheet.node(inner_decl).children[0];
    assert_eq!(sheet.node(inner_prop).data.full_property_name.as_deref(), Some("font-size"));
}
