//! Component H: the scope builder and symbol table.
//!
//! A single pre-order walk of the AST produces a tree of lexically nested
//! scopes, each holding the symbols declared directly within it. Lookup
//! walks from the scope enclosing a node outward to the global scope,
//! the first matching name/reference-type pair wins.

use crate::ast::{NodeId, NodeKind, ReferenceType, Stylesheet};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ScopeId(u32);

impl ScopeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct Scope {
    offset: usize,
    length: usize,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbols: Vec<Symbol>,
}

impl Scope {
    fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }
}

/// `(name, optional value text, defining node, reference-type)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub value: Option<String>,
    pub node: NodeId,
    pub reference_type: ReferenceType,
}

/// The scope tree and symbol lookup built from a parsed [`Stylesheet`].
/// Rebuilt on demand; not kept in sync with a mutated tree (the tree is
/// logically immutable once parsed).
pub struct Symbols {
    scopes: Vec<Scope>,
    global: ScopeId,
    /// `MixinDeclaration`/`FunctionDeclaration` node → the scope opened by
    /// its body, so a function-argument identifier can jump into it.
    body_scopes: HashMap<NodeId, ScopeId>,
}

impl Symbols {
    #[must_use]
    pub fn new(stylesheet: &Stylesheet) -> Self {
        log::trace!("building scope tree");
        let mut builder = Self { scopes: Vec::new(), global: ScopeId(0), body_scopes: HashMap::new() };
        let global = builder.alloc_scope(None, 0, usize::MAX);
        builder.global = global;
        builder.walk(stylesheet, stylesheet.root(), global);
        builder
    }

    fn alloc_scope(&mut self, parent: Option<ScopeId>, offset: usize, length: usize) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope { offset, length, parent, children: Vec::new(), symbols: Vec::new() });
        if let Some(p) = parent {
            self.scopes[p.index()].children.push(id);
        }
        id
    }

    fn add_symbol(&mut self, scope: ScopeId, name: String, value: Option<String>, node: NodeId, reference_type: ReferenceType) {
        self.scopes[scope.index()].symbols.push(Symbol { name, value, node, reference_type });
    }

    fn walk(&mut self, stylesheet: &Stylesheet, node_id: NodeId, scope: ScopeId) {
        let node = stylesheet.node(node_id);
        let kind = node.kind;
        let children: Vec<NodeId> = node.children.clone();

        match kind {
            NodeKind::Declarations => {
                let child_scope = self.open_scope(scope, node.offset, node.length);
                for child in children {
                    self.walk(stylesheet, child, child_scope);
                }
                return;
            }
            NodeKind::MixinDeclaration | NodeKind::FunctionDeclaration => {
                let name = node.data.text.clone().unwrap_or_default();
                let reference_type = if kind == NodeKind::MixinDeclaration { ReferenceType::Mixin } else { ReferenceType::Function };
                self.add_symbol(scope, name, None, node_id, reference_type);

                let params: Vec<NodeId> =
                    children.iter().copied().filter(|&c| stylesheet.node(c).kind == NodeKind::Parameter).collect();

                for child in children {
                    let cn = stylesheet.node(child);
                    if cn.kind == NodeKind::Declarations {
                        let body_scope = self.open_scope(scope, cn.offset, cn.length);
                        self.body_scopes.insert(node_id, body_scope);
                        for &p in &params {
                            let pname = stylesheet.node(p).data.text.clone().unwrap_or_default();
                            self.add_symbol(body_scope, pname, None, p, ReferenceType::Variable);
                        }
                        for gc in cn.children.clone() {
                            self.walk(stylesheet, gc, body_scope);
                        }
                    } else {
                        self.walk(stylesheet, child, scope);
                    }
                }
                return;
            }
            NodeKind::ForStatement => {
                let loop_var = node.data.text.clone();
                for child in children {
                    let cn = stylesheet.node(child);
                    if cn.kind == NodeKind::Declarations {
                        let body_scope = self.open_scope(scope, cn.offset, cn.length);
                        if let Some(name) = loop_var.clone() {
                            self.add_symbol(body_scope, name, None, node_id, ReferenceType::Variable);
                        }
                        for gc in cn.children.clone() {
                            self.walk(stylesheet, gc, body_scope);
                        }
                    } else {
                        self.walk(stylesheet, child, scope);
                    }
                }
                return;
            }
            NodeKind::EachStatement => {
                let loop_vars: Vec<NodeId> =
                    children.iter().copied().filter(|&c| stylesheet.node(c).kind == NodeKind::VariableName).collect();
                for child in children {
                    let cn = stylesheet.node(child);
                    if cn.kind == NodeKind::Declarations {
                        let body_scope = self.open_scope(scope, cn.offset, cn.length);
                        for &v in &loop_vars {
                            let vname = stylesheet.node(v).data.text.clone().unwrap_or_default();
                            self.add_symbol(body_scope, vname, None, v, ReferenceType::Variable);
                        }
                        for gc in cn.children.clone() {
                            self.walk(stylesheet, gc, body_scope);
                        }
                    } else {
                        self.walk(stylesheet, child, scope);
                    }
                }
                return;
            }
            NodeKind::VariableDeclaration => {
                let name = node.data.text.clone().unwrap_or_default();
                let value = children.first().map(|&v| stylesheet.get_text(v).to_string());
                self.add_symbol(scope, name, value, node_id, ReferenceType::Variable);
            }
            NodeKind::CustomPropertyDeclaration => {
                if let Some(&prop_child) = children.first() {
                    if let Some(name) = stylesheet.node(prop_child).data.text.clone() {
                        self.add_symbol(self.global, name, None, node_id, ReferenceType::Unknown);
                    }
                }
            }
            NodeKind::Ruleset => {
                if let Some(&sel_list) = children.first() {
                    self.register_rule_symbols(stylesheet, sel_list, scope);
                }
            }
            NodeKind::Keyframe => {
                if let Some(name) = node.data.text.clone() {
                    self.add_symbol(scope, name, None, node_id, ReferenceType::Keyframe);
                }
            }
            _ => {}
        }

        for child in children {
            self.walk(stylesheet, child, scope);
        }
    }

    fn open_scope(&mut self, parent: ScopeId, offset: usize, length: usize) -> ScopeId {
        self.alloc_scope(Some(parent), offset, length)
    }

    /// A `Selector` that reduces to exactly one `SimpleSelector` is a
    /// rule symbol candidate (drives `@extend` resolution).
    fn register_rule_symbols(&mut self, stylesheet: &Stylesheet, sel_list: NodeId, scope: ScopeId) {
        for &sel in &stylesheet.node(sel_list).children {
            let sel_node = stylesheet.node(sel);
            if sel_node.children.len() == 1 && stylesheet.node(sel_node.children[0]).kind == NodeKind::SimpleSelector {
                let text = stylesheet.get_text(sel).to_string();
                self.add_symbol(scope, text, None, sel, ReferenceType::Rule);
            }
        }
    }

    fn contains(&self, id: ScopeId, offset: usize) -> bool {
        let s = &self.scopes[id.index()];
        offset >= s.offset && offset < s.end()
    }

    fn scope_at_offset(&self, offset: usize) -> ScopeId {
        let mut current = self.global;
        loop {
            let next = self.scopes[current.index()].children.iter().copied().find(|&c| self.contains(c, offset));
            match next {
                Some(c) => current = c,
                None => break,
            }
        }
        current
    }

    fn lookup_named(&self, mut scope: ScopeId, name: &str, allowed: &[ReferenceType]) -> Option<&Symbol> {
        loop {
            if let Some(sym) = self.scopes[scope.index()].symbols.iter().rev().find(|s| s.name == name && allowed.contains(&s.reference_type)) {
                return Some(sym);
            }
            match self.scopes[scope.index()].parent {
                Some(p) => scope = p,
                None => return None,
            }
        }
    }

    /// Reference-type(s) a given node would resolve under, per the rules
    /// in §4.H: `VariableName` is always `Variable`, identifiers inside a
    /// `Selector`/`ExtendsReference` are `Rule`, identifiers that are the
    /// value of `animation`/`animation-name` are `Keyframe`, and any
    /// reference-type already recorded on the node at parse time (module
    /// member access, `@forward` visibility lists, …) is honored as-is.
    fn infer_reference_types(&self, stylesheet: &Stylesheet, node_id: NodeId) -> Vec<ReferenceType> {
        let node = stylesheet.node(node_id);
        match node.kind {
            NodeKind::VariableName => return vec![ReferenceType::Variable],
            NodeKind::MixinReference => return vec![ReferenceType::Mixin],
            NodeKind::Function => return vec![ReferenceType::Function],
            NodeKind::Identifier => {
                if stylesheet.find_any_parent(node_id, &[NodeKind::Selector]).is_some()
                    || stylesheet.find_parent(node_id, NodeKind::ExtendsReference).is_some()
                {
                    return vec![ReferenceType::Rule];
                }
                if self.is_animation_value(stylesheet, node_id) {
                    return vec![ReferenceType::Keyframe];
                }
            }
            _ => {}
        }
        if !node.data.reference_types.is_empty() {
            return node.data.reference_types.clone();
        }
        Vec::new()
    }

    fn is_animation_value(&self, stylesheet: &Stylesheet, node_id: NodeId) -> bool {
        let Some(decl) = stylesheet.find_parent(node_id, NodeKind::Declaration) else {
            return false;
        };
        let Some(&prop_child) = stylesheet.node(decl).children.first() else {
            return false;
        };
        match &stylesheet.node(prop_child).data.text {
            Some(name) => {
                let lname = name.to_ascii_lowercase();
                lname == "animation" || lname == "animation-name"
            }
            None => false,
        }
    }

    /// Resolves the symbol a node refers to, per the lookup algorithm in
    /// §4.H: infer reference type(s), pick the innermost enclosing scope,
    /// and walk outward for the first name/type match. Falls back to the
    /// resolved function's own body scope for an identifier used as a
    /// function argument.
    #[must_use]
    pub fn find_symbol_from_node(&self, stylesheet: &Stylesheet, node_id: NodeId) -> Option<&Symbol> {
        let allowed = self.infer_reference_types(stylesheet, node_id);
        if allowed.is_empty() {
            return None;
        }
        let text = Self::lookup_key_text(stylesheet, node_id);
        let node = stylesheet.node(node_id);
        let start_scope = self.scope_at_offset(node.offset);

        if let Some(found) = self.lookup_named(start_scope, text, &allowed) {
            return Some(found);
        }

        let func_node = stylesheet
            .find_parent(node_id, NodeKind::FunctionArgument)
            .and_then(|arg| stylesheet.node(arg).parent)
            .filter(|&p| stylesheet.node(p).kind == NodeKind::Function);

        if let Some(func) = func_node {
            let func_name = Self::lookup_key_text(stylesheet, func);
            if let Some(func_sym) = self.lookup_named(start_scope, func_name, &[ReferenceType::Function]) {
                if let Some(&body_scope) = self.body_scopes.get(&func_sym.node) {
                    return self.lookup_named(body_scope, text, &allowed);
                }
            }
        }
        None
    }

    /// The name a `Function`/`MixinReference` node is looked up under.
    /// Both kinds grow to cover their argument-list children via
    /// `Tree::add_child`'s range-widening, so their full source span
    /// (`get_text`) includes the call's arguments — the bare callee name
    /// lives in `data.text`, set when the call's identifier is parsed.
    /// Every other node kind's lookup key is still its own source span.
    fn lookup_key_text(stylesheet: &Stylesheet, node_id: NodeId) -> &str {
        let node = stylesheet.node(node_id);
        match node.kind {
            NodeKind::Function | NodeKind::MixinReference => node.data.text.as_deref().unwrap_or(""),
            _ => stylesheet.get_text(node_id),
        }
    }

    /// Direct lookup by name, reference-type and a byte offset, without
    /// needing a resolved AST node.
    #[must_use]
    pub fn find_symbol(&self, name: &str, reference_type: ReferenceType, offset: usize) -> Option<&Symbol> {
        let scope = self.scope_at_offset(offset);
        self.lookup_named(scope, name, &[reference_type])
    }

    /// All symbols of `reference_type` visible from `offset` — the
    /// innermost scope's own symbols first, then each enclosing scope's.
    #[must_use]
    pub fn find_symbols_at_offset(&self, offset: usize, reference_type: ReferenceType) -> Vec<&Symbol> {
        let mut scope = self.scope_at_offset(offset);
        let mut results = Vec::new();
        loop {
            results.extend(self.scopes[scope.index()].symbols.iter().filter(|s| s.reference_type == reference_type));
            match self.scopes[scope.index()].parent {
                Some(p) => scope = p,
                None => break,
            }
        }
        results
    }

    /// Succeeds iff resolving `node_id` yields exactly `symbol`. Drives
    /// cross-reference highlight and rename.
    #[must_use]
    pub fn matches_symbol(&self, stylesheet: &Stylesheet, node_id: NodeId, symbol: &Symbol) -> bool {
        self.find_symbol_from_node(stylesheet, node_id) == Some(symbol)
    }

    /// Flat, depth-first projection over the whole scope tree — document
    /// symbols / outline data, not a new parsing behavior.
    #[must_use]
    pub fn all_symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        self.collect_symbols(self.global, &mut out);
        out
    }

    fn collect_symbols<'a>(&'a self, scope: ScopeId, out: &mut Vec<&'a Symbol>) {
        let s = &self.scopes[scope.index()];
        out.extend(s.symbols.iter());
        for &child in &s.children {
            self.collect_symbols(child, out);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::{Tree, NodeData};
    use crate::dialect::Dialect;
    use crate::location::SourceBuffer;

    fn sheet_from(tree: Tree, root: NodeId, text: &str) -> Stylesheet {
        Stylesheet { buffer: SourceBuffer::new(text), tree, root, dialect: Dialect::Scss }
    }

    #[test]
    fn variable_declaration_resolves_within_its_scope() {
        let text = "$c: red; .a { color: $c; }";
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Stylesheet, 0);

        let var_decl = tree.alloc(NodeKind::VariableDeclaration, 0);
        tree.get_mut(var_decl).data = NodeData { text: Some("c".to_string()), ..Default::default() };
        tree.finish(var_decl, 8);
        tree.add_child(root, var_decl);

        let var_ref = tree.alloc(NodeKind::VariableName, 21);
        tree.get_mut(var_ref).data.text = Some("c".to_string());
        tree.finish(var_ref, 23);

        let decls = tree.alloc(NodeKind::Declarations, 13);
        tree.add_child(decls, var_ref);
        tree.finish(decls, 27);
        tree.add_child(root, decls);
        tree.finish(root, 27);

        let sheet = sheet_from(tree, root, text);
        let symbols = Symbols::new(&sheet);

        let found = symbols.find_symbol_from_node(&sheet, var_ref).expect("variable should resolve");
        assert_eq!(found.name, "c");
        assert_eq!(found.node, var_decl);
    }

    #[test]
    fn inner_declaration_shadows_outer_one() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Stylesheet, 0);

        let outer = tree.alloc(NodeKind::VariableDeclaration, 0);
        tree.get_mut(outer).data.text = Some("x".to_string());
        tree.finish(outer, 5);
        tree.add_child(root, outer);

        let decls = tree.alloc(NodeKind::Declarations, 5);
        let inner = tree.alloc(NodeKind::VariableDeclaration, 6);
        tree.get_mut(inner).data.text = Some("x".to_string());
        tree.finish(inner, 10);
        tree.add_child(decls, inner);

        let var_ref = tree.alloc(NodeKind::VariableName, 11);
        tree.get_mut(var_ref).data.text = Some("x".to_string());
        tree.finish(var_ref, 12);
        tree.add_child(decls, var_ref);
        tree.finish(decls, 15);
        tree.add_child(root, decls);
        tree.finish(root, 15);

        let sheet = sheet_from(tree, root, "................");
        let symbols = Symbols::new(&sheet);

        let found = symbols.find_symbol_from_node(&sheet, var_ref).expect("variable should resolve");
        assert_eq!(found.node, inner);
    }

    #[test]
    fn single_simple_selector_registers_a_rule_symbol() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Stylesheet, 0);

        let ruleset = tree.alloc(NodeKind::Ruleset, 0);
        let sel_list = tree.alloc(NodeKind::SelectorList, 0);
        let sel = tree.alloc(NodeKind::Selector, 0);
        let simple = tree.alloc(NodeKind::SimpleSelector, 0);
        tree.finish(simple, 4);
        tree.add_child(sel, simple);
        tree.finish(sel, 4);
        tree.add_child(sel_list, sel);
        tree.finish(sel_list, 4);
        tree.add_child(ruleset, sel_list);
        tree.finish(ruleset, 10);
        tree.add_child(root, ruleset);
        tree.finish(root, 10);

        let sheet = sheet_from(tree, root, ".foo {}...");
        let symbols = Symbols::new(&sheet);

        let found = symbols.find_symbol(".foo", ReferenceType::Rule, 0);
        assert!(found.is_some());
    }
}
