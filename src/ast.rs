//! Component D: the AST node arena.
//!
//! Nodes live in a single arena owned by the `Stylesheet` root; children
//! and parents are arena indices rather than pointers, which sidesteps the
//! cyclic ownership a naive parent-pointer tree would need. Per-kind
//! extension data (a flag, an operator, a parsed number, …) lives in
//! [`NodeData`] rather than as one struct per node kind.

use crate::diagnostics::Diagnostic;
use crate::location::SourceBuffer;

/// Arena index. Cheap to copy, stable for the lifetime of a `Stylesheet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The closed set of AST node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Stylesheet,

    // selectors
    SelectorList,
    Selector,
    SimpleSelector,
    ClassSelector,
    IdSelector,
    AttributeSelector,
    PseudoSelector,
    SelectorCombinator,

    // declarations and values
    Declarations,
    Declaration,
    Property,
    Expression,
    BinaryExpression,
    Term,
    Operator,
    NumericValue,
    HexColorValue,
    StringLiteral,
    Uri,
    Function,
    FunctionArgument,
    Identifier,
    Interpolation,

    // at-rules
    Media,
    MediaQuery,
    MediaFeature,
    Supports,
    SupportsCondition,
    Keyframe,
    KeyframeSelector,
    FontFace,
    Import,
    Namespace,
    DocumentRule,
    Viewport,
    Page,
    PageSelector,
    Charset,
    ApplyRule,
    CustomPropertyDeclaration,
    CustomPropertySet,
    UnknownAtRule,

    // SCSS overlay
    VariableDeclaration,
    VariableName,
    MixinDeclaration,
    MixinReference,
    FunctionDeclaration,
    ReturnStatement,
    IfStatement,
    ForStatement,
    EachStatement,
    WhileStatement,
    ExtendsReference,
    AtRootStatement,
    DebugStatement,
    WarnStatement,
    ErrorStatement,
    UseStatement,
    ForwardStatement,
    Map,
    MapEntry,
    NestedProperties,
    Parameter,

    // LESS overlay
    LessGuard,
    GuardCondition,
    EscapedValue,
    Plugin,

    Unknown,
}

/// Combinator between two simple selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    Sibling,
    GeneralSibling,
    /// `>>>`, the shadow-piercing descendant combinator.
    ShadowPiercing,
}

/// Guard-condition comparator (LESS `when` clauses).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Gte,
    Eq,
    Lte,
    Lt,
}

/// The closed set of symbol reference-types a resolved identifier can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceType {
    Mixin,
    Rule,
    Variable,
    Function,
    Keyframe,
    Module,
    ForwardVisibility,
    Unknown,
}

/// Per-kind extension fields. Most nodes use only `text`, or nothing at
/// all; the rest are populated by the one or two non-terminals that need
/// them.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Literal text payload: identifier name, variable name, operator
    /// character, raw string contents, at-rule keyword, and so on.
    pub text: Option<String>,
    pub number: Option<f64>,
    pub unit: Option<String>,
    pub combinator: Option<Combinator>,
    pub comparator: Option<Comparator>,
    pub reference_types: Vec<ReferenceType>,
    pub colon_offset: Option<usize>,
    pub semicolon_offset: Option<usize>,
    pub important: bool,
    pub is_custom_property: bool,
    pub is_id_selector: bool,
    /// For `PseudoSelector`: whether the name is one of the standard
    /// CSS Selectors pseudo-class/element names, as opposed to a
    /// framework- or vendor-specific one.
    pub is_known_pseudo: bool,
    pub default: bool,
    pub global: bool,
    pub once: bool,
    pub optional: bool,
    /// For a `Property` nested under SCSS nested properties (`font: {
    /// size: 10px; }`), the outer prefix concatenated with this
    /// property's own name (`"font-size"`). `None` for every other
    /// property, where `text` alone already is the full name.
    pub full_property_name: Option<String>,
}

/// A single AST node. Owned by the arena; referenced elsewhere only by
/// [`NodeId`].
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub offset: usize,
    pub length: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
    pub data: NodeData,
}

impl Node {
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// The node arena. Allocation is append-only; nodes are never freed
/// individually, only dropped with the whole tree.
#[derive(Debug, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, kind: NodeKind, offset: usize) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            offset,
            length: 0,
            parent: None,
            children: Vec::new(),
            diagnostics: Vec::new(),
            data: NodeData::default(),
        });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Appends `child` to `parent`'s children, sets `child`'s parent
    /// pointer, and widens `parent`'s range to the union of the two.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.index()].parent = Some(parent);
        let child_end = self.nodes[child.index()].end();
        let child_offset = self.nodes[child.index()].offset;
        self.nodes[parent.index()].children.push(child);

        let p = &mut self.nodes[parent.index()];
        if p.children.len() == 1 {
            p.offset = p.offset.min(child_offset);
        }
        let new_end = p.end().max(child_end);
        p.length = new_end - p.offset;
    }

    /// Sets a node's length from its start offset to `end_offset`.
    /// Idempotent with `add_child`: whichever runs last wins, so callers
    /// finish a node only after all children have been attached.
    pub fn finish(&mut self, id: NodeId, end_offset: usize) {
        let node = &mut self.nodes[id.index()];
        let end_offset = end_offset.max(node.end());
        node.length = end_offset.saturating_sub(node.offset);
    }

    pub fn push_diagnostic(&mut self, id: NodeId, diagnostic: Diagnostic) {
        self.nodes[id.index()].diagnostics.push(diagnostic);
    }
}

/// The parsed document: arena plus the immutable source text it indexes
/// into. The root of every tree produced by `parse`.
pub struct Stylesheet {
    pub(crate) buffer: SourceBuffer,
    pub(crate) tree: Tree,
    pub(crate) root: NodeId,
    pub(crate) dialect: crate::dialect::Dialect,
}

impl Stylesheet {
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn dialect(&self) -> crate::dialect::Dialect {
        self.dialect
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        self.tree.get(id)
    }

    #[must_use]
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn get_text(&self, id: NodeId) -> &str {
        let n = self.tree.get(id);
        self.buffer.slice(n.offset, n.length)
    }

    #[must_use]
    pub fn matches(&self, id: NodeId, s: &str) -> bool {
        self.get_text(id) == s
    }

    #[must_use]
    pub fn starts_with(&self, id: NodeId, s: &str) -> bool {
        self.get_text(id).starts_with(s)
    }

    #[must_use]
    pub fn ends_with(&self, id: NodeId, s: &str) -> bool {
        self.get_text(id).ends_with(s)
    }

    /// Pre-order traversal. `visitor` returns `true` to descend into a
    /// node's children, `false` to prune that subtree.
    pub fn accept(&self, id: NodeId, visitor: &mut impl FnMut(NodeId) -> bool) {
        if !visitor(id) {
            return;
        }
        for &child in &self.tree.get(id).children {
            self.accept(child, visitor);
        }
    }

    #[must_use]
    pub fn encloses(&self, outer: NodeId, inner: NodeId) -> bool {
        let a = self.tree.get(outer);
        let b = self.tree.get(inner);
        a.offset <= b.offset && b.end() <= a.end()
    }

    #[must_use]
    pub fn is_erroneous(&self, id: NodeId, recursive: bool) -> bool {
        let node = self.tree.get(id);
        if !node.diagnostics.is_empty() {
            return true;
        }
        recursive && node.children.iter().any(|&c| self.is_erroneous(c, true))
    }

    /// Smallest node whose range contains `offset`; ties broken by
    /// insertion order among same-range siblings.
    #[must_use]
    pub fn find_node_at_offset(&self, offset: usize) -> Option<NodeId> {
        self.node_path(offset).last().copied()
    }

    /// `[root, …, leaf]` path to the smallest node containing `offset`.
    #[must_use]
    pub fn node_path(&self, offset: usize) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.root;
        loop {
            if !self.contains_offset(current, offset) {
                break;
            }
            path.push(current);
            let next = self
                .tree
                .get(current)
                .children
                .iter()
                .copied()
                .find(|&c| self.contains_offset(c, offset));
            match next {
                Some(child) => current = child,
                None => break,
            }
        }
        path
    }

    /// Same traversal as [`Stylesheet::node_path`], exposed under its own
    /// name since a selection-range pyramid is itself a first-class
    /// editor feature rather than just a side effect of path lookup.
    #[must_use]
    pub fn selection_range_path(&self, offset: usize) -> Vec<NodeId> {
        let mut path = self.node_path(offset);
        path.reverse();
        path
    }

    fn contains_offset(&self, id: NodeId, offset: usize) -> bool {
        let n = self.tree.get(id);
        offset >= n.offset && offset <= n.end()
    }

    #[must_use]
    pub fn find_parent(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.find_any_parent(id, &[kind])
    }

    #[must_use]
    pub fn find_any_parent(&self, id: NodeId, kinds: &[NodeKind]) -> Option<NodeId> {
        let mut current = self.tree.get(id).parent;
        while let Some(c) = current {
            if kinds.contains(&self.tree.get(c).kind) {
                return Some(c);
            }
            current = self.tree.get(c).parent;
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_child_widens_parent_range() {
        let mut tree = Tree::new();
        let parent = tree.alloc(NodeKind::Declaration, 5);
        tree.finish(parent, 5);
        let child = tree.alloc(NodeKind::Property, 5);
        tree.finish(child, 10);
        tree.add_child(parent, child);
        tree.finish(parent, 10);

        assert_eq!(tree.get(parent).offset, 5);
        assert_eq!(tree.get(parent).length, 5);
        assert_eq!(tree.get(child).parent, Some(parent));
    }

    #[test]
    fn node_path_picks_smallest_enclosing_node() {
        let mut tree = Tree::new();
        let root = tree.alloc(NodeKind::Stylesheet, 0);
        let decl = tree.alloc(NodeKind::Declaration, 2);
        tree.finish(decl, 8);
        tree.add_child(root, decl);
        let prop = tree.alloc(NodeKind::Property, 2);
        tree.finish(prop, 5);
        tree.add_child(decl, prop);
        tree.finish(root, 8);

        let sheet = Stylesheet {
            buffer: SourceBuffer::new("  color: red"),
            tree,
            root,
            dialect: crate::dialect::Dialect::Css,
        };

        let path = sheet.node_path(3);
        assert_eq!(path.last(), Some(&prop));
        assert_eq!(path.first(), Some(&root));
    }
}
