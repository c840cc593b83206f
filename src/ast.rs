// AST (Abstract Syntax Tree) definitions for the Zerg front end

use std::fmt;

use crate::lexer::Token;

/// Unique identifier for AST nodes, used as a handle into the [`Ast`] arena
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single node of the syntax tree: one token, its children in insertion
/// order, and a non-owning link back to its parent.
///
/// Parent links are arena indices, never owning pointers; they serve only
/// path queries such as [`Ast::is_last_child`].
#[derive(Debug, Clone)]
pub struct AstNode {
    pub token: Token,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// The arena owning every node of one parsed compilation unit.
///
/// Nodes are allocated during parsing, attached to their parent right away,
/// and never mutated once the parse completes. The whole tree is released
/// together when the `Ast` is dropped.
#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
}

impl Ast {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate a detached node holding `token`.
    pub fn add(&mut self, token: Token) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(AstNode {
            token,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a node holding the synthetic root token.
    pub fn add_root(&mut self) -> NodeId {
        self.add(Token::root())
    }

    /// Append `child` as the last child of `parent` and set the child's
    /// parent link.
    ///
    /// Returns `parent` so a statement's children can be attached in a
    /// left-to-right chain. A node must never be attached under two
    /// different parents; that contract rests with the caller and is not
    /// checked here.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        parent
    }

    /// The outermost root: the first node allocated into the arena.
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id].token
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Whether `child` is a direct (not transitive) child of `parent`.
    pub fn is_child_of(&self, parent: NodeId, child: NodeId) -> bool {
        self.nodes[parent].children.contains(&child)
    }

    /// Whether `id` is the last child of its parent. A node with no parent
    /// counts as last.
    pub fn is_last_child(&self, id: NodeId) -> bool {
        match self.nodes[id].parent {
            Some(parent) => self.nodes[parent].children.last() == Some(&id),
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        indent: usize,
    ) -> fmt::Result {
        let node = &self.nodes[id];

        if node.parent.is_none() {
            write!(f, "{}", node.token)?;
        } else {
            let connector = if self.is_last_child(id) { "└─" } else { "├─" };
            write!(f, "\n{}{}  {}", " ".repeat(indent), connector, node.token)?;
        }

        for &child in &node.children {
            self.fmt_node(f, child, indent + 4)?;
        }

        Ok(())
    }
}

/// Human-readable tree drawing used for diagnostics and debugging: the root
/// line is the bare token, every other line carries a mid-child (`├─`) or
/// last-child (`└─`) connector at four spaces of indent per depth level.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() {
            return Ok(());
        }
        self.fmt_node(f, self.root(), 0)
    }
}
