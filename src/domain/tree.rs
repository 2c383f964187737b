//! Owned parse tree value type and tree positions.
//!
//! `ParseTree` is what callers hand in and get back. The algorithm itself works on
//! [`TreeArena`](crate::domain::arena::TreeArena) handles and converts at the boundary.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::parser;

/// Path of child indices from the root down to a node. The empty path is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TreePosition(Vec<usize>);

impl TreePosition {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// True when `other` lies strictly below this position.
    pub fn is_ancestor_of(&self, other: &TreePosition) -> bool {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<usize>> for TreePosition {
    fn from(path: Vec<usize>) -> Self {
        Self(path)
    }
}

impl fmt::Display for TreePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, ")")
    }
}

/// A child slot: either a terminal token or a nested phrase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Child {
    Token(String),
    Tree(ParseTree),
}

impl Child {
    /// Label of a phrase child; tokens carry none.
    pub fn label(&self) -> Option<&str> {
        match self {
            Child::Tree(tree) => Some(tree.label()),
            Child::Token(_) => None,
        }
    }
}

impl From<ParseTree> for Child {
    fn from(tree: ParseTree) -> Self {
        Child::Tree(tree)
    }
}

/// Constituency parse tree: a label plus ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseTree {
    label: String,
    children: Vec<Child>,
}

impl ParseTree {
    pub fn new(label: impl Into<String>, children: Vec<Child>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    /// Preterminal shorthand: `(label token)`.
    pub fn leaf(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(label, vec![Child::Token(token.into())])
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// All node positions in pre-order, tokens included.
    pub fn positions(&self) -> Vec<TreePosition> {
        let mut positions = Vec::new();
        let mut stack = vec![(TreePosition::root(), Some(self))];
        while let Some((position, node)) = stack.pop() {
            if let Some(tree) = node {
                for (i, child) in tree.children.iter().enumerate().rev() {
                    let subtree = match child {
                        Child::Tree(t) => Some(t),
                        Child::Token(_) => None,
                    };
                    stack.push((position.child(i), subtree));
                }
            }
            positions.push(position);
        }
        positions
    }

    /// Phrase node at `position`, `None` if the path is out of range or ends on a token.
    pub fn subtree(&self, position: &TreePosition) -> Option<&ParseTree> {
        let mut current = self;
        for &index in position.as_slice() {
            match current.children.get(index)? {
                Child::Tree(tree) => current = tree,
                Child::Token(_) => return None,
            }
        }
        Some(current)
    }

    /// Terminal tokens, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a str>) {
        for child in &self.children {
            match child {
                Child::Token(token) => leaves.push(token),
                Child::Tree(tree) => tree.collect_leaves(leaves),
            }
        }
    }

    /// Renders the flat form when it fits in `margin` columns, otherwise one child per line
    /// with two spaces of indentation per level.
    pub fn pformat(&self, margin: usize) -> String {
        self.pformat_indented(margin, 0)
    }

    fn pformat_indented(&self, margin: usize, indent: usize) -> String {
        let flat = self.to_string();
        if flat.chars().count() + indent < margin {
            return flat;
        }
        let pad = " ".repeat(indent + 2);
        let mut out = format!("({}", self.label);
        for child in &self.children {
            out.push('\n');
            out.push_str(&pad);
            match child {
                Child::Tree(tree) => out.push_str(&tree.pformat_indented(margin, indent + 2)),
                Child::Token(token) => out.push_str(token),
            }
        }
        out.push(')');
        out
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.label)?;
        for child in &self.children {
            match child {
                Child::Tree(tree) => write!(f, " {}", tree)?,
                Child::Token(token) => write!(f, " {}", token)?,
            }
        }
        write!(f, ")")
    }
}

impl FromStr for ParseTree {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_tree(s)
    }
}
