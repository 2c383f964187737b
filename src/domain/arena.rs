use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{Child, ParseTree, TreePosition};

/// Payload of an arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// Internal node carrying a constituent label
    Phrase(String),
    /// Terminal token
    Token(String),
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeData::Phrase(label) => write!(f, "{}", label),
            NodeData::Token(token) => write!(f, "{}", token),
        }
    }
}

/// Tree node in the arena. Nodes are never modified after insertion, so any number of
/// trees can share a node.
#[derive(Debug)]
pub struct TreeNode {
    /// Label or token for this node
    pub data: NodeData,
    /// Indices of child nodes in the arena, empty for tokens
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn label(&self) -> Option<&str> {
        match &self.data {
            NodeData::Phrase(label) => Some(label.as_str()),
            NodeData::Token(_) => None,
        }
    }

    pub fn is_phrase(&self) -> bool {
        matches!(self.data, NodeData::Phrase(_))
    }
}

/// Arena-based node store for persistent parse trees.
///
/// A tree is just the `Index` of its root. Replacing the node at a position copies the
/// nodes on the path from the root to that position and shares every other subtree, so
/// producing a variant costs O(depth) nodes instead of a deep copy.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self, children))]
    pub fn insert_node(&mut self, data: NodeData, children: Vec<Index>) -> Index {
        self.arena.insert(TreeNode { data, children })
    }

    /// Copies an owned tree into the arena and returns its root.
    pub fn insert_tree(&mut self, tree: &ParseTree) -> Index {
        let children = tree
            .children()
            .iter()
            .map(|child| match child {
                Child::Tree(subtree) => self.insert_tree(subtree),
                Child::Token(token) => self.insert_node(NodeData::Token(token.clone()), Vec::new()),
            })
            .collect();
        self.insert_node(NodeData::Phrase(tree.label().to_string()), children)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    fn node(&self, idx: Index) -> DomainResult<&TreeNode> {
        self.arena.get(idx).ok_or(DomainError::DanglingNode(idx))
    }

    /// Node at `position` below `root`.
    #[instrument(level = "trace", skip(self))]
    pub fn resolve(&self, root: Index, position: &TreePosition) -> DomainResult<Index> {
        let mut current = root;
        for &step in position.as_slice() {
            current = *self
                .node(current)?
                .children
                .get(step)
                .ok_or_else(|| DomainError::StalePosition(position.clone()))?;
        }
        Ok(current)
    }

    /// New root equal to `root` with the node at `position` swapped for `replacement`.
    /// `root` itself stays valid and unchanged.
    #[instrument(level = "trace", skip(self))]
    pub fn replace_at(
        &mut self,
        root: Index,
        position: &TreePosition,
        replacement: Index,
    ) -> DomainResult<Index> {
        self.replace_path(root, position.as_slice(), replacement)
            .map_err(|e| match e {
                DomainError::StalePosition(_) => DomainError::StalePosition(position.clone()),
                other => other,
            })
    }

    fn replace_path(&mut self, node: Index, path: &[usize], replacement: Index) -> DomainResult<Index> {
        let Some((&step, rest)) = path.split_first() else {
            return Ok(replacement);
        };
        let current = self.node(node)?;
        let child = *current
            .children
            .get(step)
            .ok_or_else(|| DomainError::StalePosition(TreePosition::root()))?;
        let data = current.data.clone();
        let mut children = current.children.clone();
        children[step] = self.replace_path(child, rest, replacement)?;
        Ok(self.insert_node(data, children))
    }

    /// Converts the tree rooted at `idx` back into an owned `ParseTree`.
    pub fn to_parse_tree(&self, idx: Index) -> DomainResult<ParseTree> {
        let node = self.node(idx)?;
        let label = match &node.data {
            NodeData::Phrase(label) => label.clone(),
            NodeData::Token(token) => return Err(DomainError::TerminalNode(token.clone())),
        };
        let children = node
            .children
            .iter()
            .map(|&child| match &self.node(child)?.data {
                NodeData::Token(token) => Ok(Child::Token(token.clone())),
                NodeData::Phrase(_) => self.to_parse_tree(child).map(Child::Tree),
            })
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(ParseTree::new(label, children))
    }

    /// Pre-order walk over every node below `root`, tokens included.
    pub fn iter(&self, root: Index) -> TreeIterator {
        TreeIterator::new(self, root)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(Index, TreePosition)>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, root: Index) -> Self {
        Self {
            arena,
            stack: vec![(root, TreePosition::root())],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (TreePosition, Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, position)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for (i, &child) in node.children.iter().enumerate().rev() {
                    self.stack.push((child, position.child(i)));
                }
                return Some((position, current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(text: &str) -> (TreeArena, Index) {
        let tree: ParseTree = text.parse().unwrap();
        let mut arena = TreeArena::new();
        let root = arena.insert_tree(&tree);
        (arena, root)
    }

    #[test]
    fn test_insert_and_materialize_roundtrip() {
        let text = "(S (NP (NNP John)) (VP (VBZ runs)))";
        let (arena, root) = arena_with(text);
        assert_eq!(arena.to_parse_tree(root).unwrap().to_string(), text);
        assert_eq!(arena.len(), 7);
    }

    #[test]
    fn test_iter_matches_owned_positions() {
        let text = "(S (NP (DT the) (NN dog)) (VP (VBD barked)))";
        let (arena, root) = arena_with(text);
        let owned: ParseTree = text.parse().unwrap();
        let walked: Vec<_> = arena.iter(root).map(|(pos, _, _)| pos).collect();
        assert_eq!(walked, owned.positions());
    }

    #[test]
    fn test_replace_at_copies_only_the_path() {
        let (mut arena, root) = arena_with("(S (NP (NNP John)) (VP (VBZ runs)))");
        let before = arena.len();
        let mary = arena.insert_tree(&ParseTree::leaf("NNP", "Mary"));
        let new_root = arena.replace_at(root, &vec![0, 0].into(), mary).unwrap();

        // S and NP copied, Mary inserted as two nodes
        assert_eq!(arena.len(), before + 4);
        assert_eq!(
            arena.to_parse_tree(new_root).unwrap().to_string(),
            "(S (NP (NNP Mary)) (VP (VBZ runs)))"
        );
        assert_eq!(
            arena.to_parse_tree(root).unwrap().to_string(),
            "(S (NP (NNP John)) (VP (VBZ runs)))"
        );
        // VP subtree is shared between both versions
        let vp = TreePosition::from(vec![1]);
        assert_eq!(arena.resolve(root, &vp).unwrap(), arena.resolve(new_root, &vp).unwrap());
    }

    #[test]
    fn test_replace_at_root_returns_replacement() {
        let (mut arena, root) = arena_with("(S (NP (NNP John)))");
        let other = arena.insert_tree(&ParseTree::leaf("X", "y"));
        assert_eq!(arena.replace_at(root, &TreePosition::root(), other).unwrap(), other);
    }

    #[test]
    fn test_stale_position_is_reported() {
        let (mut arena, root) = arena_with("(S (NP (NNP John)))");
        let other = arena.insert_tree(&ParseTree::leaf("X", "y"));
        let position = TreePosition::from(vec![0, 3]);
        assert_eq!(
            arena.replace_at(root, &position, other),
            Err(DomainError::StalePosition(position.clone()))
        );
        assert_eq!(
            arena.resolve(root, &position),
            Err(DomainError::StalePosition(position))
        );
    }

    #[test]
    fn test_token_root_cannot_be_materialized() {
        let mut arena = TreeArena::new();
        let token = arena.insert_node(NodeData::Token("dog".into()), Vec::new());
        assert_eq!(
            arena.to_parse_tree(token),
            Err(DomainError::TerminalNode("dog".into()))
        );
    }
}
