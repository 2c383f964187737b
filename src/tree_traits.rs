/*
Outline rendering for parse trees via termtree.

Phrase nodes become inner nodes labeled with their constituent label, tokens become leaves.
Kept as a trait so the domain types stay free of display dependencies.
 */
use termtree::Tree;

use crate::domain::{Child, ParseTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for ParseTree {
    fn to_tree_string(&self) -> Tree<String> {
        // Recursively construct the children
        let leaves: Vec<_> = self
            .children()
            .iter()
            .map(|child| match child {
                Child::Tree(tree) => tree.to_tree_string(),
                Child::Token(token) => Tree::new(token.clone()),
            })
            .collect();

        Tree::new(self.label().to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_lists_labels_and_tokens() {
        let tree: ParseTree = "(NP (DT the) (NN dog))".parse().unwrap();
        let rendered = tree.to_tree_string().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "NP");
        assert!(lines[1].ends_with("DT"));
        assert!(lines[2].ends_with("the"));
        assert!(lines[4].ends_with("dog"));
    }
}
