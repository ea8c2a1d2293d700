use std::fmt;

use crate::{BspTree, node::Node};

/// Shape summary of a tree, see [`BspTree::stats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Depth of the deepest node; a lone root leaf has depth 0.
    pub depth: usize,
    pub split_nodes: usize,
    pub leaves: usize,
    pub largest_leaf: usize,
    /// Sum of leaf lengths. Exceeds `elements` when boxes are duplicated.
    pub stored_refs: usize,
    pub elements: usize,
}

impl TreeStats {
    /// Average number of leaves a box ends up in.
    #[must_use]
    pub fn duplication_factor(&self) -> f64 {
        if self.elements == 0 {
            return 0.0;
        }

        self.stored_refs as f64 / self.elements as f64
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} elements, {} splits, {} leaves (largest {}), depth {}, {:.2} refs per element",
            self.elements,
            self.split_nodes,
            self.leaves,
            self.largest_leaf,
            self.depth,
            self.duplication_factor()
        )
    }
}

impl BspTree {
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            elements: self.len(),
            ..TreeStats::default()
        };

        let mut stack = vec![(self.root(), 0_usize)];

        while let Some((node, depth)) = stack.pop() {
            stats.depth = stats.depth.max(depth);

            match node {
                Node::Split(_, left, right) => {
                    stats.split_nodes += 1;
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
                Node::Leaf(ids) => {
                    stats.leaves += 1;
                    stats.largest_leaf = stats.largest_leaf.max(ids.len());
                    stats.stored_refs += ids.len();
                }
            }
        }

        stats
    }
}
