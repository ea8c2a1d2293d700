use std::fmt;

use crate::{
    BspTree,
    node::{Node, Split},
};

/// Text form of a tree, readable back with [`parse_tree`](crate::parse_tree).
///
/// ```text
/// Node(Split { split_type: Vertical, min: 0.0, max: 6.0 }, Leaf([Aabb { mins: [0.0, 0.0], maxs: [1.0, 1.0] }]), Leaf([...]))
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Dump<'a> {
    tree: &'a BspTree,
}

impl BspTree {
    #[must_use]
    pub const fn dump(&self) -> Dump<'_> {
        Dump { tree: self }
    }
}

impl Dump<'_> {
    fn node(&self, f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
        match node {
            Node::Split(split, left, right) => {
                f.write_str("Node(")?;
                write_split(f, split)?;
                f.write_str(", ")?;
                self.node(f, left)?;
                f.write_str(", ")?;
                self.node(f, right)?;
                f.write_str(")")
            }
            Node::Leaf(ids) => {
                f.write_str("Leaf([")?;
                for (i, aabb) in ids.iter().filter_map(|&id| self.tree.get(id)).enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{aabb:?}")?;
                }
                f.write_str("])")
            }
        }
    }
}

fn write_split(f: &mut fmt::Formatter<'_>, split: &Split) -> fmt::Result {
    write!(
        f,
        "Split {{ split_type: {}, min: {:?}, max: {:?} }}",
        split.split_type.name(),
        split.min,
        split.max
    )
}

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node(f, self.tree.root())
    }
}

#[cfg(test)]
mod tests {
    use geometry::Aabb;

    use crate::BspTree;

    #[test]
    fn empty_tree() {
        assert_eq!(BspTree::default().dump().to_string(), "Leaf([])");
    }

    #[test]
    fn two_boxes() {
        let elements = vec![
            Aabb::new([0.0, 0.0], [1.0, 1.0]).unwrap(),
            Aabb::new([5.0, 5.0], [6.0, 6.0]).unwrap(),
        ];
        let tree = BspTree::build_with(elements, 1, 8).unwrap();

        assert_eq!(
            tree.dump().to_string(),
            "Node(Split { split_type: Vertical, min: 0.0, max: 6.0 }, \
             Leaf([Aabb { mins: [0.0, 0.0], maxs: [1.0, 1.0] }]), \
             Leaf([Aabb { mins: [5.0, 5.0], maxs: [6.0, 6.0] }]))"
        );
    }

    #[test]
    fn short_floats() {
        let elements = vec![Aabb::new([-0.1, 1e-7], [3.25, 1e20]).unwrap()];
        let tree = BspTree::build_with(elements, 1, 8).unwrap();

        assert_eq!(
            tree.dump().to_string(),
            "Leaf([Aabb { mins: [-0.1, 1e-7], maxs: [3.25, 1e20] }])"
        );
    }
}
