use arrayvec::ArrayVec;
use bitvec::vec::BitVec;
use geometry::Aabb;
use glam::Vec2;

use super::STACK_CAPACITY;
use crate::{
    BspTree,
    node::{ElementId, Node},
};

impl BspTree {
    /// Every box overlapping `target`, touching included, in element order.
    #[must_use]
    pub fn query_region(&self, target: &Aabb) -> Vec<Aabb> {
        self.resolve(self.query_region_ids(target))
    }

    #[must_use]
    pub fn query_region_ids(&self, target: &Aabb) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self.candidates(target).map(|(id, _)| id).collect();
        ids.sort_unstable();
        ids
    }

    /// Every box containing `point`, boundary included, in element order.
    #[must_use]
    pub fn query_point(&self, point: Vec2) -> Vec<Aabb> {
        self.resolve(self.query_point_ids(point))
    }

    #[must_use]
    pub fn query_point_ids(&self, point: Vec2) -> Vec<ElementId> {
        // a point is a zero-sized box; containment and closed overlap agree
        match Aabb::from_point(point) {
            Ok(target) => self.query_region_ids(&target),
            Err(_) => Vec::new(),
        }
    }

    /// Streams the boxes overlapping `target` in traversal order, each once.
    #[must_use]
    pub fn candidates(&self, target: &Aabb) -> CandidateIter<'_> {
        CandidateIter::new(self, *target)
    }
}

#[derive(Debug)]
pub struct CandidateIter<'a> {
    tree: &'a BspTree,
    target: Aabb,
    stack: ArrayVec<&'a Node, STACK_CAPACITY>,
    current_leaf: Option<(&'a [ElementId], usize)>,
    seen: BitVec,
}

impl<'a> CandidateIter<'a> {
    fn new(tree: &'a BspTree, target: Aabb) -> Self {
        let mut stack = ArrayVec::new();
        stack.push(tree.root());

        Self {
            tree,
            target,
            stack,
            current_leaf: None,
            seen: BitVec::repeat(false, tree.len()),
        }
    }

    fn expand(&mut self, node: &'a Node) {
        match node {
            Node::Split(split, left, right) => {
                let (lo, hi) = self.target.interval(split.axis());
                if split.excludes(lo, hi) {
                    return;
                }

                let at = split.coordinate();

                // right first so the left subtree is popped first
                if hi >= at {
                    self.stack.push(right);
                }
                if lo <= at {
                    self.stack.push(left);
                }
            }
            Node::Leaf(ids) => {
                self.current_leaf = Some((ids, 0));
            }
        }
    }
}

impl<'a> Iterator for CandidateIter<'a> {
    type Item = (ElementId, &'a Aabb);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((leaf, index)) = &mut self.current_leaf {
                if let Some(&id) = leaf.get(*index) {
                    *index += 1;

                    let Some(aabb) = self.tree.get(id) else {
                        continue;
                    };

                    // duplicated boxes are reported from the first leaf that holds them
                    if aabb.collides(&self.target) && !self.seen.replace(id.index(), true) {
                        return Some((id, aabb));
                    }
                    continue;
                }

                self.current_leaf = None;
            }

            let node = self.stack.pop()?;
            self.expand(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use geometry::Aabb;
    use glam::Vec2;

    use crate::BspTree;

    fn aabb(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Aabb {
        Aabb::new([min_x, min_y], [max_x, max_y]).unwrap()
    }

    #[test]
    fn straddler_is_reported_once() {
        let elements = vec![
            aabb(0.0, 0.0, 1.0, 1.0),
            aabb(0.5, 0.0, 9.5, 1.0),
            aabb(9.0, 0.0, 10.0, 1.0),
        ];
        let tree = BspTree::build_with(elements, 2, 8).unwrap();

        let whole = aabb(-1.0, -1.0, 11.0, 2.0);
        let hits: Vec<_> = tree.candidates(&whole).map(|(id, _)| id.0).collect();
        assert_eq!(hits.len(), 3);

        let mut sorted = hits.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    #[test]
    fn point_on_split_line() {
        let elements = vec![aabb(0.0, 0.0, 5.0, 1.0), aabb(5.0, 0.0, 10.0, 1.0)];
        let tree = BspTree::build_with(elements.clone(), 1, 8).unwrap();

        assert_eq!(tree.query_point(Vec2::new(5.0, 0.5)), elements);
        assert_eq!(tree.query_point(Vec2::new(5.0, 1.0)), elements);
        assert!(tree.query_point(Vec2::new(5.0, 1.01)).is_empty());
    }

    #[test]
    fn nan_point_matches_nothing() {
        let tree = BspTree::build_with(vec![aabb(0.0, 0.0, 1.0, 1.0)], 1, 8).unwrap();
        assert!(tree.query_point(Vec2::new(f32::NAN, 0.5)).is_empty());
    }
}
