use std::{cmp::Reverse, collections::BinaryHeap};

use geometry::Aabb;
use glam::Vec2;
use ordered_float::NotNan;

use crate::{
    BspTree,
    node::{ElementId, Node},
    utils::NodeOrd,
};

impl BspTree {
    /// Returns the box closest to `target` and the squared distance to it.
    ///
    /// Boxes containing `target` are at distance 0. Equal distances go to the
    /// lowest [`ElementId`].
    #[must_use]
    pub fn get_closest(&self, target: Vec2) -> Option<(ElementId, &Aabb, f64)> {
        if !target.is_finite() {
            return None;
        }

        let mut closest: Option<(ElementId, f64)> = None;

        let mut heap = BinaryHeap::new();
        heap.push(Reverse(NodeOrd::new(self.root(), NotNan::new(0.0_f64).ok()?)));

        while let Some(Reverse(current)) = heap.pop() {
            let bound = current.by;

            if closest.is_some_and(|(_, dist2)| bound.into_inner() > dist2) {
                break;
            }

            match current.node {
                Node::Split(split, left, right) => {
                    let at = f64::from(target[split.axis().index()]);
                    let gap = (f64::from(split.min) - at)
                        .max(at - f64::from(split.max))
                        .max(0.0);

                    let Ok(gap2) = NotNan::new(gap * gap) else {
                        continue;
                    };
                    let bound = bound.max(gap2);

                    heap.push(Reverse(NodeOrd::new(left, bound)));
                    heap.push(Reverse(NodeOrd::new(right, bound)));
                }
                Node::Leaf(ids) => {
                    for &id in ids {
                        let Some(aabb) = self.get(id) else {
                            continue;
                        };
                        let dist2 = aabb.dist2(target);

                        let better = closest.is_none_or(|(best_id, best)| {
                            dist2.total_cmp(&best).then(id.cmp(&best_id)).is_lt()
                        });

                        if better {
                            closest = Some((id, dist2));
                        }
                    }
                }
            }
        }

        let (id, dist2) = closest?;
        self.get(id).map(|aabb| (id, aabb, dist2))
    }
}
