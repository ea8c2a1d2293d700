use std::{cmp::Reverse, collections::BinaryHeap};

use geometry::{Aabb, ray::Ray};
use glam::Vec2;
use ordered_float::NotNan;

use crate::{
    BspTree,
    node::{ElementId, Node},
    utils::NodeOrd,
};

/// `t` range a subtree's boxes can occupy along the ray.
type Window = (NotNan<f32>, NotNan<f32>);

impl BspTree {
    /// Returns the first box hit by the ray and the distance (t) along it.
    ///
    /// A box containing the origin is hit at `t = 0`. Equal distances go to the
    /// lowest [`ElementId`].
    #[must_use]
    pub fn first_ray_collision(&self, ray: &Ray) -> Option<(ElementId, &Aabb, NotNan<f32>)> {
        let mut closest: Option<(ElementId, NotNan<f32>)> = None;

        let start: Window = (NotNan::new(0.0).ok()?, NotNan::new(f32::INFINITY).ok()?);
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(NodeOrd::new(self.root(), start)));

        while let Some(Reverse(current)) = heap.pop() {
            let (t_enter, t_exit) = current.by;

            // the heap yields windows by entry, nothing left can beat the hit
            if closest.is_some_and(|(_, t)| t_enter > t) {
                break;
            }

            match current.node {
                Node::Split(split, left, right) => {
                    let Some((low, high)) = ray.slab(split.axis(), split.min, split.max) else {
                        continue;
                    };

                    let enter = t_enter.into_inner().max(low);
                    let exit = t_exit.into_inner().min(high);

                    if enter > exit {
                        continue;
                    }

                    let (Ok(enter), Ok(exit)) = (NotNan::new(enter), NotNan::new(exit)) else {
                        continue;
                    };

                    heap.push(Reverse(NodeOrd::new(left, (enter, exit))));
                    heap.push(Reverse(NodeOrd::new(right, (enter, exit))));
                }
                Node::Leaf(ids) => {
                    for &id in ids {
                        let Some(t) = self.get(id).and_then(|aabb| aabb.intersect_ray(ray)) else {
                            continue;
                        };

                        let better = closest.is_none_or(|(best_id, best_t)| {
                            t.cmp(&best_t).then(id.cmp(&best_id)).is_lt()
                        });

                        if better {
                            closest = Some((id, t));
                        }
                    }
                }
            }
        }

        let (id, t) = closest?;
        self.get(id).map(|aabb| (id, aabb, t))
    }

    /// Every box the segment `from -> to` touches, endpoints included, in element order.
    #[must_use]
    pub fn query_segment(&self, from: Vec2, to: Vec2) -> Vec<Aabb> {
        self.resolve(self.query_segment_ids(from, to))
    }

    #[must_use]
    pub fn query_segment_ids(&self, from: Vec2, to: Vec2) -> Vec<ElementId> {
        let Ok(bounds) = Aabb::new(from.min(to), from.max(to)) else {
            return Vec::new();
        };

        let ray = Ray::from_points(from, to);

        let mut ids: Vec<ElementId> = self
            .candidates(&bounds)
            .filter(|(_, aabb)| {
                aabb.ray_interval(&ray)
                    .is_some_and(|(t_enter, t_exit)| t_enter <= 1.0 && t_exit >= 0.0)
            })
            .map(|(id, _)| id)
            .collect();

        ids.sort_unstable();
        ids
    }
}
