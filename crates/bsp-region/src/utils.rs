use std::cmp::Ordering;

use derive_more::Constructor;
use geometry::Aabb;
use glam::Vec2;

use crate::node::Node;

/// get number of threads that is pow of 2
pub fn thread_count_pow2() -> usize {
    let max_threads_tentative = rayon::current_num_threads();

    // does not make sense to not have a power of two
    let mut max_threads = max_threads_tentative.next_power_of_two();

    if max_threads != max_threads_tentative {
        max_threads >>= 1;
    }

    max_threads
}

/// Heap entry for best-first traversals, ordered by `by` only.
#[derive(Constructor)]
pub struct NodeOrd<'a, K> {
    pub node: &'a Node,
    pub by: K,
}

impl<K: Ord> PartialEq<Self> for NodeOrd<'_, K> {
    fn eq(&self, other: &Self) -> bool {
        self.by == other.by
    }
}

impl<K: Ord> PartialOrd for NodeOrd<'_, K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Eq for NodeOrd<'_, K> {}

impl<K: Ord> Ord for NodeOrd<'_, K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.by.cmp(&other.by)
    }
}

/// A box of random size up to 4x4 with its lower corner in `[0, width)²`.
///
/// `width` must be finite.
#[must_use]
pub fn random_aabb(width: f32) -> Aabb {
    let mins = Vec2::new(fastrand::f32() * width, fastrand::f32() * width);
    let size = Vec2::new(fastrand::f32() * 4.0, fastrand::f32() * 4.0);

    Aabb::new(mins, mins + size).expect("random corners are finite and ordered")
}

#[must_use]
pub fn random_elements(count: usize, width: f32) -> Vec<Aabb> {
    (0..count).map(|_| random_aabb(width)).collect()
}
