use geometry::{Aabb, Axis};
use tracing::{debug, trace};

use crate::{
    BspTree, BuildReport,
    config::BuildConfig,
    error::BuildError,
    node::{ElementId, Node, Split, SplitType},
    utils,
};

/// Below this many boxes a subtree is built on the current thread.
const PARALLEL_THRESHOLD: usize = 1024;

#[derive(Copy, Clone, Debug, Default)]
struct Tally {
    depth_cutoffs: usize,
    inseparable_leaves: usize,
}

impl Tally {
    const fn merge(self, other: Self) -> Self {
        Self {
            depth_cutoffs: self.depth_cutoffs + other.depth_cutoffs,
            inseparable_leaves: self.inseparable_leaves + other.inseparable_leaves,
        }
    }
}

impl BspTree {
    /// Partitions `elements` into a tree. [`ElementId`]s follow the input order.
    ///
    /// The result depends only on the input order and `config`, never on the
    /// number of threads used.
    #[tracing::instrument(skip_all, fields(elements_len = elements.len()))]
    pub fn build(elements: Vec<Aabb>, config: &BuildConfig) -> Result<Self, BuildError> {
        config.validate()?;

        let len = elements.len();
        let count = u32::try_from(len).map_err(|_| BuildError::TooManyElements { len })?;
        let ids: Vec<ElementId> = (0..count).map(ElementId).collect();

        let builder = Builder {
            elements: &elements,
            config: *config,
        };

        let (root, tally) = builder.build_in(ids, 0, utils::thread_count_pow2());

        let report = BuildReport {
            config: *config,
            depth_cutoffs: tally.depth_cutoffs,
            inseparable_leaves: tally.inseparable_leaves,
        };

        debug!(
            depth_cutoffs = report.depth_cutoffs,
            inseparable_leaves = report.inseparable_leaves,
            "built bsp tree"
        );

        Ok(Self::from_parts(root, elements, Some(report)))
    }

    pub fn build_with(
        elements: Vec<Aabb>,
        leaf_capacity: usize,
        max_depth: usize,
    ) -> Result<Self, BuildError> {
        Self::build(elements, &BuildConfig::new(leaf_capacity, max_depth))
    }

    /// Like [`BspTree::build`], validating raw `(mins, maxs)` corners first.
    pub fn build_with_bounds(
        bounds: impl IntoIterator<Item = ([f32; 2], [f32; 2])>,
        config: &BuildConfig,
    ) -> Result<Self, BuildError> {
        let elements = bounds
            .into_iter()
            .map(|(mins, maxs)| Aabb::new(mins, maxs))
            .collect::<Result<Vec<_>, _>>()?;

        Self::build(elements, config)
    }
}

struct Builder<'a> {
    elements: &'a [Aabb],
    config: BuildConfig,
}

impl Builder<'_> {
    fn aabb(&self, id: ElementId) -> &Aabb {
        &self.elements[id.index()]
    }

    fn build_in(&self, ids: Vec<ElementId>, depth: usize, max_threads: usize) -> (Node, Tally) {
        if ids.len() <= self.config.leaf_capacity {
            return (Node::Leaf(ids), Tally::default());
        }

        if depth >= self.config.max_depth {
            trace!(depth, len = ids.len(), "depth cutoff");
            let tally = Tally {
                depth_cutoffs: 1,
                ..Tally::default()
            };
            return (Node::Leaf(ids), tally);
        }

        let Some((split, left_ids, right_ids)) = self.partition(&ids) else {
            trace!(depth, len = ids.len(), "inseparable leaf");
            let tally = Tally {
                inseparable_leaves: 1,
                ..Tally::default()
            };
            return (Node::Leaf(ids), tally);
        };

        drop(ids);

        debug_assert!(max_threads != 0);

        let ((left, left_tally), (right, right_tally)) =
            if max_threads > 1 && left_ids.len() + right_ids.len() >= PARALLEL_THRESHOLD {
                let max_threads = max_threads >> 1;
                rayon::join(
                    || self.build_in(left_ids, depth + 1, max_threads),
                    || self.build_in(right_ids, depth + 1, max_threads),
                )
            } else {
                (
                    self.build_in(left_ids, depth + 1, max_threads),
                    self.build_in(right_ids, depth + 1, max_threads),
                )
            };

        let node = Node::Split(split, Box::new(left), Box::new(right));
        (node, left_tally.merge(right_tally))
    }

    /// Tries the axis along which the boxes spread the most, then the other one.
    fn partition(&self, ids: &[ElementId]) -> Option<(Split, Vec<ElementId>, Vec<ElementId>)> {
        let bounds = Aabb::containing(ids.iter().map(|&id| self.aabb(id)))?;

        let lens = bounds.lens();
        let primary = if lens.y > lens.x { Axis::Y } else { Axis::X };

        [primary, primary.other()]
            .into_iter()
            .find_map(|axis| self.split_along(ids, &bounds, axis))
    }

    /// Splits at the midpoint of `bounds` along `axis`, duplicating boxes that
    /// reach the line. Fails if either side would keep every box.
    fn split_along(
        &self,
        ids: &[ElementId],
        bounds: &Aabb,
        axis: Axis,
    ) -> Option<(Split, Vec<ElementId>, Vec<ElementId>)> {
        let (min, max) = bounds.interval(axis);
        let split = Split {
            split_type: SplitType::from_axis(axis),
            min,
            max,
        };

        let at = split.coordinate();

        let mut left = Vec::new();
        let mut right = Vec::new();

        for &id in ids {
            let (lo, hi) = self.aabb(id).interval(axis);
            if lo <= at {
                left.push(id);
            }
            if hi >= at {
                right.push(id);
            }
        }

        let separated = left.len() < ids.len() && right.len() < ids.len();
        separated.then_some((split, left, right))
    }
}
