#![allow(clippy::redundant_pub_crate)]

//! A binary space-partitioning tree over 2D axis-aligned bounding boxes.
//!
//! The tree is built once from a fixed set of boxes (typically static level
//! geometry) and is read-only afterwards. Internal nodes split their region
//! with a vertical or horizontal line; boxes straddling the line are stored on
//! both sides, so a query never has to look outside the branches it selects.

use geometry::Aabb;

mod build;
pub mod config;
mod dump;
mod error;
mod node;
pub mod parse;
pub mod query;
mod shared;
mod stats;
mod utils;

#[cfg(feature = "plot")]
pub mod plot;

pub use config::{BuildConfig, ConfigError};
pub use dump::Dump;
pub use error::BuildError;
pub use node::{ElementId, Leaves, Node, Split, SplitType};
pub use parse::{ParseError, ParseErrorKind, parse_tree};
pub use shared::SharedIndex;
pub use stats::TreeStats;
pub use utils::{random_aabb, random_elements};

/// Deepest level a tree may reach, root at depth 0.
///
/// Traversals keep one pending sibling per level on a fixed-size stack, so
/// both the builder and the parser refuse anything deeper.
pub const MAX_TREE_DEPTH: usize = 62;

/// What happened while building a tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuildReport {
    pub config: BuildConfig,
    /// Leaves forced at `max_depth` while still holding more than `leaf_capacity` boxes.
    pub depth_cutoffs: usize,
    /// Leaves over capacity because no axis separated their boxes.
    pub inseparable_leaves: usize,
}

impl BuildReport {
    #[must_use]
    pub const fn oversized_leaves(&self) -> usize {
        self.depth_cutoffs + self.inseparable_leaves
    }

    /// `true` when every leaf holds at most `config.leaf_capacity` boxes.
    #[must_use]
    pub const fn capacity_guaranteed(&self) -> bool {
        self.oversized_leaves() == 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BspTree {
    root: Node,
    elements: Vec<Aabb>,
    report: Option<BuildReport>,
}

impl Default for BspTree {
    fn default() -> Self {
        Self {
            root: Node::EMPTY_LEAF,
            elements: Vec::new(),
            report: None,
        }
    }
}

impl BspTree {
    pub(crate) const fn from_parts(
        root: Node,
        elements: Vec<Aabb>,
        report: Option<BuildReport>,
    ) -> Self {
        Self {
            root,
            elements,
            report,
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Every distinct box in the tree, indexed by [`ElementId`].
    #[must_use]
    pub fn elements(&self) -> &[Aabb] {
        &self.elements
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Aabb> {
        self.elements.get(id.index())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Present for built trees, `None` for parsed ones.
    #[must_use]
    pub const fn report(&self) -> Option<&BuildReport> {
        self.report.as_ref()
    }

    /// Leaves in depth-first order, left before right.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.root)
    }

    pub(crate) fn resolve(&self, ids: Vec<ElementId>) -> Vec<Aabb> {
        ids.into_iter()
            .filter_map(|id| self.get(id).copied())
            .collect()
    }
}
