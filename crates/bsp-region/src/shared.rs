use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::RwLock;
use tracing::debug;

use crate::BspTree;

/// A tree that can be swapped for a rebuilt one while other threads query it.
///
/// Readers clone the current [`Arc`] and query it without holding the lock, so
/// they always see one complete tree, old or new.
#[derive(Debug, Default)]
pub struct SharedIndex {
    current: RwLock<Arc<BspTree>>,
    version: AtomicU64,
}

impl SharedIndex {
    #[must_use]
    pub fn new(tree: BspTree) -> Self {
        Self {
            current: RwLock::new(Arc::new(tree)),
            version: AtomicU64::new(0),
        }
    }

    /// The tree as of now. Later replacements do not affect it.
    #[must_use]
    pub fn load(&self) -> Arc<BspTree> {
        self.current.read().clone()
    }

    /// The tree together with the version it was published under.
    #[must_use]
    pub fn snapshot(&self) -> (Arc<BspTree>, u64) {
        let current = self.current.read();
        (current.clone(), self.version.load(Ordering::Acquire))
    }

    /// Publishes `tree` and returns the one it replaced.
    pub fn replace(&self, tree: BspTree) -> Arc<BspTree> {
        let tree = Arc::new(tree);

        let mut current = self.current.write();
        let old = std::mem::replace(&mut *current, tree);
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        drop(current);

        debug!(version, "replaced shared bsp tree");
        old
    }

    /// Number of replacements so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl From<BspTree> for SharedIndex {
    fn from(tree: BspTree) -> Self {
        Self::new(tree)
    }
}
