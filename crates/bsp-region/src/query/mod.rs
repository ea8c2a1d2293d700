//! Read-only traversals. Every query takes `&self`, so a built tree can be
//! shared between threads without locking.

mod closest;
mod range;
mod ray;

pub use range::CandidateIter;

/// Room for one pending sibling per level plus the node being expanded.
const STACK_CAPACITY: usize = crate::MAX_TREE_DEPTH + 2;
