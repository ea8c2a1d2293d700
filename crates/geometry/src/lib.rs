//! 2D geometry primitives shared by the spatial index and its tooling.

pub mod aabb;
pub mod ray;

pub use aabb::{Aabb, Axis, InvalidGeometry, OrderedAabb};
pub use ray::Ray;
