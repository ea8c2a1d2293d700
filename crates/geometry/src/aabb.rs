use std::fmt::{Debug, Display};

use glam::Vec2;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ray::Ray;

/// One of the two coordinate axes of the plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::X, Self::Y];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Returned when a box would break `mins <= maxs` or carries a non-finite coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
#[error("invalid aabb: mins {mins:?} and maxs {maxs:?} must be finite with mins <= maxs on every axis")]
pub struct InvalidGeometry {
    pub mins: [f32; 2],
    pub maxs: [f32; 2],
}

/// Hashable identity of an [`Aabb`], keyed on the exact bit patterns of its
/// corners. Boxes differing only in the sign of a zero stay distinct.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Ord, PartialOrd, Hash)]
pub struct OrderedAabb {
    bits: [u32; 4],
}

impl From<Aabb> for OrderedAabb {
    fn from(value: Aabb) -> Self {
        Self {
            bits: [
                value.mins.x.to_bits(),
                value.mins.y.to_bits(),
                value.maxs.x.to_bits(),
                value.maxs.y.to_bits(),
            ],
        }
    }
}

impl From<OrderedAabb> for Aabb {
    fn from(value: OrderedAabb) -> Self {
        let [min_x, min_y, max_x, max_y] = value.bits.map(f32::from_bits);
        Self {
            mins: Vec2::new(min_x, min_y),
            maxs: Vec2::new(max_x, max_y),
        }
    }
}

/// An axis-aligned box. Immutable; every constructor checks `mins <= maxs` and finiteness.
#[derive(Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAabb", into = "RawAabb")]
pub struct Aabb {
    mins: Vec2,
    maxs: Vec2,
}

#[derive(Serialize, Deserialize)]
struct RawAabb {
    mins: [f32; 2],
    maxs: [f32; 2],
}

impl TryFrom<RawAabb> for Aabb {
    type Error = InvalidGeometry;

    fn try_from(value: RawAabb) -> Result<Self, Self::Error> {
        Self::new(value.mins, value.maxs)
    }
}

impl From<Aabb> for RawAabb {
    fn from(value: Aabb) -> Self {
        Self {
            mins: value.mins.to_array(),
            maxs: value.maxs.to_array(),
        }
    }
}

impl Debug for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Aabb {{ mins: [{:?}, {:?}], maxs: [{:?}, {:?}] }}",
            self.mins.x, self.mins.y, self.maxs.x, self.maxs.y
        )
    }
}

impl Display for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // write [0.00, 0.00] -> [1.00, 1.00]
        write!(
            f,
            "[{:.2}, {:.2}] -> [{:.2}, {:.2}]",
            self.mins.x, self.mins.y, self.maxs.x, self.maxs.y
        )
    }
}

impl Aabb {
    pub fn new(mins: impl Into<Vec2>, maxs: impl Into<Vec2>) -> Result<Self, InvalidGeometry> {
        let mins = mins.into();
        let maxs = maxs.into();

        let valid = mins.is_finite() && maxs.is_finite() && mins.cmple(maxs).all();
        if !valid {
            return Err(InvalidGeometry {
                mins: mins.to_array(),
                maxs: maxs.to_array(),
            });
        }

        Ok(Self { mins, maxs })
    }

    /// A zero-sized box at `point`.
    pub fn from_point(point: Vec2) -> Result<Self, InvalidGeometry> {
        Self::new(point, point)
    }

    #[must_use]
    pub const fn mins(&self) -> Vec2 {
        self.mins
    }

    #[must_use]
    pub const fn maxs(&self) -> Vec2 {
        self.maxs
    }

    /// The closed interval this box covers along `axis`.
    #[must_use]
    pub fn interval(&self, axis: Axis) -> (f32, f32) {
        (self.mins[axis.index()], self.maxs[axis.index()])
    }

    /// Closed-interval overlap test; boxes that only touch collide.
    #[must_use]
    pub fn collides(&self, other: &Self) -> bool {
        self.mins.x <= other.maxs.x
            && self.maxs.x >= other.mins.x
            && self.mins.y <= other.maxs.y
            && self.maxs.y >= other.mins.y
    }

    /// Check if a point is inside the AABB, boundary included
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.mins).all() && point.cmple(self.maxs).all()
    }

    #[must_use]
    pub fn dist2(&self, point: Vec2) -> f64 {
        let point = point.as_dvec2();
        // Clamp the point into the box.
        let clamped = point.clamp(self.mins.as_dvec2(), self.maxs.as_dvec2());

        (point - clamped).length_squared()
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            mins: self.mins.min(other.mins),
            maxs: self.maxs.max(other.maxs),
        }
    }

    /// The smallest box enclosing every input, or `None` when there are none.
    #[must_use]
    pub fn containing<'a>(input: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        input.into_iter().copied().reduce(|acc, elem| acc.union(&elem))
    }

    #[must_use]
    pub fn lens(&self) -> Vec2 {
        self.maxs - self.mins
    }

    #[must_use]
    pub fn mid(&self) -> Vec2 {
        self.mins * 0.5 + self.maxs * 0.5
    }

    #[must_use]
    pub fn area(&self) -> f32 {
        let lens = self.lens();
        lens.x * lens.y
    }

    /// Parameter range `[t_enter, t_exit]` over which the infinite line of `ray` is inside the box.
    #[must_use]
    pub fn ray_interval(&self, ray: &Ray) -> Option<(f32, f32)> {
        let (mut t_min, mut t_max) = (f32::NEG_INFINITY, f32::INFINITY);

        for axis in Axis::ALL {
            let (lo, hi) = self.interval(axis);
            let (t_low, t_high) = ray.slab(axis, lo, hi)?;
            t_min = t_min.max(t_low);
            t_max = t_max.min(t_high);
            if t_min > t_max {
                return None;
            }
        }

        Some((t_min, t_max))
    }

    /// Distance along the ray to the first point inside the box; `0` when the origin is inside.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<NotNan<f32>> {
        let (t_enter, t_exit) = self.ray_interval(ray)?;

        // the box is entirely behind the origin
        if t_exit < 0.0 {
            return None;
        }

        NotNan::new(t_enter.max(0.0)).ok()
    }
}
