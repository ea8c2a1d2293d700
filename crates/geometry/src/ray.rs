use glam::Vec2;

use crate::aabb::Axis;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    origin: Vec2,
    direction: Vec2,
    inv_direction: Vec2,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        let inv_direction = Vec2::new(1.0 / direction.x, 1.0 / direction.y);

        Self {
            origin,
            direction,
            inv_direction,
        }
    }

    /// A ray from `origin` through `end`; `t = 1` lands on `end`.
    #[must_use]
    pub fn from_points(origin: Vec2, end: Vec2) -> Self {
        let direction = end - origin;
        Self::new(origin, direction)
    }

    /// Get the point along the ray at distance t
    #[must_use]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// The `t` range over which the ray's line lies inside the slab `lo <= p[axis] <= hi`.
    ///
    /// A ray parallel to the slab is either inside for every `t` or never.
    #[must_use]
    pub fn slab(&self, axis: Axis, lo: f32, hi: f32) -> Option<(f32, f32)> {
        let idx = axis.index();
        let origin = self.origin[idx];

        if self.direction[idx] == 0.0 {
            if origin < lo || origin > hi {
                return None;
            }
            return Some((f32::NEG_INFINITY, f32::INFINITY));
        }

        let inv = self.inv_direction[idx];
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;

        Some((t1.min(t2), t1.max(t2)))
    }
}
