//! Planar predicates shared by the collision detector.

use crate::float::Float;
use crate::vec::Vec2;

/// Twice the signed area of the triangle (e1, e2, p).
///
/// Positive when `p` lies to the left of the directed line e1 -> e2, negative
/// to the right, zero on the line. A sign change between two ticks means `p`
/// crossed the line.
pub fn signed_area<F: Float>(e1: Vec2<F>, e2: Vec2<F>, p: Vec2<F>) -> F {
    (e2.x - e1.x) * (p.y - e2.y) - (p.x - e2.x) * (e2.y - e1.y)
}

/// Unit normal of the edge e1 -> e2, flipped to face `p`'s side.
///
/// Points on the line get the left-hand normal. A zero-length edge has no
/// normal and yields the zero vector.
pub fn facing_normal<F: Float>(e1: Vec2<F>, e2: Vec2<F>, p: Vec2<F>) -> Vec2<F> {
    let normal = (e2 - e1).perp().normalize();
    if signed_area(e1, e2, p) >= F::zero() {
        normal
    } else {
        -normal
    }
}

/// Where the line through `anchor` along `direction` meets the line through e1 and e2.
///
/// Both lines are solved in slope-intercept form. Directions whose x extent is
/// within `tolerance` of zero are treated as vertical. Returns `None` when the
/// lines are parallel, including both being vertical.
pub fn line_intersection<F: Float>(
    anchor: Vec2<F>,
    direction: Vec2<F>,
    e1: Vec2<F>,
    e2: Vec2<F>,
    tolerance: F,
) -> Option<Vec2<F>> {
    let edge = e2 - e1;
    let vertical_motion = direction.x.abs() <= tolerance;
    let vertical_edge = edge.x.abs() <= tolerance;

    match (vertical_motion, vertical_edge) {
        (true, true) => None,
        (true, false) => {
            let edge_slope = edge.y / edge.x;
            let edge_offset = e1.y - edge_slope * e1.x;
            let x = anchor.x;
            Some(Vec2::new(x, edge_slope * x + edge_offset))
        }
        (false, true) => {
            let motion_slope = direction.y / direction.x;
            let motion_offset = anchor.y - motion_slope * anchor.x;
            let x = e1.x;
            Some(Vec2::new(x, motion_slope * x + motion_offset))
        }
        (false, false) => {
            let motion_slope = direction.y / direction.x;
            let motion_offset = anchor.y - motion_slope * anchor.x;
            let edge_slope = edge.y / edge.x;
            let edge_offset = e1.y - edge_slope * e1.x;

            let denom = motion_slope - edge_slope;
            if denom.abs() <= tolerance {
                return None;
            }
            let x = (edge_offset - motion_offset) / denom;
            Some(Vec2::new(x, edge_slope * x + edge_offset))
        }
    }
}

/// Position of `p` projected onto the edge e1 -> e2: 0 at e1, 1 at e2.
///
/// Values outside [0, 1] lie beyond an endpoint. A zero-length edge yields 0.
pub fn segment_param<F: Float>(e1: Vec2<F>, e2: Vec2<F>, p: Vec2<F>) -> F {
    let edge = e2 - e1;
    let len_sq = edge.length_sq();
    if len_sq.is_near_zero(F::from_f32(1e-20)) {
        return F::zero();
    }
    (p - e1).dot(edge) / len_sq
}

/// Shortest distance from `p` to the segment a -> b.
pub fn distance_to_segment<F: Float>(a: Vec2<F>, b: Vec2<F>, p: Vec2<F>) -> F {
    let t = segment_param(a, b, p).clamp(F::zero(), F::one());
    p.distance(a + (b - a).scale(t))
}

/// Axis-aligned bounding box, inclusive on every side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
}

impl<F: Float> Aabb<F> {
    /// Box spanning two corners given in any order.
    pub fn spanning(a: Vec2<F>, b: Vec2<F>) -> Self {
        Aabb { min: a.min(b), max: a.max(b) }
    }

    /// Box around a circle.
    pub fn around(center: Vec2<F>, radius: F) -> Self {
        let r = Vec2::new(radius, radius);
        Aabb { min: center - r, max: center + r }
    }

    /// Grow to include `p`.
    pub fn including(self, p: Vec2<F>) -> Self {
        Aabb { min: self.min.min(p), max: self.max.max(p) }
    }

    pub fn overlaps(&self, other: &Aabb<F>) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}
