//! Distance constraints between two points of a shape, relaxed iteratively.

use crate::float::Float;
use crate::point::{Point, PointId};

/// A rest-length relation between two points.
///
/// The rest length is measured once, when the stick is created. Sticks marked
/// `constraint_only` hold a shape together but are never drawn and never
/// collide.
#[derive(Clone, Debug, PartialEq)]
pub struct Stick<F: Float> {
    pub a: PointId,
    pub b: PointId,
    pub rest_length: F,
    pub constraint_only: bool,
}

impl<F: Float> Stick<F> {
    pub fn new(a: PointId, b: PointId, rest_length: F) -> Self {
        Stick { a, b, rest_length, constraint_only: false }
    }

    /// Measure the rest length from the points' current positions.
    pub fn from_points(a: PointId, b: PointId, points: &[Point<F>], constraint_only: bool) -> Self {
        let rest_length = points[a.index()].pos.distance(points[b.index()].pos);
        Stick { a, b, rest_length, constraint_only }
    }

    /// Whether this stick joins `x` and `y`, in either order.
    pub fn joins(&self, x: PointId, y: PointId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Sorted endpoint pair, the stick's identity inside a shape.
    pub fn key(&self) -> (PointId, PointId) {
        if self.a <= self.b { (self.a, self.b) } else { (self.b, self.a) }
    }

    pub fn current_length(&self, points: &[Point<F>]) -> F {
        points[self.a.index()].pos.distance(points[self.b.index()].pos)
    }

    /// Pull both endpoints toward the rest length, `restoration` of the way.
    ///
    /// Each end moves half the correction in opposite directions. A stick
    /// whose endpoints coincide is skipped.
    pub fn relax(&self, points: &mut [Point<F>], restoration: F) {
        let a_pos = points[self.a.index()].pos;
        let b_pos = points[self.b.index()].pos;

        let delta = b_pos - a_pos;
        let current = delta.length();
        if current.is_near_zero(F::from_f32(1e-10)) {
            tracing::trace!(a = self.a.index(), b = self.b.index(), "skipping collapsed stick");
            return;
        }

        let distortion = (self.rest_length - current) / current * F::half();
        let offset = delta.scale(distortion * restoration);

        points[self.a.index()].pos = a_pos - offset;
        points[self.b.index()].pos = b_pos + offset;
    }
}

/// One relaxation pass over every stick, in order.
pub fn relax_all<F: Float>(sticks: &[Stick<F>], points: &mut [Point<F>], restoration: F) {
    for stick in sticks.iter() {
        stick.relax(points, restoration);
    }
}
