//! Verlet points: a position plus the position it had one tick ago.

use core::fmt;

use crate::float::Float;
use crate::vec::Vec2;

/// Stable index of a point inside its owning [`Shape`](crate::shape::Shape).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub usize);

impl PointId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A verlet point. Velocity is implicit: `pos - prev_pos`.
#[derive(Clone, Debug, PartialEq)]
pub struct Point<F: Float> {
    pub pos: Vec2<F>,
    pub prev_pos: Vec2<F>,
}

impl<F: Float> Point<F> {
    /// A point at rest.
    pub fn new(pos: Vec2<F>) -> Self {
        Point { pos, prev_pos: pos }
    }

    /// A point already moving by `velocity` per tick.
    pub fn with_velocity(pos: Vec2<F>, velocity: Vec2<F>) -> Self {
        Point { pos, prev_pos: pos - velocity }
    }

    /// Per-tick displacement.
    pub fn velocity_raw(&self) -> Vec2<F> {
        self.pos - self.prev_pos
    }

    /// Move both current and previous position, leaving velocity untouched.
    pub fn translate(&mut self, offset: Vec2<F>) {
        self.pos = self.pos + offset;
        self.prev_pos = self.prev_pos + offset;
    }

    /// Change velocity by pushing the previous position (Verlet velocity = pos - prev_pos).
    pub fn push_prev(&mut self, offset: Vec2<F>) {
        self.prev_pos = self.prev_pos + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_point_is_at_rest() {
        let p = Point::new(Vec2::new(1.0f32, 2.0));
        assert_eq!(p.velocity_raw(), Vec2::zero());
    }

    #[test]
    fn translate_keeps_velocity() {
        let mut p = Point::with_velocity(Vec2::new(0.0f32, 0.0), Vec2::new(1.0, -1.0));
        p.translate(Vec2::new(5.0, 5.0));
        assert_eq!(p.pos, Vec2::new(5.0, 5.0));
        assert_eq!(p.velocity_raw(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn push_prev_changes_velocity() {
        let mut p = Point::new(Vec2::new(0.0f32, 0.0));
        p.push_prev(Vec2::new(0.0, 1.0));
        assert_eq!(p.velocity_raw(), Vec2::new(0.0, -1.0));
    }
}
