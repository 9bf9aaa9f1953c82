//! World planes (floor and walls) that points are clamped against.

use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::point::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Floor and wall planes. Absent planes are not enforced.
///
/// A clamped point keeps `restitution` of its pre-clamp displacement, mirrored
/// about the plane, so it bounces instead of sticking.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Boundary<F: Float> {
    pub floor: Option<F>,
    pub left_wall: Option<F>,
    pub right_wall: Option<F>,
    pub restitution: F,
}

impl<F: Float> Boundary<F> {
    /// No planes yet.
    pub fn new(restitution: F) -> Self {
        Boundary { floor: None, left_wall: None, right_wall: None, restitution }
    }

    pub fn with_floor(mut self, floor: F) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_walls(mut self, left: F, right: F) -> Self {
        self.left_wall = Some(left);
        self.right_wall = Some(right);
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.restitution >= F::zero() && self.restitution <= F::one()) {
            return Err(PhysicsError::InvalidConfig("boundary restitution must be in [0, 1]"));
        }
        if let (Some(left), Some(right)) = (self.left_wall, self.right_wall) {
            if left > right {
                return Err(PhysicsError::InvalidConfig("left wall is right of the right wall"));
            }
        }
        Ok(())
    }

    /// Clamp one point. Returns true if any plane was breached.
    pub fn constrain(&self, p: &mut Point<F>) -> bool {
        let delta = p.velocity_raw();
        let mut clamped = false;

        if let Some(floor) = self.floor {
            if p.pos.y < floor {
                p.pos.y = floor;
                p.prev_pos.y = floor + delta.y * self.restitution;
                clamped = true;
            }
        }

        if let Some(left) = self.left_wall.filter(|&left| p.pos.x < left) {
            p.pos.x = left;
            p.prev_pos.x = left + delta.x * self.restitution;
            clamped = true;
        } else if let Some(right) = self.right_wall.filter(|&right| p.pos.x > right) {
            p.pos.x = right;
            p.prev_pos.x = right + delta.x * self.restitution;
            clamped = true;
        }

        clamped
    }

    pub fn constrain_all(&self, points: &mut [Point<F>]) {
        for p in points.iter_mut() {
            self.constrain(p);
        }
    }
}
