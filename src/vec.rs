//! Planar vectors for positions, displacements and edge normals.

use core::ops::{Add, Neg, Sub};

use crate::float::Float;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    pub fn new(x: F, y: F) -> Self {
        Vec2 { x, y }
    }

    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    pub fn dot(self, rhs: Self) -> F {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Left-hand normal: `(x, y)` turned a quarter turn to `(-y, x)`.
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }

    pub fn scale(self, factor: F) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Per-axis product, used for anisotropic restitution.
    pub fn component_mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }

    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            return Self::zero();
        }
        self.scale(F::one() / len)
    }

    pub fn distance(self, to: Self) -> F {
        (to - self).length()
    }

    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}
