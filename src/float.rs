//! Scalar abstraction so every body runs in either `f32` or `f64`.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// The arithmetic and `libm` functions the physics layer needs from a scalar.
pub trait Float:
    Copy
    + PartialEq
    + PartialOrd
    + Default
    + Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn zero() -> Self;
    fn one() -> Self;
    fn half() -> Self;
    fn two() -> Self;
    fn from_f32(v: f32) -> Self;
    fn from_usize(v: usize) -> Self;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;
    /// False for NaN and the infinities.
    fn is_finite(self) -> bool;

    /// `lo` if below it, `hi` if above it. `lo` wins when the bounds cross.
    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.min(hi).max(lo)
    }

    /// `|self| < epsilon`.
    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }
}

macro_rules! impl_float {
    ($t:ty, $sqrt:path, $sin:path, $cos:path, $abs:path) => {
        impl Float for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn half() -> Self { 0.5 }
            fn two() -> Self { 2.0 }
            fn from_f32(v: f32) -> Self { v as $t }
            fn from_usize(v: usize) -> Self { v as $t }

            fn sqrt(self) -> Self { $sqrt(self) }
            fn sin(self) -> Self { $sin(self) }
            fn cos(self) -> Self { $cos(self) }
            fn abs(self) -> Self { $abs(self) }
            fn min(self, other: Self) -> Self { if other < self { other } else { self } }
            fn max(self, other: Self) -> Self { if other > self { other } else { self } }
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
        }
    };
}

impl_float!(f32, libm::sqrtf, libm::sinf, libm::cosf, libm::fabsf);
impl_float!(f64, libm::sqrt, libm::sin, libm::cos, libm::fabs);
