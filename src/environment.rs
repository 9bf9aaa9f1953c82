//! Collaborators the physics layer reads from but does not own.
//!
//! Each one is injected by the host: the world never looks them up globally.

use alloc::vec::Vec as AllocVec;

use crate::float::Float;
use crate::mover::MoverId;

/// Source of horizontal wind, sampled read-only at integration time.
///
/// Points above [`reference_height`](WindSource::reference_height) are pushed
/// horizontally by [`wind_speed`](WindSource::wind_speed) per second.
pub trait WindSource<F: Float> {
    fn wind_speed(&self) -> F;
    fn reference_height(&self) -> F;
}

/// Wind that never changes. Hosts animating their wind implement [`WindSource`] themselves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantWind<F: Float> {
    pub speed: F,
    pub reference_height: F,
}

impl<F: Float> ConstantWind<F> {
    pub fn new(speed: F, reference_height: F) -> Self {
        ConstantWind { speed, reference_height }
    }
}

impl<F: Float> WindSource<F> for ConstantWind<F> {
    fn wind_speed(&self) -> F { self.speed }
    fn reference_height(&self) -> F { self.reference_height }
}

/// Horizontal wind acceleration felt at height `y`. Zero without a source.
pub fn wind_at<F: Float>(wind: Option<&dyn WindSource<F>>, y: F) -> F {
    match wind {
        Some(w) if y > w.reference_height() => w.wind_speed(),
        _ => F::zero(),
    }
}

/// Supplies initial terrain heights. Consulted only while a terrain is generated.
pub trait HeightSampler<F: Float> {
    /// Raw height offset for vertex `index` of a terrain with `divisions` divisions.
    fn height(&mut self, index: usize, divisions: usize) -> F;
}

impl<F: Float, T: FnMut(usize, usize) -> F> HeightSampler<F> for T {
    fn height(&mut self, index: usize, divisions: usize) -> F {
        self(index, divisions)
    }
}

/// Provides the movers currently tagged as collidable.
///
/// Bodies re-pull this whenever the roster changes and rebuild their
/// collision memory from it.
pub trait RosterProvider {
    fn collidable(&self) -> AllocVec<MoverId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wind_without_source() {
        assert_eq!(wind_at::<f32>(None, 1000.0), 0.0);
    }

    #[test]
    fn wind_only_above_reference_height() {
        let wind = ConstantWind::new(2.0f32, 10.0);
        let source: &dyn WindSource<f32> = &wind;
        assert_eq!(wind_at(Some(source), 5.0), 0.0);
        assert_eq!(wind_at(Some(source), 10.0), 0.0);
        assert_eq!(wind_at(Some(source), 10.5), 2.0);
    }

    #[test]
    fn closures_sample_heights() {
        let mut sampler = |i: usize, _n: usize| i as f32 * 0.5;
        assert_eq!(HeightSampler::height(&mut sampler, 4, 8), 2.0);
    }
}
