//! Verlet integration with damping, gravity, sky wind and plate-glide drift.

use crate::config::IntegrationConfig;
use crate::environment::{wind_at, WindSource};
use crate::float::Float;
use crate::point::Point;
use crate::vec::Vec2;

/// Per-tick external influences on a body, sampled once before integrating its points.
pub struct Forcing<'a, F: Float> {
    /// Wind collaborator. `None` means still air.
    pub wind: Option<&'a dyn WindSource<F>>,
    /// Horizontal offset added to every point without becoming velocity.
    pub drift: F,
    /// One-shot vertical velocity added this tick (jumps).
    pub impulse: F,
}

impl<'a, F: Float> Forcing<'a, F> {
    /// Gravity only.
    pub fn still() -> Self {
        Forcing { wind: None, drift: F::zero(), impulse: F::zero() }
    }

    pub fn with_wind(wind: Option<&'a dyn WindSource<F>>) -> Self {
        Forcing { wind, drift: F::zero(), impulse: F::zero() }
    }
}

/// Advances points using `pos - prev_pos` as their velocity.
#[derive(Clone, Debug)]
pub struct Integrator<F: Float> {
    config: IntegrationConfig<F>,
}

impl<F: Float> Integrator<F> {
    pub fn new(config: IntegrationConfig<F>) -> Self {
        Integrator { config }
    }

    pub fn config(&self) -> &IntegrationConfig<F> {
        &self.config
    }

    pub fn integrate(&self, point: &mut Point<F>, dt: F, forcing: &Forcing<'_, F>) {
        let mut velocity = point.velocity_raw().scale(self.config.damping);

        let wind = wind_at(forcing.wind, point.pos.y);
        let accel = self.config.gravity + Vec2::new(wind, F::zero());
        velocity = velocity + accel.scale(dt);
        velocity.y = velocity.y + forcing.impulse;

        // Free falls faster than this tear chains apart during relaxation.
        if let Some(min_fall) = self.config.min_fall_speed {
            velocity.y = velocity.y.max(min_fall);
        }

        let drift = Vec2::new(forcing.drift, F::zero());
        point.prev_pos = point.pos + drift;
        point.pos = point.pos + velocity + drift;
    }

    pub fn integrate_all(&self, points: &mut [Point<F>], dt: F, forcing: &Forcing<'_, F>) {
        for p in points.iter_mut() {
            self.integrate(p, dt, forcing);
        }
    }
}
