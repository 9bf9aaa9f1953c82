//! Step observer trait for monitoring a world tick.

use crate::collision::HitEvent;
use crate::float::Float;
use crate::mover::{Expiry, MoverId};

/// Hooks called while a tick runs, for debugging, drawing or profiling.
/// All methods default to no-ops.
pub trait StepObserver<F: Float> {
    /// Called after a body's points (or the movers) have been integrated.
    fn on_integrate(&mut self) {}

    /// Called after each relaxation + boundary pass of a rig.
    fn on_relaxation_pass(&mut self, _pass: usize) {}

    /// Called for every collision response.
    fn on_collision(&mut self, _hit: &HitEvent<F>) {}

    /// Called when a mover leaves the world.
    fn on_mover_destroyed(&mut self, _id: MoverId, _reason: Expiry) {}

    /// Called when the tick is fully complete.
    fn on_step_complete(&mut self) {}
}

/// Observer that ignores everything.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
