//! Chain rigs: soft stick figures that walk, jump, sway in the wind and
//! recoil when struck by projectiles.

use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;

use crate::collision::{collide_shape, Detector, HitEvent, ResponsePolicy};
use crate::config::RigConfig;
use crate::environment::{RosterProvider, WindSource};
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::integrator::{Forcing, Integrator};
use crate::mover::{MoverId, MoverKind, Movers};
use crate::observer::StepObserver;
use crate::point::{Point, PointId};
use crate::shape::Shape;
use crate::stick::relax_all;
use crate::tracker::CollisionTracker;
use crate::vec::Vec2;

/// A dynamic shape driven by verlet integration and stick relaxation.
///
/// Only sphere movers collide with a rig. Every hit pushes the struck stick
/// away from the projectile and, by default, consumes the projectile.
#[derive(Clone, Debug)]
pub struct ChainRig<F: Float> {
    shape: Shape<F>,
    integrator: Integrator<F>,
    tracker: CollisionTracker,
    config: RigConfig<F>,
    walk_direction: F,
    pending_jump: F,
    since_jump: F,
}

impl<F: Float> ChainRig<F> {
    pub fn new(shape: Shape<F>, config: RigConfig<F>) -> PhysicsResult<Self> {
        config.validate()?;
        if shape.is_empty() {
            return Err(PhysicsError::InvalidConfig("rig needs at least one point"));
        }
        let since_jump = config.jump_cooldown;
        Ok(ChainRig {
            shape,
            integrator: Integrator::new(config.integration.clone()),
            tracker: CollisionTracker::new(),
            config,
            walk_direction: F::one(),
            pending_jump: F::zero(),
            since_jump,
        })
    }

    /// Build a rig from point positions and `(a, b, constraint_only)` stick triples.
    pub fn from_layout(
        positions: &[Vec2<F>],
        sticks: &[(usize, usize, bool)],
        config: RigConfig<F>,
    ) -> PhysicsResult<Self> {
        let mut shape = Shape::from_positions(positions.iter().copied());
        for &(a, b, constraint_only) in sticks {
            shape.connect(PointId(a), PointId(b), constraint_only)?;
        }
        Self::new(shape, config)
    }

    pub fn config(&self) -> &RigConfig<F> {
        &self.config
    }

    pub fn shape(&self) -> &Shape<F> {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape<F> {
        &mut self.shape
    }

    pub fn tracker(&self) -> &CollisionTracker {
        &self.tracker
    }

    /// The last point of the rig; hosts hang the eye sprite on it.
    pub fn anchor(&self) -> &Point<F> {
        let last = self.shape.len() - 1;
        self.shape.point(PointId(last))
    }

    pub fn centroid(&self) -> Vec2<F> {
        self.shape.centroid()
    }

    /// +1 when walking right, -1 when walking left.
    pub fn walk_direction(&self) -> F {
        self.walk_direction
    }

    pub fn can_jump(&self) -> bool {
        self.since_jump >= self.config.jump_cooldown
    }

    /// Schedule a one-shot upward impulse for the next step.
    /// Refused while the cooldown is running.
    pub fn jump(&mut self, speed: F) -> bool {
        if !self.can_jump() {
            tracing::debug!(since_jump = ?self.since_jump, "jump refused, cooling down");
            return false;
        }
        self.pending_jump = speed;
        self.since_jump = F::zero();
        true
    }

    /// Rebuild collision memory from the current collidable roster.
    pub fn refresh_roster(&mut self, roster: &dyn RosterProvider) {
        self.tracker.refresh(&roster.collidable(), self.shape.stick_count());
    }

    fn update_patrol(&mut self) {
        let x = self.centroid().x;
        if x > self.config.patrol_max_x {
            self.walk_direction = -F::one();
        } else if x < self.config.patrol_min_x {
            self.walk_direction = F::one();
        }
    }

    /// Integrate, then alternate stick relaxation with boundary clamping.
    pub fn step<O: StepObserver<F>>(&mut self, dt: F, wind: Option<&dyn WindSource<F>>, observer: &mut O) {
        self.update_patrol();
        let forcing = Forcing {
            wind,
            drift: self.config.walk_speed * dt * self.walk_direction,
            impulse: self.pending_jump,
        };
        self.integrator.integrate_all(self.shape.points_mut(), dt, &forcing);
        self.pending_jump = F::zero();
        observer.on_integrate();

        for pass in 0..self.config.relaxation_passes {
            let (sticks, points) = self.shape.parts_mut();
            relax_all(sticks, points, self.config.restoration);
            self.config.boundary.constrain_all(points);
            observer.on_relaxation_pass(pass);
        }

        self.since_jump = self.since_jump + dt;
    }

    /// Test every tracked projectile against the rig's visible sticks.
    pub fn collide(
        &mut self,
        detector: &Detector<F>,
        movers: &mut Movers<F>,
        previous_virtual: &BTreeSet<MoverId>,
    ) -> AllocVec<HitEvent<F>> {
        let policy = ResponsePolicy::ReflectWithRecoil {
            recoil_fraction: self.config.recoil_fraction,
            consume_mover: self.config.consume_movers,
        };
        collide_shape(
            detector,
            &mut self.shape,
            &mut self.tracker,
            movers,
            policy,
            previous_virtual,
            |_, mover| mover.kind() == MoverKind::Sphere,
        )
    }
}
