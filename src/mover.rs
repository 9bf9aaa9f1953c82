//! Movers: free points and spheres that collide with the edges of bodies.

use alloc::collections::BTreeMap;
use alloc::vec::Vec as AllocVec;
use core::fmt;

use crate::config::MoverConfig;
use crate::environment::RosterProvider;
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::point::Point;
use crate::vec::Vec2;

/// Stable handle of a mover. Never reused within a roster.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoverId(pub u64);

impl fmt::Display for MoverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mover#{}", self.0)
    }
}

/// Collision shape of a mover, derived from its radius.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoverKind {
    /// Radius 0: a physics vertex.
    Point,
    /// Radius > 0: a projectile.
    Sphere,
}

/// Why a mover left the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Barely moved for longer than the inactivity timeout.
    Inactive,
    /// Dropped below the world floor.
    FellOutOfWorld,
    /// Needed too many upward kicks to stay above a surface.
    TooManyKicks,
    /// Outlived its maximum lifetime.
    Expired,
    /// Absorbed by the body it struck.
    Consumed,
}

/// A point mass or sphere integrated independently of any shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Mover<F: Float> {
    pub body: Point<F>,
    radius: F,
    /// Only collidable movers are handed to bodies on roster refresh.
    pub collidable: bool,
    previous_is_virtual: bool,
    inactive_time: F,
    lifetime: F,
    kicks: u32,
}

impl<F: Float> Mover<F> {
    pub fn new(pos: Vec2<F>, radius: F) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius < F::zero() {
            return Err(PhysicsError::InvalidRadius);
        }
        Ok(Mover {
            body: Point::new(pos),
            radius,
            collidable: true,
            previous_is_virtual: false,
            inactive_time: F::zero(),
            lifetime: F::zero(),
            kicks: 0,
        })
    }

    /// A radius-0 mover.
    pub fn point(pos: Vec2<F>) -> Self {
        Mover {
            body: Point::new(pos),
            radius: F::zero(),
            collidable: true,
            previous_is_virtual: false,
            inactive_time: F::zero(),
            lifetime: F::zero(),
            kicks: 0,
        }
    }

    /// A sphere fired from `pos` at `angle` radians, travelling `speed` per tick.
    pub fn launched(pos: Vec2<F>, angle: F, speed: F, radius: F) -> PhysicsResult<Self> {
        let direction = Vec2::new(angle.cos(), angle.sin());
        Ok(Self::new(pos, radius)?.with_velocity(direction.scale(speed)))
    }

    /// Set the per-tick velocity by moving the previous position.
    pub fn with_velocity(mut self, velocity: Vec2<F>) -> Self {
        self.body.prev_pos = self.body.pos - velocity;
        self
    }

    pub fn radius(&self) -> F {
        self.radius
    }

    pub fn kind(&self) -> MoverKind {
        if self.radius > F::zero() { MoverKind::Sphere } else { MoverKind::Point }
    }

    pub fn pos(&self) -> Vec2<F> {
        self.body.pos
    }

    pub fn prev_pos(&self) -> Vec2<F> {
        self.body.prev_pos
    }

    /// Displacement over the last tick.
    pub fn displacement(&self) -> Vec2<F> {
        self.body.velocity_raw()
    }

    pub fn kicks(&self) -> u32 {
        self.kicks
    }

    pub fn lifetime(&self) -> F {
        self.lifetime
    }

    pub fn is_previous_virtual(&self) -> bool {
        self.previous_is_virtual
    }

    /// Flag the previous position as synthesized by a collision response.
    pub fn mark_previous_virtual(&mut self) {
        self.previous_is_virtual = true;
    }

    /// Read and clear the virtual-previous flag.
    pub fn take_previous_virtual(&mut self) -> bool {
        core::mem::replace(&mut self.previous_is_virtual, false)
    }

    /// Nudge up by `height` without changing velocity. Counts towards the kick limit.
    pub fn kick_upwards(&mut self, height: F) {
        self.body.translate(Vec2::new(F::zero(), height));
        self.kicks += 1;
    }

    /// Advance the mover's timers and report whether it should be removed.
    pub fn advance_lifecycle(&mut self, dt: F, config: &MoverConfig<F>) -> Option<Expiry> {
        if self.displacement().length() < dt {
            self.inactive_time = self.inactive_time + dt;
        } else {
            self.inactive_time = F::zero();
        }

        let expiry = if self.inactive_time > config.inactive_timeout {
            Some(Expiry::Inactive)
        } else if self.body.pos.y < config.world_floor {
            Some(Expiry::FellOutOfWorld)
        } else if self.kicks >= config.max_kicks {
            Some(Expiry::TooManyKicks)
        } else if self.lifetime > config.max_lifetime {
            Some(Expiry::Expired)
        } else {
            None
        };

        self.lifetime = self.lifetime + dt;
        expiry
    }
}

/// The roster of live movers, keyed by stable id.
#[derive(Clone, Debug)]
pub struct Movers<F: Float> {
    movers: BTreeMap<MoverId, Mover<F>>,
    next_id: u64,
}

impl<F: Float> Movers<F> {
    /// Empty roster; ids start at zero.
    pub fn new() -> Self {
        Movers { movers: BTreeMap::new(), next_id: 0 }
    }

    /// Add a mover under a fresh id. Ids are never reused.
    pub fn insert(&mut self, mover: Mover<F>) -> MoverId {
        let id = MoverId(self.next_id);
        self.next_id += 1;
        self.movers.insert(id, mover);
        id
    }

    /// Take a mover out of the roster, or fail with `UnknownMover`.
    pub fn remove(&mut self, id: MoverId) -> PhysicsResult<Mover<F>> {
        self.movers.remove(&id).ok_or(PhysicsError::UnknownMover(id))
    }

    /// The mover with `id`, if it is still alive.
    pub fn get(&self, id: MoverId) -> Option<&Mover<F>> {
        self.movers.get(&id)
    }

    /// Mutable access to the mover with `id`.
    pub fn get_mut(&mut self, id: MoverId) -> Option<&mut Mover<F>> {
        self.movers.get_mut(&id)
    }

    /// Whether `id` is still in the roster.
    pub fn contains(&self, id: MoverId) -> bool {
        self.movers.contains_key(&id)
    }

    /// Number of live movers.
    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    /// Every live id, in ascending order.
    pub fn ids(&self) -> AllocVec<MoverId> {
        self.movers.keys().copied().collect()
    }

    /// Live movers in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MoverId, &Mover<F>)> {
        self.movers.iter().map(|(id, m)| (*id, m))
    }

    /// Live movers in id order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (MoverId, &mut Mover<F>)> {
        self.movers.iter_mut().map(|(id, m)| (*id, m))
    }
}

impl<F: Float> Default for Movers<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RosterProvider for Movers<F> {
    fn collidable(&self) -> AllocVec<MoverId> {
        self.movers
            .iter()
            .filter(|(_, m)| m.collidable)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_radius_is_rejected() {
        assert_eq!(
            Mover::new(Vec2::new(0.0f32, 0.0), -1.0).unwrap_err(),
            PhysicsError::InvalidRadius
        );
    }

    #[test]
    fn kind_follows_radius() {
        assert_eq!(Mover::point(Vec2::new(0.0f32, 0.0)).kind(), MoverKind::Point);
        assert_eq!(Mover::new(Vec2::new(0.0f32, 0.0), 0.5).unwrap().kind(), MoverKind::Sphere);
    }

    #[test]
    fn launch_sets_velocity_along_angle() {
        let m = Mover::launched(Vec2::new(0.0f32, 0.0), 0.0, 2.0, 0.5).unwrap();
        assert!((m.displacement().x - 2.0).abs() < 1e-6);
        assert!(m.displacement().y.abs() < 1e-6);
    }

    #[test]
    fn kick_keeps_velocity_and_counts() {
        let mut m = Mover::point(Vec2::new(0.0f32, 0.0)).with_velocity(Vec2::new(1.0, 0.0));
        m.kick_upwards(0.1);
        assert!((m.pos().y - 0.1).abs() < 1e-6);
        assert_eq!(m.displacement(), Vec2::new(1.0, 0.0));
        assert_eq!(m.kicks(), 1);
    }

    #[test]
    fn virtual_flag_is_taken_once() {
        let mut m = Mover::point(Vec2::new(0.0f32, 0.0));
        m.mark_previous_virtual();
        assert!(m.take_previous_virtual());
        assert!(!m.take_previous_virtual());
    }

    #[test]
    fn lifecycle_reports_each_expiry() {
        let config = MoverConfig::<f32>::new()
            .with_inactive_timeout(1.0)
            .with_max_lifetime(100.0)
            .with_world_floor(-10.0)
            .with_max_kicks(2);
        let dt = 0.5;

        let mut still = Mover::point(Vec2::new(0.0f32, 0.0));
        assert_eq!(still.advance_lifecycle(dt, &config), None);
        assert_eq!(still.advance_lifecycle(dt, &config), None);
        assert_eq!(still.advance_lifecycle(dt, &config), Some(Expiry::Inactive));

        let mut fallen = Mover::point(Vec2::new(0.0f32, -20.0)).with_velocity(Vec2::new(5.0, 0.0));
        assert_eq!(fallen.advance_lifecycle(dt, &config), Some(Expiry::FellOutOfWorld));

        let mut kicked = Mover::point(Vec2::new(0.0f32, 0.0)).with_velocity(Vec2::new(5.0, 0.0));
        kicked.kick_upwards(0.1);
        kicked.kick_upwards(0.1);
        assert_eq!(kicked.advance_lifecycle(dt, &config), Some(Expiry::TooManyKicks));

        let short = config.clone().with_max_lifetime(0.2);
        let mut old = Mover::point(Vec2::new(0.0f32, 0.0)).with_velocity(Vec2::new(5.0, 0.0));
        assert_eq!(old.advance_lifecycle(dt, &short), None);
        assert_eq!(old.advance_lifecycle(dt, &short), Some(Expiry::Expired));
    }

    #[test]
    fn roster_ids_are_never_reused() {
        let mut movers = Movers::<f32>::new();
        let a = movers.insert(Mover::point(Vec2::zero()));
        movers.remove(a).unwrap();
        let b = movers.insert(Mover::point(Vec2::zero()));
        assert_ne!(a, b);
        assert_eq!(movers.remove(a).unwrap_err(), PhysicsError::UnknownMover(a));
    }

    #[test]
    fn roster_provider_skips_non_collidable() {
        let mut movers = Movers::<f32>::new();
        let a = movers.insert(Mover::point(Vec2::zero()));
        let mut ghost = Mover::point(Vec2::zero());
        ghost.collidable = false;
        movers.insert(ghost);
        assert_eq!(movers.collidable(), alloc::vec![a]);
    }
}
