//! Configuration types for bodies, movers and collision response.
//!
//! Every config follows the same builder shape:
//! ```
//! use wobble::config::RigConfig;
//!
//! let config: RigConfig<f32> = RigConfig::new()
//!     .with_relaxation_passes(4)
//!     .with_walk_speed(3.0)
//!     .with_patrol(-85.0, -50.0);
//! assert!(config.validate().is_ok());
//! ```

use crate::boundary::Boundary;
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::vec::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a body's points are advanced each tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrationConfig<F: Float> {
    /// Fraction of last tick's displacement kept [0, 1]. Default: 0.95.
    pub damping: F,
    /// Constant acceleration per second. Default: (0, -6).
    pub gravity: Vec2<F>,
    /// Most negative vertical displacement allowed per tick. Default: -2.0.
    pub min_fall_speed: Option<F>,
}

impl<F: Float> IntegrationConfig<F> {
    pub fn new() -> Self {
        IntegrationConfig {
            damping: F::from_f32(0.95),
            gravity: Vec2::new(F::zero(), F::from_f32(-6.0)),
            min_fall_speed: Some(F::from_f32(-2.0)),
        }
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_min_fall_speed(mut self, min_fall_speed: Option<F>) -> Self {
        self.min_fall_speed = min_fall_speed;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if !(self.damping >= F::zero() && self.damping <= F::one()) {
            return Err(PhysicsError::InvalidConfig("damping must be in [0, 1]"));
        }
        if !self.gravity.x.is_finite() || !self.gravity.y.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        if let Some(min_fall) = self.min_fall_speed {
            if !(min_fall < F::zero()) {
                return Err(PhysicsError::InvalidConfig("min fall speed must be negative"));
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for IntegrationConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tunables of the collision detector and its response.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionConfig<F: Float> {
    /// Below this, a displacement or edge x-extent counts as vertical. Default: 1e-6.
    pub slope_tolerance: F,
    /// Previous signed areas smaller than this never count as a crossing. Default: 1e-4.
    pub min_area: F,
    /// Point movers this close to an edge endpoint always collide. Default: 0.1.
    pub corner_epsilon: F,
    /// Share of reflected x displacement kept after a hit. Default: 0.8.
    pub tangential_restitution: F,
    /// Share of reflected y displacement kept after a hit. Default: 0.7.
    pub normal_restitution: F,
    /// Rebound heights at or below this trigger an upward kick. Default: 0.1.
    pub min_rebound: F,
    /// Distance of the upward kick. Default: 0.1.
    pub kick_height: F,
}

impl<F: Float> CollisionConfig<F> {
    pub fn new() -> Self {
        CollisionConfig {
            slope_tolerance: F::from_f32(1e-6),
            min_area: F::from_f32(1e-4),
            corner_epsilon: F::from_f32(0.1),
            tangential_restitution: F::from_f32(0.8),
            normal_restitution: F::from_f32(0.7),
            min_rebound: F::from_f32(0.1),
            kick_height: F::from_f32(0.1),
        }
    }

    pub fn with_restitution(mut self, tangential: F, normal: F) -> Self {
        self.tangential_restitution = tangential;
        self.normal_restitution = normal;
        self
    }

    pub fn with_corner_epsilon(mut self, corner_epsilon: F) -> Self {
        self.corner_epsilon = corner_epsilon;
        self
    }

    pub fn with_kick(mut self, min_rebound: F, kick_height: F) -> Self {
        self.min_rebound = min_rebound;
        self.kick_height = kick_height;
        self
    }

    pub fn with_slope_tolerance(mut self, slope_tolerance: F) -> Self {
        self.slope_tolerance = slope_tolerance;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        let unit = |v: F| v >= F::zero() && v <= F::one();
        if !unit(self.tangential_restitution) || !unit(self.normal_restitution) {
            return Err(PhysicsError::InvalidConfig("restitution must be in [0, 1]"));
        }
        if self.slope_tolerance < F::zero() || self.min_area < F::zero() || self.corner_epsilon < F::zero() {
            return Err(PhysicsError::InvalidConfig("collision tolerances must be non-negative"));
        }
        if self.kick_height < F::zero() {
            return Err(PhysicsError::InvalidConfig("kick height must be non-negative"));
        }
        Ok(())
    }
}

impl<F: Float> Default for CollisionConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Motion and lifetime rules for movers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MoverConfig<F: Float> {
    /// Default: no damping, gravity (0, -1.5), no fall clamp.
    pub integration: IntegrationConfig<F>,
    /// Seconds a mover may stay nearly still before it is removed. Default: 3.0.
    pub inactive_timeout: F,
    /// Movers below this height are removed. Default: -55.0.
    pub world_floor: F,
    /// Movers kicked this many times are removed. Default: 3.
    pub max_kicks: u32,
    /// Seconds before any mover is removed. Default: 20.0.
    pub max_lifetime: F,
}

impl<F: Float> MoverConfig<F> {
    pub fn new() -> Self {
        MoverConfig {
            integration: IntegrationConfig::new()
                .with_damping(F::one())
                .with_gravity(Vec2::new(F::zero(), F::from_f32(-1.5)))
                .with_min_fall_speed(None),
            inactive_timeout: F::from_f32(3.0),
            world_floor: F::from_f32(-55.0),
            max_kicks: 3,
            max_lifetime: F::from_f32(20.0),
        }
    }

    pub fn with_integration(mut self, integration: IntegrationConfig<F>) -> Self {
        self.integration = integration;
        self
    }

    pub fn with_world_floor(mut self, world_floor: F) -> Self {
        self.world_floor = world_floor;
        self
    }

    pub fn with_max_lifetime(mut self, max_lifetime: F) -> Self {
        self.max_lifetime = max_lifetime;
        self
    }

    pub fn with_inactive_timeout(mut self, inactive_timeout: F) -> Self {
        self.inactive_timeout = inactive_timeout;
        self
    }

    pub fn with_max_kicks(mut self, max_kicks: u32) -> Self {
        self.max_kicks = max_kicks;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        self.integration.validate()?;
        if !(self.inactive_timeout > F::zero()) || !(self.max_lifetime > F::zero()) {
            return Err(PhysicsError::InvalidConfig("mover timers must be positive"));
        }
        Ok(())
    }
}

impl<F: Float> Default for MoverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Layout of a generated terrain hill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TerrainConfig<F: Float> {
    /// Left anchor vertex.
    pub start: Vec2<F>,
    /// Right anchor vertex.
    pub end: Vec2<F>,
    /// Height the hill is raised from.
    pub base_y: F,
    /// Hill vertices generated between the anchors, minus one.
    pub divisions: usize,
    /// Lowest sampled height offset.
    pub min_height: F,
    /// Highest sampled height offset; also caps the hill at `base_y + max_height`.
    pub max_height: F,
    /// Whether point movers (radius 0) collide with the terrain. Default: false.
    pub collide_point_movers: bool,
}

impl<F: Float> TerrainConfig<F> {
    pub fn new(start: Vec2<F>, end: Vec2<F>) -> Self {
        TerrainConfig {
            start,
            end,
            base_y: start.y.min(end.y),
            divisions: 16,
            min_height: F::zero(),
            max_height: F::from_f32(10.0),
            collide_point_movers: false,
        }
    }

    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.divisions = divisions;
        self
    }

    pub fn with_heights(mut self, min_height: F, max_height: F) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }

    pub fn with_base_y(mut self, base_y: F) -> Self {
        self.base_y = base_y;
        self
    }

    pub fn with_point_mover_collisions(mut self, enabled: bool) -> Self {
        self.collide_point_movers = enabled;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if self.divisions == 0 {
            return Err(PhysicsError::InvalidDivisions);
        }
        if !(self.max_height >= self.min_height) {
            return Err(PhysicsError::InvalidConfig("max height must not be below min height"));
        }
        Ok(())
    }
}

/// Motion, relaxation and reaction of a chain rig.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig<F: Float> {
    pub integration: IntegrationConfig<F>,
    /// Relaxation + boundary passes per tick. Default: 3.
    pub relaxation_passes: usize,
    /// Share of a stick's length error corrected per pass (0, 1]. Default: 0.85.
    pub restoration: F,
    /// World planes the rig is kept inside.
    pub boundary: Boundary<F>,
    /// Patrol walking speed per second. Default: 0 (standing still).
    pub walk_speed: F,
    /// Left end of the patrol, compared to the rig centroid. Default: -85.0.
    pub patrol_min_x: F,
    /// Right end of the patrol, compared to the rig centroid. Default: -50.0.
    pub patrol_max_x: F,
    /// Seconds between jumps. Default: 7.5.
    pub jump_cooldown: F,
    /// Share of a projectile's rebound pushed into the struck stick. Default: 1.0.
    pub recoil_fraction: F,
    /// Whether a projectile that hits the rig is removed. Default: true.
    pub consume_movers: bool,
}

impl<F: Float> RigConfig<F> {
    pub fn new() -> Self {
        RigConfig {
            integration: IntegrationConfig::new(),
            relaxation_passes: 3,
            restoration: F::from_f32(0.85),
            boundary: Boundary::new(F::one())
                .with_floor(F::from_f32(-50.0))
                .with_walls(F::from_f32(-100.0), F::from_f32(-40.0)),
            walk_speed: F::zero(),
            patrol_min_x: F::from_f32(-85.0),
            patrol_max_x: F::from_f32(-50.0),
            jump_cooldown: F::from_f32(7.5),
            recoil_fraction: F::one(),
            consume_movers: true,
        }
    }

    pub fn with_integration(mut self, integration: IntegrationConfig<F>) -> Self {
        self.integration = integration;
        self
    }

    /// Zero is stored as given and rejected by [`validate`](RigConfig::validate).
    pub fn with_relaxation_passes(mut self, passes: usize) -> Self {
        self.relaxation_passes = passes;
        self
    }

    pub fn with_restoration(mut self, restoration: F) -> Self {
        self.restoration = restoration;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary<F>) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_walk_speed(mut self, walk_speed: F) -> Self {
        self.walk_speed = walk_speed;
        self
    }

    pub fn with_patrol(mut self, min_x: F, max_x: F) -> Self {
        self.patrol_min_x = min_x;
        self.patrol_max_x = max_x;
        self
    }

    pub fn with_jump_cooldown(mut self, jump_cooldown: F) -> Self {
        self.jump_cooldown = jump_cooldown;
        self
    }

    pub fn with_recoil(mut self, recoil_fraction: F, consume_movers: bool) -> Self {
        self.recoil_fraction = recoil_fraction;
        self.consume_movers = consume_movers;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        self.integration.validate()?;
        self.boundary.validate()?;
        if self.relaxation_passes == 0 {
            return Err(PhysicsError::InvalidConfig("at least one relaxation pass is required"));
        }
        if !(self.restoration > F::zero() && self.restoration <= F::one()) {
            return Err(PhysicsError::InvalidConfig("restoration must be in (0, 1]"));
        }
        if self.patrol_min_x > self.patrol_max_x {
            return Err(PhysicsError::InvalidConfig("patrol range is inverted"));
        }
        if self.recoil_fraction < F::zero() {
            return Err(PhysicsError::InvalidConfig("recoil fraction must be non-negative"));
        }
        Ok(())
    }
}

impl<F: Float> Default for RigConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// World-wide settings shared by every body.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldConfig<F: Float> {
    pub collision: CollisionConfig<F>,
    pub mover: MoverConfig<F>,
}

impl<F: Float> WorldConfig<F> {
    pub fn new() -> Self {
        WorldConfig {
            collision: CollisionConfig::new(),
            mover: MoverConfig::new(),
        }
    }

    pub fn with_collision(mut self, collision: CollisionConfig<F>) -> Self {
        self.collision = collision;
        self
    }

    pub fn with_mover(mut self, mover: MoverConfig<F>) -> Self {
        self.mover = mover;
        self
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        self.collision.validate()?;
        self.mover.validate()
    }
}
