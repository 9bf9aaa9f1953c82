//! Verlet physics for 2D games with soft terrain, swaying chain rigs and projectiles.
//!
//! `wobble` moves points with position-based (verlet) integration, holds
//! shapes together with iteratively relaxed sticks, and detects collisions
//! continuously: a mover hits an edge when the signed area of the edge and
//! the mover's contact point changes sign between two ticks.
//!
//! # Features
//!
//! - **Verlet integration**: implicit velocity, damping, gravity, sky wind, plate-glide drift
//! - **Stick relaxation**: partial restoration passes interleaved with floor/wall clamping
//! - **Continuous collision**: point and sphere movers against moving or static polylines
//! - **Response policies**: plain reflection, or reflection with edge recoil for rigs
//! - **Collision memory**: per (mover, edge) overlap flags stop resting movers re-triggering
//! - **Bodies**: generated hill terrain and walking, jumping chain rigs
//! - **Observable**: monitor ticks via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! # Example
//!
//! ```
//! use wobble::{Mover, NoOpStepObserver, Terrain, Vec2, World, WorldConfig};
//!
//! let mut world = World::<f32>::new(WorldConfig::new()).unwrap();
//! world.add_terrain(Terrain::from_polyline([Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0)]).unwrap());
//! let ball = world.spawn(Mover::new(Vec2::new(0.0, 5.0), 0.5).unwrap());
//!
//! for _ in 0..240 {
//!     world.tick(1.0 / 60.0, &mut NoOpStepObserver);
//! }
//! assert!(world.mover(ball).map_or(true, |m| m.pos().y > 0.0));
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod point;
pub mod stick;
pub mod integrator;
pub mod boundary;
pub mod geometry;
pub mod mover;
pub mod tracker;
pub mod collision;
pub mod shape;
pub mod terrain;
pub mod rig;
pub mod environment;
pub mod bus;
pub mod world;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec2;
pub use point::{Point, PointId};
pub use stick::{relax_all, Stick};
pub use integrator::{Forcing, Integrator};
pub use boundary::Boundary;
pub use geometry::{distance_to_segment, facing_normal, line_intersection, segment_param, signed_area, Aabb};
pub use mover::{Expiry, Mover, MoverId, MoverKind, Movers};
pub use tracker::CollisionTracker;
pub use collision::{Contact, Detector, HitEvent, ResponsePolicy};
pub use shape::Shape;
pub use terrain::Terrain;
pub use rig::ChainRig;
pub use environment::{ConstantWind, HeightSampler, RosterProvider, WindSource};
pub use bus::{EventBus, ListenerId, ROSTER_CHANGED};
pub use world::{TickReport, World};
pub use config::{CollisionConfig, IntegrationConfig, MoverConfig, RigConfig, TerrainConfig, WorldConfig};
pub use observer::{NoOpStepObserver, StepObserver};
pub use error::{PhysicsError, PhysicsResult};
