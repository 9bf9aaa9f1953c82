//! The world: owns the mover roster and every body, and runs the tick.
//!
//! One tick integrates movers and rigs, relaxes rigs, resolves collisions
//! and then retires movers. Every change to the roster is followed at once
//! by a roster refresh of every body, so no body ever tests a removed mover.

use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;

use crate::collision::{Detector, HitEvent};
use crate::config::WorldConfig;
use crate::environment::{ConstantWind, WindSource};
use crate::error::PhysicsResult;
use crate::float::Float;
use crate::integrator::{Forcing, Integrator};
use crate::mover::{Expiry, Mover, MoverId, Movers};
use crate::observer::StepObserver;
use crate::rig::ChainRig;
use crate::terrain::Terrain;

/// What happened during one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport<F: Float> {
    /// Collision responses, in resolution order.
    pub hits: AllocVec<HitEvent<F>>,
    /// Movers removed this tick and why. Hosts free their own objects for these.
    pub destroyed: AllocVec<(MoverId, Expiry)>,
}

impl<F: Float> TickReport<F> {
    fn new() -> Self {
        TickReport { hits: AllocVec::new(), destroyed: AllocVec::new() }
    }
}

#[derive(Clone, Debug)]
pub struct World<F: Float> {
    config: WorldConfig<F>,
    detector: Detector<F>,
    mover_integrator: Integrator<F>,
    movers: Movers<F>,
    terrains: AllocVec<Terrain<F>>,
    rigs: AllocVec<ChainRig<F>>,
    wind: Option<ConstantWind<F>>,
}

impl<F: Float> World<F> {
    pub fn new(config: WorldConfig<F>) -> PhysicsResult<Self> {
        config.validate()?;
        Ok(World {
            detector: Detector::new(config.collision.clone()),
            mover_integrator: Integrator::new(config.mover.integration.clone()),
            config,
            movers: Movers::new(),
            terrains: AllocVec::new(),
            rigs: AllocVec::new(),
            wind: None,
        })
    }

    pub fn config(&self) -> &WorldConfig<F> {
        &self.config
    }

    /// Wind used by [`tick`](World::tick). `None` means still air.
    pub fn set_wind(&mut self, wind: Option<ConstantWind<F>>) {
        self.wind = wind;
    }

    pub fn add_terrain(&mut self, mut terrain: Terrain<F>) -> usize {
        terrain.refresh_roster(&self.movers);
        self.terrains.push(terrain);
        self.terrains.len() - 1
    }

    pub fn add_rig(&mut self, mut rig: ChainRig<F>) -> usize {
        rig.refresh_roster(&self.movers);
        self.rigs.push(rig);
        self.rigs.len() - 1
    }

    pub fn terrains(&self) -> &[Terrain<F>] {
        &self.terrains
    }

    pub fn terrain_mut(&mut self, index: usize) -> Option<&mut Terrain<F>> {
        self.terrains.get_mut(index)
    }

    pub fn rigs(&self) -> &[ChainRig<F>] {
        &self.rigs
    }

    pub fn rig_mut(&mut self, index: usize) -> Option<&mut ChainRig<F>> {
        self.rigs.get_mut(index)
    }

    pub fn movers(&self) -> &Movers<F> {
        &self.movers
    }

    pub fn mover(&self, id: MoverId) -> Option<&Mover<F>> {
        self.movers.get(id)
    }

    pub fn mover_mut(&mut self, id: MoverId) -> Option<&mut Mover<F>> {
        self.movers.get_mut(id)
    }

    /// Add a mover and hand it to every body.
    pub fn spawn(&mut self, mover: Mover<F>) -> MoverId {
        let id = self.movers.insert(mover);
        tracing::debug!(%id, movers = self.movers.len(), "mover spawned");
        self.refresh_rosters();
        id
    }

    /// Remove a mover and forget its collision memory everywhere.
    pub fn despawn(&mut self, id: MoverId) -> PhysicsResult<Mover<F>> {
        let mover = self.movers.remove(id)?;
        tracing::debug!(%id, movers = self.movers.len(), "mover despawned");
        self.refresh_rosters();
        Ok(mover)
    }

    /// Re-pull the collidable roster into every body.
    pub fn refresh_rosters(&mut self) {
        for terrain in self.terrains.iter_mut() {
            terrain.refresh_roster(&self.movers);
        }
        for rig in self.rigs.iter_mut() {
            rig.refresh_roster(&self.movers);
        }
        tracing::debug!(
            terrains = self.terrains.len(),
            rigs = self.rigs.len(),
            movers = self.movers.len(),
            "rosters refreshed"
        );
    }

    /// Advance one tick using the world's own wind.
    pub fn tick<O: StepObserver<F>>(&mut self, dt: F, observer: &mut O) -> TickReport<F> {
        let wind = self.wind;
        let source = wind.as_ref().map(|w| w as &dyn WindSource<F>);
        self.tick_with_wind(dt, source, observer)
    }

    /// Advance one tick, sampling `wind` for every integrated point.
    pub fn tick_with_wind<O: StepObserver<F>>(
        &mut self,
        dt: F,
        wind: Option<&dyn WindSource<F>>,
        observer: &mut O,
    ) -> TickReport<F> {
        let mut report = TickReport::new();

        let forcing = Forcing::with_wind(wind);
        for (_, mover) in self.movers.iter_mut() {
            self.mover_integrator.integrate(&mut mover.body, dt, &forcing);
        }
        observer.on_integrate();

        for rig in self.rigs.iter_mut() {
            rig.step(dt, wind, observer);
        }

        let previous_virtual: BTreeSet<MoverId> = self
            .movers
            .iter_mut()
            .filter_map(|(id, mover)| mover.take_previous_virtual().then_some(id))
            .collect();

        let mut consumed = AllocVec::new();
        for terrain in self.terrains.iter_mut() {
            let hits = terrain.collide(&self.detector, &mut self.movers, &previous_virtual);
            Self::record_hits(hits, &mut report, &mut consumed, observer);
        }
        for rig in self.rigs.iter_mut() {
            let hits = rig.collide(&self.detector, &mut self.movers, &previous_virtual);
            Self::record_hits(hits, &mut report, &mut consumed, observer);
            // Later rigs must not see a projectile this one absorbed.
            for id in consumed.drain(..) {
                if self.movers.remove(id).is_ok() {
                    report.destroyed.push((id, Expiry::Consumed));
                    observer.on_mover_destroyed(id, Expiry::Consumed);
                }
            }
        }

        let mut expired = AllocVec::new();
        for (id, mover) in self.movers.iter_mut() {
            if let Some(reason) = mover.advance_lifecycle(dt, &self.config.mover) {
                expired.push((id, reason));
            }
        }
        for (id, reason) in expired {
            if self.movers.remove(id).is_ok() {
                tracing::debug!(%id, ?reason, "mover expired");
                report.destroyed.push((id, reason));
                observer.on_mover_destroyed(id, reason);
            }
        }

        if !report.destroyed.is_empty() {
            self.refresh_rosters();
        }

        observer.on_step_complete();
        report
    }

    fn record_hits<O: StepObserver<F>>(
        hits: AllocVec<HitEvent<F>>,
        report: &mut TickReport<F>,
        consumed: &mut AllocVec<MoverId>,
        observer: &mut O,
    ) {
        for hit in hits {
            observer.on_collision(&hit);
            if hit.consumed {
                consumed.push(hit.mover);
            }
            report.hits.push(hit);
        }
    }
}
