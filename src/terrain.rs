//! Static terrain: a polyline of edges that movers bounce off.

use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;

use crate::collision::{collide_shape, Detector, HitEvent, ResponsePolicy};
use crate::config::TerrainConfig;
use crate::environment::{HeightSampler, RosterProvider};
use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::mover::{MoverId, MoverKind, Movers};
use crate::point::PointId;
use crate::shape::Shape;
use crate::tracker::CollisionTracker;
use crate::vec::Vec2;

/// A body whose points never move. Collisions reflect movers without recoil.
#[derive(Clone, Debug)]
pub struct Terrain<F: Float> {
    shape: Shape<F>,
    tracker: CollisionTracker,
    collide_point_movers: bool,
    claimed: BTreeSet<MoverId>,
}

impl<F: Float> Terrain<F> {
    /// Chain `positions` into an open polyline.
    pub fn from_polyline<I: IntoIterator<Item = Vec2<F>>>(positions: I) -> PhysicsResult<Self> {
        let mut shape = Shape::from_positions(positions);
        if shape.len() < 2 {
            return Err(PhysicsError::InvalidConfig("terrain needs at least two vertices"));
        }
        for i in 1..shape.len() {
            shape.link(PointId(i - 1), PointId(i))?;
        }
        shape.make_edges();
        Ok(Self::from_shape(shape))
    }

    /// Wrap an already assembled shape.
    pub fn from_shape(shape: Shape<F>) -> Self {
        Terrain {
            shape,
            tracker: CollisionTracker::new(),
            collide_point_movers: false,
            claimed: BTreeSet::new(),
        }
    }

    /// Raise a hill between the configured anchors.
    ///
    /// `divisions + 1` vertices are spaced evenly, leaving a gap of one step
    /// next to each anchor. Sampled heights are lifted by half the height
    /// range, faded towards both ends by a triangular mask and capped to
    /// `[base_y, base_y + max_height]`. Point 0 is the start anchor and the
    /// last point the end anchor.
    pub fn generate<S: HeightSampler<F> + ?Sized>(config: &TerrainConfig<F>, sampler: &mut S) -> PhysicsResult<Self> {
        config.validate()?;

        let n = config.divisions;
        let step = (config.end.x - config.start.x) / F::from_usize(n + 2);
        let half_range = (config.max_height - config.min_height) * F::half();
        let half_n = F::from_usize(n) * F::half();
        let ceiling = config.base_y + config.max_height;

        let mut positions = AllocVec::with_capacity(n + 3);
        positions.push(config.start);
        for i in 0..=n {
            let fi = F::from_usize(i);
            let mask = if fi > half_n {
                (F::from_usize(n) - fi) / half_n
            } else {
                fi / half_n
            };
            let raw = sampler.height(i, n) + half_range;
            let y = (config.base_y + mask * raw).clamp(config.base_y, ceiling);
            let x = config.start.x + F::from_usize(i + 1) * step;
            positions.push(Vec2::new(x, y));
        }
        positions.push(config.end);

        let mut terrain = Self::from_polyline(positions)?;
        terrain.collide_point_movers = config.collide_point_movers;
        tracing::debug!(vertices = terrain.shape.len(), edges = terrain.shape.stick_count(), "terrain generated");
        Ok(terrain)
    }

    pub fn with_point_mover_collisions(mut self, enabled: bool) -> Self {
        self.collide_point_movers = enabled;
        self
    }

    pub fn collides_with_point_movers(&self) -> bool {
        self.collide_point_movers
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

    /// Mark a mover as part of this terrain so it never collides with it.
    pub fn claim(&mut self, id: MoverId) -> bool {
        self.claimed.insert(id)
    }

    /// Let a claimed mover collide with this terrain again.
    pub fn release(&mut self, id: MoverId) -> bool {
        self.claimed.remove(&id)
    }

    /// Whether `id` is currently claimed by this terrain.
    pub fn is_claimed(&self, id: MoverId) -> bool {
        self.claimed.contains(&id)
    }

    /// Rebuild collision memory from the current collidable roster.
    pub fn refresh_roster(&mut self, roster: &dyn RosterProvider) {
        let ids = roster.collidable();
        let live: BTreeSet<MoverId> = ids.iter().copied().collect();
        self.claimed.retain(|id| live.contains(id));
        self.tracker.refresh(&ids, self.shape.stick_count());
    }

    /// Bounce every tracked mover off the terrain's edges.
    pub fn collide(
        &mut self,
        detector: &Detector<F>,
        movers: &mut Movers<F>,
        previous_virtual: &BTreeSet<MoverId>,
    ) -> AllocVec<HitEvent<F>> {
        let claimed = &self.claimed;
        let points_collide = self.collide_point_movers;
        collide_shape(
            detector,
            &mut self.shape,
            &mut self.tracker,
            movers,
            ResponsePolicy::Reflect,
            previous_virtual,
            |id, mover| !claimed.contains(&id) && (points_collide || mover.kind() == MoverKind::Sphere),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionConfig;
    use crate::mover::Mover;

    #[test]
    fn generated_hill_is_masked_and_chained() {
        let config = TerrainConfig::new(Vec2::new(0.0f32, 0.0), Vec2::new(12.0, 0.0))
            .with_divisions(4)
            .with_heights(0.0, 10.0);
        let terrain = Terrain::generate(&config, &mut |_: usize, _: usize| 0.0f32).unwrap();
        let shape = terrain.shape();

        assert_eq!(shape.len(), 7);
        assert_eq!(shape.stick_count(), 6);

        let heights: AllocVec<f32> = shape.points().iter().map(|p| p.pos.y).collect();
        let expected = [0.0, 0.0, 2.5, 5.0, 2.5, 0.0, 0.0];
        for (h, e) in heights.iter().zip(expected.iter()) {
            assert!((h - e).abs() < 1e-5, "{heights:?}");
        }
        assert!((shape.point(PointId(1)).pos.x - 2.0).abs() < 1e-5);
        assert!((shape.point(PointId(5)).pos.x - 10.0).abs() < 1e-5);
        assert!(shape.has_stick(PointId(0), PointId(1)));
        assert!(shape.has_stick(PointId(5), PointId(6)));
    }

    #[test]
    fn generated_heights_are_capped() {
        let config = TerrainConfig::new(Vec2::new(0.0f32, 0.0), Vec2::new(12.0, 0.0))
            .with_divisions(4)
            .with_heights(0.0, 4.0);
        let terrain = Terrain::generate(&config, &mut |_: usize, _: usize| 100.0f32).unwrap();
        for p in terrain.shape().points() {
            assert!(p.pos.y >= 0.0 && p.pos.y <= 4.0);
        }
    }

    #[test]
    fn zero_divisions_is_rejected() {
        let config = TerrainConfig::new(Vec2::new(0.0f32, 0.0), Vec2::new(12.0, 0.0)).with_divisions(0);
        assert_eq!(
            Terrain::generate(&config, &mut |_: usize, _: usize| 0.0f32).unwrap_err(),
            PhysicsError::InvalidDivisions
        );
    }

    #[test]
    fn point_movers_are_ignored_unless_enabled() {
        let detector = Detector::new(CollisionConfig::new());
        let mut movers = Movers::new();
        let id = movers.insert(Mover::point(Vec2::new(5.0f32, -0.05)).with_velocity(Vec2::new(0.0, -0.3)));

        let mut terrain = Terrain::from_polyline([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)]).unwrap();
        terrain.refresh_roster(&movers);
        assert!(terrain.collide(&detector, &mut movers, &BTreeSet::new()).is_empty());

        let mut terrain = terrain.with_point_mover_collisions(true);
        terrain.refresh_roster(&movers);
        let hits = terrain.collide(&detector, &mut movers, &BTreeSet::new());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].mover, id);
        assert!(!hits[0].consumed);
    }

    #[test]
    fn claimed_movers_pass_through() {
        let detector = Detector::new(CollisionConfig::new());
        let mut movers = Movers::new();
        let id = movers.insert(Mover::point(Vec2::new(5.0f32, -0.05)).with_velocity(Vec2::new(0.0, -0.3)));

        let mut terrain = Terrain::from_polyline([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)])
            .unwrap()
            .with_point_mover_collisions(true);
        assert!(terrain.claim(id));
        terrain.refresh_roster(&movers);
        assert!(terrain.collide(&detector, &mut movers, &BTreeSet::new()).is_empty());
    }
}
