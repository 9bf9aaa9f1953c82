//! Shapes: an arena of points plus the sticks derived from their adjacency.

use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;
use core::ops::Range;

use crate::error::{PhysicsError, PhysicsResult};
use crate::float::Float;
use crate::point::{Point, PointId};
use crate::stick::Stick;
use crate::vec::Vec2;

/// An undirected point graph. Points are addressed by [`PointId`]; sticks are
/// unique per unordered pair and never join a point to itself.
///
/// Adjacency is declared with [`add_sibling`](Shape::add_sibling) and turned
/// into sticks by [`make_edges`](Shape::make_edges), which is idempotent.
/// Explicit pairs go through [`connect`](Shape::connect).
#[derive(Clone, Debug, Default)]
pub struct Shape<F: Float> {
    points: AllocVec<Point<F>>,
    siblings: AllocVec<AllocVec<PointId>>,
    sticks: AllocVec<Stick<F>>,
    keys: BTreeSet<(PointId, PointId)>,
}

impl<F: Float> Shape<F> {
    pub fn new() -> Self {
        Shape {
            points: AllocVec::new(),
            siblings: AllocVec::new(),
            sticks: AllocVec::new(),
            keys: BTreeSet::new(),
        }
    }

    /// A shape with one resting point per position and no adjacency yet.
    pub fn from_positions<I: IntoIterator<Item = Vec2<F>>>(positions: I) -> Self {
        let mut shape = Self::new();
        for pos in positions {
            shape.push_point(pos);
        }
        shape
    }

    fn push_point(&mut self, pos: Vec2<F>) -> PointId {
        let id = PointId(self.points.len());
        self.points.push(Point::new(pos));
        self.siblings.push(AllocVec::new());
        id
    }

    fn check(&self, id: PointId) -> PhysicsResult<()> {
        if id.index() < self.points.len() {
            Ok(())
        } else {
            Err(PhysicsError::PointOutOfBounds { index: id.index(), count: self.points.len() })
        }
    }

    /// Add a point and rebuild sticks from the declared adjacency.
    pub fn add_point(&mut self, pos: Vec2<F>) -> PointId {
        let id = self.push_point(pos);
        self.make_edges();
        id
    }

    /// Add several points at once, rebuilding sticks a single time.
    pub fn add_points<I: IntoIterator<Item = Vec2<F>>>(&mut self, positions: I) -> Range<usize> {
        let start = self.points.len();
        for pos in positions {
            self.push_point(pos);
        }
        self.make_edges();
        start..self.points.len()
    }

    /// Declare `sibling` adjacent to `point`. Returns false if it already was.
    pub fn add_sibling(&mut self, point: PointId, sibling: PointId) -> PhysicsResult<bool> {
        self.check(point)?;
        self.check(sibling)?;
        let list = &mut self.siblings[point.index()];
        if list.contains(&sibling) {
            return Ok(false);
        }
        list.push(sibling);
        Ok(true)
    }

    /// Declare adjacency in both directions.
    pub fn link(&mut self, a: PointId, b: PointId) -> PhysicsResult<()> {
        self.add_sibling(a, b)?;
        self.add_sibling(b, a)?;
        Ok(())
    }

    /// Forget a declared sibling. Sticks already built stay in place.
    pub fn remove_sibling(&mut self, point: PointId, sibling: PointId) -> bool {
        match self.siblings.get_mut(point.index()) {
            Some(list) => match list.iter().position(|s| *s == sibling) {
                Some(i) => {
                    list.remove(i);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    pub fn siblings(&self, point: PointId) -> &[PointId] {
        self.siblings.get(point.index()).map(|s| s.as_slice()).unwrap_or(&[])
    }

    fn insert_stick(&mut self, a: PointId, b: PointId, constraint_only: bool) -> bool {
        if a == b {
            return false;
        }
        let key = if a <= b { (a, b) } else { (b, a) };
        if !self.keys.insert(key) {
            return false;
        }
        let stick = Stick::from_points(a, b, &self.points, constraint_only);
        if stick.rest_length.is_near_zero(F::from_f32(1e-10)) {
            tracing::warn!(a = a.index(), b = b.index(), "stick endpoints coincide, rest length is zero");
        }
        self.sticks.push(stick);
        true
    }

    /// Build a stick for every declared sibling pair that has none yet.
    /// Returns how many sticks were added.
    pub fn make_edges(&mut self) -> usize {
        let mut added = 0;
        for i in 0..self.siblings.len() {
            for j in 0..self.siblings[i].len() {
                let sibling = self.siblings[i][j];
                if self.insert_stick(PointId(i), sibling, false) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Join an explicit pair. Returns false if the pair was already joined.
    pub fn connect(&mut self, a: PointId, b: PointId, constraint_only: bool) -> PhysicsResult<bool> {
        self.check(a)?;
        self.check(b)?;
        if a == b {
            return Err(PhysicsError::SelfEdge { index: a.index() });
        }
        Ok(self.insert_stick(a, b, constraint_only))
    }

    /// Join consecutive points into an open polyline.
    pub fn connect_chain(&mut self, ids: &[PointId]) -> PhysicsResult<usize> {
        let mut added = 0;
        for pair in ids.windows(2) {
            if self.connect(pair[0], pair[1], false)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn has_stick(&self, a: PointId, b: PointId) -> bool {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn stick_count(&self) -> usize {
        self.sticks.len()
    }

    pub fn point(&self, id: PointId) -> &Point<F> {
        &self.points[id.index()]
    }

    pub fn point_mut(&mut self, id: PointId) -> &mut Point<F> {
        &mut self.points[id.index()]
    }

    pub fn points(&self) -> &[Point<F>] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Point<F>] {
        &mut self.points
    }

    pub fn sticks(&self) -> &[Stick<F>] {
        &self.sticks
    }

    /// Split borrow for relaxation: sticks read-only, points mutable.
    pub fn parts_mut(&mut self) -> (&[Stick<F>], &mut [Point<F>]) {
        (&self.sticks, &mut self.points)
    }

    /// Sticks that are drawn and collide.
    pub fn visible_sticks(&self) -> impl Iterator<Item = (usize, &Stick<F>)> {
        self.sticks.iter().enumerate().filter(|(_, s)| !s.constraint_only)
    }

    /// Current endpoint positions of a stick.
    pub fn endpoints(&self, stick: usize) -> (Vec2<F>, Vec2<F>) {
        let s = &self.sticks[stick];
        (self.points[s.a.index()].pos, self.points[s.b.index()].pos)
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.points.iter().map(|p| p.pos).collect()
    }

    /// Mean point position. Zero for an empty shape.
    pub fn centroid(&self) -> Vec2<F> {
        if self.points.is_empty() {
            return Vec2::zero();
        }
        let sum = self.points.iter().fold(Vec2::zero(), |acc, p| acc + p.pos);
        sum.scale(F::one() / F::from_usize(self.points.len()))
    }
}
