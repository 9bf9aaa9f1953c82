//! Continuous collision between movers and the edges of a shape.
//!
//! A mover crosses an edge when the signed area of (edge, contact point)
//! changes sign between the previous and the current tick. The response snaps
//! the mover back onto the edge, reflects its displacement about the edge
//! normal with per-axis energy loss, and optionally pushes the struck edge
//! away (recoil).
//!
//! One detector serves every body: point and sphere movers differ only in
//! their contact point and broad-phase box, and bodies choose a
//! [`ResponsePolicy`].

use alloc::collections::BTreeSet;
use alloc::vec::Vec as AllocVec;

use crate::config::CollisionConfig;
use crate::float::Float;
use crate::geometry::{distance_to_segment, facing_normal, line_intersection, segment_param, signed_area, Aabb};
use crate::mover::{Mover, MoverId, MoverKind, Movers};
use crate::shape::Shape;
use crate::tracker::CollisionTracker;
use crate::vec::Vec2;

/// What a body does to itself and the mover after a hit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ResponsePolicy<F: Float> {
    /// Reflect the mover; the edge does not move.
    Reflect,
    /// Reflect the mover and push the edge's endpoints along the normal.
    ReflectWithRecoil {
        /// Share of the mover's rebound speed given to the edge.
        recoil_fraction: F,
        /// Remove the mover from the world after the hit.
        consume_mover: bool,
    },
}

impl<F: Float> ResponsePolicy<F> {
    /// Whether a hit under this policy removes the mover from the world.
    pub fn consumes_mover(&self) -> bool {
        matches!(self, ResponsePolicy::ReflectWithRecoil { consume_mover: true, .. })
    }
}

/// Result of a successful collision response.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    /// Where the mover's path met the edge line.
    pub intersection: Vec2<F>,
    /// Unit edge normal facing the mover.
    pub normal: Vec2<F>,
    /// The rebound was too small and the mover was nudged upward.
    pub kicked: bool,
}

/// A contact attributed to a mover and an edge of some body.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitEvent<F: Float> {
    /// The mover that struck the edge.
    pub mover: MoverId,
    /// Stick index of the struck edge within its body's shape.
    pub edge: usize,
    pub contact: Contact<F>,
    /// The mover must be removed from the world.
    pub consumed: bool,
}

/// Sign-change collision detector and reflective response.
#[derive(Clone, Debug)]
pub struct Detector<F: Float> {
    config: CollisionConfig<F>,
}

impl<F: Float> Detector<F> {
    /// Detector using the thresholds and restitution of `config`.
    pub fn new(config: CollisionConfig<F>) -> Self {
        Detector { config }
    }

    /// Thresholds and restitution in use.
    pub fn config(&self) -> &CollisionConfig<F> {
        &self.config
    }

    /// Test one (mover, edge) pair and respond to a crossing.
    ///
    /// `previous_virtual` marks a previous position synthesized by last
    /// tick's response; the sign test then compares the current position with
    /// itself. The pair's overlap flag in `tracker` is consumed here and set
    /// again after a clean rebound.
    ///
    /// A point mover within `corner_epsilon` of an endpoint is caught even
    /// without a sign change, but only while it moves toward the edge.
    pub fn check(
        &self,
        mover: &mut Mover<F>,
        id: MoverId,
        edge: usize,
        e1: Vec2<F>,
        e2: Vec2<F>,
        previous_virtual: bool,
        tracker: &mut CollisionTracker,
    ) -> Option<Contact<F>> {
        let radius = mover.radius();
        let pos = mover.pos();
        let prev = mover.prev_pos();
        let kind = mover.kind();

        let mut reach = Aabb::around(pos, radius);
        if kind == MoverKind::Point {
            reach = reach.including(prev);
        }
        if !reach.overlaps(&Aabb::spanning(e1, e2)) {
            tracker.set(id, edge, false);
            return None;
        }

        let normal = facing_normal(e1, e2, pos);
        if normal == Vec2::zero() {
            tracing::trace!(%id, edge, "edge has no length, skipping");
            return None;
        }

        let contact = pos - normal.scale(radius);
        let current_area = signed_area(e1, e2, contact);
        let previous_area = if previous_virtual {
            current_area
        } else {
            signed_area(e1, e2, prev - normal.scale(radius))
        };

        if tracker.take(id, edge) {
            return None;
        }

        let crossed = previous_area.abs() > self.config.min_area
            && current_area * previous_area < F::zero();
        let corner = !crossed
            && kind == MoverKind::Point
            && (pos.distance(e1) < self.config.corner_epsilon
                || pos.distance(e2) < self.config.corner_epsilon)
            && mover.displacement().dot(normal) < F::zero();
        if !crossed && !corner {
            return None;
        }

        let slack = if corner { self.config.corner_epsilon } else { F::zero() };
        let result = self.respond(mover, e1, e2, contact, normal, slack)?;
        if !result.kicked {
            tracker.set(id, edge, true);
        }
        tracing::trace!(
            %id,
            edge,
            x = ?result.intersection.x,
            y = ?result.intersection.y,
            kicked = result.kicked,
            "mover crossed edge"
        );
        Some(result)
    }

    /// Snap the mover onto the edge and reflect its displacement.
    ///
    /// Returns `None` without touching the mover when its path runs parallel
    /// to the edge, or meets the edge's line beyond an endpoint and never
    /// comes within `radius + slack` of that endpoint.
    fn respond(
        &self,
        mover: &mut Mover<F>,
        e1: Vec2<F>,
        e2: Vec2<F>,
        contact: Vec2<F>,
        normal: Vec2<F>,
        slack: F,
    ) -> Option<Contact<F>> {
        let incoming = mover.displacement();
        let intersection = match line_intersection(contact, incoming, e1, e2, self.config.slope_tolerance) {
            Some(p) => p,
            None => {
                tracing::trace!("mover slides along edge");
                return None;
            }
        };

        let t = segment_param(e1, e2, intersection);
        let intersection = if t >= F::zero() && t <= F::one() {
            intersection
        } else {
            // Past an end: only a path that grazes the endpoint itself counts,
            // and it is snapped to that endpoint.
            let end = if t < F::zero() { e1 } else { e2 };
            let closest = distance_to_segment(mover.prev_pos(), mover.pos(), end);
            if closest > mover.radius() + slack {
                tracing::trace!(t = ?t, closest = ?closest, "mover passes beyond edge end");
                return None;
            }
            end
        };

        let reflected = incoming - normal.scale(F::two() * incoming.dot(normal));
        let restitution = Vec2::new(self.config.tangential_restitution, self.config.normal_restitution);

        let pos = intersection + normal.scale(mover.radius());
        mover.body.pos = pos;
        mover.body.prev_pos = pos - reflected.component_mul(restitution);

        // Rebounds this small get pushed back through the surface by the next
        // tick's gravity.
        let kicked = !(mover.displacement().y > self.config.min_rebound);
        if kicked {
            mover.kick_upwards(self.config.kick_height);
        }

        if mover.kind() == MoverKind::Point {
            mover.mark_previous_virtual();
        }

        Some(Contact { intersection, normal, kicked })
    }
}

/// Push both endpoints of `edge` away from the mover that struck it.
pub fn apply_recoil<F: Float>(shape: &mut Shape<F>, edge: usize, normal: Vec2<F>, rebound: F, fraction: F) {
    let recoil = normal.scale(rebound * fraction);
    let (a, b) = {
        let stick = &shape.sticks()[edge];
        (stick.a, stick.b)
    };
    shape.point_mut(a).push_prev(recoil);
    shape.point_mut(b).push_prev(recoil);
}

/// Run the detector for every tracked mover against every visible stick of `shape`.
///
/// Movers the tracker knows but the roster no longer holds are skipped. A
/// mover consumed by the policy stops being tested after its first hit.
pub fn collide_shape<F: Float>(
    detector: &Detector<F>,
    shape: &mut Shape<F>,
    tracker: &mut CollisionTracker,
    movers: &mut Movers<F>,
    policy: ResponsePolicy<F>,
    previous_virtual: &BTreeSet<MoverId>,
    admit: impl Fn(MoverId, &Mover<F>) -> bool,
) -> AllocVec<HitEvent<F>> {
    let mut hits = AllocVec::new();
    let tracked: AllocVec<MoverId> = tracker.tracked().collect();
    let edges: AllocVec<usize> = shape.visible_sticks().map(|(i, _)| i).collect();

    for id in tracked {
        let mover = match movers.get_mut(id) {
            Some(m) => m,
            None => continue,
        };
        if !admit(id, mover) {
            continue;
        }
        let was_virtual = previous_virtual.contains(&id);

        for &edge in edges.iter() {
            let (e1, e2) = shape.endpoints(edge);
            let contact = match detector.check(mover, id, edge, e1, e2, was_virtual, tracker) {
                Some(c) => c,
                None => continue,
            };

            if let ResponsePolicy::ReflectWithRecoil { recoil_fraction, .. } = policy {
                let rebound = mover.displacement().length();
                apply_recoil(shape, edge, contact.normal, rebound, recoil_fraction);
            }

            let consumed = policy.consumes_mover();
            hits.push(HitEvent { mover: id, edge, contact, consumed });
            if consumed {
                break;
            }
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::PointId;

    const ID: MoverId = MoverId(0);

    fn detector() -> Detector<f32> {
        Detector::new(CollisionConfig::new())
    }

    fn floor() -> (Vec2<f32>, Vec2<f32>) {
        (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0))
    }

    fn tracked() -> CollisionTracker {
        let mut tracker = CollisionTracker::new();
        tracker.refresh(&[ID], 1);
        tracker
    }

    #[test]
    fn point_crossing_floor_bounces_up() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(5.0, -0.05)).with_velocity(Vec2::new(0.0, -0.3));

        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert!((contact.intersection.x - 5.0).abs() < 1e-5);
        assert!(contact.intersection.y.abs() < 1e-5);
        assert!(m.pos().y >= 0.0);
        assert!(m.displacement().y > 0.0);
        assert!(!contact.kicked);
        assert!(m.is_previous_virtual());
        assert!(tracker.get(ID, 0));
    }

    #[test]
    fn staying_on_the_same_side_is_not_a_crossing() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(5.0, 0.5)).with_velocity(Vec2::new(0.0, -0.3));
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert_eq!(m.pos(), Vec2::new(5.0, 0.5));
    }

    #[test]
    fn overlap_flag_suppresses_once() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        tracker.set(ID, 0, true);

        let mut m = Mover::point(Vec2::new(5.0, -0.05)).with_velocity(Vec2::new(0.0, -0.3));
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert!(!tracker.get(ID, 0), "flag is cleared by the suppressed check");
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_some());
    }

    #[test]
    fn virtual_previous_position_suppresses_sign_test() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(5.0, -0.05)).with_velocity(Vec2::new(0.0, -0.3));
        assert!(detector().check(&mut m, ID, 0, e1, e2, true, &mut tracker).is_none());
    }

    #[test]
    fn out_of_reach_clears_overlap_flag() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        tracker.set(ID, 0, true);
        let mut m = Mover::point(Vec2::new(50.0, 5.0));
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert!(!tracker.get(ID, 0));
    }

    #[test]
    fn sphere_contact_point_uses_radius() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        // Centre stays above the floor but the rim dips below it.
        let mut m = Mover::new(Vec2::new(5.0, 0.4), 0.5).unwrap().with_velocity(Vec2::new(0.0, -0.3));

        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert!((contact.normal.y - 1.0).abs() < 1e-6);
        assert!((m.pos().y - 0.5).abs() < 1e-5, "centre rests one radius above the edge");
        assert!(m.displacement().y > 0.0);
        assert!(!m.is_previous_virtual());
    }

    #[test]
    fn weak_rebound_is_kicked_upwards() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(5.0, -0.01)).with_velocity(Vec2::new(0.0, -0.05));

        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert!(contact.kicked);
        assert_eq!(m.kicks(), 1);
        assert!((m.pos().y - 0.1).abs() < 1e-5);
        assert!(!tracker.get(ID, 0));
    }

    #[test]
    fn reflection_damps_each_axis() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(5.0, -0.5)).with_velocity(Vec2::new(1.0, -1.0));

        detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        let d = m.displacement();
        assert!((d.x - 0.8).abs() < 1e-5);
        assert!((d.y - 0.7).abs() < 1e-5);
    }

    #[test]
    fn vertical_wall_is_hit_from_the_side() {
        let e1 = Vec2::new(0.0f32, -5.0);
        let e2 = Vec2::new(0.0f32, 5.0);
        let mut tracker = tracked();
        let mut m = Mover::point(Vec2::new(0.2, 0.0)).with_velocity(Vec2::new(0.5, 0.0));

        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert!(contact.intersection.x.abs() < 1e-6);
        assert!(contact.intersection.y.abs() < 1e-6);
        assert!(m.displacement().x < 0.0, "reflected back to the left");
    }

    #[test]
    fn sliding_down_a_vertical_edge_changes_nothing() {
        let e1 = Vec2::new(0.0f32, -5.0);
        let e2 = Vec2::new(0.0f32, 5.0);
        let mut tracker = tracked();
        // Exactly on the wall's x, moving straight down: the corner catch
        // fires near e2 but there is no intersection to snap to.
        let mut m = Mover::point(Vec2::new(0.0, 4.95)).with_velocity(Vec2::new(0.0, -0.2));
        let before = m.clone();
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert_eq!(m, before);
    }

    #[test]
    fn point_near_endpoint_is_caught() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        // Still above the edge, so only the endpoint proximity test can fire.
        let mut m = Mover::point(Vec2::new(9.95, 0.02)).with_velocity(Vec2::new(0.0, -0.2));
        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert!((contact.intersection.x - 9.95).abs() < 1e-5);
        assert!(m.pos().y.abs() < 1e-5);
    }

    #[test]
    fn point_leaving_an_endpoint_is_left_alone() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        // Close to e2 but heading up and away from the floor.
        let mut m = Mover::point(Vec2::new(10.05, 0.02)).with_velocity(Vec2::new(0.5, 0.3));
        let before = m.clone();
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert_eq!(m, before);
        assert_eq!(m.kicks(), 0);
        assert!(!tracker.get(ID, 0));
    }

    #[test]
    fn point_crossing_the_line_past_the_end_is_ignored() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        // Travels (10.6, 0.3) -> (9.95, -0.35): the line y = 0 is crossed at
        // x = 10.3, beyond e2, and the path never touches the segment.
        let mut m = Mover::point(Vec2::new(9.95, -0.35)).with_velocity(Vec2::new(-0.65, -0.65));
        let before = m.clone();
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert_eq!(m, before);
        assert!(!m.is_previous_virtual());
        assert!(!tracker.get(ID, 0));
    }

    #[test]
    fn sphere_passing_beyond_the_end_is_ignored() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        // Rim dips below y = 0, but the centre stays farther than one radius
        // from e2 along its whole path.
        let mut m = Mover::new(Vec2::new(10.45, 0.3), 0.5).unwrap().with_velocity(Vec2::new(0.0, -0.3));
        let before = m.clone();
        assert!(detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).is_none());
        assert_eq!(m, before);
        assert!(!tracker.get(ID, 0));
    }

    #[test]
    fn sphere_clipping_the_end_snaps_to_it() {
        let (e1, e2) = floor();
        let mut tracker = tracked();
        let mut m = Mover::new(Vec2::new(10.2, 0.3), 0.5).unwrap().with_velocity(Vec2::new(0.0, -0.3));

        let contact = detector().check(&mut m, ID, 0, e1, e2, false, &mut tracker).unwrap();
        assert_eq!(contact.intersection, e2);
        assert!((m.pos().x - 10.0).abs() < 1e-5);
        assert!((m.pos().y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn recoil_pushes_edge_away_from_mover() {
        let mut shape = Shape::from_positions([Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 0.0)]);
        shape.connect(PointId(0), PointId(1), false).unwrap();
        let mut movers = Movers::new();
        let id = movers.insert(Mover::new(Vec2::new(5.0, 0.4), 0.5).unwrap().with_velocity(Vec2::new(0.0, -0.3)));
        let mut tracker = CollisionTracker::new();
        tracker.refresh(&[id], shape.stick_count());

        let policy = ResponsePolicy::ReflectWithRecoil { recoil_fraction: 1.0, consume_mover: true };
        let hits = collide_shape(&detector(), &mut shape, &mut tracker, &mut movers, policy, &BTreeSet::new(), |_, _| true);

        assert_eq!(hits.len(), 1);
        assert!(hits[0].consumed);
        for p in shape.points() {
            assert!(p.velocity_raw().y < 0.0, "edge should move down, away from the mover");
        }
    }

    #[test]
    fn stale_tracker_rows_are_skipped() {
        let mut shape = Shape::from_positions([Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 0.0)]);
        shape.connect(PointId(0), PointId(1), false).unwrap();
        let mut movers: Movers<f32> = Movers::new();
        let mut tracker = CollisionTracker::new();
        tracker.refresh(&[MoverId(42)], 1);

        let hits = collide_shape(&detector(), &mut shape, &mut tracker, &mut movers, ResponsePolicy::Reflect, &BTreeSet::new(), |_, _| true);
        assert!(hits.is_empty());
    }
}
