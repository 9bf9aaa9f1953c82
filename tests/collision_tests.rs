mod common;

use wobble::{
    CollisionConfig, CollisionTracker, Detector, Mover, MoverId, NoOpStepObserver, Terrain, Vec2, World, WorldConfig,
};

const DT: f32 = 1.0 / 60.0;

fn floor_world() -> World<f32> {
    let mut world = World::new(WorldConfig::new()).unwrap();
    let floor = Terrain::from_polyline([Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)])
        .unwrap()
        .with_point_mover_collisions(true);
    world.add_terrain(floor);
    world
}

#[test]
fn falling_point_bounces_off_floor_once() {
    common::init_tracing();
    let mut world = floor_world();
    let id = world.spawn(Mover::point(Vec2::new(5.0, 1.0)).with_velocity(Vec2::new(0.0, -0.2)));

    let mut first_hit = None;
    for tick in 0..10 {
        let report = world.tick(DT, &mut NoOpStepObserver);
        if let Some(hit) = report.hits.first() {
            first_hit = Some((tick, *hit));
            break;
        }
    }
    let (tick, hit) = first_hit.expect("the point should reach the floor");
    assert_eq!(tick, 3);
    assert_eq!(hit.mover, id);
    assert!((hit.contact.intersection.x - 5.0).abs() < 1e-4);
    assert!(hit.contact.intersection.y.abs() < 1e-4);

    let mover = world.mover(id).unwrap();
    assert!(mover.pos().y >= 0.0);
    assert!(mover.displacement().y > 0.0, "velocity must point away from the floor");

    for _ in 0..10 {
        let report = world.tick(DT, &mut NoOpStepObserver);
        assert!(report.hits.is_empty(), "bounce must not re-trigger");
        assert!(world.mover(id).unwrap().pos().y >= 0.0);
    }
}

#[test]
fn crossing_is_detected_from_either_side() {
    let detector = Detector::new(CollisionConfig::<f32>::new());
    let (e1, e2) = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let id = MoverId(0);

    for (pos, vel) in [(Vec2::new(5.0, -0.05), Vec2::new(0.0, -0.3)), (Vec2::new(5.0, 0.05), Vec2::new(0.0, 0.3))] {
        let mut tracker = CollisionTracker::new();
        tracker.refresh(&[id], 1);
        let mut mover = Mover::point(pos).with_velocity(vel);

        let contact = detector.check(&mut mover, id, 0, e1, e2, false, &mut tracker).unwrap();
        assert!((contact.intersection.x - 5.0).abs() < 1e-5);
        assert!(contact.intersection.y.abs() < 1e-5);
        assert!(mover.displacement().y * vel.y < 0.0, "reflection reverses the normal component");
    }
}

#[test]
fn sphere_bounces_off_sloped_terrain() {
    let mut world = World::new(WorldConfig::new()).unwrap();
    world.add_terrain(Terrain::from_polyline([Vec2::new(0.0f32, 0.0), Vec2::new(10.0, 5.0)]).unwrap());
    let id = world.spawn(Mover::new(Vec2::new(4.0, 3.5), 0.5).unwrap().with_velocity(Vec2::new(0.0, -0.3)));

    let mut hit = None;
    for _ in 0..20 {
        let report = world.tick(DT, &mut NoOpStepObserver);
        if let Some(h) = report.hits.first() {
            hit = Some(*h);
            break;
        }
    }
    let hit = hit.expect("sphere should land on the slope");
    assert!(hit.contact.normal.y > 0.0 && hit.contact.normal.x < 0.0);

    let mover = world.mover(id).unwrap();
    // Centre is at least one radius above the slope line y = x / 2.
    let line_y = mover.pos().x * 0.5;
    assert!(mover.pos().y > line_y);
    assert!(mover.displacement().x < 0.0, "rebound heads down-slope");
}

#[test]
fn resting_overlap_is_suppressed_for_one_check() {
    let detector = Detector::new(CollisionConfig::<f32>::new());
    let (e1, e2) = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
    let id = MoverId(3);
    let mut tracker = CollisionTracker::new();
    tracker.refresh(&[id], 1);

    let mut mover = Mover::point(Vec2::new(5.0, -0.05)).with_velocity(Vec2::new(0.0, -0.3));
    detector.check(&mut mover, id, 0, e1, e2, false, &mut tracker).unwrap();
    assert!(tracker.get(id, 0));

    // Same pose again: the overlap flag swallows it.
    let mut again = Mover::point(Vec2::new(5.0, -0.05)).with_velocity(Vec2::new(0.0, -0.3));
    assert!(detector.check(&mut again, id, 0, e1, e2, false, &mut tracker).is_none());
}
