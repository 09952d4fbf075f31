use super::*;
use crate::animation::ease::Ease;

fn plan() -> MotionPlan {
    MotionPlan {
        start_delay: 0.2,
        duration: 1.0,
        translation: Vec2::new(40.0, -30.0),
        rotation: 1.5,
        final_scale: 0.7,
        final_opacity: 0.0,
        easing: Ease::OutCubic,
        opacity_easing: Ease::InQuad,
    }
}

#[test]
fn rests_before_start_delay() {
    let p = plan();
    assert_eq!(evaluate(&p, 0.0), MotionState::REST);
    assert_eq!(evaluate(&p, 0.1999), MotionState::REST);
    assert_eq!(evaluate(&p, -5.0), MotionState::REST);
    assert_eq!(evaluate(&p, f64::NAN), MotionState::REST);
    assert_eq!(evaluate(&p, 0.2), MotionState::REST);
}

#[test]
fn reaches_target_exactly_and_stays() {
    let p = plan();
    let target = MotionState::target(&p);
    for elapsed in [p.end_time(), p.end_time() + 1e-9, 3.0, 1e9] {
        assert_eq!(evaluate(&p, elapsed), target);
        assert!(is_finished(&p, elapsed));
    }
    assert!(!is_finished(&p, 1.0));
}

#[test]
fn midway_follows_easing_curves() {
    let p = plan();
    let s = evaluate(&p, 0.7);
    let t = 0.5;
    let w = Ease::OutCubic.apply(t);
    assert!((s.offset.x - 40.0 * w).abs() < 1e-12);
    assert!((s.offset.y + 30.0 * w).abs() < 1e-12);
    assert!((s.rotation - 1.5 * w).abs() < 1e-12);
    assert!((s.scale - (1.0 - 0.3 * w)).abs() < 1e-12);
    let wo = Ease::InQuad.apply(t);
    assert!((s.opacity - (1.0 - wo)).abs() < 1e-12);
}

#[test]
fn evaluation_is_pure() {
    let p = plan();
    let forward: Vec<_> = (0..50).map(|i| evaluate(&p, i as f64 * 0.03)).collect();
    let backward: Vec<_> = (0..50)
        .rev()
        .map(|i| evaluate(&p, i as f64 * 0.03))
        .collect();
    let mut backward = backward;
    backward.reverse();
    assert_eq!(forward, backward);
}

#[test]
fn rest_transform_is_identity() {
    let tr = MotionState::REST.to_transform(Point::new(12.0, 7.0));
    let a = tr.to_affine();
    let p = a * Point::new(3.0, 4.0);
    assert!((p.x - 3.0).abs() < 1e-12 && (p.y - 4.0).abs() < 1e-12);
}

#[test]
fn transform_moves_centroid_by_offset() {
    let s = MotionState {
        offset: Vec2::new(5.0, 6.0),
        rotation: 0.9,
        scale: 0.5,
        opacity: 1.0,
    };
    let c = Point::new(10.0, 20.0);
    let moved = s.to_transform(c).to_affine() * c;
    assert!((moved.x - 15.0).abs() < 1e-9);
    assert!((moved.y - 26.0).abs() < 1e-9);
}
