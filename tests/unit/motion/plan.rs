use super::*;
use crate::{
    fragment::{extract::extract, source::SourceImage},
    foundation::core::Rgba8Premul,
    geometry::polygon::Polygon,
};

fn fragment_at(rect: Rect) -> Fragment {
    let src = SourceImage::solid(100, 100, Rgba8Premul::from_straight_rgba(5, 5, 5, 255)).unwrap();
    extract(0, Polygon::from_rect(rect), &src).unwrap()
}

fn planner(config: &ShatterConfig, origin: Point) -> MotionPlanner {
    MotionPlanner::new(config, origin, Rect::new(0.0, 0.0, 100.0, 100.0))
}

#[test]
fn identical_fragment_and_seed_give_identical_plan() {
    let cfg = ShatterConfig::default();
    let p = planner(&cfg, Point::new(50.0, 50.0));
    let frag = fragment_at(Rect::new(10.0, 10.0, 30.0, 20.0));
    assert_eq!(p.plan(&frag, 99), p.plan(&frag, 99));
    assert_ne!(p.plan(&frag, 99), p.plan(&frag, 100));
}

#[test]
fn plans_respect_configured_ranges() {
    let cfg = ShatterConfig::default();
    let p = planner(&cfg, Point::new(50.0, 50.0));
    let frag = fragment_at(Rect::new(60.0, 70.0, 90.0, 95.0));
    let diag = 100.0_f64.hypot(100.0);
    for seed in 0..200 {
        let plan = p.plan(&frag, seed);
        assert!((0.0..=cfg.sweep_window).contains(&plan.start_delay));
        assert!(plan.duration > 0.0);
        let end = plan.end_time();
        assert!(end >= cfg.duration_range.min - 1e-12);
        assert!(end <= cfg.duration_range.max + 1e-12);
        assert!((cfg.rotation_range.min..=cfg.rotation_range.max).contains(&plan.rotation));
        assert!((cfg.scale_range.min..=cfg.scale_range.max).contains(&plan.final_scale));
        let travel = plan.translation.hypot() / diag;
        assert!(travel >= cfg.travel_range.min - 1e-9);
        assert!(travel <= cfg.travel_range.max + 1e-9);
        assert_eq!(plan.final_opacity, cfg.final_opacity);
        assert_eq!(plan.easing, cfg.easing);
    }
}

#[test]
fn translation_points_away_from_origin() {
    let cfg = ShatterConfig::default();
    let origin = Point::new(20.0, 80.0);
    let p = planner(&cfg, origin);
    let frag = fragment_at(Rect::new(60.0, 10.0, 80.0, 30.0));
    let away = frag.centroid - origin;
    for seed in 0..20 {
        let plan = p.plan(&frag, seed);
        let cos = plan.translation.dot(away) / (plan.translation.hypot() * away.hypot());
        assert!((cos - 1.0).abs() < 1e-9);
    }
}

#[test]
fn fragment_at_origin_still_gets_a_direction() {
    let cfg = ShatterConfig::default();
    let frag = fragment_at(Rect::new(40.0, 40.0, 60.0, 60.0));
    let p = planner(&cfg, frag.centroid);
    let plan = p.plan(&frag, 5);
    assert!(plan.translation.hypot() > 0.0);
    assert!(plan.translation.x.is_finite() && plan.translation.y.is_finite());
}

#[test]
fn distance_delay_sweeps_near_to_far() {
    let cfg = ShatterConfig {
        delay_mode: DelayMode::Distance { jitter: 0.0 },
        ..ShatterConfig::default()
    };
    let p = planner(&cfg, Point::new(0.0, 0.0));
    let near = fragment_at(Rect::new(0.0, 0.0, 10.0, 10.0));
    let far = fragment_at(Rect::new(80.0, 80.0, 100.0, 100.0));
    let near_plan = p.plan(&near, 1);
    let far_plan = p.plan(&far, 1);
    assert!(near_plan.start_delay < far_plan.start_delay);
    let expected = cfg.sweep_window * (far.centroid.distance(Point::ZERO) / 100.0_f64.hypot(100.0));
    assert!((far_plan.start_delay - expected).abs() < 1e-12);
}
