use super::*;
use rand::SeedableRng;

#[test]
fn defaults_validate() {
    ShatterConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg = ShatterConfig::from_json_str(
        r#"{ "fragment_count": 10, "rng_seed": 42, "easing": "easeInOut", "glare": null }"#,
    )
    .unwrap();
    assert_eq!(cfg.fragment_count, 10);
    assert_eq!(cfg.rng_seed, Some(42));
    assert_eq!(cfg.easing, Ease::InOutCubic);
    assert_eq!(cfg.glare, None);
    assert_eq!(cfg.sweep_window, ShatterConfig::default().sweep_window);
}

#[test]
fn json_roundtrip_preserves_config() {
    let cfg = ShatterConfig {
        delay_mode: DelayMode::Distance { jitter: 0.25 },
        rng_seed: Some(9),
        ..ShatterConfig::default()
    };
    let s = cfg.to_json_string().unwrap();
    assert_eq!(ShatterConfig::from_json_str(&s).unwrap(), cfg);
}

#[test]
fn malformed_json_is_serde_error() {
    let err = ShatterConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ShatterError::Serde(_)));
}

#[test]
fn zero_fragments_is_invalid() {
    let cfg = ShatterConfig {
        fragment_count: 0,
        ..ShatterConfig::default()
    };
    assert!(matches!(
        cfg.validate().unwrap_err(),
        ShatterError::InvalidInput(_)
    ));
}

#[test]
fn sweep_must_fit_before_earliest_completion() {
    let cfg = ShatterConfig {
        sweep_window: 1.0,
        duration_range: RangeF64::new(0.5, 2.0),
        ..ShatterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn inverted_and_non_finite_ranges_are_invalid() {
    let cfg = ShatterConfig {
        rotation_range: RangeF64::new(1.0, -1.0),
        ..ShatterConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = ShatterConfig {
        travel_range: RangeF64::new(0.0, f64::INFINITY),
        ..ShatterConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn out_of_range_scalars_are_invalid() {
    for cfg in [
        ShatterConfig {
            final_opacity: 1.5,
            ..ShatterConfig::default()
        },
        ShatterConfig {
            crack_inset: 0.0,
            ..ShatterConfig::default()
        },
        ShatterConfig {
            min_seed_separation: f64::NAN,
            ..ShatterConfig::default()
        },
        ShatterConfig {
            delay_mode: DelayMode::Distance { jitter: 2.0 },
            ..ShatterConfig::default()
        },
        ShatterConfig {
            glare: Some(GlareConfig {
                duration: 0.0,
                max_alpha: 0.5,
            }),
            ..ShatterConfig::default()
        },
    ] {
        assert!(cfg.validate().is_err(), "{cfg:?}");
    }
}

#[test]
fn range_sample_stays_inside_and_collapsed_range_is_exact() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    let r = RangeF64::new(-2.0, 5.0);
    for _ in 0..200 {
        let v = r.sample(&mut rng);
        assert!((-2.0..=5.0).contains(&v));
    }
    assert_eq!(RangeF64::new(1.25, 1.25).sample(&mut rng), 1.25);
}

#[test]
fn glare_fades_out_and_stops() {
    let g = GlareConfig {
        duration: 0.6,
        max_alpha: 0.5,
    };
    assert_eq!(g.level_at(0.0), 0.5);
    assert!(g.level_at(0.3) < 0.5);
    assert!(g.level_at(0.3) > 0.0);
    assert_eq!(g.level_at(0.6), 0.0);
    assert_eq!(g.level_at(5.0), 0.0);
    assert_eq!(g.level_at(-1.0), 0.0);
}
