use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    animation::ease::Ease,
    config::{DelayMode, RangeF64, ShatterConfig},
    foundation::core::{Point, Rect, Vec2},
    fragment::extract::Fragment,
};

/// Immutable per-fragment trajectory, evaluated by [`crate::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionPlan {
    /// Seconds after session start before the fragment moves.
    pub start_delay: f64,
    /// Seconds from the first movement to the final state; always > 0.
    pub duration: f64,
    /// Final offset of the centroid in pixels.
    pub translation: Vec2,
    /// Final rotation about the centroid in radians.
    pub rotation: f64,
    /// Final uniform scale about the centroid.
    pub final_scale: f64,
    /// Final opacity in `[0, 1]`.
    pub final_opacity: f64,
    /// Curve for translation, rotation and scale.
    pub easing: Ease,
    /// Curve for opacity.
    pub opacity_easing: Ease,
}

impl MotionPlan {
    /// Session-relative time at which the fragment reaches its final state.
    pub fn end_time(&self) -> f64 {
        self.start_delay + self.duration
    }
}

/// Assigns trajectories that fly radially away from a shatter origin.
#[derive(Clone, Debug)]
pub struct MotionPlanner {
    origin: Point,
    max_distance: f64,
    sweep_window: f64,
    delay_mode: DelayMode,
    duration_range: RangeF64,
    rotation_range: RangeF64,
    travel_px: RangeF64,
    scale_range: RangeF64,
    final_opacity: f64,
    easing: Ease,
    opacity_easing: Ease,
}

impl MotionPlanner {
    /// `bounds` is the shattered image rectangle; travel distances scale with its diagonal.
    pub fn new(config: &ShatterConfig, origin: Point, bounds: Rect) -> Self {
        let diagonal = bounds.width().hypot(bounds.height());
        let max_distance = [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ]
        .iter()
        .map(|c| c.distance(origin))
        .fold(0.0_f64, f64::max);

        Self {
            origin,
            max_distance,
            sweep_window: config.sweep_window,
            delay_mode: config.delay_mode,
            duration_range: config.duration_range,
            rotation_range: config.rotation_range,
            travel_px: RangeF64::new(
                config.travel_range.min * diagonal,
                config.travel_range.max * diagonal,
            ),
            scale_range: config.scale_range,
            final_opacity: config.final_opacity,
            easing: config.easing,
            opacity_easing: config.opacity_easing,
        }
    }

    /// Plan one fragment. The same fragment and seed always give the same plan.
    pub fn plan(&self, fragment: &Fragment, seed: u64) -> MotionPlan {
        let mut rng = StdRng::seed_from_u64(seed);
        let away = fragment.centroid - self.origin;

        let start_delay = self.start_delay(away.hypot(), &mut rng);
        // Completion time comes from `duration_range`; it always lands after the sweep window.
        let end = self.duration_range.sample(&mut rng);
        let mut duration = (end - start_delay).max(f64::EPSILON);
        if start_delay + duration > end && duration > f64::EPSILON {
            duration = duration.next_down();
        }

        let direction = if away.hypot() > 1e-9 {
            away / away.hypot()
        } else {
            Vec2::from_angle(rng.gen_range(0.0..std::f64::consts::TAU))
        };
        let translation = direction * self.travel_px.sample(&mut rng);

        MotionPlan {
            start_delay,
            duration,
            translation,
            rotation: self.rotation_range.sample(&mut rng),
            final_scale: self.scale_range.sample(&mut rng),
            final_opacity: self.final_opacity,
            easing: self.easing,
            opacity_easing: self.opacity_easing,
        }
    }

    fn start_delay(&self, distance: f64, rng: &mut StdRng) -> f64 {
        let u: f64 = rng.gen_range(0.0..=1.0);
        let share = match self.delay_mode {
            DelayMode::Uniform => u,
            DelayMode::Distance { jitter } => {
                let near_to_far = if self.max_distance > 0.0 {
                    (distance / self.max_distance).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                (1.0 - jitter) * near_to_far + jitter * u
            }
        };
        (self.sweep_window * share).clamp(0.0, self.sweep_window)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/plan.rs"]
mod tests;
