use crate::{
    foundation::core::{Point, Transform2D, Vec2},
    motion::plan::MotionPlan,
};

/// Current transform of one fragment, relative to its resting pose.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionState {
    /// Translation of the centroid in pixels.
    pub offset: Vec2,
    /// Rotation about the centroid in radians.
    pub rotation: f64,
    /// Uniform scale about the centroid.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

impl MotionState {
    /// Original position, identity rotation and scale, full opacity.
    pub const REST: Self = Self {
        offset: Vec2::ZERO,
        rotation: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    /// The state a plan settles in once it has finished.
    pub fn target(plan: &MotionPlan) -> Self {
        Self {
            offset: plan.translation,
            rotation: plan.rotation,
            scale: plan.final_scale,
            opacity: plan.final_opacity,
        }
    }

    /// Transform mapping source-image space to screen space for a fragment at `centroid`.
    pub fn to_transform(self, centroid: Point) -> Transform2D {
        Transform2D {
            translate: self.offset,
            rotation_rad: self.rotation,
            scale: Vec2::new(self.scale, self.scale),
            anchor: centroid.to_vec2(),
        }
    }
}

/// Evaluate `plan` at `elapsed` seconds since session start.
///
/// Pure in both arguments: before the start delay the fragment rests, at or after
/// `plan.end_time()` it is exactly at its target, and in between every channel is blended by
/// its easing curve.
pub fn evaluate(plan: &MotionPlan, elapsed: f64) -> MotionState {
    if elapsed.is_nan() || elapsed < plan.start_delay {
        return MotionState::REST;
    }
    if elapsed >= plan.end_time() {
        return MotionState::target(plan);
    }

    let t = ((elapsed - plan.start_delay) / plan.duration).clamp(0.0, 1.0);
    let rest = MotionState::REST;
    let ease = plan.easing;
    MotionState {
        offset: Vec2::new(
            ease.blend(rest.offset.x, plan.translation.x, t),
            ease.blend(rest.offset.y, plan.translation.y, t),
        ),
        rotation: ease.blend(rest.rotation, plan.rotation, t),
        scale: ease.blend(rest.scale, plan.final_scale, t),
        opacity: plan
            .opacity_easing
            .blend(rest.opacity, plan.final_opacity, t),
    }
}

/// Whether `plan` has reached its final state at `elapsed`.
pub fn is_finished(plan: &MotionPlan, elapsed: f64) -> bool {
    elapsed >= plan.end_time()
}

#[cfg(test)]
#[path = "../../tests/unit/motion/state.rs"]
mod tests;
