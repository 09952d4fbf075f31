use rand::Rng;

use crate::{
    animation::ease::Ease,
    foundation::error::{ShatterError, ShatterResult},
};

/// Closed interval `[min, max]` used for randomized plan parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangeF64 {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl RangeF64 {
    /// Build a range; bounds are checked by [`ShatterConfig::validate`].
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a uniform value from the range. A collapsed range returns `min`.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    fn validate(self, field: &str) -> ShatterResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ShatterError::invalid_input(format!(
                "{field} bounds must be finite"
            )));
        }
        if self.min > self.max {
            return Err(ShatterError::invalid_input(format!(
                "{field}.min must be <= {field}.max"
            )));
        }
        Ok(())
    }
}

/// How start delays are spread across the sweep window.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DelayMode {
    /// Independent uniform delay per fragment.
    #[default]
    Uniform,
    /// Delay grows with the centroid's distance from the shatter origin, so the break
    /// travels outward from the near side. `jitter` in `[0, 1]` mixes in uniform noise.
    Distance {
        /// Share of the sweep window given to random noise.
        jitter: f64,
    },
}

/// White flash applied to the shards right after a trigger.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GlareConfig {
    /// Flash length in seconds.
    pub duration: f64,
    /// Peak blend toward white in `[0, 1]`.
    pub max_alpha: f64,
}

impl Default for GlareConfig {
    fn default() -> Self {
        Self {
            duration: 0.6,
            max_alpha: 0.5,
        }
    }
}

impl GlareConfig {
    /// Glare level at `elapsed` seconds after session start.
    pub fn level_at(&self, elapsed: f64) -> f64 {
        if elapsed.is_nan() || elapsed < 0.0 || elapsed >= self.duration {
            return 0.0;
        }
        let remaining = 1.0 - elapsed / self.duration;
        (self.max_alpha * Ease::InOutQuad.apply(remaining)).clamp(0.0, 1.0)
    }
}

/// Tunables for one shatter transition. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ShatterConfig {
    /// Number of seed points (and thus fragments before any are dropped).
    pub fragment_count: usize,
    /// Rejection-sampling distance between seeds, in pixels.
    pub min_seed_separation: f64,
    /// Draws per seed before a too-close point is accepted anyway.
    pub max_sample_attempts: u32,
    /// Start delays lie in `[0, sweep_window]` seconds.
    pub sweep_window: f64,
    /// Distribution of start delays inside the sweep window.
    pub delay_mode: DelayMode,
    /// Bounds on each fragment's completion time (`start_delay + duration`), in seconds.
    pub duration_range: RangeF64,
    /// Final rotation in radians.
    pub rotation_range: RangeF64,
    /// Travel distance as a fraction of the image diagonal.
    pub travel_range: RangeF64,
    /// Final scale factor.
    pub scale_range: RangeF64,
    /// Final opacity in `[0, 1]`.
    pub final_opacity: f64,
    /// Curve for translation, rotation and scale.
    pub easing: Ease,
    /// Curve for the opacity fade.
    pub opacity_easing: Ease,
    /// Optional white flash at the start of the transition.
    pub glare: Option<GlareConfig>,
    /// Draw-time scale about each centroid; values below 1 open cracks between shards.
    pub crack_inset: f64,
    /// Fixed seed for reproducible sessions; `None` seeds from entropy per trigger.
    pub rng_seed: Option<u64>,
}

impl Default for ShatterConfig {
    fn default() -> Self {
        Self {
            fragment_count: 40,
            min_seed_separation: 6.0,
            max_sample_attempts: 30,
            sweep_window: 0.35,
            delay_mode: DelayMode::Uniform,
            duration_range: RangeF64::new(0.9, 1.6),
            rotation_range: RangeF64::new(-2.4, 2.4),
            travel_range: RangeF64::new(0.6, 1.3),
            scale_range: RangeF64::new(0.7, 1.0),
            final_opacity: 0.0,
            easing: Ease::OutCubic,
            opacity_easing: Ease::InQuad,
            glare: Some(GlareConfig::default()),
            crack_inset: 1.0,
            rng_seed: None,
        }
    }
}

impl ShatterConfig {
    /// Parse a (possibly partial) JSON object; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> ShatterResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| ShatterError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> ShatterResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ShatterError::serde(e.to_string()))
    }

    /// Check every field; failures are [`ShatterError::InvalidInput`].
    pub fn validate(&self) -> ShatterResult<()> {
        if self.fragment_count == 0 {
            return Err(ShatterError::invalid_input("fragment_count must be > 0"));
        }
        if !self.min_seed_separation.is_finite() || self.min_seed_separation < 0.0 {
            return Err(ShatterError::invalid_input(
                "min_seed_separation must be finite and >= 0",
            ));
        }
        if self.max_sample_attempts == 0 {
            return Err(ShatterError::invalid_input(
                "max_sample_attempts must be > 0",
            ));
        }
        if !self.sweep_window.is_finite() || self.sweep_window < 0.0 {
            return Err(ShatterError::invalid_input(
                "sweep_window must be finite and >= 0",
            ));
        }
        if let DelayMode::Distance { jitter } = self.delay_mode
            && !(0.0..=1.0).contains(&jitter)
        {
            return Err(ShatterError::invalid_input(
                "delay_mode.jitter must be in [0, 1]",
            ));
        }

        self.duration_range.validate("duration_range")?;
        self.rotation_range.validate("rotation_range")?;
        self.travel_range.validate("travel_range")?;
        self.scale_range.validate("scale_range")?;

        if self.duration_range.min <= 0.0 {
            return Err(ShatterError::invalid_input("duration_range.min must be > 0"));
        }
        if self.sweep_window >= self.duration_range.min {
            return Err(ShatterError::invalid_input(
                "sweep_window must be < duration_range.min",
            ));
        }
        if self.travel_range.min < 0.0 {
            return Err(ShatterError::invalid_input("travel_range.min must be >= 0"));
        }
        if self.scale_range.min < 0.0 {
            return Err(ShatterError::invalid_input("scale_range.min must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.final_opacity) {
            return Err(ShatterError::invalid_input(
                "final_opacity must be in [0, 1]",
            ));
        }
        if let Some(glare) = &self.glare {
            if !glare.duration.is_finite() || glare.duration <= 0.0 {
                return Err(ShatterError::invalid_input(
                    "glare.duration must be finite and > 0",
                ));
            }
            if !(0.0..=1.0).contains(&glare.max_alpha) {
                return Err(ShatterError::invalid_input(
                    "glare.max_alpha must be in [0, 1]",
                ));
            }
        }
        if !(self.crack_inset > 0.0 && self.crack_inset <= 1.0) {
            return Err(ShatterError::invalid_input("crack_inset must be in (0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
