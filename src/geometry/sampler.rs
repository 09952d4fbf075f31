use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::foundation::{
    core::Point,
    error::{ShatterError, ShatterResult},
};

/// Parameters for [`generate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleParams {
    pub width: f64,
    pub height: f64,
    pub count: usize,
    pub min_separation: f64,
    /// Draws per point before the last candidate is accepted regardless of spacing.
    pub max_attempts: u32,
    pub rng_seed: u64,
}

/// Rejection-sample `count` seed points inside `[0, width) x [0, height)`.
///
/// Each point gets at most `max_attempts` draws; if none is far enough from the points already
/// accepted, the last draw is kept so the loop always terminates. Output order is the order
/// of acceptance and is fully determined by the parameters.
#[tracing::instrument(level = "debug")]
pub fn generate(params: SampleParams) -> ShatterResult<Vec<Point>> {
    let SampleParams {
        width,
        height,
        count,
        min_separation,
        max_attempts,
        rng_seed,
    } = params;

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(ShatterError::invalid_input(
            "sampling area must have finite, positive width and height",
        ));
    }
    if count == 0 {
        return Err(ShatterError::invalid_input("seed count must be > 0"));
    }

    let mut rng = StdRng::seed_from_u64(rng_seed);
    let min_sq = min_separation.max(0.0).powi(2);
    let attempts = max_attempts.max(1);
    let mut points: Vec<Point> = Vec::with_capacity(count);
    let mut forced = 0usize;

    for _ in 0..count {
        let mut candidate = Point::ZERO;
        let mut placed = false;
        for _ in 0..attempts {
            candidate = Point::new(rng.gen_range(0.0..width), rng.gen_range(0.0..height));
            if points
                .iter()
                .all(|p| p.distance_squared(candidate) >= min_sq)
            {
                placed = true;
                break;
            }
        }
        if !placed {
            forced += 1;
        }
        points.push(candidate);
    }

    if forced > 0 {
        tracing::debug!(
            forced,
            count,
            min_separation,
            "seed spacing relaxed after exhausting sample attempts"
        );
    }
    Ok(points)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/sampler.rs"]
mod tests;
