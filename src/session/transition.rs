use crate::{
    config::{GlareConfig, ShatterConfig},
    foundation::{
        core::{Point, Rect},
        error::{ShatterError, ShatterResult},
        math::derive_seed,
    },
    fragment::{
        extract::{Fragment, extract_all},
        source::SourceImage,
    },
    geometry::{
        partition::build,
        sampler::{SampleParams, generate},
    },
    motion::{
        plan::{MotionPlan, MotionPlanner},
        state::{MotionState, evaluate},
    },
    render::compositor::{Background, Compositor, FrameDrawCommands, FrameRGBA},
};

/// Where the shatter originates; fragments fly radially away from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ShatterOrigin {
    /// Center of the source image.
    #[default]
    Center,
    /// A point in source-image pixel coordinates, e.g. a pointer click.
    Point(Point),
}

impl ShatterOrigin {
    /// Resolve against the image rectangle. Non-finite points are rejected.
    pub fn resolve(self, rect: Rect) -> ShatterResult<Point> {
        match self {
            Self::Center => Ok(rect.center()),
            Self::Point(p) if p.x.is_finite() && p.y.is_finite() => Ok(p),
            Self::Point(p) => Err(ShatterError::invalid_input(format!(
                "shatter origin must be finite, got ({}, {})",
                p.x, p.y
            ))),
        }
    }
}

/// Everything built for one trigger: seeds, fragments and their plans.
///
/// Immutable once built; every query is a pure function of session-relative time, so any
/// offset can be scrubbed to without replaying earlier frames.
#[derive(Clone, Debug)]
pub struct TransitionSession {
    seed: u64,
    seeds: Vec<Point>,
    fragments: Vec<Fragment>,
    plans: Vec<MotionPlan>,
    origin: Point,
    rect: Rect,
    start: f64,
    end_time: f64,
    glare: Option<GlareConfig>,
    compositor: Compositor,
}

impl TransitionSession {
    /// Session seed all randomness was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn seeds(&self) -> &[Point] {
        &self.seeds
    }

    /// Surviving fragments, in draw order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// One plan per fragment, same order as [`TransitionSession::fragments`].
    pub fn plans(&self) -> &[MotionPlan] {
        &self.plans
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The shattered image rectangle.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Controller clock time at which the session started running.
    pub fn start(&self) -> f64 {
        self.start
    }

    pub(crate) fn set_start(&mut self, start: f64) {
        self.start = start;
    }

    /// Latest `start_delay + duration` over all plans.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn is_complete_at(&self, elapsed: f64) -> bool {
        elapsed >= self.end_time
    }

    pub fn states_at(&self, elapsed: f64) -> Vec<MotionState> {
        self.plans.iter().map(|p| evaluate(p, elapsed)).collect()
    }

    pub fn glare_at(&self, elapsed: f64) -> f64 {
        self.glare.map_or(0.0, |g| g.level_at(elapsed))
    }

    pub fn draw_commands_at(&self, elapsed: f64) -> FrameDrawCommands {
        let states = self.states_at(elapsed);
        self.compositor
            .place(&self.fragments, &states, elapsed, self.glare_at(elapsed))
    }

    /// Composite the frame at `elapsed` into `target`.
    pub fn render_at(
        &self,
        elapsed: f64,
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> ShatterResult<()> {
        let cmds = self.draw_commands_at(elapsed);
        self.compositor
            .render_commands(&self.fragments, &cmds, background, target)
    }

    /// Composite previously produced draw commands into `target`.
    pub fn render_commands(
        &self,
        cmds: &FrameDrawCommands,
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> ShatterResult<()> {
        self.compositor
            .render_commands(&self.fragments, cmds, background, target)
    }
}

/// Run sampling, partitioning, extraction and planning for one trigger.
///
/// Only malformed top-level input fails; cells that collapse or fall outside the image are
/// dropped along the way. The returned session starts at clock time 0.
#[tracing::instrument(
    skip(source, config),
    fields(width = source.width(), height = source.height(), fragments = config.fragment_count)
)]
pub fn build_session(
    source: &SourceImage,
    config: &ShatterConfig,
    origin: ShatterOrigin,
    seed: u64,
) -> ShatterResult<TransitionSession> {
    config.validate()?;
    let rect = source.canvas().rect();
    let origin = origin.resolve(rect)?;

    let seeds = generate(SampleParams {
        width: rect.width(),
        height: rect.height(),
        count: config.fragment_count,
        min_separation: config.min_seed_separation,
        max_attempts: config.max_sample_attempts,
        rng_seed: derive_seed(seed, b"seeds", 0),
    })?;
    let cells = build(&seeds, rect)?;
    let fragments = extract_all(cells, source);
    if fragments.is_empty() {
        return Err(ShatterError::invalid_input(
            "no fragments survived partitioning",
        ));
    }

    let planner = MotionPlanner::new(config, origin, rect);
    let plans: Vec<MotionPlan> = fragments
        .iter()
        .map(|f| planner.plan(f, derive_seed(seed, b"plan", f.index as u64)))
        .collect();
    let end_time = plans
        .iter()
        .map(MotionPlan::end_time)
        .fold(0.0_f64, f64::max);

    tracing::debug!(
        fragments = fragments.len(),
        dropped = seeds.len().saturating_sub(fragments.len()),
        end_time,
        "session built"
    );
    Ok(TransitionSession {
        seed,
        seeds,
        fragments,
        plans,
        origin,
        rect,
        start: 0.0,
        end_time,
        glare: config.glare,
        compositor: Compositor::new(config.crack_inset),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/transition.rs"]
mod tests;
