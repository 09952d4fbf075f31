use std::sync::Arc;

use crate::{
    config::ShatterConfig,
    foundation::{
        core::{Fps, FrameIndex},
        error::{ShatterError, ShatterResult},
    },
    fragment::source::SourceImage,
    render::compositor::{Background, FrameDrawCommands, FrameRGBA},
    session::{
        transition::{ShatterOrigin, TransitionSession, build_session},
        worker::BackgroundBuilder,
    },
};

/// Lifecycle of the controller's current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum SessionState {
    #[default]
    Idle,
    /// A background build is in flight; ticks produce nothing.
    Building,
    Running,
    /// `Done` has been reported; the next tick returns to `Idle`.
    Complete,
}

/// Time source for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickTime {
    /// Controller clock set to this many seconds.
    Absolute(f64),
    /// Controller clock advanced by this many seconds.
    Delta(f64),
    /// Controller clock set to the start of `index` at `fps`.
    Frame { index: FrameIndex, fps: Fps },
}

/// What one tick produced.
#[derive(Clone, Debug, PartialEq)]
pub enum Tick {
    Idle,
    Building,
    Frame(FrameDrawCommands),
    /// Final frame of the session. Emitted once.
    Done(FrameDrawCommands),
}

impl Tick {
    pub fn commands(&self) -> Option<&FrameDrawCommands> {
        match self {
            Self::Frame(c) | Self::Done(c) => Some(c),
            Self::Idle | Self::Building => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// The one component a render loop talks to: triggers sessions and turns ticks into frames.
///
/// At most one session exists at a time. Triggering again drops the current session (or
/// cancels the pending background build) and starts fresh.
pub struct TransitionController {
    config: ShatterConfig,
    state: SessionState,
    session: Option<TransitionSession>,
    clock: f64,
    builder: BackgroundBuilder,
}

impl TransitionController {
    pub fn new(config: ShatterConfig) -> ShatterResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::Idle,
            session: None,
            clock: 0.0,
            builder: BackgroundBuilder::new(),
        })
    }

    pub fn config(&self) -> &ShatterConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    /// Controller clock in seconds, as last set or advanced by a tick.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Seconds since the current session started.
    pub fn elapsed(&self) -> Option<f64> {
        self.session.as_ref().map(|s| self.clock - s.start())
    }

    /// Build a session synchronously and start running it at the current clock.
    ///
    /// On error nothing changes: the previous session (if any) keeps running.
    #[tracing::instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn trigger(&mut self, source: &SourceImage, origin: ShatterOrigin) -> ShatterResult<()> {
        let seed = self.next_seed();
        let session = build_session(source, &self.config, origin, seed)?;
        self.builder.cancel();
        self.install(session);
        Ok(())
    }

    /// Build a session on a worker thread. The controller is `Building` until a tick picks up
    /// the result; triggering again cancels the pending build.
    #[tracing::instrument(skip(self, source), fields(width = source.width(), height = source.height()))]
    pub fn trigger_in_background(
        &mut self,
        source: Arc<SourceImage>,
        origin: ShatterOrigin,
    ) -> ShatterResult<()> {
        origin.resolve(source.canvas().rect())?;
        let seed = self.next_seed();
        let generation = self
            .builder
            .spawn(source, self.config.clone(), origin, seed)?;
        tracing::debug!(generation, "background build started");
        self.session = None;
        self.set_state(SessionState::Building);
        Ok(())
    }

    /// Block until the pending background build lands. No-op unless `Building`.
    pub fn wait_for_build(&mut self) -> ShatterResult<()> {
        if self.state != SessionState::Building {
            return Ok(());
        }
        match self.builder.wait() {
            Some(Ok(session)) => {
                self.install(session);
                Ok(())
            }
            Some(Err(err)) => {
                self.set_state(SessionState::Idle);
                Err(err)
            }
            None => {
                self.set_state(SessionState::Idle);
                Ok(())
            }
        }
    }

    /// Advance the clock and produce this frame's draw commands.
    pub fn tick(&mut self, time: TickTime) -> Tick {
        self.advance(time);
        match self.state {
            SessionState::Idle => Tick::Idle,
            SessionState::Building => match self.builder.poll() {
                None if self.builder.is_pending() => Tick::Building,
                None => {
                    self.set_state(SessionState::Idle);
                    Tick::Idle
                }
                Some(Ok(session)) => {
                    self.install(session);
                    self.frame()
                }
                Some(Err(err)) => {
                    tracing::warn!(%err, "background build failed");
                    self.set_state(SessionState::Idle);
                    Tick::Idle
                }
            },
            SessionState::Running => self.frame(),
            SessionState::Complete => {
                self.session = None;
                self.set_state(SessionState::Idle);
                Tick::Idle
            }
        }
    }

    /// [`TransitionController::tick`] plus compositing into `target`.
    ///
    /// `target` is left untouched on ticks without draw commands. Render failures are logged.
    pub fn tick_into(
        &mut self,
        time: TickTime,
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> Tick {
        let tick = self.tick(time);
        if let Some(cmds) = tick.commands()
            && let Err(err) = self.render(cmds, background, target)
        {
            tracing::warn!(%err, "frame render failed");
        }
        tick
    }

    /// Composite draw commands from the current session.
    pub fn render(
        &self,
        cmds: &FrameDrawCommands,
        background: &Background<'_>,
        target: &mut FrameRGBA,
    ) -> ShatterResult<()> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| ShatterError::render("no session to render"))?;
        session.render_commands(cmds, background, target)
    }

    fn frame(&mut self) -> Tick {
        let Some(session) = self.session.as_ref() else {
            self.set_state(SessionState::Idle);
            return Tick::Idle;
        };
        let elapsed = self.clock - session.start();
        let cmds = session.draw_commands_at(elapsed);
        if session.is_complete_at(elapsed) {
            self.set_state(SessionState::Complete);
            Tick::Done(cmds)
        } else {
            Tick::Frame(cmds)
        }
    }

    fn install(&mut self, mut session: TransitionSession) {
        session.set_start(self.clock);
        tracing::debug!(
            seed = session.seed(),
            fragments = session.fragments().len(),
            start = self.clock,
            "session installed"
        );
        self.session = Some(session);
        self.set_state(SessionState::Running);
    }

    fn advance(&mut self, time: TickTime) {
        let next = match time {
            TickTime::Absolute(t) => t,
            TickTime::Delta(d) => self.clock + d,
            TickTime::Frame { index, fps } => fps.frames_to_secs(index.0),
        };
        if next.is_finite() {
            self.clock = next;
        } else {
            tracing::warn!(?time, "ignoring non-finite tick time");
        }
    }

    fn next_seed(&self) -> u64 {
        self.config.rng_seed.unwrap_or_else(rand::random)
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "session state");
            self.state = next;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
