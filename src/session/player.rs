use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, GridSpec, Rgba8};
use crate::foundation::error::{PlaybackError, PlaybackResult};
use crate::generator::Generator;
use crate::instruction::DrawInstruction;
use crate::render::{FrameRGBA, Palette, RectRenderer, Surface, SurfaceDesc};
use crate::session::pacer::{FramePacer, PacingOpts};
use crate::session::stop::{StopHandle, StopSignal, stop_channel};

/// Options for [`PlaybackSession::new`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionOpts {
    /// Grid addressed by instructions; also sizes the surface.
    pub grid: GridSpec,
    /// Fill and stroke colors.
    pub palette: Palette,
    /// Inter-frame pacing for [`PlaybackSession::run`].
    pub pacing: PacingOpts,
    /// Initial surface color.
    pub clear: Rgba8,
}

/// Lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// Constructed; `create()` not yet called.
    Idle,
    /// Started; ticks fetch and render instructions.
    Running,
    /// Terminal. No further generator calls or renders.
    Stopped,
}

/// Why a session entered [`PlayerState::Stopped`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The generator produced the sentinel.
    Sentinel,
    /// [`PlaybackSession::stop`] or a [`StopHandle`] was used.
    StopRequest,
    /// A generator or sink call failed.
    Error,
}

/// Counters reported by a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Ticks that rendered an instruction. The initial `create()` render is not a tick.
    pub ticks: u64,
    /// Instructions rendered, including the initial one.
    pub rendered: u64,
    /// Set once the session stops.
    pub stopped_by: Option<StopReason>,
}

/// Result of one [`PlaybackSession::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The instruction was rendered; another tick should be scheduled.
    Rendered(DrawInstruction),
    /// The session is stopped; schedule nothing.
    Stopped,
}

/// Sink that discards frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSink;

impl FrameSink for NoSink {
    fn begin(&mut self, _cfg: SinkConfig) -> PlaybackResult<()> {
        Ok(())
    }

    fn push_frame(&mut self, _idx: FrameIndex, _frame: &FrameRGBA) -> PlaybackResult<()> {
        Ok(())
    }

    fn wants_frames(&self) -> bool {
        false
    }

    fn end(&mut self) -> PlaybackResult<()> {
        Ok(())
    }
}

impl FrameSink for Box<dyn FrameSink> {
    fn begin(&mut self, cfg: SinkConfig) -> PlaybackResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> PlaybackResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn wants_frames(&self) -> bool {
        (**self).wants_frames()
    }

    fn end(&mut self) -> PlaybackResult<()> {
        (**self).end()
    }
}

/// One playback of a generator onto a surface.
///
/// The session owns its generator, surface and sink. Instructions are rendered strictly in
/// generation order, one per tick; the sentinel is never rendered. After entering
/// [`PlayerState::Stopped`] the generator is never called again.
pub struct PlaybackSession<G, K = NoSink> {
    generator: G,
    surface: Surface,
    renderer: RectRenderer,
    sink: K,
    sink_open: bool,
    pacing: PacingOpts,
    state: PlayerState,
    stats: PlaybackStats,
    next_frame: FrameIndex,
    stop_handle: StopHandle,
    stop_signal: StopSignal,
}

impl<G: Generator> PlaybackSession<G> {
    /// Acquire the surface and build a session that discards frames.
    pub fn new(generator: G, opts: SessionOpts) -> PlaybackResult<Self> {
        Self::with_sink(generator, opts, NoSink)
    }
}

impl<G: Generator, K: FrameSink> PlaybackSession<G, K> {
    /// Acquire the surface and build a session that pushes every rendered frame to `sink`.
    ///
    /// Fails with [`PlaybackError::SurfaceUnavailable`] before anything is rendered.
    pub fn with_sink(generator: G, opts: SessionOpts, sink: K) -> PlaybackResult<Self> {
        opts.grid.validate()?;
        opts.pacing.refresh_period()?;
        let surface = Surface::acquire(SurfaceDesc::for_grid(&opts.grid), opts.clear)?;
        let (stop_handle, stop_signal) = stop_channel();
        Ok(Self {
            generator,
            surface,
            renderer: RectRenderer::new(opts.grid.scale, opts.palette),
            sink,
            sink_open: false,
            pacing: opts.pacing,
            state: PlayerState::Idle,
            stats: PlaybackStats::default(),
            next_frame: FrameIndex(0),
            stop_handle,
            stop_signal,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Counters so far.
    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    /// The drawing surface.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The frame sink.
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consume the session, returning its sink.
    pub fn into_sink(self) -> K {
        self.sink
    }

    /// Handle that stops this session from another task.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Fetch the first instruction via `create()` and render it immediately.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self) -> PlaybackResult<()> {
        if self.state != PlayerState::Idle {
            return Err(PlaybackError::validation(format!(
                "session cannot start from {:?}",
                self.state
            )));
        }

        let cfg = SinkConfig {
            width: self.surface.width(),
            height: self.surface.height(),
            frame_delay: self.pacing.frame_delay(),
        };
        let begun = self.sink.begin(cfg);
        self.guard(begun)?;
        self.sink_open = true;

        let first = self.generator.create();
        let first = self.guard(first)?;
        self.render(&first)?;
        self.state = PlayerState::Running;
        tracing::debug!(?first, "session started");
        Ok(())
    }

    /// One iteration: fetch the next instruction, then render it or stop on the sentinel.
    ///
    /// A pending stop request is honored before the generator is called.
    pub fn tick(&mut self) -> PlaybackResult<TickOutcome> {
        match self.state {
            PlayerState::Idle => {
                return Err(PlaybackError::validation("tick before start"));
            }
            PlayerState::Stopped => return Ok(TickOutcome::Stopped),
            PlayerState::Running => {}
        }
        if self.stop_signal.is_stopped() {
            self.finish(StopReason::StopRequest)?;
            return Ok(TickOutcome::Stopped);
        }

        let next = self.generator.next();
        let instr = self.guard(next)?;
        if instr.is_sentinel() {
            self.finish(StopReason::Sentinel)?;
            return Ok(TickOutcome::Stopped);
        }

        self.render(&instr)?;
        self.stats.ticks += 1;
        tracing::debug!(tick = self.stats.ticks, ?instr, "rendered");
        Ok(TickOutcome::Rendered(instr))
    }

    /// Stop now. Idempotent; a stopped session stays stopped.
    pub fn stop(&mut self) -> PlaybackResult<()> {
        self.stop_handle.stop();
        if self.state == PlayerState::Stopped {
            return Ok(());
        }
        self.finish(StopReason::StopRequest)
    }

    /// Start (if idle) and tick until stopped, pacing ticks with [`FramePacer`].
    ///
    /// The first tick follows the initial render immediately. A stop request abandons the pending
    /// wait.
    #[tracing::instrument(skip(self))]
    pub async fn run(&mut self) -> PlaybackResult<PlaybackStats> {
        let pacer = FramePacer::new(&self.pacing)?;
        let mut stop = self.stop_signal.clone();
        if !self.begin_run()? {
            return Ok(self.stats);
        }

        while let TickOutcome::Rendered(_) = self.tick()? {
            tokio::select! {
                biased;
                _ = stop.stopped() => {
                    self.finish(StopReason::StopRequest)?;
                    break;
                }
                _ = pacer.wait() => {}
            }
        }
        Ok(self.stats)
    }

    /// Start (if idle) and tick until stopped without waiting between ticks.
    #[tracing::instrument(skip(self))]
    pub fn run_unpaced(&mut self) -> PlaybackResult<PlaybackStats> {
        if !self.begin_run()? {
            return Ok(self.stats);
        }
        while let TickOutcome::Rendered(_) = self.tick()? {}
        Ok(self.stats)
    }

    /// Returns `false` when the session is already stopped.
    fn begin_run(&mut self) -> PlaybackResult<bool> {
        if self.state == PlayerState::Idle {
            if self.stop_signal.is_stopped() {
                self.finish(StopReason::StopRequest)?;
                return Ok(false);
            }
            self.start()?;
        }
        Ok(self.state == PlayerState::Running)
    }

    fn render(&mut self, instr: &DrawInstruction) -> PlaybackResult<()> {
        self.renderer.render(instr, &mut self.surface);
        self.stats.rendered += 1;
        let idx = self.next_frame;
        self.next_frame = idx.next();
        if !self.sink.wants_frames() {
            return Ok(());
        }
        let frame = self.surface.snapshot();
        let pushed = self.sink.push_frame(idx, &frame);
        self.guard(pushed)
    }

    fn finish(&mut self, reason: StopReason) -> PlaybackResult<()> {
        self.state = PlayerState::Stopped;
        self.stats.stopped_by = Some(reason);
        tracing::info!(
            ?reason,
            ticks = self.stats.ticks,
            rendered = self.stats.rendered,
            "session stopped"
        );
        if self.sink_open {
            self.sink_open = false;
            self.sink.end()?;
        }
        Ok(())
    }

    /// Stop the session on error, leaving the sink unfinished.
    fn guard<T>(&mut self, res: PlaybackResult<T>) -> PlaybackResult<T> {
        if let Err(err) = &res {
            tracing::error!(error = %err, "session failed");
            self.state = PlayerState::Stopped;
            self.stats.stopped_by = Some(StopReason::Error);
            self.sink_open = false;
        }
        res
    }
}
