//! Frame scheduler
//!
//! Drives the simulation from host animation callbacks: one tick per frame
//! while the session is active, a final draw once it is over. At most one
//! frame request is outstanding at any time, and cancelling it (or dropping
//! the scheduler) leaves nothing behind that could fire into a torn-down
//! surface.

use std::fmt;

use crate::config::{ConfigError, EngineConfig};
use crate::sim::autopilot;
use crate::sim::{GameState, InputEvent, RenderSnapshot, TickInput, TickReport, tick};

/// Source of animation callbacks (`requestAnimationFrame` in the browser)
pub trait FrameHost {
    type Handle: Copy + PartialEq + fmt::Debug;

    /// Ask for one callback. `None` if the host cannot schedule one.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Withdraw a previously requested callback
    fn cancel_frame(&mut self, handle: Self::Handle);
}

impl<H: FrameHost + ?Sized> FrameHost for &mut H {
    type Handle = H::Handle;

    fn request_frame(&mut self) -> Option<Self::Handle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: Self::Handle) {
        (**self).cancel_frame(handle)
    }
}

/// Consumer of render snapshots
pub trait Renderer {
    fn draw(&mut self, snapshot: &RenderSnapshot);
}

impl<F: FnMut(&RenderSnapshot)> Renderer for F {
    fn draw(&mut self, snapshot: &RenderSnapshot) {
        self(snapshot)
    }
}

/// Outcome of a frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Ticked, drew, and requested the next frame
    Continue,
    /// Drew a final frame and requested nothing further
    Stopped,
    /// No frame was pending (stale callback after cancel); nothing happened
    Ignored,
}

/// Cooperative frame loop around one [`GameState`]
pub struct FrameScheduler<H: FrameHost> {
    state: GameState,
    input: TickInput,
    autopilot: bool,
    host: H,
    pending: Option<H::Handle>,
    last_report: TickReport,
}

impl<H: FrameHost> FrameScheduler<H> {
    pub fn new(config: EngineConfig, seed: u64, now_ms: f64, host: H) -> Result<Self, ConfigError> {
        Ok(Self {
            state: GameState::new(config, seed, now_ms)?,
            input: TickInput::default(),
            autopilot: false,
            host,
            pending: None,
            last_report: TickReport::default(),
        })
    }

    /// Request the first frame. Returns whether a frame is now pending.
    pub fn start(&mut self) -> bool {
        if self.pending.is_none() && !self.state.is_over() {
            self.request();
        }
        self.pending.is_some()
    }

    fn request(&mut self) {
        self.pending = self.host.request_frame();
        if self.pending.is_none() {
            log::warn!("host refused a frame request; loop stopped");
        }
    }

    /// Queue an input event for the next tick. Ignored once the session is over.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.state.is_over() {
            log::debug!("input {:?} ignored: session over", event);
            return false;
        }
        self.input.push(event);
        true
    }

    /// Animation callback at host time `now_ms`
    pub fn on_frame<R: Renderer + ?Sized>(&mut self, now_ms: f64, renderer: &mut R) -> FrameStatus {
        if self.pending.take().is_none() {
            log::warn!("stale frame callback at {now_ms:.1} ms ignored");
            return FrameStatus::Ignored;
        }

        let input = if self.autopilot {
            autopilot::plan(&self.state)
        } else {
            std::mem::take(&mut self.input)
        };
        self.input.clear();

        self.last_report = tick(&mut self.state, &input, now_ms);
        renderer.draw(&self.snapshot());

        if self.state.is_over() {
            log::info!("final frame drawn, score {}", self.state.score());
            return FrameStatus::Stopped;
        }

        self.request();
        if self.pending.is_some() {
            FrameStatus::Continue
        } else {
            FrameStatus::Stopped
        }
    }

    /// Fresh session at `now_ms`, restarting the loop if it had stopped
    pub fn reset(&mut self, now_ms: f64) {
        self.state.reset(now_ms);
        self.input.clear();
        self.last_report = TickReport::default();
        self.start();
    }

    /// Withdraw the pending frame, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
            log::debug!("frame {:?} cancelled", handle);
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::from_state(&self.state)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Report from the most recent tick
    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
        log::info!("autopilot: {}", on);
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.set_autopilot(!self.autopilot);
        self.autopilot
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: FrameHost> Drop for FrameScheduler<H> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Host whose frames are delivered by the caller (headless runs and tests)
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    outstanding: Option<u64>,
    requests: u64,
    cancellations: u64,
    refuse: bool,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The request waiting to be delivered
    pub fn outstanding(&self) -> Option<u64> {
        self.outstanding
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }

    /// Make every following request fail
    pub fn refuse_requests(&mut self, refuse: bool) {
        self.refuse = refuse;
    }
}

impl FrameHost for ManualFrames {
    type Handle = u64;

    fn request_frame(&mut self) -> Option<u64> {
        if self.refuse {
            return None;
        }
        self.next_id += 1;
        self.requests += 1;
        self.outstanding = Some(self.next_id);
        Some(self.next_id)
    }

    fn cancel_frame(&mut self, handle: u64) {
        if self.outstanding == Some(handle) {
            self.outstanding = None;
            self.cancellations += 1;
        }
    }
}
