/// Frame loop state machine with explicit, cancellable frame handles
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::projection::Camera;
use crate::shape::{FrameStats, ShapeState};
use crate::surface::Surface;
use crate::transform::{Axis, RotationSpeed};

/// Identifies one requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-side source of frame callbacks
///
/// `request_frame` asks the host to invoke the driver's tick once, later.
/// A cancelled handle must never be delivered.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic in-process scheduler
///
/// Frames are delivered in request order by whoever calls [`FrameQueue::pop_due`].
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the oldest pending frame, if any
    pub fn pop_due(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> Result<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Paused,
}

/// Owns the rotation speed and the pending frame of the animation loop
#[derive(Debug)]
pub struct AnimationDriver {
    state: DriverState,
    speed: RotationSpeed,
    pending: Option<FrameHandle>,
    ticks: u64,
}

impl AnimationDriver {
    pub fn new(speed: RotationSpeed) -> Self {
        Self {
            state: DriverState::Paused,
            speed,
            pending: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn speed(&self) -> RotationSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, axis: Axis, value: f64) {
        self.speed.set(axis, value);
    }

    pub fn set_speeds(&mut self, speed: RotationSpeed) {
        self.speed = speed;
    }

    /// The frame this driver is waiting on
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Total ticks run since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Enter Running and request the first frame
    pub fn start<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<()> {
        if self.is_running() && self.pending.is_some() {
            return Ok(());
        }
        self.pending = Some(scheduler.request_frame()?);
        self.state = DriverState::Running;
        debug!(ticks = self.ticks, "animation running");
        Ok(())
    }

    /// Run one frame if `handle` is the one this driver is waiting on
    ///
    /// Returns `Ok(None)` for stale or cancelled handles. If the next frame
    /// cannot be requested the driver drops to Paused and returns the error.
    pub fn tick<S, F>(
        &mut self,
        handle: FrameHandle,
        shape: &mut ShapeState,
        camera: &Camera,
        surface: &mut S,
        scheduler: &mut F,
    ) -> Result<Option<FrameStats>>
    where
        S: Surface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if !self.is_running() || self.pending != Some(handle) {
            trace!(?handle, "ignoring stale frame");
            return Ok(None);
        }
        self.pending = None;

        shape.advance(&self.speed);
        let stats = shape.render(camera, surface);
        self.ticks += 1;
        trace!(tick = self.ticks, drawn = stats.drawn, culled = stats.culled, "frame");

        match scheduler.request_frame() {
            Ok(next) => {
                self.pending = Some(next);
                Ok(Some(stats))
            }
            Err(err) => {
                // No frame is coming; a later resume has to re-request
                self.state = DriverState::Paused;
                warn!(%err, "could not request next frame, pausing");
                Err(err)
            }
        }
    }

    /// View hidden: cancel the pending frame and stop
    pub fn pause<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        if self.is_running() {
            debug!(ticks = self.ticks, "animation paused");
        }
        self.state = DriverState::Paused;
    }

    /// View visible again: restart unless already running
    pub fn resume<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> Result<()> {
        self.start(scheduler)
    }

    /// Cancel any pending frame; safe to call more than once
    pub fn teardown<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        self.pause(scheduler);
    }
}
