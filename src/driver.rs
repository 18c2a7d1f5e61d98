//! Game loop driver
//!
//! Runs one simulation step per frame while the session is playing. The frame
//! source is abstracted behind [`FrameScheduler`]: the browser uses
//! `requestAnimationFrame`, tests and the native runner use [`VirtualClock`].
//! At most one frame is ever outstanding.

use std::time::Duration;

use crate::consts::SIM_HZ;
use crate::session::Session;
use crate::sim::GamePhase;

/// Source of frame callbacks
pub trait FrameScheduler {
    type Handle: Copy + PartialEq + std::fmt::Debug;

    /// Ask for one callback on the next frame. `None` if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;

    /// Withdraw a request that has not fired yet
    fn cancel_frame(&mut self, handle: Self::Handle);
}

pub struct LoopDriver<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    steps: u64,
}

impl<S: FrameScheduler> LoopDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            steps: 0,
        }
    }

    /// True while a frame is outstanding
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Steps run since creation
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Schedule the next frame unless one is already outstanding
    pub fn start(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = self.scheduler.request_frame();
        if self.pending.is_none() {
            log::warn!("Frame request refused; loop not started");
        }
    }

    /// Cancel the outstanding frame, if any. No step runs after this returns.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Run while playing, stop otherwise
    pub fn sync(&mut self, phase: GamePhase) {
        if phase == GamePhase::Playing {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Frame callback. Runs at most one step and reschedules only while the
    /// session keeps playing. Returns true if a step ran.
    pub fn on_frame(&mut self, session: &mut Session) -> bool {
        // A frame arriving after stop() belongs to a cancelled loop
        if self.pending.take().is_none() {
            return false;
        }
        if session.phase() != GamePhase::Playing {
            return false;
        }

        session.step();
        self.steps += 1;

        if session.phase() == GamePhase::Playing {
            self.start();
        }
        true
    }
}

/// Deterministic frame source ticking at [`SIM_HZ`]
#[derive(Debug, Default)]
pub struct VirtualClock {
    next_handle: u64,
    outstanding: Vec<u64>,
    frames: u64,
}

impl VirtualClock {
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    /// Virtual time elapsed over fired frames
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.frames as f64 / SIM_HZ as f64)
    }

    /// Fire the oldest outstanding frame
    fn fire(&mut self) -> Option<u64> {
        if self.outstanding.is_empty() {
            return None;
        }
        self.frames += 1;
        Some(self.outstanding.remove(0))
    }
}

impl FrameScheduler for VirtualClock {
    type Handle = u64;

    fn request_frame(&mut self) -> Option<u64> {
        self.next_handle += 1;
        self.outstanding.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u64) {
        self.outstanding.retain(|&h| h != handle);
    }
}

impl LoopDriver<VirtualClock> {
    /// Let up to `frames` virtual frames elapse. Returns the steps run.
    pub fn advance(&mut self, session: &mut Session, frames: u32) -> u32 {
        let mut stepped = 0;
        for _ in 0..frames {
            if self.scheduler.fire().is_none() {
                break;
            }
            if self.on_frame(session) {
                stepped += 1;
            }
        }
        stepped
    }
}
