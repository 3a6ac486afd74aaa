//! Cancellable repeating-task state, independent of the scheduler.
//!
//! A host (a tokio interval, `requestAnimationFrame`, a test) owns the
//! actual scheduling. [`FrameLoop`] only decides whether a callback that
//! fires is still allowed to emit a frame:
//!
//! ```text
//! start() ──► token #n ──► tick(#n) = Some(FrameTick)
//! stop()  ──────────────► tick(#n) = None   (late callbacks are inert)
//! start() ──► token #n+1
//! ```

use serde::{Deserialize, Serialize};

/// Identifies one start/stop cycle of a [`FrameLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopToken(u64);

impl LoopToken {
    /// Raw generation number, for hosts that pass the token across an FFI boundary.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }

    /// Rebuild a token from a raw generation number.
    #[must_use]
    pub const fn from_generation(generation: u64) -> Self {
        Self(generation)
    }
}

/// One emitted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Frames emitted since the loop was created (monotonic across restarts).
    pub index: u64,
    /// The cycle this frame belongs to.
    pub token: LoopToken,
}

/// Start/stop state of a repeating per-frame task.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    generation: u64,
    running: bool,
    frames: u64,
}

impl FrameLoop {
    /// Create a stopped loop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the loop. Starting a running loop is a no-op that returns the live token.
    pub fn start(&mut self) -> LoopToken {
        if !self.running {
            self.generation = self.generation.wrapping_add(1);
            self.running = true;
            tracing::debug!(generation = self.generation, "frame loop started");
        }
        LoopToken(self.generation)
    }

    /// Stop the loop. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        tracing::debug!(generation = self.generation, "frame loop stopped");
        true
    }

    /// Whether the loop is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a callback holding `token` may still emit.
    #[must_use]
    pub fn accepts(&self, token: LoopToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Emit a frame for `token`, or `None` if that cycle has been cancelled.
    pub fn tick(&mut self, token: LoopToken) -> Option<FrameTick> {
        if !self.accepts(token) {
            return None;
        }
        let index = self.frames;
        self.frames += 1;
        Some(FrameTick { index, token })
    }

    /// Total frames emitted.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}
