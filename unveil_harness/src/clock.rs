// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use unveil_core::time::{Duration, HostTime};

/// A manual frame clock.
///
/// Starts at time zero and moves only when told to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameClock {
    now: HostTime,
    frame: Duration,
}

impl FrameClock {
    /// A clock whose frames are `frame_ms` milliseconds apart.
    #[must_use]
    pub const fn new(frame_ms: u64) -> Self {
        Self {
            now: HostTime(0),
            frame: Duration::from_millis(frame_ms),
        }
    }

    /// A 60 Hz clock, rounded to 16 ms frames.
    #[must_use]
    pub const fn sixty_hz() -> Self {
        Self::new(16)
    }

    /// The current time.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        self.now
    }

    /// The frame interval.
    #[must_use]
    pub const fn frame(&self) -> Duration {
        self.frame
    }

    /// Moves to the next frame and returns its time.
    pub fn tick(&mut self) -> HostTime {
        self.now = self.now.saturating_add(self.frame);
        self.now
    }

    /// Moves forward by `ms` milliseconds and returns the new time.
    pub fn advance_ms(&mut self, ms: u64) -> HostTime {
        self.now = self.now.saturating_add(Duration::from_millis(ms));
        self.now
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::sixty_hz()
    }
}
