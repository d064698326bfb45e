use std::time::Duration;

/// Host-side frame callback mechanism the refresh loop schedules itself on.
///
/// At most one callback is outstanding; posting replaces any pending one.
pub trait FrameScheduler {
    fn post_frame_callback(&mut self, delay: Duration);
    fn remove_frame_callback(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Drives periodic re-renders at `fps` while attached.
///
/// Ticks never overlap: the next wake-up is only posted from inside the current one.
#[derive(Clone, Debug)]
pub struct RefreshLoop {
    state: LoopState,
    fps: u32,
}

impl RefreshLoop {
    pub fn new(fps: u32) -> Self {
        Self {
            state: LoopState::Stopped,
            fps,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Delay between wake-ups, `None` when the loop never self-schedules.
    pub fn period(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_millis(1000 / u64::from(self.fps)))
    }

    /// Start ticking. A no-op when already running or when `fps` is zero.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if self.is_running() || self.fps == 0 {
            return false;
        }
        self.state = LoopState::Running;
        scheduler.post_frame_callback(Duration::ZERO);
        tracing::debug!(fps = self.fps, "refresh loop started");
        true
    }

    pub fn pause(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        if !self.is_running() {
            return false;
        }
        self.state = LoopState::Stopped;
        scheduler.remove_frame_callback();
        tracing::debug!("refresh loop paused");
        true
    }

    /// Change the rate. A running loop is stopped, and restarted only if `restart` is set, so
    /// the new period applies from the next wake-up on.
    pub fn set_fps(&mut self, fps: u32, restart: bool, scheduler: &mut dyn FrameScheduler) {
        self.pause(scheduler);
        self.fps = fps;
        if restart {
            self.start(scheduler);
        }
    }

    /// Post the next wake-up after a tick. Returns `false` if the loop has stopped meanwhile.
    pub fn reschedule(&mut self, scheduler: &mut dyn FrameScheduler) -> bool {
        match (self.state, self.period()) {
            (LoopState::Running, Some(period)) => {
                scheduler.post_frame_callback(period);
                true
            }
            _ => false,
        }
    }
}

/// Deterministic [`FrameScheduler`] driven by an explicit clock.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    due: Option<Duration>,
    posted: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Absolute time the pending callback fires at.
    pub fn next_due(&self) -> Option<Duration> {
        self.due
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// Total callbacks posted so far.
    pub fn posted(&self) -> u64 {
        self.posted
    }

    /// Move the clock forward by `dt`. Returns `true` if the pending callback fired, which
    /// consumes it.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.now += dt;
        match self.due {
            Some(due) if due <= self.now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Jump straight to the pending callback, if any, and fire it.
    pub fn advance_to_next(&mut self) -> bool {
        match self.due {
            Some(due) => {
                self.now = self.now.max(due);
                self.due = None;
                true
            }
            None => false,
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn post_frame_callback(&mut self, delay: Duration) {
        self.posted += 1;
        self.due = Some(self.now + delay);
    }

    fn remove_frame_callback(&mut self) {
        self.due = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/refresh.rs"]
mod tests;
