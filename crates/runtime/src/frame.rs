use foundation::time::Time;

/// Deterministic frame metadata passed to per-frame hooks.
///
/// Frames use a fixed timestep so a run can be replayed exactly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn first(dt_s: f64) -> Self {
        Self::new(0, dt_s)
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Fixed-timestep frame source for headless render loops.
#[derive(Debug, Clone)]
pub struct FrameClock {
    next: Frame,
}

impl FrameClock {
    pub fn new(dt_s: f64) -> Self {
        Self {
            next: Frame::first(dt_s),
        }
    }

    /// Returns the next frame and advances the clock.
    pub fn tick(&mut self) -> Frame {
        let frame = self.next;
        self.next = frame.next();
        frame
    }
}
