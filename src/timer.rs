/// Countdown clock for one run. `decrement` stores the raw value and the
/// zero floor is applied where the expiry check reads it, so a frame that
/// overshoots still reports exactly zero.
#[derive(Clone, Debug)]
pub struct RunTimer {
    seconds_left: f32,
}

impl RunTimer {
    pub fn new(seconds: f32) -> Self {
        Self {
            seconds_left: seconds,
        }
    }

    pub fn decrement(&mut self, delta_seconds: f32) {
        self.seconds_left -= delta_seconds;
    }

    /// Signed adjustment from events; unclamped on the upside.
    pub fn add_time(&mut self, delta_seconds: f32) {
        self.seconds_left += delta_seconds;
    }

    pub fn remaining(&self) -> f32 {
        self.seconds_left
    }

    /// Remaining time floored at zero; `0.0` means the run is over.
    pub fn time_left(&self) -> f32 {
        self.seconds_left.max(0.0)
    }

    /// mm:ss display string.
    pub fn format_clock(&self) -> String {
        let total = self.time_left() as u32;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
