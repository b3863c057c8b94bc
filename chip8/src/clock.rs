//! VM clock.
use std::time::Instant;

/// Monotonic time source for the virtual machine.
///
/// Cycle accounting and the 60 Hz timers both measure nanoseconds from
/// a fixed epoch taken when the VM is created. Keeping everything as an
/// offset from one `Instant` lets timer deadlines live in plain `u64`
/// fields (and one atomic, for the audio thread) instead of `Instant`s.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Clock {
    epoch: Instant,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Nanoseconds elapsed since the VM epoch.
    #[inline]
    pub(crate) fn now(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    pub(crate) fn epoch(&self) -> Instant {
        self.epoch
    }
}
