//! Render-aligned coalescing of high-frequency input.
//!
//! Pointer moves can arrive many times per paint. A move only records
//! interest; the work runs once in the next frame callback, and any moves that
//! arrive while a frame is pending are absorbed by it.

/// Holds at most one pending frame handle.
///
/// `H` is whatever the host returns when it schedules a callback. Dropping the
/// handle is expected to cancel the callback if it has not run yet.
#[derive(Debug)]
pub struct FrameGate<H> {
    pending: Option<H>,
    coalesced: u64,
}

impl<H> Default for FrameGate<H> {
    fn default() -> Self {
        Self {
            pending: None,
            coalesced: 0,
        }
    }
}

impl<H> FrameGate<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Schedule a frame unless one is already pending.
    ///
    /// `schedule` is only invoked when the gate is idle. Returns `true` if a
    /// new frame was scheduled. A `None` from `schedule` (host could not
    /// schedule) leaves the gate idle.
    pub fn request(&mut self, schedule: impl FnOnce() -> Option<H>) -> bool {
        if self.pending.is_some() {
            self.coalesced += 1;
            return false;
        }
        self.pending = schedule();
        self.pending.is_some()
    }

    /// Mark the pending frame as running; returns its handle.
    pub fn fire(&mut self) -> Option<H> {
        self.pending.take()
    }

    /// Drop any pending frame, cancelling it.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Number of requests absorbed by an already pending frame.
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let scheduled = Cell::new(0);
        let mut gate = FrameGate::new();

        for _ in 0..20 {
            gate.request(|| {
                scheduled.set(scheduled.get() + 1);
                Some(scheduled.get())
            });
        }

        assert_eq!(scheduled.get(), 1);
        assert_eq!(gate.coalesced(), 19);
        assert_eq!(gate.fire(), Some(1));
        assert!(!gate.is_pending());

        assert!(gate.request(|| Some(2)));
        assert!(gate.is_pending());
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut gate = FrameGate::new();
        assert!(!gate.cancel());
        gate.request(|| Some(()));
        assert!(gate.cancel());
        assert!(!gate.is_pending());
        assert_eq!(gate.fire(), None);
    }

    #[test]
    fn test_failed_schedule_stays_idle() {
        let mut gate: FrameGate<u32> = FrameGate::new();
        assert!(!gate.request(|| None));
        assert!(!gate.is_pending());
    }
}
