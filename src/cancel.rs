//! Cancellation signal shared between the button interrupt and the controller.
//!
//! This is the only state written from two execution contexts. The interrupt
//! side ([`InterruptController::on_falling_edge`]) may only set the pending
//! flag, and only while the controller has published itself as armed (cycle
//! index > 0). The controller consumes the flag at the top of every poll
//! iteration and does all cleanup itself.
//!
//! Index zero is treated as "not armed", so a press during the very first
//! cycle of a batch is dropped. This is the long-standing behavior of the
//! tester and is kept on purpose.

use core::sync::atomic::{AtomicBool, Ordering};

/// Pending-cancellation flag plus the armed gate the handler consults.
pub struct CancellationSignal {
    pending: AtomicBool,
    armed: AtomicBool,
}

impl CancellationSignal {
    /// Create a signal with nothing pending and the gate closed.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            armed: AtomicBool::new(false),
        }
    }

    /// Whether a cancellation is waiting to be observed.
    #[inline]
    pub fn is_pending(&self) -> bool { self.pending.load(Ordering::Acquire) }

    /// Whether the handler currently accepts edges.
    #[inline]
    pub fn is_armed(&self) -> bool { self.armed.load(Ordering::Acquire) }

    /// Consume a pending cancellation. Returns true if one was pending.
    #[inline]
    pub(crate) fn take(&self) -> bool { self.pending.swap(false, Ordering::AcqRel) }

    /// Drop any pending cancellation without acting on it.
    #[inline]
    pub(crate) fn clear(&self) { self.pending.store(false, Ordering::Release); }

    /// Publish whether the current batch may be cancelled.
    #[inline]
    pub(crate) fn set_armed(
        &self,
        armed: bool,
    ) {
        self.armed.store(armed, Ordering::Release);
    }

    /// Raise the flag regardless of the gate.
    #[cfg(test)]
    pub(crate) fn force_pending(&self) { self.pending.store(true, Ordering::Release); }
}

impl Default for CancellationSignal {
    fn default() -> Self { Self::new() }
}

/// Binds the button's falling edge to a [`CancellationSignal`].
///
/// Call [`on_falling_edge`](Self::on_falling_edge) from the edge interrupt (or
/// the task awaiting it). It performs no I/O and never blocks.
#[derive(Clone, Copy)]
pub struct InterruptController<'a> {
    signal: &'a CancellationSignal,
}

impl<'a> InterruptController<'a> {
    pub const fn new(signal: &'a CancellationSignal) -> Self { Self { signal } }

    /// Handle one falling edge. Idempotent until the flag is consumed.
    #[inline]
    pub fn on_falling_edge(&self) {
        if self.signal.armed.load(Ordering::Acquire) {
            self.signal.pending.store(true, Ordering::Release);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
