//! Cooperative cancellation (§4.9, §5).
//!
//! The exact DSATUR solver polls a [`Cancel`] implementor at the top of
//! every recursive call. Per the design notes, this is an atomic "done"
//! flag plus a reason slot — no channel, no thread parking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Why a search was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's deadline, expressed however the caller chooses to
    /// implement it, has passed.
    TimedOut,
    /// Cancellation was requested directly (e.g. the caller is shutting
    /// down).
    Requested,
}

/// The capability the exact solver polls: "observe done" (non-blocking),
/// plus the reason once it has fired.
pub trait Cancel {
    fn is_done(&self) -> bool;
    fn reason(&self) -> Option<CancelReason>;
}

/// A `Cancel` that never fires, for callers that don't need cancellation.
#[derive(Copy, Clone, Debug, Default)]
pub struct Never;

impl Cancel for Never {
    fn is_done(&self) -> bool {
        false
    }
    fn reason(&self) -> Option<CancelReason> {
        None
    }
}

/// An atomic, shareable cancellation token. Clone it into the solver call
/// and keep a [`CancelHandle`] to fire it from elsewhere (another thread, a
/// timer, a signal handler).
#[derive(Clone)]
pub struct CancelToken {
    done: Arc<AtomicBool>,
    reason: Arc<Mutex<Option<CancelReason>>>,
}

/// The firing side of a [`CancelToken`].
#[derive(Clone)]
pub struct CancelHandle {
    done: Arc<AtomicBool>,
    reason: Arc<Mutex<Option<CancelReason>>>,
}

impl CancelToken {
    pub fn new() -> (CancelToken, CancelHandle) {
        let done = Arc::new(AtomicBool::new(false));
        let reason = Arc::new(Mutex::new(None));
        (
            CancelToken {
                done: done.clone(),
                reason: reason.clone(),
            },
            CancelHandle { done, reason },
        )
    }
}

impl Cancel for CancelToken {
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }
    fn reason(&self) -> Option<CancelReason> {
        self.reason.lock().expect("cancel reason mutex poisoned").clone()
    }
}

impl CancelHandle {
    /// Fire cancellation with the given reason. Idempotent: firing twice
    /// keeps the first reason.
    pub fn cancel(&self, reason: CancelReason) {
        if !self.done.swap(true, Ordering::Relaxed) {
            *self.reason.lock().expect("cancel reason mutex poisoned") = Some(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_never_fires() {
        let n = Never;
        assert!(!n.is_done());
        assert!(n.reason().is_none());
    }

    #[test]
    fn token_observes_handle_firing() {
        let (token, handle) = CancelToken::new();
        assert!(!token.is_done());
        handle.cancel(CancelReason::Requested);
        assert!(token.is_done());
        assert_eq!(token.reason(), Some(CancelReason::Requested));
    }

    #[test]
    fn first_reason_wins() {
        let (token, handle) = CancelToken::new();
        handle.cancel(CancelReason::Requested);
        handle.cancel(CancelReason::TimedOut);
        assert_eq!(token.reason(), Some(CancelReason::Requested));
    }
}
