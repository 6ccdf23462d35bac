use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag recording whether the owning session has ended.
///
/// Starts open, is closed at most once and never reopens. Clones observe the
/// same flag.
#[derive(Clone, Debug, Default)]
pub struct SessionGuard {
    closed: Arc<AtomicBool>,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// End the session.
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionGuard;

    #[test]
    fn given_open_guard_when_closed_twice_then_only_first_call_transitions() {
        let guard = SessionGuard::new();
        let observer = guard.clone();

        assert!(!observer.is_closed());
        assert!(guard.close());
        assert!(!guard.close());
        assert!(observer.is_closed());
    }
}
