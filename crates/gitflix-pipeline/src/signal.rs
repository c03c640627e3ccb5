use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation signal.
///
/// Set on interrupt, presenter close, or fatal error. Every blocking wait in
/// the pipeline polls it on a bounded interval, so all activities unwind
/// within one poll of the flip. Once set it stays set.
#[derive(Clone, Debug, Default)]
pub struct ExitFlag(Arc<AtomicBool>);

impl ExitFlag {
    /// A fresh, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has shutdown been requested?
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        assert!(!ExitFlag::new().is_set());
    }

    #[test]
    fn set_is_visible_to_clones() {
        let flag = ExitFlag::new();
        let other = flag.clone();
        flag.set();
        assert!(other.is_set());
    }

    #[test]
    fn set_is_sticky() {
        let flag = ExitFlag::new();
        flag.set();
        flag.set();
        assert!(flag.is_set());
    }
}
