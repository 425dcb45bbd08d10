use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide "local is open" signal.
///
/// Flipped exactly once. Every blocking loop re-checks it after each wake;
/// waking alone never implies new stock.
#[derive(Debug)]
pub struct OpenFlag {
    open: AtomicBool,
}

impl OpenFlag {
    pub fn new() -> Self {
        Self {
            open: AtomicBool::new(true),
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Returns true only for the call that performed the flip.
    pub fn close(&self) -> bool {
        self.open.swap(false, Ordering::SeqCst)
    }
}

impl Default for OpenFlag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_flips_once() {
        let flag = OpenFlag::new();
        assert!(flag.is_open());
        assert!(flag.close());
        assert!(!flag.is_open());
        assert!(!flag.close());
    }
}
