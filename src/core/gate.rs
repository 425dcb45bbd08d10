//! Blocking gates consumers pass before drawing stock.
//!
//! Both are Mutex + Condvar monitors. Their waits also end when the run
//! closes, so a consumer parked here is released by the same close that
//! releases the inventory waiters.

use super::open_flag::OpenFlag;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One-shot latch raised once the initial fill of every unit is done.
#[derive(Debug, Default)]
pub struct FillSignal {
    filled: Mutex<bool>,
    cv: Condvar,
}

impl FillSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_filled(&self) {
        let mut filled = lock_or_recover(&self.filled);
        *filled = true;
        self.cv.notify_all();
    }

    pub fn is_filled(&self) -> bool {
        *lock_or_recover(&self.filled)
    }

    /// Blocks until the units are filled or the run closes.
    /// Returns true only if the fill completed while the run was open.
    pub fn wait(&self, open: &OpenFlag) -> bool {
        let mut filled = lock_or_recover(&self.filled);
        while !*filled && open.is_open() {
            filled = self.cv.wait(filled).unwrap_or_else(PoisonError::into_inner);
        }
        *filled && open.is_open()
    }

    pub fn wake_all(&self) {
        let _filled = lock_or_recover(&self.filled);
        self.cv.notify_all();
    }
}

/// Counting semaphore bounding how many consumers are active at once.
#[derive(Debug)]
pub struct AdmissionGate {
    total: usize,
    available: Mutex<usize>,
    cv: Condvar,
}

impl AdmissionGate {
    /// # Panics
    ///
    /// Panics if `total` is 0.
    pub fn new(total: usize) -> Arc<Self> {
        assert!(total > 0, "AdmissionGate needs at least one permit");
        Arc::new(Self {
            total,
            available: Mutex::new(total),
            cv: Condvar::new(),
        })
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Snapshot; may be stale by the time it is used.
    pub fn available(&self) -> usize {
        *lock_or_recover(&self.available)
    }

    pub fn in_use(&self) -> usize {
        self.total.saturating_sub(self.available())
    }

    /// Blocks until a permit is free. Returns `None` once the run closes.
    pub fn acquire(self: &Arc<Self>, open: &OpenFlag) -> Option<AdmissionPermit> {
        let mut available = lock_or_recover(&self.available);
        while *available == 0 && open.is_open() {
            available = self.cv.wait(available).unwrap_or_else(PoisonError::into_inner);
        }
        if !open.is_open() {
            return None;
        }
        *available -= 1;
        Some(AdmissionPermit {
            gate: Arc::clone(self),
        })
    }

    fn release(&self) {
        let mut available = lock_or_recover(&self.available);
        debug_assert!(*available < self.total, "permit released twice");
        *available += 1;
        self.cv.notify_one();
    }

    pub fn wake_all(&self) {
        let _available = lock_or_recover(&self.available);
        self.cv.notify_all();
    }
}

/// RAII permit; dropping it frees the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    gate: Arc<AdmissionGate>,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        self.gate.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_fill_signal_releases_waiters() {
        let signal = Arc::new(FillSignal::new());
        let open = Arc::new(OpenFlag::new());

        let waiter = {
            let signal = Arc::clone(&signal);
            let open = Arc::clone(&open);
            thread::spawn(move || signal.wait(&open))
        };

        thread::sleep(Duration::from_millis(30));
        assert!(!signal.is_filled());
        signal.mark_filled();
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_fill_signal_wait_ends_on_close() {
        let signal = Arc::new(FillSignal::new());
        let open = Arc::new(OpenFlag::new());

        let waiter = {
            let signal = Arc::clone(&signal);
            let open = Arc::clone(&open);
            thread::spawn(move || signal.wait(&open))
        };

        thread::sleep(Duration::from_millis(30));
        open.close();
        signal.wake_all();
        assert!(!waiter.join().unwrap());
    }

    #[test]
    fn test_permits_are_bounded_and_returned() {
        let gate = AdmissionGate::new(2);
        let open = OpenFlag::new();
        let a = gate.acquire(&open).unwrap();
        let _b = gate.acquire(&open).unwrap();
        assert_eq!(gate.available(), 0);
        assert_eq!(gate.in_use(), 2);

        drop(a);
        assert_eq!(gate.available(), 1);
        assert!(gate.acquire(&open).is_some());
    }

    #[test]
    fn test_blocked_acquire_gets_released_permit() {
        let gate = AdmissionGate::new(1);
        let open = Arc::new(OpenFlag::new());
        let held = gate.acquire(&open).unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            let open = Arc::clone(&open);
            thread::spawn(move || gate.acquire(&open).is_some())
        };

        thread::sleep(Duration::from_millis(30));
        drop(held);
        assert!(waiter.join().unwrap());
        assert_eq!(gate.available(), 1);
    }

    #[test]
    fn test_blocked_acquire_ends_on_close() {
        let gate = AdmissionGate::new(1);
        let open = Arc::new(OpenFlag::new());
        let _held = gate.acquire(&open).unwrap();

        let waiter = {
            let gate = Arc::clone(&gate);
            let open = Arc::clone(&open);
            thread::spawn(move || gate.acquire(&open).is_none())
        };

        thread::sleep(Duration::from_millis(30));
        open.close();
        gate.wake_all();
        assert!(waiter.join().unwrap());
    }
}
