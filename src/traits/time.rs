use std::cell::Cell;
use std::time::Instant;

/// Abstraction over time sources.
/// Implementations: SystemTimeProvider (production), MockTimeProvider (testing).
pub trait TimeProvider {
    /// Current time in milliseconds from an arbitrary epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Monotonic clock started at construction.
pub struct SystemTimeProvider {
    start: Instant,
}

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct MockTimeProvider {
    current_ms: Cell<u64>,
}

impl MockTimeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.current_ms.set(self.current_ms.get() + delta_ms);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}
