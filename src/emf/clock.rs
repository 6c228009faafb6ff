//! Clock abstraction for render timestamps
//!
//! The aggregator never reads the system time directly: every timestamp goes
//! through the `now_millis` function carried by [`Options`], so tests can pin
//! rendered output to a fixed or controlled time.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Injected "now" function returning milliseconds since the Unix epoch
pub type NowMillis = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Clock trait for render timestamps
///
/// Implementations:
/// - `SystemClock`: wall-clock time
/// - `SimulatedClock`: controlled virtual time for tests
pub trait Clock: Send + Sync + 'static {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        default_now_millis()
    }
}

/// Default `now_millis` used when [`Options`] leaves it unset
///
/// A system clock set before the epoch reads as negative milliseconds.
pub fn default_now_millis() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_millis() as i64,
        Err(e) => -(e.duration().as_millis() as i64),
    }
}

/// Simulated clock for deterministic testing
///
/// Time only advances when explicitly told to via `advance()` or `set()`.
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    time_ms: Arc<AtomicI64>,
}

impl Default for SimulatedClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl SimulatedClock {
    /// Create a new simulated clock starting at the given time
    pub fn new(start_ms: i64) -> Self {
        SimulatedClock {
            time_ms: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: Duration) {
        self.advance_ms(duration.as_millis() as i64);
    }

    /// Advance time by milliseconds
    pub fn advance_ms(&self, ms: i64) {
        self.time_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Set time to a specific value
    pub fn set(&self, time_ms: i64) {
        self.time_ms.store(time_ms, Ordering::SeqCst);
    }
}

impl Clock for SimulatedClock {
    fn now_millis(&self) -> i64 {
        self.time_ms.load(Ordering::SeqCst)
    }
}

/// Aggregator options
#[derive(Clone, Default)]
pub struct Options {
    /// Source of render timestamps; wall-clock time when `None`
    pub now_millis: Option<NowMillis>,
}

impl Options {
    /// Options with a custom `now_millis` function
    pub fn with_now_millis<F>(now_millis: F) -> Self
    where
        F: Fn() -> i64 + Send + Sync + 'static,
    {
        Options {
            now_millis: Some(Arc::new(now_millis)),
        }
    }

    /// Options reading time from a [`Clock`]
    pub fn with_clock<C: Clock>(clock: C) -> Self {
        Self::with_now_millis(move || clock.now_millis())
    }

    /// Options with a clock frozen at `time_ms`
    pub fn fixed(time_ms: i64) -> Self {
        Self::with_now_millis(move || time_ms)
    }

    pub(crate) fn into_now_millis(self) -> NowMillis {
        match self.now_millis {
            Some(now_millis) => now_millis,
            None => Arc::new(default_now_millis),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("now_millis", &self.now_millis.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_after_epoch() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_simulated_clock_deterministic() {
        let clock = SimulatedClock::new(1000);

        // Time doesn't advance on its own
        assert_eq!(clock.now_millis(), clock.now_millis());

        clock.advance_ms(100);
        assert_eq!(clock.now_millis(), 1100);

        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now_millis(), 2100);

        clock.set(5000);
        assert_eq!(clock.now_millis(), 5000);
    }

    #[test]
    fn test_options_with_clock_shares_state() {
        let clock = SimulatedClock::new(0);
        let now = Options::with_clock(clock.clone()).into_now_millis();

        clock.advance_ms(42);
        assert_eq!(now(), 42, "Clones should share state");
    }

    #[test]
    fn test_fixed_options() {
        let now = Options::fixed(0).into_now_millis();
        assert_eq!(now(), 0);
    }

    #[test]
    fn test_default_options_use_wall_clock() {
        let now = Options::default().into_now_millis();
        assert!(now() > 1_577_836_800_000);
    }
}
