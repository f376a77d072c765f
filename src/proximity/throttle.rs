use std::time::Duration;

/// Trailing-edge throttle.
///
/// The first value submitted while no window is open passes straight through
/// and opens a window of `period`. Values submitted inside the window replace
/// each other; the last one is released by [`Throttle::poll`] once the window
/// has elapsed, which opens the next window. At most one value is ever held.
///
/// Time is supplied by the caller as the elapsed time since any fixed origin.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    period: Duration,
    window_end: Option<Duration>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            window_end: None,
            pending: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns `value` if it may run now; otherwise keeps it as the pending call.
    pub fn submit(&mut self, now: Duration, value: T) -> Option<T> {
        match self.window_end {
            Some(end) if now < end => {
                self.pending = Some(value);
                None
            }
            _ => {
                self.window_end = Some(now + self.period);
                self.pending = None;
                Some(value)
            }
        }
    }

    /// Releases the pending value once the window is over.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        let end = self.window_end?;
        if now < end {
            return None;
        }
        match self.pending.take() {
            Some(value) => {
                self.window_end = Some(now + self.period);
                Some(value)
            }
            None => {
                self.window_end = None;
                None
            }
        }
    }

    /// Drops the pending value and closes the window.
    pub fn cancel(&mut self) {
        self.window_end = None;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_call_runs_immediately() {
        let mut throttle = Throttle::new(ms(50));
        assert_eq!(throttle.submit(ms(0), 1), Some(1));
        assert_eq!(throttle.poll(ms(50)), None);
    }

    #[test]
    fn calls_inside_window_coalesce_to_latest() {
        let mut throttle = Throttle::new(ms(50));
        assert_eq!(throttle.submit(ms(0), 1), Some(1));
        assert_eq!(throttle.submit(ms(10), 2), None);
        assert_eq!(throttle.submit(ms(20), 3), None);
        assert_eq!(throttle.poll(ms(49)), None);
        assert_eq!(throttle.poll(ms(50)), Some(3));
        assert_eq!(throttle.poll(ms(51)), None);
    }

    #[test]
    fn trailing_call_opens_a_new_window() {
        let mut throttle = Throttle::new(ms(50));
        throttle.submit(ms(0), 1);
        throttle.submit(ms(10), 2);
        assert_eq!(throttle.poll(ms(50)), Some(2));
        assert_eq!(throttle.submit(ms(60), 3), None);
        assert_eq!(throttle.poll(ms(100)), Some(3));
    }

    #[test]
    fn idle_window_closes_on_poll() {
        let mut throttle = Throttle::new(ms(50));
        throttle.submit(ms(0), 1);
        assert_eq!(throttle.poll(ms(60)), None);
        assert_eq!(throttle.submit(ms(61), 2), Some(2));
    }

    #[test]
    fn expired_window_lets_next_call_through() {
        let mut throttle = Throttle::new(ms(50));
        throttle.submit(ms(0), 1);
        assert_eq!(throttle.submit(ms(75), 2), Some(2));
    }

    #[test]
    fn cancel_drops_pending_call() {
        let mut throttle = Throttle::new(ms(50));
        throttle.submit(ms(0), 1);
        throttle.submit(ms(10), 2);
        throttle.cancel();
        assert_eq!(throttle.poll(ms(100)), None);
        assert_eq!(throttle.submit(ms(11), 3), Some(3));
    }
}
