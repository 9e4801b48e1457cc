//! Fixed-interval tick clock using an accumulator.
//!
//! `draw_web()` fires at the display refresh rate with a variable delta.
//! `TickClock` turns those timestamps into a whole number of fixed-length
//! ticks, carrying the remainder forward, so game logic never sees partial
//! intervals.

pub struct TickClock {
    /// Length of one tick in milliseconds.
    interval_ms: f64,
    /// Milliseconds received but not yet turned into ticks.
    accumulator: f64,
    /// Most ticks a single update may return (long pauses are truncated).
    max_ticks: u32,
    /// Total ticks produced since creation.
    pub total_ticks: u64,
    last_timestamp: Option<f64>,
}

impl TickClock {
    pub fn new(interval_ms: f64, max_ticks: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            accumulator: 0.0,
            max_ticks: max_ticks.max(1),
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (`performance.now()`), get back the number
    /// of ticks that elapsed since the previous call.
    ///
    /// The first call only anchors the clock. Time running backwards counts
    /// as zero. After a long pause at most `max_ticks` are returned and the
    /// excess is dropped.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let due = (self.accumulator / self.interval_ms).floor();
        let ticks = if due >= self.max_ticks as f64 {
            self.accumulator = 0.0;
            self.max_ticks
        } else {
            let ticks = due as u32;
            self.accumulator -= ticks as f64 * self.interval_ms;
            ticks
        };
        self.total_ticks += ticks as u64;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_anchors_only() {
        let mut clock = TickClock::new(1000.0, 60);
        assert_eq!(clock.update(123_456.0), 0);
        assert_eq!(clock.total_ticks, 0);
    }

    #[test]
    fn one_tick_per_second() {
        let mut clock = TickClock::new(1000.0, 60);
        clock.update(0.0);
        assert_eq!(clock.update(999.0), 0);
        assert_eq!(clock.update(1000.0), 1);
        assert_eq!(clock.total_ticks, 1);
    }

    #[test]
    fn remainder_carries_over() {
        let mut clock = TickClock::new(1000.0, 60);
        clock.update(0.0);
        assert_eq!(clock.update(1500.0), 1);
        assert_eq!(clock.update(2000.0), 1); // 500 carried + 500 new
        assert_eq!(clock.total_ticks, 2);
    }

    #[test]
    fn frames_at_60fps_yield_one_tick_per_second() {
        let mut clock = TickClock::new(1000.0, 60);
        clock.update(0.0);
        let mut total = 0;
        for i in 1..=600 {
            total += clock.update(i as f64 * 1000.0 / 60.0);
        }
        assert!((9..=10).contains(&total), "expected ~10 ticks, got {}", total);
    }

    #[test]
    fn long_pause_is_capped() {
        let mut clock = TickClock::new(1000.0, 60);
        clock.update(0.0);
        assert_eq!(clock.update(3_600_000.0), 60);
        // nothing left over from the dropped hour
        assert_eq!(clock.update(3_600_500.0), 0);
    }

    #[test]
    fn backwards_time_counts_as_zero() {
        let mut clock = TickClock::new(100.0, 60);
        clock.update(1000.0);
        assert_eq!(clock.update(500.0), 0);
        assert_eq!(clock.update(600.0), 1);
    }

    #[test]
    fn fast_interval_for_animation() {
        let mut clock = TickClock::new(100.0, 60);
        clock.update(0.0);
        assert_eq!(clock.update(350.0), 3);
    }
}
