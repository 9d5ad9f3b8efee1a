// Sawtooth animation clock for the scan indicator.
// Visual: the laser starts at the top of the frame, slides down linearly and
// jumps back to the top once per period, forever, until stopped.
//
// The clock never reads the wall clock itself. Time only advances when the
// host's tick callback hands us `now`; `sample()` just reports.

use std::time::{Duration, Instant};

use tracing::debug;

/// One full top-to-bottom sweep.
pub const SWEEP_PERIOD: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Sweep {
    range_min: f32,
    range_max: f32,
    period: Duration,
    started_at: Instant,
}

#[derive(Debug, Default)]
pub struct AnimationClock {
    sweep: Option<Sweep>,
    position: f32,
    cycle: u64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start sweeping `range_min..=range_max` once per `period`.
    /// Returns false (and changes nothing) if already running.
    pub fn start(&mut self, range_min: f32, range_max: f32, period: Duration, now: Instant) -> bool {
        if self.sweep.is_some() {
            return false;
        }
        // Degenerate frames collapse the range to a single point.
        let range_max = range_max.max(range_min);
        self.sweep = Some(Sweep { range_min, range_max, period, started_at: now });
        self.position = range_min;
        self.cycle = 0;
        debug!(range_min, range_max, period_ms = period.as_millis() as u64, "scan clock started");
        true
    }

    /// Advance to `now`. Called from the host's tick registration only.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let Some(sweep) = self.sweep else { return self.position };

        let period = sweep.period.as_nanos();
        if period == 0 {
            self.position = sweep.range_min;
            return self.position;
        }

        let elapsed = now.saturating_duration_since(sweep.started_at).as_nanos();
        self.cycle = (elapsed / period) as u64;
        let t = (elapsed % period) as f64 / period as f64;
        let span = (sweep.range_max - sweep.range_min) as f64;
        let pos = sweep.range_min as f64 + span * t;
        self.position = (pos as f32).clamp(sweep.range_min, sweep.range_max);
        self.position
    }

    /// Current position. Does not advance time.
    pub fn sample(&self) -> f32 {
        self.position
    }

    /// How many full sweeps have completed.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_running(&self) -> bool {
        self.sweep.is_some()
    }

    pub fn range(&self) -> Option<(f32, f32)> {
        self.sweep.map(|s| (s.range_min, s.range_max))
    }

    pub fn period(&self) -> Option<Duration> {
        self.sweep.map(|s| s.period)
    }

    /// Back to idle. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.sweep.take().is_some();
        if was_running {
            debug!("scan clock stopped");
        }
        was_running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn second_start_is_a_no_op() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        assert!(clock.start(54.0, 246.0, SWEEP_PERIOD, t0));
        assert!(!clock.start(0.0, 10.0, ms(50), t0 + ms(500)));
        assert_eq!(clock.range(), Some((54.0, 246.0)));
        assert_eq!(clock.period(), Some(SWEEP_PERIOD));
    }

    #[rstest]
    #[case(0, 54.0)]
    #[case(500, 102.0)]
    #[case(1000, 150.0)]
    #[case(1999, 245.904)]
    #[case(2000, 54.0)]
    #[case(3000, 150.0)]
    fn sawtooth_positions(#[case] at: u64, #[case] expected: f32) {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(54.0, 246.0, SWEEP_PERIOD, t0);
        let pos = clock.tick(t0 + ms(at));
        assert!((pos - expected).abs() < 0.01, "at {at}ms got {pos}");
        assert!((54.0..=246.0).contains(&pos));
    }

    #[test]
    fn sample_does_not_advance() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(0.0, 100.0, ms(1000), t0);
        clock.tick(t0 + ms(250));
        assert_eq!(clock.sample(), clock.sample());
        assert!((clock.sample() - 25.0).abs() < 0.01);
    }

    #[test]
    fn cycle_counts_completed_sweeps() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(0.0, 10.0, ms(100), t0);
        clock.tick(t0 + ms(350));
        assert_eq!(clock.cycle(), 3);
    }

    #[test]
    fn inverted_range_collapses() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(40.0, 20.0, ms(100), t0);
        assert_eq!(clock.tick(t0 + ms(60)), 40.0);
    }

    #[test]
    fn stop_then_restart_takes_new_range() {
        let t0 = Instant::now();
        let mut clock = AnimationClock::new();
        clock.start(0.0, 10.0, ms(100), t0);
        assert!(clock.stop());
        assert!(!clock.stop());
        assert!(!clock.is_running());
        assert!(clock.start(5.0, 15.0, ms(100), t0));
        assert_eq!(clock.range(), Some((5.0, 15.0)));
    }
}
