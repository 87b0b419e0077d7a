//! Work/relax countdown timer.
//!
//! # Responsibility
//! - Count down the active interval one second per tick.
//! - Toggle between work and relax intervals when one runs out.
//!
//! # Invariants
//! - `remaining` never exceeds the current state's total.
//! - Ticks only advance while running; the host drives them with `poll`.

use log::info;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const WORK_SECONDS: u32 = 1500;
pub const RELAX_SECONDS: u32 = 300;
const CYCLE_SECONDS: u64 = (WORK_SECONDS + RELAX_SECONDS) as u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Work,
    Relax,
}

impl TimerState {
    pub fn total_seconds(self) -> u32 {
        match self {
            Self::Work => WORK_SECONDS,
            Self::Relax => RELAX_SECONDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Relax => "Relax",
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Work => Self::Relax,
            Self::Relax => Self::Work,
        }
    }
}

/// Polled countdown; starts in [`TimerState::Work`].
#[derive(Debug, Clone)]
pub struct Countdown {
    state: TimerState,
    remaining: u32,
    /// Instant of the last applied tick while running.
    last_tick: Option<Instant>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: TimerState::Work,
            remaining: WORK_SECONDS,
            last_tick: None,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Begins ticking from `now`. No-op while already running.
    pub fn start(&mut self, now: Instant) {
        if self.last_tick.is_none() {
            self.last_tick = Some(now);
            info!(
                "event=timer_start module=timer status=ok state={} remaining={}",
                self.state.label(),
                self.remaining
            );
        }
    }

    /// Halts ticking and keeps the remaining time.
    pub fn stop(&mut self) {
        if self.last_tick.take().is_some() {
            info!(
                "event=timer_stop module=timer status=ok state={} remaining={}",
                self.state.label(),
                self.remaining
            );
        }
    }

    /// Applies one second. At zero the state toggles and refills.
    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.state = self.state.toggled();
            self.remaining = self.state.total_seconds();
            info!(
                "event=timer_switch module=timer status=ok state={}",
                self.state.label()
            );
        }
    }

    /// Applies every whole second elapsed since the last applied tick and
    /// returns how many seconds that was. Returns 0 when stopped.
    ///
    /// Full work+relax cycles are skipped, so a long gap costs the same as a
    /// short one.
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(last) = self.last_tick else {
            return 0;
        };
        let elapsed = now.saturating_duration_since(last).as_secs();
        if elapsed == 0 {
            return 0;
        }
        self.advance((elapsed % CYCLE_SECONDS) as u32);
        self.last_tick = Some(last + Duration::from_secs(elapsed));
        elapsed
    }

    /// Same as `seconds` calls to [`Countdown::tick`].
    fn advance(&mut self, mut seconds: u32) {
        while seconds >= self.remaining {
            seconds -= self.remaining;
            self.remaining = 1;
            self.tick();
        }
        self.remaining -= seconds;
    }

    /// Fraction of the current interval already elapsed, in [0, 1).
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.state.total_seconds());
        1.0 - f64::from(self.remaining) / total
    }

    /// Remaining time as `"MM:SS"`.
    pub fn time_string(&self) -> String {
        format!("{:02}:{:02}", self.remaining / 60, self.remaining % 60)
    }

    pub fn status_label(&self) -> &'static str {
        self.state.label()
    }
}

#[cfg(test)]
mod tests {
    use super::{Countdown, TimerState, RELAX_SECONDS, WORK_SECONDS};
    use std::time::{Duration, Instant};

    #[test]
    fn starts_idle_in_work() {
        let timer = Countdown::new();
        assert_eq!(timer.state(), TimerState::Work);
        assert_eq!(timer.remaining(), WORK_SECONDS);
        assert!(!timer.is_running());
        assert_eq!(timer.progress(), 0.0);
        assert_eq!(timer.time_string(), "25:00");
        assert_eq!(timer.status_label(), "Work");
    }

    #[test]
    fn full_work_interval_switches_to_relax_and_back() {
        let mut timer = Countdown::new();
        for _ in 0..WORK_SECONDS {
            timer.tick();
        }
        assert_eq!(timer.state(), TimerState::Relax);
        assert_eq!(timer.remaining(), RELAX_SECONDS);
        assert_eq!(timer.time_string(), "05:00");

        for _ in 0..RELAX_SECONDS {
            timer.tick();
        }
        assert_eq!(timer.state(), TimerState::Work);
        assert_eq!(timer.remaining(), WORK_SECONDS);
    }

    #[test]
    fn progress_is_linear() {
        let mut timer = Countdown::new();
        for _ in 0..750 {
            timer.tick();
        }
        assert!((timer.progress() - 0.5).abs() < 1e-9);
        assert_eq!(timer.time_string(), "12:30");
    }

    #[test]
    fn poll_applies_whole_elapsed_seconds_only_while_running() {
        let origin = Instant::now();
        let mut timer = Countdown::new();
        assert_eq!(timer.poll(origin + Duration::from_secs(10)), 0);

        timer.start(origin);
        assert_eq!(timer.poll(origin + Duration::from_millis(2500)), 2);
        assert_eq!(timer.poll(origin + Duration::from_millis(2900)), 0);
        assert_eq!(timer.poll(origin + Duration::from_millis(3000)), 1);
        assert_eq!(timer.remaining(), WORK_SECONDS - 3);

        timer.stop();
        assert!(!timer.is_running());
        assert_eq!(timer.poll(origin + Duration::from_secs(60)), 0);
        assert_eq!(timer.remaining(), WORK_SECONDS - 3);
    }

    #[test]
    fn long_gap_matches_ticking_one_by_one() {
        let origin = Instant::now();
        let mut polled = Countdown::new();
        polled.start(origin);
        let gap = 10 * 24 * 3600 + 1500 + 42;
        assert_eq!(polled.poll(origin + Duration::from_secs(gap)), gap);

        let mut ticked = Countdown::new();
        for _ in 0..(gap % 1800) {
            ticked.tick();
        }
        assert_eq!(polled.state(), TimerState::Relax);
        assert_eq!(polled.state(), ticked.state());
        assert_eq!(polled.remaining(), ticked.remaining());
        assert_eq!(polled.remaining(), RELAX_SECONDS - 42);

        let later = origin + Duration::from_secs(gap) + Duration::from_millis(999);
        assert_eq!(polled.poll(later), 0);
    }

    #[test]
    fn poll_crossing_a_switch_lands_in_next_state() {
        let origin = Instant::now();
        let mut timer = Countdown::new();
        timer.start(origin);
        timer.poll(origin + Duration::from_secs(u64::from(WORK_SECONDS) - 1));
        assert_eq!(timer.remaining(), 1);
        timer.poll(origin + Duration::from_secs(u64::from(WORK_SECONDS)));
        assert_eq!(timer.state(), TimerState::Relax);
        assert_eq!(timer.remaining(), RELAX_SECONDS);
    }

    #[test]
    fn restart_resumes_from_kept_time() {
        let origin = Instant::now();
        let mut timer = Countdown::new();
        timer.start(origin);
        timer.poll(origin + Duration::from_secs(5));
        timer.stop();

        let later = origin + Duration::from_secs(100);
        timer.start(later);
        timer.poll(later + Duration::from_secs(1));
        assert_eq!(timer.remaining(), WORK_SECONDS - 6);
    }
}
