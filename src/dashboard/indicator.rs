//! Success indicator timing.
//!
//! A three-phase state machine `Visible → Fading → Hidden` with a single
//! pending deadline. Re-triggering replaces the deadline, so overlapping
//! successes restart the sequence instead of racing each other.

use std::time::{Duration, Instant};

/// Visible phase of the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPhase {
    Visible,
    Fading,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct SuccessIndicator {
    phase: IndicatorPhase,
    deadline: Option<Instant>,
    visible_for: Duration,
    fade_for: Duration,
}

impl SuccessIndicator {
    pub fn new(visible_for: Duration, fade_for: Duration) -> Self {
        Self {
            phase: IndicatorPhase::Hidden,
            deadline: None,
            visible_for,
            fade_for,
        }
    }

    pub fn phase(&self) -> IndicatorPhase {
        self.phase
    }

    /// When the next transition is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Show the indicator and (re)schedule the fade.
    pub fn trigger(&mut self, now: Instant) {
        self.phase = IndicatorPhase::Visible;
        self.deadline = Some(now + self.visible_for);
    }

    /// Advance through every transition due at `now`. Returns whether the
    /// phase changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let before = self.phase;
        while let Some(due) = self.deadline {
            if now < due {
                break;
            }
            match self.phase {
                IndicatorPhase::Visible => {
                    self.phase = IndicatorPhase::Fading;
                    self.deadline = Some(due + self.fade_for);
                }
                IndicatorPhase::Fading | IndicatorPhase::Hidden => {
                    self.phase = IndicatorPhase::Hidden;
                    self.deadline = None;
                }
            }
        }
        self.phase != before
    }
}

impl Default for SuccessIndicator {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500), Duration::from_millis(350))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_hidden_with_nothing_scheduled() {
        let ind = SuccessIndicator::default();
        assert_eq!(ind.phase(), IndicatorPhase::Hidden);
        assert_eq!(ind.next_deadline(), None);
    }

    #[test]
    fn runs_visible_fading_hidden() {
        let t0 = Instant::now();
        let mut ind = SuccessIndicator::default();
        ind.trigger(t0);
        assert_eq!(ind.phase(), IndicatorPhase::Visible);

        assert!(!ind.tick(t0 + ms(1499)));
        assert_eq!(ind.phase(), IndicatorPhase::Visible);

        assert!(ind.tick(t0 + ms(1500)));
        assert_eq!(ind.phase(), IndicatorPhase::Fading);

        assert!(!ind.tick(t0 + ms(1849)));
        assert!(ind.tick(t0 + ms(1850)));
        assert_eq!(ind.phase(), IndicatorPhase::Hidden);
        assert_eq!(ind.next_deadline(), None);
    }

    #[test]
    fn late_tick_catches_up() {
        let t0 = Instant::now();
        let mut ind = SuccessIndicator::default();
        ind.trigger(t0);
        assert!(ind.tick(t0 + ms(5000)));
        assert_eq!(ind.phase(), IndicatorPhase::Hidden);
    }

    #[test]
    fn retrigger_restarts_schedule() {
        let t0 = Instant::now();
        let mut ind = SuccessIndicator::default();
        ind.trigger(t0);
        ind.tick(t0 + ms(1600));
        assert_eq!(ind.phase(), IndicatorPhase::Fading);

        ind.trigger(t0 + ms(1700));
        assert_eq!(ind.phase(), IndicatorPhase::Visible);
        assert_eq!(ind.next_deadline(), Some(t0 + ms(3200)));

        // The old fade deadline (t0 + 1850) no longer hides it.
        ind.tick(t0 + ms(1900));
        assert_eq!(ind.phase(), IndicatorPhase::Visible);
    }
}
