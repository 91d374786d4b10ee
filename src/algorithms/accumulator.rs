//! Cumulative distance over a tracking session

use crate::algorithms::great_circle::haversine;
use crate::core::{Meters, Position};
use tracing::{trace, warn};

/// Whether a session has a baseline fix yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// Integrates successive fixes into a running great-circle path length.
///
/// Fixes are taken at face value; put a [`FixFilter`](crate::processing::FixFilter)
/// in front if jitter must be removed. Mutation is `&mut self`, so sharing an
/// accumulator between threads requires external locking.
#[derive(Debug, Clone, Default)]
pub struct DistanceAccumulator {
    cumulative: Meters,
    last_fix: Option<Position>,
    fix_count: u64,
}

impl DistanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one fix and return the distance it added.
    /// A fix with a non-finite coordinate is ignored and adds nothing.
    pub fn record_fix(&mut self, fix: Position) -> Meters {
        if !fix.latitude.is_finite() || !fix.longitude.is_finite() {
            warn!(latitude = fix.latitude, longitude = fix.longitude, "ignoring non-finite fix");
            return Meters::ZERO;
        }

        let delta = match &self.last_fix {
            Some(previous) => haversine(previous, &fix),
            None => Meters::ZERO,
        };

        self.cumulative += delta;
        self.last_fix = Some(fix);
        self.fix_count += 1;

        trace!(delta_m = delta.value(), total_m = self.cumulative.value(), "fix recorded");
        delta
    }

    /// Record a batch of buffered fixes in order, returning the distance they added
    pub fn record_fixes<I>(&mut self, fixes: I) -> Meters
    where
        I: IntoIterator<Item = Position>,
    {
        fixes.into_iter().map(|fix| self.record_fix(fix)).sum()
    }

    pub fn current_distance(&self) -> Meters {
        self.cumulative
    }

    pub fn state(&self) -> SessionState {
        if self.last_fix.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn last_fix(&self) -> Option<&Position> {
        self.last_fix.as_ref()
    }

    pub fn fix_count(&self) -> u64 {
        self.fix_count
    }

    /// Start a new session
    pub fn reset(&mut self) {
        self.cumulative = Meters::ZERO;
        self.last_fix = None;
        self.fix_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk() -> Vec<Position> {
        vec![
            Position::new(45.1880, 5.7245, 0),
            Position::new(45.1885, 5.7251, 30),
            Position::new(45.1885, 5.7251, 45),
            Position::new(45.1879, 5.7262, 90),
            Position::new(45.1871, 5.7260, 120),
            Position::new(45.1880, 5.7245, 200),
        ]
    }

    #[test]
    fn test_first_fix_sets_baseline_only() {
        let mut accumulator = DistanceAccumulator::new();
        assert_eq!(accumulator.state(), SessionState::Idle);

        let delta = accumulator.record_fix(Position::new(37.33123666, 122.03076342, 0));
        assert_eq!(delta, Meters::ZERO);
        assert_eq!(accumulator.current_distance(), Meters::ZERO);
        assert_eq!(accumulator.state(), SessionState::Active);
    }

    #[test]
    fn test_two_fixes_match_haversine() {
        let p1 = Position::new(37.33123666, 122.03076342, 0);
        let p2 = Position::new(37.33115792, 122.03076154, 1);

        let mut accumulator = DistanceAccumulator::new();
        accumulator.record_fix(p1);
        accumulator.record_fix(p2);

        assert_eq!(accumulator.current_distance(), haversine(&p1, &p2));
        let meters = accumulator.current_distance().value();
        assert!(meters > 5.0 && meters < 15.0, "unexpected distance {}", meters);
    }

    #[test]
    fn test_monotonic_over_walk() {
        let mut accumulator = DistanceAccumulator::new();
        let mut previous = accumulator.current_distance();

        for fix in walk() {
            accumulator.record_fix(fix);
            let current = accumulator.current_distance();
            assert!(current >= previous);
            previous = current;
        }
        assert_eq!(accumulator.fix_count(), 6);
    }

    #[test]
    fn test_repeated_fix_adds_nothing() {
        let fix = Position::new(45.1880, 5.7245, 0);
        let mut accumulator = DistanceAccumulator::new();
        accumulator.record_fix(fix);
        accumulator.record_fix(Position::new(45.1890, 5.7245, 10));
        let before = accumulator.current_distance();

        let repeat = Position::new(45.1890, 5.7245, 20);
        assert_eq!(accumulator.record_fix(repeat), Meters::ZERO);
        assert_eq!(accumulator.current_distance(), before);
    }

    #[test]
    fn test_non_finite_fix_is_ignored() {
        let mut accumulator = DistanceAccumulator::new();
        accumulator.record_fix(Position::new(45.0, 6.0, 0));

        assert_eq!(accumulator.record_fix(Position::new(f64::NAN, 6.0, 1)), Meters::ZERO);
        assert_eq!(accumulator.record_fix(Position::new(45.0, f64::INFINITY, 2)), Meters::ZERO);
        assert_eq!(accumulator.current_distance(), Meters::ZERO);
        assert_eq!(accumulator.fix_count(), 1);
        assert_eq!(accumulator.last_fix(), Some(&Position::new(45.0, 6.0, 0)));

        // A NaN baseline is never adopted either
        let mut fresh = DistanceAccumulator::new();
        fresh.record_fix(Position::new(f64::NAN, f64::NAN, 0));
        assert_eq!(fresh.state(), SessionState::Idle);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let mut sequential = DistanceAccumulator::new();
        for fix in walk() {
            sequential.record_fix(fix);
        }

        let mut batched = DistanceAccumulator::new();
        let fixes = walk();
        let (first, rest) = fixes.split_at(2);
        batched.record_fixes(first.to_vec());
        let added = batched.record_fixes(rest.iter().copied());

        assert_eq!(batched.current_distance(), sequential.current_distance());
        assert!(added.value() > 0.0);
        assert_eq!(batched.last_fix(), sequential.last_fix());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut accumulator = DistanceAccumulator::new();
        accumulator.record_fixes(walk());
        assert!(accumulator.current_distance() > Meters::ZERO);

        accumulator.reset();
        assert_eq!(accumulator.current_distance(), Meters::ZERO);
        assert_eq!(accumulator.state(), SessionState::Idle);
        assert!(accumulator.last_fix().is_none());

        // The next fix is a fresh baseline
        assert_eq!(accumulator.record_fix(Position::new(10.0, 10.0, 0)), Meters::ZERO);
        assert_eq!(accumulator.current_distance(), Meters::ZERO);
    }
}
