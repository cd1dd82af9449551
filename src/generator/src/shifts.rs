//! Daily on-call shift scheduling.
//!
//! For one (employee, day) pair: draw a target count, oversample candidate
//! intervals, then keep a greedy non-overlapping subset in start order. The
//! result may hold fewer intervals than the target; that is accepted as is.

use common::config::OnCallConfig;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::clock::ClockTime;

/// Last hour a shift may end in.
const LAST_HOUR: u8 = 23;

/// Candidates drawn per requested interval.
const OVERSAMPLING: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShiftInterval {
    pub start: ClockTime,
    pub end: ClockTime,
    /// 1-based escalation order within the (employee, day) group
    pub rank: u32,
}

impl ShiftInterval {
    pub fn overlaps(&self, other: &ShiftInterval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Inclusive bounds for one day's shifts. Every `min` must not exceed its
/// `max`; `Configuration::validate` enforces this for loaded configs.
#[derive(Debug, Clone)]
pub struct ShiftPolicy {
    pub min_count: u32,
    pub max_count: u32,
    /// Shortest shift in whole hours
    pub min_hours: u8,
    /// Longest shift in whole hours
    pub max_hours: u8,
    /// Earliest start hour
    pub start_hour_min: u8,
    /// Latest start hour
    pub start_hour_max: u8,
    pub minute_offsets: Vec<u8>,
}

impl Default for ShiftPolicy {
    fn default() -> Self {
        Self::from(&OnCallConfig::default())
    }
}

impl From<&OnCallConfig> for ShiftPolicy {
    fn from(config: &OnCallConfig) -> Self {
        Self {
            min_count: config.min_shifts_per_day,
            max_count: config.max_shifts_per_day,
            min_hours: config.min_hours,
            max_hours: config.max_hours,
            start_hour_min: config.start_hour_min,
            start_hour_max: config.start_hour_max.min(LAST_HOUR),
            minute_offsets: config.minute_offsets.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Candidate {
    start: ClockTime,
    end: ClockTime,
}

impl ShiftPolicy {
    fn draw_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Candidate {
        let start_hour = rng.gen_range(self.start_hour_min..=self.start_hour_max);
        let minute = self.minute_offsets.choose(rng).copied().unwrap_or(0);
        let hours = rng.gen_range(self.min_hours..=self.max_hours);

        let start = ClockTime::new(start_hour, minute).unwrap_or(ClockTime::END_OF_DAY);
        let end_hour = start_hour.saturating_add(hours).min(LAST_HOUR);
        let mut end = ClockTime::new(end_hour, start.minute()).unwrap_or(ClockTime::END_OF_DAY);

        // zero-length: zero duration, or a start already in the last hour.
        // In the last hour the end lands on 23:59 rather than the start minute.
        if end <= start {
            end = start.saturating_add_hours(1);
        }

        Candidate { start, end }
    }
}

/// Generate the on-call intervals for a single (employee, day) pair.
///
/// Intervals come back in chronological order, pairwise non-overlapping
/// (back-to-back is allowed) and ranked `1..=k`.
pub fn generate_day_shifts<R: Rng + ?Sized>(policy: &ShiftPolicy, rng: &mut R) -> Vec<ShiftInterval> {
    let target = rng.gen_range(policy.min_count..=policy.max_count);
    if target == 0 {
        return vec![];
    }

    let mut candidates: Vec<Candidate> = (0..target * OVERSAMPLING)
        .map(|_| policy.draw_candidate(rng))
        .collect();
    candidates.sort();

    let mut selected: Vec<ShiftInterval> = Vec::with_capacity(target as usize);
    for candidate in candidates {
        let fits = selected
            .last()
            .is_none_or(|last| candidate.start >= last.end);
        if !fits {
            continue;
        }
        selected.push(ShiftInterval {
            start: candidate.start,
            end: candidate.end,
            rank: selected.len() as u32 + 1,
        });
        if selected.len() as u32 >= target {
            break;
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn assert_well_formed(shifts: &[ShiftInterval]) {
        for (i, a) in shifts.iter().enumerate() {
            assert!(a.start < a.end, "empty interval {a:?}");
            assert_eq!(a.rank, i as u32 + 1);
            for b in &shifts[i + 1..] {
                assert!(a.end <= b.start || b.end <= a.start, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_empty_frequency_matches_uniform_count() {
        let policy = ShiftPolicy {
            min_count: 0,
            max_count: 2,
            min_hours: 2,
            max_hours: 6,
            start_hour_min: 6,
            start_hour_max: 20,
            minute_offsets: vec![0, 15, 30, 45],
        };
        let mut rng = SmallRng::seed_from_u64(42);

        let mut empty = 0;
        for _ in 0..1000 {
            let shifts = generate_day_shifts(&policy, &mut rng);
            if shifts.is_empty() {
                empty += 1;
            } else {
                assert!(shifts.len() <= 2);
                assert_well_formed(&shifts);
            }
        }

        // expected 1/3; allow a generous band around 333
        assert!((270..=400).contains(&empty), "empty count {empty}");
    }

    #[test]
    fn test_intervals_respect_window_and_offsets() {
        let policy = ShiftPolicy::default();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..500 {
            for shift in generate_day_shifts(&policy, &mut rng) {
                assert!((6..=20).contains(&shift.start.hour()));
                assert!([0, 15, 30, 45].contains(&shift.start.minute()));
                assert_eq!(shift.end.minute(), shift.start.minute());
                let hours = shift.end.hour() - shift.start.hour();
                assert!(hours <= 6);
                assert!(hours >= 2 || shift.end.hour() == LAST_HOUR);
            }
        }
    }

    #[test]
    fn test_zero_duration_is_widened_to_one_hour() {
        let policy = ShiftPolicy {
            min_count: 1,
            max_count: 1,
            min_hours: 0,
            max_hours: 0,
            start_hour_min: 9,
            start_hour_max: 9,
            minute_offsets: vec![30],
        };
        let mut rng = SmallRng::seed_from_u64(0);

        let shifts = generate_day_shifts(&policy, &mut rng);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].start, ClockTime::new(9, 30).unwrap());
        assert_eq!(shifts[0].end, ClockTime::new(10, 30).unwrap());
    }

    #[test]
    fn test_last_hour_start_is_clamped_to_end_of_day() {
        let policy = ShiftPolicy {
            min_count: 1,
            max_count: 1,
            min_hours: 4,
            max_hours: 4,
            start_hour_min: 23,
            start_hour_max: 23,
            minute_offsets: vec![15],
        };
        let mut rng = SmallRng::seed_from_u64(0);

        let shifts = generate_day_shifts(&policy, &mut rng);
        assert_eq!(shifts[0].start, ClockTime::new(23, 15).unwrap());
        assert_eq!(shifts[0].end, ClockTime::END_OF_DAY);
    }

    #[test]
    fn test_crowded_window_yields_fewer_intervals() {
        // every candidate starts at 08:00, so only one can be kept
        let policy = ShiftPolicy {
            min_count: 3,
            max_count: 3,
            min_hours: 2,
            max_hours: 2,
            start_hour_min: 8,
            start_hour_max: 8,
            minute_offsets: vec![0],
        };
        let mut rng = SmallRng::seed_from_u64(5);

        let shifts = generate_day_shifts(&policy, &mut rng);
        assert_eq!(shifts.len(), 1);
        assert_eq!(shifts[0].rank, 1);
    }

    #[test]
    fn test_back_to_back_intervals_are_allowed() {
        let a = ShiftInterval {
            start: ClockTime::new(8, 0).unwrap(),
            end: ClockTime::new(10, 0).unwrap(),
            rank: 1,
        };
        let b = ShiftInterval {
            start: ClockTime::new(10, 0).unwrap(),
            end: ClockTime::new(12, 0).unwrap(),
            rank: 2,
        };
        let c = ShiftInterval {
            start: ClockTime::new(9, 0).unwrap(),
            end: ClockTime::new(11, 0).unwrap(),
            rank: 3,
        };

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_many_requested_intervals_stay_disjoint() {
        let policy = ShiftPolicy {
            min_count: 4,
            max_count: 6,
            min_hours: 1,
            max_hours: 3,
            start_hour_min: 0,
            start_hour_max: 22,
            minute_offsets: vec![0, 15, 30, 45],
        };
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..300 {
            let shifts = generate_day_shifts(&policy, &mut rng);
            assert!(!shifts.is_empty());
            assert!(shifts.len() <= 6);
            assert_well_formed(&shifts);
        }
    }
}
