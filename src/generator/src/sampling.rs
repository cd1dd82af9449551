//! Uniform sampling helpers for dates, identifiers and contact details.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use common::config::EMPLOYEE_ID_SPACE;
use rand::Rng;
use rand::seq::{SliceRandom, index};

use crate::GenerationError;
use crate::catalog::{STREET_NAMES, STREET_SUFFIXES};
use crate::hierarchy::EmployeeId;

/// Smallest employee identifier.
pub const EMPLOYEE_ID_BASE: EmployeeId = 100_000_000;

/// Inclusive calendar range that every generated date falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateRange {
    /// Bounds are swapped when given in reverse.
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn sample_date<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDate {
        date_between(self.min, self.max, rng)
    }

    /// Date between `start` and the end of the range.
    pub fn sample_from<R: Rng + ?Sized>(&self, start: NaiveDate, rng: &mut R) -> NaiveDate {
        date_between(start, self.max, rng)
    }

    /// Minute-precision timestamp from the first minute of `min` to the last
    /// minute of `max`.
    pub fn sample_timestamp<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveDateTime {
        let first = self.min.and_time(NaiveTime::MIN);
        let last = self.max.and_time(NaiveTime::MIN) + Duration::minutes(23 * 60 + 59);
        let total = (last - first).num_minutes();
        first + Duration::minutes(rng.gen_range(0..=total))
    }
}

/// Uniform date in `[start, end]`; the bounds may come in either order.
pub fn date_between<R: Rng + ?Sized>(start: NaiveDate, end: NaiveDate, rng: &mut R) -> NaiveDate {
    let (start, end) = if end < start {
        (end, start)
    } else {
        (start, end)
    };
    let span = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=span))
}

/// Full years between `birth` and `on`.
pub fn age_on(on: NaiveDate, birth: NaiveDate) -> i32 {
    let before_birthday = (on.month(), on.day()) < (birth.month(), birth.day());
    on.year() - birth.year() - i32::from(before_birthday)
}

/// Birth date that puts the employee between `min_age` and `max_age` at hire.
///
/// Draws from a window of whole-year approximations and falls back to thirty
/// years before hire when the draw lands outside the allowed ages.
pub fn birth_date_for<R: Rng + ?Sized>(
    hire: NaiveDate,
    min_age: u32,
    max_age: u32,
    rng: &mut R,
) -> NaiveDate {
    let latest = hire - Duration::days(i64::from(min_age) * 365 + 4);
    let earliest = hire - Duration::days(i64::from(max_age) * 365 + 16);
    let fallback = hire - Duration::days(30 * 365);

    let birth = if earliest > latest {
        fallback
    } else {
        date_between(earliest, latest, rng)
    };

    let age = age_on(hire, birth);
    if age < min_age as i32 || age > max_age as i32 {
        fallback
    } else {
        birth
    }
}

/// Draw `count` distinct employee ids without replacement.
pub fn unique_employee_ids<R: Rng + ?Sized>(
    count: u64,
    rng: &mut R,
) -> Result<Vec<EmployeeId>, GenerationError> {
    if count > EMPLOYEE_ID_SPACE {
        return Err(GenerationError::IdSpaceExhausted {
            requested: count,
            available: EMPLOYEE_ID_SPACE,
        });
    }
    let ids = index::sample(rng, EMPLOYEE_ID_SPACE as usize, count as usize)
        .into_iter()
        .map(|i| EMPLOYEE_ID_BASE + i as EmployeeId)
        .collect();
    Ok(ids)
}

pub fn phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("+1{}", rng.gen_range(2_000_000_000u64..=9_999_999_999))
}

pub fn street_address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number = rng.gen_range(1..=9999);
    let name = STREET_NAMES.choose(rng).copied().unwrap_or("Main");
    let suffix = STREET_SUFFIXES.choose(rng).copied().unwrap_or("St.");
    format!("{number} {name} {suffix}")
}

/// Hands out e-mail addresses, numbering the local part on collisions.
#[derive(Debug, Default)]
pub struct EmailRegistry {
    used: HashSet<String>,
}

impl EmailRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, first: &str, last: &str, domain: &str) -> String {
        let base = format!("{}.{}", first.to_lowercase(), last.to_lowercase());
        let mut email = format!("{base}@{domain}");
        let mut suffix = 1;
        while self.used.contains(&email) {
            email = format!("{base}{suffix}@{domain}");
            suffix += 1;
        }
        self.used.insert(email.clone());
        email
    }
}

/// Round to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
