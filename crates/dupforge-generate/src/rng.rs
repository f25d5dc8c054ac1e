//! Helpers drawing identifiers, dates and counts from the run generator.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Poisson};

use dupforge_core::DateRange;

/// The single generator of a run.
pub fn run_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Version-4 UUID built from generator bytes, so ids follow the seed.
pub fn random_uuid(rng: &mut dyn RngCore) -> String {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

pub fn random_date(range: &DateRange, rng: &mut dyn RngCore) -> NaiveDate {
    let span = (range.end - range.start).num_days().max(0);
    range.start + Duration::days(rng.random_range(0..=span))
}

pub fn random_datetime(range: &DateRange, rng: &mut dyn RngCore) -> NaiveDateTime {
    let date = random_date(range, rng);
    let seconds = rng.random_range(0..86_400);
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default();
    date.and_time(time)
}

/// Second-resolution instant in `[start, end]`; `start` when the window is empty.
pub fn datetime_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut dyn RngCore,
) -> NaiveDateTime {
    let span = (end - start).num_seconds();
    if span <= 0 {
        return start;
    }
    start + Duration::seconds(rng.random_range(0..=span))
}

/// Poisson draw; zero when `mean` is not positive.
pub fn poisson(mean: f64, rng: &mut dyn RngCore) -> u32 {
    let Ok(distribution) = Poisson::new(mean) else {
        return 0;
    };
    let draw: f64 = distribution.sample(rng);
    draw as u32
}

/// Weighted pick over `(value, weight)` pairs by cumulative roll.
pub fn weighted_pick<'a, T>(entries: &'a [(T, f64)], rng: &mut dyn RngCore) -> Option<&'a T> {
    let total: f64 = entries.iter().map(|(_, weight)| weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.random_range(0.0..total);
    for (value, weight) in entries {
        let weight = weight.max(0.0);
        if roll < weight {
            return Some(value);
        }
        roll -= weight;
    }
    entries
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(value, _)| value)
}
