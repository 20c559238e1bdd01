//! Attribute Sampler: independent risk-rating draws for one policy.
//!
//! Every function here takes the caller's stream explicitly; nothing
//! is shared between policies except the bank the streams came from.

use crate::{
    category::{
        CoverageTier, Gender, MedicalHistory, Smoker, COVERAGE_WEIGHTS, MEDICAL_HISTORY_WEIGHTS,
    },
    clock::{self, RunClock},
    config::{IncomeConfig, UnderwritingConfig},
    error::GenResult,
    pricing::round_decimals,
    rng::StreamRng,
};
use chrono::{Datelike, NaiveDate};

/// Income band an applicant falls into by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Young,
    Mid,
    Old,
}

impl AgeBand {
    pub fn of(age: u32, cfg: &IncomeConfig) -> Self {
        if age < cfg.young_below {
            AgeBand::Young
        } else if age < cfg.mid_below {
            AgeBand::Mid
        } else {
            AgeBand::Old
        }
    }
}

/// The independently sampled attributes of one insured.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskProfile {
    pub age: u32,
    pub gender: Gender,
    pub annual_income: f64,
    pub bmi: f64,
    pub smoker: Smoker,
    pub medical_history: MedicalHistory,
    pub coverage: CoverageTier,
    pub inception_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

pub fn sample_age(cfg: &UnderwritingConfig, rng: &mut StreamRng) -> u32 {
    rng.range_i64(cfg.min_age as i64, cfg.max_age as i64) as u32
}

/// Normal draw scaled by the age band's multiplier, then floored.
/// The multiplier applies to the raw draw, never to the floor.
pub fn sample_income(cfg: &IncomeConfig, age: u32, rng: &mut StreamRng) -> f64 {
    let raw = rng.normal(cfg.mean, cfg.std_dev);
    scale_income(cfg, age, raw)
}

pub fn scale_income(cfg: &IncomeConfig, age: u32, raw: f64) -> f64 {
    let (multiplier, floor) = match AgeBand::of(age, cfg) {
        AgeBand::Young => (cfg.young_multiplier, cfg.young_floor),
        AgeBand::Mid => (cfg.mid_multiplier, cfg.mid_floor),
        AgeBand::Old => (cfg.old_multiplier, cfg.old_floor),
    };
    (raw * multiplier).max(floor)
}

/// One decimal place; implausibly low draws are clamped first.
pub fn sample_bmi(cfg: &UnderwritingConfig, rng: &mut StreamRng) -> f64 {
    let raw = rng.normal(cfg.bmi_mean, cfg.bmi_std_dev).max(cfg.bmi_floor);
    round_decimals(raw, 1)
}

pub fn sample_medical_history(rng: &mut StreamRng) -> MedicalHistory {
    rng.choose_weighted(&MEDICAL_HISTORY_WEIGHTS)
}

pub fn sample_coverage(rng: &mut StreamRng) -> CoverageTier {
    rng.choose_weighted(&COVERAGE_WEIGHTS)
}

/// Run date minus a random offset, snapped to January 1 of that year.
pub fn sample_inception_date(
    cfg: &UnderwritingConfig,
    clock: &RunClock,
    rng: &mut StreamRng,
) -> GenResult<NaiveDate> {
    let offset = rng.range_i64(cfg.inception_offset_days.min, cfg.inception_offset_days.max);
    let shifted = clock::add_days(clock.today(), -offset)?;
    clock::january_first(shifted.year())
}

/// Inception date with the year pushed forward by the sampled tenor.
pub fn sample_expiry_date(
    cfg: &UnderwritingConfig,
    inception: NaiveDate,
    rng: &mut StreamRng,
) -> GenResult<NaiveDate> {
    let years = rng.range_i64(cfg.min_tenor_years as i64, cfg.max_tenor_years_exclusive as i64);
    clock::with_year(inception, inception.year() + years as i32)
}

/// Draw every risk attribute for one policy, in questionnaire order.
pub fn sample_profile(
    cfg: &UnderwritingConfig,
    clock: &RunClock,
    rng: &mut StreamRng,
) -> GenResult<RiskProfile> {
    let age = sample_age(cfg, rng);
    let gender = rng.pick(Gender::ALL);
    let annual_income = sample_income(&cfg.income, age, rng);
    let bmi = sample_bmi(cfg, rng);
    let smoker = rng.pick(Smoker::ALL);
    let medical_history = sample_medical_history(rng);
    let coverage = sample_coverage(rng);
    let inception_date = sample_inception_date(cfg, clock, rng)?;
    let expiry_date = sample_expiry_date(cfg, inception_date, rng)?;

    Ok(RiskProfile {
        age,
        gender,
        annual_income,
        bmi,
        smoker,
        medical_history,
        coverage,
        inception_date,
        expiry_date,
    })
}
