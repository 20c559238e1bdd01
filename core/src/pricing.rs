//! Derivation Engine: pricing and underwriting formulas.
//!
//! Pure functions of the sampled risk profile; no randomness here.
//! All currency rounding is round-half-to-even at the stated magnitude.

use crate::{
    category::Gender,
    config::UnderwritingConfig,
    sampler::RiskProfile,
    types::Idr,
};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

pub const PREMIUM_ROUNDING: Idr = 1_000;
pub const MONTHLY_ROUNDING: Idr = 100;
pub const CEILING_ROUNDING: Idr = 1_000_000;
/// Commission, discount, reinsurance and claim-share splits.
pub const SPLIT_ROUNDING: Idr = 1_000;

/// Round to the nearest multiple of `unit`, ties to even.
pub fn round_to_unit(value: f64, unit: Idr) -> Idr {
    let unit = unit as f64;
    ((value / unit).round_ties_even() * unit) as Idr
}

/// Round to a number of decimal places, ties to even.
pub fn round_decimals(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Whole policy years, never less than one.
pub fn tenor_years(inception: NaiveDate, expiry: NaiveDate) -> u32 {
    (expiry.year() - inception.year()).max(1) as u32
}

/// Product of every risk loading applied to the age component.
pub fn premium_loading(cfg: &UnderwritingConfig, p: &RiskProfile) -> f64 {
    let pc = &cfg.premium;
    let coverage = pc.coverage_factors.get(p.coverage);
    let smoker = if p.smoker.is_smoker() { pc.smoker_factor } else { 1.0 };
    let gender = if p.gender == Gender::Male { pc.male_factor } else { 1.0 };
    let bmi = if p.bmi > pc.bmi_threshold { pc.bmi_factor } else { 1.0 };
    let medical = cfg.medical_factors.get(p.medical_history);
    coverage * smoker * gender * bmi * medical
}

/// (base + age_factor × loadings) × tenor × tenor_multiplier, to the nearest 1,000.
pub fn total_premium(cfg: &UnderwritingConfig, p: &RiskProfile, tenor: u32) -> Idr {
    let pc = &cfg.premium;
    let age_factor = (p.age as f64 - cfg.min_age as f64) * pc.age_premium_factor;
    let annual = pc.base_premium + age_factor * premium_loading(cfg, p);
    round_to_unit(annual * tenor as f64 * pc.tenor_multiplier, PREMIUM_ROUNDING)
}

pub fn monthly_premium(total_premium: Idr, tenor: u32) -> Idr {
    let months = (tenor.max(1) * 12) as f64;
    round_to_unit(total_premium as f64 / months, MONTHLY_ROUNDING)
}

/// Maximum payable claim, to the nearest 1,000,000.
pub fn max_claim_ceiling(cfg: &UnderwritingConfig, p: &RiskProfile, tenor: u32) -> Idr {
    let cc = &cfg.ceiling;
    let base = cc.base_claim.get(p.coverage);
    let age = if p.age >= cc.senior_age { cc.age_adjustment } else { 1.0 };
    let smoker = if p.smoker.is_smoker() { cc.smoker_adjustment } else { 1.0 };
    let gender = if p.gender == Gender::Male { cc.male_adjustment } else { 1.0 };
    let income = (p.annual_income / cc.income_divisor).min(cc.max_income_factor);
    let medical = cfg.medical_factors.get(p.medical_history);
    let tenor_factor = tenor as f64 * cc.tenor_multiplier;
    round_to_unit(
        base * age * smoker * gender * income * medical * tenor_factor,
        CEILING_ROUNDING,
    )
}

/// Every dependent quantity of one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Derived {
    pub tenor_years: u32,
    pub total_premium: Idr,
    pub monthly_premium: Idr,
    pub max_claim: Idr,
}

pub fn derive(cfg: &UnderwritingConfig, p: &RiskProfile) -> Derived {
    let tenor = tenor_years(p.inception_date, p.expiry_date);
    let total = total_premium(cfg, p, tenor);
    Derived {
        tenor_years: tenor,
        total_premium: total,
        monthly_premium: monthly_premium(total, tenor),
        max_claim: max_claim_ceiling(cfg, p, tenor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_even() {
        assert_eq!(round_to_unit(2_500.0, 1_000), 2_000);
        assert_eq!(round_to_unit(3_500.0, 1_000), 4_000);
        assert_eq!(round_to_unit(3_499.9, 1_000), 3_000);
        assert_eq!(round_to_unit(150.0, 100), 200);
    }

    #[test]
    fn decimals_round_to_one_place() {
        assert_eq!(round_decimals(24.96, 1), 25.0);
        assert_eq!(round_decimals(31.04, 1), 31.0);
    }

    #[test]
    fn monthly_premium_spreads_over_tenor_months() {
        assert_eq!(monthly_premium(11_524_000, 3), 320_100);
        assert_eq!(monthly_premium(1_200_000, 1), 100_000);
    }
}
