//! Policy Generator: one row of the Policy Table per simulated insured.

use crate::{
    category::{ClaimStatus, CoverageTier, Gender, MedicalHistory, Smoker},
    clock::RunClock,
    config::GeneratorConfig,
    error::GenResult,
    pricing::{self, Derived},
    rng::{RngBank, StreamRng, StreamSlot},
    sampler::{self, RiskProfile},
    types::{EntityId, Idr},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const POLICY_NUMBER_MIN: i64 = 100_000;
const POLICY_NUMBER_MAX: i64 = 999_999;

/// One exported Policy Table row. Field order is column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy_id: EntityId,
    pub inception_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub tenor_years: u32,
    pub age: u32,
    pub gender: Gender,
    pub annual_income_idr: f64,
    pub bmi: f64,
    pub smoker: Smoker,
    pub medical_history: MedicalHistory,
    pub policy_coverage: CoverageTier,
    pub total_premium_idr: Idr,
    pub monthly_premium_idr: Idr,
    pub max_claim_amount_idr: Idr,
    pub claim_status: ClaimStatus,
}

impl PolicyRecord {
    pub fn from_parts(
        policy_id: EntityId,
        profile: RiskProfile,
        derived: Derived,
        claim_status: ClaimStatus,
    ) -> Self {
        Self {
            policy_id,
            inception_date: profile.inception_date,
            expiry_date: profile.expiry_date,
            tenor_years: derived.tenor_years,
            age: profile.age,
            gender: profile.gender,
            annual_income_idr: profile.annual_income,
            bmi: profile.bmi,
            smoker: profile.smoker,
            medical_history: profile.medical_history,
            policy_coverage: profile.coverage,
            total_premium_idr: derived.total_premium,
            monthly_premium_idr: derived.monthly_premium,
            max_claim_amount_idr: derived.max_claim,
            claim_status,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claim_status == ClaimStatus::Claimed
    }
}

/// `pol-` plus six random digits. Collisions are possible and kept.
pub fn generate_policy_id(rng: &mut StreamRng) -> EntityId {
    format!("pol-{}", rng.range_i64(POLICY_NUMBER_MIN, POLICY_NUMBER_MAX))
}

pub struct PolicyGenerator<'a> {
    config: &'a GeneratorConfig,
    clock: RunClock,
}

impl<'a> PolicyGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig, clock: RunClock) -> Self {
        Self { config, clock }
    }

    /// Sample, derive and label one policy.
    ///
    /// claim_status is a fair coin, independent of everything else,
    /// including whether the claim fan-out later emits any rows for it.
    pub fn generate_policy(&self, rng: &mut StreamRng) -> GenResult<PolicyRecord> {
        let uw = &self.config.underwriting;
        let profile = sampler::sample_profile(uw, &self.clock, rng)?;
        let policy_id = generate_policy_id(rng);
        let derived = pricing::derive(uw, &profile);
        let claim_status = rng.pick(ClaimStatus::ALL);
        Ok(PolicyRecord::from_parts(policy_id, profile, derived, claim_status))
    }

    /// Materialize the full Policy Table from the policy stream.
    pub fn generate_table(&self, bank: &RngBank) -> GenResult<Vec<PolicyRecord>> {
        let n = self.config.dataset_size;
        let mut rng = bank.for_stream(StreamSlot::Policy);
        let mut policies = Vec::with_capacity(n);
        for _ in 0..n {
            policies.push(self.generate_policy(&mut rng)?);
        }
        let claimed = policies.iter().filter(|p| p.is_claimed()).count();
        log::info!("policy: generated {n} policies ({claimed} flagged claimed)");
        Ok(policies)
    }
}
