//! Dataset generator: runs the policy build and both fan-outs.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Resolve the run date once.
//!   2. Policy Table      (policy stream, strictly sequential)
//!   3. Transaction fan-out over the finished Policy Table
//!   4. Claim fan-out over the finished Policy Table (claimed only)
//!
//! RULES:
//!   - Both fan-outs are read-only passes; neither sees the other's rows.
//!   - All randomness flows through the RngBank.
//!   - Any failure aborts the whole run; there are no partial tables.

use crate::{
    claim::{ClaimFanOut, ClaimRecord},
    clock::RunClock,
    config::GeneratorConfig,
    error::GenResult,
    fan_out::run_fan_out,
    policy::{PolicyGenerator, PolicyRecord},
    rng::RngBank,
    transaction::{PremiumTransaction, TransactionFanOut},
};
use chrono::NaiveDate;

/// The three linked tables of one run, fully materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub seed: u64,
    pub run_date: NaiveDate,
    pub policies: Vec<PolicyRecord>,
    pub transactions: Vec<PremiumTransaction>,
    pub claims: Vec<ClaimRecord>,
}

pub struct DatasetGenerator {
    pub clock: RunClock,
    pub rng_bank: RngBank,
    config: GeneratorConfig,
}

impl DatasetGenerator {
    /// Validate the config and pin the run date.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self {
            clock: RunClock::resolve(config.run_date),
            rng_bank: RngBank::new(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build the Policy Table only.
    pub fn generate_policies(&self) -> GenResult<Vec<PolicyRecord>> {
        PolicyGenerator::new(&self.config, self.clock).generate_table(&self.rng_bank)
    }

    pub fn generate_transactions(
        &self,
        policies: &[PolicyRecord],
    ) -> GenResult<Vec<PremiumTransaction>> {
        let fan_out = TransactionFanOut::new(self.config.transactions.clone(), self.clock);
        run_fan_out(&fan_out, policies, &self.rng_bank, self.config.parallel_fan_out)
    }

    pub fn generate_claims(&self, policies: &[PolicyRecord]) -> GenResult<Vec<ClaimRecord>> {
        let fan_out = ClaimFanOut::new(self.config.claims.clone());
        run_fan_out(&fan_out, policies, &self.rng_bank, self.config.parallel_fan_out)
    }

    /// Run every stage in the documented order.
    pub fn generate(&self) -> GenResult<Dataset> {
        log::info!(
            "generator: seed={} policies={} run_date={}",
            self.config.seed,
            self.config.dataset_size,
            self.clock.today()
        );
        let policies = self.generate_policies()?;
        let transactions = self.generate_transactions(&policies)?;
        let claims = self.generate_claims(&policies)?;

        Ok(Dataset {
            seed: self.config.seed,
            run_date: self.clock.today(),
            policies,
            transactions,
            claims,
        })
    }
}
