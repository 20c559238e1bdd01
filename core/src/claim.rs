//! Claim Fan-out: historical claims for policies flagged `claimed`.
//!
//! Each claimed policy gets 1–3 claims. Every claim draws its own
//! dates, causes and amount; claims of the same policy share only the
//! policy's inception date and ceiling.

use crate::{
    category::{CauseOfLoss, ClaimReason, CLAIM_COUNT_WEIGHTS},
    clock,
    config::{ClaimConfig, DayRange},
    error::GenResult,
    fan_out::FanOut,
    policy::PolicyRecord,
    pricing::{round_to_unit, SPLIT_ROUNDING},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Idr},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const CLAIM_NUMBER_MIN: i64 = 100_000;
const CLAIM_NUMBER_MAX: i64 = 999_999;

/// One exported Historical Claim row. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub claim_id: EntityId,
    pub policy_id: EntityId,
    pub report_date: NaiveDate,
    pub process_date: NaiveDate,
    pub settlement_date: NaiveDate,
    pub date_loss: NaiveDate,
    pub cause_loss: CauseOfLoss,
    pub claim_reason: ClaimReason,
    pub claimamount_idr: Idr,
    pub claim_reas_idr: Idr,
    pub inception_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub tenor_years: u32,
    pub max_claim_amount_idr: Idr,
}

/// Report → process → settlement, each strictly after the last.
/// The loss date branches independently off inception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimDates {
    pub loss: NaiveDate,
    pub report: NaiveDate,
    pub process: NaiveDate,
    pub settlement: NaiveDate,
}

fn offset(from: NaiveDate, range: DayRange, rng: &mut StreamRng) -> GenResult<NaiveDate> {
    clock::add_days(from, rng.range_i64(range.min, range.max))
}

pub fn sample_claim_dates(
    cfg: &ClaimConfig,
    inception: NaiveDate,
    rng: &mut StreamRng,
) -> GenResult<ClaimDates> {
    let report = offset(inception, cfg.report_days, rng)?;
    let process = offset(report, cfg.process_days, rng)?;
    let settlement = offset(process, cfg.settlement_days, rng)?;
    let loss = offset(inception, cfg.loss_days, rng)?;
    Ok(ClaimDates { loss, report, process, settlement })
}

pub fn sample_claim_count(rng: &mut StreamRng) -> u32 {
    rng.choose_weighted(&CLAIM_COUNT_WEIGHTS)
}

/// Highest amount a claim may take, or None when the ceiling leaves no
/// room above the floor once the margin is taken off.
pub fn claim_amount_cap(cfg: &ClaimConfig, ceiling: Idr) -> Option<Idr> {
    let cap = ceiling - cfg.ceiling_margin;
    (cap >= cfg.amount_floor).then_some(cap)
}

/// Uniform in [floor, ceiling − margin]. Low ceilings clamp to the floor;
/// this is a deliberate minimum payout, not an error.
pub fn sample_claim_amount(cfg: &ClaimConfig, ceiling: Idr, rng: &mut StreamRng) -> Idr {
    match claim_amount_cap(cfg, ceiling) {
        Some(cap) => rng.range_inclusive_i64(cfg.amount_floor, cap),
        None => cfg.amount_floor,
    }
}

pub fn reinsurer_share(cfg: &ClaimConfig, claim_amount: Idr) -> Idr {
    round_to_unit(claim_amount as f64 * cfg.reinsurer_share, SPLIT_ROUNDING)
}

pub fn generate_claim_id(policy_id: &str, rng: &mut StreamRng) -> EntityId {
    format!("cl-{policy_id}-{}", rng.range_i64(CLAIM_NUMBER_MIN, CLAIM_NUMBER_MAX))
}

pub struct ClaimFanOut {
    config: ClaimConfig,
}

impl ClaimFanOut {
    pub fn new(config: ClaimConfig) -> Self {
        Self { config }
    }

    fn generate_claim(&self, policy: &PolicyRecord, rng: &mut StreamRng) -> GenResult<ClaimRecord> {
        let claim_id = generate_claim_id(&policy.policy_id, rng);
        let dates = sample_claim_dates(&self.config, policy.inception_date, rng)?;
        let cause_loss = rng.pick(CauseOfLoss::ALL);
        let amount = sample_claim_amount(&self.config, policy.max_claim_amount_idr, rng);
        let claim_reason = rng.pick(ClaimReason::ALL);

        Ok(ClaimRecord {
            claim_id,
            policy_id: policy.policy_id.clone(),
            report_date: dates.report,
            process_date: dates.process,
            settlement_date: dates.settlement,
            date_loss: dates.loss,
            cause_loss,
            claim_reason,
            claimamount_idr: amount,
            claim_reas_idr: reinsurer_share(&self.config, amount),
            inception_date: policy.inception_date,
            expiry_date: policy.expiry_date,
            tenor_years: policy.tenor_years,
            max_claim_amount_idr: policy.max_claim_amount_idr,
        })
    }
}

impl FanOut for ClaimFanOut {
    type Row = ClaimRecord;

    fn name(&self) -> &'static str {
        "claim"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Claim
    }

    fn applies_to(&self, policy: &PolicyRecord) -> bool {
        policy.is_claimed()
    }

    fn emit(&self, policy: &PolicyRecord, rng: &mut StreamRng) -> GenResult<Vec<ClaimRecord>> {
        let count = sample_claim_count(rng);
        (0..count).map(|_| self.generate_claim(policy, rng)).collect()
    }
}
