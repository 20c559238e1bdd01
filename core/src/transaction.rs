//! Transaction Fan-out: premium collections for each policy.
//!
//! Collections start on the inception date and repeat every
//! `step_days` (30 by default, an approximation of a month) while the
//! date is on or before both the expiry date and the run date.

use crate::{
    clock::{self, RunClock},
    config::TransactionConfig,
    error::GenResult,
    fan_out::FanOut,
    policy::PolicyRecord,
    pricing::{round_to_unit, SPLIT_ROUNDING},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Idr},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One exported Premium Production row. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumTransaction {
    pub transaction_id: EntityId,
    pub transaction_date: NaiveDate,
    pub policy_id: EntityId,
    pub inception_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub total_premium_idr: Idr,
    pub gross_premium_idr: Idr,
    pub discount: Idr,
    pub komisi_idr: Idr,
    pub premireas_idr: Idr,
    pub komisireas_idr: Idr,
}

/// Deterministic splits of one gross premium collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PremiumSplits {
    pub commission: Idr,
    pub reinsurance_premium: Idr,
    pub reinsurance_commission: Idr,
}

pub fn premium_splits(cfg: &TransactionConfig, gross: Idr) -> PremiumSplits {
    let reinsurance_premium = round_to_unit(gross as f64 * cfg.reinsurance_rate, SPLIT_ROUNDING);
    PremiumSplits {
        commission: round_to_unit(gross as f64 * cfg.commission_rate, SPLIT_ROUNDING),
        reinsurance_premium,
        // Taken on the already-rounded reinsurance premium.
        reinsurance_commission: round_to_unit(
            reinsurance_premium as f64 * cfg.reinsurance_commission_rate,
            SPLIT_ROUNDING,
        ),
    }
}

pub fn discount_amount(cfg: &TransactionConfig, gross: Idr) -> Idr {
    round_to_unit(gross as f64 * cfg.discount_rate, SPLIT_ROUNDING)
}

/// Last date a collection may fall on.
pub fn collection_bound(expiry: NaiveDate, clock: &RunClock) -> NaiveDate {
    expiry.min(clock.today())
}

/// Every collection date for a policy, in order.
pub fn collection_dates(
    inception: NaiveDate,
    expiry: NaiveDate,
    clock: &RunClock,
    step_days: i64,
) -> GenResult<Vec<NaiveDate>> {
    let bound = collection_bound(expiry, clock);
    let mut dates = Vec::new();
    let mut current = inception;
    while current <= bound {
        dates.push(current);
        current = clock::add_days(current, step_days)?;
    }
    Ok(dates)
}

/// floor((bound − inception) / step) + 1, or 0 for a future inception.
pub fn expected_transaction_count(
    inception: NaiveDate,
    expiry: NaiveDate,
    clock: &RunClock,
    step_days: i64,
) -> usize {
    let span = clock::days_between(inception, collection_bound(expiry, clock));
    if span < 0 {
        0
    } else {
        (span / step_days) as usize + 1
    }
}

pub fn transaction_id(policy_id: &str, date: NaiveDate) -> EntityId {
    format!("{policy_id}-{}", date.format("%Y%m%d"))
}

pub struct TransactionFanOut {
    config: TransactionConfig,
    clock: RunClock,
}

impl TransactionFanOut {
    pub fn new(config: TransactionConfig, clock: RunClock) -> Self {
        Self { config, clock }
    }
}

impl FanOut for TransactionFanOut {
    type Row = PremiumTransaction;

    fn name(&self) -> &'static str {
        "transaction"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Transaction
    }

    fn emit(&self, policy: &PolicyRecord, rng: &mut StreamRng) -> GenResult<Vec<PremiumTransaction>> {
        let dates = collection_dates(
            policy.inception_date,
            policy.expiry_date,
            &self.clock,
            self.config.step_days,
        )?;
        if dates.is_empty() {
            log::debug!(
                "transaction: {} incepts {} after run date, no collections",
                policy.policy_id,
                policy.inception_date
            );
        }

        let gross = policy.monthly_premium_idr;
        let splits = premium_splits(&self.config, gross);

        let rows = dates
            .into_iter()
            .map(|date| {
                // Each collection rolls its own discount.
                let discount = if rng.chance(self.config.discount_probability) {
                    discount_amount(&self.config, gross)
                } else {
                    0
                };
                PremiumTransaction {
                    transaction_id: transaction_id(&policy.policy_id, date),
                    transaction_date: date,
                    policy_id: policy.policy_id.clone(),
                    inception_date: policy.inception_date,
                    expiry_date: policy.expiry_date,
                    total_premium_idr: policy.total_premium_idr,
                    gross_premium_idr: gross,
                    discount,
                    komisi_idr: splits.commission,
                    premireas_idr: splits.reinsurance_premium,
                    komisireas_idr: splits.reinsurance_commission,
                }
            })
            .collect();
        Ok(rows)
    }
}
