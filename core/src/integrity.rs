//! Post-generation integrity checks over the three linked tables.
//!
//! Every check here is deterministic per row; distributional properties
//! (claim-count weights, income spread) live in the test suite instead.

use crate::{
    claim::{claim_amount_cap, ClaimRecord},
    clock::{self, RunClock},
    config::GeneratorConfig,
    engine::Dataset,
    policy::PolicyRecord,
    pricing::{tenor_years, MONTHLY_ROUNDING},
    transaction::expected_transaction_count,
    types::Idr,
};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityViolation {
    ExpiryNotAfterInception { policy_id: String, inception: NaiveDate, expiry: NaiveDate },
    TenorMismatch { policy_id: String, recorded: u32, expected: u32 },
    MonthlyPremiumOffTotal { policy_id: String, monthly: Idr, total: Idr, tenor: u32 },
    TransactionCountMismatch { policy_id: String, recorded: usize, expected: usize },
    TransactionOffSchedule { transaction_id: String, date: NaiveDate, expected: NaiveDate },
    TransactionWrongParent { transaction_id: String, expected_policy: String },
    TrailingTransactions { count: usize },
    ClaimOutsideBounds { claim_id: String, amount: Idr, floor: Idr, cap: Idr },
    ClaimNotClampedToFloor { claim_id: String, amount: Idr, floor: Idr },
    ClaimDatesOutOfOrder { claim_id: String },
    ClaimWithoutClaimedPolicy { claim_id: String, policy_id: String },
    ClaimCountOutOfRange { policy_id: String, claims: usize, claimed_policies: usize },
}

impl std::fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpiryNotAfterInception { policy_id, inception, expiry } => {
                write!(f, "ExpiryNotAfterInception policy={policy_id} inception={inception} expiry={expiry}")
            }
            Self::TenorMismatch { policy_id, recorded, expected } => {
                write!(f, "TenorMismatch policy={policy_id} recorded={recorded} expected={expected}")
            }
            Self::MonthlyPremiumOffTotal { policy_id, monthly, total, tenor } => {
                write!(f, "MonthlyPremiumOffTotal policy={policy_id} monthly={monthly} total={total} tenor={tenor}")
            }
            Self::TransactionCountMismatch { policy_id, recorded, expected } => {
                write!(f, "TransactionCountMismatch policy={policy_id} recorded={recorded} expected={expected}")
            }
            Self::TransactionOffSchedule { transaction_id, date, expected } => {
                write!(f, "TransactionOffSchedule txn={transaction_id} date={date} expected={expected}")
            }
            Self::TransactionWrongParent { transaction_id, expected_policy } => {
                write!(f, "TransactionWrongParent txn={transaction_id} expected_policy={expected_policy}")
            }
            Self::TrailingTransactions { count } => {
                write!(f, "TrailingTransactions count={count}")
            }
            Self::ClaimOutsideBounds { claim_id, amount, floor, cap } => {
                write!(f, "ClaimOutsideBounds claim={claim_id} amount={amount} floor={floor} cap={cap}")
            }
            Self::ClaimNotClampedToFloor { claim_id, amount, floor } => {
                write!(f, "ClaimNotClampedToFloor claim={claim_id} amount={amount} floor={floor}")
            }
            Self::ClaimDatesOutOfOrder { claim_id } => {
                write!(f, "ClaimDatesOutOfOrder claim={claim_id}")
            }
            Self::ClaimWithoutClaimedPolicy { claim_id, policy_id } => {
                write!(f, "ClaimWithoutClaimedPolicy claim={claim_id} policy={policy_id}")
            }
            Self::ClaimCountOutOfRange { policy_id, claims, claimed_policies } => {
                write!(f, "ClaimCountOutOfRange policy={policy_id} claims={claims} claimed_policies={claimed_policies}")
            }
        }
    }
}

fn check_policy(p: &PolicyRecord, out: &mut Vec<IntegrityViolation>) {
    if p.expiry_date <= p.inception_date {
        out.push(IntegrityViolation::ExpiryNotAfterInception {
            policy_id: p.policy_id.clone(),
            inception: p.inception_date,
            expiry: p.expiry_date,
        });
    }
    let expected = tenor_years(p.inception_date, p.expiry_date);
    if p.tenor_years != expected || p.tenor_years < 1 {
        out.push(IntegrityViolation::TenorMismatch {
            policy_id: p.policy_id.clone(),
            recorded: p.tenor_years,
            expected,
        });
    }
    // The monthly figure is rounded once, so it sits within half a
    // rounding unit of the exact spread.
    let exact = p.total_premium_idr as f64 / (p.tenor_years.max(1) * 12) as f64;
    if (p.monthly_premium_idr as f64 - exact).abs() > MONTHLY_ROUNDING as f64 / 2.0 + 1e-6 {
        out.push(IntegrityViolation::MonthlyPremiumOffTotal {
            policy_id: p.policy_id.clone(),
            monthly: p.monthly_premium_idr,
            total: p.total_premium_idr,
            tenor: p.tenor_years,
        });
    }
}

/// Transactions are emitted in Policy Table order, so walking both
/// tables together pairs every row with its true parent even when two
/// policies share an ID.
fn check_transactions(ds: &Dataset, cfg: &GeneratorConfig, out: &mut Vec<IntegrityViolation>) {
    let clock = RunClock::pinned(ds.run_date);
    let step = cfg.transactions.step_days;
    let mut cursor = 0usize;

    for p in &ds.policies {
        let expected = expected_transaction_count(p.inception_date, p.expiry_date, &clock, step);
        let recorded = ds.transactions[cursor..]
            .iter()
            .take(expected)
            .take_while(|t| t.policy_id == p.policy_id)
            .count();
        if recorded != expected {
            out.push(IntegrityViolation::TransactionCountMismatch {
                policy_id: p.policy_id.clone(),
                recorded,
                expected,
            });
        }

        for (k, t) in ds.transactions[cursor..cursor + recorded].iter().enumerate() {
            let due = clock::add_days(p.inception_date, step * k as i64).ok();
            if due != Some(t.transaction_date) {
                out.push(IntegrityViolation::TransactionOffSchedule {
                    transaction_id: t.transaction_id.clone(),
                    date: t.transaction_date,
                    expected: due.unwrap_or(p.inception_date),
                });
            }
        }
        cursor += recorded;

        if recorded < expected {
            if let Some(t) = ds.transactions.get(cursor) {
                out.push(IntegrityViolation::TransactionWrongParent {
                    transaction_id: t.transaction_id.clone(),
                    expected_policy: p.policy_id.clone(),
                });
            }
        }
    }

    if cursor < ds.transactions.len() {
        out.push(IntegrityViolation::TrailingTransactions {
            count: ds.transactions.len() - cursor,
        });
    }
}

fn check_claim(c: &ClaimRecord, cfg: &GeneratorConfig, out: &mut Vec<IntegrityViolation>) {
    match claim_amount_cap(&cfg.claims, c.max_claim_amount_idr) {
        Some(cap) if c.claimamount_idr > cap || c.claimamount_idr < cfg.claims.amount_floor => {
            out.push(IntegrityViolation::ClaimOutsideBounds {
                claim_id: c.claim_id.clone(),
                amount: c.claimamount_idr,
                floor: cfg.claims.amount_floor,
                cap,
            });
        }
        None if c.claimamount_idr != cfg.claims.amount_floor => {
            out.push(IntegrityViolation::ClaimNotClampedToFloor {
                claim_id: c.claim_id.clone(),
                amount: c.claimamount_idr,
                floor: cfg.claims.amount_floor,
            });
        }
        _ => {}
    }

    let chained = c.report_date >= c.inception_date
        && c.process_date > c.report_date
        && c.settlement_date > c.process_date
        && c.date_loss > c.inception_date;
    if !chained {
        out.push(IntegrityViolation::ClaimDatesOutOfOrder {
            claim_id: c.claim_id.clone(),
        });
    }
}

fn check_claim_parents(ds: &Dataset, out: &mut Vec<IntegrityViolation>) {
    let mut claimed: HashMap<&str, usize> = HashMap::new();
    for p in ds.policies.iter().filter(|p| p.is_claimed()) {
        *claimed.entry(p.policy_id.as_str()).or_insert(0) += 1;
    }

    let mut per_policy: HashMap<&str, usize> = HashMap::new();
    for c in &ds.claims {
        if claimed.contains_key(c.policy_id.as_str()) {
            *per_policy.entry(c.policy_id.as_str()).or_insert(0) += 1;
        } else {
            out.push(IntegrityViolation::ClaimWithoutClaimedPolicy {
                claim_id: c.claim_id.clone(),
                policy_id: c.policy_id.clone(),
            });
        }
    }

    for (policy_id, parents) in &claimed {
        let claims = per_policy.get(policy_id).copied().unwrap_or(0);
        if claims < *parents || claims > 3 * parents {
            out.push(IntegrityViolation::ClaimCountOutOfRange {
                policy_id: policy_id.to_string(),
                claims,
                claimed_policies: *parents,
            });
        }
    }
}

/// Check every row of a generated dataset. An empty result means every
/// invariant holds.
pub fn verify_dataset(ds: &Dataset, cfg: &GeneratorConfig) -> Vec<IntegrityViolation> {
    let mut out = Vec::new();
    for p in &ds.policies {
        check_policy(p, &mut out);
    }
    check_transactions(ds, cfg, &mut out);
    for c in &ds.claims {
        check_claim(c, cfg, &mut out);
    }
    check_claim_parents(ds, &mut out);
    out
}
