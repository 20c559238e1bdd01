//! End-of-run figures for the runner printout and the run manifest.

use crate::{clock::RunClock, engine::Dataset, types::Idr};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub policy_count: usize,
    pub claimed_policy_count: usize,
    pub transaction_count: usize,
    pub claim_count: usize,
    /// Policies whose inception lies after the run date.
    pub policies_without_transactions: usize,
    /// Distinct policy IDs drawn more than once.
    pub duplicate_policy_ids: usize,
    /// Claimed policies keyed by how many claims they produced.
    pub claims_per_policy: BTreeMap<usize, usize>,
    pub total_written_premium_idr: Idr,
    pub total_collected_premium_idr: Idr,
    pub total_discount_idr: Idr,
    pub total_claim_amount_idr: Idr,
    pub total_reinsurer_share_idr: Idr,
}

impl DatasetSummary {
    pub fn from_dataset(ds: &Dataset) -> Self {
        let mut id_counts: HashMap<&str, usize> = HashMap::new();
        for p in &ds.policies {
            *id_counts.entry(p.policy_id.as_str()).or_insert(0) += 1;
        }

        let clock = RunClock::pinned(ds.run_date);
        let policies_without_transactions = ds
            .policies
            .iter()
            .filter(|p| clock.is_future(p.inception_date))
            .count();

        // Claims carry the policy ID only; with unique IDs this is exact.
        let mut per_policy: HashMap<&str, usize> = HashMap::new();
        for c in &ds.claims {
            *per_policy.entry(c.policy_id.as_str()).or_insert(0) += 1;
        }
        let mut claims_per_policy = BTreeMap::new();
        for n in per_policy.values() {
            *claims_per_policy.entry(*n).or_insert(0) += 1;
        }

        Self {
            policy_count: ds.policies.len(),
            claimed_policy_count: ds.policies.iter().filter(|p| p.is_claimed()).count(),
            transaction_count: ds.transactions.len(),
            claim_count: ds.claims.len(),
            policies_without_transactions,
            duplicate_policy_ids: id_counts.values().filter(|&&n| n > 1).count(),
            claims_per_policy,
            total_written_premium_idr: ds.policies.iter().map(|p| p.total_premium_idr).sum(),
            total_collected_premium_idr: ds.transactions.iter().map(|t| t.gross_premium_idr).sum(),
            total_discount_idr: ds.transactions.iter().map(|t| t.discount).sum(),
            total_claim_amount_idr: ds.claims.iter().map(|c| c.claimamount_idr).sum(),
            total_reinsurer_share_idr: ds.claims.iter().map(|c| c.claim_reas_idr).sum(),
        }
    }
}

/// Written next to the CSV tables so a dataset can be traced back to
/// the exact seed and date that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub generator_version: String,
    pub seed: u64,
    pub run_date: NaiveDate,
    pub dataset_size: usize,
    pub files: Vec<String>,
    pub summary: DatasetSummary,
}

impl RunManifest {
    pub fn new(ds: &Dataset, files: Vec<String>) -> Self {
        Self {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            seed: ds.seed,
            run_date: ds.run_date,
            dataset_size: ds.policies.len(),
            files,
            summary: DatasetSummary::from_dataset(ds),
        }
    }
}
