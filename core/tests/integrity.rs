//! Integrity verification over generated and tampered datasets.

use chrono::NaiveDate;
use lifebook_core::{
    config::GeneratorConfig,
    engine::{Dataset, DatasetGenerator},
    integrity::{verify_dataset, IntegrityViolation},
    summary::DatasetSummary,
};

fn generated(size: usize) -> (Dataset, GeneratorConfig) {
    let config = GeneratorConfig { dataset_size: size, ..GeneratorConfig::default_test() };
    let ds = DatasetGenerator::new(config.clone()).unwrap().generate().unwrap();
    (ds, config)
}

#[test]
fn generated_dataset_is_clean() {
    let (ds, config) = generated(2_000);
    let violations = verify_dataset(&ds, &config);
    assert!(
        violations.is_empty(),
        "first violations: {:?}",
        violations.iter().take(5).map(|v| v.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn parallel_dataset_is_clean() {
    let config = GeneratorConfig { parallel_fan_out: true, ..GeneratorConfig::default_test() };
    let ds = DatasetGenerator::new(config.clone()).unwrap().generate().unwrap();
    assert!(verify_dataset(&ds, &config).is_empty());
}

#[test]
fn tampered_monthly_premium_is_reported() {
    let (mut ds, config) = generated(50);
    ds.policies[3].monthly_premium_idr += 1_000;
    let id = ds.policies[3].policy_id.clone();

    let violations = verify_dataset(&ds, &config);
    assert!(violations.iter().any(|v| matches!(
        v,
        IntegrityViolation::MonthlyPremiumOffTotal { policy_id, .. } if *policy_id == id
    )));
}

#[test]
fn claim_above_cap_is_reported() {
    let (mut ds, config) = generated(200);
    let claim = ds.claims.first_mut().expect("some claims");
    // One above whichever bound applies: the cap, or the clamped floor.
    claim.claimamount_idr = claim.max_claim_amount_idr.max(50_000_000) + 1;

    let violations = verify_dataset(&ds, &config);
    assert!(violations.iter().any(|v| matches!(
        v,
        IntegrityViolation::ClaimOutsideBounds { .. } | IntegrityViolation::ClaimNotClampedToFloor { .. }
    )));
}

#[test]
fn dropped_transaction_is_reported() {
    let (mut ds, config) = generated(50);
    let removed = ds.transactions.remove(0);

    let violations = verify_dataset(&ds, &config);
    assert!(violations.iter().any(|v| matches!(
        v,
        IntegrityViolation::TransactionCountMismatch { policy_id, .. } if *policy_id == removed.policy_id
    )));
}

#[test]
fn shifted_transaction_date_is_reported() {
    let (mut ds, config) = generated(50);
    let t = &mut ds.transactions[1];
    t.transaction_date = t.transaction_date.succ_opt().unwrap();

    let violations = verify_dataset(&ds, &config);
    assert!(violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::TransactionOffSchedule { .. })));
}

#[test]
fn reversed_claim_dates_are_reported() {
    let (mut ds, config) = generated(200);
    let claim = ds.claims.first_mut().expect("some claims");
    claim.settlement_date = claim.report_date;

    let violations = verify_dataset(&ds, &config);
    assert!(violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::ClaimDatesOutOfOrder { .. })));
}

#[test]
fn orphan_claim_is_reported() {
    let (mut ds, config) = generated(200);
    let mut orphan = ds.claims[0].clone();
    orphan.policy_id = "pol-000000".into();
    ds.claims.push(orphan);

    let violations = verify_dataset(&ds, &config);
    assert!(violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::ClaimWithoutClaimedPolicy { .. })));
}

#[test]
fn inverted_dates_and_wrong_tenor_are_reported() {
    let (mut ds, config) = generated(10);
    ds.policies[0].expiry_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

    ds.policies[1].tenor_years += 1;

    let violations = verify_dataset(&ds, &config);
    assert!(violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::ExpiryNotAfterInception { .. })));
    assert!(violations
        .iter()
        .any(|v| matches!(v, IntegrityViolation::TenorMismatch { .. })));
}

#[test]
fn violations_render_with_their_keys() {
    let v = IntegrityViolation::ClaimCountOutOfRange {
        policy_id: "pol-111111".into(),
        claims: 4,
        claimed_policies: 1,
    };
    assert_eq!(v.to_string(), "ClaimCountOutOfRange policy=pol-111111 claims=4 claimed_policies=1");
}

#[test]
fn summary_agrees_with_tables() {
    let (ds, _) = generated(1_000);
    let s = DatasetSummary::from_dataset(&ds);

    assert_eq!(s.policy_count, 1_000);
    assert_eq!(s.transaction_count, ds.transactions.len());
    assert_eq!(s.claim_count, ds.claims.len());
    let histogram_total: usize = s.claims_per_policy.iter().map(|(n, policies)| n * policies).sum();
    assert_eq!(histogram_total, ds.claims.len());
    // Inceptions are always at least a year before the run date.
    assert_eq!(s.policies_without_transactions, 0);
    assert_eq!(
        s.total_collected_premium_idr,
        ds.transactions.iter().map(|t| t.gross_premium_idr).sum::<i64>()
    );
}
