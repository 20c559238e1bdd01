//! Claim Fan-out tests: amounts, date chain and claim counts.

use chrono::NaiveDate;
use lifebook_core::{
    category::{ClaimStatus, CoverageTier, Gender, MedicalHistory, Smoker},
    claim::{
        claim_amount_cap, reinsurer_share, sample_claim_amount, sample_claim_count,
        sample_claim_dates, ClaimFanOut,
    },
    config::{ClaimConfig, GeneratorConfig},
    engine::DatasetGenerator,
    fan_out::FanOut,
    policy::PolicyRecord,
    rng::StreamRng,
};
use std::collections::HashMap;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn claimed_policy(max_claim: i64) -> PolicyRecord {
    PolicyRecord {
        policy_id: "pol-654321".into(),
        inception_date: d(2021, 1, 1),
        expiry_date: d(2024, 1, 1),
        tenor_years: 3,
        age: 52,
        gender: Gender::Female,
        annual_income_idr: 90_000_000.0,
        bmi: 27.3,
        smoker: Smoker::Yes,
        medical_history: MedicalHistory::Hypertension,
        policy_coverage: CoverageTier::Basic,
        total_premium_idr: 9_000_000,
        monthly_premium_idr: 250_000,
        max_claim_amount_idr: max_claim,
        claim_status: ClaimStatus::Claimed,
    }
}

#[test]
fn low_ceiling_clamps_to_floor() {
    let cfg = ClaimConfig::default();
    let mut rng = StreamRng::from_seed(1);

    assert_eq!(claim_amount_cap(&cfg, 40_000_000), None);
    for _ in 0..100 {
        assert_eq!(sample_claim_amount(&cfg, 40_000_000, &mut rng), 50_000_000);
    }
}

#[test]
fn ceiling_exactly_at_threshold_gives_tied_range() {
    let cfg = ClaimConfig::default();
    let mut rng = StreamRng::from_seed(2);
    assert_eq!(claim_amount_cap(&cfg, 51_000_000), Some(50_000_000));
    assert_eq!(sample_claim_amount(&cfg, 51_000_000, &mut rng), 50_000_000);
}

#[test]
fn amounts_stay_under_ceiling_minus_margin() {
    let cfg = ClaimConfig::default();
    let mut rng = StreamRng::from_seed(3);
    for _ in 0..5_000 {
        let amount = sample_claim_amount(&cfg, 300_000_000, &mut rng);
        assert!((50_000_000..=299_000_000).contains(&amount), "amount {amount}");
    }
}

#[test]
fn claim_dates_form_a_chain() {
    let cfg = ClaimConfig::default();
    let mut rng = StreamRng::from_seed(4);
    let inception = d(2021, 1, 1);

    for _ in 0..2_000 {
        let dates = sample_claim_dates(&cfg, inception, &mut rng).unwrap();
        assert!(dates.report >= inception);
        assert!(dates.process > dates.report);
        assert!(dates.settlement > dates.process);
        assert!(dates.loss > inception);
        assert!(dates.loss < d(2023, 1, 1));
    }
}

#[test]
fn claim_count_converges_to_weights() {
    let mut rng = StreamRng::from_seed(0xC1A1);
    let n = 100_000;
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for _ in 0..n {
        *counts.entry(sample_claim_count(&mut rng)).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 3, "unexpected claim counts: {counts:?}");
    for (count, weight) in [(1, 0.80), (2, 0.15), (3, 0.05)] {
        let observed = counts[&count] as f64 / n as f64;
        assert!(
            (observed - weight).abs() < 0.01,
            "count {count}: observed {observed:.4}, expected {weight}"
        );
    }
}

#[test]
fn reinsurer_takes_a_fifth() {
    let cfg = ClaimConfig::default();
    assert_eq!(reinsurer_share(&cfg, 50_000_000), 10_000_000);
    // 20% of 123,456,789 = 24,691,357.8 → 24,691,000
    assert_eq!(reinsurer_share(&cfg, 123_456_789), 24_691_000);
}

#[test]
fn fan_out_rows_copy_policy_columns() {
    let fan_out = ClaimFanOut::new(ClaimConfig::default());
    let policy = claimed_policy(120_000_000);
    let mut rng = StreamRng::from_seed(8);
    let rows = fan_out.emit(&policy, &mut rng).unwrap();

    assert!((1..=3).contains(&rows.len()));
    for c in &rows {
        assert!(c.claim_id.starts_with("cl-pol-654321-"));
        assert_eq!(c.policy_id, policy.policy_id);
        assert_eq!(c.inception_date, policy.inception_date);
        assert_eq!(c.expiry_date, policy.expiry_date);
        assert_eq!(c.tenor_years, 3);
        assert_eq!(c.max_claim_amount_idr, 120_000_000);
        assert!(c.claimamount_idr <= 119_000_000);
        assert_eq!(c.claim_reas_idr, reinsurer_share(&ClaimConfig::default(), c.claimamount_idr));
    }
}

#[test]
fn only_claimed_policies_get_claims() {
    let fan_out = ClaimFanOut::new(ClaimConfig::default());
    let unclaimed = PolicyRecord {
        claim_status: ClaimStatus::NoClaim,
        ..claimed_policy(120_000_000)
    };
    assert!(!fan_out.applies_to(&unclaimed));
    assert!(fan_out.applies_to(&claimed_policy(120_000_000)));

    let generator = DatasetGenerator::new(GeneratorConfig::default_test()).unwrap();
    let ds = generator.generate().unwrap();
    let claimed: std::collections::HashSet<&str> = ds
        .policies
        .iter()
        .filter(|p| p.is_claimed())
        .map(|p| p.policy_id.as_str())
        .collect();
    assert!(!ds.claims.is_empty());
    assert!(ds.claims.iter().all(|c| claimed.contains(c.policy_id.as_str())));
}
