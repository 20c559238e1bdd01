//! dataset-runner: headless generator for the synthetic life book.
//!
//! Usage:
//!   dataset-runner --seed 42 --policies 100000 --out-dir ./out
//!   dataset-runner --config generator.json --run-date 2024-06-15 --parallel

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use lifebook_core::{
    config::GeneratorConfig,
    engine::{Dataset, DatasetGenerator},
    export,
    integrity::{verify_dataset, IntegrityViolation},
    summary::DatasetSummary,
    types::DATE_FORMAT,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::canonical(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);
    config.dataset_size = parse_arg(&args, "--policies", config.dataset_size);
    if let Some(raw) = find_arg(&args, "--run-date") {
        let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .with_context(|| format!("--run-date expects YYYY-MM-DD, got {raw}"))?;
        config.run_date = Some(date);
    }
    if args.iter().any(|a| a == "--parallel") {
        config.parallel_fan_out = true;
    }
    let quiet = args.iter().any(|a| a == "--quiet");
    let out_dir = find_arg(&args, "--out-dir").unwrap_or("./out");

    let generator = DatasetGenerator::new(config)?;

    if !quiet {
        println!("Lifebook dataset-runner");
        println!("  seed:      {}", generator.config().seed);
        println!("  policies:  {}", generator.config().dataset_size);
        println!("  run date:  {}", generator.clock.today());
        println!("  parallel:  {}", generator.config().parallel_fan_out);
        println!("  out dir:   {out_dir}");
        println!();
    }

    let dataset = generator.generate()?;
    let files = export::write_dataset(Path::new(out_dir), &dataset)?;
    log::info!("runner: wrote {} files to {out_dir}", files.len());
    let violations = verify_dataset(&dataset, generator.config());

    if !quiet {
        print_summary(&dataset, &files);
        print_integrity(&violations);
    }

    if !violations.is_empty() {
        bail!("{} integrity violations in generated dataset", violations.len());
    }
    Ok(())
}

fn print_summary(ds: &Dataset, files: &[String]) {
    let s = DatasetSummary::from_dataset(ds);

    println!("=== RUN SUMMARY ===");
    println!("  policies:          {}", s.policy_count);
    println!("  claimed policies:  {}", s.claimed_policy_count);
    println!("  transactions:      {}", s.transaction_count);
    println!("  claims:            {}", s.claim_count);
    println!("  no transactions:   {}", s.policies_without_transactions);
    println!("  duplicate ids:     {}", s.duplicate_policy_ids);
    for (count, policies) in &s.claims_per_policy {
        println!("  {count} claim(s):        {policies}");
    }

    println!();
    println!("=== FINANCIAL SUMMARY (IDR) ===");
    println!("  written premium:   {}", s.total_written_premium_idr);
    println!("  collected premium: {}", s.total_collected_premium_idr);
    println!("  discounts:         {}", s.total_discount_idr);
    println!("  claims paid:       {}", s.total_claim_amount_idr);
    println!("  reinsurer share:   {}", s.total_reinsurer_share_idr);

    println!();
    println!("=== FILES ===");
    for f in files {
        println!("  {f}");
    }
}

fn print_integrity(violations: &[IntegrityViolation]) {
    use IntegrityViolation as V;

    // One line per invariant family, in the order they are checked.
    let checks: [(&str, fn(&IntegrityViolation) -> bool); 8] = [
        ("expiry after inception", |v| matches!(v, V::ExpiryNotAfterInception { .. })),
        ("tenor consistent", |v| matches!(v, V::TenorMismatch { .. })),
        ("monthly premium spread", |v| matches!(v, V::MonthlyPremiumOffTotal { .. })),
        ("transaction count", |v| {
            matches!(v, V::TransactionCountMismatch { .. } | V::TrailingTransactions { .. })
        }),
        ("transaction schedule", |v| {
            matches!(v, V::TransactionOffSchedule { .. } | V::TransactionWrongParent { .. })
        }),
        ("claim amount bounds", |v| {
            matches!(v, V::ClaimOutsideBounds { .. } | V::ClaimNotClampedToFloor { .. })
        }),
        ("claim date chain", |v| matches!(v, V::ClaimDatesOutOfOrder { .. })),
        ("claim parents", |v| {
            matches!(v, V::ClaimWithoutClaimedPolicy { .. } | V::ClaimCountOutOfRange { .. })
        }),
    ];

    println!();
    println!("=== INTEGRITY ===");
    for (label, is_family) in checks {
        let hits: Vec<&IntegrityViolation> = violations.iter().filter(|v| is_family(v)).collect();
        if hits.is_empty() {
            println!("  PASS  {label}");
        } else {
            println!("  FAIL  {label} ({} rows)", hits.len());
            for v in hits.iter().take(5) {
                println!("        {v}");
            }
        }
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
