//! Configuration loading and validation.

use chrono::NaiveDate;
use lifebook_core::{config::GeneratorConfig, engine::DatasetGenerator, error::GenError};

fn write_config(name: &str, body: &str) -> String {
    let path = std::env::temp_dir().join(format!("lifebook-{name}-{}.json", std::process::id()));
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn canonical_matches_the_production_book() {
    let c = GeneratorConfig::canonical();
    assert_eq!(c.dataset_size, 100_000);
    assert_eq!(c.seed, 42);
    assert_eq!(c.run_date, None);
    assert_eq!(c.transactions.step_days, 30);
    assert_eq!(c.claims.amount_floor, 50_000_000);
    assert!(c.validate().is_ok());
}

#[test]
fn partial_file_keeps_canonical_values() {
    let path = write_config(
        "partial",
        r#"{ "dataset_size": 250, "run_date": "2023-03-01", "claims": { "reinsurer_share": 0.25 } }"#,
    );
    let c = GeneratorConfig::load(&path).unwrap();

    assert_eq!(c.dataset_size, 250);
    assert_eq!(c.seed, 42);
    assert_eq!(c.run_date, NaiveDate::from_ymd_opt(2023, 3, 1));
    assert_eq!(c.claims.reinsurer_share, 0.25);
    assert_eq!(c.claims.amount_floor, 50_000_000);
    assert_eq!(c.underwriting, GeneratorConfig::canonical().underwriting);
    let _ = std::fs::remove_file(path);
}

#[test]
fn missing_file_names_the_path() {
    let err = GeneratorConfig::load("/nonexistent/lifebook.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/lifebook.json"));
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let path = write_config("invalid", r#"{ "transactions": { "step_days": 0 } }"#);
    assert!(GeneratorConfig::load(&path).is_err());
    let _ = std::fs::remove_file(path);
}

#[test]
fn generator_refuses_partial_samplers() {
    let mut c = GeneratorConfig::default_test();
    c.underwriting.max_age = c.underwriting.min_age;
    assert!(matches!(
        DatasetGenerator::new(c),
        Err(GenError::InvalidParameter { .. })
    ));

    let mut c = GeneratorConfig::default_test();
    c.claims.process_days.min = 0;
    assert!(c.validate().is_err(), "zero-day processing would break the date chain");

    let mut c = GeneratorConfig::default_test();
    c.dataset_size = 0;
    assert!(c.validate().is_err());
}

#[test]
fn run_date_is_pinned_once() {
    let generator = DatasetGenerator::new(GeneratorConfig::default_test()).unwrap();
    assert_eq!(generator.clock.today(), NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
    let ds = generator.generate().unwrap();
    assert_eq!(ds.run_date, generator.clock.today());
}
