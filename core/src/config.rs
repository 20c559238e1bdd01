use crate::category::{CoverageTier, MedicalHistory};
use crate::error::{GenError, GenResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-tier lookup used for premium loadings and base claim ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    pub basic: f64,
    pub standard: f64,
    pub comprehensive: f64,
}

impl TierTable {
    pub fn get(&self, tier: CoverageTier) -> f64 {
        match tier {
            CoverageTier::Basic => self.basic,
            CoverageTier::Standard => self.standard,
            CoverageTier::Comprehensive => self.comprehensive,
        }
    }
}

/// Per-condition loading, shared by premium and ceiling formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedicalTable {
    pub none: f64,
    pub hypertension: f64,
    pub diabetes: f64,
    pub heart_disease: f64,
    pub cancer: f64,
}

impl MedicalTable {
    pub fn get(&self, condition: MedicalHistory) -> f64 {
        match condition {
            MedicalHistory::None => self.none,
            MedicalHistory::Hypertension => self.hypertension,
            MedicalHistory::Diabetes => self.diabetes,
            MedicalHistory::HeartDisease => self.heart_disease,
            MedicalHistory::Cancer => self.cancer,
        }
    }
}

/// Half-open day offset range [min, max).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub min: i64,
    pub max: i64,
}

impl DayRange {
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str, lowest: i64) -> GenResult<()> {
        if self.min < lowest || self.max <= self.min {
            return Err(GenError::invalid(
                name,
                format!("expected {lowest} <= min < max, got [{}, {})", self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeConfig {
    pub mean: f64,
    pub std_dev: f64,
    /// Ages below this are the young band.
    pub young_below: u32,
    /// Ages below this (and not young) are the mid band; the rest are old.
    pub mid_below: u32,
    pub young_multiplier: f64,
    pub mid_multiplier: f64,
    pub old_multiplier: f64,
    pub young_floor: f64,
    pub mid_floor: f64,
    pub old_floor: f64,
}

impl Default for IncomeConfig {
    fn default() -> Self {
        Self {
            mean: 120_000_000.0,
            std_dev: 15_000_000.0,
            young_below: 30,
            mid_below: 50,
            young_multiplier: 1.8,
            mid_multiplier: 2.2,
            old_multiplier: 1.7,
            young_floor: 80_000_000.0,
            mid_floor: 110_000_000.0,
            old_floor: 80_000_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PremiumConfig {
    pub base_premium: f64,
    pub age_premium_factor: f64,
    pub coverage_factors: TierTable,
    pub smoker_factor: f64,
    pub male_factor: f64,
    pub bmi_threshold: f64,
    pub bmi_factor: f64,
    pub tenor_multiplier: f64,
}

impl Default for PremiumConfig {
    fn default() -> Self {
        Self {
            base_premium: 100_000.0,
            age_premium_factor: 6_000.0,
            coverage_factors: TierTable { basic: 1.0, standard: 1.5, comprehensive: 2.0 },
            smoker_factor: 1.5,
            male_factor: 1.2,
            bmi_threshold: 30.0,
            bmi_factor: 1.6,
            tenor_multiplier: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CeilingConfig {
    pub base_claim: TierTable,
    /// Ages at or above this get `age_adjustment`.
    pub senior_age: u32,
    pub age_adjustment: f64,
    pub smoker_adjustment: f64,
    pub male_adjustment: f64,
    pub income_divisor: f64,
    pub max_income_factor: f64,
    pub tenor_multiplier: f64,
}

impl Default for CeilingConfig {
    fn default() -> Self {
        Self {
            base_claim: TierTable {
                basic: 500_000_000.0,
                standard: 1_000_000_000.0,
                comprehensive: 2_000_000_000.0,
            },
            senior_age: 50,
            age_adjustment: 0.8,
            smoker_adjustment: 0.8,
            male_adjustment: 0.9,
            income_divisor: 50_000_000.0,
            max_income_factor: 2.0,
            tenor_multiplier: 0.1,
        }
    }
}

/// Parameters of the Attribute Sampler and Derivation Engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderwritingConfig {
    pub min_age: u32,
    /// Exclusive.
    pub max_age: u32,
    pub income: IncomeConfig,
    pub bmi_mean: f64,
    pub bmi_std_dev: f64,
    /// Draws below this are clamped before rounding.
    pub bmi_floor: f64,
    /// Days subtracted from the run date before snapping to January 1.
    pub inception_offset_days: DayRange,
    /// Years added to the inception year, half-open.
    pub min_tenor_years: u32,
    pub max_tenor_years_exclusive: u32,
    pub medical_factors: MedicalTable,
    pub premium: PremiumConfig,
    pub ceiling: CeilingConfig,
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            min_age: 18,
            max_age: 80,
            income: IncomeConfig::default(),
            bmi_mean: 25.0,
            bmi_std_dev: 5.0,
            bmi_floor: 10.0,
            inception_offset_days: DayRange::new(365, 365 * 5),
            min_tenor_years: 1,
            max_tenor_years_exclusive: 6,
            medical_factors: MedicalTable {
                none: 1.0,
                hypertension: 1.2,
                diabetes: 1.3,
                heart_disease: 1.5,
                cancer: 2.0,
            },
            premium: PremiumConfig::default(),
            ceiling: CeilingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionConfig {
    /// Fixed step between premium collections (not calendar months).
    pub step_days: i64,
    pub discount_probability: f64,
    pub discount_rate: f64,
    pub commission_rate: f64,
    pub reinsurance_rate: f64,
    /// Applied to the reinsurance premium, not the gross.
    pub reinsurance_commission_rate: f64,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            step_days: 30,
            discount_probability: 0.05,
            discount_rate: 0.02,
            commission_rate: 0.05,
            reinsurance_rate: 0.10,
            reinsurance_commission_rate: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimConfig {
    /// Minimum payable claim; also the clamp value for low ceilings.
    pub amount_floor: i64,
    /// Claims stay at least this far below the policy ceiling.
    pub ceiling_margin: i64,
    pub loss_days: DayRange,
    pub report_days: DayRange,
    pub process_days: DayRange,
    pub settlement_days: DayRange,
    pub reinsurer_share: f64,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            amount_floor: 50_000_000,
            ceiling_margin: 1_000_000,
            loss_days: DayRange::new(30, 730),
            report_days: DayRange::new(30, 365),
            process_days: DayRange::new(30, 90),
            settlement_days: DayRange::new(30, 180),
            reinsurer_share: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub dataset_size: usize,
    pub seed: u64,
    /// "Now" for inception offsets and the transaction cut-off.
    /// None resolves to the local calendar date when the run starts.
    pub run_date: Option<NaiveDate>,
    /// Shard both fan-outs across the rayon pool. Output is identical
    /// either way.
    pub parallel_fan_out: bool,
    pub underwriting: UnderwritingConfig,
    pub transactions: TransactionConfig,
    pub claims: ClaimConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

impl GeneratorConfig {
    /// The production book: 100k policies, seed 42, today's date.
    pub fn canonical() -> Self {
        Self {
            dataset_size: 100_000,
            seed: 42,
            run_date: None,
            parallel_fan_out: false,
            underwriting: UnderwritingConfig::default(),
            transactions: TransactionConfig::default(),
            claims: ClaimConfig::default(),
        }
    }

    /// Load a JSON config file. Absent fields keep canonical values.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Config with a pinned run date and a small book for unit tests.
    pub fn default_test() -> Self {
        Self {
            dataset_size: 500,
            seed: 42,
            run_date: NaiveDate::from_ymd_opt(2024, 6, 15),
            ..Self::canonical()
        }
    }

    /// Reject parameter sets that would make a sampler partial.
    pub fn validate(&self) -> GenResult<()> {
        if self.dataset_size == 0 {
            return Err(GenError::invalid("dataset_size", "must be > 0"));
        }

        let uw = &self.underwriting;
        if uw.max_age <= uw.min_age {
            return Err(GenError::invalid(
                "underwriting.max_age",
                format!("must exceed min_age {}", uw.min_age),
            ));
        }
        if uw.max_tenor_years_exclusive <= uw.min_tenor_years || uw.min_tenor_years == 0 {
            return Err(GenError::invalid(
                "underwriting.min_tenor_years",
                "expected 1 <= min < max_exclusive",
            ));
        }
        for (name, sd) in [
            ("underwriting.income.std_dev", uw.income.std_dev),
            ("underwriting.bmi_std_dev", uw.bmi_std_dev),
        ] {
            if sd.is_nan() || sd < 0.0 {
                return Err(GenError::invalid(name, format!("must be >= 0, got {sd}")));
            }
        }
        if uw.income.young_floor <= 0.0 || uw.income.mid_floor <= 0.0 || uw.income.old_floor <= 0.0 {
            return Err(GenError::invalid("underwriting.income", "floors must be > 0"));
        }
        uw.inception_offset_days.validate("underwriting.inception_offset_days", 0)?;

        let tx = &self.transactions;
        if tx.step_days <= 0 {
            return Err(GenError::invalid("transactions.step_days", "must be > 0"));
        }
        if !(0.0..=1.0).contains(&tx.discount_probability) {
            return Err(GenError::invalid(
                "transactions.discount_probability",
                "must lie in [0, 1]",
            ));
        }

        let cl = &self.claims;
        if cl.amount_floor <= 0 || cl.ceiling_margin < 0 {
            return Err(GenError::invalid(
                "claims.amount_floor",
                "floor must be > 0 and margin >= 0",
            ));
        }
        cl.loss_days.validate("claims.loss_days", 0)?;
        cl.report_days.validate("claims.report_days", 0)?;
        // Process and settlement must land strictly after their predecessor.
        cl.process_days.validate("claims.process_days", 1)?;
        cl.settlement_days.validate("claims.settlement_days", 1)?;

        Ok(())
    }
}
