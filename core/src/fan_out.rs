//! Fan-out trait and driver.
//!
//! RULE: Every child table implements FanOut.
//! A fan-out reads one finished policy row and emits zero or more
//! child rows. It never sees other policies and never mutates the
//! Policy Table, so the driver is free to shard policies across threads.

use crate::{
    error::GenResult,
    policy::PolicyRecord,
    rng::{RngBank, StreamRng, StreamSlot},
    types::RecordIndex,
};
use rayon::prelude::*;

/// The contract every child-table generator must fulfill.
pub trait FanOut: Sync {
    type Row: Send;

    /// Unique stable name for this fan-out.
    fn name(&self) -> &'static str;

    /// Stream slot this fan-out draws from.
    fn slot(&self) -> StreamSlot;

    /// Policies this fan-out skips entirely. Skipped policies
    /// consume no randomness.
    fn applies_to(&self, _policy: &PolicyRecord) -> bool {
        true
    }

    /// Emit the child rows for one policy.
    ///
    /// - `policy`: the parent row, read-only
    /// - `rng`:    this policy's own record stream for `slot()`
    fn emit(&self, policy: &PolicyRecord, rng: &mut StreamRng) -> GenResult<Vec<Self::Row>>;
}

/// Run a fan-out over the whole Policy Table.
///
/// Each policy draws from `bank.for_record(slot, index)` where `index`
/// is its position in the table, so sequential and parallel runs emit
/// byte-identical rows in the same order.
pub fn run_fan_out<F: FanOut>(
    fan_out: &F,
    policies: &[PolicyRecord],
    bank: &RngBank,
    parallel: bool,
) -> GenResult<Vec<F::Row>> {
    let emit_one = |(index, policy): (usize, &PolicyRecord)| -> GenResult<Vec<F::Row>> {
        if !fan_out.applies_to(policy) {
            return Ok(Vec::new());
        }
        let mut rng = bank.for_record(fan_out.slot(), index as RecordIndex);
        fan_out.emit(policy, &mut rng)
    };

    let batches: Vec<Vec<F::Row>> = if parallel {
        policies
            .par_iter()
            .enumerate()
            .map(&emit_one)
            .collect::<GenResult<_>>()?
    } else {
        policies
            .iter()
            .enumerate()
            .map(&emit_one)
            .collect::<GenResult<_>>()?
    };

    let parents = batches.iter().filter(|b| !b.is_empty()).count();
    let rows: Vec<F::Row> = batches.into_iter().flatten().collect();
    log::info!(
        "{}: emitted {} rows from {parents} policies (parallel={parallel})",
        fan_out.name(),
        rows.len()
    );
    Ok(rows)
}
