//! Shared primitive types used across the entire generator.

/// A currency amount in Indonesian rupiah, already rounded to its
/// reporting magnitude (nearest 100, 1,000 or 1,000,000).
pub type Idr = i64;

/// A stable, human-readable identifier (`pol-######`, `cl-...`).
pub type EntityId = String;

/// Position of a policy inside the Policy Table. Record streams are
/// keyed by this, never by the (possibly colliding) policy ID.
pub type RecordIndex = u64;

/// Date format used in every exported table and in config files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
