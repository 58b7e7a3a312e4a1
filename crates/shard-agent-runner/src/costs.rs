//! Gameplay constants needed for deterministic target resolution.
//!
//! Duplicated from `shard-actions` rather than depended on, so the
//! decision-loop crate never needs a dependency edge into the action
//! pipeline crate -- it only ever needs to know "close enough to act".

/// Default melee/interaction range, matching `shard-actions`'s constant of
/// the same name. If that value changes, this one must change with it.
pub const DEFAULT_MELEE_RANGE: f64 = 2.0;
