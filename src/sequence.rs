//! Sequence builder: fixed presentation ordering over the item pool.
//!
//! Visual prompts run first, then word prompts, then sentence prompts,
//! then everything else. The sort is stable, so items of the same kind
//! keep their pool insertion order. Building is pure: the same pool
//! always yields the same sequence.

use crate::item::StimulusItem;

/// Builds the presentation sequence from the current pool.
///
/// Stable sort by [`StimulusKind::order_key`](crate::item::StimulusKind::order_key);
/// ties retain pool order. Idempotent: rebuilding from an unchanged pool
/// yields an identical sequence.
#[must_use]
pub fn build(pool: &[StimulusItem]) -> Vec<StimulusItem> {
    let mut sequence = pool.to_vec();
    sequence.sort_by_key(|item| item.kind.order_key());
    sequence
}
