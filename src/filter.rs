//! Trigger filter
//!
//! The epoching stage refuses condition labels that never occur in a session,
//! so the taxonomy handed to it is restricted to the codes actually present.

use crate::taxonomy::LabelTaxonomy;
use crate::types::TriggerEvent;
use std::collections::BTreeSet;

/// Keep only the taxonomy entries whose code appears in `observed_codes`.
///
/// Duplicates and ordering in `observed_codes` are irrelevant.
pub fn restrict<I>(taxonomy: &LabelTaxonomy, observed_codes: I) -> LabelTaxonomy
where
    I: IntoIterator<Item = u32>,
{
    let observed: BTreeSet<u32> = observed_codes.into_iter().collect();
    taxonomy.filtered(|code| observed.contains(&code))
}

/// Distinct codes of an event sequence, ascending
pub fn observed_codes(events: &[TriggerEvent]) -> Vec<u32> {
    let codes: BTreeSet<u32> = events.iter().map(|e| e.code).collect();
    codes.into_iter().collect()
}
