//! Canonical chord strings.

use crate::note::key_order;

/// Build the canonical chord string for a set of simultaneous keys:
/// duplicates are removed and the remainder is sorted from the lowest key
/// up, with the rest marker first. An empty input yields an empty chord,
/// a gap in the bar.
pub fn build_chord(keys: &[char]) -> String {
    let mut keys = keys.to_vec();
    keys.sort_by_key(|&k| key_order(k));
    keys.dedup();
    keys.into_iter().collect()
}
