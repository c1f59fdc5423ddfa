use crate::record::ProcessRecord;
use indexmap::IndexMap;

/// Occurrence counts keyed by grouping key, in first-seen order.
///
/// Insertion order is kept so that identical inputs always enumerate
/// identically.
pub type GroupedCounts = IndexMap<String, u64>;

/// Tally a record list by a caller-supplied key function.
///
/// One pass; every item contributes exactly one increment, so the counts
/// always sum to the input length.
pub fn count_by_key<T, F>(items: &[T], key: F) -> GroupedCounts
where
    F: Fn(&T) -> String,
{
    let mut counts = GroupedCounts::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// The tally key used for the device report: the record's derived device
/// identifier, empty when none could be inferred.
#[must_use]
pub fn device_key(record: &ProcessRecord) -> String {
    record.device_id.clone()
}
