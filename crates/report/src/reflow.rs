//! Reflows per-process device tallies into a padded display grid.
//!
//! Each process contributes a sorted column pair of `[device, count]`
//! entries; pairs are interleaved into layout groups, padded to a common
//! height, laid out side by side with a blank separator column between
//! groups, and topped with a synthesized header row.

use crate::tally::GroupedCounts;
use wafertally_sheet::{CellValue, Sheet};

/// Placeholder shown for counts whose grouping key was empty.
const BLANK_KEY_LABEL: &str = "空白";
/// Header labels, cycled mod 3 across the full grid width.
const DEVICE_HEADER: &str = "设备ID";
const COUNT_HEADER: &str = "数量";

/// The line's standard process count, for which the fixed layout applies.
const FULL_LINE_PROCESS_COUNT: usize = 10;

/// The fixed full-line layout: each inner list names the source process
/// indices interleaved into one output group. This grouping is a plant
/// printing convention; it cannot be derived from the data, and any other
/// process count falls back to one group per process.
const FULL_LINE_LAYOUT: [&[usize]; 4] = [&[0, 3, 6], &[1, 2], &[4, 5], &[7, 8, 9]];

/// Blank pairs inserted between interleaved sub-groups within one group.
const SUB_GROUP_GAP: usize = 2;

/// One `[key, count]` display pair; padding uses empty-string pairs.
type Pair = [CellValue; 2];

fn blank_pair() -> Pair {
    [
        CellValue::String(String::new()),
        CellValue::String(String::new()),
    ]
}

/// Convert one process's counts into display pairs, sorted ascending by
/// key (ordinal comparison). An empty key renders as 空白.
fn sorted_entries(counts: &GroupedCounts) -> Vec<Pair> {
    let mut entries: Vec<(&String, &u64)> = counts.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    entries
        .into_iter()
        .map(|(key, count)| {
            let label = if key.is_empty() {
                BLANK_KEY_LABEL.to_string()
            } else {
                key.clone()
            };
            [CellValue::String(label), CellValue::from(*count)]
        })
        .collect()
}

/// Partition the per-process entry lists into layout groups.
///
/// Exactly [`FULL_LINE_PROCESS_COUNT`] lists trigger the fixed interleave;
/// any other count passes every list through as its own group, in order.
fn group_entries(entry_lists: Vec<Vec<Pair>>) -> Vec<Vec<Pair>> {
    if entry_lists.len() != FULL_LINE_PROCESS_COUNT {
        return entry_lists;
    }

    FULL_LINE_LAYOUT
        .iter()
        .map(|indices| {
            let mut group = Vec::new();
            for (i, &idx) in indices.iter().enumerate() {
                if i > 0 {
                    for _ in 0..SUB_GROUP_GAP {
                        group.push(blank_pair());
                    }
                }
                group.extend(entry_lists[idx].iter().cloned());
            }
            group
        })
        .collect()
}

/// Pad every group with trailing blank pairs to the longest group's length.
fn align_group_lengths(mut groups: Vec<Vec<Pair>>) -> Vec<Vec<Pair>> {
    let max_len = groups.iter().map(Vec::len).max().unwrap_or(0);
    for group in &mut groups {
        group.resize_with(max_len, blank_pair);
    }
    groups
}

/// Lay the aligned groups out side by side, one grid row per group-row
/// index, with a single blank separator cell before every non-first group.
fn to_table_rows(groups: Vec<Vec<Pair>>) -> Vec<Vec<CellValue>> {
    let groups = align_group_lengths(groups);
    let row_count = groups.first().map_or(0, Vec::len);
    if row_count == 0 {
        return Vec::new();
    }

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_count];
    for (group_idx, group) in groups.iter().enumerate() {
        for (row_idx, pair) in group.iter().enumerate() {
            if group_idx > 0 {
                rows[row_idx].push(CellValue::String(String::new()));
            }
            rows[row_idx].extend(pair.iter().cloned());
        }
    }
    rows
}

/// Synthesize the header row for a grid of the given width.
///
/// The 设备ID/数量/blank cycle is fixed at three columns regardless of where
/// the group separators actually fall; downstream consumers expect exactly
/// this pattern, so it is not recomputed from the group layout.
fn column_headers(column_count: usize) -> Vec<CellValue> {
    (0..column_count)
        .map(|i| {
            let label = match i % 3 {
                0 => DEVICE_HEADER,
                1 => COUNT_HEADER,
                _ => "",
            };
            CellValue::String(label.to_string())
        })
        .collect()
}

/// Reflow per-process tallies into the final display sheet.
///
/// Processes whose tallies are empty contribute nothing; if none remain the
/// result is an empty sheet with the requested name.
#[must_use]
pub fn generate_sheet(counted: &[GroupedCounts], sheet_name: &str) -> Sheet {
    let entry_lists: Vec<Vec<Pair>> = counted
        .iter()
        .map(sorted_entries)
        .filter(|entries| !entries.is_empty())
        .collect();

    if entry_lists.is_empty() {
        return Sheet::with_name(sheet_name);
    }

    let mut rows = to_table_rows(group_entries(entry_lists));
    if let Some(width) = rows.first().map(Vec::len) {
        rows.insert(0, column_headers(width));
    }

    let mut sheet = Sheet::with_name(sheet_name);
    *sheet.data_mut() = rows;
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> GroupedCounts {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    fn cell(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_empty_input_yields_empty_sheet() {
        let sheet = generate_sheet(&[], "结果");
        assert_eq!(sheet.name(), "结果");
        assert_eq!(sheet.row_count(), 0);
        assert_eq!(sheet.col_count(), 0);
    }

    #[test]
    fn test_all_empty_processes_yield_empty_sheet() {
        let sheet = generate_sheet(&[GroupedCounts::new(), GroupedCounts::new()], "结果");
        assert_eq!(sheet.row_count(), 0);
    }

    #[test]
    fn test_entries_sorted_by_key() {
        let sheet = generate_sheet(&[counts(&[("D2", 1), ("D1", 3), ("D10", 2)])], "s");

        // Ordinal sort: D1 < D10 < D2
        assert_eq!(sheet.cell(1, 0), &cell("D1"));
        assert_eq!(sheet.cell(2, 0), &cell("D10"));
        assert_eq!(sheet.cell(3, 0), &cell("D2"));
        assert_eq!(sheet.cell(1, 1), &CellValue::Int(3));
    }

    #[test]
    fn test_empty_key_renders_as_blank_label() {
        let sheet = generate_sheet(&[counts(&[("", 4)])], "s");
        assert_eq!(sheet.cell(1, 0), &cell("空白"));
        assert_eq!(sheet.cell(1, 1), &CellValue::Int(4));
    }

    #[test]
    fn test_single_process_layout() {
        let sheet = generate_sheet(&[counts(&[("D1", 5), ("D2", 1)])], "s");

        // Header + 2 entry rows, 2 columns, no separators
        assert_eq!(sheet.row_count(), 3);
        assert_eq!(sheet.col_count(), 2);
        assert_eq!(sheet.cell(0, 0), &cell("设备ID"));
        assert_eq!(sheet.cell(0, 1), &cell("数量"));
    }

    #[test]
    fn test_three_process_layout_is_sequential() {
        let counted = vec![
            counts(&[("A1", 1), ("A2", 2)]),
            counts(&[("B1", 3)]),
            counts(&[("C1", 4)]),
        ];
        let sheet = generate_sheet(&counted, "s");

        // 3 groups of 2 columns + 2 separators = 8 columns
        assert_eq!(sheet.col_count(), 8);
        // header + tallest group (2 rows)
        assert_eq!(sheet.row_count(), 3);

        // Group order matches process order
        assert_eq!(sheet.cell(1, 0), &cell("A1"));
        assert_eq!(sheet.cell(1, 2), &cell(""));
        assert_eq!(sheet.cell(1, 3), &cell("B1"));
        assert_eq!(sheet.cell(1, 6), &cell("C1"));

        // Shorter groups are padded with blank pairs
        assert_eq!(sheet.cell(2, 0), &cell("A2"));
        assert_eq!(sheet.cell(2, 3), &cell(""));
        assert_eq!(sheet.cell(2, 4), &cell(""));
    }

    #[test]
    fn test_header_cycle_is_mod_three() {
        let counted = vec![counts(&[("A1", 1)]), counts(&[("B1", 2)])];
        let sheet = generate_sheet(&counted, "s");

        // 5 columns: pair, separator, pair
        assert_eq!(sheet.col_count(), 5);
        let header: Vec<String> = (0..5).map(|c| sheet.cell(0, c).as_str()).collect();
        // The cycle ignores where the separator actually is
        assert_eq!(header, vec!["设备ID", "数量", "", "设备ID", "数量"]);
    }

    fn ten_processes() -> Vec<GroupedCounts> {
        (0..10)
            .map(|i| counts(&[(format!("P{i}").as_str(), (i + 1) as u64)]))
            .collect()
    }

    #[test]
    fn test_full_line_interleave() {
        let sheet = generate_sheet(&ten_processes(), "s");

        // 4 groups, each 2 columns wide, 3 separators between them
        assert_eq!(sheet.col_count(), 11);

        // Group A rows: entries of process 0, gap, process 3, gap, process 6.
        // Each process here has a single entry, so group A is
        // P0, '', '', P3, '', '', P6 -> 7 rows; plus the header row.
        assert_eq!(sheet.row_count(), 8);

        let group_a: Vec<String> = (1..8).map(|r| sheet.cell(r, 0).as_str()).collect();
        assert_eq!(group_a, vec!["P0", "", "", "P3", "", "", "P6"]);

        // Group B starts after the first separator column
        let group_b: Vec<String> = (1..8).map(|r| sheet.cell(r, 3).as_str()).collect();
        assert_eq!(group_b, vec!["P1", "", "", "P2", "", "", ""]);

        let group_c: Vec<String> = (1..8).map(|r| sheet.cell(r, 6).as_str()).collect();
        assert_eq!(group_c, vec!["P4", "", "", "P5", "", "", ""]);

        let group_d: Vec<String> = (1..8).map(|r| sheet.cell(r, 9).as_str()).collect();
        assert_eq!(group_d, vec!["P7", "", "", "P8", "", "", "P9"]);
    }

    #[test]
    fn test_full_line_counts_survive_interleave() {
        let sheet = generate_sheet(&ten_processes(), "s");

        // Every [key, count] pair appears exactly once in the grid
        for i in 0..10u64 {
            let key = format!("P{i}");
            let mut seen = 0;
            for row in sheet.rows() {
                for (col, value) in row.iter().enumerate() {
                    if value == &cell(&key) {
                        seen += 1;
                        assert_eq!(row[col + 1], CellValue::Int((i + 1) as i64));
                    }
                }
            }
            assert_eq!(seen, 1, "entry {key} must appear exactly once");
        }
    }

    #[test]
    fn test_eleven_processes_skip_interleave() {
        let counted: Vec<GroupedCounts> = (0..11)
            .map(|i| counts(&[(format!("P{i}").as_str(), 1)]))
            .collect();
        let sheet = generate_sheet(&counted, "s");

        // 11 groups of 2 columns + 10 separators
        assert_eq!(sheet.col_count(), 32);
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_empty_process_dropped_before_ten_check() {
        // 11 tallies, one empty: the 10 survivors trigger the interleave
        let mut counted = ten_processes();
        counted.insert(5, GroupedCounts::new());

        let sheet = generate_sheet(&counted, "s");
        assert_eq!(sheet.col_count(), 11);
    }

    #[test]
    fn test_deterministic() {
        let counted = ten_processes();
        let a = generate_sheet(&counted, "s");
        let b = generate_sheet(&counted, "s");
        assert_eq!(a, b);
    }
}
