//! Placement planning for the administration table
//!
//! The administration table has one column per day (1..=31) after a label
//! column, and a repeating four-row slot per administration: a label row
//! followed by time, initials and amount-remaining rows. The first slot's
//! label is the table's header row, so slot `n` (0-based) keeps its data at
//! rows `1 + 4n`, `2 + 4n` and `3 + 4n`. The base table carries three slots.
//!
//! Planning is a pure function of the entries. The document is only touched
//! once a complete plan exists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{AdministrationEntry, MAX_DAY};

/// Slots the base table provides
pub const BASE_SLOTS: usize = 3;

/// Rows per slot: one label row plus three data rows
pub const ROWS_PER_SLOT: usize = 4;

/// Rows in the base table: header row plus three slots' worth
pub const BASE_TABLE_ROWS: usize = BASE_SLOTS * ROWS_PER_SLOT;

/// Columns in the table: label column plus one per day
pub const TABLE_COLUMNS: usize = MAX_DAY as usize + 1;

/// How entries beyond the third on a day are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStrategy {
    /// Grow the single table by one slot group per extra administration
    #[default]
    ExtendedTable,
    /// Keep the base geometry and spill into continuation pages
    ContinuationPages,
}

impl std::fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtendedTable => write!(f, "extended table"),
            Self::ContinuationPages => write!(f, "continuation pages"),
        }
    }
}

/// Data rows of one slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRows {
    pub time: usize,
    pub initials: usize,
    pub amount: usize,
}

impl SlotRows {
    /// Rows of the `slot`-th (0-based) slot in a table
    pub fn for_slot(slot: usize) -> Self {
        let time = 1 + ROWS_PER_SLOT * slot;
        Self {
            time,
            initials: time + 1,
            amount: time + 2,
        }
    }
}

/// Where one entry goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub day: u32,
    /// Position among the day's entries (0-based), across all pages
    pub admin_index: usize,
    pub rows: SlotRows,
    pub column: usize,
    pub entry: &'a AdministrationEntry,
}

/// Placements that share one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan<'a> {
    /// 1-based page number; page 1 is the template's own table
    pub number: usize,
    pub placements: Vec<Placement<'a>>,
}

/// Complete placement of a log's entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutPlan<'a> {
    pub strategy: LayoutStrategy,
    /// Slot groups appended to the base table (extended strategy only)
    pub extra_slot_groups: usize,
    /// Always at least one page
    pub pages: Vec<PagePlan<'a>>,
}

impl<'a> LayoutPlan<'a> {
    /// Rows the (first) table needs
    pub fn table_rows(&self) -> usize {
        BASE_TABLE_ROWS + ROWS_PER_SLOT * self.extra_slot_groups
    }

    /// Pages after the first
    pub fn continuation_pages(&self) -> &[PagePlan<'a>] {
        &self.pages[1..]
    }

    /// Page number and placement of the `admin_index`-th entry of `day`
    pub fn find(&self, day: u32, admin_index: usize) -> Option<(usize, &Placement<'a>)> {
        self.pages.iter().find_map(|page| {
            page.placements
                .iter()
                .find(|p| p.day == day && p.admin_index == admin_index)
                .map(|p| (page.number, p))
        })
    }
}

/// Group entries by day, keeping input order within a day
///
/// Days outside 1..=31 have no column and are dropped.
pub fn group_by_day(entries: &[AdministrationEntry]) -> BTreeMap<u32, Vec<&AdministrationEntry>> {
    let mut by_day: BTreeMap<u32, Vec<&AdministrationEntry>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.has_valid_day()) {
        by_day.entry(entry.day).or_default().push(entry);
    }
    by_day
}

/// Plan the placement of `entries` with the given strategy
pub fn plan_layout(entries: &[AdministrationEntry], strategy: LayoutStrategy) -> LayoutPlan<'_> {
    let by_day = group_by_day(entries);
    match strategy {
        LayoutStrategy::ExtendedTable => plan_extended(&by_day),
        LayoutStrategy::ContinuationPages => plan_continuation(&by_day),
    }
}

fn plan_extended<'a>(by_day: &BTreeMap<u32, Vec<&'a AdministrationEntry>>) -> LayoutPlan<'a> {
    let max_admins = by_day
        .values()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(BASE_SLOTS);

    let placements = by_day
        .iter()
        .flat_map(|(&day, entries)| {
            entries.iter().enumerate().map(move |(index, &entry)| Placement {
                day,
                admin_index: index,
                rows: SlotRows::for_slot(index),
                column: day as usize,
                entry,
            })
        })
        .collect();

    LayoutPlan {
        strategy: LayoutStrategy::ExtendedTable,
        extra_slot_groups: max_admins - BASE_SLOTS,
        pages: vec![PagePlan {
            number: 1,
            placements,
        }],
    }
}

fn plan_continuation<'a>(by_day: &BTreeMap<u32, Vec<&'a AdministrationEntry>>) -> LayoutPlan<'a> {
    let mut pages = Vec::new();
    let mut start_admin = 0;

    loop {
        let placements: Vec<_> = by_day
            .iter()
            .flat_map(|(&day, entries)| {
                entries
                    .iter()
                    .enumerate()
                    .skip(start_admin)
                    .take(BASE_SLOTS)
                    .map(move |(index, &entry)| Placement {
                        day,
                        admin_index: index,
                        rows: SlotRows::for_slot(index - start_admin),
                        column: day as usize,
                        entry,
                    })
            })
            .collect();

        pages.push(PagePlan {
            number: pages.len() + 1,
            placements,
        });

        start_admin += BASE_SLOTS;
        if !by_day.values().any(|entries| entries.len() > start_admin) {
            break;
        }
    }

    LayoutPlan {
        strategy: LayoutStrategy::ContinuationPages,
        extra_slot_groups: 0,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries_for(day: u32, count: usize) -> Vec<AdministrationEntry> {
        (0..count)
            .map(|i| AdministrationEntry::new(day, format!("{}:00", i + 1), "JD", ""))
            .collect()
    }

    #[test]
    fn test_slot_rows() {
        assert_eq!(
            SlotRows::for_slot(0),
            SlotRows {
                time: 1,
                initials: 2,
                amount: 3
            }
        );
        assert_eq!(SlotRows::for_slot(1).time, 5);
        assert_eq!(SlotRows::for_slot(2).amount, 11);
        assert_eq!(SlotRows::for_slot(4).time, 17);
    }

    #[test]
    fn test_empty_log_plans_single_base_page() {
        for strategy in [LayoutStrategy::ExtendedTable, LayoutStrategy::ContinuationPages] {
            let plan = plan_layout(&[], strategy);
            assert_eq!(plan.pages.len(), 1);
            assert!(plan.pages[0].placements.is_empty());
            assert_eq!(plan.table_rows(), BASE_TABLE_ROWS);
        }
    }

    #[test]
    fn test_extended_grows_by_extra_slot_groups() {
        let mut entries = entries_for(10, 5);
        entries.extend(entries_for(3, 3));
        entries.extend(entries_for(20, 1));

        let plan = plan_layout(&entries, LayoutStrategy::ExtendedTable);

        assert_eq!(plan.pages.len(), 1);
        assert_eq!(plan.extra_slot_groups, 2);
        assert_eq!(plan.table_rows(), BASE_TABLE_ROWS + 8);

        let (page, fourth) = plan.find(10, 3).unwrap();
        assert_eq!(page, 1);
        assert_eq!(fourth.rows.time, 13);

        let (_, last) = plan.find(10, 4).unwrap();
        assert_eq!(
            last.rows,
            SlotRows {
                time: 17,
                initials: 18,
                amount: 19
            }
        );
        assert_eq!(last.column, 10);
        assert_eq!(last.entry.time, "5:00");
    }

    #[test]
    fn test_extended_without_overflow_adds_nothing() {
        let entries = entries_for(7, 3);
        let plan = plan_layout(&entries, LayoutStrategy::ExtendedTable);
        assert_eq!(plan.extra_slot_groups, 0);
        assert_eq!(plan.pages[0].placements.len(), 3);
    }

    #[test]
    fn test_continuation_single_extra_page() {
        let entries = entries_for(1, 4);
        let plan = plan_layout(&entries, LayoutStrategy::ContinuationPages);

        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[0].placements.len(), 3);

        let continuation = plan.continuation_pages();
        assert_eq!(continuation.len(), 1);
        assert_eq!(continuation[0].number, 2);
        assert_eq!(continuation[0].placements.len(), 1);

        let placement = continuation[0].placements[0];
        assert_eq!(placement.day, 1);
        assert_eq!(placement.admin_index, 3);
        assert_eq!(placement.rows, SlotRows::for_slot(0));
        assert_eq!(placement.entry.time, "4:00");
    }

    #[test]
    fn test_continuation_skips_days_without_entries_in_range() {
        let mut entries = entries_for(2, 7);
        entries.extend(entries_for(9, 4));
        entries.extend(entries_for(15, 2));

        let plan = plan_layout(&entries, LayoutStrategy::ContinuationPages);
        assert_eq!(plan.pages.len(), 3);

        let page_two: Vec<_> = plan.pages[1].placements.iter().map(|p| (p.day, p.admin_index)).collect();
        assert_eq!(page_two, vec![(2, 3), (2, 4), (2, 5), (9, 3)]);

        let page_three: Vec<_> = plan.pages[2].placements.iter().map(|p| (p.day, p.admin_index)).collect();
        assert_eq!(page_three, vec![(2, 6)]);
        assert_eq!(plan.pages[2].placements[0].rows.time, 1);
    }

    #[test]
    fn test_continuation_exact_multiple_of_three() {
        let entries = entries_for(5, 6);
        let plan = plan_layout(&entries, LayoutStrategy::ContinuationPages);
        assert_eq!(plan.pages.len(), 2);
        assert_eq!(plan.pages[1].placements.len(), 3);
        assert_eq!(plan.pages[1].placements[2].rows.time, 9);
    }

    #[test]
    fn test_out_of_range_days_ignored() {
        let mut entries = entries_for(0, 5);
        entries.extend(entries_for(32, 5));
        entries.extend(entries_for(31, 1));

        let plan = plan_layout(&entries, LayoutStrategy::ExtendedTable);
        assert_eq!(plan.extra_slot_groups, 0);
        assert_eq!(plan.pages[0].placements.len(), 1);
        assert_eq!(plan.pages[0].placements[0].column, 31);

        let plan = plan_layout(&entries, LayoutStrategy::ContinuationPages);
        assert_eq!(plan.pages.len(), 1);
    }

    #[test]
    fn test_grouping_keeps_input_order() {
        let entries = vec![
            AdministrationEntry::new(4, "9:00 PM", "AB", ""),
            AdministrationEntry::new(4, "7:00 AM", "CD", ""),
        ];
        let grouped = group_by_day(&entries);
        let times: Vec<_> = grouped[&4].iter().map(|e| e.time.as_str()).collect();
        assert_eq!(times, vec!["9:00 PM", "7:00 AM"]);
    }
}
