//! Table layout engine
//!
//! Maps a month of administration entries onto the fixed day-by-slot grid
//! of the administration table, independent of any document format.

pub mod plan;

pub use plan::{
    group_by_day, plan_layout, LayoutPlan, LayoutStrategy, PagePlan, Placement, SlotRows,
    BASE_SLOTS, BASE_TABLE_ROWS, ROWS_PER_SLOT, TABLE_COLUMNS,
};
