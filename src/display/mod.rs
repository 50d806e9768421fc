//! Display formatting for terminal output
//!
//! List views are rendered as tables with `tabled`; detail views are
//! plain aligned text.

pub mod card;
pub mod log;
pub mod profile;

pub use card::{format_card_details, format_card_list};
pub use log::{format_log_details, format_log_list, format_summary};
pub use profile::{format_profile_details, format_profile_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table in the house style
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

/// Detail-view placeholder for blank fields
pub(crate) fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
