//! Medication log display formatting

use std::collections::BTreeMap;

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::MedicationLog;

#[derive(Tabled)]
struct LogRow<'a> {
    #[tabled(rename = "Month")]
    month: &'a str,
    #[tabled(rename = "Medicine")]
    medicine: &'a str,
}

#[derive(Tabled)]
struct EntryRow<'a> {
    #[tabled(rename = "Day")]
    day: u32,
    /// Position among the day's entries, as addressed by update/remove
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Time")]
    time: &'a str,
    #[tabled(rename = "Initials")]
    initials: &'a str,
    #[tabled(rename = "Amount Remaining")]
    amount: &'a str,
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Day")]
    day: u32,
    #[tabled(rename = "Administrations")]
    count: usize,
}

/// Format `(medicine, month)` keys as a table
pub fn format_log_list(keys: &[(String, String)]) -> String {
    if keys.is_empty() {
        return "No medication logs found.".to_string();
    }

    render_table(
        keys.iter()
            .map(|(medicine, month)| LogRow {
                month,
                medicine,
            })
            .collect(),
    )
}

/// Format a log's header and its entries
pub fn format_log_details(log: &MedicationLog) -> String {
    let mut output = String::new();

    output.push_str(&format!("{} - {}\n", log.medicine_name, log.month_year));
    output.push_str(&format!("  Strength:          {}\n", or_dash(&log.strength)));
    output.push_str(&format!("  Dosage:            {}\n", or_dash(&log.dosage)));
    output.push_str(&format!("  Reason Prescribed: {}\n", or_dash(&log.reason_prescribed)));
    output.push_str(&format!("  Reason PRN:        {}\n", or_dash(&log.reason_prn)));
    output.push('\n');

    if log.administration_log.is_empty() {
        output.push_str("No administrations recorded.\n");
        return output;
    }

    let mut previous_day = None;
    let mut index = 0;
    let rows: Vec<EntryRow> = log
        .administration_log
        .iter()
        .map(|entry| {
            index = if previous_day == Some(entry.day) { index + 1 } else { 0 };
            previous_day = Some(entry.day);
            EntryRow {
                day: entry.day,
                index,
                time: &entry.time,
                initials: &entry.initials,
                amount: &entry.amount_remaining,
            }
        })
        .collect();

    output.push_str(&render_table(rows));
    output.push('\n');
    output
}

/// Format a day → count summary
pub fn format_summary(summary: &BTreeMap<u32, usize>) -> String {
    if summary.is_empty() {
        return "No administrations recorded.".to_string();
    }

    let total: usize = summary.values().sum();
    let mut output = render_table(
        summary
            .iter()
            .map(|(&day, &count)| SummaryRow { day, count })
            .collect(),
    );
    output.push_str(&format!("\nTotal: {} on {} days\n", total, summary.len()));
    output
}
