//! Core data models for medlog
//!
//! This module contains the data structures persisted by the stores:
//! monthly medication logs with their administration entries, reusable
//! medication cards, and patient profiles.

pub mod card;
pub mod entry;
pub mod log;
pub mod naming;
pub mod profile;

pub use card::MedicationCard;
pub use entry::{AdministrationEntry, MAX_DAY};
pub use log::{MedicationInfo, MedicationLog};
pub use naming::{generate_profile_id, safe_segment};
pub use profile::{Profile, ProfileInfo};

use chrono::{DateTime, Duration, Utc};

/// Timestamp for a modification that strictly follows `previous`
///
/// Two saves inside the same clock tick still produce increasing
/// `updated_at` values.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
