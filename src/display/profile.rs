//! Profile display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::Profile;

#[derive(Tabled)]
struct ProfileRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Foster Home")]
    foster_home: &'a str,
    #[tabled(rename = "Allergies")]
    allergies: &'a str,
}

/// Format profiles as a table
pub fn format_profile_list(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No profiles found.".to_string();
    }

    render_table(
        profiles
            .iter()
            .map(|p| ProfileRow {
                id: &p.profile_id,
                name: &p.info.child_name,
                foster_home: &p.info.foster_home,
                allergies: &p.info.allergies,
            })
            .collect(),
    )
}

/// Format a single profile's details
pub fn format_profile_details(profile: &Profile) -> String {
    let info = &profile.info;
    let mut output = String::new();

    output.push_str(&format!("Profile: {}\n", info.child_name));
    output.push_str(&format!("  ID:               {}\n", profile.profile_id));
    output.push_str(&format!("  Foster Home:      {}\n", or_dash(&info.foster_home)));
    output.push_str(&format!("  Allergies:        {}\n", or_dash(&info.allergies)));
    output.push('\n');
    output.push_str(&format!(
        "  Prescriber:       {} {}\n",
        or_dash(&info.prescriber_name),
        phone(&info.prescriber_phone)
    ));
    output.push_str(&format!(
        "  Pharmacy:         {} {}\n",
        or_dash(&info.pharmacy),
        phone(&info.pharmacy_phone)
    ));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        profile.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        profile.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

fn phone(number: &str) -> String {
    if number.trim().is_empty() {
        String::new()
    } else {
        format!("({})", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileInfo;

    #[test]
    fn test_format_profile_list() {
        assert_eq!(format_profile_list(&[]), "No profiles found.");

        let profile = Profile::new("jane_doe", ProfileInfo::new("Jane Doe"));
        let output = format_profile_list(&[profile]);
        assert!(output.contains("Foster Home"));
        assert!(output.contains("jane_doe"));
        assert!(output.contains("Jane Doe"));
    }

    #[test]
    fn test_format_profile_details() {
        let mut info = ProfileInfo::new("Jane Doe");
        info.prescriber_name = "Dr. Who".into();
        info.prescriber_phone = "555-0100".into();
        let output = format_profile_details(&Profile::new("jane_doe", info));

        assert!(output.contains("Profile: Jane Doe"));
        assert!(output.contains("Dr. Who (555-0100)"));
        assert!(output.contains("Allergies:        -"));
    }
}
