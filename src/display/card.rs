//! Medication card display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::MedicationCard;

#[derive(Tabled)]
struct CardRow<'a> {
    #[tabled(rename = "Medicine")]
    medicine: &'a str,
    #[tabled(rename = "Strength")]
    strength: &'a str,
    #[tabled(rename = "Dosage")]
    dosage: &'a str,
    #[tabled(rename = "Images")]
    images: usize,
}

/// Format cards as a table
pub fn format_card_list(cards: &[MedicationCard]) -> String {
    if cards.is_empty() {
        return "No medication cards found.".to_string();
    }

    render_table(
        cards
            .iter()
            .map(|c| CardRow {
                medicine: &c.medicine_name,
                strength: &c.strength,
                dosage: &c.dosage,
                images: c.images.len(),
            })
            .collect(),
    )
}

/// Format a single card's details, listing its images
pub fn format_card_details(card: &MedicationCard) -> String {
    let mut output = String::new();

    output.push_str(&format!("Medication Card: {}\n", card.medicine_name));
    output.push_str(&format!("  Strength:          {}\n", or_dash(&card.strength)));
    output.push_str(&format!("  Dosage:            {}\n", or_dash(&card.dosage)));
    output.push_str(&format!("  Reason Prescribed: {}\n", or_dash(&card.reason_prescribed)));
    output.push_str(&format!("  Reason PRN:        {}\n", or_dash(&card.reason_prn)));

    output.push('\n');
    if card.images.is_empty() {
        output.push_str("  No images attached.\n");
    } else {
        output.push_str("  Images:\n");
        for image in &card.images {
            output.push_str(&format!("    {}\n", image));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicationInfo;

    #[test]
    fn test_format_card_list() {
        assert_eq!(format_card_list(&[]), "No medication cards found.");

        let mut card = MedicationCard::new(MedicationInfo::new("Melatonin"));
        card.attach_image("pill.png");
        let output = format_card_list(&[card]);
        assert!(output.contains("Melatonin"));
        assert!(output.contains("Images"));
    }

    #[test]
    fn test_format_card_details() {
        let mut card = MedicationCard::new(MedicationInfo::new("Melatonin"));
        assert!(format_card_details(&card).contains("No images attached."));

        card.attach_image("pill.png");
        let output = format_card_details(&card);
        assert!(output.contains("Medication Card: Melatonin"));
        assert!(output.contains("    pill.png"));
    }
}
