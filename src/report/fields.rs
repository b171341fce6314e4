//! Label/value construction for the report sections.
//!
//! Pure data shaping: every section body is a list of rows built here and
//! rendered by the PDF layer, so the "N/A" defaults, date formatting, and
//! summary truncation are testable without touching the renderer.

use crate::claim::{ClaimReportInput, Party};
use chrono::NaiveDate;

pub const NA: &str = "N/A";

/// Values longer than this are truncated on the summary page.
const SUMMARY_VALUE_MAX: usize = 25;

/// Missing, empty, or whitespace-only values render as "N/A".
pub fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NA.to_string(),
    }
}

fn or_na_num(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NA.to_string())
}

/// Local short date (MM/DD/YYYY). Accepts RFC 3339 timestamps or bare
/// dates; anything else is echoed as supplied.
pub fn format_date(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return NA.to_string(),
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%m/%d/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%m/%d/%Y").to_string();
    }
    raw.to_string()
}

/// Short date plus time (MM/DD/YYYY HH:MM) for incident timestamps.
pub fn format_date_time(value: Option<&str>) -> String {
    let raw = match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => return NA.to_string(),
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%m/%d/%Y %H:%M").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%m/%d/%Y %H:%M").to_string();
    }
    raw.to_string()
}

/// Summary-card truncation: over 25 characters becomes 22 plus "...".
pub fn truncate_value(value: &str) -> String {
    if value.chars().count() > SUMMARY_VALUE_MAX {
        let head: String = value.chars().take(SUMMARY_VALUE_MAX - 3).collect();
        format!("{}...", head)
    } else {
        value.to_string()
    }
}

/// One body row: either a two-column label/value pair or a full-width row.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Two {
        label1: &'static str,
        value1: String,
        label2: &'static str,
        value2: String,
    },
    Single {
        label: &'static str,
        value: String,
    },
}

impl Row {
    pub fn two(label1: &'static str, value1: String, label2: &'static str, value2: String) -> Self {
        Row::Two {
            label1,
            value1,
            label2,
            value2,
        }
    }

    pub fn single(label: &'static str, value: String) -> Self {
        Row::Single { label, value }
    }
}

/// Titled group of rows inside a party section.
#[derive(Debug, Clone)]
pub struct Subsection {
    pub title: &'static str,
    pub rows: Vec<Row>,
}

/// The four fixed subsections for a party, claimant and counterparty alike.
pub fn party_subsections(party: &Party) -> Vec<Subsection> {
    let profile = &party.profile;
    let vehicle = &party.vehicle;
    let policy = &party.policy;

    vec![
        Subsection {
            title: "Personal Information",
            rows: vec![
                Row::two(
                    "Full Name",
                    or_na(profile.full_name.as_deref()),
                    "ID Number",
                    or_na(profile.id_number.as_deref()),
                ),
                Row::two(
                    "Gender",
                    or_na(profile.gender.as_deref()),
                    "Date of Birth",
                    format_date(profile.date_of_birth.as_deref()),
                ),
                Row::two(
                    "Phone",
                    or_na(profile.phone.as_deref()),
                    "Address",
                    or_na(profile.address.as_deref()),
                ),
            ],
        },
        Subsection {
            title: "Driver's License",
            rows: vec![
                Row::two(
                    "License Number",
                    or_na(profile.license_number.as_deref()),
                    "Year of Issue",
                    or_na_num(profile.license_year_of_issue),
                ),
                Row::single("License Expiry", format_date(profile.license_expiry.as_deref())),
            ],
        },
        Subsection {
            title: "Vehicle Information",
            rows: vec![
                Row::two(
                    "Vehicle Number",
                    or_na(vehicle.vehicle_number.as_deref()),
                    "Vehicle Type",
                    or_na(vehicle.vehicle_type.as_deref()),
                ),
                Row::two(
                    "Make",
                    or_na(vehicle.make.as_deref()),
                    "Model",
                    or_na(vehicle.model.as_deref()),
                ),
                Row::two(
                    "Year",
                    or_na_num(vehicle.year),
                    "Color",
                    or_na(vehicle.color.as_deref()),
                ),
                Row::single("VIN", or_na(vehicle.vin.as_deref())),
            ],
        },
        Subsection {
            title: "Insurance Policy",
            rows: vec![
                Row::two(
                    "Policy Number",
                    or_na(policy.policy_number.as_deref()),
                    "Insurance Company",
                    or_na(policy.insurance_company.as_deref()),
                ),
                Row::two(
                    "Policyholder Name",
                    or_na(policy.policyholder_name.as_deref()),
                    "Policyholder ID",
                    or_na(policy.policyholder_id.as_deref()),
                ),
                Row::two(
                    "Coverage Type",
                    or_na(policy.coverage_type.as_deref()),
                    "Agent Name",
                    or_na(policy.agent_name.as_deref()),
                ),
                Row::two(
                    "Valid From",
                    or_na(policy.valid_from.as_deref()),
                    "Valid Until",
                    or_na(policy.valid_until.as_deref()),
                ),
            ],
        },
    ]
}

/// Six label/value pairs for a party's summary card.
pub fn party_summary(party: &Party) -> Vec<(&'static str, String)> {
    vec![
        ("Name", or_na(party.profile.full_name.as_deref())),
        ("ID Number", or_na(party.profile.id_number.as_deref())),
        ("Phone", or_na(party.profile.phone.as_deref())),
        ("Vehicle", or_na(party.vehicle.vehicle_number.as_deref())),
        ("Policy #", or_na(party.policy.policy_number.as_deref())),
        ("Insurance", or_na(party.policy.insurance_company.as_deref())),
    ]
}

/// Six label/value pairs for the incident summary card.
pub fn incident_summary(claim: &ClaimReportInput) -> Vec<(&'static str, String)> {
    let witness_count = claim.present_witnesses().len();
    let witnesses = if witness_count > 0 {
        format!(
            "{} witness{}",
            witness_count,
            if witness_count > 1 { "es" } else { "" }
        )
    } else {
        "None".to_string()
    };

    vec![
        ("Location", or_na(claim.incident_location.as_deref())),
        ("Date/Time", format_date_time(claim.incident_time.as_deref())),
        ("Weather", or_na(claim.weather_conditions.as_deref())),
        ("Photos", format!("{} attached", claim.photos.len())),
        ("Witnesses", witnesses),
        (
            "Status",
            claim
                .status
                .as_deref()
                .unwrap_or("draft")
                .to_uppercase(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Witness;

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("")), "N/A");
        assert_eq!(or_na(Some("   ")), "N/A");
        assert_eq!(or_na(Some("value")), "value");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_date(Some("")), "N/A");
        assert_eq!(format_date(Some("1990-04-12")), "04/12/1990");
        assert_eq!(format_date(Some("2026-01-05T08:30:00+00:00")), "01/05/2026");
        // Unparseable input is echoed, not dropped.
        assert_eq!(format_date(Some("sometime in May")), "sometime in May");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time(None), "N/A");
        assert_eq!(
            format_date_time(Some("2026-01-05T08:30:00+00:00")),
            "01/05/2026 08:30"
        );
        assert_eq!(
            format_date_time(Some("2026-01-05T08:30:00")),
            "01/05/2026 08:30"
        );
    }

    #[test]
    fn test_truncate_value() {
        assert_eq!(truncate_value("short"), "short");
        assert_eq!(truncate_value(&"x".repeat(25)), "x".repeat(25));

        let long = "1234567890123456789012345678";
        let truncated = truncate_value(long);
        assert_eq!(truncated, "1234567890123456789012...");
        assert_eq!(truncated.chars().count(), 25);
    }

    #[test]
    fn test_party_subsections_defaults_to_na() {
        let sections = party_subsections(&Party::default());
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].title, "Personal Information");
        assert_eq!(sections[3].title, "Insurance Policy");

        for section in &sections {
            for row in &section.rows {
                match row {
                    Row::Two { value1, value2, .. } => {
                        assert_eq!(value1, "N/A");
                        assert_eq!(value2, "N/A");
                    }
                    Row::Single { value, .. } => assert_eq!(value, "N/A"),
                }
            }
        }
    }

    #[test]
    fn test_party_summary_shape() {
        let mut party = Party::default();
        party.profile.full_name = Some("Alex Doe".to_string());
        party.policy.policy_number = Some("POL-99".to_string());

        let items = party_summary(&party);
        assert_eq!(items.len(), 6);
        assert_eq!(items[0], ("Name", "Alex Doe".to_string()));
        assert_eq!(items[4], ("Policy #", "POL-99".to_string()));
        assert_eq!(items[5], ("Insurance", "N/A".to_string()));
    }

    #[test]
    fn test_incident_summary_counts() {
        let claim = ClaimReportInput {
            photos: vec!["a.jpg".into(), "b.jpg".into()],
            has_witnesses: true,
            witnesses: vec![
                Witness {
                    name: "Jane".into(),
                    ..Default::default()
                },
                Witness {
                    name: "John".into(),
                    ..Default::default()
                },
            ],
            status: Some("submitted".into()),
            ..Default::default()
        };

        let items = incident_summary(&claim);
        assert_eq!(items[3], ("Photos", "2 attached".to_string()));
        assert_eq!(items[4], ("Witnesses", "2 witnesses".to_string()));
        assert_eq!(items[5], ("Status", "SUBMITTED".to_string()));

        let bare = ClaimReportInput::default();
        let items = incident_summary(&bare);
        assert_eq!(items[3], ("Photos", "0 attached".to_string()));
        assert_eq!(items[4], ("Witnesses", "None".to_string()));
        assert_eq!(items[5], ("Status", "DRAFT".to_string()));
    }
}
