//! Claim report input model.
//!
//! Mirrors the claim record a caller assembles from its own data sources.
//! Every field the renderer consumes is optional; absent values render as
//! "N/A". Deserialization is lenient: missing fields fall back to defaults
//! so a partially-known counterparty still loads.

use crate::error::{ClaimReportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Canonical shot types, in capture order. Photos are labeled by position.
pub const GUIDE_LABELS: [&str; 6] = [
    "Front Damage",
    "Rear Damage",
    "Driver Side",
    "Passenger Side",
    "Traffic & Signs",
    "Wide Shot of Cars",
];

/// Identity and license fields for one party.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverProfile {
    pub full_name: Option<String>,
    pub id_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub license_number: Option<String>,
    pub license_year_of_issue: Option<i32>,
    pub license_expiry: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub vehicle_number: Option<String>,
    pub vehicle_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub vin: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub policy_number: Option<String>,
    pub insurance_company: Option<String>,
    pub policyholder_name: Option<String>,
    pub policyholder_id: Option<String>,
    pub coverage_type: Option<String>,
    pub agent_name: Option<String>,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
}

/// One side of the incident: identity, vehicle, and policy.
///
/// The claimant and the counterparty share this shape; for the
/// counterparty every block may be entirely empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub profile: DriverProfile,
    pub vehicle: Vehicle,
    pub policy: Policy,
}

impl Party {
    /// A party is rendered only when at least a name is known.
    pub fn has_name(&self) -> bool {
        self.profile
            .full_name
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Witness {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub statement: Option<String>,
}

impl Witness {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Full structured payload for one report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimReportInput {
    pub id: String,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub generated_at: Option<String>,

    pub incident_location: Option<String>,
    pub incident_time: Option<String>,
    pub weather_conditions: Option<String>,
    pub description: Option<String>,

    pub claimant: Party,
    pub other_party: Party,

    pub has_witnesses: bool,
    pub witnesses: Vec<Witness>,

    /// Scene photo sources in guide order: file paths or `data:` URLs.
    pub photos: Vec<String>,
}

/// A photo paired with its guide label at the point of collection, so the
/// label cannot drift from the position later.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPhoto {
    pub label: String,
    pub source: String,
}

impl ClaimReportInput {
    /// Short uppercase report id (first 8 characters of the claim id).
    pub fn report_id(&self) -> String {
        self.id.chars().take(8).collect::<String>().to_uppercase()
    }

    /// Pairs each photo with the canonical guide label for its position.
    pub fn labeled_photos(&self) -> Vec<LabeledPhoto> {
        self.photos
            .iter()
            .enumerate()
            .map(|(i, source)| LabeledPhoto {
                label: GUIDE_LABELS
                    .get(i)
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| format!("Photo {}", i + 1)),
                source: source.clone(),
            })
            .collect()
    }

    /// Witnesses that make it into the document: requires the flag, a
    /// non-empty name, and at most two entries.
    pub fn present_witnesses(&self) -> Vec<(usize, &Witness)> {
        if !self.has_witnesses {
            return Vec::new();
        }
        self.witnesses
            .iter()
            .take(2)
            .enumerate()
            .filter(|(_, w)| w.has_name())
            .map(|(i, w)| (i + 1, w))
            .collect()
    }

    /// Loads a claim file, resolving relative photo paths against the
    /// file's parent directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ClaimReportError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let mut claim: ClaimReportInput = serde_json::from_str(&content)
            .map_err(|e| ClaimReportError::InvalidClaim(format!("{}: {}", path.display(), e)))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        for source in &mut claim.photos {
            if source.starts_with("data:") {
                continue;
            }
            let photo_path = Path::new(source);
            if photo_path.is_relative() {
                *source = base_dir.join(photo_path).to_string_lossy().to_string();
            }
        }

        Ok(claim)
    }
}
