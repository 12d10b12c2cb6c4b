//! Job position model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open job position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// UUID v4 assigned at creation
    pub id: String,
    pub title: String,
    pub department: String,
    /// Employment type, e.g. "Full-time"
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub experience: String,
    pub description: String,
    /// At least one requirement
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePositionInput {
    pub title: String,
    pub department: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub location: String,
    pub experience: String,
    pub description: String,
    pub requirements: Vec<String>,
}

/// Partial update of a position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePositionInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, rename = "type")]
    pub job_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
}

impl UpdatePositionInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.department.is_some()
            || self.job_type.is_some()
            || self.location.is_some()
            || self.experience.is_some()
            || self.description.is_some()
            || self.requirements.is_some()
    }
}

/// Exact-match position filter. The value `"all"` disables a criterion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionFilter {
    pub department: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
}

impl PositionFilter {
    /// Build a filter, dropping absent, empty and `"all"` values
    pub fn new(department: Option<String>, job_type: Option<String>, location: Option<String>) -> Self {
        Self {
            department: normalize(department),
            job_type: normalize(job_type),
            location: normalize(location),
        }
    }

    /// Filter on department only
    pub fn department(department: Option<String>) -> Self {
        Self::new(department, None, None)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}
