//! Explicit inspector session context.
//!
//! Drafting and reporting flows take an [`InspectorSession`] argument instead
//! of reading ambient user state. Scoring never needs one.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectorRole {
    /// Performs inspections.
    #[default]
    Inspector,
    /// Manages reference data and may also inspect.
    Admin,
    /// Read-only access.
    Viewer,
}

impl InspectorRole {
    /// Parse a role name, case-insensitively.
    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inspector" => Some(Self::Inspector),
            "admin" | "administrator" => Some(Self::Admin),
            "viewer" | "readonly" | "read-only" => Some(Self::Viewer),
            _ => None,
        }
    }

    /// Whether this role may create and fill inspection reports.
    pub const fn can_inspect(self) -> bool {
        matches!(self, Self::Inspector | Self::Admin)
    }
}

/// Identity of the user driving an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InspectorSession {
    /// Display name stamped onto drafted reports.
    pub inspector: String,
    /// Role of the user.
    pub role: InspectorRole,
}

impl InspectorSession {
    /// Create a session.
    pub fn new(inspector: impl Into<String>, role: InspectorRole) -> Self {
        Self {
            inspector: inspector.into(),
            role,
        }
    }
}
