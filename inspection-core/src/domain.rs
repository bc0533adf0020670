//! Domain entities for machine inspection reports.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Qualitative judgement an inspector records for a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Condition {
    /// Acceptable wear for the machine's age.
    Good,
    /// Needs repair or replacement.
    Bad,
    /// Better than expected, close to new.
    Better,
}

impl Condition {
    /// All recognized conditions in display order.
    pub const ALL: [Condition; 3] = [Condition::Good, Condition::Bad, Condition::Better];

    /// Label used on the wire and in rendered reports.
    pub const fn label(self) -> &'static str {
        match self {
            Condition::Good => "Good",
            Condition::Bad => "Bad",
            Condition::Better => "Better",
        }
    }

    /// Parse an exact wire label.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.label() == value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Condition field of a checkpoint as entered by the inspector.
///
/// Serialized as an optional string. Values outside [`Condition`] are kept
/// verbatim so that saving a report never drops what was entered; non-string
/// JSON values are kept as their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "Option<String>")]
pub enum ConditionValue {
    /// Not answered yet.
    #[default]
    Unset,
    /// One of the recognized conditions.
    Recognized(Condition),
    /// Any other value. Scored as unanswered.
    Unrecognized(String),
}

impl ConditionValue {
    /// Parse a raw form value. Surrounding whitespace is ignored and an empty
    /// value means unset; labels are otherwise matched exactly.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Unset;
        }
        match Condition::from_label(trimmed) {
            Some(condition) => Self::Recognized(condition),
            None => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Return the recognized condition, if any.
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Self::Recognized(condition) => Some(*condition),
            Self::Unset | Self::Unrecognized(_) => None,
        }
    }
}

impl From<Condition> for ConditionValue {
    fn from(value: Condition) -> Self {
        Self::Recognized(value)
    }
}

impl From<Option<String>> for ConditionValue {
    fn from(value: Option<String>) -> Self {
        value.map(|raw| Self::parse(&raw)).unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for ConditionValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => Self::Unset,
            Value::String(raw) => Self::parse(&raw),
            other => Self::Unrecognized(other.to_string()),
        })
    }
}

impl From<ConditionValue> for Option<String> {
    fn from(value: ConditionValue) -> Self {
        match value {
            ConditionValue::Unset => None,
            ConditionValue::Recognized(condition) => Some(condition.label().to_string()),
            ConditionValue::Unrecognized(raw) => Some(raw),
        }
    }
}

/// An inspectable attribute of a machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Stable identifier within the report.
    pub id: String,
    /// Display name, usually the checklist question.
    pub name: String,
    /// Condition recorded by the inspector.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub condition: ConditionValue,
    /// Free-text remarks.
    #[serde(default)]
    pub remarks: String,
}

impl Checkpoint {
    /// Create an unanswered checkpoint.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition: ConditionValue::Unset,
            remarks: String::new(),
        }
    }

    /// Return a copy with the given condition.
    pub fn with_condition(mut self, condition: impl Into<ConditionValue>) -> Self {
        self.condition = condition.into();
        self
    }
}

/// Second grouping level beneath a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubUnit {
    /// Sub-unit name.
    pub name: String,
    /// Ordered checkpoints.
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

/// Named machine section grouping checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    /// Unit name.
    pub name: String,
    /// Checkpoints attached directly to the unit.
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
    /// Sub-units, for flows with the extra nesting level.
    #[serde(default)]
    pub sub_units: Vec<SubUnit>,
    /// Derived score, 0-100. Out-of-range stored values read as 0.
    #[serde(default, deserialize_with = "derived_score")]
    pub unit_score: u8,
}

impl Unit {
    /// Create an empty unit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checkpoints: Vec::new(),
            sub_units: Vec::new(),
            unit_score: 0,
        }
    }

    /// Iterate direct checkpoints followed by sub-unit checkpoints.
    pub fn all_checkpoints(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter().chain(
            self.sub_units
                .iter()
                .flat_map(|sub_unit| sub_unit.checkpoints.iter()),
        )
    }

    /// Find a checkpoint by id across direct and sub-unit checkpoints.
    pub fn checkpoint_mut(&mut self, id: &str) -> Option<&mut Checkpoint> {
        self.checkpoints
            .iter_mut()
            .chain(
                self.sub_units
                    .iter_mut()
                    .flat_map(|sub_unit| sub_unit.checkpoints.iter_mut()),
            )
            .find(|checkpoint| checkpoint.id == id)
    }
}

/// Categorical rating derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Rating {
    /// Reserved for stored data; never produced by the scoring formula.
    Excellent,
    /// Overall score of 70 or more.
    Good,
    /// Overall score from 50 to 69.
    Average,
    /// Overall score below 50.
    #[default]
    #[serde(rename = "Not Good")]
    NotGood,
}

impl Rating {
    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::NotGood => "Not Good",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scoring lifecycle of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// No checkpoint has been scored yet.
    #[default]
    Draft,
    /// Scores were calculated with at least one answered checkpoint.
    Scored,
    /// Handed to the persistence layer.
    Saved,
}

/// Customer and inspector details carried by a report. Opaque to scoring.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Machine display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
    /// Machine serial or registry identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
    /// Buyer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    /// Seller name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    /// Control station the inspection was performed at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_station: Option<String>,
    /// Customer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Inspector name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspector: Option<String>,
    /// Date of the inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspected_on: Option<NaiveDate>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Inspection report, the aggregate root for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Customer and inspector details.
    #[serde(default)]
    pub metadata: ReportMetadata,
    /// Ordered units.
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Derived overall score, 0-100. Out-of-range stored values read as 0.
    #[serde(default, deserialize_with = "derived_score")]
    pub overall_score: u8,
    /// Derived rating.
    #[serde(default)]
    pub overall_rating: Rating,
    /// Scoring lifecycle status.
    #[serde(default)]
    pub status: ReportStatus,
}

impl Report {
    /// Create an unscored draft.
    pub fn draft(metadata: ReportMetadata, units: Vec<Unit>) -> Self {
        Self {
            metadata,
            units,
            overall_score: 0,
            overall_rating: Rating::NotGood,
            status: ReportStatus::Draft,
        }
    }

    /// Set the condition of a checkpoint by id. Returns false when no
    /// checkpoint carries that id.
    pub fn set_condition(&mut self, checkpoint_id: &str, condition: ConditionValue) -> bool {
        for unit in &mut self.units {
            if let Some(checkpoint) = unit.checkpoint_mut(checkpoint_id) {
                checkpoint.condition = condition;
                return true;
            }
        }
        false
    }
}

/// Read a stored derived score. Scores are recomputed before use, so a stale
/// or malformed value must not block loading the report.
fn derived_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .filter(|score| *score <= 100)
        .and_then(|score| u8::try_from(score).ok())
        .unwrap_or(0))
}
