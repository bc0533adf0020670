//! Checklist templates and draft report construction.
//!
//! Templates come from the reference-data questions configured per unit and
//! sub-unit. A draft built from a template has every condition unset.

use std::collections::BTreeSet;

use log::info;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Checkpoint, Report, ReportMetadata, SubUnit, Unit};
use crate::error::{InspectionError, Result};
use crate::session::InspectorSession;

/// Questions for one sub-unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubUnitTemplate {
    /// Sub-unit name.
    pub name: String,
    /// Checklist questions, in display order.
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Questions for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnitTemplate {
    /// Unit name.
    pub name: String,
    /// Questions asked directly on the unit.
    #[serde(default)]
    pub questions: Vec<String>,
    /// Sub-units with their own questions.
    #[serde(default)]
    pub sub_units: Vec<SubUnitTemplate>,
}

/// Checklist structure for a machine type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistTemplate {
    /// Units in display order.
    pub units: Vec<UnitTemplate>,
}

impl ChecklistTemplate {
    /// Parse a template from JSON.
    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reject templates that cannot produce a usable report.
    pub fn validate(&self) -> Result<()> {
        if self.units.is_empty() {
            return Err(invalid("template has no units"));
        }

        let mut seen = BTreeSet::new();
        for unit in &self.units {
            let name = unit.name.trim();
            if name.is_empty() {
                return Err(invalid("unit name cannot be blank"));
            }
            if !seen.insert(name.to_string()) {
                return Err(invalid(format!("duplicate unit: {name}")));
            }
            ensure_questions(name, &unit.questions)?;
            for sub_unit in &unit.sub_units {
                let sub_name = sub_unit.name.trim();
                if sub_name.is_empty() {
                    return Err(invalid(format!("sub-unit name cannot be blank in {name}")));
                }
                ensure_questions(&format!("{name}/{sub_name}"), &sub_unit.questions)?;
            }
        }

        Ok(())
    }

    /// Number of checkpoints a draft built from this template would hold.
    pub fn question_count(&self) -> usize {
        self.units
            .iter()
            .map(|unit| {
                unit.questions.len()
                    + unit
                        .sub_units
                        .iter()
                        .map(|sub_unit| sub_unit.questions.len())
                        .sum::<usize>()
            })
            .sum()
    }
}

/// Build an unanswered draft report from a template.
///
/// Checkpoint ids are `unit.sub_unit.question`, 1-based, with sub-unit `0`
/// for questions asked directly on the unit. The session's inspector name
/// fills `metadata.inspector` when it is not already set.
pub fn build_draft(
    template: &ChecklistTemplate,
    mut metadata: ReportMetadata,
    session: &InspectorSession,
) -> Result<Report> {
    if !session.role.can_inspect() {
        return Err(InspectionError::Unauthorized(format!(
            "{} cannot create inspection reports",
            session.inspector
        )));
    }
    template.validate()?;

    if metadata.inspector.is_none() && !session.inspector.trim().is_empty() {
        metadata.inspector = Some(session.inspector.trim().to_string());
    }

    let units = template
        .units
        .iter()
        .enumerate()
        .map(|(unit_index, unit_template)| build_unit(unit_index + 1, unit_template))
        .collect();

    let report = Report::draft(metadata, units);
    info!(
        "drafted report with {} units and {} checkpoints",
        report.units.len(),
        template.question_count()
    );
    Ok(report)
}

fn build_unit(unit_number: usize, template: &UnitTemplate) -> Unit {
    let mut unit = Unit::new(template.name.trim());
    unit.checkpoints = build_checkpoints(unit_number, 0, &template.questions);
    unit.sub_units = template
        .sub_units
        .iter()
        .enumerate()
        .map(|(sub_index, sub_template)| SubUnit {
            name: sub_template.name.trim().to_string(),
            checkpoints: build_checkpoints(unit_number, sub_index + 1, &sub_template.questions),
        })
        .collect();
    unit
}

fn build_checkpoints(unit_number: usize, sub_number: usize, questions: &[String]) -> Vec<Checkpoint> {
    questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            Checkpoint::new(
                format!("{unit_number}.{sub_number}.{}", index + 1),
                question.trim(),
            )
        })
        .collect()
}

fn ensure_questions(scope: &str, questions: &[String]) -> Result<()> {
    if questions.iter().any(|question| question.trim().is_empty()) {
        return Err(invalid(format!("blank question in {scope}")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> InspectionError {
    InspectionError::InvalidTemplate(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConditionValue, Rating, ReportStatus};
    use crate::session::InspectorRole;

    fn excavator_template() -> ChecklistTemplate {
        ChecklistTemplate::from_json(
            r#"{
                "units": [
                    {
                        "name": "Engine",
                        "questions": ["Oil level", "Starter"],
                        "subUnits": [
                            {"name": "Cooling", "questions": ["Radiator", "Hoses"]}
                        ]
                    },
                    {"name": "Undercarriage", "questions": ["Tracks"]}
                ]
            }"#,
        )
        .expect("template parses")
    }

    fn inspector() -> InspectorSession {
        InspectorSession::new("Asha", InspectorRole::Inspector)
    }

    #[test]
    fn builds_unanswered_draft_with_stable_ids() {
        let template = excavator_template();
        let report =
            build_draft(&template, ReportMetadata::default(), &inspector()).expect("draft");

        assert_eq!(report.status, ReportStatus::Draft);
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.overall_rating, Rating::NotGood);
        assert_eq!(report.metadata.inspector.as_deref(), Some("Asha"));

        let ids: Vec<&str> = report
            .units
            .iter()
            .flat_map(|unit| unit.all_checkpoints())
            .map(|checkpoint| checkpoint.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1.0.1", "1.0.2", "1.1.1", "1.1.2", "2.0.1"]);
        assert!(report
            .units
            .iter()
            .flat_map(|unit| unit.all_checkpoints())
            .all(|checkpoint| checkpoint.condition == ConditionValue::Unset));
        assert_eq!(template.question_count(), 5);
    }

    #[test]
    fn keeps_inspector_already_in_metadata() {
        let metadata = ReportMetadata {
            inspector: Some("Field team".to_string()),
            ..ReportMetadata::default()
        };
        let report = build_draft(&excavator_template(), metadata, &inspector()).expect("draft");
        assert_eq!(report.metadata.inspector.as_deref(), Some("Field team"));
    }

    #[test]
    fn viewers_cannot_draft() {
        let session = InspectorSession::new("Guest", InspectorRole::Viewer);
        let error = build_draft(&excavator_template(), ReportMetadata::default(), &session)
            .expect_err("viewer rejected");
        assert!(matches!(error, InspectionError::Unauthorized(_)));
    }

    #[test]
    fn rejects_invalid_templates() {
        let empty = ChecklistTemplate { units: Vec::new() };
        assert!(matches!(
            empty.validate(),
            Err(InspectionError::InvalidTemplate(_))
        ));

        let duplicate = ChecklistTemplate {
            units: vec![
                UnitTemplate {
                    name: "Cab".to_string(),
                    questions: Vec::new(),
                    sub_units: Vec::new(),
                },
                UnitTemplate {
                    name: " Cab ".to_string(),
                    questions: Vec::new(),
                    sub_units: Vec::new(),
                },
            ],
        };
        let message = duplicate.validate().expect_err("duplicate").to_string();
        assert!(message.contains("duplicate unit: Cab"));

        let blank_question = ChecklistTemplate {
            units: vec![UnitTemplate {
                name: "Cab".to_string(),
                questions: Vec::new(),
                sub_units: vec![SubUnitTemplate {
                    name: "Seat".to_string(),
                    questions: vec!["  ".to_string()],
                }],
            }],
        };
        let message = blank_question.validate().expect_err("blank").to_string();
        assert!(message.contains("Cab/Seat"));
    }
}
