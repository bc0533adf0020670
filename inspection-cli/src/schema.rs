//! OpenAPI component schemas for the report types.
//!
//! The persistence API stores scored reports in this shape.

use inspection_core::{
    ChecklistTemplate, Checkpoint, Condition, InspectorRole, InspectorSession, Rating, Report,
    ReportMetadata, ReportStatus, SubUnit, SubUnitTemplate, Unit, UnitSummary, UnitTemplate,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Machine inspection reports",
        description = "Report, checklist and session shapes exchanged with the inspection backend."
    ),
    components(schemas(
        Report,
        ReportMetadata,
        ReportStatus,
        Rating,
        Unit,
        SubUnit,
        Checkpoint,
        Condition,
        UnitSummary,
        ChecklistTemplate,
        UnitTemplate,
        SubUnitTemplate,
        InspectorSession,
        InspectorRole
    ))
)]
pub(crate) struct ReportApiDoc;

/// Render the schema document as pretty JSON.
pub(crate) fn render_schema() -> Result<String, serde_json::Error> {
    ReportApiDoc::openapi().to_pretty_json()
}
