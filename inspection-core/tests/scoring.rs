//! End-to-end scoring through the public API, starting from report JSON.

use inspection_core::{
    ChecklistTemplate, Condition, ConditionValue, InspectorRole, InspectorSession, Rating,
    ReportMetadata, ReportStatus, build_draft, calculate_scores, classify_rating,
};

fn parse_report(json: &str) -> inspection_core::Report {
    serde_json::from_str(json).expect("report json")
}

#[test]
fn three_checkpoint_unit_rounds_to_87() {
    let report = parse_report(
        r#"{
            "units": [{
                "name": "Engine",
                "checkpoints": [
                    {"id": "1", "name": "Oil", "condition": "Good"},
                    {"id": "2", "name": "Belt", "condition": "Good"},
                    {"id": "3", "name": "Starter", "condition": "Better"}
                ]
            }]
        }"#,
    );

    let scored = calculate_scores(&report);

    assert_eq!(scored.units[0].unit_score, 87);
    assert_eq!(scored.overall_score, 87);
    assert_eq!(scored.overall_rating, Rating::Good);
}

#[test]
fn two_units_average_without_weighting() {
    // 90 from two checkpoints, 65 from four answered across sub-units.
    let report = parse_report(
        r#"{
            "units": [
                {"name": "Boom", "checkpoints": [
                    {"id": "1", "name": "Pins", "condition": "Good"},
                    {"id": "2", "name": "Cylinders", "condition": "Better"}
                ]},
                {"name": "Tracks", "subUnits": [
                    {"name": "Left", "checkpoints": [
                        {"id": "3", "name": "Rollers", "condition": "Good"},
                        {"id": "4", "name": "Shoes", "condition": "Bad"}
                    ]},
                    {"name": "Right", "checkpoints": [
                        {"id": "5", "name": "Rollers", "condition": "Better"},
                        {"id": "6", "name": "Shoes", "condition": "Bad"},
                        {"id": "7", "name": "Idler", "condition": ""}
                    ]}
                ]}
            ]
        }"#,
    );

    let scored = calculate_scores(&report);

    assert_eq!(scored.units[0].unit_score, 90);
    assert_eq!(scored.units[1].unit_score, 65);
    assert_eq!(scored.overall_score, 78);
    assert_eq!(scored.overall_rating, Rating::Good);
}

#[test]
fn unanswered_and_unrecognized_are_excluded() {
    let report = parse_report(
        r#"{
            "units": [{
                "name": "Hydraulics",
                "checkpoints": [
                    {"id": "1", "name": "Pump", "condition": "Good"},
                    {"id": "2", "name": "Hoses", "condition": "Bad"},
                    {"id": "3", "name": "Tank", "condition": null},
                    {"id": "4", "name": "Valves", "condition": "Excellent"}
                ]
            }]
        }"#,
    );

    let scored = calculate_scores(&report);

    assert_eq!(scored.units[0].unit_score, 60);
    assert_eq!(scored.overall_score, 60);
    assert_eq!(scored.overall_rating, Rating::Average);
    assert_eq!(
        scored.units[0].checkpoints[3].condition,
        ConditionValue::Unrecognized("Excellent".to_string())
    );
}

#[test]
fn non_string_conditions_do_not_block_scoring() {
    let report = parse_report(
        r#"{
            "units": [{
                "name": "Engine",
                "unitScore": 86.67,
                "checkpoints": [
                    {"id": "1", "name": "Oil", "condition": "Good"},
                    {"id": "2", "name": "Belt", "condition": 3},
                    {"id": "3", "name": "Starter", "condition": false}
                ]
            }],
            "overallScore": 300
        }"#,
    );

    let scored = calculate_scores(&report);

    assert_eq!(scored.units[0].unit_score, 80);
    assert_eq!(scored.overall_score, 80);
    assert_eq!(scored.overall_rating, Rating::Good);
    assert_eq!(
        scored.units[0].checkpoints[1].condition,
        ConditionValue::Unrecognized("3".to_string())
    );
}

#[test]
fn draft_from_template_scores_after_answers() {
    let template = ChecklistTemplate::from_json(
        r#"{"units": [
            {"name": "Engine", "questions": ["Oil", "Belt"]},
            {"name": "Cab", "subUnits": [{"name": "Controls", "questions": ["Joystick"]}]}
        ]}"#,
    )
    .expect("template");
    let session = InspectorSession::new("Asha", InspectorRole::Inspector);

    let mut report = build_draft(&template, ReportMetadata::default(), &session).expect("draft");
    let unscored = calculate_scores(&report);
    assert_eq!(unscored.overall_score, 0);
    assert_eq!(unscored.overall_rating, Rating::NotGood);
    assert_eq!(unscored.status, ReportStatus::Draft);

    assert!(report.set_condition("1.0.1", Condition::Better.into()));
    assert!(report.set_condition("1.0.2", Condition::Bad.into()));
    assert!(report.set_condition("2.1.1", Condition::Good.into()));
    let scored = calculate_scores(&report);

    assert_eq!(scored.units[0].unit_score, 70);
    assert_eq!(scored.units[1].unit_score, 80);
    assert_eq!(scored.overall_score, 75);
    assert_eq!(scored.overall_rating, Rating::Good);
    assert_eq!(scored.status, ReportStatus::Scored);
    assert_eq!(scored.metadata.inspector.as_deref(), Some("Asha"));
}

#[test]
fn rating_thresholds_hold_across_range() {
    for score in 0..=100u8 {
        let expected = match score {
            70..=100 => Rating::Good,
            50..=69 => Rating::Average,
            _ => Rating::NotGood,
        };
        assert_eq!(classify_rating(score), expected, "score {score}");
    }
}
