//! Request boundary tests: decoding, dispatch, and response document shapes.

use scenrun::boundary::{dispatch, Request};
use scenrun::store::FileKind;
use scenrun_test_utils::init_tracing;
use scenrun_test_utils::project::ProjectBuilder;
use serde_json::json;

async fn dispatch_value(
    orch: &scenrun::Orchestrator,
    request: Request,
) -> serde_json::Value {
    let response = dispatch(orch, request).await.unwrap();
    serde_json::to_value(&response).unwrap()
}

#[test]
fn requests_decode_from_tagged_documents() {
    init_tracing();

    let req: Request =
        serde_json::from_str(r#"{"op":"start_run","name":"base"}"#).unwrap();
    assert!(matches!(req, Request::StartRun { name } if name == "base"));

    let req: Request =
        serde_json::from_str(r#"{"op":"list_files","name":"base","kind":"inputs"}"#).unwrap();
    assert!(matches!(
        req,
        Request::ListFiles { kind: FileKind::Inputs, .. }
    ));

    let req: Request = serde_json::from_str(
        r#"{"op":"run_reports","scenarios":["A"],"metrics":["p_x"],"measures":["m1"]}"#,
    )
    .unwrap();
    assert!(matches!(req, Request::RunReports { .. }));

    assert!(serde_json::from_str::<Request>(r#"{"op":"no_such_op"}"#).is_err());
}

#[tokio::test]
async fn duplicate_create_is_a_structured_failure() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let orch = project.orchestrator();

    let first = dispatch_value(
        &orch,
        Request::NewScenario {
            name: "base".to_string(),
            from: "template".to_string(),
        },
    )
    .await;
    assert_eq!(first, json!({"success": true}));

    let second = dispatch_value(
        &orch,
        Request::NewScenario {
            name: "base".to_string(),
            from: "template".to_string(),
        },
    )
    .await;
    assert_eq!(second, json!({"success": false}));
}

#[tokio::test]
async fn listing_documents_have_named_fields() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let orch = project.orchestrator();

    dispatch(
        &orch,
        Request::NewScenario {
            name: "base".to_string(),
            from: "template".to_string(),
        },
    )
    .await
    .unwrap();

    let scenarios = dispatch_value(&orch, Request::ListScenarios).await;
    assert_eq!(scenarios, json!({"scenarios": ["base"]}));

    let sources = dispatch_value(&orch, Request::CloneSources).await;
    assert_eq!(
        sources,
        json!({"root_scenarios": ["template"], "scenarios": ["base"]})
    );

    let files = dispatch_value(
        &orch,
        Request::ListFiles {
            name: "base".to_string(),
            kind: FileKind::Inputs,
        },
    )
    .await;
    assert_eq!(files, json!({"files": ["population.csv"]}));

    let outputs = dispatch_value(
        &orch,
        Request::OutputsDirectory {
            name: "base".to_string(),
        },
    )
    .await;
    assert_eq!(outputs["files"], json!([]));
    assert!(
        outputs["directory"].as_str().unwrap().ends_with("outputs"),
        "directory field should point at the outputs subtree"
    );
}

#[tokio::test]
async fn csv_and_text_files_round_trip_through_the_boundary() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let orch = project.orchestrator();

    dispatch(
        &orch,
        Request::NewScenario {
            name: "base".to_string(),
            from: "template".to_string(),
        },
    )
    .await
    .unwrap();

    let rows = vec![
        vec!["zone".to_string(), "people".to_string()],
        vec!["1".to_string(), "250".to_string()],
    ];
    let saved = dispatch_value(
        &orch,
        Request::SaveCsvFile {
            name: "base".to_string(),
            kind: FileKind::Inputs,
            file: "zones.csv".to_string(),
            data: rows.clone(),
        },
    )
    .await;
    assert_eq!(saved, json!({"success": true}));

    let loaded = dispatch_value(
        &orch,
        Request::LoadCsvFile {
            name: "base".to_string(),
            kind: FileKind::Inputs,
            file: "zones.csv".to_string(),
        },
    )
    .await;
    assert_eq!(loaded, json!({"data": [["zone", "people"], ["1", "250"]]}));

    // Text files travel as rows of single cells.
    let saved = dispatch_value(
        &orch,
        Request::SaveTextFile {
            name: "base".to_string(),
            kind: FileKind::Inputs,
            file: "notes.txt".to_string(),
            data: vec![vec!["alpha".to_string()], vec!["beta".to_string()]],
        },
    )
    .await;
    assert_eq!(saved, json!({"success": true}));

    let loaded = dispatch_value(
        &orch,
        Request::LoadTextFile {
            name: "base".to_string(),
            kind: FileKind::Inputs,
            file: "notes.txt".to_string(),
        },
    )
    .await;
    assert_eq!(loaded, json!({"data": [["alpha"], ["beta"]]}));
}

#[tokio::test]
async fn run_status_never_fails_on_a_fresh_project() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let orch = project.orchestrator();

    let status = dispatch_value(&orch, Request::RunStatus).await;
    assert_eq!(status, json!({"output": ""}));

    dispatch(&orch, Request::ResetRunStatus).await.unwrap();
    let status = dispatch_value(&orch, Request::RunStatus).await;
    assert_eq!(status, json!({"output": "pending"}));
}

#[tokio::test]
async fn default_state_document_is_null_until_set() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let orch = project.orchestrator();

    let state = dispatch_value(&orch, Request::GetDefaultState).await;
    assert_eq!(state, json!({"state": null}));

    dispatch(
        &orch,
        Request::SetDefaultState {
            state: vec!["demo".to_string()],
        },
    )
    .await
    .unwrap();

    let state = dispatch_value(&orch, Request::GetDefaultState).await;
    assert_eq!(state, json!({"state": ["demo"]}));
}

#[tokio::test]
async fn report_settings_and_run_reports_documents() {
    init_tracing();
    let project = ProjectBuilder::new()
        .with_report_settings("metric,measure\np_x,m1\n")
        .with_report_script("echo ran")
        .build();
    let orch = project.orchestrator();

    let settings = dispatch_value(&orch, Request::ReportSettings).await;
    assert_eq!(settings, json!({"data": [["metric", "measure"], ["p_x", "m1"]]}));

    let reports = dispatch_value(
        &orch,
        Request::RunReports {
            scenarios: vec!["A".to_string(), "B".to_string()],
            metrics: vec!["p_x".to_string()],
            measures: vec!["m1".to_string()],
        },
    )
    .await;
    assert_eq!(
        reports,
        json!({
            "scenarios": ["A", "B"],
            "metrics": ["p_x"],
            "images": ["A-B_x_p_m1.jpeg"],
        })
    );
}

#[tokio::test]
async fn start_run_responds_with_the_pid_after_completion() {
    init_tracing();
    let project = ProjectBuilder::new().with_sim_script("echo done").build();
    let orch = project.orchestrator();

    let value = dispatch_value(
        &orch,
        Request::StartRun {
            name: "base".to_string(),
        },
    )
    .await;
    assert!(value["pid"].as_u64().unwrap() > 0);
}
