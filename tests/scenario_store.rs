//! Scenario Store integration tests: directory-backed CRUD semantics.

use std::fs;

use scenrun::errors::ScenrunError;
use scenrun::store::FileKind;
use scenrun_test_utils::init_tracing;
use scenrun_test_utils::project::ProjectBuilder;

#[test]
fn listing_autocreates_missing_root() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(!project.path("project").exists());
    assert_eq!(store.list_scenarios().unwrap(), Vec::<String>::new());
    assert!(project.path("project").is_dir());
}

#[test]
fn create_from_template_copies_tree_and_stamps() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());

    assert_eq!(
        store.list_files("base", FileKind::Inputs).unwrap(),
        vec!["population.csv".to_string()]
    );
    assert_eq!(
        store.list_files("base", FileKind::Parameters).unwrap(),
        vec!["globals.csv".to_string()]
    );

    let stamp = fs::read_to_string(project.project_path("base/time.txt")).unwrap();
    assert!(!stamp.trim().is_empty());

    // A successful create never leaves the incomplete marker behind.
    assert!(!project.project_path("base/.incomplete").exists());

    assert_eq!(store.list_scenarios().unwrap(), vec!["base".to_string()]);
}

#[test]
fn duplicate_create_fails_without_mutation() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());
    let stamp_before = fs::read_to_string(project.project_path("base/time.txt")).unwrap();
    fs::write(project.project_path("base/inputs/extra.txt"), "kept").unwrap();

    assert!(!store.create_scenario("base", "template", true).unwrap());

    assert_eq!(
        fs::read_to_string(project.project_path("base/inputs/extra.txt")).unwrap(),
        "kept"
    );
    assert_eq!(
        fs::read_to_string(project.project_path("base/time.txt")).unwrap(),
        stamp_before
    );
}

#[test]
fn clone_from_existing_scenario_copies_edits() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());
    let lines = vec!["first".to_string(), "second".to_string()];
    store
        .write_lines("base", FileKind::Inputs, "notes.txt", &lines)
        .unwrap();

    assert!(store.create_scenario("variant", "base", false).unwrap());

    assert_eq!(
        store.read_lines("variant", FileKind::Inputs, "notes.txt").unwrap(),
        lines
    );
}

#[test]
fn clone_from_unknown_scenario_is_not_found() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    let err = store.create_scenario("variant", "ghost", false).unwrap_err();
    assert!(matches!(err, ScenrunError::ScenarioNotFound(_)));
    assert!(!project.project_path("variant").exists());
}

#[test]
fn delete_removes_tree_and_ui_cache() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());
    fs::create_dir_all(project.path("ui_cache/base")).unwrap();

    store.delete_scenario("base").unwrap();

    assert!(!project.project_path("base").exists());
    assert!(!project.path("ui_cache/base").exists());
    assert_eq!(store.list_scenarios().unwrap(), Vec::<String>::new());
}

#[test]
fn delete_missing_scenario_fails() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();
    store.list_scenarios().unwrap();

    assert!(store.delete_scenario("ghost").is_err());
}

#[test]
fn reserved_entries_are_hidden_and_rejected() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();
    store.list_scenarios().unwrap();

    fs::create_dir_all(project.project_path("parameters")).unwrap();
    fs::create_dir_all(project.project_path("reports")).unwrap();

    assert_eq!(store.list_scenarios().unwrap(), Vec::<String>::new());

    assert!(matches!(
        store.create_scenario("parameters", "template", true),
        Err(ScenrunError::InvalidName(_))
    ));
    assert!(matches!(
        store.delete_scenario("reports"),
        Err(ScenrunError::InvalidName(_))
    ));
}

#[test]
fn clone_sources_lists_template_first() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());

    let sources = store.clone_sources().unwrap();
    assert_eq!(sources.root_scenarios, vec!["template".to_string()]);
    assert_eq!(sources.scenarios, vec!["base".to_string()]);
}

#[test]
fn outputs_subdir_is_created_lazily() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());
    assert!(!project.project_path("base/outputs").exists());

    assert_eq!(
        store.list_files("base", FileKind::Outputs).unwrap(),
        Vec::<String>::new()
    );
    assert!(project.project_path("base/outputs").is_dir());

    let (files, directory) = store.outputs_directory("base").unwrap();
    assert!(files.is_empty());
    assert!(directory.ends_with("base/outputs"));
}

#[test]
fn path_traversal_is_rejected() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());

    assert!(matches!(
        store.create_scenario("../evil", "template", true),
        Err(ScenrunError::InvalidName(_))
    ));
    assert!(matches!(
        store.read_lines("base", FileKind::Inputs, "../time.txt"),
        Err(ScenrunError::InvalidName(_))
    ));
    assert!(matches!(
        store.read_lines("..", FileKind::Inputs, "x.txt"),
        Err(ScenrunError::InvalidName(_))
    ));
    assert!(matches!(
        store.delete_scenario("a/b"),
        Err(ScenrunError::InvalidName(_))
    ));
}

#[test]
fn csv_rows_round_trip_through_store() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());

    let rows = vec![
        vec!["zone".to_string(), "label".to_string()],
        vec!["1".to_string(), "north, east".to_string()],
    ];
    store
        .write_rows("base", FileKind::Inputs, "zones.csv", &rows)
        .unwrap();

    assert_eq!(
        store.read_rows("base", FileKind::Inputs, "zones.csv").unwrap(),
        rows
    );
}

#[test]
fn missing_file_read_is_an_error() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert!(store.create_scenario("base", "template", true).unwrap());
    assert!(store.read_rows("base", FileKind::Inputs, "absent.csv").is_err());
}

#[test]
fn default_state_none_until_written() {
    init_tracing();
    let project = ProjectBuilder::new().build();
    let store = project.store();

    assert_eq!(store.read_default_state().unwrap(), None);

    let state = vec!["demo".to_string()];
    store.write_default_state(&state).unwrap();
    assert_eq!(store.read_default_state().unwrap(), Some(state));
}

#[test]
fn report_settings_table_is_read_as_rows() {
    init_tracing();
    let project = ProjectBuilder::new()
        .with_report_settings("metric,measure\np_x,m1\n")
        .build();
    let store = project.store();

    assert_eq!(
        store.read_report_settings().unwrap(),
        vec![
            vec!["metric".to_string(), "measure".to_string()],
            vec!["p_x".to_string(), "m1".to_string()],
        ]
    );
}
