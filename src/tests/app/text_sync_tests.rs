use std::time::Duration;

use tokio::time::Instant;

use crate::{
    app::{
        DraftError, EditorOptions, EditorSession, SessionState, TestResult, TextSync, parse_draft,
        render,
    },
    domain::Component,
    io::DocumentFormat,
    tests::fixtures::{model, team, team_json},
};

fn text_session(root: Component) -> EditorSession {
    let mut session = EditorSession::open(root, EditorOptions::default());
    session.set_text_mode(true).unwrap();
    session
}

#[test]
fn text_view_round_trips() {
    for root in [team(), serde_json::from_value(team_json()).unwrap(), model("gpt-4o")] {
        let text = render(&root, DocumentFormat::Json).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(parse_draft(&text, DocumentFormat::Json).unwrap(), root);
    }
}

#[cfg(feature = "yaml")]
#[test]
fn yaml_text_view_round_trips() {
    let root: Component = serde_json::from_value(team_json()).unwrap();
    let text = render(&root, DocumentFormat::Yaml).unwrap();
    assert_eq!(parse_draft(&text, DocumentFormat::Yaml).unwrap(), root);
}

#[test]
fn entering_text_mode_renders_the_working_copy() {
    let session = text_session(team());
    assert!(session.is_text_mode());
    assert_eq!(
        session.text(),
        render(session.working_copy(), DocumentFormat::Json).unwrap()
    );
}

#[test]
fn malformed_draft_keeps_the_working_copy() {
    let mut session = text_session(team());
    let before = render(session.working_copy(), DocumentFormat::Json).unwrap();

    session.edit_text("{\"provider\": ", Instant::now()).unwrap();
    assert!(!session.flush_text().unwrap());

    assert_eq!(render(session.working_copy(), DocumentFormat::Json).unwrap(), before);
    assert_eq!(session.state(), SessionState::Clean);
    assert!(matches!(
        session.last_draft_error(),
        Some(DraftError::Syntax { .. })
    ));
    // The text editor keeps what the user typed.
    assert_eq!(session.text(), "{\"provider\": ");
}

#[test]
fn draft_without_envelope_is_rejected() {
    let mut session = text_session(team());
    session
        .edit_text("{\"config\": {\"max_turns\": 2}}", Instant::now())
        .unwrap();
    assert!(!session.flush_text().unwrap());
    match session.last_draft_error() {
        Some(DraftError::Shape(violations)) => {
            assert!(violations.iter().any(|v| v.contains("provider")));
        }
        other => panic!("expected a shape error, got {other:?}"),
    }
}

#[test]
fn debounce_waits_for_quiet_period() {
    let mut session = text_session(team());
    let start = Instant::now();
    let mut edited = team();
    edited.label = Some("Edited".into());
    let text = render(&edited, DocumentFormat::Json).unwrap();

    session.edit_text(text.clone(), start).unwrap();
    assert_eq!(session.text_deadline(), Some(start + Duration::from_millis(500)));
    assert!(!session.poll_text(start + Duration::from_millis(300)).unwrap());

    // Another keystroke pushes the deadline out.
    let later = start + Duration::from_millis(400);
    session.edit_text(text, later).unwrap();
    assert!(!session.poll_text(start + Duration::from_millis(600)).unwrap());
    assert!(session.poll_text(later + Duration::from_millis(500)).unwrap());
    assert_eq!(session.working_copy().label.as_deref(), Some("Edited"));
    assert!(session.text_deadline().is_none());
}

#[test]
fn leaving_text_mode_flushes_pending_draft() {
    let mut session = text_session(model("gpt-4o"));
    let text = session.text().replace("gpt-4o", "gpt-4.1");
    session.edit_text(text, Instant::now()).unwrap();
    session.set_text_mode(false).unwrap();
    assert!(!session.is_text_mode());
    assert_eq!(session.working_copy().config.get_str("model"), Some("gpt-4.1"));
    assert_eq!(session.state(), SessionState::Dirty);
}

#[test]
fn save_flushes_pending_draft() {
    let mut session = text_session(model("gpt-4o"));
    let text = session.text().replace("gpt-4o", "o3");
    session.edit_text(text, Instant::now()).unwrap();
    let saved = session.save().unwrap();
    assert_eq!(saved.label.as_deref(), Some("o3"));
}

#[test]
fn text_replacement_clears_test_result() {
    let mut session = text_session(model("gpt-4o"));
    let (ticket, _) = session.begin_test().unwrap().unwrap();
    session.complete_test(ticket, TestResult::passed());
    assert!(session.test_result().is_some());

    let text = session.text().to_string();
    session.edit_text(text, Instant::now()).unwrap();
    assert!(session.flush_text().unwrap());
    assert!(session.test_result().is_none());
}

#[test]
fn form_edit_refreshes_idle_text_view() {
    let mut session = text_session(model("gpt-4o"));
    session
        .apply_edit(crate::form::FieldEdit::config("temperature", "0.1"))
        .unwrap();
    assert!(session.text().contains("temperature"));
    let reparsed = parse_draft(session.text(), DocumentFormat::Json).unwrap();
    assert_eq!(&reparsed, session.working_copy().as_ref());
}

#[test]
fn text_sync_reports_nothing_pending() {
    let mut sync = TextSync::new(DocumentFormat::Json, Duration::from_millis(10));
    sync.reset(&team());
    assert!(!sync.has_pending());
    assert!(sync.take_pending().is_none());
    assert!(sync.last_error().is_none());
}

#[cfg(feature = "toml")]
#[test]
fn toml_view_falls_back_to_json_for_nulls() {
    let root = model("gpt-4o").with_config("base_url", serde_json::Value::Null);
    let mut sync = TextSync::new(DocumentFormat::Toml, Duration::from_millis(10));
    sync.reset(&root);
    assert_eq!(sync.format(), DocumentFormat::Json);
    assert_eq!(parse_draft(sync.text(), sync.format()).unwrap(), root);
}

#[test]
fn json_field_edits_round_trip_through_text() {
    let tool = Component::new("function_tool", crate::domain::ComponentType::Tool);
    let mut session = EditorSession::open(tool, EditorOptions::default());
    session
        .apply_edit(crate::form::FieldEdit::config(
            "global_imports",
            serde_json::json!({"provider": "x", "component_type": "y"}),
        ))
        .unwrap();
    let root = session.working_copy().as_ref().clone();

    let text = render(&root, DocumentFormat::Json).unwrap();
    assert_eq!(parse_draft(&text, DocumentFormat::Json).unwrap(), root);
    let panel = session.panel().unwrap();
    let field = panel
        .field(&crate::form::FieldTarget::config("global_imports"))
        .unwrap();
    assert_eq!(field.value["component_type"], "y");
}

#[test]
fn empty_participant_list_round_trips_through_text() {
    let root = Component::new("round_robin_team", crate::domain::ComponentType::Team)
        .with_config("participants", Vec::<Component>::new());
    let text = render(&root, DocumentFormat::Json).unwrap();
    assert_eq!(parse_draft(&text, DocumentFormat::Json).unwrap(), root);
}
