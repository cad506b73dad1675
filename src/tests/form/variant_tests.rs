use serde_json::{Value, json};

use crate::{
    domain::{Component, ComponentType},
    form::{FieldEdit, FieldKind, FieldTarget, apply_field_edit, is_testable, render_panel},
    tests::fixtures::{agent, model, team, team_json},
};

fn config_keys(node: &Component) -> Vec<String> {
    render_panel(node)
        .expect("known variant")
        .fields
        .into_iter()
        .filter_map(|field| match field.target {
            FieldTarget::Config(key) => Some(key),
            _ => None,
        })
        .collect()
}

#[test]
fn round_robin_team_hides_selector_fields() {
    let node = team();
    assert_eq!(config_keys(&node), vec!["max_turns"]);
    let panel = render_panel(&node).unwrap();
    assert!(panel.link("model_client", None).is_none());
    assert!(panel.link("termination_condition", None).is_some());
    assert_eq!(panel.link("participants", Some(1)).unwrap().title, "Participant 2");
}

#[test]
fn selector_team_shows_prompt_and_model_link() {
    let node: Component = serde_json::from_value(team_json()).unwrap();
    assert_eq!(config_keys(&node), vec!["selector_prompt", "max_turns"]);

    let panel = render_panel(&node).unwrap();
    let model = panel.link("model_client", None).expect("model link");
    assert_eq!(model.summary, "gpt-4o");
    assert_eq!(model.request.component_type, ComponentType::Model);
    assert_eq!(model.request.id, "");

    let critic = panel.link("participants", Some(1)).unwrap();
    assert_eq!(critic.request.id, "critic");
    assert_eq!(critic.summary, "critic");
}

#[test]
fn common_fields_come_first() {
    let panel = render_panel(&agent("AgentA")).unwrap();
    assert_eq!(panel.fields[0].target, FieldTarget::Label);
    assert_eq!(panel.fields[0].value, json!("AgentA"));
    assert_eq!(panel.fields[1].target, FieldTarget::Description);
    assert_eq!(panel.fields[1].value, Value::Null);
    let reflect = panel
        .field(&FieldTarget::config("reflect_on_tool_use"))
        .unwrap();
    assert_eq!(reflect.kind, FieldKind::Bool);
}

#[test]
fn model_api_key_is_masked() {
    let node = model("gpt-4o").with_config("api_key", "sk-secret");
    let panel = render_panel(&node).unwrap();
    let key = panel.field(&FieldTarget::config("api_key")).unwrap();
    assert_eq!(key.display_value(), "********");
    assert!(panel.links.is_empty());
}

#[test]
fn termination_shows_only_present_parameters() {
    let text = Component::new("text_mention_termination", ComponentType::Termination)
        .with_config("text", "TERMINATE");
    assert_eq!(config_keys(&text), vec!["text"]);

    let bare = Component::new("max_message_termination", ComponentType::Termination);
    assert_eq!(config_keys(&bare).len(), 4);

    let combined = Component::new("or_termination", ComponentType::Termination)
        .with_config("conditions", vec![text, bare]);
    assert!(config_keys(&combined).is_empty());
    let panel = render_panel(&combined).unwrap();
    assert_eq!(panel.links.len(), 2);
}

#[test]
fn unknown_variant_renders_nothing() {
    let node = Component::new("custom", ComponentType::Other("workflow".into()));
    assert!(render_panel(&node).is_none());
    let edit = FieldEdit::label("ignored");
    assert_eq!(apply_field_edit(&node, &edit).unwrap(), None);
    assert!(!is_testable(&node));
}

#[test]
fn edits_become_patches() {
    let node = model("gpt-4o");
    let patch = apply_field_edit(&node, &FieldEdit::config("max_tokens", "512"))
        .unwrap()
        .unwrap();
    let config = patch.config.expect("config patch");
    assert_eq!(config.get_plain("max_tokens"), Some(&json!(512)));

    let patch = apply_field_edit(&node, &FieldEdit::label("Fast model"))
        .unwrap()
        .unwrap();
    assert_eq!(patch.label.as_deref(), Some("Fast model"));
    assert!(patch.config.is_none());
}

#[test]
fn rejects_fields_the_variant_does_not_have() {
    let err = apply_field_edit(&model("gpt-4o"), &FieldEdit::config("participants", "x"))
        .unwrap_err();
    assert_eq!(err.pointer, "/config/participants");

    let err = apply_field_edit(&team(), &FieldEdit::config("selector_prompt", "x")).unwrap_err();
    assert!(err.message.contains("team"));
}

#[test]
fn only_models_are_testable() {
    assert!(is_testable(&model("gpt-4o")));
    assert!(!is_testable(&agent("a")));
    assert!(!is_testable(&team()));
}
