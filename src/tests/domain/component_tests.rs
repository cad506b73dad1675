use std::sync::Arc;

use serde_json::json;

use crate::{
    domain::{Component, ComponentType, ConfigValue, EnvelopeValidator},
    tests::fixtures::team_json,
};

#[test]
fn classifies_nested_components_in_config() {
    let team: Component = serde_json::from_value(team_json()).expect("team decodes");

    assert_eq!(team.component_type, ComponentType::Team);
    assert_eq!(team.version, Some(1));
    let participants = team.config.nodes("participants").expect("participants list");
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[1].name(), Some("critic"));
    assert!(matches!(
        team.config.get("model_client"),
        Some(ConfigValue::Node(_))
    ));
    // Empty lists and plain objects are not components.
    assert!(matches!(
        participants[0].config.get("tools"),
        Some(ConfigValue::Plain(_))
    ));
    assert!(matches!(
        team.config.get("allowed_transitions"),
        Some(ConfigValue::Plain(_))
    ));
}

#[test]
fn serializes_back_to_the_same_document() {
    let raw = team_json();
    let team: Component = serde_json::from_value(raw.clone()).expect("team decodes");
    let encoded = serde_json::to_value(&team).expect("team encodes");
    assert_eq!(encoded, raw);
}

#[test]
fn keeps_unknown_component_types_verbatim() {
    let raw = json!({
        "provider": "custom.Workflow",
        "component_type": "workflow",
        "config": {"steps": 3}
    });
    let node: Component = serde_json::from_value(raw.clone()).expect("decodes");
    assert_eq!(node.component_type, ComponentType::Other("workflow".into()));
    assert!(!node.component_type.is_known());
    assert_eq!(serde_json::to_value(&node).unwrap(), raw);
}

#[test]
fn matches_id_by_label_or_name() {
    let labelled = Component::new("p", ComponentType::Agent).with_label("Writer");
    let named = Component::new("p", ComponentType::Agent).with_config("name", "writer_agent");

    assert!(labelled.matches_id("Writer"));
    assert!(!labelled.matches_id("writer_agent"));
    assert!(named.matches_id("writer_agent"));
    assert_eq!(named.identity(), "writer_agent");
    assert_eq!(
        Component::new("p", ComponentType::Tool).display_name(),
        "tool"
    );
}

#[test]
fn config_merge_keeps_shared_children() {
    let child = Arc::new(Component::new("openai", ComponentType::Model));
    let base = Component::new("p", ComponentType::Agent)
        .with_config("model_client", Arc::clone(&child))
        .with_config("name", "a");
    let overlay = Component::new("p", ComponentType::Agent)
        .with_config("name", "b")
        .config;

    let merged = base.config.merged(&overlay);
    assert_eq!(merged.get_str("name"), Some("b"));
    assert!(Arc::ptr_eq(merged.node("model_client").unwrap(), &child));
}

#[test]
fn envelope_schema_rejects_missing_discriminator() {
    let validator = EnvelopeValidator::new().expect("schema compiles");
    assert!(validator.is_valid(&team_json()));

    let broken = json!({"provider": "openai", "config": {}});
    let violations = validator.violations(&broken);
    assert!(!violations.is_empty());
    assert!(violations.iter().any(|v| v.contains("component_type")));
}

#[test]
fn empty_component_lists_are_stored_as_plain_arrays() {
    let team = Component::new("round_robin_team", ComponentType::Team)
        .with_config("participants", Vec::<Component>::new());
    assert_eq!(
        team.config.get("participants"),
        Some(&ConfigValue::Plain(json!([])))
    );

    let decoded: Component = serde_json::from_value(serde_json::to_value(&team).unwrap()).unwrap();
    assert_eq!(decoded, team);
}

#[test]
fn component_shaped_values_become_nodes_on_insert() {
    let tool = Component::new("function_tool", ComponentType::Tool).with_config(
        "global_imports",
        json!({"provider": "x", "component_type": "y"}),
    );
    assert!(matches!(
        tool.config.get("global_imports"),
        Some(ConfigValue::Node(node)) if node.component_type == ComponentType::Other("y".into())
    ));

    let decoded: Component = serde_json::from_value(serde_json::to_value(&tool).unwrap()).unwrap();
    assert_eq!(decoded, tool);
}

#[test]
fn undecodable_component_shape_stays_plain() {
    let raw = json!({"provider": "x", "component_type": "y", "label": 7});
    let value = ConfigValue::from(raw.clone());
    assert_eq!(value, ConfigValue::Plain(raw.clone()));
    assert_eq!(value.to_json(), raw);
}
