use std::sync::Arc;

use serde_json::json;

use crate::{
    domain::{Component, ComponentPatch, ComponentType, ConfigValue, EditSegment},
    tests::fixtures::team,
    tree::{apply_at, resolve},
};

fn participant(index: usize) -> EditSegment {
    EditSegment::new(ComponentType::Agent, "", "participants").at_index(index)
}

#[test]
fn root_patch_merges_config_shallowly() {
    let root = Arc::new(team());
    let patch = ComponentPatch::new()
        .description("A small team")
        .config_entry("max_turns", 4_i64);
    let next = apply_at(&root, &[], &patch);

    assert!(!Arc::ptr_eq(&next, &root));
    assert_eq!(next.description.as_deref(), Some("A small team"));
    assert_eq!(next.config.get_plain("max_turns"), Some(&json!(4)));
    assert_eq!(next.label, root.label);
    // Untouched entries share their allocation with the old root.
    assert!(Arc::ptr_eq(
        next.config.node("termination_condition").unwrap(),
        root.config.node("termination_condition").unwrap()
    ));
}

#[test]
fn siblings_keep_identity() {
    let root = Arc::new(team());
    let before = root.config.nodes("participants").unwrap().to_vec();

    let next = apply_at(&root, &[participant(0)], &ComponentPatch::new().label("Lead"));
    let after = next.config.nodes("participants").unwrap();

    assert_eq!(after[0].label.as_deref(), Some("Lead"));
    assert!(!Arc::ptr_eq(&after[0], &before[0]));
    assert!(Arc::ptr_eq(&after[1], &before[1]));
    // The old root is untouched.
    assert_eq!(before[0].label.as_deref(), Some("AgentA"));
    assert_eq!(root.config.nodes("participants").unwrap()[0].label.as_deref(), Some("AgentA"));
}

#[test]
fn rebuilds_only_the_spine_for_deep_updates() {
    let root = Arc::new(team());
    let path = [
        participant(1),
        EditSegment::new(ComponentType::Model, "", "model_client"),
    ];
    let next = apply_at(
        &root,
        &path,
        &ComponentPatch::new().config_entry("temperature", 0.5),
    );

    let model = resolve(&next, &path).unwrap();
    assert_eq!(model.config.get_plain("temperature"), Some(&json!(0.5)));
    assert_eq!(model.config.get_str("model"), Some("gpt-4o-mini"));

    let old = root.config.nodes("participants").unwrap();
    let new = next.config.nodes("participants").unwrap();
    assert!(Arc::ptr_eq(&old[0], &new[0]));
    // The edited agent's other entries are shared.
    assert_eq!(new[1].config.get_str("system_message"), Some("You are helpful."));
}

#[test]
fn unmatched_branch_is_a_no_op() {
    let root = Arc::new(team());
    let missing = EditSegment::new(ComponentType::Agent, "Nobody", "participants");
    let next = apply_at(&root, &[missing], &ComponentPatch::new().label("x"));
    assert!(Arc::ptr_eq(&next, &root));

    let out_of_range = EditSegment::new(ComponentType::Agent, "", "participants").at_index(9);
    let next = apply_at(&root, &[out_of_range], &ComponentPatch::new().label("x"));
    assert!(Arc::ptr_eq(&next, &root));
    assert_eq!(next.config.nodes("participants").unwrap().len(), 2);
}

#[test]
fn empty_patch_returns_the_same_root() {
    let root = Arc::new(team());
    let next = apply_at(&root, &[participant(0)], &ComponentPatch::new());
    assert!(Arc::ptr_eq(&next, &root));
}

#[test]
fn id_fallback_updates_first_match_only() {
    let root = Arc::new(
        Component::new("round_robin_team", ComponentType::Team).with_config(
            "participants",
            vec![
                Component::new("a", ComponentType::Agent).with_label("Twin"),
                Component::new("a", ComponentType::Agent).with_label("Twin"),
            ],
        ),
    );
    let segment = EditSegment::new(ComponentType::Agent, "Twin", "participants");
    let next = apply_at(&root, &[segment], &ComponentPatch::new().description("first"));
    let after = next.config.nodes("participants").unwrap();
    assert_eq!(after[0].description.as_deref(), Some("first"));
    assert_eq!(after[1].description, None);
}

#[test]
fn selector_prompt_then_rename_scenario() {
    let root = Arc::new(team());
    assert!(root.config.get("model_client").is_none());
    let participants = Arc::clone(match root.config.get("participants").unwrap() {
        ConfigValue::Nodes(nodes) => nodes,
        _ => unreachable!(),
    });

    let step1 = apply_at(
        &root,
        &[],
        &ComponentPatch::new().config_entry("selector_prompt", "Pick next"),
    );
    assert_eq!(step1.config.get_str("selector_prompt"), Some("Pick next"));
    match step1.config.get("participants").unwrap() {
        ConfigValue::Nodes(nodes) => assert!(Arc::ptr_eq(nodes, &participants)),
        _ => unreachable!(),
    }

    let step2 = apply_at(&step1, &[participant(1)], &ComponentPatch::new().label("Renamed"));
    let after = step2.config.nodes("participants").unwrap();
    assert_eq!(after[1].label.as_deref(), Some("Renamed"));
    assert!(Arc::ptr_eq(&after[0], &participants[0]));
    assert_eq!(step2.config.get_str("selector_prompt"), Some("Pick next"));
}
