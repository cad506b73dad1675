use crate::domain::{ComponentType, EditPath, EditSegment, PathError, parse_path_expr};

#[test]
fn parses_index_id_and_plain_steps() {
    let steps = parse_path_expr("/participants[1]/model_client/tools#search/").unwrap();
    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].field, "participants");
    assert_eq!(steps[0].index, Some(1));
    assert_eq!(steps[1].field, "model_client");
    assert_eq!(steps[1].index, None);
    assert_eq!(steps[2].id.as_deref(), Some("search"));
}

#[test]
fn empty_expression_is_the_root() {
    assert!(parse_path_expr("").unwrap().is_empty());
    assert!(parse_path_expr(" / ").unwrap().is_empty());
}

#[test]
fn rejects_malformed_steps() {
    let err = parse_path_expr("participants[x]").unwrap_err();
    assert_eq!(
        err,
        PathError::Syntax {
            step: "participants[x]".into()
        }
    );
    assert!(parse_path_expr("a//b").is_err());
}

#[test]
fn crumb_falls_back_to_component_type() {
    let named = EditSegment::new(ComponentType::Agent, "AgentA", "participants").at_index(0);
    let anonymous = EditSegment::new(ComponentType::Model, "", "model_client");
    assert_eq!(named.crumb(), "AgentA");
    assert_eq!(anonymous.crumb(), "model");
}

#[test]
fn path_stack_operations() {
    let mut path: EditPath = vec![
        EditSegment::new(ComponentType::Agent, "a", "participants").at_index(0),
        EditSegment::new(ComponentType::Model, "", "model_client"),
    ]
    .into();
    assert_eq!(path.len(), 2);
    assert_eq!(path.last().map(|s| s.parent_field.as_str()), Some("model_client"));
    path.truncate(1);
    assert_eq!(path.len(), 1);
    assert!(path.pop().is_some());
    assert!(path.pop().is_none());
    assert!(path.is_empty());
}
