use crate::domain::{Component, ComponentType};
use crate::form::fields::FieldKind;

use super::{ConfigField, LinkField, VariantRenderer};

const TERMINATION_FIELDS: &[ConfigField] = &[
    ConfigField::new("max_messages", "Max messages", FieldKind::Integer),
    ConfigField::new("text", "Mention text", FieldKind::Text),
    ConfigField::new("timeout_seconds", "Timeout (seconds)", FieldKind::Number),
    ConfigField::new("max_total_token", "Max total tokens", FieldKind::Integer),
];

pub(crate) struct TerminationFields;

impl VariantRenderer for TerminationFields {
    fn variant(&self) -> ComponentType {
        ComponentType::Termination
    }

    // Each condition carries a single parameter; only show the ones this node uses.
    fn config_fields(&self, node: &Component) -> Vec<ConfigField> {
        let present: Vec<ConfigField> = TERMINATION_FIELDS
            .iter()
            .filter(|field| node.config.contains_key(field.key))
            .copied()
            .collect();
        if present.is_empty() && !node.config.contains_key("conditions") {
            TERMINATION_FIELDS.to_vec()
        } else {
            present
        }
    }

    fn link_fields(&self, _node: &Component) -> Vec<LinkField> {
        vec![LinkField::Many {
            key: "conditions",
            title: "Condition",
        }]
    }
}
