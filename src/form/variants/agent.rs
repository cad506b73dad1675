use crate::domain::{Component, ComponentType};
use crate::form::fields::FieldKind;

use super::{ConfigField, LinkField, VariantRenderer};

const AGENT_FIELDS: &[ConfigField] = &[
    ConfigField::new("name", "Agent name", FieldKind::Text),
    ConfigField::new("system_message", "System message", FieldKind::Multiline),
    ConfigField::new("reflect_on_tool_use", "Reflect on tool use", FieldKind::Bool),
    ConfigField::new(
        "tool_call_summary_format",
        "Tool call summary format",
        FieldKind::Text,
    ),
];

pub(crate) struct AgentFields;

impl VariantRenderer for AgentFields {
    fn variant(&self) -> ComponentType {
        ComponentType::Agent
    }

    fn config_fields(&self, _node: &Component) -> Vec<ConfigField> {
        AGENT_FIELDS.to_vec()
    }

    fn link_fields(&self, _node: &Component) -> Vec<LinkField> {
        vec![
            LinkField::Single {
                key: "model_client",
                title: "Model",
            },
            LinkField::Many {
                key: "tools",
                title: "Tool",
            },
        ]
    }
}
