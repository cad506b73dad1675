use crate::domain::{Component, ComponentType};
use crate::form::fields::FieldKind;

use super::{ConfigField, LinkField, VariantRenderer};

const SELECTOR_PROMPT: ConfigField =
    ConfigField::new("selector_prompt", "Selector prompt", FieldKind::Multiline);
const MAX_TURNS: ConfigField = ConfigField::new("max_turns", "Max turns", FieldKind::Integer);

pub(crate) struct TeamFields;

/// Selector-style teams pick the next speaker with a model, so they carry a prompt and a client.
fn is_selector_style(node: &Component) -> bool {
    node.config.contains_key("selector_prompt") || node.config.contains_key("model_client")
}

impl VariantRenderer for TeamFields {
    fn variant(&self) -> ComponentType {
        ComponentType::Team
    }

    fn config_fields(&self, node: &Component) -> Vec<ConfigField> {
        if is_selector_style(node) {
            vec![SELECTOR_PROMPT, MAX_TURNS]
        } else {
            vec![MAX_TURNS]
        }
    }

    fn link_fields(&self, node: &Component) -> Vec<LinkField> {
        let mut links = Vec::with_capacity(3);
        if is_selector_style(node) {
            links.push(LinkField::Single {
                key: "model_client",
                title: "Model",
            });
        }
        links.push(LinkField::Single {
            key: "termination_condition",
            title: "Termination condition",
        });
        links.push(LinkField::Many {
            key: "participants",
            title: "Participant",
        });
        links
    }
}
