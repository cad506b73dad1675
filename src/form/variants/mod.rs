use serde_json::Value;

use crate::domain::{Component, ComponentPatch, ComponentType, ConfigValue, EditSegment};

use super::{
    convert::coerce,
    error::FieldCoercionError,
    fields::{FieldEdit, FieldKind, FieldTarget, FieldView, LinkView, Panel},
};

mod agent;
mod model;
mod team;
mod termination;
mod tool;

/// A plain config entry a variant lets the user edit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConfigField {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: FieldKind,
}

impl ConfigField {
    pub const fn new(key: &'static str, title: &'static str, kind: FieldKind) -> Self {
        Self { key, title, kind }
    }
}

/// A config entry holding nested components the user can open.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LinkField {
    Single {
        key: &'static str,
        title: &'static str,
    },
    Many {
        key: &'static str,
        title: &'static str,
    },
}

/// Field-editing behaviour of one component variant.
///
/// Renderers only read the node they are given and answer edits with a
/// [`ComponentPatch`]; applying the patch to the tree is the session's job.
pub(crate) trait VariantRenderer: Sync {
    fn variant(&self) -> ComponentType;

    fn config_fields(&self, node: &Component) -> Vec<ConfigField>;

    fn link_fields(&self, node: &Component) -> Vec<LinkField> {
        let _ = node;
        Vec::new()
    }

    fn render(&self, node: &Component) -> Panel {
        let mut fields = vec![
            FieldView {
                target: FieldTarget::Label,
                title: "Name",
                kind: FieldKind::Text,
                value: node.label.clone().map(Value::String).unwrap_or(Value::Null),
            },
            FieldView {
                target: FieldTarget::Description,
                title: "Description",
                kind: FieldKind::Multiline,
                value: node
                    .description
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            },
        ];
        fields.extend(self.config_fields(node).into_iter().map(|field| FieldView {
            target: FieldTarget::config(field.key),
            title: field.title,
            kind: field.kind,
            value: node
                .config
                .get(field.key)
                .map(ConfigValue::to_json)
                .unwrap_or(Value::Null),
        }));
        let links = self
            .link_fields(node)
            .into_iter()
            .flat_map(|link| links_for(node, link))
            .collect();
        Panel {
            variant: self.variant(),
            fields,
            links,
        }
    }

    fn edit(
        &self,
        node: &Component,
        edit: &FieldEdit,
    ) -> Result<ComponentPatch, FieldCoercionError> {
        let pointer = edit.target.pointer();
        match &edit.target {
            FieldTarget::Label => {
                Ok(ComponentPatch::new().label(coerce_text(&pointer, &edit.value)?))
            }
            FieldTarget::Description => {
                Ok(ComponentPatch::new().description(coerce_text(&pointer, &edit.value)?))
            }
            FieldTarget::Config(key) => {
                let Some(field) = self
                    .config_fields(node)
                    .into_iter()
                    .find(|field| field.key == key.as_str())
                else {
                    return Err(FieldCoercionError::not_editable(
                        &pointer,
                        self.variant().as_str(),
                    ));
                };
                let value = coerce(field.kind, &pointer, &edit.value)?;
                Ok(ComponentPatch::new().config_entry(key.clone(), value))
            }
        }
    }
}

pub(crate) fn renderer_for(component_type: &ComponentType) -> Option<&'static dyn VariantRenderer> {
    match component_type {
        ComponentType::Team => Some(&team::TeamFields),
        ComponentType::Agent => Some(&agent::AgentFields),
        ComponentType::Model => Some(&model::ModelFields),
        ComponentType::Tool => Some(&tool::ToolFields),
        ComponentType::Termination => Some(&termination::TerminationFields),
        ComponentType::Other(_) => None,
    }
}

/// Panel for `node`, or `None` when its variant is not one this editor knows.
pub fn render_panel(node: &Component) -> Option<Panel> {
    renderer_for(&node.component_type).map(|renderer| renderer.render(node))
}

/// Turn a field edit into a patch for `node`. Unknown variants ignore edits (`Ok(None)`).
pub fn apply_field_edit(
    node: &Component,
    edit: &FieldEdit,
) -> Result<Option<ComponentPatch>, FieldCoercionError> {
    match renderer_for(&node.component_type) {
        Some(renderer) => renderer.edit(node, edit).map(Some),
        None => Ok(None),
    }
}

/// Only model nodes can be sent to the validation service.
pub fn is_testable(node: &Component) -> bool {
    matches!(node.component_type, ComponentType::Model)
}

fn coerce_text(pointer: &str, value: &Value) -> Result<String, FieldCoercionError> {
    match coerce(FieldKind::Text, pointer, value)? {
        Value::String(text) => Ok(text),
        _ => Ok(String::new()),
    }
}

fn links_for(node: &Component, link: LinkField) -> Vec<LinkView> {
    match link {
        LinkField::Single { key, title } => node
            .config
            .node(key)
            .map(|child| LinkView {
                title: title.to_string(),
                summary: summary(child),
                request: EditSegment::new(child.component_type.clone(), child.identity(), key),
            })
            .into_iter()
            .collect(),
        LinkField::Many { key, title } => node
            .config
            .nodes(key)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, child)| LinkView {
                title: format!("{title} {}", index + 1),
                summary: summary(child),
                request: EditSegment::new(child.component_type.clone(), child.identity(), key)
                    .at_index(index),
            })
            .collect(),
    }
}

fn summary(child: &Component) -> String {
    match child.component_type {
        ComponentType::Model => child
            .config
            .get_str("model")
            .unwrap_or_else(|| child.display_name())
            .to_string(),
        _ => child.display_name().to_string(),
    }
}
