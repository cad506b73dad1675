use crate::domain::{Component, ComponentType};
use crate::form::fields::FieldKind;

use super::{ConfigField, VariantRenderer};

const TOOL_FIELDS: &[ConfigField] = &[
    ConfigField::new("name", "Function name", FieldKind::Text),
    ConfigField::new("description", "Function description", FieldKind::Multiline),
    ConfigField::new("source_code", "Source code", FieldKind::Multiline),
    ConfigField::new("global_imports", "Global imports", FieldKind::Json),
    ConfigField::new(
        "has_cancellation_support",
        "Supports cancellation",
        FieldKind::Bool,
    ),
];

pub(crate) struct ToolFields;

impl VariantRenderer for ToolFields {
    fn variant(&self) -> ComponentType {
        ComponentType::Tool
    }

    fn config_fields(&self, _node: &Component) -> Vec<ConfigField> {
        TOOL_FIELDS.to_vec()
    }
}
