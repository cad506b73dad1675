use crate::domain::{Component, ComponentType};
use crate::form::fields::FieldKind;

use super::{ConfigField, VariantRenderer};

const MODEL_FIELDS: &[ConfigField] = &[
    ConfigField::new("model", "Model", FieldKind::Text),
    ConfigField::new("api_key", "API key", FieldKind::Secret),
    ConfigField::new("base_url", "Base URL", FieldKind::Text),
    ConfigField::new("temperature", "Temperature", FieldKind::Number),
    ConfigField::new("max_tokens", "Max tokens", FieldKind::Integer),
    ConfigField::new("top_p", "Top P", FieldKind::Number),
];

pub(crate) struct ModelFields;

impl VariantRenderer for ModelFields {
    fn variant(&self) -> ComponentType {
        ComponentType::Model
    }

    fn config_fields(&self, _node: &Component) -> Vec<ConfigField> {
        MODEL_FIELDS.to_vec()
    }
}
