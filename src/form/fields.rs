use serde_json::Value;

use crate::domain::{ComponentType, EditSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    Secret,
    Integer,
    Number,
    Bool,
    Json,
}

/// Where a field lives on the component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    Label,
    Description,
    Config(String),
}

impl FieldTarget {
    pub fn config(key: impl Into<String>) -> Self {
        FieldTarget::Config(key.into())
    }

    pub fn pointer(&self) -> String {
        match self {
            FieldTarget::Label => "/label".to_string(),
            FieldTarget::Description => "/description".to_string(),
            FieldTarget::Config(key) => format!("/config/{key}"),
        }
    }
}

/// Read-only view of one editable field of the resolved node.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub target: FieldTarget,
    pub title: &'static str,
    pub kind: FieldKind,
    pub value: Value,
}

impl FieldView {
    pub fn display_value(&self) -> String {
        match (&self.value, self.kind) {
            (Value::Null, _) => String::new(),
            (Value::String(text), FieldKind::Secret) if !text.is_empty() => "*".repeat(8),
            (Value::String(text), _) => text.clone(),
            (other, _) => other.to_string(),
        }
    }
}

/// A nested component the user can open from the current panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkView {
    pub title: String,
    pub summary: String,
    pub request: EditSegment,
}

/// Everything a variant exposes for the resolved node.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub variant: ComponentType,
    pub fields: Vec<FieldView>,
    pub links: Vec<LinkView>,
}

impl Panel {
    pub fn field(&self, target: &FieldTarget) -> Option<&FieldView> {
        self.fields.iter().find(|field| &field.target == target)
    }

    pub fn link(&self, parent_field: &str, index: Option<usize>) -> Option<&LinkView> {
        self.links.iter().find(|link| {
            link.request.parent_field == parent_field && link.request.index == index
        })
    }
}

/// A value typed into one field, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub target: FieldTarget,
    pub value: Value,
}

impl FieldEdit {
    pub fn new(target: FieldTarget, value: impl Into<Value>) -> Self {
        Self {
            target,
            value: value.into(),
        }
    }

    pub fn label(value: impl Into<String>) -> Self {
        Self::new(FieldTarget::Label, Value::String(value.into()))
    }

    pub fn description(value: impl Into<String>) -> Self {
        Self::new(FieldTarget::Description, Value::String(value.into()))
    }

    pub fn config(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(FieldTarget::config(key), value)
    }
}
