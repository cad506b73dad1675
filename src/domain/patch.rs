use serde::Deserialize;

use super::component::{ComponentType, Config, ConfigValue};

/// Partial update of one component. `None` leaves the field as it is; `config`
/// is merged entry by entry into the target's config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComponentPatch {
    pub provider: Option<String>,
    pub component_type: Option<ComponentType>,
    pub version: Option<u32>,
    pub component_version: Option<u32>,
    pub description: Option<String>,
    pub label: Option<String>,
    pub config: Option<Config>,
}

impl ComponentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn config_entry(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.get_or_insert_with(Config::default).insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.component_type.is_none()
            && self.version.is_none()
            && self.component_version.is_none()
            && self.description.is_none()
            && self.label.is_none()
            && self.config.as_ref().is_none_or(Config::is_empty)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}
