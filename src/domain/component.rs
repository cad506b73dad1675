use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use schemars::{JsonSchema, r#gen::SchemaGenerator, schema::Schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Discriminator selecting the shape of a component's `config`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Team,
    Agent,
    Model,
    Tool,
    Termination,
    /// A discriminator this editor does not know. Kept verbatim so drafts round-trip.
    Other(String),
}

impl ComponentType {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::Team => "team",
            ComponentType::Agent => "agent",
            ComponentType::Model => "model",
            ComponentType::Tool => "tool",
            ComponentType::Termination => "termination",
            ComponentType::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ComponentType::Other(_))
    }
}

impl From<&str> for ComponentType {
    fn from(value: &str) -> Self {
        match value {
            "team" => ComponentType::Team,
            "agent" => ComponentType::Agent,
            "model" => ComponentType::Model,
            "tool" => ComponentType::Tool,
            "termination" => ComponentType::Termination,
            other => ComponentType::Other(other.to_string()),
        }
    }
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        ComponentType::from(value.as_str())
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ComponentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ComponentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ComponentType::from)
    }
}

impl JsonSchema for ComponentType {
    fn schema_name() -> String {
        "ComponentType".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

/// A node of the configuration tree.
///
/// Nodes are shared through `Arc` so that an edit rebuilds only the spine from
/// the root to the edited node; every other subtree keeps its allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Component {
    pub provider: String,
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub config: Config,
}

impl Component {
    pub fn new(provider: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            provider: provider.into(),
            component_type,
            version: None,
            component_version: None,
            description: None,
            label: None,
            config: Config::default(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.config.insert(key, value);
        self
    }

    /// The `name` entry of the config, used as a fallback identity.
    pub fn name(&self) -> Option<&str> {
        self.config.get_str("name")
    }

    pub fn matches_id(&self, id: &str) -> bool {
        self.label.as_deref() == Some(id) || self.name() == Some(id)
    }

    /// Identity used when addressing this node by id: label, then name, else empty.
    pub fn identity(&self) -> &str {
        self.label.as_deref().or_else(|| self.name()).unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        match self.identity() {
            "" => self.component_type.as_str(),
            identity => identity,
        }
    }

    /// Copy of this node with one config entry replaced. Other entries are shared.
    pub(crate) fn with_config_entry(&self, key: &str, value: ConfigValue) -> Self {
        let mut next = self.clone();
        next.config.insert(key, value);
        next
    }
}

/// Ordered config mapping of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config(IndexMap<String, ConfigValue>);

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn get_plain(&self, key: &str) -> Option<&Value> {
        match self.0.get(key)? {
            ConfigValue::Plain(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_plain(key).and_then(Value::as_str)
    }

    pub fn node(&self, key: &str) -> Option<&Arc<Component>> {
        match self.0.get(key)? {
            ConfigValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn nodes(&self, key: &str) -> Option<&[Arc<Component>]> {
        match self.0.get(key)? {
            ConfigValue::Nodes(nodes) => Some(nodes.as_slice()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    /// Shallow merge: entries of `overlay` replace same-named entries, the rest are kept as is.
    pub fn merged(&self, overlay: &Config) -> Config {
        let mut merged = self.clone();
        for (key, value) in overlay.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }
}

impl JsonSchema for Config {
    fn schema_name() -> String {
        "ComponentConfig".to_string()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <std::collections::BTreeMap<String, Value>>::json_schema(generator)
    }
}

impl FromIterator<(String, ConfigValue)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A config entry: plain data, a nested component, or an ordered list of components.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Plain(Value),
    Node(Arc<Component>),
    Nodes(Arc<Vec<Arc<Component>>>),
}

impl ConfigValue {
    /// Classify raw JSON. Component-shaped objects (and non-empty arrays made only of them)
    /// become nodes; everything else, including an empty array, stays plain.
    ///
    /// Every value entering a [`Config`] goes through here, so a tree always serializes
    /// to text that classifies back into the same tree. A component-shaped value that
    /// does not decode as a component is kept as plain data.
    pub fn from_json(value: Value) -> Self {
        if looks_like_component(&value) {
            return match Component::deserialize(&value) {
                Ok(node) => ConfigValue::Node(Arc::new(node)),
                Err(_) => ConfigValue::Plain(value),
            };
        }
        match value {
            Value::Array(items) if !items.is_empty() && items.iter().all(looks_like_component) => {
                match items
                    .iter()
                    .map(|item| Component::deserialize(item).map(Arc::new))
                    .collect::<Result<Vec<_>, _>>()
                {
                    Ok(nodes) => ConfigValue::Nodes(Arc::new(nodes)),
                    Err(_) => ConfigValue::Plain(Value::Array(items)),
                }
            }
            other => ConfigValue::Plain(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ConfigValue::Plain(value) => value.clone(),
            ConfigValue::Node(node) => serde_json::to_value(node.as_ref()).unwrap_or(Value::Null),
            ConfigValue::Nodes(nodes) => Value::Array(
                nodes
                    .iter()
                    .map(|node| serde_json::to_value(node.as_ref()).unwrap_or(Value::Null))
                    .collect(),
            ),
        }
    }

    pub fn as_plain(&self) -> Option<&Value> {
        match self {
            ConfigValue::Plain(value) => Some(value),
            _ => None,
        }
    }

    fn from_nodes(nodes: Vec<Arc<Component>>) -> Self {
        if nodes.is_empty() {
            ConfigValue::Plain(Value::Array(Vec::new()))
        } else {
            ConfigValue::Nodes(Arc::new(nodes))
        }
    }
}

fn looks_like_component(value: &Value) -> bool {
    value.get("provider").is_some_and(Value::is_string)
        && value.get("component_type").is_some_and(Value::is_string)
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConfigValue::Plain(value) => value.serialize(serializer),
            ConfigValue::Node(node) => node.as_ref().serialize(serializer),
            ConfigValue::Nodes(nodes) => serializer.collect_seq(nodes.iter().map(Arc::as_ref)),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ConfigValue::from_json)
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        ConfigValue::from_json(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Plain(Value::String(value.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Plain(Value::String(value))
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Plain(Value::Bool(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Plain(Value::from(value))
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Plain(Value::from(value))
    }
}

impl From<Component> for ConfigValue {
    fn from(value: Component) -> Self {
        ConfigValue::Node(Arc::new(value))
    }
}

impl From<Arc<Component>> for ConfigValue {
    fn from(value: Arc<Component>) -> Self {
        ConfigValue::Node(value)
    }
}

impl From<Vec<Component>> for ConfigValue {
    fn from(value: Vec<Component>) -> Self {
        ConfigValue::from_nodes(value.into_iter().map(Arc::new).collect())
    }
}

impl From<Vec<Arc<Component>>> for ConfigValue {
    fn from(value: Vec<Arc<Component>>) -> Self {
        ConfigValue::from_nodes(value)
    }
}
