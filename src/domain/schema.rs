use std::sync::OnceLock;

use anyhow::{Context, Result};
use jsonschema::{Validator, validator_for};
use schemars::schema_for;
use serde_json::Value;
use tracing::warn;

use super::component::Component;

/// JSON Schema describing the component envelope (`provider`, `component_type`, `config`, ...).
pub fn component_schema() -> Result<Value> {
    serde_json::to_value(schema_for!(Component)).context("failed to encode component schema")
}

/// Checks a parsed document against the component envelope before it is decoded.
pub struct EnvelopeValidator {
    validator: Validator,
}

impl EnvelopeValidator {
    pub fn new() -> Result<Self> {
        let schema = component_schema()?;
        let validator = validator_for(&schema).context("failed to compile component schema")?;
        Ok(Self { validator })
    }

    /// Process-wide validator, compiled on first use. `None` if the schema failed to compile.
    pub fn shared() -> Option<&'static EnvelopeValidator> {
        static SHARED: OnceLock<Option<EnvelopeValidator>> = OnceLock::new();
        SHARED
            .get_or_init(|| match EnvelopeValidator::new() {
                Ok(validator) => Some(validator),
                Err(err) => {
                    warn!(error = %err, "component envelope validation disabled");
                    None
                }
            })
            .as_ref()
    }

    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }

    pub fn violations(&self, value: &Value) -> Vec<String> {
        self.validator
            .iter_errors(value)
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let prefix = if pointer.is_empty() {
                    "<root>".to_string()
                } else {
                    pointer
                };
                format!("{prefix}: {error}")
            })
            .collect()
    }
}

impl std::fmt::Debug for EnvelopeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeValidator").finish_non_exhaustive()
    }
}
