use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Read a document from disk, picking the format from its extension (JSON otherwise).
pub fn read_document(path: &Path) -> Result<(Value, DocumentFormat)> {
    let format = DocumentFormat::from_extension(path).unwrap_or_default();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read file {}", path.display()))?;
    let value = parse_document_str(&contents, format)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok((value, format))
}
