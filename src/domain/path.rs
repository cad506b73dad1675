use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::component::ComponentType;

static STEP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<field>[A-Za-z_][A-Za-z0-9_]*)(?:\[(?P<index>\d+)\])?(?:#(?P<id>.+))?$")
        .expect("path step pattern compiles")
});

/// One hop from a parent component into the child held by `parent_field`.
///
/// `index` addresses an element of a list field and wins whenever it is in range;
/// `id` (a label or `config.name`) is only consulted when the index is absent or stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSegment {
    pub component_type: ComponentType,
    pub id: String,
    pub parent_field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl EditSegment {
    pub fn new(
        component_type: ComponentType,
        id: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        Self {
            component_type,
            id: id.into(),
            parent_field: parent_field.into(),
            index: None,
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn crumb(&self) -> &str {
        if self.id.is_empty() {
            self.component_type.as_str()
        } else {
            &self.id
        }
    }
}

/// Navigation stack from the root to the node being edited. Empty means the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPath {
    segments: Vec<EditSegment>,
}

impl EditPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[EditSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: EditSegment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) -> Option<EditSegment> {
        self.segments.pop()
    }

    pub fn truncate(&mut self, depth: usize) {
        self.segments.truncate(depth);
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn last(&self) -> Option<&EditSegment> {
        self.segments.last()
    }
}

impl From<Vec<EditSegment>> for EditPath {
    fn from(segments: Vec<EditSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<EditSegment> for EditPath {
    fn from_iter<I: IntoIterator<Item = EditSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("invalid path step `{step}` (expected `field`, `field[index]` or `field#id`)")]
    Syntax { step: String },
    #[error("path step `{step}` (depth {depth}) does not resolve to a component")]
    Unresolved { step: String, depth: usize },
}

/// A parsed step of a textual path expression such as `participants[1]/model_client`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub field: String,
    pub index: Option<usize>,
    pub id: Option<String>,
    pub(crate) raw: String,
}

pub fn parse_path_expr(expr: &str) -> Result<Vec<PathStep>, PathError> {
    let trimmed = expr.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed.split('/').map(parse_step).collect()
}

fn parse_step(raw: &str) -> Result<PathStep, PathError> {
    let syntax = || PathError::Syntax {
        step: raw.to_string(),
    };
    let captures = STEP_PATTERN.captures(raw.trim()).ok_or_else(syntax)?;
    let index = match captures.name("index") {
        Some(index) => Some(index.as_str().parse::<usize>().map_err(|_| syntax())?),
        None => None,
    };
    Ok(PathStep {
        field: captures["field"].to_string(),
        index,
        id: captures.name("id").map(|id| id.as_str().to_string()),
        raw: raw.to_string(),
    })
}
