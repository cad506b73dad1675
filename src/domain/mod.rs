mod component;
mod patch;
mod path;
mod schema;

pub use component::{Component, ComponentType, Config, ConfigValue};
pub use patch::ComponentPatch;
pub use path::{EditPath, EditSegment, PathError, PathStep, parse_path_expr};
pub use schema::{EnvelopeValidator, component_schema};
