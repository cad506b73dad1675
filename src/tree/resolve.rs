use std::sync::Arc;

use crate::domain::{Component, ConfigValue, EditPath, EditSegment, PathError, parse_path_expr};

/// Walk `path` from `root`. `None` when any hop fails to resolve.
pub fn resolve<'a>(root: &'a Arc<Component>, path: &[EditSegment]) -> Option<&'a Arc<Component>> {
    path.iter().try_fold(root, |current, segment| step(current, segment))
}

/// Like [`resolve`], but a path that no longer matches the tree addresses the root.
pub fn resolve_or_root<'a>(root: &'a Arc<Component>, path: &[EditSegment]) -> &'a Arc<Component> {
    resolve(root, path).unwrap_or(root)
}

fn step<'a>(node: &'a Component, segment: &EditSegment) -> Option<&'a Arc<Component>> {
    match node.config.get(&segment.parent_field)? {
        ConfigValue::Nodes(nodes) => {
            select_index(nodes, segment.index, Some(segment.id.as_str())).map(|index| &nodes[index])
        }
        ConfigValue::Node(child) => Some(child),
        ConfigValue::Plain(_) => None,
    }
}

/// Position addressed in a list field: an in-range index wins outright, otherwise the
/// first element whose label or `config.name` equals `id`.
pub(crate) fn select_index(
    nodes: &[Arc<Component>],
    index: Option<usize>,
    id: Option<&str>,
) -> Option<usize> {
    if let Some(index) = index
        && index < nodes.len()
    {
        return Some(index);
    }
    let id = id?;
    nodes.iter().position(|node| node.matches_id(id))
}

/// Resolve a textual path expression strictly and return the equivalent navigation stack.
///
/// Unlike [`resolve`], every step must land on a component.
pub fn locate(root: &Arc<Component>, expr: &str) -> Result<EditPath, PathError> {
    let mut path = EditPath::new();
    let mut current = root;
    for (depth, step) in parse_path_expr(expr)?.into_iter().enumerate() {
        let unresolved = || PathError::Unresolved {
            step: step.raw.clone(),
            depth,
        };
        let (child, index) = match current.config.get(&step.field) {
            Some(ConfigValue::Nodes(nodes)) => {
                let index = match (step.index, step.id.as_deref()) {
                    (Some(index), _) if index < nodes.len() => index,
                    (_, Some(id)) => select_index(nodes, None, Some(id)).ok_or_else(unresolved)?,
                    _ => return Err(unresolved()),
                };
                (&nodes[index], Some(index))
            }
            Some(ConfigValue::Node(child)) if step.index.is_none() => (child, None),
            _ => return Err(unresolved()),
        };
        path.push(EditSegment {
            component_type: child.component_type.clone(),
            id: child.identity().to_string(),
            parent_field: step.field.clone(),
            index,
        });
        current = child;
    }
    Ok(path)
}
