use std::sync::Arc;

use crate::domain::{Component, ComponentPatch, ConfigValue, EditSegment};

use super::resolve::select_index;

/// Apply `patch` to the node addressed by `path` and return the new root.
///
/// Only the spine from the root to the addressed node is rebuilt; every sibling and every
/// untouched config entry keeps its `Arc`. When nothing changes (empty patch, or a hop that
/// matches nothing) the original root is returned as is.
pub fn apply_at(
    root: &Arc<Component>,
    path: &[EditSegment],
    patch: &ComponentPatch,
) -> Arc<Component> {
    let Some((segment, remaining)) = path.split_first() else {
        if patch.is_empty() {
            return Arc::clone(root);
        }
        return Arc::new(merge(root, patch));
    };

    let Some(field) = root.config.get(&segment.parent_field) else {
        return Arc::clone(root);
    };

    let replaced = match field {
        ConfigValue::Nodes(nodes) => {
            let Some(index) = select_index(nodes, segment.index, Some(segment.id.as_str())) else {
                return Arc::clone(root);
            };
            let child = apply_at(&nodes[index], remaining, patch);
            if Arc::ptr_eq(&child, &nodes[index]) {
                return Arc::clone(root);
            }
            let mut rebuilt: Vec<Arc<Component>> = nodes.iter().cloned().collect();
            rebuilt[index] = child;
            ConfigValue::Nodes(Arc::new(rebuilt))
        }
        ConfigValue::Node(node) => {
            let child = apply_at(node, remaining, patch);
            if Arc::ptr_eq(&child, node) {
                return Arc::clone(root);
            }
            ConfigValue::Node(child)
        }
        ConfigValue::Plain(_) => return Arc::clone(root),
    };

    Arc::new(root.with_config_entry(&segment.parent_field, replaced))
}

/// Shallow merge of a patch into one node: top-level fields are replaced when present and
/// `config` entries are merged, keeping entries the patch does not name.
pub fn merge(node: &Component, patch: &ComponentPatch) -> Component {
    Component {
        provider: patch
            .provider
            .clone()
            .unwrap_or_else(|| node.provider.clone()),
        component_type: patch
            .component_type
            .clone()
            .unwrap_or_else(|| node.component_type.clone()),
        version: patch.version.or(node.version),
        component_version: patch.component_version.or(node.component_version),
        description: patch
            .description
            .clone()
            .or_else(|| node.description.clone()),
        label: patch.label.clone().or_else(|| node.label.clone()),
        config: match &patch.config {
            Some(overlay) => node.config.merged(overlay),
            None => node.config.clone(),
        },
    }
}
