//! Atomic Scope Resolution
//!
//! Finds the node whose whole content is announced when a region declares
//! `aria-atomic`.

use crate::attributes::{self, AttributeMap};
use crate::node::AccessibleNode;
use crate::LiveRegionError;

/// Walk up from `node` to the nearest ancestor declaring `atomic="true"`.
///
/// Climbing continues only while the current node reports
/// `container-atomic="true"`. A missing parent or a parent without
/// attributes ends the walk with `None`, in which case the originating node
/// is the announcement scope.
pub fn resolve_atomic_root<N: AccessibleNode>(
    node: &N,
    attrs: &AttributeMap,
    max_depth: usize,
) -> Result<Option<N>, LiveRegionError> {
    if attrs.is_atomic() {
        return Ok(Some(node.clone()));
    }
    if !attrs.is_container_atomic() {
        return Ok(None);
    }

    let mut current = match node.parent() {
        Some(parent) => parent,
        None => return Ok(None),
    };
    let mut depth = 1;

    loop {
        if depth > max_depth {
            return Err(LiveRegionError::DepthExceeded { limit: max_depth });
        }
        let Some(current_attrs) = attributes::fetch(&current) else {
            return Ok(None);
        };
        if current_attrs.is_atomic() {
            return Ok(Some(current));
        }
        if !current_attrs.is_container_atomic() {
            return Ok(None);
        }
        current = match current.parent() {
            Some(parent) => parent,
            None => return Ok(None),
        };
        depth += 1;
    }
}
