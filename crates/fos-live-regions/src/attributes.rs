//! Object Attributes
//!
//! Parsing of the serialized `name:value;name:value;` attribute blob and the
//! fetcher used by every stage that inspects live region metadata.

use std::collections::HashMap;

use crate::aria::LiveRegionMode;
use crate::node::AccessibleNode;

/// Attribute name to attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: HashMap<String, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized attribute blob.
    ///
    /// A backslash escapes the following character, so `\:` and `\;` may
    /// appear inside names and values. Entries without a `:` are skipped.
    pub fn parse(blob: &str) -> Self {
        let mut map = Self::new();
        let mut name = String::new();
        let mut value = String::new();
        let mut in_value = false;
        let mut chars = blob.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        if in_value { value.push(escaped) } else { name.push(escaped) }
                    }
                }
                ':' if !in_value => in_value = true,
                ';' => {
                    if in_value {
                        map.insert(std::mem::take(&mut name), std::mem::take(&mut value));
                    } else {
                        name.clear();
                    }
                    in_value = false;
                }
                _ => {
                    if in_value { value.push(c) } else { name.push(c) }
                }
            }
        }

        // Last entry may omit its terminator
        if in_value {
            map.insert(name, value);
        }

        map
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Whether `name` is present with exactly `value`
    pub fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    pub fn is_true(&self, name: &str) -> bool {
        self.is(name, "true")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `atomic="true"` on the node itself
    pub fn is_atomic(&self) -> bool {
        self.is_true("atomic")
    }

    /// Node sits inside a region whose root declared `atomic="true"`
    pub fn is_container_atomic(&self) -> bool {
        self.is_true("container-atomic")
    }

    pub fn is_container_busy(&self) -> bool {
        self.is_true("container-busy")
    }

    /// Politeness inherited from the enclosing live region
    pub fn container_live(&self) -> LiveRegionMode {
        self.get("container-live")
            .and_then(LiveRegionMode::parse)
            .unwrap_or(LiveRegionMode::Off)
    }

    /// Node explicitly opted out of its ancestor's announcements
    pub fn is_muted(&self) -> bool {
        self.is("live", "off")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

/// Fetch and parse a node's attributes.
///
/// Returns `None` when the node has no attribute blob or an empty one; such a
/// node can never be treated as a live region.
pub fn fetch<N: AccessibleNode>(node: &N) -> Option<AttributeMap> {
    let blob = node.attributes()?;
    if blob.is_empty() {
        return None;
    }
    Some(AttributeMap::parse(&blob))
}
