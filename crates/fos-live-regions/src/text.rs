//! Announcement Text
//!
//! Linearizes an accessible subtree into the string that gets spoken.
//! Embedded objects are expanded in place, `live=off` subtrees are skipped,
//! and name/description stand in when a node carries no usable text.

use crate::aria::RelevantSet;
use crate::attributes;
use crate::node::{AccessibleNode, HypertextInterface, TextInterface, TextSegment, EMBEDDED_OBJECT_CHAR};
use crate::LiveRegionError;

/// How a node's text is gathered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Read the newly inserted/updated fragment instead of the whole text
    pub use_new_text: bool,
    /// Descend into children and embedded objects
    pub recurse_children: bool,
    /// Emit the node's own characters (as opposed to only expansions)
    pub include_own_text: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            use_new_text: false,
            recurse_children: true,
            include_own_text: true,
        }
    }
}

impl AssembleOptions {
    /// Options for a text-inserted/text-updated event in a region with the
    /// given relevance.
    pub fn delta(relevant: RelevantSet) -> Self {
        Self {
            use_new_text: true,
            recurse_children: relevant.allow_additions,
            include_own_text: relevant.allow_text,
        }
    }
}

/// Result of assembling a subtree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assembly {
    pub text: String,
    /// At least one character other than whitespace or the embedded object
    /// placeholder was produced
    pub has_content: bool,
}

/// Whether a string carries anything besides whitespace and placeholders
pub fn has_content(s: &str) -> bool {
    s.chars().any(|c| c != EMBEDDED_OBJECT_CHAR && !c.is_whitespace())
}

/// Recursive subtree renderer with a depth cap
#[derive(Debug, Clone, Copy)]
pub struct TextAssembler {
    max_depth: usize,
}

impl TextAssembler {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn assemble<N: AccessibleNode>(
        &self,
        node: &N,
        options: AssembleOptions,
    ) -> Result<Assembly, LiveRegionError> {
        let mut text = String::new();
        let has_content = self.append(&mut text, node, options, 0)?;
        Ok(Assembly { text, has_content })
    }

    fn append<N: AccessibleNode>(
        &self,
        buf: &mut String,
        node: &N,
        options: AssembleOptions,
        depth: usize,
    ) -> Result<bool, LiveRegionError> {
        if depth > self.max_depth {
            return Err(LiveRegionError::DepthExceeded { limit: self.max_depth });
        }

        let mut got_text = false;

        match node.text_interface() {
            None => {
                if options.recurse_children && !options.use_new_text {
                    for child in node.children() {
                        if is_muted(&child) {
                            continue;
                        }
                        if self.append(buf, &child, AssembleOptions::default(), depth + 1)? {
                            got_text = true;
                        }
                    }
                }
            }
            Some(text_iface) => {
                let segment = if options.use_new_text {
                    text_iface.new_text()
                } else {
                    text_iface.text().map(|text| TextSegment::new(text, 0))
                };

                if let Some(segment) = segment {
                    let hypertext = if options.recurse_children {
                        node.hypertext_interface()
                    } else {
                        None
                    };

                    for (index, c) in segment.text.chars().enumerate() {
                        let mut consumed = false;

                        if c == EMBEDDED_OBJECT_CHAR {
                            if let Some(child) = hypertext
                                .as_ref()
                                .and_then(|h| h.embedded_at(segment.start.checked_add(index)?))
                            {
                                if !is_muted(&child)
                                    && self.append(buf, &child, AssembleOptions::default(), depth + 1)?
                                {
                                    got_text = true;
                                }
                                consumed = true;
                            }
                        }

                        if !consumed && options.include_own_text {
                            buf.push(c);
                            if c != EMBEDDED_OBJECT_CHAR && !c.is_whitespace() {
                                got_text = true;
                            }
                        }
                    }

                    buf.push(' ');
                }
            }
        }

        if !got_text && !options.use_new_text {
            if let Some(name) = node.name().filter(|n| has_content(n)) {
                buf.push_str(&name);
                buf.push(' ');
                got_text = true;
            }
            if let Some(description) = node.description().filter(|d| has_content(d)) {
                buf.push_str(&description);
                got_text = true;
            }
        }

        Ok(got_text)
    }
}

impl Default for TextAssembler {
    fn default() -> Self {
        Self::new(crate::config::MonitorConfig::default().max_depth)
    }
}

/// Child carries `live=off` and must stay out of its ancestor's announcement.
/// A child whose attributes cannot be read is not muted.
fn is_muted<N: AccessibleNode>(node: &N) -> bool {
    attributes::fetch(node).is_some_and(|attrs| attrs.is_muted())
}
