//! ARIA Live Region Properties
//!
//! Politeness and relevance values as they surface in object attributes.

use serde::{Deserialize, Serialize};

/// Live region mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveRegionMode {
    #[default]
    Off,
    Polite,
    Assertive,
    /// Legacy IAccessible2 spelling of assertive
    Rude,
}

impl LiveRegionMode {
    /// Parse an attribute value; case-sensitive like the attributes themselves
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "off" => Self::Off,
            "polite" => Self::Polite,
            "assertive" => Self::Assertive,
            "rude" => Self::Rude,
            _ => return None,
        })
    }

    /// Updates in this region are announced
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Kinds of change a live region wants announced, from `container-relevant`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevantSet {
    pub allow_additions: bool,
    pub allow_text: bool,
}

impl Default for RelevantSet {
    fn default() -> Self {
        Self::all()
    }
}

impl RelevantSet {
    pub fn all() -> Self {
        Self { allow_additions: true, allow_text: true }
    }

    pub fn none() -> Self {
        Self { allow_additions: false, allow_text: false }
    }

    /// Derive from the attribute value; absent or `all` allows everything,
    /// otherwise each token is looked up by substring.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            None | Some("all") => Self::all(),
            Some(v) => Self {
                allow_additions: v.contains("additions"),
                allow_text: v.contains("text"),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.allow_additions && !self.allow_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(LiveRegionMode::parse("polite"), Some(LiveRegionMode::Polite));
        assert_eq!(LiveRegionMode::parse("rude"), Some(LiveRegionMode::Rude));
        assert_eq!(LiveRegionMode::parse("Polite"), None);
        assert_eq!(LiveRegionMode::parse(""), None);
    }

    #[test]
    fn test_mode_active() {
        assert!(!LiveRegionMode::Off.is_active());
        assert!(LiveRegionMode::Polite.is_active());
        assert!(LiveRegionMode::Assertive.is_active());
        assert!(LiveRegionMode::Rude.is_active());
    }

    #[test]
    fn test_relevant_defaults() {
        assert_eq!(RelevantSet::from_attribute(None), RelevantSet::all());
        assert_eq!(RelevantSet::from_attribute(Some("all")), RelevantSet::all());
    }

    #[test]
    fn test_relevant_tokens() {
        let set = RelevantSet::from_attribute(Some("text"));
        assert!(set.allow_text);
        assert!(!set.allow_additions);

        let set = RelevantSet::from_attribute(Some("additions removals"));
        assert!(set.allow_additions);
        assert!(!set.allow_text);

        assert!(RelevantSet::from_attribute(Some("removals")).is_empty());
    }
}
