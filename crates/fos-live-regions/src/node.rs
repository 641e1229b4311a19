//! Accessible Nodes
//!
//! Capability traits a platform accessibility tree exposes to the live
//! region engine. A node value is an owned reference into the platform
//! tree; dropping it releases the reference.

/// Object replacement character standing in for an embedded child
/// (link, image, ...) inside a text range.
pub const EMBEDDED_OBJECT_CHAR: char = '\u{FFFC}';

/// Role of an accessible object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Client,
    Document,
    Section,
    Paragraph,
    StaticText,
    Text,
    Link,
    List,
    ListItem,
    Grouping,
    PushButton,
    Graphic,
    /// Platform role without a named variant
    Other(u32),
}

impl Role {
    /// Text leaf whose content is normally reached through the parent's text
    pub fn is_static_text(&self) -> bool {
        matches!(self, Self::StaticText)
    }
}

/// Object state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct States(u32);

impl States {
    pub const NONE: States = States(0);
    pub const INVISIBLE: States = States(1 << 0);
    pub const OFFSCREEN: States = States(1 << 1);
    pub const FOCUSABLE: States = States(1 << 2);
    pub const LINKED: States = States(1 << 3);

    pub fn contains(&self, other: States) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: States) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: States) {
        self.0 &= !other.0;
    }

    pub fn is_invisible(&self) -> bool {
        self.contains(Self::INVISIBLE)
    }
}

impl std::ops::BitOr for States {
    type Output = States;

    fn bitor(self, rhs: States) -> States {
        States(self.0 | rhs.0)
    }
}

/// Slice of text together with the offset it starts at in the full text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSegment {
    pub text: String,
    /// Character offset of the first character of `text`
    pub start: usize,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        Self { text: text.into(), start }
    }
}

/// Text capability of a node
pub trait TextInterface {
    /// Entire text of the node
    fn text(&self) -> Option<String>;

    /// Fragment most recently inserted or updated
    fn new_text(&self) -> Option<TextSegment>;
}

/// Hypertext capability: maps text offsets onto embedded children
pub trait HypertextInterface {
    type Node;

    /// Index of the hyperlink anchored at a character offset
    fn hyperlink_index(&self, offset: usize) -> Option<usize>;

    /// Accessible object behind a hyperlink index
    fn hyperlink(&self, index: usize) -> Option<Self::Node>;

    /// Resolve the embedded child anchored at a character offset
    fn embedded_at(&self, offset: usize) -> Option<Self::Node> {
        self.hyperlink_index(offset).and_then(|index| self.hyperlink(index))
    }
}

/// Handle into a platform accessibility tree.
///
/// Every method that returns a node hands out a new reference owned by the
/// caller; cloning a handle takes another reference to the same object.
/// Capability lookups (`text_interface`, `hypertext_interface`, `extended`)
/// behave like interface queries: `None` means the object does not
/// implement the capability.
pub trait AccessibleNode: Clone {
    type Text: TextInterface;
    type Hypertext: HypertextInterface<Node = Self>;

    /// Serialized object attributes (`name:value;...`)
    fn attributes(&self) -> Option<String>;

    fn parent(&self) -> Option<Self>;

    /// Children that are themselves accessible objects
    fn children(&self) -> Vec<Self>;

    fn name(&self) -> Option<String>;

    fn description(&self) -> Option<String>;

    fn states(&self) -> States;

    fn role(&self) -> Role;

    fn text_interface(&self) -> Option<Self::Text>;

    fn hypertext_interface(&self) -> Option<Self::Hypertext>;

    /// Whether the object itself is a hyperlink anchored in its parent's text
    fn is_hyperlink(&self) -> bool;

    /// Extended accessibility interface reached through the service provider
    fn extended(&self) -> Option<Self>;

    fn has_text(&self) -> bool {
        self.text_interface().is_some()
    }
}
