//! Accessibility Tree
//!
//! In-memory accessibility tree implementing the platform traits. Used to
//! drive the engine without a live desktop, and to check that every node
//! reference taken while handling an event is given back.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::node::{
    AccessibleNode, HypertextInterface, Role, States, TextInterface, TextSegment, EMBEDDED_OBJECT_CHAR,
};
use crate::platform::{Platform, WinEvent, WindowHandle};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Object id used in events targeting this node
    pub fn object_id(&self) -> i64 {
        i64::from(self.0)
    }

    pub fn from_object_id(object_id: i64) -> Option<Self> {
        u32::try_from(object_id).ok().map(NodeId)
    }
}

/// Description of a node to insert
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub role: Role,
    pub name: Option<String>,
    pub description: Option<String>,
    pub attributes: Option<String>,
    /// Full text; `Some` gives the node a text interface
    pub text: Option<String>,
    pub new_text: Option<TextSegment>,
    pub states: States,
    /// Text nodes also expose hypertext
    pub hypertext: bool,
    pub hyperlink: bool,
    /// Reachable through the service provider
    pub extended: bool,
}

impl NodeSpec {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: None,
            description: None,
            attributes: None,
            text: None,
            new_text: None,
            states: States::NONE,
            hypertext: true,
            hyperlink: false,
            extended: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn attributes(mut self, blob: &str) -> Self {
        self.attributes = Some(blob.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Fragment reported as just inserted, starting at character `start`
    pub fn new_text(mut self, text: &str, start: usize) -> Self {
        if self.text.is_none() {
            self.text = Some(String::new());
        }
        self.new_text = Some(TextSegment::new(text, start));
        self
    }

    pub fn states(mut self, states: States) -> Self {
        self.states = states;
        self
    }

    pub fn without_hypertext(mut self) -> Self {
        self.hypertext = false;
        self
    }

    pub fn hyperlink(mut self) -> Self {
        self.hyperlink = true;
        self
    }

    pub fn without_extended(mut self) -> Self {
        self.extended = false;
        self
    }
}

#[derive(Debug)]
struct NodeData {
    spec: NodeSpec,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Children anchored by embedded object characters, in text order
    embedded: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
struct WindowData {
    parent: Option<WindowHandle>,
    visible: bool,
}

#[derive(Debug, Default)]
struct TreeInner {
    nodes: RefCell<Vec<NodeData>>,
    windows: RefCell<HashMap<WindowHandle, WindowData>>,
    foreground: Cell<Option<WindowHandle>>,
    live_handles: Cell<usize>,
}

impl TreeInner {
    fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
        self.nodes.borrow().get(id.0 as usize).map(f)
    }
}

/// Shared in-memory accessibility tree
#[derive(Debug, Clone, Default)]
pub struct AccessibilityTree {
    inner: Rc<TreeInner>,
}

impl AccessibilityTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add node under `parent` (or as a root)
    pub fn add(&self, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        let mut nodes = self.inner.nodes.borrow_mut();
        let id = NodeId(nodes.len() as u32);
        nodes.push(NodeData { spec, parent, children: Vec::new(), embedded: Vec::new() });

        if let Some(pid) = parent {
            if let Some(parent) = nodes.get_mut(pid.0 as usize) {
                parent.children.push(id);
            }
        }
        id
    }

    /// Add a child that is anchored in the parent's text by the next
    /// embedded object character
    pub fn embed(&self, parent: NodeId, spec: NodeSpec) -> NodeId {
        let id = self.add(Some(parent), spec.hyperlink());
        if let Some(parent) = self.inner.nodes.borrow_mut().get_mut(parent.0 as usize) {
            parent.embedded.push(id);
        }
        id
    }

    /// Modify a node in place
    pub fn update(&self, id: NodeId, f: impl FnOnce(&mut NodeSpec)) {
        if let Some(node) = self.inner.nodes.borrow_mut().get_mut(id.0 as usize) {
            f(&mut node.spec);
        }
    }

    /// Point a node at a different parent without touching the old parent's
    /// child list; permits malformed (cyclic) structures.
    pub fn set_parent(&self, id: NodeId, parent: Option<NodeId>) {
        let mut nodes = self.inner.nodes.borrow_mut();
        if let Some(node) = nodes.get_mut(id.0 as usize) {
            node.parent = parent;
        }
        if let Some(pid) = parent {
            if let Some(parent) = nodes.get_mut(pid.0 as usize) {
                if !parent.children.contains(&id) {
                    parent.children.push(id);
                }
            }
        }
    }

    /// Take a reference to a node
    pub fn node(&self, id: NodeId) -> TreeNode {
        TreeNode::acquire(&self.inner, id)
    }

    pub fn len(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node references currently held by anyone
    pub fn live_handles(&self) -> usize {
        self.inner.live_handles.get()
    }

    pub fn add_window(&self, window: WindowHandle, parent: Option<WindowHandle>, visible: bool) {
        self.inner.windows.borrow_mut().insert(window, WindowData { parent, visible });
    }

    pub fn set_window_visible(&self, window: WindowHandle, visible: bool) {
        if let Some(data) = self.inner.windows.borrow_mut().get_mut(&window) {
            data.visible = visible;
        }
    }

    pub fn set_foreground(&self, window: Option<WindowHandle>) {
        self.inner.foreground.set(window);
    }
}

impl Platform for AccessibilityTree {
    type Node = TreeNode;

    fn is_window_visible(&self, window: WindowHandle) -> bool {
        self.inner.windows.borrow().get(&window).is_some_and(|w| w.visible)
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.inner.foreground.get()
    }

    fn is_child_window(&self, parent: WindowHandle, child: WindowHandle) -> bool {
        let windows = self.inner.windows.borrow();
        let mut current = windows.get(&child).and_then(|w| w.parent);
        // Bounded by the number of windows so a parent loop cannot spin
        for _ in 0..windows.len() {
            match current {
                Some(w) if w == parent => return true,
                Some(w) => current = windows.get(&w).and_then(|data| data.parent),
                None => return false,
            }
        }
        false
    }

    fn accessible_from_event(&self, event: &WinEvent) -> Option<TreeNode> {
        let id = NodeId::from_object_id(event.object_id)?;
        let target = if event.child_id == WinEvent::CHILD_SELF {
            self.inner.with_node(id, |_| id)?
        } else {
            let index = usize::try_from(event.child_id.checked_sub(1)?).ok()?;
            self.inner.with_node(id, |data| data.children.get(index).copied())??
        };
        Some(self.node(target))
    }
}

/// Counted reference to a tree node
#[derive(Debug)]
pub struct TreeNode {
    tree: Rc<TreeInner>,
    id: NodeId,
}

impl TreeNode {
    fn acquire(tree: &Rc<TreeInner>, id: NodeId) -> Self {
        tree.live_handles.set(tree.live_handles.get() + 1);
        Self { tree: Rc::clone(tree), id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn spec<R>(&self, f: impl FnOnce(&NodeSpec) -> R) -> Option<R> {
        self.tree.with_node(self.id, |data| f(&data.spec))
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        Self::acquire(&self.tree, self.id)
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        self.tree.live_handles.set(self.tree.live_handles.get().saturating_sub(1));
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl AccessibleNode for TreeNode {
    type Text = TreeText;
    type Hypertext = TreeHypertext;

    fn attributes(&self) -> Option<String> {
        self.spec(|s| s.attributes.clone()).flatten()
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.tree.with_node(self.id, |data| data.parent)??;
        Some(Self::acquire(&self.tree, parent))
    }

    fn children(&self) -> Vec<Self> {
        let ids = self.tree.with_node(self.id, |data| data.children.clone()).unwrap_or_default();
        ids.into_iter().map(|id| Self::acquire(&self.tree, id)).collect()
    }

    fn name(&self) -> Option<String> {
        self.spec(|s| s.name.clone()).flatten()
    }

    fn description(&self) -> Option<String> {
        self.spec(|s| s.description.clone()).flatten()
    }

    fn states(&self) -> States {
        self.spec(|s| s.states).unwrap_or_default()
    }

    fn role(&self) -> Role {
        self.spec(|s| s.role).unwrap_or_default()
    }

    fn text_interface(&self) -> Option<TreeText> {
        let has_text = self.spec(|s| s.text.is_some()).unwrap_or(false);
        has_text.then(|| TreeText { node: self.clone() })
    }

    fn hypertext_interface(&self) -> Option<TreeHypertext> {
        let has_hypertext = self.spec(|s| s.text.is_some() && s.hypertext).unwrap_or(false);
        has_hypertext.then(|| TreeHypertext { node: self.clone() })
    }

    fn is_hyperlink(&self) -> bool {
        self.spec(|s| s.hyperlink).unwrap_or(false)
    }

    fn extended(&self) -> Option<Self> {
        let extended = self.spec(|s| s.extended).unwrap_or(false);
        extended.then(|| self.clone())
    }
}

/// Text interface of a tree node
#[derive(Debug, Clone)]
pub struct TreeText {
    node: TreeNode,
}

impl TextInterface for TreeText {
    fn text(&self) -> Option<String> {
        self.node.spec(|s| s.text.clone()).flatten()
    }

    fn new_text(&self) -> Option<TextSegment> {
        self.node.spec(|s| s.new_text.clone()).flatten()
    }
}

/// Hypertext interface of a tree node
#[derive(Debug, Clone)]
pub struct TreeHypertext {
    node: TreeNode,
}

impl HypertextInterface for TreeHypertext {
    type Node = TreeNode;

    fn hyperlink_index(&self, offset: usize) -> Option<usize> {
        let text = self.node.spec(|s| s.text.clone()).flatten()?;
        let mut index = 0;
        for (position, c) in text.chars().enumerate() {
            if position == offset {
                return (c == EMBEDDED_OBJECT_CHAR).then_some(index);
            }
            if c == EMBEDDED_OBJECT_CHAR {
                index += 1;
            }
        }
        None
    }

    fn hyperlink(&self, index: usize) -> Option<TreeNode> {
        let id = self.node.tree.with_node(self.node.id, |data| data.embedded.get(index).copied())??;
        Some(TreeNode::acquire(&self.node.tree, id))
    }
}
