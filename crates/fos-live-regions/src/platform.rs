//! Platform Accessibility Integration
//!
//! Boundary between the live region engine and the host platform: window
//! queries, event-to-object resolution and the notification source that
//! feeds raw events in.

use crate::node::AccessibleNode;

/// Native window identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub u64);

/// Platform event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    NameChange,
    DescriptionChange,
    Show,
    Hide,
    ValueChange,
    StateChange,
    Focus,
    TextInserted,
    TextRemoved,
    TextUpdated,
    /// Any other platform event id
    Other(u32),
}

/// Raw accessibility change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinEvent {
    pub kind: EventKind,
    pub window: WindowHandle,
    pub object_id: i64,
    pub child_id: i64,
}

impl WinEvent {
    /// Child id addressing the object itself rather than a simple child
    pub const CHILD_SELF: i64 = 0;

    pub fn new(kind: EventKind, window: WindowHandle, object_id: i64) -> Self {
        Self { kind, window, object_id, child_id: Self::CHILD_SELF }
    }

    pub fn with_child(mut self, child_id: i64) -> Self {
        self.child_id = child_id;
        self
    }
}

/// Host-side queries the engine needs for one event
pub trait Platform {
    type Node: AccessibleNode;

    fn is_window_visible(&self, window: WindowHandle) -> bool;

    fn foreground_window(&self) -> Option<WindowHandle>;

    /// `child` is a descendant of `parent` in the window hierarchy
    fn is_child_window(&self, parent: WindowHandle, child: WindowHandle) -> bool;

    /// Resolve the accessible object an event refers to
    fn accessible_from_event(&self, event: &WinEvent) -> Option<Self::Node>;

    /// Window is visible and either is the foreground window or lives inside it
    fn is_in_foreground(&self, window: WindowHandle) -> bool {
        if !self.is_window_visible(window) {
            return false;
        }
        match self.foreground_window() {
            Some(fg) => fg == window || self.is_child_window(fg, window),
            None => false,
        }
    }
}

/// Receives raw events from the platform
pub type EventCallback = Box<dyn FnMut(&WinEvent)>;

/// Registration token handed out by a notification source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Source of raw accessibility notifications
pub trait NotificationSource {
    fn subscribe(&mut self, callback: EventCallback) -> Result<SubscriptionId, PlatformError>;

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), PlatformError>;
}

/// Platform accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// Platform not supported
    #[error("Platform not supported")]
    NotSupported,

    #[error("Subscription {0} is not registered")]
    UnknownSubscription(u64),

    #[error("Event hook registration failed: {0}")]
    HookFailed(String),
}
