//! fOS Live Regions
//!
//! Live region announcements for the fOS accessibility stack.
//!
//! Raw accessibility notifications come in from a [`NotificationSource`];
//! the [`LiveRegionMonitor`] decides which of them are live region updates,
//! finds the right scope (honouring `aria-atomic`), turns the affected
//! subtree into plain text and hands it to an [`OutputSink`].
//!
//! Features:
//! - Attribute blob parsing (`container-live`, `container-relevant`, ...)
//! - Atomic scope resolution
//! - Text assembly with embedded object expansion and `live=off` muting
//! - Foreground window filtering
//! - Hook lifecycle (`start`/`stop`)
//! - In-memory accessibility tree for hosts and tests

pub mod aria;
pub mod atomic;
pub mod attributes;
pub mod config;
pub mod dispatch;
pub mod hook;
pub mod live_region;
pub mod node;
pub mod platform;
pub mod text;
pub mod tree;

// Core exports
pub use aria::{LiveRegionMode, RelevantSet};
pub use atomic::resolve_atomic_root;
pub use attributes::{fetch as fetch_attributes, AttributeMap};
pub use config::MonitorConfig;
pub use dispatch::{dispatch, AnnouncementQueue, CallbackSink, OutputSink};
pub use hook::{start, EventBus, HookRegistration};
pub use live_region::{DiscardReason, LiveRegionEvent, LiveRegionMonitor, Outcome};
pub use node::{
    AccessibleNode, HypertextInterface, Role, States, TextInterface, TextSegment, EMBEDDED_OBJECT_CHAR,
};
pub use platform::{
    EventCallback, EventKind, NotificationSource, Platform, PlatformError, SubscriptionId, WinEvent,
    WindowHandle,
};
pub use text::{AssembleOptions, Assembly, TextAssembler};
pub use tree::{AccessibilityTree, NodeId, NodeSpec, TreeNode};

/// Live region error
#[derive(Debug, thiserror::Error)]
pub enum LiveRegionError {
    #[error("Accessibility tree deeper than {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}
