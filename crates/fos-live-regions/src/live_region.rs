//! Live Region Support
//!
//! Decides whether a raw accessibility notification is a live region update
//! worth announcing, and if so produces the announcement text.
//!
//! Every stage either passes the event on or drops it. Dropping is the
//! common case and never an error: the host only ever observes one
//! dispatched string or nothing.

use tracing::{debug, trace, warn};

use crate::aria::RelevantSet;
use crate::atomic::resolve_atomic_root;
use crate::attributes::{self, AttributeMap};
use crate::config::MonitorConfig;
use crate::dispatch::{dispatch, OutputSink};
use crate::node::AccessibleNode;
use crate::platform::{EventKind, Platform, WinEvent};
use crate::text::{AssembleOptions, TextAssembler};
use crate::LiveRegionError;

/// Event types that can announce a live region update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiveRegionEvent {
    NameChanged,
    DescriptionChanged,
    Shown,
    TextInserted,
    TextUpdated,
}

impl LiveRegionEvent {
    pub fn from_kind(kind: EventKind) -> Option<Self> {
        Some(match kind {
            EventKind::NameChange => Self::NameChanged,
            EventKind::DescriptionChange => Self::DescriptionChanged,
            EventKind::Show => Self::Shown,
            EventKind::TextInserted => Self::TextInserted,
            EventKind::TextUpdated => Self::TextUpdated,
            _ => return None,
        })
    }

    /// Name or description change
    pub fn is_property_change(&self) -> bool {
        matches!(self, Self::NameChanged | Self::DescriptionChanged)
    }

    pub fn is_text_change(&self) -> bool {
        matches!(self, Self::TextInserted | Self::TextUpdated)
    }
}

/// Why an event was not announced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    /// Monitor switched off in configuration
    Disabled,
    /// Window hidden or outside the foreground window
    WindowNotForeground,
    IgnoredEventType,
    ObjectUnresolved,
    Invisible,
    /// Text leaf already covered by its parent's text
    StaticTextLeaf,
    NoExtendedInterface,
    NoAttributes,
    NotLive,
    Busy,
    NothingRelevant,
    AdditionsNotRelevant,
    /// Parent exposes text; its text events announce this better
    ShowHandledByParentText,
    /// Shown object is the region root itself
    ShowOnRegionRoot,
    TextNotRelevant,
    /// Traversal hit the configured depth cap
    TreeTooDeep,
    /// Nothing but whitespace to say
    NoText,
}

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatched(String),
    Discarded(DiscardReason),
}

impl Outcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Dispatched(text) => Some(text),
            Self::Discarded(_) => None,
        }
    }
}

fn ensure(condition: bool, reason: DiscardReason) -> Result<(), DiscardReason> {
    if condition { Ok(()) } else { Err(reason) }
}

fn too_deep(err: LiveRegionError) -> DiscardReason {
    warn!("Live region traversal aborted: {}", err);
    DiscardReason::TreeTooDeep
}

/// Live region event monitor
pub struct LiveRegionMonitor<P: Platform, S: OutputSink> {
    platform: P,
    sink: S,
    config: MonitorConfig,
    assembler: TextAssembler,
}

impl<P: Platform, S: OutputSink> LiveRegionMonitor<P, S> {
    pub fn new(platform: P, sink: S) -> Self {
        Self::with_config(platform, sink, MonitorConfig::default())
    }

    pub fn with_config(platform: P, sink: S, config: MonitorConfig) -> Self {
        let assembler = TextAssembler::new(config.max_depth);
        Self { platform, sink, config, assembler }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (P, S) {
        (self.platform, self.sink)
    }

    /// Run one notification through the pipeline and dispatch the result
    pub fn handle_event(&mut self, event: &WinEvent) -> Outcome {
        let text = match self.announcement_for(event) {
            Ok(text) => text,
            Err(reason) => {
                trace!(?reason, kind = ?event.kind, object = event.object_id, "Live region event discarded");
                return Outcome::Discarded(reason);
            }
        };

        if dispatch(&mut self.sink, &text) {
            debug!(kind = ?event.kind, object = event.object_id, "Live region announced: {}", text);
            Outcome::Dispatched(text)
        } else {
            trace!(kind = ?event.kind, object = event.object_id, "Live region text was blank");
            Outcome::Discarded(DiscardReason::NoText)
        }
    }

    /// Announcement text for an event, without dispatching it
    pub fn announcement_for(&self, event: &WinEvent) -> Result<String, DiscardReason> {
        ensure(self.config.enabled, DiscardReason::Disabled)?;
        if self.config.require_foreground {
            ensure(self.platform.is_in_foreground(event.window), DiscardReason::WindowNotForeground)?;
        }

        let kind = LiveRegionEvent::from_kind(event.kind).ok_or(DiscardReason::IgnoredEventType)?;

        let node = {
            let object = self
                .platform
                .accessible_from_event(event)
                .ok_or(DiscardReason::ObjectUnresolved)?;
            ensure(!object.states().is_invisible(), DiscardReason::Invisible)?;
            // Text leaves are read through the parent's text unless they are
            // themselves embedded as a hyperlink.
            ensure(
                !object.role().is_static_text() || object.is_hyperlink(),
                DiscardReason::StaticTextLeaf,
            )?;
            object.extended().ok_or(DiscardReason::NoExtendedInterface)?
        };

        let attrs = attributes::fetch(&node).ok_or(DiscardReason::NoAttributes)?;
        ensure(attrs.container_live().is_active(), DiscardReason::NotLive)?;
        ensure(!attrs.is_container_busy(), DiscardReason::Busy)?;

        let relevant = RelevantSet::from_attribute(attrs.get("container-relevant"));
        ensure(!relevant.is_empty(), DiscardReason::NothingRelevant)?;

        if kind == LiveRegionEvent::Shown {
            ensure(relevant.allow_additions, DiscardReason::AdditionsNotRelevant)?;
            check_shown_in_region(&node)?;
        }

        if kind.is_property_change() {
            ensure(relevant.allow_text, DiscardReason::TextNotRelevant)?;
        }

        self.compose(&node, &attrs, kind, relevant)
    }

    fn compose(
        &self,
        node: &P::Node,
        attrs: &AttributeMap,
        kind: LiveRegionEvent,
        relevant: RelevantSet,
    ) -> Result<String, DiscardReason> {
        if let Some(root) = resolve_atomic_root(node, attrs, self.config.max_depth).map_err(too_deep)? {
            return self.assemble(&root, AssembleOptions::default());
        }

        match kind {
            LiveRegionEvent::NameChanged => node.name().ok_or(DiscardReason::NoText),
            LiveRegionEvent::DescriptionChanged => node.description().ok_or(DiscardReason::NoText),
            LiveRegionEvent::Shown => self.assemble(node, AssembleOptions::default()),
            LiveRegionEvent::TextInserted | LiveRegionEvent::TextUpdated => {
                self.assemble(node, AssembleOptions::delta(relevant))
            }
        }
    }

    fn assemble(&self, node: &P::Node, options: AssembleOptions) -> Result<String, DiscardReason> {
        let assembly = self.assembler.assemble(node, options).map_err(too_deep)?;
        ensure(assembly.has_content, DiscardReason::NoText)?;
        Ok(assembly.text)
    }
}

/// A shown object is announced only as a new item inside an existing region:
/// its parent must lack a text interface (or the parent's text events cover
/// it) and must itself sit in an active live region (or the object is the
/// region root). An object without a parent passes.
fn check_shown_in_region<N: AccessibleNode>(node: &N) -> Result<(), DiscardReason> {
    let Some(parent) = node.parent() else {
        return Ok(());
    };
    ensure(!parent.has_text(), DiscardReason::ShowHandledByParentText)?;

    let parent_live = parent
        .extended()
        .and_then(|p| attributes::fetch(&p))
        .is_some_and(|a| a.container_live().is_active());
    ensure(parent_live, DiscardReason::ShowOnRegionRoot)
}
