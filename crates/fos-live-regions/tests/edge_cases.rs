//! Edge case tests for fos-live-regions
//!
//! Malformed trees, missing capabilities, odd attribute blobs and text that
//! should never reach the sink.

use fos_live_regions::{
    AccessibilityTree, AccessibleNode, AnnouncementQueue, AssembleOptions, AttributeMap, DiscardReason, EventKind,
    LiveRegionError, LiveRegionMonitor, MonitorConfig, NodeId, NodeSpec, Outcome, Role, States, TextAssembler,
    WinEvent, WindowHandle,
};

const WINDOW: WindowHandle = WindowHandle(10);

fn desktop() -> AccessibilityTree {
    let tree = AccessibilityTree::new();
    tree.add_window(WINDOW, None, true);
    tree.set_foreground(Some(WINDOW));
    tree
}

fn monitor_with(tree: &AccessibilityTree, config: MonitorConfig) -> LiveRegionMonitor<AccessibilityTree, AnnouncementQueue> {
    LiveRegionMonitor::with_config(tree.clone(), AnnouncementQueue::new(8), config)
}

fn event(kind: EventKind, id: NodeId) -> WinEvent {
    WinEvent::new(kind, WINDOW, id.object_id())
}

// ============================================================================
// MALFORMED TREES
// ============================================================================

#[test]
fn test_child_cycle_is_bounded() {
    let tree = desktop();
    let a = tree.add(None, NodeSpec::new(Role::Section).attributes("atomic:true;container-live:polite;"));
    let b = tree.add(Some(a), NodeSpec::new(Role::Grouping));
    // b lists a as its child: a → b → a → ...
    tree.set_parent(a, Some(b));

    let mut monitor = monitor_with(&tree, MonitorConfig::new().with_max_depth(32));
    assert_eq!(
        monitor.handle_event(&event(EventKind::NameChange, a)),
        Outcome::Discarded(DiscardReason::TreeTooDeep)
    );
    assert!(monitor.sink().is_empty());
    assert_eq!(tree.live_handles(), 0);
}

#[test]
fn test_parent_cycle_in_atomic_chain_is_bounded() {
    let tree = desktop();
    let a = tree.add(None, NodeSpec::new(Role::Grouping).attributes("container-atomic:true;container-live:polite;"));
    let b = tree.add(Some(a), NodeSpec::new(Role::Grouping)
        .attributes("container-atomic:true;container-live:polite;")
        .name("loop"));
    tree.set_parent(a, Some(b));

    let mut monitor = monitor_with(&tree, MonitorConfig::new().with_max_depth(16));
    assert_eq!(
        monitor.handle_event(&event(EventKind::NameChange, b)),
        Outcome::Discarded(DiscardReason::TreeTooDeep)
    );
    assert_eq!(tree.live_handles(), 0);
}

#[test]
fn test_deep_but_legal_tree() {
    let tree = desktop();
    let root = tree.add(None, NodeSpec::new(Role::Section).attributes("atomic:true;container-live:polite;"));
    let mut parent = root;
    for _ in 0..100 {
        parent = tree.add(Some(parent), NodeSpec::new(Role::Grouping));
    }
    tree.add(Some(parent), NodeSpec::new(Role::Text).text("bottom"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::Show, root)),
        Outcome::Dispatched("bottom ".to_string())
    );
}

#[test]
fn test_assembler_reports_limit() {
    let tree = desktop();
    let a = tree.add(None, NodeSpec::new(Role::Grouping));
    let b = tree.add(Some(a), NodeSpec::new(Role::Grouping));
    tree.set_parent(a, Some(b));

    let err = TextAssembler::new(5).assemble(&tree.node(a), AssembleOptions::default()).unwrap_err();
    assert!(matches!(err, LiveRegionError::DepthExceeded { limit: 5 }));
    assert_eq!(err.to_string(), "Accessibility tree deeper than 5 levels");
}

// ============================================================================
// RESOLUTION FAILURES
// ============================================================================

#[test]
fn test_unresolvable_objects() {
    let tree = desktop();
    let list = tree.add(None, NodeSpec::new(Role::List).attributes("container-live:polite;"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    for ev in [
        WinEvent::new(EventKind::Show, WINDOW, 4242),
        WinEvent::new(EventKind::Show, WINDOW, -4),
        WinEvent::new(EventKind::Show, WINDOW, list.object_id()).with_child(3),
        WinEvent::new(EventKind::Show, WINDOW, list.object_id()).with_child(-1),
        WinEvent::new(EventKind::Show, WINDOW, list.object_id()).with_child(i64::MIN),
    ] {
        assert_eq!(monitor.handle_event(&ev), Outcome::Discarded(DiscardReason::ObjectUnresolved));
    }
}

#[test]
fn test_simple_child_addressing() {
    let tree = desktop();
    let list = tree.add(None, NodeSpec::new(Role::List).attributes("container-live:polite;"));
    tree.add(Some(list), NodeSpec::new(Role::ListItem).attributes("container-live:polite;").name("first"));
    tree.add(Some(list), NodeSpec::new(Role::ListItem).attributes("container-live:polite;").name("second"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    let ev = WinEvent::new(EventKind::NameChange, WINDOW, list.object_id()).with_child(2);
    assert_eq!(monitor.handle_event(&ev), Outcome::Dispatched("second".to_string()));
}

#[test]
fn test_shown_parent_without_attributes_is_root() {
    let tree = desktop();
    let parent = tree.add(None, NodeSpec::new(Role::Section));
    let child = tree.add(Some(parent), NodeSpec::new(Role::Text)
        .attributes("container-live:polite;")
        .text("hello"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::Show, child)),
        Outcome::Discarded(DiscardReason::ShowOnRegionRoot)
    );
}

#[test]
fn test_shown_parent_without_extended_interface_is_root() {
    let tree = desktop();
    let parent = tree.add(None, NodeSpec::new(Role::Section)
        .attributes("container-live:polite;")
        .without_extended());
    let child = tree.add(Some(parent), NodeSpec::new(Role::Text)
        .attributes("container-live:polite;")
        .text("hello"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::Show, child)),
        Outcome::Discarded(DiscardReason::ShowOnRegionRoot)
    );
}

#[test]
fn test_offscreen_is_not_invisible() {
    let tree = desktop();
    let node = tree.add(None, NodeSpec::new(Role::Text)
        .attributes("container-live:polite;")
        .name("Offscreen update")
        .states(States::OFFSCREEN));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert!(monitor.handle_event(&event(EventKind::NameChange, node)).is_dispatched());
}

// ============================================================================
// TEXT THAT MUST NOT BE ANNOUNCED
// ============================================================================

#[test]
fn test_whitespace_everywhere() {
    let tree = desktop();
    let log = tree.add(None, NodeSpec::new(Role::List).attributes("container-live:polite;"));
    let node = tree.add(Some(log), NodeSpec::new(Role::ListItem)
        .attributes("container-live:polite;")
        .text(" \n\t")
        .new_text("  ", 0)
        .name(" ")
        .description("\u{fffc}"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    for kind in [EventKind::Show, EventKind::TextInserted, EventKind::TextUpdated] {
        assert_eq!(
            monitor.handle_event(&event(kind, node)),
            Outcome::Discarded(DiscardReason::NoText)
        );
    }
    assert!(monitor.sink().is_empty());
}

#[test]
fn test_placeholder_only_delta() {
    let tree = desktop();
    let node = tree.add(None, NodeSpec::new(Role::Text)
        .attributes("container-live:polite;")
        .text("\u{fffc}")
        .new_text("\u{fffc}", 0));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::TextInserted, node)),
        Outcome::Discarded(DiscardReason::NoText)
    );
}

#[test]
fn test_muted_children_only() {
    let tree = desktop();
    let region = tree.add(None, NodeSpec::new(Role::Section).attributes("atomic:true;container-live:polite;"));
    tree.add(Some(region), NodeSpec::new(Role::Text).attributes("live:off;").text("ticker"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::Show, region)),
        Outcome::Discarded(DiscardReason::NoText)
    );
}

// ============================================================================
// UNICODE AND ATTRIBUTE QUIRKS
// ============================================================================

#[test]
fn test_unicode_text() {
    let tree = desktop();
    let node = tree.add(None, NodeSpec::new(Role::Text)
        .attributes("container-live:polite;")
        .text("Привет 世界 \u{fffc}")
        .new_text("世界 \u{fffc}", 7));
    tree.embed(node, NodeSpec::new(Role::Link).text("🚀"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::TextInserted, node)),
        Outcome::Dispatched("世界 🚀  ".to_string())
    );
}

#[test]
fn test_escaped_attribute_values() {
    let attrs = AttributeMap::parse(r"container-live:polite;label:a\;b\:c\\d;container-relevant:text\ additions;");
    assert_eq!(attrs.get("label"), Some(r"a;b:c\d"));
    assert_eq!(attrs.get("container-relevant"), Some("text additions"));
}

#[test]
fn test_politeness_values_are_case_sensitive() {
    let tree = desktop();
    let node = tree.add(None, NodeSpec::new(Role::Text).attributes("container-live:Polite;").name("x"));

    let mut monitor = monitor_with(&tree, MonitorConfig::default());
    assert_eq!(
        monitor.handle_event(&event(EventKind::NameChange, node)),
        Outcome::Discarded(DiscardReason::NotLive)
    );
}

#[test]
fn test_extended_interface_reacquired() {
    let tree = desktop();
    let node = tree.add(None, NodeSpec::new(Role::Text).attributes("container-live:polite;"));
    let handle = tree.node(node);
    let extended = handle.extended().unwrap();
    assert_eq!(extended.id(), node);
    assert_eq!(tree.live_handles(), 2);
}
