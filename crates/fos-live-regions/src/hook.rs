//! Event Hook Lifecycle
//!
//! Installs a [`LiveRegionMonitor`] as the callback of a notification
//! source and removes it again.

use tracing::info;

use crate::dispatch::OutputSink;
use crate::live_region::LiveRegionMonitor;
use crate::platform::{EventCallback, NotificationSource, Platform, PlatformError, SubscriptionId, WinEvent};
use crate::LiveRegionError;

/// Proof that a monitor is registered; hand it back to [`HookRegistration::stop`]
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping the registration leaves the hook installed with no way to remove it"]
pub struct HookRegistration {
    id: SubscriptionId,
}

impl HookRegistration {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unregister the monitor from `source`
    pub fn stop<N: NotificationSource>(self, source: &mut N) -> Result<(), LiveRegionError> {
        source.unsubscribe(self.id)?;
        info!(subscription = self.id.0, "Live region hook removed");
        Ok(())
    }
}

/// Register `monitor` to receive every event `source` delivers
pub fn start<N, P, S>(source: &mut N, mut monitor: LiveRegionMonitor<P, S>) -> Result<HookRegistration, LiveRegionError>
where
    N: NotificationSource,
    P: Platform + 'static,
    S: OutputSink + 'static,
{
    let id = source.subscribe(Box::new(move |event: &WinEvent| {
        monitor.handle_event(event);
    }))?;
    info!(subscription = id.0, "Live region hook installed");
    Ok(HookRegistration { id })
}

/// In-process notification source delivering events synchronously, in
/// registration order
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, EventCallback)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every subscriber
    pub fn emit(&mut self, event: &WinEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl NotificationSource for EventBus {
    fn subscribe(&mut self, callback: EventCallback) -> Result<SubscriptionId, PlatformError> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, callback));
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> Result<(), PlatformError> {
        let position = self
            .subscribers
            .iter()
            .position(|(sub, _)| *sub == id)
            .ok_or(PlatformError::UnknownSubscription(id.0))?;
        self.subscribers.remove(position);
        Ok(())
    }
}
