//! The host's "menu opening" event, and the bus the plugin subscribes to.
//!
//! The host raises the event each time the entry context menu is about to
//! show, carrying the current selection context.  Subscriptions are scoped
//! resources: dropping a [`Subscription`] deregisters its handler, so a
//! shut-down plugin can never receive another event.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::plugin::types::CredentialRecord;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Event
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Selection context carried by the menu-opening event.
#[derive(Debug, Clone)]
pub struct MenuOpenEvent {
    selection: Option<CredentialRecord>,
}

impl MenuOpenEvent {
    pub fn new(selection: Option<CredentialRecord>) -> Self {
        Self { selection }
    }

    /// An event with nothing selected.
    pub fn empty() -> Self {
        Self { selection: None }
    }

    /// Capability query: the record the menu is opening for, if any.
    pub fn current_selection(&self) -> Option<&CredentialRecord> {
        self.selection.as_ref()
    }
}

/// Receiver side of the menu-opening event.
pub trait MenuOpeningHandler: Send {
    fn on_menu_opening(&mut self, event: &MenuOpenEvent);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Bus
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct BusInner {
    next_id: u64,
    handlers: Vec<(u64, Box<dyn MenuOpeningHandler>)>,
}

/// Process-wide publisher of menu-opening events.
pub struct SelectionEventBus {
    inner: Mutex<BusInner>,
}

impl SelectionEventBus {
    /// Create a bus behind an `Arc` so subscriptions can hold a weak
    /// back-reference for deregistration.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(BusInner {
                next_id: 0,
                handlers: Vec::new(),
            }),
        })
    }

    /// Register a handler.  The returned guard deregisters it on drop.
    pub fn subscribe(self: &Arc<Self>, handler: Box<dyn MenuOpeningHandler>) -> Subscription {
        let mut inner = self.lock_inner();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.handlers.push((id, handler));
        Subscription {
            id,
            bus: Arc::downgrade(self),
        }
    }

    /// Deliver an event to every current subscriber, in subscription order.
    pub fn emit_menu_opening(&self, event: &MenuOpenEvent) {
        let mut inner = self.lock_inner();
        for (_, handler) in inner.handlers.iter_mut() {
            handler.on_menu_opening(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock_inner().handlers.len()
    }

    fn unsubscribe(&self, id: u64) -> bool {
        let mut inner = self.lock_inner();
        let before = inner.handlers.len();
        inner.handlers.retain(|(handler_id, _)| *handler_id != id);
        inner.handlers.len() != before
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, BusInner> {
        // A handler that panicked must not wedge the bus for everyone else.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Subscription guard
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Scoped registration: dropping it removes the handler from the bus.
#[must_use = "dropping the subscription deregisters the handler"]
pub struct Subscription {
    id: u64,
    bus: Weak<SelectionEventBus>,
}

impl Subscription {
    /// Bus-unique id of this subscription.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::types::FIELD_TITLE;
    use std::sync::{Arc, Mutex};

    /// Records the titles of every event it sees.
    struct Recorder {
        seen: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl MenuOpeningHandler for Recorder {
        fn on_menu_opening(&mut self, event: &MenuOpenEvent) {
            let title = event
                .current_selection()
                .and_then(|r| r.title())
                .map(str::to_string);
            self.seen.lock().unwrap().push(title);
        }
    }

    fn recorder() -> (Box<Recorder>, Arc<Mutex<Vec<Option<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Box::new(Recorder { seen: seen.clone() }),
            seen,
        )
    }

    fn titled_event(title: &str) -> MenuOpenEvent {
        MenuOpenEvent::new(Some(
            CredentialRecord::new().with_field(FIELD_TITLE, title),
        ))
    }

    // ── Delivery ─────────────────────────────────────────────────

    #[test]
    fn subscribed_handler_receives_events() {
        let bus = SelectionEventBus::new();
        let (handler, seen) = recorder();
        let _sub = bus.subscribe(handler);

        bus.emit_menu_opening(&titled_event("GitHub 2FA"));
        bus.emit_menu_opening(&MenuOpenEvent::empty());

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![Some("GitHub 2FA".to_string()), None]);
    }

    #[test]
    fn every_subscriber_receives_each_event() {
        let bus = SelectionEventBus::new();
        let (first, first_seen) = recorder();
        let (second, second_seen) = recorder();
        let _a = bus.subscribe(first);
        let _b = bus.subscribe(second);

        bus.emit_menu_opening(&titled_event("Mail 2FA"));

        assert_eq!(first_seen.lock().unwrap().len(), 1);
        assert_eq!(second_seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn emit_without_subscribers_is_harmless() {
        let bus = SelectionEventBus::new();
        bus.emit_menu_opening(&MenuOpenEvent::empty());
        assert_eq!(bus.subscriber_count(), 0);
    }

    // ── Deregistration ───────────────────────────────────────────

    #[test]
    fn dropping_the_subscription_deregisters() {
        let bus = SelectionEventBus::new();
        let (handler, seen) = recorder();
        let sub = bus.subscribe(handler);
        assert_eq!(bus.subscriber_count(), 1);

        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);

        bus.emit_menu_opening(&titled_event("after shutdown"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn subscription_ids_are_unique() {
        let bus = SelectionEventBus::new();
        let (first, _) = recorder();
        let (second, _) = recorder();
        let a = bus.subscribe(first);
        let b = bus.subscribe(second);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn dropping_a_subscription_after_the_bus_is_fine() {
        let bus = SelectionEventBus::new();
        let (handler, _) = recorder();
        let sub = bus.subscribe(handler);
        drop(bus);
        drop(sub);
    }
}
