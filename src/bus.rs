//! Publish/subscribe channel for cross-feature notifications
//!
//! A game that awards a collectible publishes it here; the inventory listens.
//! Each subscriber is held by a [`Subscription`] guard and is removed when the
//! guard drops, so a torn-down page cannot keep receiving events.
//!
//! Single-threaded: the bus lives on the UI thread alongside the games.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Handler<T> = Box<dyn FnMut(&T)>;

struct Slot<T> {
    id: u64,
    handler: Rc<RefCell<Handler<T>>>,
}

struct Registry<T> {
    next_id: u64,
    slots: Vec<Slot<T>>,
}

/// Event channel. Cloning shares the same subscriber list.
pub struct EventBus<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<T: 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> EventBus<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                slots: Vec::new(),
            })),
        }
    }

    /// Register a handler; it stays active until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, handler: impl FnMut(&T) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.slots.push(Slot {
            id,
            handler: Rc::new(RefCell::new(Box::new(handler))),
        });

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().slots.retain(|s| s.id != id);
                }
            })),
        }
    }

    /// Deliver `event` to every current subscriber. Returns how many ran.
    ///
    /// Handlers may subscribe or unsubscribe while being called; changes
    /// apply from the next publish. A handler that publishes on the same bus
    /// re-entrantly is skipped for the nested event.
    pub fn publish(&self, event: &T) -> usize {
        let handlers: Vec<_> = self
            .registry
            .borrow()
            .slots
            .iter()
            .map(|s| Rc::clone(&s.handler))
            .collect();

        let mut delivered = 0;
        for handler in handlers {
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().slots.len()
    }
}

/// Guard for a registered handler
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Explicit form of dropping the guard.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_subscribers() {
        let bus = EventBus::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = bus.subscribe(move |v| sink.borrow_mut().push(*v));
        assert_eq!(bus.publish(&3), 1);
        assert_eq!(bus.publish(&4), 1);
        assert_eq!(*seen.borrow(), vec![3, 4]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let bus = EventBus::<u32>::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let sub = bus.subscribe(move |_| *counter.borrow_mut() += 1);
        bus.publish(&1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&1), 0);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = EventBus::<u32>::new();
        let sub = bus.subscribe(|_| {});
        drop(bus);
        sub.unsubscribe();
    }

    #[test]
    fn test_handler_can_unsubscribe_others() {
        let bus = EventBus::<u32>::new();
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&victim);
        let _killer = bus.subscribe(move |_| {
            slot.borrow_mut().take();
        });
        *victim.borrow_mut() = Some(bus.subscribe(|_| {}));
        assert_eq!(bus.subscriber_count(), 2);
        bus.publish(&0);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let bus = EventBus::<&'static str>::new();
        let other = bus.clone();
        let _sub = bus.subscribe(|_| {});
        assert_eq!(other.publish(&"hi"), 1);
    }
}
