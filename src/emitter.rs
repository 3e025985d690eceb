//! Ordered, synchronous publish/subscribe primitive.

use std::cell::RefCell;
use std::rc::Rc;

/// A subscriber. Identity is the `Rc` allocation, so keep a clone around to unsubscribe.
pub type Listener<T> = Rc<dyn Fn(&T) -> anyhow::Result<()>>;

/// Where a new listener lands in the delivery order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventPriority {
    /// Appended after every existing listener
    #[default]
    Low,
    /// Placed before every existing listener
    High,
}

pub struct EventEmitter<T> {
    listeners: RefCell<Vec<Listener<T>>>,
}

impl<T> EventEmitter<T> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Add a listener. The same listener may be subscribed more than once.
    pub fn subscribe(&self, listener: Listener<T>, priority: EventPriority) {
        let mut listeners = self.listeners.borrow_mut();
        match priority {
            EventPriority::High => listeners.insert(0, listener),
            EventPriority::Low => listeners.push(listener),
        }
    }

    /// Remove every entry that is the same allocation as `listener`.
    pub fn unsubscribe(&self, listener: &Listener<T>) {
        self.listeners
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Deliver `event` to each listener in order.
    ///
    /// Delivery stops at the first listener that fails and its error is returned.
    pub fn emit(&self, event: &T) -> anyhow::Result<()> {
        // Listeners may subscribe or unsubscribe while being called.
        let snapshot: Vec<Listener<T>> = self.listeners.borrow().clone();
        for listener in snapshot {
            listener(event)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> Listener<u32> {
        let log = Rc::clone(log);
        Rc::new(move |_: &u32| {
            log.borrow_mut().push(tag);
            Ok(())
        })
    }

    #[test]
    fn high_priority_runs_first_in_reverse_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();

        emitter.subscribe(recorder(&log, "low1"), EventPriority::Low);
        emitter.subscribe(recorder(&log, "high1"), EventPriority::High);
        emitter.subscribe(recorder(&log, "low2"), EventPriority::Low);
        emitter.subscribe(recorder(&log, "high2"), EventPriority::High);

        emitter.emit(&1).unwrap();
        assert_eq!(*log.borrow(), vec!["high2", "high1", "low1", "low2"]);
    }

    #[test]
    fn unsubscribe_removes_every_copy() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();
        let twice = recorder(&log, "twice");
        let other = recorder(&log, "other");

        emitter.subscribe(Rc::clone(&twice), EventPriority::Low);
        emitter.subscribe(other, EventPriority::Low);
        emitter.subscribe(Rc::clone(&twice), EventPriority::High);
        assert_eq!(emitter.len(), 3);

        emitter.unsubscribe(&twice);
        assert_eq!(emitter.len(), 1);

        emitter.emit(&7).unwrap();
        assert_eq!(*log.borrow(), vec!["other"]);
    }

    #[test]
    fn unsubscribe_ignores_equal_but_distinct_closures() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();
        emitter.subscribe(recorder(&log, "a"), EventPriority::Low);

        emitter.unsubscribe(&recorder(&log, "a"));
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn failing_listener_aborts_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let emitter = EventEmitter::new();

        emitter.subscribe(recorder(&log, "first"), EventPriority::Low);
        emitter.subscribe(
            Rc::new(|value: &u32| -> anyhow::Result<()> {
                anyhow::bail!("listener failed on {value}")
            }),
            EventPriority::Low,
        );
        emitter.subscribe(recorder(&log, "never"), EventPriority::Low);

        let err = emitter.emit(&3).unwrap_err();
        assert_eq!(err.to_string(), "listener failed on 3");
        assert_eq!(*log.borrow(), vec!["first"]);
    }

    #[test]
    fn listener_can_subscribe_during_emit() {
        let emitter: Rc<EventEmitter<u32>> = Rc::new(EventEmitter::new());
        let inner = Rc::clone(&emitter);
        emitter.subscribe(
            Rc::new(move |_: &u32| {
                inner.subscribe(Rc::new(|_: &u32| Ok(())), EventPriority::Low);
                Ok(())
            }),
            EventPriority::Low,
        );

        emitter.emit(&0).unwrap();
        assert_eq!(emitter.len(), 2);
    }

    #[test]
    fn emit_without_listeners_is_ok() {
        let emitter: EventEmitter<()> = EventEmitter::default();
        assert!(emitter.is_empty());
        assert!(emitter.emit(&()).is_ok());
    }
}
