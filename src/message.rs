//! Multicast notifications.
//!
//! A [`Message`] holds any number of listener closures. Adding a listener
//! returns a [`DelegateId`] that removes it again.
//!
//! ```ignore
//! use mitk_interaction::Message;
//!
//! let mut changed: Message<usize> = Message::new();
//! let id = changed.add_listener(|count| println!("{count} points"));
//! changed.send(&3);
//! changed.remove_listener(id);
//! ```

use std::fmt;

/// Handle of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DelegateId(u64);

/// A list of listeners notified with a `&T`.
pub struct Message<T> {
    delegates: Vec<(DelegateId, Box<dyn Fn(&T)>)>,
    next_id: u64,
}

impl<T> Message<T> {
    pub fn new() -> Self {
        Self {
            delegates: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener.
    pub fn add_listener<F>(&mut self, f: F) -> DelegateId
    where
        F: Fn(&T) + 'static,
    {
        let id = DelegateId(self.next_id);
        self.next_id += 1;
        self.delegates.push((id, Box::new(f)));
        id
    }

    /// Unregister a listener. Returns false if the id is unknown.
    pub fn remove_listener(&mut self, id: DelegateId) -> bool {
        let before = self.delegates.len();
        self.delegates.retain(|(d, _)| *d != id);
        before != self.delegates.len()
    }

    /// Call every listener in registration order.
    pub fn send(&self, value: &T) {
        for (_, delegate) in &self.delegates {
            delegate(value);
        }
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    pub fn clear(&mut self) {
        self.delegates.clear();
    }
}

impl<T> Default for Message<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Message<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("listeners", &self.delegates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_send_reaches_all_listeners_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut message: Message<i32> = Message::new();
        let a = log.clone();
        message.add_listener(move |v| a.borrow_mut().push(("a", *v)));
        let b = log.clone();
        message.add_listener(move |v| b.borrow_mut().push(("b", *v)));

        message.send(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_remove_listener() {
        let hits = Rc::new(RefCell::new(0));
        let mut message: Message<()> = Message::new();
        let h = hits.clone();
        let id = message.add_listener(move |_| *h.borrow_mut() += 1);

        assert!(message.remove_listener(id));
        assert!(!message.remove_listener(id));
        message.send(&());
        assert_eq!(*hits.borrow(), 0);
        assert!(message.is_empty());
    }
}
