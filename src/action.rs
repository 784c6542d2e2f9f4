//! Action handlers.
//!
//! A state machine maps action ids from its pattern to handlers registered at
//! construction. A handler receives the machine itself, the action (with its
//! parameters), the triggering event and the dispatch context.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::dispatch::DispatchContext;
use crate::event::StateEvent;
use crate::state_graph::Action;

/// Signature of an action handler for machines of type `S`.
pub type ActionFn<S> = dyn Fn(&mut S, &Action, &StateEvent, &mut DispatchContext) -> bool;

/// A cloneable action handler.
///
/// Handlers are reference counted so the machine can take one out of its own
/// registry and call it with `&mut self`.
pub struct ActionHandler<S> {
    f: Rc<ActionFn<S>>,
}

impl<S> ActionHandler<S> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut S, &Action, &StateEvent, &mut DispatchContext) -> bool + 'static,
    {
        Self { f: Rc::new(f) }
    }

    pub fn call(
        &self,
        machine: &mut S,
        action: &Action,
        state_event: &StateEvent,
        ctx: &mut DispatchContext,
    ) -> bool {
        (self.f)(machine, action, state_event, ctx)
    }
}

impl<S> Clone for ActionHandler<S> {
    fn clone(&self) -> Self {
        Self {
            f: Rc::clone(&self.f),
        }
    }
}

impl<S> fmt::Debug for ActionHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandler").finish_non_exhaustive()
    }
}

/// Action id to handler map.
pub struct ActionRegistry<S> {
    handlers: HashMap<i32, ActionHandler<S>>,
}

impl<S> ActionRegistry<S> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. A later registration for the same id replaces the
    /// earlier one.
    pub fn register<F>(&mut self, action_id: i32, f: F)
    where
        F: Fn(&mut S, &Action, &StateEvent, &mut DispatchContext) -> bool + 'static,
    {
        self.handlers.insert(action_id, ActionHandler::new(f));
    }

    pub fn get(&self, action_id: i32) -> Option<&ActionHandler<S>> {
        self.handlers.get(&action_id)
    }

    pub fn contains(&self, action_id: i32) -> bool {
        self.handlers.contains_key(&action_id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<S> Default for ActionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for ActionRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        f.debug_struct("ActionRegistry").field("ids", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use mitk_input::{ButtonState, InputEvent, Key};

    struct Counter {
        hits: u32,
    }

    #[test]
    fn test_register_and_call() {
        let mut registry: ActionRegistry<Counter> = ActionRegistry::new();
        registry.register(100, |counter: &mut Counter, action, _, _| {
            counter.hits += action.properties.get_int("STEP").unwrap_or(1) as u32;
            true
        });
        assert!(registry.contains(100));
        assert!(!registry.contains(101));

        let mut counter = Counter { hits: 0 };
        let event = StateEvent::new(
            1,
            Event::new(InputEvent::key_press(Key::ESCAPE, ButtonState::NO_BUTTON)),
        );
        let mut ctx = DispatchContext::default();
        let handler = registry.get(100).cloned().unwrap();
        assert!(handler.call(&mut counter, &Action::new(100), &event, &mut ctx));
        assert_eq!(counter.hits, 1);
    }
}
