//! Undo/Redo history for recorded operations.
//!
//! The stack stores [`OperationEvent`]s as they are recorded during dispatch.
//! Undoing pops every event that belongs to the same object event (one user
//! gesture) and hands the inverse operations back to the caller, which executes
//! them on their targets (see [`GlobalInteraction::undo`](crate::GlobalInteraction::undo)).

use crate::config::UndoSettings;
use crate::constants::DEFAULT_UNDO_HISTORY;
use crate::operation::{OperationEvent, UndoController};

// ============================================================================
// Undo Stack
// ============================================================================

#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Maximum number of operation events to keep in history
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_UNDO_HISTORY,
        }
    }
}

/// In-memory [`UndoController`].
///
/// Both stacks keep the most recent event at the end. Recording a new event
/// drops everything that could have been redone.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo_stack: Vec<OperationEvent>,
    redo_stack: Vec<OperationEvent>,
    config: UndoConfig,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Create from the undo section of an [`InteractionConfig`](crate::InteractionConfig).
    pub fn from_settings(settings: &UndoSettings) -> Self {
        Self::with_config(UndoConfig {
            max_history: settings.max_history,
        })
    }

    /// Record an event, trimming the oldest entries beyond `max_history`.
    pub fn push(&mut self, event: OperationEvent) {
        log::debug!(
            "📝 Undo: pushed '{}' (object {}, group {})",
            event.description,
            event.object_event_id,
            event.group_event_id
        );
        self.undo_stack.push(event);
        self.redo_stack.clear();

        while self.undo_stack.len() > self.config.max_history {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pop one event from the undo stack.
    /// The event is moved to the redo stack.
    pub fn pop_undo(&mut self) -> Option<OperationEvent> {
        let event = self.undo_stack.pop()?;
        log::debug!("⏪ Undo: '{}'", event.description);
        self.redo_stack.push(event.clone());
        Some(event)
    }

    /// Pop one event from the redo stack.
    /// The event is moved back to the undo stack.
    pub fn pop_redo(&mut self) -> Option<OperationEvent> {
        let event = self.redo_stack.pop()?;
        log::debug!("⏩ Redo: '{}'", event.description);
        self.undo_stack.push(event.clone());
        Some(event)
    }

    /// Pop every event sharing the most recent object event id.
    /// Events are returned newest first, in the order they must be undone.
    pub fn pop_undo_group(&mut self) -> Vec<OperationEvent> {
        let Some(object_id) = self.undo_stack.last().map(|e| e.object_event_id) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        while self
            .undo_stack
            .last()
            .is_some_and(|e| e.object_event_id == object_id)
        {
            if let Some(event) = self.pop_undo() {
                events.push(event);
            }
        }
        events
    }

    /// Pop every event sharing the object event id on top of the redo stack.
    /// Events are returned in the order they must be redone.
    pub fn pop_redo_group(&mut self) -> Vec<OperationEvent> {
        let Some(object_id) = self.redo_stack.last().map(|e| e.object_event_id) else {
            return Vec::new();
        };
        let mut events = Vec::new();
        while self
            .redo_stack
            .last()
            .is_some_and(|e| e.object_event_id == object_id)
        {
            if let Some(event) = self.pop_redo() {
                events.push(event);
            }
        }
        events
    }

    /// Get the description of the event that would be undone
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.description.as_str())
    }

    /// Get the description of the event that would be redone
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.description.as_str())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    /// Get the number of events in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of events in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl UndoController for UndoStack {
    fn set_operation_event(&mut self, event: OperationEvent) -> bool {
        self.push(event);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use crate::state_machine::MachineId;

    fn event(object: u64, state_id: i32) -> OperationEvent {
        OperationEvent {
            target: MachineId::next(),
            do_op: Operation::StateChange {
                state_id,
                time_step: 0,
            },
            undo_op: Operation::StateChange {
                state_id: state_id - 1,
                time_step: 0,
            },
            description: format!("to state {}", state_id),
            object_event_id: object,
            group_event_id: 0,
        }
    }

    #[test]
    fn test_push_clears_redo() {
        let mut stack = UndoStack::new();
        stack.push(event(1, 1));
        stack.pop_undo();
        assert!(stack.can_redo());
        stack.push(event(2, 2));
        assert!(!stack.can_redo());
        assert_eq!(stack.undo_count(), 1);
    }

    #[test]
    fn test_history_limit() {
        let mut stack = UndoStack::with_config(UndoConfig { max_history: 2 });
        for i in 1..=3 {
            stack.push(event(i, i as i32));
        }
        assert_eq!(stack.undo_count(), 2);
        assert_eq!(stack.undo_description(), Some("to state 3"));
    }

    #[test]
    fn test_group_pops_same_object_event() {
        let mut stack = UndoStack::new();
        stack.push(event(1, 1));
        stack.push(event(2, 2));
        stack.push(event(2, 3));

        let group = stack.pop_undo_group();
        assert_eq!(group.len(), 2);
        assert_eq!(group[0].description, "to state 3");
        assert_eq!(stack.undo_count(), 1);

        let redo = stack.pop_redo_group();
        assert_eq!(redo.len(), 2);
        assert_eq!(redo[0].description, "to state 2");
        assert_eq!(stack.undo_count(), 3);
    }

    #[test]
    fn test_controller_records() {
        let mut stack = UndoStack::new();
        assert!(stack.set_operation_event(event(1, 1)));
        assert!(stack.can_undo());
        stack.clear();
        assert!(!stack.can_undo());
    }
}
