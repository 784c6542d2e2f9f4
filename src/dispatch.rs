//! Per-dispatch context handed to every state machine.
//!
//! The host owns one [`DispatchContext`] and passes it into every dispatch.
//! State machines use it to record undoable operations and to ask the
//! dispatcher for list changes. Requests are queued and applied by
//! [`GlobalInteraction`](crate::GlobalInteraction) once the handler that made
//! them has returned, so no list is mutated while it is being iterated.

use std::fmt;

use crate::interactor::InteractorHandle;
use crate::operation::{NullUndo, Operation, OperationEvent, OperationEventIds, UndoController};
use crate::state_machine::{ListenerHandle, MachineId};

/// A change to the dispatcher's lists requested from inside a handler.
pub enum DispatchRequest {
    /// Put an interactor on the selected list
    Select(MachineId),
    /// Take an interactor off the selected list
    Deselect(MachineId),
    AddListener(ListenerHandle),
    RemoveListener(MachineId),
    AddInteractor(InteractorHandle),
    RemoveInteractor(MachineId),
}

impl fmt::Debug for DispatchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(id) => write!(f, "Select({})", id),
            Self::Deselect(id) => write!(f, "Deselect({})", id),
            Self::AddListener(l) => write!(f, "AddListener({})", l.borrow().machine_id()),
            Self::RemoveListener(id) => write!(f, "RemoveListener({})", id),
            Self::AddInteractor(i) => write!(f, "AddInteractor({})", i.borrow().machine_id()),
            Self::RemoveInteractor(id) => write!(f, "RemoveInteractor({})", id),
        }
    }
}

/// Undo controller, operation event ids and the request queue.
pub struct DispatchContext {
    undo: Box<dyn UndoController>,
    ids: OperationEventIds,
    requests: Vec<DispatchRequest>,
}

impl DispatchContext {
    pub fn new(undo: impl UndoController + 'static) -> Self {
        Self {
            undo: Box::new(undo),
            ids: OperationEventIds::default(),
            requests: Vec::new(),
        }
    }

    /// Context whose recorded operations are discarded.
    pub fn without_undo() -> Self {
        Self::new(NullUndo)
    }

    /// Record a (do, undo) pair executed by `target`.
    pub fn record(
        &mut self,
        target: MachineId,
        do_op: Operation,
        undo_op: Operation,
        description: impl Into<String>,
    ) -> bool {
        let event = OperationEvent {
            target,
            do_op,
            undo_op,
            description: description.into(),
            object_event_id: self.ids.current_object_event_id(),
            group_event_id: self.ids.current_group_event_id(),
        };
        self.undo.set_operation_event(event)
    }

    pub fn ids(&self) -> &OperationEventIds {
        &self.ids
    }

    pub fn ids_mut(&mut self) -> &mut OperationEventIds {
        &mut self.ids
    }

    /// Queue a request for the dispatcher.
    pub fn request(&mut self, request: DispatchRequest) {
        self.requests.push(request);
    }

    pub fn pending_requests(&self) -> &[DispatchRequest] {
        &self.requests
    }

    pub(crate) fn take_requests(&mut self) -> Vec<DispatchRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self::without_undo()
    }
}

impl fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchContext")
            .field("ids", &self.ids)
            .field("requests", &self.requests)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::undo::UndoStack;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_record_stamps_current_ids() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        ctx.ids_mut().inc_current_object_event_id();
        ctx.ids_mut().inc_current_object_event_id();

        let target = MachineId::next();
        assert!(ctx.record(
            target,
            Operation::TimeChange { time_step: 1 },
            Operation::TimeChange { time_step: 0 },
            "time"
        ));

        let event = stack.borrow_mut().pop_undo().unwrap();
        assert_eq!(event.object_event_id, 2);
        assert_eq!(event.target, target);
    }

    #[test]
    fn test_requests_are_drained() {
        let mut ctx = DispatchContext::default();
        let id = MachineId::next();
        ctx.request(DispatchRequest::Select(id));
        ctx.request(DispatchRequest::RemoveInteractor(id));
        assert_eq!(ctx.pending_requests().len(), 2);
        assert_eq!(ctx.take_requests().len(), 2);
        assert!(ctx.pending_requests().is_empty());
    }
}
