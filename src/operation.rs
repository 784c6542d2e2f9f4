//! Undoable operations.
//!
//! Every state change and data edit performed during dispatch is described as
//! an [`Operation`]. The pair (do, undo) is handed to an [`UndoController`]
//! together with the id of the machine that can execute it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::operation_ids::{
    OPMODECHANGE, OPNOTHING, OPSTATECHANGE, OPTIMECHANGE,
};
use crate::display_vector_interactor::DisplayOperation;
use crate::interactor::InteractorMode;
use crate::point_set::PointOperation;
use crate::state_machine::MachineId;

// ============================================================================
// Operation Types
// ============================================================================

/// Something a state machine, interactor or data element can execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Does nothing
    Nothing,
    /// Set the current state for a time step
    StateChange {
        /// Id of the state to enter
        state_id: i32,
        /// Time step whose slot changes
        time_step: usize,
    },
    /// Switch the active time step
    TimeChange {
        /// Time step to activate
        time_step: usize,
    },
    /// Change an interactor's selection mode
    ModeChange {
        /// Mode to enter
        mode: InteractorMode,
    },
    /// Edit a point set
    Point(PointOperation),
    /// Move or zoom a display
    Display(DisplayOperation),
}

impl Operation {
    /// Numeric operation type (`Op*` ids).
    pub fn operation_type(&self) -> i32 {
        match self {
            Operation::Nothing => OPNOTHING,
            Operation::StateChange { .. } => OPSTATECHANGE,
            Operation::TimeChange { .. } => OPTIMECHANGE,
            Operation::ModeChange { .. } => OPMODECHANGE,
            Operation::Point(op) => op.kind.operation_type(),
            Operation::Display(op) => op.operation_type(),
        }
    }
}

/// A recorded (do, undo) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationEvent {
    /// Machine that executes both operations
    pub target: MachineId,
    pub do_op: Operation,
    pub undo_op: Operation,
    pub description: String,
    /// Events sharing this id are undone together
    pub object_event_id: u64,
    pub group_event_id: u64,
}

// ============================================================================
// Event Ids
// ============================================================================

/// Counters grouping recorded operations.
///
/// The object event id changes with every new user gesture (see
/// [`EventMapper::map_to_state_event`](crate::EventMapper::map_to_state_event)).
/// The group event id is bumped by interactors at the end of a logical edit;
/// the bump is applied with the next mapped event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationEventIds {
    object_event_id: u64,
    group_event_id: u64,
    group_increment_pending: bool,
}

impl OperationEventIds {
    pub fn current_object_event_id(&self) -> u64 {
        self.object_event_id
    }

    pub fn current_group_event_id(&self) -> u64 {
        self.group_event_id
    }

    pub fn inc_current_object_event_id(&mut self) {
        self.object_event_id += 1;
    }

    /// Request a new group id for the next event.
    pub fn inc_current_group_event_id(&mut self) {
        self.group_increment_pending = true;
    }

    /// Apply a pending group id increment.
    pub fn execute_increment(&mut self) {
        if self.group_increment_pending {
            self.group_event_id += 1;
            self.group_increment_pending = false;
        }
    }
}

// ============================================================================
// Undo Controller
// ============================================================================

/// Receiver for recorded operations.
pub trait UndoController {
    /// Record an operation event. Returns false if it was rejected.
    fn set_operation_event(&mut self, event: OperationEvent) -> bool;
}

impl<T: UndoController + ?Sized> UndoController for Rc<RefCell<T>> {
    fn set_operation_event(&mut self, event: OperationEvent) -> bool {
        self.borrow_mut().set_operation_event(event)
    }
}

impl<T: UndoController + ?Sized> UndoController for Box<T> {
    fn set_operation_event(&mut self, event: OperationEvent) -> bool {
        (**self).set_operation_event(event)
    }
}

/// Controller that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullUndo;

impl UndoController for NullUndo {
    fn set_operation_event(&mut self, _event: OperationEvent) -> bool {
        true
    }
}
