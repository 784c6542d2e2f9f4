//! mitk_interaction - Pattern-driven interaction engine
//!
//! Raw input events are mapped to numeric event ids through an XML event
//! table, then routed by [`GlobalInteraction`] to listeners and competing
//! interactors. Each listener or interactor is a state machine whose states,
//! transitions and actions come from an XML behavior file. Actions are plain
//! closures registered per action id; every state or data change they make is
//! recorded as an undoable [`Operation`].

mod action;
mod config;
pub mod constants;
mod dispatch;
mod display_vector_interactor;
mod error;
mod event;
mod event_mapper;
mod geometry;
mod global_interaction;
mod interactor;
mod logging;
mod message;
mod operation;
mod point_set;
mod point_set_interactor;
mod property;
mod state_graph;
mod state_machine;
mod state_machine_factory;
mod undo;
mod xml;

#[cfg(test)]
mod tests;

pub use action::{ActionFn, ActionHandler, ActionRegistry};
pub use config::{CONFIG_VERSION, ConfigError, InteractionConfig, LogLevel, UndoSettings};
pub use dispatch::{DispatchContext, DispatchRequest};
pub use display_vector_interactor::{
    DRAG_ZOOM_RATE, DisplayDestination, DisplayOperation, DisplayVectorInteractor,
    MIN_ZOOM_FACTOR, WHEEL_ZOOM_STEP,
};
pub use error::InteractionError;
pub use event::{Event, RenderContext, StateEvent};
pub use event_mapper::{EventDescription, EventMapper};
pub use geometry::{BoundingBox3D, Geometry3D, Point3D, Vector3D};
pub use global_interaction::{GlobalInteraction, Lifecycle};
pub use interactor::{
    DataElement, Interactive, Interactor, InteractorCore, InteractorHandle, InteractorMode,
    TRANSITION_SCORE, apply_interactor_operation, change_mode, default_jurisdiction,
    register_mode_actions, spatial_score,
};
#[cfg(not(target_arch = "wasm32"))]
pub use logging::{init_logging, init_with_level};
pub use message::{DelegateId, Message};
pub use operation::{
    NullUndo, Operation, OperationEvent, OperationEventIds, UndoController,
};
pub use point_set::{PointEntry, PointOpKind, PointOperation, PointSet};
pub use point_set_interactor::PointSetInteractor;
pub use property::{PropertyList, PropertyValue};
pub use state_graph::{Action, State, StateGraph, StateIndex, Transition, ValidationReport};
pub use state_machine::{
    EventHandler, ListenerHandle, MachineCore, MachineId, PlainStateMachine, StateMachine,
    apply_machine_operation, dispatch_transition,
};
pub use state_machine_factory::StateMachineFactory;
pub use undo::{UndoConfig, UndoStack};
pub use xml::BehaviorSource;

pub use mitk_input::{ButtonState, EventType, InputEvent, Key, Point2D};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BehaviorSource, DispatchContext, Event, EventHandler, GlobalInteraction, Interactor,
        InteractorMode, MachineCore, StateEvent, StateMachine, StateMachineFactory, UndoStack,
    };
    pub use mitk_input::prelude::*;
}
