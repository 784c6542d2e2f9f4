//! Interactors: state machines bound to a data element.
//!
//! Interactors compete for events. The dispatcher asks each one for its
//! jurisdiction, a score in `[0, 1]`, and offers the event to the best scoring
//! interactors first. Interactors also carry a selection mode; selected
//! interactors get events before any scoring happens.

use mitk_input::EventType;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::action_ids::{ACMODEDESELECT, ACMODESELECT, ACMODESUBSELECT};
use crate::dispatch::{DispatchContext, DispatchRequest};
use crate::event::StateEvent;
use crate::geometry::{Geometry3D, Point3D};
use crate::operation::Operation;
use crate::state_machine::{EventHandler, MachineCore, StateMachine, apply_machine_operation};

/// Selection mode of an interactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InteractorMode {
    #[default]
    Deselected,
    Selected,
    SubSelected,
}

impl InteractorMode {
    /// Selected and sub-selected interactors are asked before scoring.
    pub fn is_selected(&self) -> bool {
        !matches!(self, InteractorMode::Deselected)
    }
}

/// What an interactor needs to know about its data.
pub trait DataElement {
    fn name(&self) -> &str;

    /// Number of time steps; at least 1.
    fn time_steps(&self) -> usize {
        1
    }

    /// Geometry at a time step, if the data has an extent.
    fn geometry(&self, time_step: usize) -> Option<Geometry3D>;
}

/// Interactor state shared by all interactor types.
#[derive(Debug, Clone, Default)]
pub struct InteractorCore {
    mode: InteractorMode,
}

impl InteractorCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractorMode {
        self.mode
    }
}

// ============================================================================
// Interactor
// ============================================================================

/// A state machine with a data element, a selection mode and a jurisdiction.
///
/// Implementors call [`register_mode_actions`] when building their action
/// registry, report the data's time steps from
/// [`StateMachine::time_step_count`] and forward unknown operations to
/// [`apply_interactor_operation`].
pub trait Interactor: StateMachine {
    fn interactor(&self) -> &InteractorCore;

    fn interactor_mut(&mut self) -> &mut InteractorCore;

    fn data(&self) -> &dyn DataElement;

    fn mode(&self) -> InteractorMode {
        self.interactor().mode()
    }

    /// How strongly this interactor claims an event.
    fn calculate_jurisdiction(&self, state_event: &StateEvent) -> f32 {
        default_jurisdiction(self, state_event)
    }
}

/// Register the deselect/select/sub-select actions.
pub fn register_mode_actions<S: Interactor>(core: &mut MachineCore<S>) {
    let actions = core.actions_mut();
    actions.register(ACMODEDESELECT, |s: &mut S, _, _, ctx| {
        change_mode(s, InteractorMode::Deselected, ctx)
    });
    actions.register(ACMODESELECT, |s: &mut S, _, _, ctx| {
        change_mode(s, InteractorMode::Selected, ctx)
    });
    actions.register(ACMODESUBSELECT, |s: &mut S, _, _, ctx| {
        change_mode(s, InteractorMode::SubSelected, ctx)
    });
}

/// Change the selection mode, record it for undo and ask the dispatcher to
/// update its selected list.
pub fn change_mode<S: Interactor>(
    interactor: &mut S,
    mode: InteractorMode,
    ctx: &mut DispatchContext,
) -> bool {
    let previous = interactor.mode();
    let core = interactor.machine();
    let id = core.id();
    if previous != mode {
        if core.is_undo_enabled() {
            ctx.record(
                id,
                Operation::ModeChange { mode },
                Operation::ModeChange { mode: previous },
                format!("{}: mode {:?} -> {:?}", core.type_name(), previous, mode),
            );
        }
        interactor.interactor_mut().mode = mode;
    }
    if mode.is_selected() {
        ctx.request(DispatchRequest::Select(id));
    } else {
        ctx.request(DispatchRequest::Deselect(id));
    }
    true
}

/// Operations understood by every interactor: state, time and mode changes.
pub fn apply_interactor_operation<S: Interactor>(interactor: &mut S, operation: &Operation) -> bool {
    match operation {
        Operation::ModeChange { mode } => {
            interactor.interactor_mut().mode = *mode;
            true
        }
        other => apply_machine_operation(interactor.machine_mut(), other),
    }
}

// ============================================================================
// Jurisdiction
// ============================================================================

/// Score assigned when the current state has a transition for the event.
pub const TRANSITION_SCORE: f32 = 0.5;

/// Standard jurisdiction.
///
/// - mouse moves score 0
/// - key events score [`TRANSITION_SCORE`] if the current state can take the
///   event id, otherwise 0
/// - positional events score the larger of the transition score and the
///   [`spatial_score`] of the event's world position
pub fn default_jurisdiction<S: Interactor>(interactor: &S, state_event: &StateEvent) -> f32 {
    let input = &state_event.event.input;
    if input.event_type == EventType::MOUSE_MOVE {
        return 0.0;
    }

    let transition_score = if interactor.machine().has_transition(state_event.id) {
        TRANSITION_SCORE
    } else {
        0.0
    };
    if !input.is_positional() {
        return transition_score;
    }

    let time_step = interactor.machine().time_step();
    let spatial = match (
        interactor.data().geometry(time_step),
        state_event.event.world_position(),
    ) {
        (Some(geometry), Some(world)) => spatial_score(&geometry, &world),
        _ => 0.0,
    };
    spatial.max(transition_score)
}

/// Score of a world position relative to a data element's bounding box.
///
/// The normalized distance from the box center (0 at the center, 1 at a
/// corner) is inverted and mapped to `[0.5, 1.0]` inside the box and to
/// `[0, 0.5)` outside it. Degenerate boxes score 0.
pub fn spatial_score(geometry: &Geometry3D, world: &Point3D) -> f32 {
    let bounds = &geometry.bounds;
    if bounds.is_degenerate() {
        return 0.0;
    }
    let index = geometry.world_to_index(world);
    let normalized = (index.distance(&bounds.center()) / bounds.half_diagonal()).min(1.0);
    let closeness = 1.0 - normalized;
    let score = if bounds.contains(&index) {
        0.5 + 0.5 * closeness
    } else {
        0.5 * closeness
    };
    score as f32
}

// ============================================================================
// Object-safe Interface
// ============================================================================

/// Object-safe view of an interactor used by the dispatcher.
pub trait Interactive: EventHandler {
    fn current_mode(&self) -> InteractorMode;

    fn jurisdiction(&self, state_event: &StateEvent) -> f32;

    fn data_name(&self) -> String;
}

impl<T: Interactor> Interactive for T {
    fn current_mode(&self) -> InteractorMode {
        Interactor::mode(self)
    }

    fn jurisdiction(&self, state_event: &StateEvent) -> f32 {
        self.calculate_jurisdiction(state_event).clamp(0.0, 1.0)
    }

    fn data_name(&self) -> String {
        self.data().name().to_string()
    }
}

/// Shared handle to an interactor.
pub type InteractorHandle = Rc<RefCell<dyn Interactive>>;
