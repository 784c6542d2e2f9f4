//! State machines bound to a pattern.
//!
//! A concrete machine embeds a [`MachineCore`] and implements [`StateMachine`].
//! The core holds the shared pattern graph, one current state per time step and
//! the action handlers. Every [`StateMachine`] is also an [`EventHandler`], the
//! object-safe interface the dispatcher talks to.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::action::ActionRegistry;
use crate::dispatch::DispatchContext;
use crate::event::StateEvent;
use crate::operation::Operation;
use crate::state_graph::{Action, State, StateGraph, StateIndex};
use crate::state_machine_factory::StateMachineFactory;

/// Identity of a machine instance.
///
/// Recorded operations name their target by id; the dispatcher resolves ids to
/// live machines when undoing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MachineId(u64);

impl MachineId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Machine Core
// ============================================================================

/// Pattern binding and per-time-step state of one machine.
pub struct MachineCore<S> {
    id: MachineId,
    type_name: String,
    graph: Option<Rc<StateGraph>>,
    /// Current state per time step. Only ever grows.
    current: Vec<Option<StateIndex>>,
    time_step: usize,
    undo_enabled: bool,
    actions: ActionRegistry<S>,
}

impl<S> MachineCore<S> {
    /// Bind to a pattern loaded by `factory`.
    ///
    /// An unknown pattern is logged as an error; the resulting machine has no
    /// current state and rejects every event.
    pub fn new(type_name: &str, factory: &StateMachineFactory) -> Self {
        match factory.get_start_state(type_name) {
            Some(_) => Self::with_graph(type_name, factory.graph(type_name)),
            None => Self::with_graph(type_name, None),
        }
    }

    /// Bind to an already loaded graph.
    pub fn with_graph(type_name: &str, graph: Option<Rc<StateGraph>>) -> Self {
        let current = graph
            .as_ref()
            .and_then(|g| g.start_index())
            .map(|start| vec![Some(start)])
            .unwrap_or_default();
        Self {
            id: MachineId::next(),
            type_name: type_name.to_string(),
            graph,
            current,
            time_step: 0,
            undo_enabled: true,
            actions: ActionRegistry::new(),
        }
    }

    pub fn id(&self) -> MachineId {
        self.id
    }

    /// Bind to a different pattern, keeping id and action handlers.
    /// All time steps restart in the new start state.
    pub fn rebind(&mut self, type_name: &str, graph: Option<Rc<StateGraph>>) {
        self.current = graph
            .as_ref()
            .and_then(|g| g.start_index())
            .map(|start| vec![Some(start); self.current.len().max(1)])
            .unwrap_or_default();
        self.type_name = type_name.to_string();
        self.graph = graph;
    }

    /// Name of the pattern this machine runs.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn graph(&self) -> Option<&Rc<StateGraph>> {
        self.graph.as_ref()
    }

    pub fn actions(&self) -> &ActionRegistry<S> {
        &self.actions
    }

    pub fn actions_mut(&mut self) -> &mut ActionRegistry<S> {
        &mut self.actions
    }

    pub fn is_undo_enabled(&self) -> bool {
        self.undo_enabled
    }

    pub fn set_undo_enabled(&mut self, enabled: bool) {
        self.undo_enabled = enabled;
    }

    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Number of time steps with a state slot.
    pub fn time_step_count(&self) -> usize {
        self.current.len()
    }

    /// Current state at the active time step.
    pub fn current_state(&self) -> Option<&State> {
        self.state_at(self.time_step)
    }

    pub fn state_at(&self, time_step: usize) -> Option<&State> {
        let graph = self.graph.as_ref()?;
        let index = (*self.current.get(time_step)?)?;
        graph.get(index)
    }

    pub fn current_state_id(&self) -> Option<i32> {
        self.current_state().map(|s| s.id)
    }

    /// Whether the current state has a transition for `event_id`.
    pub fn has_transition(&self, event_id: i32) -> bool {
        self.current_state()
            .is_some_and(|state| state.has_transition(event_id))
    }

    /// Grow the state vector to `count` slots, filling new slots with the
    /// start state. Never shrinks.
    pub fn expand_time_steps(&mut self, count: usize) {
        if count <= self.current.len() {
            return;
        }
        let start = self.graph.as_ref().and_then(|g| g.start_index());
        if start.is_none() {
            return;
        }
        self.current.resize(count, start);
    }

    /// Put every time step back into the start state.
    pub fn reset_to_start_state(&mut self) {
        let start = self.graph.as_ref().and_then(|g| g.start_index());
        for slot in &mut self.current {
            *slot = start;
        }
    }

    /// Set the state of a time step by state id. Used to replay operations.
    pub fn set_state(&mut self, state_id: i32, time_step: usize) -> bool {
        let Some(index) = self.graph.as_ref().and_then(|g| g.index_of(state_id)) else {
            return false;
        };
        self.expand_time_steps(time_step + 1);
        match self.current.get_mut(time_step) {
            Some(slot) => {
                *slot = Some(index);
                true
            }
            None => false,
        }
    }

    /// Switch the active time step without recording anything.
    pub fn set_time_step(&mut self, time_step: usize) {
        self.expand_time_steps(time_step + 1);
        self.time_step = time_step;
    }
}

impl<S> fmt::Debug for MachineCore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MachineCore")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("current_state", &self.current_state_id())
            .field("time_step", &self.time_step)
            .field("undo_enabled", &self.undo_enabled)
            .field("actions", &self.actions)
            .finish()
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// A machine driven by a pattern.
///
/// Implementors only provide access to their [`MachineCore`]; the provided
/// methods implement event handling. Override
/// [`handle_state_event`](Self::handle_state_event) to intercept events before
/// the transition lookup, or [`apply_operation`](Self::apply_operation) to
/// execute additional operation kinds.
pub trait StateMachine: Sized + 'static {
    fn machine(&self) -> &MachineCore<Self>;

    fn machine_mut(&mut self) -> &mut MachineCore<Self>;

    /// Number of time steps the bound data has.
    fn time_step_count(&self) -> usize {
        1
    }

    /// Handle an event through the pattern.
    fn handle_state_event(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        dispatch_transition(self, state_event, ctx)
    }

    /// Run the handler registered for an action.
    ///
    /// A missing handler is not an error, but counts as a failed action.
    fn execute_action(
        &mut self,
        action: &Action,
        state_event: &StateEvent,
        ctx: &mut DispatchContext,
    ) -> bool {
        let Some(handler) = self.machine().actions().get(action.id).cloned() else {
            log::trace!(
                "'{}' has no handler for action {}",
                self.machine().type_name(),
                action.id
            );
            return false;
        };
        handler.call(self, action, state_event, ctx)
    }

    /// Switch the active time step, recording the change for undo.
    fn update_time_step(&mut self, time_step: usize, ctx: &mut DispatchContext) -> bool {
        let core = self.machine();
        let previous = core.time_step();
        if previous == time_step {
            return false;
        }
        if core.is_undo_enabled() {
            ctx.record(
                core.id(),
                Operation::TimeChange { time_step },
                Operation::TimeChange {
                    time_step: previous,
                },
                format!("{}: time step {} -> {}", core.type_name(), previous, time_step),
            );
        }
        self.machine_mut().set_time_step(time_step);
        true
    }

    /// Execute a replayed operation. Returns false for operations this machine
    /// does not understand.
    fn apply_operation(&mut self, operation: &Operation) -> bool {
        apply_machine_operation(self.machine_mut(), operation)
    }
}

/// Apply the operations every machine understands.
pub fn apply_machine_operation<S>(core: &mut MachineCore<S>, operation: &Operation) -> bool {
    match operation {
        Operation::StateChange {
            state_id,
            time_step,
        } => core.set_state(*state_id, *time_step),
        Operation::TimeChange { time_step } => {
            core.set_time_step(*time_step);
            true
        }
        _ => false,
    }
}

/// Default event handling.
///
/// 1. look up the transition for the event id in the state of the sender's
///    time step (or the active one)
/// 2. follow the sender's time step (undoable)
/// 3. change state if the target differs (undoable)
/// 4. run every action of the transition in order
///
/// Returns false without side effects when there is no current state or no
/// transition. Otherwise returns the logical AND of all action results.
pub fn dispatch_transition<S: StateMachine>(
    machine: &mut S,
    state_event: &StateEvent,
    ctx: &mut DispatchContext,
) -> bool {
    let core = machine.machine();
    let Some(graph) = core.graph().cloned() else {
        return false;
    };
    if core.time_step_count() == 0 {
        return false;
    }

    let sender_step = state_event.event.sender_time_step();
    let time_step = sender_step.unwrap_or(core.time_step());
    // Slots past the end would be created in the start state.
    let slot = match core.current.get(time_step) {
        Some(slot) => *slot,
        None => graph.start_index(),
    };
    let Some(current) = slot else {
        return false;
    };
    let state = graph.state(current);
    let Some(transition) = state.transition(state_event.id) else {
        return false;
    };
    let Some(next) = transition.next_state() else {
        return false;
    };

    if let Some(step) = sender_step {
        machine.update_time_step(step, ctx);
    }
    let count = machine.time_step_count();
    machine.machine_mut().expand_time_steps(count);

    let core = machine.machine();
    if next != current {
        let next_id = graph.state(next).id;
        if core.is_undo_enabled() {
            ctx.record(
                core.id(),
                Operation::StateChange {
                    state_id: next_id,
                    time_step,
                },
                Operation::StateChange {
                    state_id: state.id,
                    time_step,
                },
                format!("{}: state {} -> {}", core.type_name(), state.id, next_id),
            );
        }
        log::debug!(
            "{} '{}': {} -> {} on event {}",
            core.id(),
            core.type_name(),
            state.name,
            graph.state(next).name,
            state_event.id
        );
        machine.machine_mut().current[time_step] = Some(next);
    }

    let mut ok = true;
    for action in &transition.actions {
        ok &= machine.execute_action(action, state_event, ctx);
    }
    ok
}

// ============================================================================
// Event Handler
// ============================================================================

/// Object-safe view of a state machine used by the dispatcher.
pub trait EventHandler {
    fn machine_id(&self) -> MachineId;

    fn type_name(&self) -> &str;

    fn current_state_id(&self) -> Option<i32>;

    fn handle_event(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool;

    /// Execute a replayed operation without recording it.
    fn execute_operation(&mut self, operation: &Operation) -> bool;
}

impl<T: StateMachine> EventHandler for T {
    fn machine_id(&self) -> MachineId {
        self.machine().id()
    }

    fn type_name(&self) -> &str {
        self.machine().type_name()
    }

    fn current_state_id(&self) -> Option<i32> {
        self.machine().current_state_id()
    }

    fn handle_event(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        self.handle_state_event(state_event, ctx)
    }

    fn execute_operation(&mut self, operation: &Operation) -> bool {
        self.apply_operation(operation)
    }
}

/// Shared handle to a listener.
pub type ListenerHandle = Rc<RefCell<dyn EventHandler>>;

// ============================================================================
// Plain Machine
// ============================================================================

/// A state machine with nothing but registered action handlers.
///
/// Useful as a listener or for driving a pattern directly.
pub struct PlainStateMachine {
    core: MachineCore<PlainStateMachine>,
}

impl PlainStateMachine {
    pub fn new(type_name: &str, factory: &StateMachineFactory) -> Self {
        Self {
            core: MachineCore::new(type_name, factory),
        }
    }

    /// Register an action handler.
    pub fn on_action<F>(mut self, action_id: i32, f: F) -> Self
    where
        F: Fn(&mut PlainStateMachine, &Action, &StateEvent, &mut DispatchContext) -> bool
            + 'static,
    {
        self.core.actions_mut().register(action_id, f);
        self
    }
}

impl StateMachine for PlainStateMachine {
    fn machine(&self) -> &MachineCore<Self> {
        &self.core
    }

    fn machine_mut(&mut self) -> &mut MachineCore<Self> {
        &mut self.core
    }
}

impl fmt::Debug for PlainStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlainStateMachine")
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, RenderContext};
    use crate::geometry::Point3D;
    use crate::undo::UndoStack;
    use mitk_input::{ButtonState, InputEvent, Key, Point2D};
    use std::cell::Cell;

    const PATTERN: &str = r#"
        <stateMachine NAME="toggle">
          <state NAME="off" ID="0" START_STATE="TRUE">
            <transition NAME="switch on" NEXT_STATE_ID="1" EVENT_ID="10">
              <action ID="100" />
              <action ID="101" />
            </transition>
            <transition NAME="stay" NEXT_STATE_ID="0" EVENT_ID="11">
              <action ID="100" />
            </transition>
          </state>
          <state NAME="on" ID="1">
            <transition NAME="switch off" NEXT_STATE_ID="0" EVENT_ID="10" />
          </state>
        </stateMachine>
    "#;

    fn factory() -> StateMachineFactory {
        let mut factory = StateMachineFactory::new();
        factory.load_behavior_string(PATTERN).unwrap();
        factory
    }

    fn key_event(id: i32) -> StateEvent {
        StateEvent::new(
            id,
            Event::new(InputEvent::key_press(Key::SPACE, ButtonState::NO_BUTTON)),
        )
    }

    fn counting_machine(hits: Rc<Cell<u32>>) -> PlainStateMachine {
        PlainStateMachine::new("toggle", &factory()).on_action(100, move |_, _, _, _| {
            hits.set(hits.get() + 1);
            true
        })
    }

    #[test]
    fn test_transition_runs_actions_in_order() {
        let hits = Rc::new(Cell::new(0));
        let mut machine = counting_machine(hits.clone());
        let mut ctx = DispatchContext::default();

        // Action 101 has no handler, so the result is false, but the state
        // still changes and action 100 still runs.
        assert!(!machine.handle_event(&key_event(10), &mut ctx));
        assert_eq!(machine.current_state_id(), Some(1));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_unknown_event_has_no_side_effect() {
        let hits = Rc::new(Cell::new(0));
        let mut machine = counting_machine(hits.clone());
        let mut ctx = DispatchContext::default();

        assert!(!machine.handle_event(&key_event(99), &mut ctx));
        assert_eq!(machine.current_state_id(), Some(0));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_self_transition_is_not_recorded() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut machine = counting_machine(Rc::new(Cell::new(0)));

        assert!(machine.handle_event(&key_event(11), &mut ctx));
        assert_eq!(stack.borrow().undo_count(), 0);

        machine.handle_event(&key_event(10), &mut ctx);
        assert_eq!(stack.borrow().undo_count(), 1);
    }

    #[test]
    fn test_undo_disabled_records_nothing() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut machine = counting_machine(Rc::new(Cell::new(0)));
        machine.machine_mut().set_undo_enabled(false);

        machine.handle_event(&key_event(10), &mut ctx);
        assert_eq!(machine.current_state_id(), Some(1));
        assert_eq!(stack.borrow().undo_count(), 0);
    }

    #[test]
    fn test_recorded_state_change_can_be_replayed() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut machine = counting_machine(Rc::new(Cell::new(0)));

        machine.handle_event(&key_event(10), &mut ctx);
        let event = stack.borrow_mut().pop_undo().unwrap();
        assert_eq!(event.target, machine.machine_id());
        assert!(machine.execute_operation(&event.undo_op));
        assert_eq!(machine.current_state_id(), Some(0));
        assert!(machine.execute_operation(&event.do_op));
        assert_eq!(machine.current_state_id(), Some(1));
    }

    #[test]
    fn test_unknown_pattern_rejects_everything() {
        let mut machine = PlainStateMachine::new("missing", &factory());
        let mut ctx = DispatchContext::default();
        assert_eq!(machine.machine().time_step_count(), 0);
        assert!(!machine.handle_event(&key_event(10), &mut ctx));
        assert_eq!(machine.current_state_id(), None);
    }

    struct StepRenderer(usize);

    impl RenderContext for StepRenderer {
        fn time_step(&self) -> usize {
            self.0
        }

        fn pick_world_position(&self, _display: &Point2D) -> Option<Point3D> {
            None
        }

        fn request_update(&self) {}
    }

    #[test]
    fn test_sender_time_step_is_followed() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut machine = counting_machine(Rc::new(Cell::new(0)));

        let event = StateEvent::new(
            10,
            Event::new(InputEvent::key_press(Key::SPACE, ButtonState::NO_BUTTON))
                .with_sender(Rc::new(StepRenderer(2))),
        );
        machine.handle_event(&event, &mut ctx);

        assert_eq!(machine.machine().time_step(), 2);
        assert!(machine.machine().time_step_count() >= 3);
        // Time step 2 switched on, time step 0 is untouched.
        assert_eq!(machine.current_state_id(), Some(1));
        assert_eq!(machine.machine().state_at(0).map(|s| s.id), Some(0));
        // Time change and state change were both recorded.
        assert_eq!(stack.borrow().undo_count(), 2);
    }

    #[test]
    fn test_unknown_event_keeps_time_step() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut machine = counting_machine(Rc::new(Cell::new(0)));

        let event = StateEvent::new(
            9999,
            Event::new(InputEvent::key_press(Key::SPACE, ButtonState::NO_BUTTON))
                .with_sender(Rc::new(StepRenderer(3))),
        );
        assert!(!machine.handle_event(&event, &mut ctx));

        assert_eq!(machine.machine().time_step(), 0);
        assert_eq!(machine.machine().time_step_count(), 1);
        assert_eq!(stack.borrow().undo_count(), 0);
    }

    #[test]
    fn test_transition_is_looked_up_at_sender_time_step() {
        let mut ctx = DispatchContext::default();
        let mut machine = counting_machine(Rc::new(Cell::new(0)));
        machine.handle_event(&key_event(10), &mut ctx);
        assert_eq!(machine.current_state_id(), Some(1));

        // Time step 1 is still "off", where event 11 exists.
        let event = StateEvent::new(
            11,
            Event::new(InputEvent::key_press(Key::SPACE, ButtonState::NO_BUTTON))
                .with_sender(Rc::new(StepRenderer(1))),
        );
        assert!(machine.handle_event(&event, &mut ctx));
        assert_eq!(machine.machine().time_step(), 1);
        assert_eq!(machine.current_state_id(), Some(0));
        assert_eq!(machine.machine().state_at(0).map(|s| s.id), Some(1));
    }

    #[test]
    fn test_expand_never_shrinks() {
        let mut machine = counting_machine(Rc::new(Cell::new(0)));
        machine.machine_mut().expand_time_steps(4);
        machine.machine_mut().expand_time_steps(2);
        assert_eq!(machine.machine().time_step_count(), 4);
        assert!((0..4).all(|t| machine.machine().state_at(t).is_some()));
    }

    #[test]
    fn test_reset_to_start_state() {
        let mut machine = counting_machine(Rc::new(Cell::new(0)));
        let mut ctx = DispatchContext::default();
        machine.handle_event(&key_event(10), &mut ctx);
        machine.machine_mut().reset_to_start_state();
        assert_eq!(machine.current_state_id(), Some(0));
    }
}
