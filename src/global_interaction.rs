//! The root dispatcher.
//!
//! [`GlobalInteraction`] owns the loaded behavior (patterns and event table),
//! the registered listeners and interactors, and routes every mapped event:
//!
//! 1. every listener is informed;
//! 2. selected interactors are offered the event; if any accepts, dispatch ends;
//! 3. otherwise interactors are ranked by jurisdiction and offered the event in
//!    descending order until one accepts.
//!
//! The ranking is kept between gestures. A gesture starts with a press (or any
//! event that opens a new object event); repeating the same start (same id at
//! the same display position) continues the walk where the previous one
//! stopped, so repeated clicks on overlapping objects reach the objects
//! underneath. Moves and releases in between are offered along a fresh ranking
//! and leave the walk alone. When the walk runs off the end, the next gesture
//! starts again from the top.
//!
//! The dispatcher is itself a state machine. When initialized with a pattern
//! name, that pattern decides which events are dispatched through the actions
//! `AcINFORMLISTENERS` and `AcASKINTERACTORS`. With an empty pattern name every
//! mapped event runs both steps.
//!
//! Handlers never touch the dispatcher directly. They queue
//! [`DispatchRequest`]s on the [`DispatchContext`]; selection changes are applied
//! as soon as the handler returns, removals once the current pass is over.

use std::fmt;

use crate::config::InteractionConfig;
use crate::constants::DEFAULT_JURISDICTION_THRESHOLD;
use crate::constants::action_ids::{ACASKINTERACTORS, ACDONOTHING, ACINFORMLISTENERS};
use crate::dispatch::{DispatchContext, DispatchRequest};
use crate::error::InteractionError;
use crate::event::{Event, StateEvent};
use crate::event_mapper::{EventMapper, starts_object_event};
use crate::interactor::InteractorHandle;
use crate::operation::{Operation, OperationEvent};
use crate::state_machine::{
    EventHandler, ListenerHandle, MachineCore, MachineId, StateMachine, dispatch_transition,
};
use crate::state_machine_factory::StateMachineFactory;
use crate::undo::UndoStack;
use crate::xml::BehaviorSource;

/// Lifecycle of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    ShutDown,
}

/// A registered handle together with its id.
///
/// The id is cached so that list maintenance never needs to borrow a handle
/// that might be in use.
struct Entry<H> {
    id: MachineId,
    handle: H,
}

impl<H: Clone> Clone for Entry<H> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handle: self.handle.clone(),
        }
    }
}

struct Ranked {
    score: f32,
    entry: Entry<InteractorHandle>,
}

/// What makes two gesture starts "the same" for the jurisdiction walk.
#[derive(Debug, Clone, PartialEq)]
struct GestureKey {
    event_id: i32,
    position: Option<(f64, f64)>,
}

impl GestureKey {
    fn of(state_event: &StateEvent) -> Self {
        Self {
            event_id: state_event.id,
            position: state_event
                .event
                .input
                .display_position
                .map(|p| (p.x, p.y)),
        }
    }
}

// ============================================================================
// Global Interaction
// ============================================================================

/// Root dispatcher for listeners and interactors.
pub struct GlobalInteraction {
    core: MachineCore<GlobalInteraction>,
    lifecycle: Lifecycle,
    factory: StateMachineFactory,
    event_mapper: EventMapper,
    listeners: Vec<Entry<ListenerHandle>>,
    interactors: Vec<Entry<InteractorHandle>>,
    selected: Vec<Entry<InteractorHandle>>,
    jurisdiction_map: Vec<Ranked>,
    jurisdiction_cursor: Option<usize>,
    last_gesture: Option<GestureKey>,
    threshold: f32,
    dispatching: usize,
    pending_listener_removals: Vec<MachineId>,
    pending_interactor_removals: Vec<MachineId>,
}

impl GlobalInteraction {
    /// Create an uninitialized dispatcher.
    pub fn new() -> Self {
        let mut core = MachineCore::with_graph("", None);
        core.set_undo_enabled(false);
        let actions = core.actions_mut();
        actions.register(ACDONOTHING, |_: &mut GlobalInteraction, _, _, _| true);
        actions.register(ACINFORMLISTENERS, |gi: &mut GlobalInteraction, _, se, ctx| {
            gi.inform_listeners(se, ctx);
            true
        });
        actions.register(ACASKINTERACTORS, |gi: &mut GlobalInteraction, _, se, ctx| {
            gi.ask_interactors(se, ctx)
        });

        Self {
            core,
            lifecycle: Lifecycle::Uninitialized,
            factory: StateMachineFactory::new(),
            event_mapper: EventMapper::new(),
            listeners: Vec::new(),
            interactors: Vec::new(),
            selected: Vec::new(),
            jurisdiction_map: Vec::new(),
            jurisdiction_cursor: None,
            last_gesture: None,
            threshold: DEFAULT_JURISDICTION_THRESHOLD,
            dispatching: 0,
            pending_listener_removals: Vec::new(),
            pending_interactor_removals: Vec::new(),
        }
    }

    /// Create and initialize from a configuration.
    ///
    /// Uses the configured behavior file, or an empty behavior when none is set.
    pub fn from_config(config: &InteractionConfig) -> Result<Self, InteractionError> {
        let mut global = Self::new();
        global.set_jurisdiction_threshold(config.jurisdiction_threshold);
        let source = match &config.behavior_file {
            Some(path) => BehaviorSource::file(path),
            None => BehaviorSource::string("<behavior />"),
        };
        global.initialize(&config.global_pattern, &source)?;
        Ok(global)
    }

    /// Load the behavior and bind the dispatch pattern.
    ///
    /// The document may contain `<events>` and `<stateMachine>` sections side
    /// by side; both are loaded. An empty `pattern` selects the built-in
    /// protocol. Returns `Ok(false)` without doing anything if the dispatcher
    /// was already initialized (or shut down).
    pub fn initialize(
        &mut self,
        pattern: &str,
        source: &BehaviorSource,
    ) -> Result<bool, InteractionError> {
        match self.lifecycle {
            Lifecycle::Initialized => {
                log::warn!("GlobalInteraction is already initialized; ignoring second initialize");
                return Ok(false);
            }
            Lifecycle::ShutDown => {
                log::warn!("GlobalInteraction was shut down and cannot be initialized again");
                return Ok(false);
            }
            Lifecycle::Uninitialized => {}
        }

        let xml = source.read()?;
        let mut factory = StateMachineFactory::new();
        factory.load_behavior_string(&xml)?;
        let mut event_mapper = EventMapper::new();
        event_mapper.load_behavior_string(&xml)?;

        let graph = if pattern.is_empty() {
            None
        } else {
            if factory.get_start_state(pattern).is_none() {
                return Err(InteractionError::unknown_pattern(pattern));
            }
            factory.graph(pattern)
        };

        self.core.rebind(pattern, graph);
        self.factory = factory;
        self.event_mapper = event_mapper;
        self.lifecycle = Lifecycle::Initialized;

        log::info!(
            "🎮 GlobalInteraction initialized from {} ({} patterns, {} events, dispatch pattern '{}')",
            source.describe(),
            self.factory.len(),
            self.event_mapper.descriptions().len(),
            if pattern.is_empty() { "<built-in>" } else { pattern }
        );
        Ok(true)
    }

    /// Drop all listeners and interactors. Dispatch fails afterwards.
    pub fn shutdown(&mut self) {
        self.listeners.clear();
        self.interactors.clear();
        self.selected.clear();
        self.reset_jurisdiction_map();
        self.pending_listener_removals.clear();
        self.pending_interactor_removals.clear();
        self.lifecycle = Lifecycle::ShutDown;
        log::info!("GlobalInteraction shut down");
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle == Lifecycle::Initialized
    }

    pub fn factory(&self) -> &StateMachineFactory {
        &self.factory
    }

    pub fn event_mapper(&self) -> &EventMapper {
        &self.event_mapper
    }

    pub fn event_mapper_mut(&mut self) -> &mut EventMapper {
        &mut self.event_mapper
    }

    /// Scores at or below the threshold never enter the jurisdiction map.
    pub fn set_jurisdiction_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn jurisdiction_threshold(&self) -> f32 {
        self.threshold
    }

    // ------------------------------------------------------------------------
    // Entry point
    // ------------------------------------------------------------------------

    /// Map a raw event and dispatch it.
    ///
    /// `explicit_id` 0 looks the id up in the event table; any other value is
    /// used directly. Returns whether anything handled the event.
    pub fn map_event(&mut self, event: &Event, explicit_id: i32, ctx: &mut DispatchContext) -> bool {
        if !self.is_initialized() {
            log::error!("Event dropped: {}", InteractionError::NotInitialized);
            return false;
        }
        let Some(state_event) = self
            .event_mapper
            .map_to_state_event(event, explicit_id, ctx.ids_mut())
        else {
            return false;
        };
        if let Some(global) = self.event_mapper.global_state_machine().cloned() {
            return global.borrow_mut().handle_event(&state_event, ctx);
        }
        self.handle_event(&state_event, ctx)
    }

    /// Built-in protocol: inform listeners, then ask interactors.
    fn dispatch_builtin(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        self.inform_listeners(state_event, ctx);
        self.ask_interactors(state_event, ctx)
    }

    // ------------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------------

    /// Register a listener. Returns false if it is already registered.
    pub fn add_listener(&mut self, listener: ListenerHandle) -> bool {
        let id = listener.borrow().machine_id();
        if self.listeners.iter().any(|e| e.id == id) {
            return false;
        }
        self.pending_listener_removals.retain(|pending| *pending != id);
        log::debug!("Listener {} ('{}') added", id, listener.borrow().type_name());
        self.listeners.push(Entry {
            id,
            handle: listener,
        });
        true
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: MachineId) -> bool {
        if self.dispatching > 0 {
            if !self.pending_listener_removals.contains(&id) {
                self.pending_listener_removals.push(id);
            }
            return self.listeners.iter().any(|e| e.id == id);
        }
        let before = self.listeners.len();
        self.listeners.retain(|e| e.id != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Offer the event to every listener.
    fn inform_listeners(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) {
        self.dispatching += 1;
        let snapshot: Vec<Entry<ListenerHandle>> = self.listeners.clone();
        for entry in &snapshot {
            if self.pending_listener_removals.contains(&entry.id) {
                continue;
            }
            entry.handle.borrow_mut().handle_event(state_event, ctx);
            self.apply_requests(ctx);
        }
        self.dispatching -= 1;
        self.flush_pending_removals();
    }

    // ------------------------------------------------------------------------
    // Interactors
    // ------------------------------------------------------------------------

    /// Register an interactor. Returns false if it is already registered.
    ///
    /// An interactor that is already in a selected mode also joins the selected
    /// list.
    pub fn add_interactor(&mut self, interactor: InteractorHandle) -> bool {
        let (id, selected) = {
            let it = interactor.borrow();
            (it.machine_id(), it.current_mode().is_selected())
        };
        if self.interactors.iter().any(|e| e.id == id) {
            return false;
        }
        self.pending_interactor_removals.retain(|pending| *pending != id);
        log::debug!(
            "Interactor {} ('{}' on '{}') added",
            id,
            interactor.borrow().type_name(),
            interactor.borrow().data_name()
        );
        let entry = Entry {
            id,
            handle: interactor,
        };
        if selected {
            self.selected.push(entry.clone());
        }
        self.interactors.push(entry);
        true
    }

    /// Remove an interactor, also from the selected list and the jurisdiction
    /// map. Returns false if it was not registered.
    pub fn remove_interactor(&mut self, id: MachineId) -> bool {
        let registered = self.interactors.iter().any(|e| e.id == id);
        if self.dispatching > 0 {
            if registered && !self.pending_interactor_removals.contains(&id) {
                self.pending_interactor_removals.push(id);
            }
            return registered;
        }
        self.interactors.retain(|e| e.id != id);
        self.selected.retain(|e| e.id != id);
        if self.jurisdiction_map.iter().any(|r| r.entry.id == id) {
            self.reset_jurisdiction_map();
        }
        if registered {
            log::debug!("Interactor {} removed", id);
        }
        registered
    }

    pub fn interactor_count(&self) -> usize {
        self.interactors.len()
    }

    pub fn contains_interactor(&self, id: MachineId) -> bool {
        self.interactors.iter().any(|e| e.id == id)
    }

    /// Put a registered interactor on the selected list.
    pub fn add_to_selected(&mut self, id: MachineId) -> bool {
        if self.selected.iter().any(|e| e.id == id) {
            return false;
        }
        match self.interactors.iter().find(|e| e.id == id) {
            Some(entry) => {
                self.selected.push(entry.clone());
                true
            }
            None => false,
        }
    }

    /// Take an interactor off the selected list.
    pub fn remove_from_selected(&mut self, id: MachineId) -> bool {
        let before = self.selected.len();
        self.selected.retain(|e| e.id != id);
        before != self.selected.len()
    }

    /// Ids of the selected interactors, in selection order.
    pub fn selected_interactors(&self) -> Vec<MachineId> {
        self.selected.iter().map(|e| e.id).collect()
    }

    /// The current ranking, best first.
    pub fn jurisdiction_ranking(&self) -> Vec<(MachineId, f32)> {
        self.jurisdiction_map
            .iter()
            .map(|r| (r.entry.id, r.score))
            .collect()
    }

    /// Position of the next interactor to ask, or `None` when the next event
    /// rebuilds the ranking.
    pub fn jurisdiction_cursor(&self) -> Option<usize> {
        self.jurisdiction_cursor
    }

    /// Offer the event to selected interactors, then walk the ranking.
    fn ask_interactors(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        self.dispatching += 1;
        let mut handled = self.ask_selected(state_event, ctx);
        if !handled {
            handled = self.ask_current_interactor(state_event, ctx);
        }
        self.dispatching -= 1;
        self.flush_pending_removals();
        handled
    }

    fn ask_selected(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let snapshot: Vec<Entry<InteractorHandle>> = self.selected.clone();
        let mut handled = false;
        for entry in &snapshot {
            if self.pending_interactor_removals.contains(&entry.id) {
                continue;
            }
            handled |= entry.handle.borrow_mut().handle_event(state_event, ctx);
            self.apply_requests(ctx);
        }
        handled
    }

    /// Rank all interactors whose score exceeds the threshold, best first.
    /// Equal scores keep registration order.
    fn rank(&self, state_event: &StateEvent) -> Vec<Ranked> {
        let mut ranking: Vec<Ranked> = self
            .interactors
            .iter()
            .filter(|entry| !self.pending_interactor_removals.contains(&entry.id))
            .filter_map(|entry| {
                let score = entry.handle.borrow().jurisdiction(state_event);
                (score > self.threshold).then(|| Ranked {
                    score,
                    entry: entry.clone(),
                })
            })
            .collect();
        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranking
    }

    fn ask_current_interactor(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if !starts_object_event(state_event.event.input.event_type) {
            return self.ask_ranked(state_event, ctx);
        }

        let gesture = GestureKey::of(state_event);
        if self.jurisdiction_cursor.is_none() || self.last_gesture.as_ref() != Some(&gesture) {
            self.jurisdiction_map = self.rank(state_event);
            self.jurisdiction_cursor = (!self.jurisdiction_map.is_empty()).then_some(0);
        }
        self.last_gesture = Some(gesture);

        while let Some(position) = self.jurisdiction_cursor {
            let Some(ranked) = self.jurisdiction_map.get(position) else {
                self.jurisdiction_cursor = None;
                break;
            };
            let entry = ranked.entry.clone();
            let next = position + 1;
            self.jurisdiction_cursor = (next < self.jurisdiction_map.len()).then_some(next);

            if self.pending_interactor_removals.contains(&entry.id) {
                continue;
            }
            let handled = entry.handle.borrow_mut().handle_event(state_event, ctx);
            self.apply_requests(ctx);
            if handled {
                return true;
            }
        }
        false
    }

    /// Offer a follow-up event (move, release) along a fresh ranking without
    /// touching the walk.
    fn ask_ranked(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        for ranked in self.rank(state_event) {
            if self.pending_interactor_removals.contains(&ranked.entry.id) {
                continue;
            }
            let handled = ranked.entry.handle.borrow_mut().handle_event(state_event, ctx);
            self.apply_requests(ctx);
            if handled {
                return true;
            }
        }
        false
    }

    fn reset_jurisdiction_map(&mut self) {
        self.jurisdiction_map.clear();
        self.jurisdiction_cursor = None;
        self.last_gesture = None;
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    fn apply_requests(&mut self, ctx: &mut DispatchContext) {
        for request in ctx.take_requests() {
            match request {
                DispatchRequest::Select(id) => {
                    self.add_to_selected(id);
                }
                DispatchRequest::Deselect(id) => {
                    self.remove_from_selected(id);
                }
                DispatchRequest::AddListener(listener) => {
                    self.add_listener(listener);
                }
                DispatchRequest::RemoveListener(id) => {
                    self.remove_listener(id);
                }
                DispatchRequest::AddInteractor(interactor) => {
                    self.add_interactor(interactor);
                }
                DispatchRequest::RemoveInteractor(id) => {
                    self.remove_interactor(id);
                }
            }
        }
    }

    fn flush_pending_removals(&mut self) {
        if self.dispatching > 0 {
            return;
        }
        for id in std::mem::take(&mut self.pending_listener_removals) {
            self.remove_listener(id);
        }
        for id in std::mem::take(&mut self.pending_interactor_removals) {
            self.remove_interactor(id);
        }
    }

    // ------------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------------

    /// Execute an operation on the machine with the given id.
    pub fn execute_on(&mut self, target: MachineId, operation: &Operation) -> bool {
        if target == self.core.id() {
            return self.apply_operation(operation);
        }
        if let Some(entry) = self.interactors.iter().find(|e| e.id == target).cloned() {
            let (ok, selected) = {
                let mut interactor = entry.handle.borrow_mut();
                let ok = interactor.execute_operation(operation);
                (ok, interactor.current_mode().is_selected())
            };
            if matches!(operation, Operation::ModeChange { .. }) {
                if selected {
                    self.add_to_selected(target);
                } else {
                    self.remove_from_selected(target);
                }
            }
            return ok;
        }
        if let Some(entry) = self.listeners.iter().find(|e| e.id == target) {
            return entry.handle.borrow_mut().execute_operation(operation);
        }
        log::warn!("No machine {} to execute {:?}", target, operation);
        false
    }

    /// Undo the most recent gesture recorded in `stack`.
    pub fn undo(&mut self, stack: &mut UndoStack) -> bool {
        let events = stack.pop_undo_group();
        self.replay(&events, |e| &e.undo_op)
    }

    /// Redo the most recently undone gesture.
    pub fn redo(&mut self, stack: &mut UndoStack) -> bool {
        let events = stack.pop_redo_group();
        self.replay(&events, |e| &e.do_op)
    }

    fn replay(
        &mut self,
        events: &[OperationEvent],
        pick: impl Fn(&OperationEvent) -> &Operation,
    ) -> bool {
        if events.is_empty() {
            return false;
        }
        let mut ok = true;
        for event in events {
            ok &= self.execute_on(event.target, pick(event));
        }
        ok
    }
}

impl Default for GlobalInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine for GlobalInteraction {
    fn machine(&self) -> &MachineCore<Self> {
        &self.core
    }

    fn machine_mut(&mut self) -> &mut MachineCore<Self> {
        &mut self.core
    }

    fn handle_state_event(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if !self.is_initialized() {
            log::error!("Event dropped: {}", InteractionError::NotInitialized);
            return false;
        }
        if self.core.graph().is_none() {
            return self.dispatch_builtin(state_event, ctx);
        }
        dispatch_transition(self, state_event, ctx)
    }
}

impl fmt::Debug for GlobalInteraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalInteraction")
            .field("lifecycle", &self.lifecycle)
            .field("pattern", &self.core.type_name())
            .field("listeners", &self.listeners.len())
            .field("interactors", &self.interactors.len())
            .field("selected", &self.selected_interactors())
            .field("jurisdiction_cursor", &self.jurisdiction_cursor)
            .finish()
    }
}
