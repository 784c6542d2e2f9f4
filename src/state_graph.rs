//! State graph model: states, transitions and actions of one pattern.
//!
//! A pattern is stored as an arena of [`State`]s. Transitions refer to their
//! target by numeric id while the pattern is being read; [`StateGraph::connect`]
//! resolves those ids to arena indices and validates the graph. Once connected
//! a graph is immutable and shared by every state machine using the pattern.

use std::collections::{HashMap, HashSet};

use crate::property::PropertyList;

/// Index of a state inside its [`StateGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateIndex(usize);

impl StateIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

// ============================================================================
// Actions and Transitions
// ============================================================================

/// An action attached to a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: i32,
    pub properties: PropertyList,
}

impl Action {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            properties: PropertyList::new(),
        }
    }
}

/// A transition out of a state, triggered by one event id.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub name: String,
    pub event_id: i32,
    pub next_state_id: i32,
    next_state: Option<StateIndex>,
    pub actions: Vec<Action>,
}

impl Transition {
    pub fn new(name: impl Into<String>, event_id: i32, next_state_id: i32) -> Self {
        Self {
            name: name.into(),
            event_id,
            next_state_id,
            next_state: None,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Target state; `None` until connected or if the target id is unknown.
    pub fn next_state(&self) -> Option<StateIndex> {
        self.next_state
    }
}

// ============================================================================
// State
// ============================================================================

/// A node of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub id: i32,
    pub name: String,
    transitions: Vec<Transition>,
}

impl State {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transitions: Vec::new(),
        }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// Transition for an event id. The first declared one wins.
    pub fn transition(&self, event_id: i32) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.event_id == event_id)
    }

    pub fn has_transition(&self, event_id: i32) -> bool {
        self.transition(event_id).is_some()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Structural findings collected while connecting a graph.
///
/// Findings are advisory: a graph with findings is still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// (state id, transition name, missing target id)
    pub unresolved: Vec<(i32, String, i32)>,
    /// (state id, event id) for every transition shadowed by an earlier one
    pub duplicates: Vec<(i32, i32)>,
    /// States without outgoing transitions other than self loops
    pub dead_ends: Vec<i32>,
    /// States not reachable from the first state
    pub unreachable: Vec<i32>,
}

impl ValidationReport {
    /// No unresolved targets, no shadowed transitions, no unreachable states.
    /// Dead ends are allowed.
    pub fn is_well_formed(&self) -> bool {
        self.unresolved.is_empty() && self.duplicates.is_empty() && self.unreachable.is_empty()
    }
}

// ============================================================================
// State Graph
// ============================================================================

/// All states of one named pattern.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    name: String,
    states: Vec<State>,
    by_id: HashMap<i32, StateIndex>,
    start: Option<StateIndex>,
    report: ValidationReport,
    connected: bool,
}

impl StateGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a state. A state whose id already exists is dropped with a warning.
    pub fn add_state(&mut self, state: State) -> Option<StateIndex> {
        if self.by_id.contains_key(&state.id) {
            log::warn!(
                "Pattern '{}': duplicate state id {} ('{}') ignored",
                self.name,
                state.id,
                state.name
            );
            return None;
        }
        let index = StateIndex(self.states.len());
        self.by_id.insert(state.id, index);
        self.states.push(state);
        Some(index)
    }

    pub fn set_start(&mut self, index: StateIndex) {
        self.start = Some(index);
    }

    /// The declared start state, or the first state if none was declared.
    pub fn start_index(&self) -> Option<StateIndex> {
        self.start
            .or_else(|| (!self.states.is_empty()).then_some(StateIndex(0)))
    }

    pub fn start_state(&self) -> Option<&State> {
        self.start_index().map(|i| self.state(i))
    }

    /// State at an index handed out by this graph.
    pub fn state(&self, index: StateIndex) -> &State {
        &self.states[index.0]
    }

    pub fn get(&self, index: StateIndex) -> Option<&State> {
        self.states.get(index.0)
    }

    pub fn index_of(&self, state_id: i32) -> Option<StateIndex> {
        self.by_id.get(&state_id).copied()
    }

    pub fn state_by_id(&self, state_id: i32) -> Option<&State> {
        self.index_of(state_id).map(|i| self.state(i))
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn is_well_formed(&self) -> bool {
        self.report.is_well_formed()
    }

    /// Resolve transition targets and validate the graph.
    ///
    /// Reachability is checked from the first state added, which is not
    /// necessarily the start state.
    pub fn connect(&mut self) -> &ValidationReport {
        let mut report = ValidationReport::default();

        for state in &mut self.states {
            let mut seen_events = HashSet::new();
            for transition in &mut state.transitions {
                if !seen_events.insert(transition.event_id) {
                    log::warn!(
                        "Pattern '{}': state {} has more than one transition for event {}; the first one wins",
                        self.name,
                        state.id,
                        transition.event_id
                    );
                    report.duplicates.push((state.id, transition.event_id));
                }
                transition.next_state = self.by_id.get(&transition.next_state_id).copied();
                if transition.next_state.is_none() {
                    log::warn!(
                        "Pattern '{}': transition '{}' of state {} points to unknown state {}",
                        self.name,
                        transition.name,
                        state.id,
                        transition.next_state_id
                    );
                    report.unresolved.push((
                        state.id,
                        transition.name.clone(),
                        transition.next_state_id,
                    ));
                }
            }
        }

        if !self.states.is_empty() {
            let mut visited = vec![false; self.states.len()];
            self.rparse(StateIndex(0), &mut visited, &mut report);

            for (state, seen) in self.states.iter().zip(&visited) {
                if !*seen {
                    log::warn!(
                        "Pattern '{}': state {} ('{}') is not reachable; the pattern may be malformed",
                        self.name,
                        state.id,
                        state.name
                    );
                    report.unreachable.push(state.id);
                }
            }
        }

        self.connected = true;
        self.report = report;
        &self.report
    }

    fn rparse(&self, index: StateIndex, visited: &mut [bool], report: &mut ValidationReport) {
        if visited[index.0] {
            return;
        }
        visited[index.0] = true;

        let state = self.state(index);
        let targets: Vec<StateIndex> = state
            .transitions
            .iter()
            .filter_map(|t| t.next_state)
            .filter(|next| *next != index)
            .collect();

        if targets.is_empty() {
            log::warn!(
                "Pattern '{}': state {} ('{}') is a dead end",
                self.name,
                state.id,
                state.name
            );
            report.dead_ends.push(state.id);
        }

        for target in targets {
            self.rparse(target, visited, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_graph() -> StateGraph {
        let mut graph = StateGraph::new("test");
        graph.add_state(
            State::new(0, "start")
                .with_transition(Transition::new("go", 10, 1).with_action(Action::new(100))),
        );
        graph.add_state(State::new(1, "selected").with_transition(Transition::new("back", 11, 0)));
        graph
    }

    #[test]
    fn test_connect_resolves_targets() {
        let mut graph = two_state_graph();
        assert!(graph.connect().is_well_formed());

        let start = graph.start_state().unwrap();
        let next = start.transition(10).unwrap().next_state().unwrap();
        assert_eq!(graph.state(next).id, 1);
        assert!(graph.is_connected());
    }

    #[test]
    fn test_unresolved_target_flags_malformed() {
        let mut graph = StateGraph::new("broken");
        graph.add_state(State::new(0, "start").with_transition(Transition::new("lost", 1, 42)));
        let report = graph.connect().clone();
        assert_eq!(report.unresolved, vec![(0, "lost".to_string(), 42)]);
        assert!(!graph.is_well_formed());
        assert!(graph.start_state().unwrap().transition(1).unwrap().next_state().is_none());
    }

    #[test]
    fn test_unreachable_state_is_reported() {
        let mut graph = two_state_graph();
        graph.add_state(State::new(7, "island"));
        let report = graph.connect();
        assert_eq!(report.unreachable, vec![7]);
        assert!(!report.is_well_formed());
    }

    #[test]
    fn test_self_loop_only_state_is_dead_end() {
        let mut graph = StateGraph::new("loop");
        graph.add_state(State::new(0, "start").with_transition(Transition::new("next", 1, 1)));
        graph.add_state(State::new(1, "spin").with_transition(Transition::new("again", 2, 1)));
        let report = graph.connect();
        assert_eq!(report.dead_ends, vec![1]);
        assert!(report.is_well_formed());
    }

    #[test]
    fn test_reachability_starts_at_first_state() {
        // Start is declared on state 1, but traversal begins at state 0, which
        // cannot reach state 1.
        let mut graph = StateGraph::new("order");
        graph.add_state(State::new(0, "first"));
        let declared = graph
            .add_state(State::new(1, "declared").with_transition(Transition::new("t", 1, 0)))
            .unwrap();
        graph.set_start(declared);

        let report = graph.connect();
        assert_eq!(report.unreachable, vec![1]);
        assert_eq!(graph.start_state().unwrap().id, 1);
    }

    #[test]
    fn test_duplicate_transition_first_wins() {
        let mut graph = StateGraph::new("dup");
        graph.add_state(
            State::new(0, "start")
                .with_transition(Transition::new("first", 5, 0))
                .with_transition(Transition::new("second", 5, 0)),
        );
        let report = graph.connect();
        assert_eq!(report.duplicates, vec![(0, 5)]);
        assert_eq!(graph.state_by_id(0).unwrap().transition(5).unwrap().name, "first");
    }

    #[test]
    fn test_duplicate_state_id_keeps_first() {
        let mut graph = StateGraph::new("ids");
        assert!(graph.add_state(State::new(0, "a")).is_some());
        assert!(graph.add_state(State::new(0, "b")).is_none());
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.state_by_id(0).unwrap().name, "a");
    }
}
