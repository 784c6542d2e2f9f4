//! State machine factory: reads patterns from behavior XML.
//!
//! ```xml
//! <stateMachine NAME="selectandmove">
//!   <state NAME="neutral" ID="0" START_STATE="TRUE">
//!     <transition NAME="press" NEXT_STATE_ID="1" EVENT_ID="1">
//!       <action ID="60">
//!         <intParameter NAME="DIRECTION_X" VALUE="5" />
//!       </action>
//!     </transition>
//!   </state>
//!   ...
//! </stateMachine>
//! ```
//!
//! Each pattern is connected and validated as soon as its closing tag is read.
//! Validation findings are logged and kept on the graph, but never stop loading.

use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::error::InteractionError;
use crate::property::PropertyValue;
use crate::state_graph::{Action, State, StateGraph, Transition};
use crate::xml::{Attributes, BehaviorSource, element_name};

/// Owns every loaded pattern, keyed by pattern name.
#[derive(Debug, Default)]
pub struct StateMachineFactory {
    patterns: HashMap<String, Rc<StateGraph>>,
}

/// Parser state while reading one `<stateMachine>` element.
#[derive(Default)]
struct PatternBuilder {
    graph: Option<StateGraph>,
    state: Option<(State, bool)>,
    transition: Option<Transition>,
    action: Option<Action>,
    has_start: bool,
}

impl PatternBuilder {
    fn begin_pattern(&mut self, attrs: &Attributes) {
        let name = attrs.string("NAME");
        if self.graph.is_some() {
            log::warn!("Nested <stateMachine> '{}' ignored", name);
            return;
        }
        *self = Self {
            graph: Some(StateGraph::new(name)),
            ..Default::default()
        };
    }

    fn begin_state(&mut self, attrs: &Attributes) {
        if self.graph.is_none() {
            log::warn!("<state> outside of <stateMachine> ignored");
            return;
        }
        let id = attrs.int_or("ID", 0);
        let start = attrs.flag("START_STATE");
        self.state = Some((State::new(id, attrs.string("NAME")), start));
    }

    fn end_state(&mut self) {
        let (Some(graph), Some((state, start))) = (self.graph.as_mut(), self.state.take()) else {
            return;
        };
        let Some(index) = graph.add_state(state) else {
            return;
        };
        if start {
            if self.has_start {
                log::warn!(
                    "Pattern '{}' declares more than one start state; keeping the first",
                    graph.name()
                );
            } else {
                graph.set_start(index);
                self.has_start = true;
            }
        }
    }

    fn begin_transition(&mut self, attrs: &Attributes) {
        if self.state.is_none() {
            log::warn!("<transition> outside of <state> ignored");
            return;
        }
        self.transition = Some(Transition::new(
            attrs.string("NAME"),
            attrs.int_or("EVENT_ID", 0),
            attrs.int_or("NEXT_STATE_ID", 0),
        ));
    }

    fn end_transition(&mut self) {
        if let (Some((state, _)), Some(transition)) = (self.state.as_mut(), self.transition.take()) {
            state.add_transition(transition);
        }
    }

    fn begin_action(&mut self, attrs: &Attributes) {
        if self.transition.is_none() {
            log::warn!("<action> outside of <transition> ignored");
            return;
        }
        self.action = Some(Action::new(attrs.int_or("ID", 0)));
    }

    fn end_action(&mut self) {
        if let (Some(transition), Some(action)) = (self.transition.as_mut(), self.action.take()) {
            transition.actions.push(action);
        }
    }

    fn parameter(&mut self, element: &str, attrs: &Attributes) {
        let Some(action) = self.action.as_mut() else {
            log::warn!("<{}> outside of <action> ignored", element);
            return;
        };
        let name = attrs.string("NAME");
        let raw = attrs.string("VALUE");
        match PropertyValue::parse(element, &raw) {
            Some(value) => action.properties.set(name, value),
            None => log::warn!(
                "Action {}: cannot read {} '{}' = '{}'",
                action.id,
                element,
                name,
                raw
            ),
        }
    }

    fn finish_pattern(&mut self) -> Option<StateGraph> {
        let mut graph = self.graph.take()?;
        if graph.is_empty() {
            log::warn!("Pattern '{}' has no states", graph.name());
        } else if !self.has_start {
            log::warn!(
                "Pattern '{}' declares no start state; using the first state",
                graph.name()
            );
        }
        graph.connect();
        *self = Self::default();
        Some(graph)
    }
}

fn is_parameter(element: &str) -> bool {
    matches!(
        element,
        "boolParameter" | "intParameter" | "floatParameter" | "doubleParameter" | "stringParameter"
    )
}

impl StateMachineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load patterns from a behavior file.
    pub fn load_behavior(&mut self, path: impl AsRef<Path>) -> Result<usize, InteractionError> {
        self.load(&BehaviorSource::file(path))
    }

    /// Load patterns from an XML string.
    pub fn load_behavior_string(&mut self, xml: &str) -> Result<usize, InteractionError> {
        self.parse(xml)
    }

    /// Load patterns from any behavior source.
    ///
    /// Returns the number of patterns read. A pattern whose name is already
    /// known replaces the earlier definition.
    pub fn load(&mut self, source: &BehaviorSource) -> Result<usize, InteractionError> {
        let xml = source.read()?;
        let loaded = self.parse(&xml)?;
        log::info!("Loaded {} state machine patterns from {}", loaded, source.describe());
        Ok(loaded)
    }

    fn parse(&mut self, xml: &str) -> Result<usize, InteractionError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut builder = PatternBuilder::default();
        let mut loaded = 0;

        loop {
            match reader.read_event() {
                Ok(XmlEvent::Start(ref e)) => {
                    let name = element_name(e);
                    let attrs = Attributes::parse(e)?;
                    self.begin(&mut builder, &name, &attrs);
                }
                Ok(XmlEvent::Empty(ref e)) => {
                    let name = element_name(e);
                    let attrs = Attributes::parse(e)?;
                    self.begin(&mut builder, &name, &attrs);
                    if self.end(&mut builder, &name) {
                        loaded += 1;
                    }
                }
                Ok(XmlEvent::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if self.end(&mut builder, &name) {
                        loaded += 1;
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => return Err(InteractionError::Xml(e)),
                _ => {}
            }
        }

        Ok(loaded)
    }

    fn begin(&self, builder: &mut PatternBuilder, element: &str, attrs: &Attributes) {
        match element {
            "stateMachine" => builder.begin_pattern(attrs),
            "state" => builder.begin_state(attrs),
            "transition" => builder.begin_transition(attrs),
            "action" => builder.begin_action(attrs),
            other if is_parameter(other) => builder.parameter(other, attrs),
            _ => {}
        }
    }

    /// Handle a closing tag. Returns true when a pattern was completed.
    fn end(&mut self, builder: &mut PatternBuilder, element: &str) -> bool {
        match element {
            "stateMachine" => match builder.finish_pattern() {
                Some(graph) => {
                    self.insert(graph);
                    true
                }
                None => false,
            },
            "state" => {
                builder.end_state();
                false
            }
            "transition" => {
                builder.end_transition();
                false
            }
            "action" => {
                builder.end_action();
                false
            }
            _ => false,
        }
    }

    /// Add an already built graph, connecting it if needed.
    pub fn insert(&mut self, mut graph: StateGraph) {
        if !graph.is_connected() {
            graph.connect();
        }
        let name = graph.name().to_string();
        if !graph.is_well_formed() {
            log::warn!("Pattern '{}' may be malformed", name);
        }
        log::debug!("Pattern '{}' loaded with {} states", name, graph.len());
        if self.patterns.insert(name.clone(), Rc::new(graph)).is_some() {
            log::warn!("Pattern '{}' was defined twice; using the later definition", name);
        }
    }

    /// Start state of a pattern.
    ///
    /// An unknown pattern name is a configuration error: it is logged and
    /// `None` is returned.
    pub fn get_start_state(&self, pattern: &str) -> Option<&State> {
        match self.patterns.get(pattern) {
            Some(graph) => graph.start_state(),
            None => {
                log::error!("Unknown state machine pattern '{}'", pattern);
                None
            }
        }
    }

    /// Shared graph of a pattern.
    pub fn graph(&self, pattern: &str) -> Option<Rc<StateGraph>> {
        self.patterns.get(pattern).cloned()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains_key(pattern)
    }

    /// Names of all loaded patterns, sorted.
    pub fn pattern_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PATTERNS: &str = r#"
        <mitkInteraktionStates>
          <stateMachine NAME="select">
            <state NAME="start" ID="0" START_STATE="TRUE">
              <transition NAME="press" NEXT_STATE_ID="1" EVENT_ID="10">
                <action ID="100">
                  <intParameter NAME="DIRECTION_X" VALUE="5" />
                  <floatParameter NAME="FACTOR" VALUE="0.5" />
                  <boolParameter NAME="ENABLED" VALUE="TRUE" />
                  <doubleParameter NAME="SCALE" VALUE="2.5" />
                  <stringParameter NAME="LABEL" VALUE="go" />
                </action>
              </transition>
            </state>
            <state NAME="selected" ID="0x1">
              <transition NAME="release" NEXT_STATE_ID="0" EVENT_ID="505" />
            </state>
          </stateMachine>
          <stateMachine NAME="broken">
            <state NAME="a" ID="0">
              <transition NAME="nowhere" NEXT_STATE_ID="9" EVENT_ID="1" />
            </state>
            <state NAME="orphan" ID="1" />
          </stateMachine>
        </mitkInteraktionStates>
    "#;

    fn loaded() -> StateMachineFactory {
        let mut factory = StateMachineFactory::new();
        assert_eq!(factory.load_behavior_string(PATTERNS).unwrap(), 2);
        factory
    }

    #[test]
    fn test_int_parameter_round_trip() {
        let factory = loaded();
        let start = factory.get_start_state("select").unwrap();
        let action = &start.transition(10).unwrap().actions[0];
        assert_eq!(action.id, 100);
        assert_eq!(action.properties.get_int("DIRECTION_X"), Some(5));
        assert_eq!(action.properties.get_f64("FACTOR"), Some(0.5));
        assert_eq!(action.properties.get_bool("ENABLED"), Some(true));
        assert_eq!(action.properties.get_f64("SCALE"), Some(2.5));
        assert_eq!(action.properties.get_str("LABEL"), Some("go"));
    }

    #[test]
    fn test_hex_ids_and_connection() {
        let factory = loaded();
        let graph = factory.graph("select").unwrap();
        assert!(graph.is_well_formed());
        let target = graph
            .start_state()
            .unwrap()
            .transition(10)
            .unwrap()
            .next_state()
            .unwrap();
        assert_eq!(graph.state(target).name, "selected");
        assert_eq!(graph.state(target).id, 1);
    }

    #[test]
    fn test_malformed_pattern_still_loads() {
        let factory = loaded();
        let graph = factory.graph("broken").unwrap();
        assert!(!graph.is_well_formed());
        assert_eq!(graph.report().unresolved.len(), 1);
        assert_eq!(graph.report().unreachable, vec![1]);
        // No START_STATE flag: the first state is used.
        assert_eq!(factory.get_start_state("broken").unwrap().name, "a");
    }

    #[test]
    fn test_unknown_pattern() {
        let factory = loaded();
        assert!(factory.get_start_state("missing").is_none());
        assert!(!factory.contains("missing"));
        assert_eq!(factory.pattern_names(), vec!["broken", "select"]);
    }

    #[test]
    fn test_event_sections_are_ignored() {
        let mut factory = StateMachineFactory::new();
        let xml = r#"<root><events STYLE="x"><event ID="1" TYPE="Type_KeyPress" /></events></root>"#;
        assert_eq!(factory.load_behavior_string(xml).unwrap(), 0);
        assert!(factory.is_empty());
    }

    #[test]
    fn test_redefinition_replaces_pattern() {
        let mut factory = loaded();
        factory
            .load_behavior_string(
                r#"<stateMachine NAME="select"><state NAME="only" ID="5" START_STATE="TRUE" /></stateMachine>"#,
            )
            .unwrap();
        assert_eq!(factory.get_start_state("select").unwrap().id, 5);
        assert_eq!(factory.len(), 2);
    }

    #[test]
    fn test_syntax_error_is_returned() {
        let mut factory = StateMachineFactory::new();
        assert!(matches!(
            factory.load_behavior_string("<stateMachine NAME=\"x\"><state></stateMachine>"),
            Err(InteractionError::Xml(_))
        ));
    }
}
