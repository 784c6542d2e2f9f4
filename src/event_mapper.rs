//! Event mapper: raw input events to event ids.
//!
//! The mapper holds a table of [`EventDescription`]s loaded from the `<events>`
//! section of a behavior file. Each description names a combination of event
//! type, button, button state and key together with the event id that state
//! machine patterns refer to.
//!
//! ```xml
//! <events STYLE="standard">
//!   <event NAME="left MouseBtn" ID="1" TYPE="Type_MouseButtonPress"
//!          BUTTON="BS_LeftButton" BUTTONSTATE="0x0000" KEY="Key_none" />
//! </events>
//! ```

use mitk_input::{ButtonState, EventType, InputEvent, Key, UNKNOWN_CONSTANT, resolve_constant};
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::dispatch::DispatchContext;
use crate::error::InteractionError;
use crate::event::{Event, StateEvent};
use crate::operation::OperationEventIds;
use crate::state_machine::EventHandler;
use crate::xml::{Attributes, BehaviorSource, element_name};

// ============================================================================
// Event Description
// ============================================================================

/// One entry of the event table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDescription {
    pub name: String,
    pub id: i32,
    pub event_type: EventType,
    pub button: ButtonState,
    pub button_state: ButtonState,
    pub key: Key,
}

impl EventDescription {
    /// Whether a raw event matches this description exactly.
    pub fn matches(&self, input: &InputEvent) -> bool {
        self.event_type == input.event_type
            && self.button == input.button
            && self.button_state == input.button_state
            && self.key == input.key
    }

    /// Missing `TYPE`, `BUTTON` or `KEY` attributes read as `-1`, which no
    /// device event carries.
    fn from_attributes(attrs: &Attributes) -> Self {
        let symbol = |name: &str| {
            attrs
                .get(name)
                .map(resolve_constant)
                .unwrap_or(UNKNOWN_CONSTANT)
        };
        Self {
            name: attrs.string("NAME"),
            id: attrs.int_or("ID", 0),
            event_type: EventType(symbol("TYPE")),
            button: ButtonState::from_raw(symbol("BUTTON")),
            button_state: ButtonState::from_raw(attrs.int_or("BUTTONSTATE", 0)),
            key: Key(symbol("KEY")),
        }
    }
}

// ============================================================================
// Event Mapper
// ============================================================================

/// Maps raw events to event ids and forwards them to the dispatch root.
#[derive(Default)]
pub struct EventMapper {
    descriptions: Vec<EventDescription>,
    style_name: String,
    global_state_machine: Option<Rc<RefCell<dyn EventHandler>>>,
}

impl EventMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load event descriptions from a behavior file.
    pub fn load_behavior(&mut self, path: impl AsRef<std::path::Path>) -> Result<usize, InteractionError> {
        self.load(&BehaviorSource::file(path))
    }

    /// Load event descriptions from an XML string.
    pub fn load_behavior_string(&mut self, xml: &str) -> Result<usize, InteractionError> {
        self.parse(xml)
    }

    /// Load event descriptions from any behavior source.
    ///
    /// Descriptions are appended to the table. Returns the number of
    /// descriptions added; elements other than `<events>` and `<event>` are
    /// ignored, so a combined behavior file can be passed as is.
    pub fn load(&mut self, source: &BehaviorSource) -> Result<usize, InteractionError> {
        let xml = source.read()?;
        let added = self.parse(&xml)?;
        log::info!(
            "Loaded {} event descriptions from {}",
            added,
            source.describe()
        );
        Ok(added)
    }

    fn parse(&mut self, xml: &str) -> Result<usize, InteractionError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let before = self.descriptions.len();

        loop {
            match reader.read_event() {
                Ok(XmlEvent::Start(ref e)) | Ok(XmlEvent::Empty(ref e)) => {
                    match element_name(e).as_str() {
                        "events" => {
                            let attrs = Attributes::parse(e)?;
                            if let Some(style) = attrs.get("STYLE") {
                                self.style_name = style.to_string();
                            }
                        }
                        "event" => {
                            let attrs = Attributes::parse(e)?;
                            let description = EventDescription::from_attributes(&attrs);
                            if description.event_type == EventType::UNKNOWN {
                                log::warn!(
                                    "Event '{}' (id {}) uses an unknown TYPE constant",
                                    description.name,
                                    description.id
                                );
                            }
                            self.descriptions.push(description);
                        }
                        _ => {}
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => return Err(InteractionError::Xml(e)),
                _ => {}
            }
        }

        Ok(self.descriptions.len() - before)
    }

    /// Style name declared by the `<events STYLE="...">` element.
    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    pub fn descriptions(&self) -> &[EventDescription] {
        &self.descriptions
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Find the id for a raw event by linear scan of the table.
    pub fn find_event_id(&self, input: &InputEvent) -> Option<i32> {
        self.descriptions
            .iter()
            .find(|d| d.matches(input))
            .map(|d| d.id)
    }

    /// Look up a description by its event id.
    pub fn description(&self, id: i32) -> Option<&EventDescription> {
        self.descriptions.iter().find(|d| d.id == id)
    }

    /// Resolve an event to a state event.
    ///
    /// An `explicit_id` of 0 means "look it up"; any other value is used as is
    /// (replayed or remote events).
    pub fn resolve(&self, event: &Event, explicit_id: i32) -> Option<StateEvent> {
        let id = if explicit_id != 0 {
            explicit_id
        } else {
            self.find_event_id(&event.input)?
        };
        Some(StateEvent::new(id, event.clone()))
    }

    /// Re-resolve the id of an existing state event against the table.
    ///
    /// Keeps the old id when the event no longer maps to anything.
    pub fn refresh_state_event(&self, state_event: &mut StateEvent) -> bool {
        match self.find_event_id(&state_event.event.input) {
            Some(id) => {
                state_event.id = id;
                true
            }
            None => false,
        }
    }

    /// Resolve an event and advance the operation event ids for it.
    ///
    /// Presses, key presses and any other type start a new object event; moves,
    /// releases and user events continue the current one so that a whole drag
    /// is undone in one step.
    pub fn map_to_state_event(
        &self,
        event: &Event,
        explicit_id: i32,
        ids: &mut OperationEventIds,
    ) -> Option<StateEvent> {
        let state_event = self.resolve(event, explicit_id)?;
        if starts_object_event(event.input.event_type) {
            ids.inc_current_object_event_id();
        }
        ids.execute_increment();
        Some(state_event)
    }

    /// Map an event and forward it to `root`, or to the machine registered with
    /// [`set_global_state_machine`](Self::set_global_state_machine).
    pub fn map_event(
        &self,
        event: &Event,
        explicit_id: i32,
        root: &mut dyn EventHandler,
        ctx: &mut DispatchContext,
    ) -> bool {
        let Some(state_event) = self.map_to_state_event(event, explicit_id, ctx.ids_mut()) else {
            return false;
        };
        match &self.global_state_machine {
            Some(global) => global.borrow_mut().handle_event(&state_event, ctx),
            None => root.handle_event(&state_event, ctx),
        }
    }

    /// Route mapped events to another state machine instead of the dispatch root.
    pub fn set_global_state_machine(&mut self, machine: Rc<RefCell<dyn EventHandler>>) {
        log::debug!(
            "Event mapper now forwards to '{}'",
            machine.borrow().type_name()
        );
        self.global_state_machine = Some(machine);
    }

    /// Restore forwarding to the dispatch root.
    pub fn clear_global_state_machine(&mut self) {
        self.global_state_machine = None;
    }

    pub fn global_state_machine(&self) -> Option<&Rc<RefCell<dyn EventHandler>>> {
        self.global_state_machine.as_ref()
    }
}

/// Whether events of this type open a new object event (and a new gesture).
pub(crate) fn starts_object_event(event_type: EventType) -> bool {
    !matches!(
        event_type,
        EventType::MOUSE_MOVE | EventType::MOUSE_BUTTON_RELEASE | EventType::USER
    )
}

impl fmt::Debug for EventMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMapper")
            .field("style_name", &self.style_name)
            .field("descriptions", &self.descriptions.len())
            .field("global_state_machine", &self.global_state_machine.is_some())
            .finish()
    }
}
