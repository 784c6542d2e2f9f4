//! Panning and zooming a display.
//!
//! [`DisplayVectorInteractor`] is a listener: it turns press/move/release and
//! wheel events into [`DisplayOperation`]s and hands them to the
//! [`DisplayDestination`] it owns. Display changes are not recorded for undo.

use mitk_input::{EventType, Point2D};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::action_ids::{
    ACDONOTHING, ACFINISHMOVE, ACINITMOVE, ACINITZOOM, ACMOVE, ACZOOM,
};
use crate::constants::operation_ids::{OPMOVE, OPZOOM};
use crate::event::StateEvent;
use crate::operation::Operation;
use crate::state_machine::{MachineCore, StateMachine, apply_machine_operation};
use crate::state_machine_factory::StateMachineFactory;

/// Zoom factor per wheel step.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Zoom change per pixel of vertical drag.
pub const DRAG_ZOOM_RATE: f64 = 0.01;

/// Smallest factor a single drag step can produce.
pub const MIN_ZOOM_FACTOR: f64 = 0.1;

/// A change of the displayed region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayOperation {
    /// The cursor moved by this many pixels since the last event
    Move { dx: f64, dy: f64 },
    /// Scale by `factor` around `center` (display coordinates)
    Zoom { factor: f64, center: Point2D },
}

impl DisplayOperation {
    pub fn operation_type(&self) -> i32 {
        match self {
            DisplayOperation::Move { .. } => OPMOVE,
            DisplayOperation::Zoom { .. } => OPZOOM,
        }
    }
}

/// Receiver of display operations, typically a camera controller.
pub trait DisplayDestination {
    /// Apply an operation. Returns false if it was ignored.
    fn execute_display_operation(&mut self, operation: &DisplayOperation) -> bool;
}

/// Listener translating mouse gestures into display operations.
pub struct DisplayVectorInteractor {
    core: MachineCore<DisplayVectorInteractor>,
    destination: Box<dyn DisplayDestination>,
    start_display: Point2D,
    last_display: Point2D,
}

impl DisplayVectorInteractor {
    pub fn new(
        type_name: &str,
        factory: &StateMachineFactory,
        destination: Box<dyn DisplayDestination>,
    ) -> Self {
        let mut core = MachineCore::new(type_name, factory);
        core.set_undo_enabled(false);
        let actions = core.actions_mut();
        actions.register(ACDONOTHING, |_: &mut Self, _, _, _| true);
        actions.register(ACINITMOVE, |s: &mut Self, _, se, _| s.init(se));
        actions.register(ACINITZOOM, |s: &mut Self, _, se, _| s.init(se));
        actions.register(ACMOVE, |s: &mut Self, _, se, _| s.move_display(se));
        actions.register(ACFINISHMOVE, |s: &mut Self, _, se, _| s.finish(se));
        actions.register(ACZOOM, |s: &mut Self, _, se, _| s.zoom(se));

        Self {
            core,
            destination,
            start_display: Point2D::default(),
            last_display: Point2D::default(),
        }
    }

    pub fn destination(&self) -> &dyn DisplayDestination {
        self.destination.as_ref()
    }

    pub fn destination_mut(&mut self) -> &mut dyn DisplayDestination {
        self.destination.as_mut()
    }

    /// Replace the destination, returning the previous one.
    pub fn set_destination(
        &mut self,
        destination: Box<dyn DisplayDestination>,
    ) -> Box<dyn DisplayDestination> {
        std::mem::replace(&mut self.destination, destination)
    }

    fn send(&mut self, operation: DisplayOperation) -> bool {
        log::trace!("{} sends {:?}", self.core.id(), operation);
        self.destination.execute_display_operation(&operation)
    }

    fn init(&mut self, state_event: &StateEvent) -> bool {
        let Some(position) = state_event.event.input.display_position else {
            return false;
        };
        self.start_display = position;
        self.last_display = position;
        true
    }

    fn move_display(&mut self, state_event: &StateEvent) -> bool {
        let Some(position) = state_event.event.input.display_position else {
            return false;
        };
        let operation = DisplayOperation::Move {
            dx: position.x - self.last_display.x,
            dy: position.y - self.last_display.y,
        };
        self.last_display = position;
        let ok = self.send(operation);
        if ok {
            state_event.event.request_update();
        }
        ok
    }

    fn finish(&mut self, state_event: &StateEvent) -> bool {
        if let Some(position) = state_event.event.input.display_position {
            self.last_display = position;
        }
        true
    }

    /// Wheel events zoom around the cursor by [`WHEEL_ZOOM_STEP`] per step.
    /// Drags zoom around the start position; dragging up zooms in.
    fn zoom(&mut self, state_event: &StateEvent) -> bool {
        let input = &state_event.event.input;
        let Some(position) = input.display_position else {
            return false;
        };
        let (factor, center) = if input.event_type == EventType::WHEEL {
            (WHEEL_ZOOM_STEP.powi(input.wheel_delta), position)
        } else {
            let factor = 1.0 + (self.last_display.y - position.y) * DRAG_ZOOM_RATE;
            (factor.max(MIN_ZOOM_FACTOR), self.start_display)
        };
        self.last_display = position;
        let ok = self.send(DisplayOperation::Zoom { factor, center });
        if ok {
            state_event.event.request_update();
        }
        ok
    }
}

impl StateMachine for DisplayVectorInteractor {
    fn machine(&self) -> &MachineCore<Self> {
        &self.core
    }

    fn machine_mut(&mut self) -> &mut MachineCore<Self> {
        &mut self.core
    }

    fn apply_operation(&mut self, operation: &Operation) -> bool {
        match operation {
            Operation::Display(op) => self.destination.execute_display_operation(op),
            other => apply_machine_operation(&mut self.core, other),
        }
    }
}

impl fmt::Debug for DisplayVectorInteractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayVectorInteractor")
            .field("core", &self.core)
            .field("start_display", &self.start_display)
            .field("last_display", &self.last_display)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::event_ids::{
        EIDLEFTMOUSEBTN, EIDLEFTMOUSEBTNANDMOUSEMOVE, EIDLEFTMOUSERELEASE, EIDMOUSEWHEEL,
    };
    use crate::dispatch::DispatchContext;
    use crate::event::Event;
    use crate::state_machine::EventHandler;
    use mitk_input::{ButtonState, InputEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    const PATTERN: &str = r#"
        <stateMachine NAME="moveNzoom">
          <state NAME="neutral" ID="1" START_STATE="TRUE">
            <transition NAME="press" NEXT_STATE_ID="2" EVENT_ID="1">
              <action ID="9" />
            </transition>
            <transition NAME="wheel" NEXT_STATE_ID="1" EVENT_ID="9">
              <action ID="1012" />
            </transition>
          </state>
          <state NAME="move" ID="2">
            <transition NAME="drag" NEXT_STATE_ID="2" EVENT_ID="530">
              <action ID="92" />
            </transition>
            <transition NAME="release" NEXT_STATE_ID="1" EVENT_ID="505">
              <action ID="43" />
            </transition>
          </state>
        </stateMachine>
    "#;

    #[derive(Default)]
    struct Recorder(Rc<RefCell<Vec<DisplayOperation>>>);

    impl DisplayDestination for Recorder {
        fn execute_display_operation(&mut self, operation: &DisplayOperation) -> bool {
            self.0.borrow_mut().push(*operation);
            true
        }
    }

    fn interactor() -> (DisplayVectorInteractor, Rc<RefCell<Vec<DisplayOperation>>>) {
        let mut factory = StateMachineFactory::new();
        factory.load_behavior_string(PATTERN).unwrap();
        let log = Rc::new(RefCell::new(Vec::new()));
        let dvi = DisplayVectorInteractor::new("moveNzoom", &factory, Box::new(Recorder(log.clone())));
        (dvi, log)
    }

    fn send(dvi: &mut DisplayVectorInteractor, id: i32, input: InputEvent) -> bool {
        let mut ctx = DispatchContext::default();
        dvi.handle_event(&StateEvent::new(id, Event::new(input)), &mut ctx)
    }

    #[test]
    fn test_drag_emits_relative_moves() {
        let (mut dvi, log) = interactor();
        let left = ButtonState::LEFT_BUTTON;

        let press = InputEvent::mouse_press(left, ButtonState::NO_BUTTON, Point2D::new(10.0, 10.0));
        assert!(send(&mut dvi, EIDLEFTMOUSEBTN, press));
        let drag = InputEvent::mouse_move(left, Point2D::new(15.0, 12.0));
        assert!(send(&mut dvi, EIDLEFTMOUSEBTNANDMOUSEMOVE, drag));
        let drag = InputEvent::mouse_move(left, Point2D::new(20.0, 12.0));
        assert!(send(&mut dvi, EIDLEFTMOUSEBTNANDMOUSEMOVE, drag));
        let release = InputEvent::mouse_release(left, left, Point2D::new(20.0, 12.0));
        assert!(send(&mut dvi, EIDLEFTMOUSERELEASE, release));

        assert_eq!(
            *log.borrow(),
            vec![
                DisplayOperation::Move { dx: 5.0, dy: 2.0 },
                DisplayOperation::Move { dx: 5.0, dy: 0.0 },
            ]
        );
        assert_eq!(dvi.current_state_id(), Some(1));
    }

    #[test]
    fn test_wheel_zooms_around_cursor() {
        let (mut dvi, log) = interactor();
        let at = Point2D::new(50.0, 40.0);
        assert!(send(&mut dvi, EIDMOUSEWHEEL, InputEvent::wheel(2, ButtonState::NO_BUTTON, at)));

        match log.borrow()[0] {
            DisplayOperation::Zoom { factor, center } => {
                assert!((factor - 1.21).abs() < 1e-9);
                assert_eq!(center, at);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replayed_display_operation_reaches_destination() {
        let (mut dvi, log) = interactor();
        let op = DisplayOperation::Move { dx: 1.0, dy: -1.0 };
        assert!(dvi.execute_operation(&Operation::Display(op)));
        assert_eq!(log.borrow().as_slice(), &[op]);
        assert_eq!(Operation::Display(op).operation_type(), OPMOVE);
    }
}
