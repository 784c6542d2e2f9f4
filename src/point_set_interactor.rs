//! Interactive editing of a [`PointSet`].
//!
//! The pattern decides which gestures add, pick, move and remove points. Guard
//! actions inspect the point set and post `EIDYES`/`EIDNO` (or the
//! `EIDSTSMALERNMINUS1`/`EIDSTLARGERNMINUS1` pair) back into the machine, so the
//! pattern can branch on the outcome.
//!
//! Every edit is recorded for undo. A drag records a single move per point,
//! from the position at the start of the drag to the final one.

use mitk_input::EventType;
use std::fmt;

use crate::config::InteractionConfig;
use crate::constants::DEFAULT_POINT_PRECISION;
use crate::constants::action_ids::*;
use crate::constants::event_ids::{
    EIDEMPTY, EIDEQUALSN, EIDNO, EIDSMALLERN, EIDSTLARGERNMINUS1, EIDSTSMALERNMINUS1, EIDYES,
};
use crate::dispatch::DispatchContext;
use crate::event::StateEvent;
use crate::geometry::{Point3D, Vector3D};
use crate::interactor::{
    DataElement, Interactor, InteractorCore, TRANSITION_SCORE, apply_interactor_operation,
    register_mode_actions,
};
use crate::message::Message;
use crate::operation::Operation;
use crate::point_set::{PointOpKind, PointOperation, PointSet};
use crate::state_machine::{MachineCore, StateMachine};
use crate::state_machine_factory::StateMachineFactory;

/// Interactor adding, selecting, moving and removing points.
pub struct PointSetInteractor {
    core: MachineCore<PointSetInteractor>,
    interactor: InteractorCore,
    point_set: PointSet,
    /// Maximum number of points; negative means unlimited
    max_points: i32,
    precision: f64,
    last_point: Point3D,
    sum_vec: Vector3D,
    changed: Message<PointOperation>,
}

impl PointSetInteractor {
    /// Create an interactor running `type_name` on `point_set`, allowing at
    /// most `max_points` points (negative for no limit).
    pub fn new(
        type_name: &str,
        factory: &StateMachineFactory,
        point_set: PointSet,
        max_points: i32,
    ) -> Self {
        let mut core = MachineCore::new(type_name, factory);
        register_mode_actions(&mut core);
        let actions = core.actions_mut();
        actions.register(ACDONOTHING, |_: &mut Self, _, _, _| true);
        actions.register(ACADDPOINT, |s: &mut Self, _, se, ctx| s.add_point(se, ctx));
        actions.register(ACINITMOVEMENT, |s: &mut Self, _, se, _| s.init_movement(se));
        actions.register(ACMOVESELECTED, |s: &mut Self, _, se, _| s.move_selected(se));
        actions.register(ACFINISHMOVEMENT, |s: &mut Self, _, se, ctx| {
            s.finish_movement(se, ctx)
        });
        actions.register(ACREMOVEPOINT, |s: &mut Self, _, se, ctx| s.remove_point(se, ctx));
        actions.register(ACCHECKELEMENT, |s: &mut Self, _, se, ctx| s.check_element(se, ctx));
        actions.register(ACCHECKSELECTED, |s: &mut Self, _, se, ctx| {
            s.check_selected(se, ctx)
        });
        actions.register(ACCHECKNMINUS1, |s: &mut Self, _, se, ctx| {
            s.check_n_minus_1(se, ctx)
        });
        actions.register(ACCHECKEQUALS1, |s: &mut Self, _, se, ctx| s.check_equals_1(se, ctx));
        actions.register(ACCHECKONESELECTED, |s: &mut Self, _, se, ctx| {
            s.check_one_selected(se, ctx)
        });
        actions.register(ACCHECKNUMBEROFPOINTS, |s: &mut Self, _, se, ctx| {
            s.check_number_of_points(se, ctx)
        });
        actions.register(ACCHECKOPERATION, |s: &mut Self, _, se, ctx| {
            s.check_operation(se, ctx)
        });
        actions.register(ACSELECTPICKEDOBJECT, |s: &mut Self, _, se, ctx| {
            s.select_picked_object(se, ctx)
        });
        actions.register(ACDESELECTOBJECT, |s: &mut Self, _, se, ctx| {
            s.deselect_object(se, ctx)
        });
        actions.register(ACDESELECTALL, |s: &mut Self, _, _, ctx| {
            s.unselect_all(ctx);
            true
        });
        actions.register(ACCLEAR, |s: &mut Self, _, _, ctx| {
            s.clear(ctx);
            true
        });
        actions.register(ACREMOVEALL, |s: &mut Self, _, _, ctx| {
            s.clear(ctx);
            true
        });

        Self {
            core,
            interactor: InteractorCore::new(),
            point_set,
            max_points,
            precision: DEFAULT_POINT_PRECISION,
            last_point: Point3D::ORIGIN,
            sum_vec: Vector3D::ZERO,
            changed: Message::new(),
        }
    }

    /// Take precision and undo recording from a configuration.
    pub fn apply_config(&mut self, config: &InteractionConfig) {
        self.precision = config.point_precision;
        self.core.set_undo_enabled(config.undo.enabled);
    }

    pub fn point_set(&self) -> &PointSet {
        &self.point_set
    }

    pub fn max_points(&self) -> i32 {
        self.max_points
    }

    /// How close (in world units) a click must be to pick a point.
    pub fn set_precision(&mut self, precision: f64) {
        self.precision = precision;
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Notified with every edit applied to the point set, including undo and
    /// redo.
    pub fn point_set_changed(&mut self) -> &mut Message<PointOperation> {
        &mut self.changed
    }

    fn time_step(&self) -> usize {
        self.core.time_step()
    }

    fn op(&self, kind: PointOpKind, index: usize, position: Point3D) -> PointOperation {
        PointOperation::new(kind, index, position, self.time_step())
    }

    fn apply_point_operation(&mut self, op: &PointOperation) -> bool {
        let ok = self.point_set.execute_operation(op);
        if ok {
            self.changed.send(op);
        }
        ok
    }

    /// Record `do_op`/`undo_op` (if undo is enabled) and apply `do_op`.
    fn execute(
        &mut self,
        do_op: PointOperation,
        undo_op: PointOperation,
        ctx: &mut DispatchContext,
    ) -> bool {
        if self.core.is_undo_enabled() {
            ctx.record(
                self.core.id(),
                Operation::Point(do_op),
                Operation::Point(undo_op),
                format!("{:?} point {}", do_op.kind, do_op.index),
            );
        }
        self.apply_point_operation(&do_op)
    }

    /// Feed a guard result back into the machine.
    fn post(&mut self, id: i32, state_event: &StateEvent, ctx: &mut DispatchContext) {
        let guard = state_event.with_id(id);
        self.handle_state_event(&guard, ctx);
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn unselect_all(&mut self, ctx: &mut DispatchContext) {
        for index in self.point_set.selected_indices(self.time_step()) {
            let position = self.point_set.point(index, self.time_step()).unwrap_or_default();
            let do_op = self.op(PointOpKind::Deselect, index, position);
            let undo_op = self.op(PointOpKind::Select, index, position);
            self.execute(do_op, undo_op, ctx);
        }
    }

    fn select_point(&mut self, index: usize, ctx: &mut DispatchContext) {
        let Some(position) = self.point_set.point(index, self.time_step()) else {
            return;
        };
        let do_op = self.op(PointOpKind::Select, index, position);
        let undo_op = self.op(PointOpKind::Deselect, index, position);
        self.execute(do_op, undo_op, ctx);
    }

    /// Select the closest remaining point below `removed`, or the last one.
    fn select_neighbor(&mut self, removed: usize, ctx: &mut DispatchContext) {
        let indices = self.point_set.indices(self.time_step());
        let neighbor = indices
            .iter()
            .rev()
            .find(|i| **i < removed)
            .or_else(|| indices.last())
            .copied();
        if let Some(index) = neighbor {
            self.select_point(index, ctx);
        }
    }

    /// Remove one point. Undo puts it back with its selection.
    fn remove_index(&mut self, index: usize, ctx: &mut DispatchContext) -> bool {
        let time_step = self.time_step();
        let Some(point) = self.point_set.point(index, time_step) else {
            return false;
        };
        let selected = self.point_set.is_selected(index, time_step);
        let do_op = self.op(PointOpKind::Remove, index, point);
        let undo_op = self.op(PointOpKind::Insert, index, point).with_selected(selected);
        self.execute(do_op, undo_op, ctx)
    }

    fn add_point(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        self.unselect_all(ctx);
        let index = self.point_set.first_free_index(self.time_step());
        let do_op = self.op(PointOpKind::Insert, index, position);
        let undo_op = self.op(PointOpKind::Remove, index, position);
        self.execute(do_op, undo_op, ctx)
    }

    fn init_movement(&mut self, state_event: &StateEvent) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        self.last_point = position;
        self.sum_vec = Vector3D::ZERO;
        true
    }

    /// Intermediate moves are applied without recording.
    fn move_selected(&mut self, state_event: &StateEvent) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        let direction = position - self.last_point;
        self.sum_vec = self.sum_vec + direction;

        let time_step = self.time_step();
        for index in self.point_set.selected_indices(time_step) {
            if let Some(point) = self.point_set.point(index, time_step) {
                let op = self.op(PointOpKind::Move, index, point + direction);
                self.apply_point_operation(&op);
            }
        }
        self.last_point = position;
        true
    }

    fn finish_movement(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if state_event.event.world_position().is_none() {
            return false;
        }
        let time_step = self.time_step();
        for index in self.point_set.selected_indices(time_step) {
            if let Some(point) = self.point_set.point(index, time_step) {
                let do_op = self.op(PointOpKind::Move, index, point);
                let undo_op = self.op(PointOpKind::Move, index, point - self.sum_vec);
                self.execute(do_op, undo_op, ctx);
            }
        }
        self.last_point = Point3D::ORIGIN;
        self.sum_vec = Vector3D::ZERO;
        ctx.ids_mut().inc_current_group_event_id();
        true
    }

    /// Remove the point under the event, or every selected point for events
    /// without a position.
    fn remove_point(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let time_step = self.time_step();
        if let Some(position) = state_event.event.world_position() {
            let Some(index) = self.point_set.search_point(&position, 0.0, time_step) else {
                return false;
            };
            self.remove_index(index, ctx);
            self.select_neighbor(index, ctx);
            return true;
        }

        let selected = self.point_set.selected_indices(time_step);
        let Some(&last) = selected.last() else {
            return true;
        };
        for index in selected {
            self.remove_index(index, ctx);
        }
        self.select_neighbor(last, ctx);
        true
    }

    /// Post `EIDYES` with the picked point's exact position, or `EIDNO`.
    fn check_element(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        let time_step = self.time_step();
        let picked = self
            .point_set
            .search_point(&position, self.precision, time_step)
            .and_then(|index| self.point_set.point(index, time_step));
        match picked {
            Some(point) => {
                let event = state_event.event.clone().with_world_position(point);
                self.handle_state_event(&StateEvent::new(EIDYES, event), ctx);
            }
            None => self.post(EIDNO, state_event, ctx),
        }
        true
    }

    /// Post `EIDYES` if the picked point is selected, `EIDNO` otherwise.
    fn check_selected(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        let time_step = self.time_step();
        let Some(index) = self.point_set.search_point(&position, self.precision, time_step) else {
            log::warn!(
                "'{}': no point to check at {:?}; check the behavior file",
                self.core.type_name(),
                position
            );
            return false;
        };
        if self.point_set.is_selected(index, time_step) {
            self.last_point = position;
            self.post(EIDYES, state_event, ctx);
        } else {
            self.post(EIDNO, state_event, ctx);
        }
        true
    }

    /// Post whether the set is still short of full after one more point.
    fn check_n_minus_1(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let size = self.point_set.size(self.time_step()) as i64;
        let limit = i64::from(self.max_points);
        if limit < 0 || size < limit - 1 {
            self.post(EIDSTSMALERNMINUS1, state_event, ctx);
        } else {
            self.post(EIDSTLARGERNMINUS1, state_event, ctx);
        }
        true
    }

    fn check_equals_1(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if self.point_set.size(self.time_step()) <= 1 {
            self.post(EIDYES, state_event, ctx);
        } else {
            self.post(EIDNO, state_event, ctx);
        }
        true
    }

    /// Select the point exactly at the event position and deselect all others.
    fn select_picked_object(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        let Some(index) = self.point_set.search_point(&position, 0.0, self.time_step()) else {
            return false;
        };
        self.unselect_all(ctx);
        let do_op = self.op(PointOpKind::Select, index, position);
        let undo_op = self.op(PointOpKind::Deselect, index, position);
        self.execute(do_op, undo_op, ctx)
    }

    fn deselect_object(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        let Some(position) = state_event.event.world_position() else {
            return false;
        };
        let Some(index) = self.point_set.search_point(&position, 0.0, self.time_step()) else {
            return false;
        };
        let do_op = self.op(PointOpKind::Deselect, index, position);
        let undo_op = self.op(PointOpKind::Select, index, position);
        self.execute(do_op, undo_op, ctx)
    }

    /// Post `EIDYES` if any point is selected.
    fn check_one_selected(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if self.point_set.selected_count(self.time_step()) > 0 {
            self.post(EIDYES, state_event, ctx);
        } else {
            self.post(EIDNO, state_event, ctx);
        }
        true
    }

    /// Classify the point count against the limit: `EIDEMPTY` for at most one
    /// point, `EIDEQUALSN` when full (and nothing is selected, if exactly at
    /// the limit), `EIDSMALLERN` otherwise.
    fn check_number_of_points(
        &mut self,
        state_event: &StateEvent,
        ctx: &mut DispatchContext,
    ) -> bool {
        let time_step = self.time_step();
        let size = self.point_set.size(time_step) as i64;
        let limit = i64::from(self.max_points);
        let at_limit_with_selection =
            size == limit && self.point_set.selected_count(time_step) > 0;
        // A set filled by other means than interaction may exceed the limit.
        let id = if size <= 1 {
            EIDEMPTY
        } else if limit < 0 || size < limit || at_limit_with_selection {
            EIDSMALLERN
        } else {
            EIDEQUALSN
        };
        self.post(id, state_event, ctx);
        true
    }

    /// Post `EIDYES` for events with a display position, `EIDNO` otherwise.
    fn check_operation(&mut self, state_event: &StateEvent, ctx: &mut DispatchContext) -> bool {
        if state_event.event.input.is_positional() {
            self.post(EIDYES, state_event, ctx);
        } else {
            self.post(EIDNO, state_event, ctx);
        }
        true
    }

    /// Remove every point at the current time step.
    pub fn clear(&mut self, ctx: &mut DispatchContext) {
        for index in self.point_set.indices(self.time_step()) {
            self.remove_index(index, ctx);
        }
    }
}

impl StateMachine for PointSetInteractor {
    fn machine(&self) -> &MachineCore<Self> {
        &self.core
    }

    fn machine_mut(&mut self) -> &mut MachineCore<Self> {
        &mut self.core
    }

    fn time_step_count(&self) -> usize {
        self.point_set.time_steps()
    }

    fn apply_operation(&mut self, operation: &Operation) -> bool {
        match operation {
            Operation::Point(op) => self.apply_point_operation(op),
            other => apply_interactor_operation(self, other),
        }
    }
}

impl Interactor for PointSetInteractor {
    fn interactor(&self) -> &InteractorCore {
        &self.interactor
    }

    fn interactor_mut(&mut self) -> &mut InteractorCore {
        &mut self.interactor
    }

    fn data(&self) -> &dyn DataElement {
        &self.point_set
    }

    /// Clicking on an existing point scores 1. Otherwise an event scores the
    /// transition score if the current state can take it. Mouse moves score 0.
    fn calculate_jurisdiction(&self, state_event: &StateEvent) -> f32 {
        let input = &state_event.event.input;
        if input.event_type == EventType::MOUSE_MOVE {
            return 0.0;
        }
        let transition_score = if self.core.has_transition(state_event.id) {
            TRANSITION_SCORE
        } else {
            0.0
        };
        if !input.is_positional() {
            return transition_score;
        }
        let picked = state_event.event.world_position().is_some_and(|position| {
            self.point_set
                .search_point(&position, self.precision, self.time_step())
                .is_some()
        });
        if picked { 1.0 } else { transition_score }
    }
}

impl fmt::Debug for PointSetInteractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointSetInteractor")
            .field("core", &self.core)
            .field("mode", &self.interactor.mode())
            .field("points", &self.point_set.size(self.time_step()))
            .field("max_points", &self.max_points)
            .field("precision", &self.precision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::state_machine::EventHandler;
    use crate::undo::UndoStack;
    use mitk_input::{ButtonState, InputEvent, Key, Point2D};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Each guard lands in its own state so the outcome can be read back.
    const GUARDS: &str = r#"
        <stateMachine NAME="guards">
          <state NAME="idle" ID="0" START_STATE="TRUE">
            <transition NAME="add" NEXT_STATE_ID="0" EVENT_ID="3"><action ID="10" /></transition>
            <transition NAME="count" NEXT_STATE_ID="10" EVENT_ID="50"><action ID="45" /></transition>
            <transition NAME="any selected" NEXT_STATE_ID="20" EVENT_ID="51"><action ID="44" /></transition>
            <transition NAME="positional" NEXT_STATE_ID="30" EVENT_ID="52"><action ID="37" /></transition>
            <transition NAME="remove all" NEXT_STATE_ID="0" EVENT_ID="53"><action ID="103" /></transition>
          </state>
          <state NAME="counting" ID="10">
            <transition NAME="empty" NEXT_STATE_ID="11" EVENT_ID="1017" />
            <transition NAME="smaller" NEXT_STATE_ID="12" EVENT_ID="1014" />
            <transition NAME="equals" NEXT_STATE_ID="13" EVENT_ID="1015" />
          </state>
          <state NAME="checking selection" ID="20">
            <transition NAME="yes" NEXT_STATE_ID="21" EVENT_ID="1004" />
            <transition NAME="no" NEXT_STATE_ID="22" EVENT_ID="1003" />
          </state>
          <state NAME="checking operation" ID="30">
            <transition NAME="yes" NEXT_STATE_ID="31" EVENT_ID="1004" />
            <transition NAME="no" NEXT_STATE_ID="32" EVENT_ID="1003" />
          </state>
          <state NAME="empty" ID="11"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="smaller" ID="12"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="equals" ID="13"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="selected" ID="21"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="none selected" ID="22"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="positional" ID="31"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
          <state NAME="not positional" ID="32"><transition NAME="back" NEXT_STATE_ID="0" EVENT_ID="99" /></state>
        </stateMachine>
    "#;

    fn interactor(max_points: i32) -> PointSetInteractor {
        let mut factory = StateMachineFactory::new();
        factory.load_behavior_string(GUARDS).unwrap();
        PointSetInteractor::new("guards", &factory, PointSet::new("points"), max_points)
    }

    fn click(id: i32, x: f64) -> StateEvent {
        let input = InputEvent::mouse_press(
            ButtonState::LEFT_BUTTON,
            ButtonState::NO_BUTTON,
            Point2D::new(x, 0.0),
        );
        StateEvent::new(id, Event::new(input).with_world_position(Point3D::new(x, 0.0, 0.0)))
    }

    fn key(id: i32) -> StateEvent {
        StateEvent::new(
            id,
            Event::new(InputEvent::key_press(Key::SPACE, ButtonState::NO_BUTTON)),
        )
    }

    /// Run a guard and return the state it settled in, then go back to idle.
    fn outcome(psi: &mut PointSetInteractor, event: StateEvent) -> Option<i32> {
        let mut ctx = DispatchContext::default();
        psi.handle_event(&event, &mut ctx);
        let state = psi.current_state_id();
        psi.handle_event(&key(99), &mut ctx);
        state
    }

    fn deselect(psi: &mut PointSetInteractor, index: usize) {
        let op = PointOperation::new(PointOpKind::Deselect, index, Point3D::ORIGIN, 0);
        assert!(psi.execute_operation(&Operation::Point(op)));
    }

    #[test]
    fn test_check_number_of_points() {
        let mut psi = interactor(3);
        assert_eq!(outcome(&mut psi, key(50)), Some(11));

        let mut ctx = DispatchContext::default();
        psi.handle_event(&click(3, 0.0), &mut ctx);
        psi.handle_event(&click(3, 10.0), &mut ctx);
        assert_eq!(outcome(&mut psi, key(50)), Some(12));

        // Full, but the newest point is still selected.
        psi.handle_event(&click(3, 20.0), &mut ctx);
        assert_eq!(outcome(&mut psi, key(50)), Some(12));

        deselect(&mut psi, 2);
        assert_eq!(outcome(&mut psi, key(50)), Some(13));
    }

    #[test]
    fn test_check_number_of_points_unlimited() {
        let mut psi = interactor(-1);
        let mut ctx = DispatchContext::default();
        for i in 0..4 {
            psi.handle_event(&click(3, f64::from(i) * 10.0), &mut ctx);
        }
        deselect(&mut psi, 3);
        assert_eq!(outcome(&mut psi, key(50)), Some(12));
    }

    #[test]
    fn test_check_one_selected() {
        let mut psi = interactor(-1);
        assert_eq!(outcome(&mut psi, key(51)), Some(22));

        let mut ctx = DispatchContext::default();
        psi.handle_event(&click(3, 0.0), &mut ctx);
        assert_eq!(outcome(&mut psi, key(51)), Some(21));

        deselect(&mut psi, 0);
        assert_eq!(outcome(&mut psi, key(51)), Some(22));
    }

    #[test]
    fn test_check_operation() {
        let mut psi = interactor(-1);
        assert_eq!(outcome(&mut psi, click(52, 0.0)), Some(31));
        assert_eq!(outcome(&mut psi, key(52)), Some(32));
    }

    #[test]
    fn test_remove_all_restores_selection_on_undo() {
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let mut ctx = DispatchContext::new(stack.clone());
        let mut psi = interactor(-1);
        for i in 0..3 {
            ctx.ids_mut().inc_current_object_event_id();
            psi.handle_event(&click(3, f64::from(i) * 10.0), &mut ctx);
        }
        assert_eq!(psi.point_set().selected_indices(0), vec![2]);

        ctx.ids_mut().inc_current_object_event_id();
        assert!(psi.handle_event(&key(53), &mut ctx));
        assert!(psi.point_set().is_empty(0));

        let undone = stack.borrow_mut().pop_undo_group();
        assert_eq!(undone.len(), 3);
        for event in &undone {
            assert!(psi.execute_operation(&event.undo_op));
        }
        assert_eq!(psi.point_set().indices(0), vec![0, 1, 2]);
        assert_eq!(psi.point_set().selected_indices(0), vec![2]);
    }
}
