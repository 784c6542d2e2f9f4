//! End-to-end point editing through the dispatcher.

use std::cell::RefCell;
use std::rc::Rc;

use mitk_input::Key;

use super::fixtures::{self, key, left_click, left_drag, left_release, shift_click};
use crate::config::InteractionConfig;
use crate::dispatch::DispatchContext;
use crate::event::StateEvent;
use crate::geometry::Point3D;
use crate::global_interaction::GlobalInteraction;
use crate::interactor::{Interactor, InteractorMode};
use crate::point_set::{PointOpKind, PointSet};
use crate::point_set_interactor::PointSetInteractor;
use crate::state_machine::EventHandler;
use crate::undo::UndoStack;

struct Scene {
    global: GlobalInteraction,
    points: Rc<RefCell<PointSetInteractor>>,
    stack: Rc<RefCell<UndoStack>>,
    ctx: DispatchContext,
}

impl Scene {
    fn new(max_points: i32) -> Self {
        let mut global = GlobalInteraction::new();
        global.initialize("global", &fixtures::behavior()).unwrap();
        let psi = PointSetInteractor::new(
            "pointsetinteractor",
            global.factory(),
            PointSet::new("landmarks"),
            max_points,
        );
        let points = Rc::new(RefCell::new(psi));
        global.add_interactor(points.clone());
        let stack = Rc::new(RefCell::new(UndoStack::new()));
        let ctx = DispatchContext::new(stack.clone());
        Self {
            global,
            points,
            stack,
            ctx,
        }
    }

    /// Shift-click at a distinct display position per call.
    fn add(&mut self, at: Point3D) -> bool {
        let event = shift_click(at.x * 10.0, at.y * 10.0, at);
        self.global.map_event(&event, 0, &mut self.ctx)
    }

    fn size(&self) -> usize {
        self.points.borrow().point_set().size(0)
    }

    fn state(&self) -> Option<i32> {
        self.points.borrow().current_state_id()
    }

    fn undo(&mut self) -> bool {
        self.global.undo(&mut self.stack.borrow_mut())
    }

    fn redo(&mut self) -> bool {
        self.global.redo(&mut self.stack.borrow_mut())
    }
}

const P1: Point3D = Point3D::new(1.0, 2.0, 3.0);
const P2: Point3D = Point3D::new(20.0, 20.0, 20.0);
const P3: Point3D = Point3D::new(-30.0, 0.0, 0.0);

#[test]
fn test_add_points_up_to_limit() {
    let mut scene = Scene::new(2);

    assert!(scene.add(P1));
    assert_eq!(scene.size(), 1);
    assert_eq!(scene.state(), Some(2));

    assert!(scene.add(P2));
    assert_eq!(scene.size(), 2);
    // Full: only delete and clear are accepted now.
    assert_eq!(scene.state(), Some(4));

    assert!(!scene.add(P3));
    assert_eq!(scene.size(), 2);

    // Only the newest point is selected.
    let points = scene.points.borrow();
    assert_eq!(points.point_set().selected_indices(0), vec![1]);
    assert_eq!(points.point_set().point(1, 0), Some(P2));
}

#[test]
fn test_unlimited_points() {
    let mut scene = Scene::new(-1);
    for i in 0..5 {
        assert!(scene.add(Point3D::new(f64::from(i) * 50.0, 0.0, 0.0)));
    }
    assert_eq!(scene.size(), 5);
    assert_eq!(scene.state(), Some(2));
}

#[test]
fn test_delete_selects_neighbor() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    scene.add(P2);

    assert!(scene.global.map_event(&key(Key::DELETE), 0, &mut scene.ctx));
    assert_eq!(scene.size(), 1);
    assert_eq!(scene.state(), Some(2));
    assert_eq!(scene.points.borrow().point_set().selected_indices(0), vec![0]);

    // Deleting the last point returns to the empty state.
    assert!(scene.global.map_event(&key(Key::DELETE), 0, &mut scene.ctx));
    assert_eq!(scene.size(), 0);
    assert_eq!(scene.state(), Some(1));
}

#[test]
fn test_clear_removes_every_point() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    scene.add(P2);

    // Escape never reaches interactors under the "global" dispatch pattern.
    scene.global.map_event(&key(Key::ESCAPE), 0, &mut scene.ctx);
    assert_eq!(scene.size(), 2);

    let mut ctx = DispatchContext::default();
    scene.points.borrow_mut().clear(&mut ctx);
    assert_eq!(scene.size(), 0);
}

#[test]
fn test_undo_clear_restores_selection() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    scene.add(P2);
    assert_eq!(scene.points.borrow().point_set().selected_indices(0), vec![1]);

    scene.ctx.ids_mut().inc_current_object_event_id();
    scene.points.borrow_mut().clear(&mut scene.ctx);
    assert_eq!(scene.size(), 0);

    assert!(scene.undo());
    assert_eq!(scene.size(), 2);
    let points = scene.points.borrow();
    assert!(!points.point_set().is_selected(0, 0));
    assert_eq!(points.point_set().selected_indices(0), vec![1]);
}

#[test]
fn test_click_on_unselected_point_selects_it() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    scene.add(P2);

    // P1 is near but not exactly under the cursor.
    let near_p1 = Point3D::new(1.5, 2.0, 3.0);
    assert!(scene.global.map_event(&left_click(5.0, 5.0, near_p1), 0, &mut scene.ctx));
    assert_eq!(scene.state(), Some(2));
    assert_eq!(scene.points.borrow().point_set().selected_indices(0), vec![0]);
}

#[test]
fn test_click_on_empty_space_deselects_all() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    assert!(scene.points.borrow().point_set().is_selected(0, 0));

    assert!(scene.global.map_event(&left_click(0.0, 0.0, P3), 0, &mut scene.ctx));
    assert_eq!(scene.state(), Some(2));
    assert_eq!(scene.points.borrow().point_set().selected_count(0), 0);
}

#[test]
fn test_drag_moves_point_and_undo_restores_it() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    let id = scene.points.borrow().machine_id();

    assert!(scene.global.map_event(&left_click(50.0, 50.0, P1), 0, &mut scene.ctx));
    assert_eq!(scene.state(), Some(50));
    assert_eq!(scene.points.borrow().mode(), InteractorMode::Selected);
    assert_eq!(scene.global.selected_interactors(), vec![id]);

    let target = Point3D::new(4.0, 6.0, 3.0);
    let midway = Point3D::new(2.0, 4.0, 3.0);
    assert!(scene.global.map_event(&left_drag(55.0, 55.0, midway), 0, &mut scene.ctx));
    assert!(scene.global.map_event(&left_drag(60.0, 60.0, target), 0, &mut scene.ctx));
    assert!(scene.global.map_event(&left_release(60.0, 60.0, target), 0, &mut scene.ctx));

    assert_eq!(scene.points.borrow().point_set().point(0, 0), Some(target));
    assert_eq!(scene.state(), Some(2));
    assert_eq!(scene.points.borrow().mode(), InteractorMode::Deselected);
    assert!(scene.global.selected_interactors().is_empty());

    // The whole gesture is one undo step.
    assert!(scene.undo());
    assert_eq!(scene.points.borrow().point_set().point(0, 0), Some(P1));
    assert_eq!(scene.state(), Some(2));
    assert_eq!(scene.points.borrow().mode(), InteractorMode::Deselected);
    assert!(scene.global.selected_interactors().is_empty());

    assert!(scene.redo());
    assert_eq!(scene.points.borrow().point_set().point(0, 0), Some(target));
    assert_eq!(scene.state(), Some(2));
}

#[test]
fn test_undo_add_returns_to_empty_state() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    assert_eq!(scene.size(), 1);

    assert!(scene.undo());
    assert_eq!(scene.size(), 0);
    assert_eq!(scene.state(), Some(1));
    assert!(!scene.undo());

    assert!(scene.redo());
    assert_eq!(scene.size(), 1);
    assert_eq!(scene.state(), Some(2));
}

#[test]
fn test_changes_are_announced() {
    let mut scene = Scene::new(-1);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    scene
        .points
        .borrow_mut()
        .point_set_changed()
        .add_listener(move |op| sink.borrow_mut().push(op.kind));

    scene.add(P1);
    scene.add(P2);
    scene.undo();

    assert_eq!(
        *seen.borrow(),
        vec![
            PointOpKind::Insert,
            PointOpKind::Deselect,
            PointOpKind::Insert,
            PointOpKind::Remove,
            PointOpKind::Select,
        ]
    );
}

#[test]
fn test_config_disables_undo() {
    let mut scene = Scene::new(-1);
    let mut config = InteractionConfig::new();
    config.undo.enabled = false;
    config.point_precision = 0.5;
    scene.points.borrow_mut().apply_config(&config);

    scene.add(P1);
    assert_eq!(scene.stack.borrow().undo_count(), 0);
    assert!(!scene.undo());

    // A click 1.0 away from P1 no longer picks it.
    let aside = Point3D::new(2.0, 2.0, 3.0);
    scene.global.map_event(&left_click(5.0, 5.0, aside), 0, &mut scene.ctx);
    assert_eq!(scene.points.borrow().point_set().selected_count(0), 0);
}

#[test]
fn test_jurisdiction_prefers_picked_point() {
    let mut scene = Scene::new(-1);
    scene.add(P1);
    let points = scene.points.borrow();
    let on_point = StateEvent::new(1, left_click(0.0, 0.0, P1));
    let elsewhere = StateEvent::new(1, left_click(0.0, 0.0, P3));
    let moving = StateEvent::new(530, left_drag(0.0, 0.0, P1));

    assert_eq!(points.calculate_jurisdiction(&on_point), 1.0);
    assert_eq!(points.calculate_jurisdiction(&elsewhere), 0.5);
    assert_eq!(points.calculate_jurisdiction(&moving), 0.0);
}
