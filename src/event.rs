//! Events as seen by state machines.
//!
//! A raw [`InputEvent`] is wrapped together with the render context that sent
//! it. Once the event mapper has found its id, the pair travels through the
//! dispatcher as a [`StateEvent`].

use mitk_input::{InputEvent, Point2D};
use std::fmt;
use std::rc::Rc;

use crate::geometry::Point3D;

/// Services a render window offers to the interaction engine.
///
/// The engine calls into the render context but never implements picking or
/// rendering itself.
pub trait RenderContext {
    /// Name used in log output.
    fn name(&self) -> &str {
        "renderer"
    }

    /// The time step currently displayed.
    fn time_step(&self) -> usize;

    /// World position under a display point, if anything was picked.
    fn pick_world_position(&self, display: &Point2D) -> Option<Point3D>;

    /// Ask for a redraw after data or camera changed.
    fn request_update(&self);
}

/// A raw input event plus where it came from.
#[derive(Clone)]
pub struct Event {
    pub input: InputEvent,
    pub sender: Option<Rc<dyn RenderContext>>,
    world_position: Option<Point3D>,
}

impl Event {
    pub fn new(input: InputEvent) -> Self {
        Self {
            input,
            sender: None,
            world_position: None,
        }
    }

    /// Attach the render context that produced the event.
    pub fn with_sender(mut self, sender: Rc<dyn RenderContext>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Attach an already picked world position.
    pub fn with_world_position(mut self, position: Point3D) -> Self {
        self.world_position = Some(position);
        self
    }

    /// World position of the event.
    ///
    /// Uses the explicit position if one was attached, otherwise asks the
    /// sender to pick at the display position.
    pub fn world_position(&self) -> Option<Point3D> {
        if self.world_position.is_some() {
            return self.world_position;
        }
        let display = self.input.display_position?;
        self.sender.as_ref()?.pick_world_position(&display)
    }

    /// Time step reported by the sender, if any.
    pub fn sender_time_step(&self) -> Option<usize> {
        self.sender.as_ref().map(|s| s.time_step())
    }

    /// Ask the sender for a redraw.
    pub fn request_update(&self) {
        if let Some(sender) = &self.sender {
            sender.request_update();
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("input", &self.input)
            .field("sender", &self.sender.as_ref().map(|s| s.name().to_string()))
            .field("world_position", &self.world_position)
            .finish()
    }
}

/// An event together with the id the event mapper assigned to it.
#[derive(Debug, Clone)]
pub struct StateEvent {
    pub id: i32,
    pub event: Event,
}

impl StateEvent {
    pub fn new(id: i32, event: Event) -> Self {
        Self { id, event }
    }

    /// Same event under a different id.
    ///
    /// Guard actions use this to feed a follow-up event (`EIDYES`, `EIDNO`, ...)
    /// back into their own state machine.
    pub fn with_id(&self, id: i32) -> Self {
        Self {
            id,
            event: self.event.clone(),
        }
    }
}
