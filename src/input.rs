//! Input model: host events, discrete controls, and the drag state machine.
//!
//! `DragController` turns pointer-down/move/up into incremental pan deltas.
//! A drag session carries the last pointer position and the render task that
//! repaints the view while the pointer is held; ending the session drops the
//! task, which cancels it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::geometry::Point;
use crate::render::{RenderTask, Scheduler, Tick};
use crate::viewport::ViewportState;

/// One of the six discrete view buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    ZoomIn,
    ZoomOut,
}

/// What a control asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    Move(Point),
    Zoom(f64),
}

impl Control {
    pub const ALL: [Self; 6] = [Self::Up, Self::Down, Self::Left, Self::Right, Self::ZoomIn, Self::ZoomOut];

    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Up => "upBtn",
            Self::Down => "downBtn",
            Self::Left => "leftBtn",
            Self::Right => "rightBtn",
            Self::ZoomIn => "zoomInBtn",
            Self::ZoomOut => "zoomOutBtn",
        }
    }

    /// The pan or zoom this control performs for the given step sizes.
    #[must_use]
    pub fn command(self, pan_step: f64, zoom_step: f64) -> ControlCommand {
        match self {
            Self::Up => ControlCommand::Move(Point::new(0.0, -pan_step)),
            Self::Down => ControlCommand::Move(Point::new(0.0, pan_step)),
            Self::Left => ControlCommand::Move(Point::new(-pan_step, 0.0)),
            Self::Right => ControlCommand::Move(Point::new(pan_step, 0.0)),
            Self::ZoomIn => ControlCommand::Zoom(zoom_step),
            Self::ZoomOut => ControlCommand::Zoom(-zoom_step),
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    pub dx: f64,
    pub dy: f64,
}

/// Event delivered by the host. Pointer positions are in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    Wheel(WheelDelta),
    Click(Control),
}

/// Drag state machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
}

/// State of one pointer-down .. pointer-up interval.
#[derive(Debug)]
pub struct DragSession {
    /// Screen position of the previous pointer event.
    pub last_pointer: Point,
    render_task: RenderTask,
}

impl DragSession {
    #[must_use]
    pub fn render_task(&self) -> &RenderTask {
        &self.render_task
    }
}

#[derive(Debug)]
pub struct DragController {
    tick_interval: Duration,
    session: Option<DragSession>,
}

impl DragController {
    #[must_use]
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval, session: None }
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() { DragPhase::Dragging } else { DragPhase::Idle }
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Begin a drag at `pos` and start repainting through `tick`.
    ///
    /// Returns `false` (and drops `tick` unused) when a drag is already
    /// active.
    pub fn on_pointer_down(&mut self, pos: Point, scheduler: &dyn Scheduler, tick: Tick) -> bool {
        if self.session.is_some() {
            trace!(x = pos.x, y = pos.y, "pointer down ignored; drag already active");
            return false;
        }
        let render_task = scheduler.schedule_repeating(self.tick_interval, tick);
        self.session = Some(DragSession { last_pointer: pos, render_task });
        debug!(x = pos.x, y = pos.y, interval = ?self.tick_interval, "drag started");
        true
    }

    /// Pan `state` by the inverted pointer movement since the last event.
    ///
    /// Dragging right moves the view left, so the delta is `last - pos`.
    /// Returns the delta applied, or `None` when no drag is active.
    pub fn on_pointer_move(&mut self, pos: Point, state: &mut ViewportState) -> Option<Point> {
        let session = self.session.as_mut()?;
        let delta = session.last_pointer - pos;
        state.move_by(delta);
        session.last_pointer = pos;
        Some(delta)
    }

    /// End the drag, cancelling its render task. Returns whether a drag was
    /// active; calling it while idle does nothing.
    pub fn on_pointer_up(&mut self) -> bool {
        match self.session.take() {
            Some(mut session) => {
                session.render_task.cancel();
                debug!(x = session.last_pointer.x, y = session.last_pointer.y, "drag ended");
                true
            }
            None => false,
        }
    }
}
