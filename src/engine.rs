//! The viewer component: owns the viewport state, the drag controller, the
//! optional minimap, and the injected host.
//!
//! State that the render tick must reach lives in a shared `Scene`; the tick
//! holds only a weak reference to it, so a tick outliving its viewer renders
//! nothing.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, info, trace, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::geometry::Point;
use crate::host::{ElementId, EventKind, HostEnvironment};
use crate::input::{Control, ControlCommand, DragController, DragPhase, HostEvent};
use crate::minimap::{MiniMapGeometry, MiniMapSync};
use crate::render::{ContentTransform, RenderStrategy, Scheduler, Tick};
use crate::viewport::ViewportState;

/// What handling an event did, for the host's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Nothing changed.
    None,
    DragStarted,
    /// The view was panned by `delta`; the next tick repaints it.
    Panned { delta: Point },
    DragEnded,
    /// The view was changed and repainted immediately.
    Rendered,
}

/// Everything a render pass reads or writes.
pub(crate) struct Scene<H> {
    pub(crate) state: ViewportState,
    pub(crate) minimap: Option<MiniMapSync>,
    pub(crate) host: H,
    strategy: RenderStrategy,
}

impl<H: HostEnvironment> Scene<H> {
    /// Push the current transform to the host, then refresh the minimap.
    fn render(&mut self) -> ContentTransform {
        let transform = ContentTransform::from_state(&self.state, self.strategy);
        self.host.apply_transform(&transform);
        if let Some(minimap) = &self.minimap {
            let frame_width = self.host.minimap_frame_width();
            let geometry = minimap.update(self.state.zoom_level(), self.state.position(), frame_width);
            self.host.apply_minimap(&geometry);
        }
        transform
    }
}

/// Subscriptions made during construction.
const CONTENT_EVENTS: [EventKind; 4] =
    [EventKind::PointerDown, EventKind::PointerUp, EventKind::PointerMove, EventKind::Wheel];

pub struct Viewer<H: HostEnvironment + 'static, S: Scheduler> {
    scene: Rc<RefCell<Scene<H>>>,
    drag: DragController,
    scheduler: S,
    config: ViewerConfig,
}

impl<H: HostEnvironment + 'static, S: Scheduler> Viewer<H, S> {
    /// Build a viewer against `host`.
    ///
    /// Every required element is checked before anything is subscribed or
    /// measured; a missing one fails the whole construction.
    pub fn new(mut host: H, scheduler: S, config: ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;
        if let Some(element) = ElementId::required(config.minimap).into_iter().find(|id| !host.has_element(*id)) {
            warn!(%element, "viewer construction aborted: element missing");
            return Err(ViewerError::MissingElement { element });
        }

        for control in Control::ALL {
            host.subscribe(ElementId::Button(control), EventKind::Click);
        }
        for kind in CONTENT_EVENTS {
            host.subscribe(ElementId::Content, kind);
        }

        let content_size = host.content_size();
        let viewport_size = host.viewport_size();
        let state = ViewportState::new(content_size, viewport_size, config.zoom_limits(), config.initial_zoom);
        let minimap = config.minimap.then(|| MiniMapSync::new(content_size, viewport_size));

        info!(
            content_w = content_size.width,
            content_h = content_size.height,
            viewport_w = viewport_size.width,
            viewport_h = viewport_size.height,
            zoom = state.zoom_level(),
            minimap = config.minimap,
            strategy = ?config.render_strategy,
            "viewer initialized"
        );

        let scene = Scene { state, minimap, host, strategy: config.render_strategy };
        let viewer = Self {
            scene: Rc::new(RefCell::new(scene)),
            drag: DragController::new(config.tick_interval),
            scheduler,
            config,
        };
        viewer.render();
        Ok(viewer)
    }

    // --- Events ---

    /// Dispatch one host event.
    ///
    /// Wheel events are subscribed but deliberately inert.
    pub fn handle_event(&mut self, event: HostEvent) -> Action {
        match event {
            HostEvent::PointerDown(pos) => {
                let tick = render_tick(Rc::downgrade(&self.scene));
                if self.drag.on_pointer_down(pos, &self.scheduler, tick) {
                    Action::DragStarted
                } else {
                    Action::None
                }
            }
            HostEvent::PointerMove(pos) => {
                let mut scene = self.scene.borrow_mut();
                match self.drag.on_pointer_move(pos, &mut scene.state) {
                    Some(delta) => Action::Panned { delta },
                    None => Action::None,
                }
            }
            HostEvent::PointerUp(_) => {
                if self.drag.on_pointer_up() {
                    Action::DragEnded
                } else {
                    Action::None
                }
            }
            HostEvent::Click(control) => self.press(control),
            HostEvent::Wheel(delta) => {
                trace!(dx = delta.dx, dy = delta.dy, "wheel ignored");
                Action::None
            }
        }
    }

    /// Apply a discrete button press and repaint.
    pub fn press(&mut self, control: Control) -> Action {
        debug!(?control, "control pressed");
        match control.command(self.config.pan_step, self.config.zoom_step) {
            ControlCommand::Move(delta) => self.move_by(delta, true),
            ControlCommand::Zoom(delta) => self.zoom_by(delta, true),
        }
        Action::Rendered
    }

    // --- Transform ---

    /// Pan by `delta`; repaint now when `update_view` is set.
    pub fn move_by(&mut self, delta: Point, update_view: bool) {
        self.scene.borrow_mut().state.move_by(delta);
        if update_view {
            self.render();
        }
    }

    /// Zoom by `delta`; repaint now when `update_view` is set.
    pub fn zoom_by(&mut self, delta: f64, update_view: bool) {
        self.scene.borrow_mut().state.zoom_by(delta);
        if update_view {
            self.render();
        }
    }

    /// Re-read viewport and content sizes from the host after a resize, and
    /// repaint.
    pub fn refresh_geometry(&mut self) {
        {
            let mut scene = self.scene.borrow_mut();
            let content_size = scene.host.content_size();
            let viewport_size = scene.host.viewport_size();
            scene.state.set_sizes(content_size, viewport_size);
            if let Some(minimap) = scene.minimap.as_mut() {
                minimap.resize(content_size, viewport_size);
            }
            debug!(
                viewport_w = viewport_size.width,
                viewport_h = viewport_size.height,
                max_x = scene.state.max_offset().width,
                max_y = scene.state.max_offset().height,
                "geometry refreshed"
            );
        }
        self.render();
    }

    /// Repaint the content and the minimap from the current state.
    pub fn render(&self) -> ContentTransform {
        self.scene.borrow_mut().render()
    }

    /// End any drag in progress, cancelling its render task.
    pub fn shutdown(&mut self) {
        if self.drag.on_pointer_up() {
            debug!("viewer shut down mid-drag");
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.scene.borrow().state.clone()
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Minimap geometry for the current state, if a minimap is configured.
    #[must_use]
    pub fn minimap_geometry(&self) -> Option<MiniMapGeometry> {
        let scene = self.scene.borrow();
        scene.minimap.as_ref().map(|mm| {
            let frame_width = scene.host.minimap_frame_width();
            mm.update(scene.state.zoom_level(), scene.state.position(), frame_width)
        })
    }

    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Borrow the host, e.g. to inspect what it has been told to render.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.scene.borrow().host)
    }

    /// Mutably borrow the host. Follow a host-side resize with
    /// [`Self::refresh_geometry`].
    pub fn with_host_mut<R>(&mut self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.scene.borrow_mut().host)
    }
}

impl<H: HostEnvironment + 'static, S: Scheduler> fmt::Debug for Viewer<H, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("state", &self.scene.borrow().state)
            .field("drag", &self.drag)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Tick body for a drag session: repaint if the scene is still alive and not
/// mid-update.
fn render_tick<H: HostEnvironment + 'static>(scene: Weak<RefCell<Scene<H>>>) -> Tick {
    Box::new(move || {
        let Some(scene) = scene.upgrade() else {
            return;
        };
        match scene.try_borrow_mut() {
            Ok(mut scene) => {
                let t = scene.render();
                trace!(x = -t.offset.x, y = -t.offset.y, zoom = t.scale, "render tick");
            }
            Err(_) => warn!("render tick skipped; scene busy"),
        }
    })
}
