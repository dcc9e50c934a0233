//! The host environment the viewer is injected with.
//!
//! A host owns the real elements (DOM nodes, widgets, whatever) and exposes
//! only what the viewer needs: presence checks for named elements, event
//! subscription, geometry queries, and the two render sinks. Events flow back
//! into the viewer through [`crate::engine::Viewer::handle_event`].

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::Cell;
use std::fmt;

use serde::Serialize;

use crate::consts::{
    CONTENT_ELEMENT, CONTROLS_ELEMENT, MINIMAP_FRAME_ELEMENT, MINIMAP_INDICATOR_ELEMENT, VIEWPORT_ELEMENT,
};
use crate::geometry::Size;
use crate::input::Control;
use crate::minimap::MiniMapGeometry;
use crate::render::ContentTransform;

/// Named element the viewer looks up at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementId {
    Viewport,
    Content,
    Controls,
    Button(Control),
    MiniMapFrame,
    MiniMapIndicator,
}

impl ElementId {
    /// The element's id in the host document.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Viewport => VIEWPORT_ELEMENT,
            Self::Content => CONTENT_ELEMENT,
            Self::Controls => CONTROLS_ELEMENT,
            Self::Button(control) => control.element_name(),
            Self::MiniMapFrame => MINIMAP_FRAME_ELEMENT,
            Self::MiniMapIndicator => MINIMAP_INDICATOR_ELEMENT,
        }
    }

    /// Elements that must exist before a viewer can be built.
    #[must_use]
    pub fn required(with_minimap: bool) -> Vec<Self> {
        let mut ids = vec![Self::Viewport, Self::Content, Self::Controls];
        ids.extend(Control::ALL.into_iter().map(Self::Button));
        if with_minimap {
            ids.push(Self::MiniMapFrame);
            ids.push(Self::MiniMapIndicator);
        }
        ids
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event kinds the viewer subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Click,
}

/// Capabilities the viewer needs from its host.
pub trait HostEnvironment {
    /// Whether the named element exists.
    fn has_element(&self, id: ElementId) -> bool;

    /// Ask the host to deliver `kind` events raised on `target`.
    fn subscribe(&mut self, target: ElementId, kind: EventKind);

    /// Visible window size in screen pixels.
    fn viewport_size(&self) -> Size;

    /// Intrinsic size of the drawing.
    fn content_size(&self) -> Size;

    /// Current rendered width of the minimap frame.
    fn minimap_frame_width(&self) -> f64;

    /// Place and scale the content area.
    fn apply_transform(&mut self, transform: &ContentTransform);

    /// Resize the minimap frame and move its indicator.
    fn apply_minimap(&mut self, geometry: &MiniMapGeometry);
}

/// In-memory host for headless use.
///
/// Every element exists unless listed in `missing`; everything the viewer
/// renders is recorded in order.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub missing: Vec<ElementId>,
    pub viewport_size: Size,
    pub content_size: Size,
    pub frame_width: f64,
    pub subscriptions: Vec<(ElementId, EventKind)>,
    pub transforms: Vec<ContentTransform>,
    pub minimaps: Vec<MiniMapGeometry>,
    /// How many times the minimap frame width has been measured.
    pub frame_width_reads: Cell<usize>,
}

impl MemoryHost {
    #[must_use]
    pub fn new(content_size: Size, viewport_size: Size, frame_width: f64) -> Self {
        Self { viewport_size, content_size, frame_width, ..Self::default() }
    }

    /// Same host with `id` absent.
    #[must_use]
    pub fn without(mut self, id: ElementId) -> Self {
        self.missing.push(id);
        self
    }

    #[must_use]
    pub fn last_transform(&self) -> Option<&ContentTransform> {
        self.transforms.last()
    }

    #[must_use]
    pub fn last_minimap(&self) -> Option<&MiniMapGeometry> {
        self.minimaps.last()
    }

    #[must_use]
    pub fn is_subscribed(&self, target: ElementId, kind: EventKind) -> bool {
        self.subscriptions.contains(&(target, kind))
    }
}

impl HostEnvironment for MemoryHost {
    fn has_element(&self, id: ElementId) -> bool {
        !self.missing.contains(&id)
    }

    fn subscribe(&mut self, target: ElementId, kind: EventKind) {
        self.subscriptions.push((target, kind));
    }

    fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    fn content_size(&self) -> Size {
        self.content_size
    }

    fn minimap_frame_width(&self) -> f64 {
        self.frame_width_reads.set(self.frame_width_reads.get() + 1);
        self.frame_width
    }

    fn apply_transform(&mut self, transform: &ContentTransform) {
        self.transforms.push(*transform);
    }

    fn apply_minimap(&mut self, geometry: &MiniMapGeometry) {
        self.minimaps.push(*geometry);
    }
}
