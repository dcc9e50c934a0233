//! Render output and the periodic render task.
//!
//! [`ContentTransform`] is what the host's render sink receives: the negated
//! pan offset and the zoom level, plus the placement strategy the host should
//! use to apply them. [`Scheduler`] produces the repeating tick that drives
//! rendering while a drag is active; the returned [`RenderTask`] cancels the
//! tick when dropped.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::LocalSet;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

use crate::geometry::Point;
use crate::viewport::ViewportState;

// =============================================================================
// CONTENT TRANSFORM
// =============================================================================

/// How the host applies offset and scale to the content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStrategy {
    /// Absolute `left`/`top` plus a `scale()` transform.
    #[default]
    PositionAndScale,
    /// Offset plus the element's native current-scale property.
    NativeScale,
}

/// Offset and scale to apply to the content area for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentTransform {
    /// Top-left of the content relative to the viewport; the negated pan offset.
    pub offset: Point,
    pub scale: f64,
    pub strategy: RenderStrategy,
}

/// Style-level placement derived from a [`ContentTransform`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub left: String,
    pub top: String,
    /// Set for [`RenderStrategy::PositionAndScale`].
    pub transform: Option<String>,
    /// Set for [`RenderStrategy::NativeScale`].
    pub current_scale: Option<f64>,
}

impl ContentTransform {
    #[must_use]
    pub fn from_state(state: &ViewportState, strategy: RenderStrategy) -> Self {
        let p = state.position();
        Self { offset: Point::new(-p.x, -p.y), scale: state.zoom_level(), strategy }
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        let (transform, current_scale) = match self.strategy {
            RenderStrategy::PositionAndScale => (Some(format!("scale({})", self.scale)), None),
            RenderStrategy::NativeScale => (None, Some(self.scale)),
        };
        Placement { left: px(self.offset.x), top: px(self.offset.y), transform, current_scale }
    }
}

fn px(v: f64) -> String {
    // Normalize -0.0 so an unpanned axis prints as "0px".
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v}px")
}

// =============================================================================
// RENDER TASK
// =============================================================================

/// Callback run on every tick.
pub type Tick = Box<dyn FnMut()>;

/// Handle to a running repeating tick. Dropping it cancels the tick.
pub struct RenderTask {
    interval: Duration,
    cancel: Option<Box<dyn FnOnce()>>,
}

impl RenderTask {
    /// Wrap a scheduler-specific cancel hook.
    #[must_use]
    pub fn new(interval: Duration, cancel: impl FnOnce() + 'static) -> Self {
        Self { interval, cancel: Some(Box::new(cancel)) }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the tick. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            trace!(interval = ?self.interval, "render task cancelled");
            cancel();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for RenderTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTask")
            .field("interval", &self.interval)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Source of repeating ticks.
pub trait Scheduler {
    /// Start calling `tick` every `interval` until the returned task is
    /// cancelled or dropped.
    fn schedule_repeating(&self, interval: Duration, tick: Tick) -> RenderTask;
}

/// Runs ticks as tasks on a shared [`LocalSet`].
///
/// Tasks are queued on the set directly, so scheduling works from anywhere;
/// they make progress while the host drives the set (`run_until` or
/// `.await`). The first tick fires one interval after scheduling and missed
/// ticks are skipped rather than bunched up.
///
/// ```no_run
/// use std::rc::Rc;
///
/// use drawing_viewport::config::ViewerConfig;
/// use drawing_viewport::engine::Viewer;
/// use drawing_viewport::geometry::Size;
/// use drawing_viewport::host::MemoryHost;
/// use drawing_viewport::render::TokioScheduler;
/// use tokio::task::LocalSet;
///
/// # async fn demo() -> Result<(), drawing_viewport::error::ViewerError> {
/// let local = Rc::new(LocalSet::new());
/// let host = MemoryHost::new(Size::new(1000.0, 800.0), Size::new(400.0, 300.0), 100.0);
/// let viewer = Viewer::new(host, TokioScheduler::new(Rc::clone(&local)), ViewerConfig::default())?;
/// local.run_until(async move { /* feed viewer events here */ drop(viewer) }).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    local: Rc<LocalSet>,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(local: Rc<LocalSet>) -> Self {
        Self { local }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&self, interval: Duration, mut tick: Tick) -> RenderTask {
        let handle = self.local.spawn_local(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                tick();
            }
        });
        RenderTask::new(interval, move || handle.abort())
    }
}

struct ManualSlot {
    tick: Tick,
    cancelled: Rc<Cell<bool>>,
}

/// Ticks that fire only when the host says so.
///
/// For hosts that already own a frame loop, and for tests. Clones share the
/// same task list.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    slots: Rc<RefCell<Vec<ManualSlot>>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every live tick once. Returns how many ran.
    pub fn fire(&self) -> usize {
        let mut slots = self.slots.borrow_mut();
        slots.retain(|slot| !slot.cancelled.get());
        for slot in slots.iter_mut() {
            (slot.tick)();
        }
        slots.len()
    }

    /// Number of scheduled tasks that have not been cancelled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.slots.borrow().iter().filter(|slot| !slot.cancelled.get()).count()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: Tick) -> RenderTask {
        let cancelled = Rc::new(Cell::new(false));
        self.slots.borrow_mut().push(ManualSlot { tick, cancelled: Rc::clone(&cancelled) });
        RenderTask::new(interval, move || cancelled.set(true))
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler").field("active", &self.active()).finish()
    }
}
