#![allow(clippy::float_cmp)]

use std::time::Duration;

use tokio::task::LocalSet;

use super::*;
use crate::geometry::Size;
use crate::host::MemoryHost;
use crate::input::WheelDelta;
use crate::render::{ManualScheduler, TokioScheduler};

const EPSILON: f64 = 1e-9;

fn host() -> MemoryHost {
    MemoryHost::new(Size::new(1000.0, 800.0), Size::new(400.0, 300.0), 100.0)
}

fn viewer() -> (Viewer<MemoryHost, ManualScheduler>, ManualScheduler) {
    let sched = ManualScheduler::new();
    let v = Viewer::new(host(), sched.clone(), ViewerConfig::default()).unwrap();
    (v, sched)
}

fn render_count(v: &Viewer<MemoryHost, ManualScheduler>) -> usize {
    v.with_host(|h| h.transforms.len())
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_renders_initial_view() {
    let (v, _) = viewer();
    assert_eq!(render_count(&v), 1);
    let last = v.with_host(|h| *h.last_transform().unwrap());
    assert_eq!(last.offset, Point::ORIGIN);
    assert_eq!(last.scale, 1.0);
    assert!(v.with_host(|h| h.last_minimap().is_some()));
}

#[test]
fn new_subscribes_controls_and_pointer_events() {
    let (v, _) = viewer();
    v.with_host(|h| {
        for control in Control::ALL {
            assert!(h.is_subscribed(ElementId::Button(control), EventKind::Click));
        }
        for kind in CONTENT_EVENTS {
            assert!(h.is_subscribed(ElementId::Content, kind));
        }
    });
}

#[test]
fn new_derives_state_from_host_sizes() {
    let (v, _) = viewer();
    let s = v.state();
    assert_eq!(s.content_size(), Size::new(1000.0, 800.0));
    assert_eq!(s.viewport_size(), Size::new(400.0, 300.0));
    assert_eq!(s.max_offset(), Size::new(600.0, 500.0));
}

#[test]
fn new_fails_fast_on_missing_element() {
    let h = host().without(ElementId::Button(Control::ZoomOut));
    let err = Viewer::new(h, ManualScheduler::new(), ViewerConfig::default()).unwrap_err();
    assert_eq!(err, ViewerError::MissingElement { element: ElementId::Button(Control::ZoomOut) });
    assert_eq!(err.error_code(), "E_MISSING_ELEMENT");
    assert!(err.to_string().contains("zoomOutBtn"));
}

#[test]
fn new_requires_minimap_elements_only_when_enabled() {
    let with = host().without(ElementId::MiniMapFrame);
    assert!(Viewer::new(with, ManualScheduler::new(), ViewerConfig::default()).is_err());

    let without = host().without(ElementId::MiniMapFrame);
    let config = ViewerConfig { minimap: false, ..ViewerConfig::default() };
    let v = Viewer::new(without, ManualScheduler::new(), config).unwrap();
    assert!(v.minimap_geometry().is_none());
    assert!(v.with_host(|h| h.minimaps.is_empty()));
}

#[test]
fn no_minimap_never_measures_frame() {
    let config = ViewerConfig { minimap: false, ..ViewerConfig::default() };
    let mut v = Viewer::new(host(), ManualScheduler::new(), config).unwrap();
    v.press(Control::Right);
    assert!(v.minimap_geometry().is_none());
    assert_eq!(v.with_host(|h| h.frame_width_reads.get()), 0);
}

#[test]
fn minimap_geometry_measures_frame_once() {
    let (v, _) = viewer();
    let before = v.with_host(|h| h.frame_width_reads.get());
    assert!(v.minimap_geometry().is_some());
    assert_eq!(v.with_host(|h| h.frame_width_reads.get()), before + 1);
}

#[test]
fn refresh_geometry_applies_both_sizes_before_clamping() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(600.0, 0.0), false);
    v.with_host_mut(|h| {
        h.content_size = Size::new(900.0, 800.0);
        h.viewport_size = Size::new(200.0, 300.0);
    });
    v.refresh_geometry();
    let s = v.state();
    assert_eq!(s.max_offset(), Size::new(700.0, 500.0));
    assert_eq!(s.position(), Point::new(600.0, 0.0));
}

#[test]
fn new_rejects_invalid_config() {
    let config = ViewerConfig { min_zoom: 2.0, max_zoom: 1.0, ..ViewerConfig::default() };
    let err = Viewer::new(host(), ManualScheduler::new(), config).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID_CONFIG");
}

#[test]
fn new_uses_configured_initial_zoom() {
    let config = ViewerConfig { initial_zoom: 0.5, ..ViewerConfig::default() };
    let v = Viewer::new(host(), ManualScheduler::new(), config).unwrap();
    assert_eq!(v.state().zoom_level(), 0.5);
    assert_eq!(v.state().max_offset(), Size::new(100.0, 100.0));
}

// =============================================================
// Drag session
// =============================================================

#[test]
fn drag_pans_and_ticks_render() {
    let (mut v, sched) = viewer();
    assert_eq!(v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0))), Action::DragStarted);
    assert_eq!(v.drag_phase(), DragPhase::Dragging);

    let action = v.handle_event(HostEvent::PointerMove(Point::new(0.0, 10.0)));
    assert_eq!(action, Action::Panned { delta: Point::new(10.0, 0.0) });
    assert_eq!(v.state().position(), Point::new(10.0, 0.0));

    // Moves alone do not repaint; the tick does.
    assert_eq!(render_count(&v), 1);
    sched.fire();
    assert_eq!(render_count(&v), 2);
    let last = v.with_host(|h| *h.last_transform().unwrap());
    assert_eq!(last.offset, Point::new(-10.0, 0.0));
}

#[test]
fn ticks_repaint_even_without_motion() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    sched.fire();
    sched.fire();
    assert_eq!(render_count(&v), 3);
    assert_eq!(v.with_host(|h| h.minimaps.len()), 3);
}

#[test]
fn pointer_up_stops_ticks_and_is_idempotent() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    assert_eq!(v.handle_event(HostEvent::PointerUp(Point::new(10.0, 10.0))), Action::DragEnded);
    assert_eq!(sched.active(), 0);
    assert_eq!(v.handle_event(HostEvent::PointerUp(Point::new(10.0, 10.0))), Action::None);
    sched.fire();
    assert_eq!(render_count(&v), 1);
    assert_eq!(v.drag_phase(), DragPhase::Idle);
}

#[test]
fn second_pointer_down_keeps_single_task() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    assert_eq!(v.handle_event(HostEvent::PointerDown(Point::new(20.0, 20.0))), Action::None);
    assert_eq!(sched.active(), 1);
}

#[test]
fn pointer_move_while_idle_does_nothing() {
    let (mut v, _) = viewer();
    assert_eq!(v.handle_event(HostEvent::PointerMove(Point::new(50.0, 50.0))), Action::None);
    assert_eq!(v.state().position(), Point::ORIGIN);
}

#[test]
fn shutdown_cancels_running_drag() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    v.shutdown();
    assert_eq!(sched.active(), 0);
    assert_eq!(v.drag_phase(), DragPhase::Idle);
}

#[test]
fn dropping_viewer_cancels_running_drag() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    drop(v);
    assert_eq!(sched.active(), 0);
    assert_eq!(sched.fire(), 0);
}

// =============================================================
// Discrete controls
// =============================================================

#[test]
fn click_right_pans_and_renders_immediately() {
    let (mut v, _) = viewer();
    assert_eq!(v.handle_event(HostEvent::Click(Control::Right)), Action::Rendered);
    assert_eq!(v.state().position(), Point::new(20.0, 0.0));
    assert_eq!(render_count(&v), 2);
}

#[test]
fn click_up_at_origin_stays_clamped() {
    let (mut v, _) = viewer();
    v.handle_event(HostEvent::Click(Control::Up));
    assert_eq!(v.state().position(), Point::ORIGIN);
    assert_eq!(render_count(&v), 2);
}

#[test]
fn click_zoom_buttons() {
    let (mut v, _) = viewer();
    v.press(Control::ZoomIn);
    assert!((v.state().zoom_level() - 1.1).abs() < EPSILON);
    v.press(Control::ZoomOut);
    v.press(Control::ZoomOut);
    assert!((v.state().zoom_level() - 0.9).abs() < EPSILON);
}

#[test]
fn controls_work_during_drag_without_disturbing_session() {
    let (mut v, sched) = viewer();
    v.handle_event(HostEvent::PointerDown(Point::new(10.0, 10.0)));
    v.handle_event(HostEvent::Click(Control::Down));
    assert_eq!(v.state().position(), Point::new(0.0, 20.0));
    assert_eq!(v.drag_phase(), DragPhase::Dragging);
    assert_eq!(sched.active(), 1);
}

#[test]
fn configured_steps_apply_to_controls() {
    let config = ViewerConfig { pan_step: 50.0, zoom_step: 0.5, ..ViewerConfig::default() };
    let mut v = Viewer::new(host(), ManualScheduler::new(), config).unwrap();
    v.press(Control::Right);
    v.press(Control::ZoomIn);
    assert_eq!(v.state().position(), Point::new(50.0, 0.0));
    assert_eq!(v.state().zoom_level(), 1.5);
}

#[test]
fn move_without_update_view_does_not_render() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(30.0, 30.0), false);
    v.zoom_by(0.2, false);
    assert_eq!(render_count(&v), 1);
    v.move_by(Point::ORIGIN, true);
    assert_eq!(render_count(&v), 2);
}

// =============================================================
// Wheel
// =============================================================

#[test]
fn wheel_is_inert() {
    let (mut v, sched) = viewer();
    let before = v.state();
    let action = v.handle_event(HostEvent::Wheel(WheelDelta { dx: 0.0, dy: -120.0 }));
    assert_eq!(action, Action::None);
    assert_eq!(v.state(), before);
    assert_eq!(render_count(&v), 1);
    assert_eq!(sched.active(), 0);
}

// =============================================================
// Minimap sync
// =============================================================

#[test]
fn minimap_follows_pan_to_max_offset() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(600.0, 500.0), true);
    let g = v.with_host(|h| *h.last_minimap().unwrap());
    assert!((g.indicator_width_pct - 40.0).abs() < EPSILON);
    assert!((g.indicator_height_pct - 37.5).abs() < EPSILON);
    assert_eq!(g.indicator_left_px, 60.0);
    assert_eq!(g.indicator_top_px, 50.0);
    assert_eq!(g.frame_height, 80.0);
    assert_eq!(v.minimap_geometry(), Some(g));
}

#[test]
fn minimap_reads_frame_width_live() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(600.0, 500.0), false);
    v.with_host_mut(|h| h.frame_width = 200.0);
    v.render();
    let g = v.with_host(|h| *h.last_minimap().unwrap());
    assert_eq!(g.indicator_left_px, 120.0);
    assert_eq!(g.frame_height, 160.0);
}

// =============================================================
// Zoom / resize
// =============================================================

#[test]
fn scenario_zoom_out_reclamps_position() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(700.0, 0.0), true);
    assert_eq!(v.state().position(), Point::new(600.0, 0.0));
    v.zoom_by(-0.95, true);
    let s = v.state();
    assert_eq!(s.zoom_level(), 0.1);
    assert_eq!(s.max_offset(), Size::ZERO);
    assert_eq!(s.position(), Point::ORIGIN);
    let last = v.with_host(|h| *h.last_transform().unwrap());
    assert_eq!(last.placement().left, "0px");
}

#[test]
fn refresh_geometry_reclamps_after_resize() {
    let (mut v, _) = viewer();
    v.move_by(Point::new(600.0, 500.0), false);
    v.with_host_mut(|h| h.viewport_size = Size::new(900.0, 700.0));
    v.refresh_geometry();
    let s = v.state();
    assert_eq!(s.max_offset(), Size::new(100.0, 100.0));
    assert_eq!(s.position(), Point::new(100.0, 100.0));
    let g = v.minimap_geometry().unwrap();
    assert!((g.indicator_width_pct - 90.0).abs() < EPSILON);
    assert_eq!(render_count(&v), 2);
}

#[test]
fn native_strategy_reaches_host() {
    let config = ViewerConfig { render_strategy: RenderStrategy::NativeScale, ..ViewerConfig::default() };
    let v = Viewer::new(host(), ManualScheduler::new(), config).unwrap();
    let last = v.with_host(|h| *h.last_transform().unwrap());
    assert_eq!(last.strategy, RenderStrategy::NativeScale);
    assert_eq!(last.placement().current_scale, Some(1.0));
}

#[test]
fn debug_format_names_viewer() {
    let (v, _) = viewer();
    assert!(format!("{v:?}").contains("Viewer"));
    assert_eq!(v.config().tick_interval, Duration::from_millis(30));
}

// =============================================================
// Tokio-driven render loop
// =============================================================

#[tokio::test(start_paused = true)]
async fn tokio_drag_session_repaints_on_interval() {
    let local = Rc::new(LocalSet::new());
    let sched = TokioScheduler::new(Rc::clone(&local));
    local
        .run_until(async {
            let mut v = Viewer::new(host(), sched, ViewerConfig::default()).unwrap();
            v.handle_event(HostEvent::PointerDown(Point::new(100.0, 100.0)));
            v.handle_event(HostEvent::PointerMove(Point::new(60.0, 80.0)));

            tokio::time::sleep(Duration::from_millis(100)).await;
            let painted = v.with_host(|h| h.transforms.len());
            assert!(painted >= 4, "expected initial render plus ticks, saw {painted}");
            let last = v.with_host(|h| *h.last_transform().unwrap());
            assert_eq!(last.offset, Point::new(-40.0, -20.0));

            v.handle_event(HostEvent::PointerUp(Point::new(60.0, 80.0)));
            tokio::time::sleep(Duration::from_millis(200)).await;
            assert_eq!(v.with_host(|h| h.transforms.len()), painted);
        })
        .await;
}
