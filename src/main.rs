//! Headless demo: drives a viewer through a scripted drag and a few button
//! presses against an in-memory host, logging every painted frame.

use std::rc::Rc;
use std::time::Duration;

use drawing_viewport::config::ViewerConfig;
use drawing_viewport::engine::Viewer;
use drawing_viewport::error::ViewerError;
use drawing_viewport::geometry::{Point, Size};
use drawing_viewport::host::MemoryHost;
use drawing_viewport::input::{Control, HostEvent};
use drawing_viewport::render::TokioScheduler;
use serde_json::json;
use tokio::task::LocalSet;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ViewerError> {
    tracing_subscriber::fmt::init();

    let config = ViewerConfig::from_env()?;
    let host = MemoryHost::new(Size::new(1000.0, 800.0), Size::new(400.0, 300.0), 100.0);

    let local = Rc::new(LocalSet::new());
    let scheduler = TokioScheduler::new(Rc::clone(&local));
    local.run_until(run_script(host, scheduler, config)).await
}

async fn run_script(host: MemoryHost, scheduler: TokioScheduler, config: ViewerConfig) -> Result<(), ViewerError> {
    let tick = config.tick_interval;
    let mut viewer = Viewer::new(host, scheduler, config)?;

    viewer.handle_event(HostEvent::PointerDown(Point::new(300.0, 200.0)));
    for step in 1..=10 {
        let offset = f64::from(step) * 25.0;
        viewer.handle_event(HostEvent::PointerMove(Point::new(300.0 - offset, 200.0 - offset)));
        tokio::time::sleep(tick / 2).await;
    }
    tokio::time::sleep(tick * 2).await;
    viewer.handle_event(HostEvent::PointerUp(Point::new(50.0, -50.0)));

    for control in [Control::ZoomOut, Control::ZoomOut, Control::Left, Control::ZoomIn] {
        viewer.handle_event(HostEvent::Click(control));
    }
    tokio::time::sleep(Duration::from_millis(10)).await;

    viewer.with_host(|host| {
        for (frame, (transform, minimap)) in host.transforms.iter().zip(&host.minimaps).enumerate() {
            let line = json!({
                "frame": frame,
                "placement": transform.placement(),
                "minimap": minimap,
            });
            tracing::info!(%line, "frame");
        }
    });

    let state = viewer.state();
    tracing::info!(
        x = state.position().x,
        y = state.position().y,
        zoom = state.zoom_level(),
        frames = viewer.with_host(|host| host.transforms.len()),
        "demo finished"
    );
    Ok(())
}
