//! Pan/zoom viewport engine for viewing a large drawing through a fixed-size
//! window, with an optional minimap.
//!
//! The crate owns the view state and the interaction logic. The host (a DOM
//! page, a native widget tree, a headless test harness) is injected through
//! [`host::HostEnvironment`]: it reports element presence and geometry,
//! receives render output, and feeds pointer and button events back into
//! [`engine::Viewer::handle_event`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The [`engine::Viewer`] component tying everything together |
//! | [`viewport`] | Pan offset, zoom level, and the sizes bounds derive from |
//! | [`transform`] | Clamping rules and the move/zoom/recompute operations |
//! | [`input`] | Host events, discrete controls, and the drag state machine |
//! | [`minimap`] | Minimap frame and indicator geometry |
//! | [`render`] | Render output and the cancellable periodic render task |
//! | [`host`] | Host environment trait and an in-memory host |
//! | [`config`] | Viewer configuration and environment overrides |
//! | [`error`] | Construction errors |
//! | [`geometry`] | `Point` and `Size` |
//! | [`consts`] | Defaults and host element names |

pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod minimap;
pub mod render;
pub mod transform;
pub mod viewport;
