//! Virtual scrolling for long, variable-height message sequences.
//!
//! The engine never touches a terminal. Heights are discovered by a
//! [`RenderSurface`] (the measurement callback) and fed back into the
//! [`OffsetModel`]; everything time-based takes an explicit `Instant` so the
//! whole pipeline can be driven tick by tick.
//!
//! ```text
//! scroll ─► Viewport::frame ─► resolve ─► render ─► RenderSurface
//!                 ▲                          │ measured heights
//!                 └── RecalcScheduler ◄──────┘
//! ```

mod config;
mod controller;
mod engine;
mod minimap;
mod offsets;
mod render;
mod schedule;
mod window;

#[cfg(test)]
mod testing;

pub use config::ViewportConfig;
pub use controller::{SessionController, ViewState};
pub use engine::Viewport;
pub use minimap::{Minimap, MinimapIndicator};
pub use offsets::OffsetModel;
pub use render::{RenderOutcome, RenderPlan, RenderSurface, render};
pub use schedule::{RecalcScheduler, RepaintGate};
pub use window::{VisibleWindow, resolve};
