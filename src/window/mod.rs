//! Window and frame loop
//!
//! [`WindowSettings`] is always available so samples can describe their
//! window. With the `window` feature, [`Window`] runs a winit
//! [`ApplicationHandler`](winit::application::ApplicationHandler) that owns
//! the surface and depth buffer and calls a per-frame callback with a
//! [`FrameInput`].

pub mod settings;

#[cfg(feature = "window")]
mod app;
#[cfg(feature = "window")]
pub mod event;
#[cfg(feature = "window")]
pub mod frame_io;

pub use settings::WindowSettings;

#[cfg(feature = "window")]
pub use app::{screen_target, Window};
#[cfg(feature = "window")]
pub use event::{Event, Key};
#[cfg(feature = "window")]
pub use frame_io::{FrameInput, FrameOutput, Viewport};
