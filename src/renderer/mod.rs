//! Canvas rendering module
//!
//! Draws a [`crate::view::FrameView`] as flat rectangles.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
