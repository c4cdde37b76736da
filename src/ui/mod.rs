//! # User Interface Module
//!
//! Dear ImGui integration and the live parameter panel.
//!
//! - [`UiManager`] - ImGui context, winit input and wgpu drawing
//! - [`ParameterPanel`] - Numeric controls bound to scene nodes or to the
//!   [`SwingConfig`](crate::swing::SwingConfig)
//!
//! The panel is built into an ImGui frame before the scene is drawn, so every
//! edit is visible in the same frame. The manager then records the finished
//! UI on top of the scene as a [`UiOverlay`](crate::gfx::rendering::UiOverlay).

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{Control, ControlTarget, OnChange, ParameterPanel};
