//! # Swing Set Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use swingset::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut app = SwingSetApp::new(AppConfig::default())?;
//!     app.panel_mut().show();
//!     app.run()
//! }
//! ```

// Re-export core application types
pub use crate::app::SwingSetApp;
pub use crate::config::AppConfig;
pub use crate::default;

// Re-export graphics and scene types
pub use crate::gfx::camera::PerspectiveCamera;
pub use crate::gfx::scene::{NodeId, Scene, SceneNode, Transform};
pub use crate::gfx::{apply_resize, RenderSurface, Viewport};

// Re-export the swing set itself
pub use crate::swing::{build_controls, build_swing_set, SwingAnimation, SwingConfig, SwingSetNodes};

// Re-export UI types
pub use crate::ui::{Control, ControlTarget, ParameterPanel};

// Re-export common external dependencies
pub use cgmath::{Vector3, Zero};
