// src/lib.rs
//! Swing Set
//!
//! A matcap-shaded swing set under an HDR sky, built on wgpu and winit, with
//! a live debug panel for the seat and rope parameters.

pub mod app;
pub mod assets;
pub mod config;
pub mod gfx;
pub mod prelude;
pub mod swing;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::SwingSetApp;
pub use config::AppConfig;

/// Creates an application configured from the environment
pub fn default() -> anyhow::Result<SwingSetApp> {
    SwingSetApp::new(AppConfig::from_env())
}
