//! # Graphics Module
//!
//! Camera, geometry generation, scene graph, GPU resources and the render
//! engine.
//!
//! - **Camera** ([`camera`]) - Perspective camera with look-at aiming
//! - **Geometry** ([`geometry`]) - Box and cylinder mesh generation
//! - **Scene Management** ([`scene`]) - Node arena, meshes and transforms
//! - **Resource Management** ([`resources`]) - Matcap materials, environment map, textures
//! - **Rendering** ([`rendering`]) - Background + matcap passes behind [`RenderSurface`]
//!
//! [`RenderSurface`]: rendering::RenderSurface

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod viewport;

// Re-export commonly used types
pub use camera::PerspectiveCamera;
pub use rendering::{RenderEngine, RenderSurface};
pub use viewport::{apply_resize, Viewport};
