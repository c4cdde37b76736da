// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, materials, the environment map and bind groups for rendering.

pub mod environment;
pub mod global_bindings;
pub mod layouts;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use environment::EnvironmentMap;
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use layouts::SceneLayouts;
pub use material::{MatcapMaterial, MaterialId, MaterialManager, DEFAULT_MATERIAL};
pub use texture_resource::TextureResource;
