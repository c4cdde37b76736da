//! # Scene Management Module
//!
//! An arena-backed scene graph: group and mesh nodes with local transforms,
//! generated geometry, and material references into the scene's
//! [`MaterialManager`](crate::gfx::resources::MaterialManager).
//!
//! - [`Scene`] - Node arena, camera, materials and environment
//! - [`SceneNode`] - Group or renderable leaf
//! - [`Geometry`] - Generated mesh data with lazily uploaded GPU buffers
//! - [`Vertex3D`] - Vertex layout shared with the matcap shader

pub mod mesh;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use mesh::{DrawGeometry, Geometry, GeometryDescriptor, GeometryId};
pub use node::{MeshBinding, NodeField, NodeId, SceneNode, Transform, TransformUniform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
