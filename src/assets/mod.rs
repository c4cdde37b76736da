//! Texture assets decoded off the render thread

pub mod loader;

pub use loader::{AssetError, AssetEvent, AssetLoader};
