//! Matcap material system
//!
//! Provides material definitions and centralized management with GPU resource handling.
//! Materials are stored in MaterialManager and scene nodes reference them by ID,
//! so every node holding the same id shares one material.

use std::collections::HashMap;
use wgpu::Device;

use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc};

use super::texture_resource::TextureResource;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Id of the fallback material used for nodes whose material is missing
pub const DEFAULT_MATERIAL: &str = "default";

struct MaterialGpu {
    // Kept alive for the bind group
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Matcap shading: color is looked up from a single texture by view-space normal
///
/// Until a texture is set the material renders with a 1x1 black placeholder.
/// The scene environment never reaches a matcap: it has no binding for it.
pub struct MatcapMaterial {
    pub name: String,
    matcap: Option<image::RgbaImage>,
    gpu: Option<MaterialGpu>,
    dirty: bool,
}

impl MatcapMaterial {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matcap: None,
            gpu: None,
            dirty: true,
        }
    }

    /// Builder pattern: Start with a texture already attached
    pub fn with_matcap(mut self, image: image::RgbaImage) -> Self {
        self.set_matcap(image);
        self
    }

    /// Installs the decoded matcap texture; the GPU copy is rebuilt on the next frame
    pub fn set_matcap(&mut self, image: image::RgbaImage) {
        log::debug!(
            "Material '{}' received {}x{} matcap",
            self.name,
            image.width(),
            image.height()
        );
        self.matcap = Some(image);
        self.dirty = true;
    }

    pub fn has_matcap(&self) -> bool {
        self.matcap.is_some()
    }

    pub fn matcap(&self) -> Option<&image::RgbaImage> {
        self.matcap.as_ref()
    }

    /// Updates GPU resources for this material
    ///
    /// Only does work the first time and after the texture changed.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if !self.dirty && self.gpu.is_some() {
            return;
        }

        let label = format!("Matcap '{}'", self.name);
        let texture = match &self.matcap {
            Some(image) => TextureResource::create_from_rgba_data(
                device,
                queue,
                image.as_raw(),
                image.width(),
                image.height(),
                &label,
            ),
            None => TextureResource::create_placeholder(device, queue, &label),
        };

        let bind_group = BindGroupBuilder::new(layout)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, &format!("{} Bind Group", label));

        self.gpu = Some(MaterialGpu {
            _texture: texture,
            bind_group,
        });
        self.dirty = false;
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

impl std::fmt::Debug for MatcapMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatcapMaterial")
            .field("name", &self.name)
            .field("has_matcap", &self.has_matcap())
            .finish()
    }
}

/// Manages all materials in the engine
///
/// Centralized storage for all materials. Nodes reference materials by ID
/// rather than storing material data directly, enabling sharing of GPU
/// resources between nodes.
pub struct MaterialManager {
    materials: HashMap<MaterialId, MatcapMaterial>,
    default_material: MatcapMaterial,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: MatcapMaterial::new(DEFAULT_MATERIAL),
        }
    }

    /// Adds a material under its own name, replacing any material with that name
    pub fn add_material(&mut self, material: MatcapMaterial) -> MaterialId {
        let id = material.name.clone();
        self.materials.insert(id.clone(), material);
        id
    }

    /// Swaps the material stored under `id` wholesale
    ///
    /// Every node bound to `id` sees the new material. Returns the previous one.
    pub fn replace(&mut self, id: &str, mut material: MatcapMaterial) -> Option<MatcapMaterial> {
        material.name = id.to_string();
        self.materials.insert(id.to_string(), material)
    }

    pub fn get_material(&self, id: &str) -> Option<&MatcapMaterial> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut MatcapMaterial> {
        self.materials.get_mut(id)
    }

    /// Gets material for a node with fallback to default
    ///
    /// This is the method used during rendering, handling nodes whose
    /// material id is unknown.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &MatcapMaterial {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or(&self.default_material)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Updates GPU resources for all materials
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        self.default_material
            .update_gpu_resources(device, queue, layout);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(MatcapMaterial::new("rope"));

        let id = "missing".to_string();
        assert_eq!(manager.get_material_for_object(Some(&id)).name, DEFAULT_MATERIAL);
        assert_eq!(manager.get_material_for_object(None).name, DEFAULT_MATERIAL);
        let rope = "rope".to_string();
        assert_eq!(manager.get_material_for_object(Some(&rope)).name, "rope");
    }

    #[test]
    fn replace_swaps_whole_material_under_same_id() {
        let mut manager = MaterialManager::new();
        manager.add_material(MatcapMaterial::new("arch"));

        let textured = MatcapMaterial::new("anything").with_matcap(image::RgbaImage::new(2, 2));
        let previous = manager.replace("arch", textured);

        assert!(previous.is_some_and(|m| !m.has_matcap()));
        let current = manager.get_material("arch").unwrap();
        assert!(current.has_matcap());
        assert_eq!(current.name, "arch");
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn new_material_waits_for_its_texture() {
        let material = MatcapMaterial::new("seat");
        assert!(!material.has_matcap());
        assert!(material.get_bind_group().is_none());
    }
}
