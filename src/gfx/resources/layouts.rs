//! Bind group layouts shared by the scene and the render passes
//!
//! Group 0 is always the camera ([`GlobalBindings`](super::GlobalBindings)).
//! The matcap pass uses group 1 for the node transform and group 2 for the
//! material. The background pass uses group 1 for the environment map.

use crate::wgpu_utils::{binding_types, BindGroupLayoutBuilder, BindGroupLayoutWithDesc};

pub struct SceneLayouts {
    pub transform: BindGroupLayoutWithDesc,
    pub material: BindGroupLayoutWithDesc,
    pub environment: BindGroupLayoutWithDesc,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let transform = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Transform Bind Group Layout");

        let material = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(device, "Matcap Bind Group Layout");

        let environment = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d_unfilterable())
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::NonFiltering,
            ))
            .create(device, "Environment Bind Group Layout");

        Self {
            transform,
            material,
            environment,
        }
    }
}
