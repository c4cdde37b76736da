//! Scene-wide equirectangular environment map

use crate::wgpu_utils::{BindGroupBuilder, BindGroupLayoutWithDesc};

use super::texture_resource::TextureResource;

struct EnvironmentGpu {
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Decoded HDR panorama used as the background and as the reflection source
/// for materials that opt in
pub struct EnvironmentMap {
    image: image::Rgba32FImage,
    gpu: Option<EnvironmentGpu>,
}

impl EnvironmentMap {
    pub fn new(image: image::Rgba32FImage) -> Self {
        Self { image, gpu: None }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &image::Rgba32FImage {
        &self.image
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Uploads the panorama once
    pub fn prepare_gpu(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu.is_some() {
            return;
        }

        let texture = TextureResource::create_from_hdr_data(
            device,
            queue,
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            "Environment Map",
        );
        let bind_group = BindGroupBuilder::new(layout)
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, "Environment Bind Group");

        log::info!(
            "Uploaded {}x{} environment map",
            self.image.width(),
            self.image.height()
        );
        self.gpu = Some(EnvironmentGpu {
            _texture: texture,
            bind_group,
        });
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }
}

impl std::fmt::Debug for EnvironmentMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentMap")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}
