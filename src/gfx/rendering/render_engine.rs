//! WGPU-based rendering engine
//!
//! Owns the device, the window surface, the depth buffer and the two pipelines:
//! "Background" paints the environment map behind everything and "Matcap"
//! draws the scene's meshes.

use std::sync::Arc;

use anyhow::Context;
use wgpu::TextureFormat;

use crate::gfx::{
    resources::{update_global_ubo, GlobalBindings, GlobalUBO, SceneLayouts, TextureResource},
    scene::{DrawGeometry, Scene},
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    surface::{buffer_extent, target_extent, FrameStatus, RenderSurface, UiOverlay},
};

const MATCAP_PIPELINE: &str = "Matcap";
const BACKGROUND_PIPELINE: &str = "Background";

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    layouts: SceneLayouts,
    logical_size: (f64, f64),
    pixel_ratio: f64,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width`, `height` - Initial logical size
    /// * `pixel_ratio` - Initial (capped) device pixel ratio
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: f64,
        height: f64,
        pixel_ratio: f64,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let max_dimension = device.limits().max_texture_dimension_2d;
        log::debug!("Max surface dimension: {}", max_dimension);

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: buffer_extent(width, pixel_ratio).min(max_dimension),
            height: buffer_extent(height, pixel_ratio).min(max_dimension),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let layouts = SceneLayouts::new(&device);

        let device_handle: Arc<wgpu::Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("matcap", include_str!("matcap.wgsl"));
        pipeline_manager.load_shader("background", include_str!("background.wgsl"));

        pipeline_manager.register_pipeline(
            BACKGROUND_PIPELINE,
            PipelineConfig::default()
                .with_label(BACKGROUND_PIPELINE)
                .with_shader("background")
                .with_depth_read_only(TextureResource::DEPTH_FORMAT, wgpu::CompareFunction::Always)
                .with_color_format(format)
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    layouts.environment.layout.clone(),
                ])
                .with_no_vertex_buffers(),
        );

        pipeline_manager.register_pipeline(
            MATCAP_PIPELINE,
            PipelineConfig::default()
                .with_label(MATCAP_PIPELINE)
                .with_shader("matcap")
                .with_depth(TextureResource::DEPTH_FORMAT)
                .with_color_format(format)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    layouts.transform.layout.clone(),
                    layouts.material.layout.clone(),
                ]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            anyhow::bail!("Pipeline creation failed: {}", errors.join("; "));
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            layouts,
            logical_size: (width, height),
            pixel_ratio,
        })
    }

    /// Applies the current logical size and pixel ratio to the surface
    ///
    /// Does nothing when the physical size did not change.
    fn reconfigure(&mut self) {
        let Some((physical_width, physical_height)) = target_extent(
            self.logical_size,
            self.pixel_ratio,
            (self.config.width, self.config.height),
            self.device.limits().max_texture_dimension_2d,
        ) else {
            return;
        };

        self.config.width = physical_width;
        self.config.height = physical_height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
        log::debug!("Surface resized to {}x{}", physical_width, physical_height);
    }

    fn acquire_frame(&mut self) -> Result<wgpu::SurfaceTexture, FrameStatus> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                Err(FrameStatus::Skipped)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timed out, skipping frame");
                Err(FrameStatus::Skipped)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
                Err(FrameStatus::OutOfMemory)
            }
            Err(e) => {
                log::error!("Failed to acquire surface texture: {}", e);
                Err(FrameStatus::Skipped)
            }
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn logical_size(&self) -> (f64, f64) {
        self.logical_size
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

impl RenderSurface for RenderEngine {
    fn set_size(&mut self, width: f64, height: f64) {
        self.logical_size = (width, height);
        self.reconfigure();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
        self.reconfigure();
    }

    fn buffer_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn render(&mut self, scene: &mut Scene, overlay: Option<&mut dyn UiOverlay>) -> FrameStatus {
        scene.update();
        update_global_ubo(&mut self.global_ubo, &self.queue, scene.camera.uniform);
        scene.prepare_gpu(&self.device, &self.queue, &self.layouts);

        let frame = match self.acquire_frame() {
            Ok(frame) => frame,
            Err(status) => return status,
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            // Background only once the environment has loaded
            if let Some(environment) = scene.environment().and_then(|e| e.bind_group()) {
                if let Some(pipeline) = self.pipeline_manager.get_pipeline(BACKGROUND_PIPELINE) {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, environment, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }

            if let Some(pipeline) = self.pipeline_manager.get_pipeline(MATCAP_PIPELINE) {
                render_pass.set_pipeline(pipeline);

                for id in scene.mesh_nodes() {
                    if !scene.is_visible_in_tree(id) {
                        continue;
                    }
                    let node = &scene[id];
                    let (Some(geometry), Some(gpu)) = (node.geometry(), node.gpu.as_ref()) else {
                        continue;
                    };
                    let Some(material) = scene.get_material_for_node(id).get_bind_group() else {
                        log::debug!("Skipping '{}': material has no GPU resources", node.name);
                        continue;
                    };

                    render_pass.set_bind_group(1, gpu.bind_group(), &[]);
                    render_pass.set_bind_group(2, material, &[]);
                    render_pass.draw_geometry(geometry);
                }
            }
        }

        if let Some(overlay) = overlay {
            overlay.record(&self.device, &self.queue, &mut encoder, &view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        FrameStatus::Presented
    }
}
