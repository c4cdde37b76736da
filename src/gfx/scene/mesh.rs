use std::sync::atomic::{AtomicU64, Ordering};

use wgpu::Device;

use crate::gfx::geometry::{generate_box, generate_cylinder, GeometryData, DEFAULT_RADIAL_SEGMENTS};

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one geometry instance. Copies and rebuilds always get a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(u64);

impl GeometryId {
    fn next() -> Self {
        Self(NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Parameters a geometry was generated from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryDescriptor {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
}

impl GeometryDescriptor {
    /// Straight cylinder with the default radial resolution
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments: DEFAULT_RADIAL_SEGMENTS,
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            width,
            height,
            depth,
        }
    }

    pub fn generate(&self) -> GeometryData {
        match *self {
            Self::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
            Self::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
        }
    }
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// CPU geometry plus its (lazily uploaded) GPU buffers
///
/// `Geometry` is intentionally not `Clone`: use [`Geometry::deep_copy`] to get
/// an independent instance.
pub struct Geometry {
    id: GeometryId,
    descriptor: GeometryDescriptor,
    data: GeometryData,
    gpu: Option<GpuGeometry>,
}

impl Geometry {
    pub fn new(descriptor: GeometryDescriptor) -> Self {
        Self {
            id: GeometryId::next(),
            data: descriptor.generate(),
            descriptor,
            gpu: None,
        }
    }

    pub fn id(&self) -> GeometryId {
        self.id
    }

    pub fn descriptor(&self) -> &GeometryDescriptor {
        &self.descriptor
    }

    pub fn data(&self) -> &GeometryData {
        &self.data
    }

    /// Independent copy of the vertex data under a new id, not yet uploaded
    pub fn deep_copy(&self) -> Self {
        Self {
            id: GeometryId::next(),
            descriptor: self.descriptor,
            data: self.data.clone(),
            gpu: None,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu.is_some()
    }

    /// Releases the GPU buffers. The CPU data stays valid and is re-uploaded on demand.
    pub fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
            log::debug!("disposed geometry {:?}", self.id);
        }
    }

    pub fn upload(&mut self, device: &Device) {
        if self.gpu.is_some() {
            return;
        }

        let (vertices, indices) = self.data.to_scene_format();

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.gpu = Some(GpuGeometry {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        });
    }
}

impl std::fmt::Debug for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geometry")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("vertices", &self.data.vertex_count())
            .field("uploaded", &self.is_uploaded())
            .finish()
    }
}

pub trait DrawGeometry {
    fn draw_geometry(&mut self, geometry: &Geometry);
}

impl DrawGeometry for wgpu::RenderPass<'_> {
    fn draw_geometry(&mut self, geometry: &Geometry) {
        // Skip drawing if not uploaded
        let Some(gpu) = &geometry.gpu else {
            return;
        };
        if gpu.index_count == 0 {
            return;
        }

        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..gpu.index_count, 0, 0..1);
    }
}
