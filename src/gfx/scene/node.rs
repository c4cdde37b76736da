use cgmath::{Matrix4, Rad, Vector3, Zero};

use crate::gfx::resources::{material::MaterialId, SceneLayouts};
use crate::wgpu_utils::{BindGroupBuilder, UniformBuffer};

use super::mesh::Geometry;

/// Index of a node inside its [`Scene`](super::Scene)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// A single scalar on a node's local transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
}

/// Local position and rotation
///
/// Rotation is an Euler triple in radians applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
        }
    }
}

impl Transform {
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    pub fn get(&self, field: NodeField) -> f32 {
        match field {
            NodeField::PositionX => self.position.x,
            NodeField::PositionY => self.position.y,
            NodeField::PositionZ => self.position.z,
            NodeField::RotationX => self.rotation.x,
            NodeField::RotationY => self.rotation.y,
            NodeField::RotationZ => self.rotation.z,
        }
    }

    pub fn set(&mut self, field: NodeField, value: f32) {
        match field {
            NodeField::PositionX => self.position.x = value,
            NodeField::PositionY => self.position.y = value,
            NodeField::PositionZ => self.position.z = value,
            NodeField::RotationX => self.rotation.x = value,
            NodeField::RotationY => self.rotation.y = value,
            NodeField::RotationZ => self.rotation.z = value,
        }
    }

    /// Local matrix: translation * Rx * Ry * Rz
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }
}

/// What a renderable leaf draws: its own geometry and a material by reference
#[derive(Debug)]
pub struct MeshBinding {
    pub geometry: Geometry,
    pub material: MaterialId,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

pub(crate) struct NodeGpuResources {
    transform_ubo: UniformBuffer<TransformUniform>,
    bind_group: wgpu::BindGroup,
}

impl NodeGpuResources {
    pub(crate) fn new(device: &wgpu::Device, layouts: &SceneLayouts) -> Self {
        let transform_ubo = UniformBuffer::new(device);
        let bind_group = BindGroupBuilder::new(&layouts.transform)
            .resource(transform_ubo.binding_resource())
            .create(device, "Transform Bind Group");

        Self {
            transform_ubo,
            bind_group,
        }
    }

    pub(crate) fn write(&mut self, queue: &wgpu::Queue, world: Matrix4<f32>) {
        self.transform_ubo
            .update_content(queue, TransformUniform { model: world.into() });
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A group or a renderable leaf in the scene tree
///
/// A node without a [`MeshBinding`] is a group. A leaf always carries both a
/// geometry and a material because the binding cannot hold one without the other.
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub visible: bool,
    pub mesh: Option<MeshBinding>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) gpu: Option<NodeGpuResources>,
}

impl SceneNode {
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            visible: true,
            mesh: None,
            parent: None,
            children: Vec::new(),
            gpu: None,
        }
    }

    pub fn mesh(name: &str, geometry: Geometry, material: impl Into<MaterialId>) -> Self {
        Self {
            mesh: Some(MeshBinding {
                geometry,
                material: material.into(),
            }),
            ..Self::group(name)
        }
    }

    /// Builder pattern: Set the local transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn is_group(&self) -> bool {
        self.mesh.is_none()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.mesh.as_ref().map(|m| &m.geometry)
    }

    pub fn material_id(&self) -> Option<&MaterialId> {
        self.mesh.as_ref().map(|m| &m.material)
    }

    /// Disposes the current geometry and installs `geometry` in its place
    ///
    /// Does nothing on a group node.
    pub fn replace_geometry(&mut self, geometry: Geometry) {
        if let Some(mesh) = self.mesh.as_mut() {
            mesh.geometry.dispose();
            mesh.geometry = geometry;
        }
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("mesh", &self.mesh)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::mesh::GeometryDescriptor;
    use cgmath::Vector4;
    use std::f32::consts::PI;

    #[test]
    fn field_access_round_trips_every_axis() {
        let mut transform = Transform::default();
        let fields = [
            NodeField::PositionX,
            NodeField::PositionY,
            NodeField::PositionZ,
            NodeField::RotationX,
            NodeField::RotationY,
            NodeField::RotationZ,
        ];
        for (i, field) in fields.into_iter().enumerate() {
            transform.set(field, i as f32 + 0.5);
        }

        assert_eq!(transform.position, Vector3::new(0.5, 1.5, 2.5));
        assert_eq!(transform.rotation, Vector3::new(3.5, 4.5, 5.5));
        assert_eq!(transform.get(NodeField::RotationY), 4.5);
    }

    #[test]
    fn quarter_turn_about_z_lays_y_axis_along_x() {
        let transform = Transform::from_position(0.0, 2.0, 0.0).with_rotation(0.0, 0.0, PI * 0.5);
        let tip = transform.matrix() * Vector4::new(0.0, 3.0, 0.0, 1.0);

        assert!((tip.x + 3.0).abs() < 1e-5);
        assert!((tip.y - 2.0).abs() < 1e-5);
        assert!(tip.z.abs() < 1e-5);
    }

    #[test]
    fn mesh_node_always_pairs_geometry_with_material() {
        let node = SceneNode::mesh("rope", Geometry::new(GeometryDescriptor::cylinder(0.1, 1.0)), "rope");
        assert!(!node.is_group());
        assert!(node.geometry().is_some());
        assert_eq!(node.material_id().map(String::as_str), Some("rope"));

        let group = SceneNode::group("swing");
        assert!(group.is_group());
        assert!(group.geometry().is_none() && group.material_id().is_none());
    }

    #[test]
    fn replace_geometry_swaps_instance() {
        let mut node = SceneNode::mesh("seat", Geometry::new(GeometryDescriptor::cuboid(1.5, 0.03, 0.5)), "seat");
        let old_id = node.geometry().unwrap().id();

        node.replace_geometry(Geometry::new(GeometryDescriptor::cuboid(2.0, 0.03, 0.5)));

        let geometry = node.geometry().unwrap();
        assert_ne!(geometry.id(), old_id);
        assert_eq!(*geometry.descriptor(), GeometryDescriptor::cuboid(2.0, 0.03, 0.5));
    }
}
