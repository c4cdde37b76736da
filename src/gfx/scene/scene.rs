use std::ops::{Index, IndexMut};

use cgmath::{Matrix4, SquareMatrix};
use wgpu::Device;

use crate::gfx::{
    camera::PerspectiveCamera,
    resources::{EnvironmentMap, MatcapMaterial, MaterialManager, SceneLayouts},
};

use super::node::{NodeGpuResources, NodeId, SceneNode};

/// Main scene containing the node tree, materials, environment and camera
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. Nodes are
/// never removed, so an id stays valid for the lifetime of the scene.
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub material_manager: MaterialManager, // Centralized material storage
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    environment: Option<EnvironmentMap>,
}

impl Scene {
    /// Creates an empty scene viewed through `camera`
    pub fn new(camera: PerspectiveCamera) -> Self {
        Self {
            camera,
            material_manager: MaterialManager::new(),
            nodes: Vec::new(),
            roots: Vec::new(),
            environment: None,
        }
    }

    /// Inserts `node` under `parent`, or at the top level when `parent` is `None`
    pub fn add_node(&mut self, mut node: SceneNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);

        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Convenience for an empty group node
    pub fn add_group(&mut self, name: &str, parent: Option<NodeId>) -> NodeId {
        self.add_node(SceneNode::group(name), parent)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// First node with the given name, in insertion order
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// `id` followed by all of its descendants, depth first
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.get_node(current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Copies the subtree rooted at `id` and attaches the copy to the same parent
    ///
    /// Geometry is deep-copied: every copied mesh gets a fresh geometry with a
    /// new id and no GPU buffers. Materials are shared, the copy refers to the
    /// same material ids. Transforms and visibility are copied by value.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let parent = self.nodes[id.0].parent;
        self.clone_under(id, parent)
    }

    fn clone_under(&mut self, id: NodeId, parent: Option<NodeId>) -> NodeId {
        let source = &self.nodes[id.0];
        let mut copy = match &source.mesh {
            Some(mesh) => SceneNode::mesh(&source.name, mesh.geometry.deep_copy(), mesh.material.clone()),
            None => SceneNode::group(&source.name),
        };
        copy.transform = source.transform;
        copy.visible = source.visible;
        let children = source.children.clone();

        let copy_id = self.add_node(copy, parent);
        for child in children {
            self.clone_under(child, Some(copy_id));
        }
        copy_id
    }

    /// Local-to-world matrix of `id`, composed through all ancestors
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get_node(id)) {
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// A node is drawn only when it and all of its ancestors are visible
    pub fn is_visible_in_tree(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.get_node(id)) {
            if !node.visible {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Ids of every node that carries a mesh binding
    pub fn mesh_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.mesh.is_some())
            .map(|(index, _)| NodeId(index))
    }

    pub fn environment(&self) -> Option<&EnvironmentMap> {
        self.environment.as_ref()
    }

    /// Installs the scene-wide environment map, replacing any previous one
    pub fn set_environment(&mut self, environment: EnvironmentMap) {
        log::info!(
            "Environment map set ({}x{})",
            environment.width(),
            environment.height()
        );
        self.environment = Some(environment);
    }

    /// Updates the scene (camera matrices, etc.)
    pub fn update(&mut self) {
        self.camera.update_view_proj();
    }

    /// Uploads whatever is missing on the GPU and writes this frame's transforms
    ///
    /// Geometry that was disposed or replaced since the last frame is uploaded
    /// again here.
    pub fn prepare_gpu(&mut self, device: &Device, queue: &wgpu::Queue, layouts: &SceneLayouts) {
        let world: Vec<Option<Matrix4<f32>>> = (0..self.nodes.len())
            .map(|index| {
                let id = NodeId(index);
                self.nodes[index]
                    .mesh
                    .is_some()
                    .then(|| self.world_matrix(id))
            })
            .collect();

        for (node, world) in self.nodes.iter_mut().zip(world) {
            let (Some(mesh), Some(world)) = (node.mesh.as_mut(), world) else {
                continue;
            };
            mesh.geometry.upload(device);
            node.gpu
                .get_or_insert_with(|| NodeGpuResources::new(device, layouts))
                .write(queue, world);
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, &layouts.material);

        if let Some(environment) = self.environment.as_mut() {
            environment.prepare_gpu(device, queue, &layouts.environment);
        }
    }

    /// Gets material for rendering a node
    ///
    /// Returns the material the node refers to, or the default material if
    /// the node has no mesh or its material id is unknown.
    pub fn get_material_for_node(&self, id: NodeId) -> &MatcapMaterial {
        let material_id = self.get_node(id).and_then(|node| node.material_id());
        self.material_manager.get_material_for_object(material_id)
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let meshes = || self.nodes.iter().filter_map(|node| node.geometry());

        SceneStatistics {
            node_count: self.nodes.len(),
            mesh_count: meshes().count(),
            material_count: self.material_manager.len(),
            total_triangles: meshes().map(|g| g.data().triangle_count()).sum(),
            total_vertices: meshes().map(|g| g.data().vertex_count()).sum(),
        }
    }
}

impl Index<NodeId> for Scene {
    type Output = SceneNode;

    fn index(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Scene {
    fn index_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{
        mesh::{Geometry, GeometryDescriptor},
        node::{NodeField, Transform},
    };
    use cgmath::Vector4;

    fn scene() -> Scene {
        Scene::new(PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0))
    }

    fn rod(name: &str, material: &str) -> SceneNode {
        SceneNode::mesh(name, Geometry::new(GeometryDescriptor::cylinder(0.1, 2.0)), material)
    }

    #[test]
    fn nodes_are_linked_to_parents() {
        let mut scene = scene();
        let group = scene.add_group("arch", None);
        let leg = scene.add_node(rod("leg", "arch"), Some(group));

        assert_eq!(scene.roots(), &[group]);
        assert_eq!(scene[group].children(), &[leg]);
        assert_eq!(scene[leg].parent(), Some(group));
        assert_eq!(scene.find("leg"), Some(leg));
        assert_eq!(scene.find("nope"), None);
        assert_eq!(scene.descendants(group), vec![group, leg]);
    }

    #[test]
    fn world_matrix_applies_parent_after_child() {
        let mut scene = scene();
        let group = scene.add_node(
            SceneNode::group("swing").with_transform(Transform::from_position(0.0, 2.0, 0.0)),
            None,
        );
        let seat = scene.add_node(
            rod("seat", "seat").with_transform(Transform::from_position(0.0, -2.5, 0.0)),
            Some(group),
        );
        scene[group].transform.set(NodeField::RotationX, std::f32::consts::FRAC_PI_2);

        let origin = scene.world_matrix(seat) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        // -2.5 on the rotated Y axis lands on -Z
        assert!((origin.y - 2.0).abs() < 1e-5);
        assert!((origin.z + 2.5).abs() < 1e-5);
    }

    #[test]
    fn clone_subtree_copies_geometry_and_shares_material() {
        let mut scene = scene();
        let left = scene.add_group("arch", None);
        let front = scene.add_node(rod("front", "arch"), Some(left));
        let back = scene.add_node(rod("back", "arch"), Some(left));
        scene[front].transform.position.z = 0.7;

        let right = scene.clone_subtree(left);

        assert_ne!(right, left);
        assert_eq!(scene.roots(), &[left, right]);
        let copies = scene[right].children().to_vec();
        assert_eq!(copies.len(), 2);

        for (original, copy) in [front, back].into_iter().zip(copies) {
            let a = scene[original].geometry().unwrap();
            let b = scene[copy].geometry().unwrap();
            assert_ne!(a.id(), b.id());
            assert_eq!(a.data(), b.data());
            assert!(!b.is_uploaded());
            assert_eq!(scene[original].material_id(), scene[copy].material_id());
            assert_eq!(scene[original].transform, scene[copy].transform);
        }

        // Moving the copy leaves the original alone
        scene[right].transform.position.x = 2.0;
        assert_eq!(scene[left].transform.position.x, 0.0);
    }

    #[test]
    fn clone_of_leaf_joins_same_parent() {
        let mut scene = scene();
        let swing = scene.add_group("swing", None);
        let rope = scene.add_node(rod("rope", "rope"), Some(swing));

        let copy = scene.clone_subtree(rope);
        assert_eq!(scene[copy].parent(), Some(swing));
        assert_eq!(scene[swing].children(), &[rope, copy]);
    }

    #[test]
    fn hidden_ancestor_hides_subtree() {
        let mut scene = scene();
        let group = scene.add_group("group", None);
        let leaf = scene.add_node(rod("leaf", "m"), Some(group));
        assert!(scene.is_visible_in_tree(leaf));

        scene[group].visible = false;
        assert!(!scene.is_visible_in_tree(leaf));
    }

    #[test]
    fn statistics_count_meshes_and_materials() {
        let mut scene = scene();
        scene
            .material_manager
            .add_material(MatcapMaterial::new("m"));
        let group = scene.add_group("group", None);
        scene.add_node(
            SceneNode::mesh("box", Geometry::new(GeometryDescriptor::cuboid(1.0, 1.0, 1.0)), "m"),
            Some(group),
        );

        let stats = scene.get_statistics();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.mesh_count, 1);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_triangles, 12);
        assert_eq!(stats.total_vertices, 24);
        assert_eq!(scene.mesh_nodes().count(), 1);
    }

    #[test]
    fn environment_starts_unset() {
        let mut scene = scene();
        assert!(scene.environment().is_none());

        scene.set_environment(EnvironmentMap::new(image::Rgba32FImage::new(4, 2)));
        assert_eq!(scene.environment().map(|e| e.width()), Some(4));
    }
}
