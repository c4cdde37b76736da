//! Construction of the swing set scene graph

use std::f32::consts::PI;

use crate::gfx::{
    resources::MatcapMaterial,
    scene::{Geometry, GeometryDescriptor, NodeId, Scene, SceneNode, Transform},
};

use super::config::SwingConfig;

pub const BAR_RADIUS: f32 = 1.0 / 16.0;
pub const TOP_BAR_LENGTH: f32 = 6.0;
pub const ARCH_LENGTH: f32 = 3.75;
pub const ROPE_RADIUS: f32 = 1.0 / 64.0;
pub const ROPE_LENGTH: f32 = 2.5;

pub const TOP_BAR_MATERIAL: &str = "top_bar";
pub const ARCH_MATERIAL: &str = "arch";
pub const ROPE_MATERIAL: &str = "rope";
pub const SEAT_MATERIAL: &str = "seat";

/// Matcap texture for each material, relative to the asset root
pub const MATCAP_ASSETS: [(&str, &str); 4] = [
    (TOP_BAR_MATERIAL, "matcaps/metal.png"),
    (ARCH_MATERIAL, "matcaps/1.png"),
    (ROPE_MATERIAL, "matcaps/alien.png"),
    (SEAT_MATERIAL, "matcaps/seat.png"),
];

pub const ENVIRONMENT_MAP: &str = "environmentMaps/rosendal_park_sunset_puresky_4k.hdr";

/// Handles to the nodes the panel and the animation touch
#[derive(Debug, Clone, Copy)]
pub struct SwingSetNodes {
    pub top_bar: NodeId,
    pub left_arch: NodeId,
    pub arch_front: NodeId,
    pub arch_back: NodeId,
    pub right_arch: NodeId,
    pub swing: NodeId,
    pub left_rope: NodeId,
    pub right_rope: NodeId,
    pub seat: NodeId,
}

fn rod(radius: f32, length: f32) -> Geometry {
    Geometry::new(GeometryDescriptor::cylinder(radius, length))
}

fn seat_geometry(config: &SwingConfig) -> Geometry {
    Geometry::new(GeometryDescriptor::cuboid(
        config.seat_width,
        config.seat_height,
        config.seat_depth,
    ))
}

/// Registers the four matcap materials, each untextured until its image loads
pub fn register_materials(scene: &mut Scene) {
    for (id, _) in MATCAP_ASSETS {
        scene.material_manager.add_material(MatcapMaterial::new(id));
    }
}

/// Builds the whole swing set into `scene`
pub fn build_swing_set(scene: &mut Scene, config: &SwingConfig) -> SwingSetNodes {
    register_materials(scene);

    let top_bar = scene.add_node(
        SceneNode::mesh("top_bar", rod(BAR_RADIUS, TOP_BAR_LENGTH), TOP_BAR_MATERIAL).with_transform(
            Transform::from_position(0.0, 2.0, 0.0).with_rotation(0.0, 0.0, PI * 0.5),
        ),
        None,
    );

    let left_arch = scene.add_node(
        SceneNode::group("left_arch").with_transform(Transform::from_position(-2.0, 0.0, 0.0)),
        None,
    );
    let arch_front = scene.add_node(
        SceneNode::mesh("arch_front", rod(BAR_RADIUS, ARCH_LENGTH), ARCH_MATERIAL).with_transform(
            Transform::from_position(0.0, 0.2209, 0.7159).with_rotation(-PI * 0.125, 0.0, 0.0),
        ),
        Some(left_arch),
    );
    let arch_back = scene.add_node(
        SceneNode::mesh("arch_back", rod(BAR_RADIUS, ARCH_LENGTH), ARCH_MATERIAL).with_transform(
            Transform::from_position(0.0, 0.2209, -0.7159).with_rotation(PI * 0.125, 0.0, 0.0),
        ),
        Some(left_arch),
    );

    let right_arch = scene.clone_subtree(left_arch);
    scene[right_arch].name = "right_arch".to_string();
    scene[right_arch].transform.position.x = 2.0;

    let swing = scene.add_node(
        SceneNode::group("swing").with_transform(Transform::from_position(0.0, 2.0, 0.0)),
        None,
    );
    let left_rope = scene.add_node(
        SceneNode::mesh("left_rope", rod(ROPE_RADIUS, ROPE_LENGTH), ROPE_MATERIAL)
            .with_transform(Transform::from_position(-0.5, -1.3, 0.0)),
        Some(swing),
    );
    let right_rope = scene.clone_subtree(left_rope);
    scene[right_rope].name = "right_rope".to_string();
    scene[right_rope].transform.position.x = 0.5;

    let seat = scene.add_node(
        SceneNode::mesh("seat", seat_geometry(config), SEAT_MATERIAL)
            .with_transform(Transform::from_position(0.0, -2.538, 0.0)),
        Some(swing),
    );

    SwingSetNodes {
        top_bar,
        left_arch,
        arch_front,
        arch_back,
        right_arch,
        swing,
        left_rope,
        right_rope,
        seat,
    }
}

/// Swaps the seat's box for one with the configured dimensions
pub fn rebuild_seat(scene: &mut Scene, seat: NodeId, config: &SwingConfig) {
    if let Some(node) = scene.get_node_mut(seat) {
        node.replace_geometry(seat_geometry(config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::PerspectiveCamera;

    fn build() -> (Scene, SwingSetNodes) {
        let mut scene = Scene::new(PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0));
        let nodes = build_swing_set(&mut scene, &SwingConfig::default());
        (scene, nodes)
    }

    #[test]
    fn top_level_objects_in_order() {
        let (scene, nodes) = build();
        assert_eq!(
            scene.roots(),
            &[nodes.top_bar, nodes.left_arch, nodes.right_arch, nodes.swing]
        );
        assert_eq!(
            scene[nodes.swing].children(),
            &[nodes.left_rope, nodes.right_rope, nodes.seat]
        );
    }

    #[test]
    fn initial_layout() {
        let (scene, nodes) = build();

        let bar = &scene[nodes.top_bar].transform;
        assert_eq!(bar.position.y, 2.0);
        assert!((bar.rotation.z - PI / 2.0).abs() < 1e-6);

        assert_eq!(scene[nodes.left_arch].transform.position.x, -2.0);
        assert_eq!(scene[nodes.right_arch].transform.position.x, 2.0);
        assert_eq!(scene[nodes.arch_front].transform.position.z, 0.7159);
        assert_eq!(scene[nodes.arch_back].transform.position.z, -0.7159);
        assert_eq!(scene[nodes.left_rope].transform.position.x, -0.5);
        assert_eq!(scene[nodes.right_rope].transform.position.x, 0.5);
        assert_eq!(scene[nodes.right_rope].transform.position.y, -1.3);
        assert_eq!(scene[nodes.seat].transform.position.y, -2.538);
        assert_eq!(scene[nodes.swing].transform.position.y, 2.0);
    }

    #[test]
    fn every_mesh_has_a_registered_material() {
        let (scene, _) = build();
        for id in scene.mesh_nodes() {
            let material = scene[id].material_id().unwrap();
            assert!(scene.material_manager.get_material(material).is_some());
        }
        assert_eq!(scene.get_statistics().mesh_count, 8);
        assert_eq!(scene.material_manager.len(), 4);
    }

    #[test]
    fn right_arch_is_an_independent_copy() {
        let (mut scene, nodes) = build();
        let copies = scene[nodes.right_arch].children().to_vec();
        let originals = [nodes.arch_front, nodes.arch_back];

        for (original, copy) in originals.iter().zip(&copies) {
            let a = scene[*original].geometry().unwrap();
            let b = scene[*copy].geometry().unwrap();
            assert_ne!(a.id(), b.id());
            assert_eq!(a.data(), b.data());
            assert_eq!(scene[*copy].material_id().unwrap(), ARCH_MATERIAL);
        }

        // Rebuilding a copy leaves the original alone
        let original_id = scene[nodes.arch_front].geometry().unwrap().id();
        scene[copies[0]].replace_geometry(rod(0.2, 1.0));
        assert_eq!(scene[nodes.arch_front].geometry().unwrap().id(), original_id);

        // Replacing the shared material affects both arches
        scene.material_manager.replace(
            ARCH_MATERIAL,
            MatcapMaterial::new(ARCH_MATERIAL).with_matcap(image::RgbaImage::new(1, 1)),
        );
        assert!(scene.get_material_for_node(nodes.arch_front).has_matcap());
        assert!(scene.get_material_for_node(copies[1]).has_matcap());
    }

    #[test]
    fn seat_rebuild_uses_config_and_keeps_position() {
        let (mut scene, nodes) = build();
        let old_id = scene[nodes.seat].geometry().unwrap().id();

        let config = SwingConfig {
            seat_width: 2.0,
            ..Default::default()
        };
        rebuild_seat(&mut scene, nodes.seat, &config);

        let geometry = scene[nodes.seat].geometry().unwrap();
        assert_ne!(geometry.id(), old_id);
        assert!(!geometry.is_uploaded());
        assert_eq!(*geometry.descriptor(), GeometryDescriptor::cuboid(2.0, 0.03, 0.5));
        assert_eq!(scene[nodes.seat].transform.position.y, -2.538);
    }
}
