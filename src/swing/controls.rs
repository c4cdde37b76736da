//! The debug panel wiring for the swing set

use std::f64::consts::PI;

use crate::{
    gfx::scene::NodeField,
    ui::panel::{Control, ParameterPanel},
};

use super::{
    config::ConfigField,
    model::{rebuild_seat, SwingSetNodes},
};

pub const PANEL_TITLE: &str = "Debug";
pub const PANEL_WIDTH: f32 = 340.0;
pub const SEAT_FOLDER: &str = "Swing Seat";

/// Builds the (hidden) debug panel with every control in display order
pub fn build_controls(nodes: &SwingSetNodes, width: f32) -> ParameterPanel {
    let SwingSetNodes {
        top_bar,
        arch_front,
        arch_back,
        left_rope,
        right_rope,
        seat,
        swing,
        ..
    } = *nodes;

    let mut panel = ParameterPanel::new(PANEL_TITLE, width);

    panel.add(
        Control::node("Top Bar Y", top_bar, NodeField::PositionY)
            .range(0.0, 2.0)
            .step(0.0001),
    );
    panel.add(
        Control::node("ArchFront Z", arch_front, NodeField::PositionZ)
            .range(-1.0, 1.0)
            .step(0.0001),
    );
    panel.add(
        Control::node("ArchFront Y", arch_front, NodeField::PositionY)
            .range(-1.0, 1.0)
            .step(0.0001),
    );
    panel.add(
        Control::config("Left Arch X", ConfigField::LeftArchX)
            .range(-2.0, 2.0)
            .step(0.001)
            .on_change(move |scene, config| {
                scene[arch_front].transform.position.x = config.left_arch_x;
                scene[arch_back].transform.position.x = config.left_arch_x;
            }),
    );
    panel.add(
        Control::node("RopeLeft Y", left_rope, NodeField::PositionY)
            .range(-2.0, 1.0)
            .step(0.0001),
    );
    panel.add(
        Control::config("Rope X", ConfigField::RopeX)
            .range(0.0, 2.0)
            .step(0.0001)
            .on_change(move |scene, config| {
                scene[left_rope].transform.position.x = -config.rope_x;
                scene[right_rope].transform.position.x = config.rope_x;
            }),
    );

    for (label, field) in [
        ("Width", ConfigField::SeatWidth),
        ("Height", ConfigField::SeatHeight),
        ("Depth", ConfigField::SeatDepth),
    ] {
        panel.add(
            Control::config(label, field)
                .range(0.0, 2.0)
                .step(0.001)
                .folder(SEAT_FOLDER)
                .on_change(move |scene, config| rebuild_seat(scene, seat, config)),
        );
    }
    panel.add(
        Control::node("y", seat, NodeField::PositionY)
            .range(-3.0, 1.0)
            .step(0.001)
            .folder(SEAT_FOLDER),
    );

    panel.add(
        Control::node("Swing Rotation", swing, NodeField::RotationX)
            .range(-PI, PI)
            .step(0.001),
    );

    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use crate::{
        gfx::{camera::PerspectiveCamera, scene::{GeometryDescriptor, Scene}},
        swing::{config::SwingConfig, model::build_swing_set},
    };

    fn setup() -> (Scene, SwingSetNodes, SwingConfig, ParameterPanel) {
        let mut scene = Scene::new(PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0));
        let config = SwingConfig::default();
        let nodes = build_swing_set(&mut scene, &config);
        let panel = build_controls(&nodes, PANEL_WIDTH);
        (scene, nodes, config, panel)
    }

    fn index(panel: &ParameterPanel, label: &str) -> usize {
        panel.find(label).unwrap()
    }

    #[test]
    fn eleven_controls_in_order_and_hidden() {
        let (_, _, _, panel) = setup();
        let labels: Vec<_> = panel.controls().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Top Bar Y",
                "ArchFront Z",
                "ArchFront Y",
                "Left Arch X",
                "RopeLeft Y",
                "Rope X",
                "Width",
                "Height",
                "Depth",
                "y",
                "Swing Rotation",
            ]
        );
        assert!(!panel.is_visible());
        assert_eq!(panel.title, "Debug");
        assert_eq!(panel.width, 340.0);

        let folders: Vec<_> = panel.controls().iter().map(|c| c.folder.is_some()).collect();
        assert_eq!(folders, [false, false, false, false, false, false, true, true, true, true, false]);
    }

    #[test]
    fn left_arch_x_moves_both_left_legs_only() {
        let (mut scene, nodes, mut config, panel) = setup();
        let right_legs = scene[nodes.right_arch].children().to_vec();

        panel.set(index(&panel, "Left Arch X"), 0.25, &mut scene, &mut config);

        assert_eq!(config.left_arch_x, 0.25);
        assert_eq!(scene[nodes.arch_front].transform.position.x, 0.25);
        assert_eq!(scene[nodes.arch_back].transform.position.x, 0.25);
        for leg in right_legs {
            assert_eq!(scene[leg].transform.position.x, 0.0);
        }
    }

    #[test]
    fn rope_x_mirrors_ropes() {
        let (mut scene, nodes, mut config, panel) = setup();

        panel.set(index(&panel, "Rope X"), 0.8, &mut scene, &mut config);

        assert_eq!(scene[nodes.left_rope].transform.position.x, -0.8);
        assert_eq!(scene[nodes.right_rope].transform.position.x, 0.8);
    }

    #[test]
    fn seat_dimensions_rebuild_geometry() {
        let (mut scene, nodes, mut config, panel) = setup();
        let old_id = scene[nodes.seat].geometry().unwrap().id();

        panel.set(index(&panel, "Width"), 2.0, &mut scene, &mut config);
        panel.set(index(&panel, "Height"), 0.5, &mut scene, &mut config);
        panel.set(index(&panel, "Depth"), 1.0, &mut scene, &mut config);

        assert_eq!(config.seat_height, 0.5);
        let geometry = scene[nodes.seat].geometry().unwrap();
        assert_ne!(geometry.id(), old_id);
        assert!(!geometry.is_uploaded());
        assert_eq!(*geometry.descriptor(), GeometryDescriptor::cuboid(2.0, 0.5, 1.0));
        assert_eq!(scene[nodes.seat].transform.position.y, -2.538);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let (mut scene, nodes, mut config, panel) = setup();

        let applied = panel
            .set(index(&panel, "Swing Rotation"), 10.0, &mut scene, &mut config)
            .unwrap();
        assert!((applied - PI).abs() < 1e-6);
        assert_eq!(scene[nodes.swing].transform.rotation.x, applied);

        panel.set(index(&panel, "Top Bar Y"), -5.0, &mut scene, &mut config);
        assert_eq!(scene[nodes.top_bar].transform.position.y, 0.0);
    }

    #[test]
    fn direct_node_controls_write_their_field() {
        let (mut scene, nodes, mut config, panel) = setup();

        panel.set(index(&panel, "ArchFront Z"), 0.5, &mut scene, &mut config);
        panel.set(index(&panel, "ArchFront Y"), -0.25, &mut scene, &mut config);
        panel.set(index(&panel, "RopeLeft Y"), -1.0, &mut scene, &mut config);
        panel.set(index(&panel, "y"), -2.0, &mut scene, &mut config);

        assert_eq!(scene[nodes.arch_front].transform.position.z, 0.5);
        assert_eq!(scene[nodes.arch_front].transform.position.y, -0.25);
        assert_eq!(scene[nodes.arch_back].transform.position.y, 0.2209);
        assert_eq!(scene[nodes.left_rope].transform.position.y, -1.0);
        assert_eq!(scene[nodes.seat].transform.position.y, -2.0);
        assert_eq!(panel.value(index(&panel, "y"), &scene, &config), Some(-2.0));
    }
}
