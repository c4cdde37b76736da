//! Per-frame pose of the swing and the orbiting camera

use std::time::Instant;

use cgmath::{Vector3, Zero};

use crate::gfx::scene::{NodeId, Scene};

pub const ORBIT_RADIUS: f32 = 5.0;
pub const SWING_FREQUENCY: f32 = 2.5;
pub const SWING_AMPLITUDE: f32 = 0.5;

/// Pendulum angle of the swing group at `t` seconds
pub fn swing_angle(t: f32) -> f32 {
    (SWING_FREQUENCY * t).sin() * SWING_AMPLITUDE
}

/// Camera position on the orbit circle at `t` seconds, keeping height `y`
pub fn orbit_position(t: f32, y: f32) -> Vector3<f32> {
    Vector3::new(t.sin() * ORBIT_RADIUS, y, t.cos() * ORBIT_RADIUS)
}

/// Monotonic elapsed time
///
/// Starts on the first call to [`Clock::elapsed`], which therefore returns 0.
#[derive(Debug, Default)]
pub struct Clock {
    start: Option<Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the first reading
    pub fn elapsed(&mut self) -> f32 {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed().as_secs_f32()
    }

    /// Restarts the clock; the next reading is 0 again
    pub fn reset(&mut self) {
        self.start = None;
    }
}

/// Drives the swing and the camera from elapsed time
#[derive(Debug)]
pub struct SwingAnimation {
    swing: NodeId,
    clock: Clock,
}

impl SwingAnimation {
    pub fn new(swing: NodeId) -> Self {
        Self {
            swing,
            clock: Clock::new(),
        }
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// Reads the clock once and poses the scene for that instant
    pub fn tick(&mut self, scene: &mut Scene) -> f32 {
        let t = self.clock.elapsed();
        pose(scene, self.swing, t);
        t
    }
}

/// Poses the scene for time `t`
pub fn pose(scene: &mut Scene, swing: NodeId, t: f32) {
    if let Some(node) = scene.get_node_mut(swing) {
        node.transform.rotation.x = swing_angle(t);
    }

    let position = orbit_position(t, scene.camera.eye.y);
    scene.camera.set_position(position.x, position.y, position.z);
    scene.camera.look_at(Vector3::zero());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::PerspectiveCamera;
    use crate::gfx::scene::SceneNode;
    use cgmath::InnerSpace;
    use std::{thread, time::Duration};

    const EPSILON: f32 = 1e-5;

    fn scene_with_swing() -> (Scene, NodeId) {
        let mut camera = PerspectiveCamera::new(75.0, 1.5, 0.1, 100.0);
        camera.set_position(2.5, 2.0, 4.0);
        let mut scene = Scene::new(camera);
        let swing = scene.add_node(SceneNode::group("swing"), None);
        (scene, swing)
    }

    #[test]
    fn swing_angle_stays_within_amplitude() {
        for i in 0..2000 {
            let t = i as f32 * 0.013;
            let angle = swing_angle(t);
            assert!(angle.abs() <= SWING_AMPLITUDE + EPSILON);
            assert!((angle - (2.5 * t).sin() * 0.5).abs() < EPSILON);
        }
    }

    #[test]
    fn camera_stays_on_orbit_and_faces_origin() {
        let (mut scene, swing) = scene_with_swing();
        for i in 0..200 {
            let t = i as f32 * 0.1;
            pose(&mut scene, swing, t);

            let eye = scene.camera.eye;
            assert!((eye.x * eye.x + eye.z * eye.z - 25.0).abs() < 1e-3);
            assert_eq!(eye.y, 2.0);
            assert!((scene.camera.forward() - (-eye).normalize()).magnitude() < EPSILON);
        }
    }

    #[test]
    fn pose_at_time_zero() {
        let (mut scene, swing) = scene_with_swing();
        pose(&mut scene, swing, 0.0);

        assert_eq!(scene[swing].transform.rotation.x, 0.0);
        let eye = scene.camera.eye;
        assert!(eye.x.abs() < EPSILON);
        assert_eq!(eye.y, 2.0);
        assert!((eye.z - 5.0).abs() < EPSILON);
    }

    #[test]
    fn clock_starts_at_zero_and_resets() {
        let mut clock = Clock::new();
        assert!(clock.elapsed() < 0.005);

        thread::sleep(Duration::from_millis(10));
        assert!(clock.elapsed() >= 0.009);

        clock.reset();
        assert!(clock.elapsed() < 0.005);
    }

    #[test]
    fn tick_poses_the_swing() {
        let (mut scene, swing) = scene_with_swing();
        let mut animation = SwingAnimation::new(swing);

        let t = animation.tick(&mut scene);
        assert!((scene[swing].transform.rotation.x - swing_angle(t)).abs() < EPSILON);
    }
}
