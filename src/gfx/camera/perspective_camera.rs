use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Free-standing perspective camera
///
/// The camera keeps an explicit eye and target. Orientation is never stored on
/// its own: it is derived from `eye`, `target` and `up` whenever a matrix is
/// built, so moving the eye without re-aiming keeps looking at the old target.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    projection: Matrix4<f32>,
}

impl Camera for PerspectiveCamera {
    fn build_view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        Matrix4::look_at_rh(eye, target, self.up)
    }

    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.build_view_matrix()
    }
}

impl PerspectiveCamera {
    /// Creates a camera with a vertical field of view in degrees
    pub fn new(fovy_degrees: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            eye: Vector3::zero(),
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            aspect,
            fovy: Deg(fovy_degrees).into(),
            znear,
            zfar,
            uniform: CameraUniform::default(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.eye = Vector3::new(x, y, z);
    }

    /// Re-aims the camera at `target`
    pub fn look_at(&mut self, target: Vector3<f32>) {
        self.target = target;
    }

    /// Unit vector from the eye towards the target
    pub fn forward(&self) -> Vector3<f32> {
        let direction = self.target - self.eye;
        if direction.magnitude2() > 0.0 {
            direction.normalize()
        } else {
            -Vector3::unit_z()
        }
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
    }

    /// Recomputes the cached projection after `aspect`, `fovy` or the clip planes change
    pub fn update_projection_matrix(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn update_view_proj(&mut self) {
        let view = self.build_view_matrix();
        let view_proj = self.projection * view;

        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view = convert_matrix4_to_array(view);
        self.uniform.view_proj = convert_matrix4_to_array(view_proj);
        self.uniform.inv_view_proj =
            convert_matrix4_to_array(view_proj.invert().unwrap_or_else(Matrix4::identity));
    }
}
