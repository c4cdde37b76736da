//! Window size bookkeeping shared by the camera and the render surface

use winit::dpi::PhysicalSize;

use super::{
    camera::PerspectiveCamera,
    rendering::{RenderSurface, MAX_PIXEL_RATIO},
};

/// Logical size of the drawable area plus the capped pixel ratio
///
/// The logical size stays fractional: with a scale factor at or below the cap,
/// `width * pixel_ratio` lands back on the window's physical width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, host_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: host_ratio.min(MAX_PIXEL_RATIO),
        }
    }

    /// Derives the logical viewport from winit's physical size and scale factor
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self::new(logical.width, logical.height, scale_factor)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }
}

/// Pushes a new viewport into the camera projection and the render surface
///
/// A zero-sized viewport (minimized window) is ignored.
pub fn apply_resize(viewport: Viewport, camera: &mut PerspectiveCamera, surface: &mut dyn RenderSurface) {
    if viewport.is_empty() {
        log::debug!("Ignoring empty viewport {:?}", viewport);
        return;
    }

    camera.aspect = viewport.aspect();
    camera.update_projection_matrix();
    surface.set_size(viewport.width, viewport.height);
    surface.set_pixel_ratio(viewport.pixel_ratio);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        rendering::{buffer_extent, target_extent, FrameStatus, UiOverlay},
        scene::Scene,
    };

    /// Mirrors the render engine's reconfigure rule without a GPU
    #[derive(Default)]
    struct RecordingSurface {
        size: (f64, f64),
        ratio: f64,
        buffer: (u32, u32),
        calls: usize,
        reconfigures: usize,
    }

    impl RecordingSurface {
        fn reconfigure(&mut self) {
            if let Some(extent) = target_extent(self.size, self.ratio, self.buffer, 8192) {
                self.buffer = extent;
                self.reconfigures += 1;
            }
        }
    }

    impl RenderSurface for RecordingSurface {
        fn set_size(&mut self, width: f64, height: f64) {
            self.size = (width, height);
            self.calls += 1;
            self.reconfigure();
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = ratio;
            self.calls += 1;
            self.reconfigure();
        }

        fn buffer_size(&self) -> (u32, u32) {
            self.buffer
        }

        fn render(&mut self, _: &mut Scene, _: Option<&mut dyn UiOverlay>) -> FrameStatus {
            FrameStatus::Presented
        }
    }

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 800.0 / 600.0, 0.1, 100.0)
    }

    #[test]
    fn resize_updates_aspect_and_buffer() {
        let mut camera = camera();
        let mut surface = RecordingSurface::default();

        apply_resize(Viewport::new(800.0, 600.0, 1.0), &mut camera, &mut surface);
        apply_resize(Viewport::new(1024.0, 768.0, 1.0), &mut camera, &mut surface);

        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        assert_eq!(surface.buffer_size(), (1024, 768));
    }

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(Viewport::new(10.0, 10.0, 3.0).pixel_ratio, 2.0);
        assert_eq!(Viewport::new(10.0, 10.0, 1.25).pixel_ratio, 1.25);

        let mut camera = camera();
        let mut surface = RecordingSurface::default();
        apply_resize(Viewport::new(640.0, 480.0, 3.0), &mut camera, &mut surface);
        assert_eq!(surface.buffer_size(), (1280, 960));
        assert_eq!(buffer_extent(640.0, 3.0_f64.min(MAX_PIXEL_RATIO)), 1280);
    }

    #[test]
    fn empty_viewport_is_ignored() {
        let mut camera = camera();
        let before = camera.aspect;
        let mut surface = RecordingSurface::default();

        apply_resize(Viewport::new(0.0, 600.0, 1.0), &mut camera, &mut surface);

        assert_eq!(camera.aspect, before);
        assert_eq!(surface.calls, 0);
    }

    #[test]
    fn physical_size_is_divided_by_scale() {
        let viewport = Viewport::from_physical(PhysicalSize::new(2400, 1600), 2.0);
        assert_eq!((viewport.width, viewport.height), (1200.0, 800.0));
        assert_eq!(viewport.pixel_ratio, 2.0);
    }

    #[test]
    fn fractional_scale_buffer_matches_window_pixels() {
        for scale in [1.25, 1.5, 1.75] {
            for (width, height) in [(1201, 700), (1002, 601), (1920, 1080)] {
                let mut camera = camera();
                let mut surface = RecordingSurface::default();

                let viewport = Viewport::from_physical(PhysicalSize::new(width, height), scale);
                apply_resize(viewport, &mut camera, &mut surface);

                assert_eq!(surface.buffer_size(), (width, height), "{width}x{height} at {scale}");
            }
        }
    }

    #[test]
    fn scale_above_cap_renders_at_two() {
        let mut camera = camera();
        let mut surface = RecordingSurface::default();

        let viewport = Viewport::from_physical(PhysicalSize::new(3000, 1500), 3.0);
        apply_resize(viewport, &mut camera, &mut surface);

        assert_eq!(surface.buffer_size(), (2000, 1000));
    }

    #[test]
    fn same_viewport_twice_changes_nothing() {
        let mut camera = camera();
        let mut surface = RecordingSurface::default();
        let viewport = Viewport::from_physical(PhysicalSize::new(1201, 700), 1.5);

        apply_resize(viewport, &mut camera, &mut surface);
        let (aspect, buffer, reconfigures) = (camera.aspect, surface.buffer_size(), surface.reconfigures);
        apply_resize(viewport, &mut camera, &mut surface);

        assert_eq!(camera.aspect, aspect);
        assert_eq!(surface.buffer_size(), buffer);
        assert_eq!(surface.reconfigures, reconfigures);
    }
}
