//! The boundary between the frame loop and whatever draws the frame

use crate::gfx::scene::Scene;

/// Largest device pixel ratio the output buffer is rendered at
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Physical extent of one buffer axis for a logical size at `ratio`, never below 1
///
/// The logical size is kept fractional, so a window whose scale factor is
/// within the cap maps back onto its exact physical size.
pub fn buffer_extent(logical: f64, ratio: f64) -> u32 {
    ((logical * ratio).round() as u32).max(1)
}

/// Buffer size the surface should be configured to, or `None` when nothing changes
///
/// An empty logical size (minimized window) and a target equal to `current`
/// both leave the surface alone. Each axis is clamped to `max_dimension`.
pub fn target_extent(
    logical: (f64, f64),
    ratio: f64,
    current: (u32, u32),
    max_dimension: u32,
) -> Option<(u32, u32)> {
    let (width, height) = logical;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let max_dimension = max_dimension.max(1);
    let target = (
        buffer_extent(width, ratio).min(max_dimension),
        buffer_extent(height, ratio).min(max_dimension),
    );
    (target != current).then_some(target)
}

/// What happened to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// The surface was not ready; the next redraw tries again
    Skipped,
    /// The device ran out of memory; the application should exit
    OutOfMemory,
}

/// Something recorded into the frame after the scene, such as the debug panel
pub trait UiOverlay {
    fn record(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
    );
}

/// Draws a [`Scene`] into a sized output
///
/// `set_size` takes the logical size and `set_pixel_ratio` the (already capped)
/// ratio. The physical buffer is `buffer_extent` of both axes. Setting the same
/// values again is a no-op.
pub trait RenderSurface {
    fn set_size(&mut self, width: f64, height: f64);
    fn set_pixel_ratio(&mut self, ratio: f64);
    /// Physical size of the output buffer
    fn buffer_size(&self) -> (u32, u32);
    fn render(&mut self, scene: &mut Scene, overlay: Option<&mut dyn UiOverlay>) -> FrameStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u32 = 8192;

    #[test]
    fn buffer_extent_rounds_and_never_collapses() {
        assert_eq!(buffer_extent(1024.0, 1.0), 1024);
        assert_eq!(buffer_extent(640.0, 2.0), 1280);
        assert_eq!(buffer_extent(0.0, 2.0), 1);
        assert_eq!(buffer_extent(1.0, 0.25), 1);
    }

    #[test]
    fn fractional_scales_map_back_to_physical_pixels() {
        for scale in [1.0, 1.1, 1.25, 1.5, 1.75, 2.0] {
            for physical in [1u32, 7, 573, 800, 1002, 1201, 1919, 2561] {
                let logical = physical as f64 / scale;
                assert_eq!(buffer_extent(logical, scale), physical, "{physical} px at {scale}");
            }
        }
    }

    #[test]
    fn same_size_twice_is_a_no_op() {
        let logical = (1201.0 / 1.5, 700.0 / 1.5);

        let first = target_extent(logical, 1.5, (0, 0), MAX);
        assert_eq!(first, Some((1201, 700)));
        assert_eq!(target_extent(logical, 1.5, (1201, 700), MAX), None);
    }

    #[test]
    fn empty_logical_size_keeps_the_surface() {
        assert_eq!(target_extent((0.0, 600.0), 1.0, (800, 600), MAX), None);
        assert_eq!(target_extent((800.0, 0.0), 1.0, (800, 600), MAX), None);
    }

    #[test]
    fn extent_is_clamped_to_device_limit() {
        assert_eq!(target_extent((5120.0, 1440.0), 1.0, (800, 600), 4096), Some((4096, 1440)));
        assert_eq!(target_extent((5120.0, 1440.0), 1.0, (4096, 1440), 4096), None);
    }
}
