use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    event::{Event, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::AssetLoader,
    config::AppConfig,
    gfx::{
        apply_resize,
        camera::PerspectiveCamera,
        rendering::{FrameStatus, RenderEngine, RenderSurface, UiOverlay},
        scene::Scene,
        Viewport,
    },
    swing::{
        build_controls, build_swing_set,
        model::{ENVIRONMENT_MAP, MATCAP_ASSETS},
        SwingAnimation, SwingConfig, SwingSetNodes,
    },
    ui::{ParameterPanel, UiManager},
};

pub const CAMERA_FOV_DEGREES: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

pub struct SwingSetApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: AppConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    swing_config: SwingConfig,
    nodes: SwingSetNodes,
    panel: ParameterPanel,
    animation: SwingAnimation,
    loader: AssetLoader,
    fatal: Option<anyhow::Error>,
}

impl SwingSetApp {
    /// Builds the scene, wires the panel and starts loading textures
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("Failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState::new(config),
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.app_state.scene
    }

    pub fn nodes(&self) -> &SwingSetNodes {
        &self.app_state.nodes
    }

    /// The debug panel, e.g. to `show()` it before running
    pub fn panel_mut(&mut self) -> &mut ParameterPanel {
        &mut self.app_state.panel
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("Event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("Event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Drains finished asset loads into the scene, then poses it for this frame
///
/// Returns the elapsed time the frame was posed for.
pub fn prepare_frame(loader: &mut AssetLoader, animation: &mut SwingAnimation, scene: &mut Scene) -> f32 {
    loader.apply_ready(scene);
    animation.tick(scene)
}

impl AppState {
    fn new(config: AppConfig) -> Self {
        let mut camera = PerspectiveCamera::new(
            CAMERA_FOV_DEGREES,
            config.width as f32 / config.height.max(1) as f32,
            CAMERA_NEAR,
            CAMERA_FAR,
        );
        camera.set_position(2.5, 2.0, 4.0);

        let mut scene = Scene::new(camera);
        let swing_config = SwingConfig::default();
        let nodes = build_swing_set(&mut scene, &swing_config);

        let mut panel = build_controls(&nodes, config.panel_width);
        if config.show_debug_panel {
            panel.show();
        }

        let mut loader = AssetLoader::new();
        for (material, path) in MATCAP_ASSETS {
            loader.load_matcap(material, config.asset_root.join(path));
        }
        loader.load_environment(config.asset_root.join(ENVIRONMENT_MAP));

        let stats = scene.get_statistics();
        log::info!(
            "Scene built: {} nodes, {} meshes, {} materials, {} triangles",
            stats.node_count,
            stats.mesh_count,
            stats.material_count,
            stats.total_triangles
        );

        Self {
            animation: SwingAnimation::new(nodes.swing),
            config,
            window: None,
            render_engine: None,
            ui_manager: None,
            scene,
            swing_config,
            nodes,
            panel,
            loader,
            fatal: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        self.config.width,
                        self.config.height,
                    )),
            )
            .context("Failed to create window")?;
        let window_handle = Arc::new(window);

        let viewport = Viewport::from_physical(window_handle.inner_size(), window_handle.scale_factor());
        let window_clone = window_handle.clone();
        let mut renderer = pollster::block_on(RenderEngine::new(
            window_clone,
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
        ))?;
        apply_resize(viewport, &mut self.scene.camera, &mut renderer);

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window_handle,
        );
        let (width, height) = renderer.buffer_size();
        ui_manager.update_display_size(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window_handle);
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };
        apply_resize(viewport, &mut self.scene.camera, render_engine);
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let (width, height) = render_engine.buffer_size();
            ui_manager.update_display_size(width, height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let AppState {
            window: Some(window),
            render_engine: Some(render_engine),
            ui_manager,
            scene,
            swing_config,
            panel,
            animation,
            loader,
            ..
        } = self
        else {
            return;
        };

        prepare_frame(loader, animation, scene);

        // Panel edits land before the frame is drawn
        let mut overlay: Option<&mut dyn UiOverlay> = None;
        if let Some(ui_manager) = ui_manager.as_mut().filter(|_| panel.is_visible()) {
            ui_manager.update_logic(window, |ui| panel.render(ui, scene, swing_config));
            overlay = Some(ui_manager);
        }

        if render_engine.render(scene, overlay) == FrameStatus::OutOfMemory {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            log::error!("{:#}", error);
            self.fatal = Some(error);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // Handle UI input first
        if let Some(ui_manager) = self.ui_manager.as_mut().filter(|_| self.panel.is_visible()) {
            let ui_event: Event<()> = Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                log::info!("Exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.resize(Viewport::from_physical(size, window.scale_factor()));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.resize(Viewport::from_physical(window.inner_size(), scale_factor));
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::buffer_extent;

    const EPSILON: f32 = 1e-3;

    #[derive(Default)]
    struct RecordingSurface {
        size: (f64, f64),
        ratio: f64,
        frames: Vec<(f32, [f32; 3])>,
    }

    impl RenderSurface for RecordingSurface {
        fn set_size(&mut self, width: f64, height: f64) {
            self.size = (width, height);
        }

        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = ratio;
        }

        fn buffer_size(&self) -> (u32, u32) {
            (
                buffer_extent(self.size.0, self.ratio),
                buffer_extent(self.size.1, self.ratio),
            )
        }

        fn render(&mut self, scene: &mut Scene, _: Option<&mut dyn UiOverlay>) -> FrameStatus {
            let swing = scene.find("swing").map(|id| scene[id].transform.rotation.x);
            self.frames
                .push((swing.unwrap_or(f32::NAN), scene.camera.eye.into()));
            FrameStatus::Presented
        }
    }

    fn state() -> AppState {
        AppState::new(AppConfig {
            asset_root: std::env::temp_dir().join("swingset-missing-assets"),
            ..Default::default()
        })
    }

    #[test]
    fn startup_state() {
        let state = state();
        assert!(!state.panel.is_visible());
        assert_eq!(state.panel.len(), 11);
        assert!(state.scene.environment().is_none());
        assert_eq!(state.swing_config, SwingConfig::default());
        assert_eq!(state.scene.camera.eye, cgmath::Vector3::new(2.5, 2.0, 4.0));
    }

    #[test]
    fn first_frame_is_posed_for_time_zero() {
        let mut state = state();
        let mut surface = RecordingSurface::default();

        prepare_frame(&mut state.loader, &mut state.animation, &mut state.scene);
        surface.render(&mut state.scene, None);

        let (swing, eye) = surface.frames[0];
        assert!(swing.abs() < EPSILON);
        assert!(eye[0].abs() < EPSILON * 5.0);
        assert_eq!(eye[1], 2.0);
        assert!((eye[2] - 5.0).abs() < EPSILON);
    }

    #[test]
    fn failed_loads_leave_placeholders() {
        let mut state = state();
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while state.loader.pending() > 0 && std::time::Instant::now() < deadline {
            prepare_frame(&mut state.loader, &mut state.animation, &mut state.scene);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert_eq!(state.loader.pending(), 0);
        assert!(state.scene.environment().is_none());
        for (material, _) in MATCAP_ASSETS {
            let material = state.scene.material_manager.get_material(material).unwrap();
            assert!(!material.has_matcap());
        }
    }

    #[test]
    fn panel_opt_in_shows_panel() {
        let state = AppState::new(AppConfig {
            show_debug_panel: true,
            asset_root: std::env::temp_dir().join("swingset-missing-assets"),
            ..Default::default()
        });
        assert!(state.panel.is_visible());
    }
}
