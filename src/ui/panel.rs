// src/ui/panel.rs
//! Live parameter panel
//!
//! A [`ParameterPanel`] is a list of numeric [`Control`]s, each bound either to
//! a field of a scene node or to a field of the [`SwingConfig`]. The bound
//! field is the only copy of the value: the panel reads it every frame, so
//! changes made elsewhere (such as the animation) show up immediately.

use crate::{
    gfx::scene::{NodeField, NodeId, Scene},
    swing::config::{ConfigField, SwingConfig},
};

/// Hook run synchronously after a control wrote its target
pub type OnChange = Box<dyn Fn(&mut Scene, &SwingConfig)>;

/// Where a control reads and writes its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTarget {
    Node { node: NodeId, field: NodeField },
    Config(ConfigField),
}

impl ControlTarget {
    pub fn read(&self, scene: &Scene, config: &SwingConfig) -> f32 {
        match *self {
            ControlTarget::Node { node, field } => scene
                .get_node(node)
                .map(|n| n.transform.get(field))
                .unwrap_or_default(),
            ControlTarget::Config(field) => config.get(field),
        }
    }

    pub fn write(&self, value: f32, scene: &mut Scene, config: &mut SwingConfig) {
        match *self {
            ControlTarget::Node { node, field } => {
                if let Some(n) = scene.get_node_mut(node) {
                    n.transform.set(field, value);
                }
            }
            ControlTarget::Config(field) => config.set(field, value),
        }
    }
}

/// One slider
pub struct Control {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub target: ControlTarget,
    pub folder: Option<String>,
    on_change: Option<OnChange>,
}

impl Control {
    pub fn new(label: &str, target: ControlTarget) -> Self {
        Self {
            label: label.to_string(),
            min: 0.0,
            max: 1.0,
            step: 0.01,
            target,
            folder: None,
            on_change: None,
        }
    }

    pub fn node(label: &str, node: NodeId, field: NodeField) -> Self {
        Self::new(label, ControlTarget::Node { node, field })
    }

    pub fn config(label: &str, field: ConfigField) -> Self {
        Self::new(label, ControlTarget::Config(field))
    }

    /// Builder pattern: Set the slider range
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Builder pattern: Set the increment values snap to
    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Builder pattern: Place the control in a collapsible folder
    pub fn folder(mut self, name: &str) -> Self {
        self.folder = Some(name.to_string());
        self
    }

    /// Builder pattern: Run `hook` after every edit
    pub fn on_change(mut self, hook: impl Fn(&mut Scene, &SwingConfig) + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    /// Snaps `value` to the step grid anchored at `min` and clamps it into range
    ///
    /// The arithmetic runs in f64 so that decimal steps land on the value a
    /// user would type.
    pub fn quantize(&self, value: f32) -> f32 {
        let mut value = value as f64;
        if self.step > 0.0 {
            value = ((value - self.min) / self.step).round() * self.step + self.min;
        }
        value.clamp(self.min, self.max) as f32
    }

    /// Digits after the decimal point needed to show one step
    fn decimals(&self) -> usize {
        if self.step <= 0.0 {
            return 3;
        }
        (-self.step.log10()).ceil().max(0.0) as usize
    }
}

impl std::fmt::Debug for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Control")
            .field("label", &self.label)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("step", &self.step)
            .field("target", &self.target)
            .field("folder", &self.folder)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Ordered set of controls shown as one imgui window
pub struct ParameterPanel {
    pub title: String,
    pub width: f32,
    controls: Vec<Control>,
    visible: bool,
}

impl ParameterPanel {
    /// Creates a hidden panel
    pub fn new(title: &str, width: f32) -> Self {
        Self {
            title: title.to_string(),
            width,
            controls: Vec::new(),
            visible: false,
        }
    }

    /// Appends a control and returns its index
    pub fn add(&mut self, control: Control) -> usize {
        self.controls.push(control);
        self.controls.len() - 1
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn find(&self, label: &str) -> Option<usize> {
        self.controls.iter().position(|c| c.label == label)
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current value of a control, read from its target
    pub fn value(&self, index: usize, scene: &Scene, config: &SwingConfig) -> Option<f32> {
        self.controls.get(index).map(|c| c.target.read(scene, config))
    }

    /// Quantizes `value`, writes it to the control's target and runs its hook
    ///
    /// Returns the value actually written, or `None` for an unknown index.
    pub fn set(
        &self,
        index: usize,
        value: f32,
        scene: &mut Scene,
        config: &mut SwingConfig,
    ) -> Option<f32> {
        let control = self.controls.get(index)?;
        let value = control.quantize(value);
        control.target.write(value, scene, config);
        if let Some(hook) = &control.on_change {
            hook(scene, &*config);
        }
        Some(value)
    }

    /// Draws the panel; edits go through [`ParameterPanel::set`]
    pub fn render(&self, ui: &imgui::Ui, scene: &mut Scene, config: &mut SwingConfig) {
        if !self.visible {
            return;
        }

        ui.window(&self.title)
            .size([self.width, 0.0], imgui::Condition::FirstUseEver)
            .position([20.0, 20.0], imgui::Condition::FirstUseEver)
            .build(|| {
                let mut folder: Option<&str> = None;
                let mut folder_open = true;

                for (index, control) in self.controls.iter().enumerate() {
                    match control.folder.as_deref() {
                        Some(name) if folder != Some(name) => {
                            folder = Some(name);
                            folder_open = ui.collapsing_header(name, imgui::TreeNodeFlags::DEFAULT_OPEN);
                        }
                        Some(_) => {}
                        None => {
                            folder = None;
                            folder_open = true;
                        }
                    }
                    if !folder_open {
                        continue;
                    }

                    let mut value = control.target.read(scene, config);
                    ui.set_next_item_width(self.width * 0.55);
                    let changed = ui
                        .slider_config(&control.label, control.min as f32, control.max as f32)
                        .display_format(format!("%.{}f", control.decimals()))
                        .build(&mut value);
                    if changed {
                        self.set(index, value, scene, config);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{camera::PerspectiveCamera, scene::SceneNode};
    use std::{cell::Cell, rc::Rc};

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new(PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0));
        let node = scene.add_node(SceneNode::group("bar"), None);
        (scene, node)
    }

    #[test]
    fn quantize_snaps_from_min_and_clamps() {
        let control = Control::config("c", ConfigField::RopeX).range(-1.0, 1.0).step(0.25);
        assert_eq!(control.quantize(0.3), 0.25);
        assert_eq!(control.quantize(0.4), 0.5);
        assert_eq!(control.quantize(7.0), 1.0);
        assert_eq!(control.quantize(-7.0), -1.0);

        let offset = Control::config("c", ConfigField::RopeX).range(0.1, 1.0).step(0.5);
        assert!((offset.quantize(0.55) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn set_writes_node_field_and_panel_reads_it_back() {
        let (mut scene, node) = scene_with_node();
        let mut config = SwingConfig::default();
        let mut panel = ParameterPanel::new("Debug", 340.0);
        let index = panel.add(
            Control::node("Top Bar Y", node, NodeField::PositionY)
                .range(0.0, 2.0)
                .step(0.0001),
        );

        let applied = panel.set(index, 1.23456, &mut scene, &mut config).unwrap();
        assert!((applied - 1.2346).abs() < 1e-6);
        assert_eq!(scene[node].transform.position.y, applied);

        // Changes made outside the panel are visible on the next read
        scene[node].transform.position.y = 0.5;
        assert_eq!(panel.value(index, &scene, &config), Some(0.5));
    }

    #[test]
    fn hook_runs_after_write_with_updated_config() {
        let (mut scene, node) = scene_with_node();
        let mut config = SwingConfig::default();
        let seen = Rc::new(Cell::new(0.0));
        let seen_in_hook = seen.clone();

        let mut panel = ParameterPanel::new("Debug", 340.0);
        panel.add(
            Control::config("Rope X", ConfigField::RopeX)
                .range(0.0, 2.0)
                .step(0.0001)
                .on_change(move |scene, config| {
                    seen_in_hook.set(config.rope_x);
                    scene[node].transform.position.x = -config.rope_x;
                }),
        );

        panel.set(0, 0.75, &mut scene, &mut config);
        assert_eq!(config.rope_x, 0.75);
        assert_eq!(seen.get(), 0.75);
        assert_eq!(scene[node].transform.position.x, -0.75);
    }

    #[test]
    fn visibility_and_lookup() {
        let mut panel = ParameterPanel::new("Debug", 340.0);
        assert!(!panel.is_visible());
        panel.toggle();
        assert!(panel.is_visible());
        panel.hide();
        assert!(!panel.is_visible());

        panel.add(Control::config("Width", ConfigField::SeatWidth).folder("Swing Seat"));
        assert_eq!(panel.find("Width"), Some(0));
        assert_eq!(panel.find("Depth"), None);
        assert_eq!(panel.controls()[0].folder.as_deref(), Some("Swing Seat"));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let (mut scene, _) = scene_with_node();
        let mut config = SwingConfig::default();
        let panel = ParameterPanel::new("Debug", 340.0);
        assert_eq!(panel.set(3, 1.0, &mut scene, &mut config), None);
    }

    #[test]
    fn window_keeps_configured_width() {
        let (mut scene, node) = scene_with_node();
        let mut config = SwingConfig::default();
        let mut panel = ParameterPanel::new("Debug", 340.0);
        panel.add(Control::node("Top Bar Y", node, NodeField::PositionY).range(0.0, 2.0));
        panel.show();

        let mut context = imgui::Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [1200.0, 800.0];
        context.fonts().build_rgba32_texture();

        let ui = context.frame();
        panel.render(ui, &mut scene, &mut config);
        let size = ui.window(&panel.title).build(|| ui.window_size());
        context.render();

        assert_eq!(size.map(|[width, _]| width), Some(340.0));
    }
}
