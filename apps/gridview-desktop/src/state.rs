use crate::config::AppConfig;
use crate::overlay::{self, StatsView};
use crate::panel::SettingsPanel;
use glam::{UVec2, Vec3};
use gridview_common::EntityId;
use gridview_input::Action;
use gridview_interact::{Interactables, PointerPicker};
use gridview_render::{GridSettings, ViewCamera};
use gridview_scene::{Node, Scene};
use gridview_tools::SceneInspector;

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Everything the viewer updates and draws, independent of the GPU.
pub struct AppState {
    pub scene: Scene,
    pub interactables: Interactables,
    pub camera: ViewCamera,
    pub grid: GridSettings,
    pub picker: PointerPicker,
    pub panel: SettingsPanel,
    cube: EntityId,
    viewport: UVec2,
    hover_dirty: bool,
    cycle_stats: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let mut scene = Scene::new();
        scene.set_background(config.background);
        let cube = scene.add(Node::cube(Vec3::ZERO, RED));

        let mut interactables = Interactables::new(config.hover);
        interactables.register(cube, &scene);

        let mut camera = ViewCamera::default();
        camera.set_viewport(config.window.width, config.window.height);

        Self {
            scene,
            interactables,
            camera,
            grid: GridSettings::new(config.grid),
            picker: PointerPicker::new(),
            panel: SettingsPanel::new(),
            cube,
            viewport: UVec2::new(config.window.width, config.window.height),
            hover_dirty: false,
            cycle_stats: false,
        }
    }

    pub fn cube(&self) -> EntityId {
        self.cube
    }

    pub fn viewport(&self) -> UVec2 {
        self.viewport
    }

    /// Apply one input action. Returns false when the viewer should close.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::PointerMoved { position } => {
                self.picker.on_pointer_move(position, self.viewport);
                self.hover_dirty = true;
            }
            Action::Resized { width, height } => {
                self.viewport = UVec2::new(width, height);
                self.camera.set_viewport(width, height);
            }
            Action::Orbit { dx, dy } => {
                self.camera.orbit(dx, dy);
                self.hover_dirty = true;
            }
            Action::Zoom(amount) => {
                self.camera.zoom(amount);
                self.hover_dirty = true;
            }
            Action::ToggleSettings => self.panel.toggle(),
            Action::ToggleStats => self.cycle_stats = true,
            Action::Quit => return false,
            Action::Noop => {}
        }
        true
    }

    /// Re-run picking if the pointer or camera moved since the last call.
    pub fn refresh_hover(&mut self) {
        if !self.hover_dirty {
            return;
        }
        self.hover_dirty = false;
        self.picker
            .pick(&self.camera, &self.scene, &mut self.interactables);
    }

    /// True once after the stats panel was asked to cycle.
    pub fn take_stats_cycle(&mut self) -> bool {
        std::mem::take(&mut self.cycle_stats)
    }

    /// Per-frame update: apply queued grid edits, then ease interactables.
    pub fn update(&mut self, delta: f32) {
        self.grid.apply_pending();
        self.interactables.update_all(delta, &mut self.scene);
    }

    pub fn draw_ui(&mut self, ctx: &egui::Context, stats: &StatsView) {
        if overlay::show(ctx, stats) {
            self.cycle_stats = true;
        }

        let summary = SceneInspector::summary(&self.scene, &self.interactables);
        for command in self.panel.show(ctx, self.grid.config(), &summary) {
            if let Err(e) = self.grid.submit(command) {
                tracing::warn!("grid edit rejected: {e}");
            }
        }
    }
}
