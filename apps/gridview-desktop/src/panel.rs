use gridview_render::{GridCommand, GridConfig};
use gridview_tools::SceneSummary;

/// Viewports narrower than this, in logical points, hide the panel behind a
/// toggle button.
pub const COMPACT_WIDTH: f32 = 480.0;

pub const PRIMARY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=10.0;
pub const SECONDARY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=20.0;
pub const SIZE_STEP: f64 = 0.1;

/// The "Grids Tutorial" settings panel.
///
/// Widgets edit a copy of the grid config; differences come back as
/// `GridCommand`s for the caller to submit.
#[derive(Debug, Default)]
pub struct SettingsPanel {
    /// Whether the toggle button has opened the panel. Only consulted in
    /// compact layouts.
    open: bool,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_compact(width: f32) -> bool {
        width < COMPACT_WIDTH
    }

    pub fn is_visible(&self, width: f32) -> bool {
        !Self::is_compact(width) || self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        tracing::debug!(open = self.open, "settings panel toggled");
    }

    /// Commands that turn `before` into `after`, one per changed field.
    pub fn edits(before: &GridConfig, after: &GridConfig) -> Vec<GridCommand> {
        let mut commands = Vec::new();
        if before.visible != after.visible {
            commands.push(GridCommand::SetVisible(after.visible));
        }
        if before.color != after.color {
            commands.push(GridCommand::SetColor(after.color));
        }
        if before.primary_size != after.primary_size {
            commands.push(GridCommand::SetPrimarySize(after.primary_size));
        }
        if before.secondary_size != after.secondary_size {
            commands.push(GridCommand::SetSecondarySize(after.secondary_size));
        }
        commands
    }

    /// Draw the toggle button (compact layouts) and the panel, returning the
    /// edits made this frame.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        config: &GridConfig,
        summary: &SceneSummary,
    ) -> Vec<GridCommand> {
        let width = ctx.screen_rect().width();
        if Self::is_compact(width) {
            egui::Area::new(egui::Id::new("settings_toggle"))
                .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
                .show(ctx, |ui| {
                    if ui.button("Settings").clicked() {
                        self.toggle();
                    }
                });
        }
        if !self.is_visible(width) {
            return Vec::new();
        }

        let mut draft = *config;
        egui::Window::new("Grids Tutorial")
            .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::CollapsingHeader::new("Controls")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.checkbox(&mut draft.visible, "Grid visible");
                        ui.horizontal(|ui| {
                            ui.label("Grid Color");
                            ui.color_edit_button_srgb(&mut draft.color);
                        });
                        ui.add(
                            egui::Slider::new(&mut draft.primary_size, PRIMARY_RANGE)
                                .step_by(SIZE_STEP)
                                .text("Grid primary size"),
                        );
                        ui.add(
                            egui::Slider::new(&mut draft.secondary_size, SECONDARY_RANGE)
                                .step_by(SIZE_STEP)
                                .text("Grid secondary size"),
                        );
                    });
                ui.separator();
                ui.small(format!(
                    "Nodes: {}  Hovered: {}",
                    summary.node_count, summary.hovered_count
                ));
                ui.small("F1: Settings | F2: Stats | RMB drag: Orbit | Wheel: Zoom");
            });

        Self::edits(config, &draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_layout_always_shows_panel() {
        let mut panel = SettingsPanel::new();
        assert!(panel.is_visible(1280.0));
        panel.toggle();
        assert!(panel.is_visible(1280.0));
    }

    #[test]
    fn compact_layout_follows_toggle() {
        let mut panel = SettingsPanel::new();
        assert!(!panel.is_visible(360.0));
        panel.toggle();
        assert!(panel.is_visible(360.0));
        panel.toggle();
        assert!(!panel.is_visible(360.0));
    }

    #[test]
    fn compact_threshold() {
        assert!(SettingsPanel::is_compact(479.9));
        assert!(!SettingsPanel::is_compact(480.0));
    }

    #[test]
    fn no_edits_when_unchanged() {
        let c = GridConfig::default();
        assert!(SettingsPanel::edits(&c, &c).is_empty());
    }

    #[test]
    fn edits_cover_every_changed_field() {
        let before = GridConfig::default();
        let after = GridConfig {
            visible: false,
            color: [0x10, 0x20, 0x30],
            primary_size: 5.0,
            secondary_size: 15.0,
            ..before
        };
        assert_eq!(
            SettingsPanel::edits(&before, &after),
            vec![
                GridCommand::SetVisible(false),
                GridCommand::SetColor([0x10, 0x20, 0x30]),
                GridCommand::SetPrimarySize(5.0),
                GridCommand::SetSecondarySize(15.0),
            ]
        );
    }
}
