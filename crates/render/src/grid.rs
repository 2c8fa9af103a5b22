use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Hard cap on lines drawn on each side of the origin, per axis and tier.
/// Small spacings shrink the drawn extent instead of exploding the line count.
const MAX_LINES_PER_SIDE: i32 = 500;

/// Appearance of the ground grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub visible: bool,
    /// sRGB color of the grid lines.
    pub color: [u8; 3],
    /// Spacing of the fine lines, in world units.
    pub primary_size: f32,
    /// Spacing of the coarse lines, in world units.
    pub secondary_size: f32,
    /// Half extent of the drawn area, in world units.
    pub distance: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: true,
            color: [0xbb, 0xbb, 0xbb],
            primary_size: 1.0,
            secondary_size: 10.0,
            distance: 500.0,
        }
    }
}

impl GridConfig {
    /// Line color as linear RGBA.
    pub fn linear_color(&self) -> [f32; 4] {
        let [r, g, b] = self.color.map(srgb_to_linear);
        [r, g, b, 1.0]
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A single edit to the grid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCommand {
    SetVisible(bool),
    SetColor([u8; 3]),
    SetPrimarySize(f32),
    SetSecondarySize(f32),
}

/// Rejected grid edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

fn check_spacing(field: &'static str, value: f32) -> Result<(), GridError> {
    if !value.is_finite() {
        return Err(GridError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(GridError::Negative { field, value });
    }
    Ok(())
}

/// Single owner of the grid configuration.
///
/// UI code submits commands; the frame applies them once before drawing.
/// `revision` moves whenever the applied config actually changed, so GPU
/// backends know when to rebuild their line buffers.
#[derive(Debug, Default)]
pub struct GridSettings {
    config: GridConfig,
    pending: Vec<GridCommand>,
    revision: u64,
}

impl GridSettings {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            revision: 0,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Validate and queue an edit.
    pub fn submit(&mut self, command: GridCommand) -> Result<(), GridError> {
        match command {
            GridCommand::SetPrimarySize(v) => check_spacing("primary_size", v)?,
            GridCommand::SetSecondarySize(v) => check_spacing("secondary_size", v)?,
            GridCommand::SetVisible(_) | GridCommand::SetColor(_) => {}
        }
        self.pending.push(command);
        Ok(())
    }

    /// Apply queued edits in submission order. Returns how many changed the config.
    pub fn apply_pending(&mut self) -> usize {
        let mut changed = 0;
        for command in std::mem::take(&mut self.pending) {
            let before = self.config;
            match command {
                GridCommand::SetVisible(v) => self.config.visible = v,
                GridCommand::SetColor(c) => self.config.color = c,
                GridCommand::SetPrimarySize(v) => self.config.primary_size = v,
                GridCommand::SetSecondarySize(v) => self.config.secondary_size = v,
            }
            if self.config != before {
                changed += 1;
            }
        }
        if changed > 0 {
            self.revision += 1;
            tracing::debug!(revision = self.revision, config = ?self.config, "grid config updated");
        }
        changed
    }
}

/// Which spacing a grid line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTier {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub start: Vec3,
    pub end: Vec3,
    pub tier: GridTier,
}

/// Line segments for a grid on the XZ plane.
#[derive(Debug, Clone, Default)]
pub struct GridLines {
    pub lines: Vec<GridLine>,
}

impl GridLines {
    pub fn build(config: &GridConfig) -> Self {
        let mut lines = Vec::new();
        if config.visible {
            push_tier(&mut lines, config.primary_size, config.distance, GridTier::Primary);
            push_tier(&mut lines, config.secondary_size, config.distance, GridTier::Secondary);
        }
        Self { lines }
    }

    pub fn tier(&self, tier: GridTier) -> impl Iterator<Item = &GridLine> {
        self.lines.iter().filter(move |l| l.tier == tier)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn push_tier(lines: &mut Vec<GridLine>, spacing: f32, distance: f32, tier: GridTier) {
    if spacing <= 0.0 || distance <= 0.0 {
        return;
    }
    let per_side = ((distance / spacing).floor() as i32).clamp(1, MAX_LINES_PER_SIDE);
    let extent = per_side as f32 * spacing;

    for i in -per_side..=per_side {
        let offset = i as f32 * spacing;
        lines.push(GridLine {
            start: Vec3::new(-extent, 0.0, offset),
            end: Vec3::new(extent, 0.0, offset),
            tier,
        });
        lines.push(GridLine {
            start: Vec3::new(offset, 0.0, -extent),
            end: Vec3::new(offset, 0.0, extent),
            tier,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_helper() {
        let c = GridConfig::default();
        assert!(c.visible);
        assert_eq!(c.color, [0xbb, 0xbb, 0xbb]);
        assert_eq!(c.primary_size, 1.0);
        assert_eq!(c.secondary_size, 10.0);
    }

    #[test]
    fn commands_apply_on_frame_not_on_submit() {
        let mut grid = GridSettings::default();
        grid.submit(GridCommand::SetVisible(false)).unwrap();
        assert!(grid.config().visible);
        assert_eq!(grid.pending(), 1);

        assert_eq!(grid.apply_pending(), 1);
        assert!(!grid.config().visible);
        assert_eq!(grid.pending(), 0);
    }

    #[test]
    fn primary_size_five_draws_five_unit_spacing() {
        let mut grid = GridSettings::default();
        grid.submit(GridCommand::SetPrimarySize(5.0)).unwrap();
        grid.apply_pending();
        assert_eq!(grid.config().primary_size, 5.0);

        let lines = GridLines::build(grid.config());
        let mut offsets: Vec<f32> = lines
            .tier(GridTier::Primary)
            .filter(|l| l.start.z == l.end.z)
            .map(|l| l.start.z)
            .collect();
        offsets.sort_by(f32::total_cmp);
        assert!(offsets.len() > 2);
        for pair in offsets.windows(2) {
            assert!((pair[1] - pair[0] - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn rejects_negative_and_nan_spacing() {
        let mut grid = GridSettings::default();
        assert_eq!(
            grid.submit(GridCommand::SetPrimarySize(-1.0)),
            Err(GridError::Negative {
                field: "primary_size",
                value: -1.0
            })
        );
        assert!(matches!(
            grid.submit(GridCommand::SetSecondarySize(f32::NAN)),
            Err(GridError::NonFinite { .. })
        ));
        assert_eq!(grid.pending(), 0);
    }

    #[test]
    fn revision_moves_only_on_change() {
        let mut grid = GridSettings::default();
        grid.submit(GridCommand::SetPrimarySize(1.0)).unwrap();
        assert_eq!(grid.apply_pending(), 0);
        assert_eq!(grid.revision(), 0);

        grid.submit(GridCommand::SetColor([255, 0, 0])).unwrap();
        grid.submit(GridCommand::SetSecondarySize(20.0)).unwrap();
        assert_eq!(grid.apply_pending(), 2);
        assert_eq!(grid.revision(), 1);
    }

    #[test]
    fn hidden_grid_has_no_lines() {
        let config = GridConfig {
            visible: false,
            ..GridConfig::default()
        };
        assert!(GridLines::build(&config).is_empty());
    }

    #[test]
    fn zero_spacing_skips_tier() {
        let config = GridConfig {
            primary_size: 0.0,
            ..GridConfig::default()
        };
        let lines = GridLines::build(&config);
        assert_eq!(lines.tier(GridTier::Primary).count(), 0);
        assert!(lines.tier(GridTier::Secondary).count() > 0);
    }

    #[test]
    fn tiny_spacing_is_capped() {
        let config = GridConfig {
            primary_size: 0.1,
            ..GridConfig::default()
        };
        let lines = GridLines::build(&config);
        let per_axis = (2 * MAX_LINES_PER_SIDE + 1) as usize;
        assert_eq!(lines.tier(GridTier::Primary).count(), per_axis * 2);
    }

    #[test]
    fn linear_color_of_white_is_one() {
        let config = GridConfig {
            color: [255, 255, 255],
            ..GridConfig::default()
        };
        let c = config.linear_color();
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert_eq!(c[3], 1.0);
    }
}
