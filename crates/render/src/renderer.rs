use crate::camera::ViewCamera;
use crate::grid::{GridConfig, GridLines, GridTier};
use gridview_scene::Scene;
use std::fmt::Write;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene, the grid and the camera and produces output.
/// It never mutates the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene, grid: &GridConfig, camera: &ViewCamera) -> Self::Output;
}

/// Plain-text renderer for headless runs and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, grid: &GridConfig, camera: &ViewCamera) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} nodes) ===", scene.node_count());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            camera.eye.x,
            camera.eye.y,
            camera.eye.z,
            camera.target.x,
            camera.target.y,
            camera.target.z,
            camera.fov_y.to_degrees()
        );

        if grid.visible {
            let lines = GridLines::build(grid);
            let [r, g, b] = grid.color;
            let _ = writeln!(
                out,
                "Grid: #{r:02x}{g:02x}{b:02x} primary={:.1} ({} lines) secondary={:.1} ({} lines)",
                grid.primary_size,
                lines.tier(GridTier::Primary).count(),
                grid.secondary_size,
                lines.tier(GridTier::Secondary).count(),
            );
        } else {
            out.push_str("Grid: hidden\n");
        }

        for (id, node) in scene.nodes() {
            if !node.visible {
                continue;
            }
            let p = node.transform.position;
            let _ = writeln!(
                out,
                "  [{}] pos=({:.3}, {:.3}, {:.3})",
                id.short(),
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use gridview_scene::Node;

    #[test]
    fn empty_scene() {
        let scene = Scene::new();
        let out = DebugTextRenderer::new().render(&scene, &GridConfig::default(), &ViewCamera::default());
        assert!(out.contains("0 nodes"));
        assert!(out.contains("#bbbbbb"));
    }

    #[test]
    fn lists_visible_nodes_only() {
        let mut scene = Scene::new();
        scene.add(Node::cube(Vec3::new(1.0, 2.0, 3.0), [1.0, 0.0, 0.0, 1.0]));
        let hidden = scene.add(Node::cube(Vec3::ZERO, [1.0, 0.0, 0.0, 1.0]));
        scene.get_mut(hidden).unwrap().visible = false;

        let out = DebugTextRenderer::new().render(&scene, &GridConfig::default(), &ViewCamera::default());
        assert!(out.contains("2 nodes"));
        assert_eq!(out.matches("pos=").count(), 1);
        assert!(out.contains("pos=(1.000, 2.000, 3.000)"));
    }

    #[test]
    fn hidden_grid() {
        let grid = GridConfig {
            visible: false,
            ..GridConfig::default()
        };
        let out = DebugTextRenderer::new().render(&Scene::new(), &grid, &ViewCamera::default());
        assert!(out.contains("Grid: hidden"));
    }
}
