use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use gridview_render::{GridConfig, GridLines, GridTier};
use gridview_scene::{Scene, Shape};

/// Alpha of the fine lines. Coarse lines are opaque.
const PRIMARY_ALPHA: f32 = 0.35;

/// Backdrop used when the scene sets none.
pub const DEFAULT_BACKGROUND: [f32; 4] = [0.1, 0.1, 0.15, 1.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model_0: [f32; 4],
    pub model_1: [f32; 4],
    pub model_2: [f32; 4],
    pub model_3: [f32; 4],
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

/// Unit cube centered on the origin.
pub fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let corners = [
        [-p, -p, -p], [ p, -p, -p], [ p,  p, -p], [-p,  p, -p],
        [-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p],
    ];
    let vertices = corners.iter().map(|&position| Vertex { position }).collect();
    #[rustfmt::skip]
    let indices: Vec<u16> = vec![
        4,5,6, 6,7,4, // +Z
        1,0,3, 3,2,1, // -Z
        5,1,2, 2,6,5, // +X
        0,4,7, 7,3,0, // -X
        7,6,2, 2,3,7, // +Y
        0,1,5, 5,4,0, // -Y
    ];
    (vertices, indices)
}

/// Line-list vertices for the grid, two per segment.
pub fn grid_vertices(config: &GridConfig) -> Vec<GridVertex> {
    let lines = GridLines::build(config);
    let [r, g, b, _] = config.linear_color();
    lines
        .lines
        .iter()
        .flat_map(|line| {
            let alpha = match line.tier {
                GridTier::Primary => PRIMARY_ALPHA,
                GridTier::Secondary => 1.0,
            };
            let color = [r, g, b, alpha];
            [
                GridVertex {
                    position: line.start.to_array(),
                    color,
                },
                GridVertex {
                    position: line.end.to_array(),
                    color,
                },
            ]
        })
        .collect()
}

/// One instance per visible node, in scene order, at most `max`.
pub fn instances(scene: &Scene, max: usize) -> Vec<InstanceData> {
    let visible = scene.nodes().values().filter(|n| n.visible);
    let mut out: Vec<InstanceData> = Vec::new();
    for node in visible {
        if out.len() >= max {
            tracing::warn!(max, "instance limit reached, remaining nodes skipped");
            break;
        }
        let size = match node.shape {
            Shape::Cube { size } => Vec3::splat(size),
        };
        let t = &node.transform;
        let model = Mat4::from_scale_rotation_translation(t.scale * size, t.rotation, t.position);
        let cols = model.to_cols_array_2d();
        out.push(InstanceData {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: node.color,
        });
    }
    out
}

pub fn clear_color(scene: &Scene) -> wgpu::Color {
    let [r, g, b, a] = scene.background().unwrap_or(DEFAULT_BACKGROUND);
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridview_scene::Node;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn cube_has_twelve_triangles() {
        let (verts, indices) = cube_mesh();
        assert_eq!(verts.len(), 8);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < verts.len()));
    }

    #[test]
    fn hidden_grid_has_no_vertices() {
        let config = GridConfig {
            visible: false,
            ..GridConfig::default()
        };
        assert!(grid_vertices(&config).is_empty());
    }

    #[test]
    fn grid_tiers_use_different_alpha() {
        let config = GridConfig {
            distance: 20.0,
            ..GridConfig::default()
        };
        let verts = grid_vertices(&config);
        assert_eq!(verts.len() % 2, 0);
        assert!(verts.iter().any(|v| v.color[3] == PRIMARY_ALPHA));
        assert!(verts.iter().any(|v| v.color[3] == 1.0));
        assert!(verts.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn instances_skip_hidden_nodes_and_respect_limit() {
        let mut scene = Scene::new();
        scene.add(Node::cube(Vec3::ZERO, RED));
        scene.add(Node::cube(Vec3::X, RED));
        let hidden = scene.add(Node::cube(Vec3::Y, RED));
        scene.get_mut(hidden).unwrap().visible = false;

        assert_eq!(instances(&scene, 10).len(), 2);
        assert_eq!(instances(&scene, 1).len(), 1);
    }

    #[test]
    fn instance_carries_position_and_color() {
        let mut scene = Scene::new();
        scene.add(Node::cube(Vec3::new(1.0, 2.0, 3.0), RED));
        let inst = instances(&scene, 10)[0];
        assert_eq!(inst.model_3, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(inst.color, RED);
    }

    #[test]
    fn background_falls_back_to_default() {
        let mut scene = Scene::new();
        assert_eq!(clear_color(&scene).b as f32, DEFAULT_BACKGROUND[2]);
        scene.set_background(Some([1.0, 1.0, 1.0, 1.0]));
        assert_eq!(clear_color(&scene).r, 1.0);
    }
}
