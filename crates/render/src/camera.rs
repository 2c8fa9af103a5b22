use glam::{Mat4, Vec2, Vec3};
use gridview_common::Ray;

const MIN_DISTANCE: f32 = 0.5;
const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

/// Perspective camera looking at a target point, orbited with the mouse.
///
/// Lives outside the scene: moving the camera never touches node state.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
}

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(4.0, 3.0, 4.0),
            target: Vec3::ZERO,
            fov_y: 60.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
        }
    }
}

impl ViewCamera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            ..Self::default()
        }
    }

    /// Update the aspect ratio from the surface size in pixels.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Orbit the eye around the target by a mouse delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        yaw += dx * self.sensitivity;
        pitch = (pitch + dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);

        let dir = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.eye = self.target + dir * radius;
    }

    /// Dolly toward the target. Positive `amount` moves closer.
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.eye - self.target;
        let radius = (offset.length() * (1.0 - amount * 0.1)).max(MIN_DISTANCE);
        self.eye = self.target + offset.normalize_or_zero() * radius;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through a point in normalized device
    /// coordinates (x right, y up, both in [-1, 1]).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        // wgpu clip space has depth in [0, 1].
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }
}
