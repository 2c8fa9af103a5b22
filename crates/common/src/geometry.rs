use glam::Vec3;

/// Linear interpolation from `a` toward `b` by factor `t`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// A half-line in world space. `direction` is kept normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Slab test. Returns the ray parameter of the first hit in front of the
    /// origin, or the exit parameter when the origin is inside the box.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();

        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // NaN from 0 * inf (origin on a slab plane, axis-parallel ray) fails
        // both comparisons, so treat it as a miss explicitly.
        if tmin.is_nan() || tmax.is_nan() {
            return None;
        }
        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0.0, 2.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 2.0, 1.0), 2.0);
        assert_eq!(lerp(0.0, 2.0, 0.25), 0.5);
    }

    #[test]
    fn ray_hits_box_in_front() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::NEG_Z);
        let t = aabb.ray_intersection(&ray).unwrap();
        assert!((t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_offset_box() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::new(2.0, 0.0, 2.0), Vec3::NEG_Z);
        assert!(aabb.ray_intersection(&ray).is_none());
    }

    #[test]
    fn box_behind_origin_is_missed() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Z);
        assert!(aabb.ray_intersection(&ray).is_none());
    }

    #[test]
    fn origin_inside_returns_exit() {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = aabb.ray_intersection(&ray).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.at(3.0), Vec3::new(0.0, 0.0, -3.0));
    }
}
