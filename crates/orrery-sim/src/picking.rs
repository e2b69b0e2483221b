//! Screen-space ray picking against body hit spheres.

use glam::{Mat4, Vec2, Vec3};

use crate::body::BodyId;

/// A world-space ray. `dir` need not be normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Unproject a cursor position (physical pixels, origin top-left)
    /// through a reverse-Z inverse view-projection.
    pub fn from_screen(cursor: Vec2, viewport: Vec2, inv_view_proj: Mat4) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            cursor.x / viewport.x * 2.0 - 1.0,
            1.0 - cursor.y / viewport.y * 2.0,
        );
        let near = inv_view_proj.project_point3(ndc.extend(1.0));
        let far = inv_view_proj.project_point3(ndc.extend(0.0));
        let dir = (far - near).try_normalize()?;
        Some(Self { origin: near, dir })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Nearest non-negative hit parameter against a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let a = self.dir.length_squared();
        if a <= f32::EPSILON {
            return None;
        }
        let half_b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let disc = half_b * half_b - a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let near = (-half_b - sqrt_disc) / a;
        let far = (-half_b + sqrt_disc) / a;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }

    /// The same ray expressed in the local space of `model`.
    pub fn to_local(&self, model: Mat4) -> Self {
        let inv = model.inverse();
        Self {
            origin: inv.transform_point3(self.origin),
            dir: inv.transform_vector3(self.dir),
        }
    }
}

/// Equirectangular UV of a direction on a unit sphere. `v = 0` is the north
/// pole (top row of the map) and `u` increases eastward seen from outside.
pub fn sphere_uv(dir: Vec3) -> Vec2 {
    let d = dir.normalize_or(Vec3::Y);
    let u = d.z.atan2(-d.x) / std::f32::consts::TAU + 0.5;
    let v = 0.5 - d.y.clamp(-1.0, 1.0).asin() / std::f32::consts::PI;
    Vec2::new(u, v)
}

/// A body under the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub body: BodyId,
    /// Surface UV in the body's rotating frame.
    pub uv: Vec2,
    /// Ray parameter of the hit (world units for a normalized ray).
    pub distance: f32,
}

/// Hit-test one body whose local hit sphere has `local_radius`.
pub fn pick_body(ray: &Ray, body: BodyId, model: Mat4, local_radius: f32) -> Option<PickHit> {
    let local = ray.to_local(model);
    let t = local.intersect_sphere(Vec3::ZERO, local_radius)?;
    let point = local.at(t);
    Some(PickHit {
        body,
        uv: sphere_uv(point),
        distance: t,
    })
}

/// Nearest hit among `(body, model, local_radius)` candidates.
pub fn pick_nearest<I>(ray: &Ray, candidates: I) -> Option<PickHit>
where
    I: IntoIterator<Item = (BodyId, Mat4, f32)>,
{
    candidates
        .into_iter()
        .filter_map(|(body, model, radius)| pick_body(ray, body, model, radius))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_sphere_front() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        };
        let t = ray.intersect_sphere(Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_sphere() {
        let ray = Ray {
            origin: Vec3::new(5.0, 0.0, 10.0),
            dir: Vec3::NEG_Z,
        };
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_sphere_behind_ray_is_ignored() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::Z,
        };
        assert!(ray.intersect_sphere(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_sphere_uv_poles_and_equator() {
        assert!(sphere_uv(Vec3::Y).y.abs() < 1e-6);
        assert!((sphere_uv(Vec3::NEG_Y).y - 1.0).abs() < 1e-6);
        let uv = sphere_uv(Vec3::NEG_X);
        assert!((uv - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_sphere_uv_increases_eastward() {
        // Seen from +Z, -X is on the left and +X on the right.
        let left = sphere_uv(Vec3::new(-1.0, 0.0, 0.2)).x;
        let front = sphere_uv(Vec3::Z).x;
        let right = sphere_uv(Vec3::new(1.0, 0.0, 0.2)).x;
        assert!(left < front && front < right);
    }

    #[test]
    fn test_from_screen_center_points_forward() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(45f32.to_radians(), 1.0, 1000.0, 0.1);
        let inv = (proj * view).inverse();
        let ray = Ray::from_screen(Vec2::new(50.0, 50.0), Vec2::new(100.0, 100.0), inv).unwrap();
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-3);
        assert!((ray.origin.z - 9.9).abs() < 1e-2);
    }

    #[test]
    fn test_from_screen_rejects_empty_viewport() {
        assert!(Ray::from_screen(Vec2::ZERO, Vec2::ZERO, Mat4::IDENTITY).is_none());
    }

    #[test]
    fn test_pick_scaled_body_uv() {
        let model = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(0.6));
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 0.0),
            dir: Vec3::X,
        };
        let hit = pick_body(&ray, BodyId::Earth, model, 1.0).unwrap();
        assert!((hit.distance - 9.4).abs() < 1e-4);
        // The ray enters on the body's -X side.
        assert!((hit.uv - Vec2::new(0.5, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_pick_nearest_prefers_closer() {
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::X,
        };
        let near = Mat4::from_translation(Vec3::new(6.0, 0.0, 0.0));
        let far = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let hit = pick_nearest(
            &ray,
            [(BodyId::Earth, far, 1.0), (BodyId::Mercury, near, 1.0)],
        )
        .unwrap();
        assert_eq!(hit.body, BodyId::Mercury);
    }
}
