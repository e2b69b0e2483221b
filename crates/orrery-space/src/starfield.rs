//! Procedural starfield: deterministic white stars on the sky sphere, baked
//! into a cubemap for the skybox.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A single star on the sky sphere.
#[derive(Clone, Debug)]
pub struct StarPoint {
    /// Unit direction vector on the sky sphere.
    pub direction: glam::Vec3,
    /// Brightness in [0.0, 1.0]. Stars are white, so this is their gray level.
    pub brightness: f32,
}

/// Generates a deterministic catalog of stars from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
}

impl StarfieldGenerator {
    pub fn new(seed: u64, star_count: u32) -> Self {
        Self { seed, star_count }
    }

    /// Generate the star catalog. Deterministic for a given seed.
    pub fn generate(&self) -> Vec<StarPoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut stars = Vec::with_capacity(self.star_count as usize);

        for _ in 0..self.star_count {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();

            let direction =
                glam::Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());

            // Power-law: many dim, few bright.
            let raw: f32 = rng.random();
            let brightness = raw.powf(3.0).clamp(0.0, 1.0);

            stars.push(StarPoint {
                direction,
                brightness,
            });
        }

        stars
    }
}

/// A cubemap texture containing rendered star pixels.
pub struct StarfieldCubemap {
    /// Width/height of each cubemap face in pixels.
    pub face_size: u32,
    /// Six gray faces, `face_size * face_size` texels each.
    pub faces: [Vec<f32>; 6],
}

impl StarfieldCubemap {
    /// Render a star catalog into a cubemap texture.
    pub fn render(stars: &[StarPoint], face_size: u32) -> Self {
        let face_size = face_size.max(1);
        let pixel_count = (face_size * face_size) as usize;
        let mut faces: [Vec<f32>; 6] = std::array::from_fn(|_| vec![0.0; pixel_count]);

        for star in stars {
            let (face_index, u, v) = direction_to_cube_face_uv(star.direction);

            let px = (u * face_size as f32).min(face_size as f32 - 1.0) as u32;
            let py = (v * face_size as f32).min(face_size as f32 - 1.0) as u32;
            let idx = (py * face_size + px) as usize;

            // Stars sharing a texel accumulate.
            let level = star.brightness * 0.8 + 0.2;
            let pixel = &mut faces[face_index][idx];
            *pixel = (*pixel + level).min(1.0);

            // Bright stars bleed into their four neighbors.
            if star.brightness > 0.5 {
                let glow = star.brightness * 0.3;
                let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
                for (dx, dy) in offsets {
                    let nx = px as i32 + dx;
                    let ny = py as i32 + dy;
                    if nx >= 0 && nx < face_size as i32 && ny >= 0 && ny < face_size as i32 {
                        let ni = (ny as u32 * face_size + nx as u32) as usize;
                        let neighbor = &mut faces[face_index][ni];
                        *neighbor = (*neighbor + glow).min(1.0);
                    }
                }
            }
        }

        Self { face_size, faces }
    }

    /// Convert face data to RGBA8 bytes for GPU upload, one array per face.
    pub fn to_rgba8(&self) -> Vec<Vec<u8>> {
        self.faces
            .iter()
            .map(|face| {
                let mut bytes = Vec::with_capacity(face.len() * 4);
                for &level in face {
                    let gray = (level.clamp(0.0, 1.0) * 255.0) as u8;
                    bytes.extend_from_slice(&[gray, gray, gray, 255]);
                }
                bytes
            })
            .collect()
    }

    pub fn lit_texels(&self) -> usize {
        self.faces
            .iter()
            .map(|face| face.iter().filter(|&&level| level > 0.0).count())
            .sum()
    }
}

/// Map a unit direction vector to a cube face index (0..6) and UV coordinates in [0, 1].
///
/// Face indices: 0=+X, 1=-X, 2=+Y, 3=-Y, 4=+Z, 5=-Z.
pub(crate) fn direction_to_cube_face_uv(dir: glam::Vec3) -> (usize, f32, f32) {
    let abs = dir.abs();
    let (face, u, v) = if abs.x >= abs.y && abs.x >= abs.z {
        if dir.x > 0.0 {
            (0, -dir.z / abs.x, -dir.y / abs.x)
        } else {
            (1, dir.z / abs.x, -dir.y / abs.x)
        }
    } else if abs.y >= abs.x && abs.y >= abs.z {
        if dir.y > 0.0 {
            (2, dir.x / abs.y, dir.z / abs.y)
        } else {
            (3, dir.x / abs.y, -dir.z / abs.y)
        }
    } else if dir.z > 0.0 {
        (4, dir.x / abs.z, -dir.y / abs.z)
    } else {
        (5, -dir.x / abs.z, -dir.y / abs.z)
    };
    (face, u * 0.5 + 0.5, v * 0.5 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count_matches_request() {
        let stars = StarfieldGenerator::new(42, 5000).generate();
        assert_eq!(stars.len(), 5000);
    }

    #[test]
    fn test_star_directions_are_unit_vectors() {
        for (i, star) in StarfieldGenerator::new(42, 5000).generate().iter().enumerate() {
            let len = star.direction.length();
            assert!((len - 1.0).abs() < 1e-5, "star {i} has length {len}");
            assert!((0.0..=1.0).contains(&star.brightness));
        }
    }

    #[test]
    fn test_star_distribution_covers_full_sky() {
        let stars = StarfieldGenerator::new(42, 5000).generate();
        let mut octant_counts = [0u32; 8];
        for star in &stars {
            let d = star.direction;
            let octant = ((d.x >= 0.0) as usize)
                | (((d.y >= 0.0) as usize) << 1)
                | (((d.z >= 0.0) as usize) << 2);
            octant_counts[octant] += 1;
        }
        for (i, &count) in octant_counts.iter().enumerate() {
            assert!(
                (300..=900).contains(&count),
                "octant {i} has {count} stars, expected roughly 625"
            );
        }
    }

    #[test]
    fn test_same_seed_produces_same_starfield() {
        let a = StarfieldGenerator::new(123, 1000).generate();
        let b = StarfieldGenerator::new(123, 1000).generate();
        for (sa, sb) in a.iter().zip(&b) {
            assert!((sa.direction - sb.direction).length() < 1e-6);
            assert_eq!(sa.brightness, sb.brightness);
        }
    }

    #[test]
    fn test_brightness_skews_dim() {
        let stars = StarfieldGenerator::new(42, 5000).generate();
        let dim = stars.iter().filter(|s| s.brightness < 0.1).count();
        let bright = stars.iter().filter(|s| s.brightness > 0.5).count();
        assert!(dim > bright * 2, "dim {dim}, bright {bright}");
    }

    #[test]
    fn test_cubemap_faces_are_gray() {
        let stars = StarfieldGenerator::new(42, 2000).generate();
        let cubemap = StarfieldCubemap::render(&stars, 64);
        assert!(cubemap.lit_texels() > 100);
        for face in cubemap.to_rgba8() {
            assert_eq!(face.len(), 64 * 64 * 4);
            for px in face.chunks(4) {
                assert!(px[0] == px[1] && px[1] == px[2]);
                assert_eq!(px[3], 255);
            }
        }
    }

    #[test]
    fn test_cube_face_mapping_covers_all_faces() {
        let mut faces: Vec<usize> = [
            glam::Vec3::X,
            glam::Vec3::NEG_X,
            glam::Vec3::Y,
            glam::Vec3::NEG_Y,
            glam::Vec3::Z,
            glam::Vec3::NEG_Z,
        ]
        .iter()
        .map(|d| direction_to_cube_face_uv(*d).0)
        .collect();
        faces.sort();
        faces.dedup();
        assert_eq!(faces.len(), 6);
    }
}
