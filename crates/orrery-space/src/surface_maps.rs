//! Equirectangular surface maps for every body.
//!
//! Maps are read from an optional texture directory using the conventional
//! file names below. Anything missing or undecodable is replaced by a
//! procedural map generated from layered simplex noise, so the scene always
//! renders.

use std::path::{Path, PathBuf};

use glam::{DVec3, Vec3};
use noise::{NoiseFn, Simplex};
use orrery_render::ImageData;
use orrery_sim::BodyId;

/// Shared highlight (rainbow) map.
pub const HIGHLIGHT_FILE: &str = "04_rainbow1k.jpg";

/// File names for one body's maps. Gas and ice giants reuse the color map
/// as elevation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapFiles {
    pub color: &'static str,
    pub elevation: &'static str,
    pub specular: Option<&'static str>,
    pub ring: Option<&'static str>,
}

pub fn map_files(id: BodyId) -> Option<MapFiles> {
    let files = match id {
        BodyId::Sun => return None,
        BodyId::Mercury => ("mercury_map.jpg", "mercury_bump.jpg", None, None),
        BodyId::Venus => ("venus_map.jpg", "venus_bump.jpg", None, None),
        BodyId::Earth => (
            "00_earthmap1k.jpg",
            "01_earthbump1k.jpg",
            Some("02_earthspec1k.jpg"),
            None,
        ),
        BodyId::Mars => ("mars_map.jpg", "mars_bump.jpg", None, None),
        BodyId::Jupiter => ("jupiter_map.jpg", "jupiter_bump.jpg", None, None),
        BodyId::Saturn => (
            "saturn_map2.jpg",
            "saturn_map2.jpg",
            None,
            Some("saturn_ring2.jpg"),
        ),
        BodyId::Uranus => (
            "uranus_map.jpg",
            "uranus_map.jpg",
            None,
            Some("uranus_ring.jpg"),
        ),
        BodyId::Neptune => (
            "neptune_map.jpg",
            "neptune_map.jpg",
            None,
            Some("uranus_ring.jpg"),
        ),
    };
    Some(MapFiles {
        color: files.0,
        elevation: files.1,
        specular: files.2,
        ring: files.3,
    })
}

/// The four maps a point-cloud planet samples.
#[derive(Clone, Debug)]
pub struct SurfaceMaps {
    pub color: ImageData,
    pub elevation: ImageData,
    pub highlight: ImageData,
    /// White where the surface is water. Solid black for bodies without one.
    pub specular: ImageData,
}

/// Resolves maps from disk with procedural fallbacks.
#[derive(Clone, Debug)]
pub struct TextureSource {
    dir: Option<PathBuf>,
    width: u32,
}

impl TextureSource {
    /// `procedural_width` is the width of generated maps; height is half.
    pub fn new(dir: Option<PathBuf>, procedural_width: u32) -> Self {
        Self {
            dir,
            width: procedural_width.max(8),
        }
    }

    pub fn surface_maps(&self, id: BodyId) -> SurfaceMaps {
        let palette = Palette::for_body(id);
        let files = map_files(id);
        let color = self.load_or(files.map(|f| f.color), || palette.color_map(self.width));
        let elevation = self.load_or(files.map(|f| f.elevation), || {
            palette.elevation_map(self.width)
        });
        let specular = match files.and_then(|f| f.specular) {
            Some(file) => self.load_or(Some(file), || palette.specular_map(self.width)),
            None => ImageData::solid([0, 0, 0, 255]),
        };
        SurfaceMaps {
            color,
            elevation,
            highlight: self.highlight_map(),
            specular,
        }
    }

    pub fn highlight_map(&self) -> ImageData {
        self.load_or(Some(HIGHLIGHT_FILE), || rainbow_map(self.width))
    }

    /// Radial ring strip for a ringed body.
    pub fn ring_map(&self, id: BodyId) -> ImageData {
        let file = map_files(id).and_then(|f| f.ring);
        self.load_or(file, || ring_strip(id, self.width))
    }

    fn load_or(&self, file: Option<&str>, fallback: impl FnOnce() -> ImageData) -> ImageData {
        let found = self
            .dir
            .as_deref()
            .zip(file)
            .and_then(|(dir, file)| find_file(dir, file));
        match found {
            Some(path) => match ImageData::load(&path) {
                Ok(image) => {
                    log::debug!("Loaded {}", path.display());
                    image
                }
                Err(err) => {
                    log::warn!("{}: {err}; using procedural map", path.display());
                    fallback()
                }
            },
            None => fallback(),
        }
    }
}

/// `file` as named, or with a `.png` extension instead.
fn find_file(dir: &Path, file: &str) -> Option<PathBuf> {
    let exact = dir.join(file);
    if exact.is_file() {
        return Some(exact);
    }
    let png = exact.with_extension("png");
    png.is_file().then_some(png)
}

/// Unit direction for an equirectangular UV, matching the sphere mesh UVs.
pub fn uv_to_direction(u: f32, v: f32) -> Vec3 {
    let lon = (u - 0.5) * std::f32::consts::TAU;
    let lat = (0.5 - v) * std::f32::consts::PI;
    Vec3::new(-lon.cos() * lat.cos(), lat.sin(), lon.sin() * lat.cos())
}

fn fbm(noise: &Simplex, p: DVec3, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut frequency = 1.0;
    let mut amplitude = 0.5;
    for _ in 0..octaves {
        let q = p * frequency;
        total += noise.get([q.x, q.y, q.z]) * amplitude;
        frequency *= 2.0;
        amplitude *= 0.5;
    }
    total
}

fn to_byte(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn generate(width: u32, height: u32, mut texel: impl FnMut(f32, f32) -> [f32; 4]) -> ImageData {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32;
            let v = (y as f32 + 0.5) / height as f32;
            pixels.extend(texel(u, v).map(to_byte));
        }
    }
    ImageData {
        width,
        height,
        pixels,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Rocky,
    Banded,
    Oceanic,
}

/// Colors and noise settings for a generated planet.
#[derive(Clone, Copy, Debug)]
struct Palette {
    low: [f32; 3],
    high: [f32; 3],
    style: Style,
    seed: u32,
    frequency: f64,
}

const SEA_DEEP: [f32; 3] = [0.04, 0.12, 0.42];
const SEA_SHALLOW: [f32; 3] = [0.08, 0.25, 0.6];
const SEA_LEVEL: f64 = 0.02;

impl Palette {
    fn for_body(id: BodyId) -> Self {
        let (low, high, style, frequency) = match id {
            BodyId::Sun => ([0.7, 0.0, 0.0], [1.0, 1.0, 0.0], Style::Rocky, 2.0),
            BodyId::Mercury => ([0.35, 0.34, 0.33], [0.7, 0.68, 0.64], Style::Rocky, 4.0),
            BodyId::Venus => ([0.62, 0.48, 0.28], [0.92, 0.8, 0.55], Style::Rocky, 2.0),
            BodyId::Earth => ([0.2, 0.42, 0.15], [0.6, 0.5, 0.32], Style::Oceanic, 2.0),
            BodyId::Mars => ([0.45, 0.18, 0.08], [0.85, 0.45, 0.25], Style::Rocky, 3.0),
            BodyId::Jupiter => ([0.6, 0.42, 0.28], [0.92, 0.85, 0.72], Style::Banded, 1.5),
            BodyId::Saturn => ([0.72, 0.6, 0.42], [0.94, 0.86, 0.66], Style::Banded, 1.2),
            BodyId::Uranus => ([0.55, 0.78, 0.84], [0.72, 0.9, 0.94], Style::Banded, 0.8),
            BodyId::Neptune => ([0.16, 0.28, 0.7], [0.36, 0.52, 0.92], Style::Banded, 1.0),
        };
        Self {
            low,
            high,
            style,
            seed: id.index() as u32 * 7919 + 17,
            frequency,
        }
    }

    fn height_at(&self, noise: &Simplex, u: f32, v: f32) -> f64 {
        let dir = uv_to_direction(u, v).as_dvec3();
        match self.style {
            Style::Banded => {
                let warp = fbm(noise, dir * self.frequency * 3.0, 3) * 0.6;
                let lat = (0.5 - v as f64) * std::f64::consts::PI;
                ((lat * 14.0 + warp * 4.0).sin() * 0.5 + fbm(noise, dir * 6.0, 2) * 0.3).clamp(-1.0, 1.0)
            }
            Style::Rocky | Style::Oceanic => fbm(noise, dir * self.frequency, 5) * 1.6,
        }
    }

    fn color_map(&self, width: u32) -> ImageData {
        let noise = Simplex::new(self.seed);
        generate(width, width / 2, |u, v| {
            let h = self.height_at(&noise, u, v);
            let rgb = if self.style == Style::Oceanic && h < SEA_LEVEL {
                let depth = ((SEA_LEVEL - h) * 2.0).clamp(0.0, 1.0) as f32;
                lerp3(SEA_SHALLOW, SEA_DEEP, depth)
            } else {
                lerp3(self.low, self.high, (h * 0.5 + 0.5) as f32)
            };
            [rgb[0], rgb[1], rgb[2], 1.0]
        })
    }

    fn elevation_map(&self, width: u32) -> ImageData {
        let noise = Simplex::new(self.seed);
        generate(width, width / 2, |u, v| {
            let h = self.height_at(&noise, u, v);
            let e = if self.style == Style::Oceanic {
                ((h - SEA_LEVEL) * 1.5).max(0.0) as f32
            } else {
                (h * 0.5 + 0.5) as f32
            };
            [e, e, e, 1.0]
        })
    }

    fn specular_map(&self, width: u32) -> ImageData {
        let noise = Simplex::new(self.seed);
        generate(width, width / 2, |u, v| {
            let s = if self.height_at(&noise, u, v) < SEA_LEVEL { 1.0 } else { 0.0 };
            [s, s, s, 1.0]
        })
    }
}

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

/// Full-saturation hue sweep along `u`.
fn rainbow_map(width: u32) -> ImageData {
    generate(width, width / 2, |u, v| {
        let rgb = hue_to_rgb(u + v * 0.25);
        [rgb[0], rgb[1], rgb[2], 1.0]
    })
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let h = hue.rem_euclid(1.0) * 6.0;
    let channel = |offset: f32| (((h + offset) % 6.0 - 3.0).abs() - 1.0).clamp(0.0, 1.0);
    [channel(0.0), channel(4.0), channel(2.0)]
}

/// Radial strip: `u` runs from the inner to the outer edge.
fn ring_strip(id: BodyId, width: u32) -> ImageData {
    let noise = Simplex::new(id.index() as u32 * 31 + 5);
    let tint = match id {
        BodyId::Saturn => [0.86, 0.76, 0.6],
        _ => [0.6, 0.66, 0.72],
    };
    generate(width, 4, |u, _| {
        let p = DVec3::new(u as f64 * 24.0, 0.5, 0.5);
        let band = (fbm(&noise, p, 4) * 0.5 + 0.5) as f32;
        let brightness = 0.6 + band * 0.5;
        // Saturn's dark division sits a little past the middle.
        let gap = if id == BodyId::Saturn && (0.56..0.62).contains(&u) {
            0.1
        } else {
            1.0
        };
        let alpha = (0.35 + band * 0.65) * gap;
        [
            tint[0] * brightness,
            tint[1] * brightness,
            tint[2] * brightness,
            alpha,
        ]
    })
}
