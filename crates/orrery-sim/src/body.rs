//! The sun and the eight planets: identity, orbit, and surface styling.
//!
//! The catalog is immutable. Everything that changes per tick lives in
//! [`crate::system::BodyState`].

use std::fmt;
use std::str::FromStr;

use crate::focus::FocusError;
use crate::interaction::InteractionPolicy;

/// Uniform shrink applied to every planet so neighbours don't crowd each
/// other on their orbits.
pub const BASE_SCALE: f32 = 0.6;

/// Radius of the sun's plasma core before its group scale.
pub const SUN_CORE_RADIUS: f32 = 2.5;

/// Radius of each planet's opaque backing sphere, relative to the point cloud.
pub const OCCLUDER_RADIUS: f32 = 0.99;

/// Identifies one body in the system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BodyId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl BodyId {
    /// Every body, innermost first.
    pub const ALL: [BodyId; 9] = [
        BodyId::Sun,
        BodyId::Mercury,
        BodyId::Venus,
        BodyId::Earth,
        BodyId::Mars,
        BodyId::Jupiter,
        BodyId::Saturn,
        BodyId::Uranus,
        BodyId::Neptune,
    ];

    /// Position in [`BodyId::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case key used for textual selection (`"EARTH"`).
    pub fn key(self) -> &'static str {
        match self {
            BodyId::Sun => "SUN",
            BodyId::Mercury => "MERCURY",
            BodyId::Venus => "VENUS",
            BodyId::Earth => "EARTH",
            BodyId::Mars => "MARS",
            BodyId::Jupiter => "JUPITER",
            BodyId::Saturn => "SATURN",
            BodyId::Uranus => "URANUS",
            BodyId::Neptune => "NEPTUNE",
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            BodyId::Sun => "Sun",
            BodyId::Mercury => "Mercury",
            BodyId::Venus => "Venus",
            BodyId::Earth => "Earth",
            BodyId::Mars => "Mars",
            BodyId::Jupiter => "Jupiter",
            BodyId::Saturn => "Saturn",
            BodyId::Uranus => "Uranus",
            BodyId::Neptune => "Neptune",
        }
    }

    pub fn is_planet(self) -> bool {
        self != BodyId::Sun
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BodyId {
    type Err = FocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        BodyId::ALL
            .into_iter()
            .find(|id| id.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FocusError::UnknownTarget(trimmed.to_string()))
    }
}

/// How a planet's sprites are sized on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointSize {
    /// `size * 8 / depth` pixels, so near points grow.
    Attenuated(f32),
    /// Fixed pixel size regardless of distance.
    Constant(f32),
}

/// Where the interaction highlight color comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Highlight {
    /// Sampled from the body's highlight (rainbow) map at the point's UV.
    Texture,
    /// A fixed linear RGB color.
    Color([f32; 3]),
}

/// Elevation shading: color is multiplied by `base + gain * elevation`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shading {
    pub base: f32,
    pub gain: f32,
}

/// Point-cloud surface parameters for one planet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceStyle {
    pub point_size: PointSize,
    /// Elevation displacement along view depth.
    pub displacement: f32,
    /// UV radius of the pointer ripple.
    pub threshold: f32,
    /// Depth push per unit of `threshold - distance`.
    pub depth_gain: f32,
    /// Highlight mix per unit of `threshold - distance`.
    pub color_gain: f32,
    pub highlight: Highlight,
    pub shading: Option<Shading>,
    /// Color of the opaque backing sphere. `None` draws no backing sphere.
    pub occluder: Option<[f32; 3]>,
    /// Land/sea split: ocean texels are dropped from the cloud and drawn by
    /// a separate animated ocean shell, and alpha comes from the specular map.
    pub ocean: bool,
    /// Geodesic subdivision detail of the point cloud.
    pub detail: u32,
}

/// A flat textured ring around a planet, in planet-local units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingStyle {
    pub inner: f32,
    pub outer: f32,
    pub opacity: f32,
    /// Width of the smoothstep fade at each edge, in normalized radius.
    pub edge: f32,
}

/// A back-face additive halo: `pow(falloff - n·v, power) * intensity`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowStyle {
    /// Shell radius relative to the body.
    pub scale: f32,
    pub falloff: f32,
    pub power: f32,
    pub intensity: f32,
    pub color: [f32; 3],
}

/// Static description of one body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CelestialBody {
    pub id: BodyId,
    /// Distance from the sun in scene units.
    pub orbit_radius: f32,
    /// Relative angular speed. Earth is 1.0.
    pub angular_speed: f32,
    /// Visual scale before [`BASE_SCALE`] (planets) or as-is (sun).
    pub scale: f32,
    /// Axial tilt about the local Z axis, in degrees.
    pub axial_tilt_deg: f32,
    /// Spin about the local Y axis per tick, in radians.
    pub spin_per_tick: f32,
    /// `None` for the sun, which is drawn by its own plasma shader.
    pub surface: Option<SurfaceStyle>,
    pub ring: Option<RingStyle>,
    pub atmosphere: Option<GlowStyle>,
    pub interaction: InteractionPolicy,
}

impl CelestialBody {
    /// World-space scale applied to the body's unit geometry.
    pub fn world_scale(&self) -> f32 {
        if self.id.is_planet() {
            self.scale * BASE_SCALE
        } else {
            self.scale
        }
    }

    /// Radius of the pick sphere in world units.
    pub fn pick_radius(&self) -> f32 {
        if self.id.is_planet() {
            self.world_scale()
        } else {
            SUN_CORE_RADIUS * self.world_scale()
        }
    }

    pub fn axial_tilt(&self) -> f32 {
        self.axial_tilt_deg.to_radians()
    }
}

const RAINBOW_STYLE: SurfaceStyle = SurfaceStyle {
    point_size: PointSize::Attenuated(3.5),
    displacement: 0.15,
    threshold: 0.06,
    depth_gain: 10.0,
    color_gain: 40.0,
    highlight: Highlight::Texture,
    shading: Some(Shading {
        base: 0.8,
        gain: 0.4,
    }),
    occluder: None,
    ocean: false,
    detail: 120,
};

fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

fn planet(id: BodyId, orbit_radius: f32, angular_speed: f32, scale: f32) -> CelestialBody {
    CelestialBody {
        id,
        orbit_radius,
        angular_speed,
        scale,
        axial_tilt_deg: 0.0,
        spin_per_tick: 0.002,
        surface: Some(RAINBOW_STYLE),
        ring: None,
        atmosphere: None,
        interaction: InteractionPolicy::AlwaysActive,
    }
}

/// Build the full catalog, indexed by [`BodyId::index`].
pub fn catalog() -> [CelestialBody; 9] {
    let sun = CelestialBody {
        id: BodyId::Sun,
        orbit_radius: 0.0,
        angular_speed: 0.0,
        scale: 0.8,
        axial_tilt_deg: 0.0,
        spin_per_tick: 0.001,
        surface: None,
        ring: None,
        atmosphere: Some(GlowStyle {
            scale: 1.2,
            falloff: 0.7,
            power: 2.0,
            intensity: 2.0,
            color: [1.0, 0.6, 0.2],
        }),
        interaction: InteractionPolicy::AlwaysActive,
    };

    let mercury = CelestialBody {
        spin_per_tick: 0.0005,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(1.0),
            displacement: 0.25,
            shading: Some(Shading {
                base: 0.5,
                gain: 0.8,
            }),
            occluder: Some(rgb(0x1a1a1a)),
            ..RAINBOW_STYLE
        }),
        ..planet(BodyId::Mercury, 6.0, 1.5, 0.38)
    };

    // Venus rotates retrograde.
    let venus = CelestialBody {
        spin_per_tick: -0.0005,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(1.5),
            occluder: Some(rgb(0x3a3020)),
            ..RAINBOW_STYLE
        }),
        ..planet(BodyId::Venus, 8.0, 1.2, 0.95)
    };

    let earth = CelestialBody {
        surface: Some(SurfaceStyle {
            point_size: PointSize::Constant(4.0),
            displacement: 0.35,
            threshold: 0.04,
            color_gain: 50.0,
            shading: None,
            ocean: true,
            ..RAINBOW_STYLE
        }),
        interaction: InteractionPolicy::FollowsFocus,
        ..planet(BodyId::Earth, 10.0, 1.0, 1.0)
    };

    let mars = CelestialBody {
        spin_per_tick: 0.001,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(4.0),
            depth_gain: 15.0,
            color_gain: 30.0,
            highlight: Highlight::Color([1.0, 0.9, 0.6]),
            shading: Some(Shading {
                base: 0.6,
                gain: 0.6,
            }),
            occluder: Some(rgb(0x2a0a00)),
            ..RAINBOW_STYLE
        }),
        atmosphere: Some(GlowStyle {
            scale: 1.15,
            falloff: 0.6,
            power: 4.0,
            intensity: 1.8,
            color: [0.9, 0.4, 0.2],
        }),
        ..planet(BodyId::Mars, 16.0, 0.53, 0.53)
    };

    let jupiter = CelestialBody {
        surface: Some(SurfaceStyle {
            occluder: Some(rgb(0x403020)),
            ..RAINBOW_STYLE
        }),
        ..planet(BodyId::Jupiter, 24.0, 0.2, 2.5)
    };

    let saturn = CelestialBody {
        axial_tilt_deg: 26.7,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(9.5),
            displacement: 0.1,
            occluder: Some(rgb(0xc2a27e)),
            ..RAINBOW_STYLE
        }),
        ring: Some(RingStyle {
            inner: 1.4,
            outer: 2.3,
            opacity: 0.8,
            edge: 0.02,
        }),
        ..planet(BodyId::Saturn, 32.0, 0.15, 2.1)
    };

    // Uranus rolls on its side.
    let uranus = CelestialBody {
        axial_tilt_deg: 98.0,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(8.0),
            displacement: 0.05,
            shading: Some(Shading {
                base: 0.9,
                gain: 0.2,
            }),
            occluder: Some(rgb(0xa6d6e0)),
            detail: 90,
            ..RAINBOW_STYLE
        }),
        ring: Some(RingStyle {
            inner: 1.6,
            outer: 2.4,
            opacity: 0.6,
            edge: 0.05,
        }),
        ..planet(BodyId::Uranus, 40.0, 0.1, 1.8)
    };

    let neptune = CelestialBody {
        axial_tilt_deg: 28.0,
        surface: Some(SurfaceStyle {
            point_size: PointSize::Attenuated(8.0),
            displacement: 0.08,
            shading: Some(Shading {
                base: 0.8,
                gain: 0.3,
            }),
            occluder: Some(rgb(0x2d4ea3)),
            detail: 90,
            ..RAINBOW_STYLE
        }),
        ring: Some(RingStyle {
            inner: 1.5,
            outer: 2.2,
            opacity: 0.4,
            edge: 0.05,
        }),
        ..planet(BodyId::Neptune, 48.0, 0.08, 1.8)
    };

    [
        sun, mercury, venus, earth, mars, jupiter, saturn, uranus, neptune,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_indexed_by_id() {
        for (i, body) in catalog().iter().enumerate() {
            assert_eq!(body.id.index(), i);
        }
    }

    #[test]
    fn test_parse_keys_case_insensitive() {
        assert_eq!("EARTH".parse::<BodyId>().unwrap(), BodyId::Earth);
        assert_eq!("saturn".parse::<BodyId>().unwrap(), BodyId::Saturn);
        assert_eq!(" Sun ".parse::<BodyId>().unwrap(), BodyId::Sun);
        assert!("PLUTO".parse::<BodyId>().is_err());
    }

    #[test]
    fn test_orbits_increase_outward() {
        let bodies = catalog();
        for pair in bodies.windows(2) {
            assert!(pair[1].orbit_radius > pair[0].orbit_radius);
        }
    }

    #[test]
    fn test_only_sun_lacks_point_surface() {
        for body in catalog() {
            assert_eq!(body.surface.is_none(), body.id == BodyId::Sun);
        }
    }

    #[test]
    fn test_earth_is_special() {
        let earth = catalog()[BodyId::Earth.index()];
        let surface = earth.surface.unwrap();
        assert_eq!(surface.point_size, PointSize::Constant(4.0));
        assert!(surface.ocean);
        assert!(surface.shading.is_none());
        assert!(surface.occluder.is_none());
        assert_eq!(earth.interaction, InteractionPolicy::FollowsFocus);
    }

    #[test]
    fn test_ringed_planets() {
        let ringed: Vec<BodyId> = catalog()
            .iter()
            .filter(|b| b.ring.is_some())
            .map(|b| b.id)
            .collect();
        assert_eq!(ringed, vec![BodyId::Saturn, BodyId::Uranus, BodyId::Neptune]);
        for body in catalog() {
            if let Some(ring) = body.ring {
                assert!(ring.inner < ring.outer);
            }
        }
    }

    #[test]
    fn test_world_scale_and_pick_radius() {
        let bodies = catalog();
        let earth = bodies[BodyId::Earth.index()];
        assert!((earth.world_scale() - 0.6).abs() < 1e-6);
        assert!((earth.pick_radius() - 0.6).abs() < 1e-6);
        let sun = bodies[BodyId::Sun.index()];
        assert!((sun.pick_radius() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
    }
}
