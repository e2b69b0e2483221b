//! Static descriptive records shown when a body is focused.

use crate::body::BodyId;

/// Credit line displayed under every record.
pub const INFO_FOOTER: &str = "Data © NASA Science Solar System";

/// One labelled figure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: &'static str,
}

/// Name, blurb, and four key figures for one body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanetInfo {
    pub id: BodyId,
    pub name: &'static str,
    pub description: &'static str,
    pub stats: [Stat; 4],
}

const fn stat(label: &'static str, value: &'static str) -> Stat {
    Stat { label, value }
}

static PLANET_DB: [PlanetInfo; 9] = [
    PlanetInfo {
        id: BodyId::Sun,
        name: "Sun",
        description: "The star at the heart of our solar system. A ball of hot plasma whose \
            gravity holds every planet in orbit and whose energy sustains life on Earth.",
        stats: [
            stat("Type", "Yellow star (G2V)"),
            stat("Surface temperature", "5,500°C"),
            stat("Diameter", "1.39 million km"),
            stat("Mass", "333,000 × Earth"),
        ],
    },
    PlanetInfo {
        id: BodyId::Mercury,
        name: "Mercury",
        description: "The smallest planet and the closest to the Sun. Its cratered surface \
            resembles the Moon, and with almost no atmosphere it swings between scorching \
            days and freezing nights.",
        stats: [
            stat("Distance from Sun", "58 million km"),
            stat("Diameter", "4,880 km"),
            stat("Temperature", "-173°C to 427°C"),
            stat("Orbital period", "88 days"),
        ],
    },
    PlanetInfo {
        id: BodyId::Venus,
        name: "Venus",
        description: "The hottest planet, wrapped in a thick carbon dioxide atmosphere that \
            traps heat in a runaway greenhouse effect. It spins backwards compared to most \
            planets.",
        stats: [
            stat("Distance from Sun", "108 million km"),
            stat("Diameter", "12,104 km"),
            stat("Average temperature", "462°C"),
            stat("Orbital period", "225 days"),
        ],
    },
    PlanetInfo {
        id: BodyId::Earth,
        name: "Earth",
        description: "Our home and the only world known to harbour life. A nitrogen and \
            oxygen atmosphere shields the surface, and liquid water covers most of it.",
        stats: [
            stat("Distance from Sun", "149.6 million km"),
            stat("Diameter", "12,742 km"),
            stat("Natural satellites", "1 (Moon)"),
            stat("Orbital period", "365.25 days"),
        ],
    },
    PlanetInfo {
        id: BodyId::Mars,
        name: "Mars",
        description: "The Red Planet, coloured by iron oxide dust. It hosts Olympus Mons, the \
            tallest volcano in the solar system.",
        stats: [
            stat("Distance from Sun", "228 million km"),
            stat("Diameter", "6,779 km"),
            stat("Average temperature", "-63°C"),
            stat("Moons", "2 (Phobos, Deimos)"),
        ],
    },
    PlanetInfo {
        id: BodyId::Jupiter,
        name: "Jupiter",
        description: "The largest planet, a gas giant more than twice as massive as all the \
            others combined. Its Great Red Spot is a storm bigger than Earth.",
        stats: [
            stat("Distance from Sun", "778 million km"),
            stat("Diameter", "139,820 km"),
            stat("Composition", "Hydrogen, Helium"),
            stat("Moons", "95 (known)"),
        ],
    },
    PlanetInfo {
        id: BodyId::Saturn,
        name: "Saturn",
        description: "Famous for its majestic ring system of ice and rock. It has the lowest \
            density of any planet and would float in a large enough bathtub.",
        stats: [
            stat("Distance from Sun", "1.4 billion km"),
            stat("Diameter", "116,460 km"),
            stat("Rings", "7 main groups"),
            stat("Orbital period", "29.5 years"),
        ],
    },
    PlanetInfo {
        id: BodyId::Uranus,
        name: "Uranus",
        description: "An ice giant that rolls around the Sun on its side, tilted 98 degrees. \
            Methane in its atmosphere gives it a blue-green tint.",
        stats: [
            stat("Distance from Sun", "2.9 billion km"),
            stat("Diameter", "50,724 km"),
            stat("Coldest temperature", "-224°C"),
            stat("Orbital period", "84 years"),
        ],
    },
    PlanetInfo {
        id: BodyId::Neptune,
        name: "Neptune",
        description: "The farthest planet, a dark and frigid ice giant. It has the fastest \
            winds in the solar system, reaching supersonic speeds.",
        stats: [
            stat("Distance from Sun", "4.5 billion km"),
            stat("Diameter", "49,244 km"),
            stat("Wind speed", "2,100 km/h"),
            stat("Orbital period", "165 years"),
        ],
    },
];

/// Record for the focused body, or `None` when nothing is focused.
pub fn resolve(focus: Option<BodyId>) -> Option<&'static PlanetInfo> {
    focus.map(|id| &PLANET_DB[id.index()])
}

impl PlanetInfo {
    /// The whole record as log text: name, blurb, figures, then the credit line.
    pub fn summary(&self) -> String {
        let mut text = format!("{}\n{}", self.name, self.description);
        for stat in &self.stats {
            text.push_str(&format!("\n  {}: {}", stat.label, stat.value));
        }
        text.push('\n');
        text.push_str(INFO_FOOTER);
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_resolves_to_none() {
        assert!(resolve(None).is_none());
    }

    #[test]
    fn test_every_body_has_a_record() {
        for id in BodyId::ALL {
            let info = resolve(Some(id)).unwrap();
            assert_eq!(info.id, id);
            assert_eq!(info.name, id.name());
            assert!(!info.description.is_empty());
            assert!(info.stats.iter().all(|s| !s.label.is_empty() && !s.value.is_empty()));
        }
    }

    #[test]
    fn test_summary_lists_blurb_figures_and_credit() {
        let info = resolve(Some(BodyId::Mars)).unwrap();
        let summary = info.summary();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Mars");
        assert_eq!(lines[1], info.description);
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[2], format!("  {}: {}", info.stats[0].label, info.stats[0].value));
        assert_eq!(lines[6], INFO_FOOTER);
    }

    #[test]
    fn test_earth_record() {
        let info = resolve(Some(BodyId::Earth)).unwrap();
        assert_eq!(info.stats[0], stat("Distance from Sun", "149.6 million km"));
        assert_eq!(info.stats[2].value, "1 (Moon)");
    }
}
