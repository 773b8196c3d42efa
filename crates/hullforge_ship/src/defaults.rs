// SPDX-License-Identifier: MIT OR Apache-2.0
//! Seeded default elements per ship class.
//!
//! Control points and hardpoints draw from their own salted xorshift streams,
//! so adding a hardpoint rule never shifts the control points of an existing
//! seed. Interior and light layouts are fixed per class.
//! Generated elements carry placeholder IDs; the hull graph stamps real ones.

use crate::elements::{
    ControlPoint, FeatureKind, Hardpoint, InteriorSection, LightKind, MountSize, ShipLight,
    UnknownTag, VisualFeature, WeaponType,
};
use crate::rng::{Xorshift64, CONTROL_POINT_SALT, HARDPOINT_SALT};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of dorsal turrets
pub const DEFAULT_TURRET_SLOTS: usize = 3;
/// Default number of launchers
pub const DEFAULT_LAUNCHER_SLOTS: usize = 1;

/// Ship classes with tuned defaults, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipClass {
    /// Light escort
    Frigate,
    /// Destroyer
    Destroyer,
    /// Cruiser
    Cruiser,
    /// Battlecruiser
    Battlecruiser,
    /// Battleship
    Battleship,
    /// Capital ship
    Capital,
}

impl ShipClass {
    /// All classes, smallest first
    pub const ALL: [ShipClass; 6] = [
        ShipClass::Frigate,
        ShipClass::Destroyer,
        ShipClass::Cruiser,
        ShipClass::Battlecruiser,
        ShipClass::Battleship,
        ShipClass::Capital,
    ];

    /// Class name as stored in hull data
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Frigate => "Frigate",
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Cruiser => "Cruiser",
            ShipClass::Battlecruiser => "Battlecruiser",
            ShipClass::Battleship => "Battleship",
            ShipClass::Capital => "Capital",
        }
    }

    /// Hull proportions for this class
    pub fn profile(&self) -> HullProfile {
        let (point_count, length, max_radius) = match self {
            ShipClass::Frigate => (5, 8.0, 1.0),
            ShipClass::Destroyer => (6, 12.0, 1.3),
            ShipClass::Cruiser => (7, 18.0, 2.0),
            ShipClass::Battlecruiser => (8, 24.0, 2.5),
            ShipClass::Battleship => (9, 32.0, 3.5),
            ShipClass::Capital => (12, 60.0, 8.0),
        };
        HullProfile {
            point_count,
            length,
            max_radius,
        }
    }

    /// Mount size used for this class's turrets
    pub fn mount_size(&self) -> MountSize {
        match self {
            ShipClass::Cruiser | ShipClass::Battlecruiser => MountSize::Medium,
            ShipClass::Battleship => MountSize::Large,
            ShipClass::Capital => MountSize::Capital,
            ShipClass::Frigate | ShipClass::Destroyer => MountSize::Small,
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipClass {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Hull proportions: spine point count, length along X, peak radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullProfile {
    /// Number of control points
    pub point_count: usize,
    /// Hull length
    pub length: f32,
    /// Radius at the widest point
    pub max_radius: f32,
}

impl HullProfile {
    /// Proportions for unrecognized classes
    pub const FALLBACK: HullProfile = HullProfile {
        point_count: 5,
        length: 10.0,
        max_radius: 1.5,
    };

    /// Look up proportions by class name, falling back for unknown names
    pub fn for_class_name(class: &str) -> Self {
        class
            .parse::<ShipClass>()
            .map_or(Self::FALLBACK, |class| class.profile())
    }
}

fn parse_class(class: &str) -> Option<ShipClass> {
    class.parse().ok()
}

fn is_frigate(class: Option<ShipClass>) -> bool {
    class == Some(ShipClass::Frigate)
}

/// Control points spread along X with a bulging radius profile
pub fn generate_default_control_points(seed: u64, class: &str) -> Vec<ControlPoint> {
    let profile = HullProfile::for_class_name(class);
    let mut rng = Xorshift64::salted(seed, CONTROL_POINT_SALT);
    let n = profile.point_count;
    let half = profile.length / 2.0;

    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            let x = -half + t * profile.length;
            let y = rng.range(-0.2, 0.2);
            let z = rng.range(-0.1, 0.1);
            let bulge = 4.0 * t * (1.0 - t);
            let radius = (profile.max_radius * bulge * rng.range(0.8, 1.2)).max(0.1);
            ControlPoint::new(Vec3::new(x, y, z), radius)
        })
        .collect()
}

/// Dorsal turrets in a row along X, then launchers under the hull
pub fn generate_default_hardpoints(
    seed: u64,
    class: &str,
    turret_slots: usize,
    launcher_slots: usize,
) -> Vec<Hardpoint> {
    let mut rng = Xorshift64::salted(seed, HARDPOINT_SALT);
    let size = parse_class(class).map_or(MountSize::Small, |c| c.mount_size());
    let spacing = 2.0;
    let span = spacing * turret_slots.saturating_sub(1) as f32;

    let mut hardpoints = Vec::with_capacity(turret_slots + launcher_slots);
    for i in 0..turret_slots {
        let t = if turret_slots > 1 {
            i as f32 / (turret_slots - 1) as f32
        } else {
            0.5
        };
        let x = -span / 2.0 + t * span;
        let y = 1.0 + rng.range(0.0, 0.3);
        let z = rng.range(-0.2, 0.2);
        hardpoints.push(Hardpoint {
            position: Vec3::new(x, y, z),
            direction: Vec3::Y,
            size,
            weapon_type: WeaponType::Turret,
            ..Hardpoint::default()
        });
    }

    for _ in 0..launcher_slots {
        let x = rng.range(-1.0, 1.0);
        let z = rng.range(-0.5, 0.5);
        hardpoints.push(Hardpoint {
            position: Vec3::new(x, -0.5, z),
            direction: Vec3::X,
            size,
            weapon_type: WeaponType::Launcher,
            ..Hardpoint::default()
        });
    }

    hardpoints
}

/// Rooms by class
pub fn generate_default_interiors(class: &str) -> Vec<InteriorSection> {
    let ship_class = parse_class(class);
    let frigate = is_frigate(ship_class);
    let at_least = |min: ShipClass| ship_class.is_some_and(|c| c >= min);

    let mut rooms = Vec::new();

    let cockpit_len = if frigate { 2.0 } else { 4.0 };
    let mut cockpit = InteriorSection::new(
        "cockpit",
        Vec3::new(-cockpit_len / 2.0 - 3.0, -0.5, -1.0),
        Vec3::new(-cockpit_len / 2.0, 1.5, 1.0),
    );
    cockpit.has_cockpit = true;
    rooms.push(cockpit);

    let engine_len = if frigate { 2.0 } else { 5.0 };
    rooms.push(InteriorSection::new(
        "engine_room",
        Vec3::new(engine_len / 2.0 - 3.0, -1.0, -1.5),
        Vec3::new(engine_len / 2.0, 1.0, 1.5),
    ));

    if !frigate {
        rooms.push(InteriorSection::new(
            "cargo_bay",
            Vec3::new(-1.0, -1.5, -2.0),
            Vec3::new(3.0, 0.5, 2.0),
        ));
    }

    if at_least(ShipClass::Cruiser) {
        rooms.push(InteriorSection::new(
            "crew_quarters",
            Vec3::new(-3.0, -0.5, -1.5),
            Vec3::new(-1.0, 1.5, 1.5),
        ));
    }

    if at_least(ShipClass::Battleship) {
        let mut bridge = InteriorSection::new(
            "bridge",
            Vec3::new(-5.0, 2.0, -2.0),
            Vec3::new(-2.0, 4.0, 2.0),
        );
        bridge.has_cockpit = true;
        rooms.push(bridge);
    }

    rooms
}

/// Cockpit and engine lights, port/starboard nav lights, ambient fill on
/// anything bigger than a frigate
pub fn generate_default_lights(class: &str) -> Vec<ShipLight> {
    let frigate = is_frigate(parse_class(class));

    let mut lights = vec![
        ShipLight {
            position: Vec3::new(-3.0, 1.0, 0.0),
            color: Vec3::new(0.9, 0.9, 1.0),
            intensity: 0.8,
            range: 3.0,
            kind: LightKind::Point,
            interior: true,
            ..ShipLight::default()
        },
        ShipLight {
            position: Vec3::new(3.0, 0.5, 0.0),
            color: Vec3::new(1.0, 0.7, 0.4),
            intensity: 0.6,
            range: 4.0,
            kind: LightKind::Point,
            interior: true,
            ..ShipLight::default()
        },
        ShipLight {
            position: Vec3::new(0.0, 0.0, -1.5),
            color: Vec3::new(1.0, 0.0, 0.0),
            intensity: 1.0,
            range: 15.0,
            kind: LightKind::Point,
            interior: false,
            ..ShipLight::default()
        },
        ShipLight {
            position: Vec3::new(0.0, 0.0, 1.5),
            color: Vec3::new(0.0, 1.0, 0.0),
            intensity: 1.0,
            range: 15.0,
            kind: LightKind::Point,
            interior: false,
            ..ShipLight::default()
        },
    ];

    if !frigate {
        lights.push(ShipLight {
            position: Vec3::new(0.0, 0.5, 0.0),
            color: Vec3::new(0.8, 0.8, 0.9),
            intensity: 0.5,
            range: 5.0,
            kind: LightKind::Ambient,
            interior: true,
            ..ShipLight::default()
        });
    }

    lights
}

/// Dorsal fin every generated ship starts with
pub fn default_fin() -> VisualFeature {
    VisualFeature {
        kind: FeatureKind::Fin,
        position: Vec3::new(0.0, 1.5, 0.0),
        scale: Vec3::new(0.3, 0.8, 1.0),
        rotation: 0.0,
        ..VisualFeature::default()
    }
}
