// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editable ship elements and their stores.
//!
//! Every element kind draws its identifier from one [`IdAllocator`] owned by
//! the ship graph, so an ID names exactly one element for the lifetime of the
//! graph, even after that element is removed.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier shared by all element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic ID source. IDs are never handed out twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create an allocator starting at 1
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next ID
    pub fn allocate(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }

    /// Ensure future IDs are greater than `id`
    pub fn advance_past(&mut self, id: ElementId) {
        self.next = self.next.max(id.0 + 1);
    }

    /// ID the next call to `allocate` will return
    pub fn peek(&self) -> ElementId {
        ElementId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Common access to an element's identifier
pub trait Element {
    /// Element ID
    fn id(&self) -> ElementId;
    /// Replace the element ID
    fn set_id(&mut self, id: ElementId);
}

/// Elements that can be dragged around in the editor
pub trait Positioned: Element {
    /// Current position
    fn position(&self) -> Vec3;
    /// Move to a new position
    fn set_position(&mut self, position: Vec3);
}

macro_rules! impl_element {
    ($ty:ty) => {
        impl Element for $ty {
            fn id(&self) -> ElementId {
                self.id
            }

            fn set_id(&mut self, id: ElementId) {
                self.id = id;
            }
        }

        impl Positioned for $ty {
            fn position(&self) -> Vec3 {
                self.position
            }

            fn set_position(&mut self, position: Vec3) {
                self.position = position;
            }
        }
    };
}

/// Draggable point defining the hull silhouette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Element ID
    pub id: ElementId,
    /// Position on the spine
    pub position: Vec3,
    /// Cross-section radius at this point
    pub radius: f32,
    /// Spline weight for curvature control
    pub weight: f32,
}

impl ControlPoint {
    /// Create a control point with unit weight
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            id: ElementId::default(),
            position,
            radius,
            weight: 1.0,
        }
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.5)
    }
}

/// Size class of a weapon mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountSize {
    /// Small mount
    #[default]
    Small,
    /// Medium mount
    Medium,
    /// Large mount
    Large,
    /// Capital mount
    Capital,
}

impl MountSize {
    /// Base radius and height of the mount mesh
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            MountSize::Small => (0.15, 0.2),
            MountSize::Medium => (0.25, 0.3),
            MountSize::Large => (0.4, 0.45),
            MountSize::Capital => (0.6, 0.6),
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            MountSize::Small => "small",
            MountSize::Medium => "medium",
            MountSize::Large => "large",
            MountSize::Capital => "capital",
        }
    }
}

impl FromStr for MountSize {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(MountSize::Small),
            "medium" => Ok(MountSize::Medium),
            "large" => Ok(MountSize::Large),
            "capital" => Ok(MountSize::Capital),
            other => Err(UnknownTag(other.to_string())),
        }
    }
}

/// What a hardpoint carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeaponType {
    /// Rotating turret
    #[default]
    Turret,
    /// Missile launcher
    Launcher,
    /// Utility module
    Utility,
}

/// Where a turret or weapon is mounted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hardpoint {
    /// Element ID
    pub id: ElementId,
    /// Mount position
    pub position: Vec3,
    /// Forward aim direction
    pub direction: Vec3,
    /// Size class
    pub size: MountSize,
    /// Weapon type
    pub weapon_type: WeaponType,
}

impl Default for Hardpoint {
    fn default() -> Self {
        Self {
            id: ElementId::default(),
            position: Vec3::ZERO,
            direction: Vec3::Y,
            size: MountSize::Small,
            weapon_type: WeaponType::Turret,
        }
    }
}

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Omnidirectional point light
    #[default]
    Point,
    /// Spot light
    Spot,
    /// Ambient fill
    Ambient,
}

/// A light inside or outside the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipLight {
    /// Element ID
    pub id: ElementId,
    /// Light position
    pub position: Vec3,
    /// RGB color, 0-1
    pub color: Vec3,
    /// Intensity
    pub intensity: f32,
    /// Range
    pub range: f32,
    /// Light kind
    pub kind: LightKind,
    /// Interior light (`false` for exterior nav lights)
    pub interior: bool,
}

impl Default for ShipLight {
    fn default() -> Self {
        Self {
            id: ElementId::default(),
            position: Vec3::ZERO,
            color: Vec3::new(1.0, 1.0, 1.0),
            intensity: 1.0,
            range: 10.0,
            kind: LightKind::Point,
            interior: true,
        }
    }
}

/// A named walkable section of the ship
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteriorSection {
    /// Element ID
    pub id: ElementId,
    /// Section name ("cockpit", "cargo_bay", ...)
    pub name: String,
    /// Minimum corner
    pub bounds_min: Vec3,
    /// Maximum corner
    pub bounds_max: Vec3,
    /// Whether the section offers a flight cockpit view
    pub has_cockpit: bool,
}

impl InteriorSection {
    /// Create a section from its bounds
    pub fn new(name: impl Into<String>, bounds_min: Vec3, bounds_max: Vec3) -> Self {
        Self {
            id: ElementId::default(),
            name: name.into(),
            bounds_min,
            bounds_max,
            has_cockpit: false,
        }
    }

    /// Centre of the bounds
    pub fn center(&self) -> Vec3 {
        (self.bounds_min + self.bounds_max) * 0.5
    }
}

impl Element for InteriorSection {
    fn id(&self) -> ElementId {
        self.id
    }

    fn set_id(&mut self, id: ElementId) {
        self.id = id;
    }
}

/// Kind of hull attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Stabilizer fin
    #[default]
    Fin,
    /// Antenna
    Antenna,
    /// Exhaust vent
    Vent,
    /// Air intake
    Intake,
    /// Wing
    Wing,
    /// Engine nacelle
    Nacelle,
}

/// Visual feature attached to the hull
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualFeature {
    /// Element ID
    pub id: ElementId,
    /// Feature kind
    pub kind: FeatureKind,
    /// Attachment position
    pub position: Vec3,
    /// Non-uniform scale
    pub scale: Vec3,
    /// Yaw in degrees around local Y
    pub rotation: f32,
}

impl Default for VisualFeature {
    fn default() -> Self {
        Self {
            id: ElementId::default(),
            kind: FeatureKind::Fin,
            position: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl_element!(ControlPoint);
impl_element!(Hardpoint);
impl_element!(ShipLight);
impl_element!(VisualFeature);

/// Unrecognized tag string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tag: {0}")]
pub struct UnknownTag(pub String);

/// Ordered store of one element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStore<T> {
    items: Vec<T>,
}

impl<T: Element> ElementStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Insert an element under a freshly allocated ID
    pub fn insert(&mut self, mut item: T, ids: &mut IdAllocator) -> ElementId {
        let id = ids.allocate();
        item.set_id(id);
        self.items.push(item);
        id
    }

    /// Remove an element
    pub fn remove(&mut self, id: ElementId) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Get an element
    pub fn get(&self, id: ElementId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Get a mutable element
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Replace the whole store
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Elements in insertion order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over elements
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Iterate mutably over elements
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Largest ID in the store
    pub fn max_id(&self) -> Option<ElementId> {
        self.items.iter().map(Element::id).max()
    }
}

impl<T: Positioned> ElementStore<T> {
    /// Move an element, returning its previous position
    pub fn move_to(&mut self, id: ElementId, position: Vec3) -> Option<Vec3> {
        let item = self.get_mut(id)?;
        let old = item.position();
        item.set_position(position);
        Some(old)
    }
}

impl<T: Element> Default for ElementStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All element stores of one ship plus their shared ID allocator
#[derive(Debug, Clone, Default)]
pub struct ElementStores {
    /// Hull control points
    pub control_points: ElementStore<ControlPoint>,
    /// Weapon hardpoints
    pub hardpoints: ElementStore<Hardpoint>,
    /// Lights
    pub lights: ElementStore<ShipLight>,
    /// Interior sections
    pub interiors: ElementStore<InteriorSection>,
    /// Visual features
    pub visual_features: ElementStore<VisualFeature>,
    /// Shared ID source
    pub ids: IdAllocator,
}

impl ElementStores {
    /// Largest ID held by any store
    pub fn max_id(&self) -> Option<ElementId> {
        [
            self.control_points.max_id(),
            self.hardpoints.max_id(),
            self.lights.max_id(),
            self.interiors.max_id(),
            self.visual_features.max_id(),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Total number of elements
    pub fn element_count(&self) -> usize {
        self.control_points.len()
            + self.hardpoints.len()
            + self.lights.len()
            + self.interiors.len()
            + self.visual_features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_shared_across_kinds() {
        let mut stores = ElementStores::default();
        let cp = stores
            .control_points
            .insert(ControlPoint::default(), &mut stores.ids);
        let light = stores.lights.insert(ShipLight::default(), &mut stores.ids);
        let hp = stores.hardpoints.insert(Hardpoint::default(), &mut stores.ids);

        assert_eq!((cp, light, hp), (ElementId(1), ElementId(2), ElementId(3)));
        assert_eq!(stores.max_id(), Some(ElementId(3)));
    }

    #[test]
    fn test_removed_ids_not_reused() {
        let mut stores = ElementStores::default();
        let first = stores
            .control_points
            .insert(ControlPoint::default(), &mut stores.ids);
        assert!(stores.control_points.remove(first).is_some());
        assert!(stores.control_points.remove(first).is_none());

        let second = stores
            .control_points
            .insert(ControlPoint::default(), &mut stores.ids);
        assert_ne!(first, second);
        assert!(stores.control_points.get(first).is_none());
    }

    #[test]
    fn test_move_returns_old_position() {
        let mut stores = ElementStores::default();
        let id = stores.lights.insert(ShipLight::default(), &mut stores.ids);
        let old = stores.lights.move_to(id, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(old, Some(Vec3::ZERO));
        assert_eq!(
            stores.lights.get(id).map(|l| l.position),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(stores.lights.move_to(ElementId(99), Vec3::ZERO), None);
    }

    #[test]
    fn test_allocator_advance() {
        let mut ids = IdAllocator::new();
        ids.advance_past(ElementId(10));
        assert_eq!(ids.allocate(), ElementId(11));
        ids.advance_past(ElementId(3));
        assert_eq!(ids.peek(), ElementId(12));
    }

    #[test]
    fn test_mount_size_tags() {
        assert_eq!("capital".parse::<MountSize>(), Ok(MountSize::Capital));
        assert!("huge".parse::<MountSize>().is_err());
        assert_eq!(MountSize::Large.as_str(), "large");
    }
}
