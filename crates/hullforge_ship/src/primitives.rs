// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mesh synthesis primitives.
//!
//! Every function here is pure: the same input always yields the same
//! vertex, normal and index buffers, bit for bit. Degenerate input produces
//! an empty mesh rather than an error.

use crate::elements::{ControlPoint, MountSize, VisualFeature};
use crate::mesh::MeshData;
use glam::{Quat, Vec3};
use std::f32::consts::PI;

/// Which way box faces point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Normals point away from the centre (solid objects)
    Outward,
    /// Normals point towards the centre (rooms)
    Inward,
}

/// Sides of the turret frustum
const TURRET_SEGMENTS: u32 = 6;

/// Loft a hull around the control point spine.
///
/// Each control point contributes a ring of `segments` vertices in its local
/// Y/Z plane. Adjacent rings are stitched with quads and both ends are
/// closed with a triangle fan. Returns an empty mesh for fewer than two
/// points or three segments.
pub fn hull_from_control_points(points: &[ControlPoint], segments: usize) -> MeshData {
    let mut mesh = MeshData::new();
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return mesh;
    };
    if points.len() < 2 || segments < 3 {
        return mesh;
    }

    for cp in points {
        for s in 0..segments {
            let theta = 2.0 * PI * s as f32 / segments as f32;
            let offset = Vec3::new(0.0, theta.cos() * cp.radius, theta.sin() * cp.radius);
            mesh.push_vertex(cp.position + offset, offset.normalize_or(Vec3::Y));
        }
    }

    let segs = segments as u32;
    let rings = points.len() as u32;
    for ring in 0..rings - 1 {
        for s in 0..segs {
            let curr = ring * segs + s;
            let next = ring * segs + (s + 1) % segs;
            let curr_up = (ring + 1) * segs + s;
            let next_up = (ring + 1) * segs + (s + 1) % segs;

            mesh.push_triangle(curr, curr_up, next);
            mesh.push_triangle(next, curr_up, next_up);
        }
    }

    let front = mesh.push_vertex(first.position, Vec3::new(-1.0, 0.0, 0.0));
    for s in 0..segs {
        mesh.push_triangle(front, (s + 1) % segs, s);
    }

    let back = mesh.push_vertex(last.position, Vec3::X);
    let last_ring = (rings - 1) * segs;
    for s in 0..segs {
        mesh.push_triangle(back, last_ring + s, last_ring + (s + 1) % segs);
    }

    mesh
}

/// Axis-aligned box from a centre and half extents (24 vertices, 12 triangles)
pub fn box_mesh(center: Vec3, half_extents: Vec3, facing: Facing) -> MeshData {
    let mut mesh = MeshData::new();
    append_box(&mut mesh, center, half_extents, facing);
    mesh
}

/// Append a box to an existing mesh
pub fn append_box(mesh: &mut MeshData, center: Vec3, half_extents: Vec3, facing: Facing) {
    let lo = center - half_extents;
    let hi = center + half_extents;
    let (x0, y0, z0) = (lo.x, lo.y, lo.z);
    let (x1, y1, z1) = (hi.x, hi.y, hi.z);
    let v = Vec3::new;

    // front, back, right, left, top, bottom
    #[rustfmt::skip]
    let faces = [
        ([v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)], Vec3::Z),
        ([v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)], Vec3::NEG_Z),
        ([v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)], Vec3::X),
        ([v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)], Vec3::NEG_X),
        ([v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)], Vec3::Y),
        ([v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)], Vec3::NEG_Y),
    ];

    for (corners, normal) in faces {
        push_quad(mesh, corners, normal, facing);
    }
}

fn push_quad(mesh: &mut MeshData, corners: [Vec3; 4], normal: Vec3, facing: Facing) {
    let normal = match facing {
        Facing::Outward => normal,
        Facing::Inward => -normal,
    };
    let base = mesh.push_vertex(corners[0], normal);
    for corner in &corners[1..] {
        mesh.push_vertex(*corner, normal);
    }
    match facing {
        Facing::Outward => {
            mesh.push_triangle(base, base + 1, base + 2);
            mesh.push_triangle(base, base + 2, base + 3);
        }
        Facing::Inward => {
            mesh.push_triangle(base, base + 2, base + 1);
            mesh.push_triangle(base, base + 3, base + 2);
        }
    }
}

/// Walkable room: a box over the bounds with walls facing inward
pub fn interior_volume(bounds_min: Vec3, bounds_max: Vec3) -> MeshData {
    let center = (bounds_min + bounds_max) * 0.5;
    let half = (bounds_max - bounds_min) * 0.5;
    box_mesh(center, half, Facing::Inward)
}

/// Octahedron marker for a light; exterior lights get a larger marker
pub fn light_fixture(position: Vec3, interior: bool) -> MeshData {
    let s = if interior { 0.05 } else { 0.08 };
    let axes = [
        Vec3::X,
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::Y,
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::Z,
        Vec3::new(0.0, 0.0, -1.0),
    ];

    let mut mesh = MeshData::new();
    for axis in axes {
        mesh.push_vertex(position + axis * s, axis);
    }

    const FACES: [[u32; 3]; 8] = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 4, 2],
        [1, 3, 4],
        [1, 5, 3],
        [1, 2, 5],
    ];
    for [a, b, c] in FACES {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

/// Tapered hexagonal turret mount with a barrel tip along `direction`
pub fn turret_mount(position: Vec3, direction: Vec3, size: MountSize) -> MeshData {
    let (base_radius, height) = size.dimensions();
    let top_radius = base_radius * 0.7;
    let mut mesh = MeshData::new();

    for (radius, lift, tilt) in [(base_radius, 0.0, 0.0), (top_radius, height, 0.3)] {
        for i in 0..TURRET_SEGMENTS {
            let theta = 2.0 * PI * i as f32 / TURRET_SEGMENTS as f32;
            let (sin, cos) = theta.sin_cos();
            let offset = Vec3::new(cos * radius, lift, sin * radius);
            let normal = Vec3::new(cos, tilt, sin).normalize_or(Vec3::Y);
            mesh.push_vertex(position + offset, normal);
        }
    }

    let segs = TURRET_SEGMENTS;
    for i in 0..segs {
        let b0 = i;
        let b1 = (i + 1) % segs;
        let t0 = segs + i;
        let t1 = segs + (i + 1) % segs;
        mesh.push_triangle(b0, b1, t0);
        mesh.push_triangle(t0, b1, t1);
    }

    let aim = direction.normalize_or(Vec3::Y);
    let barrel_len = height * 1.5;
    let tip_position = position + Vec3::new(0.0, height, 0.0) + aim * barrel_len;
    let tip = mesh.push_vertex(tip_position, aim);
    for i in 0..segs {
        mesh.push_triangle(segs + i, segs + (i + 1) % segs, tip);
    }

    mesh
}

/// Tapered wedge for fins, antennae, vents and similar attachments.
///
/// Narrow edge at the front (-Z), full width at the back, scaled by the
/// feature's scale and turned by its yaw. Non-positive scale components fall
/// back to 0.3 / 0.1 / 0.5.
pub fn visual_feature(feature: &VisualFeature) -> MeshData {
    let positive_or = |v: f32, fallback: f32| if v > 0.0 { v } else { fallback };
    let sx = positive_or(feature.scale.x, 0.3);
    let sy = positive_or(feature.scale.y, 0.1);
    let sz = positive_or(feature.scale.z, 0.5);
    let hx = sx / 2.0;

    let local = [
        (Vec3::new(0.0, 0.0, -sz), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(0.0, sy, -sz), Vec3::new(0.0, 0.0, -1.0)),
        (Vec3::new(-hx, 0.0, sz), Vec3::new(-0.7, 0.0, 0.7)),
        (Vec3::new(hx, 0.0, sz), Vec3::new(0.7, 0.0, 0.7)),
        (Vec3::new(-hx, sy, sz), Vec3::new(-0.7, 0.0, 0.7)),
        (Vec3::new(hx, sy, sz), Vec3::new(0.7, 0.0, 0.7)),
    ];

    let yaw = Quat::from_rotation_y(feature.rotation.to_radians());
    let mut mesh = MeshData::new();
    for (offset, normal) in local {
        mesh.push_vertex(feature.position + yaw * offset, yaw * normal);
    }

    const FACES: [[u32; 3]; 8] = [
        [0, 3, 2], // bottom
        [0, 1, 5],
        [0, 5, 3], // right
        [0, 2, 4],
        [0, 4, 1], // left
        [1, 4, 5], // top
        [2, 3, 5],
        [2, 5, 4], // back
    ];
    for [a, b, c] in FACES {
        mesh.push_triangle(a, b, c);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::FeatureKind;

    fn spine(count: usize) -> Vec<ControlPoint> {
        (0..count)
            .map(|i| ControlPoint::new(Vec3::new(i as f32, 0.0, 0.0), 1.0))
            .collect()
    }

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count())
    }

    #[test]
    fn test_hull_degenerate_input() {
        assert!(hull_from_control_points(&spine(1), 8).is_empty());
        assert!(hull_from_control_points(&spine(0), 8).is_empty());
        assert!(hull_from_control_points(&spine(4), 2).is_empty());
    }

    #[test]
    fn test_hull_topology() {
        let mesh = hull_from_control_points(&spine(3), 8);
        // 3 rings of 8 plus two cap centres
        assert_eq!(mesh.vertex_count(), 26);
        // 2 ring gaps * 8 quads * 2 triangles + 2 caps * 8
        assert_eq!(mesh.triangle_count(), 48);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn test_hull_normals() {
        let mesh = hull_from_control_points(&spine(2), 4);
        assert_eq!(mesh.normal(0), Some(Vec3::Y));
        assert_eq!(mesh.normal(8), Some(Vec3::new(-1.0, 0.0, 0.0)));
        assert_eq!(mesh.normal(9), Some(Vec3::X));

        let mut flat = spine(2);
        flat[0].radius = 0.0;
        let mesh = hull_from_control_points(&flat, 4);
        for i in 0..4 {
            assert_eq!(mesh.normal(i), Some(Vec3::Y));
        }
    }

    #[test]
    fn test_hull_is_deterministic() {
        let a = hull_from_control_points(&spine(5), 12);
        let b = hull_from_control_points(&spine(5), 12);
        let bits = |m: &MeshData| m.vertices.iter().map(|f| f.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_box_faces() {
        let mesh = box_mesh(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0), Facing::Outward);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.normal(0), Some(Vec3::Z));
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn test_interior_normals_face_center() {
        let min = Vec3::new(-1.0, -1.0, -1.0);
        let max = Vec3::new(3.0, 1.0, 1.0);
        let mesh = interior_volume(min, max);
        let center = (min + max) * 0.5;

        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i).unwrap();
            let n = mesh.normal(i).unwrap();
            let to_center = center - p;
            let dot = n.x * to_center.x + n.y * to_center.y + n.z * to_center.z;
            assert!(dot > 0.0, "vertex {i} normal points outward");
        }
    }

    #[test]
    fn test_light_fixture_size() {
        let interior = light_fixture(Vec3::ZERO, true);
        let exterior = light_fixture(Vec3::ZERO, false);
        assert_eq!(interior.vertex_count(), 6);
        assert_eq!(interior.triangle_count(), 8);
        assert_eq!(interior.position(0), Some(Vec3::new(0.05, 0.0, 0.0)));
        assert_eq!(exterior.position(0), Some(Vec3::new(0.08, 0.0, 0.0)));
    }

    #[test]
    fn test_turret_mount_barrel() {
        let mesh = turret_mount(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), MountSize::Medium);
        assert_eq!(mesh.vertex_count(), 13);
        assert_eq!(mesh.triangle_count(), 18);
        let tip = mesh.position(12).unwrap();
        assert!((tip.y - 0.3).abs() < 1e-6);
        assert!((tip.z - 0.45).abs() < 1e-6);
        assert!(indices_in_range(&mesh));

        let degenerate = turret_mount(Vec3::ZERO, Vec3::ZERO, MountSize::Small);
        assert_eq!(degenerate.normal(12), Some(Vec3::Y));
    }

    #[test]
    fn test_turret_size_changes_footprint() {
        let small = turret_mount(Vec3::ZERO, Vec3::Y, MountSize::Small);
        let capital = turret_mount(Vec3::ZERO, Vec3::Y, MountSize::Capital);
        assert!((small.position(0).unwrap().x - 0.15).abs() < 1e-6);
        assert!((capital.position(0).unwrap().x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_visual_feature_scale_fallback() {
        let feature = VisualFeature {
            kind: FeatureKind::Antenna,
            scale: Vec3::new(0.0, -1.0, 2.0),
            ..VisualFeature::default()
        };
        let mesh = visual_feature(&feature);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(mesh.position(0), Some(Vec3::new(0.0, 0.0, -2.0)));
        assert_eq!(mesh.position(1), Some(Vec3::new(0.0, 0.1, -2.0)));
        assert_eq!(mesh.position(3), Some(Vec3::new(0.15, 0.0, 2.0)));
    }

    #[test]
    fn test_visual_feature_yaw() {
        let feature = VisualFeature {
            scale: Vec3::new(0.3, 0.1, 1.0),
            rotation: 180.0,
            ..VisualFeature::default()
        };
        let mesh = visual_feature(&feature);
        let tip = mesh.position(0).unwrap();
        assert!((tip.z - 1.0).abs() < 1e-5);
    }
}
