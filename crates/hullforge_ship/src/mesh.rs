// SPDX-License-Identifier: MIT OR Apache-2.0
//! Triangle mesh handed to the renderer.
//!
//! Flat buffers only: three floats per vertex position, a parallel normal
//! buffer of the same length, and three indices per triangle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Flat triangle mesh
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshData {
    /// Vertex positions, xyz per vertex
    pub vertices: Vec<f32>,
    /// Vertex normals, xyz per vertex
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex list
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.next_index();
        self.vertices.extend_from_slice(&position.to_array());
        self.normals.extend_from_slice(&normal.to_array());
        index
    }

    /// Append a triangle
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append another mesh, offsetting its indices by this mesh's vertex count
    pub fn append(&mut self, other: &MeshData) {
        let offset = self.next_index();
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Concatenate two meshes
    pub fn merged(first: &MeshData, second: &MeshData) -> MeshData {
        let mut mesh = first.clone();
        mesh.append(second);
        mesh
    }

    /// Position of a vertex
    pub fn position(&self, index: usize) -> Option<Vec3> {
        let p = self.vertices.get(index * 3..index * 3 + 3)?;
        Some(Vec3::new(p[0], p[1], p[2]))
    }

    /// Normal of a vertex
    pub fn normal(&self, index: usize) -> Option<Vec3> {
        let n = self.normals.get(index * 3..index * 3 + 3)?;
        Some(Vec3::new(n[0], n[1], n[2]))
    }

    fn next_index(&self) -> u32 {
        u32::try_from(self.vertex_count()).unwrap_or(u32::MAX)
    }
}

impl FromIterator<MeshData> for MeshData {
    fn from_iter<I: IntoIterator<Item = MeshData>>(iter: I) -> Self {
        let mut mesh = MeshData::new();
        for part in iter {
            mesh.append(&part);
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> MeshData {
        let mut mesh = MeshData::new();
        let a = mesh.push_vertex(Vec3::new(offset, 0.0, 0.0), Vec3::Y);
        let b = mesh.push_vertex(Vec3::new(offset + 1.0, 0.0, 0.0), Vec3::Y);
        let c = mesh.push_vertex(Vec3::new(offset, 0.0, 1.0), Vec3::Y);
        mesh.push_triangle(a, b, c);
        mesh
    }

    #[test]
    fn test_counts() {
        let mesh = triangle(0.0);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.position(1), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert!(mesh.position(3).is_none());
    }

    #[test]
    fn test_merge_offsets_second_indices() {
        let first = triangle(0.0);
        let second = triangle(5.0);
        let merged = MeshData::merged(&first, &second);

        assert_eq!(merged.vertex_count(), 6);
        assert_eq!(&merged.indices[..3], &first.indices[..]);
        assert_eq!(&merged.indices[3..], &[3, 4, 5]);
    }

    #[test]
    fn test_merge_with_empty() {
        let mesh = triangle(0.0);
        assert_eq!(MeshData::merged(&MeshData::new(), &mesh), mesh);
        assert_eq!(MeshData::merged(&mesh, &MeshData::new()), mesh);
    }

    #[test]
    fn test_collect_parts() {
        let mesh: MeshData = (0..3).map(|i| triangle(i as f32)).collect();
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.indices[6..], [6, 7, 8]);
    }
}
