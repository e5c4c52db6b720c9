use hashbrown::HashMap;
use isomesh_geom::{Aabb, Vec3};

use crate::ExtractError;
use crate::constants::UNASSIGNED;

/// Indexed triangle mesh produced by an extraction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IsoMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl IsoMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Appends a vertex and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, p: Vec3) -> Result<u32, ExtractError> {
        let ix = u32::try_from(self.vertices.len())
            .ok()
            .filter(|ix| *ix != UNASSIGNED)
            .ok_or(ExtractError::VertexIndexOverflow)?;
        self.vertices.push(p);
        Ok(ix)
    }

    #[inline]
    pub fn push_triangle(&mut self, tri: [u32; 3]) {
        debug_assert!(tri.iter().all(|i| (*i as usize) < self.vertices.len()));
        self.triangles.push(tri);
    }

    /// Corner positions of triangle `i`.
    #[inline]
    pub fn triangle_positions(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Unnormalized face normal `(b - a) x (c - a)`.
    #[inline]
    pub fn face_normal(&self, i: usize) -> Vec3 {
        let [a, b, c] = self.triangle_positions(i);
        (b - a).cross(c - a)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().copied())
    }

    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| 0.5 * self.face_normal(i).length() as f64)
            .sum()
    }

    /// Counts undirected edges by how many triangles use them; returns
    /// `(open, non_manifold)`: edges used once and edges used three or more times.
    pub fn edge_usage(&self) -> (usize, usize) {
        let mut uses: HashMap<(u32, u32), u32> = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        let open = uses.values().filter(|n| **n == 1).count();
        let non_manifold = uses.values().filter(|n| **n > 2).count();
        (open, non_manifold)
    }

    /// True when every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_usage() == (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetra() -> IsoMesh {
        let mut m = IsoMesh::new();
        for p in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ] {
            m.push_vertex(p).unwrap();
        }
        for t in [[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]] {
            m.push_triangle(t);
        }
        m
    }

    #[test]
    fn push_vertex_returns_insertion_index() {
        let mut m = IsoMesh::with_capacity(2, 1);
        assert_eq!(m.push_vertex(Vec3::ZERO), Ok(0));
        assert_eq!(m.push_vertex(Vec3::ONE), Ok(1));
        assert_eq!(m.vertex_count(), 2);
        assert!(m.is_empty());
    }

    #[test]
    fn tetrahedron_is_closed() {
        let m = tetra();
        assert_eq!(m.edge_usage(), (0, 0));
        assert!(m.is_closed());
        let b = m.bounds();
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max, Vec3::ONE);
    }

    #[test]
    fn dropping_a_face_opens_three_edges() {
        let mut m = tetra();
        m.triangles.pop();
        assert_eq!(m.edge_usage(), (3, 0));
        assert!(!m.is_closed());
    }

    #[test]
    fn area_and_normal_of_unit_right_triangle() {
        let mut m = IsoMesh::new();
        m.push_vertex(Vec3::new(0.0, 0.0, 0.0)).unwrap();
        m.push_vertex(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        m.push_vertex(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        m.push_triangle([0, 1, 2]);
        assert_eq!(m.face_normal(0), Vec3::new(0.0, 0.0, 1.0));
        assert!((m.surface_area() - 0.5).abs() < 1e-9);
    }
}
