//! The polygon mesh container.

use std::collections::HashMap;
use std::f64::consts::PI;

use mitre_math::{Point3, Transform, Vec3};

use crate::{MeshError, Result};

/// A polygon mesh: vertex positions, faces as index loops, and loose edges.
///
/// Faces are wound counter-clockwise when viewed from the side their normal
/// points to. Loose edges never duplicate a face edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyMesh {
    /// Vertex positions in the mesh's local space.
    pub vertices: Vec<Point3>,
    /// Edges that bound no face.
    pub edges: Vec<[usize; 2]>,
    /// Faces as ordered vertex index loops.
    pub faces: Vec<Vec<usize>>,
}

impl PolyMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// A single polygon face through `points`.
    pub fn from_polygon(points: &[Point3]) -> Result<Self> {
        if points.len() < 3 {
            return Err(MeshError::TooFewVertices {
                needed: 3,
                found: points.len(),
            });
        }
        let mut mesh = Self {
            vertices: points.to_vec(),
            ..Self::default()
        };
        mesh.add_face((0..points.len()).collect())?;
        Ok(mesh)
    }

    /// A chain of loose edges through `points`, optionally closed.
    pub fn polyline(points: &[Point3], closed: bool) -> Result<Self> {
        if points.len() < 2 {
            return Err(MeshError::TooFewVertices {
                needed: 2,
                found: points.len(),
            });
        }
        let n = points.len();
        let mut edges: Vec<[usize; 2]> = (0..n - 1).map(|i| [i, i + 1]).collect();
        if closed && n > 2 {
            edges.push([n - 1, 0]);
        }
        Ok(Self {
            vertices: points.to_vec(),
            edges,
            faces: Vec::new(),
        })
    }

    /// An axis-aligned rectangle face in the XY plane with its minimum
    /// corner at `(x, y)`.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            vertices: vec![
                Point3::new(x, y, 0.0),
                Point3::new(x + width, y, 0.0),
                Point3::new(x + width, y + height, 0.0),
                Point3::new(x, y + height, 0.0),
            ],
            edges: Vec::new(),
            faces: vec![vec![0, 1, 2, 3]],
        }
    }

    /// A regular polygon face in the XY plane centered on the origin.
    ///
    /// `sides` is clamped to at least 3.
    pub fn regular_polygon(radius: f64, sides: usize) -> Self {
        let n = sides.max(3);
        let vertices = (0..n)
            .map(|i| {
                let theta = 2.0 * PI * (i as f64) / (n as f64);
                Point3::new(radius * theta.cos(), radius * theta.sin(), 0.0)
            })
            .collect();
        Self {
            vertices,
            edges: Vec::new(),
            faces: vec![(0..n).collect()],
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3) -> usize {
        self.vertices.push(p);
        self.vertices.len() - 1
    }

    /// Append a face and return its index.
    pub fn add_face(&mut self, loop_: Vec<usize>) -> Result<usize> {
        if loop_.len() < 3 {
            return Err(MeshError::TooFewVertices {
                needed: 3,
                found: loop_.len(),
            });
        }
        for (i, &v) in loop_.iter().enumerate() {
            self.check_index(v)?;
            if loop_[..i].contains(&v) {
                return Err(MeshError::RepeatedVertex(v));
            }
        }
        self.faces.push(loop_);
        Ok(self.faces.len() - 1)
    }

    /// Append a loose edge.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(MeshError::RepeatedVertex(a));
        }
        self.edges.push([a, b]);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.vertices.len() {
            return Err(MeshError::IndexOutOfRange {
                index,
                len: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Area vector of a face by Newell's method.
    ///
    /// Points along the face normal with length equal to the face area.
    pub fn face_area_vector(&self, face: usize) -> Vec3 {
        let loop_ = &self.faces[face];
        let mut n = Vec3::zeros();
        for (i, &a) in loop_.iter().enumerate() {
            let p = self.vertices[a];
            let q = self.vertices[loop_[(i + 1) % loop_.len()]];
            n.x += (p.y - q.y) * (p.z + q.z);
            n.y += (p.z - q.z) * (p.x + q.x);
            n.z += (p.x - q.x) * (p.y + q.y);
        }
        n * 0.5
    }

    /// Unit normal of a face, or `None` if the face has no area.
    pub fn face_normal(&self, face: usize) -> Option<Vec3> {
        let n = self.face_area_vector(face);
        let len = n.norm();
        (len > 1e-12).then(|| n / len)
    }

    /// Mean of a face's vertex positions.
    pub fn face_center(&self, face: usize) -> Point3 {
        let loop_ = &self.faces[face];
        let sum = loop_
            .iter()
            .fold(Vec3::zeros(), |acc, &v| acc + self.vertices[v].coords);
        Point3::from(sum / loop_.len() as f64)
    }

    /// Directed edges of a face in winding order.
    pub fn face_edges(&self, face: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let loop_ = &self.faces[face];
        (0..loop_.len()).map(move |i| (loop_[i], loop_[(i + 1) % loop_.len()]))
    }

    /// Number of faces using each undirected edge, keyed `(min, max)`.
    pub fn edge_face_counts(&self) -> HashMap<(usize, usize), usize> {
        let mut counts = HashMap::new();
        for f in 0..self.faces.len() {
            for (a, b) in self.face_edges(f) {
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Face edges used by exactly one face, directed as their face winds them.
    pub fn boundary_edges(&self) -> Vec<(usize, usize)> {
        let counts = self.edge_face_counts();
        let mut out = Vec::new();
        for f in 0..self.faces.len() {
            for (a, b) in self.face_edges(f) {
                if counts[&(a.min(b), a.max(b))] == 1 {
                    out.push((a, b));
                }
            }
        }
        out
    }

    /// Signed enclosed volume (positive when faces wind outward).
    ///
    /// Only meaningful for closed meshes.
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|loop_| signed_volume_of(&self.vertices, loop_))
            .sum()
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        }))
    }

    /// Apply a transform to every vertex.
    pub fn transform(&mut self, t: &Transform) {
        for p in &mut self.vertices {
            *p = t.apply_point(p);
        }
    }

    /// Scale vertex positions about the local origin.
    pub fn scale(&mut self, sx: f64, sy: f64, sz: f64) {
        self.transform(&Transform::scale(sx, sy, sz));
    }

    /// Append another mesh, offsetting its indices. Returns the index of the
    /// first appended vertex.
    pub fn append(&mut self, other: &PolyMesh) -> usize {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);
        self.edges
            .extend(other.edges.iter().map(|[a, b]| [a + offset, b + offset]));
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|loop_| loop_.iter().map(|v| v + offset).collect()),
        );
        offset
    }

    /// Reverse the winding of a face.
    pub fn flip_face(&mut self, face: usize) {
        self.faces[face].reverse();
    }
}

/// Signed volume contributed by one face, fanned from its first vertex.
pub(crate) fn signed_volume_of(vertices: &[Point3], loop_: &[usize]) -> f64 {
    let p0 = vertices[loop_[0]].coords;
    let mut vol = 0.0;
    for i in 1..loop_.len().saturating_sub(1) {
        let p1 = vertices[loop_[i]].coords;
        let p2 = vertices[loop_[i + 1]].coords;
        vol += p0.dot(&p1.cross(&p2));
    }
    vol / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_normal_points_up() {
        let mesh = PolyMesh::rectangle(0.0, 0.0, 2.0, 3.0);
        assert_eq!(mesh.num_vertices(), 4);
        assert_relative_eq!(mesh.face_area_vector(0), Vec3::new(0.0, 0.0, 6.0));
        assert_relative_eq!(mesh.face_normal(0).unwrap(), Vec3::z());
        assert_relative_eq!(mesh.face_center(0), Point3::new(1.0, 1.5, 0.0));
    }

    #[test]
    fn test_from_polygon_requires_three_points() {
        let err = PolyMesh::from_polygon(&[Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(
            err,
            Err(MeshError::TooFewVertices {
                needed: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_add_face_validates_indices() {
        let mut mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            mesh.add_face(vec![0, 1, 7]),
            Err(MeshError::IndexOutOfRange { index: 7, len: 4 })
        );
        assert_eq!(mesh.add_face(vec![0, 1, 0]), Err(MeshError::RepeatedVertex(0)));
    }

    #[test]
    fn test_polyline_edges() {
        let pts = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(PolyMesh::polyline(&pts, false).unwrap().edges.len(), 2);
        assert_eq!(PolyMesh::polyline(&pts, true).unwrap().edges, vec![[0, 1], [1, 2], [2, 0]]);
    }

    #[test]
    fn test_boundary_edges_of_single_face() {
        let mesh = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        assert_eq!(mesh.boundary_edges(), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut a = PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0);
        let b = PolyMesh::regular_polygon(1.0, 3);
        assert_eq!(a.append(&b), 4);
        assert_eq!(a.faces[1], vec![4, 5, 6]);
    }

    #[test]
    fn test_scale_flattens_z() {
        let mut mesh = PolyMesh::from_polygon(&[
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 3.0),
        ])
        .unwrap();
        mesh.scale(1.0, 1.0, 0.0);
        assert!(mesh.vertices.iter().all(|p| p.z == 0.0));
        let (lo, hi) = mesh.bounds().unwrap();
        assert_relative_eq!(hi - lo, Vec3::new(1.0, 1.0, 0.0));
    }
}
