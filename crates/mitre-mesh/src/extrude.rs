//! Region extrusion.
//!
//! Extruding duplicates every vertex into a second ring, offset by a fixed
//! vector. Vertex `i` of the original ring pairs with vertex `i + n` of the
//! new ring, where `n` is the vertex count before extrusion.

use std::ops::Range;

use tracing::debug;

use mitre_math::Vec3;

use crate::{MeshError, PolyMesh, Result};

/// Layout of the faces and vertices produced by [`PolyMesh::extrude_region`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    /// Vertex count before extrusion; new vertex `i + base_vertices` pairs
    /// with old vertex `i`.
    pub base_vertices: usize,
    /// Reversed copies of the original faces, left on the old ring.
    pub base_faces: Range<usize>,
    /// Quads connecting the two rings.
    pub side_faces: Range<usize>,
    /// The original faces moved onto the new ring.
    pub top_faces: Range<usize>,
}

impl PolyMesh {
    /// Extrude all geometry by `offset`.
    ///
    /// Faces are moved to the new ring and capped with reversed copies on the
    /// old ring, so an isolated face region becomes a closed solid. Boundary
    /// edges and loose edges each grow a side quad wound `a, b, b', a'`.
    /// Vertices that bound nothing grow a loose edge to their copy.
    pub fn extrude_region(&mut self, offset: &Vec3) -> Result<Extrusion> {
        let n = self.vertices.len();
        if n == 0 {
            return Err(MeshError::EmptyMesh);
        }

        let ring: Vec<_> = self.vertices.iter().map(|p| p + offset).collect();
        self.vertices.extend(ring);

        let mut used = vec![false; n];
        for loop_ in &self.faces {
            for &v in loop_ {
                used[v] = true;
            }
        }
        for [a, b] in &self.edges {
            used[*a] = true;
            used[*b] = true;
        }

        let boundary = self.boundary_edges();
        let loose = std::mem::take(&mut self.edges);
        let originals = std::mem::take(&mut self.faces);

        let mut faces = Vec::with_capacity(originals.len() * 2 + boundary.len() + loose.len());
        faces.extend(originals.iter().map(|loop_| {
            let mut base = loop_.clone();
            base.reverse();
            base
        }));
        let base_faces = 0..faces.len();

        faces.extend(
            boundary
                .iter()
                .copied()
                .chain(loose.iter().map(|&[a, b]| (a, b)))
                .map(|(a, b)| vec![a, b, b + n, a + n]),
        );
        let side_faces = base_faces.end..faces.len();

        faces.extend(
            originals
                .iter()
                .map(|loop_| loop_.iter().map(|v| v + n).collect::<Vec<_>>()),
        );
        let top_faces = side_faces.end..faces.len();
        self.faces = faces;

        self.edges = (0..n).filter(|&v| !used[v]).map(|v| [v, v + n]).collect();

        debug!(
            base_vertices = n,
            sides = side_faces.len(),
            tops = top_faces.len(),
            "extruded region"
        );

        Ok(Extrusion {
            base_vertices: n,
            base_faces,
            side_faces,
            top_faces,
        })
    }
}
