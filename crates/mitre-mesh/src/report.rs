//! Mesh validation summary.

use std::fmt;

use crate::PolyMesh;

/// Counts describing the health of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    /// Vertex count.
    pub vertices: usize,
    /// Face count.
    pub faces: usize,
    /// Loose edge count.
    pub loose_edges: usize,
    /// Edges used by exactly one face.
    pub boundary_edges: usize,
    /// Edges used by more than two faces.
    pub non_manifold_edges: usize,
    /// Vertices within the report tolerance of an earlier vertex.
    pub duplicate_vertices: usize,
    /// Faces with (near) zero area.
    pub degenerate_faces: usize,
    /// Signed enclosed volume.
    pub signed_volume: f64,
}

impl MeshReport {
    /// Every face edge is shared by exactly two faces and nothing dangles.
    pub fn is_closed(&self) -> bool {
        self.faces > 0
            && self.boundary_edges == 0
            && self.non_manifold_edges == 0
            && self.loose_edges == 0
    }

    /// Closed, free of duplicates and degenerate faces, wound outward.
    pub fn is_clean_solid(&self) -> bool {
        self.is_closed()
            && self.duplicate_vertices == 0
            && self.degenerate_faces == 0
            && self.signed_volume > 0.0
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vertices:           {}", self.vertices)?;
        writeln!(f, "faces:              {}", self.faces)?;
        writeln!(f, "loose edges:        {}", self.loose_edges)?;
        writeln!(f, "boundary edges:     {}", self.boundary_edges)?;
        writeln!(f, "non-manifold edges: {}", self.non_manifold_edges)?;
        writeln!(f, "duplicate vertices: {}", self.duplicate_vertices)?;
        writeln!(f, "degenerate faces:   {}", self.degenerate_faces)?;
        write!(f, "volume:             {:.6}", self.signed_volume)
    }
}

impl PolyMesh {
    /// Summarize topology and geometry. `tolerance` is the distance under
    /// which vertices count as duplicates and faces as degenerate.
    pub fn report(&self, tolerance: f64) -> MeshReport {
        let counts = self.edge_face_counts();
        MeshReport {
            vertices: self.vertices.len(),
            faces: self.faces.len(),
            loose_edges: self.edges.len(),
            boundary_edges: counts.values().filter(|&&c| c == 1).count(),
            non_manifold_edges: counts.values().filter(|&&c| c > 2).count(),
            duplicate_vertices: self.count_duplicate_vertices(tolerance),
            degenerate_faces: (0..self.faces.len())
                .filter(|&f| self.face_area_vector(f).norm() <= tolerance * tolerance)
                .count(),
            signed_volume: self.signed_volume(),
        }
    }
}
