#![warn(missing_docs)]

//! Editable polygon meshes for the mitre joint builder.
//!
//! [`PolyMesh`] stores vertex positions, polygon faces as index loops, and
//! loose edges that bound no face (open profiles). The modules add the mesh
//! primitives a modeling host exposes to the joint core:
//!
//! - [`extrude`]: region extrusion with a duplicated vertex ring
//! - [`weld`]: merge-by-distance and seam face removal
//! - [`normals`]: consistent outward winding
//! - [`report`]: manifold and duplicate checks
//! - [`triangulate`]: ear clipping for export
//!
//! # Example
//!
//! ```
//! use mitre_mesh::PolyMesh;
//! use mitre_math::Vec3;
//!
//! let mut mesh = PolyMesh::rectangle(0.0, 0.0, 2.0, 1.0);
//! mesh.extrude_region(&Vec3::new(0.0, 0.0, 1.0)).unwrap();
//! assert_eq!(mesh.num_faces(), 6);
//! assert!(mesh.report(1e-6).is_closed());
//! ```

pub mod extrude;
mod mesh;
pub mod normals;
pub mod report;
pub mod triangulate;
pub mod weld;

pub use extrude::Extrusion;
pub use mesh::PolyMesh;
pub use report::MeshReport;
pub use weld::{WeldReport, DEFAULT_MERGE_DISTANCE};

use thiserror::Error;

/// Errors from mesh construction and editing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A face or edge references a vertex that does not exist.
    #[error("vertex index {index} out of range ({len} vertices)")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },

    /// Not enough vertices to build the requested element.
    #[error("need at least {needed} vertices, got {found}")]
    TooFewVertices {
        /// Minimum vertex count.
        needed: usize,
        /// Vertex count supplied.
        found: usize,
    },

    /// A face lists the same vertex twice.
    #[error("face repeats vertex {0}")]
    RepeatedVertex(usize),

    /// The operation needs geometry but the mesh has none.
    #[error("mesh is empty")]
    EmptyMesh,
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;
