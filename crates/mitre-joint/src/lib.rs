#![warn(missing_docs)]

//! Mitred joint construction.
//!
//! Given a host mesh with three picked vertices (start, corner, end) and a
//! planar profile mesh, this crate builds two copies of the profile aligned
//! to the legs of the corner, cuts each at half the corner angle, and welds
//! them into one closed joint mesh.
//!
//! The pipeline, leaves first:
//!
//! - [`frame`]: local coordinate frame from three points, registered as the
//!   `"Aligned"` orientation
//! - [`align`]: place and orient an object on that frame
//! - [`instantiate`]: copy a profile into a new aligned object
//! - [`extrude`]: extrude a profile with a slanted cut
//! - [`assemble`]: the joint state machine with rollback
//!
//! Every operation takes the [`Scene`](mitre_scene::Scene) explicitly and
//! restores the scene's mode on every exit path.

pub mod align;
pub mod assemble;
pub mod extrude;
pub mod frame;
pub mod instantiate;

pub use align::align_object;
pub use assemble::{add_angle, JointAssembler, JointStage};
pub use extrude::{extrude_angle, extrude_angle_object};
pub use frame::{set_orientation, LocalFrame, PointSelection, ALIGNED_ORIENTATION};
pub use instantiate::add_aligned_object;

use mitre_math::MathError;
use mitre_mesh::MeshError;
use mitre_scene::SceneError;
use thiserror::Error;

/// Errors from joint construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JointError {
    /// The active mesh does not have exactly three distinct picked vertices.
    #[error("expected exactly 3 selected vertices, found {found}")]
    SelectionInvalid {
        /// Number of distinct vertices in the selection history.
        found: usize,
    },

    /// There is no active object or it does not instance a mesh.
    #[error("active object is missing or not a mesh")]
    NotAMesh,

    /// The three points are collinear or coincident.
    #[error("selected points are collinear or coincident")]
    DegenerateSelection,

    /// A direction vector has zero length.
    #[error("direction vector has zero length")]
    DegenerateVector,

    /// The cut angle is zero, a half turn, or not finite.
    #[error("invalid cut angle: {0} rad")]
    InvalidAngle(f64),

    /// The profile handle does not resolve to a non-empty mesh.
    #[error("profile is not a usable mesh")]
    ProfileTypeInvalid,

    /// Alignment of a new instance failed; the instance was removed.
    #[error("aligning the new object failed and it was removed: {0}")]
    PartialFailureCleanup(#[source] Box<JointError>),

    /// The object to align does not exist.
    #[error("object to align does not exist")]
    TargetMissing,

    /// The object to align is the object holding the selection.
    #[error("object to align is the active object")]
    TargetIsSource,

    /// The object to align is a parent (direct or indirect) of the object
    /// holding the selection.
    #[error("object to align is an ancestor of the active object")]
    TargetIsAncestor,

    /// A [`JointAssembler`] was asked to run a second time.
    #[error("joint assembler has already run")]
    AlreadyRun,

    /// Host scene error.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Mesh editing error.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Vector math error other than a zero-length vector.
    #[error(transparent)]
    Math(MathError),
}

impl From<MathError> for JointError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::DegenerateVector => Self::DegenerateVector,
            other => Self::Math(other),
        }
    }
}

impl JointError {
    /// The underlying error, looking through cleanup wrappers.
    pub fn root_cause(&self) -> &JointError {
        match self {
            Self::PartialFailureCleanup(cause) => cause.root_cause(),
            other => other,
        }
    }
}

/// Result type for joint operations.
pub type Result<T> = std::result::Result<T, JointError>;
