#![warn(missing_docs)]

//! Mitred joints between extruded profiles.
//!
//! This is the host-facing surface of the workspace. It wraps the joint core
//! in the three operations a modeling host calls, collapsing errors to a
//! success flag after logging them:
//!
//! - [`set_orientation`]: register the `"Aligned"` frame from three picked
//!   vertices
//! - [`align_object`]: move an object onto that frame
//! - [`add_angle`]: build a welded mitred joint from a profile mesh
//!
//! [`operators`] adapts them to named, reportable commands driven by
//! [`AnglesSettings`]; [`export`] writes results as STL or OBJ.
//!
//! # Example
//!
//! ```
//! use mitre::{add_angle, Scene};
//! use mitre::mesh::PolyMesh;
//! use mitre::math::Point3;
//! use mitre::scene::ObjectData;
//!
//! let mut scene = Scene::new();
//! let path = PolyMesh::polyline(
//!     &[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!     ],
//!     false,
//! )
//! .unwrap();
//! let host_mesh = scene.add_mesh("path", path);
//! let host = scene.add_object("path", ObjectData::Mesh(host_mesh));
//! for v in 0..3 {
//!     scene.select_vertex(host_mesh, v).unwrap();
//! }
//! scene.set_active(Some(host)).unwrap();
//!
//! let profile = scene.add_mesh("Square", PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
//! let joint = add_angle(&mut scene, profile).unwrap();
//! assert_eq!(scene.active(), Some(joint));
//! ```

pub mod error;
pub mod export;
pub mod operators;
pub mod settings;

pub use error::{MitreError, Result};
pub use operators::{Execution, Operator, OperatorResult};
pub use settings::AnglesSettings;

pub use mitre_joint as joint;
pub use mitre_math as math;
pub use mitre_mesh as mesh;
pub use mitre_scene as scene;
pub use mitre_scene::{MeshId, ObjectId, Scene};

use tracing::warn;

/// Register the `"Aligned"` orientation from the active object's three
/// picked vertices. Returns `false` (leaving the scene unchanged) if the
/// selection is unusable.
pub fn set_orientation(scene: &mut Scene, inverse: bool) -> bool {
    match mitre_joint::set_orientation(scene, inverse) {
        Ok(_) => true,
        Err(err) => {
            warn!(%err, "set orientation failed");
            false
        }
    }
}

/// Move `target` onto the corner picked on the active object. Returns
/// `false` if the selection or target is unusable.
pub fn align_object(scene: &mut Scene, target: ObjectId, inverse: bool) -> bool {
    match mitre_joint::align_object(scene, target, inverse) {
        Ok(_) => true,
        Err(err) => {
            warn!(%err, "align object failed");
            false
        }
    }
}

/// Build a mitred joint of `profile` at the corner picked on the active
/// object. Returns the joint object, or `None` after rolling back.
pub fn add_angle(scene: &mut Scene, profile: MeshId) -> Option<ObjectId> {
    match mitre_joint::add_angle(scene, profile) {
        Ok(joint) => Some(joint),
        Err(err) => {
            warn!(%err, "add angle failed");
            None
        }
    }
}
