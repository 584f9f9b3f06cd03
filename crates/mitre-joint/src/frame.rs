//! Local coordinate frames from three picked points.
//!
//! With start `A`, corner `M` and end `E`:
//!
//! - `Z = normalize(E - M)`
//! - `Y = normalize((A - M) x (E - M))`
//! - `X = normalize(Y x Z)`
//!
//! The frame is right-handed and its origin is `M`. `X` is the part of
//! `M - A` perpendicular to `Z`, so a profile drawn at positive local X sits
//! on the outside of the corner.

use tracing::{debug, instrument};

use mitre_math::{length, Dir3, Mat3, Point3, Tolerance, Transform, Vec3};
use mitre_scene::{MeshData, MeshId, Mode, ObjectId, Scene};

use crate::{JointError, Result};

/// Name of the orientation registered by [`set_orientation`].
pub const ALIGNED_ORIENTATION: &str = "Aligned";

/// Three points picked in order: start, corner (middle), end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSelection {
    /// First picked point.
    pub start: Point3,
    /// The corner.
    pub middle: Point3,
    /// Last picked point; the frame's Z axis points toward it.
    pub end: Point3,
}

impl PointSelection {
    /// A selection from explicit points.
    pub fn new(start: Point3, middle: Point3, end: Point3) -> Self {
        Self { start, middle, end }
    }

    /// Read the selection history of a mesh, in local coordinates.
    ///
    /// The history must name exactly three distinct vertices. With `inverse`
    /// the start and end are swapped.
    pub fn from_history(data: &MeshData, inverse: bool) -> Result<Self> {
        let history = &data.select_history;
        let mut distinct = history.clone();
        distinct.sort_unstable();
        distinct.dedup();
        if history.len() != 3 || distinct.len() != 3 {
            return Err(JointError::SelectionInvalid {
                found: distinct.len(),
            });
        }

        let point = |i: usize| {
            data.mesh
                .vertices
                .get(history[i])
                .copied()
                .ok_or(JointError::SelectionInvalid { found: i })
        };
        let (start, middle, end) = (point(0)?, point(1)?, point(2)?);
        Ok(if inverse {
            Self::new(end, middle, start)
        } else {
            Self::new(start, middle, end)
        })
    }

    /// The same selection mapped through `t`.
    pub fn transformed(&self, t: &Transform) -> Self {
        Self::new(
            t.apply_point(&self.start),
            t.apply_point(&self.middle),
            t.apply_point(&self.end),
        )
    }
}

/// An orthonormal, right-handed frame placed at a corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    /// The corner point.
    pub origin: Point3,
    /// In-plane axis perpendicular to Z, pointing away from the start leg.
    pub x: Dir3,
    /// Normal of the plane through the three points.
    pub y: Dir3,
    /// Toward the end point.
    pub z: Dir3,
}

impl LocalFrame {
    /// Build the frame for a selection.
    pub fn from_points(selection: &PointSelection) -> Result<Self> {
        let PointSelection { start, middle, end } = *selection;
        let to_start = start - middle;
        let to_end = end - middle;

        let tol = Tolerance::DEFAULT;
        let y_axis = to_start.cross(&to_end);
        if tol.is_zero(to_start.norm())
            || tol.is_zero(to_end.norm())
            || y_axis.norm() <= tol.angular * to_start.norm() * to_end.norm()
        {
            return Err(JointError::DegenerateSelection);
        }
        let x_axis = y_axis.cross(&to_end);

        Ok(Self {
            origin: middle,
            x: normalize(&x_axis)?,
            y: normalize(&y_axis)?,
            z: normalize(&to_end)?,
        })
    }

    /// Columns X, Y, Z.
    pub fn basis(&self) -> Mat3 {
        Mat3::from_columns(&[*self.x, *self.y, *self.z])
    }

    /// Frame-to-world transform.
    pub fn to_transform(&self) -> Transform {
        Transform::from_basis(&self.origin, &self.x, &self.y, &self.z)
    }
}

fn normalize(v: &Vec3) -> Result<Dir3> {
    let len = length(v.as_slice())?;
    Ok(Dir3::new_unchecked(v / len))
}

/// The active object and its mesh, or `NotAMesh`.
pub(crate) fn active_mesh_object(scene: &Scene) -> Result<(ObjectId, MeshId)> {
    let active = scene.active().ok_or(JointError::NotAMesh)?;
    let mesh = scene
        .object_mesh(active)
        .map_err(|_| JointError::NotAMesh)?;
    Ok((active, mesh))
}

/// A frame captured from the active object's selection.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CapturedFrame {
    /// The picked points in the source's local space.
    pub local: PointSelection,
    pub frame: LocalFrame,
}

pub(crate) fn capture_frame(scene: &mut Scene, inverse: bool) -> Result<CapturedFrame> {
    let (source, mesh) = active_mesh_object(scene)?;
    let mut scene = scene.enter_mode(Mode::Edit);
    let local = PointSelection::from_history(scene.mesh(mesh)?, inverse)?;
    let world = scene.matrix_world(source)?;
    let frame = LocalFrame::from_points(&local.transformed(&world))?;
    scene.create_orientation(ALIGNED_ORIENTATION, frame.basis());
    Ok(CapturedFrame {
        local,
        frame,
    })
}

/// Build the frame from the active object's three picked vertices and
/// register it as the [`ALIGNED_ORIENTATION`] orientation.
///
/// Coordinates are read in the object's local space and mapped to world
/// space. The scene's mode is unchanged on return, whether or not the call
/// succeeds.
#[instrument(skip(scene))]
pub fn set_orientation(scene: &mut Scene, inverse: bool) -> Result<LocalFrame> {
    let captured = capture_frame(scene, inverse)?;
    debug!(origin = ?captured.frame.origin, z = ?captured.frame.z, "set orientation");
    Ok(captured.frame)
}
