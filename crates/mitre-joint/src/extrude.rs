//! Extrusion with a slanted cut.
//!
//! The profile is extruded one unit along local +Z, then the new ring is
//! moved onto the plane `z = x / tan(angle)` (mirrored through `z = 0` when
//! inverted) and the old ring is dropped to the lowest point of that cut,
//! clamped to zero. Two profiles cut at half the corner angle, one of them
//! inverted, meet flush along the bisecting plane.

use std::f64::consts::PI;

use tracing::{debug, instrument};

use mitre_math::{Tolerance, Vec3};
use mitre_mesh::{Extrusion, PolyMesh};
use mitre_scene::{Mode, ObjectId, Scene};

use crate::{JointError, Result};

/// Extrude `mesh` in place and cut the new end at `angle` radians.
pub fn extrude_angle(mesh: &mut PolyMesh, angle: f64, inverse: bool) -> Result<Extrusion> {
    let tol = Tolerance::DEFAULT;
    if !angle.is_finite() || angle <= tol.angular || angle >= PI - tol.angular {
        return Err(JointError::InvalidAngle(angle));
    }

    let extrusion = mesh.extrude_region(&Vec3::z())?;
    let n = extrusion.base_vertices;
    let tan = angle.tan();

    let mut lowest = 0.0_f64;
    for i in 0..n {
        let cut = mesh.vertices[i].x / tan;
        let z = if inverse { -cut } else { cut };
        mesh.vertices[i + n].z = z;
        lowest = lowest.min(if inverse { -z } else { z });
    }

    let base = if inverse { -lowest } else { lowest };
    for p in &mut mesh.vertices[..n] {
        p.z = base;
    }

    debug!(angle, inverse, base, "extruded angle");
    Ok(extrusion)
}

/// [`extrude_angle`] on an object's mesh, inside an edit session.
#[instrument(skip(scene))]
pub fn extrude_angle_object(
    scene: &mut Scene,
    object: ObjectId,
    angle: f64,
    inverse: bool,
) -> Result<Extrusion> {
    let mesh = scene.object_mesh(object).map_err(|_| JointError::NotAMesh)?;
    let mut scene = scene.enter_mode(Mode::Edit);
    let data = scene.mesh_mut(mesh)?;
    extrude_angle(&mut data.mesh, angle, inverse)
}
