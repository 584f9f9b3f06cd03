//! Aligned copies of a profile.

use tracing::{debug, instrument, warn};

use mitre_scene::{MeshId, Mode, ObjectData, ObjectId, Scene};

use crate::align::align_object;
use crate::{JointError, Result};

/// Add a new object wrapping a copy of `profile`, aligned to the corner
/// picked on the active object.
///
/// The profile mesh is never modified. The new object takes the profile's
/// name. If alignment fails the object and its mesh are removed again and
/// the cause is returned inside [`JointError::PartialFailureCleanup`].
/// With `select_new`, the scene ends in object mode with the new object
/// active and the only one selected.
#[instrument(skip(scene))]
pub fn add_aligned_object(
    scene: &mut Scene,
    profile: MeshId,
    select_new: bool,
    inverse: bool,
) -> Result<ObjectId> {
    let data = scene
        .mesh(profile)
        .map_err(|_| JointError::ProfileTypeInvalid)?;
    if data.mesh.is_empty() {
        return Err(JointError::ProfileTypeInvalid);
    }
    let name = data.name.clone();

    let mesh = scene.copy_mesh(profile)?;
    scene.deselect_vertices(mesh)?;
    let object = scene.add_object(name, ObjectData::Mesh(mesh));

    if let Err(cause) = align_object(scene, object, inverse) {
        warn!(%cause, "alignment failed, removing new object");
        scene.remove_object(object)?;
        scene.remove_mesh(mesh)?;
        return Err(JointError::PartialFailureCleanup(Box::new(cause)));
    }

    if select_new {
        scene.set_mode(Mode::Object);
        scene.select_all(false);
        scene.set_active(Some(object))?;
        scene.set_selected(object, true)?;
    }
    debug!(?object, "added aligned object");
    Ok(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitre_math::Point3;
    use mitre_mesh::PolyMesh;

    fn setup(picks: &[usize]) -> (Scene, ObjectId, MeshId) {
        let mut scene = Scene::new();
        let path = PolyMesh::polyline(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 3.0),
            ],
            false,
        )
        .unwrap();
        let host_mesh = scene.add_mesh("host", path);
        let host = scene.add_object("host", ObjectData::Mesh(host_mesh));
        for &v in picks {
            scene.select_vertex(host_mesh, v).unwrap();
        }
        scene.set_active(Some(host)).unwrap();
        let profile = scene.add_mesh("Square", PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
        (scene, host, profile)
    }

    #[test]
    fn test_new_object_named_after_profile() {
        let (mut scene, host, profile) = setup(&[0, 1, 2]);
        let id = add_aligned_object(&mut scene, profile, false, false).unwrap();
        let object = scene.object(id).unwrap();
        assert_eq!(object.name, "Square");
        assert_ne!(object.mesh(), Some(profile));
        assert_eq!(scene.active(), Some(host));
    }

    #[test]
    fn test_select_new_makes_it_active() {
        let (mut scene, _, profile) = setup(&[0, 1, 2]);
        scene.set_mode(Mode::Edit);
        let id = add_aligned_object(&mut scene, profile, true, true).unwrap();
        assert_eq!(scene.active(), Some(id));
        assert_eq!(scene.selected_objects(), vec![id]);
        assert_eq!(scene.mode(), Mode::Object);
    }

    #[test]
    fn test_profile_not_mutated() {
        let (mut scene, _, profile) = setup(&[0, 1, 2]);
        let before = scene.mesh(profile).unwrap().mesh.clone();
        let id = add_aligned_object(&mut scene, profile, false, false).unwrap();
        let copy = scene.object_mesh(id).unwrap();
        assert_ne!(copy, profile);
        assert_eq!(scene.mesh(copy).unwrap().mesh, before);
        scene.mesh_mut(copy).unwrap().mesh.scale(2.0, 2.0, 2.0);
        assert_eq!(scene.mesh(profile).unwrap().mesh, before);
    }

    #[test]
    fn test_failure_removes_new_object() {
        let (mut scene, _, profile) = setup(&[0, 2]);
        let objects = scene.num_objects();
        let meshes = scene.meshes().count();

        let err = add_aligned_object(&mut scene, profile, true, false).unwrap_err();
        assert_eq!(
            err,
            JointError::PartialFailureCleanup(Box::new(JointError::SelectionInvalid { found: 2 }))
        );
        assert_eq!(scene.num_objects(), objects);
        assert_eq!(scene.meshes().count(), meshes);
    }

    #[test]
    fn test_invalid_profiles() {
        let (mut scene, _, profile) = setup(&[0, 1, 2]);
        let empty = scene.add_mesh("empty", PolyMesh::new());
        assert_eq!(
            add_aligned_object(&mut scene, empty, false, false),
            Err(JointError::ProfileTypeInvalid)
        );
        scene.remove_mesh(profile).unwrap();
        assert_eq!(
            add_aligned_object(&mut scene, profile, false, false),
            Err(JointError::ProfileTypeInvalid)
        );
    }
}
