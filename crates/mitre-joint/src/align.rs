//! Placing an object on the picked corner.

use tracing::{debug, instrument};

use mitre_scene::{Mode, ObjectId, Scene};

use crate::frame::{active_mesh_object, capture_frame, LocalFrame, ALIGNED_ORIENTATION};
use crate::{JointError, Result};

/// Move `target` onto the corner picked on the active object and rotate it
/// into the corner's frame.
///
/// The target is parented to the source without inverse correction, moved
/// to the corner in the source's local space, aligned to the
/// [`ALIGNED_ORIENTATION`] orientation, then unparented keeping its world
/// transform. The target's own scale survives; a scaled source scales it
/// as parenting does. Afterwards only the source is selected and the
/// entry mode is restored.
#[instrument(skip(scene))]
pub fn align_object(scene: &mut Scene, target: ObjectId, inverse: bool) -> Result<LocalFrame> {
    if !scene.contains_object(target) {
        return Err(JointError::TargetMissing);
    }
    let (source, _) = active_mesh_object(scene)?;
    if source == target {
        return Err(JointError::TargetIsSource);
    }
    if scene.is_ancestor(target, source)? {
        return Err(JointError::TargetIsAncestor);
    }

    let captured = capture_frame(scene, inverse)?;
    let mut scene = scene.enter_mode(Mode::Object);
    scene.select_all(false);

    scene.set_parent(target, source)?;
    let object = scene.object_mut(target)?;
    object.matrix_basis = object
        .matrix_basis
        .with_translation(&captured.local.middle.coords);
    object.selected = true;

    scene.align_to_orientation(target, ALIGNED_ORIENTATION)?;
    scene.clear_parent_keep_transform(target)?;
    scene.set_selected(target, false)?;
    scene.set_selected(source, true)?;

    debug!(origin = ?captured.frame.origin, "aligned object");
    Ok(captured.frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mitre_math::{Point3, Transform, Vec3};
    use mitre_mesh::PolyMesh;
    use mitre_scene::ObjectData;

    fn setup(picks: &[usize]) -> (Scene, ObjectId, ObjectId) {
        let mut scene = Scene::new();
        let path = PolyMesh::polyline(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
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

        let profile = scene.add_mesh("profile", PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0));
        let target = scene.add_object("profile", ObjectData::Mesh(profile));
        (scene, host, target)
    }

    #[test]
    fn test_align_places_origin_at_corner() {
        let (mut scene, host, target) = setup(&[0, 1, 2]);
        let frame = align_object(&mut scene, target, false).unwrap();

        let world = scene.matrix_world(target).unwrap();
        assert!(world.approx_eq(&frame.to_transform(), 1e-12));
        assert_relative_eq!(world.translation_part(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(world.axis(2), Vec3::y(), epsilon = 1e-12);
        let target_obj = scene.object(target).unwrap();
        assert!(target_obj.parent.is_none());
        assert!(!target_obj.selected);
        assert!(scene.object(host).unwrap().selected);
        assert_eq!(scene.active(), Some(host));
    }

    #[test]
    fn test_align_follows_source_transform() {
        let (mut scene, host, target) = setup(&[0, 1, 2]);
        scene.object_mut(host).unwrap().matrix_basis = Transform::translation(0.0, 0.0, 2.0);
        align_object(&mut scene, target, false).unwrap();
        let origin = scene
            .matrix_world(target)
            .unwrap()
            .apply_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(1.0, 0.0, 2.0), epsilon = 1e-12);
    }

    #[test]
    fn test_align_is_idempotent() {
        let (mut scene, host, target) = setup(&[0, 1, 2]);
        scene.object_mut(host).unwrap().matrix_basis =
            Transform::translation(3.0, -1.0, 0.5).then(&Transform::rotation_z(0.7));
        align_object(&mut scene, target, false).unwrap();
        let first = scene.matrix_world(target).unwrap();
        align_object(&mut scene, target, false).unwrap();
        assert!(scene.matrix_world(target).unwrap().approx_eq(&first, 1e-9));
    }

    #[test]
    fn test_align_restores_mode() {
        let (mut scene, _, target) = setup(&[0, 1, 2]);
        scene.set_mode(Mode::Edit);
        align_object(&mut scene, target, true).unwrap();
        assert_eq!(scene.mode(), Mode::Edit);
    }

    #[test]
    fn test_align_errors() {
        let (mut scene, host, target) = setup(&[0, 1]);
        assert_eq!(
            align_object(&mut scene, target, false),
            Err(JointError::SelectionInvalid { found: 2 })
        );
        assert_eq!(
            align_object(&mut scene, host, false),
            Err(JointError::TargetIsSource)
        );
        scene.remove_object(target).unwrap();
        assert_eq!(
            align_object(&mut scene, target, false),
            Err(JointError::TargetMissing)
        );
    }

    #[test]
    fn test_failed_align_leaves_target_untouched() {
        let (mut scene, _, target) = setup(&[0, 1]);
        let before = scene.matrix_world(target).unwrap();
        let _ = align_object(&mut scene, target, false);
        assert!(scene.matrix_world(target).unwrap().approx_eq(&before, 0.0));
        assert!(scene.object(target).unwrap().parent.is_none());
    }

    #[test]
    fn test_align_to_ancestor_changes_nothing() {
        let (mut scene, host, target) = setup(&[0, 1, 2]);
        scene.set_parent(host, target).unwrap();
        scene.set_selected(host, true).unwrap();
        scene.set_selected(target, true).unwrap();
        let before = scene.matrix_world(target).unwrap();

        assert_eq!(
            align_object(&mut scene, target, false),
            Err(JointError::TargetIsAncestor)
        );
        let mut selected = scene.selected_objects();
        selected.sort();
        let mut expected = vec![host, target];
        expected.sort();
        assert_eq!(selected, expected);
        assert!(scene.orientation(ALIGNED_ORIENTATION).is_err());
        assert!(scene.matrix_world(target).unwrap().approx_eq(&before, 0.0));
        assert_eq!(scene.object(host).unwrap().parent, Some(target));
    }
}
