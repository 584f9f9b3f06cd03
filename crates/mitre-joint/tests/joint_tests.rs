//! End-to-end joint construction against an in-process scene.

use approx::assert_relative_eq;
use std::f64::consts::FRAC_PI_2;

use mitre_joint::{add_aligned_object, add_angle, set_orientation, JointAssembler, JointError};
use mitre_math::{Point3, Transform, Vec3};
use mitre_mesh::{PolyMesh, DEFAULT_MERGE_DISTANCE};
use mitre_scene::{MeshId, ObjectData, ObjectId, Scene};

/// A host path through `points` with every vertex picked in order.
fn host_scene(points: &[Point3]) -> (Scene, ObjectId) {
    let mut scene = Scene::new();
    let mesh = scene.add_mesh("path", PolyMesh::polyline(points, false).unwrap());
    let host = scene.add_object("path", ObjectData::Mesh(mesh));
    for v in 0..points.len() {
        scene.select_vertex(mesh, v).unwrap();
    }
    scene.set_active(Some(host)).unwrap();
    scene.set_selected(host, true).unwrap();
    (scene, host)
}

fn right_angle() -> [Point3; 3] {
    [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
    ]
}

fn joint_mesh(scene: &Scene, joint: ObjectId) -> &PolyMesh {
    &scene.mesh(scene.object_mesh(joint).unwrap()).unwrap().mesh
}

fn add_profile(scene: &mut Scene, mesh: PolyMesh) -> MeshId {
    scene.add_mesh("Profile", mesh)
}

#[test]
fn test_aligned_profile_sits_on_corner() {
    let (mut scene, _) = host_scene(&right_angle());
    let profile = add_profile(&mut scene, PolyMesh::rectangle(0.0, 0.0, 1.0, 1.0));
    let id = add_aligned_object(&mut scene, profile, true, false).unwrap();

    let world = scene.matrix_world(id).unwrap();
    assert_relative_eq!(
        world.apply_point(&Point3::origin()),
        Point3::new(1.0, 0.0, 0.0),
        epsilon = 1e-12
    );
    let toward_end = world.apply_vec(&Vec3::z());
    assert_relative_eq!(toward_end, Vec3::y(), epsilon = 1e-12);
}

#[test]
fn test_square_right_angle_joint() {
    let (mut scene, _) = host_scene(&right_angle());
    let profile = add_profile(&mut scene, PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
    let joint = add_angle(&mut scene, profile).unwrap();

    let report = joint_mesh(&scene, joint).report(DEFAULT_MERGE_DISTANCE);
    assert!(report.is_clean_solid(), "{report}");
    assert_eq!(report.faces, 10);
    assert_eq!(report.duplicate_vertices, 0);
}

#[test]
fn test_triangle_profile_joint() {
    let (mut scene, _) = host_scene(&right_angle());
    let mut triangle = PolyMesh::regular_polygon(0.5, 3);
    triangle.transform(&Transform::translation(1.0, 0.0, 0.0));
    let profile = add_profile(&mut scene, triangle);
    let joint = add_angle(&mut scene, profile).unwrap();

    let report = joint_mesh(&scene, joint).report(DEFAULT_MERGE_DISTANCE);
    assert!(report.is_clean_solid(), "{report}");
    assert_eq!(report.faces, 8);
}

#[test]
fn test_joint_in_transformed_host() {
    let (mut scene, host) = host_scene(&right_angle());
    scene.object_mut(host).unwrap().matrix_basis = Transform::translation(5.0, -2.0, 3.0)
        .then(&Transform::rotation_x(0.4))
        .then(&Transform::rotation_z(FRAC_PI_2 / 3.0));
    let profile = add_profile(&mut scene, PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
    let joint = add_angle(&mut scene, profile).unwrap();

    let report = joint_mesh(&scene, joint).report(DEFAULT_MERGE_DISTANCE);
    assert!(report.is_clean_solid(), "{report}");
    assert_eq!(report.faces, 10);
}

#[test]
fn test_open_profile_welds_into_surface() {
    let (mut scene, _) = host_scene(&right_angle());
    let channel = PolyMesh::polyline(
        &[
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5, 1.0, 0.0),
        ],
        false,
    )
    .unwrap();
    let profile = add_profile(&mut scene, channel);
    let joint = add_angle(&mut scene, profile).unwrap();

    let mesh = joint_mesh(&scene, joint);
    assert_eq!(mesh.num_faces(), 4);
    assert_eq!(mesh.num_vertices(), 9);
    assert_eq!(mesh.count_duplicate_vertices(DEFAULT_MERGE_DISTANCE), 0);
    assert!(!mesh.report(DEFAULT_MERGE_DISTANCE).is_closed());
}

#[test]
fn test_profile_untouched_by_joint() {
    let (mut scene, _) = host_scene(&right_angle());
    let square = PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0);
    let profile = add_profile(&mut scene, square.clone());
    add_angle(&mut scene, profile).unwrap();
    add_angle(&mut scene, profile).unwrap_err();
    assert_eq!(scene.mesh(profile).unwrap().mesh, square);
}

#[test]
fn test_orientation_then_joint_share_frame() {
    let (mut scene, _) = host_scene(&right_angle());
    let frame = set_orientation(&mut scene, false).unwrap();
    assert_relative_eq!(frame.origin, Point3::new(1.0, 0.0, 0.0));
    assert_relative_eq!(*frame.z, Vec3::y());
}

#[test]
fn test_failed_joint_leaves_scene_as_found() {
    let (mut scene, host) = host_scene(&right_angle()[..2]);
    let profile = add_profile(&mut scene, PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
    let meshes = scene.meshes().count();

    let err = JointAssembler::new(&mut scene).run(profile).unwrap_err();
    assert!(matches!(err, JointError::PartialFailureCleanup(_)));
    assert_eq!(scene.num_objects(), 1);
    assert_eq!(scene.meshes().count(), meshes);
    assert_eq!(scene.active(), Some(host));
}
