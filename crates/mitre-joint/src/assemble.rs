//! The joint assembly state machine.
//!
//! ```text
//! Idle -> InstantiateA -> InstantiateB -> ComputeAngle -> Planarize
//!      -> ExtrudeA -> ExtrudeB -> Merge -> Clean -> Done
//! ```
//!
//! Any failure moves to `Failed`: objects and meshes created so far are
//! removed and the entry active object, selection and mode are restored.

use std::f64::consts::PI;
use std::fmt;

use tracing::{debug, info, instrument, warn};

use mitre_math::angle_between;
use mitre_mesh::DEFAULT_MERGE_DISTANCE;
use mitre_scene::{Axis, MeshId, Mode, ObjectId, Scene};

use crate::extrude::extrude_angle_object;
use crate::instantiate::add_aligned_object;
use crate::{JointError, Result};

/// Progress of a [`JointAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointStage {
    /// Nothing has run yet.
    Idle,
    /// Adding the first aligned copy.
    InstantiateA,
    /// Adding the second, inverted copy.
    InstantiateB,
    /// Measuring the angle between the copies' Z axes.
    ComputeAngle,
    /// Turning the first copy over and flattening both profiles.
    Planarize,
    /// Cutting the first copy.
    ExtrudeA,
    /// Cutting the second copy.
    ExtrudeB,
    /// Joining and welding the halves.
    Merge,
    /// Resetting selection on the result.
    Clean,
    /// Finished; the joint object is active.
    Done,
    /// Rolled back after an error.
    Failed,
}

impl fmt::Display for JointStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Builds one mitred joint, undoing its own work on failure.
pub struct JointAssembler<'a> {
    scene: &'a mut Scene,
    stage: JointStage,
    entry_active: Option<ObjectId>,
    entry_selection: Vec<ObjectId>,
    entry_mode: Mode,
    created_objects: Vec<ObjectId>,
    created_meshes: Vec<MeshId>,
    angle: Option<f64>,
}

impl<'a> JointAssembler<'a> {
    /// Prepare an assembler, recording the scene state to restore on failure.
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            entry_active: scene.active(),
            entry_selection: scene.selected_objects(),
            entry_mode: scene.mode(),
            scene,
            stage: JointStage::Idle,
            created_objects: Vec::new(),
            created_meshes: Vec::new(),
            angle: None,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> JointStage {
        self.stage
    }

    /// Corner angle measured in `ComputeAngle`, in radians.
    pub fn angle(&self) -> Option<f64> {
        self.angle
    }

    /// Build the joint from `profile` at the corner picked on the active
    /// object. Returns the joint object, which is left active and selected.
    #[instrument(skip(self))]
    pub fn run(&mut self, profile: MeshId) -> Result<ObjectId> {
        if self.stage != JointStage::Idle {
            warn!(stage = %self.stage, "assembler already used");
            return Err(JointError::AlreadyRun);
        }
        match self.build(profile) {
            Ok(joint) => {
                self.advance(JointStage::Done);
                info!(?joint, "joint created");
                Ok(joint)
            }
            Err(err) => {
                warn!(stage = %self.stage, %err, "joint failed, rolling back");
                self.rollback();
                self.stage = JointStage::Failed;
                Err(err)
            }
        }
    }

    fn advance(&mut self, stage: JointStage) {
        debug!(from = %self.stage, to = %stage, "joint stage");
        self.stage = stage;
    }

    fn track(&mut self, object: ObjectId) -> Result<()> {
        self.created_objects.push(object);
        self.created_meshes.push(self.scene.object_mesh(object)?);
        Ok(())
    }

    fn build(&mut self, profile: MeshId) -> Result<ObjectId> {
        self.advance(JointStage::InstantiateA);
        let a = add_aligned_object(self.scene, profile, false, false)?;
        self.track(a)?;

        self.advance(JointStage::InstantiateB);
        let b = add_aligned_object(self.scene, profile, true, true)?;
        self.track(b)?;

        self.advance(JointStage::ComputeAngle);
        let z_a = self.scene.matrix_world(a)?.axis(2);
        let z_b = self.scene.matrix_world(b)?.axis(2);
        let angle = angle_between(z_a.as_slice(), z_b.as_slice())?;
        self.angle = Some(angle);
        debug!(angle, "corner angle");

        self.advance(JointStage::Planarize);
        self.scene.rotate_local(a, Axis::X, PI)?;
        for part in [a, b] {
            let before = self.scene.object_mesh(part)?;
            let mesh = self.scene.make_single_user(part)?;
            if mesh != before {
                self.created_meshes.push(mesh);
            }
            let mut scene = self.scene.enter_mode(Mode::Edit);
            let data = scene.mesh_mut(mesh)?;
            data.mesh.scale(1.0, 1.0, 0.0);
            data.mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);
        }

        self.advance(JointStage::ExtrudeA);
        extrude_angle_object(self.scene, a, angle / 2.0, false)?;

        self.advance(JointStage::ExtrudeB);
        extrude_angle_object(self.scene, b, angle / 2.0, true)?;

        self.advance(JointStage::Merge);
        self.scene.select_all(false);
        self.scene.set_selected(a, true)?;
        self.scene.set_selected(b, true)?;
        self.scene.join(a, &[b])?;
        self.created_objects.retain(|&o| o != b);
        let mesh = self.scene.object_mesh(a)?;
        {
            let mut scene = self.scene.enter_mode(Mode::Edit);
            let data = scene.mesh_mut(mesh)?;
            let welded = data.mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);
            let seam = data.mesh.delete_coincident_faces();
            data.mesh.remove_doubles(DEFAULT_MERGE_DISTANCE);
            let flipped = data.mesh.recalc_normals_outside();
            debug!(
                welded = welded.vertices_removed,
                seam,
                flipped,
                faces = data.mesh.num_faces(),
                "merged halves"
            );
        }

        self.advance(JointStage::Clean);
        self.scene.deselect_vertices(mesh)?;
        self.scene.set_mode(Mode::Object);
        self.scene.select_all(false);
        self.scene.set_active(Some(a))?;
        self.scene.set_selected(a, true)?;
        Ok(a)
    }

    fn rollback(&mut self) {
        for &object in self.created_objects.iter().rev() {
            if self.scene.contains_object(object) {
                let _ = self.scene.remove_object(object);
            }
        }
        for &mesh in &self.created_meshes {
            if self.scene.mesh(mesh).is_ok() {
                let _ = self.scene.remove_mesh(mesh);
            }
        }
        self.created_objects.clear();
        self.created_meshes.clear();

        let active = self
            .entry_active
            .filter(|&id| self.scene.contains_object(id));
        let _ = self.scene.set_active(active);
        self.scene.select_all(false);
        for &id in &self.entry_selection {
            let _ = self.scene.set_selected(id, true);
        }
        self.scene.set_mode(self.entry_mode);
    }
}

/// Build a mitred joint of `profile` at the corner picked on the active
/// object. See [`JointAssembler`].
pub fn add_angle(scene: &mut Scene, profile: MeshId) -> Result<ObjectId> {
    JointAssembler::new(scene).run(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitre_math::Point3;
    use mitre_mesh::PolyMesh;
    use mitre_scene::ObjectData;

    fn corner_scene(picks: &[usize]) -> (Scene, ObjectId, MeshId) {
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
        scene.set_selected(host, true).unwrap();
        let profile = scene.add_mesh("Square", PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));
        (scene, host, profile)
    }

    #[test]
    fn test_stages_reach_done() {
        let (mut scene, _, profile) = corner_scene(&[0, 1, 2]);
        let mut assembler = JointAssembler::new(&mut scene);
        assert_eq!(assembler.stage(), JointStage::Idle);
        assembler.run(profile).unwrap();
        assert_eq!(assembler.stage(), JointStage::Done);
        let angle = assembler.angle().unwrap();
        assert!((angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_square_joint_is_closed() {
        let (mut scene, _, profile) = corner_scene(&[0, 1, 2]);
        let joint = add_angle(&mut scene, profile).unwrap();

        let mesh = &scene.mesh(scene.object_mesh(joint).unwrap()).unwrap().mesh;
        let report = mesh.report(DEFAULT_MERGE_DISTANCE);
        assert!(report.is_clean_solid(), "{report}");
        assert_eq!(report.faces, 10);
        assert_eq!(report.vertices, 12);
    }

    #[test]
    fn test_joint_left_active_and_selected() {
        let (mut scene, host, profile) = corner_scene(&[0, 1, 2]);
        scene.set_mode(Mode::Edit);
        let joint = add_angle(&mut scene, profile).unwrap();
        assert_eq!(scene.active(), Some(joint));
        assert_eq!(scene.selected_objects(), vec![joint]);
        assert_eq!(scene.mode(), Mode::Object);
        assert!(scene.contains_object(host));
        // host plus the joint
        assert_eq!(scene.num_objects(), 2);
        let mesh = scene.object_mesh(joint).unwrap();
        assert!(scene.mesh(mesh).unwrap().select_history.is_empty());
    }

    #[test]
    fn test_failure_rolls_back() {
        let (mut scene, host, profile) = corner_scene(&[0, 1]);
        scene.set_mode(Mode::Edit);
        let meshes = scene.meshes().count();

        let mut assembler = JointAssembler::new(&mut scene);
        let err = assembler.run(profile).unwrap_err();
        assert_eq!(assembler.stage(), JointStage::Failed);
        assert_eq!(err.root_cause(), &JointError::SelectionInvalid { found: 2 });

        assert_eq!(scene.num_objects(), 1);
        assert_eq!(scene.meshes().count(), meshes);
        assert_eq!(scene.active(), Some(host));
        assert_eq!(scene.selected_objects(), vec![host]);
        assert_eq!(scene.mode(), Mode::Edit);
    }

    #[test]
    fn test_collinear_corner_fails_cleanly() {
        let mut scene = Scene::new();
        let path = PolyMesh::polyline(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            false,
        )
        .unwrap();
        let host_mesh = scene.add_mesh("host", path);
        let host = scene.add_object("host", ObjectData::Mesh(host_mesh));
        for v in 0..3 {
            scene.select_vertex(host_mesh, v).unwrap();
        }
        scene.set_active(Some(host)).unwrap();
        let profile = scene.add_mesh("Square", PolyMesh::rectangle(0.5, 0.0, 1.0, 1.0));

        let err = add_angle(&mut scene, profile).unwrap_err();
        assert_eq!(err.root_cause(), &JointError::DegenerateSelection);
        assert_eq!(scene.num_objects(), 1);
    }

    #[test]
    fn test_assembler_runs_once() {
        let (mut scene, _, profile) = corner_scene(&[0, 1, 2]);
        let mut assembler = JointAssembler::new(&mut scene);
        assembler.run(profile).unwrap();
        assert!(assembler.run(profile).is_err());
        assert_eq!(assembler.stage(), JointStage::Done);
    }
}
