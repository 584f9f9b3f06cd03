#![warn(missing_docs)]

//! In-process modeling host for the mitre joint builder.
//!
//! A [`Scene`] owns objects and mesh data blocks in slot maps, tracks the
//! active object, object and vertex selection, the interaction [`Mode`], and
//! named transform orientations. It provides the host primitives the joint
//! core is written against: world matrices through a parent chain,
//! parenting, align-to-orientation, local rotation, single-user copies and
//! joining.

mod mode;
mod object;

use std::collections::BTreeMap;

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;
use tracing::debug;

use mitre_math::{Mat3, Transform};
use mitre_mesh::PolyMesh;

pub use mode::{Mode, ModeGuard};
pub use object::{MeshData, Object, ObjectData};

new_key_type! {
    /// Handle to an object in a [`Scene`].
    pub struct ObjectId;
    /// Handle to a mesh data block in a [`Scene`].
    pub struct MeshId;
}

/// Errors from scene queries and edits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The object handle does not resolve.
    #[error("object not found")]
    ObjectNotFound,

    /// The mesh handle does not resolve.
    #[error("mesh not found")]
    MeshNotFound,

    /// No orientation is registered under this name.
    #[error("orientation '{0}' not found")]
    OrientationNotFound(String),

    /// The object does not instance a mesh.
    #[error("object '{0}' is not a mesh")]
    NotAMesh(String),

    /// Parenting would make an object its own ancestor.
    #[error("parenting would create a cycle")]
    ParentCycle,

    /// A world matrix could not be inverted.
    #[error("transform is singular")]
    SingularTransform,

    /// A selected vertex index is past the end of the mesh.
    #[error("vertex {index} out of range ({len} vertices)")]
    VertexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of vertices in the mesh.
        len: usize,
    },
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Local axis selector for object rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Local X.
    X,
    /// Local Y.
    Y,
    /// Local Z.
    Z,
}

/// The modeling host: objects, meshes, selection, mode and orientations.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, Object>,
    meshes: SlotMap<MeshId, MeshData>,
    active: Option<ObjectId>,
    mode: Mode,
    orientations: BTreeMap<String, Mat3>,
}

impl Scene {
    /// Create an empty scene in object mode.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mesh data blocks ──────────────────────────────────────────────────

    /// Store a mesh data block.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: PolyMesh) -> MeshId {
        self.meshes.insert(MeshData::new(name, mesh))
    }

    /// Look up a mesh data block.
    pub fn mesh(&self, id: MeshId) -> Result<&MeshData> {
        self.meshes.get(id).ok_or(SceneError::MeshNotFound)
    }

    /// Look up a mesh data block mutably.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut MeshData> {
        self.meshes.get_mut(id).ok_or(SceneError::MeshNotFound)
    }

    /// Duplicate a mesh data block under the same name.
    pub fn copy_mesh(&mut self, id: MeshId) -> Result<MeshId> {
        let copy = self.mesh(id)?.clone();
        Ok(self.meshes.insert(copy))
    }

    /// Delete a mesh data block. Objects still instancing it become empties.
    pub fn remove_mesh(&mut self, id: MeshId) -> Result<MeshData> {
        let data = self.meshes.remove(id).ok_or(SceneError::MeshNotFound)?;
        for object in self.objects.values_mut() {
            if object.data == ObjectData::Mesh(id) {
                object.data = ObjectData::Empty;
            }
        }
        Ok(data)
    }

    /// Number of objects instancing a mesh.
    pub fn mesh_users(&self, id: MeshId) -> usize {
        self.objects
            .values()
            .filter(|o| o.data == ObjectData::Mesh(id))
            .count()
    }

    /// Iterate over all mesh data blocks.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &MeshData)> {
        self.meshes.iter()
    }

    // ── Objects ───────────────────────────────────────────────────────────

    /// Link a new object into the scene.
    pub fn add_object(&mut self, name: impl Into<String>, data: ObjectData) -> ObjectId {
        self.objects.insert(Object::new(name, data))
    }

    /// Look up an object.
    pub fn object(&self, id: ObjectId) -> Result<&Object> {
        self.objects.get(id).ok_or(SceneError::ObjectNotFound)
    }

    /// Look up an object mutably.
    pub fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.objects.get_mut(id).ok_or(SceneError::ObjectNotFound)
    }

    /// True when the handle resolves.
    pub fn contains_object(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Iterate over all objects.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> {
        self.objects.iter()
    }

    /// Number of objects.
    pub fn num_objects(&self) -> usize {
        self.objects.len()
    }

    /// Unlink an object. Its children are unparented keeping their world
    /// transforms; its mesh data block is left in place.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Object> {
        self.object(id)?;
        let children: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, o)| o.parent == Some(id))
            .map(|(child, _)| child)
            .collect();
        for child in children {
            self.clear_parent_keep_transform(child)?;
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.objects.remove(id).ok_or(SceneError::ObjectNotFound)
    }

    /// The mesh an object instances, or `NotAMesh`.
    pub fn object_mesh(&self, id: ObjectId) -> Result<MeshId> {
        let object = self.object(id)?;
        object
            .mesh()
            .ok_or_else(|| SceneError::NotAMesh(object.name.clone()))
    }

    /// Object-to-world transform, composed through the parent chain.
    pub fn matrix_world(&self, id: ObjectId) -> Result<Transform> {
        let object = self.object(id)?;
        let mut world = object.matrix_basis.clone();
        let mut parent = object.parent;
        while let Some(p) = parent {
            let object = self.object(p)?;
            world = object.matrix_basis.then(&world);
            parent = object.parent;
        }
        Ok(world)
    }

    // ── Active object, selection, mode ────────────────────────────────────

    /// The active object, if any.
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Make an object active (or clear the active object).
    pub fn set_active(&mut self, id: Option<ObjectId>) -> Result<()> {
        if let Some(id) = id {
            self.object(id)?;
        }
        self.active = id;
        Ok(())
    }

    /// Select or deselect every object.
    pub fn select_all(&mut self, selected: bool) {
        for object in self.objects.values_mut() {
            object.selected = selected;
        }
    }

    /// Set one object's selection flag.
    pub fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()> {
        self.object_mut(id)?.selected = selected;
        Ok(())
    }

    /// Handles of all selected objects.
    pub fn selected_objects(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, o)| o.selected)
            .map(|(id, _)| id)
            .collect()
    }

    /// The current interaction mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch mode permanently.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Switch mode until the returned guard is dropped.
    pub fn enter_mode(&mut self, mode: Mode) -> ModeGuard<'_> {
        ModeGuard::new(self, mode)
    }

    /// Append a vertex to a mesh's selection history. Re-selecting a vertex
    /// moves it to the end.
    pub fn select_vertex(&mut self, mesh: MeshId, index: usize) -> Result<()> {
        let data = self.mesh_mut(mesh)?;
        let len = data.mesh.num_vertices();
        if index >= len {
            return Err(SceneError::VertexOutOfRange { index, len });
        }
        data.select_history.retain(|&v| v != index);
        data.select_history.push(index);
        Ok(())
    }

    /// Clear a mesh's vertex selection.
    pub fn deselect_vertices(&mut self, mesh: MeshId) -> Result<()> {
        self.mesh_mut(mesh)?.select_history.clear();
        Ok(())
    }

    // ── Orientations ──────────────────────────────────────────────────────

    /// Register a named orientation, overwriting any previous one.
    pub fn create_orientation(&mut self, name: impl Into<String>, basis: Mat3) {
        let name = name.into();
        debug!(%name, "created orientation");
        self.orientations.insert(name, basis);
    }

    /// Look up a named orientation.
    pub fn orientation(&self, name: &str) -> Result<&Mat3> {
        self.orientations
            .get(name)
            .ok_or_else(|| SceneError::OrientationNotFound(name.to_string()))
    }

    // ── Transform edits ───────────────────────────────────────────────────

    /// Parent `child` to `parent` without inverse correction: the child's
    /// basis is reinterpreted in the parent's space.
    pub fn set_parent(&mut self, child: ObjectId, parent: ObjectId) -> Result<()> {
        if self.is_ancestor(child, parent)? {
            return Err(SceneError::ParentCycle);
        }
        self.object_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// True when `ancestor` is `id` itself or appears in its parent chain.
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> Result<bool> {
        self.object(ancestor)?;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return Ok(true);
            }
            cursor = self.object(current)?.parent;
        }
        Ok(false)
    }

    /// Unparent an object, baking its world transform into its basis.
    pub fn clear_parent_keep_transform(&mut self, id: ObjectId) -> Result<()> {
        let world = self.matrix_world(id)?;
        let object = self.object_mut(id)?;
        object.matrix_basis = world;
        object.parent = None;
        Ok(())
    }

    /// Set an object's world rotation to a named orientation, keeping its
    /// world location and per-axis scale.
    pub fn align_to_orientation(&mut self, id: ObjectId, orientation: &str) -> Result<()> {
        let basis = *self.orientation(orientation)?;
        let world = self.matrix_world(id)?;
        let scale = Mat3::from_diagonal(&world.scale_factors());
        let aligned = Transform::from_parts(&(basis * scale), &world.translation_part());
        let parent_world = match self.object(id)?.parent {
            Some(p) => self.matrix_world(p)?,
            None => Transform::identity(),
        };
        let to_parent = parent_world
            .inverse()
            .ok_or(SceneError::SingularTransform)?;
        self.object_mut(id)?.matrix_basis = to_parent.then(&aligned);
        Ok(())
    }

    /// Rotate an object about one of its own axes, around its origin.
    pub fn rotate_local(&mut self, id: ObjectId, axis: Axis, angle: f64) -> Result<()> {
        let rotation = match axis {
            Axis::X => Transform::rotation_x(angle),
            Axis::Y => Transform::rotation_y(angle),
            Axis::Z => Transform::rotation_z(angle),
        };
        let object = self.object_mut(id)?;
        object.matrix_basis = object.matrix_basis.then(&rotation);
        Ok(())
    }

    /// Give an object its own copy of a shared mesh. Returns the mesh the
    /// object instances afterwards.
    pub fn make_single_user(&mut self, id: ObjectId) -> Result<MeshId> {
        let mesh = self.object_mesh(id)?;
        if self.mesh_users(mesh) <= 1 {
            return Ok(mesh);
        }
        let copy = self.copy_mesh(mesh)?;
        self.object_mut(id)?.data = ObjectData::Mesh(copy);
        debug!("made mesh single user");
        Ok(copy)
    }

    /// Merge the meshes of `others` into `target`'s mesh, expressed in the
    /// target's local space. The other objects are removed, as are their
    /// meshes once nothing else uses them.
    pub fn join(&mut self, target: ObjectId, others: &[ObjectId]) -> Result<()> {
        let target_mesh = self.object_mesh(target)?;
        let to_local = self
            .matrix_world(target)?
            .inverse()
            .ok_or(SceneError::SingularTransform)?;

        for &other in others.iter().filter(|&&o| o != target) {
            let mesh_id = self.object_mesh(other)?;
            let mut part = self.mesh(mesh_id)?.mesh.clone();
            part.transform(&to_local.then(&self.matrix_world(other)?));
            self.remove_object(other)?;
            if mesh_id != target_mesh && self.mesh_users(mesh_id) == 0 {
                self.meshes.remove(mesh_id);
            }
            self.mesh_mut(target_mesh)?.mesh.append(&part);
        }
        self.deselect_vertices(target_mesh)?;
        debug!(joined = others.len(), "joined objects");
        Ok(())
    }
}
