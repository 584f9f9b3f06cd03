//! Scene objects and mesh data blocks.

use mitre_math::Transform;
use mitre_mesh::PolyMesh;

use crate::{MeshId, ObjectId};

/// What an object instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectData {
    /// A mesh data block, possibly shared with other objects.
    Mesh(MeshId),
    /// No geometry (a transform-only object).
    Empty,
}

/// A placed instance in the scene.
#[derive(Debug, Clone)]
pub struct Object {
    /// Display name; not required to be unique.
    pub name: String,
    /// The data block this object instances.
    pub data: ObjectData,
    /// Transform relative to the parent (or the world when unparented).
    pub matrix_basis: Transform,
    /// Parent object, if any.
    pub parent: Option<ObjectId>,
    /// Object-level selection flag.
    pub selected: bool,
}

impl Object {
    /// An unparented, unselected object at the world origin.
    pub fn new(name: impl Into<String>, data: ObjectData) -> Self {
        Self {
            name: name.into(),
            data,
            matrix_basis: Transform::identity(),
            parent: None,
            selected: false,
        }
    }

    /// The mesh this object instances, if it is a mesh object.
    pub fn mesh(&self) -> Option<MeshId> {
        match self.data {
            ObjectData::Mesh(id) => Some(id),
            ObjectData::Empty => None,
        }
    }
}

/// A named mesh data block with its vertex selection history.
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Display name.
    pub name: String,
    /// Geometry in object-local space.
    pub mesh: PolyMesh,
    /// Selected vertex indices in the order they were picked.
    pub select_history: Vec<usize>,
}

impl MeshData {
    /// Wrap a mesh with an empty selection.
    pub fn new(name: impl Into<String>, mesh: PolyMesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            select_history: Vec::new(),
        }
    }
}
